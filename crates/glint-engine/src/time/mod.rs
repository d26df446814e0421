//! Frame timing.
//!
//! One `FrameClock` per render loop; call `tick()` once per submitted frame.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
