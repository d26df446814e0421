//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and Window, and wires them to the device
//! session, surface binding, render-target manager, and the application.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig};
