//! GPU device + surface management.
//!
//! This module is responsible for:
//! - acquiring the wgpu Instance/Adapter/Device/Queue (the device session)
//! - observing device loss and supporting re-acquisition
//! - creating & configuring the Surface (swapchain) against the session

mod error;
mod session;
mod surface;

pub use error::AcquireError;
pub use session::{AcquireOptions, DeviceSession, LossEvent, LossReason};
pub use surface::{SurfaceBinding, SurfaceErrorAction};
