//! Engine-facing contract for the application layer.
//!
//! The runtime owns the device lifecycle and the per-frame pass; the
//! application owns the static GPU resources (pipeline, geometry) and the
//! draw commands recorded inside that pass.

mod app;

pub use app::{App, GpuCtx, PassPolicy};
