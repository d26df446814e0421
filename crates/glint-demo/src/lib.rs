//! Triangle demo layer.
//!
//! Static pipeline/resource configuration for the two render variants. The
//! engine owns the device lifecycle and the per-frame pass; this crate only
//! supplies shaders, geometry, and draw commands through `glint_engine::core::App`.

pub mod triangle;
pub mod vertex;
