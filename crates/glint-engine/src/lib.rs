//! Glint engine crate.
//!
//! This crate owns the device lifecycle, render-target management, and the
//! frame loop used by the demo binaries. Shader text, pipeline descriptors,
//! and geometry are supplied by the application layer through [`core::App`].

pub mod core;
pub mod device;
pub mod sched;
pub mod target;
pub mod time;
pub mod window;

pub mod logging;
