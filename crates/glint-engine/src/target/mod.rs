//! Multisampled render-target management.
//!
//! An arena-of-one: the manager owns at most one MSAA color texture at a
//! time, sized to the surface's drawable size, and replaces it lazily when
//! the observed size changes.

mod manager;

pub use manager::{RenderTargetManager, TargetPlan, MSAA_SAMPLE_COUNT};
