//! Frame-loop lifecycle.
//!
//! Device loss and recovery are modeled as explicit phase transitions rather
//! than re-entrant initialization calls, so recovery depth and termination are
//! visible and testable.

mod phase;

pub use phase::{Phase, RecoveryAction};
