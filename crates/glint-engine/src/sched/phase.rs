use crate::device::LossReason;

/// What the runtime must do after a loss notification.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum RecoveryAction {
    /// Re-acquire the session and rebuild everything downstream.
    Reacquire,
    /// Intentional teardown; stop scheduling, never re-acquire.
    Halt,
}

/// Lifecycle of the frame loop.
///
/// `Idle -> Running -> (loss) -> Reinitializing -> Running -> ...`, with
/// `Stopped` reachable only through an intentional (`Destroyed`) loss.
/// `Running` carries the session generation so tests can observe that each
/// recovery produced a genuinely fresh device.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Phase {
    /// No device acquired yet.
    Idle,
    /// Ticking; frames are submitted each redraw.
    Running { generation: u64 },
    /// Loss observed; a fresh acquisition is in flight.
    Reinitializing,
    /// Terminal. The loop no longer schedules work.
    Stopped,
}

impl Phase {
    pub fn new() -> Self {
        Phase::Idle
    }

    /// Records a successful (re)acquisition.
    pub fn on_acquired(&mut self, generation: u64) {
        match self {
            Phase::Stopped => {}
            _ => *self = Phase::Running { generation },
        }
    }

    /// Records a device-loss notification and says how to proceed.
    ///
    /// Losses reported after the loop already stopped are ignored.
    pub fn on_loss(&mut self, reason: LossReason) -> RecoveryAction {
        if *self == Phase::Stopped {
            return RecoveryAction::Halt;
        }

        match reason {
            LossReason::Destroyed => {
                *self = Phase::Stopped;
                RecoveryAction::Halt
            }
            LossReason::Unknown => {
                *self = Phase::Reinitializing;
                RecoveryAction::Reacquire
            }
        }
    }

    /// Records that a recovery attempt failed; the loop stops.
    pub fn on_recovery_failed(&mut self) {
        *self = Phase::Stopped;
    }

    /// True while the loop should submit frames.
    pub fn is_running(&self) -> bool {
        matches!(self, Phase::Running { .. })
    }
}

impl Default for Phase {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_idle() {
        assert_eq!(Phase::new(), Phase::Idle);
    }

    #[test]
    fn acquisition_starts_running() {
        let mut phase = Phase::new();
        phase.on_acquired(0);
        assert_eq!(phase, Phase::Running { generation: 0 });
        assert!(phase.is_running());
    }

    #[test]
    fn unknown_loss_reinitializes_then_runs_again() {
        let mut phase = Phase::new();
        phase.on_acquired(0);

        assert_eq!(phase.on_loss(LossReason::Unknown), RecoveryAction::Reacquire);
        assert_eq!(phase, Phase::Reinitializing);

        phase.on_acquired(1);
        assert_eq!(phase, Phase::Running { generation: 1 });
    }

    #[test]
    fn repeated_losses_always_return_to_running() {
        // Full-reset property: any sequence of non-destroyed losses ends back
        // in Running with a fresh generation each time.
        let mut phase = Phase::new();
        phase.on_acquired(0);

        for generation in 1..=16 {
            assert_eq!(phase.on_loss(LossReason::Unknown), RecoveryAction::Reacquire);
            phase.on_acquired(generation);
            assert_eq!(phase, Phase::Running { generation });
        }
    }

    #[test]
    fn destroyed_loss_halts_without_reacquire() {
        let mut phase = Phase::new();
        phase.on_acquired(0);

        assert_eq!(phase.on_loss(LossReason::Destroyed), RecoveryAction::Halt);
        assert_eq!(phase, Phase::Stopped);

        // Stopped is terminal: a late acquisition or loss changes nothing.
        phase.on_acquired(7);
        assert_eq!(phase, Phase::Stopped);
        assert_eq!(phase.on_loss(LossReason::Unknown), RecoveryAction::Halt);
    }

    #[test]
    fn failed_recovery_stops_the_loop() {
        let mut phase = Phase::new();
        phase.on_acquired(0);
        phase.on_loss(LossReason::Unknown);
        phase.on_recovery_failed();
        assert_eq!(phase, Phase::Stopped);
        assert!(!phase.is_running());
    }
}
