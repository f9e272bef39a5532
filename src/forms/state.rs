//! Per-instance lifecycle shared by submission and upload.
//!
//! ```text
//! Idle -> Validating -> Idle            (invalid)
//! Idle -> Validating -> Submitting -> Idle
//! Idle -> Uploading -> Idle
//! ```
//!
//! Only one activity may hold the form at a time. Whichever starts first
//! wins; the other is rejected with [`Busy`] until the form returns to Idle.

use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormPhase {
    #[default]
    Idle,
    Validating,
    Submitting,
    Uploading,
}

impl fmt::Display for FormPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FormPhase::Idle => "idle",
            FormPhase::Validating => "validating",
            FormPhase::Submitting => "submitting",
            FormPhase::Uploading => "uploading",
        };
        f.write_str(label)
    }
}

/// Work that needs exclusive use of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activity {
    Submit,
    Upload,
}

/// Rejection returned when an activity is requested while another is in
/// flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot {requested:?} while the form is {current}")]
pub struct Busy {
    pub requested: Activity,
    pub current: FormPhase,
}

#[derive(Debug, Clone, Default)]
pub struct FormMachine {
    phase: FormPhase,
}

impl FormMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn is_idle(&self) -> bool {
        self.phase == FormPhase::Idle
    }

    /// Claims the form for `activity`. Submissions enter `Validating`
    /// first; uploads go straight to `Uploading`.
    pub fn begin(&mut self, activity: Activity) -> Result<(), Busy> {
        if self.phase != FormPhase::Idle {
            return Err(Busy {
                requested: activity,
                current: self.phase,
            });
        }
        self.phase = match activity {
            Activity::Submit => FormPhase::Validating,
            Activity::Upload => FormPhase::Uploading,
        };
        Ok(())
    }

    /// `Validating -> Submitting`. Any other phase is left untouched.
    pub fn validated(&mut self) -> bool {
        if self.phase == FormPhase::Validating {
            self.phase = FormPhase::Submitting;
            true
        } else {
            false
        }
    }

    /// Returns to `Idle` only from the `expected` phase, so one activity
    /// cannot release the form while another holds it.
    pub fn finish(&mut self, expected: FormPhase) -> bool {
        if self.phase == expected {
            self.phase = FormPhase::Idle;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submit_walks_through_validation() {
        let mut machine = FormMachine::new();
        machine.begin(Activity::Submit).unwrap();
        assert_eq!(machine.phase(), FormPhase::Validating);
        assert!(machine.validated());
        assert_eq!(machine.phase(), FormPhase::Submitting);
        assert!(machine.finish(FormPhase::Submitting));
        assert!(machine.is_idle());
    }

    #[test]
    fn first_activity_holds_the_form() {
        let mut machine = FormMachine::new();
        machine.begin(Activity::Upload).unwrap();
        let busy = machine.begin(Activity::Submit).unwrap_err();
        assert_eq!(busy.current, FormPhase::Uploading);
        assert_eq!(busy.requested, Activity::Submit);

        assert!(machine.finish(FormPhase::Uploading));
        machine.begin(Activity::Submit).unwrap();
        assert!(machine.validated());
        let busy = machine.begin(Activity::Upload).unwrap_err();
        assert_eq!(busy.current, FormPhase::Submitting);
    }

    #[test]
    fn validated_is_noop_outside_validation() {
        let mut machine = FormMachine::new();
        assert!(!machine.validated());
        machine.begin(Activity::Upload).unwrap();
        assert!(!machine.validated());
        assert_eq!(machine.phase(), FormPhase::Uploading);
    }

    #[test]
    fn finish_only_releases_the_holding_activity() {
        let mut machine = FormMachine::new();
        machine.begin(Activity::Submit).unwrap();
        machine.validated();
        assert!(!machine.finish(FormPhase::Uploading));
        assert_eq!(machine.phase(), FormPhase::Submitting);
        assert!(machine.begin(Activity::Submit).is_err());
    }
}
