//! Outcome of one dispatch run

use std::fmt;

use crate::error::{ChaosError, Result};
use crate::models::UnitRef;

/// Disruptive action applied to the selected pods
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Terminate,
    KillMainProcess,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Terminate => "terminate",
            Action::KillMainProcess => "kill_main_process",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A pod whose disruption failed, with the error that stopped it
#[derive(Debug)]
pub struct DispatchFailure {
    pub unit: UnitRef,
    pub error: ChaosError,
}

#[derive(Debug)]
pub struct DispatchReport {
    pub action: Action,
    /// Pods disrupted, in dispatch order
    pub succeeded: Vec<UnitRef>,
    /// Names of the companion pods created, parallel to `succeeded`
    pub companions: Vec<String>,
    pub failed: Vec<DispatchFailure>,
}

impl DispatchReport {
    pub fn new(action: Action) -> Self {
        Self {
            action,
            succeeded: Vec::new(),
            companions: Vec::new(),
            failed: Vec::new(),
        }
    }

    pub fn attempted(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Turn any recorded failure into [`ChaosError::PartialFailure`]
    pub fn ensure_success(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(ChaosError::PartialFailure {
                failed: self.failed.len(),
                attempted: self.attempted(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_report_is_success() {
        let report = DispatchReport::new(Action::Terminate);
        assert_eq!(report.attempted(), 0);
        assert!(report.ensure_success().is_ok());
    }

    #[test]
    fn test_failures_become_partial_failure() {
        let mut report = DispatchReport::new(Action::KillMainProcess);
        report.succeeded.push(UnitRef::new("a", "default"));
        report.failed.push(DispatchFailure {
            unit: UnitRef::new("b", "default"),
            error: ChaosError::Unschedulable {
                pod: "default/b".to_string(),
            },
        });

        match report.ensure_success() {
            Err(ChaosError::PartialFailure { failed, attempted }) => {
                assert_eq!(failed, 1);
                assert_eq!(attempted, 2);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
