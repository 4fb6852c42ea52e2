//! Automation policy: which plan steps may run unattended.
//!
//! Nothing here performs side effects. The policy splits a plan into steps an
//! executor may run automatically and steps that stay suggestions for an
//! operator. Field work (DISPATCH, ESCALATE) is always a suggestion.

use serde::{Deserialize, Serialize};

use crate::planner::{Action, ActionPlan, AutoLevel, PlanStep};

/// Maps an [`AutoLevel`] to the set of auto-executable actions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecutionPolicy {
    pub level: AutoLevel,
}

impl ExecutionPolicy {
    pub fn for_level(level: AutoLevel) -> Self {
        Self { level }
    }

    pub fn permits(&self, action: Action) -> bool {
        match (self.level, action) {
            (_, Action::RemoteDiag | Action::RemoteReset) => true,
            (AutoLevel::Assist, Action::OpenCase | Action::Monitor) => true,
            _ => false,
        }
    }

    /// Partition `plan` into automatic and advisory steps, preserving order.
    pub fn split(&self, plan: &ActionPlan) -> ExecutionSplit {
        let (automatic, advisory): (Vec<PlanStep>, Vec<PlanStep>) = plan
            .steps
            .iter()
            .cloned()
            .partition(|step| self.permits(step.action));
        ExecutionSplit {
            automatic,
            advisory,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionSplit {
    pub automatic: Vec<PlanStep>,
    pub advisory: Vec<PlanStep>,
}
