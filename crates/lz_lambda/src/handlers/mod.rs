pub mod macie_member;
pub mod policy_attachment;

/// How a successful reconciliation converged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// External state already matched; no mutation was issued.
    NoOp,
    /// One attach/detach/create/delete call brought state into line.
    Mutated,
}

/// Result of a successful reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    pub physical_resource_id: String,
    pub outcome: ReconcileOutcome,
}

impl Reconciliation {
    pub fn no_op(physical_resource_id: impl Into<String>) -> Self {
        Self {
            physical_resource_id: physical_resource_id.into(),
            outcome: ReconcileOutcome::NoOp,
        }
    }

    pub fn mutated(physical_resource_id: impl Into<String>) -> Self {
        Self {
            physical_resource_id: physical_resource_id.into(),
            outcome: ReconcileOutcome::Mutated,
        }
    }
}
