//! Pre-execution authorization hook for state-changing calls.

/// Decides whether a state-changing call may go ahead.
///
/// `target` is the opaque reference (or a description of the object about to
/// be created) and `action` the qualified method, e.g. `SR.add_tags`.
/// Returning `false` skips the call; nothing else is affected.
pub trait ApprovalGate: Send + Sync {
    fn should_process(&self, target: &str, action: &str) -> bool;
}

/// Approves everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoApprove;

impl ApprovalGate for AutoApprove {
    fn should_process(&self, _target: &str, _action: &str) -> bool {
        true
    }
}

/// Vetoes everything; useful for dry runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct DenyAll;

impl ApprovalGate for DenyAll {
    fn should_process(&self, _target: &str, _action: &str) -> bool {
        false
    }
}

impl<F> ApprovalGate for F
where
    F: Fn(&str, &str) -> bool + Send + Sync,
{
    fn should_process(&self, target: &str, action: &str) -> bool {
        self(target, action)
    }
}
