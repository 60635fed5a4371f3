use crate::command::application::approval::ApprovalGate;
use crate::core::{
    domain::{
        error::{XenError, XenResult},
        model::{
            api_action::ApiCall, client_config::MutationPolicy, field_mutation::MutationSet,
            invocation::InvocationMode, xen_class::XenClass,
        },
        value_object::OpaqueRef,
    },
    infrastructure::session::Session,
};
use std::sync::Arc;
use tracing::{error, info};

/// A mutation that reached the server and failed.
#[derive(Debug)]
pub struct MutationFailure {
    pub call: String,
    pub error: XenError,
}

/// What happened to each requested field mutation, by qualified method name.
#[derive(Debug, Default)]
pub struct MutationReport {
    pub applied: Vec<String>,
    pub vetoed: Vec<String>,
    pub failed: Vec<MutationFailure>,
}

impl MutationReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }

    /// Returns the first failure, if any. All of them were logged when they happened.
    pub fn into_result(self) -> XenResult<()> {
        match self.failed.into_iter().next() {
            Some(failure) => Err(failure.error),
            None => Ok(()),
        }
    }
}

/// Applies field mutations one remote call at a time, in caller order.
///
/// Nothing is rolled back: mutations applied before a failure stay applied.
pub struct MutationService {
    gate: Arc<dyn ApprovalGate>,
    policy: MutationPolicy,
}

impl MutationService {
    pub fn new(gate: Arc<dyn ApprovalGate>, policy: MutationPolicy) -> Self {
        Self { gate, policy }
    }

    /// # Errors
    ///
    /// Only under `MutationPolicy::StopOnError`: `XenError::MutationAborted`
    /// wrapping the first failure and listing what was already applied.
    /// Otherwise failures are collected in the report.
    pub async fn execute(
        &self,
        session: &Session,
        class: XenClass,
        target: &OpaqueRef,
        mutations: &MutationSet,
    ) -> XenResult<MutationReport> {
        let mut report = MutationReport::default();

        for mutation in mutations {
            let call = ApiCall::on(class, mutation.method(), target).args(mutation.args());
            let name = call.name();

            if !self.gate.should_process(target.as_str(), &name) {
                info!(call = %name, target = %target, "mutation vetoed");
                report.vetoed.push(name);
                continue;
            }

            match session.call(&call, InvocationMode::Sync).await {
                Ok(_) => report.applied.push(name),
                Err(e) => {
                    error!(call = %name, target = %target, error = %e, "mutation failed");
                    if self.policy == MutationPolicy::StopOnError {
                        return Err(XenError::MutationAborted {
                            applied: report.applied,
                            vetoed: report.vetoed,
                            source: Box::new(e),
                        });
                    }
                    report.failed.push(MutationFailure {
                        call: name,
                        error: e,
                    });
                }
            }
        }

        Ok(report)
    }
}

impl std::fmt::Debug for MutationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MutationService")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
