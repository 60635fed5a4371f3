//! The generic command template: resolve, mutate, invoke, project.

use crate::command::application::{
    approval::ApprovalGate,
    request::command_request::CommandRequest,
    service::{
        invoke_service::{Execution, InvokeService},
        mutation_service::{MutationReport, MutationService},
        projection_service::ProjectionService,
        resolve_service::ResolveService,
    },
};
use crate::core::{
    domain::{
        error::XenResult,
        model::{
            api_action::{ApiAction, ApiCall, ReturnShape},
            client_config::MutationPolicy,
            identifier::ObjectIdentifier,
            invocation::{InvocationMode, InvocationResult, XenOutput},
            xen_class::XenClass,
        },
        value_object::OpaqueRef,
    },
    infrastructure::session::Session,
};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{info, warn};

/// Result of one command: the invocation result plus what happened to the
/// field mutations that preceded it.
#[derive(Debug)]
pub struct CommandOutcome {
    pub result: InvocationResult,
    pub mutations: MutationReport,
}

impl CommandOutcome {
    fn completed(output: XenOutput) -> Self {
        Self {
            result: InvocationResult::Completed(output),
            mutations: MutationReport::default(),
        }
    }

    /// Fails with the first reported mutation failure, otherwise yields the result.
    pub fn into_result(self) -> XenResult<InvocationResult> {
        self.mutations.into_result()?;
        Ok(self.result)
    }
}

/// Runs commands against one session. Holds no per-request state.
pub struct CommandService {
    gate: Arc<dyn ApprovalGate>,
    endpoint: Option<String>,
    resolver: ResolveService,
    mutator: MutationService,
    invoker: InvokeService,
    projector: ProjectionService,
}

impl CommandService {
    pub fn new(gate: Arc<dyn ApprovalGate>, policy: MutationPolicy) -> Self {
        Self {
            mutator: MutationService::new(Arc::clone(&gate), policy),
            gate,
            endpoint: None,
            resolver: ResolveService::new(),
            invoker: InvokeService::new(),
            projector: ProjectionService::new(),
        }
    }

    /// The endpoint shown to the approval gate for calls that have no target
    /// object yet, such as constructors.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Resolves an identifier without touching the object.
    pub async fn resolve(
        &self,
        session: &Session,
        class: XenClass,
        identifier: &ObjectIdentifier,
    ) -> XenResult<OpaqueRef> {
        self.resolver.execute(session, class, identifier).await
    }

    /// Runs one command against an existing object.
    ///
    /// A null resolved reference means there is no such object: no further
    /// call is made and the result is `Completed(XenOutput::None)`. Without an
    /// action the command ends by re-reading the target record.
    ///
    /// # Errors
    ///
    /// Identifier failures, lookup failures, the action's own failure, and
    /// under `MutationPolicy::StopOnError` the first mutation failure.
    pub async fn run(&self, session: &Session, request: CommandRequest) -> XenResult<CommandOutcome> {
        let CommandRequest {
            class,
            identifier,
            mutations,
            action,
            mode,
        } = request;

        let target = self.resolver.execute(session, class, &identifier).await?;
        if target.is_null() {
            warn!(class = %class, "identifier resolved to no object, nothing to do");
            return Ok(CommandOutcome::completed(XenOutput::None));
        }
        info!(class = %class, target = %target, mutations = mutations.len(), "running command");

        let report = self
            .mutator
            .execute(session, class, &target, &mutations)
            .await?;

        let result = match action {
            Some(action) => self.perform(session, class, &target, &action, mode).await?,
            None => InvocationResult::Completed(XenOutput::Record(
                self.projector.fetch(session, class, &target).await?,
            )),
        };

        Ok(CommandOutcome {
            result,
            mutations: report,
        })
    }

    /// Calls a class-level method that takes no object reference, such as
    /// `Cluster.pool_create`.
    pub async fn invoke_static(
        &self,
        session: &Session,
        class: XenClass,
        action: &ApiAction,
        mode: InvocationMode,
    ) -> XenResult<CommandOutcome> {
        let call = ApiCall::new(class, action.method()).args(action.args().iter().cloned());
        let gate_target = self
            .endpoint
            .clone()
            .unwrap_or_else(|| format!("new {}", class));

        if action.is_gated() && !self.gate.should_process(&gate_target, &call.name()) {
            info!(call = %call.name(), "call vetoed");
            return Ok(CommandOutcome::completed(XenOutput::None));
        }

        let result = self.finish(session, &call, action.returns(), mode).await?;
        Ok(CommandOutcome {
            result,
            mutations: MutationReport::default(),
        })
    }

    /// `Class.create(record)`; the result is the new object's record, or its
    /// task in async mode.
    pub async fn create(
        &self,
        session: &Session,
        class: XenClass,
        fields: Map<String, Value>,
        mode: InvocationMode,
    ) -> XenResult<CommandOutcome> {
        let action = ApiAction::new("create", ReturnShape::Ref(class)).arg(Value::Object(fields));
        self.invoke_static(session, class, &action, mode).await
    }

    async fn perform(
        &self,
        session: &Session,
        class: XenClass,
        target: &OpaqueRef,
        action: &ApiAction,
        mode: InvocationMode,
    ) -> XenResult<InvocationResult> {
        let call = action.call_on(class, target);
        if action.is_gated() && !self.gate.should_process(target.as_str(), &call.name()) {
            info!(call = %call.name(), target = %target, "call vetoed");
            return Ok(InvocationResult::Completed(XenOutput::None));
        }
        self.finish(session, &call, action.returns(), mode).await
    }

    async fn finish(
        &self,
        session: &Session,
        call: &ApiCall,
        returns: ReturnShape,
        mode: InvocationMode,
    ) -> XenResult<InvocationResult> {
        match self.invoker.execute(session, call, mode).await? {
            Execution::Pending(handle) => Ok(InvocationResult::Pending(handle)),
            Execution::Finished(value) => Ok(InvocationResult::Completed(
                self.projector
                    .execute(session, call, returns, value)
                    .await?,
            )),
        }
    }
}

impl std::fmt::Debug for CommandService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandService")
            .field("endpoint", &self.endpoint)
            .field("mutator", &self.mutator)
            .finish_non_exhaustive()
    }
}
