use crate::core::domain::model::{
    api_action::ApiAction, field_mutation::MutationSet, identifier::ObjectIdentifier,
    invocation::InvocationMode, xen_class::XenClass,
};

/// Everything one command needs: which object, which field changes, which
/// operation, and in which mode.
///
/// A request without an action is a pure mutation command; it finishes by
/// re-reading the target record.
#[derive(Debug, Clone)]
pub struct CommandRequest {
    pub class: XenClass,
    pub identifier: ObjectIdentifier,
    pub mutations: MutationSet,
    pub action: Option<ApiAction>,
    pub mode: InvocationMode,
}

impl CommandRequest {
    pub fn new(class: XenClass, identifier: impl Into<ObjectIdentifier>) -> Self {
        Self {
            class,
            identifier: identifier.into(),
            mutations: MutationSet::default(),
            action: None,
            mode: InvocationMode::default(),
        }
    }

    #[must_use]
    pub fn mutations(mut self, mutations: MutationSet) -> Self {
        self.mutations = mutations;
        self
    }

    #[must_use]
    pub fn action(mut self, action: ApiAction) -> Self {
        self.action = Some(action);
        self
    }

    #[must_use]
    pub fn mode(mut self, mode: InvocationMode) -> Self {
        self.mode = mode;
        self
    }
}
