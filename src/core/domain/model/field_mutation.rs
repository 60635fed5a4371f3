//! Per-field mutations applied to a resolved object.

use serde_json::Value;

/// How a field is changed, which also fixes the remote method and its arity.
#[derive(Debug, Clone, PartialEq)]
pub enum MutationKind {
    /// `add_to_<field>(ref, key, value)` on a string map field.
    AddToMap { key: String, value: String },
    /// `remove_from_<field>(ref, key)` on a string map field.
    RemoveFromMap { key: String },
    /// `add_<field>(ref, value)` on a set field, e.g. `add_tags`.
    AddToSet { value: String },
    /// `remove_<field>(ref, value)` on a set field.
    RemoveFromSet { value: String },
    /// `set_<field>(ref, value)`, replacing the whole field.
    Set { value: Value },
}

/// One mutation of one field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldMutation {
    field: String,
    kind: MutationKind,
}

impl FieldMutation {
    pub fn new(field: impl Into<String>, kind: MutationKind) -> Self {
        Self {
            field: field.into(),
            kind,
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn kind(&self) -> &MutationKind {
        &self.kind
    }

    /// The unqualified remote method, e.g. `add_to_other_config`.
    pub fn method(&self) -> String {
        match &self.kind {
            MutationKind::AddToMap { .. } => format!("add_to_{}", self.field),
            MutationKind::RemoveFromMap { .. } => format!("remove_from_{}", self.field),
            MutationKind::AddToSet { .. } => format!("add_{}", self.field),
            MutationKind::RemoveFromSet { .. } => format!("remove_{}", self.field),
            MutationKind::Set { .. } => format!("set_{}", self.field),
        }
    }

    /// Arguments following the object reference.
    pub fn args(&self) -> Vec<Value> {
        match &self.kind {
            MutationKind::AddToMap { key, value } => {
                vec![Value::from(key.as_str()), Value::from(value.as_str())]
            }
            MutationKind::RemoveFromMap { key } => vec![Value::from(key.as_str())],
            MutationKind::AddToSet { value } | MutationKind::RemoveFromSet { value } => {
                vec![Value::from(value.as_str())]
            }
            MutationKind::Set { value } => vec![value.clone()],
        }
    }
}

/// Mutations in the order the caller declared them.
///
/// The `*_opt` builders record a mutation only when a value is present, so a
/// front end can forward optional parameters without presence flags.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MutationSet(Vec<FieldMutation>);

impl MutationSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(mut self, mutation: FieldMutation) -> Self {
        self.0.push(mutation);
        self
    }

    pub fn add_to(self, field: &str, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(FieldMutation::new(
            field,
            MutationKind::AddToMap {
                key: key.into(),
                value: value.into(),
            },
        ))
    }

    pub fn remove_from(self, field: &str, key: impl Into<String>) -> Self {
        self.push(FieldMutation::new(
            field,
            MutationKind::RemoveFromMap { key: key.into() },
        ))
    }

    pub fn add(self, field: &str, value: impl Into<String>) -> Self {
        self.push(FieldMutation::new(
            field,
            MutationKind::AddToSet {
                value: value.into(),
            },
        ))
    }

    pub fn remove(self, field: &str, value: impl Into<String>) -> Self {
        self.push(FieldMutation::new(
            field,
            MutationKind::RemoveFromSet {
                value: value.into(),
            },
        ))
    }

    pub fn set(self, field: &str, value: impl Into<Value>) -> Self {
        self.push(FieldMutation::new(
            field,
            MutationKind::Set {
                value: value.into(),
            },
        ))
    }

    pub fn add_to_opt(self, field: &str, entry: Option<(String, String)>) -> Self {
        match entry {
            Some((key, value)) => self.add_to(field, key, value),
            None => self,
        }
    }

    pub fn add_opt(self, field: &str, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(value) => self.add(field, value),
            None => self,
        }
    }

    pub fn set_opt(self, field: &str, value: Option<impl Into<Value>>) -> Self {
        match value {
            Some(value) => self.set(field, value),
            None => self,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldMutation> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a MutationSet {
    type Item = &'a FieldMutation;
    type IntoIter = std::slice::Iter<'a, FieldMutation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
