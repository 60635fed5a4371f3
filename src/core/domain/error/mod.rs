use std::backtrace::Backtrace;
use std::fmt;
use thiserror::Error;

/// The main error type for XenAPI command operations.
///
/// This enum represents all possible errors that can occur while resolving,
/// mutating or invoking remote objects: transport failures, authentication
/// failures, server-side API failures and input validation failures.
#[derive(Error, Debug)]
pub enum XenError {
    /// Represents errors that occur while talking to the endpoint
    ///
    /// # Fields
    /// * `0` - A description of what went wrong on the wire
    #[error("Connection error: {0}")]
    Connection(String),

    /// Represents authentication failures
    ///
    /// # Fields
    /// * `0` - A description of the authentication failure
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// A failure reported by the server for an otherwise well-formed call
    #[error("API failure: {0}")]
    Api(ApiFailure),

    /// A reply that could not be understood
    #[error("Malformed response: {0}")]
    Response(String),

    /// Any failure of a remote call, tagged with the call that raised it
    ///
    /// # Fields
    /// * `call` - The qualified method name (e.g. `SR.add_tags`)
    /// * `target` - The opaque reference the call was aimed at, if any
    /// * `source` - The underlying failure
    #[error("{call} on {target} failed: {source}")]
    Call {
        call: String,
        target: String,
        source: Box<XenError>,
    },

    /// A field mutation failed and the remaining ones were skipped
    ///
    /// # Fields
    /// * `applied` - Mutations that reached the server before the failure
    /// * `vetoed` - Mutations refused by the approval gate
    /// * `source` - The failure that stopped the run
    #[error("{source} (already applied: {})", list_or_none(.applied))]
    MutationAborted {
        applied: Vec<String>,
        vetoed: Vec<String>,
        source: Box<XenError>,
    },

    /// Represents validation failures with detailed context
    ///
    /// # Fields
    /// * `source` - The underlying validation error
    /// * `trace` - Stack trace where the error occurred
    #[error("Validation error: {source}")]
    Validation {
        source: ValidationError,
        trace: ErrorTrace,
    },
}

impl XenError {
    /// Wraps `self` with the identity of the remote call that produced it.
    pub(crate) fn in_call(self, call: impl Into<String>, target: Option<&str>) -> Self {
        XenError::Call {
            call: call.into(),
            target: target.unwrap_or("<none>").to_string(),
            source: Box::new(self),
        }
    }

    /// Returns the server failure behind this error, looking through call tags.
    pub fn api_failure(&self) -> Option<&ApiFailure> {
        match self {
            XenError::Api(failure) => Some(failure),
            XenError::Call { source, .. } | XenError::MutationAborted { source, .. } => {
                source.api_failure()
            }
            _ => None,
        }
    }

    /// Returns the stack trace of a validation failure, looking through call tags.
    pub fn trace(&self) -> Option<&ErrorTrace> {
        match self {
            XenError::Validation { trace, .. } => Some(trace),
            XenError::Call { source, .. } | XenError::MutationAborted { source, .. } => {
                source.trace()
            }
            _ => None,
        }
    }

    /// Returns the validation failure behind this error, if any.
    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            XenError::Validation { source, .. } => Some(source),
            XenError::Call { source, .. } | XenError::MutationAborted { source, .. } => {
                source.validation()
            }
            _ => None,
        }
    }
}

impl From<ValidationError> for XenError {
    fn from(error: ValidationError) -> Self {
        XenError::Validation {
            source: error,
            trace: ErrorTrace::capture(),
        }
    }
}

/// Stack trace captured when an error is raised.
///
/// Only captured when `RUST_BACKTRACE` / `RUST_LIB_BACKTRACE` enable it.
#[derive(Debug)]
pub struct ErrorTrace(Backtrace);

impl ErrorTrace {
    pub(crate) fn capture() -> Self {
        Self(Backtrace::capture())
    }

    pub fn backtrace(&self) -> &Backtrace {
        &self.0
    }
}

/// A server-side failure: an error code plus its positional parameters,
/// e.g. `HANDLE_INVALID ["VM", "OpaqueRef:…"]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiFailure {
    pub code: String,
    pub params: Vec<String>,
}

impl ApiFailure {
    pub fn new(code: impl Into<String>, params: Vec<String>) -> Self {
        Self {
            code: code.into(),
            params,
        }
    }
}

impl fmt::Display for ApiFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.params.is_empty() {
            write!(f, "{}", self.code)
        } else {
            write!(f, "{} [{}]", self.code, self.params.join(", "))
        }
    }
}

/// Specialized error type for input failures.
///
/// Covers malformed values as well as the two identifier failures every
/// command can hit before any remote state is touched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Represents a validation failure for a specific field
    ///
    /// # Fields
    /// * `field` - The name of the field that failed validation
    /// * `message` - A detailed message about why validation failed
    #[error("Field '{field}' validation failed: {message}")]
    Field { field: String, message: String },

    /// Represents format/syntax validation failures
    #[error("Format error: {0}")]
    Format(String),

    /// Represents violations of domain constraints
    #[error("Domain constraint violation: {0}")]
    ConstraintViolation(String),

    /// No identifier parameter was supplied
    #[error("At least one of the parameters {} must be set", quote_all(.accepted))]
    MissingIdentifier { accepted: Vec<String> },

    /// A name label matched more than one object
    #[error("More than one {class} with name label '{name}' exists ({count} matches)")]
    AmbiguousIdentifier {
        class: String,
        name: String,
        count: usize,
    },
}

fn list_or_none(names: &[String]) -> String {
    if names.is_empty() {
        "none".to_string()
    } else {
        names.join(", ")
    }
}

fn quote_all(names: &[String]) -> String {
    names
        .iter()
        .map(|n| format!("'{}'", n))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Type alias for Results that may fail with a XenError
pub type XenResult<T> = Result<T, XenError>;
