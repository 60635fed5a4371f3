mod credentials;
mod endpoint_url;
mod name_label;
mod object_uuid;
mod opaque_ref;
mod session_ref;
mod xen_host;
mod xen_port;

pub use credentials::{XenPassword, XenUsername};
pub use endpoint_url::EndpointUrl;
pub use name_label::NameLabel;
pub use object_uuid::ObjectUuid;
pub use opaque_ref::{NULL_REF, OpaqueRef};
pub use session_ref::SessionRef;
pub use xen_host::XenHost;
pub use xen_port::XenPort;

// Re-export validation functions for internal use
pub(crate) use credentials::{validate_password, validate_username};
pub(crate) use endpoint_url::validate_url;
pub(crate) use xen_host::validate_host;
pub(crate) use xen_port::validate_port;
