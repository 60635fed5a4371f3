pub mod api_action;
pub mod client_config;
pub mod field_mutation;
pub mod identifier;
pub mod invocation;
pub mod record;
pub mod task_record;
pub mod xen_class;
pub mod xen_connection;
