use crate::core::domain::model::xen_connection::XenConnection;
use serde_json::Value;

/// XenAPI version string sent with the login; the server only checks its format.
pub const API_VERSION: &str = "1.0";

/// Positional arguments of `session.login_with_password`.
#[derive(Debug)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    pub version: String,
    pub originator: String,
}

impl LoginRequest {
    pub fn from_connection(connection: &XenConnection, originator: &str) -> Self {
        Self {
            username: connection.username().as_str().to_string(),
            password: connection.password().as_str().to_string(),
            version: API_VERSION.to_string(),
            originator: originator.to_string(),
        }
    }

    pub fn into_params(self) -> Vec<Value> {
        vec![
            Value::String(self.username),
            Value::String(self.password),
            Value::String(self.version),
            Value::String(self.originator),
        ]
    }
}
