use crate::{
    auth::application::request::login_request::LoginRequest,
    core::{
        domain::{
            error::{XenError, XenResult},
            model::xen_connection::XenConnection,
            value_object::SessionRef,
        },
        infrastructure::{session::Session, transport::XenTransport},
    },
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

const LOGIN_METHOD: &str = "session.login_with_password";
const LOGOUT_METHOD: &str = "session.logout";

/// Opens and closes XenAPI sessions.
///
/// The session model itself belongs to the server; this only carries the
/// credentials in and the opaque session reference out.
pub struct LoginService {
    originator: String,
}

impl LoginService {
    pub fn new(originator: impl Into<String>) -> Self {
        Self {
            originator: originator.into(),
        }
    }

    pub async fn execute(
        &self,
        transport: Arc<dyn XenTransport>,
        connection: &XenConnection,
    ) -> XenResult<Session> {
        let request = LoginRequest::from_connection(connection, &self.originator);
        debug!(url = connection.url().as_str(), user = %request.username, "logging in");

        let reply = transport.call(LOGIN_METHOD, request.into_params()).await?;
        let session_ref = self.handle_successful_login(reply)?;

        info!(url = connection.url().as_str(), "session opened");
        Ok(Session::new(transport, session_ref))
    }

    pub async fn logout(&self, session: &Session) -> XenResult<()> {
        session
            .transport()
            .call(
                LOGOUT_METHOD,
                vec![Value::from(session.session_ref().as_str())],
            )
            .await?;
        info!("session closed");
        Ok(())
    }

    fn handle_successful_login(&self, reply: Value) -> XenResult<SessionRef> {
        match reply {
            Value::String(value) => SessionRef::new(value).map_err(|e| {
                XenError::Authentication(format!("Server returned an invalid session: {}", e))
            }),
            other => Err(XenError::Authentication(format!(
                "Unexpected login reply: {}",
                other
            ))),
        }
    }
}

impl Default for LoginService {
    fn default() -> Self {
        Self::new(crate::ClientConfig::default().originator)
    }
}
