mod auth;
mod command;
mod core;


pub use crate::auth::application::service::login_service::LoginService;
pub use crate::command::application::{
    approval::{ApprovalGate, AutoApprove, DenyAll},
    request::command_request::CommandRequest,
    service::{
        command_service::{CommandOutcome, CommandService},
        mutation_service::{MutationFailure, MutationReport},
    },
};
pub use crate::command::catalog;
pub use crate::core::domain::error::{ApiFailure, ValidationError, XenError, XenResult};
pub use crate::core::domain::model::{
    api_action::{ApiAction, ApiCall, ReturnShape},
    client_config::{ClientConfig, MutationPolicy, RateLimitConfig},
    field_mutation::{FieldMutation, MutationKind, MutationSet},
    identifier::{ObjectIdentifier, ObjectSelector},
    invocation::{InvocationMode, InvocationResult, OperationHandle, XenOutput},
    record::XenRecord,
    task_record::{TaskRecord, TaskStatus},
    xen_class::XenClass,
    xen_connection::XenConnection,
};
pub use crate::core::domain::value_object::{
    EndpointUrl, NULL_REF, NameLabel, ObjectUuid, OpaqueRef, SessionRef, XenHost, XenPassword,
    XenPort, XenUsername,
};
pub use crate::core::infrastructure::{
    api_client::ApiClient, session::Session, transport::XenTransport,
};

use crate::core::domain::value_object::{
    validate_host, validate_password, validate_port, validate_url, validate_username,
};
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Duration;

/// A client for running management commands against a XenServer / XCP-ng pool
///
/// This client provides:
/// - Session management (`session.login_with_password` / `session.logout`)
/// - Identifier resolution by record, reference, UUID or name label
/// - Gated field mutations and sync/async operations on any object class
///
/// # Examples
///
/// ```no_run
/// use xencmd::{MutationSet, ObjectUuid, XenClass, XenClient, XenResult};
///
/// #[tokio::main]
/// async fn main() -> XenResult<()> {
///     let mut client = XenClient::builder()
///         .host("xen.example.com")?
///         .credentials("root", "password")?
///         .secure(true)
///         .build()?;
///
///     client.login().await?;
///     let sr = ObjectUuid::parse("11111111-1111-1111-1111-111111111111")?;
///     client
///         .set(XenClass::Sr, sr, MutationSet::new().add_to("other_config", "env", "prod"))
///         .await?;
///     client.logout().await?;
///     Ok(())
/// }
/// ```
pub struct XenClient {
    connection: XenConnection,
    config: ClientConfig,
    transport: Arc<dyn XenTransport>,
    commands: CommandService,
    session: Option<Session>,
}

/// Builder for XenClient configuration
#[derive(Default)]
pub struct XenClientBuilder {
    host: Option<String>,
    port: Option<u16>,
    url: Option<url::Url>,
    username: Option<String>,
    password: Option<String>,
    secure: bool,
    accept_invalid_certs: bool,
    config: ClientConfig,
    gate: Option<Arc<dyn ApprovalGate>>,
    transport: Option<Arc<dyn XenTransport>>,
}

impl XenClientBuilder {
    pub fn host(mut self, host: impl Into<String>) -> XenResult<Self> {
        let host = host.into();
        validate_host(&host)?;
        self.host = Some(host);
        Ok(self)
    }

    pub fn port(mut self, port: u16) -> XenResult<Self> {
        validate_port(port)?;
        self.port = Some(port);
        Ok(self)
    }

    /// Sets the full endpoint URL instead of host, port and scheme.
    pub fn url(mut self, url: &str) -> XenResult<Self> {
        self.url = Some(validate_url(url)?);
        Ok(self)
    }

    pub fn credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> XenResult<Self> {
        let username = username.into();
        let password = password.into();
        validate_username(&username)?;
        validate_password(&password)?;
        self.username = Some(username);
        self.password = Some(password);
        Ok(self)
    }

    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// Accepts self-signed certificates, which most pools ship with.
    pub fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    pub fn rate_limit(mut self, requests_per_second: u32, burst_size: u32) -> Self {
        self.config.rate_limit = Some(RateLimitConfig {
            requests_per_second,
            burst_size,
        });
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = Some(timeout);
        self
    }

    pub fn mutation_policy(mut self, policy: MutationPolicy) -> Self {
        self.config.mutation_policy = policy;
        self
    }

    pub fn originator(mut self, originator: impl Into<String>) -> Self {
        self.config.originator = originator.into();
        self
    }

    /// Consulted before every state-changing call. Defaults to [`AutoApprove`].
    pub fn approval_gate(mut self, gate: impl ApprovalGate + 'static) -> Self {
        self.gate = Some(Arc::new(gate));
        self
    }

    /// Replaces the HTTP transport, e.g. with an in-process server.
    pub fn transport(mut self, transport: Arc<dyn XenTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn build(self) -> XenResult<XenClient> {
        let (host, port, url) = match self.url {
            Some(url) => {
                let host = url
                    .host_str()
                    .map(|h| h.trim_start_matches('[').trim_end_matches(']').to_string())
                    .or(self.host)
                    .ok_or_else(|| required("host"))?;
                let port = url
                    .port_or_known_default()
                    .unwrap_or_else(|| XenPort::default_for(self.secure).get());
                (
                    XenHost::new_unchecked(host),
                    XenPort::new_unchecked(port),
                    EndpointUrl::new_unchecked(url),
                )
            }
            None => {
                let host = XenHost::new_unchecked(self.host.ok_or_else(|| required("host"))?);
                let port = self
                    .port
                    .map(XenPort::new_unchecked)
                    .unwrap_or_else(|| XenPort::default_for(self.secure));
                let url = EndpointUrl::from_parts(&host, &port, self.secure)?;
                (host, port, url)
            }
        };
        let secure = url.as_str().starts_with("https");

        let username = XenUsername::new_unchecked(self.username.ok_or_else(|| required("username"))?);
        let password = XenPassword::new_unchecked(self.password.ok_or_else(|| required("password"))?);

        let connection = XenConnection::new(
            host,
            port,
            username,
            password,
            secure,
            self.accept_invalid_certs,
            url,
        );

        let transport: Arc<dyn XenTransport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ApiClient::new(connection.clone(), &self.config)?),
        };

        let gate = self.gate.unwrap_or_else(|| Arc::new(AutoApprove));
        let commands = CommandService::new(gate, self.config.mutation_policy)
            .with_endpoint(connection.url().as_str());

        Ok(XenClient {
            connection,
            config: self.config,
            transport,
            commands,
            session: None,
        })
    }
}

fn required(field: &str) -> XenError {
    ValidationError::Field {
        field: field.to_string(),
        message: format!("{} is required", field),
    }
    .into()
}

impl XenClient {
    /// Creates a new builder for XenClient configuration
    pub fn builder() -> XenClientBuilder {
        XenClientBuilder::default()
    }

    /// Opens a session with the pool master
    ///
    /// # Errors
    ///
    /// This method will return an error if:
    /// - The credentials are rejected
    /// - The server is unreachable or is not the pool master
    /// - The reply is not a session reference
    pub async fn login(&mut self) -> XenResult<()> {
        let service = LoginService::new(self.config.originator.clone());
        self.session = Some(
            service
                .execute(Arc::clone(&self.transport), &self.connection)
                .await?,
        );
        Ok(())
    }

    /// Closes the current session, if any
    pub async fn logout(&mut self) -> XenResult<()> {
        if let Some(session) = self.session.take() {
            LoginService::new(self.config.originator.clone())
                .logout(&session)
                .await?;
        }
        Ok(())
    }

    /// Returns true if the client holds a session
    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    /// Returns the current session
    ///
    /// # Errors
    ///
    /// `XenError::Authentication` before `login`.
    pub fn session(&self) -> XenResult<&Session> {
        self.session
            .as_ref()
            .ok_or_else(|| XenError::Authentication("Not logged in".to_string()))
    }

    pub fn connection(&self) -> &XenConnection {
        &self.connection
    }

    pub fn commands(&self) -> &CommandService {
        &self.commands
    }

    /// Runs an arbitrary command.
    pub async fn run(&self, request: CommandRequest) -> XenResult<CommandOutcome> {
        self.commands.run(self.session()?, request).await
    }

    pub async fn resolve(
        &self,
        class: XenClass,
        identifier: impl Into<ObjectIdentifier>,
    ) -> XenResult<OpaqueRef> {
        self.commands
            .resolve(self.session()?, class, &identifier.into())
            .await
    }

    /// Applies `mutations` and returns the re-read record.
    pub async fn set(
        &self,
        class: XenClass,
        identifier: impl Into<ObjectIdentifier>,
        mutations: MutationSet,
    ) -> XenResult<CommandOutcome> {
        self.run(CommandRequest::new(class, identifier).mutations(mutations))
            .await
    }

    pub async fn invoke(
        &self,
        class: XenClass,
        identifier: impl Into<ObjectIdentifier>,
        action: ApiAction,
        mode: InvocationMode,
    ) -> XenResult<CommandOutcome> {
        self.run(CommandRequest::new(class, identifier).action(action).mode(mode))
            .await
    }

    /// Reads one property and returns its projected value.
    pub async fn property(
        &self,
        class: XenClass,
        identifier: impl Into<ObjectIdentifier>,
        action: ApiAction,
    ) -> XenResult<XenOutput> {
        let outcome = self
            .invoke(class, identifier, action, InvocationMode::Sync)
            .await?;
        match outcome.result {
            InvocationResult::Completed(output) => Ok(output),
            InvocationResult::Pending(handle) => Err(XenError::Response(format!(
                "property read returned task {}",
                handle.task_ref()
            ))),
        }
    }

    pub async fn create(
        &self,
        class: XenClass,
        fields: Map<String, Value>,
        mode: InvocationMode,
    ) -> XenResult<CommandOutcome> {
        self.commands
            .create(self.session()?, class, fields, mode)
            .await
    }

    pub async fn destroy(
        &self,
        class: XenClass,
        identifier: impl Into<ObjectIdentifier>,
        mode: InvocationMode,
    ) -> XenResult<CommandOutcome> {
        self.invoke(class, identifier, ApiAction::destroy(), mode)
            .await
    }
}

impl std::fmt::Debug for XenClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XenClient")
            .field("connection", &self.connection)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}
