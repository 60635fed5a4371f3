use crate::core::domain::value_object::{
    EndpointUrl, XenHost, XenPassword, XenPort, XenUsername,
};

/// Where and as whom to connect.
#[derive(Debug, Clone)]
pub struct XenConnection {
    host: XenHost,
    port: XenPort,
    username: XenUsername,
    password: XenPassword,
    secure: bool,
    accept_invalid_certs: bool,
    url: EndpointUrl,
}

impl XenConnection {
    pub fn new(
        host: XenHost,
        port: XenPort,
        username: XenUsername,
        password: XenPassword,
        secure: bool,
        accept_invalid_certs: bool,
        url: EndpointUrl,
    ) -> Self {
        Self {
            host,
            port,
            username,
            password,
            secure,
            accept_invalid_certs,
            url,
        }
    }

    pub fn host(&self) -> &XenHost {
        &self.host
    }

    pub fn port(&self) -> &XenPort {
        &self.port
    }

    pub fn username(&self) -> &XenUsername {
        &self.username
    }

    pub fn password(&self) -> &XenPassword {
        &self.password
    }

    pub fn is_secure(&self) -> bool {
        self.secure
    }

    /// Pool masters ship self-signed certificates by default.
    pub fn accept_invalid_certs(&self) -> bool {
        self.accept_invalid_certs
    }

    pub fn url(&self) -> &EndpointUrl {
        &self.url
    }
}
