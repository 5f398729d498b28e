use async_trait::async_trait;
use reqwest::{Client, Url, header::CONTENT_TYPE};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, warn};

use crate::{
    config::{ClientConfig, ConfigError},
    error::RemoteCallError,
    xmlrpc::{self, Response, Value},
};

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Carries one XML-RPC call to the remote service.
///
/// Implementations return the decoded response value or the failure exactly
/// as observed; they never retry.
#[async_trait]
pub trait RpcTransport: Send + Sync + 'static {
    async fn call(&self, method: &str, params: Vec<Value>) -> Result<Value, RemoteCallError>;
}

/// XML-RPC over HTTP(S) with basic authentication
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: Client,
    endpoint: Url,
    email: String,
    password: SecretString,
}

impl HttpTransport {
    /// Builds the transport for a service whose default path is `default_path`.
    /// No request is made.
    pub fn new(config: &ClientConfig, default_path: &str) -> Result<Self, ConfigError> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(ConfigError::HttpClient)?;
        Self::with_client(http, config, default_path)
    }

    /// Same as [`HttpTransport::new`] over a caller-provided `reqwest` client
    pub fn with_client(
        http: Client,
        config: &ClientConfig,
        default_path: &str,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let endpoint = config.endpoint(default_path)?;
        Ok(Self {
            http,
            endpoint,
            email: config.credentials.email.clone(),
            password: config.credentials.password.clone(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl RpcTransport for HttpTransport {
    async fn call(&self, method: &str, params: Vec<Value>) -> Result<Value, RemoteCallError> {
        let body = xmlrpc::encode_call(method, &params).map_err(RemoteCallError::Malformed)?;

        let response = self
            .http
            .post(self.endpoint.clone())
            .basic_auth(&self.email, Some(self.password.expose_secret()))
            .header(CONTENT_TYPE, "text/xml")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            warn!(method, %status, "XML-RPC call rejected");
            return Err(RemoteCallError::Status { status, body });
        }

        match xmlrpc::decode_response(&body) {
            Ok(Response::Success(value)) => {
                debug!(method, "XML-RPC call succeeded");
                Ok(value)
            }
            Ok(Response::Fault { code, message }) => {
                warn!(method, code, "XML-RPC fault");
                Err(RemoteCallError::Fault { code, message })
            }
            Err(e) => {
                warn!(method, error = %e, "Undecodable XML-RPC response");
                Err(RemoteCallError::Malformed(e))
            }
        }
    }
}
