use reqwest::StatusCode;
use thiserror::Error;
use validator::ValidationErrors;

use crate::{config::ConfigError, xmlrpc::XmlRpcError};

/// Failure reported by the transport for a single remote call
#[derive(Debug, Error)]
pub enum RemoteCallError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected HTTP status {status}")]
    Status { status: StatusCode, body: String },
    #[error("remote fault {code}: {message}")]
    Fault { code: i32, message: String },
    #[error("undecodable response: {0}")]
    Malformed(#[source] XmlRpcError),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("invalid request parameters: {0}")]
    InvalidRequest(#[from] ValidationErrors),
    #[error("failed to encode parameters of {method}")]
    Encode {
        method: &'static str,
        #[source]
        source: XmlRpcError,
    },
    #[error("call to {method} failed")]
    Remote {
        method: &'static str,
        #[source]
        source: RemoteCallError,
    },
    #[error("unexpected response shape from {method}")]
    Decode {
        method: &'static str,
        #[source]
        source: XmlRpcError,
    },
}

impl Error {
    /// The transport failure, when the call reached the transport
    pub fn remote(&self) -> Option<&RemoteCallError> {
        match self {
            Error::Remote { source, .. } => Some(source),
            _ => None,
        }
    }

    /// Fault code and message returned by the service, if any
    pub fn fault(&self) -> Option<(i32, &str)> {
        match self.remote()? {
            RemoteCallError::Fault { code, message } => Some((*code, message.as_str())),
            _ => None,
        }
    }

    /// Name of the remote method the error relates to
    pub fn method(&self) -> Option<&'static str> {
        match self {
            Error::Encode { method, .. }
            | Error::Remote { method, .. }
            | Error::Decode { method, .. } => Some(*method),
            _ => None,
        }
    }
}
