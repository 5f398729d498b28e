//! Typed XML-RPC client for the Universign web services.
//!
//! Two sub-clients share one generic dispatcher, [`RpcClient`]:
//! [`SignatureClient`] for `signer.*` and `requester.*` methods and
//! [`RegistrationAuthorityClient`] for `matcher.*`, `validator.*` and `ra.*`.
//!
//! ```no_run
//! use universign_rpc::{ClientConfig, Credentials, SignatureClient, signature};
//!
//! # async fn run() -> Result<(), universign_rpc::Error> {
//! let config = ClientConfig::new(Credentials::new("jane@example.com", "s3cret"));
//! let client = SignatureClient::new(config)?;
//!
//! let request = signature::TransactionRequest::new(
//!     vec![signature::TransactionSigner::person("Jane", "Doe", "jane@example.com")],
//!     vec![signature::TransactionDocument::from_url(
//!         "contract",
//!         "contract.pdf",
//!         "https://files.example/contract.pdf",
//!     )],
//! );
//! let response = client.call(signature::RequestTransaction, request).await?;
//! println!("sign at {}", response.url);
//! # Ok(())
//! # }
//! ```

// Chainable `with_*` setters for optional fields of request models
macro_rules! optional_setters {
    ($($setter:ident => $field:ident: $ty:ty;)+) => {
        $(
            pub fn $setter(mut self, value: impl Into<$ty>) -> Self {
                self.$field = Some(value.into());
                self
            }
        )+
    };
}

pub mod client;
pub mod config;
pub mod error;
pub mod method;
pub mod ra;
pub mod signature;
pub mod telemetry;
pub mod transport;
pub mod xmlrpc;

pub use client::{CallObserver, NoopObserver, RpcClient, TracingObserver};
pub use config::{ClientConfig, ConfigError, Credentials, DEFAULT_URL};
pub use error::{Error, RemoteCallError};
pub use ra::{RegistrationAuthority, RegistrationAuthorityClient};
pub use signature::{Signature, SignatureClient};
pub use transport::{HttpTransport, RpcTransport};
