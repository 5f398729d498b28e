use std::collections::HashMap;

use ::config::{Config as ConfigLib, Environment, File};
use reqwest::Url;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;

/// Production endpoint of the Universign web services
pub const DEFAULT_URL: &str = "https://ws.universign.eu";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),
    #[error("account email and password are required")]
    MissingCredentials,
    #[error("service path must not be empty")]
    MissingPath,
    #[error("invalid service url {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

/// Email address and password of the Universign account
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: SecretString,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: SecretString::from(password.into()),
        }
    }
}

/// Connection settings shared by both sub-clients.
///
/// `path` is left unset to use the default path of the service the client is
/// built for.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    pub credentials: Credentials,
    #[serde(default = "default_url")]
    pub url: String,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default = "default_secure")]
    pub is_secure: bool,
}

fn default_url() -> String {
    DEFAULT_URL.to_owned()
}

fn default_secure() -> bool {
    true
}

impl ClientConfig {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            url: default_url(),
            path: None,
            is_secure: default_secure(),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_secure(mut self, is_secure: bool) -> Self {
        self.is_secure = is_secure;
        self
    }

    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with_sources(None)
    }

    pub fn load_with_sources(
        env_vars: Option<HashMap<String, String>>,
    ) -> Result<Self, ConfigError> {
        let mut builder = ConfigLib::builder()
            .set_default("url", DEFAULT_URL)?
            .set_default("is_secure", true)?
            .add_source(File::with_name("config/universign").required(false));

        // Explicit variables replace the process environment so tests stay isolated
        if let Some(vars) = env_vars {
            for (key, value) in vars {
                builder = builder.set_override(&key, value)?;
            }
        } else {
            // e.g. UNIVERSIGN_CREDENTIALS__EMAIL or UNIVERSIGN_IS_SECURE
            builder = builder.add_source(
                Environment::with_prefix("UNIVERSIGN")
                    .prefix_separator("_")
                    .separator("__"),
            );
        }

        Ok(builder.build()?.try_deserialize()?)
    }

    /// Fails fast on settings no call could succeed with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.credentials.email.trim().is_empty()
            || self.credentials.password.expose_secret().is_empty()
        {
            return Err(ConfigError::MissingCredentials);
        }
        if self.path.as_deref().is_some_and(|path| path.trim().is_empty()) {
            return Err(ConfigError::MissingPath);
        }
        Ok(())
    }

    /// Resolves the service endpoint: root url, then the configured path or
    /// `default_path`. The scheme always follows `is_secure`.
    pub fn endpoint(&self, default_path: &str) -> Result<Url, ConfigError> {
        let path = match self.path.as_deref().map(str::trim) {
            Some("") => return Err(ConfigError::MissingPath),
            Some(path) => path,
            None => default_path,
        };

        let invalid = |reason: String| ConfigError::InvalidUrl {
            url: self.url.clone(),
            reason,
        };

        let root = self.url.trim();
        let mut url = if root.contains("://") {
            Url::parse(root)
        } else {
            Url::parse(&format!("https://{root}"))
        }
        .map_err(|e| invalid(e.to_string()))?;

        if url.host_str().is_none_or(str::is_empty) {
            return Err(invalid("missing host".to_owned()));
        }

        let scheme = if self.is_secure { "https" } else { "http" };
        url.set_scheme(scheme)
            .map_err(|()| invalid(format!("scheme cannot be changed to {scheme}")))?;

        // a path in the root url is kept as a prefix
        let prefix = url.path().trim_end_matches('/').to_owned();
        let separator = if path.starts_with('/') { "" } else { "/" };
        url.set_path(&format!("{prefix}{separator}{path}"));
        url.set_query(None);
        url.set_fragment(None);
        Ok(url)
    }
}
