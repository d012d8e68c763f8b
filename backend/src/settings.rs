//! Application settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, `ROAMWISE_*` environment variables or a
//! config file. An optional JSON secret document, read once at start-up,
//! fills backend credentials that none of those sources provided.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};
use url::Url;
use zeroize::Zeroizing;

use crate::outbound::supabase::SupabaseConfig;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_OFFLINE_PORT: u16 = 4000;
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

const URL_SECRET_KEYS: [&str; 2] = ["SUPABASE_URL", "ROAMWISE_BACKEND_URL"];
const ANON_KEY_SECRET_KEYS: [&str; 2] = ["SUPABASE_ANON_KEY", "ROAMWISE_BACKEND_ANON_KEY"];

/// Server and backend settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "ROAMWISE")]
pub struct Settings {
    /// Managed backend project URL. Required unless offline.
    pub backend_url: Option<String>,
    /// Managed backend anonymous key.
    pub backend_anon_key: Option<String>,
    /// Serve from the seeded in-memory backend.
    #[ortho_config(default = false)]
    pub offline: bool,
    /// Listen port.
    pub port: Option<u16>,
    /// Bind address.
    pub host: Option<String>,
    /// Upstream request timeout in seconds.
    pub request_timeout_secs: Option<u64>,
    /// JSON secret document read once at start-up.
    pub secrets_file: Option<PathBuf>,
}

/// Settings that cannot start a server.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// Online mode without a backend URL.
    #[error("backend_url is required unless offline mode is enabled")]
    MissingBackendUrl,
    /// Online mode without an anonymous key.
    #[error("backend_anon_key is required unless offline mode is enabled")]
    MissingAnonKey,
    /// The backend URL does not parse.
    #[error("invalid backend_url '{value}': {source}")]
    InvalidBackendUrl {
        /// Configured value.
        value: String,
        /// Parse failure.
        #[source]
        source: url::ParseError,
    },
    /// Host and port do not form a socket address.
    #[error("invalid bind address '{value}'")]
    InvalidBindAddr {
        /// `host:port` as configured.
        value: String,
    },
}

/// Which backend adapter to serve from.
pub enum BackendChoice {
    /// Seeded in-process tables.
    Memory,
    /// The hosted project.
    Supabase(SupabaseConfig),
}

impl Settings {
    /// Listen port: the configured value, else 3000 (4000 when offline).
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port.unwrap_or(if self.offline {
            DEFAULT_OFFLINE_PORT
        } else {
            DEFAULT_PORT
        })
    }

    /// Socket address to bind.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidBindAddr`] when the host is not an
    /// IP address.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = format!(
            "{}:{}",
            self.host.as_deref().unwrap_or(DEFAULT_HOST),
            self.port()
        );
        value
            .parse()
            .map_err(|_| SettingsError::InvalidBindAddr { value })
    }

    /// Upstream request timeout.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    /// Fill unset backend credentials from the configured secret document.
    #[must_use]
    pub fn with_secrets(self) -> Self {
        match self.secrets_file.clone() {
            Some(path) => self.fill_from(&SecretDocument::load(&path)),
            None => self,
        }
    }

    fn fill_from(mut self, secrets: &SecretDocument) -> Self {
        if self.backend_url.is_none() {
            self.backend_url = secrets.first_of(&URL_SECRET_KEYS);
        }
        if self.backend_anon_key.is_none() {
            self.backend_anon_key = secrets.first_of(&ANON_KEY_SECRET_KEYS);
        }
        self
    }

    /// Select the backend adapter.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] when online mode lacks a usable URL or key.
    pub fn backend(&self) -> Result<BackendChoice, SettingsError> {
        if self.offline {
            return Ok(BackendChoice::Memory);
        }
        let raw = self
            .backend_url
            .as_deref()
            .filter(|value| !value.trim().is_empty())
            .ok_or(SettingsError::MissingBackendUrl)?;
        let url = Url::parse(raw).map_err(|source| SettingsError::InvalidBackendUrl {
            value: raw.to_owned(),
            source,
        })?;
        let anon_key = self
            .backend_anon_key
            .clone()
            .filter(|value| !value.trim().is_empty())
            .ok_or(SettingsError::MissingAnonKey)?;
        Ok(BackendChoice::Supabase(SupabaseConfig {
            url,
            anon_key: Zeroizing::new(anon_key),
            timeout: self.request_timeout(),
        }))
    }
}

/// Scalar entries of the start-up secret document.
#[derive(Debug, Default)]
struct SecretDocument {
    values: HashMap<String, Zeroizing<String>>,
}

impl SecretDocument {
    /// Read and parse `path`. Failures are logged and yield an empty
    /// document.
    fn load(path: &Path) -> Self {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => Zeroizing::new(raw),
            Err(error) => {
                warn!(path = %path.display(), %error, "secret document unreadable; continuing without it");
                return Self::default();
            }
        };
        match serde_json::from_str::<HashMap<String, Value>>(&raw) {
            Ok(entries) => {
                let document = Self::from_entries(entries);
                info!(
                    path = %path.display(),
                    keys = document.values.len(),
                    "secret document loaded"
                );
                document
            }
            Err(error) => {
                warn!(path = %path.display(), %error, "secret document is not a JSON object; continuing without it");
                Self::default()
            }
        }
    }

    fn from_entries(entries: HashMap<String, Value>) -> Self {
        let values = entries
            .into_iter()
            .filter_map(|(key, value)| {
                let scalar = match value {
                    Value::String(text) => text,
                    Value::Number(number) => number.to_string(),
                    Value::Bool(flag) => flag.to_string(),
                    Value::Null | Value::Array(_) | Value::Object(_) => return None,
                };
                Some((key, Zeroizing::new(scalar)))
            })
            .collect();
        Self { values }
    }

    fn first_of(&self, keys: &[&str]) -> Option<String> {
        keys.iter()
            .find_map(|key| self.values.get(*key))
            .map(|value| value.as_str().to_owned())
    }
}
