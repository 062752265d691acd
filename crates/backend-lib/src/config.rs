// ============================
// authgate-backend-lib/src/config.rs
// ============================
//! Configuration management.
use anyhow::{bail, Result};
use figment::{
    providers::{Env, Format, Json, Toml, Yaml},
    Figment,
};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::net::SocketAddr;
use std::path::Path;
use zeroize::Zeroize;

/// Prefix of environment overrides, e.g. `AUTHGATE_DB_NAME`
pub const ENV_PREFIX: &str = "AUTHGATE_";

/// Scalar config value, kept as text whatever type the provider inferred
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Signed(i64),
    Unsigned(u64),
    Float(f64),
    Bool(bool),
}

/// Accept a string or a bare number/bool and stringify it.
///
/// Figment types `AUTHGATE_DB_NAME=2024` or `db_name: 2024` as an integer.
fn string_or_scalar<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Scalar::deserialize(deserializer)? {
        Scalar::Text(s) => s,
        Scalar::Signed(n) => n.to_string(),
        Scalar::Unsigned(n) => n.to_string(),
        Scalar::Float(n) => n.to_string(),
        Scalar::Bool(b) => b.to_string(),
    })
}

/// Symmetric signing secret, wiped on drop and hidden from `Debug`
#[derive(Clone, Default)]
pub struct SigningSecret(String);

impl<'de> Deserialize<'de> for SigningSecret {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        string_or_scalar(deserializer).map(Self)
    }
}

impl SigningSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningSecret([redacted])")
    }
}

impl Drop for SigningSecret {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

/// Application settings
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Server bind address
    #[serde(default = "default_bind_addr")]
    pub bind_addr: SocketAddr,
    /// Log level, overridden by `RUST_LOG`
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Store address: `memory://`, `file://<dir>` or a directory
    #[serde(deserialize_with = "string_or_scalar")]
    pub db_address: String,
    /// Database name within the store
    #[serde(deserialize_with = "string_or_scalar")]
    pub db_name: String,
    /// Collection holding user records
    #[serde(deserialize_with = "string_or_scalar")]
    pub db_user_collection: String,
    /// Collection holding the latest token per user
    #[serde(deserialize_with = "string_or_scalar")]
    pub db_token_collection: String,
    /// Token signing secret
    pub token_signature: SigningSecret,
    /// `iss` claim of issued tokens
    #[serde(deserialize_with = "string_or_scalar")]
    pub token_issuer: String,
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 3000))
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Settings {
    /// Settings for a throwaway in-memory deployment
    pub fn in_memory(secret: &str) -> Self {
        Self {
            bind_addr: default_bind_addr(),
            log_level: default_log_level(),
            db_address: "memory://".to_string(),
            db_name: "auth".to_string(),
            db_user_collection: "users".to_string(),
            db_token_collection: "access".to_string(),
            token_signature: SigningSecret::new(secret),
            token_issuer: "authgate".to_string(),
        }
    }

    /// Load settings from a config file, then `AUTHGATE_` environment variables
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            bail!("could not read from config file {}", path.display());
        }

        let figment = match path.extension().and_then(|e| e.to_str()) {
            Some("yml" | "yaml") => Figment::from(Yaml::file(path)),
            Some("toml") => Figment::from(Toml::file(path)),
            Some("json") => Figment::from(Json::file(path)),
            _ => bail!("unsupported config file format: {}", path.display()),
        };

        Self::extract(figment.merge(Env::prefixed(ENV_PREFIX)))
    }

    /// Load settings from `AUTHGATE_` environment variables only
    pub fn load_from_env() -> Result<Self> {
        Self::extract(Figment::from(Env::prefixed(ENV_PREFIX)))
    }

    fn extract(figment: Figment) -> Result<Self> {
        let settings: Settings = figment.extract().map_err(|e| {
            anyhow::anyhow!("could not read value from config: {e}")
        })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject empty required values
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("db_address", self.db_address.as_str()),
            ("db_name", self.db_name.as_str()),
            ("db_user_collection", self.db_user_collection.as_str()),
            ("db_token_collection", self.db_token_collection.as_str()),
            ("token_signature", self.token_signature.expose()),
            ("token_issuer", self.token_issuer.as_str()),
        ];

        for (key, value) in required {
            if value.trim().is_empty() {
                bail!("could not read value from config: {key} is empty");
            }
        }

        if self.db_user_collection == self.db_token_collection {
            bail!("db_user_collection and db_token_collection must differ");
        }

        Ok(())
    }
}
