//! File-backed verifier configuration.
//!
//! ```yaml
//! origins:
//!   - https://example.com
//! scope:
//!   access: [all]
//! public_key_env: SECURELOGIN_PUBLIC_KEY
//! hmac: true
//! hmac_secret_file: /etc/securelogin/hmac.key
//! ```

use crate::error::ConfigError;
use crate::options::VerifyOptions;
use crate::scope::Scope;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Configuration for verifying SecureLogin tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifierConfig {
    /// Origins accepted as provider and client.
    #[serde(default)]
    pub origins: Vec<String>,

    /// Expected token scope. Empty for login tokens.
    #[serde(default)]
    pub scope: BTreeMap<String, Vec<String>>,

    /// Environment variable containing the public key override (base64).
    #[serde(default)]
    pub public_key_env: Option<String>,

    /// Path to the public key override file (base64).
    #[serde(default)]
    pub public_key_file: Option<PathBuf>,

    /// Environment variable containing the HMAC secret override (base64).
    #[serde(default)]
    pub hmac_secret_env: Option<String>,

    /// Path to the HMAC secret override file (base64).
    #[serde(default)]
    pub hmac_secret_file: Option<PathBuf>,

    /// Only accept `to` + `mode=change` scopes.
    #[serde(default)]
    pub change: bool,

    /// Accept Connect requests (client is not checked).
    #[serde(default)]
    pub connect: bool,

    /// Verify the HMAC signature.
    #[serde(default)]
    pub hmac: bool,

    /// Reject expired tokens.
    #[serde(default = "default_true")]
    pub expire: bool,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            origins: Vec::new(),
            scope: BTreeMap::new(),
            public_key_env: None,
            public_key_file: None,
            hmac_secret_env: None,
            hmac_secret_file: None,
            change: false,
            connect: false,
            hmac: false,
            expire: true,
        }
    }
}

impl VerifierConfig {
    /// Parse a configuration from YAML.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load a configuration from a YAML file.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        tracing::debug!(path = %path.display(), "Loading verifier configuration");
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Resolve the public key override from environment or file.
    ///
    /// The environment variable wins when it is set and non-empty. A source
    /// that is configured but yields no key is an error.
    pub fn resolve_public_key(&self) -> Result<Option<Vec<u8>>, ConfigError> {
        resolve_key(
            "public key",
            self.public_key_env.as_deref(),
            self.public_key_file.as_deref(),
        )
    }

    /// Resolve the HMAC secret override from environment or file.
    pub fn resolve_hmac_secret(&self) -> Result<Option<Vec<u8>>, ConfigError> {
        resolve_key(
            "HMAC secret",
            self.hmac_secret_env.as_deref(),
            self.hmac_secret_file.as_deref(),
        )
    }

    /// Build verification options, resolving any key overrides.
    pub fn to_options(&self) -> Result<VerifyOptions, ConfigError> {
        let mut options = VerifyOptions::new()
            .with_origins(self.origins.iter().cloned())
            .with_scope(Scope::from(self.scope.clone()));

        if let Some(public_key) = self.resolve_public_key()? {
            options = options.with_public_key(public_key);
        }
        if let Some(secret) = self.resolve_hmac_secret()? {
            options = options.with_secret(secret);
        }
        if self.change {
            options = options.with_change();
        }
        if self.connect {
            options = options.with_connect();
        }
        if self.hmac {
            options = options.with_hmac();
        }
        if !self.expire {
            options = options.without_expire();
        }

        Ok(options)
    }
}

fn resolve_key(
    what: &'static str,
    env_var: Option<&str>,
    path: Option<&Path>,
) -> Result<Option<Vec<u8>>, ConfigError> {
    if env_var.is_none() && path.is_none() {
        return Ok(None);
    }

    let from_env = env_var
        .and_then(|var| std::env::var(var).ok())
        .filter(|value| !value.trim().is_empty());
    let encoded = match (from_env, path) {
        (Some(value), _) => value,
        (None, Some(path)) if path.exists() => std::fs::read_to_string(path)?,
        _ => return Err(ConfigError::MissingKey { what }),
    };

    let key = STANDARD
        .decode(encoded.trim())
        .map_err(|source| ConfigError::KeyEncoding { what, source })?;
    if key.is_empty() {
        return Err(ConfigError::MissingKey { what });
    }

    Ok(Some(key))
}

fn default_true() -> bool {
    true
}
