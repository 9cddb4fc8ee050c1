//! Configuration profiles for `hue-api` clients.
//!
//! TOML profiles, access-token resolution (env + keyring + plaintext), and
//! translation into the `ClientConfig` / `Credentials` / `TransportConfig`
//! triple a `BridgeClient` is built from. `hue-api` itself reads no files
//! and no environment; this crate is the opt-in layer that does.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use hue_api::{
    BridgeClient, ClientConfig, ConnectionMode, Credentials, DEFAULT_API_ROOT, TlsMode,
    TransportConfig,
};

const KEYRING_SERVICE: &str = "hue-client";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no {what} configured for profile '{profile}'")]
    NoCredentials { profile: String, what: &'static str },

    #[error("no profile named '{0}'")]
    UnknownProfile(String),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Api(#[from] hue_api::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when none is named.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named bridge profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Defaults {
    /// Request timeout in seconds. Unset means no timeout.
    #[serde(default)]
    pub timeout: Option<u64>,

    #[serde(default)]
    pub strict_status: bool,
}

/// A named bridge profile.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Profile {
    /// "remote" or "local".
    #[serde(default = "default_mode")]
    pub mode: String,

    /// API root. Remote profiles default to the cloud proxy; local
    /// profiles must give the bridge address (e.g. "https://192.168.1.20").
    pub api_root: Option<String>,

    /// Bridge id (remote only).
    pub bridge_id: Option<String>,

    /// Bridge-issued username/app-key.
    pub username: Option<String>,

    /// OAuth access token (plaintext — prefer keyring or env var).
    pub access_token: Option<String>,

    /// Environment variable name containing the access token.
    pub access_token_env: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Accept any TLS certificate. Defaults to on for local profiles,
    /// since bridges serve a self-signed certificate.
    pub insecure: Option<bool>,

    /// Override timeout.
    pub timeout: Option<u64>,

    /// Override strict status checking.
    pub strict_status: Option<bool>,
}

fn default_mode() -> String {
    "remote".into()
}

impl Profile {
    pub fn connection_mode(&self) -> Result<ConnectionMode, ConfigError> {
        self.mode.parse().map_err(|_| ConfigError::Validation {
            field: "mode".into(),
            reason: format!("expected 'remote' or 'local', got '{}'", self.mode),
        })
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "hue-client", "hue").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("hue");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from `path`, then overlay `HUE_`-prefixed environment variables.
///
/// `__` separates nesting levels: `HUE_PROFILES__HOME__USERNAME` sets
/// `profiles.home.username`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading config");
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("HUE_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Profile selection ───────────────────────────────────────────────

/// Pick the named profile, or the configured default.
pub fn select_profile<'a>(
    cfg: &'a Config,
    name: Option<&'a str>,
) -> Result<(&'a str, &'a Profile), ConfigError> {
    let name = name
        .or(cfg.default_profile.as_deref())
        .unwrap_or("default");
    cfg.profiles
        .get(name)
        .map(|p| (name, p))
        .ok_or_else(|| ConfigError::UnknownProfile(name.into()))
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve an OAuth access token from the credential chain.
pub fn resolve_access_token(
    profile: &Profile,
    profile_name: &str,
) -> Result<SecretString, ConfigError> {
    // 1. Profile's access_token_env → env var lookup
    if let Some(ref env_name) = profile.access_token_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    // 2. System keyring
    if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/access-token"))
    {
        if let Ok(secret) = entry.get_password() {
            return Ok(SecretString::from(secret));
        }
    }

    // 3. Plaintext in config
    if let Some(ref token) = profile.access_token {
        return Ok(SecretString::from(token.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
        what: "access token",
    })
}

/// Resolve the bridge credentials a profile's mode needs.
pub fn resolve_credentials(
    profile: &Profile,
    profile_name: &str,
) -> Result<Credentials, ConfigError> {
    let username = profile
        .username
        .clone()
        .ok_or_else(|| ConfigError::NoCredentials {
            profile: profile_name.into(),
            what: "username",
        })?;

    match profile.connection_mode()? {
        ConnectionMode::Local => Ok(Credentials::local(username)),
        ConnectionMode::Remote => {
            let bridge_id =
                profile
                    .bridge_id
                    .clone()
                    .ok_or_else(|| ConfigError::Validation {
                        field: "bridge_id".into(),
                        reason: "remote profiles need a bridge id".into(),
                    })?;
            let token = resolve_access_token(profile, profile_name)?;
            Ok(Credentials::remote(token, bridge_id, username))
        }
    }
}

// ── Translation into client parts ───────────────────────────────────

/// Everything needed to build a `BridgeClient`.
#[derive(Debug, Clone)]
pub struct ClientParts {
    pub config: ClientConfig,
    pub credentials: Credentials,
    pub transport: TransportConfig,
}

impl ClientParts {
    pub fn into_client(self) -> Result<BridgeClient, ConfigError> {
        Ok(BridgeClient::new(
            &self.config,
            &self.credentials,
            &self.transport,
        )?)
    }
}

/// Build the client configuration from a profile, with global defaults
/// filling the gaps.
pub fn profile_to_client_parts(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<ClientParts, ConfigError> {
    let mode = profile.connection_mode()?;

    let api_root = match (mode, profile.api_root.as_deref()) {
        (_, Some(root)) => root,
        (ConnectionMode::Remote, None) => DEFAULT_API_ROOT,
        (ConnectionMode::Local, None) => {
            return Err(ConfigError::Validation {
                field: "api_root".into(),
                reason: "local profiles need the bridge address".into(),
            });
        }
    };

    let config = ClientConfig::new(api_root, mode)
        .map_err(|e| ConfigError::Validation {
            field: "api_root".into(),
            reason: e.to_string(),
        })?
        .with_strict_status(profile.strict_status.unwrap_or(defaults.strict_status));

    let credentials = resolve_credentials(profile, profile_name)?;

    let tls = if let Some(ref ca_path) = profile.ca_cert {
        TlsMode::CustomCa(ca_path.clone())
    } else if profile.insecure.unwrap_or(mode == ConnectionMode::Local) {
        TlsMode::DangerAcceptInvalid
    } else {
        TlsMode::System
    };

    let mut transport = TransportConfig::default().with_tls(tls);
    if let Some(secs) = profile.timeout.or(defaults.timeout) {
        transport = transport.with_timeout(Duration::from_secs(secs));
    }

    Ok(ClientParts {
        config,
        credentials,
        transport,
    })
}

/// Load config, select a profile, and build its client parts.
pub fn load_profile(name: Option<&str>) -> Result<ClientParts, ConfigError> {
    let cfg = load_config()?;
    let (name, profile) = select_profile(&cfg, name)?;
    profile_to_client_parts(profile, name, &cfg.defaults)
}
