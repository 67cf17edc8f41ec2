//! Configuration file loading for the command-line tools.
//!
//! The config file is JSON, keyed by profile name, with a `default` entry:
//!
//! ```json
//! {
//!   "default": {
//!     "url": "https://gw.example.com",
//!     "username": "mta-account",
//!     "password": "secret",
//!     "sender": "noreply@example.com",
//!     "sms_sender": "spider"
//!   }
//! }
//! ```
//!
//! `sender` is required for mail, `sms_sender` for SMS; each tool checks
//! for the entry it needs at startup.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use url::Url;

use crate::domain::{Password, SenderAddress, SmsSenderId, Username, ValidationError};

/// Environment variable overriding the config file location.
pub const CONFIG_ENV_VAR: &str = "SPIDER_CLNT_CONFIG";

const DEFAULT_PROFILE: &str = "default";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config file {path} could not be parsed: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("config file {path} has no \"{profile}\" entry")]
    MissingProfile { path: PathBuf, profile: String },

    #[error("config entry is missing or invalid: {0}")]
    InvalidEntry(#[from] ValidationError),

    #[error("config has no \"sender\" entry; one is required to send mail")]
    MissingSender,

    #[error("config has no \"sms_sender\" entry; one is required to send SMS")]
    MissingSmsSender,

    #[error("--from-email {given} does not match the configured sender {configured}")]
    SenderMismatch { given: String, configured: String },

    #[error("no config file path: pass --config or set SPIDER_CLNT_CONFIG")]
    NoPath,
}

#[derive(Debug, Deserialize)]
struct RawProfile {
    url: String,
    username: String,
    password: String,
    #[serde(default)]
    sender: Option<String>,
    #[serde(default)]
    sms_sender: Option<String>,
}

#[derive(Debug, Clone)]
/// Credentials and addressing loaded once at process start; immutable for
/// the process lifetime.
pub struct Config {
    pub base_url: Url,
    pub username: Username,
    pub password: Password,
    pub sender: Option<SenderAddress>,
    pub sms_sender: Option<SmsSenderId>,
}

impl Config {
    /// Load the `default` profile from `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::load_profile(path, DEFAULT_PROFILE)
    }

    /// Load a named profile from `path`.
    pub fn load_profile(path: &Path, profile: &str) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_owned(),
            source,
        })?;
        let mut profiles: BTreeMap<String, RawProfile> =
            serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
                path: path.to_owned(),
                source,
            })?;
        let entry = profiles
            .remove(profile)
            .ok_or_else(|| ConfigError::MissingProfile {
                path: path.to_owned(),
                profile: profile.to_owned(),
            })?;

        let base_url = Url::parse(entry.url.trim()).map_err(|_| {
            ConfigError::InvalidEntry(ValidationError::InvalidBaseUrl { input: entry.url })
        })?;
        let sender = entry
            .sender
            .map(SenderAddress::new)
            .transpose()?;
        let sms_sender = entry
            .sms_sender
            .map(SmsSenderId::new)
            .transpose()?;

        Ok(Self {
            base_url,
            username: Username::new(entry.username)?,
            password: Password::new(entry.password)?,
            sender,
            sms_sender,
        })
    }

    /// Sender address, required for the mail path.
    pub fn require_sender(&self) -> Result<&SenderAddress, ConfigError> {
        self.sender.as_ref().ok_or(ConfigError::MissingSender)
    }

    /// SMS sender identifier, required for the SMS path.
    pub fn require_sms_sender(&self) -> Result<&SmsSenderId, ConfigError> {
        self.sms_sender.as_ref().ok_or(ConfigError::MissingSmsSender)
    }
}

/// Resolve the config file path: CLI flag, then [`CONFIG_ENV_VAR`], then
/// `~/.config/spider_clnt.json`.
pub fn resolve_path(cli: Option<PathBuf>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = cli {
        return Ok(path);
    }
    if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
        return Ok(PathBuf::from(path));
    }
    default_path().ok_or(ConfigError::NoPath)
}

/// Default config location under the user's home directory, when known.
pub fn default_path() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .map(|home| Path::new(&home).join(".config").join("spider_clnt.json"))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    const FULL: &str = r#"
    {
      "default": {
        "url": "https://gw.example.com",
        "username": "mta-account",
        "password": "secret",
        "sender": "noreply@example.com",
        "sms_sender": "spider"
      }
    }
    "#;

    #[test]
    fn loads_default_profile() {
        let file = write_config(FULL);
        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.base_url.as_str(), "https://gw.example.com/");
        assert_eq!(config.username.as_str(), "mta-account");
        assert_eq!(config.password.as_str(), "secret");
        assert_eq!(config.require_sender().unwrap().as_str(), "noreply@example.com");
        assert_eq!(config.require_sms_sender().unwrap().as_str(), "spider");
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = Config::load(Path::new("/nonexistent/spider_clnt.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let file = write_config("{ not json");
        let err = Config::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn missing_required_key_is_a_parse_error() {
        let file = write_config(r#"{"default": {"url": "https://gw.example.com"}}"#);
        let err = Config::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn missing_default_profile_is_rejected() {
        let file = write_config(
            r#"{"staging": {"url": "https://gw.example.com", "username": "u", "password": "p"}}"#,
        );
        let err = Config::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingProfile { .. }));
    }

    #[test]
    fn named_profile_can_be_selected() {
        let file = write_config(
            r#"{"staging": {"url": "https://stage.example.com", "username": "u", "password": "p"}}"#,
        );
        let config = Config::load_profile(file.path(), "staging").unwrap();
        assert_eq!(config.base_url.as_str(), "https://stage.example.com/");
        assert!(matches!(
            config.require_sender().unwrap_err(),
            ConfigError::MissingSender
        ));
        assert!(matches!(
            config.require_sms_sender().unwrap_err(),
            ConfigError::MissingSmsSender
        ));
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let file = write_config(
            r#"{"default": {"url": "not a url", "username": "u", "password": "p"}}"#,
        );
        let err = Config::load(file.path()).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidEntry(ValidationError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn cli_path_wins_over_default_resolution() {
        let path = resolve_path(Some(PathBuf::from("/tmp/override.json"))).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/override.json"));
    }
}
