//! TOML settings for the `insure` binary.
//!
//! ```toml
//! [api]
//! base_url = "http://localhost:8081"
//! timeout_secs = 30
//!
//! [logging]
//! level = "warn"
//! file = "/var/log/insure.log"
//!
//! [session]
//! token = "..."
//! ```
//!
//! Every table and key is optional. `INSURE_API_URL` and `INSURE_API_TOKEN`
//! override the file.

use std::path::{Path, PathBuf};
use std::{fmt, fs, io};

use insure_core::Session;
use insure_core::gateway::ApiConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub const API_URL_VAR: &str = "INSURE_API_URL";
pub const API_TOKEN_VAR: &str = "INSURE_API_TOKEN";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config file '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Bare level or any `EnvFilter` directive. `RUST_LOG` wins when set.
    pub level: String,
    /// Appended to when set.
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            file: None,
        }
    }
}

#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub token: Option<String>,
}

impl fmt::Debug for SessionConfig {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let token = self.token.as_ref().map(|_| "<redacted>");
        f.debug_struct("SessionConfig").field("token", &token).finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api: ApiConfig,
    pub logging: LoggingConfig,
    pub session: SessionConfig,
}

impl Settings {
    /// `$XDG_CONFIG_HOME/insure/config.toml` or the platform equivalent.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("insure").join("config.toml"))
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents, path)
    }

    fn parse(
        contents: &str,
        path: &Path,
    ) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads `explicit` if given (it must exist), else the default path if it
    /// exists, else the built-in defaults. Environment overrides are applied
    /// last.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let mut settings = match explicit {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path().filter(|p| p.is_file()) {
                Some(path) => Self::from_file(&path)?,
                None => {
                    debug!("no config file found, using defaults");
                    Self::default()
                }
            },
        };
        settings.apply_env(|name| std::env::var(name).ok());
        Ok(settings)
    }

    /// Applies `INSURE_API_URL` and `INSURE_API_TOKEN` as returned by
    /// `lookup`. Blank values are ignored.
    pub fn apply_env(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) {
        let non_blank = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(url) = non_blank(API_URL_VAR) {
            self.api.base_url = url;
        }
        if let Some(token) = non_blank(API_TOKEN_VAR) {
            self.session.token = Some(token);
        }
    }

    pub fn session(&self) -> Session {
        Session::new(self.session.token.clone().unwrap_or_default())
    }
}
