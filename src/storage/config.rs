//! Configuration handling for Santa CLI
//!
//! Configuration is a single TOML file. The search order is the working
//! directory (`santa.toml`), the user config directory
//! (`<config>/santa/config.toml`), then `/etc/santa.toml` and
//! `/usr/local/etc/santa.toml`; an explicit `--config` path (or the
//! `SANTA_CONFIG` environment variable, handled by the CLI) bypasses the
//! search.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{Participant, Roster, RosterError};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse configuration")]
    Parse(#[from] toml::de::Error),
}

/// SMTP and template settings for notification mail
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MailConfig {
    /// SMTP server as `host` or `host:port` (port defaults to 587)
    pub server: String,

    /// Upgrade the session with STARTTLS
    pub tls: bool,

    /// Optional SMTP credentials
    pub user: Option<String>,
    pub password: Option<String>,

    /// Sender address
    pub from: String,

    /// Subject template ({{ name }} and {{ pair }} placeholders)
    pub subject: String,

    /// Body template ({{ name }} and {{ pair }} placeholders)
    pub body: String,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            server: "localhost".to_string(),
            tls: true,
            user: None,
            password: None,
            from: "santa@example.com".to_string(),
            subject: "Secret santa!".to_string(),
            body: "Hi {{ name }}! You drew {{ pair }}.".to_string(),
        }
    }
}

impl MailConfig {
    /// Splits `server` into host and port, defaulting the port to 587
    pub fn host_port(&self) -> Result<(&str, u16), ConfigError> {
        match self.server.split_once(':') {
            Some((host, port)) => {
                let port = port.parse().map_err(|_| {
                    ConfigError::Invalid(format!("bad mail server port in {:?}", self.server))
                })?;
                Ok((host, port))
            }
            None => Ok((&self.server, 587)),
        }
    }
}

/// Tool configuration: process options plus the participant roster
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Retry budget for the pairing engine (must be at least 1)
    pub max_tries: u32,

    /// Forbid two participants drawing each other
    pub no_circles: bool,

    /// Actually send notification mail
    pub send_email: bool,

    /// Lock file path (defaults to `$TMPDIR/santa.pid`)
    pub pidfile: Option<PathBuf>,

    /// Where to persist the final pairing, if anywhere
    pub pairings_file: Option<PathBuf>,

    /// Mail transport and templates
    pub mail: MailConfig,

    /// The santas
    pub participants: Vec<Participant>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_tries: 5,
            no_circles: false,
            send_email: false,
            pidfile: None,
            pairings_file: None,
            mail: MailConfig::default(),
            participants: vec![],
        }
    }
}

impl Config {
    /// Loads configuration from an explicit path or the default search order
    ///
    /// Returns the parsed config and the path it came from. Missing config,
    /// parse failures, and validation failures are all fatal here, before
    /// any pairing attempt.
    pub fn load(explicit: Option<&Path>) -> Result<(Self, PathBuf)> {
        let candidates = match explicit {
            Some(path) => vec![path.to_path_buf()],
            None => Self::default_candidates(),
        };

        let path = candidates.iter().find(|p| p.is_file()).ok_or_else(|| {
            anyhow::anyhow!(
                "no configuration found (searched: {})",
                candidates
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            )
        })?;

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .map_err(ConfigError::Parse)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;

        config.validate()?;
        Ok((config, path.clone()))
    }

    /// Default config file locations, in precedence order
    pub fn default_candidates() -> Vec<PathBuf> {
        let mut candidates = vec![PathBuf::from("santa.toml")];
        if let Some(dirs) = ProjectDirs::from("dev", "santa", "santa-cli") {
            candidates.push(dirs.config_dir().join("config.toml"));
        }
        candidates.push(PathBuf::from("/etc/santa.toml"));
        candidates.push(PathBuf::from("/usr/local/etc/santa.toml"));
        candidates
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_tries == 0 {
            return Err(ConfigError::Invalid(
                "max_tries must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Builds the roster, rejecting empty lists and duplicate names
    pub fn roster(&self) -> Result<Roster, RosterError> {
        Roster::new(self.participants.clone())
    }

    /// The lock file path: `pidfile` option, or a temp-dir default
    pub fn pid_path(&self) -> PathBuf {
        self.pidfile
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("santa.pid"))
    }
}

/// A commented example configuration, printed by `santa --genconfig`
pub fn sample() -> &'static str {
    r#"# A sample santa configuration. Process options live at the top level;
# each [[participants]] entry is one santa.

max_tries = 5
no_circles = false
send_email = false
# pidfile = "/var/run/santa.pid"
# pairings_file = "pairings.toml"

[mail]
server = "smtp.example.com:587"
tls = true
# user and password are optional
# user = "smtpUserName"
# password = "smtpPassword"
from = "santa@example.com"
subject = "Family secret santa!"
body = """
Hi {{ name }}!

Your secret santa pick has been done.  The name you've received is:

    {{ pair }}

Merry Christmas!
Regards,
    - The Family Robot
"""

[[participants]]
name = "Joe"
email = "joe_blow@example.com"
exclude = "Holly"

[[participants]]
name = "Holly"
email = "holly_hobby@example.com"
exclude = "Joe, Jane"

[[participants]]
name = "Jane"
email = "jane_doe@example.com"
exclude = "Peter"

[[participants]]
name = "Peter"
email = "peter_piper@example.com"
exclude = "Jane"
"#
}
