//! # Storage Layer
//!
//! Configuration loading and on-disk persistence for Santa CLI.
//!
//! ## Formats
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Config | TOML | `./santa.toml`, `<config dir>/santa/config.toml`, `/etc/santa.toml` |
//! | Pairings | TOML map (giver = recipient) | caller-specified path |
//! | PID lock | plain text PID | `pidfile` option, `$TMPDIR/santa.pid` default |
//!
//! ## Safety
//!
//! - [`PairingStore`] writes are atomic (temp file + rename); a partial
//!   pairings file is never observable
//! - [`PidLock`] holds an exclusive advisory lock (`fs2`) so concurrent runs
//!   cannot race on output files or send duplicate mail

mod config;
mod lock;
mod pairings;

pub use config::{sample as sample_config, Config, ConfigError, MailConfig};
pub use lock::PidLock;
pub use pairings::PairingStore;
