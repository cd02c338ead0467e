//! # Command-Line Interface
//!
//! Flag parsing, output formatting, and the run orchestration: load config,
//! take the PID lock, run the pairing engine with retries, persist the
//! result, dispatch mail.
//!
//! All output supports `--format text|json`; `--verbose` reveals the drawn
//! assignments (they are secrets, so normal output never does).
//!
//! Call [`run()`] to parse arguments and execute.

mod app;
mod output;

pub use app::{run, Cli};
pub use output::{Output, OutputFormat};
