//! Main CLI application structure

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use super::output::{Output, OutputFormat};
use crate::domain::{assign_with_retries, Pairing, Roster};
use crate::mail::{notify_all, SmtpMailer};
use crate::storage::{sample_config, Config, PairingStore, PidLock};

#[derive(Parser)]
#[command(name = "santa")]
#[command(author, version, about = "Secret santa pairing and notification")]
pub struct Cli {
    /// Configuration file path
    #[arg(long, short = 'c', env = "SANTA_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// The PID file to write when running
    #[arg(long = "pid", short = 'p', value_name = "FILE")]
    pub pid_file: Option<PathBuf>,

    /// Print a sample config file to stdout
    #[arg(long)]
    pub genconfig: bool,

    /// Run in verbose mode
    #[arg(long, short = 'v', conflicts_with = "quiet")]
    pub verbose: bool,

    /// Print only errors on the console
    #[arg(long, short = 'q')]
    pub quiet: bool,

    /// Prevent two-person circles in pairings
    #[arg(long = "no-circles", short = 'C')]
    pub no_circles: bool,

    /// Write out pairings to a file
    #[arg(long = "write-pairings", short = 'w', value_name = "FILE")]
    pub pairings_file: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', default_value = "text")]
    pub format: OutputFormat,
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    if cli.genconfig {
        print!("{}", sample_config());
        return Ok(());
    }

    let output = Output::new(cli.format, cli.verbose, cli.quiet);

    let (config, source) = Config::load(cli.config.as_deref())?;
    output.verbose(&format!("loaded configuration from {}", source.display()));

    let roster = config.roster().context("Invalid roster")?;
    output.verbose(&format!("roster has {} participants", roster.len()));

    let pid_path = cli.pid_file.clone().unwrap_or_else(|| config.pid_path());
    let Some(_lock) = PidLock::acquire(&pid_path)? else {
        output.verbose(&format!(
            "already running according to {}",
            pid_path.display()
        ));
        return Ok(());
    };

    let no_circles = cli.no_circles || config.no_circles;
    let pairing = assign_with_retries(
        &roster,
        no_circles,
        config.max_tries,
        &mut rand::thread_rng(),
    )
    .context("Failed to find a complete pairing")?;

    if output.is_verbose() {
        for (giver, recipient) in pairing.iter() {
            output.verbose(&format!("{giver} -> {recipient}"));
        }
    }
    output.success(&format!(
        "Assigned pairings for {} participants",
        pairing.len()
    ));

    if let Some(path) = cli.pairings_file.clone().or(config.pairings_file.clone()) {
        let store = PairingStore::new(&path);
        store.write(&pairing)?;
        output.success(&format!("Wrote pairings to {}", path.display()));
    }

    if config.send_email {
        send_notifications(&output, &config, &roster, &pairing);
    } else {
        output.verbose("send_email is disabled; skipping notifications");
    }

    Ok(())
}

/// Dispatches one mail per giver; failures are reported, never fatal
fn send_notifications(output: &Output, config: &Config, roster: &Roster, pairing: &Pairing) {
    let mailer = match SmtpMailer::from_config(&config.mail) {
        Ok(mailer) => mailer,
        Err(e) => {
            output.error(&format!("Failed to set up SMTP session: {e:#}"));
            return;
        }
    };

    let failures = notify_all(&mailer, roster, pairing);
    for (giver, e) in &failures {
        output.error(&format!("Failed to notify {giver:?}: {e:#}"));
    }
    output.success(&format!(
        "Sent {} of {} notifications",
        pairing.len() - failures.len(),
        pairing.len()
    ));
}
