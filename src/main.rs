//! Santa CLI - Secret santa pairing and notification

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = santa_cli::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
