//! mms-queue CLI
//!
//! Closed-form M/M/s queue metrics calculator.

use std::process::ExitCode;

use clap::Parser;

use mms_queue::cli::{execute, Cli};
use mms_queue::QueueError;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match execute(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => match err.downcast_ref::<QueueError>() {
            // already reported on stdout
            Some(e @ QueueError::UnstableSystem { .. }) => ExitCode::from(e.exit_code()),
            Some(e) => {
                eprintln!("Error: {:#}", err);
                ExitCode::from(e.exit_code())
            }
            None => {
                eprintln!("Error: {:#}", err);
                ExitCode::FAILURE
            }
        },
    }
}
