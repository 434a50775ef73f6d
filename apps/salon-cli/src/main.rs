//! # Salon Ledger CLI Entry Point
//!
//! ## Startup Sequence
//! 1. Parse arguments
//! 2. Initialize tracing (logging, to stderr)
//! 3. Resolve the data directory and open the store
//! 4. Run one command and print its output to stdout
//!
//! Exit codes: `0` success, `2` rejected input, `1` anything else.

use clap::Parser;
use std::process::ExitCode;

use salon_cli::{init_tracing, run, Cli};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    match run(&cli) {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(err) => {
            if cli.json {
                match serde_json::to_string_pretty(&err) {
                    Ok(body) => println!("{}", body),
                    Err(_) => eprintln!("{}", err),
                }
            } else {
                eprintln!("error: {}", err.message);
            }
            ExitCode::from(err.exit_code())
        }
    }
}
