//! FLOWNET shell entry point
//!
//! Reads commands from standard input, edits a flow network and reports
//! maximum flows on standard output. Diagnostics go to standard error through
//! `env_logger`; `RUST_LOG` overrides the `FLOWNET_LOG` filter, which
//! defaults to `warn`.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

mod command;
mod config;
mod error;
mod session;

use std::io;
use std::process::ExitCode;
use log::info;

use crate::config::ShellConfig;
use crate::error::ShellError;
use crate::session::Session;

fn main() -> ExitCode {
    let config = match ShellConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error: {}", err);
            return ExitCode::FAILURE;
        }
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.log_filter.as_str())).init();

    match run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(config: ShellConfig) -> Result<(), ShellError> {
    info!("flownet {} starting with {:?}", flownet_core::VERSION, config);

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut session = Session::start(stdin.lock(), stdout.lock(), config)?;
    session.run()?;
    info!("Session ended with {} edges", session.network().edge_count());
    Ok(())
}
