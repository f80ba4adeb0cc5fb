// autocommit-rs: Scheduled mutate-and-commit loop
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Entry point.
//!
//! ```text
//! cli::parse() --> (no mode: usage, exit 0)
//!              --> Config --> Logging --> Mode Dispatch
//!   RunNow | Schedule | Options | Inis
//!              --> RunStatus --> exit code
//! ```

use std::process::ExitCode;

use autocommit_rs::cli::{self, Mode};
use autocommit_rs::cmd::run::run_now_command;
use autocommit_rs::cmd::schedule::run_schedule_command;
use autocommit_rs::cmd::settings::{
    build_config_loader, log_config, run_inis_command, run_options_command,
};
use autocommit_rs::cycle::RunStatus;
use autocommit_rs::logging::init_logging;

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::parse();

    let Some(mode) = cli.mode() else {
        print!("{}", cli::usage());
        return ExitCode::SUCCESS;
    };

    let loader = match build_config_loader(&cli.global) {
        Ok(loader) => loader,
        Err(e) => {
            eprintln!("Failed to load config: {e:#}");
            return ExitCode::FAILURE;
        }
    };
    let loaded_files = loader.format_loaded_files();
    let config = match loader.build() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    let _log_guard = match init_logging(&log_config(&config)) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    let result = match mode {
        Mode::RunNow => run_now_command(&config).await,
        Mode::Schedule => run_schedule_command(&config).await,
        Mode::Options => {
            run_options_command(&config);
            Ok(RunStatus::Success)
        }
        Mode::Inis => {
            run_inis_command(&loaded_files);
            Ok(RunStatus::Success)
        }
    };

    match result {
        Ok(status) => ExitCode::from(status.exit_code()),
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
