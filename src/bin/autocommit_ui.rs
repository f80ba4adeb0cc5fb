// autocommit-rs: Scheduled mutate-and-commit loop
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Interactive entry point.
//!
//! ```text
//! UiCli --> Config --> Logging (console WARN by default) --> prompt loop
//! ```

use std::process::ExitCode;

use autocommit_rs::cli::UiCli;
use autocommit_rs::cmd::interactive::run_interactive_command;
use autocommit_rs::cmd::settings::{load_config, log_config};
use autocommit_rs::logging::{LogConfig, LogLevel, init_logging};
use clap::Parser;

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = UiCli::parse();

    let config = match load_config(&cli.global) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    // Cycle progress is already shown by the progress bar and log lines.
    let logging = if cli.global.log_level.is_some() {
        log_config(&config)
    } else {
        let base = log_config(&config);
        LogConfig::builder()
            .with_console_level(LogLevel::WARN)
            .with_file_level(base.file_level())
            .maybe_with_log_file(base.log_file().map(str::to_string))
            .build()
    };
    let _log_guard = match init_logging(&logging) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    match run_interactive_command(&config).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
