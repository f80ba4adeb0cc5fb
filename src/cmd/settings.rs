// autocommit-rs: Scheduled mutate-and-commit loop
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration loading and the `--options` / `--inis` modes.

use crate::cli::global::GlobalOptions;
use crate::config::loader::ConfigLoader;
use crate::config::{Config, ENV_PREFIX, LOCAL_CONFIG_FILE};
use crate::error::Result;
use crate::logging::LogConfig;

/// Stack every configuration layer named by `global`.
///
/// # Errors
///
/// Returns an error if a `--set` override is not `KEY=VALUE`.
pub fn build_config_loader(global: &GlobalOptions) -> Result<ConfigLoader> {
    let mut loader = Config::builder().add_toml_file_optional(LOCAL_CONFIG_FILE);
    for ini_path in &global.inis {
        loader = loader.add_toml_file(ini_path);
    }
    loader = loader.with_env_prefix(ENV_PREFIX);
    for pair in global.to_config_overrides() {
        loader = loader.set_pair(&pair)?;
    }
    Ok(loader)
}

/// Load and validate the configuration.
///
/// # Errors
///
/// Returns an error if any layer is missing, malformed, or invalid.
pub fn load_config(global: &GlobalOptions) -> Result<Config> {
    build_config_loader(global)?.build()
}

/// Logging settings from the `[global]` section.
#[must_use]
pub fn log_config(config: &Config) -> LogConfig {
    LogConfig::builder()
        .with_console_level(config.global.output_log_level)
        .with_file_level(config.global.file_log_level)
        .maybe_with_log_file(
            config
                .global
                .log_file
                .as_ref()
                .map(|p| p.display().to_string()),
        )
        .build()
}

/// Display current configuration options.
pub fn run_options_command(config: &Config) {
    for line in config.format_options() {
        println!("{line}");
    }
}

/// Display loaded configuration files.
pub fn run_inis_command(config_files: &[String]) {
    if config_files.is_empty() {
        println!("No configuration files loaded");
    } else {
        for line in config_files {
            println!("{line}");
        }
    }
}
