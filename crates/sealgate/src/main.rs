// SPDX-FileCopyrightText: 2026 Sealgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sealgate - WebSEAL authentication adapter speaking RADIUS.
//!
//! This is the binary entry point for the Sealgate CLI.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use sealgate_config::SealgateConfig;

mod auth;
mod check;
mod config_cmd;

/// Sealgate - validate credentials against a WebSEAL gateway over RADIUS.
#[derive(Parser, Debug)]
#[command(name = "sealgate", version, about, long_about = None)]
struct Cli {
    /// Load configuration from this file instead of the XDG hierarchy.
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Authenticate a user against the gateway and reconcile the identity record.
    Auth {
        /// Username presented to the gateway.
        #[arg(long, short)]
        username: String,
    },
    /// Run diagnostic checks against the Sealgate environment.
    Check {
        /// Run additional intensive checks.
        #[arg(long)]
        deep: bool,
        /// Disable colored output.
        #[arg(long)]
        plain: bool,
    },
    /// Print the effective configuration with secrets redacted.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Check { deep, plain }) => {
            // Check diagnoses a broken configuration instead of refusing to start,
            // so it loads config itself rather than going through load_or_exit.
            check::run_check(cli.config.as_deref(), deep, plain).await;
        }
        Some(Commands::Auth { username }) => {
            let config = load_or_exit(cli.config.as_deref());
            init_tracing(&config.log.level);
            match auth::run_auth(&config, &username).await {
                Ok(true) => {}
                Ok(false) => std::process::exit(1),
                Err(err) => {
                    eprintln!("sealgate: {err}");
                    std::process::exit(2);
                }
            }
        }
        Some(Commands::Config) => {
            let config = load_or_exit(cli.config.as_deref());
            config_cmd::run_config(&config);
        }
        None => {
            println!("sealgate: use --help for available commands");
        }
    }
}

/// Load and validate configuration, rendering diagnostics and exiting on failure.
fn load_or_exit(path: Option<&Path>) -> SealgateConfig {
    let loaded = match path {
        Some(path) => sealgate_config::load_and_validate_path(path),
        None => sealgate_config::load_and_validate(),
    };
    match loaded {
        Ok(config) => config,
        Err(errors) => {
            sealgate_config::render_errors(&errors);
            std::process::exit(1);
        }
    }
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("sealgate={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn auth_requires_a_username() {
        let result = Cli::try_parse_from(["sealgate", "auth"]);
        assert!(result.is_err());

        let cli = Cli::try_parse_from(["sealgate", "auth", "--username", "alice"]).unwrap();
        match cli.command {
            Some(Commands::Auth { username }) => assert_eq!(username, "alice"),
            other => panic!("expected auth command, got {other:?}"),
        }
    }

    #[test]
    fn config_flag_is_global() {
        let cli = Cli::try_parse_from([
            "sealgate",
            "check",
            "--config",
            "/tmp/sealgate-test.toml",
            "--plain",
        ])
        .unwrap();
        assert_eq!(
            cli.config.as_deref(),
            Some(Path::new("/tmp/sealgate-test.toml"))
        );
        assert!(matches!(
            cli.command,
            Some(Commands::Check {
                deep: false,
                plain: true
            })
        ));
    }
}
