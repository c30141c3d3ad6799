// SPDX-FileCopyrightText: 2026 Sealgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `sealgate check` command implementation.
//!
//! Runs diagnostic checks against the Sealgate environment to identify
//! configuration issues, database problems, and gateway reachability.

use std::io::IsTerminal;
use std::path::Path;
use std::time::{Duration, Instant};

use colored::Colorize;

use sealgate_config::model::GatewaySection;
use sealgate_core::{HealthStatus, PluginAdapter};
use sealgate_radius::{Dictionary, RadiusClient};

/// Status of a diagnostic check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    /// Check passed successfully.
    Pass,
    /// Check passed with a warning.
    Warn,
    /// Check failed.
    Fail,
}

/// Result of a single diagnostic check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    /// Name of the check.
    pub name: String,
    /// Check status.
    pub status: CheckStatus,
    /// Human-readable message.
    pub message: String,
    /// Duration the check took.
    pub duration: Duration,
}

/// Run the `sealgate check` command.
///
/// Runs quick diagnostic checks. With `deep`, runs additional intensive
/// checks. With `plain`, disables colored output. A broken configuration is
/// itself a finding, so config errors are reported rather than aborting.
pub async fn run_check(config_path: Option<&Path>, deep: bool, plain: bool) {
    let use_color = !plain && std::io::stdout().is_terminal();
    let mut results = Vec::new();

    let start = Instant::now();
    let loaded = match config_path {
        Some(path) => sealgate_config::load_and_validate_path(path),
        None => sealgate_config::load_and_validate(),
    };
    let (config, config_errors) = match loaded {
        Ok(config) => {
            results.push(CheckResult {
                name: "Configuration".to_string(),
                status: CheckStatus::Pass,
                message: "valid".to_string(),
                duration: start.elapsed(),
            });
            (Some(config), None)
        }
        Err(errors) => {
            results.push(CheckResult {
                name: "Configuration".to_string(),
                status: CheckStatus::Fail,
                message: format!("{} error(s)", errors.len()),
                duration: start.elapsed(),
            });
            (None, Some(errors))
        }
    };

    if let Some(config) = &config {
        results.push(check_database(&config.storage.database_path).await);
        results.push(check_gateway(&config.gateway).await);

        if deep {
            results.push(check_db_integrity(&config.storage.database_path).await);
            results.push(check_dictionary(&config.gateway));
        }
    }

    print_results(&results, use_color, deep);

    // Full diagnostics after the summary so the one-line table stays readable.
    if let Some(errors) = config_errors {
        sealgate_config::render_errors(&errors);
    }
}

fn print_results(results: &[CheckResult], use_color: bool, deep: bool) {
    println!();
    println!("  sealgate check");
    println!("  {}", "-".repeat(50));

    let mut fail_count = 0;
    let mut warn_count = 0;

    for result in results {
        let duration_ms = result.duration.as_millis();
        let line = match result.status {
            CheckStatus::Pass => {
                if use_color {
                    format!(
                        "    {} {:<16} {} ({duration_ms}ms)",
                        "✓".green(),
                        result.name,
                        result.message
                    )
                } else {
                    format!(
                        "    [OK]   {:<16} {} ({duration_ms}ms)",
                        result.name, result.message
                    )
                }
            }
            CheckStatus::Warn => {
                warn_count += 1;
                if use_color {
                    format!(
                        "    {} {:<16} {} ({duration_ms}ms)",
                        "!".yellow(),
                        result.name,
                        result.message.yellow()
                    )
                } else {
                    format!(
                        "    [WARN] {:<16} {} ({duration_ms}ms)",
                        result.name, result.message
                    )
                }
            }
            CheckStatus::Fail => {
                fail_count += 1;
                if use_color {
                    format!(
                        "    {} {:<16} {} ({duration_ms}ms)",
                        "✗".red(),
                        result.name,
                        result.message.red()
                    )
                } else {
                    format!(
                        "    [FAIL] {:<16} {} ({duration_ms}ms)",
                        result.name, result.message
                    )
                }
            }
        };
        println!("{line}");
    }

    println!();

    if fail_count > 0 || warn_count > 0 {
        let issues = fail_count + warn_count;
        let issue_word = if issues == 1 { "issue" } else { "issues" };
        println!("  {issues} {issue_word} found.");
        if !deep {
            println!("  Run with --deep for detailed diagnostics.");
        }
    } else {
        println!("  All checks passed.");
    }

    println!();
}

/// Check the database file exists and answers queries.
async fn check_database(db_path: &str) -> CheckResult {
    let start = Instant::now();
    let path = Path::new(db_path);

    if !path.exists() {
        return CheckResult {
            name: "Database".to_string(),
            status: CheckStatus::Warn,
            message: format!("not found: {db_path} (will be created on first run)"),
            duration: start.elapsed(),
        };
    }

    match tokio_rusqlite::Connection::open(db_path).await {
        Ok(conn) => {
            let query_result = conn
                .call(|conn| -> Result<(), tokio_rusqlite::rusqlite::Error> {
                    conn.execute_batch("SELECT 1")?;
                    Ok(())
                })
                .await;

            match query_result {
                Ok(()) => CheckResult {
                    name: "Database".to_string(),
                    status: CheckStatus::Pass,
                    message: "connected".to_string(),
                    duration: start.elapsed(),
                },
                Err(e) => CheckResult {
                    name: "Database".to_string(),
                    status: CheckStatus::Fail,
                    message: format!("query failed: {e}"),
                    duration: start.elapsed(),
                },
            }
        }
        Err(e) => CheckResult {
            name: "Database".to_string(),
            status: CheckStatus::Fail,
            message: format!("open failed: {e}"),
            duration: start.elapsed(),
        },
    }
}

/// Check the gateway client can be built and its socket probe succeeds.
///
/// UDP cannot tell a reachable-but-silent gateway from a healthy one without
/// credentials, so a pass here means routable, not answering.
async fn check_gateway(section: &GatewaySection) -> CheckResult {
    let start = Instant::now();

    let client = match RadiusClient::new(section) {
        Ok(client) => client,
        Err(e) => {
            return CheckResult {
                name: "Gateway".to_string(),
                status: CheckStatus::Fail,
                message: e.to_string(),
                duration: start.elapsed(),
            };
        }
    };

    match client.health_check().await {
        Ok(HealthStatus::Healthy) => CheckResult {
            name: "Gateway".to_string(),
            status: CheckStatus::Pass,
            message: format!("{}:{} connectable", section.host, section.port),
            duration: start.elapsed(),
        },
        Ok(HealthStatus::Degraded(msg)) => CheckResult {
            name: "Gateway".to_string(),
            status: CheckStatus::Warn,
            message: msg,
            duration: start.elapsed(),
        },
        Ok(HealthStatus::Unhealthy(msg)) => CheckResult {
            name: "Gateway".to_string(),
            status: CheckStatus::Fail,
            message: msg,
            duration: start.elapsed(),
        },
        Err(e) => CheckResult {
            name: "Gateway".to_string(),
            status: CheckStatus::Fail,
            message: format!("probe failed: {e}"),
            duration: start.elapsed(),
        },
    }
}

/// Deep check: SQLite integrity check.
async fn check_db_integrity(db_path: &str) -> CheckResult {
    let start = Instant::now();
    let path = Path::new(db_path);

    if !path.exists() {
        return CheckResult {
            name: "DB integrity".to_string(),
            status: CheckStatus::Warn,
            message: "database not found (skipped)".to_string(),
            duration: start.elapsed(),
        };
    }

    match tokio_rusqlite::Connection::open(db_path).await {
        Ok(conn) => {
            let result = conn
                .call(|conn| -> Result<Vec<String>, tokio_rusqlite::rusqlite::Error> {
                    let mut stmt = conn.prepare("PRAGMA integrity_check")?;
                    let rows: Vec<String> = stmt
                        .query_map([], |row| row.get(0))?
                        .filter_map(|r| r.ok())
                        .collect();
                    Ok(rows)
                })
                .await;

            match result {
                Ok(rows) if rows.len() == 1 && rows[0] == "ok" => CheckResult {
                    name: "DB integrity".to_string(),
                    status: CheckStatus::Pass,
                    message: "ok".to_string(),
                    duration: start.elapsed(),
                },
                Ok(rows) => CheckResult {
                    name: "DB integrity".to_string(),
                    status: CheckStatus::Fail,
                    message: format!("{} issue(s) found", rows.len()),
                    duration: start.elapsed(),
                },
                Err(e) => CheckResult {
                    name: "DB integrity".to_string(),
                    status: CheckStatus::Fail,
                    message: format!("check failed: {e}"),
                    duration: start.elapsed(),
                },
            }
        }
        Err(e) => CheckResult {
            name: "DB integrity".to_string(),
            status: CheckStatus::Fail,
            message: format!("open failed: {e}"),
            duration: start.elapsed(),
        },
    }
}

/// Deep check: the configured dictionary file parses.
fn check_dictionary(section: &GatewaySection) -> CheckResult {
    let start = Instant::now();

    let Some(path) = &section.dictionary else {
        return CheckResult {
            name: "Dictionary".to_string(),
            status: CheckStatus::Pass,
            message: format!("built-in ({} attributes)", Dictionary::baseline().len()),
            duration: start.elapsed(),
        };
    };

    match Dictionary::with_file(Path::new(path)) {
        Ok(dictionary) => CheckResult {
            name: "Dictionary".to_string(),
            status: CheckStatus::Pass,
            message: format!("{path}: {} attributes", dictionary.len()),
            duration: start.elapsed(),
        },
        Err(e) => CheckResult {
            name: "Dictionary".to_string(),
            status: CheckStatus::Fail,
            message: e.to_string(),
            duration: start.elapsed(),
        },
    }
}
