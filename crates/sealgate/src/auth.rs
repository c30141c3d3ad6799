// SPDX-FileCopyrightText: 2026 Sealgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `sealgate auth` command implementation.
//!
//! Wires the RADIUS gateway client and the SQLite identity store into the
//! resolver, runs one authentication attempt, and prints the reconciled
//! identity record.

use std::io::IsTerminal;
use std::sync::Arc;

use colored::Colorize;
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use sealgate_config::SealgateConfig;
use sealgate_core::{
    AuthAttempt, AuthenticationResolver, ExtractionPolicy, IdentityField, IdentityRecord,
    IdentityStore, PASSWORD_KEY, ResolverSettings, SealgateError,
};
use sealgate_radius::RadiusClient;
use sealgate_store::SqliteIdentityStore;

/// The environment variable consulted before prompting for the password.
///
/// Intended for headless use (scripts, systemd units); human operators get an
/// interactive prompt instead.
pub const PASSWORD_ENV_VAR: &str = "SEALGATE_PASSWORD";

/// Run the `sealgate auth` command.
///
/// Returns `Ok(true)` when the gateway accepted the credentials and the
/// identity record was reconciled, `Ok(false)` when it declined.
pub async fn run_auth(config: &SealgateConfig, username: &str) -> Result<bool, SealgateError> {
    let password = read_password()?;

    let store = Arc::new(SqliteIdentityStore::new(config.storage.clone()));
    store.initialize().await?;
    let gateway = Arc::new(RadiusClient::new(&config.gateway)?);
    debug!(
        gateway = %config.gateway.host,
        database = %config.storage.database_path,
        "adapters initialized"
    );

    let resolver =
        AuthenticationResolver::new(resolver_settings(config)?, store.clone(), gateway);

    let attempt = AuthAttempt::from([
        ("username", username),
        (PASSWORD_KEY, password.expose_secret()),
    ]);
    let outcome = resolver.resolve(&attempt).await;
    let closed = store.close().await;

    let record = outcome?;
    closed?;

    match record {
        Some(record) => {
            print_record(&record);
            Ok(true)
        }
        None => {
            if std::io::stderr().is_terminal() {
                eprintln!("{} authentication failed for {username}", "✗".red());
            } else {
                eprintln!("authentication failed for {username}");
            }
            Ok(false)
        }
    }
}

/// Translate the loaded configuration into resolver settings.
fn resolver_settings(config: &SealgateConfig) -> Result<ResolverSettings, SealgateError> {
    let uid_field: IdentityField = config.auth.uid_field.parse().map_err(|_| {
        SealgateError::Config(format!(
            "unknown auth.uid_field `{}`",
            config.auth.uid_field
        ))
    })?;

    let mut settings = ResolverSettings::new(config.gateway.host.clone());
    settings.extraction = ExtractionPolicy {
        authentication_keys: config.auth.authentication_keys.clone(),
        case_insensitive_keys: config.auth.case_insensitive_keys.clone(),
    };
    settings.uid_field = uid_field;
    settings.timeout_as_failure = config.gateway.timeout_as_failure;
    Ok(settings)
}

fn password_from_env() -> Option<SecretString> {
    match std::env::var(PASSWORD_ENV_VAR) {
        Ok(password) if !password.is_empty() => Some(SecretString::from(password)),
        _ => None,
    }
}

/// Get the password from the environment variable or an interactive prompt.
///
/// An empty password is accepted at the prompt: the gateway is the authority
/// on whether empty credentials pass.
fn read_password() -> Result<SecretString, SealgateError> {
    if let Some(password) = password_from_env() {
        return Ok(password);
    }

    if std::io::stdin().is_terminal() {
        eprint!("Password: ");
        let password = rpassword::read_password()
            .map_err(|e| SealgateError::Internal(format!("failed to read password: {e}")))?;
        return Ok(SecretString::from(password));
    }

    Err(SealgateError::Internal(format!(
        "no password provided; set {PASSWORD_ENV_VAR} or run interactively"
    )))
}

fn print_record(record: &IdentityRecord) {
    if std::io::stdout().is_terminal() {
        println!("{} authenticated {}", "✓".green(), record.uid.bold());
    } else {
        println!("authenticated {}", record.uid);
    }
    if let Some(username) = &record.username {
        println!("    username:   {username}");
    }
    println!("    created_at: {}", record.created_at);
    println!("    updated_at: {}", record.updated_at);
    for (name, value) in &record.webseal_attributes {
        println!("    {name}: {value}");
    }
}
