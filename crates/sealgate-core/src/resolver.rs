// SPDX-FileCopyrightText: 2026 Sealgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The authentication resolver.
//!
//! Ties the adapters together: extracts credentials from an attempt, finds
//! or builds the local identity record, asks the gateway to validate, and
//! hands accepted records to the post-auth hook for persistence.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::credentials::ExtractionPolicy;
use crate::error::SealgateError;
use crate::traits::{GatewayAuthenticator, IdentityStore, PersistWithoutValidation, PostAuthHook};
use crate::types::{AuthAttempt, IdentityField, IdentityRecord};
use crate::uid::{DefaultUidGenerator, UidGenerator};

/// Behavior knobs for [`AuthenticationResolver`], typically filled from the
/// loaded configuration.
#[derive(Debug, Clone)]
pub struct ResolverSettings {
    /// Gateway host as configured; the second input to uid synthesis.
    pub gateway_address: String,
    pub extraction: ExtractionPolicy,
    /// Identity column the attempt is matched against.
    pub uid_field: IdentityField,
    /// When set, a gateway timeout resolves as a failed authentication
    /// instead of an error.
    pub timeout_as_failure: bool,
}

impl ResolverSettings {
    pub fn new(gateway_address: impl Into<String>) -> Self {
        ResolverSettings {
            gateway_address: gateway_address.into(),
            extraction: ExtractionPolicy::default(),
            uid_field: IdentityField::default(),
            timeout_as_failure: false,
        }
    }
}

/// Resolves authentication attempts to local identity records.
pub struct AuthenticationResolver {
    settings: ResolverSettings,
    store: Arc<dyn IdentityStore>,
    gateway: Arc<dyn GatewayAuthenticator>,
    uid_generator: Arc<dyn UidGenerator>,
    hook: Arc<dyn PostAuthHook>,
}

impl AuthenticationResolver {
    /// Builds a resolver with the default uid scheme and persistence hook.
    pub fn new(
        settings: ResolverSettings,
        store: Arc<dyn IdentityStore>,
        gateway: Arc<dyn GatewayAuthenticator>,
    ) -> Self {
        AuthenticationResolver {
            settings,
            store,
            gateway,
            uid_generator: Arc::new(DefaultUidGenerator),
            hook: Arc::new(PersistWithoutValidation),
        }
    }

    /// Replaces the uid scheme.
    pub fn with_uid_generator(mut self, generator: impl UidGenerator) -> Self {
        self.uid_generator = Arc::new(generator);
        self
    }

    /// Replaces the post-auth hook.
    pub fn with_hook(mut self, hook: impl PostAuthHook) -> Self {
        self.hook = Arc::new(hook);
        self
    }

    /// Resolves one attempt.
    ///
    /// `Ok(Some(record))` means the gateway accepted and the hook ran;
    /// `Ok(None)` means the credentials were not accepted (reject, challenge,
    /// or a timeout under the timeout-as-failure policy). Errors mean the
    /// attempt could not be evaluated at all.
    pub async fn resolve(
        &self,
        attempt: &AuthAttempt,
    ) -> Result<Option<IdentityRecord>, SealgateError> {
        let creds = self.settings.extraction.extract(attempt);
        let uid = self
            .uid_generator
            .uid(&creds.username, &self.settings.gateway_address);
        debug!(username = %creds.username, uid = %uid, "resolving authentication attempt");

        let lookup_value = match self.settings.uid_field {
            IdentityField::Uid => uid.as_str(),
            IdentityField::Username => creds.username.as_str(),
        };
        let mut record = match self
            .store
            .find_one_by(self.settings.uid_field, lookup_value)
            .await?
        {
            Some(existing) => existing,
            None => IdentityRecord::build_for(self.settings.uid_field, &uid, lookup_value),
        };

        let reply = match self
            .gateway
            .authenticate(&creds.username, &creds.password)
            .await
        {
            Ok(reply) => reply,
            Err(SealgateError::GatewayTimeout { timeout, attempts })
                if self.settings.timeout_as_failure =>
            {
                warn!(uid = %uid, ?timeout, attempts, "gateway timed out, treating as failed authentication");
                return Ok(None);
            }
            Err(err) => return Err(err),
        };

        if !reply.is_accept() {
            debug!(uid = %uid, code = %reply.code, "gateway declined authentication");
            return Ok(None);
        }

        record.webseal_attributes = reply.attributes;
        self.hook
            .after_authentication(&mut record, self.store.as_ref())
            .await?;
        debug!(uid = %record.uid, "authentication accepted");
        Ok(Some(record))
    }
}
