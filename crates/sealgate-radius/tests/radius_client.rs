// SPDX-FileCopyrightText: 2026 Sealgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the RADIUS client against a scripted UDP server.
//!
//! Each test starts its own loopback server, so tests are independent and
//! order-insensitive.

use std::time::Duration;

use sealgate_core::{GatewayAuthenticator, ReplyCode, SealgateError};
use sealgate_radius::packet::{ATTR_REPLY_MESSAGE, ATTR_SESSION_TIMEOUT};
use sealgate_radius::{RadiusClient, RadiusClientConfig};
use sealgate_test_utils::{GatewayBehavior, ScriptedRadiusServer};
use secrecy::SecretString;

fn client_for(server: &ScriptedRadiusServer, retries: u32) -> RadiusClient {
    let config = RadiusClientConfig {
        host: server.addr().ip().to_string(),
        port: server.port(),
        secret: SecretString::from(server.secret().to_string()),
        timeout: Duration::from_millis(200),
        retries,
        dictionary: None,
        nas_identifier: "sealgate-test".to_string(),
    };
    RadiusClient::with_config(config).unwrap()
}

// ---- Test 1: Accept and reject decisions ----

#[tokio::test]
async fn test_accept_reply_decodes_named_attributes() {
    let server = ScriptedRadiusServer::start(
        "s3cret",
        GatewayBehavior::AcceptAll(vec![
            (ATTR_SESSION_TIMEOUT, vec![0, 0, 0x0e, 0x10]),
            (ATTR_REPLY_MESSAGE, b"welcome back".to_vec()),
        ]),
    )
    .await;
    let client = client_for(&server, 0);

    let reply = client
        .authenticate("alice", &SecretString::from("s3cretpw"))
        .await
        .unwrap();

    assert!(reply.is_accept());
    assert_eq!(
        reply.attributes.get("Session-Timeout").map(String::as_str),
        Some("3600")
    );
    assert_eq!(
        reply.attributes.get("Reply-Message").map(String::as_str),
        Some("welcome back")
    );
}

#[tokio::test]
async fn test_reject_reply_maps_to_reject() {
    let server = ScriptedRadiusServer::start("s3cret", GatewayBehavior::RejectAll).await;
    let client = client_for(&server, 0);

    let reply = client
        .authenticate("alice", &SecretString::from("wrong"))
        .await
        .unwrap();

    assert!(!reply.is_accept());
    assert_eq!(reply.code, ReplyCode::AccessReject);
    assert_eq!(
        reply.attributes.get("Reply-Message").map(String::as_str),
        Some("authentication failed")
    );
}

#[tokio::test]
async fn test_credential_check_sees_the_cleartext_password() {
    let server = ScriptedRadiusServer::start(
        "s3cret",
        GatewayBehavior::CheckCredentials {
            username: "bob".to_string(),
            password: "hunter2".to_string(),
            attributes: Vec::new(),
        },
    )
    .await;
    let client = client_for(&server, 0);

    let good = client
        .authenticate("bob", &SecretString::from("hunter2"))
        .await
        .unwrap();
    assert!(good.is_accept());

    let bad = client
        .authenticate("bob", &SecretString::from("hunter3"))
        .await
        .unwrap();
    assert!(!bad.is_accept());

    // The password was hidden on the wire but recoverable with the secret.
    let requests = server.requests().await;
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].username, "bob");
    assert_eq!(requests[0].password, "hunter2");
    assert_eq!(requests[1].password, "hunter3");
}

#[tokio::test]
async fn test_empty_credentials_cross_the_wire() {
    let server =
        ScriptedRadiusServer::start("s3cret", GatewayBehavior::AcceptAll(Vec::new())).await;
    let client = client_for(&server, 0);

    let reply = client
        .authenticate("", &SecretString::from(""))
        .await
        .unwrap();
    assert!(reply.is_accept());

    let requests = server.requests().await;
    assert_eq!(requests[0].username, "");
    assert_eq!(requests[0].password, "");
}

// ---- Test 2: Timeout and retransmission ----

#[tokio::test]
async fn test_silent_gateway_times_out_after_all_attempts() {
    let server = ScriptedRadiusServer::start("s3cret", GatewayBehavior::Silent).await;
    let client = client_for(&server, 2);

    let err = client
        .authenticate("alice", &SecretString::from("pw"))
        .await
        .unwrap_err();

    match err {
        SealgateError::GatewayTimeout { timeout, attempts } => {
            assert_eq!(timeout, Duration::from_millis(200));
            assert_eq!(attempts, 3);
        }
        other => panic!("expected a gateway timeout, got {other:?}"),
    }

    // Every retransmission reuses the same identifier.
    let requests = server.requests().await;
    assert_eq!(requests.len(), 3);
    assert!(requests.iter().all(|r| r.identifier == requests[0].identifier));
}

#[tokio::test]
async fn test_retransmission_reaches_a_slow_gateway() {
    let server =
        ScriptedRadiusServer::start("s3cret", GatewayBehavior::SilentThenAccept { drops: 1 })
            .await;
    let client = client_for(&server, 1);

    let reply = client
        .authenticate("alice", &SecretString::from("pw"))
        .await
        .unwrap();
    assert!(reply.is_accept());

    let requests = server.requests().await;
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].identifier, requests[1].identifier);
}

#[tokio::test]
async fn test_zero_retries_means_a_single_attempt() {
    let server = ScriptedRadiusServer::start("s3cret", GatewayBehavior::Silent).await;
    let client = client_for(&server, 0);

    let err = client
        .authenticate("alice", &SecretString::from("pw"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        SealgateError::GatewayTimeout { attempts: 1, .. }
    ));
    assert_eq!(server.requests().await.len(), 1);
}

// ---- Test 3: Malformed and unverifiable replies ----

#[tokio::test]
async fn test_garbage_reply_is_a_gateway_error() {
    let server = ScriptedRadiusServer::start("s3cret", GatewayBehavior::Garbage).await;
    let client = client_for(&server, 0);

    let err = client
        .authenticate("alice", &SecretString::from("pw"))
        .await
        .unwrap_err();

    assert!(matches!(err, SealgateError::Gateway { .. }));
}

#[tokio::test]
async fn test_reply_signed_with_wrong_secret_fails_verification() {
    let server = ScriptedRadiusServer::start("s3cret", GatewayBehavior::WrongSecret).await;
    let client = client_for(&server, 0);

    let err = client
        .authenticate("alice", &SecretString::from("pw"))
        .await
        .unwrap_err();

    let message = err.to_string();
    assert!(
        message.contains("shared secret"),
        "error should point at the shared secret, got: {message}"
    );
}
