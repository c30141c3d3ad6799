// SPDX-FileCopyrightText: 2026 Sealgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted UDP RADIUS server for integration tests.
//!
//! The server binds an ephemeral loopback port and answers Access-Requests
//! according to a fixed [`GatewayBehavior`]. Requests and responses share
//! the same wire structure, so the packet codec from `sealgate-radius` is
//! reused for both directions.

use std::net::SocketAddr;
use std::sync::Arc;

use sealgate_radius::packet::{
    self, ATTR_REPLY_MESSAGE, ATTR_USER_NAME, ATTR_USER_PASSWORD, CODE_ACCESS_ACCEPT,
    CODE_ACCESS_CHALLENGE, CODE_ACCESS_REJECT, CODE_ACCESS_REQUEST, HEADER_LEN, MAX_PACKET_LEN,
};
use tokio::net::UdpSocket;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::warn;

/// How the server answers every Access-Request it receives.
#[derive(Debug, Clone)]
pub enum GatewayBehavior {
    /// Accept every request, attaching the given decision attributes.
    AcceptAll(Vec<(u8, Vec<u8>)>),
    /// Reject every request with a Reply-Message.
    RejectAll,
    /// Accept only the matching credential pair, reject everything else.
    CheckCredentials {
        username: String,
        password: String,
        attributes: Vec<(u8, Vec<u8>)>,
    },
    /// Answer every request with an Access-Challenge.
    Challenge,
    /// Never answer. Drives the client into its timeout path.
    Silent,
    /// Drop the first `drops` requests, then accept. Exercises retransmission.
    SilentThenAccept { drops: u32 },
    /// Answer with bytes that are not a RADIUS packet at all.
    Garbage,
    /// Answer with a well-formed packet signed by a different shared secret.
    WrongSecret,
}

/// One Access-Request as seen by the server, password already recovered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservedRequest {
    pub identifier: u8,
    pub username: String,
    pub password: String,
}

/// A live scripted server. The listener task is aborted on drop.
#[derive(Debug)]
pub struct ScriptedRadiusServer {
    addr: SocketAddr,
    secret: String,
    requests: Arc<Mutex<Vec<ObservedRequest>>>,
    handle: JoinHandle<()>,
}

impl ScriptedRadiusServer {
    /// Binds a loopback socket and starts answering with `behavior`.
    pub async fn start(secret: &str, behavior: GatewayBehavior) -> Self {
        let socket = UdpSocket::bind("127.0.0.1:0")
            .await
            .expect("bind loopback udp socket");
        let addr = socket.local_addr().expect("read bound address");
        let requests = Arc::new(Mutex::new(Vec::new()));

        let handle = tokio::spawn(serve(
            socket,
            secret.as_bytes().to_vec(),
            behavior,
            Arc::clone(&requests),
        ));

        ScriptedRadiusServer {
            addr,
            secret: secret.to_string(),
            requests,
            handle,
        }
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// Every request received so far, in arrival order. Retransmissions
    /// appear once per datagram.
    pub async fn requests(&self) -> Vec<ObservedRequest> {
        self.requests.lock().await.clone()
    }
}

impl Drop for ScriptedRadiusServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn serve(
    socket: UdpSocket,
    secret: Vec<u8>,
    behavior: GatewayBehavior,
    requests: Arc<Mutex<Vec<ObservedRequest>>>,
) {
    let mut buf = vec![0u8; MAX_PACKET_LEN];
    let mut seen: u32 = 0;

    loop {
        let Ok((len, peer)) = socket.recv_from(&mut buf).await else {
            return;
        };
        let Some((request, authenticator)) = parse_request(&buf[..len], &secret) else {
            continue;
        };
        seen += 1;
        requests.lock().await.push(request.clone());

        let reply = match &behavior {
            GatewayBehavior::AcceptAll(attributes) => {
                encode(CODE_ACCESS_ACCEPT, &request, &authenticator, &secret, attributes)
            }
            GatewayBehavior::RejectAll => reject(&request, &authenticator, &secret),
            GatewayBehavior::CheckCredentials {
                username,
                password,
                attributes,
            } => {
                if request.username == *username && request.password == *password {
                    encode(CODE_ACCESS_ACCEPT, &request, &authenticator, &secret, attributes)
                } else {
                    reject(&request, &authenticator, &secret)
                }
            }
            GatewayBehavior::Challenge => encode(
                CODE_ACCESS_CHALLENGE,
                &request,
                &authenticator,
                &secret,
                &[(ATTR_REPLY_MESSAGE, b"enter token".to_vec())],
            ),
            GatewayBehavior::Silent => None,
            GatewayBehavior::SilentThenAccept { drops } => {
                if seen <= *drops {
                    None
                } else {
                    encode(CODE_ACCESS_ACCEPT, &request, &authenticator, &secret, &[])
                }
            }
            GatewayBehavior::Garbage => Some(b"definitely not a radius packet".to_vec()),
            GatewayBehavior::WrongSecret => encode(
                CODE_ACCESS_ACCEPT,
                &request,
                &authenticator,
                b"some-other-secret",
                &[],
            ),
        };

        if let Some(bytes) = reply {
            let _ = socket.send_to(&bytes, peer).await;
        }
    }
}

fn encode(
    code: u8,
    request: &ObservedRequest,
    authenticator: &[u8; 16],
    secret: &[u8],
    attributes: &[(u8, Vec<u8>)],
) -> Option<Vec<u8>> {
    match packet::encode_response(code, request.identifier, authenticator, secret, attributes) {
        Ok(bytes) => Some(bytes),
        Err(error) => {
            warn!(%error, "failed to encode scripted reply");
            None
        }
    }
}

fn reject(
    request: &ObservedRequest,
    authenticator: &[u8; 16],
    secret: &[u8],
) -> Option<Vec<u8>> {
    let attributes = vec![(ATTR_REPLY_MESSAGE, b"authentication failed".to_vec())];
    encode(CODE_ACCESS_REJECT, request, authenticator, secret, &attributes)
}

fn parse_request(datagram: &[u8], secret: &[u8]) -> Option<(ObservedRequest, [u8; 16])> {
    let parsed = packet::decode_response(datagram).ok()?;
    if parsed.code != CODE_ACCESS_REQUEST {
        return None;
    }
    let authenticator: [u8; 16] = datagram.get(4..HEADER_LEN)?.try_into().ok()?;

    let mut username = String::new();
    let mut password = String::new();
    for (kind, value) in &parsed.attributes {
        match *kind {
            ATTR_USER_NAME => username = String::from_utf8_lossy(value).into_owned(),
            ATTR_USER_PASSWORD => {
                if let Ok(clear) = packet::recover_password(value, secret, &authenticator) {
                    password = String::from_utf8_lossy(&clear).into_owned();
                }
            }
            _ => {}
        }
    }

    let request = ObservedRequest {
        identifier: parsed.identifier,
        username,
        password,
    };
    Some((request, authenticator))
}
