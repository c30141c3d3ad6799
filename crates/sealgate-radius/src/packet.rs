// SPDX-FileCopyrightText: 2026 Sealgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! RADIUS packet codec (RFC 2865 subset).
//!
//! Encodes Access-Request packets with PAP password hiding and decodes the
//! gateway's reply, including response authenticator verification. Only the
//! pieces the credential-check exchange needs are implemented; accounting and
//! EAP are out of scope.

use sealgate_core::SealgateError;

/// Packet codes used by the credential-check exchange.
pub const CODE_ACCESS_REQUEST: u8 = 1;
pub const CODE_ACCESS_ACCEPT: u8 = 2;
pub const CODE_ACCESS_REJECT: u8 = 3;
pub const CODE_ACCESS_CHALLENGE: u8 = 11;

/// Attribute types referenced directly by the codec.
pub const ATTR_USER_NAME: u8 = 1;
pub const ATTR_USER_PASSWORD: u8 = 2;
pub const ATTR_REPLY_MESSAGE: u8 = 18;
pub const ATTR_SESSION_TIMEOUT: u8 = 27;
pub const ATTR_NAS_IDENTIFIER: u8 = 32;

/// Code (1) + Identifier (1) + Length (2) + Authenticator (16).
pub const HEADER_LEN: usize = 20;

/// Largest datagram the client will accept (RFC 2865 maximum).
pub const MAX_PACKET_LEN: usize = 4096;

/// One attribute value must fit in a single TLV.
const MAX_ATTRIBUTE_VALUE_LEN: usize = 253;

/// A User-Password value covers at most 128 octets before hiding.
const MAX_PASSWORD_LEN: usize = 128;

/// A reply packet parsed down to its attributes, authenticator still unverified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponsePacket {
    pub code: u8,
    pub identifier: u8,
    /// Attribute type/value pairs in wire order.
    pub attributes: Vec<(u8, Vec<u8>)>,
}

/// Encode one Access-Request datagram.
///
/// Carries User-Name (even when empty; presence is what the gateway keys on),
/// the hidden User-Password, and NAS-Identifier unless blank. The caller
/// supplies the 16-octet request authenticator and reuses it for
/// retransmissions of the same request.
pub fn encode_access_request(
    identifier: u8,
    authenticator: &[u8; 16],
    username: &str,
    password: &[u8],
    secret: &[u8],
    nas_identifier: &str,
) -> Result<Vec<u8>, SealgateError> {
    let hidden = hide_password(password, secret, authenticator)?;

    let mut packet = Vec::with_capacity(HEADER_LEN + 64);
    packet.push(CODE_ACCESS_REQUEST);
    packet.push(identifier);
    packet.extend_from_slice(&[0, 0]); // length, patched below
    packet.extend_from_slice(authenticator);

    push_attribute(&mut packet, ATTR_USER_NAME, username.as_bytes())?;
    push_attribute(&mut packet, ATTR_USER_PASSWORD, &hidden)?;
    if !nas_identifier.is_empty() {
        push_attribute(&mut packet, ATTR_NAS_IDENTIFIER, nas_identifier.as_bytes())?;
    }

    patch_length(&mut packet)?;
    Ok(packet)
}

/// Encode a reply datagram with a valid response authenticator.
///
/// The response authenticator is MD5 over the reply header (with the request
/// authenticator in the authenticator slot), the attributes, and the secret.
pub fn encode_response(
    code: u8,
    identifier: u8,
    request_authenticator: &[u8; 16],
    secret: &[u8],
    attributes: &[(u8, Vec<u8>)],
) -> Result<Vec<u8>, SealgateError> {
    let mut packet = Vec::with_capacity(HEADER_LEN + 32);
    packet.push(code);
    packet.push(identifier);
    packet.extend_from_slice(&[0, 0]);
    packet.extend_from_slice(request_authenticator);
    for (attr_type, value) in attributes {
        push_attribute(&mut packet, *attr_type, value)?;
    }
    patch_length(&mut packet)?;

    let digest = response_digest(&packet, request_authenticator, secret);
    packet[4..HEADER_LEN].copy_from_slice(&digest);
    Ok(packet)
}

/// Structurally parse a reply datagram.
///
/// Octets beyond the declared length are padding and ignored (RFC 2865 §3).
/// Does not verify the response authenticator; callers check the identifier
/// first and then call [`verify_response_authenticator`].
pub fn decode_response(datagram: &[u8]) -> Result<ResponsePacket, SealgateError> {
    let declared = declared_length(datagram)?;
    let packet = &datagram[..declared];

    let mut attributes = Vec::new();
    let mut rest = &packet[HEADER_LEN..];
    while !rest.is_empty() {
        if rest.len() < 2 {
            return Err(SealgateError::gateway("truncated attribute in gateway reply"));
        }
        let attr_type = rest[0];
        let attr_len = rest[1] as usize;
        if attr_len < 2 || attr_len > rest.len() {
            return Err(SealgateError::gateway(format!(
                "attribute {attr_type} has invalid length {attr_len}"
            )));
        }
        attributes.push((attr_type, rest[2..attr_len].to_vec()));
        rest = &rest[attr_len..];
    }

    Ok(ResponsePacket {
        code: packet[0],
        identifier: packet[1],
        attributes,
    })
}

/// Verify a reply datagram's response authenticator against the request it
/// answers. A mismatch nearly always means the shared secret differs from
/// the gateway's.
pub fn verify_response_authenticator(
    datagram: &[u8],
    request_authenticator: &[u8; 16],
    secret: &[u8],
) -> Result<(), SealgateError> {
    let declared = declared_length(datagram)?;
    let packet = &datagram[..declared];
    let expected = response_digest(packet, request_authenticator, secret);
    if packet[4..HEADER_LEN] != expected {
        return Err(SealgateError::gateway(
            "response authenticator verification failed (check the shared secret)",
        ));
    }
    Ok(())
}

/// Hide a password per RFC 2865 §5.2.
///
/// The password is zero-padded to a multiple of 16 octets, then each 16-octet
/// chunk is XORed with MD5(secret + previous-ciphertext), seeded with the
/// request authenticator.
pub fn hide_password(
    password: &[u8],
    secret: &[u8],
    authenticator: &[u8; 16],
) -> Result<Vec<u8>, SealgateError> {
    if password.len() > MAX_PASSWORD_LEN {
        return Err(SealgateError::gateway(format!(
            "password exceeds {MAX_PASSWORD_LEN} octets and cannot be sent"
        )));
    }

    let mut padded = password.to_vec();
    padded.resize(password.len().div_ceil(16).max(1) * 16, 0);

    let mut hidden = Vec::with_capacity(padded.len());
    let mut prev = *authenticator;
    for chunk in padded.chunks_exact(16) {
        let digest = chained_digest(secret, &prev);
        for (i, byte) in chunk.iter().enumerate() {
            prev[i] = byte ^ digest[i];
        }
        hidden.extend_from_slice(&prev);
    }
    Ok(hidden)
}

/// Invert [`hide_password`]. Trailing zero padding is stripped, so passwords
/// with genuine trailing NUL octets do not survive the round trip.
pub fn recover_password(
    hidden: &[u8],
    secret: &[u8],
    authenticator: &[u8; 16],
) -> Result<Vec<u8>, SealgateError> {
    if hidden.is_empty() || hidden.len() % 16 != 0 {
        return Err(SealgateError::gateway(
            "User-Password value is not a multiple of 16 octets",
        ));
    }

    let mut plain = Vec::with_capacity(hidden.len());
    let mut prev = *authenticator;
    for chunk in hidden.chunks_exact(16) {
        let digest = chained_digest(secret, &prev);
        for (i, byte) in chunk.iter().enumerate() {
            plain.push(byte ^ digest[i]);
        }
        prev.copy_from_slice(chunk);
    }

    while plain.last() == Some(&0) {
        plain.pop();
    }
    Ok(plain)
}

fn chained_digest(secret: &[u8], prev: &[u8; 16]) -> [u8; 16] {
    let mut ctx = md5::Context::new();
    ctx.consume(secret);
    ctx.consume(prev);
    ctx.compute().0
}

fn response_digest(packet: &[u8], request_authenticator: &[u8; 16], secret: &[u8]) -> [u8; 16] {
    let mut ctx = md5::Context::new();
    ctx.consume(&packet[..4]);
    ctx.consume(request_authenticator);
    ctx.consume(&packet[HEADER_LEN..]);
    ctx.consume(secret);
    ctx.compute().0
}

fn declared_length(datagram: &[u8]) -> Result<usize, SealgateError> {
    if datagram.len() < HEADER_LEN {
        return Err(SealgateError::gateway(
            "gateway reply shorter than the RADIUS header",
        ));
    }
    let declared = u16::from_be_bytes([datagram[2], datagram[3]]) as usize;
    if declared < HEADER_LEN || declared > datagram.len() {
        return Err(SealgateError::gateway(format!(
            "gateway reply declares length {declared} but {} octets arrived",
            datagram.len()
        )));
    }
    Ok(declared)
}

fn push_attribute(buf: &mut Vec<u8>, attr_type: u8, value: &[u8]) -> Result<(), SealgateError> {
    if value.len() > MAX_ATTRIBUTE_VALUE_LEN {
        return Err(SealgateError::gateway(format!(
            "attribute {attr_type} value exceeds {MAX_ATTRIBUTE_VALUE_LEN} octets"
        )));
    }
    buf.push(attr_type);
    buf.push((value.len() + 2) as u8);
    buf.extend_from_slice(value);
    Ok(())
}

fn patch_length(packet: &mut [u8]) -> Result<(), SealgateError> {
    let len = packet.len();
    if len > MAX_PACKET_LEN {
        return Err(SealgateError::gateway(format!(
            "packet length {len} exceeds the RADIUS maximum"
        )));
    }
    let bytes = (len as u16).to_be_bytes();
    packet[2] = bytes[0];
    packet[3] = bytes[1];
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"radius-secret";
    const AUTHENTICATOR: [u8; 16] = [
        0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d, 0x0e, 0x0f,
        0x10,
    ];

    #[test]
    fn hide_recover_round_trips_short_password() {
        let hidden = hide_password(b"s3cret", SECRET, &AUTHENTICATOR).unwrap();
        assert_eq!(hidden.len(), 16);
        let plain = recover_password(&hidden, SECRET, &AUTHENTICATOR).unwrap();
        assert_eq!(plain, b"s3cret");
    }

    #[test]
    fn hide_recover_round_trips_multi_chunk_password() {
        let password = b"a-password-longer-than-sixteen-octets";
        let hidden = hide_password(password, SECRET, &AUTHENTICATOR).unwrap();
        assert_eq!(hidden.len(), 48);
        let plain = recover_password(&hidden, SECRET, &AUTHENTICATOR).unwrap();
        assert_eq!(plain, password);
    }

    #[test]
    fn empty_password_hides_to_one_chunk() {
        let hidden = hide_password(b"", SECRET, &AUTHENTICATOR).unwrap();
        assert_eq!(hidden.len(), 16);
        let plain = recover_password(&hidden, SECRET, &AUTHENTICATOR).unwrap();
        assert!(plain.is_empty());
    }

    #[test]
    fn hidden_bytes_are_not_the_plain_password() {
        let hidden = hide_password(b"s3cret", SECRET, &AUTHENTICATOR).unwrap();
        assert_ne!(&hidden[..6], b"s3cret");
    }

    #[test]
    fn overlong_password_is_refused() {
        let password = vec![b'x'; 129];
        assert!(hide_password(&password, SECRET, &AUTHENTICATOR).is_err());
    }

    #[test]
    fn recover_rejects_unaligned_value() {
        assert!(recover_password(&[0u8; 15], SECRET, &AUTHENTICATOR).is_err());
        assert!(recover_password(&[], SECRET, &AUTHENTICATOR).is_err());
    }

    #[test]
    fn access_request_layout_is_well_formed() {
        let packet =
            encode_access_request(7, &AUTHENTICATOR, "alice", b"pw", SECRET, "portal").unwrap();

        assert_eq!(packet[0], CODE_ACCESS_REQUEST);
        assert_eq!(packet[1], 7);
        let declared = u16::from_be_bytes([packet[2], packet[3]]) as usize;
        assert_eq!(declared, packet.len());
        assert_eq!(&packet[4..20], &AUTHENTICATOR);

        // User-Name directly after the header.
        assert_eq!(packet[20], ATTR_USER_NAME);
        assert_eq!(packet[21] as usize, 2 + "alice".len());
        assert_eq!(&packet[22..27], b"alice");

        // User-Password hidden, one chunk.
        assert_eq!(packet[27], ATTR_USER_PASSWORD);
        assert_eq!(packet[28], 18);
    }

    fn attribute_types(packet: &[u8]) -> Vec<u8> {
        let mut types = Vec::new();
        let mut rest = &packet[HEADER_LEN..];
        while rest.len() >= 2 {
            types.push(rest[0]);
            rest = &rest[rest[1] as usize..];
        }
        types
    }

    #[test]
    fn blank_nas_identifier_is_omitted() {
        let with = encode_access_request(1, &AUTHENTICATOR, "alice", b"pw", SECRET, "portal")
            .unwrap();
        let without = encode_access_request(1, &AUTHENTICATOR, "alice", b"pw", SECRET, "").unwrap();
        assert_eq!(
            attribute_types(&with),
            vec![ATTR_USER_NAME, ATTR_USER_PASSWORD, ATTR_NAS_IDENTIFIER]
        );
        assert_eq!(
            attribute_types(&without),
            vec![ATTR_USER_NAME, ATTR_USER_PASSWORD]
        );
    }

    #[test]
    fn response_round_trips_and_verifies() {
        let attrs = vec![
            (ATTR_SESSION_TIMEOUT, vec![0, 0, 0x0e, 0x10]),
            (ATTR_REPLY_MESSAGE, b"welcome".to_vec()),
        ];
        let datagram =
            encode_response(CODE_ACCESS_ACCEPT, 42, &AUTHENTICATOR, SECRET, &attrs).unwrap();

        verify_response_authenticator(&datagram, &AUTHENTICATOR, SECRET).unwrap();
        let packet = decode_response(&datagram).unwrap();
        assert_eq!(packet.code, CODE_ACCESS_ACCEPT);
        assert_eq!(packet.identifier, 42);
        assert_eq!(packet.attributes, attrs);
    }

    #[test]
    fn verification_fails_with_wrong_secret() {
        let datagram =
            encode_response(CODE_ACCESS_ACCEPT, 1, &AUTHENTICATOR, SECRET, &[]).unwrap();
        let err = verify_response_authenticator(&datagram, &AUTHENTICATOR, b"other-secret")
            .unwrap_err();
        assert!(err.to_string().contains("shared secret"));
    }

    #[test]
    fn verification_fails_when_attributes_are_tampered() {
        let attrs = vec![(ATTR_REPLY_MESSAGE, b"welcome".to_vec())];
        let mut datagram =
            encode_response(CODE_ACCESS_ACCEPT, 1, &AUTHENTICATOR, SECRET, &attrs).unwrap();
        let last = datagram.len() - 1;
        datagram[last] ^= 0xff;
        assert!(verify_response_authenticator(&datagram, &AUTHENTICATOR, SECRET).is_err());
    }

    #[test]
    fn decode_rejects_short_datagram() {
        assert!(decode_response(&[0u8; 19]).is_err());
    }

    #[test]
    fn decode_rejects_inflated_declared_length() {
        let mut datagram = encode_response(CODE_ACCESS_REJECT, 1, &AUTHENTICATOR, SECRET, &[])
            .unwrap();
        datagram[3] = datagram[3].wrapping_add(10);
        assert!(decode_response(&datagram).is_err());
    }

    #[test]
    fn decode_rejects_truncated_attribute() {
        let mut datagram =
            encode_response(CODE_ACCESS_REJECT, 1, &AUTHENTICATOR, SECRET, &[]).unwrap();
        // One dangling attribute type octet with no length.
        datagram.push(ATTR_REPLY_MESSAGE);
        let bytes = ((datagram.len()) as u16).to_be_bytes();
        datagram[2] = bytes[0];
        datagram[3] = bytes[1];
        assert!(decode_response(&datagram).is_err());
    }

    #[test]
    fn decode_ignores_padding_past_declared_length() {
        let mut datagram =
            encode_response(CODE_ACCESS_REJECT, 9, &AUTHENTICATOR, SECRET, &[]).unwrap();
        datagram.extend_from_slice(&[0xde, 0xad, 0xbe, 0xef]);
        let packet = decode_response(&datagram).unwrap();
        assert_eq!(packet.code, CODE_ACCESS_REJECT);
        assert!(packet.attributes.is_empty());
        verify_response_authenticator(&datagram, &AUTHENTICATOR, SECRET).unwrap();
    }

    #[test]
    fn zero_length_attribute_is_rejected() {
        let mut datagram =
            encode_response(CODE_ACCESS_REJECT, 1, &AUTHENTICATOR, SECRET, &[]).unwrap();
        datagram.extend_from_slice(&[ATTR_REPLY_MESSAGE, 0]);
        let bytes = ((datagram.len()) as u16).to_be_bytes();
        datagram[2] = bytes[0];
        datagram[3] = bytes[1];
        assert!(decode_response(&datagram).is_err());
    }
}
