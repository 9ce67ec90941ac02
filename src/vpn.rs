//! `vpn://` container codec
//!
//! Token format: `vpn://<base64url>`, URL-safe alphabet (RFC 4648 §5), `=` padding optional.
//!
//! The decoded bytes come in two variants:
//!
//! | Variant | Layout |
//! |---------|--------|
//! | **Compressed** | `[u32 big-endian decompressed length][zlib stream of UTF-8 JSON]` |
//! | **Bare** | UTF-8 JSON text, no header |
//!
//! ## Decoding rules
//!
//! 1. Prefix `vpn://` is case-insensitive; surrounding whitespace is ignored.
//! 2. Missing `=` padding is restored before base64 decoding; failure is `Decode`.
//! 3. The compressed variant is tried first. It is accepted only when the stream inflates
//!    and the inflated length equals the header.
//! 4. Otherwise the whole buffer is parsed as bare JSON. Corrupted compressed payloads
//!    take this branch too and then fail as JSON; this lenience is intentional.
//! 5. A decoded value that carries a `containers[0].xray.last_config` wrapper is replaced
//!    by the embedded config (see [`crate::container`]).

use crate::constants::{error_msg, scheme};
use crate::container::unwrap_container;
use crate::error::{LinkError, Result};
use base64::Engine;
use base64::engine::general_purpose::{URL_SAFE, URL_SAFE_NO_PAD};
use flate2::Compression;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use log::{debug, trace};
use serde_json::Value;
use std::io::{Read, Write};

/// Size of the big-endian length header of the compressed variant.
const HEADER_LEN: usize = 4;

/// Outcome of interpreting decoded container bytes.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Length-prefixed zlib body that inflated to the announced size
    Compressed(Value),
    /// Plain JSON without header
    Bare(Value),
    /// Neither variant produced JSON
    Invalid(LinkError),
}

impl Payload {
    /// The decoded JSON value, or the error of the bare-JSON attempt.
    pub fn into_value(self) -> Result<Value> {
        match self {
            Payload::Compressed(value) | Payload::Bare(value) => Ok(value),
            Payload::Invalid(err) => Err(err),
        }
    }
}

/// Decode a `vpn://` token into a configuration value.
///
/// # Errors
///
/// `Format` if the token lacks the `vpn://` prefix, `Decode` if base64 or JSON
/// decoding fails, including an embedded `last_config` that is not JSON.
///
/// # Example
///
/// ```rust
/// use vless_linker::vpn;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// // base64url of {"log":{"loglevel":"error"}} without padding
/// let value = vpn::decode("vpn://eyJsb2ciOnsibG9nbGV2ZWwiOiJlcnJvciJ9fQ")?;
/// assert_eq!(value["log"]["loglevel"], "error");
/// # Ok(())
/// # }
/// ```
pub fn decode(token: &str) -> Result<Value> {
    let value = decode_payload(token)?.into_value()?;
    unwrap_container(value)
}

/// Decode a `vpn://` token without unwrapping nested containers.
///
/// Reports which variant matched.
///
/// # Errors
///
/// `Format` if the prefix is missing, `Decode` if base64 decoding fails.
pub fn decode_payload(token: &str) -> Result<Payload> {
    let body = strip_scheme(token.trim())?;
    let raw = decode_base64(body)?;
    Ok(classify(&raw))
}

/// Encode a configuration value into a compressed `vpn://` token.
///
/// The JSON is pretty-printed before compression. The base64 part carries no padding.
///
/// # Errors
///
/// `Conversion` if the serialized JSON does not fit the 32-bit length header.
pub fn encode(config: &Value) -> Result<String> {
    let json = serde_json::to_string_pretty(config)?;
    let len = u32::try_from(json.len()).map_err(|_| {
        LinkError::Conversion(format!("payload of {} bytes is too large", json.len()))
    })?;

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(json.as_bytes())?;
    let compressed = encoder.finish()?;

    let mut container = Vec::with_capacity(HEADER_LEN + compressed.len());
    container.extend_from_slice(&len.to_be_bytes());
    container.extend_from_slice(&compressed);

    Ok(format!("{}{}", scheme::VPN, URL_SAFE_NO_PAD.encode(container)))
}

/// Interpret decoded container bytes, trying the compressed variant first.
pub fn classify(raw: &[u8]) -> Payload {
    if let Some(value) = try_compressed(raw) {
        debug!("vpn payload: length-prefixed zlib body");
        return Payload::Compressed(value);
    }

    match serde_json::from_slice::<Value>(raw) {
        Ok(value) => {
            debug!("vpn payload: bare JSON body");
            Payload::Bare(value)
        }
        Err(err) => Payload::Invalid(err.into()),
    }
}

fn try_compressed(raw: &[u8]) -> Option<Value> {
    if raw.len() < HEADER_LEN {
        trace!("payload shorter than length header");
        return None;
    }
    let (header, stream) = raw.split_at(HEADER_LEN);
    let expected = u32::from_be_bytes([header[0], header[1], header[2], header[3]]);

    // One byte past the announced size is enough to detect a mismatch.
    let mut inflated = Vec::new();
    let mut decoder = ZlibDecoder::new(stream).take(u64::from(expected) + 1);
    if let Err(err) = decoder.read_to_end(&mut inflated) {
        trace!("zlib inflate failed: {}", err);
        return None;
    }
    if inflated.len() != expected as usize {
        trace!(
            "length mismatch after inflate: expected {}, got {}",
            expected,
            inflated.len()
        );
        return None;
    }

    match serde_json::from_slice(&inflated) {
        Ok(value) => Some(value),
        Err(err) => {
            trace!("inflated body is not JSON: {}", err);
            None
        }
    }
}

fn strip_scheme(token: &str) -> Result<&str> {
    let prefix_len = scheme::VPN.len();
    match token.get(..prefix_len) {
        Some(prefix) if prefix.eq_ignore_ascii_case(scheme::VPN) => Ok(&token[prefix_len..]),
        _ => Err(LinkError::Format(format!(
            "{} {}",
            error_msg::MUST_START_WITH,
            scheme::VPN
        ))),
    }
}

/// Decode URL-safe base64, restoring any missing `=` padding first.
pub(crate) fn decode_base64(body: &str) -> Result<Vec<u8>> {
    let mut padded = body.to_string();
    while !padded.len().is_multiple_of(4) {
        padded.push('=');
    }
    Ok(URL_SAFE.decode(padded)?)
}
