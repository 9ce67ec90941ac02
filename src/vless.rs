//! VLESS link mapping
//!
//! URI format (RFC 3986): `vless://<uuid>@<address>:<port>[?<query>][#<name>]`
//!
//! **Required**: `uuid`, `address`, `port` (1–65535).
//!
//! **Query parameters** (optional, `application/x-www-form-urlencoded`):
//!
//! | Param | Config field | Default |
//! |-------|--------------|---------|
//! | `type` | `streamSettings.network` | `tcp` |
//! | `security` | `streamSettings.security` | `none` |
//! | `sni` | `realitySettings.serverName` | |
//! | `fp` | `realitySettings.fingerprint` | |
//! | `pbk` | `realitySettings.publicKey` | |
//! | `sid` | `realitySettings.shortId` | |
//! | `spx` | `realitySettings.spiderX` | |
//! | `flow` | `users[0].flow` | |
//!
//! ## Parsing rules
//!
//! 1. Prefix `vless://` is case-insensitive.
//! 2. The first non-empty value of a repeated parameter wins; an empty value counts as absent.
//! 3. The fragment is a display name and is not part of the endpoint.
//! 4. A missing or non-numeric port is a `Format` error.
//!
//! ## Serialization
//!
//! [`VlessEndpoint::to_uri`] always writes `encryption=none` first, then `flow`, `security`,
//! `sni`, `fp`, `pbk`, `sid`, `spx`, `type` in that order, skipping empty values, then `#name`.

use crate::constants::{defaults, error_msg, scheme};
use crate::error::{LinkError, Result};
use crate::xray::{
    Outbound, OutboundSettings, RealitySettings, StreamSettings, User, VnextServer, XrayConfig,
};
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Flattened VLESS connection parameters
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VlessEndpoint {
    /// User ID (UUID)
    pub uuid: String,
    /// Server address, IPv6 without brackets
    pub address: String,
    /// Server port
    pub port: u16,
    /// Flow control (for XTLS)
    pub flow: String,
    /// Transport (tcp, ws, grpc, ...)
    pub network: String,
    /// Security layer (none, tls, reality)
    pub security: String,
    /// SNI
    pub server_name: String,
    /// uTLS fingerprint
    pub fingerprint: String,
    /// REALITY public key
    pub public_key: String,
    /// REALITY short ID
    pub short_id: String,
    /// REALITY spider path
    pub spider_x: String,
}

impl VlessEndpoint {
    /// Parse a `vless://` link.
    ///
    /// # Errors
    ///
    /// `Format` if the scheme, the `@` separator or the port is missing or invalid.
    pub fn from_uri(uri: &str) -> Result<Self> {
        let uri = uri.trim();
        let prefix_len = scheme::VLESS.len();
        let body = match uri.get(..prefix_len) {
            Some(prefix) if prefix.eq_ignore_ascii_case(scheme::VLESS) => &uri[prefix_len..],
            _ => {
                return Err(LinkError::Format(format!(
                    "{} {}",
                    error_msg::MUST_START_WITH,
                    scheme::VLESS
                )));
            }
        };

        // [uuid@]host:port[/path][?query][#fragment]
        let before_hash = body.split_once('#').map_or(body, |(head, _)| head);
        let (main_part, query) = before_hash
            .split_once('?')
            .map_or((before_hash, None), |(main, query)| (main, Some(query)));
        let main_part = main_part.split_once('/').map_or(main_part, |(main, _)| main);

        let (uuid, host_port) = main_part
            .rsplit_once('@')
            .ok_or_else(|| LinkError::Format(error_msg::MISSING_AT.to_string()))?;
        let (address, port) = split_host_port(host_port)?;

        let params = query.map(parse_query).unwrap_or_default();
        let param = |key: &str, default: &str| {
            params
                .get(key)
                .cloned()
                .unwrap_or_else(|| default.to_string())
        };

        Ok(VlessEndpoint {
            uuid: uuid.to_string(),
            address: address.to_string(),
            port,
            flow: param("flow", ""),
            network: param("type", defaults::NETWORK),
            security: param("security", defaults::SECURITY),
            server_name: param("sni", ""),
            fingerprint: param("fp", ""),
            public_key: param("pbk", ""),
            short_id: param("sid", ""),
            spider_x: param("spx", ""),
        })
    }

    /// Read the endpoint from `outbounds[0]` of a configuration.
    ///
    /// # Errors
    ///
    /// `Conversion` naming the first path that is absent or malformed.
    pub fn from_config(config: &Value) -> Result<Self> {
        let outbound = first(child(config, "outbounds", "outbounds")?, "outbounds")?;
        let settings = child(outbound, "settings", "outbounds[0].settings")?;
        let vnext = first(
            child(settings, "vnext", "outbounds[0].settings.vnext")?,
            "outbounds[0].settings.vnext",
        )?;
        let user = first(child(vnext, "users", "vnext[0].users")?, "vnext[0].users")?;
        let stream = object(
            child(outbound, "streamSettings", "outbounds[0].streamSettings")?,
            "outbounds[0].streamSettings",
        )?;

        let uuid = scalar(child(user, "id", "users[0].id")?, "users[0].id")?;
        let address = scalar(child(vnext, "address", "vnext[0].address")?, "vnext[0].address")?;
        let port = port_value(child(vnext, "port", "vnext[0].port")?)?;

        let empty = Value::Object(Default::default());
        let reality = match stream.get("realitySettings") {
            Some(value) => object(value, "streamSettings.realitySettings")?,
            None => &empty,
        };
        let tls = match stream.get("tlsSettings") {
            Some(value) => object(value, "streamSettings.tlsSettings")?,
            None => &empty,
        };
        let with_tls_fallback = |key: &str| {
            let value = optional(reality, key, "");
            if value.is_empty() {
                optional(tls, key, "")
            } else {
                value
            }
        };

        Ok(VlessEndpoint {
            uuid,
            address,
            port,
            flow: optional(user, "flow", ""),
            network: optional(stream, "network", defaults::NETWORK),
            security: optional(stream, "security", defaults::SECURITY),
            server_name: with_tls_fallback("serverName"),
            fingerprint: with_tls_fallback("fingerprint"),
            public_key: optional(reality, "publicKey", ""),
            short_id: optional(reality, "shortId", ""),
            spider_x: optional(reality, "spiderX", ""),
        })
    }

    /// Build the Xray client configuration for this endpoint.
    pub fn to_config(&self) -> XrayConfig {
        XrayConfig::socks_client(Outbound {
            protocol: defaults::OUTBOUND_PROTOCOL.to_string(),
            settings: OutboundSettings {
                vnext: vec![VnextServer {
                    address: self.address.clone(),
                    port: self.port,
                    users: vec![User {
                        id: self.uuid.clone(),
                        encryption: defaults::ENCRYPTION.to_string(),
                        flow: self.flow.clone(),
                    }],
                }],
            },
            stream_settings: StreamSettings {
                network: self.network.clone(),
                security: self.security.clone(),
                reality_settings: RealitySettings {
                    server_name: self.server_name.clone(),
                    fingerprint: self.fingerprint.clone(),
                    public_key: self.public_key.clone(),
                    short_id: self.short_id.clone(),
                    spider_x: self.spider_x.clone(),
                },
            },
        })
    }

    /// Render the link, appending `name` as the fragment.
    pub fn to_uri(&self, name: &str) -> String {
        let host = if self.address.contains(':') && !self.address.starts_with('[') {
            format!("[{}]", self.address)
        } else {
            self.address.clone()
        };
        let mut link = format!(
            "{}{}@{}:{}?encryption={}",
            scheme::VLESS,
            self.uuid,
            host,
            self.port,
            defaults::ENCRYPTION
        );

        let query = [
            ("flow", &self.flow),
            ("security", &self.security),
            ("sni", &self.server_name),
            ("fp", &self.fingerprint),
            ("pbk", &self.public_key),
            ("sid", &self.short_id),
            ("spx", &self.spider_x),
            ("type", &self.network),
        ];
        for (key, value) in query {
            if !value.is_empty() {
                link.push_str(&format!("&{}={}", key, urlencoding::encode(value)));
            }
        }

        link.push('#');
        link.push_str(&urlencoding::encode(name));
        link
    }
}

/// Convert a `vless://` link into a full Xray client configuration.
///
/// # Errors
///
/// `Format` if the link is malformed or the port is missing or invalid.
///
/// # Example
///
/// ```rust
/// use vless_linker::vless;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = vless::from_uri("vless://u@host:1234?type=ws&security=tls&sni=example.com")?;
/// let stream = &config["outbounds"][0]["streamSettings"];
/// assert_eq!(stream["network"], "ws");
/// assert_eq!(stream["realitySettings"]["serverName"], "example.com");
/// assert_eq!(config["inbounds"][0]["port"], 10808);
/// # Ok(())
/// # }
/// ```
pub fn from_uri(uri: &str) -> Result<Value> {
    VlessEndpoint::from_uri(uri)?.to_config().to_value()
}

/// Convert a configuration into a `vless://` link named `name`.
///
/// # Errors
///
/// `Conversion` if `outbounds[0]`, its `vnext[0]`, `users[0]` or `streamSettings` is missing
/// or not of the expected type, or if the port is outside 1–65535.
///
/// # Example
///
/// ```rust
/// use vless_linker::vless;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = vless::from_uri("vless://u@host:1234?security=reality&pbk=key")?;
/// assert_eq!(
///     vless::to_uri(&config, "home")?,
///     "vless://u@host:1234?encryption=none&security=reality&pbk=key&type=tcp#home"
/// );
/// # Ok(())
/// # }
/// ```
pub fn to_uri(config: &Value, name: &str) -> Result<String> {
    Ok(VlessEndpoint::from_config(config)?.to_uri(name))
}

/// Name an interactive caller offers when the user supplies none: the server address.
pub fn default_name(config: &Value) -> Option<String> {
    config
        .pointer("/outbounds/0/settings/vnext/0/address")
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn split_host_port(host_port: &str) -> Result<(&str, u16)> {
    let invalid_port = |detail: &str| {
        LinkError::Format(format!("{}: {}", error_msg::INVALID_PORT, detail))
    };

    let (host, port) = if let Some(rest) = host_port.strip_prefix('[') {
        let (host, after) = rest
            .split_once(']')
            .ok_or_else(|| LinkError::Format(format!("Unclosed IPv6 address in '{}'", host_port)))?;
        let port = after
            .strip_prefix(':')
            .ok_or_else(|| invalid_port(host_port))?;
        (host, port)
    } else {
        host_port
            .rsplit_once(':')
            .ok_or_else(|| invalid_port(host_port))?
    };

    let port = port.parse::<u16>().map_err(|e| invalid_port(&e.to_string()))?;
    if port == 0 {
        return Err(invalid_port("port 0"));
    }
    Ok((host, port))
}

fn parse_query(query: &str) -> HashMap<String, String> {
    let mut params = HashMap::new();
    for (key, value) in url::form_urlencoded::parse(query.as_bytes()).into_owned() {
        if value.is_empty() {
            continue;
        }
        if params.contains_key(&key) {
            debug!("ignoring repeated query parameter '{}'", key);
            continue;
        }
        params.insert(key, value);
    }
    params
}

fn child<'a>(value: &'a Value, key: &str, path: &str) -> Result<&'a Value> {
    value.get(key).ok_or_else(|| LinkError::missing(path))
}

fn object<'a>(value: &'a Value, path: &str) -> Result<&'a Value> {
    if value.is_object() {
        Ok(value)
    } else {
        Err(LinkError::missing(path))
    }
}

fn first<'a>(value: &'a Value, path: &str) -> Result<&'a Value> {
    value
        .as_array()
        .and_then(|items| items.first())
        .ok_or_else(|| LinkError::missing(&format!("{}[0]", path)))
}

fn scalar(value: &Value, path: &str) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(LinkError::Conversion(format!("'{}' must be a string", path))),
    }
}

fn optional(value: &Value, key: &str, default: &str) -> String {
    match value.get(key) {
        None => default.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(_) => String::new(),
    }
}

fn port_value(value: &Value) -> Result<u16> {
    let port = match value {
        Value::Number(n) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    port.filter(|&port| port != 0).ok_or_else(|| {
        LinkError::Conversion(format!("'vnext[0].port' is not a valid port: {}", value))
    })
}
