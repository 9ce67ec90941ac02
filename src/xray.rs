//! Typed model of the Xray client configuration produced from a VLESS link.
//!
//! Field order follows the layout Xray documents, so serialized output keeps
//! `inbounds`, `log`, `outbounds` at the top and `id`, `encryption`, `flow` per user.

use crate::constants::defaults;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Complete client configuration: one local SOCKS inbound, one VLESS outbound.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct XrayConfig {
    /// Local listeners
    pub inbounds: Vec<Inbound>,
    /// Logging section
    pub log: LogConfig,
    /// Upstream connections
    pub outbounds: Vec<Outbound>,
}

/// Local listening socket
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Inbound {
    /// Listen address
    pub listen: String,
    /// Listen port
    pub port: u16,
    /// Inbound protocol (`socks`)
    pub protocol: String,
    /// Protocol settings
    pub settings: InboundSettings,
}

/// SOCKS inbound settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InboundSettings {
    /// Relay UDP
    pub udp: bool,
}

/// Xray `log` section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogConfig {
    /// Log level (`debug`, `info`, `warning`, `error`, `none`)
    pub loglevel: String,
}

/// VLESS outbound
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Outbound {
    /// Outbound protocol (`vless`)
    pub protocol: String,
    /// Server list
    pub settings: OutboundSettings,
    /// Transport and security layer
    pub stream_settings: StreamSettings,
}

/// VLESS outbound settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OutboundSettings {
    /// Upstream servers; only the first is used
    pub vnext: Vec<VnextServer>,
}

/// Upstream server entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VnextServer {
    /// Server address
    pub address: String,
    /// Server port
    pub port: u16,
    /// Users; only the first is used
    pub users: Vec<User>,
}

/// VLESS user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    /// User ID (UUID)
    pub id: String,
    /// Always `none` for VLESS
    pub encryption: String,
    /// Flow control (e.g. `xtls-rprx-vision`), may be empty
    pub flow: String,
}

/// Stream settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StreamSettings {
    /// Transport (tcp, ws, grpc, ...)
    pub network: String,
    /// Security layer (none, tls, reality)
    pub security: String,
    /// REALITY parameters, empty strings when unused
    pub reality_settings: RealitySettings,
}

/// REALITY parameters
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RealitySettings {
    /// SNI
    pub server_name: String,
    /// uTLS fingerprint
    pub fingerprint: String,
    /// Server public key
    pub public_key: String,
    /// Short ID
    pub short_id: String,
    /// Spider path
    pub spider_x: String,
}

impl XrayConfig {
    /// Wrap an outbound with the fixed local SOCKS inbound and log level.
    pub fn socks_client(outbound: Outbound) -> Self {
        XrayConfig {
            inbounds: vec![Inbound {
                listen: defaults::SOCKS_LISTEN.to_string(),
                port: defaults::SOCKS_PORT,
                protocol: defaults::SOCKS_PROTOCOL.to_string(),
                settings: InboundSettings { udp: true },
            }],
            log: LogConfig {
                loglevel: defaults::LOG_LEVEL.to_string(),
            },
            outbounds: vec![outbound],
        }
    }

    /// Convert into an untyped JSON tree.
    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}
