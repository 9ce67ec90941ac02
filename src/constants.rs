//! Shared constants for schemes, fixed configuration defaults and error messages.

/// URI scheme prefixes (lowercase, with `://`).
pub mod scheme {
    /// VLESS: `vless://`
    pub const VLESS: &str = "vless://";
    /// Amnezia-style container: `vpn://`
    pub const VPN: &str = "vpn://";
}

/// Values the generated configuration and links fall back to.
pub mod defaults {
    /// Listen address of the local SOCKS inbound.
    pub const SOCKS_LISTEN: &str = "127.0.0.1";
    /// Listen port of the local SOCKS inbound.
    pub const SOCKS_PORT: u16 = 10808;
    /// Inbound protocol name.
    pub const SOCKS_PROTOCOL: &str = "socks";
    /// Xray log level written into generated configs.
    pub const LOG_LEVEL: &str = "error";
    /// Outbound protocol name.
    pub const OUTBOUND_PROTOCOL: &str = "vless";
    /// VLESS user encryption; always `none`.
    pub const ENCRYPTION: &str = "none";
    /// Transport when `type` is absent.
    pub const NETWORK: &str = "tcp";
    /// Security layer when `security` is absent.
    pub const SECURITY: &str = "none";
}

/// Nested keys of the orchestration wrapper some `vpn://` payloads carry.
pub mod container {
    /// Top-level array key.
    pub const CONTAINERS: &str = "containers";
    /// Per-container Xray section.
    pub const XRAY: &str = "xray";
    /// JSON-encoded Xray config string.
    pub const LAST_CONFIG: &str = "last_config";
}

/// Common error message fragments.
pub mod error_msg {
    /// Link must start with scheme (placeholder: use with format!).
    pub const MUST_START_WITH: &str = "Link must start with";
    /// Missing `@` in userinfo@host part.
    pub const MISSING_AT: &str = "Missing '@' in main part";
    /// Port absent, non-numeric or out of range.
    pub const INVALID_PORT: &str = "missing or invalid port";
    /// Input matched no known representation.
    pub const UNKNOWN_INPUT: &str = "input is neither valid JSON, a VLESS URL, nor a VPN URL";
}
