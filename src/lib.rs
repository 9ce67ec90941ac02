//! # VLESS Linker
//!
//! Conversions between three representations of a VLESS proxy connection:
//!
//! - **`vless://` links** — `vless://uuid@host:port?params#name`
//! - **`vpn://` containers** — base64url of a length-prefixed zlib JSON body, or of bare JSON
//! - **Xray JSON** — a client configuration with one SOCKS inbound and one VLESS outbound
//!
//! ## Data flow
//!
//! ```text
//! vpn://…  ──vpn::decode──▶ (container unwrap) ──▶ JSON ──vless::to_uri──▶ vless://…
//! vless://… ──vless::from_uri──────────────────────▶ JSON
//! ```
//!
//! All conversions are pure functions over strings and [`serde_json::Value`]. They never
//! print, prompt or exit; the display name of a generated link is a parameter.
//!
//! ## Errors
//!
//! Wrong scheme or missing port → `Format`; base64/zlib/JSON failures → `Decode`;
//! missing JSON path when building a link → `Conversion`. See [`LinkError`].
//!
//! ## Example
//!
//! ```rust
//! use vless_linker::{vless, vpn};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = vless::from_uri("vless://uuid@example.com:443?security=reality&sni=example.com")?;
//! let token = vpn::encode(&config)?;
//! let decoded = vpn::decode(&token)?;
//! assert_eq!(decoded, config);
//!
//! let link = vless::to_uri(&decoded, "example")?;
//! assert!(link.starts_with("vless://uuid@example.com:443?encryption=none"));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod cli;
mod constants;
pub mod container;
mod error;
mod input;
pub mod vless;
pub mod vpn;
pub mod xray;


pub use error::{LinkError, Result};
pub use input::Input;
pub use vless::VlessEndpoint;
pub use vpn::Payload;
pub use xray::XrayConfig;

/// Program name shown by `--version` and the interactive banner.
pub const PROGRAM_NAME: &str = "VlessLinker";
/// One-line program description.
pub const PROGRAM_DESC: &str = "VLess <-> Json Converter (with VPN:// support)";
