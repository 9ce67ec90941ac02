//! Detection of the representation an input string is written in.

use crate::constants::{error_msg, scheme};
use crate::error::{LinkError, Result};
use serde_json::Value;

/// A classified input
#[derive(Debug, Clone, PartialEq)]
pub enum Input<'a> {
    /// `vless://` link
    Vless(&'a str),
    /// `vpn://` container token
    Vpn(&'a str),
    /// Inline JSON configuration
    Json(Value),
}

impl<'a> Input<'a> {
    /// Classify `text` by scheme prefix, falling back to inline JSON.
    ///
    /// # Errors
    ///
    /// `Format` if the text has neither scheme and is not valid JSON.
    ///
    /// # Example
    ///
    /// ```rust
    /// use vless_linker::Input;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// assert!(matches!(Input::detect("VLESS://u@h:443")?, Input::Vless(_)));
    /// assert!(matches!(Input::detect(r#"{"outbounds":[]}"#)?, Input::Json(_)));
    /// assert!(Input::detect("hello").is_err());
    /// # Ok(())
    /// # }
    /// ```
    pub fn detect(text: &'a str) -> Result<Self> {
        let text = text.trim();
        if has_scheme(text, scheme::VLESS) {
            Ok(Input::Vless(text))
        } else if has_scheme(text, scheme::VPN) {
            Ok(Input::Vpn(text))
        } else {
            serde_json::from_str(text)
                .map(Input::Json)
                .map_err(|_| LinkError::Format(error_msg::UNKNOWN_INPUT.to_string()))
        }
    }
}

fn has_scheme(text: &str, scheme: &str) -> bool {
    text.get(..scheme.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
}
