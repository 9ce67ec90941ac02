//! Orchestration wrapper unwrapping
//!
//! Some `vpn://` payloads are not an Xray config but a client export of the form
//! `{"containers":[{"xray":{"last_config":"<JSON string>"}}], ...}`. Only the first
//! container is inspected; anything that does not match is returned unchanged.

use crate::constants::container::{CONTAINERS, LAST_CONFIG, XRAY};
use crate::error::Result;
use log::debug;
use serde_json::Value;

/// Replace a wrapped export by the Xray config embedded in it.
///
/// # Errors
///
/// `Decode` if `last_config` is a string that does not hold valid JSON.
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use vless_linker::container::unwrap_container;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let wrapped = json!({
///     "containers": [{ "xray": { "last_config": "{\"log\":{\"loglevel\":\"error\"}}" } }]
/// });
/// assert_eq!(unwrap_container(wrapped)?, json!({ "log": { "loglevel": "error" } }));
/// # Ok(())
/// # }
/// ```
pub fn unwrap_container(value: Value) -> Result<Value> {
    let Some(embedded) = last_config(&value) else {
        return Ok(value);
    };
    debug!("unwrapping containers[0].{}.{}", XRAY, LAST_CONFIG);
    Ok(serde_json::from_str(embedded)?)
}

fn last_config(value: &Value) -> Option<&str> {
    value
        .get(CONTAINERS)?
        .as_array()?
        .first()?
        .get(XRAY)?
        .as_object()?
        .get(LAST_CONFIG)?
        .as_str()
}
