use serde::de::DeserializeOwned;

use super::Result;

/// Deserialize a JSON payload. Blank payloads mean "no object" and are not an error.
pub fn parse<T: DeserializeOwned>(json: &str) -> Result<Option<T>> {
    if json.trim().is_empty() {
        return Ok(None);
    }

    Ok(Some(serde_json::from_str(json)?))
}
