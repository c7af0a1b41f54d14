//! Response body shapes used by the backend.

use serde::{Deserialize, Serialize};

/// Success envelope: every successful response wraps its payload in `data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// Payload (a record or a list of records)
    pub data: T,
}

/// Error body. The backend may include a human-readable `message`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Server-supplied message
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    /// Parse an error body, tolerating non-JSON or unexpected shapes.
    pub fn parse(body: &str) -> Self {
        serde_json::from_str(body).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_body_parse() {
        assert_eq!(
            ErrorBody::parse(r#"{"message":"Email already exists"}"#).message.as_deref(),
            Some("Email already exists")
        );
        assert_eq!(ErrorBody::parse(r#"{"error":true}"#).message, None);
        assert_eq!(ErrorBody::parse("<html>502</html>").message, None);
        assert_eq!(ErrorBody::parse("").message, None);
    }

    #[test]
    fn test_envelope_list() {
        let env: Envelope<Vec<u32>> = serde_json::from_str(r#"{"data":[1,2,3]}"#).unwrap();
        assert_eq!(env.data, vec![1, 2, 3]);
    }
}
