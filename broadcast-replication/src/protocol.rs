//! JSON bodies exchanged over HTTP, both client-facing and between peers.

use serde::{Deserialize, Serialize};

/// Body of a client `PUT /items/{key}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ItemBody {
    pub value: String,
}

/// Replicated write sent from one node to a peer's `POST /message`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub key: String,
    pub value: String,
}

/// Body of `POST /nodes`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NodeRequest {
    pub address: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_escapes_quotes() {
        let message = Message {
            key: "quote\"d".into(),
            value: "line\nbreak".into(),
        };
        let encoded = serde_json::to_string(&message).unwrap();
        assert_eq!(encoded, r#"{"key":"quote\"d","value":"line\nbreak"}"#);
    }

    #[test]
    fn test_item_body_rejects_missing_value() {
        assert!(serde_json::from_str::<ItemBody>(r#"{"val":"x"}"#).is_err());
        assert!(serde_json::from_str::<ItemBody>(r#"{"value":42}"#).is_err());
    }
}
