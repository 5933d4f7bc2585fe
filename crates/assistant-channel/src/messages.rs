//! Channel wire frames.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outbound frame sent over the channel.
///
/// Wire shape: `{ "message": string, "timestamp": RFC 3339 string }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboundFrame {
    pub message: String,
    pub timestamp: String,
}

impl OutboundFrame {
    /// Wrap a message text, stamping the current time.
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
            timestamp: Utc::now().to_rfc3339(),
        }
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// A decoded inbound frame, dispatched to consumers and not retained.
///
/// The payload is consumer-defined JSON, forwarded verbatim.
#[derive(Debug, Clone)]
pub struct InboundEvent {
    pub payload: serde_json::Value,
    pub received_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outbound_frame_shape() {
        let frame = OutboundFrame::new("hello");
        let json = frame.to_json().unwrap();

        assert!(json.contains("\"message\":\"hello\""));
        assert!(json.contains("\"timestamp\":"));
    }

    #[test]
    fn test_outbound_frame_timestamp_is_rfc3339() {
        let frame = OutboundFrame::new("hi");
        let parsed = DateTime::parse_from_rfc3339(&frame.timestamp);
        assert!(parsed.is_ok());
    }

    #[test]
    fn test_outbound_frame_roundtrip() {
        let original = OutboundFrame::new("round trip");
        let json = original.to_json().unwrap();
        let parsed = OutboundFrame::from_json(&json).unwrap();

        assert_eq!(parsed.message, "round trip");
        assert_eq!(parsed.timestamp, original.timestamp);
    }

    #[test]
    fn test_outbound_frame_from_invalid_json() {
        let result = OutboundFrame::from_json("not json");
        assert!(result.is_err());
    }
}
