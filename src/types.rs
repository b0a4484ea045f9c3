//! Wire types for voicenav <-> surface daemon IPC
//!
//! Newline-delimited JSON. Each request is an [`IpcMessage`] envelope whose
//! payload is a [`Command`]; the daemon answers with a `response` envelope
//! carrying a [`CommandResponse`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::NavigatorError;

// =============================================================================
// Session Types
// =============================================================================

/// Name of the daemon-side browsing session
pub type SessionId = String;

// =============================================================================
// Command Types
// =============================================================================

/// Unique identifier for a command request
pub type CommandId = String;

/// Commands the navigator issues to the surface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandType {
    Navigate,
    Scroll,
    Press,
}

/// Command sent to the daemon
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Command {
    pub id: CommandId,
    pub session_id: SessionId,
    #[serde(rename = "type")]
    pub command_type: CommandType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<serde_json::Value>,
    pub timestamp: String, // ISO 8601 format
}

/// Response from the daemon
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandResponse {
    pub id: CommandId,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// =============================================================================
// IPC Message Types
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IpcMessageType {
    Command,
    Response,
    Ping,
    Pong,
}

/// IPC message envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpcMessage {
    #[serde(rename = "type")]
    pub message_type: IpcMessageType,
    pub payload: Option<serde_json::Value>,
}

// =============================================================================
// Command Payloads
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigatePayload {
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrollPayload {
    pub direction: ScrollDirection,
    pub amount: u32,
}

/// Key press delivered to the focused page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PressPayload {
    pub key: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollDirection {
    Up,
    Down,
}

impl fmt::Display for ScrollDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScrollDirection::Up => f.write_str("up"),
            ScrollDirection::Down => f.write_str("down"),
        }
    }
}

impl FromStr for ScrollDirection {
    type Err = NavigatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "up" => Ok(ScrollDirection::Up),
            "down" => Ok(ScrollDirection::Down),
            other => Err(NavigatorError::InvalidArguments(format!(
                "invalid scroll direction '{}', expected up or down",
                other
            ))),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn command_serializes_with_camel_case_and_type_tag() {
        let command = Command {
            id: "cmd-1".to_string(),
            session_id: "default".to_string(),
            command_type: CommandType::Press,
            params: Some(json!({"key": "ArrowRight"})),
            timestamp: "2026-01-01T00:00:00Z".to_string(),
        };

        let value = serde_json::to_value(&command).unwrap();
        assert_eq!(value["sessionId"], "default");
        assert_eq!(value["type"], "press");
        assert_eq!(value["params"]["key"], "ArrowRight");
    }

    #[test]
    fn command_omits_missing_params() {
        let command = Command {
            id: "cmd-1".to_string(),
            session_id: "default".to_string(),
            command_type: CommandType::Navigate,
            params: None,
            timestamp: "2026-01-01T00:00:00Z".to_string(),
        };

        let value = serde_json::to_value(&command).unwrap();
        assert!(value.get("params").is_none());
    }

    #[test]
    fn response_parses_without_optional_fields() {
        let response: CommandResponse =
            serde_json::from_value(json!({"id": "cmd-1", "success": false})).unwrap();
        assert!(!response.success);
        assert!(response.error.is_none());
    }

    #[test]
    fn scroll_direction_parses_case_insensitively() {
        assert_eq!("UP".parse::<ScrollDirection>().unwrap(), ScrollDirection::Up);
        assert_eq!(
            " down ".parse::<ScrollDirection>().unwrap(),
            ScrollDirection::Down
        );
        assert!(matches!(
            "left".parse::<ScrollDirection>(),
            Err(NavigatorError::InvalidArguments(_))
        ));
    }
}
