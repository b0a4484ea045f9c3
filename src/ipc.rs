//! IPC client for the surface daemon
//!
//! Newline-delimited JSON over a Unix socket. One connection per request.

use std::io::{BufRead, BufReader, Read, Write};
use std::path::Path;
use std::time::Duration;

#[cfg(unix)]
use std::os::unix::net::UnixStream;

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use uuid::Uuid;

use crate::config::Config;
use crate::error::{NavigatorError, Result};
use crate::types::{Command, CommandResponse, CommandType, IpcMessage, IpcMessageType};

/// Message delimiter for framing (newline-delimited JSON)
const MESSAGE_DELIMITER: u8 = b'\n';

/// IPC client for communicating with the surface daemon
#[derive(Debug, Clone)]
pub struct IpcClient {
    config: Config,
}

impl IpcClient {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn ping(&self) -> Result<bool> {
        let timeout = Duration::from_millis(self.config.connection_timeout_ms);
        let mut stream = connect_to_daemon(&self.config.ipc_socket_path, timeout)?;

        let message = IpcMessage {
            message_type: IpcMessageType::Ping,
            payload: None,
        };
        send_bytes(&mut stream, &serialize_message(&message)?)?;

        let response = deserialize_message(&read_message(&mut stream)?)?;
        Ok(matches!(response.message_type, IpcMessageType::Pong))
    }

    /// Build a command for `session_id` and wait for the daemon's answer
    pub fn execute(
        &self,
        session_id: &str,
        command_type: CommandType,
        payload: serde_json::Value,
    ) -> Result<CommandResponse> {
        let params = match payload.as_object() {
            Some(o) if !o.is_empty() => Some(payload),
            _ => None,
        };

        let command = Command {
            id: Uuid::new_v4().to_string(),
            session_id: session_id.to_string(),
            command_type,
            params,
            timestamp: current_timestamp()?,
        };

        self.send_command(command)
    }

    /// Send a command to the daemon and wait for response
    pub fn send_command(&self, command: Command) -> Result<CommandResponse> {
        let connect_timeout = Duration::from_millis(self.config.connection_timeout_ms);
        let command_timeout = Duration::from_millis(self.config.command_timeout_ms);
        let mut stream = connect_to_daemon(&self.config.ipc_socket_path, connect_timeout)?;
        set_timeouts(&stream, command_timeout)?;

        tracing::debug!(id = %command.id, kind = ?command.command_type, "sending command");

        let message = IpcMessage {
            message_type: IpcMessageType::Command,
            payload: Some(serde_json::to_value(command)?),
        };
        send_bytes(&mut stream, &serialize_message(&message)?)?;

        let response = deserialize_message(&read_message(&mut stream)?)?;
        if !matches!(response.message_type, IpcMessageType::Response) {
            return Err(NavigatorError::ProtocolError(
                "unexpected response type".to_string(),
            ));
        }

        let payload = response.payload.ok_or_else(|| {
            NavigatorError::ProtocolError("missing response payload".to_string())
        })?;

        let command_response: CommandResponse = serde_json::from_value(payload)?;
        Ok(command_response)
    }
}

#[cfg(unix)]
type IpcStream = UnixStream;

#[cfg(unix)]
fn connect_to_daemon(socket_path: &Path, timeout: Duration) -> Result<IpcStream> {
    if !socket_path.exists() {
        return Err(NavigatorError::SurfaceNotRunning(format!(
            "socket not found at {}",
            socket_path.display()
        )));
    }

    let stream = UnixStream::connect(socket_path)
        .map_err(|err| NavigatorError::ConnectionFailed(err.to_string()))?;
    set_timeouts(&stream, timeout)?;

    Ok(stream)
}

#[cfg(unix)]
fn set_timeouts(stream: &IpcStream, timeout: Duration) -> Result<()> {
    stream.set_read_timeout(Some(timeout))?;
    stream.set_write_timeout(Some(timeout))?;
    Ok(())
}

#[cfg(not(unix))]
type IpcStream = std::fs::File;

#[cfg(not(unix))]
fn connect_to_daemon(socket_path: &Path, _timeout: Duration) -> Result<IpcStream> {
    Err(NavigatorError::SurfaceNotRunning(format!(
        "unix socket {} is not supported on this platform",
        socket_path.display()
    )))
}

#[cfg(not(unix))]
fn set_timeouts(_stream: &IpcStream, _timeout: Duration) -> Result<()> {
    Ok(())
}

fn current_timestamp() -> Result<String> {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .map_err(|err| NavigatorError::ProtocolError(format!("timestamp: {}", err)))
}

fn serialize_message(message: &IpcMessage) -> Result<Vec<u8>> {
    let mut json = serde_json::to_vec(message)?;
    json.push(MESSAGE_DELIMITER);
    Ok(json)
}

fn deserialize_message(data: &[u8]) -> Result<IpcMessage> {
    let message: IpcMessage = serde_json::from_slice(data)?;
    Ok(message)
}

fn send_bytes<W: Write>(stream: &mut W, data: &[u8]) -> Result<()> {
    stream.write_all(data)?;
    stream.flush()?;
    Ok(())
}

fn read_message<R: Read>(stream: &mut R) -> Result<Vec<u8>> {
    let mut reader = BufReader::new(stream);
    let mut buf = Vec::new();
    let bytes = reader.read_until(MESSAGE_DELIMITER, &mut buf)?;

    if bytes == 0 {
        return Err(NavigatorError::ProtocolError("empty response".to_string()));
    }

    if buf.last().copied() != Some(MESSAGE_DELIMITER) {
        return Err(NavigatorError::ProtocolError(
            "missing message delimiter".to_string(),
        ));
    }

    buf.pop();
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serialize_message_appends_newline_delimiter() {
        let message = IpcMessage {
            message_type: IpcMessageType::Command,
            payload: Some(json!({"id": "cmd-1"})),
        };

        let bytes = serialize_message(&message).expect("serialize message");
        assert_eq!(bytes.last().copied(), Some(MESSAGE_DELIMITER));

        let mut trimmed = bytes.clone();
        trimmed.pop();
        let parsed: serde_json::Value = serde_json::from_slice(&trimmed).expect("parse json");
        assert_eq!(
            parsed,
            json!({"type": "command", "payload": {"id": "cmd-1"}})
        );
    }

    #[test]
    fn read_message_rejects_missing_delimiter() {
        let mut data: &[u8] = b"{\"type\":\"pong\"}";
        let result = read_message(&mut data);
        assert!(matches!(result, Err(NavigatorError::ProtocolError(_))));
    }

    #[test]
    fn read_message_rejects_empty_stream() {
        let mut data: &[u8] = b"";
        let result = read_message(&mut data);
        assert!(matches!(result, Err(NavigatorError::ProtocolError(_))));
    }

    #[test]
    fn current_timestamp_is_rfc3339() {
        let stamp = current_timestamp().expect("timestamp");
        assert!(OffsetDateTime::parse(&stamp, &Rfc3339).is_ok());
    }
}
