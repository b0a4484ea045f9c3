//! Speech recognition collaborator
//!
//! The recognizer itself lives outside this crate. The session only needs
//! to start and stop it and to consume the events it emits.

use std::fmt;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedSender;

use crate::error::{NavigatorError, Result};

/// Recognition settings passed on every start
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeechSettings {
    /// BCP 47 language tag
    pub language: String,
    /// Keep listening after a final result
    pub continuous: bool,
    /// Emit partial hypotheses
    pub interim_results: bool,
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self {
            language: "ja-JP".to_string(),
            continuous: true,
            interim_results: true,
        }
    }
}

/// Why recognition cannot be used at all
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unavailable {
    /// No recognizer on this platform
    Unsupported,
    /// Recognizer refuses to run outside a secure context
    InsecureContext,
}

impl fmt::Display for Unavailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unavailable::Unsupported => f.write_str("音声認識がサポートされていません"),
            Unavailable::InsecureContext => f.write_str("音声認識にはHTTPS環境が必要です"),
        }
    }
}

/// Closed set of recognizer error codes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpeechErrorCode {
    Network,
    NotAllowed,
    AudioCapture,
    NoSpeech,
    Other(String),
}

impl SpeechErrorCode {
    /// Parse a recognizer error code; unknown codes are kept verbatim
    pub fn parse(code: &str) -> Self {
        match code.trim() {
            "network" => SpeechErrorCode::Network,
            "not-allowed" => SpeechErrorCode::NotAllowed,
            "audio-capture" => SpeechErrorCode::AudioCapture,
            "no-speech" => SpeechErrorCode::NoSpeech,
            other => SpeechErrorCode::Other(other.to_string()),
        }
    }

    /// Message shown to the user
    pub fn user_message(&self) -> String {
        match self {
            SpeechErrorCode::Network => {
                "ネットワークエラー - インターネット接続を確認してください".to_string()
            }
            SpeechErrorCode::NotAllowed => {
                "マイクへのアクセスが拒否されました。設定でマイクを許可してください".to_string()
            }
            SpeechErrorCode::AudioCapture => {
                "マイクが見つかりません。マイクが接続されているか確認してください".to_string()
            }
            SpeechErrorCode::NoSpeech => "音声が検出されませんでした".to_string(),
            SpeechErrorCode::Other(code) => format!("音声認識エラー: {}", code),
        }
    }
}

/// Events emitted by a recognizer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechEvent {
    Started,
    Ended,
    /// Partial hypothesis, may still change
    Interim(String),
    /// Final transcript, delivered in recognition order
    Final(String),
    Error(SpeechErrorCode),
}

/// Start/stop handle on a recognizer
pub trait SpeechCapability {
    fn availability(&self) -> std::result::Result<(), Unavailable>;

    fn start(&mut self, settings: &SpeechSettings) -> Result<()>;

    /// Ask the recognizer to stop. Events already queued may still arrive.
    fn stop(&mut self);
}

// =============================================================================
// Line-driven recognizer
// =============================================================================

/// Recognizer whose results are typed on stdin
///
/// Lifecycle events go out on a channel so the event loop sees them in the
/// same order a real recognizer would emit them.
pub struct LineRecognizer {
    events: UnboundedSender<SpeechEvent>,
    running: bool,
}

impl LineRecognizer {
    pub fn new(events: UnboundedSender<SpeechEvent>) -> Self {
        Self {
            events,
            running: false,
        }
    }

    fn emit(&self, event: SpeechEvent) -> Result<()> {
        self.events
            .send(event)
            .map_err(|_| NavigatorError::SpeechUnavailable("event loop has shut down".to_string()))
    }
}

impl SpeechCapability for LineRecognizer {
    fn availability(&self) -> std::result::Result<(), Unavailable> {
        Ok(())
    }

    fn start(&mut self, settings: &SpeechSettings) -> Result<()> {
        if self.running {
            return Err(NavigatorError::InvalidArguments(
                "recognition has already started".to_string(),
            ));
        }
        tracing::debug!(language = %settings.language, "line recognizer started");
        self.running = true;
        self.emit(SpeechEvent::Started)
    }

    fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        if self.emit(SpeechEvent::Ended).is_err() {
            tracing::debug!("speech event channel closed before stop");
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
