//! Output formatting for voicenav
//!
//! Renders status messages, interpretations and vocabularies for the
//! terminal, either human-readable or as JSON.

use std::time::Instant;

use clap::ValueEnum;
use serde_json::json;

use crate::error::Result;
use crate::history::NavigationState;
use crate::interpreter::{Interpretation, Variant, Vocabulary};
use crate::status::{StatusBoard, StatusKind, StatusMessage, StatusView};

// =============================================================================
// Output Format
// =============================================================================

/// Supported output formats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output for scripting
    Json,
    /// Quiet mode - errors only
    Quiet,
}

// =============================================================================
// Output Formatter
// =============================================================================

#[derive(Debug, Clone, Copy)]
pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Print a status message; errors go to stderr
    pub fn print_status(&self, message: &StatusMessage) {
        let output = self.format_status(message);
        if output.is_empty() {
            return;
        }
        match message.kind {
            StatusKind::Error => print_error(&output),
            StatusKind::Info | StatusKind::Transcript => print_success(&output),
        }
    }

    fn format_status(&self, message: &StatusMessage) -> String {
        match self.format {
            OutputFormat::Human => match message.kind {
                StatusKind::Info => format!("メッセージ: {}", message.text),
                StatusKind::Error => format!("エラー: {}", message.text),
                StatusKind::Transcript => format!("認識結果: {}", message.text),
            },
            OutputFormat::Json => json!({"event": "status", "status": message}).to_string(),
            OutputFormat::Quiet => match message.kind {
                StatusKind::Error => message.text.clone(),
                StatusKind::Info | StatusKind::Transcript => String::new(),
            },
        }
    }

    pub fn format_navigation(&self, state: &NavigationState) -> String {
        match self.format {
            OutputFormat::Human => format!(
                "[{}back] [{}forward] {}",
                if state.can_go_back { "" } else { "no " },
                if state.can_go_forward { "" } else { "no " },
                state.current.as_deref().unwrap_or("-")
            ),
            OutputFormat::Json => json!({"event": "navigation", "navigation": state}).to_string(),
            OutputFormat::Quiet => String::new(),
        }
    }

    pub fn format_listening(&self, listening: bool) -> String {
        match self.format {
            OutputFormat::Human => {
                if listening {
                    "音声認識中...".to_string()
                } else {
                    "音声認識OFF".to_string()
                }
            }
            OutputFormat::Json => json!({"event": "listening", "listening": listening}).to_string(),
            OutputFormat::Quiet => String::new(),
        }
    }

    /// Line shown once a status message has expired
    pub fn format_cleared(&self) -> String {
        match self.format {
            OutputFormat::Human => "認識結果: ".to_string(),
            OutputFormat::Json => json!({"event": "cleared"}).to_string(),
            OutputFormat::Quiet => String::new(),
        }
    }

    pub fn format_interpretation(&self, report: &Interpretation) -> Result<String> {
        Ok(match self.format {
            OutputFormat::Human => match (&report.intent, &report.trigger) {
                (Some(intent), Some(trigger)) => format!("{} (matched \"{}\")", intent, trigger),
                _ => "no command recognized".to_string(),
            },
            OutputFormat::Json => serde_json::to_string(report)?,
            OutputFormat::Quiet => report
                .intent
                .map(|intent| intent.to_string())
                .unwrap_or_default(),
        })
    }

    pub fn format_vocabulary(&self, variant: Variant, vocabulary: &Vocabulary) -> Result<String> {
        Ok(match self.format {
            OutputFormat::Human => {
                let mut output = format!(
                    "Vocabulary for the {} variant (highest priority first):\n\n",
                    variant
                );
                for entry in vocabulary.entries() {
                    output.push_str(&format!(
                        "  {:<14} {}\n",
                        entry.intent.to_string(),
                        entry.triggers.join(", ")
                    ));
                }
                output
            }
            OutputFormat::Json => serde_json::to_string_pretty(&json!({
                "variant": variant,
                "entries": vocabulary.entries(),
            }))?,
            OutputFormat::Quiet => String::new(),
        })
    }
}

// =============================================================================
// Console View
// =============================================================================

/// Terminal rendition of the status channel
pub struct ConsoleView {
    formatter: OutputFormatter,
    board: StatusBoard,
}

impl ConsoleView {
    pub fn new(formatter: OutputFormatter) -> Self {
        Self {
            formatter,
            board: StatusBoard::new(),
        }
    }

    pub fn current(&self) -> Option<&StatusMessage> {
        self.board.current()
    }

    /// When the visible message is due to be cleared
    pub fn deadline(&self) -> Option<Instant> {
        self.board.deadline()
    }

    pub fn clear_expired(&mut self, now: Instant) {
        if self.board.expire(now).is_some() {
            print_line(&self.formatter.format_cleared());
        }
    }
}

impl StatusView for ConsoleView {
    fn post(&mut self, message: StatusMessage) {
        self.formatter.print_status(&message);
        self.board.post(message, Instant::now());
    }

    fn navigation_changed(&mut self, state: &NavigationState) {
        print_line(&self.formatter.format_navigation(state));
    }

    fn listening_changed(&mut self, listening: bool) {
        print_line(&self.formatter.format_listening(listening));
    }
}

fn print_line(line: &str) {
    if !line.is_empty() {
        print_success(line);
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Print a success message to stdout
pub fn print_success(message: &str) {
    println!("{}", message);
}

/// Print an error message to stderr
pub fn print_error(message: &str) {
    eprintln!("{}", message);
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::{CommandInterpreter, Intent};
    use crate::status::{ERROR_CLEAR_DELAY, MESSAGE_CLEAR_DELAY};

    fn message(kind: StatusKind, text: &str) -> StatusMessage {
        StatusMessage::new(kind, text, MESSAGE_CLEAR_DELAY)
    }

    #[test]
    fn output_formatter_new_stores_format() {
        let formatter = OutputFormatter::new(OutputFormat::Json);
        assert_eq!(formatter.format(), OutputFormat::Json);
    }

    #[test]
    fn format_status_human_prefixes_by_kind() {
        let formatter = OutputFormatter::new(OutputFormat::Human);
        assert_eq!(
            formatter.format_status(&message(StatusKind::Info, "次のページ")),
            "メッセージ: 次のページ"
        );
        assert_eq!(
            formatter.format_status(&message(StatusKind::Error, "No speech")),
            "エラー: No speech"
        );
        assert_eq!(
            formatter.format_status(&message(StatusKind::Transcript, "次")),
            "認識結果: 次"
        );
    }

    #[test]
    fn format_status_json_includes_kind_and_delay() {
        let formatter = OutputFormatter::new(OutputFormat::Json);
        let output = formatter.format_status(&StatusMessage::new(
            StatusKind::Error,
            "boom",
            ERROR_CLEAR_DELAY,
        ));
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["event"], "status");
        assert_eq!(value["status"]["kind"], "error");
        assert_eq!(value["status"]["text"], "boom");
        assert_eq!(value["status"]["clear_after"], 3000);
    }

    #[test]
    fn format_status_quiet_keeps_only_errors() {
        let formatter = OutputFormatter::new(OutputFormat::Quiet);
        assert_eq!(formatter.format_status(&message(StatusKind::Info, "x")), "");
        assert_eq!(
            formatter.format_status(&message(StatusKind::Error, "bad")),
            "bad"
        );
    }

    #[test]
    fn format_navigation_human_shows_availability() {
        let formatter = OutputFormatter::new(OutputFormat::Human);
        let state = NavigationState {
            can_go_back: true,
            can_go_forward: false,
            current: Some("https://example.com".to_string()),
        };
        assert_eq!(
            formatter.format_navigation(&state),
            "[back] [no forward] https://example.com"
        );
    }

    #[test]
    fn format_interpretation_human_names_intent_and_trigger() {
        let formatter = OutputFormatter::new(OutputFormat::Human);
        let report = CommandInterpreter::new(Variant::Kindle).interpretation("次のページ");
        assert_eq!(
            formatter.format_interpretation(&report).unwrap(),
            "page_forward (matched \"次のページ\")"
        );
    }

    #[test]
    fn format_interpretation_json_round_trips_fields() {
        let formatter = OutputFormatter::new(OutputFormat::Json);
        let report = CommandInterpreter::new(Variant::Navigator).interpretation("Home");
        let value: serde_json::Value =
            serde_json::from_str(&formatter.format_interpretation(&report).unwrap()).unwrap();
        assert_eq!(value["intent"], "go_home");
        assert_eq!(value["normalized"], "home");
    }

    #[test]
    fn format_interpretation_without_match() {
        let formatter = OutputFormatter::new(OutputFormat::Human);
        let report = CommandInterpreter::new(Variant::Navigator).interpretation("");
        assert_eq!(
            formatter.format_interpretation(&report).unwrap(),
            "no command recognized"
        );
        let quiet = OutputFormatter::new(OutputFormat::Quiet);
        assert_eq!(quiet.format_interpretation(&report).unwrap(), "");
    }

    #[test]
    fn console_view_keeps_newest_message_until_deadline() {
        let mut view = ConsoleView::new(OutputFormatter::new(OutputFormat::Quiet));
        view.post(message(StatusKind::Info, "first"));
        view.post(message(StatusKind::Info, "second"));
        assert_eq!(view.current().map(|m| m.text.as_str()), Some("second"));

        let deadline = view.deadline().unwrap();
        view.clear_expired(deadline);
        assert!(view.current().is_none());
    }

    #[test]
    fn format_vocabulary_lists_intents_in_priority_order() {
        let formatter = OutputFormatter::new(OutputFormat::Human);
        let vocabulary = Vocabulary::for_variant(Variant::Scroll);
        let output = formatter
            .format_vocabulary(Variant::Scroll, &vocabulary)
            .unwrap();

        let forward = output.find(&Intent::PageForward.to_string()).unwrap();
        let scroll = output.find(&Intent::ScrollDown.to_string()).unwrap();
        let home = output.find(&Intent::GoHome.to_string()).unwrap();
        assert!(forward < scroll && scroll < home);
        assert!(output.contains("スクロールダウン"));
    }
}
