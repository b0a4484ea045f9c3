//! Interactive navigator loop
//!
//! Runs one session on a current-thread runtime. Three sources feed it:
//! stdin lines (controls and typed recognizer results), lifecycle events
//! from the recognizer, and the status board's clear deadline.

use std::time::Instant;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};

use crate::commands::{CommandContext, Execute};
use crate::error::{NavigatorError, Result};
use crate::output::ConsoleView;
use crate::session::{NavigatorSession, SessionSettings};
use crate::speech::{LineRecognizer, SpeechCapability, SpeechErrorCode, SpeechEvent};
use crate::status::{ERROR_CLEAR_DELAY, StatusKind, StatusMessage, StatusView};
use crate::surface::{NavigableSurface, PageDirection};
use crate::types::ScrollDirection;

pub struct ListenCommand {
    pub relay: bool,
    pub dry_run: bool,
    pub url: Option<String>,
    pub autostart: bool,
}

impl ListenCommand {
    pub fn new(relay: bool, dry_run: bool, url: Option<String>, autostart: bool) -> Self {
        Self {
            relay,
            dry_run,
            url,
            autostart,
        }
    }

    async fn run(&self, ctx: &CommandContext) -> Result<()> {
        let (events_tx, mut events_rx) = unbounded_channel();

        let mut settings = SessionSettings::from(&ctx.config);
        settings.relay_base = ctx.relay(self.relay);

        let mut session = NavigatorSession::new(
            settings,
            LineRecognizer::new(events_tx),
            ctx.surface(self.dry_run),
            ConsoleView::new(ctx.formatter),
        );
        tracing::info!(variant = %session.variant(), "navigator session started");

        if let Some(url) = &self.url {
            session.set_url_input(url.clone());
            session.open_input();
        }
        if self.autostart {
            session.toggle_listening();
        }

        let lines = BufReader::new(tokio::io::stdin()).lines();
        drive(&mut session, &mut events_rx, lines).await?;

        tracing::info!(visited = session.history().len(), "navigator session ended");
        Ok(())
    }
}

/// Feed the session until `:quit` or end of input
///
/// Recognizer events are polled first, so a `Started` queued by `:listen`
/// is seen before the next input line.
async fn drive<S, N, R>(
    session: &mut NavigatorSession<S, N, ConsoleView>,
    events_rx: &mut UnboundedReceiver<SpeechEvent>,
    mut lines: Lines<R>,
) -> Result<()>
where
    S: SpeechCapability,
    N: NavigableSurface,
    R: AsyncBufRead + Unpin,
{
    loop {
        let deadline = session.view().deadline();
        let clear_at = tokio::time::Instant::from_std(deadline.unwrap_or_else(Instant::now));

        tokio::select! {
            biased;

            Some(event) = events_rx.recv() => {
                session.handle_speech(event);
            }
            line = lines.next_line() => {
                let Some(line) = line? else { return Ok(()) };
                match parse_line(&line) {
                    Ok(Some(Input::Quit)) => return Ok(()),
                    Ok(Some(input)) => apply(session, input),
                    Ok(None) => {}
                    Err(err) => session.view_mut().post(StatusMessage::new(
                        StatusKind::Error,
                        err.to_string(),
                        ERROR_CLEAR_DELAY,
                    )),
                }
            }
            _ = tokio::time::sleep_until(clear_at), if deadline.is_some() => {
                session.view_mut().clear_expired(Instant::now());
            }
        }
    }
}

impl Execute for ListenCommand {
    fn execute(&self, ctx: &CommandContext) -> Result<()> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        runtime.block_on(self.run(ctx))
    }
}

// =============================================================================
// Input
// =============================================================================

/// One line of listen input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Speech(SpeechEvent),
    Open(Option<String>),
    Back,
    Forward,
    Home,
    Page(PageDirection),
    Scroll(ScrollDirection),
    ToggleListening,
    Quit,
}

/// Parse a stdin line. Blank lines yield `None`.
pub fn parse_line(line: &str) -> Result<Option<Input>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    if let Some(text) = line.strip_prefix('?') {
        return Ok(Some(Input::Speech(SpeechEvent::Interim(text.trim().to_string()))));
    }

    if let Some(code) = line.strip_prefix('!') {
        return Ok(Some(Input::Speech(SpeechEvent::Error(SpeechErrorCode::parse(
            code,
        )))));
    }

    let Some(control) = line.strip_prefix(':') else {
        return Ok(Some(Input::Speech(SpeechEvent::Final(line.to_string()))));
    };

    let mut parts = control.splitn(2, char::is_whitespace);
    let name = parts.next().unwrap_or_default();
    let argument = parts.next().map(str::trim).filter(|arg| !arg.is_empty());

    let input = match (name, argument) {
        ("open" | "o", url) => Input::Open(url.map(str::to_string)),
        ("back" | "b", None) => Input::Back,
        ("forward" | "f", None) => Input::Forward,
        ("home", None) => Input::Home,
        ("next" | "n", None) => Input::Page(PageDirection::Next),
        ("prev" | "p", None) => Input::Page(PageDirection::Previous),
        ("scroll", Some(direction)) => Input::Scroll(direction.parse()?),
        ("listen" | "l", None) => Input::ToggleListening,
        ("quit" | "q" | "exit", None) => Input::Quit,
        _ => {
            return Err(NavigatorError::InvalidArguments(format!(
                "unknown control ':{}'",
                control
            )));
        }
    };
    Ok(Some(input))
}

fn apply<S, N, V>(session: &mut NavigatorSession<S, N, V>, input: Input)
where
    S: SpeechCapability,
    N: NavigableSurface,
    V: StatusView,
{
    match input {
        Input::Speech(event) => {
            // a stopped recognizer produces nothing
            if !session.is_listening() {
                tracing::debug!(?event, "recognition is off, dropping speech input");
                session.view_mut().post(StatusMessage::new(
                    StatusKind::Error,
                    "音声認識OFF - :listen で開始してください",
                    ERROR_CLEAR_DELAY,
                ));
                return;
            }
            session.handle_speech(event);
        }
        Input::Open(url) => {
            if let Some(url) = url {
                session.set_url_input(url);
            }
            session.open_input();
        }
        Input::Back => session.go_back(),
        Input::Forward => session.go_forward(),
        Input::Home => session.go_home(),
        Input::Page(direction) => session.turn_page(direction),
        Input::Scroll(direction) => session.scroll(direction),
        Input::ToggleListening => session.toggle_listening(),
        Input::Quit => {}
    }
}

// =============================================================================
// Tests
// =============================================================================
