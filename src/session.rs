//! Navigator session
//!
//! One session owns the history and the interpreter and is handed its
//! collaborators (recognizer, surface, view) at construction. All handlers
//! are synchronous and are called from a single event loop.

use std::time::Duration;

use crate::config::Config;
use crate::destination;
use crate::error::NavigatorError;
use crate::history::NavigationHistory;
use crate::interpreter::{CommandInterpreter, Intent, Variant};
use crate::speech::{SpeechCapability, SpeechEvent, SpeechSettings};
use crate::status::{
    ERROR_CLEAR_DELAY, MESSAGE_CLEAR_DELAY, StatusKind, StatusMessage, StatusView,
};
use crate::surface::{DispatchOutcome, NavigableSurface, PageDirection, SurfaceAction};
use crate::types::ScrollDirection;

/// Knobs a session needs from the configuration
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub variant: Variant,
    /// Relay base when loads should go through the relay
    pub relay_base: Option<String>,
    pub speech: SpeechSettings,
    pub scroll_amount: u32,
    pub message_clear: Duration,
    pub error_clear: Duration,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for SessionSettings {
    fn from(config: &Config) -> Self {
        Self {
            variant: config.variant,
            relay_base: config.relay().map(str::to_string),
            speech: config.speech.clone(),
            scroll_amount: config.scroll_amount,
            message_clear: MESSAGE_CLEAR_DELAY,
            error_clear: ERROR_CLEAR_DELAY,
        }
    }
}

pub struct NavigatorSession<S, N, V> {
    settings: SessionSettings,
    interpreter: CommandInterpreter,
    history: NavigationHistory,
    /// `None` once the recognizer was found unavailable
    speech: Option<S>,
    surface: N,
    view: V,
    listening: bool,
    url_input: String,
}

impl<S, N, V> NavigatorSession<S, N, V>
where
    S: SpeechCapability,
    N: NavigableSurface,
    V: StatusView,
{
    pub fn new(settings: SessionSettings, speech: S, surface: N, view: V) -> Self {
        let mut session = Self {
            interpreter: CommandInterpreter::new(settings.variant),
            settings,
            history: NavigationHistory::new(),
            speech: None,
            surface,
            view,
            listening: false,
            url_input: String::new(),
        };

        match speech.availability() {
            Ok(()) => session.speech = Some(speech),
            Err(reason) => {
                tracing::warn!(%reason, "speech recognition unavailable");
                session.error(reason.to_string());
            }
        }

        session.view.navigation_changed(&session.history.state());
        session
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn variant(&self) -> Variant {
        self.settings.variant
    }

    pub fn history(&self) -> &NavigationHistory {
        &self.history
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    pub fn speech_available(&self) -> bool {
        self.speech.is_some()
    }

    pub fn url_input(&self) -> &str {
        &self.url_input
    }

    pub fn surface(&self) -> &N {
        &self.surface
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    // -------------------------------------------------------------------------
    // Speech
    // -------------------------------------------------------------------------

    pub fn toggle_listening(&mut self) {
        let Some(speech) = self.speech.as_mut() else {
            self.error("音声認識が利用できません");
            return;
        };

        if self.listening {
            tracing::debug!("stopping recognition");
            speech.stop();
            return;
        }

        tracing::debug!(language = %self.settings.speech.language, "starting recognition");
        if let Err(err) = speech.start(&self.settings.speech) {
            tracing::warn!(%err, "recognition failed to start");
            self.error(format!("音声認識開始エラー: {}", err));
        }
    }

    /// Handle one recognizer event; returns the intent a final result produced
    pub fn handle_speech(&mut self, event: SpeechEvent) -> Option<Intent> {
        match event {
            SpeechEvent::Started => {
                self.listening = true;
                self.view.listening_changed(true);
                None
            }
            SpeechEvent::Ended => {
                self.listening = false;
                self.view.listening_changed(false);
                None
            }
            SpeechEvent::Interim(text) => {
                tracing::trace!(%text, "interim result");
                None
            }
            SpeechEvent::Final(text) => self.handle_transcript(&text),
            SpeechEvent::Error(code) => {
                tracing::warn!(?code, "speech recognition error");
                self.error(code.user_message());
                None
            }
        }
    }

    fn handle_transcript(&mut self, text: &str) -> Option<Intent> {
        if text.trim().is_empty() {
            return None;
        }

        self.post(StatusKind::Transcript, text, self.settings.error_clear);

        let intent = self.interpreter.interpret(text);
        tracing::info!(transcript = %text, ?intent, "voice command");
        if let Some(intent) = intent {
            self.execute(intent);
        }
        intent
    }

    // -------------------------------------------------------------------------
    // Intents
    // -------------------------------------------------------------------------

    pub fn execute(&mut self, intent: Intent) {
        let pages_walk_history = self.settings.variant.pages_walk_history();
        match intent {
            Intent::PageForward if pages_walk_history => self.go_forward(),
            Intent::PageBack if pages_walk_history => self.go_back(),
            Intent::PageForward => self.turn_page(PageDirection::Next),
            Intent::PageBack => self.turn_page(PageDirection::Previous),
            Intent::ScrollDown => self.scroll(ScrollDirection::Down),
            Intent::ScrollUp => self.scroll(ScrollDirection::Up),
            Intent::OpenUrl => self.open_input(),
            Intent::GoHome => self.go_home(),
        }
    }

    // -------------------------------------------------------------------------
    // Navigation
    // -------------------------------------------------------------------------

    pub fn set_url_input(&mut self, text: impl Into<String>) {
        self.url_input = text.into();
    }

    /// Load whatever is in the URL input
    pub fn open_input(&mut self) {
        if self.url_input.trim().is_empty() {
            self.error("URLを入力してください");
            return;
        }

        let url = match destination::prepare(&self.url_input) {
            Ok(url) => url,
            Err(err) => {
                self.error(err.to_string());
                return;
            }
        };

        // history keeps the address the user asked for, not the relayed one
        self.history.visit(url.clone());
        self.url_input = url.clone();
        self.view.navigation_changed(&self.history.state());
        self.load(&url);
    }

    pub fn go_back(&mut self) {
        match self.history.back().map(str::to_string) {
            Some(url) => {
                if self.arrive(url) {
                    self.info("前のページに移動しました");
                }
            }
            None => self.info("これ以上戻れません"),
        }
    }

    pub fn go_forward(&mut self) {
        match self.history.forward().map(str::to_string) {
            Some(url) => {
                if self.arrive(url) {
                    self.info("次のページに移動しました");
                }
            }
            None => self.info("これ以上進めません"),
        }
    }

    /// Load the variant's home page; history is left alone
    pub fn go_home(&mut self) {
        let home = self.settings.variant.home_destination();
        if self.settings.variant.pages_walk_history() {
            self.url_input.clear();
        }
        if !self.load(home) {
            return;
        }
        self.info(match self.settings.variant {
            Variant::Kindle => "Kindleライブラリ",
            Variant::Navigator | Variant::Scroll => "ホームに戻りました",
        });
    }

    fn arrive(&mut self, url: String) -> bool {
        self.view.navigation_changed(&self.history.state());
        let loaded = self.load(&url);
        self.url_input = url;
        loaded
    }

    /// Returns whether the surface took the destination; failures are already posted
    fn load(&mut self, url: &str) -> bool {
        let target = match destination::resolve(url, self.settings.relay_base.as_deref()) {
            Ok(target) => target,
            Err(err) => {
                self.error(err.to_string());
                return false;
            }
        };

        tracing::info!(%url, %target, "loading destination");
        match self.surface.load(&target) {
            Ok(()) => {
                self.on_surface_loaded();
                true
            }
            Err(err) => {
                self.on_surface_failed(&err);
                false
            }
        }
    }

    pub fn on_surface_loaded(&mut self) {
        self.view.navigation_changed(&self.history.state());
    }

    pub fn on_surface_failed(&mut self, err: &NavigatorError) {
        tracing::warn!(%err, "surface failed to load");
        let hint = if self.settings.relay_base.is_some() {
            ""
        } else {
            "。埋め込み表示を許可していないサイトの可能性があります。プロキシモードを試してください"
        };
        self.error(format!("URLの読み込みに失敗しました: {}{}", err, hint));
    }

    // -------------------------------------------------------------------------
    // Best-effort surface actions
    // -------------------------------------------------------------------------

    pub fn turn_page(&mut self, direction: PageDirection) {
        let label = match direction {
            PageDirection::Next => "次のページ",
            PageDirection::Previous => "前のページ",
        };
        let outcome = self.surface.send(&SurfaceAction::TurnPage(direction));
        self.report(label, outcome);
    }

    pub fn scroll(&mut self, direction: ScrollDirection) {
        let action = SurfaceAction::Scroll {
            direction,
            amount: self.settings.scroll_amount,
        };
        let label = match direction {
            ScrollDirection::Down => "下スクロール",
            ScrollDirection::Up => "上スクロール",
        };
        let outcome = self.surface.send(&action);
        self.report(label, outcome);
    }

    fn report(&mut self, label: &str, outcome: DispatchOutcome) {
        match outcome {
            DispatchOutcome::Issued { strategy } => {
                self.info(format!("{}を送信しました ({})", label, strategy))
            }
            DispatchOutcome::Undeliverable => self.error(format!(
                "{}操作に失敗しました。ページがスクリプトからの操作を受け付けません",
                label
            )),
        }
    }

    // -------------------------------------------------------------------------
    // Status
    // -------------------------------------------------------------------------

    fn info(&mut self, text: impl Into<String>) {
        self.post(StatusKind::Info, text, self.settings.message_clear);
    }

    fn error(&mut self, text: impl Into<String>) {
        self.post(StatusKind::Error, text, self.settings.error_clear);
    }

    fn post(&mut self, kind: StatusKind, text: impl Into<String>, clear_after: Duration) {
        self.view.post(StatusMessage::new(kind, text, clear_after));
    }
}

// =============================================================================
// Tests
// =============================================================================
