//! Navigable content surface
//!
//! Loading a destination is a request with a definite answer. Scrolling and
//! page turns are not: the page may refuse scripted input, so those actions
//! go through [`BestEffortDispatch`], which walks an ordered list of delivery
//! strategies and stops at the first one that accepts.

use serde::Serialize;

use crate::error::{NavigatorError, Result};
use crate::ipc::IpcClient;
use crate::types::{CommandType, NavigatePayload, PressPayload, ScrollDirection, ScrollPayload};

// =============================================================================
// Actions
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageDirection {
    Next,
    Previous,
}

/// Best-effort instruction for the surface
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceAction {
    Scroll {
        direction: ScrollDirection,
        amount: u32,
    },
    TurnPage(PageDirection),
}

/// Answer of a single strategy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Accepted,
    Declined(String),
}

/// Result of trying every strategy
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchOutcome {
    /// Some strategy accepted; nothing confirms the page actually moved
    Issued { strategy: &'static str },
    Undeliverable,
}

// =============================================================================
// Traits
// =============================================================================

pub trait NavigableSurface {
    /// Display `destination`
    fn load(&mut self, destination: &str) -> Result<()>;

    fn send(&mut self, action: &SurfaceAction) -> DispatchOutcome;
}

impl<T: NavigableSurface + ?Sized> NavigableSurface for Box<T> {
    fn load(&mut self, destination: &str) -> Result<()> {
        (**self).load(destination)
    }

    fn send(&mut self, action: &SurfaceAction) -> DispatchOutcome {
        (**self).send(action)
    }
}

/// One way of getting an action to the surface
pub trait DeliveryStrategy {
    fn name(&self) -> &'static str;

    fn deliver(&mut self, action: &SurfaceAction) -> Delivery;
}

// =============================================================================
// Best-effort dispatch
// =============================================================================

#[derive(Default)]
pub struct BestEffortDispatch {
    strategies: Vec<Box<dyn DeliveryStrategy>>,
}

impl BestEffortDispatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a strategy; strategies are tried in insertion order
    pub fn with(mut self, strategy: impl DeliveryStrategy + 'static) -> Self {
        self.strategies.push(Box::new(strategy));
        self
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    pub fn dispatch(&mut self, action: &SurfaceAction) -> DispatchOutcome {
        for strategy in &mut self.strategies {
            match strategy.deliver(action) {
                Delivery::Accepted => {
                    tracing::debug!(strategy = strategy.name(), ?action, "action accepted");
                    return DispatchOutcome::Issued {
                        strategy: strategy.name(),
                    };
                }
                Delivery::Declined(reason) => {
                    tracing::debug!(strategy = strategy.name(), %reason, "action declined");
                }
            }
        }

        tracing::warn!(?action, "no delivery strategy accepted the action");
        DispatchOutcome::Undeliverable
    }
}

// =============================================================================
// IPC-backed surface
// =============================================================================

/// Issues the surface's own scroll command, and arrow keys for page turns
pub struct DirectCommand {
    client: IpcClient,
    session_id: String,
}

impl DirectCommand {
    pub fn new(client: IpcClient, session_id: impl Into<String>) -> Self {
        Self {
            client,
            session_id: session_id.into(),
        }
    }
}

impl DeliveryStrategy for DirectCommand {
    fn name(&self) -> &'static str {
        "direct"
    }

    fn deliver(&mut self, action: &SurfaceAction) -> Delivery {
        let (command_type, payload) = match action {
            SurfaceAction::Scroll { direction, amount } => (
                CommandType::Scroll,
                serde_json::to_value(ScrollPayload {
                    direction: *direction,
                    amount: *amount,
                }),
            ),
            SurfaceAction::TurnPage(direction) => {
                let key = match direction {
                    PageDirection::Next => "ArrowRight",
                    PageDirection::Previous => "ArrowLeft",
                };
                (CommandType::Press, press_payload(key))
            }
        };
        send(&self.client, &self.session_id, command_type, payload)
    }
}

/// Falls back to paging keys the page handles natively
pub struct KeyFallback {
    client: IpcClient,
    session_id: String,
}

impl KeyFallback {
    pub fn new(client: IpcClient, session_id: impl Into<String>) -> Self {
        Self {
            client,
            session_id: session_id.into(),
        }
    }
}

impl DeliveryStrategy for KeyFallback {
    fn name(&self) -> &'static str {
        "key"
    }

    fn deliver(&mut self, action: &SurfaceAction) -> Delivery {
        let key = match action {
            SurfaceAction::Scroll {
                direction: ScrollDirection::Down,
                ..
            } => "PageDown",
            SurfaceAction::Scroll {
                direction: ScrollDirection::Up,
                ..
            } => "PageUp",
            SurfaceAction::TurnPage(PageDirection::Next) => "Space",
            SurfaceAction::TurnPage(PageDirection::Previous) => "Backspace",
        };
        send(
            &self.client,
            &self.session_id,
            CommandType::Press,
            press_payload(key),
        )
    }
}

fn press_payload(key: &str) -> serde_json::Result<serde_json::Value> {
    serde_json::to_value(PressPayload {
        key: key.to_string(),
    })
}

fn send(
    client: &IpcClient,
    session_id: &str,
    command_type: CommandType,
    payload: serde_json::Result<serde_json::Value>,
) -> Delivery {
    let payload = match payload {
        Ok(payload) => payload,
        Err(err) => return Delivery::Declined(err.to_string()),
    };

    match client.execute(session_id, command_type, payload) {
        Ok(response) if response.success => Delivery::Accepted,
        Ok(response) => Delivery::Declined(
            response
                .error
                .unwrap_or_else(|| "surface refused the command".to_string()),
        ),
        Err(err) => Delivery::Declined(err.to_string()),
    }
}

/// Surface driven through the browser daemon
pub struct IpcSurface {
    client: IpcClient,
    session_id: String,
    dispatch: BestEffortDispatch,
}

impl IpcSurface {
    /// Surface with the default strategy order: direct command, then keys
    pub fn new(client: IpcClient, session_id: impl Into<String>) -> Self {
        let session_id = session_id.into();
        let dispatch = BestEffortDispatch::new()
            .with(DirectCommand::new(client.clone(), session_id.clone()))
            .with(KeyFallback::new(client.clone(), session_id.clone()));
        Self::with_dispatch(client, session_id, dispatch)
    }

    pub fn with_dispatch(
        client: IpcClient,
        session_id: impl Into<String>,
        dispatch: BestEffortDispatch,
    ) -> Self {
        Self {
            client,
            session_id: session_id.into(),
            dispatch,
        }
    }
}

impl NavigableSurface for IpcSurface {
    fn load(&mut self, destination: &str) -> Result<()> {
        let payload = serde_json::to_value(NavigatePayload {
            url: destination.to_string(),
        })?;
        let response = self
            .client
            .execute(&self.session_id, CommandType::Navigate, payload)?;

        if response.success {
            Ok(())
        } else {
            Err(NavigatorError::CommandFailed(
                response
                    .error
                    .unwrap_or_else(|| "Unknown error".to_string()),
            ))
        }
    }

    fn send(&mut self, action: &SurfaceAction) -> DispatchOutcome {
        self.dispatch.dispatch(action)
    }
}

// =============================================================================
// Dry-run surface
// =============================================================================

/// Logs every request and accepts it; for running without a daemon
#[derive(Debug, Default)]
pub struct DryRunSurface {
    loaded: Vec<String>,
}

impl DryRunSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn loaded(&self) -> &[String] {
        &self.loaded
    }
}

impl NavigableSurface for DryRunSurface {
    fn load(&mut self, destination: &str) -> Result<()> {
        tracing::info!(%destination, "dry-run load");
        self.loaded.push(destination.to_string());
        Ok(())
    }

    fn send(&mut self, action: &SurfaceAction) -> DispatchOutcome {
        tracing::info!(?action, "dry-run action");
        DispatchOutcome::Issued { strategy: "dry-run" }
    }
}

// =============================================================================
// Tests
// =============================================================================


#[cfg(all(test, unix))]
mod unix_tests {
    use super::*;
    use crate::ipc::unix_tests::{cleanup_socket, serve_commands, test_config, unique_socket_path};
    use serde_json::json;
    use std::os::unix::net::UnixListener;

    #[test]
    fn scroll_falls_back_to_key_press_when_direct_is_refused() {
        let socket_path = unique_socket_path("fallback");
        cleanup_socket(&socket_path);
        let listener = UnixListener::bind(&socket_path).expect("bind listener");

        let handle = serve_commands(listener, 2, |command| {
            let accepted = command["type"] == "press";
            json!({"id": command["id"], "success": accepted, "error": "scroll blocked"})
        });

        let client = IpcClient::new(test_config(&socket_path));
        let mut surface = IpcSurface::new(client, "reader");
        let outcome = surface.send(&SurfaceAction::Scroll {
            direction: ScrollDirection::Down,
            amount: 500,
        });
        assert_eq!(outcome, DispatchOutcome::Issued { strategy: "key" });

        let seen = handle.join().expect("listener thread");
        assert_eq!(seen[0]["type"], "scroll");
        assert_eq!(seen[0]["params"]["direction"], "down");
        assert_eq!(seen[0]["params"]["amount"], 500);
        assert_eq!(seen[1]["type"], "press");
        assert_eq!(seen[1]["params"]["key"], "PageDown");
        cleanup_socket(&socket_path);
    }

    #[test]
    fn page_turn_uses_arrow_key_first() {
        let socket_path = unique_socket_path("page");
        cleanup_socket(&socket_path);
        let listener = UnixListener::bind(&socket_path).expect("bind listener");

        let handle = serve_commands(listener, 1, |command| {
            json!({"id": command["id"], "success": true})
        });

        let client = IpcClient::new(test_config(&socket_path));
        let mut surface = IpcSurface::new(client, "reader");
        let outcome = surface.send(&SurfaceAction::TurnPage(PageDirection::Previous));
        assert_eq!(outcome, DispatchOutcome::Issued { strategy: "direct" });

        let seen = handle.join().expect("listener thread");
        assert_eq!(seen[0]["params"]["key"], "ArrowLeft");
        cleanup_socket(&socket_path);
    }

    #[test]
    fn load_reports_daemon_refusal() {
        let socket_path = unique_socket_path("load");
        cleanup_socket(&socket_path);
        let listener = UnixListener::bind(&socket_path).expect("bind listener");

        let handle = serve_commands(listener, 1, |command| {
            json!({"id": command["id"], "success": false, "error": "refused to connect"})
        });

        let client = IpcClient::new(test_config(&socket_path));
        let mut surface = IpcSurface::new(client, "reader");
        let result = surface.load("https://example.com");
        assert!(matches!(
            result,
            Err(NavigatorError::CommandFailed(ref m)) if m == "refused to connect"
        ));

        let seen = handle.join().expect("listener thread");
        assert_eq!(seen[0]["type"], "navigate");
        cleanup_socket(&socket_path);
    }

    #[test]
    fn unreachable_daemon_makes_action_undeliverable() {
        let socket_path = unique_socket_path("absent");
        let client = IpcClient::new(test_config(&socket_path));
        let mut surface = IpcSurface::new(client, "reader");
        assert_eq!(
            surface.send(&SurfaceAction::TurnPage(PageDirection::Next)),
            DispatchOutcome::Undeliverable
        );
    }
}
