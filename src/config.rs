//! Configuration for voicenav
//!
//! Handles configuration loading from environment variables and defaults.

use std::path::PathBuf;

use crate::destination::DEFAULT_RELAY_BASE;
use crate::interpreter::Variant;
use crate::speech::SpeechSettings;

// =============================================================================
// Constants
// =============================================================================

/// Default Unix socket path of the surface daemon
pub const DEFAULT_IPC_SOCKET_PATH: &str = "/tmp/tab-daemon.sock";

/// Environment variable for custom socket path
pub const ENV_IPC_SOCKET_PATH: &str = "VOICENAV_SOCKET_PATH";

/// Environment variable for the daemon session name
pub const ENV_SESSION_NAME: &str = "VOICENAV_SESSION";

/// Environment variable selecting the interaction variant
pub const ENV_VARIANT: &str = "VOICENAV_VARIANT";

/// Environment variable enabling the content relay
pub const ENV_RELAY: &str = "VOICENAV_RELAY";

/// Environment variable overriding the relay endpoint
pub const ENV_RELAY_BASE: &str = "VOICENAV_RELAY_BASE";

/// Environment variable for the recognition language
pub const ENV_LANGUAGE: &str = "VOICENAV_LANG";

/// Default session name
pub const DEFAULT_SESSION_NAME: &str = "default";

/// Pixels moved by one scroll intent
pub const DEFAULT_SCROLL_AMOUNT: u32 = 500;

// =============================================================================
// Config Struct
// =============================================================================

#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the surface daemon's IPC socket
    pub ipc_socket_path: PathBuf,

    /// Daemon-side session to drive
    pub session: String,

    pub variant: Variant,

    /// Load destinations through the content relay
    pub use_relay: bool,

    pub relay_base: String,

    pub speech: SpeechSettings,

    pub scroll_amount: u32,

    /// Connection timeout in milliseconds
    pub connection_timeout_ms: u64,

    /// Command timeout in milliseconds
    pub command_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ipc_socket_path: PathBuf::from(DEFAULT_IPC_SOCKET_PATH),
            session: DEFAULT_SESSION_NAME.to_string(),
            variant: Variant::default(),
            use_relay: false,
            relay_base: DEFAULT_RELAY_BASE.to_string(),
            speech: SpeechSettings::default(),
            scroll_amount: DEFAULT_SCROLL_AMOUNT,
            connection_timeout_ms: 5000,
            command_timeout_ms: 30000,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(socket_path) = lookup(ENV_IPC_SOCKET_PATH) {
            config.ipc_socket_path = PathBuf::from(socket_path);
        }

        if let Some(session) = lookup(ENV_SESSION_NAME) {
            config.session = session;
        }

        if let Some(variant) = lookup(ENV_VARIANT) {
            match variant.parse() {
                Ok(variant) => config.variant = variant,
                Err(err) => tracing::warn!("ignoring {}: {}", ENV_VARIANT, err),
            }
        }

        if let Some(flag) = lookup(ENV_RELAY) {
            config.use_relay = parse_flag(&flag);
        }

        if let Some(relay_base) = lookup(ENV_RELAY_BASE) {
            config.relay_base = relay_base;
        }

        if let Some(language) = lookup(ENV_LANGUAGE) {
            config.speech.language = language;
        }

        config
    }

    /// Relay base to apply to loads, if the relay is on
    pub fn relay(&self) -> Option<&str> {
        self.use_relay.then_some(self.relay_base.as_str())
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Load the global configuration
pub fn load_config() -> Config {
    Config::from_env()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn default_config_has_correct_values() {
        let config = Config::default();
        assert_eq!(
            config.ipc_socket_path,
            PathBuf::from(DEFAULT_IPC_SOCKET_PATH)
        );
        assert_eq!(config.session, DEFAULT_SESSION_NAME);
        assert_eq!(config.variant, Variant::Navigator);
        assert!(!config.use_relay);
        assert_eq!(config.scroll_amount, 500);
        assert_eq!(config.connection_timeout_ms, 5000);
        assert_eq!(config.command_timeout_ms, 30000);
    }

    #[test]
    fn from_lookup_uses_defaults_when_nothing_set() {
        let config = Config::from_lookup(lookup_from(&[]));
        assert_eq!(config.session, DEFAULT_SESSION_NAME);
        assert_eq!(config.relay_base, DEFAULT_RELAY_BASE);
        assert_eq!(config.speech.language, "ja-JP");
    }

    #[test]
    fn from_lookup_reads_every_variable() {
        let config = Config::from_lookup(lookup_from(&[
            (ENV_IPC_SOCKET_PATH, "/tmp/test-socket.sock"),
            (ENV_SESSION_NAME, "reader"),
            (ENV_VARIANT, "kindle"),
            (ENV_RELAY, "true"),
            (ENV_RELAY_BASE, "https://relay.example/raw"),
            (ENV_LANGUAGE, "en-US"),
        ]));

        assert_eq!(
            config.ipc_socket_path,
            PathBuf::from("/tmp/test-socket.sock")
        );
        assert_eq!(config.session, "reader");
        assert_eq!(config.variant, Variant::Kindle);
        assert!(config.use_relay);
        assert_eq!(config.relay(), Some("https://relay.example/raw"));
        assert_eq!(config.speech.language, "en-US");
    }

    #[test]
    fn from_lookup_ignores_unknown_variant() {
        let config = Config::from_lookup(lookup_from(&[(ENV_VARIANT, "tv-remote")]));
        assert_eq!(config.variant, Variant::Navigator);
    }

    #[test]
    fn relay_is_none_when_disabled() {
        let config = Config::from_lookup(lookup_from(&[(ENV_RELAY, "0")]));
        assert_eq!(config.relay(), None);
    }

    #[test]
    fn parse_flag_accepts_common_truthy_values() {
        assert!(parse_flag("1"));
        assert!(parse_flag("TRUE"));
        assert!(parse_flag(" on "));
        assert!(!parse_flag("off"));
        assert!(!parse_flag(""));
    }
}
