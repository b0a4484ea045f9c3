//! Command implementations for the voicenav CLI
//!
//! Each command module handles:
//! - Building what it needs from the configuration
//! - Talking to the surface or running the session
//! - Printing through the output formatter

pub mod interpret;
pub mod listen;
pub mod open;
pub mod ping;
pub mod vocabulary;

pub use interpret::InterpretCommand;
pub use listen::ListenCommand;
pub use open::OpenCommand;
pub use ping::PingCommand;
pub use vocabulary::VocabularyCommand;

use crate::config::Config;
use crate::error::Result;
use crate::ipc::IpcClient;
use crate::output::OutputFormatter;
use crate::surface::{DryRunSurface, IpcSurface, NavigableSurface};

pub trait Execute {
    fn execute(&self, ctx: &CommandContext) -> Result<()>;
}

pub struct CommandContext {
    pub config: Config,
    pub formatter: OutputFormatter,
}

impl CommandContext {
    pub fn new(config: Config, formatter: OutputFormatter) -> Self {
        Self { config, formatter }
    }

    /// Surface to drive: the daemon, or a logging stand-in for dry runs
    pub fn surface(&self, dry_run: bool) -> Box<dyn NavigableSurface> {
        if dry_run {
            Box::new(DryRunSurface::new())
        } else {
            let client = IpcClient::new(self.config.clone());
            Box::new(IpcSurface::new(client, self.config.session.clone()))
        }
    }

    /// Relay base for loads, with `--relay` forcing it on
    pub fn relay(&self, force: bool) -> Option<String> {
        if force {
            Some(self.config.relay_base.clone())
        } else {
            self.config.relay().map(str::to_string)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;

    fn context(config: Config) -> CommandContext {
        CommandContext::new(config, OutputFormatter::new(OutputFormat::Quiet))
    }

    #[test]
    fn relay_flag_overrides_disabled_config() {
        let ctx = context(Config::default());
        assert_eq!(ctx.relay(false), None);
        assert_eq!(
            ctx.relay(true).as_deref(),
            Some(crate::destination::DEFAULT_RELAY_BASE)
        );
    }

    #[test]
    fn relay_follows_config_when_enabled() {
        let ctx = context(Config {
            use_relay: true,
            relay_base: "https://relay.example/raw".to_string(),
            ..Default::default()
        });
        assert_eq!(ctx.relay(false).as_deref(), Some("https://relay.example/raw"));
    }

    #[test]
    fn dry_run_surface_accepts_loads() {
        let ctx = context(Config::default());
        let mut surface = ctx.surface(true);
        assert!(surface.load("https://example.com").is_ok());
    }
}
