//! voicenav library
//!
//! Exposes the navigator as a library so the session, interpreter and
//! history can be driven programmatically and tested without a terminal.

pub mod cli;
pub mod commands;
pub mod config;
pub mod destination;
pub mod error;
pub mod history;
pub mod interpreter;
pub mod ipc;
pub mod output;
pub mod session;
pub mod speech;
pub mod status;
pub mod surface;
pub mod types;

// Re-exports for convenience
pub use cli::{Cli, Commands};
pub use config::Config;
pub use error::{NavigatorError, Result};
pub use history::{NavigationHistory, NavigationState};
pub use interpreter::{CommandInterpreter, Intent, Variant};
pub use ipc::IpcClient;
pub use output::{OutputFormat, OutputFormatter};
pub use session::{NavigatorSession, SessionSettings};

use commands::{CommandContext, Execute};

// =============================================================================
// Main Entry Point
// =============================================================================

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    let mut config = config::load_config();
    if let Some(session) = cli.session {
        config.session = session;
    }
    if let Some(variant) = cli.variant {
        config.variant = variant;
    }
    tracing::debug!(?config, "configuration loaded");

    let ctx = CommandContext::new(config, OutputFormatter::new(cli.output));

    match cli.command {
        Commands::Interpret(args) => commands::InterpretCommand::new(args.text).execute(&ctx),
        Commands::Vocabulary => commands::VocabularyCommand::default().execute(&ctx),
        Commands::Listen(args) => commands::ListenCommand::new(
            args.surface.relay,
            args.surface.dry_run,
            args.url,
            !args.no_autostart,
        )
        .execute(&ctx),
        Commands::Open(args) => {
            commands::OpenCommand::new(args.url, args.surface.relay, args.surface.dry_run)
                .execute(&ctx)
        }
        Commands::Ping => commands::PingCommand::default().execute(&ctx),
    }
}
