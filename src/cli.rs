//! CLI argument parsing using clap
//!
//! Defines all commands and their arguments.

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::interpreter::Variant;
use crate::output::OutputFormat;

/// voicenav - drive a browser surface with short spoken commands
#[derive(Debug, Parser)]
#[command(name = "voicenav")]
#[command(
    author,
    version,
    about = "Voice-controlled navigator for an embedded browser surface",
    long_about = None,
    after_help = "VARIANTS:\n  navigator   next/back walk the history (default)\n  scroll      next/back scroll the page\n  kindle      next/back turn book pages in the Kindle cloud reader\n\nLISTEN INPUT:\n  <text>            final transcript\n  ?<text>           interim transcript (ignored)\n  !<code>           recognizer error (network, not-allowed, audio-capture, no-speech)\n  :open [URL]       load URL (or the current URL input)\n  :back | :forward  history navigation\n  :home             load the variant's home page\n  :next | :prev     turn a page\n  :scroll up|down   scroll the page\n  :listen           toggle recognition\n  :quit             leave\n\nENVIRONMENT VARIABLES:\n  VOICENAV_SOCKET_PATH   Surface daemon socket\n  VOICENAV_SESSION       Daemon session name\n  VOICENAV_VARIANT       Default variant\n  VOICENAV_RELAY         Load pages through the relay (1/true)\n  VOICENAV_RELAY_BASE    Relay endpoint\n  VOICENAV_LANG          Recognition language (default ja-JP)"
)]
pub struct Cli {
    /// Daemon session name (overrides VOICENAV_SESSION)
    #[arg(short, long, global = true)]
    pub session: Option<String>,

    /// Interaction variant (overrides VOICENAV_VARIANT)
    #[arg(long, global = true, value_enum)]
    pub variant: Option<Variant>,

    /// Output format: human (plain text), json (one object per line), quiet (errors only)
    #[arg(short, long, global = true, value_enum, default_value = "human")]
    pub output: OutputFormat,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show which command a phrase maps to
    #[command(
        long_about = "Show which command a phrase maps to.\n\nEXAMPLES:\n  voicenav interpret 次のページお願い\n  voicenav --variant scroll interpret 戻る\n  voicenav -o json interpret \"go back\""
    )]
    Interpret(InterpretArgs),

    /// List the trigger words of the selected variant
    Vocabulary,

    /// Run the interactive navigator, reading transcripts and controls from stdin
    Listen(ListenArgs),

    /// Load a single URL on the surface
    Open(OpenArgs),

    /// Check if the surface daemon is running
    Ping,
}

#[derive(Debug, Args)]
pub struct InterpretArgs {
    /// Recognized text; multiple words are joined with spaces
    #[arg(required = true, num_args = 1..)]
    pub text: Vec<String>,
}

#[derive(Debug, Args)]
pub struct SurfaceArgs {
    /// Load pages through the content relay
    #[arg(long)]
    pub relay: bool,

    /// Log surface requests instead of sending them to the daemon
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Args)]
pub struct ListenArgs {
    #[command(flatten)]
    pub surface: SurfaceArgs,

    /// URL to open on start
    #[arg(long)]
    pub url: Option<String>,

    /// Do not start recognition automatically
    #[arg(long)]
    pub no_autostart: bool,
}

#[derive(Debug, Args)]
pub struct OpenArgs {
    /// URL to load
    pub url: String,

    #[command(flatten)]
    pub surface: SurfaceArgs,
}

// =============================================================================
// Parse Function
// =============================================================================

pub fn parse() -> Cli {
    Cli::parse()
}

/// Parse command line arguments from iterator (for testing)
pub fn parse_from<I, T>(iter: I) -> Cli
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::parse_from(iter)
}
