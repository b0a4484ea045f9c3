//! One-shot load of a destination

use crate::commands::{CommandContext, Execute};
use crate::destination;
use crate::error::Result;
use crate::status::{MESSAGE_CLEAR_DELAY, StatusKind, StatusMessage};

pub struct OpenCommand {
    pub url: String,
    pub relay: bool,
    pub dry_run: bool,
}

impl OpenCommand {
    pub fn new(url: String, relay: bool, dry_run: bool) -> Self {
        Self {
            url,
            relay,
            dry_run,
        }
    }
}

impl Execute for OpenCommand {
    fn execute(&self, ctx: &CommandContext) -> Result<()> {
        let url = destination::prepare(&self.url)?;
        let target = destination::resolve(&url, ctx.relay(self.relay).as_deref())?;

        let mut surface = ctx.surface(self.dry_run);
        surface.load(&target)?;

        ctx.formatter.print_status(&StatusMessage::new(
            StatusKind::Info,
            format!("{}を読み込みました", url),
            MESSAGE_CLEAR_DELAY,
        ));
        Ok(())
    }
}
