use crate::commands::{CommandContext, Execute};
use crate::error::{NavigatorError, Result};
use crate::ipc::IpcClient;
use crate::output::{OutputFormat, print_success};

#[derive(Default)]
pub struct PingCommand {}

impl Execute for PingCommand {
    fn execute(&self, ctx: &CommandContext) -> Result<()> {
        let client = IpcClient::new(ctx.config.clone());
        if !client.ping()? {
            return Err(NavigatorError::SurfaceNotRunning(
                "daemon is not responding".to_string(),
            ));
        }

        if ctx.formatter.format() != OutputFormat::Quiet {
            print_success("Surface daemon is running");
        }
        Ok(())
    }
}
