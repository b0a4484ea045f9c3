use crate::commands::{CommandContext, Execute};
use crate::error::Result;
use crate::interpreter::CommandInterpreter;
use crate::output::print_success;

pub struct InterpretCommand {
    pub text: String,
}

impl InterpretCommand {
    pub fn new(words: Vec<String>) -> Self {
        Self {
            text: words.join(" "),
        }
    }
}

impl Execute for InterpretCommand {
    fn execute(&self, ctx: &CommandContext) -> Result<()> {
        let interpreter = CommandInterpreter::new(ctx.config.variant);
        let report = interpreter.interpretation(&self.text);
        tracing::debug!(?report, "interpreted");

        let output = ctx.formatter.format_interpretation(&report)?;
        if !output.is_empty() {
            print_success(&output);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_joins_words_with_spaces() {
        let command = InterpretCommand::new(vec!["go".to_string(), "back".to_string()]);
        assert_eq!(command.text, "go back");
    }
}
