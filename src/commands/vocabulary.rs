use crate::commands::{CommandContext, Execute};
use crate::error::Result;
use crate::interpreter::Vocabulary;
use crate::output::print_success;

#[derive(Default)]
pub struct VocabularyCommand {}

impl Execute for VocabularyCommand {
    fn execute(&self, ctx: &CommandContext) -> Result<()> {
        let variant = ctx.config.variant;
        let output = ctx
            .formatter
            .format_vocabulary(variant, &Vocabulary::for_variant(variant))?;
        if !output.is_empty() {
            print_success(output.trim_end());
        }
        Ok(())
    }
}
