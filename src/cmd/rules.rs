//! Rules command - print the built-in tax rules

use clap::Args;
use taxregime::core::TaxRules;

#[derive(Args, Debug)]
pub struct RulesCommand {}

impl RulesCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        println!("{}", serde_json::to_string_pretty(&TaxRules::default())?);
        Ok(())
    }
}
