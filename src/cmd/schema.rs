//! Schema command - print the expected request format

use clap::Args;
use schemars::schema_for;
use taxregime::core::CalculationRequest;

#[derive(Args, Debug)]
pub struct SchemaCommand {}

impl SchemaCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let schema = schema_for!(CalculationRequest);
        println!("{}", serde_json::to_string_pretty(&schema)?);
        Ok(())
    }
}
