//! Compare command - every regime for one projected year

use super::calculate::comparison_table;
use super::{load_rules, read_input};
use anyhow::Context;
use clap::Args;
use serde::Serialize;
use std::io;
use std::path::PathBuf;
use taxregime::core::{Calculator, FiscalYear, RegimeComparisonEntry};

#[derive(Args, Debug)]
pub struct CompareCommand {
    /// Calculation request (JSON). Reads from stdin with "-".
    #[arg(short, long, default_value = "-")]
    input: PathBuf,

    /// Fiscal year to compare (defaults to the year after the base year)
    #[arg(short, long)]
    year: Option<i32>,

    /// Tax rules (JSON) overriding the built-in calibration
    #[arg(short, long)]
    rules: Option<PathBuf>,

    /// Output as CSV instead of formatted table
    #[arg(long)]
    csv: bool,
}

impl CompareCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let input = read_input(&self.input)?;
        let calculator = Calculator::new(load_rules(self.rules.as_ref())?);
        let year = self
            .year
            .map_or_else(|| calculator.rules().comparison_year(), FiscalYear);
        let entries = calculator
            .compare(&input, year)
            .with_context(|| format!("Comparison for {} failed", year))?;

        if self.csv {
            write_csv(year, &entries)
        } else {
            println!();
            println!("REGIME COMPARISON ({})", year);
            println!("{}", comparison_table(&entries));
            Ok(())
        }
    }
}

#[derive(Serialize)]
struct CsvRow<'a> {
    year: FiscalYear,
    regime: &'static str,
    total_tax: String,
    available: bool,
    recommended: bool,
    reason: &'a str,
}

fn write_csv(year: FiscalYear, entries: &[RegimeComparisonEntry]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(io::stdout());
    for entry in entries {
        wtr.serialize(CsvRow {
            year,
            regime: entry.regime.code(),
            total_tax: entry.total_tax.to_string(),
            available: entry.available,
            recommended: entry.recommended,
            reason: entry.reason.as_deref().unwrap_or_default(),
        })?;
    }
    wtr.flush()?;
    Ok(())
}
