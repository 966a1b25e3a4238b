//! Calculate command - four-year projection and regime recommendation

use super::{format_money, load_rules, read_input};
use anyhow::Context;
use clap::Args;
use std::path::PathBuf;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};
use taxregime::core::{CalculationOutput, Calculator, RegimeComparisonEntry};

#[derive(Args, Debug)]
pub struct CalculateCommand {
    /// Calculation request (JSON). Reads from stdin with "-".
    #[arg(short, long, default_value = "-")]
    input: PathBuf,

    /// Tax rules (JSON) overriding the built-in calibration
    #[arg(short, long)]
    rules: Option<PathBuf>,

    /// Output as JSON instead of formatted tables
    #[arg(long)]
    json: bool,
}

impl CalculateCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let input = read_input(&self.input)?;
        let calculator = Calculator::new(load_rules(self.rules.as_ref())?);
        let output = calculator
            .calculate(&input)
            .context("Calculation failed")?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            print_output(&output);
        }
        Ok(())
    }
}

fn print_output(output: &CalculationOutput) {
    println!();
    println!(
        "{} under {}, revenue {}",
        output.status_type,
        output.tax_regime,
        format_money(output.revenue)
    );
    println!();

    let rows: Vec<YearRow> = output
        .projection
        .iter()
        .map(|y| YearRow {
            year: y.year.to_string(),
            main_tax: format_money(y.tax.main_tax),
            vat_tax: format_money(y.tax.vat_tax),
            contributions: format_money(y.tax.contributions),
            total: format_money(y.tax.total),
        })
        .collect();
    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(1..)).with(Alignment::right()))
        .to_string();
    println!("{}", table);
    println!(
        "Total over {} years: {}",
        output.projection.len(),
        format_money(output.projected_total())
    );
    println!();

    println!("REGIME COMPARISON ({})", output.comparison_year);
    println!("{}", comparison_table(&output.regime_comparison));
    println!();

    if output.recommended_regime == output.tax_regime {
        println!("Recommended: {} (current regime)", output.recommended_regime);
    } else {
        println!(
            "Recommended: {} (saves {} in {})",
            output.recommended_regime,
            format_money(output.recommended_savings),
            output.comparison_year
        );
    }
}

pub(super) fn comparison_table(entries: &[RegimeComparisonEntry]) -> String {
    let rows: Vec<RegimeRow> = entries.iter().map(RegimeRow::from).collect();
    Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(1..2)).with(Alignment::right()))
        .to_string()
}

#[derive(Tabled)]
struct YearRow {
    #[tabled(rename = "Year")]
    year: String,
    #[tabled(rename = "Main Tax")]
    main_tax: String,
    #[tabled(rename = "VAT")]
    vat_tax: String,
    #[tabled(rename = "Contributions")]
    contributions: String,
    #[tabled(rename = "Total")]
    total: String,
}

#[derive(Tabled)]
struct RegimeRow {
    #[tabled(rename = "Regime")]
    regime: String,
    #[tabled(rename = "Total Tax")]
    total_tax: String,
    #[tabled(rename = "Note")]
    marker: String,
}

impl From<&RegimeComparisonEntry> for RegimeRow {
    fn from(entry: &RegimeComparisonEntry) -> Self {
        let (total_tax, marker) = if !entry.available {
            (
                "-".to_string(),
                entry.reason.clone().unwrap_or_else(|| "unavailable".to_string()),
            )
        } else if entry.recommended {
            (format_money(entry.total_tax), "recommended".to_string())
        } else {
            (format_money(entry.total_tax), String::new())
        };
        RegimeRow {
            regime: entry.regime.to_string(),
            total_tax,
            marker,
        }
    }
}
