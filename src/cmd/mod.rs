pub mod calculate;
pub mod compare;
pub mod rules;
pub mod schema;

use anyhow::Context;
use rust_decimal::Decimal;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};
use taxregime::core::{CalculationInput, CalculationRequest, TaxRules};

/// Read a calculation request (JSON) and validate it (or stdin with "-")
pub fn read_input(path: &Path) -> anyhow::Result<CalculationInput> {
    let request = if path.as_os_str() == "-" {
        read_from_stdin()?
    } else {
        read_from_file(path)?
    };
    let input = CalculationInput::try_from(request).context("Invalid calculation request")?;
    log::info!(
        "Loaded {} request under {}, revenue {}",
        input.status_type,
        input.tax_regime.code(),
        input.revenue
    );
    Ok(input)
}

fn read_from_file(path: &Path) -> anyhow::Result<CalculationRequest> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let reader = BufReader::new(file);
    let request = serde_json::from_reader(reader)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(request)
}

fn read_from_stdin() -> anyhow::Result<CalculationRequest> {
    let stdin = io::stdin();
    let mut reader = BufReader::new(stdin.lock());

    let mut buffer = Vec::new();
    reader.read_to_end(&mut buffer)?;

    if buffer.iter().all(u8::is_ascii_whitespace) {
        anyhow::bail!("No input received. Provide a file or pipe data to stdin.");
    }

    let request = serde_json::from_slice(&buffer).context("Failed to parse request from stdin")?;
    Ok(request)
}

/// Rules from a JSON file, or the built-in defaults
pub fn load_rules(path: Option<&PathBuf>) -> anyhow::Result<TaxRules> {
    let Some(path) = path else {
        return Ok(TaxRules::default());
    };
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let rules: TaxRules = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse rules from {}", path.display()))?;
    log::info!("Loaded rules from {} (base year {})", path.display(), rules.base_year);
    Ok(rules)
}

fn format_money(amount: Decimal) -> String {
    let digits = amount.abs().round().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(c);
    }
    if amount.is_sign_negative() && !amount.round().is_zero() {
        format!("-{}", grouped)
    } else {
        grouped
    }
}
