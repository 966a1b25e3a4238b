//! Multi-year projection of the selected regime.
//!
//! Every projected year is evaluated on its own. Contribution and VAT rates are the
//! only inputs that change between years; revenue and the other figures are held
//! constant.

use super::error::Result;
use super::input::CalculationInput;
use super::levies::vat_rate_for_year;
use super::rates::{ContributionRate, VatRate};
use super::regime::TaxBreakdown;
use super::rules::{FiscalYear, TaxRules};
use serde::{Deserialize, Deserializer, Serialize};

/// Projected tax of one fiscal year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearTax {
    pub year: FiscalYear,
    /// Absent or null reads as an all-zero breakdown
    #[serde(default, deserialize_with = "breakdown_or_zero")]
    pub tax: TaxBreakdown,
}

fn breakdown_or_zero<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<TaxBreakdown, D::Error> {
    Ok(Option::<TaxBreakdown>::deserialize(deserializer)?.unwrap_or_default())
}

/// Contribution rate for `year`: reduced in the base year, standard afterwards for
/// employers above the contribution threshold.
pub fn contribution_rate_for_year(
    input: &CalculationInput,
    year: FiscalYear,
    rules: &TaxRules,
) -> ContributionRate {
    if year > rules.base_year
        && input.employee_count > 0
        && input.revenue > rules.contribution_threshold
    {
        ContributionRate::Standard
    } else {
        ContributionRate::Reduced
    }
}

/// VAT rate for `year`: the elected rate in the base year, then the tier looked up
/// against that year's exemption ceiling.
pub fn vat_rate_for_projection(
    input: &CalculationInput,
    year: FiscalYear,
    rules: &TaxRules,
) -> Result<VatRate> {
    if year <= rules.base_year {
        Ok(input.elected_vat_rate())
    } else {
        vat_rate_for_year(input.revenue, input.vat_applies, year, rules)
    }
}

/// Tax of the selected regime in `year`.
pub fn project_year(
    input: &CalculationInput,
    year: FiscalYear,
    rules: &TaxRules,
) -> Result<YearTax> {
    let vat_rate = vat_rate_for_projection(input, year, rules)?;
    let contribution_rate = contribution_rate_for_year(input, year, rules);
    log::debug!(
        "{}: VAT {}, contributions {}",
        year,
        vat_rate,
        contribution_rate
    );

    let assessment = input.assessment(input.tax_regime, vat_rate, contribution_rate);
    let tax = input.tax_regime.evaluate(&assessment, rules)?;
    Ok(YearTax { year, tax })
}

/// Tax of the selected regime for the base year and the following three years.
pub fn project(input: &CalculationInput, rules: &TaxRules) -> Result<Vec<YearTax>> {
    input.validate()?;
    rules
        .projection_years()
        .map(|year| project_year(input, year, rules))
        .collect()
}
