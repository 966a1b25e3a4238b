use super::error::Result;
use super::input::CalculationInput;
use super::levies::turnover_tax;
use super::projection::{contribution_rate_for_year, vat_rate_for_projection};
use super::rates::{TurnoverRate, VatRate};
use super::regime::TaxRegime;
use super::rules::{FiscalYear, TaxRules};
use super::validate::{
    validate_employee_count, validate_expenses, validate_payroll, validate_revenue,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One regime's outcome in a comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegimeComparisonEntry {
    pub regime: TaxRegime,
    pub total_tax: Decimal,
    pub available: bool,
    pub recommended: bool,
    /// Why the regime is unavailable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Evaluates every regime for `year` and marks the cheapest available one.
///
/// Ineligible regimes are listed as unavailable with a zero total. Any other error
/// fails the whole comparison.
pub fn compare_regimes(
    input: &CalculationInput,
    year: FiscalYear,
    rules: &TaxRules,
) -> Result<Vec<RegimeComparisonEntry>> {
    input.validate()?;
    let year_vat = vat_rate_for_projection(input, year, rules)?;
    let contribution_rate = contribution_rate_for_year(input, year, rules);

    let mut entries = Vec::with_capacity(TaxRegime::ALL.len());
    for regime in TaxRegime::ALL {
        let vat_rate = if regime.accepts_vat() {
            year_vat
        } else {
            VatRate::Exempt
        };
        let assessment = input.assessment(regime, vat_rate, contribution_rate);

        let entry = match regime.evaluate(&assessment, rules) {
            Ok(tax) => RegimeComparisonEntry {
                regime,
                total_tax: tax.total,
                available: true,
                recommended: false,
                reason: None,
            },
            Err(err) if err.is_eligibility() => RegimeComparisonEntry {
                regime,
                total_tax: Decimal::ZERO,
                available: false,
                recommended: false,
                reason: Some(err.message),
            },
            Err(err) => return Err(err),
        };
        entries.push(entry);
    }

    if let Some(cheapest) = entries
        .iter_mut()
        .filter(|e| e.available)
        .min_by_key(|e| e.total_tax)
    {
        cheapest.recommended = true;
        log::debug!(
            "{}: cheapest regime is {} at {}",
            year,
            cheapest.regime.code(),
            cheapest.total_tax
        );
    }

    Ok(entries)
}

/// The recommended entry of a comparison, if any regime was available.
pub fn recommended(entries: &[RegimeComparisonEntry]) -> Option<&RegimeComparisonEntry> {
    entries.iter().find(|e| e.recommended)
}

/// Quick choice between the simplified regimes from the primary tax alone.
///
/// Above the simplified-regime ceiling only the general regime remains. Otherwise the
/// profit-based regime wins only when strictly cheaper than the turnover regime.
pub fn quick_recommendation(
    revenue: Decimal,
    expenses: Decimal,
    employee_count: i64,
    payroll: Decimal,
    rules: &TaxRules,
) -> Result<TaxRegime> {
    validate_revenue(revenue)?;
    validate_expenses(expenses, revenue)?;
    let employee_count = validate_employee_count(employee_count)?;
    validate_payroll(payroll, employee_count)?;

    if revenue > rules.simplified_max_revenue {
        return Ok(TaxRegime::General);
    }

    let turnover = turnover_tax(revenue, TurnoverRate::Six, Decimal::ZERO)?;
    let profit = turnover_tax(revenue, TurnoverRate::Fifteen, expenses)?;
    if profit < turnover {
        Ok(TaxRegime::ProfitBased15)
    } else {
        Ok(TaxRegime::Turnover6)
    }
}
