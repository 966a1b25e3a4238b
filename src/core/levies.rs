//! Primitive, regime-agnostic tax calculators.
//!
//! Each function re-validates only the figures it consumes, so it can be called on
//! its own. Results are unrounded; rounding happens when a regime composes them.

use super::error::Result;
use super::rates::{ContributionRate, TurnoverRate, VatRate};
use super::rules::{FiscalYear, TaxRules};
use super::validate::{
    validate_employee_count, validate_expenses, validate_incoming_vat, validate_payroll,
    validate_revenue,
};
use rust_decimal::Decimal;

/// Simplified-regime tax: 6% of revenue, or 15% of revenue less expenses.
pub fn turnover_tax(revenue: Decimal, rate: TurnoverRate, expenses: Decimal) -> Result<Decimal> {
    validate_revenue(revenue)?;
    validate_expenses(expenses, revenue)?;

    let tax = match rate {
        TurnoverRate::Six => revenue * rate.fraction(),
        TurnoverRate::Fifteen => (revenue - expenses).max(Decimal::ZERO) * rate.fraction(),
    };
    Ok(tax)
}

/// Value-added tax. Only the standard 22% tier credits incoming VAT, and never
/// below zero.
pub fn vat_tax(revenue: Decimal, rate: VatRate, incoming_vat: Decimal) -> Result<Decimal> {
    validate_revenue(revenue)?;
    validate_incoming_vat(incoming_vat)?;

    let tax = match rate {
        VatRate::Exempt => Decimal::ZERO,
        VatRate::Five | VatRate::Seven => revenue * rate.fraction(),
        VatRate::TwentyTwo => (revenue * rate.fraction() - incoming_vat).max(Decimal::ZERO),
    };
    Ok(tax)
}

/// VAT tier for `revenue` under the ordinary thresholds.
pub fn vat_rate_lookup(revenue: Decimal, applies: bool, rules: &TaxRules) -> Result<VatRate> {
    vat_rate_with_ceiling(revenue, applies, rules.vat_tiers.exemption_ceiling, rules)
}

/// VAT tier for `revenue` in `year`, where the exemption ceiling may be lower than
/// the ordinary one. Revenue above a tightened ceiling but inside the old exempt
/// band pays the 5% tier.
pub fn vat_rate_for_year(
    revenue: Decimal,
    applies: bool,
    year: FiscalYear,
    rules: &TaxRules,
) -> Result<VatRate> {
    vat_rate_with_ceiling(revenue, applies, rules.vat_exemption_ceiling(year), rules)
}

fn vat_rate_with_ceiling(
    revenue: Decimal,
    applies: bool,
    exemption_ceiling: Decimal,
    rules: &TaxRules,
) -> Result<VatRate> {
    validate_revenue(revenue)?;

    if !applies {
        return Ok(VatRate::Exempt);
    }

    let tiers = &rules.vat_tiers;
    let rate = if revenue <= exemption_ceiling {
        VatRate::Exempt
    } else if revenue <= tiers.reduced_ceiling {
        VatRate::Five
    } else if revenue < tiers.standard_threshold {
        VatRate::Seven
    } else {
        VatRate::TwentyTwo
    };
    Ok(rate)
}

/// Employer social contributions on the annual payroll.
///
/// At the standard rate an additional contribution applies to the part of the
/// payroll above the additional-contribution threshold.
pub fn social_contributions(
    employee_count: u32,
    payroll: Decimal,
    rate: ContributionRate,
    rules: &TaxRules,
) -> Result<Decimal> {
    validate_employee_count(i64::from(employee_count))?;
    validate_payroll(payroll, employee_count)?;

    if employee_count == 0 {
        return Ok(Decimal::ZERO);
    }

    let mut contributions = payroll * rate.fraction();
    if rate == ContributionRate::Standard && payroll > rules.additional_contribution_threshold {
        let excess = payroll - rules.additional_contribution_threshold;
        contributions += excess * rules.additional_contribution_rate;
    }
    Ok(contributions)
}
