//! Input guards shared by every calculation path.
//!
//! Each validator either passes silently or fails with an error naming the
//! offending field.

use super::error::{Field, Result, TaxCalculationError};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Sanity ceiling for revenue.
pub const MAX_REVENUE: Decimal = dec!(10000000000);

/// Sanity ceiling for headcount.
pub const MAX_EMPLOYEES: u32 = 10_000;

/// Sanity ceiling for the annual payroll.
pub const MAX_PAYROLL: Decimal = dec!(1000000000);

/// Fails when a value is missing, which is how a non-numeric value arrives once a
/// request has been deserialized.
pub fn require_number<T>(value: Option<T>, field: Field, what: &str) -> Result<T> {
    value.ok_or_else(|| TaxCalculationError::for_field(field, format!("{what} must be a number")))
}

pub fn validate_revenue(revenue: Decimal) -> Result<()> {
    if revenue < Decimal::ZERO {
        return Err(TaxCalculationError::for_field(
            Field::Revenue,
            "revenue cannot be negative",
        ));
    }
    if revenue > MAX_REVENUE {
        return Err(TaxCalculationError::for_field(
            Field::Revenue,
            "revenue is too large (maximum 10 billion)",
        ));
    }
    Ok(())
}

pub fn validate_expenses(expenses: Decimal, revenue: Decimal) -> Result<()> {
    if expenses < Decimal::ZERO {
        return Err(TaxCalculationError::for_field(
            Field::Expenses,
            "expenses cannot be negative",
        ));
    }
    if expenses > revenue {
        return Err(TaxCalculationError::for_field(
            Field::Expenses,
            "expenses cannot exceed revenue",
        ));
    }
    Ok(())
}

/// Validates a raw headcount and narrows it to `u32`.
pub fn validate_employee_count(count: i64) -> Result<u32> {
    if count < 0 {
        return Err(TaxCalculationError::for_field(
            Field::EmployeeCount,
            "employee count cannot be negative",
        ));
    }
    match u32::try_from(count) {
        Ok(count) if count <= MAX_EMPLOYEES => Ok(count),
        _ => Err(TaxCalculationError::for_field(
            Field::EmployeeCount,
            format!("employee count is too large (maximum {MAX_EMPLOYEES})"),
        )),
    }
}

pub fn validate_payroll(payroll: Decimal, employee_count: u32) -> Result<()> {
    if payroll < Decimal::ZERO {
        return Err(TaxCalculationError::for_field(
            Field::AnnualPayroll,
            "annual payroll cannot be negative",
        ));
    }
    if payroll > MAX_PAYROLL {
        return Err(TaxCalculationError::for_field(
            Field::AnnualPayroll,
            "annual payroll is too large (maximum 1 billion)",
        ));
    }
    if employee_count > 0 && payroll.is_zero() {
        return Err(TaxCalculationError::for_field(
            Field::AnnualPayroll,
            "annual payroll must be greater than zero when there are employees",
        ));
    }
    Ok(())
}

pub fn validate_incoming_vat(incoming_vat: Decimal) -> Result<()> {
    if incoming_vat < Decimal::ZERO {
        return Err(TaxCalculationError::for_field(
            Field::IncomingVat,
            "incoming VAT cannot be negative",
        ));
    }
    Ok(())
}
