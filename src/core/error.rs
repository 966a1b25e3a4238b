use serde::Serialize;
use std::fmt;

pub type Result<T, E = TaxCalculationError> = std::result::Result<T, E>;

/// Input field an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    StatusType,
    TaxRegime,
    Revenue,
    Expenses,
    #[serde(rename = "count_employees")]
    EmployeeCount,
    AnnualPayroll,
    VatRate,
    IncomingVat,
    Rate,
    ContributionRate,
    FlatRate,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::StatusType => "status_type",
            Field::TaxRegime => "tax_regime",
            Field::Revenue => "revenue",
            Field::Expenses => "expenses",
            Field::EmployeeCount => "count_employees",
            Field::AnnualPayroll => "annual_payroll",
            Field::VatRate => "vat_rate",
            Field::IncomingVat => "incoming_vat",
            Field::Rate => "rate",
            Field::ContributionRate => "contribution_rate",
            Field::FlatRate => "flat_rate",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The one error kind of the engine.
///
/// Malformed input and business-rule violations (such as an ineligible regime) are
/// not distinguished by type, only by `field` and `message`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct TaxCalculationError {
    pub message: String,
    pub field: Option<Field>,
}

impl TaxCalculationError {
    pub fn new(message: impl Into<String>) -> Self {
        TaxCalculationError {
            message: message.into(),
            field: None,
        }
    }

    pub fn for_field(field: Field, message: impl Into<String>) -> Self {
        TaxCalculationError {
            message: message.into(),
            field: Some(field),
        }
    }

    pub fn field(&self) -> Option<Field> {
        self.field
    }

    /// True for regime eligibility violations, as opposed to bad figures.
    pub fn is_eligibility(&self) -> bool {
        self.field == Some(Field::TaxRegime)
    }
}
