use super::error::{Field, Result, TaxCalculationError};
use super::rates::{ContributionRate, VatRate};
use super::regime::{Assessment, TaxRegime};
use super::validate::{
    require_number, validate_employee_count, validate_expenses, validate_incoming_vat,
    validate_payroll, validate_revenue,
};
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Legal form of the business.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusType {
    SoleProprietor,
    #[serde(rename = "llc")]
    LLC,
    SelfEmployed,
}

impl StatusType {
    pub fn display(&self) -> &'static str {
        match self {
            StatusType::SoleProprietor => "Sole proprietor",
            StatusType::LLC => "LLC",
            StatusType::SelfEmployed => "Self-employed",
        }
    }
}

impl fmt::Display for StatusType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display())
    }
}

impl FromStr for StatusType {
    type Err = TaxCalculationError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "sole_proprietor" | "ip" | "ип" => Ok(StatusType::SoleProprietor),
            "llc" | "ooo" | "ооо" => Ok(StatusType::LLC),
            "self_employed" | "самозанятый" => Ok(StatusType::SelfEmployed),
            _ => Err(TaxCalculationError::for_field(
                Field::StatusType,
                format!(
                    "unknown status: {}. Allowed: sole_proprietor, llc, self_employed",
                    s
                ),
            )),
        }
    }
}

/// Validated input for one calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalculationInput {
    pub status_type: StatusType,
    pub tax_regime: TaxRegime,
    pub revenue: Decimal,
    pub expenses: Decimal,
    pub employee_count: u32,
    pub annual_payroll: Decimal,
    pub vat_applies: bool,
    /// Elected VAT rate, required when VAT applies.
    pub vat_rate: Option<VatRate>,
    pub incoming_vat: Decimal,
    /// Percentage sub-rate for the self-employed flat tax (4 or 6) or the patent.
    pub flat_rate: Option<Decimal>,
}

impl CalculationInput {
    /// Runs every input validator, in field order.
    pub fn validate(&self) -> Result<()> {
        validate_revenue(self.revenue)?;
        validate_expenses(self.expenses, self.revenue)?;
        validate_employee_count(i64::from(self.employee_count))?;
        validate_payroll(self.annual_payroll, self.employee_count)?;
        validate_incoming_vat(self.incoming_vat)?;
        if self.vat_applies && self.vat_rate.is_none() {
            return Err(TaxCalculationError::for_field(
                Field::VatRate,
                "a VAT rate is required when VAT applies",
            ));
        }
        Ok(())
    }

    /// The elected VAT rate, or exempt when VAT does not apply.
    pub fn elected_vat_rate(&self) -> VatRate {
        match (self.vat_applies, self.vat_rate) {
            (true, Some(rate)) => rate,
            _ => VatRate::Exempt,
        }
    }

    /// Assessment of `regime` for one year, with that year's rates.
    pub fn assessment(
        &self,
        regime: TaxRegime,
        vat_rate: VatRate,
        contribution_rate: ContributionRate,
    ) -> Assessment {
        Assessment {
            status_type: self.status_type,
            revenue: self.revenue,
            expenses: self.expenses,
            employee_count: self.employee_count,
            annual_payroll: self.annual_payroll,
            vat_rate,
            incoming_vat: self.incoming_vat,
            contribution_rate,
            flat_rate: if regime == self.tax_regime {
                self.flat_rate
            } else {
                None
            },
        }
    }
}

/// Calculation request as it arrives from outside: any field may be missing.
///
/// Converting into [`CalculationInput`] validates every field and reports the first
/// problem with the field's name.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct CalculationRequest {
    /// sole_proprietor, llc or self_employed
    pub status_type: Option<String>,
    /// turnover6, profit_based15, general, self_employed_flat or patent
    pub tax_regime: Option<String>,
    /// Annual revenue
    #[schemars(with = "Option<f64>")]
    pub revenue: Option<Decimal>,
    /// Deductible expenses, at most the revenue (default 0)
    #[schemars(with = "Option<f64>")]
    pub expenses: Option<Decimal>,
    /// Number of employees (default 0)
    pub count_employees: Option<i64>,
    /// Annual payroll, required when there are employees
    #[schemars(with = "Option<f64>")]
    pub annual_payroll: Option<Decimal>,
    /// Whether the business is a VAT payer
    #[serde(default)]
    pub vat_applies: bool,
    /// Elected VAT rate in percent: 0, 5, 7 or 22
    #[schemars(with = "Option<f64>")]
    pub vat_rate: Option<Decimal>,
    /// Input VAT credit (default 0)
    #[schemars(with = "Option<f64>")]
    pub incoming_vat: Option<Decimal>,
    /// Flat-tax sub-rate in percent (self-employed: 4 or 6; patent: effective rate)
    #[schemars(with = "Option<f64>")]
    pub flat_rate: Option<Decimal>,
}

impl TryFrom<CalculationRequest> for CalculationInput {
    type Error = TaxCalculationError;

    fn try_from(request: CalculationRequest) -> Result<Self> {
        let status_type = request
            .status_type
            .as_deref()
            .ok_or_else(|| {
                TaxCalculationError::for_field(Field::StatusType, "status is not specified")
            })?
            .parse::<StatusType>()?;
        let tax_regime = request
            .tax_regime
            .as_deref()
            .unwrap_or_default()
            .parse::<TaxRegime>()?;

        let revenue = require_number(request.revenue, Field::Revenue, "revenue")?;
        let employee_count = validate_employee_count(request.count_employees.unwrap_or(0))?;

        let vat_rate = match request.vat_rate {
            Some(percent) if request.vat_applies => Some(VatRate::try_from(percent)?),
            _ => None,
        };

        let input = CalculationInput {
            status_type,
            tax_regime,
            revenue,
            expenses: request.expenses.unwrap_or_default(),
            employee_count,
            annual_payroll: request.annual_payroll.unwrap_or_default(),
            vat_applies: request.vat_applies,
            vat_rate,
            incoming_vat: request.incoming_vat.unwrap_or_default(),
            flat_rate: request.flat_rate,
        };
        input.validate()?;
        Ok(input)
    }
}
