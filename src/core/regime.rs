use super::error::{Field, Result, TaxCalculationError};
use super::input::StatusType;
use super::levies::{social_contributions, turnover_tax, vat_tax};
use super::rates::{ContributionRate, FlatRate, TurnoverRate, VatRate};
use super::rules::TaxRules;
use super::validate::{
    validate_employee_count, validate_expenses, validate_incoming_vat, validate_payroll,
    validate_revenue,
};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Tax regime. Declaration order is the comparison and tie-break order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum TaxRegime {
    /// Simplified regime, 6% of turnover
    Turnover6,
    /// Simplified regime, 15% of revenue less expenses
    ProfitBased15,
    /// General regime: income tax plus standard VAT
    General,
    /// Flat tax for self-employed individuals without staff
    SelfEmployedFlat,
    Patent,
}

impl TaxRegime {
    pub const ALL: [TaxRegime; 5] = [
        TaxRegime::Turnover6,
        TaxRegime::ProfitBased15,
        TaxRegime::General,
        TaxRegime::SelfEmployedFlat,
        TaxRegime::Patent,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            TaxRegime::Turnover6 => "turnover6",
            TaxRegime::ProfitBased15 => "profit_based15",
            TaxRegime::General => "general",
            TaxRegime::SelfEmployedFlat => "self_employed_flat",
            TaxRegime::Patent => "patent",
        }
    }

    pub fn display(&self) -> &'static str {
        match self {
            TaxRegime::Turnover6 => "Simplified 6% (turnover)",
            TaxRegime::ProfitBased15 => "Simplified 15% (profit)",
            TaxRegime::General => "General",
            TaxRegime::SelfEmployedFlat => "Self-employed flat",
            TaxRegime::Patent => "Patent",
        }
    }

    /// Regimes that charge VAT at an elected or looked-up rate.
    pub fn accepts_vat(&self) -> bool {
        matches!(self, TaxRegime::Turnover6 | TaxRegime::General)
    }

    /// Fails when the regime is not legally available for the assessed business.
    pub fn check_eligibility(&self, assessment: &Assessment, rules: &TaxRules) -> Result<()> {
        match self {
            TaxRegime::Turnover6 | TaxRegime::ProfitBased15 => {
                if assessment.revenue > rules.simplified_max_revenue {
                    return Err(ineligible(format!(
                        "{} is unavailable above revenue of {}",
                        self.display(),
                        rules.simplified_max_revenue
                    )));
                }
            }
            TaxRegime::General => {}
            TaxRegime::SelfEmployedFlat => {
                if assessment.status_type != StatusType::SelfEmployed {
                    return Err(ineligible(format!(
                        "{} requires self-employed status",
                        self.display()
                    )));
                }
                if assessment.revenue > rules.flat_rate_max_revenue {
                    return Err(ineligible(format!(
                        "{} is unavailable above revenue of {}",
                        self.display(),
                        rules.flat_rate_max_revenue
                    )));
                }
                if assessment.employee_count > 0 {
                    return Err(ineligible(format!(
                        "{} does not allow employees",
                        self.display()
                    )));
                }
            }
            TaxRegime::Patent => {
                if assessment.revenue > rules.patent_max_revenue {
                    return Err(ineligible(format!(
                        "{} is unavailable above revenue of {}",
                        self.display(),
                        rules.patent_max_revenue
                    )));
                }
            }
        }
        Ok(())
    }

    /// Validates the assessment, checks eligibility and composes the breakdown.
    pub fn evaluate(&self, assessment: &Assessment, rules: &TaxRules) -> Result<TaxBreakdown> {
        assessment.validate()?;
        self.check_eligibility(assessment, rules)?;

        let a = assessment;
        let (main_tax, vat, contributions) = match self {
            TaxRegime::Turnover6 => (
                turnover_tax(a.revenue, TurnoverRate::Six, Decimal::ZERO)?,
                vat_tax(a.revenue, a.vat_rate, a.incoming_vat)?,
                a.contributions(rules)?,
            ),
            TaxRegime::ProfitBased15 => (
                turnover_tax(a.revenue, TurnoverRate::Fifteen, a.expenses)?,
                Decimal::ZERO,
                a.contributions(rules)?,
            ),
            TaxRegime::General => (
                a.revenue * rules.general_income_tax_rate,
                vat_tax(a.revenue, VatRate::TwentyTwo, a.incoming_vat)?,
                a.contributions(rules)?,
            ),
            TaxRegime::SelfEmployedFlat => (
                a.revenue * a.self_employed_rate()?.fraction(),
                Decimal::ZERO,
                Decimal::ZERO,
            ),
            TaxRegime::Patent => (
                a.revenue * a.patent_rate(rules)?,
                Decimal::ZERO,
                a.contributions(rules)?,
            ),
        };

        let breakdown = TaxBreakdown::from_components(main_tax, vat, contributions);
        log::debug!(
            "{} on revenue {}: main={}, vat={}, contributions={}, total={}",
            self.code(),
            a.revenue,
            breakdown.main_tax,
            breakdown.vat_tax,
            breakdown.contributions,
            breakdown.total
        );
        Ok(breakdown)
    }
}

fn ineligible(message: String) -> TaxCalculationError {
    TaxCalculationError::for_field(Field::TaxRegime, message)
}

impl fmt::Display for TaxRegime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display())
    }
}

impl FromStr for TaxRegime {
    type Err = TaxCalculationError;

    /// Accepts the canonical codes as well as the domain's own labels.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(TaxCalculationError::for_field(
                Field::TaxRegime,
                "tax regime is not specified",
            ));
        }
        match s.to_lowercase().as_str() {
            "turnover6" | "usn6" | "усн 6%" => Ok(TaxRegime::Turnover6),
            "profit_based15" | "usn15" | "усн 15%" => Ok(TaxRegime::ProfitBased15),
            "general" | "osno" | "осно" => Ok(TaxRegime::General),
            "self_employed_flat" | "npd" | "нпд" => Ok(TaxRegime::SelfEmployedFlat),
            "patent" | "патент" => Ok(TaxRegime::Patent),
            _ => Err(TaxCalculationError::for_field(
                Field::TaxRegime,
                format!(
                    "unknown tax regime: {}. Allowed: {}",
                    s,
                    TaxRegime::ALL.map(|r| r.code()).join(", ")
                ),
            )),
        }
    }
}

/// Everything a regime needs to assess one fiscal year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assessment {
    pub status_type: StatusType,
    pub revenue: Decimal,
    pub expenses: Decimal,
    pub employee_count: u32,
    pub annual_payroll: Decimal,
    pub vat_rate: VatRate,
    pub incoming_vat: Decimal,
    pub contribution_rate: ContributionRate,
    /// Percentage sub-rate for the self-employed flat tax or the patent.
    pub flat_rate: Option<Decimal>,
}

impl Assessment {
    pub fn validate(&self) -> Result<()> {
        validate_revenue(self.revenue)?;
        validate_expenses(self.expenses, self.revenue)?;
        validate_employee_count(i64::from(self.employee_count))?;
        validate_payroll(self.annual_payroll, self.employee_count)?;
        validate_incoming_vat(self.incoming_vat)
    }

    fn contributions(&self, rules: &TaxRules) -> Result<Decimal> {
        social_contributions(
            self.employee_count,
            self.annual_payroll,
            self.contribution_rate,
            rules,
        )
    }

    fn self_employed_rate(&self) -> Result<FlatRate> {
        self.flat_rate
            .map_or(Ok(FlatRate::default()), FlatRate::try_from)
    }

    fn patent_rate(&self, rules: &TaxRules) -> Result<Decimal> {
        match self.flat_rate {
            None => Ok(rules.default_patent_rate),
            Some(percent) if percent > Decimal::ZERO && percent <= dec!(100) => {
                Ok(percent / dec!(100))
            }
            Some(percent) => Err(TaxCalculationError::for_field(
                Field::FlatRate,
                format!("patent rate must be above 0% and at most 100%, got {percent}%"),
            )),
        }
    }
}

/// Per-year tax amounts, each rounded to a whole currency unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxBreakdown {
    #[serde(deserialize_with = "zero_if_null")]
    pub main_tax: Decimal,
    #[serde(deserialize_with = "zero_if_null")]
    pub vat_tax: Decimal,
    #[serde(deserialize_with = "zero_if_null")]
    pub contributions: Decimal,
    #[serde(deserialize_with = "zero_if_null")]
    pub total: Decimal,
}

impl TaxBreakdown {
    /// Rounds each component independently, then sums the rounded values.
    pub fn from_components(main_tax: Decimal, vat_tax: Decimal, contributions: Decimal) -> Self {
        let main_tax = round_whole(main_tax);
        let vat_tax = round_whole(vat_tax);
        let contributions = round_whole(contributions);
        TaxBreakdown {
            main_tax,
            vat_tax,
            contributions,
            total: main_tax + vat_tax + contributions,
        }
    }
}

/// Missing and null amounts both read as zero.
fn zero_if_null<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
    Ok(Option::<Decimal>::deserialize(deserializer)?.unwrap_or_default())
}

fn round_whole(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assessment(revenue: Decimal) -> Assessment {
        Assessment {
            status_type: StatusType::SoleProprietor,
            revenue,
            expenses: Decimal::ZERO,
            employee_count: 0,
            annual_payroll: Decimal::ZERO,
            vat_rate: VatRate::Exempt,
            incoming_vat: Decimal::ZERO,
            contribution_rate: ContributionRate::Reduced,
            flat_rate: None,
        }
    }

    fn self_employed(revenue: Decimal) -> Assessment {
        Assessment {
            status_type: StatusType::SelfEmployed,
            ..assessment(revenue)
        }
    }

    #[test]
    fn breakdown_rounds_each_component() {
        let b = TaxBreakdown::from_components(dec!(0.5), dec!(0.5), dec!(0.5));
        assert_eq!(b.main_tax, dec!(1));
        assert_eq!(b.total, dec!(3));

        // rounding the aggregate instead would give 1
        let b = TaxBreakdown::from_components(dec!(0.4), dec!(0.4), dec!(0.4));
        assert_eq!(b.total, Decimal::ZERO);
    }

    #[test]
    fn breakdown_reads_null_fields_as_zero() {
        let b: TaxBreakdown =
            serde_json::from_str(r#"{ "main_tax": "100", "vat_tax": null, "total": null }"#)
                .unwrap();
        assert_eq!(b.main_tax, dec!(100));
        assert_eq!(b.vat_tax, Decimal::ZERO);
        assert_eq!(b.total, Decimal::ZERO);
    }

    #[test]
    fn breakdown_defaults_missing_fields_to_zero() {
        let b: TaxBreakdown = serde_json::from_str(r#"{ "main_tax": "100" }"#).unwrap();
        assert_eq!(b.main_tax, dec!(100));
        assert_eq!(b.vat_tax, Decimal::ZERO);
        assert_eq!(b.total, Decimal::ZERO);
    }

    #[test]
    fn turnover6_with_vat_and_staff() {
        let a = Assessment {
            employee_count: 2,
            annual_payroll: dec!(1200000),
            vat_rate: VatRate::Five,
            ..assessment(dec!(30000000))
        };
        let b = TaxRegime::Turnover6.evaluate(&a, &TaxRules::default()).unwrap();
        assert_eq!(b.main_tax, dec!(1800000));
        assert_eq!(b.vat_tax, dec!(1500000));
        assert_eq!(b.contributions, dec!(180000));
        assert_eq!(b.total, dec!(3480000));
    }

    #[test]
    fn profit_based_never_charges_vat() {
        let a = Assessment {
            expenses: dec!(20000000),
            vat_rate: VatRate::TwentyTwo,
            ..assessment(dec!(30000000))
        };
        let b = TaxRegime::ProfitBased15.evaluate(&a, &TaxRules::default()).unwrap();
        assert_eq!(b.main_tax, dec!(1500000));
        assert_eq!(b.vat_tax, Decimal::ZERO);
    }

    #[test]
    fn general_always_charges_standard_vat() {
        let a = Assessment {
            incoming_vat: dec!(100000),
            ..assessment(dec!(1000000))
        };
        let b = TaxRegime::General.evaluate(&a, &TaxRules::default()).unwrap();
        assert_eq!(b.main_tax, dec!(130000));
        assert_eq!(b.vat_tax, dec!(120000));
        assert_eq!(b.total, dec!(250000));
    }

    #[test]
    fn general_available_at_any_revenue() {
        let b = TaxRegime::General
            .evaluate(&assessment(dec!(5000000000)), &TaxRules::default())
            .unwrap();
        assert_eq!(b.main_tax, dec!(650000000));
    }

    #[test]
    fn simplified_regimes_capped_by_revenue() {
        let rules = TaxRules::default();
        let a = assessment(dec!(450000001));
        for regime in [TaxRegime::Turnover6, TaxRegime::ProfitBased15] {
            let err = regime.evaluate(&a, &rules).unwrap_err();
            assert!(err.is_eligibility());
        }
        assert!(TaxRegime::Turnover6
            .evaluate(&assessment(dec!(450000000)), &rules)
            .is_ok());
    }

    #[test]
    fn self_employed_flat_default_and_six_percent() {
        let rules = TaxRules::default();
        let b = TaxRegime::SelfEmployedFlat
            .evaluate(&self_employed(dec!(1000000)), &rules)
            .unwrap();
        assert_eq!(b.main_tax, dec!(40000));
        assert_eq!(b.total, dec!(40000));

        let a = Assessment {
            flat_rate: Some(dec!(6)),
            ..self_employed(dec!(1000000))
        };
        let b = TaxRegime::SelfEmployedFlat.evaluate(&a, &rules).unwrap();
        assert_eq!(b.main_tax, dec!(60000));
    }

    #[test]
    fn self_employed_flat_rejects_other_rates() {
        let a = Assessment {
            flat_rate: Some(dec!(5)),
            ..self_employed(dec!(1000000))
        };
        let err = TaxRegime::SelfEmployedFlat
            .evaluate(&a, &TaxRules::default())
            .unwrap_err();
        assert_eq!(err.field(), Some(Field::FlatRate));
    }

    #[test]
    fn self_employed_flat_eligibility() {
        let rules = TaxRules::default();

        let err = TaxRegime::SelfEmployedFlat
            .evaluate(&assessment(dec!(1000000)), &rules)
            .unwrap_err();
        assert_eq!(err.message, "Self-employed flat requires self-employed status");

        let a = Assessment {
            employee_count: 1,
            annual_payroll: dec!(100000),
            ..self_employed(dec!(1000000))
        };
        let err = TaxRegime::SelfEmployedFlat.evaluate(&a, &rules).unwrap_err();
        assert_eq!(err.field(), Some(Field::TaxRegime));
        assert_eq!(err.message, "Self-employed flat does not allow employees");

        let err = TaxRegime::SelfEmployedFlat
            .evaluate(&self_employed(dec!(2400001)), &rules)
            .unwrap_err();
        assert!(err.message.contains("Self-employed flat"));
        assert!(err.is_eligibility());
    }

    #[test]
    fn patent_rate_default_and_configured() {
        let rules = TaxRules::default();
        let b = TaxRegime::Patent
            .evaluate(&assessment(dec!(2000000)), &rules)
            .unwrap();
        assert_eq!(b.main_tax, dec!(120000));

        let a = Assessment {
            flat_rate: Some(dec!(3.5)),
            employee_count: 1,
            annual_payroll: dec!(400000),
            ..assessment(dec!(2000000))
        };
        let b = TaxRegime::Patent.evaluate(&a, &rules).unwrap();
        assert_eq!(b.main_tax, dec!(70000));
        assert_eq!(b.contributions, dec!(60000));

        let a = Assessment {
            flat_rate: Some(Decimal::ZERO),
            ..assessment(dec!(2000000))
        };
        let err = TaxRegime::Patent.evaluate(&a, &rules).unwrap_err();
        assert_eq!(err.field(), Some(Field::FlatRate));
    }

    #[test]
    fn patent_capped_by_revenue() {
        let err = TaxRegime::Patent
            .evaluate(&assessment(dec!(2400001)), &TaxRules::default())
            .unwrap_err();
        assert!(err.is_eligibility());
        assert!(err.message.contains("Patent"));
    }

    #[test]
    fn figures_validated_before_eligibility() {
        let err = TaxRegime::SelfEmployedFlat
            .evaluate(&assessment(dec!(-1)), &TaxRules::default())
            .unwrap_err();
        assert_eq!(err.field(), Some(Field::Revenue));
    }

    #[test]
    fn parse_codes_and_labels() {
        assert_eq!("turnover6".parse::<TaxRegime>().unwrap(), TaxRegime::Turnover6);
        assert_eq!("УСН 15%".parse::<TaxRegime>().unwrap(), TaxRegime::ProfitBased15);
        assert_eq!("OSNO".parse::<TaxRegime>().unwrap(), TaxRegime::General);
        assert_eq!("НПД".parse::<TaxRegime>().unwrap(), TaxRegime::SelfEmployedFlat);
        assert_eq!("Патент".parse::<TaxRegime>().unwrap(), TaxRegime::Patent);
    }

    #[test]
    fn parse_rejects_empty_and_unknown() {
        let err = "  ".parse::<TaxRegime>().unwrap_err();
        assert_eq!(err.field(), Some(Field::TaxRegime));
        assert_eq!(err.message, "tax regime is not specified");

        let err = "usn10".parse::<TaxRegime>().unwrap_err();
        assert!(err.message.starts_with("unknown tax regime: usn10"));
    }
}
