use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of fiscal years covered by a projection, base year included.
pub const PROJECTION_YEARS: i32 = 4;

/// Calendar fiscal year, e.g. `FiscalYear(2026)`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct FiscalYear(pub i32);

impl FiscalYear {
    pub fn next(&self) -> Self {
        FiscalYear(self.0 + 1)
    }
}

impl fmt::Display for FiscalYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Revenue thresholds of the tiered VAT schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VatTiers {
    /// Revenue up to and including this amount is exempt.
    pub exemption_ceiling: Decimal,
    /// Upper bound (inclusive) of the 5% tier.
    pub reduced_ceiling: Decimal,
    /// Revenue at or above this amount pays the standard 22%.
    pub standard_threshold: Decimal,
}

impl Default for VatTiers {
    fn default() -> Self {
        VatTiers {
            exemption_ceiling: dec!(20000000),
            reduced_ceiling: dec!(272000000),
            standard_threshold: dec!(450000000),
        }
    }
}

/// Exemption ceiling in force from `year` onwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VatCeiling {
    pub year: FiscalYear,
    pub ceiling: Decimal,
}

/// Every threshold and rate the engine applies.
///
/// Rates are fractions (`0.06` is 6%). The default value is the 2025 calibration;
/// a partial JSON document can override any subset of fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxRules {
    pub base_year: FiscalYear,
    /// Revenue ceiling of both simplified regimes.
    pub simplified_max_revenue: Decimal,
    pub patent_max_revenue: Decimal,
    pub flat_rate_max_revenue: Decimal,
    /// Revenue above which employers move to the full contribution rate.
    pub contribution_threshold: Decimal,
    pub additional_contribution_threshold: Decimal,
    pub additional_contribution_rate: Decimal,
    /// Personal income tax applied as the general regime's primary tax.
    pub general_income_tax_rate: Decimal,
    pub default_patent_rate: Decimal,
    pub vat_tiers: VatTiers,
    /// Tightened exemption ceilings, each in force from its year on.
    pub vat_exemption_ceilings: Vec<VatCeiling>,
}

impl Default for TaxRules {
    fn default() -> Self {
        TaxRules {
            base_year: FiscalYear(2025),
            simplified_max_revenue: dec!(450000000),
            patent_max_revenue: dec!(2400000),
            flat_rate_max_revenue: dec!(2400000),
            contribution_threshold: dec!(20000000),
            additional_contribution_threshold: dec!(1465000),
            additional_contribution_rate: dec!(0.01),
            general_income_tax_rate: dec!(0.13),
            default_patent_rate: dec!(0.06),
            vat_tiers: VatTiers::default(),
            vat_exemption_ceilings: vec![
                VatCeiling {
                    year: FiscalYear(2026),
                    ceiling: dec!(20000000),
                },
                VatCeiling {
                    year: FiscalYear(2027),
                    ceiling: dec!(15000000),
                },
                VatCeiling {
                    year: FiscalYear(2028),
                    ceiling: dec!(10000000),
                },
            ],
        }
    }
}

impl TaxRules {
    /// Years covered by a projection, base year first.
    pub fn projection_years(&self) -> impl Iterator<Item = FiscalYear> {
        let base = self.base_year.0;
        (base..base + PROJECTION_YEARS).map(FiscalYear)
    }

    /// The year whose regimes are compared: the first year after the base year.
    pub fn comparison_year(&self) -> FiscalYear {
        self.base_year.next()
    }

    pub fn is_projected(&self, year: FiscalYear) -> bool {
        self.projection_years().any(|y| y == year)
    }

    /// VAT exemption ceiling for `year`.
    ///
    /// The latest scheduled ceiling that is already in force wins; before the first
    /// scheduled entry the ordinary tier ceiling applies.
    pub fn vat_exemption_ceiling(&self, year: FiscalYear) -> Decimal {
        self.vat_exemption_ceilings
            .iter()
            .filter(|c| c.year <= year)
            .max_by_key(|c| c.year)
            .map_or(self.vat_tiers.exemption_ceiling, |c| c.ceiling)
    }
}
