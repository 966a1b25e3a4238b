//! Enumerated rate sets.
//!
//! Requests carry rates as percentages; converting one into these enums is where an
//! unsupported rate is rejected, so the calculators never see one.

use super::error::{Field, TaxCalculationError};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Serialize, Serializer};
use std::fmt;

/// Simplified-regime rate: 6% of turnover or 15% of profit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TurnoverRate {
    Six,
    Fifteen,
}

/// Value-added tax tier. Serializes as its percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VatRate {
    Exempt,
    Five,
    Seven,
    TwentyTwo,
}

/// Payroll contribution rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContributionRate {
    Reduced,
    Standard,
}

/// Sub-rate of the self-employed flat tax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FlatRate {
    #[default]
    Four,
    Six,
}

impl TurnoverRate {
    pub const ALL: [TurnoverRate; 2] = [TurnoverRate::Six, TurnoverRate::Fifteen];

    pub fn percent(&self) -> Decimal {
        match self {
            TurnoverRate::Six => dec!(6),
            TurnoverRate::Fifteen => dec!(15),
        }
    }

    pub fn fraction(&self) -> Decimal {
        match self {
            TurnoverRate::Six => dec!(0.06),
            TurnoverRate::Fifteen => dec!(0.15),
        }
    }
}

impl VatRate {
    pub const ALL: [VatRate; 4] = [
        VatRate::Exempt,
        VatRate::Five,
        VatRate::Seven,
        VatRate::TwentyTwo,
    ];

    pub fn percent(&self) -> Decimal {
        match self {
            VatRate::Exempt => Decimal::ZERO,
            VatRate::Five => dec!(5),
            VatRate::Seven => dec!(7),
            VatRate::TwentyTwo => dec!(22),
        }
    }

    pub fn fraction(&self) -> Decimal {
        match self {
            VatRate::Exempt => Decimal::ZERO,
            VatRate::Five => dec!(0.05),
            VatRate::Seven => dec!(0.07),
            VatRate::TwentyTwo => dec!(0.22),
        }
    }
}

impl ContributionRate {
    pub const ALL: [ContributionRate; 2] = [ContributionRate::Reduced, ContributionRate::Standard];

    pub fn percent(&self) -> Decimal {
        match self {
            ContributionRate::Reduced => dec!(15),
            ContributionRate::Standard => dec!(30),
        }
    }

    pub fn fraction(&self) -> Decimal {
        match self {
            ContributionRate::Reduced => dec!(0.15),
            ContributionRate::Standard => dec!(0.30),
        }
    }
}

impl FlatRate {
    pub const ALL: [FlatRate; 2] = [FlatRate::Four, FlatRate::Six];

    pub fn percent(&self) -> Decimal {
        match self {
            FlatRate::Four => dec!(4),
            FlatRate::Six => dec!(6),
        }
    }

    pub fn fraction(&self) -> Decimal {
        match self {
            FlatRate::Four => dec!(0.04),
            FlatRate::Six => dec!(0.06),
        }
    }
}

fn allowed(percents: impl Iterator<Item = Decimal>) -> String {
    percents
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl TryFrom<Decimal> for TurnoverRate {
    type Error = TaxCalculationError;

    fn try_from(percent: Decimal) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|r| r.percent() == percent)
            .ok_or_else(|| {
                TaxCalculationError::for_field(
                    Field::Rate,
                    format!(
                        "unsupported simplified regime rate: {}%. Allowed: {}",
                        percent,
                        allowed(Self::ALL.iter().map(|r| r.percent()))
                    ),
                )
            })
    }
}

impl TryFrom<Decimal> for VatRate {
    type Error = TaxCalculationError;

    fn try_from(percent: Decimal) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|r| r.percent() == percent)
            .ok_or_else(|| {
                TaxCalculationError::for_field(
                    Field::VatRate,
                    format!(
                        "unsupported VAT rate: {}%. Allowed: {}",
                        percent,
                        allowed(Self::ALL.iter().map(|r| r.percent()))
                    ),
                )
            })
    }
}

impl TryFrom<Decimal> for ContributionRate {
    type Error = TaxCalculationError;

    fn try_from(percent: Decimal) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|r| r.percent() == percent)
            .ok_or_else(|| {
                TaxCalculationError::for_field(
                    Field::ContributionRate,
                    format!(
                        "unsupported contribution rate: {}%. Allowed: {}",
                        percent,
                        allowed(Self::ALL.iter().map(|r| r.percent()))
                    ),
                )
            })
    }
}

impl TryFrom<Decimal> for FlatRate {
    type Error = TaxCalculationError;

    fn try_from(percent: Decimal) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|r| r.percent() == percent)
            .ok_or_else(|| {
                TaxCalculationError::for_field(
                    Field::FlatRate,
                    format!(
                        "unsupported self-employed flat rate: {}%. Allowed: {}",
                        percent,
                        allowed(Self::ALL.iter().map(|r| r.percent()))
                    ),
                )
            })
    }
}

impl fmt::Display for VatRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VatRate::Exempt => write!(f, "exempt"),
            rate => write!(f, "{}%", rate.percent()),
        }
    }
}

impl Serialize for VatRate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Serialize::serialize(&self.percent(), serializer)
    }
}

impl fmt::Display for ContributionRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.percent())
    }
}
