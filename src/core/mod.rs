pub mod calculator;
pub mod compare;
pub mod error;
pub mod input;
pub mod levies;
pub mod projection;
pub mod rates;
pub mod regime;
pub mod rules;
pub mod validate;

// Flat public surface for domain types and functions.
pub use calculator::{calculate, CalculationOutput, Calculator};
pub use compare::{compare_regimes, quick_recommendation, recommended, RegimeComparisonEntry};
pub use error::{Field, Result, TaxCalculationError};
pub use input::{CalculationInput, CalculationRequest, StatusType};
pub use levies::{social_contributions, turnover_tax, vat_rate_for_year, vat_rate_lookup, vat_tax};
pub use projection::{project, YearTax};
pub use rates::{ContributionRate, FlatRate, TurnoverRate, VatRate};
pub use regime::{Assessment, TaxBreakdown, TaxRegime};
pub use rules::{FiscalYear, TaxRules, VatCeiling, VatTiers, PROJECTION_YEARS};
