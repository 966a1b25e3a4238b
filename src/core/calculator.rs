use super::compare::{compare_regimes, recommended, RegimeComparisonEntry};
use super::error::{Result, TaxCalculationError};
use super::input::{CalculationInput, StatusType};
use super::projection::{project, YearTax};
use super::regime::{TaxBreakdown, TaxRegime};
use super::rules::{FiscalYear, TaxRules};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Result of a full calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationOutput {
    pub status_type: StatusType,
    pub tax_regime: TaxRegime,
    pub revenue: Decimal,
    /// Selected regime, base year first
    pub projection: Vec<YearTax>,
    pub comparison_year: FiscalYear,
    pub regime_comparison: Vec<RegimeComparisonEntry>,
    pub recommended_regime: TaxRegime,
    pub recommended_savings: Decimal,
}

impl CalculationOutput {
    pub fn tax_for(&self, year: FiscalYear) -> Option<&TaxBreakdown> {
        self.projection
            .iter()
            .find(|y| y.year == year)
            .map(|y| &y.tax)
    }

    /// Total of the selected regime over the whole projection.
    pub fn projected_total(&self) -> Decimal {
        self.projection.iter().map(|y| y.tax.total).sum()
    }
}

/// Engine entry point bound to one set of rules.
#[derive(Debug, Clone, Default)]
pub struct Calculator {
    rules: TaxRules,
}

impl Calculator {
    pub fn new(rules: TaxRules) -> Self {
        Calculator { rules }
    }

    pub fn rules(&self) -> &TaxRules {
        &self.rules
    }

    pub fn calculate(&self, input: &CalculationInput) -> Result<CalculationOutput> {
        calculate(input, &self.rules)
    }

    /// Regime comparison for any year of the projection window.
    pub fn compare(
        &self,
        input: &CalculationInput,
        year: FiscalYear,
    ) -> Result<Vec<RegimeComparisonEntry>> {
        if !self.rules.is_projected(year) {
            return Err(TaxCalculationError::new(format!(
                "{} is outside the projection window {}-{}",
                year,
                self.rules.base_year,
                self.rules.base_year.0 + super::rules::PROJECTION_YEARS - 1
            )));
        }
        compare_regimes(input, year, &self.rules)
    }
}

/// Projects the selected regime over four years and recommends the cheapest regime
/// for the comparison year.
pub fn calculate(input: &CalculationInput, rules: &TaxRules) -> Result<CalculationOutput> {
    input.validate()?;

    let projection = project(input, rules)?;
    let comparison_year = rules.comparison_year();
    let regime_comparison = compare_regimes(input, comparison_year, rules)?;

    let current_total = projection
        .iter()
        .find(|y| y.year == comparison_year)
        .map_or(Decimal::ZERO, |y| y.tax.total);
    let (recommended_regime, recommended_total) = recommended(&regime_comparison)
        .map_or((input.tax_regime, current_total), |e| (e.regime, e.total_tax));
    let recommended_savings = (current_total - recommended_total).max(Decimal::ZERO);

    log::debug!(
        "recommended {} (saves {} against {})",
        recommended_regime.code(),
        recommended_savings,
        input.tax_regime.code()
    );

    Ok(CalculationOutput {
        status_type: input.status_type,
        tax_regime: input.tax_regime,
        revenue: input.revenue,
        projection,
        comparison_year,
        regime_comparison,
        recommended_regime,
        recommended_savings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::Field;
    use crate::core::rates::VatRate;
    use rust_decimal_macros::dec;

    fn input(regime: TaxRegime, revenue: Decimal) -> CalculationInput {
        CalculationInput {
            status_type: StatusType::SoleProprietor,
            tax_regime: regime,
            revenue,
            expenses: Decimal::ZERO,
            employee_count: 0,
            annual_payroll: Decimal::ZERO,
            vat_applies: false,
            vat_rate: None,
            incoming_vat: Decimal::ZERO,
            flat_rate: None,
        }
    }

    #[test]
    fn savings_against_selected_regime() {
        let input = CalculationInput {
            expenses: dec!(8000000),
            ..input(TaxRegime::Turnover6, dec!(10000000))
        };
        let output = calculate(&input, &TaxRules::default()).unwrap();

        assert_eq!(output.projection.len(), 4);
        assert_eq!(output.comparison_year, FiscalYear(2026));
        assert_eq!(output.tax_for(FiscalYear(2026)).unwrap().total, dec!(600000));
        assert_eq!(output.recommended_regime, TaxRegime::ProfitBased15);
        // 600,000 - 15% of 2,000,000
        assert_eq!(output.recommended_savings, dec!(300000));
        assert_eq!(output.projected_total(), dec!(2400000));
    }

    #[test]
    fn no_savings_when_already_optimal() {
        let output = calculate(&input(TaxRegime::Turnover6, dec!(10000000)), &TaxRules::default())
            .unwrap();
        assert_eq!(output.recommended_regime, TaxRegime::Turnover6);
        assert_eq!(output.recommended_savings, Decimal::ZERO);
    }

    #[test]
    fn savings_never_negative() {
        // the comparison prices the patent at the selected rate too
        let input = CalculationInput {
            flat_rate: Some(dec!(1)),
            ..input(TaxRegime::Patent, dec!(2000000))
        };
        let output = calculate(&input, &TaxRules::default()).unwrap();
        assert_eq!(output.recommended_regime, TaxRegime::Patent);
        assert_eq!(output.recommended_savings, Decimal::ZERO);
    }

    #[test]
    fn recommendation_is_deterministic() {
        let input = CalculationInput {
            employee_count: 4,
            annual_payroll: dec!(3000000),
            expenses: dec!(15000000),
            vat_applies: true,
            vat_rate: Some(VatRate::Five),
            ..input(TaxRegime::General, dec!(40000000))
        };
        let rules = TaxRules::default();
        let first = calculate(&input, &rules).unwrap();
        for _ in 0..10 {
            assert_eq!(calculate(&input, &rules).unwrap(), first);
        }
    }

    #[test]
    fn calculations_agree_across_threads() {
        let calculator = Calculator::default();
        let input = input(TaxRegime::Turnover6, dec!(30000000));
        let expected = calculator.calculate(&input).unwrap();

        std::thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|_| s.spawn(|| calculator.calculate(&input).unwrap()))
                .collect();
            for handle in handles {
                assert_eq!(handle.join().unwrap(), expected);
            }
        });
    }

    #[test]
    fn ineligible_selected_regime_fails_whole_calculation() {
        let input = CalculationInput {
            employee_count: 1,
            annual_payroll: dec!(100000),
            status_type: StatusType::SelfEmployed,
            ..input(TaxRegime::SelfEmployedFlat, dec!(1000000))
        };
        let err = calculate(&input, &TaxRules::default()).unwrap_err();
        assert_eq!(err.field(), Some(Field::TaxRegime));
        assert_eq!(err.message, "Self-employed flat does not allow employees");
    }

    #[test]
    fn missing_vat_rate_fails() {
        let input = CalculationInput {
            vat_applies: true,
            ..input(TaxRegime::Turnover6, dec!(30000000))
        };
        let err = calculate(&input, &TaxRules::default()).unwrap_err();
        assert_eq!(err.field(), Some(Field::VatRate));
    }

    #[test]
    fn negative_revenue_fails_every_entry_point() {
        let rules = TaxRules::default();
        let input = input(TaxRegime::Turnover6, dec!(-1));
        let calculator = Calculator::new(rules.clone());

        assert_eq!(calculate(&input, &rules).unwrap_err().field(), Some(Field::Revenue));
        assert_eq!(
            calculator.compare(&input, FiscalYear(2027)).unwrap_err().field(),
            Some(Field::Revenue)
        );
    }

    #[test]
    fn oversized_payroll_rejected_before_totals() {
        let input = CalculationInput {
            employee_count: 5,
            annual_payroll: Decimal::MAX,
            ..input(TaxRegime::Turnover6, dec!(30000000))
        };
        let err = calculate(&input, &TaxRules::default()).unwrap_err();
        assert_eq!(err.field(), Some(Field::AnnualPayroll));

        let input = CalculationInput {
            employee_count: 10000,
            annual_payroll: dec!(1000000000),
            ..self::input(TaxRegime::General, dec!(10000000000))
        };
        let output = calculate(&input, &TaxRules::default()).unwrap();
        assert!(output.projected_total() > Decimal::ZERO);
    }

    #[test]
    fn compare_outside_window_fails() {
        let calculator = Calculator::default();
        let err = calculator
            .compare(&input(TaxRegime::Turnover6, dec!(1000000)), FiscalYear(2030))
            .unwrap_err();
        assert_eq!(err.field(), None);
        assert_eq!(err.message, "2030 is outside the projection window 2025-2028");
    }

    #[test]
    fn output_serializes_with_snake_case_codes() {
        let output = calculate(&input(TaxRegime::Turnover6, dec!(1000000)), &TaxRules::default())
            .unwrap();
        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["recommended_regime"], "turnover6");
        assert_eq!(json["status_type"], "sole_proprietor");
        assert_eq!(json["projection"][0]["year"], 2025);
        assert_eq!(json["regime_comparison"].as_array().unwrap().len(), 5);
    }
}
