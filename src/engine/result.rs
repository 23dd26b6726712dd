use super::allowance::personal_allowance;
use super::bands::{income_tax, BandSlice};
use super::deductions::{national_insurance, student_loan_repayment};
use super::error::DomainError;
use super::input::{annualize, CalculationInput, PayPeriod, Region, StudentLoanPlan};
use super::uk::TaxYear;
use super::warnings::Warning;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

/// Annual deductions and take-home pay for one calculation.
///
/// Figures are exact; round only for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaxResult {
    pub tax_year: TaxYear,
    pub region: Region,
    pub student_loan_plan: StudentLoanPlan,
    pub gross_annual: Decimal,
    pub personal_allowance: Decimal,
    /// Gross less pension and salary exchange; may be negative
    pub taxable_income: Decimal,
    pub income_tax: Decimal,
    pub national_insurance: Decimal,
    pub pension_deduction: Decimal,
    pub student_loan_repayment: Decimal,
    pub salary_exchange_deduction: Decimal,
    /// May be negative when deductions exceed income
    pub take_home_annual: Decimal,
    pub income_tax_bands: Vec<BandSlice>,
    pub national_insurance_bands: Vec<BandSlice>,
    pub warnings: Vec<Warning>,
}

/// Every figure of a [`TaxResult`] divided down to one pay period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PeriodBreakdown {
    pub period: PayPeriod,
    pub gross: Decimal,
    pub income_tax: Decimal,
    pub national_insurance: Decimal,
    pub pension: Decimal,
    pub student_loan: Decimal,
    pub salary_exchange: Decimal,
    pub take_home: Decimal,
}

impl TaxResult {
    pub fn total_deductions(&self) -> Decimal {
        self.income_tax
            + self.national_insurance
            + self.student_loan_repayment
            + self.pension_deduction
            + self.salary_exchange_deduction
    }

    /// True when deductions plus take-home add back up to gross pay
    pub fn reconciles(&self) -> bool {
        self.total_deductions() + self.take_home_annual == self.gross_annual
    }

    /// Per-period figures, always recomputed from the annual ones
    pub fn breakdown(&self, period: PayPeriod) -> PeriodBreakdown {
        let n = period.periods_per_year();
        PeriodBreakdown {
            period,
            gross: self.gross_annual / n,
            income_tax: self.income_tax / n,
            national_insurance: self.national_insurance / n,
            pension: self.pension_deduction / n,
            student_loan: self.student_loan_repayment / n,
            salary_exchange: self.salary_exchange_deduction / n,
            take_home: self.take_home_annual / n,
        }
    }
}

/// Calculate deductions and take-home pay.
///
/// Income tax, National Insurance and student loan are all charged on
/// taxable income: gross pay less pension contributions and salary exchange.
pub fn calculate(input: &CalculationInput) -> Result<TaxResult, DomainError> {
    input.validate()?;
    let rates = input.tax_year.rates()?;

    let gross = annualize(input.salary_amount, input.pay_period)?;
    let pension = gross * input.pension_contribution_percent / dec!(100);
    let salary_exchange = input.salary_exchange_amount;
    let taxable = gross - pension - salary_exchange;

    let allowance = personal_allowance(taxable, &rates);
    let tax = income_tax(taxable, allowance, rates.income_tax_bands(input.region));
    let ni = national_insurance(taxable, &rates);
    let student_loan = student_loan_repayment(taxable, input.student_loan_plan, &rates);
    let take_home = taxable - tax.total - ni.total - student_loan;

    let mut warnings = Vec::new();
    if allowance < rates.personal_allowance {
        warnings.push(Warning::AllowanceTapered {
            lost: rates.personal_allowance - allowance,
        });
    }
    if taxable < Decimal::ZERO {
        warnings.push(Warning::NegativeTaxableIncome { amount: taxable });
    }
    if take_home < Decimal::ZERO {
        warnings.push(Warning::DeductionsExceedIncome {
            shortfall: -take_home,
        });
    }

    log::debug!(
        "{} {}: gross {} taxable {} tax {} NI {} student loan {} take home {}",
        input.tax_year,
        input.region.display(),
        gross,
        taxable,
        tax.total,
        ni.total,
        student_loan,
        take_home
    );

    Ok(TaxResult {
        tax_year: input.tax_year,
        region: input.region,
        student_loan_plan: input.student_loan_plan,
        gross_annual: gross,
        personal_allowance: allowance,
        taxable_income: taxable,
        income_tax: tax.total,
        national_insurance: ni.total,
        pension_deduction: pension,
        student_loan_repayment: student_loan,
        salary_exchange_deduction: salary_exchange,
        take_home_annual: take_home,
        income_tax_bands: tax.slices,
        national_insurance_bands: ni.slices,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::input::{max_annual_amount, parse_amount};
    use proptest::prelude::*;

    #[test]
    fn england_and_wales_higher_rate() {
        let result = calculate(&CalculationInput::annual(dec!(60000))).unwrap();
        assert_eq!(result.personal_allowance, dec!(12570));
        assert_eq!(result.income_tax, dec!(11432));
        assert_eq!(result.national_insurance, dec!(3210.60));
        assert_eq!(result.take_home_annual, dec!(45357.40));
        assert!(result.warnings.is_empty());
        assert!(result.reconciles());
    }

    #[test]
    fn low_salary_pays_nothing_in_any_region() {
        for region in [Region::EnglandAndWales, Region::Scotland, Region::NorthernIreland] {
            let input = CalculationInput {
                region,
                ..CalculationInput::annual(dec!(10000))
            };
            let result = calculate(&input).unwrap();
            assert_eq!(result.income_tax, dec!(0));
            assert_eq!(result.national_insurance, dec!(0));
            assert_eq!(result.take_home_annual, dec!(10000));
        }
    }

    #[test]
    fn scotland_uses_its_own_bands() {
        let input = CalculationInput {
            region: Region::Scotland,
            ..CalculationInput::annual(dec!(60000))
        };
        let result = calculate(&input).unwrap();
        // 2306 @ 19% + 11685 @ 20% + 17101 @ 21% + 16338 @ 42%
        assert_eq!(result.income_tax, dec!(13228.31));
        assert_eq!(result.income_tax_bands.len(), 4);
        assert_eq!(result.income_tax_bands[3].name, "Higher");
    }

    #[test]
    fn northern_ireland_matches_england_and_wales() {
        let ew = calculate(&CalculationInput::annual(dec!(80000))).unwrap();
        let ni = calculate(&CalculationInput {
            region: Region::NorthernIreland,
            ..CalculationInput::annual(dec!(80000))
        })
        .unwrap();
        assert_eq!(ew.income_tax, ni.income_tax);
    }

    #[test]
    fn monthly_salary_is_annualised() {
        let input = CalculationInput {
            salary_amount: dec!(5000),
            pay_period: PayPeriod::Month,
            ..Default::default()
        };
        let result = calculate(&input).unwrap();
        assert_eq!(result.gross_annual, dec!(60000));
        assert_eq!(result.income_tax, dec!(11432));
    }

    #[test]
    fn pension_reduces_taxable_income() {
        let input = CalculationInput {
            pension_contribution_percent: dec!(5),
            ..CalculationInput::annual(dec!(40000))
        };
        let result = calculate(&input).unwrap();
        assert_eq!(result.pension_deduction, dec!(2000));
        assert_eq!(result.taxable_income, dec!(38000));
        assert_eq!(result.income_tax, dec!(5086));
        assert_eq!(result.national_insurance, dec!(2034.40));
        assert_eq!(result.take_home_annual, dec!(30879.60));
        assert!(result.reconciles());
    }

    #[test]
    fn student_loan_charged_on_taxable_income() {
        let input = CalculationInput {
            student_loan_plan: StudentLoanPlan::Plan2,
            salary_exchange_amount: dec!(2000),
            ..CalculationInput::annual(dec!(32000))
        };
        let result = calculate(&input).unwrap();
        assert_eq!(result.taxable_income, dec!(30000));
        assert_eq!(result.student_loan_repayment, dec!(243.45));
        assert!(result.reconciles());
    }

    #[test]
    fn high_income_tapers_allowance() {
        let result = calculate(&CalculationInput::annual(dec!(110000))).unwrap();
        assert_eq!(result.personal_allowance, dec!(7570));
        // 37700 @ 20% + 64730 @ 40%
        assert_eq!(result.income_tax, dec!(33432));
        assert_eq!(
            result.warnings,
            vec![Warning::AllowanceTapered { lost: dec!(5000) }]
        );
    }

    #[test]
    fn salary_exchange_above_gross_reports_negative_take_home() {
        let input = CalculationInput {
            salary_exchange_amount: dec!(15000),
            ..CalculationInput::annual(dec!(10000))
        };
        let result = calculate(&input).unwrap();
        assert_eq!(result.income_tax, dec!(0));
        assert_eq!(result.national_insurance, dec!(0));
        assert_eq!(result.take_home_annual, dec!(-5000));
        assert_eq!(
            result.warnings,
            vec![
                Warning::NegativeTaxableIncome { amount: dec!(-5000) },
                Warning::DeductionsExceedIncome { shortfall: dec!(5000) },
            ]
        );
        assert!(result.reconciles());
    }

    #[test]
    fn invalid_input_is_rejected() {
        let input = CalculationInput {
            pension_contribution_percent: dec!(150),
            ..CalculationInput::annual(dec!(30000))
        };
        assert_eq!(
            calculate(&input),
            Err(DomainError::PensionPercentOutOfRange(dec!(150)))
        );
    }

    #[test]
    fn unsupported_tax_year_is_rejected() {
        let input = CalculationInput {
            tax_year: TaxYear(2031),
            ..CalculationInput::annual(dec!(30000))
        };
        assert_eq!(
            calculate(&input),
            Err(DomainError::UnsupportedTaxYear(TaxYear(2031)))
        );
    }

    #[test]
    fn salary_beyond_range_is_an_error() {
        let input = CalculationInput {
            salary_amount: parse_amount("salary", "1e28").unwrap(),
            pay_period: PayPeriod::Month,
            ..Default::default()
        };
        assert_eq!(
            calculate(&input),
            Err(DomainError::AmountTooLarge { field: "salary" })
        );

        let input = CalculationInput {
            pension_contribution_percent: dec!(100),
            salary_exchange_amount: max_annual_amount(),
            ..CalculationInput::annual(max_annual_amount())
        };
        let result = calculate(&input).unwrap();
        assert!(result.reconciles());
    }

    #[test]
    fn salary_exchange_can_restore_personal_allowance() {
        let input = CalculationInput {
            salary_exchange_amount: dec!(10000),
            ..CalculationInput::annual(dec!(110000))
        };
        let result = calculate(&input).unwrap();
        assert_eq!(result.taxable_income, dec!(100000));
        assert_eq!(result.personal_allowance, dec!(12570));
        assert!(result.warnings.is_empty());

        let input = CalculationInput {
            pension_contribution_percent: dec!(10),
            ..CalculationInput::annual(dec!(120000))
        };
        let result = calculate(&input).unwrap();
        assert_eq!(result.taxable_income, dec!(108000));
        assert_eq!(result.personal_allowance, dec!(8570));
    }

    #[test]
    fn error_does_not_affect_next_call() {
        assert!(calculate(&CalculationInput::annual(dec!(-1))).is_err());
        let result = calculate(&CalculationInput::annual(dec!(60000))).unwrap();
        assert_eq!(result.income_tax, dec!(11432));
    }

    #[test]
    fn breakdown_divides_annual_figures() {
        let result = calculate(&CalculationInput::annual(dec!(60000))).unwrap();
        let monthly = result.breakdown(PayPeriod::Month);
        assert_eq!(monthly.gross, dec!(5000));
        assert_eq!(monthly.income_tax.round_dp(2), dec!(952.67));
        let weekly = result.breakdown(PayPeriod::Week);
        assert_eq!(weekly.gross.round_dp(2), dec!(1153.85));
        assert_eq!(result.breakdown(PayPeriod::Annual).take_home, result.take_home_annual);
    }

    fn region_strategy() -> impl Strategy<Value = Region> {
        prop_oneof![
            Just(Region::EnglandAndWales),
            Just(Region::Scotland),
            Just(Region::NorthernIreland),
        ]
    }

    fn plan_strategy() -> impl Strategy<Value = StudentLoanPlan> {
        prop_oneof![
            Just(StudentLoanPlan::None),
            Just(StudentLoanPlan::Plan1),
            Just(StudentLoanPlan::Plan2),
            Just(StudentLoanPlan::Plan4),
            Just(StudentLoanPlan::Postgraduate),
        ]
    }

    fn input_strategy() -> impl Strategy<Value = CalculationInput> {
        (
            0i64..100_000_000i64,
            0u32..=100u32,
            0i64..5_000_000i64,
            region_strategy(),
            plan_strategy(),
        )
            .prop_map(|(salary, pension, exchange, region, plan)| CalculationInput {
                salary_amount: Decimal::new(salary, 2),
                pension_contribution_percent: Decimal::from(pension),
                salary_exchange_amount: Decimal::new(exchange, 2),
                region,
                student_loan_plan: plan,
                ..Default::default()
            })
    }

    proptest! {
        #[test]
        fn deductions_reconcile_with_gross(input in input_strategy()) {
            let result = calculate(&input).unwrap();
            prop_assert!(result.reconciles());
        }

        #[test]
        fn band_slices_cover_income_above_allowance(input in input_strategy()) {
            let result = calculate(&input).unwrap();
            let sliced: Decimal = result.income_tax_bands.iter().map(|s| s.taxable).sum();
            let expected = (result.taxable_income - result.personal_allowance).max(Decimal::ZERO);
            prop_assert_eq!(sliced, expected);
        }

        #[test]
        fn identical_input_gives_identical_result(input in input_strategy()) {
            let first = calculate(&input).unwrap();
            let second = calculate(&input).unwrap();
            prop_assert_eq!(first, second);
        }

        #[test]
        fn deductions_are_non_negative(input in input_strategy()) {
            let result = calculate(&input).unwrap();
            prop_assert!(result.income_tax >= Decimal::ZERO);
            prop_assert!(result.national_insurance >= Decimal::ZERO);
            prop_assert!(result.student_loan_repayment >= Decimal::ZERO);
            prop_assert!(result.pension_deduction >= Decimal::ZERO);
        }
    }
}
