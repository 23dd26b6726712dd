use super::bands::BandedAmount;
use super::input::StudentLoanPlan;
use super::uk::Rates;
use rust_decimal::Decimal;

/// Class 1 employee National Insurance on `taxable_income`
pub fn national_insurance(taxable_income: Decimal, rates: &Rates) -> BandedAmount {
    rates.national_insurance.apply(taxable_income)
}

/// Student loan repayment: a flat rate on income above the plan's threshold
pub fn student_loan_repayment(
    taxable_income: Decimal,
    plan: StudentLoanPlan,
    rates: &Rates,
) -> Decimal {
    match rates.student_loan(plan) {
        Some(terms) if taxable_income > terms.threshold => {
            (taxable_income - terms.threshold) * terms.rate
        }
        _ => Decimal::ZERO,
    }
}
