use super::uk::Rates;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Personal allowance after the high-income taper.
///
/// Above the taper threshold the allowance shrinks by £1 for every £2 of
/// income, down to zero.
pub fn personal_allowance(annual_income: Decimal, rates: &Rates) -> Decimal {
    let base = rates.personal_allowance;
    if annual_income <= rates.taper_threshold {
        return base;
    }

    let reduction = ((annual_income - rates.taper_threshold) / dec!(2)).min(base);
    let allowance = (base - reduction).max(Decimal::ZERO);
    log::debug!(
        "Personal allowance tapered by {} to {} (income {})",
        reduction,
        allowance,
        annual_income
    );
    allowance
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::uk::TaxYear;

    fn allowance(income: Decimal) -> Decimal {
        personal_allowance(income, &TaxYear::SUPPORTED.rates().unwrap())
    }

    #[test]
    fn full_allowance_up_to_threshold() {
        assert_eq!(allowance(dec!(0)), dec!(12570));
        assert_eq!(allowance(dec!(99999)), dec!(12570));
        assert_eq!(allowance(dec!(100000)), dec!(12570));
    }

    #[test]
    fn one_pound_lost_per_two_earned() {
        assert_eq!(allowance(dec!(100002)), dec!(12569));
        assert_eq!(allowance(dec!(110000)), dec!(7570));
        assert_eq!(allowance(dec!(100001)), dec!(12569.5));
    }

    #[test]
    fn fully_withdrawn() {
        assert_eq!(allowance(dec!(125140)), dec!(0));
        assert_eq!(allowance(dec!(500000)), dec!(0));
    }
}
