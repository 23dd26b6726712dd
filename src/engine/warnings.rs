use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

/// Conditions worth flagging to the user that do not invalidate a result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum Warning {
    /// Personal allowance reduced because income is above the taper threshold.
    AllowanceTapered { lost: Decimal },
    /// Pension and salary exchange together exceed gross pay.
    NegativeTaxableIncome { amount: Decimal },
    /// Deductions exceed income, so take-home pay is negative.
    DeductionsExceedIncome { shortfall: Decimal },
}

impl Warning {
    pub fn message(&self) -> String {
        match self {
            Warning::AllowanceTapered { lost } => {
                format!(
                    "Personal allowance reduced by £{:.2} by the high income taper",
                    pence(*lost)
                )
            }
            Warning::NegativeTaxableIncome { amount } => {
                format!(
                    "Pension and salary exchange exceed gross pay by £{:.2}",
                    pence(amount.abs())
                )
            }
            Warning::DeductionsExceedIncome { shortfall } => {
                format!("Deductions exceed income by £{:.2}", pence(*shortfall))
            }
        }
    }
}

fn pence(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn messages_show_pounds_and_pence() {
        let tapered = Warning::AllowanceTapered { lost: dec!(5000.5) };
        assert_eq!(
            tapered.message(),
            "Personal allowance reduced by £5000.50 by the high income taper"
        );
        let negative = Warning::NegativeTaxableIncome { amount: dec!(-8000) };
        assert_eq!(
            negative.message(),
            "Pension and salary exchange exceed gross pay by £8000.00"
        );
    }

    #[test]
    fn serializes_with_type_tag() {
        let json = serde_json::to_string(&Warning::DeductionsExceedIncome {
            shortfall: dec!(12.5),
        })
        .unwrap();
        assert_eq!(json, r#"{"type":"DeductionsExceedIncome","shortfall":"12.5"}"#);
    }
}
