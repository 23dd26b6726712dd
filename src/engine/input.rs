use super::error::DomainError;
use super::uk::TaxYear;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How often the entered salary is paid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum PayPeriod {
    #[default]
    Annual,
    Month,
    Week,
    /// Working day; a year has 260 of them
    Day,
}

impl PayPeriod {
    pub fn periods_per_year(self) -> Decimal {
        match self {
            PayPeriod::Annual => dec!(1),
            PayPeriod::Month => dec!(12),
            PayPeriod::Week => dec!(52),
            PayPeriod::Day => dec!(260),
        }
    }

    pub fn display(self) -> &'static str {
        match self {
            PayPeriod::Annual => "Yearly",
            PayPeriod::Month => "Monthly",
            PayPeriod::Week => "Weekly",
            PayPeriod::Day => "Daily",
        }
    }
}

impl FromStr for PayPeriod {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_key(s).as_str() {
            "annual" | "annually" | "year" | "yearly" => Ok(PayPeriod::Annual),
            "month" | "monthly" => Ok(PayPeriod::Month),
            "week" | "weekly" => Ok(PayPeriod::Week),
            "day" | "daily" => Ok(PayPeriod::Day),
            _ => Err(DomainError::UnknownPayPeriod(s.to_string())),
        }
    }
}

/// Largest annual amount accepted for gross pay or salary exchange.
///
/// Keeps every later product and sum well inside `Decimal` range.
pub fn max_annual_amount() -> Decimal {
    dec!(1000000000000)
}

/// Convert a salary paid per `period` into an annual figure
pub fn annualize(amount: Decimal, period: PayPeriod) -> Result<Decimal, DomainError> {
    amount
        .checked_mul(period.periods_per_year())
        .filter(|annual| *annual <= max_annual_amount())
        .ok_or(DomainError::AmountTooLarge { field: "salary" })
}

/// Jurisdiction whose income tax bands apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum Region {
    #[default]
    EnglandAndWales,
    Scotland,
    NorthernIreland,
}

impl Region {
    pub fn display(self) -> &'static str {
        match self {
            Region::EnglandAndWales => "England & Wales",
            Region::Scotland => "Scotland",
            Region::NorthernIreland => "Northern Ireland",
        }
    }
}

impl FromStr for Region {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_key(s).as_str() {
            "englandandwales" | "englandwales" | "england" | "wales" => {
                Ok(Region::EnglandAndWales)
            }
            "scotland" => Ok(Region::Scotland),
            "northernireland" | "ni" => Ok(Region::NorthernIreland),
            _ => Err(DomainError::UnknownRegion(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum StudentLoanPlan {
    #[default]
    None,
    Plan1,
    Plan2,
    Plan4,
    Postgraduate,
}

impl StudentLoanPlan {
    pub fn display(self) -> &'static str {
        match self {
            StudentLoanPlan::None => "None",
            StudentLoanPlan::Plan1 => "Plan 1",
            StudentLoanPlan::Plan2 => "Plan 2",
            StudentLoanPlan::Plan4 => "Plan 4",
            StudentLoanPlan::Postgraduate => "Postgraduate",
        }
    }
}

impl FromStr for StudentLoanPlan {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_key(s).as_str() {
            "none" => Ok(StudentLoanPlan::None),
            "plan1" | "1" => Ok(StudentLoanPlan::Plan1),
            "plan2" | "2" => Ok(StudentLoanPlan::Plan2),
            "plan4" | "4" => Ok(StudentLoanPlan::Plan4),
            "postgraduate" | "postgrad" | "pg" => Ok(StudentLoanPlan::Postgraduate),
            _ => Err(DomainError::UnknownStudentLoanPlan(s.to_string())),
        }
    }
}

/// Lowercase and drop everything but letters and digits, so
/// "England & Wales", "england-and-wales" and "Plan 2" all match.
fn normalize_key(s: &str) -> String {
    s.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Everything one calculation needs
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct CalculationInput {
    /// Salary in GBP, paid per `pay_period`
    #[serde(default)]
    #[schemars(with = "f64")]
    pub salary_amount: Decimal,
    #[serde(default)]
    pub pay_period: PayPeriod,
    #[serde(default)]
    pub region: Region,
    /// Percentage of gross pay paid into a pension (0-100)
    #[serde(default)]
    #[schemars(with = "f64")]
    pub pension_contribution_percent: Decimal,
    #[serde(default)]
    pub student_loan_plan: StudentLoanPlan,
    /// Annual amount given up through salary exchange, in GBP
    #[serde(default)]
    #[schemars(with = "f64")]
    pub salary_exchange_amount: Decimal,
    #[serde(default)]
    pub tax_year: TaxYear,
}

impl CalculationInput {
    /// Input for an annual salary with every other option at its default
    pub fn annual(salary: Decimal) -> Self {
        CalculationInput {
            salary_amount: salary,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.salary_amount < Decimal::ZERO {
            return Err(DomainError::NegativeAmount {
                field: "salary",
                value: self.salary_amount,
            });
        }
        if self.salary_exchange_amount < Decimal::ZERO {
            return Err(DomainError::NegativeAmount {
                field: "salary exchange",
                value: self.salary_exchange_amount,
            });
        }
        if self.salary_exchange_amount > max_annual_amount() {
            return Err(DomainError::AmountTooLarge {
                field: "salary exchange",
            });
        }
        let pension = self.pension_contribution_percent;
        if pension < Decimal::ZERO || pension > dec!(100) {
            return Err(DomainError::PensionPercentOutOfRange(pension));
        }
        Ok(())
    }
}

/// Parse a user-entered amount such as "60000", "£2,500.50" or "1.2e5".
///
/// Sign is kept; range checks belong to [`CalculationInput::validate`].
pub fn parse_amount(field: &'static str, text: &str) -> Result<Decimal, DomainError> {
    let cleaned: String = text
        .trim()
        .chars()
        .filter(|c| *c != ',' && *c != '£' && *c != '_')
        .collect();

    let unsigned = cleaned.trim_start_matches(['+', '-']).to_ascii_lowercase();
    if matches!(unsigned.as_str(), "nan" | "inf" | "infinity") {
        return Err(DomainError::NonFinite { field });
    }

    Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .map_err(|_| DomainError::InvalidAmount {
            field,
            value: text.to_string(),
        })
}
