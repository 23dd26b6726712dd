use super::uk::TaxYear;
use rust_decimal::Decimal;

/// Errors local to a single calculation request.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("{field} must not be negative: {value}")]
    NegativeAmount { field: &'static str, value: Decimal },
    #[error("{field} must be a finite number")]
    NonFinite { field: &'static str },
    #[error("{field} is not a valid amount: '{value}'")]
    InvalidAmount { field: &'static str, value: String },
    #[error("{field} is too large to calculate")]
    AmountTooLarge { field: &'static str },
    #[error("pension contribution must be between 0 and 100 percent: {0}")]
    PensionPercentOutOfRange(Decimal),
    #[error("unknown region: '{0}'")]
    UnknownRegion(String),
    #[error("unknown student loan plan: '{0}'")]
    UnknownStudentLoanPlan(String),
    #[error("unknown pay period: '{0}'")]
    UnknownPayPeriod(String),
    #[error("no tax tables for tax year {0}")]
    UnsupportedTaxYear(TaxYear),
    #[error("invalid band table: {0}")]
    InvalidBandTable(String),
}
