pub mod allowance;
pub mod bands;
pub mod deductions;
pub mod error;
pub mod input;
pub mod result;
pub mod uk;
pub mod warnings;

// Flat public surface for domain types and functions.
pub use allowance::personal_allowance;
pub use bands::{income_tax, Band, BandSlice, BandTable, BandedAmount};
pub use deductions::{national_insurance, student_loan_repayment};
pub use error::DomainError;
pub use input::{
    annualize, max_annual_amount, parse_amount, CalculationInput, PayPeriod, Region,
    StudentLoanPlan,
};
pub use result::{calculate, PeriodBreakdown, TaxResult};
pub use uk::{Rates, TaxYear};
pub use warnings::Warning;
