use super::bands::{Band, BandTable};
use super::error::DomainError;
use super::input::{Region, StudentLoanPlan};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// UK Tax Year (runs 6 April to 5 April)
/// The year value represents the end year (e.g., 2025 = 2024/25 tax year)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
pub struct TaxYear(pub i32);

impl TaxYear {
    /// The tax year whose tables ship with this build
    pub const SUPPORTED: TaxYear = TaxYear(2025);

    /// Start date of the tax year (6 April of previous year)
    pub fn start_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.0 - 1, 4, 6)
    }

    /// End date of the tax year (5 April)
    pub fn end_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.0, 4, 5)
    }

    /// Display as "2024/25" format
    pub fn display(&self) -> String {
        format!("{}/{:02}", self.0 - 1, self.0 % 100)
    }

    /// Thresholds and band tables for this tax year
    pub fn rates(&self) -> Result<Rates, DomainError> {
        match self.0 {
            2025 => rates_2024_25(),
            _ => Err(DomainError::UnsupportedTaxYear(*self)),
        }
    }
}

impl Default for TaxYear {
    fn default() -> Self {
        TaxYear::SUPPORTED
    }
}

impl std::fmt::Display for TaxYear {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// Repayment threshold and rate for one student loan plan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StudentLoanTerms {
    pub threshold: Decimal,
    pub rate: Decimal,
}

/// Statutory figures for one tax year.
///
/// Income tax bounds are on income after the personal allowance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rates {
    pub personal_allowance: Decimal,
    /// Income above which the personal allowance is withdrawn
    pub taper_threshold: Decimal,
    /// Class 1 employee contributions
    pub national_insurance: BandTable,
    england_and_wales: BandTable,
    scotland: BandTable,
    northern_ireland: BandTable,
    plan1: StudentLoanTerms,
    plan2: StudentLoanTerms,
    plan4: StudentLoanTerms,
    postgraduate: StudentLoanTerms,
}

impl Rates {
    pub fn income_tax_bands(&self, region: Region) -> &BandTable {
        match region {
            Region::EnglandAndWales => &self.england_and_wales,
            Region::Scotland => &self.scotland,
            Region::NorthernIreland => &self.northern_ireland,
        }
    }

    pub fn student_loan(&self, plan: StudentLoanPlan) -> Option<StudentLoanTerms> {
        match plan {
            StudentLoanPlan::None => None,
            StudentLoanPlan::Plan1 => Some(self.plan1),
            StudentLoanPlan::Plan2 => Some(self.plan2),
            StudentLoanPlan::Plan4 => Some(self.plan4),
            StudentLoanPlan::Postgraduate => Some(self.postgraduate),
        }
    }
}

fn rates_2024_25() -> Result<Rates, DomainError> {
    let ruk = || {
        BandTable::new(vec![
            Band::new("Basic", dec!(37700), dec!(0.20)),
            Band::new("Higher", dec!(125140), dec!(0.40)),
            Band::unbounded("Additional", dec!(0.45)),
        ])
    };

    Ok(Rates {
        personal_allowance: dec!(12570),
        taper_threshold: dec!(100000),
        national_insurance: BandTable::new(vec![
            Band::new("Below primary threshold", dec!(12570), dec!(0)),
            Band::new("Main", dec!(50270), dec!(0.08)),
            Band::unbounded("Above upper earnings limit", dec!(0.02)),
        ])?,
        england_and_wales: ruk()?,
        scotland: BandTable::new(vec![
            Band::new("Starter", dec!(2306), dec!(0.19)),
            Band::new("Basic", dec!(13991), dec!(0.20)),
            Band::new("Intermediate", dec!(31092), dec!(0.21)),
            Band::new("Higher", dec!(62430), dec!(0.42)),
            Band::new("Advanced", dec!(125140), dec!(0.45)),
            Band::unbounded("Top", dec!(0.48)),
        ])?,
        northern_ireland: ruk()?,
        plan1: StudentLoanTerms {
            threshold: dec!(24990),
            rate: dec!(0.09),
        },
        plan2: StudentLoanTerms {
            threshold: dec!(27295),
            rate: dec!(0.09),
        },
        plan4: StudentLoanTerms {
            threshold: dec!(31395),
            rate: dec!(0.09),
        },
        postgraduate: StudentLoanTerms {
            threshold: dec!(21000),
            rate: dec!(0.06),
        },
    })
}
