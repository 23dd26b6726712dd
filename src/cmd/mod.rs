pub mod batch;
pub mod calc;
pub mod report;
pub mod schema;

use paye::engine::{
    parse_amount, BandSlice, CalculationInput, DomainError, PayPeriod, Region, StudentLoanPlan,
    TaxResult, TaxYear,
};
use clap::{Args, ValueEnum};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

/// Calculation inputs shared by the commands that run a single calculation
#[derive(Args, Debug)]
pub struct InputArgs {
    /// Salary in GBP for the chosen pay period (e.g. 60000 or "£2,500")
    #[arg(short, long, value_parser = parse_salary)]
    salary: Decimal,

    /// How often the salary is paid
    #[arg(short, long, value_enum, default_value_t = PeriodArg::Annual)]
    period: PeriodArg,

    /// Region whose income tax bands apply
    #[arg(short, long, value_enum, default_value_t = RegionArg::EnglandAndWales)]
    region: RegionArg,

    /// Pension contribution as a percentage of gross pay
    #[arg(long, value_parser = parse_pension, default_value = "0")]
    pension: Decimal,

    /// Student loan repayment plan
    #[arg(long, value_enum, default_value_t = StudentLoanArg::None)]
    student_loan: StudentLoanArg,

    /// Annual salary exchange amount in GBP
    #[arg(long, value_parser = parse_salary_exchange, default_value = "0")]
    salary_exchange: Decimal,

    /// Tax year (e.g., 2025 for 2024/25)
    #[arg(short, long)]
    year: Option<i32>,
}

impl InputArgs {
    pub fn to_input(&self) -> CalculationInput {
        CalculationInput {
            salary_amount: self.salary,
            pay_period: self.period.into(),
            region: self.region.into(),
            pension_contribution_percent: self.pension,
            student_loan_plan: self.student_loan.into(),
            salary_exchange_amount: self.salary_exchange,
            tax_year: self.year.map(TaxYear).unwrap_or_default(),
        }
    }
}

fn parse_salary(s: &str) -> Result<Decimal, DomainError> {
    parse_amount("salary", s)
}

fn parse_pension(s: &str) -> Result<Decimal, DomainError> {
    parse_amount("pension", s.trim().trim_end_matches('%'))
}

fn parse_salary_exchange(s: &str) -> Result<Decimal, DomainError> {
    parse_amount("salary exchange", s)
}

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum PeriodArg {
    #[default]
    Annual,
    Month,
    Week,
    Day,
}

impl From<PeriodArg> for PayPeriod {
    fn from(arg: PeriodArg) -> Self {
        match arg {
            PeriodArg::Annual => PayPeriod::Annual,
            PeriodArg::Month => PayPeriod::Month,
            PeriodArg::Week => PayPeriod::Week,
            PeriodArg::Day => PayPeriod::Day,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum RegionArg {
    #[default]
    EnglandAndWales,
    Scotland,
    NorthernIreland,
}

impl From<RegionArg> for Region {
    fn from(arg: RegionArg) -> Self {
        match arg {
            RegionArg::EnglandAndWales => Region::EnglandAndWales,
            RegionArg::Scotland => Region::Scotland,
            RegionArg::NorthernIreland => Region::NorthernIreland,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum StudentLoanArg {
    #[default]
    None,
    Plan1,
    Plan2,
    Plan4,
    Postgraduate,
}

impl From<StudentLoanArg> for StudentLoanPlan {
    fn from(arg: StudentLoanArg) -> Self {
        match arg {
            StudentLoanArg::None => StudentLoanPlan::None,
            StudentLoanArg::Plan1 => StudentLoanPlan::Plan1,
            StudentLoanArg::Plan2 => StudentLoanPlan::Plan2,
            StudentLoanArg::Plan4 => StudentLoanPlan::Plan4,
            StudentLoanArg::Postgraduate => StudentLoanPlan::Postgraduate,
        }
    }
}

/// One line of the yearly/monthly/weekly breakdown table
#[derive(Debug, Clone, PartialEq, Eq, Tabled)]
pub struct BreakdownRow {
    #[tabled(rename = "")]
    pub label: &'static str,
    #[tabled(rename = "Yearly")]
    pub yearly: String,
    #[tabled(rename = "Monthly")]
    pub monthly: String,
    #[tabled(rename = "Weekly")]
    pub weekly: String,
}

/// Breakdown rows; optional deductions appear only when non-zero
pub fn breakdown_rows(result: &TaxResult) -> Vec<BreakdownRow> {
    let rows = [
        ("Gross pay", result.gross_annual, true),
        ("Pension", result.pension_deduction, false),
        ("Salary exchange", result.salary_exchange_deduction, false),
        ("Income Tax", result.income_tax, true),
        ("National Insurance", result.national_insurance, true),
        ("Student loan", result.student_loan_repayment, false),
        ("Take home pay", result.take_home_annual, true),
    ];

    rows.into_iter()
        .filter(|(_, amount, always)| *always || !amount.is_zero())
        .map(|(label, amount, _)| BreakdownRow {
            label,
            yearly: format_gbp_signed(amount),
            monthly: format_gbp_signed(amount / PayPeriod::Month.periods_per_year()),
            weekly: format_gbp_signed(amount / PayPeriod::Week.periods_per_year()),
        })
        .collect()
}

pub fn breakdown_table(result: &TaxResult) -> String {
    Table::new(breakdown_rows(result))
        .with(Style::rounded())
        .with(Modify::new(Columns::new(1..)).with(Alignment::right()))
        .to_string()
}

/// Human-readable walk through the bands that produced each figure
pub fn explain(result: &TaxResult) -> Vec<String> {
    let mut lines = vec![format!("Gross pay: {}", format_gbp(result.gross_annual))];

    if !result.pension_deduction.is_zero() || !result.salary_exchange_deduction.is_zero() {
        lines.push(format!(
            "Taxable pay: {} ({} - {} pension - {} salary exchange)",
            format_gbp_signed(result.taxable_income),
            format_gbp(result.gross_annual),
            format_gbp(result.pension_deduction),
            format_gbp(result.salary_exchange_deduction),
        ));
    }
    lines.push(format!(
        "Personal allowance: {}",
        format_gbp(result.personal_allowance)
    ));

    lines.push(format!("Income Tax: {}", format_gbp(result.income_tax)));
    if result.income_tax_bands.is_empty() {
        lines.push(format!(
            "  No income tax on income up to {}",
            format_gbp(result.personal_allowance)
        ));
    }
    for slice in &result.income_tax_bands {
        lines.push(slice_line(slice, result.personal_allowance));
    }

    lines.push(format!(
        "National Insurance: {}",
        format_gbp(result.national_insurance)
    ));
    if result.national_insurance_bands.is_empty() {
        lines.push("  No National Insurance on income below the primary threshold".to_string());
    }
    for slice in &result.national_insurance_bands {
        lines.push(slice_line(slice, Decimal::ZERO));
    }

    if result.student_loan_plan != StudentLoanPlan::None {
        lines.push(format!(
            "Student loan ({}): {}",
            result.student_loan_plan.display(),
            format_gbp(result.student_loan_repayment)
        ));
    }

    lines.push(format!(
        "Take home pay: {} ({} - {} income tax - {} NI - {} student loan)",
        format_gbp_signed(result.take_home_annual),
        format_gbp_signed(result.taxable_income),
        format_gbp(result.income_tax),
        format_gbp(result.national_insurance),
        format_gbp(result.student_loan_repayment),
    ));

    for warning in &result.warnings {
        lines.push(format!("Warning: {}", warning.message()));
    }
    lines
}

/// `offset` shifts band bounds back into pre-allowance income
fn slice_line(slice: &BandSlice, offset: Decimal) -> String {
    let from = slice.lower + offset;
    let to = from + slice.taxable;
    format!(
        "  {}% ({}) on income from {} to {}: {}",
        format_rate(slice.rate),
        slice.name,
        format_gbp(from),
        format_gbp(to),
        format_gbp(slice.tax)
    )
}

fn format_rate(rate: Decimal) -> String {
    (rate * dec!(100)).normalize().to_string()
}

/// Round to whole pence, halves away from zero
pub fn to_pence(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

pub fn format_gbp(amount: Decimal) -> String {
    format!("£{:.2}", to_pence(amount))
}

pub fn format_gbp_signed(amount: Decimal) -> String {
    if amount < Decimal::ZERO {
        format!("-£{:.2}", to_pence(amount.abs()))
    } else {
        format_gbp(amount)
    }
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
