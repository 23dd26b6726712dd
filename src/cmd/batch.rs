//! Batch command - run one calculation per CSV row
//!
//! A row that fails reports its error in the output and never stops the
//! rows after it.

use super::schema::CsvColumn;
use super::to_pence;
use paye::engine::{
    calculate, parse_amount, CalculationInput, DomainError, PayPeriod, TaxResult,
};
use crate::utils::write_csv;
use clap::Args;
use paye_derive::CsvColumns;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub struct BatchCommand {
    /// CSV file of salaries, or "-" for stdin
    #[arg(short, long)]
    input: PathBuf,
}

/// One row of batch input
#[derive(Debug, Default, Deserialize, CsvColumns)]
pub struct BatchRecord {
    /// Identifier copied to the output row
    pub id: Option<String>,
    /// Salary in GBP for the pay period
    pub salary: String,
    /// Pay period: annual, month, week or day
    #[csv(default = "annual")]
    pub period: Option<String>,
    /// Region: england-and-wales, scotland or northern-ireland
    #[csv(default = "england-and-wales")]
    pub region: Option<String>,
    /// Pension contribution as a percentage of gross pay
    #[csv(default = "0")]
    pub pension_percent: Option<String>,
    /// Student loan plan: none, plan1, plan2, plan4 or postgraduate
    #[csv(default = "none")]
    pub student_loan: Option<String>,
    /// Annual salary exchange amount in GBP
    #[csv(default = "0")]
    pub salary_exchange: Option<String>,
}

impl BatchRecord {
    /// Blank optional columns take their defaults; unknown keys are errors.
    pub fn to_input(&self) -> Result<CalculationInput, DomainError> {
        let mut input = CalculationInput {
            salary_amount: parse_amount("salary", &self.salary)?,
            ..Default::default()
        };
        if let Some(period) = present(&self.period) {
            input.pay_period = period.parse()?;
        }
        if let Some(region) = present(&self.region) {
            input.region = region.parse()?;
        }
        if let Some(pension) = present(&self.pension_percent) {
            input.pension_contribution_percent =
                parse_amount("pension", pension.trim_end_matches('%'))?;
        }
        if let Some(plan) = present(&self.student_loan) {
            input.student_loan_plan = plan.parse()?;
        }
        if let Some(exchange) = present(&self.salary_exchange) {
            input.salary_exchange_amount = parse_amount("salary exchange", exchange)?;
        }
        Ok(input)
    }
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// One row of batch output, amounts rounded to pence
#[derive(Debug, Default, PartialEq, Eq, Serialize)]
pub struct BatchOutput {
    pub id: String,
    pub gross: String,
    pub personal_allowance: String,
    pub taxable_income: String,
    pub income_tax: String,
    pub national_insurance: String,
    pub pension: String,
    pub student_loan: String,
    pub salary_exchange: String,
    pub take_home: String,
    pub monthly_take_home: String,
    pub weekly_take_home: String,
    pub error: String,
}

impl BatchOutput {
    fn from_result(id: String, result: &TaxResult) -> Self {
        let amount = |value: Decimal| format!("{:.2}", to_pence(value));
        BatchOutput {
            id,
            gross: amount(result.gross_annual),
            personal_allowance: amount(result.personal_allowance),
            taxable_income: amount(result.taxable_income),
            income_tax: amount(result.income_tax),
            national_insurance: amount(result.national_insurance),
            pension: amount(result.pension_deduction),
            student_loan: amount(result.student_loan_repayment),
            salary_exchange: amount(result.salary_exchange_deduction),
            take_home: amount(result.take_home_annual),
            monthly_take_home: amount(result.breakdown(PayPeriod::Month).take_home),
            weekly_take_home: amount(result.breakdown(PayPeriod::Week).take_home),
            error: String::new(),
        }
    }

    fn from_error(id: String, error: impl std::fmt::Display) -> Self {
        BatchOutput {
            id,
            error: error.to_string(),
            ..Default::default()
        }
    }
}

impl BatchCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let rows = read_rows(&self.input)?;
        let failed = rows.iter().filter(|r| !r.error.is_empty()).count();
        let written = write_csv(&rows, io::stdout())?;
        log::info!("Calculated {} rows ({} failed)", written, failed);
        Ok(())
    }
}

fn read_rows(path: &Path) -> anyhow::Result<Vec<BatchOutput>> {
    if path.as_os_str() == "-" {
        let mut buffer = Vec::new();
        io::stdin().lock().read_to_end(&mut buffer)?;
        if buffer.is_empty() {
            anyhow::bail!("No input received. Provide a file or pipe data to stdin.");
        }
        Ok(calculate_rows(io::Cursor::new(buffer)))
    } else {
        let file = File::open(path)?;
        Ok(calculate_rows(BufReader::new(file)))
    }
}

/// Calculate every row; the id defaults to the 1-based row number
pub fn calculate_rows<R: Read>(reader: R) -> Vec<BatchOutput> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    rdr.deserialize::<BatchRecord>()
        .enumerate()
        .map(|(i, record)| {
            let row = (i + 1).to_string();
            match record {
                Ok(record) => {
                    let id = present(&record.id).map_or(row, str::to_string);
                    match record.to_input().and_then(|input| calculate(&input)) {
                        Ok(result) => BatchOutput::from_result(id, &result),
                        Err(err) => {
                            log::warn!("Row {}: {}", id, err);
                            BatchOutput::from_error(id, err)
                        }
                    }
                }
                Err(err) => {
                    log::warn!("Row {}: {}", row, err);
                    BatchOutput::from_error(row, err)
                }
            }
        })
        .collect()
}
