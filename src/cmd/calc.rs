//! Calc command - one calculation as a breakdown table, explanation or JSON

use super::{breakdown_table, explain, InputArgs};
use paye::engine::{calculate, CalculationInput, PayPeriod, PeriodBreakdown, TaxResult};
use clap::Args;
use serde::Serialize;

#[derive(Args, Debug)]
pub struct CalcCommand {
    #[command(flatten)]
    input: InputArgs,

    /// Show how each figure was calculated
    #[arg(long)]
    explain: bool,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

/// JSON output structure
#[derive(Debug, Serialize)]
struct CalcOutput<'a> {
    input: &'a CalculationInput,
    result: &'a TaxResult,
    monthly: PeriodBreakdown,
    weekly: PeriodBreakdown,
}

impl CalcCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let input = self.input.to_input();
        let result = calculate(&input)?;

        if self.json {
            self.print_json(&input, &result)
        } else {
            self.print_text(&result);
            Ok(())
        }
    }

    fn print_text(&self, result: &TaxResult) {
        println!();
        println!(
            "TAKE HOME PAY ({}, {})",
            result.tax_year.display(),
            result.region.display()
        );
        println!("{}", breakdown_table(result));

        if self.explain {
            println!();
            println!("HOW THE RESULT IS CALCULATED");
            for line in explain(result) {
                println!("{}", line);
            }
        } else {
            for warning in &result.warnings {
                println!("\u{26A0} {}", warning.message());
            }
        }
        println!();
    }

    fn print_json(&self, input: &CalculationInput, result: &TaxResult) -> anyhow::Result<()> {
        let output = CalcOutput {
            input,
            result,
            monthly: result.breakdown(PayPeriod::Month),
            weekly: result.breakdown(PayPeriod::Week),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }
}
