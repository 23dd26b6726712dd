//! HTML report generation for a single calculation
//!
//! Generates a self-contained HTML document with embedded CSS.

use super::{breakdown_rows, escape_html, explain, format_gbp, InputArgs};
use paye::engine::{calculate, CalculationInput, TaxResult};
use chrono::NaiveDate;
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ReportCommand {
    #[command(flatten)]
    input: InputArgs,

    /// Output file path (default: opens in browser)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl ReportCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let input = self.input.to_input();
        let result = calculate(&input)?;
        let generated = chrono::Local::now().date_naive();
        let html = generate_html(&input, &result, generated);

        if let Some(ref output_path) = self.output {
            std::fs::write(output_path, &html)?;
            log::info!("Report written to {}", output_path.display());
            println!("HTML report written to: {}", output_path.display());
        } else {
            // Write to temp file and open in browser
            let temp_path = std::env::temp_dir().join("paye-report.html");
            std::fs::write(&temp_path, &html)?;
            opener::open(&temp_path)?;
            println!("Opened HTML report in browser: {}", temp_path.display());
        }

        Ok(())
    }
}

const CSS: &str = r#"
body { font-family: -apple-system, "Segoe UI", Helvetica, Arial, sans-serif; max-width: 48rem; margin: 2rem auto; color: #222; }
h1 { margin-bottom: 0.25rem; }
.meta { color: #666; margin-top: 0; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { padding: 0.4rem 0.75rem; border-bottom: 1px solid #ddd; }
td.amount, th.amount { text-align: right; font-variant-numeric: tabular-nums; }
tr.total td { font-weight: bold; border-top: 2px solid #222; }
.warning { background: #fff4e5; border-left: 4px solid #f0a020; padding: 0.5rem 0.75rem; }
pre { background: #f6f6f6; padding: 0.75rem; white-space: pre-wrap; }
.note { font-size: 0.85rem; font-style: italic; color: #666; }
"#;

/// Render the report; `generated` is the date printed in the header
pub fn generate_html(input: &CalculationInput, result: &TaxResult, generated: NaiveDate) -> String {
    let period_of = |d: Option<NaiveDate>| {
        d.map_or_else(String::new, |d| d.format("%-d %B %Y").to_string())
    };

    let inputs = [
        (
            "Salary",
            format!(
                "{} ({})",
                format_gbp(input.salary_amount),
                input.pay_period.display().to_lowercase()
            ),
        ),
        ("Region", result.region.display().to_string()),
        (
            "Pension contribution",
            format!("{}%", input.pension_contribution_percent.normalize()),
        ),
        ("Student loan", result.student_loan_plan.display().to_string()),
        ("Salary exchange", format_gbp(input.salary_exchange_amount)),
    ]
    .iter()
    .map(|(label, value)| {
        format!(
            "<tr><th>{}</th><td>{}</td></tr>",
            escape_html(label),
            escape_html(value)
        )
    })
    .collect::<Vec<_>>()
    .join("\n");

    let rows = breakdown_rows(result)
        .into_iter()
        .map(|row| {
            let class = if row.label == "Take home pay" { " class=\"total\"" } else { "" };
            format!(
                "<tr{}><td>{}</td><td class=\"amount\">{}</td><td class=\"amount\">{}</td><td class=\"amount\">{}</td></tr>",
                class,
                escape_html(row.label),
                escape_html(&row.yearly),
                escape_html(&row.monthly),
                escape_html(&row.weekly)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let warnings = result
        .warnings
        .iter()
        .map(|w| format!("<p class=\"warning\">{}</p>", escape_html(&w.message())))
        .collect::<Vec<_>>()
        .join("\n");

    let explanation = escape_html(&explain(result).join("\n"));

    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Tax Calculation Report</title>
    <style>
{css}
    </style>
</head>
<body>
    <h1>Tax Calculation Report</h1>
    <p class="meta">Tax year {year} ({start} to {end}) &middot; Generated {generated}</p>
    <h2>Your details</h2>
    <table>
{inputs}
    </table>
    <h2>Your estimation</h2>
{warnings}
    <table>
        <thead>
            <tr><th></th><th class="amount">Yearly</th><th class="amount">Monthly</th><th class="amount">Weekly</th></tr>
        </thead>
        <tbody>
{rows}
        </tbody>
    </table>
    <h2>How the result is calculated</h2>
    <pre>{explanation}</pre>
    <p class="note">These figures are estimates based on published rates for the tax year shown. For precise calculations consult a tax professional or HMRC.</p>
</body>
</html>
"##,
        css = CSS,
        year = result.tax_year.display(),
        start = period_of(result.tax_year.start_date()),
        end = period_of(result.tax_year.end_date()),
        generated = generated.format("%-d %B %Y"),
        inputs = inputs,
        warnings = warnings,
        rows = rows,
        explanation = explanation,
    )
}
