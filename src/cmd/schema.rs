//! Schema command - print expected input formats

use super::batch::BatchRecord;
use paye::engine::CalculationInput;
use clap::Args;
use schemars::schema_for;

/// Description of one batch CSV column, produced by `#[derive(CsvColumns)]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvColumn {
    pub name: &'static str,
    pub required: bool,
    pub default: Option<&'static str>,
    pub description: &'static str,
}

#[derive(Args, Debug)]
pub struct SchemaCommand {
    /// Output format: json-schema, csv-header or csv-fields
    #[arg(value_enum, default_value = "json-schema")]
    format: SchemaFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SchemaFormat {
    /// JSON Schema for a single calculation input
    JsonSchema,
    /// CSV header row for batch input
    CsvHeader,
    /// Batch CSV column descriptions
    CsvFields,
}

impl SchemaCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        match self.format {
            SchemaFormat::JsonSchema => self.print_json_schema(),
            SchemaFormat::CsvHeader => self.print_csv_header(),
            SchemaFormat::CsvFields => self.print_csv_fields(),
        }
    }

    fn print_json_schema(&self) -> anyhow::Result<()> {
        let schema = schema_for!(CalculationInput);
        println!("{}", serde_json::to_string_pretty(&schema)?);
        Ok(())
    }

    fn print_csv_header(&self) -> anyhow::Result<()> {
        println!("{}", BatchRecord::csv_header());
        Ok(())
    }

    fn print_csv_fields(&self) -> anyhow::Result<()> {
        println!("Batch CSV Input Format");
        println!("======================");
        println!();
        for line in field_lines(BatchRecord::csv_columns()) {
            println!("{}", line);
        }
        println!();
        println!("Blank optional columns take the default shown.");
        Ok(())
    }
}

fn field_lines(columns: &[CsvColumn]) -> Vec<String> {
    columns
        .iter()
        .map(|column| {
            let req = if column.required { "required" } else { "optional" };
            match column.default {
                Some(default) => format!(
                    "{:16} ({:8})  {} [default: {}]",
                    column.name, req, column.description, default
                ),
                None => format!("{:16} ({:8})  {}", column.name, req, column.description),
            }
        })
        .collect()
}
