mod cmd;
mod utils;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "paye", version, about = "UK PAYE take-home pay calculator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Calculate take-home pay for one salary
    Calc(cmd::calc::CalcCommand),
    /// Calculate take-home pay for every row of a CSV file
    Batch(cmd::batch::BatchCommand),
    /// Generate an HTML report for one salary
    Report(cmd::report::ReportCommand),
    /// Print the expected input formats
    Schema(cmd::schema::SchemaCommand),
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Calc(calc) => calc.exec(),
        Command::Batch(batch) => batch.exec(),
        Command::Report(report) => report.exec(),
        Command::Schema(schema) => schema.exec(),
    }
}
