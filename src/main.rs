use std::{fs::File, path::PathBuf};

use clap::Parser;

use bank_ledger::{
    clock::SystemClock, dlq::StdErrDLQ, engine::Engine, ingestion, logging,
    output_repository::StdOutOutput, reporter::StdErrReporter,
};

/// Replays ledger commands from a CSV file and prints the resulting balances.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// CSV with columns: type, account, sort_code, amount,
    /// destination_account, destination_sort_code, date
    commands: PathBuf,

    /// CSV with columns: account, sort_code, closed, frozen
    #[arg(short, long)]
    accounts: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();
    let cli = Cli::parse();

    let mut output = StdOutOutput::new();
    if let Some(path) = &cli.accounts {
        output = output.with_statuses(ingestion::read_account_statuses(File::open(path)?)?);
    }

    let ingestion = ingestion::CsvReader::new(File::open(&cli.commands)?)?;

    let mut engine = Engine::new(
        ingestion,
        output,
        StdErrDLQ::default(),
        StdErrReporter::default(),
        SystemClock,
    );
    engine.process().await?;
    engine.flush()?;

    Ok(())
}
