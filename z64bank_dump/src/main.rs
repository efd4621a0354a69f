use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use log::{info, LevelFilter};
use z64bank::bank::Bank;

#[derive(Parser)]
#[command(author, version, about)]
#[command(propagate_version = true)]
struct Cli {
    /// The 0x10 byte table entry for the bank
    /// or the 0x08 byte entry without the ROM address and size.
    table_entry: PathBuf,

    /// The bank data such as a `.zbank` file.
    bank: PathBuf,

    /// Print each sample used by the bank once after the bank.
    #[arg(long)]
    samples: bool,

    /// Log more information. Repeat for more detail.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Only show warnings unless asked to avoid flooding the console.
    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    simple_logger::SimpleLogger::new().with_level(level).init()?;

    let table_entry = std::fs::read(&cli.table_entry)
        .with_context(|| format!("failed to read table entry {:?}", cli.table_entry))?;
    let bank_data = std::fs::read(&cli.bank)
        .with_context(|| format!("failed to read bank {:?}", cli.bank))?;

    let start = std::time::Instant::now();
    let bank = Bank::from_bytes(&table_entry, &bank_data)
        .with_context(|| format!("failed to decode bank {:?}", cli.bank))?;
    info!("Decoded bank in {:?}", start.elapsed());

    println!("{bank:#?}");

    if cli.samples {
        for (offset, sample) in bank.unique_samples() {
            println!("{offset:#x}: {sample:#?}");
        }
    }

    Ok(())
}
