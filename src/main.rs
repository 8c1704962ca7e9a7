use std::{
    io::{self, Write},
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Result;
use clap::Parser;

use crate::{declare::Bank, error::ExchangeRateError};

pub mod config;
pub mod crawler;
pub mod declare;
pub mod error;
pub mod export;
pub mod logging;
pub mod util;

/// Fetch today's exchange rates from Bank Indonesia or Bank Central Asia
/// and save them as CSV.
#[derive(Parser, Debug)]
#[command(name = "exchange_rate_crawler", version, about)]
struct Cli {
    /// Bank identifier, `bi` or `bca`. Asked for interactively when omitted.
    bank: Option<String>,

    /// Directory the CSV file is written to (overrides OUTPUT_DIR / app.json).
    #[arg(long)]
    output_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    if let Err(why) = run(cli).await {
        report(&why);
    }

    util::http::flush_log(Duration::from_secs(3));
    logging::flush(Duration::from_secs(3));
}

async fn run(cli: Cli) -> Result<()> {
    let mut app = config::App::get()?;
    if let Some(dir) = cli.output_dir {
        app.output.dir = dir.to_string_lossy().to_string();
    }
    logging::debug_file_async(format!("Settings: {:?}", app));

    let identifier = match cli.bank {
        Some(bank) => bank,
        None => prompt()?,
    };

    logging::info_file_async(format!("Fetching exchange rates for '{}'", identifier.trim()));
    let saved = crawler::run(&identifier, &app).await?;
    println!("Data saved to {}", saved_location(&saved));

    Ok(())
}

/// 從標準輸入讀取銀行代碼
fn prompt() -> Result<String> {
    println!("Available banks: {}", Bank::describe_all());
    print!("Enter the bank name to check exchange rates: ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().read_line(&mut line)?;

    Ok(line)
}

/// 輸出目錄為目前目錄時只顯示檔名
fn saved_location(path: &Path) -> String {
    let in_working_dir = path
        .parent()
        .map_or(true, |dir| dir.as_os_str().is_empty() || dir == Path::new("."));

    match path.file_name() {
        Some(name) if in_working_dir => name.to_string_lossy().to_string(),
        _ => path.display().to_string(),
    }
}

fn report(why: &anyhow::Error) {
    logging::error_file_async(format!("{:?}", why));

    match why.downcast_ref::<ExchangeRateError>() {
        Some(known) => println!("{}", known),
        None => println!("Failed to fetch exchange rates: {:#}", why),
    }
}
