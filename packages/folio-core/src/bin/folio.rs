//! Folio CLI - build portfolio tables and report return statistics.
//!
//! A thin driver over the library: it loads parameters from the command
//! line, calls the core entry points, and prints the results.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use folio_core::combine::{get_strategy, JoinPolicy};
use folio_core::data::{default_data_dir, write_portfolio_csv, CsvPriceSource};
use folio_core::ranking::top_bottom_tickers;
use folio_core::returns::{cumulative_returns, daily_returns, rolling_volatility};
use folio_core::sampling::{random_end_date, random_subset, DEFAULT_MAX_DAYS, DEFAULT_MIN_DAYS};
use folio_core::types::{date_range, parse_date, PortfolioTable};
use folio_core::{Error, Result};

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Folio CLI - portfolio tables and return statistics from local CSVs")]
#[command(version)]
struct Cli {
    /// Directory holding one <TICKER>.csv per ticker
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a portfolio table and print or export it
    Build {
        /// Ticker symbols, comma-separated
        #[arg(short, long, value_delimiter = ',')]
        symbols: Vec<String>,
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        start: String,
        /// End date (YYYY-MM-DD)
        #[arg(long)]
        end: String,
        /// Null policy: left, right, inner, outer
        #[arg(short, long, default_value = "left")]
        policy: String,
        /// Combination strategy: join, merge, concat
        #[arg(long, default_value = "join")]
        strategy: String,
        /// Write the full table to this CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Report cumulative returns, top/bottom performers, and volatility
    Report {
        /// Ticker symbols, comma-separated
        #[arg(short, long, value_delimiter = ',')]
        symbols: Vec<String>,
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        start: String,
        /// End date (YYYY-MM-DD)
        #[arg(long)]
        end: String,
        /// Null policy: left, right, inner, outer
        #[arg(short, long, default_value = "left")]
        policy: String,
        /// Combination strategy: join, merge, concat
        #[arg(long, default_value = "join")]
        strategy: String,
        /// Rolling volatility window, in return observations
        #[arg(short, long, default_value = "5")]
        window: usize,
        /// How many top/bottom performers to list
        #[arg(short = 'n', long, default_value = "3")]
        top: usize,
    },
    /// Pick a deterministic random subset of tickers
    Sample {
        /// Ticker symbols, comma-separated
        #[arg(short, long, value_delimiter = ',')]
        symbols: Vec<String>,
        /// Subset size
        #[arg(short, long, default_value = "5")]
        k: usize,
        /// Generator seed
        #[arg(long, default_value = "42")]
        seed: u64,
    },
    /// Draw a random end date after a start date
    EndDate {
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        start: String,
        /// Smallest delta in calendar days
        #[arg(long, default_value_t = DEFAULT_MIN_DAYS)]
        min_days: i64,
        /// Largest delta in calendar days
        #[arg(long, default_value_t = DEFAULT_MAX_DAYS)]
        max_days: i64,
        /// Generator seed
        #[arg(long, default_value = "42")]
        seed: u64,
    },
}

fn main() {
    let cli = Cli::parse();
    if let Err(error) = run(cli) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let source = CsvPriceSource::new(cli.data_dir.unwrap_or_else(default_data_dir));

    match cli.command {
        Commands::Build {
            symbols,
            start,
            end,
            policy,
            strategy,
            output,
        } => {
            let table = build_table(&source, &symbols, &start, &end, &policy, &strategy)?;
            print_table(&table, 10);

            if let Some(path) = output {
                write_portfolio_csv(&table, &path)?;
                println!("written to {}", path.display());
            }
        }
        Commands::Report {
            symbols,
            start,
            end,
            policy,
            strategy,
            window,
            top,
        } => {
            let table = build_table(&source, &symbols, &start, &end, &policy, &strategy)?;

            let daily = daily_returns(&table);
            println!("daily returns:");
            print_table(&daily, 5);

            let cum = cumulative_returns(&table);
            println!("\ncumulative returns:");
            for (symbol, value) in &cum {
                println!("{symbol:>8}  {:>9.4}%", value * 100.0);
            }

            let (best, worst) = top_bottom_tickers(&cum, top);
            println!("\ntop {top}: {}", best.join(", "));
            println!("bottom {top}: {}", worst.join(", "));

            let vol = rolling_volatility(&table, window)?;
            println!("\n{window}-day rolling volatility:");
            print_table(&vol, 5);
        }
        Commands::Sample { symbols, k, seed } => {
            let refs: Vec<&str> = symbols.iter().map(String::as_str).collect();
            let subset = random_subset(&refs, k, seed);
            println!("{}", subset.join(", "));
        }
        Commands::EndDate {
            start,
            min_days,
            max_days,
            seed,
        } => {
            let (end, delta) = random_end_date(&start, min_days, max_days, seed)?;
            println!("{end} ({delta} days after {start})");
        }
    }

    Ok(())
}

fn build_table(
    source: &CsvPriceSource,
    symbols: &[String],
    start: &str,
    end: &str,
    policy: &str,
    strategy: &str,
) -> Result<PortfolioTable> {
    let policy: JoinPolicy = policy.parse()?;
    let strategy = get_strategy(strategy)
        .ok_or_else(|| Error::InvalidArgument(format!("unknown strategy: {strategy:?}")))?;

    let dates = date_range(parse_date(start)?, parse_date(end)?);
    let refs: Vec<&str> = symbols.iter().map(String::as_str).collect();

    strategy.combine(source, &refs, &dates, policy)
}

fn print_table(table: &PortfolioTable, max_rows: usize) {
    print!("{:>12}", "Date");
    for symbol in table.symbols() {
        print!("{symbol:>14}");
    }
    println!();

    for (row, date) in table.dates().iter().enumerate().take(max_rows) {
        print!("{:>12}", date.format("%Y-%m-%d").to_string());
        for cell in table.row(row) {
            match cell {
                Some(value) => print!("{value:>14.6}"),
                None => print!("{:>14}", "nan"),
            }
        }
        println!();
    }

    let (rows, cols) = table.shape();
    if rows > max_rows {
        println!("... {} more rows", rows - max_rows);
    }
    println!("shape: ({rows}, {cols})");
}
