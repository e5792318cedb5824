//! cocoquant CLI: download EOD Historical Data datasets as Parquet.
//!
//! Commands:
//! - `prices`: end-of-day price history for a symbol or a whole exchange
//! - `fundamentals`: stock, ETF, mutual fund or index fundamentals
//! - `sentiments` / `news`: news articles with sentiment scores
//! - `macro`: every macro indicator for a country
//! - `events`: economic calendar for a date window

mod log;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use cocoquant_core::{
    BulkSummary, ClientConfig, EodClient, EodDataDownloader, FundamentalsKind, StdoutProgress,
    WriteReport,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(
    name = "cocoquant",
    about = "Download EOD Historical Data datasets as Parquet"
)]
struct Cli {
    /// TOML config file with `base_dir` and `api_token`.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output directory. Ignored when --config is given.
    #[arg(long, global = true, default_value = "data")]
    data_dir: PathBuf,

    /// Vendor API token. Overrides the config file.
    #[arg(long, global = true, env = "EOD_API_TOKEN", hide_env_values = true)]
    api_token: Option<String>,

    /// Debug logging.
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// A single symbol or every symbol listed on an exchange.
#[derive(Args)]
#[group(required = true, multiple = false)]
struct Target {
    /// Symbol with exchange suffix (e.g. AAPL.US).
    #[arg(long)]
    symbol: Option<String>,

    /// Exchange code (e.g. US). Walks every listed symbol.
    #[arg(long)]
    exchange: Option<String>,
}

enum Scope {
    Symbol(String),
    Exchange(String),
}

impl Target {
    fn scope(self) -> Result<Scope> {
        match (self.symbol, self.exchange) {
            (Some(symbol), _) => Ok(Scope::Symbol(symbol)),
            (None, Some(exchange)) => Ok(Scope::Exchange(exchange)),
            (None, None) => bail!("one of --symbol or --exchange is required"),
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Kind {
    Stock,
    Etf,
    MutualFund,
    Index,
}

impl From<Kind> for FundamentalsKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Stock => FundamentalsKind::Stock,
            Kind::Etf => FundamentalsKind::Etf,
            Kind::MutualFund => FundamentalsKind::MutualFund,
            Kind::Index => FundamentalsKind::Index,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Download end-of-day prices.
    Prices {
        #[command(flatten)]
        target: Target,
    },
    /// Download fundamentals.
    Fundamentals {
        /// Instrument kind.
        #[arg(long, value_enum, default_value = "stock")]
        kind: Kind,

        #[command(flatten)]
        target: Target,
    },
    /// Download news sentiment scores.
    Sentiments {
        #[command(flatten)]
        target: Target,
    },
    /// Download financial news.
    News {
        #[command(flatten)]
        target: Target,
    },
    /// Download every macro indicator for a country.
    Macro {
        /// ISO-3 country code (e.g. USA).
        country: String,
    },
    /// Download economic events.
    Events {
        /// First day (YYYY-MM-DD).
        #[arg(long)]
        from: NaiveDate,

        /// Last day (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        to: Option<NaiveDate>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    log::init_logging(cli.verbose);

    let config = load_config(cli.config.as_deref(), cli.data_dir, cli.api_token)?;
    let client = EodClient::new(&config).context("building HTTP client")?;
    let downloader = EodDataDownloader::with_progress(
        &config.base_dir,
        Arc::new(client),
        Arc::new(StdoutProgress),
    );

    match cli.command {
        Commands::Prices { target } => match target.scope()? {
            Scope::Symbol(symbol) => {
                let path = downloader.eod_prices(&symbol)?;
                println!("Wrote {}", path.display());
                Ok(())
            }
            Scope::Exchange(exchange) => report_bulk(downloader.eod_prices_exchange(&exchange)?),
        },
        Commands::Fundamentals { kind, target } => {
            run_fundamentals(&downloader, kind.into(), target)
        }
        Commands::Sentiments { target } => match target.scope()? {
            Scope::Symbol(symbol) => report_optional(&symbol, downloader.sentiments(&symbol)?),
            Scope::Exchange(exchange) => report_bulk(downloader.sentiments_exchange(&exchange)?),
        },
        Commands::News { target } => match target.scope()? {
            Scope::Symbol(symbol) => report_optional(&symbol, downloader.financial_news(&symbol)?),
            Scope::Exchange(exchange) => {
                report_bulk(downloader.financial_news_exchange(&exchange)?)
            }
        },
        Commands::Macro { country } => {
            report_writes(&downloader.macro_indicators(&country)?);
            Ok(())
        }
        Commands::Events { from, to } => {
            let to = to.unwrap_or_else(|| chrono::Local::now().date_naive());
            report_optional("economic events", downloader.economic_events(from, to)?)
        }
    }
}

fn load_config(
    path: Option<&Path>,
    data_dir: PathBuf,
    api_token: Option<String>,
) -> Result<ClientConfig> {
    let mut config = match path {
        Some(path) => ClientConfig::from_file(path)?,
        None => {
            let Some(token) = api_token.clone() else {
                bail!("an API token is required: pass --api-token, set EOD_API_TOKEN or use --config");
            };
            ClientConfig::new(data_dir, token)
        }
    };
    if let Some(token) = api_token {
        config.api_token = token;
    }
    config.validate()?;
    Ok(config)
}

fn run_fundamentals(
    downloader: &EodDataDownloader,
    kind: FundamentalsKind,
    target: Target,
) -> Result<()> {
    let source = downloader.fundamentals(kind);
    match target.scope()? {
        Scope::Symbol(symbol) => {
            report_writes(&source.fundamentals(&symbol)?);
            Ok(())
        }
        Scope::Exchange(_) if kind == FundamentalsKind::Index => {
            bail!("index fundamentals are only available per symbol")
        }
        Scope::Exchange(exchange) => report_bulk(source.fundamentals_exchange(&exchange)?),
    }
}

fn report_writes(report: &WriteReport) {
    println!(
        "{}: {} tables written, {} skipped",
        report.subject,
        report.written.len(),
        report.skipped.len()
    );
    for path in &report.written {
        println!("  {}", path.display());
    }
}

fn report_optional(subject: &str, written: Option<PathBuf>) -> Result<()> {
    match written {
        Some(path) => println!("Wrote {}", path.display()),
        None => println!("{subject}: nothing to write"),
    }
    Ok(())
}

fn report_bulk(summary: BulkSummary) -> Result<()> {
    if !summary.all_succeeded() {
        for (symbol, err) in &summary.errors {
            eprintln!("Error for {symbol}: {err}");
        }
        std::process::exit(1);
    }
    Ok(())
}
