//! One-stop facade over every data category.

use crate::client::{EodClient, Fetcher};
use crate::config::ClientConfig;
use crate::error::Result;
use crate::progress::{BulkProgress, LogProgress};
use crate::sources::{
    BulkSummary, EconomicEvents, EodPrices, FinancialNews, Fundamentals, FundamentalsKind,
    FundamentalsReport, MacroIndicators, Sentiments, Source, WriteReport,
};
use chrono::NaiveDate;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Data categories and the directory each one is stored under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EodDataApi {
    EodPrices,
    StockFundamentals,
    EtfFundamentals,
    MutualFundFundamentals,
    IndexFundamentals,
    Sentiments,
    MacroIndicators,
    EconomicEvents,
    FinancialNews,
}

impl EodDataApi {
    pub const ALL: [EodDataApi; 9] = [
        EodDataApi::EodPrices,
        EodDataApi::StockFundamentals,
        EodDataApi::EtfFundamentals,
        EodDataApi::MutualFundFundamentals,
        EodDataApi::IndexFundamentals,
        EodDataApi::Sentiments,
        EodDataApi::MacroIndicators,
        EodDataApi::EconomicEvents,
        EodDataApi::FinancialNews,
    ];

    pub fn name(self) -> &'static str {
        match self {
            EodDataApi::EodPrices => "eod_prices",
            EodDataApi::StockFundamentals => "stock_fundamentals",
            EodDataApi::EtfFundamentals => "etf_fundamentals",
            EodDataApi::MutualFundFundamentals => "mutual_fund_fundamentals",
            EodDataApi::IndexFundamentals => "index_fundamentals",
            EodDataApi::Sentiments => "sentiments",
            EodDataApi::MacroIndicators => "macro_indicators",
            EodDataApi::EconomicEvents => "economic_events",
            EodDataApi::FinancialNews => "financial_news",
        }
    }

    /// Where this category's files land, relative to the base directory.
    pub fn storage_dir(self) -> PathBuf {
        match self {
            EodDataApi::EodPrices => PathBuf::from(crate::sources::prices::PRICES_DIR),
            EodDataApi::StockFundamentals => fundamentals_dir(FundamentalsKind::Stock),
            EodDataApi::EtfFundamentals => fundamentals_dir(FundamentalsKind::Etf),
            EodDataApi::MutualFundFundamentals => fundamentals_dir(FundamentalsKind::MutualFund),
            EodDataApi::IndexFundamentals => fundamentals_dir(FundamentalsKind::Index),
            EodDataApi::Sentiments => PathBuf::from("sentiments"),
            EodDataApi::MacroIndicators => PathBuf::from("macro_indicators"),
            EodDataApi::EconomicEvents => PathBuf::from("economic_events"),
            EodDataApi::FinancialNews => PathBuf::from("financial_news"),
        }
    }
}

impl fmt::Display for EodDataApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn fundamentals_dir(kind: FundamentalsKind) -> PathBuf {
    Path::new("fundamentals").join(kind.dir_name())
}

/// Every category source, built once over a shared fetcher.
#[derive(Clone)]
pub struct EodDataDownloader {
    base_dir: PathBuf,
    prices: EodPrices,
    stock: Fundamentals,
    etf: Fundamentals,
    mutual_fund: Fundamentals,
    index: Fundamentals,
    sentiments: Sentiments,
    macro_indicators: MacroIndicators,
    economic_events: EconomicEvents,
    news: FinancialNews,
}

impl EodDataDownloader {
    /// Build a downloader that talks to the vendor over HTTP.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = EodClient::new(config)?;
        Ok(Self::with_fetcher(&config.base_dir, Arc::new(client)))
    }

    /// Build a downloader over any [`Fetcher`], reporting bulk progress
    /// through `tracing`.
    pub fn with_fetcher(base_dir: impl Into<PathBuf>, fetcher: Arc<dyn Fetcher>) -> Self {
        Self::with_progress(base_dir, fetcher, Arc::new(LogProgress))
    }

    pub fn with_progress(
        base_dir: impl Into<PathBuf>,
        fetcher: Arc<dyn Fetcher>,
        progress: Arc<dyn BulkProgress>,
    ) -> Self {
        let base_dir = base_dir.into();
        let root = Source::new(fetcher, base_dir.clone()).with_progress(progress);
        let fundamentals_root = root.child("fundamentals");
        let fundamentals =
            |kind: FundamentalsKind| Fundamentals::new(kind, fundamentals_root.child(kind.dir_name()));

        Self {
            prices: EodPrices::new(root.clone()),
            stock: fundamentals(FundamentalsKind::Stock),
            etf: fundamentals(FundamentalsKind::Etf),
            mutual_fund: fundamentals(FundamentalsKind::MutualFund),
            index: fundamentals(FundamentalsKind::Index),
            sentiments: Sentiments::new(root.child(EodDataApi::Sentiments.name())),
            macro_indicators: MacroIndicators::new(root.child(EodDataApi::MacroIndicators.name())),
            economic_events: EconomicEvents::new(root.child(EodDataApi::EconomicEvents.name())),
            news: FinancialNews::new(root.child(EodDataApi::FinancialNews.name())),
            base_dir,
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Fundamentals source for `kind`.
    pub fn fundamentals(&self, kind: FundamentalsKind) -> &Fundamentals {
        match kind {
            FundamentalsKind::Stock => &self.stock,
            FundamentalsKind::Etf => &self.etf,
            FundamentalsKind::MutualFund => &self.mutual_fund,
            FundamentalsKind::Index => &self.index,
        }
    }

    pub fn eod_prices(&self, symbol: &str) -> Result<PathBuf> {
        self.prices.eod_prices(symbol)
    }

    pub fn eod_prices_exchange(&self, exchange: &str) -> Result<BulkSummary> {
        self.prices.eod_prices_exchange(exchange)
    }

    pub fn stock_fundamentals(&self, symbol: &str) -> Result<FundamentalsReport> {
        self.stock.fundamentals(symbol)
    }

    pub fn stock_fundamentals_exchange(&self, exchange: &str) -> Result<BulkSummary> {
        self.stock.fundamentals_exchange(exchange)
    }

    pub fn etf_fundamentals(&self, symbol: &str) -> Result<FundamentalsReport> {
        self.etf.fundamentals(symbol)
    }

    pub fn etf_fundamentals_exchange(&self, exchange: &str) -> Result<BulkSummary> {
        self.etf.fundamentals_exchange(exchange)
    }

    pub fn mutual_fund_fundamentals(&self, symbol: &str) -> Result<FundamentalsReport> {
        self.mutual_fund.fundamentals(symbol)
    }

    pub fn mutual_fund_fundamentals_exchange(&self, exchange: &str) -> Result<BulkSummary> {
        self.mutual_fund.fundamentals_exchange(exchange)
    }

    pub fn index_fundamentals(&self, symbol: &str) -> Result<FundamentalsReport> {
        self.index.fundamentals(symbol)
    }

    pub fn sentiments(&self, symbol: &str) -> Result<Option<PathBuf>> {
        self.sentiments.sentiments(symbol)
    }

    pub fn sentiments_exchange(&self, exchange: &str) -> Result<BulkSummary> {
        self.sentiments.sentiments_exchange(exchange)
    }

    /// All indicators for one country.
    pub fn macro_indicators(&self, country: &str) -> Result<WriteReport> {
        self.macro_indicators.macro_indicators_exchange(country)
    }

    pub fn economic_events(&self, from: NaiveDate, to: NaiveDate) -> Result<Option<PathBuf>> {
        self.economic_events.economic_events(from, to)
    }

    pub fn financial_news(&self, symbol: &str) -> Result<Option<PathBuf>> {
        self.news.financial_news(symbol)
    }

    pub fn financial_news_exchange(&self, exchange: &str) -> Result<BulkSummary> {
        self.news.financial_news_exchange(exchange)
    }
}
