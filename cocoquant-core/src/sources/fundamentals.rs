//! Company, fund and index fundamentals.
//!
//! One `fundamentals/<symbol>` call returns a large JSON document. Each
//! category declares an ordered list of [`Extractor`]s; every extractor pulls
//! one or more sub-tables out of the document and writes them under
//! `<category>/<sub_path>/<symbol>.parq`. Sub-tables missing from the document
//! are skipped with a warning.

use super::base::{BulkSummary, Source, WriteReport};
use crate::error::Result;
use crate::table::{coerce, parse_nested, CoercionRules};
use polars::prelude::DataFrame;
use serde_json::Value;
use std::fmt;

/// Paths written and skipped for one symbol.
pub type FundamentalsReport = WriteReport;

/// Kind of instrument the fundamentals document describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FundamentalsKind {
    Stock,
    Etf,
    MutualFund,
    Index,
}

impl FundamentalsKind {
    pub const ALL: [FundamentalsKind; 4] = [
        FundamentalsKind::Stock,
        FundamentalsKind::Etf,
        FundamentalsKind::MutualFund,
        FundamentalsKind::Index,
    ];

    /// Storage directory below `fundamentals/`.
    pub fn dir_name(self) -> &'static str {
        match self {
            FundamentalsKind::Stock => "stock",
            FundamentalsKind::Etf => "etf",
            FundamentalsKind::MutualFund => "mutual_fund",
            FundamentalsKind::Index => "index",
        }
    }

    /// Extractors run for this kind, in order.
    pub fn extractors(self) -> &'static [Extractor] {
        match self {
            FundamentalsKind::Stock => STOCK,
            FundamentalsKind::Etf => ETF,
            FundamentalsKind::MutualFund => MUTUAL_FUND,
            FundamentalsKind::Index => INDEX,
        }
    }
}

impl fmt::Display for FundamentalsKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

type ExtractFn = fn(&Fundamentals, &str, &Value, &mut FundamentalsReport) -> Result<()>;

/// A named step that writes part of a fundamentals document.
#[derive(Clone, Copy)]
pub struct Extractor {
    pub name: &'static str,
    run: ExtractFn,
}

impl Extractor {
    const fn new(name: &'static str, run: ExtractFn) -> Self {
        Self { name, run }
    }
}

impl fmt::Debug for Extractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Extractor").field("name", &self.name).finish()
    }
}

const EARNINGS_RULES: CoercionRules = CoercionRules::new(
    &["date", "reportdate"],
    &["period", "currency", "beforeaftermarket"],
);

const FINANCIALS_RULES: CoercionRules =
    CoercionRules::new(&["date", "filing_date"], &["currency_symbol"]);

const STOCK: &[Extractor] = &[
    Extractor::new("general", general),
    Extractor::new("highlights", |f, s, d, r| f.process_data(s, d, "Highlights", None, r)),
    Extractor::new("valuation", |f, s, d, r| f.process_data(s, d, "Valuation", None, r)),
    Extractor::new("share_stats", |f, s, d, r| f.process_data(s, d, "ShareStats", None, r)),
    Extractor::new("technicals", technicals),
    Extractor::new("analyst_ratings", |f, s, d, r| {
        f.process_data(s, d, "AnalystRatings", None, r)
    }),
    Extractor::new("earnings", earnings),
    Extractor::new("financials", financials),
    Extractor::new("outstanding_shares", outstanding_shares),
];

const ETF: &[Extractor] = &[
    Extractor::new("general", general),
    Extractor::new("technicals", technicals),
    Extractor::new("etf_data", |f, s, d, r| f.process_data(s, d, "ETF_Data", None, r)),
    Extractor::new("etf_data_asset_allocation", |f, s, d, r| {
        f.process_data(s, d, "ETF_Data", Some("Asset_Allocation"), r)
    }),
    Extractor::new("etf_data_world_regions", |f, s, d, r| {
        f.process_data(s, d, "ETF_Data", Some("World_Regions"), r)
    }),
    Extractor::new("etf_data_sector_weights", |f, s, d, r| {
        f.process_data(s, d, "ETF_Data", Some("Sector_Weights"), r)
    }),
    Extractor::new("etf_data_fixed_income", |f, s, d, r| {
        f.process_data(s, d, "ETF_Data", Some("Fixed_Income"), r)
    }),
    Extractor::new("etf_data_top_10_holdings", |f, s, d, r| {
        f.process_data(s, d, "ETF_Data", Some("Top_10_Holdings"), r)
    }),
];

const MUTUAL_FUND: &[Extractor] = &[
    Extractor::new("general", general),
    Extractor::new("mutual_fund_data", |f, s, d, r| {
        f.process_data(s, d, "MutualFund_Data", None, r)
    }),
    Extractor::new("mutual_fund_data_asset_allocation", |f, s, d, r| {
        f.process_data(s, d, "MutualFund_Data", Some("Asset_Allocation"), r)
    }),
    Extractor::new("mutual_fund_data_value_growth", |f, s, d, r| {
        f.process_data(s, d, "MutualFund_Data", Some("Value_Growth"), r)
    }),
    Extractor::new("mutual_fund_data_top_holdings", |f, s, d, r| {
        f.process_data(s, d, "MutualFund_Data", Some("Top_Holdings"), r)
    }),
    Extractor::new("mutual_fund_data_market_capitalization", |f, s, d, r| {
        f.process_data(s, d, "MutualFund_Data", Some("Market_Capitalization"), r)
    }),
    Extractor::new("mutual_fund_data_sector_weights", |f, s, d, r| {
        f.process_data(s, d, "MutualFund_Data", Some("Sector_Weights"), r)
    }),
    Extractor::new("mutual_fund_data_world_regions", |f, s, d, r| {
        f.process_data(s, d, "MutualFund_Data", Some("World_Regions"), r)
    }),
];

const INDEX: &[Extractor] = &[
    Extractor::new("general", general),
    Extractor::new("components", |f, s, d, r| f.process_data(s, d, "Components", None, r)),
];

fn general(f: &Fundamentals, symbol: &str, doc: &Value, report: &mut FundamentalsReport) -> Result<()> {
    f.process_data(symbol, doc, "General", None, report)
}

fn technicals(f: &Fundamentals, symbol: &str, doc: &Value, report: &mut FundamentalsReport) -> Result<()> {
    f.process_data(symbol, doc, "Technicals", None, report)
}

fn earnings(f: &Fundamentals, symbol: &str, doc: &Value, report: &mut FundamentalsReport) -> Result<()> {
    for sub_key in ["History", "Trend", "Annual"] {
        let table = parse_nested(doc, "Earnings", Some(sub_key))?
            .map(|t| coerce(t, &EARNINGS_RULES))
            .transpose()?;
        f.store(symbol, table, &default_sub_path("Earnings", Some(sub_key)), report)?;
    }
    Ok(())
}

fn financials(f: &Fundamentals, symbol: &str, doc: &Value, report: &mut FundamentalsReport) -> Result<()> {
    let statements = doc.get("Financials").unwrap_or(&Value::Null);
    for key in ["Balance_Sheet", "Cash_Flow", "Income_Statement"] {
        for sub_key in ["quarterly", "yearly"] {
            let table = parse_nested(statements, key, Some(sub_key))?
                .map(|t| coerce(t, &FINANCIALS_RULES))
                .transpose()?;
            let sub_path = format!("financials_{}", default_sub_path(key, Some(sub_key)));
            f.store(symbol, table, &sub_path, report)?;
        }
    }
    Ok(())
}

fn outstanding_shares(f: &Fundamentals, symbol: &str, doc: &Value, report: &mut FundamentalsReport) -> Result<()> {
    for sub_key in ["annual", "quarterly"] {
        f.process_data(symbol, doc, "outstandingShares", Some(sub_key), report)?;
    }
    Ok(())
}

/// `lower(key)` or `lower(key)_lower(sub_key)`.
fn default_sub_path(key: &str, sub_key: Option<&str>) -> String {
    match sub_key {
        Some(sub) => format!("{}_{}", key.to_lowercase(), sub.to_lowercase()),
        None => key.to_lowercase(),
    }
}

/// Fundamentals writer for one [`FundamentalsKind`].
#[derive(Clone)]
pub struct Fundamentals {
    kind: FundamentalsKind,
    source: Source,
}

impl Fundamentals {
    /// `source` must be rooted at this kind's directory.
    pub fn new(kind: FundamentalsKind, source: Source) -> Self {
        Self { kind, source }
    }

    pub fn kind(&self) -> FundamentalsKind {
        self.kind
    }

    /// Fetch `fundamentals/<symbol>` once and run every extractor on it.
    pub fn fundamentals(&self, symbol: &str) -> Result<FundamentalsReport> {
        let doc = self
            .source
            .fetch_json(&format!("fundamentals/{symbol}"), &[])?;
        self.extract(symbol, &doc)
    }

    /// Run every extractor of this kind against an already fetched document.
    pub fn extract(&self, symbol: &str, doc: &Value) -> Result<FundamentalsReport> {
        let mut report = FundamentalsReport::new(symbol);
        for extractor in self.kind.extractors() {
            (extractor.run)(self, symbol, doc, &mut report)?;
        }
        Ok(report)
    }

    pub fn fundamentals_exchange(&self, exchange: &str) -> Result<BulkSummary> {
        self.source
            .bulk(exchange, |symbol| self.fundamentals(symbol).map(|_| ()))
    }

    /// Write `doc[key]` or `doc[key][sub_key]` under its default sub-path.
    pub fn process_data(
        &self,
        symbol: &str,
        doc: &Value,
        key: &str,
        sub_key: Option<&str>,
        report: &mut FundamentalsReport,
    ) -> Result<()> {
        let table = parse_nested(doc, key, sub_key)?;
        self.store(symbol, table, &default_sub_path(key, sub_key), report)
    }

    fn store(
        &self,
        symbol: &str,
        table: Option<DataFrame>,
        sub_path: &str,
        report: &mut FundamentalsReport,
    ) -> Result<()> {
        match table {
            Some(mut table) => {
                let path = self.source.write(symbol, &mut table, Some(sub_path))?;
                report.written.push(path);
            }
            None => report.skip(sub_path),
        }
        Ok(())
    }
}
