//! End-to-end tests of the downloader facade against canned vendor responses.

use chrono::NaiveDate;
use cocoquant_core::sources::INDICATORS;
use cocoquant_core::table::read_table;
use cocoquant_core::testing::CannedFetcher;
use cocoquant_core::{EodDataDownloader, EodError};
use polars::prelude::DataType;
use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;

const LISTING: &str = "Code,Ex,Name,Date,Close\n\
    AAPL,US,Apple Inc,2024-01-02,185.64\n\
    BAD,US,Broken Co,2024-01-02,1.00\n\
    MSFT,US,Microsoft Corp,2024-01-02,370.87\n\
    Total,,,,\n";

fn prices_csv(close: f64) -> String {
    format!(
        "Date,Open,High,Low,Close,Adjusted_close,Volume\n\
         2024-01-02,187.15,188.44,183.89,{close},185.4,82488700\n\
         2024-01-03,184.22,185.88,183.43,184.25,184.01,58414500\n\
         Total,,,,,,\n"
    )
}

fn downloader(fetcher: CannedFetcher) -> (TempDir, Arc<CannedFetcher>, EodDataDownloader) {
    let dir = tempfile::tempdir().unwrap();
    let fetcher = Arc::new(fetcher);
    let downloader = EodDataDownloader::with_fetcher(dir.path(), fetcher.clone());
    (dir, fetcher, downloader)
}

fn stock_document() -> serde_json::Value {
    json!({
        "General": {"Code": "AAPL", "Type": "Common Stock", "Exchange": "NASDAQ"},
        "Valuation": {"TrailingPE": 29.6, "ForwardPE": 28.1},
        "Earnings": {
            "History": {
                "2024-03-31": {"reportDate": "2024-05-02", "date": "2024-03-31", "beforeAfterMarket": "AfterMarket", "currency": "USD", "epsActual": 1.53, "epsEstimate": 1.5},
                "2023-12-31": {"reportDate": "2024-02-01", "date": "2023-12-31", "beforeAfterMarket": "AfterMarket", "currency": "USD", "epsActual": 2.18, "epsEstimate": 2.1}
            },
            "Trend": {},
            "Annual": {"2023-09-30": {"date": "2023-09-30", "epsActual": 6.13}}
        },
        "Financials": {
            "Balance_Sheet": {
                "currency_symbol": "USD",
                "quarterly": {"2024-03-31": {"date": "2024-03-31", "filing_date": "2024-05-03", "currency_symbol": "USD", "totalAssets": "337411000000.00"}},
                "yearly": {"2023-09-30": {"date": "2023-09-30", "filing_date": "2023-11-03", "currency_symbol": "USD", "totalAssets": "352583000000.00"}}
            }
        },
        "outstandingShares": {
            "annual": {"0": {"date": "2023", "dateFormatted": "2023-12-31", "sharesMln": "15550.0610", "shares": 15550061000i64}},
            "quarterly": {}
        }
    })
}

#[test]
fn prices_rewrite_keeps_latest_content() {
    let fetcher = CannedFetcher::new().with_body("eod/AAPL.US", prices_csv(185.64));
    let (dir, _, dl) = downloader(fetcher);
    let first = dl.eod_prices("AAPL.US").unwrap();

    let fetcher = Arc::new(CannedFetcher::new().with_body("eod/AAPL.US", prices_csv(999.0)));
    let dl = EodDataDownloader::with_fetcher(dir.path(), fetcher);
    let second = dl.eod_prices("AAPL.US").unwrap();

    assert_eq!(first, second);
    assert_eq!(second, dir.path().join("eod_prices/AAPL.US.parq"));
    let df = read_table(&second).unwrap();
    assert_eq!(df.height(), 2);
    assert_eq!(df.column("close").unwrap().f64().unwrap().get(0), Some(999.0));
    assert_eq!(df.column("date").unwrap().dtype(), &DataType::Date);
    assert_eq!(
        df.column("symbol").unwrap().str().unwrap().get(1),
        Some("AAPL.US")
    );
}

#[test]
fn bulk_survives_a_failing_symbol() {
    let fetcher = CannedFetcher::new()
        .with_body("eod-bulk-last-day/US", LISTING)
        .with_body("eod/AAPL.US", prices_csv(185.64))
        .with_status("eod/BAD.US", 502)
        .with_body("eod/MSFT.US", prices_csv(370.87));
    let (dir, fetcher, dl) = downloader(fetcher);

    let summary = dl.eod_prices_exchange("US").unwrap();

    assert_eq!(
        fetcher.requests(),
        vec!["eod-bulk-last-day/US", "eod/AAPL.US", "eod/BAD.US", "eod/MSFT.US"]
    );
    assert_eq!(summary.total, 3);
    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.failed, 1);
    assert!(matches!(
        summary.errors[0],
        (ref symbol, EodError::Status { status: 502, .. }) if symbol == "BAD.US"
    ));
    assert!(dir.path().join("eod_prices/AAPL.US.parq").exists());
    assert!(!dir.path().join("eod_prices/BAD.US.parq").exists());
    assert!(dir.path().join("eod_prices/MSFT.US.parq").exists());
}

#[test]
fn bulk_skips_unparseable_documents() {
    let fetcher = CannedFetcher::new()
        .with_body("eod-bulk-last-day/US", LISTING)
        .with_body("fundamentals/AAPL.US", stock_document().to_string())
        .with_body("fundamentals/BAD.US", "<html>rate limited</html>")
        .with_body("fundamentals/MSFT.US", r#"{"General": {"Code": "MSFT"}}"#);
    let (dir, _, dl) = downloader(fetcher);

    let summary = dl.stock_fundamentals_exchange("US").unwrap();

    assert_eq!(summary.succeeded, 2);
    assert!(matches!(summary.errors[0].1, EodError::Json(_)));
    assert!(dir
        .path()
        .join("fundamentals/stock/general/MSFT.US.parq")
        .exists());
}

#[test]
fn missing_highlights_do_not_stop_siblings() {
    let fetcher =
        CannedFetcher::new().with_body("fundamentals/AAPL.US", stock_document().to_string());
    let (dir, fetcher, dl) = downloader(fetcher);

    let report = dl.stock_fundamentals("AAPL.US").unwrap();

    let root = dir.path().join("fundamentals/stock");
    assert_eq!(fetcher.requests(), vec!["fundamentals/AAPL.US"]);
    assert!(report.skipped.contains(&"highlights".to_string()));
    assert!(!root.join("highlights").exists());
    for written in [
        "general",
        "valuation",
        "earnings_history",
        "earnings_annual",
        "financials_balance_sheet_quarterly",
        "financials_balance_sheet_yearly",
        "outstandingshares_annual",
    ] {
        let path = root.join(written).join("AAPL.US.parq");
        assert!(report.written.contains(&path), "{written} not written");
        assert!(path.exists());
    }
    assert!(report.skipped.contains(&"earnings_trend".to_string()));
    assert!(report
        .skipped
        .contains(&"financials_cash_flow_quarterly".to_string()));
}

#[test]
fn earnings_history_keeps_document_order() {
    let fetcher =
        CannedFetcher::new().with_body("fundamentals/AAPL.US", stock_document().to_string());
    let (dir, _, dl) = downloader(fetcher);
    dl.stock_fundamentals("AAPL.US").unwrap();

    let df = read_table(
        &dir
            .path()
            .join("fundamentals/stock/earnings_history/AAPL.US.parq"),
    )
    .unwrap();

    assert_eq!(df.height(), 2);
    assert_eq!(df.column("reportdate").unwrap().dtype(), &DataType::Date);
    assert_eq!(df.column("currency").unwrap().dtype(), &DataType::String);
    let eps: Vec<Option<f64>> = df
        .column("epsactual")
        .unwrap()
        .f64()
        .unwrap()
        .into_iter()
        .collect();
    assert_eq!(eps, vec![Some(1.53), Some(2.18)]);
}

#[test]
fn etf_fundamentals_write_nested_tables() {
    let doc = json!({
        "General": {"Code": "SPY", "Type": "ETF"},
        "Technicals": {"Beta": 1.0, "52WeekHigh": 480.1},
        "ETF_Data": {
            "ISIN": "US78462F1030",
            "Asset_Allocation": {
                "Cash": {"Long_%": "0.1", "Short_%": "0", "Net_Assets_%": "0.1"},
                "Stock US": {"Long_%": "99.4", "Short_%": "0", "Net_Assets_%": "99.4"}
            },
            "Top_10_Holdings": {
                "AAPL.US": {"Code": "AAPL", "Assets_%": 7.1},
                "MSFT.US": {"Code": "MSFT", "Assets_%": 6.9}
            },
            "World_Regions": {}
        }
    });
    let fetcher = CannedFetcher::new().with_body("fundamentals/SPY.US", doc.to_string());
    let (dir, _, dl) = downloader(fetcher);

    let report = dl.etf_fundamentals("SPY.US").unwrap();

    let root = dir.path().join("fundamentals/etf");
    assert_eq!(
        report.written,
        vec![
            root.join("general/SPY.US.parq"),
            root.join("technicals/SPY.US.parq"),
            root.join("etf_data/SPY.US.parq"),
            root.join("etf_data_asset_allocation/SPY.US.parq"),
            root.join("etf_data_top_10_holdings/SPY.US.parq"),
        ]
    );
    assert_eq!(
        report.skipped,
        vec![
            "etf_data_world_regions",
            "etf_data_sector_weights",
            "etf_data_fixed_income"
        ]
    );
    let holdings = read_table(&root.join("etf_data_top_10_holdings/SPY.US.parq")).unwrap();
    assert_eq!(holdings.height(), 2);
}

#[test]
fn mutual_fund_fundamentals_write_nested_tables() {
    let doc = json!({
        "General": {"Code": "VFIAX", "Type": "FUND", "Fund_Category": "Large Blend"},
        "MutualFund_Data": {
            "Fund_Category": "Large Blend",
            "Nav": "437.21",
            "Asset_Allocation": {
                "Cash": {"Type": "Cash", "Net_%": "0.3"},
                "Stocks": {"Type": "Stocks", "Net_%": "99.7"}
            },
            "Value_Growth": {},
            "Top_Holdings": {
                "0": {"Name": "Apple Inc", "Weight": "7.1"},
                "1": {"Name": "Microsoft Corp", "Weight": "6.9"},
                "2": {"Name": "Amazon.com Inc", "Weight": "3.4"}
            }
        }
    });
    let fetcher = CannedFetcher::new().with_body("fundamentals/VFIAX.US", doc.to_string());
    let (dir, fetcher, dl) = downloader(fetcher);

    let report = dl.mutual_fund_fundamentals("VFIAX.US").unwrap();

    let root = dir.path().join("fundamentals/mutual_fund");
    assert_eq!(fetcher.requests(), vec!["fundamentals/VFIAX.US"]);
    assert_eq!(
        report.written,
        vec![
            root.join("general/VFIAX.US.parq"),
            root.join("mutualfund_data/VFIAX.US.parq"),
            root.join("mutualfund_data_asset_allocation/VFIAX.US.parq"),
            root.join("mutualfund_data_top_holdings/VFIAX.US.parq"),
        ]
    );
    assert_eq!(
        report.skipped,
        vec![
            "mutualfund_data_value_growth",
            "mutualfund_data_market_capitalization",
            "mutualfund_data_sector_weights",
            "mutualfund_data_world_regions"
        ]
    );
    let holdings = read_table(&root.join("mutualfund_data_top_holdings/VFIAX.US.parq")).unwrap();
    assert_eq!(holdings.height(), 3);
    assert_eq!(
        holdings.column("name").unwrap().str().unwrap().get(1),
        Some("Microsoft Corp")
    );
}

#[test]
fn news_bulk_survives_a_failing_symbol() {
    let articles = json!([
        {"date": "2024-01-05T13:30:00+00:00", "title": "Apple beats", "sentiment": {"polarity": 0.9}}
    ]);
    let fetcher = CannedFetcher::new()
        .with_body("eod-bulk-last-day/US", LISTING)
        .with_body("news?s=AAPL.US", articles.to_string())
        .with_status("news?s=BAD.US", 500)
        .with_body("news?s=MSFT.US", "[]");
    let (dir, fetcher, dl) = downloader(fetcher);

    let summary = dl.financial_news_exchange("US").unwrap();

    assert_eq!(
        fetcher.requests(),
        vec![
            "eod-bulk-last-day/US",
            "news?s=AAPL.US",
            "news?s=BAD.US",
            "news?s=MSFT.US"
        ]
    );
    assert_eq!(summary.total, 3);
    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.failed, 1);
    assert!(matches!(
        summary.errors[0],
        (ref symbol, EodError::Status { status: 500, .. }) if symbol == "BAD.US"
    ));
    let root = dir.path().join("financial_news");
    assert!(root.join("AAPL.US.parq").exists());
    assert!(!root.join("BAD.US.parq").exists());
    assert!(!root.join("MSFT.US.parq").exists());
    assert!(!dir.path().join("sentiments").exists());
}

#[test]
fn news_and_sentiments_share_endpoint_but_not_storage() {
    let articles = json!([
        {
            "date": "2024-01-05T13:30:00+00:00",
            "title": "Apple beats",
            "content": "...",
            "link": "https://example.com/a",
            "symbols": ["AAPL.US"],
            "tags": [],
            "sentiment": {"polarity": 0.9, "neg": 0.0, "neu": 0.6, "pos": 0.4}
        }
    ]);
    let fetcher = CannedFetcher::new().with_body("news?s=AAPL.US", articles.to_string());
    let (dir, fetcher, dl) = downloader(fetcher);

    let news = dl.financial_news("AAPL.US").unwrap().unwrap();
    let sentiments = dl.sentiments("AAPL.US").unwrap().unwrap();

    assert_eq!(news, dir.path().join("financial_news/AAPL.US.parq"));
    assert_eq!(sentiments, dir.path().join("sentiments/AAPL.US.parq"));
    assert_eq!(fetcher.requests(), vec!["news?s=AAPL.US", "news?s=AAPL.US"]);

    let df = read_table(&news).unwrap();
    assert!(df.column("sentiment").is_err());
    assert_eq!(df.column("pos").unwrap().f64().unwrap().get(0), Some(0.4));
}

#[test]
fn empty_news_writes_nothing() {
    let fetcher = CannedFetcher::new().with_body("news?s=QUIET.US", "[]");
    let (dir, _, dl) = downloader(fetcher);

    assert_eq!(dl.financial_news("QUIET.US").unwrap(), None);
    assert!(!dir.path().join("financial_news").exists());
}

#[test]
fn macro_indicators_write_one_file_per_indicator() {
    let mut fetcher = CannedFetcher::new();
    for indicator in INDICATORS {
        let key = format!("macro-indicator/USA?indicator={indicator}");
        fetcher = match *indicator {
            "gdp_growth_annual" | "debt_percent_gdp" => fetcher.with_body(
                key,
                json!([
                    {"CountryCode": "USA", "Indicator": indicator, "Date": "2022-12-31", "Period": "Annual", "Value": 2.1},
                    {"CountryCode": "USA", "Indicator": indicator, "Date": "2021-12-31", "Period": "Annual", "Value": 5.9}
                ])
                .to_string(),
            ),
            _ => fetcher.with_body(key, "[]"),
        };
    }
    let (dir, fetcher, dl) = downloader(fetcher);

    let report = dl.macro_indicators("USA").unwrap();

    let root = dir.path().join("macro_indicators/USA");
    assert_eq!(fetcher.requests().len(), INDICATORS.len());
    assert_eq!(
        report.written,
        vec![
            root.join("gdp_growth_annual.parq"),
            root.join("debt_percent_gdp.parq")
        ]
    );
    assert_eq!(report.skipped.len(), INDICATORS.len() - 2);

    let df = read_table(&root.join("debt_percent_gdp.parq")).unwrap();
    assert_eq!(df.column("date").unwrap().dtype(), &DataType::Date);
    assert_eq!(df.column("value").unwrap().f64().unwrap().get(1), Some(5.9));
}

#[test]
fn economic_events_cover_the_window() {
    let events = json!([
        {"type": "CPI", "comparison": "yoy", "country": "US", "date": "2024-01-11 13:30:00", "actual": 3.4, "previous": 3.1, "estimate": 3.2, "change": null},
        {"type": "Retail Sales", "comparison": "mom", "country": "US", "date": "2024-01-17 13:30:00", "actual": 0.6, "previous": 0.3, "estimate": 0.4, "change": 0.3}
    ]);
    let fetcher = CannedFetcher::new().with_body(
        "economic-events?from=2024-01-01&to=2024-01-31",
        events.to_string(),
    );
    let (dir, _, dl) = downloader(fetcher);

    let path = dl
        .economic_events(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        )
        .unwrap()
        .unwrap();

    assert_eq!(
        path,
        dir.path().join("economic_events/economic_events.parq")
    );
    let df = read_table(&path).unwrap();
    assert_eq!(df.height(), 2);
    assert!(matches!(
        df.column("date").unwrap().dtype(),
        DataType::Datetime(_, _)
    ));
}

#[test]
fn single_symbol_errors_propagate() {
    let fetcher = CannedFetcher::new().with_status("eod/AAPL.US", 401);
    let (_dir, _, dl) = downloader(fetcher);

    assert!(matches!(
        dl.eod_prices("AAPL.US"),
        Err(EodError::Status { status: 401, .. })
    ));
}
