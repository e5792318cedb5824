//! Country-level macroeconomic indicators.

use super::base::{Source, WriteReport};
use crate::error::Result;
use crate::table::{coerce_dates, parse_records};

/// Every indicator fetched per country, in request order. Each is written as
/// `<country>/<indicator>.parq`.
pub const INDICATORS: &[&str] = &[
    "real_interest_rate",
    "population_total",
    "population_growth_annual",
    "inflation_consumer_prices_annual",
    "consumer_price_index",
    "gdp_current_usd",
    "gdp_per_capita_usd",
    "gdp_growth_annual",
    "debt_percent_gdp",
    "net_trades_goods_services",
    "inflation_gdp_deflator_annual",
    "agriculture_value_added_percent_gdp",
    "industry_value_added_percent_gdp",
    "services_value_added_percent_gdp",
    "exports_of_goods_services_percent_gdp",
    "imports_of_goods_services_percent_gdp",
    "gross_capital_formation_percent_gdp",
    "net_migration",
    "gni_usd",
    "gni_per_capita_usd",
    "gni_ppp_usd",
    "gni_per_capita_ppp_usd",
    "income_share_lowest_twenty",
    "life_expectancy",
    "fertility_rate",
    "prevalence_hiv_total",
    "co2_emissions_tons_per_capita",
    "surface_area_km",
    "poverty_poverty_lines_percent_population",
    "revenue_excluding_grants_percent_gdp",
    "cash_surplus_deficit_percent_gdp",
    "startup_procedures_register",
    "market_cap_domestic_companies_percent_gdp",
    "mobile_subscriptions_per_hundred",
    "internet_users_per_hundred",
    "high_technology_exports_percent_total",
    "merchandise_trade_percent_gdp",
    "total_debt_service_percent_gni",
];

#[derive(Clone)]
pub struct MacroIndicators {
    source: Source,
}

impl MacroIndicators {
    pub fn new(source: Source) -> Self {
        Self { source }
    }

    /// Fetch every indicator for `country` (ISO-3 code, e.g. `USA`).
    ///
    /// Indicators with no observations are skipped; any other failure stops
    /// the run.
    pub fn macro_indicators_exchange(&self, country: &str) -> Result<WriteReport> {
        let mut report = WriteReport::new(country);
        let path = format!("macro-indicator/{country}");

        for &indicator in INDICATORS {
            let payload = self
                .source
                .fetch_json(&path, &[("indicator", indicator)])?;
            match parse_records(&payload)? {
                Some(table) => {
                    let mut table = coerce_dates(table, &["date"])?;
                    let written = self.source.write(indicator, &mut table, Some(country))?;
                    report.written.push(written);
                }
                None => report.skip(indicator),
            }
        }
        Ok(report)
    }
}
