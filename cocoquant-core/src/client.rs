//! HTTP fetcher for the EOD Historical Data REST API.
//!
//! Every call is a single blocking GET against `<base_url>/<path>` with the
//! API token and extra parameters in the query string. There are no retries:
//! failures go straight back to the caller, and the bulk dispatcher decides
//! whether to skip them.
//!
//! The [`Fetcher`] trait lets sources run against an in-memory fetcher
//! instead of the network.

use crate::config::ClientConfig;
use crate::error::{EodError, Result};
use reqwest::Url;
use tracing::{debug, info};

/// Source of raw response bodies, keyed by relative path and query parameters.
pub trait Fetcher: Send + Sync {
    /// GET `path` with `params` and return the decoded body.
    fn fetch(&self, path: &str, params: &[(&str, &str)]) -> Result<String>;
}

/// Build `<base_url>/<path>?api_token=<token>[&k=v...]`, percent-encoding values.
pub fn build_url(
    base_url: &str,
    api_token: &str,
    path: &str,
    params: &[(&str, &str)],
) -> Result<Url> {
    let raw = format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    let mut url =
        Url::parse(&raw).map_err(|e| EodError::Config(format!("invalid url '{raw}': {e}")))?;
    url.query_pairs_mut()
        .append_pair("api_token", api_token)
        .extend_pairs(params.iter());
    Ok(url)
}

/// Blocking reqwest client bound to one API token.
pub struct EodClient {
    client: reqwest::blocking::Client,
    base_url: String,
    api_token: String,
}

impl EodClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        config.validate()?;

        let mut builder = reqwest::blocking::Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: config.base_url.clone(),
            api_token: config.api_token.clone(),
        })
    }
}

impl Fetcher for EodClient {
    fn fetch(&self, path: &str, params: &[(&str, &str)]) -> Result<String> {
        info!(path, ?params, "eod request");
        let url = build_url(&self.base_url, &self.api_token, path, params)?;

        let resp = self.client.get(url).send()?;
        let status = resp.status();
        if !status.is_success() {
            return Err(EodError::Status {
                status: status.as_u16(),
                path: path.to_string(),
            });
        }

        let body = resp.text()?;
        debug!(path, bytes = body.len(), "eod response");
        Ok(body)
    }
}
