//! # CoinGecko Market Data
//!
//! Implements `MarketDataProvider` against the CoinGecko v3 REST API.
//! Every request is bounded by the smaller of the configured timeout and the time left on the
//! request context.

use anyhow::{Context as AnyhowContext, Result};
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::time::Duration;

use crate::domain::config::CoinGeckoConfig;
use crate::domain::traits::MarketDataProvider;
use crate::domain::types::{Quote, RequestContext, ServiceError};

const SERVICE: &str = "coingecko";

pub struct CoinGeckoClient {
    http: Client,
    base_url: String,
    api_key: String,
    timeout: Duration,
}

impl CoinGeckoClient {
    pub fn new(config: &CoinGeckoConfig) -> Result<Self> {
        let http = Client::builder()
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.resolve_api_key(),
            timeout: config.timeout(),
        })
    }

    /// `{base}/{segments...}` with each segment percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ServiceError> {
        build_url(&self.base_url, segments)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        ctx: &RequestContext,
        url: Url,
        query: &[(&str, &str)],
    ) -> Result<T, ServiceError> {
        let mut request = self
            .http
            .get(url)
            .query(query)
            .header("accept", "application/json")
            .timeout(ctx.bounded(self.timeout));

        if !self.api_key.is_empty() {
            request = request.header("x-cg-demo-api-key", &self.api_key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ServiceError::new(SERVICE, format!("API request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            return Err(ServiceError::new(
                SERVICE,
                format!("HTTP {}: {}", status, error_text),
            ));
        }

        response
            .json()
            .await
            .map_err(|e| ServiceError::new(SERVICE, format!("Failed to parse response: {}", e)))
    }
}

#[async_trait]
impl MarketDataProvider for CoinGeckoClient {
    async fn price(
        &self,
        ctx: &RequestContext,
        coin: &str,
        currency: &str,
    ) -> Result<Quote, ServiceError> {
        let url = self.endpoint(&["simple", "price"])?;
        let body: HashMap<String, HashMap<String, f64>> = self
            .get_json(
                ctx,
                url,
                &[
                    ("ids", coin),
                    ("vs_currencies", currency),
                    ("include_market_cap", "false"),
                    ("include_24hr_vol", "false"),
                    ("include_24hr_change", "false"),
                    ("include_last_updated_at", "false"),
                    ("precision", "full"),
                ],
            )
            .await?;
        quote_from(&body, coin, currency)
    }

    async fn market_snapshot(
        &self,
        ctx: &RequestContext,
        coin: &str,
    ) -> Result<Map<String, Value>, ServiceError> {
        let url = self.endpoint(&["coins", "markets"])?;
        let rows: Vec<Map<String, Value>> = self
            .get_json(
                ctx,
                url,
                &[
                    ("vs_currency", "usd"),
                    ("ids", coin),
                    ("order", "market_cap_desc"),
                    ("locale", "en"),
                    ("precision", "full"),
                ],
            )
            .await?;

        rows.into_iter().next().ok_or_else(|| {
            ServiceError::new(SERVICE, format!("no data found for cryptocurrency: {coin}"))
        })
    }

    async fn coin_details(&self, ctx: &RequestContext, coin: &str) -> Result<Value, ServiceError> {
        let url = self.endpoint(&["coins", coin])?;
        self.get_json(
            ctx,
            url,
            &[
                ("localization", "false"),
                ("tickers", "true"),
                ("market_data", "true"),
                ("community_data", "true"),
                ("developer_data", "false"),
            ],
        )
        .await
    }
}

fn build_url(base_url: &str, segments: &[&str]) -> Result<Url, ServiceError> {
    let mut url = Url::parse(base_url)
        .map_err(|e| ServiceError::new(SERVICE, format!("Invalid base URL: {}", e)))?;
    url.path_segments_mut()
        .map_err(|_| ServiceError::new(SERVICE, "Base URL cannot carry a path"))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

fn quote_from(
    body: &HashMap<String, HashMap<String, f64>>,
    coin: &str,
    currency: &str,
) -> Result<Quote, ServiceError> {
    body.get(coin)
        .and_then(|prices| prices.get(currency))
        .map(|price| Quote {
            coin: coin.to_string(),
            currency: currency.to_string(),
            price: *price,
        })
        .ok_or_else(|| {
            ServiceError::new(
                SERVICE,
                format!("price data not found for {coin} in {currency}"),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_url_appends_encoded_segments() {
        let url = build_url("https://api.coingecko.com/api/v3", &["coins", "bitcoin cash"]).unwrap();
        assert_eq!(url.as_str(), "https://api.coingecko.com/api/v3/coins/bitcoin%20cash");

        let url = build_url("https://example.test/api/", &["simple", "price"]).unwrap();
        assert_eq!(url.as_str(), "https://example.test/api/simple/price");
    }

    #[test]
    fn test_build_url_rejects_garbage() {
        assert!(build_url("not a url", &["coins"]).is_err());
    }

    #[test]
    fn test_quote_from_response() {
        let body: HashMap<String, HashMap<String, f64>> =
            serde_json::from_str(r#"{"bitcoin":{"usd":64123.456789}}"#).unwrap();

        let quote = quote_from(&body, "bitcoin", "usd").unwrap();
        assert_eq!(quote.price, 64123.456789);

        let err = quote_from(&body, "bitcoin", "eur").unwrap_err();
        assert_eq!(err.message, "price data not found for bitcoin in eur");
        assert!(quote_from(&body, "dogecoin", "usd").is_err());
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let config = CoinGeckoConfig {
            base_url: "https://example.test/v3/".to_string(),
            api_key: Some("k".to_string()),
            ..CoinGeckoConfig::default()
        };
        let client = CoinGeckoClient::new(&config).unwrap();
        assert_eq!(client.base_url, "https://example.test/v3");
        assert_eq!(client.api_key, "k");
        assert_eq!(
            client.endpoint(&["simple", "price"]).unwrap().as_str(),
            "https://example.test/v3/simple/price"
        );
    }
}
