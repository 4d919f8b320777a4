use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::db::entity::token_price;
use crate::enums::RiskLevel;
use crate::error::{AppError, Result};
use crate::store::PriceHistoryStore;

/// Returned only when a fetch fails and no sample was ever persisted.
const DEFAULT_FALLBACK_PRICE: f64 = 1.0;

/// Source of current token prices, consumed once per plan execution.
#[async_trait]
pub trait PriceOracle: Send + Sync {
    async fn current_price(&self, symbol: &str) -> Result<f64>;
}

/// Volatility-based investment hint for the UI.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskReport {
    pub risk_level: RiskLevel,
    pub recommendation: String,
    pub suggested_investment: f64,
}

#[derive(Deserialize)]
struct CurrencyPrice {
    usd: f64,
}

/// Fetches prices from CoinGecko and persists every successful fetch as a
/// timestamped sample. On fetch failure the newest persisted sample is
/// served instead, so price unavailability never aborts an execution once
/// any history exists.
pub struct PriceService {
    client: reqwest::Client,
    api_base: String,
    history: Arc<dyn PriceHistoryStore>,
}

impl PriceService {
    pub fn new(history: Arc<dyn PriceHistoryStore>, api_base: String) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .unwrap_or_default(),
            api_base,
            history,
        }
    }

    pub async fn current_price(&self, symbol: &str) -> Result<f64> {
        let symbol = symbol.to_uppercase();

        match self.fetch_remote(&symbol).await {
            Ok(price) => {
                if let Err(e) = self.history.record_sample(&symbol, price).await {
                    tracing::warn!(symbol = %symbol, error = %e, "Failed to persist price sample");
                }
                Ok(price)
            }
            Err(e) => {
                tracing::warn!(
                    symbol = %symbol,
                    error = %e,
                    "Price fetch failed; falling back to last persisted sample"
                );

                if let Some(sample) = self.history.latest_sample(&symbol).await? {
                    return Ok(sample.price);
                }

                Ok(DEFAULT_FALLBACK_PRICE)
            }
        }
    }

    /// Persisted samples for the trailing `days` window, oldest first.
    pub async fn historical_prices(
        &self,
        symbol: &str,
        days: i64,
    ) -> Result<Vec<token_price::Model>> {
        let since = Utc::now() - chrono::Duration::days(days);
        self.history.samples_since(&symbol.to_uppercase(), since).await
    }

    pub async fn moving_average(&self, symbol: &str, days: i64) -> Result<f64> {
        let prices = self.historical_prices(symbol, days).await?;

        if prices.is_empty() {
            return self.current_price(symbol).await;
        }

        let sum: f64 = prices.iter().map(|p| p.price).sum();
        Ok(sum / prices.len() as f64)
    }

    /// Classify a token's recent volatility. Falls back to a medium-risk
    /// profile when the analysis itself fails.
    pub async fn analyze_risk(&self, symbol: &str) -> RiskReport {
        match self.try_analyze(symbol).await {
            Ok(report) => report,
            Err(e) => {
                tracing::warn!(symbol = %symbol, error = %e, "Risk analysis failed");
                RiskReport {
                    risk_level: RiskLevel::Medium,
                    recommendation: "Could not analyze risk. Using default medium risk profile."
                        .to_string(),
                    suggested_investment: 20.0,
                }
            }
        }
    }

    pub async fn suggested_investment(&self, symbol: &str) -> f64 {
        self.analyze_risk(symbol).await.suggested_investment
    }

    async fn try_analyze(&self, symbol: &str) -> Result<RiskReport> {
        let prices = self.historical_prices(symbol, 30).await?;
        // Refreshes the sample history as a side effect.
        self.current_price(symbol).await?;

        let mut returns = Vec::new();
        for pair in prices.windows(2) {
            if pair[0].price != 0.0 {
                returns.push((pair[1].price - pair[0].price) / pair[0].price);
            }
        }

        let volatility = if returns.is_empty() {
            0.0
        } else {
            let mean = returns.iter().sum::<f64>() / returns.len() as f64;
            let variance =
                returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / returns.len() as f64;
            variance.sqrt()
        };

        let (risk_level, suggested_investment, recommendation) = if volatility < 0.03 {
            (
                RiskLevel::Low,
                10.0,
                format!(
                    "{} has shown low volatility recently. Consider a conservative investment.",
                    symbol
                ),
            )
        } else if volatility > 0.07 {
            (
                RiskLevel::High,
                30.0,
                format!(
                    "{} has shown high volatility recently. Only invest what you can afford to lose.",
                    symbol
                ),
            )
        } else {
            (
                RiskLevel::Medium,
                20.0,
                format!(
                    "{} has shown moderate volatility. A balanced approach is recommended.",
                    symbol
                ),
            )
        };

        Ok(RiskReport {
            risk_level,
            recommendation,
            suggested_investment,
        })
    }

    async fn fetch_remote(&self, symbol: &str) -> Result<f64> {
        let token_id = coingecko_id(symbol);
        let url = format!("{}/simple/price", self.api_base);

        let response = self
            .client
            .get(&url)
            .query(&[("ids", token_id.as_str()), ("vs_currencies", "usd")])
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Price fetch failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::Upstream(format!(
                "Price API returned status: {}",
                response.status()
            )));
        }

        let body: HashMap<String, CurrencyPrice> = response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("Failed to parse price response: {}", e)))?;

        let price = body
            .get(&token_id)
            .map(|p| p.usd)
            .ok_or_else(|| AppError::Upstream(format!("No price returned for {}", symbol)))?;

        if price <= 0.0 {
            return Err(AppError::Upstream(format!(
                "Non-positive price returned for {}: {}",
                symbol, price
            )));
        }

        Ok(price)
    }
}

#[async_trait]
impl PriceOracle for PriceService {
    async fn current_price(&self, symbol: &str) -> Result<f64> {
        PriceService::current_price(self, symbol).await
    }
}

/// Map a token symbol to its CoinGecko id.
fn coingecko_id(symbol: &str) -> String {
    match symbol {
        "INJ" => "injective-protocol".to_string(),
        "TON" => "the-open-network".to_string(),
        "SONIC" => "sonic-3".to_string(),
        other => other.to_lowercase(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;

    // An unroutable endpoint so every remote fetch fails fast.
    const DEAD_API: &str = "http://127.0.0.1:9";

    fn service() -> (PriceService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let service = PriceService::new(store.clone(), DEAD_API.to_string());
        (service, store)
    }

    #[tokio::test]
    async fn falls_back_to_latest_persisted_sample() {
        let (service, store) = service();
        store.record_sample("SONIC", 41.0).await.unwrap();
        store.record_sample("SONIC", 42.0).await.unwrap();

        let price = service.current_price("SONIC").await.unwrap();
        assert_eq!(price, 42.0);
    }

    #[tokio::test]
    async fn defaults_when_no_history_exists() {
        let (service, _store) = service();

        let price = service.current_price("SONIC").await.unwrap();
        assert_eq!(price, DEFAULT_FALLBACK_PRICE);
    }

    #[tokio::test]
    async fn moving_average_over_seeded_samples() {
        let (service, store) = service();
        for price in [1.0, 2.0, 3.0] {
            store.record_sample("INJ", price).await.unwrap();
        }

        let avg = service.moving_average("INJ", 7).await.unwrap();
        assert!((avg - 2.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn steady_prices_score_low_risk() {
        let (service, store) = service();
        for _ in 0..10 {
            store.record_sample("INJ", 25.0).await.unwrap();
        }

        let report = service.analyze_risk("INJ").await;
        assert_eq!(report.risk_level, RiskLevel::Low);
        assert_eq!(report.suggested_investment, 10.0);
    }

    #[tokio::test]
    async fn volatile_prices_score_high_risk() {
        let (service, store) = service();
        for price in [100.0, 200.0, 100.0, 200.0, 100.0, 200.0] {
            store.record_sample("INJ", price).await.unwrap();
        }

        let report = service.analyze_risk("INJ").await;
        assert_eq!(report.risk_level, RiskLevel::High);
        assert_eq!(report.suggested_investment, 30.0);
    }
}
