//! Market data lookups served to authenticated clients.
//!
//! The USD-BRL exchange rate comes from the AwesomeAPI public endpoint,
//! fetched with a bounded timeout and cached briefly so bursts of requests
//! do not hammer the provider. The IBOVESPA history is a fixed daily
//! snapshot.

use crate::config::Config;
use crate::errors::{ServiceError, ServiceResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::sync::RwLock;

#[derive(Deserialize)]
struct AwesomeApiQuote {
    bid: String,
    create_date: String,
}

#[derive(Deserialize)]
struct AwesomeApiResponse {
    #[serde(rename = "USDBRL")]
    usd_brl: AwesomeApiQuote,
}

/// A spot exchange rate as returned to clients.
#[derive(Debug, Clone, Serialize)]
pub struct FxRate {
    pub pair: String,
    pub rate: f64,
    pub date: String,
}

/// One daily OHLCV record of the IBOVESPA index.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct IndexQuote {
    pub date: &'static str,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

#[derive(Clone)]
struct RateCache {
    rate: FxRate,
    last_updated: SystemTime,
}

/// Client for the external market data providers.
#[derive(Clone)]
pub struct MarketDataService {
    cache: Arc<RwLock<Option<RateCache>>>,
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl MarketDataService {
    const CACHE_DURATION: Duration = Duration::from_secs(120);

    pub fn new(config: &Config) -> Self {
        Self {
            cache: Arc::new(RwLock::new(None)),
            client: reqwest::Client::new(),
            base_url: config.rate_api_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(config.rate_timeout_seconds),
        }
    }

    /// Current USD-BRL rate (cached or fetched from the provider).
    pub async fn usd_brl_rate(&self) -> ServiceResult<FxRate> {
        if let Some(cached) = self.check_cache().await {
            return Ok(cached);
        }

        match self.fetch_rate_from_api().await {
            Ok(rate) => {
                self.update_cache(rate.clone()).await;
                Ok(rate)
            }
            Err(e) => {
                // Fall back to a stale cache entry if one exists
                self.cache
                    .read()
                    .await
                    .as_ref()
                    .map(|c| c.rate.clone())
                    .ok_or(e)
            }
        }
    }

    /// Recent IBOVESPA daily quotes.
    pub fn ibovespa_history(&self) -> Vec<IndexQuote> {
        IBOVESPA_HISTORY.to_vec()
    }

    async fn check_cache(&self) -> Option<FxRate> {
        let cache = self.cache.read().await;
        cache.as_ref().and_then(|c| {
            c.last_updated
                .elapsed()
                .ok()
                .filter(|&elapsed| elapsed < Self::CACHE_DURATION)
                .map(|_| c.rate.clone())
        })
    }

    async fn fetch_rate_from_api(&self) -> ServiceResult<FxRate> {
        let url = format!("{}/json/last/USD-BRL", self.base_url);

        let response = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                ServiceError::external_service(format!("Rate provider unreachable: {}", e))
            })?;

        let payload: AwesomeApiResponse = response.json().await.map_err(|e| {
            ServiceError::external_service(format!(
                "Rate provider returned an unexpected payload: {}",
                e
            ))
        })?;

        let rate = payload.usd_brl.bid.parse::<f64>().map_err(|e| {
            ServiceError::external_service(format!("Rate provider returned a non-numeric bid: {}", e))
        })?;

        Ok(FxRate {
            pair: "USD-BRL".to_string(),
            rate,
            date: payload.usd_brl.create_date,
        })
    }

    async fn update_cache(&self, rate: FxRate) {
        let mut cache = self.cache.write().await;
        *cache = Some(RateCache {
            rate,
            last_updated: SystemTime::now(),
        });
    }
}

const IBOVESPA_HISTORY: [IndexQuote; 8] = [
    IndexQuote { date: "2024-09-05", open: 136112.0, high: 136656.0, low: 135959.0, close: 136502.0, volume: 7528700 },
    IndexQuote { date: "2024-09-06", open: 136508.0, high: 136653.0, low: 134476.0, close: 134572.0, volume: 7563300 },
    IndexQuote { date: "2024-09-09", open: 134574.0, high: 135250.0, low: 134399.0, close: 134737.0, volume: 6587600 },
    IndexQuote { date: "2024-09-10", open: 134738.0, high: 134738.0, low: 133754.0, close: 134320.0, volume: 8253500 },
    IndexQuote { date: "2024-09-11", open: 134319.0, high: 135087.0, low: 133757.0, close: 134677.0, volume: 7947300 },
    IndexQuote { date: "2024-09-12", open: 134677.0, high: 134777.0, low: 133591.0, close: 134029.0, volume: 7004900 },
    IndexQuote { date: "2024-09-13", open: 134031.0, high: 135879.0, low: 134031.0, close: 134882.0, volume: 8866000 },
    IndexQuote { date: "2024-09-16", open: 134885.0, high: 135715.0, low: 134870.0, close: 135118.0, volume: 6707000 },
];

#[cfg(test)]
mod tests {
    use super::*;

    fn test_service() -> MarketDataService {
        MarketDataService::new(&Config {
            database_url: "sqlite::memory:".to_string(),
            max_connections: 1,
            acquire_timeout_seconds: 3,
            jwt_secret: "unit-test-secret".to_string(),
            jwt_expires_in_seconds: 1800,
            server_port: 0,
            rate_api_url: "http://127.0.0.1:1".to_string(),
            rate_timeout_seconds: 1,
        })
    }

    #[test]
    fn history_is_a_contiguous_daily_window() {
        let history = test_service().ibovespa_history();

        assert_eq!(history.len(), 8);
        for pair in history.windows(2) {
            assert!(pair[0].date < pair[1].date);
        }
        for quote in &history {
            assert!(quote.low <= quote.open && quote.open <= quote.high);
            assert!(quote.low <= quote.close && quote.close <= quote.high);
        }
    }

    #[tokio::test]
    async fn unreachable_provider_is_an_external_service_error() {
        let service = test_service();

        let result = service.usd_brl_rate().await;
        assert!(matches!(
            result,
            Err(ServiceError::ExternalService { .. })
        ));
    }
}
