//! Handler functions for the market data API endpoint.
//!
//! These run behind the authentication gate; by the time a handler is
//! invoked the caller's identity has already been resolved.

use crate::api::common::service_error_to_http;
use crate::services::market_data::{FxRate, IndexQuote, MarketDataService};
use axum::{extract::Extension, http::StatusCode, response::Json as ResponseJson};
use serde::Serialize;

/// Market snapshot returned by the protected lookup endpoint
#[derive(Debug, Serialize)]
pub struct MarketData {
    pub usd_brl: FxRate,
    pub ibovespa: Vec<IndexQuote>,
}

/// Handle the market data lookup request
#[axum::debug_handler]
pub async fn get_market_data(
    Extension(market): Extension<MarketDataService>,
) -> Result<ResponseJson<MarketData>, (StatusCode, String)> {
    let usd_brl = match market.usd_brl_rate().await {
        Ok(rate) => rate,
        Err(error) => return Err(service_error_to_http(error)),
    };

    Ok(ResponseJson(MarketData {
        usd_brl,
        ibovespa: market.ibovespa_history(),
    }))
}
