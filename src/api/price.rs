use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::db::entity::token_price;
use crate::error::Result;
use crate::services::price_service::RiskReport;

use super::AppState;

#[derive(Serialize)]
pub struct PriceResponse {
    pub success: bool,
    pub symbol: String,
    pub price: f64,
}

#[derive(Serialize)]
pub struct AnalysisResponse {
    pub success: bool,
    pub analysis: RiskReport,
}

#[derive(Serialize)]
pub struct HistoryResponse {
    pub success: bool,
    pub prices: Vec<token_price::Model>,
}

#[derive(Deserialize)]
pub struct HistoryParams {
    pub days: Option<i64>,
}

pub async fn current_price(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<PriceResponse>> {
    let price = state.price_service.current_price(&symbol).await?;

    Ok(Json(PriceResponse {
        success: true,
        symbol: symbol.to_uppercase(),
        price,
    }))
}

pub async fn analyze(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Json<AnalysisResponse> {
    let analysis = state.price_service.analyze_risk(&symbol).await;

    Json(AnalysisResponse {
        success: true,
        analysis,
    })
}

pub async fn history(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    Query(params): Query<HistoryParams>,
) -> Result<Json<HistoryResponse>> {
    let days = params.days.unwrap_or(7);
    let prices = state.price_service.historical_prices(&symbol, days).await?;

    Ok(Json(HistoryResponse {
        success: true,
        prices,
    }))
}
