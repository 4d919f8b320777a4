use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::db::entity::{plan, transaction};
use crate::error::Result;
use crate::services::dca_service::PlanRequest;

use super::AppState;

#[derive(Serialize)]
pub struct PlanResponse {
    pub success: bool,
    pub plan: plan::Model,
}

#[derive(Serialize)]
pub struct PlansResponse {
    pub success: bool,
    pub plans: Vec<plan::Model>,
}

#[derive(Serialize)]
pub struct TransactionsResponse {
    pub success: bool,
    pub transactions: Vec<transaction::Model>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalInvestmentResponse {
    pub success: bool,
    pub total_investment: f64,
}

pub async fn create_plan(
    State(state): State<AppState>,
    Json(request): Json<PlanRequest>,
) -> Result<Json<PlanResponse>> {
    let plan = state
        .dca_service
        .create_plan(state.default_user_id, request)
        .await?;

    Ok(Json(PlanResponse { success: true, plan }))
}

pub async fn stop_plan(
    State(state): State<AppState>,
    Path(plan_id): Path<Uuid>,
) -> Result<Json<PlanResponse>> {
    let plan = state.dca_service.stop_plan(plan_id).await?;

    Ok(Json(PlanResponse { success: true, plan }))
}

pub async fn list_plans(State(state): State<AppState>) -> Result<Json<PlansResponse>> {
    let plans = state.dca_service.list_plans(state.default_user_id).await?;

    Ok(Json(PlansResponse {
        success: true,
        plans,
    }))
}

pub async fn plan_transactions(
    State(state): State<AppState>,
    Path(plan_id): Path<Uuid>,
) -> Result<Json<TransactionsResponse>> {
    let transactions = state.dca_service.plan_transactions(plan_id).await?;

    Ok(Json(TransactionsResponse {
        success: true,
        transactions,
    }))
}

pub async fn total_investment(State(state): State<AppState>) -> Result<Json<TotalInvestmentResponse>> {
    let total = state
        .dca_service
        .total_investment(state.default_user_id)
        .await?;

    Ok(Json(TotalInvestmentResponse {
        success: true,
        total_investment: total,
    }))
}
