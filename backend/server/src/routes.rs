use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
};
use bank::{MappingEntry, RedemptionEntry};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    error::AppError::{self, Validation},
    state::AppState,
    utils::required,
};

#[derive(Deserialize)]
pub struct LookupQuery {
    staff_pass_id: Option<String>,
}

#[derive(Deserialize)]
pub struct StatusQuery {
    team_name: Option<String>,
}

#[derive(Deserialize)]
pub struct RedemptionPayload {
    staff_pass_id: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct RedemptionStatus {
    pub team_name: String,
    pub redeemed: bool,
    pub redemption: Option<RedemptionEntry>,
}

pub async fn health_handler() -> &'static str {
    "ok"
}

pub async fn lookup_handler(
    State(state): State<Arc<AppState>>,
    query: Result<Query<LookupQuery>, QueryRejection>,
) -> Result<Json<MappingEntry>, AppError> {
    let Query(query) = query.map_err(|e| Validation(e.body_text()))?;
    let staff_pass_id = required(
        query.staff_pass_id,
        "staff_pass_id is needed to lookup redemption",
    )?;

    let mapping = state
        .store
        .run(move |store| store.resolve(&staff_pass_id))
        .await?;

    Ok(Json(mapping))
}

pub async fn redemption_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RedemptionPayload>, JsonRejection>,
) -> Result<Json<RedemptionEntry>, AppError> {
    let Json(payload) =
        payload.map_err(|_| Validation("invalid request payload to redeem gift".to_string()))?;
    let staff_pass_id = required(
        payload.staff_pass_id,
        "staff_pass_id is needed to redeem gift",
    )?;

    let redemption = state
        .store
        .run(move |store| store.claim(&staff_pass_id))
        .await
        .inspect_err(|e| info!("Redemption rejected: {e}"))?;

    Ok(Json(redemption))
}

pub async fn status_handler(
    State(state): State<Arc<AppState>>,
    query: Result<Query<StatusQuery>, QueryRejection>,
) -> Result<Json<RedemptionStatus>, AppError> {
    let Query(query) = query.map_err(|e| Validation(e.body_text()))?;
    let team_name = required(query.team_name, "team_name is needed to check redemption")?;

    let lookup_team = team_name.clone();
    let redemption = state
        .store
        .run(move |store| store.redemption_for(&lookup_team))
        .await?;

    Ok(Json(RedemptionStatus {
        team_name,
        redeemed: redemption.is_some(),
        redemption,
    }))
}
