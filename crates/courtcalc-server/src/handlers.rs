// Route handlers. Each one is a thin adapter from HTTP to courtcalc-core.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use tracing::{debug, info};

use courtcalc_core::engine::ResultRow;
use courtcalc_core::examples::{ExampleFormula, EXAMPLE_FORMULAS};
use courtcalc_core::naming::{suggest_name, SuggestedName};
use courtcalc_core::player::PlayerRecord;
use courtcalc_core::stat::{catalogue, StatInfo};
use courtcalc_core::store::{CustomStat, NewCustomStat};
use courtcalc_core::validate::{validate, FormulaValidation};

use crate::error::{ApiError, ApiResult};
use crate::models::{
    non_blank, required_formula, CalculateRequest, CreateCustomStatRequest, CustomStatsQuery,
    FormulaRequest, HealthResponse, PlayersQuery,
};
use crate::AppState;

pub const FORMULA_REQUIRED: &str = "Formula is required";

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub async fn stats() -> Json<Vec<StatInfo>> {
    Json(catalogue())
}

pub async fn players(
    State(state): State<AppState>,
    query: Result<Query<PlayersQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<PlayerRecord>>> {
    let Query(query) = query?;
    let players = state.players_for(non_blank(query.season).as_deref()).await?;
    Ok(Json(players))
}

pub async fn validate_formula(
    payload: Result<Json<FormulaRequest>, JsonRejection>,
) -> ApiResult<Json<FormulaValidation>> {
    let Json(req) = payload?;
    Ok(Json(validate(req.formula.as_deref().unwrap_or_default())))
}

pub async fn calculate(
    State(state): State<AppState>,
    payload: Result<Json<CalculateRequest>, JsonRejection>,
) -> ApiResult<Json<Vec<ResultRow>>> {
    let Json(req) = payload?;
    let formula = required_formula(req.formula.as_deref())
        .ok_or_else(|| ApiError::BadRequest(FORMULA_REQUIRED.into()))?;

    let season = non_blank(req.season);
    let players = state.players_for(season.as_deref()).await?;
    let rows = state.engine.evaluate(formula, &players);
    info!(
        formula,
        season = season.as_deref().unwrap_or("all"),
        players = players.len(),
        rows = rows.len(),
        "calculated leaderboard"
    );
    Ok(Json(rows))
}

pub async fn name_formula(
    payload: Result<Json<FormulaRequest>, JsonRejection>,
) -> ApiResult<Json<SuggestedName>> {
    let Json(req) = payload?;
    let formula = required_formula(req.formula.as_deref())
        .ok_or_else(|| ApiError::BadRequest(FORMULA_REQUIRED.into()))?;
    Ok(Json(suggest_name(formula)))
}

pub async fn examples() -> Json<&'static [ExampleFormula]> {
    Json(EXAMPLE_FORMULAS)
}

pub async fn list_custom_stats(
    State(state): State<AppState>,
    query: Result<Query<CustomStatsQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<CustomStat>>> {
    let Query(query) = query?;
    let user_id = non_blank(query.user_id);
    let stats = state.store.custom_stats(user_id.as_deref()).await?;
    Ok(Json(stats))
}

pub async fn create_custom_stat(
    State(state): State<AppState>,
    payload: Result<Json<CreateCustomStatRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<CustomStat>)> {
    let Json(req) = payload?;
    let formula = required_formula(req.formula.as_deref())
        .ok_or_else(|| ApiError::BadRequest(FORMULA_REQUIRED.into()))?;

    let validation = validate(formula);
    if !validation.is_valid {
        let message = validation.error.unwrap_or_else(|| "Invalid formula".into());
        return Err(ApiError::BadRequest(message));
    }

    let name = match non_blank(req.name) {
        Some(name) => name.trim().to_string(),
        None => suggest_name(formula).name,
    };
    let saved = state
        .store
        .save_custom_stat(NewCustomStat {
            formula: formula.to_string(),
            name,
            description: non_blank(req.description),
            user_id: non_blank(req.user_id),
        })
        .await?;
    info!(id = saved.id, name = %saved.name, "custom stat saved");
    Ok((StatusCode::CREATED, Json(saved)))
}

pub async fn get_custom_stat(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<CustomStat>> {
    let Path(id) = id?;
    state
        .store
        .custom_stat(id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(id))
}

pub async fn delete_custom_stat(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<StatusCode> {
    let Path(id) = id?;
    if state.store.delete_custom_stat(id).await? {
        debug!(id, "custom stat deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

fn not_found(id: i64) -> ApiError {
    ApiError::NotFound(format!("Custom stat {id} not found"))
}
