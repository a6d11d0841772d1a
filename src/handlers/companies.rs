use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use serde_json::{json, Map, Value};

use crate::middleware::{ApiResponse, ApiResult};
use crate::models::{Company, CompanyFilter, NewCompany};
use crate::state::AppState;

/// POST /companies { handle, name, description, numEmployees, logoUrl } => { company }
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<NewCompany>, JsonRejection>,
) -> ApiResult<Value> {
    let Json(data) = payload?;
    data.validate()?;

    let company = Company::create(&state.pool, data).await?;
    Ok(ApiResponse::created(json!({ "company": company })))
}

/// GET /companies?minEmployees&maxEmployees&name => { companies: [...] }
pub async fn list(
    State(state): State<AppState>,
    filter: Result<Query<CompanyFilter>, QueryRejection>,
) -> ApiResult<Value> {
    let Query(filter) = filter?;

    let companies = Company::find_all(&state.pool, &filter).await?;
    Ok(ApiResponse::success(json!({ "companies": companies })))
}

/// GET /companies/:handle => { company } with its jobs
pub async fn get(State(state): State<AppState>, Path(handle): Path<String>) -> ApiResult<Value> {
    let company = Company::get(&state.pool, &handle).await?;
    Ok(ApiResponse::success(json!({ "company": company })))
}

/// PATCH /companies/:handle { name?, description?, numEmployees?, logoUrl? } => { company }
pub async fn update(
    State(state): State<AppState>,
    Path(handle): Path<String>,
    payload: Result<Json<Map<String, Value>>, JsonRejection>,
) -> ApiResult<Value> {
    let Json(data) = payload?;

    let company = Company::update(&state.pool, &handle, &data).await?;
    Ok(ApiResponse::success(json!({ "company": company })))
}

/// DELETE /companies/:handle => { deleted: handle }
pub async fn remove(State(state): State<AppState>, Path(handle): Path<String>) -> ApiResult<Value> {
    Company::remove(&state.pool, &handle).await?;
    Ok(ApiResponse::success(json!({ "deleted": handle })))
}
