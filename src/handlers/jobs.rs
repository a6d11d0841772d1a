use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use serde_json::{json, Map, Value};

use crate::middleware::{ApiResponse, ApiResult};
use crate::models::{Job, JobFilter, NewJob};
use crate::state::AppState;

/// POST /jobs { title, salary, equity, companyHandle } => { job }
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<NewJob>, JsonRejection>,
) -> ApiResult<Value> {
    let Json(data) = payload?;
    data.validate()?;

    let job = Job::create(&state.pool, data).await?;
    Ok(ApiResponse::created(json!({ "job": job })))
}

/// GET /jobs?minSalary&title&hasEquity => { jobs: [...] }
pub async fn list(
    State(state): State<AppState>,
    filter: Result<Query<JobFilter>, QueryRejection>,
) -> ApiResult<Value> {
    let Query(filter) = filter?;

    let jobs = Job::find_all(&state.pool, &filter).await?;
    Ok(ApiResponse::success(json!({ "jobs": jobs })))
}

/// GET /jobs/:id => { job }
pub async fn get(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> ApiResult<Value> {
    let Path(id) = id?;

    let job = Job::get(&state.pool, id).await?;
    Ok(ApiResponse::success(json!({ "job": job })))
}

/// PATCH /jobs/:id { title?, salary?, equity? } => { job }
///
/// `companyHandle` in the body is ignored.
pub async fn update(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<Map<String, Value>>, JsonRejection>,
) -> ApiResult<Value> {
    let Path(id) = id?;
    let Json(data) = payload?;

    let job = Job::update(&state.pool, id, &data).await?;
    Ok(ApiResponse::success(json!({ "job": job })))
}

/// DELETE /jobs/:id => { deleted: id }
pub async fn remove(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> ApiResult<Value> {
    let Path(id) = id?;

    Job::remove(&state.pool, id).await?;
    Ok(ApiResponse::success(json!({ "deleted": id })))
}
