use std::collections::HashMap;

use axum::{
    extract::{rejection::JsonRejection, Path, Query},
    Extension, Json,
};
use serde_json::Value;

use crate::database::models::{Job, NewJob};
use crate::database::store::JobStore;
use crate::database::DbPool;
use crate::error::ApiError;
use crate::filter::JobFilter;
use crate::middleware::{ApiResponse, ApiResult};
use crate::validation::{schemas, validate_changes, validate_into};

/// Job ids arrive as path text; anything that is not an id names no job.
pub(crate) fn parse_job_id(raw: &str) -> Result<i32, ApiError> {
    raw.parse::<i32>()
        .map_err(|_| ApiError::not_found(format!("No job: {}", raw)))
}

/// POST /jobs - admin
pub async fn create(
    Extension(DbPool(pool)): Extension<DbPool>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Job> {
    let Json(body) = payload?;
    let data: NewJob = validate_into(&schemas::JOB_NEW, body)?;
    let job = JobStore::new(pool).create(&data).await?;
    Ok(ApiResponse::created("job", job))
}

/// GET /jobs?title=&minSalary=&hasEquity=
pub async fn list(
    Extension(DbPool(pool)): Extension<DbPool>,
    Query(query): Query<HashMap<String, String>>,
) -> ApiResult<Vec<Job>> {
    let filter = JobFilter::from_query(&query)?;
    let jobs = JobStore::new(pool).find_all(&filter).await?;
    Ok(ApiResponse::success("jobs", jobs))
}

/// GET /jobs/:id
pub async fn get(
    Extension(DbPool(pool)): Extension<DbPool>,
    Path(id): Path<String>,
) -> ApiResult<Job> {
    let job = JobStore::new(pool).get(parse_job_id(&id)?).await?;
    Ok(ApiResponse::success("job", job))
}

/// PATCH /jobs/:id - admin; `{title, salary, equity}`
pub async fn update(
    Extension(DbPool(pool)): Extension<DbPool>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Job> {
    let id = parse_job_id(&id)?;
    let Json(body) = payload?;
    let changes = validate_changes(&schemas::JOB_UPDATE, body)?;
    let job = JobStore::new(pool).update(id, &changes).await?;
    Ok(ApiResponse::success("job", job))
}

/// DELETE /jobs/:id - admin
pub async fn remove(
    Extension(DbPool(pool)): Extension<DbPool>,
    Path(id): Path<String>,
) -> ApiResult<String> {
    JobStore::new(pool).remove(parse_job_id(&id)?).await?;
    Ok(ApiResponse::success("deleted", id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_ids() {
        assert_eq!(parse_job_id("42").unwrap(), 42);
        let err = parse_job_id("abc").unwrap_err();
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.message(), "No job: abc");
    }
}
