use std::collections::HashMap;

use axum::{
    extract::{rejection::JsonRejection, Path, Query},
    Extension, Json,
};
use serde_json::Value;

use crate::database::models::{Company, NewCompany};
use crate::database::store::CompanyStore;
use crate::database::DbPool;
use crate::filter::CompanyFilter;
use crate::middleware::{ApiResponse, ApiResult};
use crate::validation::{schemas, validate_changes, validate_into};

/// POST /companies - admin
pub async fn create(
    Extension(DbPool(pool)): Extension<DbPool>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Company> {
    let Json(body) = payload?;
    let data: NewCompany = validate_into(&schemas::COMPANY_NEW, body)?;
    let company = CompanyStore::new(pool).create(&data).await?;
    Ok(ApiResponse::created("company", company))
}

/// GET /companies?name=&minEmployees=&maxEmployees=
pub async fn list(
    Extension(DbPool(pool)): Extension<DbPool>,
    Query(query): Query<HashMap<String, String>>,
) -> ApiResult<Vec<Company>> {
    let filter = CompanyFilter::from_query(&query)?;
    let companies = CompanyStore::new(pool).find_all(&filter).await?;
    Ok(ApiResponse::success("companies", companies))
}

/// GET /companies/:handle
pub async fn get(
    Extension(DbPool(pool)): Extension<DbPool>,
    Path(handle): Path<String>,
) -> ApiResult<Company> {
    let company = CompanyStore::new(pool).get(&handle).await?;
    Ok(ApiResponse::success("company", company))
}

/// PATCH /companies/:handle - admin; `{name, description, numEmployees, logoUrl}`
pub async fn update(
    Extension(DbPool(pool)): Extension<DbPool>,
    Path(handle): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Company> {
    let Json(body) = payload?;
    let changes = validate_changes(&schemas::COMPANY_UPDATE, body)?;
    let company = CompanyStore::new(pool).update(&handle, &changes).await?;
    Ok(ApiResponse::success("company", company))
}

/// DELETE /companies/:handle - admin
pub async fn remove(
    Extension(DbPool(pool)): Extension<DbPool>,
    Path(handle): Path<String>,
) -> ApiResult<String> {
    CompanyStore::new(pool).remove(&handle).await?;
    Ok(ApiResponse::success("deleted", handle))
}
