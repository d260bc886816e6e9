use axum::{extract::rejection::JsonRejection, Extension, Json};
use serde_json::Value;

use crate::auth::create_token;
use crate::database::models::{Credentials, NewUser};
use crate::database::store::UserStore;
use crate::database::DbPool;
use crate::middleware::{ApiResponse, ApiResult};
use crate::validation::{schemas, validate_into};

use super::password_work_factor;

/// POST /auth/token - `{username, password}` => `{token}`
pub async fn token(
    Extension(DbPool(pool)): Extension<DbPool>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<String> {
    let Json(body) = payload?;
    let credentials: Credentials = validate_into(&schemas::USER_AUTH, body)?;

    let user = UserStore::new(pool, password_work_factor())
        .authenticate(&credentials.username, &credentials.password)
        .await?;
    let token = create_token(&user.username, user.is_admin)?;

    Ok(ApiResponse::success("token", token))
}

/// POST /auth/register - `{username, password, firstName, lastName, email}` => `{token}`
///
/// Self-registered users are never admins.
pub async fn register(
    Extension(DbPool(pool)): Extension<DbPool>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<String> {
    let Json(body) = payload?;
    let new_user: NewUser = validate_into(&schemas::USER_REGISTER, body)?;

    let user = UserStore::new(pool, password_work_factor())
        .register(&new_user)
        .await?;
    let token = create_token(&user.username, user.is_admin)?;

    Ok(ApiResponse::created("token", token))
}
