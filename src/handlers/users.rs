use axum::{
    extract::{rejection::JsonRejection, Path},
    Extension, Json,
};
use serde::Serialize;
use serde_json::Value;

use crate::auth::create_token;
use crate::database::models::{NewUser, User, UserDetail};
use crate::database::store::UserStore;
use crate::database::DbPool;
use crate::middleware::{ApiResponse, ApiResult};
use crate::validation::{schemas, validate_changes, validate_into};

use super::jobs::parse_job_id;
use super::password_work_factor;

#[derive(Debug, Serialize)]
pub struct UserWithToken {
    pub user: User,
    pub token: String,
}

fn store(pool: sqlx::PgPool) -> UserStore {
    UserStore::new(pool, password_work_factor())
}

/// POST /users - admin; may create admins. Returns the user and a token for them.
pub async fn create(
    Extension(DbPool(pool)): Extension<DbPool>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<UserWithToken> {
    let Json(body) = payload?;
    let new_user: NewUser = validate_into(&schemas::USER_NEW, body)?;
    let user = store(pool).register(&new_user).await?;
    let token = create_token(&user.username, user.is_admin)?;
    Ok(ApiResponse::raw(UserWithToken { user, token }).with_status(axum::http::StatusCode::CREATED))
}

/// GET /users - admin
pub async fn list(Extension(DbPool(pool)): Extension<DbPool>) -> ApiResult<Vec<UserDetail>> {
    let users = store(pool).find_all().await?;
    Ok(ApiResponse::success("users", users))
}

/// GET /users/:username - self or admin
pub async fn get(
    Extension(DbPool(pool)): Extension<DbPool>,
    Path(username): Path<String>,
) -> ApiResult<UserDetail> {
    let user = store(pool).get(&username).await?;
    Ok(ApiResponse::success("user", user))
}

/// PATCH /users/:username - self or admin; `{firstName, lastName, password, email}`
pub async fn update(
    Extension(DbPool(pool)): Extension<DbPool>,
    Path(username): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<User> {
    let Json(body) = payload?;
    let changes = validate_changes(&schemas::USER_UPDATE, body)?;
    let user = store(pool).update(&username, &changes).await?;
    Ok(ApiResponse::success("user", user))
}

/// DELETE /users/:username - self or admin
pub async fn remove(
    Extension(DbPool(pool)): Extension<DbPool>,
    Path(username): Path<String>,
) -> ApiResult<String> {
    store(pool).remove(&username).await?;
    Ok(ApiResponse::success("deleted", username))
}

/// POST /users/:username/jobs/:id - self or admin
pub async fn apply(
    Extension(DbPool(pool)): Extension<DbPool>,
    Path((username, id)): Path<(String, String)>,
) -> ApiResult<String> {
    let job_id = parse_job_id(&id)?;
    store(pool).apply_for_job(&username, job_id).await?;
    Ok(ApiResponse::created("applied", id))
}
