//! Authentication and authorization middleware.
//!
//! `authenticate_jwt` runs on every request and never fails: a valid bearer
//! token leaves an [`AuthUser`] in the request extensions. The `ensure_*`
//! middleware then gate individual routes on that user.

use std::collections::HashMap;

use axum::{
    extract::{Path, Request},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::auth::{decode_token, Claims};
use crate::error::ApiError;

/// Authenticated user context extracted from JWT
#[derive(Clone, Debug, PartialEq)]
pub struct AuthUser {
    pub username: String,
    pub is_admin: bool,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            username: claims.username,
            is_admin: claims.is_admin,
        }
    }
}

/// Stores the token's user on the request when a valid token is present.
pub async fn authenticate_jwt(mut request: Request, next: Next) -> Response {
    if let Some(token) = extract_jwt_from_headers(request.headers()) {
        match decode_token(&token) {
            Ok(claims) => {
                request.extensions_mut().insert(AuthUser::from(claims));
            }
            Err(e) => tracing::debug!("Ignoring unusable token: {}", e),
        }
    }

    next.run(request).await
}

/// Token from the Authorization header, with any `Bearer `/`bearer ` prefix removed.
fn extract_jwt_from_headers(headers: &HeaderMap) -> Option<String> {
    let auth_str = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = auth_str
        .strip_prefix("Bearer ")
        .or_else(|| auth_str.strip_prefix("bearer "))
        .unwrap_or(auth_str)
        .trim();

    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

pub fn require_logged_in(user: Option<&AuthUser>) -> Result<&AuthUser, ApiError> {
    user.ok_or_else(|| ApiError::unauthorized("Unauthorized"))
}

pub fn require_admin(user: Option<&AuthUser>) -> Result<&AuthUser, ApiError> {
    let user = require_logged_in(user)?;
    if !user.is_admin {
        return Err(ApiError::forbidden("You must be an admin to access this."));
    }
    Ok(user)
}

pub fn require_correct_user_or_admin<'a>(
    user: Option<&'a AuthUser>,
    username: &str,
) -> Result<&'a AuthUser, ApiError> {
    let user = require_logged_in(user)?;
    if !(user.is_admin || user.username == username) {
        return Err(ApiError::forbidden("You are not authorized."));
    }
    Ok(user)
}

pub async fn ensure_logged_in(request: Request, next: Next) -> Result<Response, ApiError> {
    require_logged_in(request.extensions().get::<AuthUser>())?;
    Ok(next.run(request).await)
}

pub async fn ensure_admin(request: Request, next: Next) -> Result<Response, ApiError> {
    require_admin(request.extensions().get::<AuthUser>())?;
    Ok(next.run(request).await)
}

/// Requires the `:username` path parameter to name the caller, unless admin.
pub async fn ensure_correct_user_or_admin(
    Path(params): Path<HashMap<String, String>>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let username = params.get("username").map(String::as_str).unwrap_or_default();
    let user = require_correct_user_or_admin(request.extensions().get::<AuthUser>(), username)?;
    tracing::debug!("{} authorized for /users/{}", user.username, username);
    Ok(next.run(request).await)
}
