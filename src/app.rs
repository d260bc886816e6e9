use axum::{
    middleware::from_fn,
    routing::{get, patch, post},
    Extension, Router,
};
use sqlx::PgPool;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::database::DbPool;
use crate::error::ApiError;
use crate::handlers;
use crate::middleware::{authenticate_jwt, ensure_admin, ensure_correct_user_or_admin};

/// The full application router. Every request passes through
/// `authenticate_jwt`; per-route guards decide what an identity may do.
pub fn app(pool: PgPool) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .merge(auth_routes())
        .merge(company_routes())
        .merge(job_routes())
        .merge(user_routes())
        .fallback(not_found)
        // Global middleware
        .layer(from_fn(authenticate_jwt))
        .layer(Extension(DbPool(pool)))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn auth_routes() -> Router {
    use handlers::auth;

    Router::new()
        .route("/auth/token", post(auth::token))
        .route("/auth/register", post(auth::register))
}

fn company_routes() -> Router {
    use handlers::companies;

    Router::new()
        .route(
            "/companies",
            get(companies::list).merge(post(companies::create).route_layer(from_fn(ensure_admin))),
        )
        .route(
            "/companies/:handle",
            get(companies::get).merge(
                patch(companies::update)
                    .delete(companies::remove)
                    .route_layer(from_fn(ensure_admin)),
            ),
        )
}

fn job_routes() -> Router {
    use handlers::jobs;

    Router::new()
        .route(
            "/jobs",
            get(jobs::list).merge(post(jobs::create).route_layer(from_fn(ensure_admin))),
        )
        .route(
            "/jobs/:id",
            get(jobs::get).merge(
                patch(jobs::update)
                    .delete(jobs::remove)
                    .route_layer(from_fn(ensure_admin)),
            ),
        )
}

fn user_routes() -> Router {
    use handlers::users;

    let admin = Router::new()
        .route("/users", post(users::create).get(users::list))
        .route_layer(from_fn(ensure_admin));

    let self_or_admin = Router::new()
        .route(
            "/users/:username",
            get(users::get).patch(users::update).delete(users::remove),
        )
        .route("/users/:username/jobs/:id", post(users::apply))
        .route_layer(from_fn(ensure_correct_user_or_admin));

    admin.merge(self_or_admin)
}

async fn not_found() -> ApiError {
    ApiError::not_found("Not Found")
}
