#![allow(dead_code)]

use anyhow::{Context, Result};
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use jobly_api::auth::{create_token, password::hash_password};
use once_cell::sync::Lazy;
use serde_json::Value;
use sqlx::{postgres::PgPoolOptions, Executor, PgPool};
use tokio::sync::{Mutex, MutexGuard};
use tower::ServiceExt;

const SCHEMA: &str = include_str!("../../sql/jobly-schema.sql");

// Database tests share one schema; run them one at a time
static DB_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

/// A pool that never connects until used. Enough for routes that are
/// rejected before reaching the database.
pub fn lazy_pool() -> PgPool {
    PgPoolOptions::new()
        .connect_lazy("postgresql://localhost/jobly_unreachable")
        .expect("lazy pool")
}

pub fn app() -> Router {
    jobly_api::app(lazy_pool())
}

/// A seeded test database, held exclusively for the lifetime of the guard.
pub struct TestDb {
    pub pool: PgPool,
    pub job_ids: Vec<i32>,
    _guard: MutexGuard<'static, ()>,
}

impl TestDb {
    pub fn app(&self) -> Router {
        jobly_api::app(self.pool.clone())
    }
}

/// Connects to `TEST_DATABASE_URL` and reseeds it. `None` when the variable
/// is unset so database tests skip on machines without Postgres.
pub async fn test_db() -> Result<Option<TestDb>> {
    let url = match std::env::var("TEST_DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("TEST_DATABASE_URL not set; skipping database test");
            return Ok(None);
        }
    };

    let guard = DB_LOCK.lock().await;
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await
        .context("failed to connect to TEST_DATABASE_URL")?;

    pool.execute("DROP TABLE IF EXISTS applications, users, jobs, companies CASCADE")
        .await?;
    pool.execute(SCHEMA).await?;
    let job_ids = seed(&pool).await?;

    Ok(Some(TestDb { pool, job_ids, _guard: guard }))
}

async fn seed(pool: &PgPool) -> Result<Vec<i32>> {
    pool.execute(
        "INSERT INTO companies (handle, name, num_employees, description, logo_url) VALUES
            ('c1', 'C1', 1, 'Desc1', 'http://c1.img'),
            ('c2', 'C2', 2, 'Desc2', 'http://c2.img'),
            ('c3', 'C3', 3, 'Desc3', 'http://c3.img')",
    )
    .await?;

    let job_ids: Vec<(i32,)> = sqlx::query_as(
        "INSERT INTO jobs (title, salary, equity, company_handle) VALUES
            ('J1', 1, 0.1, 'c1'),
            ('J2', 2, 0.2, 'c1'),
            ('J3', 3, 0, 'c1'),
            ('J4', NULL, NULL, 'c1')
         RETURNING id",
    )
    .fetch_all(pool)
    .await?;

    for (username, is_admin) in [("u1", false), ("u2", false), ("admin", true)] {
        sqlx::query(
            "INSERT INTO users (username, password, first_name, last_name, email, is_admin)
             VALUES ($1, $2, $3, 'L', $4, $5)",
        )
        .bind(username)
        .bind(hash_password(&format!("password-{}", username), 4)?)
        .bind(format!("F-{}", username))
        .bind(format!("{}@email.com", username))
        .bind(is_admin)
        .execute(pool)
        .await?;
    }

    let job_ids: Vec<i32> = job_ids.into_iter().map(|(id,)| id).collect();
    sqlx::query("INSERT INTO applications (username, job_id) VALUES ('u1', $1)")
        .bind(job_ids[0])
        .execute(pool)
        .await?;

    Ok(job_ids)
}

pub fn u1_token() -> String {
    create_token("u1", false).expect("token")
}

pub fn admin_token() -> String {
    create_token("admin", true).expect("token")
}

/// Sends one request through the router and returns status plus JSON body.
pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Result<(StatusCode, Value)> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))?,
        None => builder.body(Body::empty())?,
    };

    let response = app.oneshot(request).await?;
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    Ok((status, json))
}
