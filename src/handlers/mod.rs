// handlers/mod.rs - HTTP route handlers
//
// Public: /health, /auth/*, GET /companies*, GET /jobs*
// Admin:  POST/PATCH/DELETE on companies and jobs, POST/GET /users
// Self or admin: /users/:username[/jobs/:id]
//
// Authorization is applied as route middleware in app.rs; handlers assume
// the caller already passed it.

pub mod auth;
pub mod companies;
pub mod health;
pub mod jobs;
pub mod users;

pub use health::health;

use crate::config;

pub(crate) fn password_work_factor() -> u32 {
    config::config().security.password_work_factor
}
