pub mod auth;
pub mod response;

pub use auth::{
    authenticate_jwt, ensure_admin, ensure_correct_user_or_admin, ensure_logged_in, AuthUser,
};
pub use response::{ApiResponse, ApiResult};
