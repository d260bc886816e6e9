mod common;

use anyhow::Result;
use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{admin_token, app, send, u1_token};

#[tokio::test]
async fn unknown_route_uses_error_format() -> Result<()> {
    let (status, body) = send(app(), Method::GET, "/no-such-page", None, None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": { "message": "Not Found", "status": 404 } }));
    Ok(())
}

#[tokio::test]
async fn admin_routes_require_login() -> Result<()> {
    for (method, uri) in [
        (Method::POST, "/companies"),
        (Method::PATCH, "/companies/c1"),
        (Method::DELETE, "/companies/c1"),
        (Method::POST, "/jobs"),
        (Method::PATCH, "/jobs/1"),
        (Method::DELETE, "/jobs/1"),
        (Method::POST, "/users"),
        (Method::GET, "/users"),
    ] {
        let (status, body) = send(app(), method.clone(), uri, None, None).await?;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{} {}", method, uri);
        assert_eq!(body["error"]["message"], "Unauthorized");
    }
    Ok(())
}

#[tokio::test]
async fn admin_routes_forbid_regular_users() -> Result<()> {
    let token = u1_token();
    let (status, body) = send(app(), Method::DELETE, "/companies/c1", Some(&token), None).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["message"], "You must be an admin to access this.");

    let (status, _) = send(app(), Method::GET, "/users", Some(&token), None).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn bad_tokens_are_anonymous() -> Result<()> {
    let (status, _) = send(app(), Method::DELETE, "/jobs/1", Some("not-a-jwt"), None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn user_routes_require_self_or_admin() -> Result<()> {
    let (status, _) = send(app(), Method::GET, "/users/u1", None, None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let token = u1_token();
    for (method, uri) in [
        (Method::GET, "/users/u2"),
        (Method::PATCH, "/users/u2"),
        (Method::DELETE, "/users/u2"),
        (Method::POST, "/users/u2/jobs/1"),
    ] {
        let (status, body) = send(app(), method.clone(), uri, Some(&token), None).await?;
        assert_eq!(status, StatusCode::FORBIDDEN, "{} {}", method, uri);
        assert_eq!(body["error"]["message"], "You are not authorized.");
    }
    Ok(())
}

#[tokio::test]
async fn search_filters_are_checked_before_the_database() -> Result<()> {
    let (status, body) = send(app(), Method::GET, "/companies?color=red", None, None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "Invalid field: color");

    let (status, body) =
        send(app(), Method::GET, "/companies?minEmployees=10&maxEmployees=1", None, None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "minEmployees cannot be greater than maxEmployees");

    let (status, _) = send(app(), Method::GET, "/jobs?salary=1", None, None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn payloads_are_validated_before_the_database() -> Result<()> {
    let token = admin_token();

    let (status, body) = send(
        app(),
        Method::POST,
        "/companies",
        Some(&token),
        Some(json!({ "handle": "new", "numEmployees": "ten" })),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]["message"].is_array());

    let (status, body) =
        send(app(), Method::PATCH, "/companies/c1", Some(&token), Some(json!({}))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "No data");

    let (status, _) = send(
        app(),
        Method::PATCH,
        "/jobs/1",
        Some(&token),
        Some(json!({ "companyHandle": "c2" })),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        app(),
        Method::POST,
        "/auth/register",
        None,
        Some(json!({ "username": "new" })),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn non_numeric_job_id_is_not_found() -> Result<()> {
    let (status, body) = send(app(), Method::GET, "/jobs/abc", None, None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], "No job: abc");
    Ok(())
}

#[tokio::test]
async fn integer_fields_are_bounded_before_the_database() -> Result<()> {
    let (status, body) = send(
        app(),
        Method::PATCH,
        "/jobs/1",
        Some(&admin_token()),
        Some(json!({ "salary": 3000000000u64 })),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"]["message"],
        json!(["instance.salary must be less than or equal to 2147483647"])
    );
    Ok(())
}
