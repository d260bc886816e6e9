use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::{json, Value};

/// Successful response body. Keyed responses wrap the data as
/// `{"<key>": data}`; unkeyed ones serialize `data` as is.
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub key: Option<&'static str>,
    pub data: T,
    pub status_code: Option<StatusCode>,
}

impl<T: Serialize> ApiResponse<T> {
    /// `{"<key>": data}` with 200 OK
    pub fn success(key: &'static str, data: T) -> Self {
        Self {
            key: Some(key),
            data,
            status_code: None,
        }
    }

    /// `{"<key>": data}` with 201 Created
    pub fn created(key: &'static str, data: T) -> Self {
        Self {
            key: Some(key),
            data,
            status_code: Some(StatusCode::CREATED),
        }
    }

    /// `data` as the whole body
    pub fn raw(data: T) -> Self {
        Self {
            key: None,
            data,
            status_code: None,
        }
    }

    pub fn with_status(mut self, status_code: StatusCode) -> Self {
        self.status_code = Some(status_code);
        self
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = self.status_code.unwrap_or(StatusCode::OK);

        let data_value = match serde_json::to_value(&self.data) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!("Failed to serialize response data: {}", e);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "error": {
                            "message": "Failed to serialize response data",
                            "status": 500
                        }
                    })),
                )
                    .into_response();
            }
        };

        let body = match self.key {
            Some(key) => {
                let mut map = serde_json::Map::new();
                map.insert(key.to_string(), data_value);
                Value::Object(map)
            }
            None => data_value,
        };

        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<ApiResponse<T>, crate::error::ApiError>;
