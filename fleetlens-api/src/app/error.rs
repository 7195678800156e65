use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use fleetlens_core::StatsError;
use serde_json::json;

#[derive(Debug)]
pub struct ApiError {
    message: String,
    status: StatusCode,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl From<StatsError> for ApiError {
    fn from(err: StatsError) -> Self {
        // 采样失败与清单失败对当前请求都是致命的：统一 500，不返回部分结果
        ApiError::internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.message }));
        (self.status, body).into_response()
    }
}
