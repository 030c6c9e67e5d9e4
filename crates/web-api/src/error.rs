//! HTTP mapping for API failures.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use hk_ipo_core::FetchError;
use serde_json::json;
use thiserror::Error;

pub const UNAVAILABLE_DETAIL: &str = "AkShare 数据源未配置，请先启动 AKTools 服务并配置地址。";

#[derive(Debug, Error)]
pub enum ApiError {
    /// Bad query parameters.
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

impl ApiError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Fetch(FetchError::UpstreamUnavailable) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Fetch(FetchError::UpstreamFetch(_)) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Client-facing message placed in the `detail` field.
    #[must_use]
    pub fn detail(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Fetch(FetchError::UpstreamUnavailable) => UNAVAILABLE_DETAIL.to_string(),
            Self::Fetch(FetchError::UpstreamFetch(message)) => {
                format!("AkShare 数据获取失败: {message}")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), "request failed: {}", self);
        }
        (status, Json(json!({ "detail": self.detail() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::Validation("bad".to_string()).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::from(FetchError::UpstreamUnavailable).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::from(FetchError::fetch("timeout")).status(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_fetch_detail_includes_upstream_message() {
        let err = ApiError::from(FetchError::fetch("HTTP error: connection refused"));
        assert_eq!(err.detail(), "AkShare 数据获取失败: HTTP error: connection refused");
        assert_eq!(
            ApiError::from(FetchError::UpstreamUnavailable).detail(),
            UNAVAILABLE_DETAIL
        );
    }
}
