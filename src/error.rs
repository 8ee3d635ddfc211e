use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("{0}")]
    Validation(String),

    #[error("External API error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Supplier HTTP {status}: {body}")]
    Upstream { status: u16, body: String },
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = match self {
            ProxyError::Validation(_) => StatusCode::BAD_REQUEST,
            ProxyError::Network(_) | ProxyError::Upstream { .. } => StatusCode::BAD_GATEWAY,
        };

        let body = Json(json!({ "detail": self.to_string() }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ProxyError>;
