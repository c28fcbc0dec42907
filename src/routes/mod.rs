pub mod f1;
pub mod nba;

use crate::settings::ErrorMode;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use log::error;
use scoregate_api::client::{ApiResult, ErrorKind, SportsApi};
use serde::Serialize;
use serde_json::{Value, json};

/// Shared, read-only state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub api: SportsApi,
    pub error_mode: ErrorMode,
}

impl AppState {
    pub fn reply(&self, route: &'static str, result: ApiResult<Value>) -> Reply {
        Reply { route, result, mode: self.error_mode }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// A handler outcome. Failures always render as `{"error": ...}`; the status
/// code depends on the configured [`ErrorMode`].
pub struct Reply {
    route: &'static str,
    result: ApiResult<Value>,
    mode: ErrorMode,
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        match self.result {
            Ok(body) => Json(body).into_response(),
            Err(e) => {
                error!("{}: {e}", self.route);
                let status = match self.mode {
                    ErrorMode::Legacy => StatusCode::OK,
                    ErrorMode::Status => match e.kind() {
                        ErrorKind::NotFound => StatusCode::NOT_FOUND,
                        ErrorKind::Upstream => StatusCode::BAD_GATEWAY,
                        ErrorKind::Schema => StatusCode::INTERNAL_SERVER_ERROR,
                    },
                };
                (status, Json(ErrorResponse { error: e.to_string() })).into_response()
            }
        }
    }
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
