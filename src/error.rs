use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Plan not found")]
    PlanNotFound,

    #[error("Upstream unavailable: {0}")]
    Upstream(String),

    #[error("Executor rejected transaction: {0}")]
    ExecutorRejected(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error body returned to API callers; mirrors the success envelopes.
#[derive(serde::Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl AppError {
    pub fn to_error_response(&self) -> ErrorResponse {
        ErrorResponse {
            success: false,
            error: self.to_string(),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            AppError::PlanNotFound => axum::http::StatusCode::NOT_FOUND,
            AppError::Validation(_) => axum::http::StatusCode::BAD_REQUEST,
            AppError::Upstream(_) | AppError::ExecutorRejected(_) => {
                axum::http::StatusCode::BAD_GATEWAY
            }
            _ => axum::http::StatusCode::INTERNAL_SERVER_ERROR,
        };

        let response = self.to_error_response();
        (status, axum::Json(response)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
