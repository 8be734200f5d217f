use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use services::services::{comparison::AddRejection, search::SearchError};
use utils::response::ApiResponse;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    Rejected(AddRejection),
    #[error("the anchor product cannot be removed")]
    SlotPinned,
    #[error("product kind does not match the comparison")]
    KindMismatch,
    #[error(transparent)]
    Search(#[from] SearchError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Rejected(_) | ApiError::SlotPinned => StatusCode::CONFLICT,
            ApiError::KindMismatch => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Search(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if let ApiError::Database(e) = &self {
            tracing::error!("database error: {}", e);
        }

        (status, Json(ApiResponse::<()>::error(self.to_string()))).into_response()
    }
}
