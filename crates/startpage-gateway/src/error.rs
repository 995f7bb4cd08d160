use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use startpage_core::DashboardError;

use crate::model::ErrorResponse;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug)]
pub enum AppError {
    /// Failure reported by the dashboard service.
    Dashboard(DashboardError),
    /// The request body or path could not be decoded.
    BadRequest(String),
    /// The request token is missing or wrong.
    Forbidden,
}

impl From<DashboardError> for AppError {
    fn from(value: DashboardError) -> Self {
        Self::Dashboard(value)
    }
}

impl From<JsonRejection> for AppError {
    fn from(value: JsonRejection) -> Self {
        Self::BadRequest(value.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(value: PathRejection) -> Self {
        Self::BadRequest(value.body_text())
    }
}

impl AppError {
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            AppError::Dashboard(err @ DashboardError::Validation(_))
            | AppError::Dashboard(err @ DashboardError::Conflict(_)) => {
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            AppError::Dashboard(err @ DashboardError::NotFound(_)) => {
                (StatusCode::NOT_FOUND, err.to_string())
            }
            // details were logged by the service; the client only needs to reload
            AppError::Dashboard(DashboardError::Storage(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "storage failure, please reload".to_string(),
            ),
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message.clone()),
            AppError::Forbidden => (
                StatusCode::FORBIDDEN,
                "missing or invalid request token".to_string(),
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = self.status_and_message();
        (
            status,
            Json(ErrorResponse {
                success: false,
                error,
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use startpage_core::{CardId, ReorderRejection};

    #[test]
    fn maps_taxonomy_to_status() {
        let cases = [
            (
                AppError::from(DashboardError::Validation("title is required".into())),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::from(DashboardError::Conflict(ReorderRejection::Empty)),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::from(DashboardError::NotFound(CardId::new(3))),
                StatusCode::NOT_FOUND,
            ),
            (
                AppError::from(DashboardError::Storage("disk I/O error".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (AppError::Forbidden, StatusCode::FORBIDDEN),
        ];

        for (error, expected) in cases {
            assert_eq!(error.status_and_message().0, expected);
        }
    }

    #[test]
    fn storage_details_are_not_leaked() {
        let (_, message) =
            AppError::from(DashboardError::Storage("/var/lib/startpage.db".into()))
                .status_and_message();
        assert!(!message.contains("/var/lib"));
    }
}
