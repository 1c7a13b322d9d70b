use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use planbook_core::error::PlanbookError;

// ---------------------------------------------------------------------------
// Internal sentinel for explicit 400 Bad Request errors
// ---------------------------------------------------------------------------

/// Private sentinel error type used to carry an explicit HTTP 400 through
/// the `anyhow::Error` chain without touching the `PlanbookError` enum.
#[derive(Debug)]
struct BadRequestError(String);

impl std::fmt::Display for BadRequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for BadRequestError {}

// ---------------------------------------------------------------------------
// AppError — unified error type for HTTP responses
// ---------------------------------------------------------------------------

/// Unified error type for HTTP responses.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    /// Construct a 400 Bad Request error with the given message.
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self(BadRequestError(msg.into()).into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Some(b) = self.0.downcast_ref::<BadRequestError>() {
            let body = serde_json::json!({ "error": b.0.clone() });
            return (StatusCode::BAD_REQUEST, axum::Json(body)).into_response();
        }

        let status = if let Some(e) = self.0.downcast_ref::<PlanbookError>() {
            match e {
                PlanbookError::NotInitialized => StatusCode::BAD_REQUEST,
                PlanbookError::DistrictNotFound(_)
                | PlanbookError::GoalNotFound(_)
                | PlanbookError::MetricNotFound(_) => StatusCode::NOT_FOUND,
                PlanbookError::DistrictExists(_)
                | PlanbookError::DistrictNotEmpty(_)
                | PlanbookError::DuplicateGoalNumber { .. } => StatusCode::CONFLICT,
                PlanbookError::InvalidSlug(_)
                | PlanbookError::InvalidLevel(_)
                | PlanbookError::InvalidMetricType(_)
                | PlanbookError::InvalidParent(_)
                | PlanbookError::MalformedNumber(_)
                | PlanbookError::InvalidMetricOrder(_) => StatusCode::BAD_REQUEST,
                PlanbookError::Io(_) | PlanbookError::Yaml(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            }
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn district_not_found_maps_to_404() {
        let err = AppError(PlanbookError::DistrictNotFound("springfield".into()).into());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn goal_not_found_maps_to_404() {
        let err = AppError(PlanbookError::GoalNotFound("abc".into()).into());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn metric_not_found_maps_to_404() {
        let err = AppError(PlanbookError::MetricNotFound("abc".into()).into());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn district_exists_maps_to_409() {
        let err = AppError(PlanbookError::DistrictExists("springfield".into()).into());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn district_not_empty_maps_to_409() {
        let err = AppError(PlanbookError::DistrictNotEmpty("springfield".into()).into());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn duplicate_goal_number_maps_to_409() {
        let err = AppError(
            PlanbookError::DuplicateGoalNumber {
                number: "1.2".into(),
                scope: "goal '1'".into(),
            }
            .into(),
        );
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn invalid_slug_maps_to_400() {
        let err = AppError(PlanbookError::InvalidSlug("BAD SLUG".into()).into());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn malformed_number_maps_to_400() {
        let err = AppError(PlanbookError::MalformedNumber("1.x".into()).into());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn not_initialized_maps_to_400() {
        let err = AppError(PlanbookError::NotInitialized.into());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn io_error_maps_to_500() {
        let io_err = std::io::Error::other("disk full");
        let err = AppError(PlanbookError::Io(io_err).into());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn non_planbook_error_maps_to_500() {
        let err = AppError(anyhow::anyhow!("something unexpected"));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn bad_request_constructor_maps_to_400() {
        let err = AppError::bad_request("batch entry missing goal_id");
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn response_body_is_json_error_object() {
        let err = AppError(PlanbookError::DistrictNotFound("springfield".into()).into());
        let response = err.into_response();
        let ct = response
            .headers()
            .get(axum::http::header::CONTENT_TYPE)
            .expect("should have content-type");
        assert!(
            ct.to_str().unwrap().contains("application/json"),
            "expected JSON content type, got {:?}",
            ct
        );
    }
}
