use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;
use werewolf_service::{ImageStoreError, ServiceError};

/// API错误，统一转换为 `{"error": "..."}` 响应
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("{0}")]
    BadRequest(String),

    #[error("Not authenticated")]
    Unauthenticated,

    #[error(transparent)]
    Multipart(#[from] MultipartError),

    #[error(transparent)]
    MultipartRejection(#[from] MultipartRejection),

    #[error(transparent)]
    Json(#[from] JsonRejection),
}

impl From<ImageStoreError> for ApiError {
    fn from(err: ImageStoreError) -> Self {
        ApiError::Service(ServiceError::Image(err))
    }
}

fn error_body(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

fn internal(err: &dyn std::fmt::Display) -> Response {
    error!("Request failed: {}", err);
    error_body(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Service(err) => service_error_response(err),
            ApiError::BadRequest(message) => error_body(StatusCode::BAD_REQUEST, message),
            ApiError::Unauthenticated => error_body(StatusCode::UNAUTHORIZED, "Not authenticated"),
            ApiError::Multipart(err) => error_body(err.status(), err.body_text()),
            ApiError::MultipartRejection(err) => error_body(err.status(), err.body_text()),
            ApiError::Json(err) => error_body(err.status(), err.body_text()),
        }
    }
}

fn service_error_response(err: ServiceError) -> Response {
    match err {
        ServiceError::NotFound(message) => error_body(StatusCode::NOT_FOUND, message),
        // 注册冲突沿用400
        ServiceError::Validation(message) | ServiceError::Conflict(message) => {
            error_body(StatusCode::BAD_REQUEST, message)
        }
        ServiceError::Unauthorized(message) => error_body(StatusCode::UNAUTHORIZED, message),
        ServiceError::Image(err) => image_error_response(err),
        ServiceError::Repository(err) => internal(&err),
        ServiceError::Internal(message) => internal(&message),
    }
}

fn image_error_response(err: ImageStoreError) -> Response {
    match err {
        ImageStoreError::DuplicateImage { role_id, ref role_name } => (
            StatusCode::CONFLICT,
            Json(json!({
                "error": err.to_string(),
                "duplicateRole": { "id": role_id, "name": role_name },
            })),
        )
            .into_response(),
        ImageStoreError::UnsupportedType(_) => error_body(StatusCode::UNSUPPORTED_MEDIA_TYPE, err.to_string()),
        ImageStoreError::FileTooLarge { .. } => error_body(StatusCode::PAYLOAD_TOO_LARGE, err.to_string()),
        ImageStoreError::EmptyFile => error_body(StatusCode::BAD_REQUEST, err.to_string()),
        ImageStoreError::Storage(_) | ImageStoreError::Repository(_) => internal(&err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_duplicate_image_names_owner() {
        let err: ApiError = ImageStoreError::DuplicateImage {
            role_id: 4,
            role_name: "Seer".to_string(),
        }
        .into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let body = body_json(response).await;
        assert_eq!(body["duplicateRole"]["id"], 4);
        assert_eq!(body["duplicateRole"]["name"], "Seer");
        assert_eq!(body["error"], "This image is already used by the role \"Seer\"");
    }

    #[tokio::test]
    async fn test_status_mapping() {
        let cases: Vec<(ApiError, StatusCode)> = vec![
            (ImageStoreError::UnsupportedType("image/gif".into()).into(), StatusCode::UNSUPPORTED_MEDIA_TYPE),
            (ImageStoreError::FileTooLarge { size: 10, limit: 5 }.into(), StatusCode::PAYLOAD_TOO_LARGE),
            (ServiceError::NotFound("Role 1 not found".into()).into(), StatusCode::NOT_FOUND),
            (ServiceError::Conflict("Email already registered".into()).into(), StatusCode::BAD_REQUEST),
            (ServiceError::Internal("boom".into()).into(), StatusCode::INTERNAL_SERVER_ERROR),
            (ApiError::Unauthenticated, StatusCode::UNAUTHORIZED),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[tokio::test]
    async fn test_internal_errors_are_not_leaked() {
        let response = ApiError::from(ServiceError::Internal("db password is hunter2".into())).into_response();
        let body = body_json(response).await;
        assert_eq!(body["error"], "Internal server error");
    }
}
