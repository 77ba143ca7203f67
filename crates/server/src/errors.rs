use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use bookrag::ChatError;
use serde_json::json;
use tracing::error;

/// A custom error type for the server application.
///
/// This enum encapsulates the different kinds of errors that can occur within
/// the server, allowing them to be converted into appropriate HTTP responses.
pub enum AppError {
    /// Errors originating from the `bookrag` library.
    Chat(ChatError),
    /// Generic internal server errors.
    Internal(anyhow::Error),
}

impl From<ChatError> for AppError {
    fn from(err: ChatError) -> Self {
        AppError::Chat(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status_code, error_message) = match self {
            AppError::Chat(err) => {
                error!("ChatError: {:?}", err);
                match err {
                    ChatError::AiRequest(e) => (
                        StatusCode::BAD_GATEWAY,
                        format!("Request to AI provider failed: {e}"),
                    ),
                    ChatError::AiDeserialization(e) => (
                        StatusCode::BAD_GATEWAY,
                        format!("Failed to deserialize AI provider response: {e}"),
                    ),
                    ChatError::AiApi(e) => {
                        (StatusCode::BAD_GATEWAY, format!("AI provider error: {e}"))
                    }
                    ChatError::StoreRequest(e) => (
                        StatusCode::BAD_GATEWAY,
                        format!("Request to vector store failed: {e}"),
                    ),
                    ChatError::StoreDeserialization(e) => (
                        StatusCode::BAD_GATEWAY,
                        format!("Failed to deserialize vector store response: {e}"),
                    ),
                    ChatError::StoreApi(e) => {
                        (StatusCode::BAD_GATEWAY, format!("Vector store error: {e}"))
                    }
                    ChatError::JsonSerialization(e) => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        format!("Failed to serialize result: {e}"),
                    ),
                    ChatError::ReqwestClientBuild(e) => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        format!("Failed to build HTTP client: {e}"),
                    ),
                    ChatError::MissingAiProvider | ChatError::MissingVectorStore => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Server is not configured correctly.".to_string(),
                    ),
                }
            }
            AppError::Internal(err) => {
                error!("Internal server error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred.".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status_code, body).into_response()
    }
}
