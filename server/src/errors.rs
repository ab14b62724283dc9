// storefront_server/src/errors.rs

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use storefront::{ConflictKind, ShopError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error(transparent)]
  Shop(#[from] ShopError),

  #[error("Configuration Error: {0}")]
  Config(String),
}

impl AppError {
  /// Message sent to the client. Internal details stay in the logs.
  fn public_message(&self) -> String {
    match self {
      AppError::Shop(ShopError::Validation(m)) | AppError::Shop(ShopError::NotFound(m)) => m.clone(),
      AppError::Shop(ShopError::Conflict { message, .. }) => message.clone(),
      AppError::Shop(_) | AppError::Config(_) => "An internal error occurred".to_string(),
    }
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Shop(ShopError::Validation(_)) => StatusCode::UNPROCESSABLE_ENTITY,
      AppError::Shop(ShopError::NotFound(_)) => StatusCode::NOT_FOUND,
      AppError::Shop(ShopError::Conflict {
        kind: ConflictKind::Duplicate,
        ..
      }) => StatusCode::CONFLICT,
      AppError::Shop(ShopError::Conflict { .. }) => StatusCode::UNPROCESSABLE_ENTITY,
      AppError::Shop(_) | AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    if status.is_server_error() {
      tracing::error!(application_error = %self, "Responding with error");
    } else {
      tracing::warn!(application_error = %self, status = status.as_u16(), "Request rejected");
    }
    HttpResponse::build(status).json(json!({ "error": self.public_message() }))
  }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;
