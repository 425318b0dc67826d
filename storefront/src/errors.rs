// storefront/src/errors.rs

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

use crate::store::StoreError;
use cartflow::FlowError;

#[derive(Debug, Error)]
pub enum AppError {
  /// Missing or malformed request fields.
  #[error("Validation Error: {0}")]
  Validation(String),

  #[error("Resource Not Found: {0}")]
  NotFound(String),

  #[error("Store Error: {0}")]
  Store(StoreError),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Workflow Error: {source}")]
  Workflow {
    #[from]
    source: FlowError,
  },

  #[error("Internal Server Error: {0}")]
  Internal(String),

  // A pipeline stopped gracefully where the handler needed it to complete.
  #[error("Pipeline execution was halted by a handler.")]
  PipelineHaltedByHandler,
}

impl From<StoreError> for AppError {
  fn from(err: StoreError) -> Self {
    match err {
      StoreError::UnknownProduct(id) => AppError::NotFound(format!("Product {} not found", id)),
      StoreError::QuantityOverflow { .. } => AppError::Validation(err.to_string()),
      other => AppError::Store(other),
    }
  }
}

impl From<anyhow::Error> for AppError {
  fn from(err: anyhow::Error) -> Self {
    match err.downcast::<StoreError>() {
      Ok(store_err) => store_err.into(),
      Err(err) => AppError::Internal(err.to_string()),
    }
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Validation(_) => StatusCode::BAD_REQUEST,
      AppError::NotFound(_) => StatusCode::NOT_FOUND,
      AppError::PipelineHaltedByHandler => StatusCode::CONFLICT,
      AppError::Store(_) | AppError::Config(_) | AppError::Workflow { .. } | AppError::Internal(_) => {
        StatusCode::INTERNAL_SERVER_ERROR
      }
    }
  }

  fn error_response(&self) -> HttpResponse {
    // Client errors carry their own message; server-side detail stays in the log.
    let message = match self {
      AppError::Validation(m) | AppError::NotFound(m) => {
        tracing::warn!(application_error = %self, "Responding with client error");
        m.clone()
      }
      AppError::PipelineHaltedByHandler => {
        tracing::warn!(application_error = %self, "Responding with conflict");
        "Process halted by business logic.".to_string()
      }
      AppError::Store(_) => {
        tracing::error!(application_error = %self, "Responding with error");
        "Store operation failed".to_string()
      }
      AppError::Workflow { source } => {
        tracing::error!(workflow_error = ?source, "Workflow error details");
        "Workflow processing error".to_string()
      }
      AppError::Config(_) | AppError::Internal(_) => {
        tracing::error!(application_error = %self, "Responding with error");
        "An internal error occurred".to_string()
      }
    };
    HttpResponse::build(self.status_code()).json(json!({ "error": message }))
  }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;
