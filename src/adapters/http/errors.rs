use actix_web::{
  HttpResponse,
  error::ResponseError,
  http::{StatusCode, header::ContentType},
};
use serde::Serialize;
use std::fmt;

use crate::domain::invoice::InvoiceError;
use crate::domain::invoice::services::EXTRACTION_FAILED_MESSAGE;

use super::dtos::ErrorResponse;

/// API error type that maps domain errors to HTTP responses
#[derive(Debug, Serialize)]
#[serde(tag = "type", content = "details")]
pub enum ApiError {
  /// Validation error (400 Bad Request)
  Validation(String),

  /// Unknown resource (404 Not Found)
  NotFound(String),

  /// Operation already running (409 Conflict)
  Conflict(String),

  /// Split preconditions not met (422 Unprocessable Entity)
  CannotSplit(String),

  /// Language model call failed (502 Bad Gateway)
  Extraction(String),

  /// Internal server error (500 Internal Server Error)
  Internal(String),
}

impl fmt::Display for ApiError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ApiError::Validation(msg) => write!(f, "Validation error: {}", msg),
      ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
      ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
      ApiError::CannotSplit(msg) => write!(f, "Cannot split: {}", msg),
      ApiError::Extraction(msg) => write!(f, "Extraction error: {}", msg),
      ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
    }
  }
}

impl ResponseError for ApiError {
  fn status_code(&self) -> StatusCode {
    match self {
      ApiError::Validation(_) => StatusCode::BAD_REQUEST,
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::Conflict(_) => StatusCode::CONFLICT,
      ApiError::CannotSplit(_) => StatusCode::UNPROCESSABLE_ENTITY,
      ApiError::Extraction(_) => StatusCode::BAD_GATEWAY,
      ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    let (error_type, message) = match self {
      ApiError::Validation(msg) => ("validation_error", msg.clone()),
      ApiError::NotFound(msg) => ("not_found", msg.clone()),
      ApiError::Conflict(msg) => ("extraction_in_progress", msg.clone()),
      ApiError::CannotSplit(msg) => ("cannot_split", msg.clone()),
      ApiError::Extraction(reason) => {
        // Reason goes to the log only
        tracing::error!("Extraction error: {}", reason);
        ("extraction_failed", EXTRACTION_FAILED_MESSAGE.to_string())
      }
      ApiError::Internal(msg) => {
        tracing::error!("Internal error: {}", msg);
        (
          "internal_error",
          "An internal server error occurred".to_string(),
        )
      }
    };

    let error_response = ErrorResponse {
      error: error_type.to_string(),
      message,
    };

    HttpResponse::build(status)
      .content_type(ContentType::json())
      .json(error_response)
  }
}

/// Convert InvoiceError to ApiError
impl From<InvoiceError> for ApiError {
  fn from(error: InvoiceError) -> Self {
    match error {
      InvoiceError::Validation(e) => ApiError::Validation(e.to_string()),
      e @ InvoiceError::InvalidFieldValue { .. } => ApiError::Validation(e.to_string()),
      e @ InvoiceError::EmptyPrompt => ApiError::Validation(e.to_string()),
      e @ InvoiceError::LineItemNotFound(_) => ApiError::NotFound(e.to_string()),
      e @ InvoiceError::NothingToSplit => ApiError::CannotSplit(e.to_string()),
      e @ InvoiceError::SingleDate(_) => ApiError::CannotSplit(e.to_string()),
      e @ InvoiceError::ExtractionInProgress => ApiError::Conflict(e.to_string()),
      InvoiceError::ExtractionFailed(reason) => ApiError::Extraction(reason),
      e @ InvoiceError::Storage(_) => ApiError::Internal(e.to_string()),
      e @ InvoiceError::Serialization(_) => ApiError::Internal(e.to_string()),
      e @ InvoiceError::Internal(_) => ApiError::Internal(e.to_string()),
    }
  }
}

/// Convert validation errors from validator crate
impl From<validator::ValidationErrors> for ApiError {
  fn from(errors: validator::ValidationErrors) -> Self {
    let messages: Vec<String> = errors
      .field_errors()
      .iter()
      .flat_map(|(field, errors)| {
        errors
          .iter()
          .map(|error| {
            error
              .message
              .as_ref()
              .map(|m| m.to_string())
              .unwrap_or_else(|| format!("Invalid field: {}", field))
          })
          .collect::<Vec<_>>()
      })
      .collect();

    ApiError::Validation(messages.join(", "))
  }
}
