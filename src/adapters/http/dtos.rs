use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to replace one top-level draft field
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateFieldRequest {
  /// New value in the field's JSON shape; `null` clears a display flag
  #[serde(default)]
  pub value: serde_json::Value,
}

/// Request body for adding a line item; every field is optional
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LineItemRequest {
  pub date: Option<String>,

  #[validate(length(max = 300, message = "Description must be at most 300 characters"))]
  pub description: Option<String>,

  pub quantity: Option<Decimal>,

  #[validate(length(max = 32, message = "Unit must be at most 32 characters"))]
  pub unit: Option<String>,

  pub rate: Option<Decimal>,
}

/// Free-form text for smart fill
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SmartFillRequest {
  #[validate(length(
    min = 1,
    max = 20000,
    message = "Text must be between 1 and 20000 characters"
  ))]
  pub text: String,
}

/// Liveness check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
  pub status: &'static str,
}

/// Standard error response
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
  /// Error type/code
  pub error: String,

  /// Human-readable error message
  pub message: String,
}
