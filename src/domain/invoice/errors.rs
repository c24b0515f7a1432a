use super::value_objects::{LineItemId, ValueObjectError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InvoiceError {
  #[error("Validation error: {0}")]
  Validation(#[from] ValueObjectError),

  #[error("Invalid value for field '{field}': {reason}")]
  InvalidFieldValue { field: String, reason: String },

  #[error("Line item not found: {0}")]
  LineItemNotFound(LineItemId),

  #[error("Cannot split invoice: there are no line items")]
  NothingToSplit,

  #[error("Cannot split invoice: every line item falls on {0}")]
  SingleDate(String),

  #[error("Prompt text is empty")]
  EmptyPrompt,

  #[error("An extraction request is already in progress")]
  ExtractionInProgress,

  #[error("Extraction failed: {0}")]
  ExtractionFailed(String),

  #[error("Storage error: {0}")]
  Storage(String),

  #[error("Serialization error: {0}")]
  Serialization(#[from] serde_json::Error),

  #[error("Internal error: {0}")]
  Internal(String),
}
