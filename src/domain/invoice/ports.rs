use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::Value;

use super::entities::{ExtractedInvoice, InvoiceDocument};
use super::errors::InvoiceError;

/// Single-key snapshot store for the live draft.
///
/// `load` hands back the raw stored JSON so callers can merge it over the
/// current template before decoding.
#[async_trait]
pub trait DraftRepository: Send + Sync {
  async fn load(&self) -> Result<Option<Value>, InvoiceError>;
  async fn save(&self, document: &InvoiceDocument) -> Result<(), InvoiceError>;
  async fn clear(&self) -> Result<(), InvoiceError>;
}

/// Maps free-form text to a partial invoice.
#[async_trait]
pub trait InvoiceExtractor: Send + Sync {
  async fn extract(&self, text: &str, today: NaiveDate) -> Result<ExtractedInvoice, InvoiceError>;
}
