use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::invoice::{ExtractedInvoice, errors::InvoiceError, ports::InvoiceExtractor};

/// Extractor used when no API key is configured; every call fails.
pub struct UnconfiguredExtractor;

impl UnconfiguredExtractor {
  pub fn new() -> Self {
    Self
  }
}

impl Default for UnconfiguredExtractor {
  fn default() -> Self {
    Self::new()
  }
}

#[async_trait]
impl InvoiceExtractor for UnconfiguredExtractor {
  async fn extract(
    &self,
    _text: &str,
    _today: NaiveDate,
  ) -> Result<ExtractedInvoice, InvoiceError> {
    tracing::debug!("UnconfiguredExtractor: no API key, rejecting smart fill");
    Err(InvoiceError::ExtractionFailed("API key is missing".to_string()))
  }
}
