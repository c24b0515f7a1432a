use serde::Deserialize;
use std::sync::Arc;

use super::DraftResponse;
use crate::domain::invoice::{DraftService, InvoiceDocument, InvoiceError};

#[derive(Debug, Deserialize)]
pub struct ReplaceDraftCommand {
  pub invoice: InvoiceDocument,
}

pub struct ReplaceDraftUseCase {
  draft_service: Arc<DraftService>,
}

impl ReplaceDraftUseCase {
  pub fn new(draft_service: Arc<DraftService>) -> Self {
    Self { draft_service }
  }

  pub async fn execute(&self, command: ReplaceDraftCommand) -> Result<DraftResponse, InvoiceError> {
    let document = self.draft_service.replace(command.invoice).await?;
    tracing::info!(invoice_number = %document.invoice_number, "Draft replaced");
    Ok(DraftResponse::from_document(&document))
  }
}
