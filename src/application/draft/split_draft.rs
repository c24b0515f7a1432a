use serde::Serialize;
use std::sync::Arc;

use super::DraftResponse;
use crate::domain::invoice::{DraftService, InvoiceError};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitDraftResponse {
  /// The derived invoice shown first.
  pub active_index: usize,
  pub invoices: Vec<DraftResponse>,
}

pub struct SplitDraftUseCase {
  draft_service: Arc<DraftService>,
}

impl SplitDraftUseCase {
  pub fn new(draft_service: Arc<DraftService>) -> Self {
    Self { draft_service }
  }

  pub async fn execute(&self) -> Result<SplitDraftResponse, InvoiceError> {
    let documents = self.draft_service.split().await?;
    tracing::info!(count = documents.len(), "Draft split by item date");

    Ok(SplitDraftResponse {
      active_index: 0,
      invoices: documents.iter().map(DraftResponse::from_document).collect(),
    })
  }
}
