use std::sync::Arc;

use super::DraftResponse;
use crate::domain::invoice::{DraftService, InvoiceError};

pub struct ResetDraftUseCase {
  draft_service: Arc<DraftService>,
}

impl ResetDraftUseCase {
  pub fn new(draft_service: Arc<DraftService>) -> Self {
    Self { draft_service }
  }

  pub async fn execute(&self) -> Result<DraftResponse, InvoiceError> {
    let document = self.draft_service.reset().await?;
    tracing::info!("Draft reset to template");
    Ok(DraftResponse::from_document(&document))
  }
}
