use std::sync::Arc;

use super::DraftResponse;
use crate::domain::invoice::{DraftService, InvoiceError};

pub struct GetDraftUseCase {
  draft_service: Arc<DraftService>,
}

impl GetDraftUseCase {
  pub fn new(draft_service: Arc<DraftService>) -> Self {
    Self { draft_service }
  }

  pub async fn execute(&self) -> Result<DraftResponse, InvoiceError> {
    let document = self.draft_service.current().await;
    Ok(DraftResponse::from_document(&document))
  }
}
