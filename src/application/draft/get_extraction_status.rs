use std::sync::Arc;

use crate::domain::invoice::{DraftService, ExtractionStatus};

pub struct GetExtractionStatusUseCase {
  draft_service: Arc<DraftService>,
}

impl GetExtractionStatusUseCase {
  pub fn new(draft_service: Arc<DraftService>) -> Self {
    Self { draft_service }
  }

  pub async fn execute(&self) -> ExtractionStatus {
    self.draft_service.extraction_status().await
  }
}
