use serde::Deserialize;
use std::sync::Arc;

use super::DraftResponse;
use crate::domain::invoice::{DraftService, InvoiceError};

#[derive(Debug, Deserialize)]
pub struct SmartFillCommand {
  pub text: String,
}

pub struct SmartFillUseCase {
  draft_service: Arc<DraftService>,
}

impl SmartFillUseCase {
  pub fn new(draft_service: Arc<DraftService>) -> Self {
    Self { draft_service }
  }

  pub async fn execute(&self, command: SmartFillCommand) -> Result<DraftResponse, InvoiceError> {
    let document = self.draft_service.smart_fill(&command.text).await?;
    Ok(DraftResponse::from_document(&document))
  }
}
