use serde::Deserialize;
use serde_json::Value;
use std::str::FromStr;
use std::sync::Arc;

use super::DraftResponse;
use crate::domain::invoice::{DocumentField, DraftService, InvoiceError};

#[derive(Debug, Deserialize)]
pub struct UpdateDraftFieldCommand {
  /// camelCase field name, e.g. `clientName`
  pub field: String,
  pub value: Value,
}

pub struct UpdateDraftFieldUseCase {
  draft_service: Arc<DraftService>,
}

impl UpdateDraftFieldUseCase {
  pub fn new(draft_service: Arc<DraftService>) -> Self {
    Self { draft_service }
  }

  pub async fn execute(
    &self,
    command: UpdateDraftFieldCommand,
  ) -> Result<DraftResponse, InvoiceError> {
    let field = DocumentField::from_str(&command.field)?;
    let document = self.draft_service.update_field(field, command.value).await?;
    tracing::debug!(field = %field, "Draft field updated");
    Ok(DraftResponse::from_document(&document))
  }
}
