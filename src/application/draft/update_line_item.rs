use serde::Deserialize;
use std::sync::Arc;

use super::DraftResponse;
use crate::domain::invoice::{DraftService, InvoiceError, LineItemId, LineItemPatch};

#[derive(Debug, Deserialize)]
pub struct UpdateLineItemCommand {
  pub item_id: String,
  pub patch: LineItemPatch,
}

pub struct UpdateLineItemUseCase {
  draft_service: Arc<DraftService>,
}

impl UpdateLineItemUseCase {
  pub fn new(draft_service: Arc<DraftService>) -> Self {
    Self { draft_service }
  }

  pub async fn execute(
    &self,
    command: UpdateLineItemCommand,
  ) -> Result<DraftResponse, InvoiceError> {
    let item_id = LineItemId::from(command.item_id);
    let document = self
      .draft_service
      .update_item(&item_id, command.patch)
      .await?;
    Ok(DraftResponse::from_document(&document))
  }
}
