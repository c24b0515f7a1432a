use serde::Deserialize;
use std::sync::Arc;

use super::DraftResponse;
use crate::domain::invoice::{DraftService, InvoiceError, LineItemId};

#[derive(Debug, Deserialize)]
pub struct RemoveLineItemCommand {
  pub item_id: String,
}

pub struct RemoveLineItemUseCase {
  draft_service: Arc<DraftService>,
}

impl RemoveLineItemUseCase {
  pub fn new(draft_service: Arc<DraftService>) -> Self {
    Self { draft_service }
  }

  pub async fn execute(
    &self,
    command: RemoveLineItemCommand,
  ) -> Result<DraftResponse, InvoiceError> {
    let item_id = LineItemId::from(command.item_id);
    let document = self.draft_service.remove_item(&item_id).await?;
    tracing::debug!(item_id = %item_id, "Line item removed");
    Ok(DraftResponse::from_document(&document))
  }
}
