use rust_decimal::Decimal;
use serde::Deserialize;
use std::sync::Arc;

use super::DraftResponse;
use crate::domain::invoice::{DraftService, InvoiceError, LineItem, LineItemPatch};

/// Values for the new row; anything missing takes the blank-row default.
#[derive(Debug, Default, Deserialize)]
pub struct AddLineItemCommand {
  pub date: Option<String>,
  pub description: Option<String>,
  pub quantity: Option<Decimal>,
  pub unit: Option<String>,
  pub rate: Option<Decimal>,
}

pub struct AddLineItemUseCase {
  draft_service: Arc<DraftService>,
}

impl AddLineItemUseCase {
  pub fn new(draft_service: Arc<DraftService>) -> Self {
    Self { draft_service }
  }

  pub async fn execute(&self, command: AddLineItemCommand) -> Result<DraftResponse, InvoiceError> {
    let item = LineItem::blank().patched(LineItemPatch {
      date: command.date,
      description: command.description,
      quantity: command.quantity,
      unit: command.unit,
      rate: command.rate,
    });
    let item_id = item.id.clone();

    let document = self.draft_service.add_item(item).await?;
    tracing::debug!(item_id = %item_id, "Line item added");
    Ok(DraftResponse::from_document(&document))
  }
}
