use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::domain::invoice::{InvoiceDocument, errors::InvoiceError, ports::DraftRepository};

/// Keeps the draft in process memory; nothing survives a restart.
#[derive(Default)]
pub struct InMemoryDraftRepository {
  value: RwLock<Option<Value>>,
}

impl InMemoryDraftRepository {
  pub fn new() -> Self {
    Self::default()
  }

  /// Start with an already stored snapshot.
  pub fn with_value(value: Value) -> Self {
    Self {
      value: RwLock::new(Some(value)),
    }
  }

  pub async fn stored(&self) -> Option<Value> {
    self.value.read().await.clone()
  }
}

#[async_trait]
impl DraftRepository for InMemoryDraftRepository {
  async fn load(&self) -> Result<Option<Value>, InvoiceError> {
    Ok(self.stored().await)
  }

  async fn save(&self, document: &InvoiceDocument) -> Result<(), InvoiceError> {
    let value = serde_json::to_value(document)?;
    *self.value.write().await = Some(value);
    Ok(())
  }

  async fn clear(&self) -> Result<(), InvoiceError> {
    *self.value.write().await = None;
    Ok(())
  }
}
