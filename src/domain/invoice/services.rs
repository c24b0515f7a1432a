use chrono::{Local, NaiveDate};
use serde::Serialize;
use serde_json::Value;
use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, RwLock};

use super::entities::{InvoiceDocument, LineItem, LineItemPatch, decode_json};
use super::errors::InvoiceError;
use super::ports::{DraftRepository, InvoiceExtractor};
use super::splitter::InvoiceSplitter;
use super::value_objects::{DocumentField, LineItemId};

/// Message shown to the user for any smart fill failure.
pub const EXTRACTION_FAILED_MESSAGE: &str =
  "Failed to generate invoice. Please check your API key or try a detailed prompt.";

/// Busy indicator for smart fill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum ExtractionStatus {
  Idle,
  Generating,
  Success,
  Error { message: String },
}

impl ExtractionStatus {
  fn is_terminal(&self) -> bool {
    matches!(self, ExtractionStatus::Success | ExtractionStatus::Error { .. })
  }
}

#[derive(Debug, Clone, Copy)]
pub struct DraftServiceConfig {
  pub hide_item_dates: bool,
  /// How long a finished extraction keeps reporting success/error.
  pub status_display: Duration,
}

impl Default for DraftServiceConfig {
  fn default() -> Self {
    Self {
      hide_item_dates: true,
      status_display: Duration::from_secs(2),
    }
  }
}

struct StatusCell {
  status: ExtractionStatus,
  changed_at: Instant,
}

impl StatusCell {
  fn set(cell: &StdMutex<StatusCell>, status: ExtractionStatus) {
    let mut cell = cell.lock().unwrap_or_else(PoisonError::into_inner);
    cell.status = status;
    cell.changed_at = Instant::now();
  }
}

/// Holds the status at `Generating` for one extraction. Dropped without
/// `finish` (the caller's future was cancelled), it puts the status back to idle.
struct PendingExtraction<'a> {
  cell: &'a StdMutex<StatusCell>,
  finished: bool,
}

impl<'a> PendingExtraction<'a> {
  fn begin(cell: &'a StdMutex<StatusCell>) -> Self {
    StatusCell::set(cell, ExtractionStatus::Generating);
    Self {
      cell,
      finished: false,
    }
  }

  fn finish(mut self, status: ExtractionStatus) {
    StatusCell::set(self.cell, status);
    self.finished = true;
  }
}

impl Drop for PendingExtraction<'_> {
  fn drop(&mut self) {
    if !self.finished {
      tracing::warn!("Smart fill abandoned before it finished");
      StatusCell::set(self.cell, ExtractionStatus::Idle);
    }
  }
}

/// Owns the single live draft.
///
/// Every mutation builds a new snapshot and swaps it in under the write lock,
/// then persists it (best effort) before the lock is released.
pub struct DraftService {
  repository: Arc<dyn DraftRepository>,
  extractor: Arc<dyn InvoiceExtractor>,
  splitter: InvoiceSplitter,
  status_display: Duration,
  current: RwLock<Arc<InvoiceDocument>>,
  extraction: Mutex<()>,
  status: StdMutex<StatusCell>,
}

impl DraftService {
  pub fn new(
    repository: Arc<dyn DraftRepository>,
    extractor: Arc<dyn InvoiceExtractor>,
    config: DraftServiceConfig,
    initial: InvoiceDocument,
  ) -> Self {
    Self {
      repository,
      extractor,
      splitter: InvoiceSplitter::new(config.hide_item_dates),
      status_display: config.status_display,
      current: RwLock::new(Arc::new(initial)),
      extraction: Mutex::new(()),
      status: StdMutex::new(StatusCell {
        status: ExtractionStatus::Idle,
        changed_at: Instant::now(),
      }),
    }
  }

  /// Start from the stored draft merged over today's template, or from the
  /// template alone when nothing usable is stored.
  pub async fn load(
    repository: Arc<dyn DraftRepository>,
    extractor: Arc<dyn InvoiceExtractor>,
    config: DraftServiceConfig,
  ) -> Self {
    let template = InvoiceDocument::template(today());

    let initial = match repository.load().await {
      Ok(Some(stored)) => match merge_over_template(&template, stored) {
        Ok(document) => {
          tracing::info!(invoice_number = %document.invoice_number, "Restored saved draft");
          document
        }
        Err(e) => {
          tracing::warn!(error = %e, "Saved draft could not be decoded, starting from template");
          template
        }
      },
      Ok(None) => {
        tracing::debug!("No saved draft, starting from template");
        template
      }
      Err(e) => {
        tracing::warn!(error = %e, "Failed to read saved draft, starting from template");
        template
      }
    };

    Self::new(repository, extractor, config, initial)
  }

  pub async fn current(&self) -> Arc<InvoiceDocument> {
    Arc::clone(&*self.current.read().await)
  }

  pub async fn replace(
    &self,
    document: InvoiceDocument,
  ) -> Result<Arc<InvoiceDocument>, InvoiceError> {
    self.mutate(|_| Ok(document)).await
  }

  pub async fn update_field(
    &self,
    field: DocumentField,
    value: Value,
  ) -> Result<Arc<InvoiceDocument>, InvoiceError> {
    self.mutate(|current| current.with_field(field, value)).await
  }

  pub async fn add_item(&self, item: LineItem) -> Result<Arc<InvoiceDocument>, InvoiceError> {
    self.mutate(|current| Ok(current.with_item_added(item))).await
  }

  pub async fn update_item(
    &self,
    id: &LineItemId,
    patch: LineItemPatch,
  ) -> Result<Arc<InvoiceDocument>, InvoiceError> {
    self.mutate(|current| current.with_item_updated(id, patch)).await
  }

  pub async fn remove_item(&self, id: &LineItemId) -> Result<Arc<InvoiceDocument>, InvoiceError> {
    self.mutate(|current| current.with_item_removed(id)).await
  }

  /// Back to the template; the stored snapshot is deleted.
  pub async fn reset(&self) -> Result<Arc<InvoiceDocument>, InvoiceError> {
    let mut guard = self.current.write().await;
    let next = Arc::new(InvoiceDocument::template(today()));
    *guard = Arc::clone(&next);

    if let Err(e) = self.repository.clear().await {
      tracing::warn!(error = %e, "Failed to clear saved draft");
    }
    Ok(next)
  }

  /// Split the current snapshot; the live draft is left as it is.
  pub async fn split(&self) -> Result<Vec<InvoiceDocument>, InvoiceError> {
    let current = self.current().await;
    self.splitter.split(&current)
  }

  /// Run the text extractor and merge its output into the live draft.
  ///
  /// Only one extraction runs at a time; a concurrent call fails with
  /// `ExtractionInProgress` instead of waiting.
  pub async fn smart_fill(&self, text: &str) -> Result<Arc<InvoiceDocument>, InvoiceError> {
    if text.trim().is_empty() {
      return Err(InvoiceError::EmptyPrompt);
    }

    let _in_flight = self
      .extraction
      .try_lock()
      .map_err(|_| InvoiceError::ExtractionInProgress)?;

    let pending = PendingExtraction::begin(&self.status);

    let extracted = match self.extractor.extract(text, today()).await {
      Ok(extracted) => extracted,
      Err(e) => {
        tracing::error!(error = %e, "Smart fill extraction failed");
        pending.finish(ExtractionStatus::Error {
          message: EXTRACTION_FAILED_MESSAGE.to_string(),
        });
        return Err(match e {
          InvoiceError::ExtractionFailed(reason) => InvoiceError::ExtractionFailed(reason),
          other => InvoiceError::ExtractionFailed(other.to_string()),
        });
      }
    };

    let document = self
      .mutate(|current| Ok(current.with_extracted(extracted)))
      .await?;
    tracing::info!(items = document.items.len(), "Smart fill merged into draft");
    pending.finish(ExtractionStatus::Success);
    Ok(document)
  }

  /// Current busy indicator; a finished extraction reads as idle again once
  /// the display window has passed.
  pub async fn extraction_status(&self) -> ExtractionStatus {
    let cell = self.status.lock().unwrap_or_else(PoisonError::into_inner);
    if cell.status.is_terminal() && cell.changed_at.elapsed() >= self.status_display {
      ExtractionStatus::Idle
    } else {
      cell.status.clone()
    }
  }

  async fn mutate<F>(&self, apply: F) -> Result<Arc<InvoiceDocument>, InvoiceError>
  where
    F: FnOnce(&InvoiceDocument) -> Result<InvoiceDocument, InvoiceError>,
  {
    let mut guard = self.current.write().await;
    let current: &InvoiceDocument = &guard;
    let next = Arc::new(apply(current)?);
    *guard = Arc::clone(&next);

    if let Err(e) = self.repository.save(&next).await {
      tracing::warn!(error = %e, "Failed to persist draft");
    }
    Ok(next)
  }
}

/// Shallow merge: stored top-level keys win over the template's.
pub fn merge_over_template(
  template: &InvoiceDocument,
  stored: Value,
) -> Result<InvoiceDocument, InvoiceError> {
  let Value::Object(stored) = stored else {
    return Err(InvoiceError::Storage(
      "saved draft is not a JSON object".to_string(),
    ));
  };

  let mut merged = serde_json::to_value(template)?;
  if let Value::Object(map) = &mut merged {
    map.extend(stored);
  }
  Ok(decode_json(&merged)?)
}

fn today() -> NaiveDate {
  Local::now().date_naive()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::invoice::entities::{ExtractedInvoice, ExtractedItem, InvoicePatch};
  use crate::domain::invoice::value_objects::DisplayFlag;
  use async_trait::async_trait;
  use rust_decimal::Decimal;
  use rust_decimal_macros::dec;
  use serde_json::json;
  use tokio::sync::Notify;

  #[derive(Default)]
  struct MemoryStore {
    value: std::sync::Mutex<Option<Value>>,
    fail_writes: bool,
  }

  impl MemoryStore {
    fn with(value: Value) -> Self {
      Self {
        value: std::sync::Mutex::new(Some(value)),
        fail_writes: false,
      }
    }

    fn stored(&self) -> Option<Value> {
      self.value.lock().unwrap().clone()
    }
  }

  #[async_trait]
  impl DraftRepository for MemoryStore {
    async fn load(&self) -> Result<Option<Value>, InvoiceError> {
      Ok(self.stored())
    }

    async fn save(&self, document: &InvoiceDocument) -> Result<(), InvoiceError> {
      if self.fail_writes {
        return Err(InvoiceError::Storage("quota exceeded".to_string()));
      }
      *self.value.lock().unwrap() = Some(serde_json::to_value(document)?);
      Ok(())
    }

    async fn clear(&self) -> Result<(), InvoiceError> {
      *self.value.lock().unwrap() = None;
      Ok(())
    }
  }

  enum Script {
    Returns(ExtractedInvoice),
    Fails,
    WaitsFor(Arc<Notify>),
  }

  struct ScriptedExtractor(Script);

  #[async_trait]
  impl InvoiceExtractor for ScriptedExtractor {
    async fn extract(
      &self,
      _text: &str,
      _today: NaiveDate,
    ) -> Result<ExtractedInvoice, InvoiceError> {
      match &self.0 {
        Script::Returns(extracted) => Ok(extracted.clone()),
        Script::Fails => Err(InvoiceError::Internal("status 403".to_string())),
        Script::WaitsFor(notify) => {
          notify.notified().await;
          Ok(ExtractedInvoice::default())
        }
      }
    }
  }

  fn service(store: Arc<MemoryStore>, script: Script) -> DraftService {
    let template = InvoiceDocument::template(NaiveDate::from_ymd_opt(2025, 9, 1).unwrap());
    DraftService::new(
      store,
      Arc::new(ScriptedExtractor(script)),
      DraftServiceConfig::default(),
      template,
    )
  }

  #[test]
  fn test_merge_over_template() {
    let template = InvoiceDocument::template(NaiveDate::from_ymd_opt(2025, 9, 1).unwrap());
    let mut original = template.clone();
    original.client_name = "Budi".to_string();
    original.items.truncate(2);

    let mut stored = serde_json::to_value(&original).unwrap();
    let map = stored.as_object_mut().unwrap();
    map.remove("terms");
    map.remove("logoBackgroundColor");
    map.remove("showTax");

    let merged = merge_over_template(&template, stored).unwrap();
    assert_eq!(merged.client_name, "Budi");
    assert_eq!(merged.items, original.items);
    assert_eq!(merged.terms, template.terms);
    assert_eq!(merged.logo_background_color, "transparent");
    assert_eq!(merged.show_tax, template.show_tax);
  }

  #[test]
  fn test_merge_keeps_every_digit() {
    let template = InvoiceDocument::template(NaiveDate::from_ymd_opt(2025, 9, 1).unwrap());
    let mut original = template.clone();
    original.tax_rate = dec!(12.3456789012345678901);
    original.items[0].quantity = Decimal::MAX;
    original.items[1].rate = dec!(0.0000000000000000000000000001);

    let stored = serde_json::to_value(&original).unwrap();
    let merged = merge_over_template(&template, stored).unwrap();
    assert_eq!(merged, original);
  }

  #[test]
  fn test_merge_rejects_non_objects() {
    let template = InvoiceDocument::template(NaiveDate::from_ymd_opt(2025, 9, 1).unwrap());
    assert!(matches!(
      merge_over_template(&template, json!([1, 2])),
      Err(InvoiceError::Storage(_))
    ));
    assert!(merge_over_template(&template, json!({ "items": "broken" })).is_err());
  }

  #[tokio::test]
  async fn test_load_restores_saved_draft() {
    let store = Arc::new(MemoryStore::with(json!({
      "clientName": "Kopi Nusantara",
      "items": [{ "id": "a", "description": "Beans", "quantity": 2, "unit": "kg", "rate": 50 }]
    })));
    let service = DraftService::load(
      store,
      Arc::new(ScriptedExtractor(Script::Fails)),
      DraftServiceConfig::default(),
    )
    .await;

    let current = service.current().await;
    assert_eq!(current.client_name, "Kopi Nusantara");
    assert_eq!(current.sender_name, "URS Coffee");
    assert_eq!(current.items.len(), 1);
    assert_eq!(current.totals().subtotal, dec!(100));
  }

  #[tokio::test]
  async fn test_load_falls_back_to_template() {
    let store = Arc::new(MemoryStore::with(json!("garbage")));
    let service = DraftService::load(
      store,
      Arc::new(ScriptedExtractor(Script::Fails)),
      DraftServiceConfig::default(),
    )
    .await;
    assert_eq!(service.current().await.items.len(), 5);
  }

  #[tokio::test]
  async fn test_mutations_produce_new_snapshots() {
    let store = Arc::new(MemoryStore::default());
    let service = service(store.clone(), Script::Fails);

    let before = service.current().await;
    let after = service
      .update_field(DocumentField::ClientName, json!("Budi"))
      .await
      .unwrap();

    assert_eq!(before.client_name, "Shantei");
    assert_eq!(after.client_name, "Budi");
    assert_eq!(store.stored().unwrap()["clientName"], json!("Budi"));
  }

  #[tokio::test]
  async fn test_item_operations() {
    let store = Arc::new(MemoryStore::default());
    let service = service(store, Script::Fails);

    let document = service.add_item(LineItem::blank()).await.unwrap();
    assert_eq!(document.items.len(), 6);
    let id = document.items[5].id.clone();

    let patch = LineItemPatch {
      quantity: Some(dec!(4)),
      rate: Some(dec!(2500)),
      ..Default::default()
    };
    let document = service.update_item(&id, patch).await.unwrap();
    assert_eq!(document.find_item(&id).unwrap().amount(), dec!(10000));

    let document = service.remove_item(&id).await.unwrap();
    assert_eq!(document.items.len(), 5);

    let err = service.remove_item(&id).await.unwrap_err();
    assert!(matches!(err, InvoiceError::LineItemNotFound(_)));
  }

  #[tokio::test]
  async fn test_failed_write_does_not_block_edit() {
    let store = Arc::new(MemoryStore {
      fail_writes: true,
      ..Default::default()
    });
    let service = service(store, Script::Fails);
    let document = service
      .update_field(DocumentField::Notes, json!("See you"))
      .await
      .unwrap();
    assert_eq!(document.notes, "See you");
    assert_eq!(service.current().await.notes, "See you");
  }

  #[tokio::test]
  async fn test_reset_clears_storage() {
    let store = Arc::new(MemoryStore::default());
    let service = service(store.clone(), Script::Fails);
    service.remove_item(&LineItemId::from("1")).await.unwrap();
    assert!(store.stored().is_some());

    let document = service.reset().await.unwrap();
    assert_eq!(document.items.len(), 5);
    assert!(store.stored().is_none());
  }

  #[tokio::test]
  async fn test_split_leaves_live_draft() {
    let store = Arc::new(MemoryStore::default());
    let service = service(store, Script::Fails);
    let documents = service.split().await.unwrap();
    assert_eq!(documents.len(), 5);
    assert_eq!(documents[0].date, "2025-08-22");
    assert_eq!(service.current().await.items.len(), 5);
  }

  #[tokio::test]
  async fn test_smart_fill_merges() {
    let extracted = ExtractedInvoice {
      fields: InvoicePatch {
        client_name: Some("Warung Sejahtera".to_string()),
        show_tax: Some(true),
        ..Default::default()
      },
      items: Some(vec![ExtractedItem {
        date: None,
        description: "Kopi Susu".to_string(),
        quantity: dec!(10),
        unit: None,
        rate: dec!(18000),
      }]),
    };
    let store = Arc::new(MemoryStore::default());
    let service = service(store, Script::Returns(extracted));

    let document = service.smart_fill("10 kopi susu for Warung Sejahtera").await.unwrap();
    assert_eq!(document.client_name, "Warung Sejahtera");
    assert_eq!(document.show_tax, DisplayFlag::On);
    assert_eq!(document.items.len(), 1);
    assert_eq!(document.items[0].unit, "pcs");
    assert_eq!(document.totals().tax_amount, dec!(19800));
    assert_eq!(service.extraction_status().await, ExtractionStatus::Success);
  }

  #[tokio::test]
  async fn test_smart_fill_failure_leaves_draft() {
    let store = Arc::new(MemoryStore::default());
    let service = service(store, Script::Fails);
    let before = service.current().await;

    let err = service.smart_fill("anything").await.unwrap_err();
    assert!(matches!(err, InvoiceError::ExtractionFailed(_)));
    assert_eq!(*service.current().await, *before);
    assert_eq!(
      service.extraction_status().await,
      ExtractionStatus::Error {
        message: EXTRACTION_FAILED_MESSAGE.to_string()
      }
    );
  }

  #[tokio::test]
  async fn test_smart_fill_rejects_blank_prompt() {
    let service = service(Arc::new(MemoryStore::default()), Script::Fails);
    assert!(matches!(
      service.smart_fill("   ").await,
      Err(InvoiceError::EmptyPrompt)
    ));
    assert_eq!(service.extraction_status().await, ExtractionStatus::Idle);
  }

  #[tokio::test]
  async fn test_status_returns_to_idle() {
    let template = InvoiceDocument::template(NaiveDate::from_ymd_opt(2025, 9, 1).unwrap());
    let service = DraftService::new(
      Arc::new(MemoryStore::default()),
      Arc::new(ScriptedExtractor(Script::Returns(ExtractedInvoice::default()))),
      DraftServiceConfig {
        hide_item_dates: true,
        status_display: Duration::ZERO,
      },
      template,
    );
    service.smart_fill("hello").await.unwrap();
    assert_eq!(service.extraction_status().await, ExtractionStatus::Idle);
  }

  #[tokio::test]
  async fn test_cancelled_smart_fill_goes_idle() {
    let notify = Arc::new(Notify::new());
    let service = service(
      Arc::new(MemoryStore::default()),
      Script::WaitsFor(notify.clone()),
    );
    let before = service.current().await;

    let outcome =
      tokio::time::timeout(Duration::from_millis(50), service.smart_fill("2 kg beans")).await;
    assert!(outcome.is_err());

    assert_eq!(service.extraction_status().await, ExtractionStatus::Idle);
    assert_eq!(*service.current().await, *before);

    notify.notify_one();
    assert!(service.smart_fill("2 kg beans").await.is_ok());
    assert_eq!(service.extraction_status().await, ExtractionStatus::Success);
  }

  #[tokio::test]
  async fn test_smart_fill_is_single_flight() {
    let notify = Arc::new(Notify::new());
    let service = Arc::new(service(
      Arc::new(MemoryStore::default()),
      Script::WaitsFor(notify.clone()),
    ));

    let first = {
      let service = service.clone();
      tokio::spawn(async move { service.smart_fill("first").await })
    };

    while service.extraction_status().await != ExtractionStatus::Generating {
      tokio::task::yield_now().await;
    }

    assert!(matches!(
      service.smart_fill("second").await,
      Err(InvoiceError::ExtractionInProgress)
    ));

    notify.notify_one();
    assert!(first.await.unwrap().is_ok());
  }
}
