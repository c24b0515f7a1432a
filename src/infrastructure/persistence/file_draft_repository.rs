use async_trait::async_trait;
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::domain::invoice::{InvoiceDocument, errors::InvoiceError, ports::DraftRepository};

/// Stores the draft as pretty-printed JSON at `{dir}/{key}.json`.
pub struct FileDraftRepository {
  path: PathBuf,
}

impl FileDraftRepository {
  pub fn new(dir: impl AsRef<Path>, key: &str) -> Self {
    Self {
      path: dir.as_ref().join(format!("{}.json", key)),
    }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }
}

#[async_trait]
impl DraftRepository for FileDraftRepository {
  async fn load(&self) -> Result<Option<Value>, InvoiceError> {
    let bytes = match tokio::fs::read(&self.path).await {
      Ok(bytes) => bytes,
      Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
      Err(e) => {
        return Err(InvoiceError::Storage(format!(
          "Failed to read {}: {}",
          self.path.display(),
          e
        )));
      }
    };

    let value = serde_json::from_slice(&bytes)?;
    Ok(Some(value))
  }

  async fn save(&self, document: &InvoiceDocument) -> Result<(), InvoiceError> {
    if let Some(parent) = self.path.parent() {
      tokio::fs::create_dir_all(parent).await.map_err(|e| {
        InvoiceError::Storage(format!("Failed to create {}: {}", parent.display(), e))
      })?;
    }

    let json = serde_json::to_vec_pretty(document)?;
    tokio::fs::write(&self.path, json).await.map_err(|e| {
      InvoiceError::Storage(format!("Failed to write {}: {}", self.path.display(), e))
    })?;

    tracing::debug!(path = %self.path.display(), "Draft saved");
    Ok(())
  }

  async fn clear(&self) -> Result<(), InvoiceError> {
    match tokio::fs::remove_file(&self.path).await {
      Ok(()) => Ok(()),
      Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
      Err(e) => Err(InvoiceError::Storage(format!(
        "Failed to remove {}: {}",
        self.path.display(),
        e
      ))),
    }
  }
}
