use std::collections::BTreeMap;

use super::entities::{InvoiceDocument, LineItem};
use super::errors::InvoiceError;
use super::value_objects::DisplayFlag;

/// Partitions a document into one derived document per distinct item date.
#[derive(Debug, Clone, Copy)]
pub struct InvoiceSplitter {
  hide_item_dates: bool,
}

impl Default for InvoiceSplitter {
  fn default() -> Self {
    Self {
      hide_item_dates: true,
    }
  }
}

impl InvoiceSplitter {
  pub fn new(hide_item_dates: bool) -> Self {
    Self { hide_item_dates }
  }

  /// Derived documents ordered by ascending date. Dates are compared as
  /// plain strings, so malformed dates still group by equality.
  pub fn split(&self, parent: &InvoiceDocument) -> Result<Vec<InvoiceDocument>, InvoiceError> {
    if parent.items.is_empty() {
      return Err(InvoiceError::NothingToSplit);
    }

    let mut buckets: BTreeMap<&str, Vec<&LineItem>> = BTreeMap::new();
    for item in &parent.items {
      buckets
        .entry(item.effective_date(&parent.date))
        .or_default()
        .push(item);
    }

    if buckets.len() <= 1 {
      let date = buckets.keys().next().copied().unwrap_or(parent.date.as_str());
      return Err(InvoiceError::SingleDate(date.to_string()));
    }

    let documents = buckets
      .into_iter()
      .enumerate()
      .map(|(index, (date, items))| self.derive(parent, index, date, items))
      .collect();

    Ok(documents)
  }

  fn derive(
    &self,
    parent: &InvoiceDocument,
    index: usize,
    date: &str,
    items: Vec<&LineItem>,
  ) -> InvoiceDocument {
    let mut document = parent.clone();
    document.items = items.into_iter().cloned().collect();
    document.invoice_number = split_invoice_number(date, index);
    document.date = date.to_string();
    document.notes = append_note(&parent.notes, &format!("Items dated {}", date));
    if self.hide_item_dates {
      document.show_item_dates = DisplayFlag::Off;
    }
    document
  }
}

/// `INV-{date without dashes}-{position, 1-based, 3 digits}`
pub fn split_invoice_number(date: &str, index: usize) -> String {
  format!("INV-{}-{:03}", date.replace('-', ""), index + 1)
}

fn append_note(notes: &str, line: &str) -> String {
  if notes.trim().is_empty() {
    line.to_string()
  } else {
    format!("{}\n\n{}", notes, line)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::NaiveDate;
  use rust_decimal::Decimal;
  use rust_decimal_macros::dec;

  fn parent_with(dates: &[Option<&str>]) -> InvoiceDocument {
    let mut document = InvoiceDocument::template(NaiveDate::from_ymd_opt(2025, 10, 1).unwrap());
    document.items = dates
      .iter()
      .enumerate()
      .map(|(i, date)| {
        let item = LineItem::new(
          format!("Item {}", i),
          Decimal::from(i as i64 + 1),
          "pcs".to_string(),
          dec!(1000),
        );
        match date {
          Some(date) => item.with_date(*date),
          None => item,
        }
      })
      .collect();
    document
  }

  #[test]
  fn test_split_three_dates() {
    let parent = parent_with(&[
      Some("2025-10-28"),
      Some("2025-09-02"),
      Some("2025-09-16"),
      Some("2025-09-02"),
    ]);

    let documents = InvoiceSplitter::default().split(&parent).unwrap();
    assert_eq!(documents.len(), 3);

    let numbers: Vec<&str> = documents.iter().map(|d| d.invoice_number.as_str()).collect();
    assert_eq!(
      numbers,
      vec!["INV-20250902-001", "INV-20250916-002", "INV-20251028-003"]
    );
    let dates: Vec<&str> = documents.iter().map(|d| d.date.as_str()).collect();
    assert_eq!(dates, vec!["2025-09-02", "2025-09-16", "2025-10-28"]);

    let first: Vec<&str> = documents[0].items.iter().map(|i| i.description.as_str()).collect();
    assert_eq!(first, vec!["Item 1", "Item 3"]);
    assert_eq!(documents[1].items.len(), 1);
    assert_eq!(documents[2].items[0].description, "Item 0");

    for document in &documents {
      assert!(document.items.iter().all(|i| i.date.as_deref() == Some(document.date.as_str())));
      assert!(!document.shows_item_dates());
      assert_eq!(document.client_name, parent.client_name);
    }
  }

  #[test]
  fn test_split_single_date_fails() {
    let parent = parent_with(&[Some("2025-09-02"), Some("2025-09-02")]);
    let err = InvoiceSplitter::default().split(&parent).unwrap_err();
    assert!(matches!(err, InvoiceError::SingleDate(ref date) if date == "2025-09-02"));
  }

  #[test]
  fn test_split_without_items_fails() {
    let parent = parent_with(&[]);
    assert!(matches!(
      InvoiceSplitter::default().split(&parent),
      Err(InvoiceError::NothingToSplit)
    ));
  }

  #[test]
  fn test_undated_item_uses_parent_date() {
    let mut parent = parent_with(&[None, Some("2025-09-02")]);
    parent.date = "2025-10-01".to_string();

    let documents = InvoiceSplitter::default().split(&parent).unwrap();
    assert_eq!(documents.len(), 2);
    assert_eq!(documents[1].date, "2025-10-01");
    assert_eq!(documents[1].items[0].description, "Item 0");
    assert_eq!(documents[1].invoice_number, "INV-20251001-002");
  }

  #[test]
  fn test_undated_items_matching_parent_date_do_not_split() {
    let mut parent = parent_with(&[None, Some("2025-10-01")]);
    parent.date = "2025-10-01".to_string();
    assert!(matches!(
      InvoiceSplitter::default().split(&parent),
      Err(InvoiceError::SingleDate(_))
    ));
  }

  #[test]
  fn test_malformed_dates_group_by_equality() {
    let parent = parent_with(&[Some("next week"), Some("2025-09-02"), Some("next week")]);
    let documents = InvoiceSplitter::default().split(&parent).unwrap();
    assert_eq!(documents.len(), 2);
    assert_eq!(documents[1].date, "next week");
    assert_eq!(documents[1].items.len(), 2);
    assert_eq!(documents[1].invoice_number, "INV-next week-002");
  }

  #[test]
  fn test_split_notes() {
    let mut parent = parent_with(&[Some("2025-09-02"), Some("2025-09-16")]);
    parent.notes = "Thanks!".to_string();
    let documents = InvoiceSplitter::default().split(&parent).unwrap();
    assert_eq!(documents[0].notes, "Thanks!\n\nItems dated 2025-09-02");

    parent.notes = String::new();
    let documents = InvoiceSplitter::default().split(&parent).unwrap();
    assert_eq!(documents[1].notes, "Items dated 2025-09-16");
  }

  #[test]
  fn test_keep_item_dates_when_knob_off() {
    let mut parent = parent_with(&[Some("2025-09-02"), Some("2025-09-16")]);
    parent.show_item_dates = DisplayFlag::Unset;
    let documents = InvoiceSplitter::new(false).split(&parent).unwrap();
    assert!(documents.iter().all(|d| d.show_item_dates == DisplayFlag::Unset));
  }

  #[test]
  fn test_split_does_not_touch_parent() {
    let parent = parent_with(&[Some("2025-09-02"), Some("2025-09-16")]);
    let snapshot = parent.clone();
    let mut documents = InvoiceSplitter::default().split(&parent).unwrap();
    documents[0].items.clear();
    assert_eq!(parent, snapshot);
  }
}
