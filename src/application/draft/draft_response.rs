use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::invoice::{
  Currency, InvoiceDocument, InvoiceTotals, LineItemId, LineItemWarning,
};

use super::list_currencies::CurrencyDto;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineAmountDto {
  pub item_id: LineItemId,
  pub amount: Decimal,
}

/// Display toggles with their defaults applied. An unknown currency code is
/// shown with the first supported currency's formatting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayDto {
  pub item_dates: bool,
  pub tax: bool,
  pub due_date: bool,
  pub name_with_logo: bool,
  pub currency: CurrencyDto,
}

impl DisplayDto {
  pub fn from_document(document: &InvoiceDocument) -> Self {
    Self {
      item_dates: document.shows_item_dates(),
      tax: document.shows_tax(),
      due_date: document.shows_due_date(),
      name_with_logo: document.shows_name_with_logo(),
      currency: Currency::for_code(&document.currency).into(),
    }
  }
}

/// A document together with everything derived from it for display.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftResponse {
  pub invoice: InvoiceDocument,
  pub totals: InvoiceTotals,
  pub line_amounts: Vec<LineAmountDto>,
  pub warnings: Vec<LineItemWarning>,
  pub display: DisplayDto,
}

impl DraftResponse {
  pub fn from_document(document: &InvoiceDocument) -> Self {
    let line_amounts = document
      .items
      .iter()
      .map(|item| LineAmountDto {
        item_id: item.id.clone(),
        amount: item.amount(),
      })
      .collect();

    Self {
      invoice: document.clone(),
      totals: document.totals(),
      line_amounts,
      warnings: document.warnings(),
      display: DisplayDto::from_document(document),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::invoice::DisplayFlag;
  use chrono::NaiveDate;

  #[test]
  fn test_display_resolves_unset_flags() {
    let mut document = InvoiceDocument::template(NaiveDate::from_ymd_opt(2025, 9, 1).unwrap());
    document.show_item_dates = DisplayFlag::Unset;
    document.show_tax = DisplayFlag::Unset;
    document.show_due_date = DisplayFlag::Off;
    document.show_name_with_logo = DisplayFlag::Unset;
    document.currency = "XYZ".to_string();

    let display = DraftResponse::from_document(&document).display;
    assert!(display.item_dates);
    assert!(display.tax);
    assert!(!display.due_date);
    assert!(!display.name_with_logo);
    assert_eq!(display.currency, CurrencyDto::from(Currency::IDR));
  }

  #[test]
  fn test_display_uses_document_currency() {
    let mut document = InvoiceDocument::template(NaiveDate::from_ymd_opt(2025, 9, 1).unwrap());
    document.currency = "eur".to_string();
    document.show_name_with_logo = DisplayFlag::On;

    let display = DisplayDto::from_document(&document);
    assert_eq!(display.currency.code, "EUR");
    assert_eq!(display.currency.locale, "de-DE");
    assert!(display.name_with_logo);
  }
}
