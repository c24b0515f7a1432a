use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;

use super::entities::{InvoiceDocument, LineItem};
use super::value_objects::{Currency, DisplayFlag, LineItemId, LogoAlignment};

/// Days between the invoice date and the due date on a fresh draft.
pub const DEFAULT_PAYMENT_TERM_DAYS: u64 = 7;

/// Format used for every date written by the service.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

fn seed_item(
  id: &str,
  date: &str,
  description: &str,
  quantity: i64,
  unit: &str,
  rate: i64,
) -> LineItem {
  LineItem {
    id: LineItemId::from(id),
    date: Some(date.to_string()),
    description: description.to_string(),
    quantity: Decimal::from(quantity),
    unit: unit.to_string(),
    rate: Decimal::from(rate),
  }
}

impl InvoiceDocument {
  /// The starting draft: a roasted-coffee supplier billing one client, with
  /// items spread over several dates.
  pub fn template(today: NaiveDate) -> Self {
    let due = today
      .checked_add_days(Days::new(DEFAULT_PAYMENT_TERM_DAYS))
      .unwrap_or(today);

    let robusta = "Robusta Lampung Roasted Bean";
    let palm_sugar = "Gula Aren Cair";

    Self {
      invoice_number: format!("INV-{}-001", today.format("%Y%m%d")),
      date: today.format(DATE_FORMAT).to_string(),
      due_date: due.format(DATE_FORMAT).to_string(),
      sender_name: "URS Coffee".to_string(),
      sender_email: "Jakarta Utara, Indonesia".to_string(),
      sender_address: "Rukan Cordoba Blok No. H63".to_string(),
      client_name: "Shantei".to_string(),
      client_email: String::new(),
      client_address: String::new(),
      currency: Currency::IDR.as_str().to_string(),
      tax_rate: Decimal::from(11),
      show_item_dates: DisplayFlag::On,
      show_tax: DisplayFlag::Off,
      show_due_date: DisplayFlag::On,
      show_name_with_logo: DisplayFlag::Off,
      notes: "Terima kasih atas kepercayaan Anda!".to_string(),
      terms: "Pembayaran mohon ditransfer ke rekening BCA.\nNo. Rek: 1234567890\na.n. URS Coffee"
        .to_string(),
      logo_image: String::new(),
      logo_alignment: LogoAlignment::Right,
      logo_background_color: "transparent".to_string(),
      items: vec![
        seed_item("1", "2025-12-01", robusta, 1, "kg", 135_000),
        seed_item("2", "2025-10-28", robusta, 1, "kg", 135_000),
        seed_item("3", "2025-09-16", palm_sugar, 2, "liter", 75_000),
        seed_item("4", "2025-09-02", robusta, 1, "kg", 135_000),
        seed_item("5", "2025-08-22", palm_sugar, 3, "liter", 75_000),
      ],
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use rust_decimal_macros::dec;

  #[test]
  fn test_template_dates_follow_today() {
    let today = NaiveDate::from_ymd_opt(2025, 12, 28).unwrap();
    let document = InvoiceDocument::template(today);
    assert_eq!(document.invoice_number, "INV-20251228-001");
    assert_eq!(document.date, "2025-12-28");
    assert_eq!(document.due_date, "2026-01-04");
  }

  #[test]
  fn test_template_contents() {
    let document = InvoiceDocument::template(NaiveDate::from_ymd_opt(2025, 9, 1).unwrap());
    assert_eq!(document.currency, "IDR");
    assert_eq!(document.items.len(), 5);
    assert!(!document.shows_tax());
    assert!(document.shows_item_dates());
    assert_eq!(document.totals().subtotal, dec!(780000));
    assert!(document.warnings().is_empty());
  }
}
