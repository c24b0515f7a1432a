use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValueObjectError {
  #[error("Invalid currency code: {0}")]
  InvalidCurrency(String),
  #[error("Unknown invoice field: {0}")]
  UnknownField(String),
}

// Line item identifier - opaque token, fresh ones are UUID v4 strings
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineItemId(String);

impl LineItemId {
  pub fn new() -> Self {
    Self(Uuid::new_v4().to_string())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl Default for LineItemId {
  fn default() -> Self {
    Self::new()
  }
}

impl From<String> for LineItemId {
  fn from(value: String) -> Self {
    Self(value)
  }
}

impl From<&str> for LineItemId {
  fn from(value: &str) -> Self {
    Self(value.to_string())
  }
}

impl fmt::Display for LineItemId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

/// Optional display toggle.
///
/// Stored as absent / `true` / `false`. What an absent flag means is decided
/// where the flag is read, via [`DisplayFlag::resolve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<bool>", into = "Option<bool>")]
pub enum DisplayFlag {
  #[default]
  Unset,
  On,
  Off,
}

impl DisplayFlag {
  pub fn resolve(self, default: bool) -> bool {
    match self {
      DisplayFlag::Unset => default,
      DisplayFlag::On => true,
      DisplayFlag::Off => false,
    }
  }

  pub fn is_unset(&self) -> bool {
    matches!(self, DisplayFlag::Unset)
  }
}

impl From<bool> for DisplayFlag {
  fn from(value: bool) -> Self {
    if value {
      DisplayFlag::On
    } else {
      DisplayFlag::Off
    }
  }
}

impl From<Option<bool>> for DisplayFlag {
  fn from(value: Option<bool>) -> Self {
    value.map(DisplayFlag::from).unwrap_or_default()
  }
}

impl From<DisplayFlag> for Option<bool> {
  fn from(value: DisplayFlag) -> Self {
    match value {
      DisplayFlag::Unset => None,
      DisplayFlag::On => Some(true),
      DisplayFlag::Off => Some(false),
    }
  }
}

// Logo placement on the document header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogoAlignment {
  Left,
  Center,
  #[default]
  Right,
}

// Currency - ISO 4217, the set offered by the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Currency {
  IDR,
  USD,
  EUR,
  GBP,
  JPY,
  CAD,
  AUD,
  SGD,
}

impl Currency {
  /// Supported currencies in menu order. The first entry is the fallback for
  /// unknown codes.
  pub const ALL: [Currency; 8] = [
    Currency::IDR,
    Currency::USD,
    Currency::EUR,
    Currency::GBP,
    Currency::JPY,
    Currency::CAD,
    Currency::AUD,
    Currency::SGD,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      Currency::IDR => "IDR",
      Currency::USD => "USD",
      Currency::EUR => "EUR",
      Currency::GBP => "GBP",
      Currency::JPY => "JPY",
      Currency::CAD => "CAD",
      Currency::AUD => "AUD",
      Currency::SGD => "SGD",
    }
  }

  pub fn symbol(&self) -> &'static str {
    match self {
      Currency::IDR => "Rp",
      Currency::USD => "$",
      Currency::EUR => "€",
      Currency::GBP => "£",
      Currency::JPY => "¥",
      Currency::CAD => "CA$",
      Currency::AUD => "A$",
      Currency::SGD => "S$",
    }
  }

  pub fn locale(&self) -> &'static str {
    match self {
      Currency::IDR => "id-ID",
      Currency::USD => "en-US",
      Currency::EUR => "de-DE",
      Currency::GBP => "en-GB",
      Currency::JPY => "ja-JP",
      Currency::CAD => "en-CA",
      Currency::AUD => "en-AU",
      Currency::SGD => "en-SG",
    }
  }

  /// Resolve a stored currency code, falling back to the first supported one.
  pub fn for_code(code: &str) -> Currency {
    Currency::from_str(code).unwrap_or(Currency::ALL[0])
  }
}

impl FromStr for Currency {
  type Err = ValueObjectError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let code = s.trim().to_uppercase();
    Currency::ALL
      .into_iter()
      .find(|currency| currency.as_str() == code)
      .ok_or_else(|| ValueObjectError::InvalidCurrency(format!("Unsupported currency: {}", s)))
  }
}

impl fmt::Display for Currency {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// Top-level field of an invoice document, named as in its JSON form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentField {
  InvoiceNumber,
  Date,
  DueDate,
  SenderName,
  SenderEmail,
  SenderAddress,
  ClientName,
  ClientEmail,
  ClientAddress,
  Currency,
  TaxRate,
  ShowItemDates,
  ShowTax,
  ShowDueDate,
  ShowNameWithLogo,
  Notes,
  Terms,
  LogoImage,
  LogoAlignment,
  LogoBackgroundColor,
  Items,
}

impl DocumentField {
  pub const ALL: [DocumentField; 21] = [
    DocumentField::InvoiceNumber,
    DocumentField::Date,
    DocumentField::DueDate,
    DocumentField::SenderName,
    DocumentField::SenderEmail,
    DocumentField::SenderAddress,
    DocumentField::ClientName,
    DocumentField::ClientEmail,
    DocumentField::ClientAddress,
    DocumentField::Currency,
    DocumentField::TaxRate,
    DocumentField::ShowItemDates,
    DocumentField::ShowTax,
    DocumentField::ShowDueDate,
    DocumentField::ShowNameWithLogo,
    DocumentField::Notes,
    DocumentField::Terms,
    DocumentField::LogoImage,
    DocumentField::LogoAlignment,
    DocumentField::LogoBackgroundColor,
    DocumentField::Items,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      DocumentField::InvoiceNumber => "invoiceNumber",
      DocumentField::Date => "date",
      DocumentField::DueDate => "dueDate",
      DocumentField::SenderName => "senderName",
      DocumentField::SenderEmail => "senderEmail",
      DocumentField::SenderAddress => "senderAddress",
      DocumentField::ClientName => "clientName",
      DocumentField::ClientEmail => "clientEmail",
      DocumentField::ClientAddress => "clientAddress",
      DocumentField::Currency => "currency",
      DocumentField::TaxRate => "taxRate",
      DocumentField::ShowItemDates => "showItemDates",
      DocumentField::ShowTax => "showTax",
      DocumentField::ShowDueDate => "showDueDate",
      DocumentField::ShowNameWithLogo => "showNameWithLogo",
      DocumentField::Notes => "notes",
      DocumentField::Terms => "terms",
      DocumentField::LogoImage => "logoImage",
      DocumentField::LogoAlignment => "logoAlignment",
      DocumentField::LogoBackgroundColor => "logoBackgroundColor",
      DocumentField::Items => "items",
    }
  }
}

impl FromStr for DocumentField {
  type Err = ValueObjectError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    DocumentField::ALL
      .into_iter()
      .find(|field| field.as_str() == s)
      .ok_or_else(|| ValueObjectError::UnknownField(s.to_string()))
  }
}

impl fmt::Display for DocumentField {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_display_flag_resolution() {
    assert!(DisplayFlag::Unset.resolve(true));
    assert!(!DisplayFlag::Unset.resolve(false));
    assert!(DisplayFlag::On.resolve(false));
    assert!(!DisplayFlag::Off.resolve(true));
  }

  #[test]
  fn test_display_flag_serde() {
    assert_eq!(serde_json::to_value(DisplayFlag::On).unwrap(), serde_json::json!(true));
    assert_eq!(serde_json::to_value(DisplayFlag::Unset).unwrap(), serde_json::Value::Null);
    let flag: DisplayFlag = serde_json::from_str("false").unwrap();
    assert_eq!(flag, DisplayFlag::Off);
    let flag: DisplayFlag = serde_json::from_str("null").unwrap();
    assert_eq!(flag, DisplayFlag::Unset);
  }

  #[test]
  fn test_currency() {
    assert_eq!(Currency::IDR.symbol(), "Rp");
    assert_eq!(Currency::from_str("sgd").unwrap(), Currency::SGD);
    assert!(Currency::from_str("XYZ").is_err());
    assert_eq!(Currency::for_code("XYZ"), Currency::IDR);
    assert_eq!(Currency::for_code("EUR").locale(), "de-DE");
  }

  #[test]
  fn test_logo_alignment() {
    assert_eq!(LogoAlignment::default(), LogoAlignment::Right);
    let alignment: LogoAlignment = serde_json::from_str("\"center\"").unwrap();
    assert_eq!(alignment, LogoAlignment::Center);
    assert!(serde_json::from_str::<LogoAlignment>("\"top\"").is_err());
  }

  #[test]
  fn test_document_field_names() {
    for field in DocumentField::ALL {
      assert_eq!(DocumentField::from_str(field.as_str()).unwrap(), field);
    }
    assert_eq!(
      DocumentField::from_str("invoice_number"),
      Err(ValueObjectError::UnknownField("invoice_number".to_string()))
    );
  }

  #[test]
  fn test_line_item_ids_are_unique() {
    assert_ne!(LineItemId::new(), LineItemId::new());
    assert_eq!(LineItemId::from("1").as_str(), "1");
  }
}
