use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;

use super::errors::InvoiceError;
use super::value_objects::{DisplayFlag, DocumentField, LineItemId, LogoAlignment};

/// Longest description the editor accepts for a line item.
pub const MAX_DESCRIPTION_CHARS: usize = 300;

/// Unit assigned to items that arrive without one.
pub const DEFAULT_UNIT: &str = "pcs";

fn default_unit() -> String {
  DEFAULT_UNIT.to_string()
}

fn default_logo_background() -> String {
  "transparent".to_string()
}

// Line Item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
  pub id: LineItemId,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub date: Option<String>,
  #[serde(default)]
  pub description: String,
  pub quantity: Decimal,
  #[serde(default = "default_unit")]
  pub unit: String,
  pub rate: Decimal,
}

impl LineItem {
  pub fn new(description: String, quantity: Decimal, unit: String, rate: Decimal) -> Self {
    Self {
      id: LineItemId::new(),
      date: None,
      description,
      quantity,
      unit,
      rate,
    }
  }

  /// The row the editor appends when the user adds an item.
  pub fn blank() -> Self {
    Self::new("New Item".to_string(), Decimal::ONE, default_unit(), Decimal::ZERO)
  }

  pub fn with_date(mut self, date: impl Into<String>) -> Self {
    let date = date.into();
    self.date = if date.is_empty() { None } else { Some(date) };
    self
  }

  /// quantity × rate; saturates instead of overflowing.
  pub fn amount(&self) -> Decimal {
    self.quantity.saturating_mul(self.rate)
  }

  /// The item's own date when set, otherwise `fallback` (the invoice date).
  pub fn effective_date<'a>(&'a self, fallback: &'a str) -> &'a str {
    match self.date.as_deref() {
      Some(date) if !date.is_empty() => date,
      _ => fallback,
    }
  }

  pub fn warnings(&self) -> Vec<LineItemWarning> {
    let mut warnings = Vec::new();
    if self.quantity.is_sign_negative() && !self.quantity.is_zero() {
      warnings.push(LineItemWarning::new(&self.id, WarningKind::NegativeQuantity));
    }
    if self.rate.is_sign_negative() && !self.rate.is_zero() {
      warnings.push(LineItemWarning::new(&self.id, WarningKind::NegativeRate));
    }
    if self.description.chars().count() > MAX_DESCRIPTION_CHARS {
      warnings.push(LineItemWarning::new(&self.id, WarningKind::DescriptionTooLong));
    }
    warnings
  }

  pub fn patched(&self, patch: LineItemPatch) -> Self {
    let mut item = self.clone();
    if let Some(date) = patch.date {
      item = item.with_date(date);
    }
    if let Some(description) = patch.description {
      item.description = description;
    }
    if let Some(quantity) = patch.quantity {
      item.quantity = quantity;
    }
    if let Some(unit) = patch.unit {
      item.unit = unit;
    }
    if let Some(rate) = patch.rate {
      item.rate = rate;
    }
    item
  }
}

/// Field-level replacement for one line item. An empty `date` clears it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemPatch {
  pub date: Option<String>,
  pub description: Option<String>,
  pub quantity: Option<Decimal>,
  pub unit: Option<String>,
  pub rate: Option<Decimal>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
  NegativeQuantity,
  NegativeRate,
  DescriptionTooLong,
}

/// Soft validation hint for the editing surface; never blocks a mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemWarning {
  pub item_id: LineItemId,
  pub kind: WarningKind,
}

impl LineItemWarning {
  fn new(item_id: &LineItemId, kind: WarningKind) -> Self {
    Self {
      item_id: item_id.clone(),
      kind,
    }
  }
}

// Invoice Document - the draft bound to the editor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDocument {
  pub invoice_number: String,
  pub date: String,
  pub due_date: String,
  pub sender_name: String,
  #[serde(default)]
  pub sender_email: String,
  pub sender_address: String,
  pub client_name: String,
  #[serde(default)]
  pub client_email: String,
  pub client_address: String,
  pub currency: String,
  pub tax_rate: Decimal,
  #[serde(default, skip_serializing_if = "DisplayFlag::is_unset")]
  pub show_item_dates: DisplayFlag,
  #[serde(default, skip_serializing_if = "DisplayFlag::is_unset")]
  pub show_tax: DisplayFlag,
  #[serde(default, skip_serializing_if = "DisplayFlag::is_unset")]
  pub show_due_date: DisplayFlag,
  #[serde(default, skip_serializing_if = "DisplayFlag::is_unset")]
  pub show_name_with_logo: DisplayFlag,
  #[serde(default)]
  pub notes: String,
  #[serde(default)]
  pub terms: String,
  #[serde(default)]
  pub logo_image: String,
  #[serde(default)]
  pub logo_alignment: LogoAlignment,
  #[serde(default = "default_logo_background")]
  pub logo_background_color: String,
  pub items: Vec<LineItem>,
}

impl InvoiceDocument {
  pub fn shows_item_dates(&self) -> bool {
    self.show_item_dates.resolve(true)
  }

  pub fn shows_tax(&self) -> bool {
    self.show_tax.resolve(true)
  }

  pub fn shows_due_date(&self) -> bool {
    self.show_due_date.resolve(true)
  }

  pub fn shows_name_with_logo(&self) -> bool {
    self.show_name_with_logo.resolve(false)
  }

  pub fn tax_settings(&self) -> TaxSettings {
    TaxSettings {
      enabled: self.shows_tax(),
      rate: self.tax_rate,
    }
  }

  pub fn totals(&self) -> InvoiceTotals {
    InvoiceTotals::calculate(&self.items, self.tax_settings())
  }

  pub fn warnings(&self) -> Vec<LineItemWarning> {
    self.items.iter().flat_map(LineItem::warnings).collect()
  }

  pub fn find_item(&self, id: &LineItemId) -> Option<&LineItem> {
    self.items.iter().find(|item| &item.id == id)
  }

  /// Copy of the document with one top-level field replaced.
  ///
  /// Only `value` is decoded, into the field's own type; `null` clears a
  /// display flag. Every other field is carried over untouched.
  pub fn with_field(&self, field: DocumentField, value: Value) -> Result<Self, InvoiceError> {
    let mut next = self.clone();
    match field {
      DocumentField::InvoiceNumber => next.invoice_number = decode_field(field, value)?,
      DocumentField::Date => next.date = decode_field(field, value)?,
      DocumentField::DueDate => next.due_date = decode_field(field, value)?,
      DocumentField::SenderName => next.sender_name = decode_field(field, value)?,
      DocumentField::SenderEmail => next.sender_email = decode_field(field, value)?,
      DocumentField::SenderAddress => next.sender_address = decode_field(field, value)?,
      DocumentField::ClientName => next.client_name = decode_field(field, value)?,
      DocumentField::ClientEmail => next.client_email = decode_field(field, value)?,
      DocumentField::ClientAddress => next.client_address = decode_field(field, value)?,
      DocumentField::Currency => next.currency = decode_field(field, value)?,
      DocumentField::TaxRate => next.tax_rate = decode_field(field, value)?,
      DocumentField::ShowItemDates => next.show_item_dates = decode_field(field, value)?,
      DocumentField::ShowTax => next.show_tax = decode_field(field, value)?,
      DocumentField::ShowDueDate => next.show_due_date = decode_field(field, value)?,
      DocumentField::ShowNameWithLogo => next.show_name_with_logo = decode_field(field, value)?,
      DocumentField::Notes => next.notes = decode_field(field, value)?,
      DocumentField::Terms => next.terms = decode_field(field, value)?,
      DocumentField::LogoImage => next.logo_image = decode_field(field, value)?,
      DocumentField::LogoAlignment => next.logo_alignment = decode_field(field, value)?,
      DocumentField::LogoBackgroundColor => {
        next.logo_background_color = decode_field(field, value)?
      }
      DocumentField::Items => next.items = decode_field(field, value)?,
    }
    Ok(next)
  }

  pub fn with_item_added(&self, item: LineItem) -> Self {
    let mut next = self.clone();
    next.items.push(item);
    next
  }

  pub fn with_item_updated(
    &self,
    id: &LineItemId,
    patch: LineItemPatch,
  ) -> Result<Self, InvoiceError> {
    let position = self.position_of(id)?;
    let mut next = self.clone();
    next.items[position] = self.items[position].patched(patch);
    Ok(next)
  }

  pub fn with_item_removed(&self, id: &LineItemId) -> Result<Self, InvoiceError> {
    let position = self.position_of(id)?;
    let mut next = self.clone();
    next.items.remove(position);
    Ok(next)
  }

  /// Shallow merge of a partial update: every present field replaces the
  /// current one.
  pub fn with_patch(&self, patch: InvoicePatch) -> Self {
    let mut next = self.clone();
    macro_rules! merge {
      ($($field:ident),* $(,)?) => {
        $(if let Some(value) = patch.$field {
          next.$field = value.into();
        })*
      };
    }
    merge!(
      invoice_number,
      date,
      due_date,
      sender_name,
      sender_email,
      sender_address,
      client_name,
      client_email,
      client_address,
      currency,
      tax_rate,
      show_item_dates,
      show_tax,
      show_due_date,
      show_name_with_logo,
      notes,
      terms,
      logo_image,
      logo_alignment,
      logo_background_color,
    );
    next
  }

  /// Merge the output of the text extractor. Items are replaced wholesale, and
  /// only when the extractor returned at least one.
  pub fn with_extracted(&self, extracted: ExtractedInvoice) -> Self {
    let mut next = self.with_patch(extracted.fields);
    let items: Vec<LineItem> = extracted
      .items
      .unwrap_or_default()
      .into_iter()
      .map(ExtractedItem::into_line_item)
      .collect();
    if !items.is_empty() {
      next.items = items;
    }
    next
  }

  fn position_of(&self, id: &LineItemId) -> Result<usize, InvoiceError> {
    self
      .items
      .iter()
      .position(|item| &item.id == id)
      .ok_or_else(|| InvoiceError::LineItemNotFound(id.clone()))
  }
}

fn decode_field<T>(field: DocumentField, value: Value) -> Result<T, InvoiceError>
where
  T: DeserializeOwned,
{
  decode_json(&value).map_err(|e| InvoiceError::InvalidFieldValue {
    field: field.as_str().to_string(),
    reason: e.to_string(),
  })
}

/// Decode through the JSON text. Numbers then reach `Decimal` digit for digit,
/// including integers wider than 64 bits.
pub(crate) fn decode_json<T>(value: &Value) -> Result<T, serde_json::Error>
where
  T: DeserializeOwned,
{
  serde_json::from_str(&value.to_string())
}

/// Partial invoice: every field optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InvoicePatch {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub invoice_number: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub date: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub due_date: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub sender_name: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub sender_email: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub sender_address: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub client_name: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub client_email: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub client_address: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub currency: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub tax_rate: Option<Decimal>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub show_item_dates: Option<bool>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub show_tax: Option<bool>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub show_due_date: Option<bool>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub show_name_with_logo: Option<bool>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub notes: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub terms: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub logo_image: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub logo_alignment: Option<LogoAlignment>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub logo_background_color: Option<String>,
}

/// Result of the free-text extractor: scalar fields plus an optional item list
/// without identifiers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedInvoice {
  #[serde(flatten)]
  pub fields: InvoicePatch,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub items: Option<Vec<ExtractedItem>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedItem {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub date: Option<String>,
  pub description: String,
  pub quantity: Decimal,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub unit: Option<String>,
  pub rate: Decimal,
}

impl ExtractedItem {
  /// Assign a fresh id and fill in the placeholder unit when missing.
  pub fn into_line_item(self) -> LineItem {
    let unit = self
      .unit
      .filter(|unit| !unit.trim().is_empty())
      .unwrap_or_else(default_unit);
    let item = LineItem::new(self.description, self.quantity, unit, self.rate);
    match self.date {
      Some(date) => item.with_date(date),
      None => item,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaxSettings {
  pub enabled: bool,
  /// Percentage, e.g. 11 for 11%.
  pub rate: Decimal,
}

impl TaxSettings {
  pub fn disabled() -> Self {
    Self {
      enabled: false,
      rate: Decimal::ZERO,
    }
  }
}

// Invoice Totals - Calculated, not persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceTotals {
  pub subtotal: Decimal,
  pub tax_amount: Decimal,
  pub total: Decimal,
}

impl InvoiceTotals {
  /// Un-rounded totals of `items` in document order. Defined for every input:
  /// negative quantities or rates reduce the subtotal.
  pub fn calculate(items: &[LineItem], tax: TaxSettings) -> Self {
    let subtotal = items
      .iter()
      .fold(Decimal::ZERO, |acc, item| acc.saturating_add(item.amount()));

    let tax_amount = if tax.enabled {
      subtotal.saturating_mul(tax.rate / Decimal::ONE_HUNDRED)
    } else {
      Decimal::ZERO
    };

    Self {
      subtotal,
      tax_amount,
      total: subtotal.saturating_add(tax_amount),
    }
  }
}
