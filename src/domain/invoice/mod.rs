pub mod entities;
pub mod errors;
pub mod ports;
pub mod services;
pub mod splitter;
pub mod template;
pub mod value_objects;

pub use entities::{
  ExtractedInvoice, ExtractedItem, InvoiceDocument, InvoicePatch, InvoiceTotals, LineItem,
  LineItemPatch, LineItemWarning, TaxSettings, WarningKind,
};
pub use errors::InvoiceError;
pub use ports::{DraftRepository, InvoiceExtractor};
pub use services::{DraftService, DraftServiceConfig, ExtractionStatus};
pub use splitter::InvoiceSplitter;
pub use value_objects::{
  Currency, DisplayFlag, DocumentField, LineItemId, LogoAlignment, ValueObjectError,
};
