pub mod add_line_item;
pub mod draft_response;
pub mod get_draft;
pub mod get_extraction_status;
pub mod list_currencies;
pub mod remove_line_item;
pub mod replace_draft;
pub mod reset_draft;
pub mod smart_fill;
pub mod split_draft;
pub mod update_draft_field;
pub mod update_line_item;

pub use add_line_item::{AddLineItemCommand, AddLineItemUseCase};
pub use draft_response::{DisplayDto, DraftResponse, LineAmountDto};
pub use get_draft::GetDraftUseCase;
pub use get_extraction_status::GetExtractionStatusUseCase;
pub use list_currencies::{CurrencyDto, ListCurrenciesUseCase};
pub use remove_line_item::{RemoveLineItemCommand, RemoveLineItemUseCase};
pub use replace_draft::{ReplaceDraftCommand, ReplaceDraftUseCase};
pub use reset_draft::ResetDraftUseCase;
pub use smart_fill::{SmartFillCommand, SmartFillUseCase};
pub use split_draft::{SplitDraftResponse, SplitDraftUseCase};
pub use update_draft_field::{UpdateDraftFieldCommand, UpdateDraftFieldUseCase};
pub use update_line_item::{UpdateLineItemCommand, UpdateLineItemUseCase};
