use actix_web::{HttpRequest, error::JsonPayloadError, web};
use std::sync::Arc;

use crate::application::draft::{
  AddLineItemUseCase, GetDraftUseCase, GetExtractionStatusUseCase, ListCurrenciesUseCase,
  RemoveLineItemUseCase, ReplaceDraftUseCase, ResetDraftUseCase, SmartFillUseCase,
  SplitDraftUseCase, UpdateDraftFieldUseCase, UpdateLineItemUseCase,
};
use crate::domain::invoice::DraftService;

use super::errors::ApiError;
use super::handlers::{currencies, draft, health};

/// Use cases behind the draft API
#[derive(Clone)]
pub struct DraftRouteDependencies {
  pub get_draft_use_case: Arc<GetDraftUseCase>,
  pub replace_draft_use_case: Arc<ReplaceDraftUseCase>,
  pub update_field_use_case: Arc<UpdateDraftFieldUseCase>,
  pub add_line_item_use_case: Arc<AddLineItemUseCase>,
  pub update_line_item_use_case: Arc<UpdateLineItemUseCase>,
  pub remove_line_item_use_case: Arc<RemoveLineItemUseCase>,
  pub reset_draft_use_case: Arc<ResetDraftUseCase>,
  pub split_draft_use_case: Arc<SplitDraftUseCase>,
  pub smart_fill_use_case: Arc<SmartFillUseCase>,
  pub extraction_status_use_case: Arc<GetExtractionStatusUseCase>,
}

impl DraftRouteDependencies {
  /// Build every draft use case on top of one shared service
  pub fn new(draft_service: Arc<DraftService>) -> Self {
    Self {
      get_draft_use_case: Arc::new(GetDraftUseCase::new(draft_service.clone())),
      replace_draft_use_case: Arc::new(ReplaceDraftUseCase::new(draft_service.clone())),
      update_field_use_case: Arc::new(UpdateDraftFieldUseCase::new(draft_service.clone())),
      add_line_item_use_case: Arc::new(AddLineItemUseCase::new(draft_service.clone())),
      update_line_item_use_case: Arc::new(UpdateLineItemUseCase::new(draft_service.clone())),
      remove_line_item_use_case: Arc::new(RemoveLineItemUseCase::new(draft_service.clone())),
      reset_draft_use_case: Arc::new(ResetDraftUseCase::new(draft_service.clone())),
      split_draft_use_case: Arc::new(SplitDraftUseCase::new(draft_service.clone())),
      smart_fill_use_case: Arc::new(SmartFillUseCase::new(draft_service.clone())),
      extraction_status_use_case: Arc::new(GetExtractionStatusUseCase::new(draft_service)),
    }
  }
}

/// Malformed JSON bodies answer with the standard error body
fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
  ApiError::Validation(format!("Invalid request body: {}", err)).into()
}

/// Configure draft editing routes
///
/// Mounts all draft endpoints under the provided scope (e.g., /api/v1/draft).
///
/// # Routes
///
/// - GET / - Current draft with totals and warnings
/// - PUT / - Replace the whole draft
/// - PATCH /fields/{field} - Replace one top-level field
/// - POST /items - Append a line item
/// - PATCH /items/{item_id} - Edit a line item
/// - DELETE /items/{item_id} - Remove a line item
/// - POST /reset - Back to the built-in template
/// - POST /split - One derived invoice per item date
/// - POST /smart-fill - Fill the draft from free-form text
/// - GET /smart-fill/status - Smart fill busy indicator
pub fn configure_draft_routes(cfg: &mut web::ServiceConfig, deps: DraftRouteDependencies) {
  cfg
    .app_data(web::JsonConfig::default().error_handler(json_error_handler))
    .app_data(web::Data::new(deps.get_draft_use_case))
    .app_data(web::Data::new(deps.replace_draft_use_case))
    .app_data(web::Data::new(deps.update_field_use_case))
    .app_data(web::Data::new(deps.add_line_item_use_case))
    .app_data(web::Data::new(deps.update_line_item_use_case))
    .app_data(web::Data::new(deps.remove_line_item_use_case))
    .app_data(web::Data::new(deps.reset_draft_use_case))
    .app_data(web::Data::new(deps.split_draft_use_case))
    .app_data(web::Data::new(deps.smart_fill_use_case))
    .app_data(web::Data::new(deps.extraction_status_use_case))
    .route("", web::get().to(draft::get_draft_handler))
    .route("", web::put().to(draft::replace_draft_handler))
    .route("/fields/{field}", web::patch().to(draft::update_field_handler))
    .route("/items", web::post().to(draft::add_line_item_handler))
    .route("/items/{item_id}", web::patch().to(draft::update_line_item_handler))
    .route("/items/{item_id}", web::delete().to(draft::remove_line_item_handler))
    .route("/reset", web::post().to(draft::reset_draft_handler))
    .route("/split", web::post().to(draft::split_draft_handler))
    .route("/smart-fill", web::post().to(draft::smart_fill_handler))
    .route("/smart-fill/status", web::get().to(draft::extraction_status_handler));
}

/// Configure reference data routes (e.g., under /api/v1)
pub fn configure_reference_routes(cfg: &mut web::ServiceConfig) {
  cfg
    .app_data(web::Data::new(Arc::new(ListCurrenciesUseCase::new())))
    .route("/currencies", web::get().to(currencies::list_currencies_handler));
}

/// Configure the liveness check at the application root
pub fn configure_health_routes(cfg: &mut web::ServiceConfig) {
  cfg.route("/health", web::get().to(health::health_handler));
}
