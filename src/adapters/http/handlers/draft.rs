use actix_web::{HttpResponse, web};
use std::sync::Arc;
use validator::Validate;

use crate::adapters::http::{
  dtos::{LineItemRequest, SmartFillRequest, UpdateFieldRequest},
  errors::ApiError,
};
use crate::application::draft::{
  AddLineItemCommand, AddLineItemUseCase, GetDraftUseCase, GetExtractionStatusUseCase,
  RemoveLineItemCommand, RemoveLineItemUseCase, ReplaceDraftCommand, ReplaceDraftUseCase,
  ResetDraftUseCase, SmartFillCommand, SmartFillUseCase, SplitDraftUseCase,
  UpdateDraftFieldCommand, UpdateDraftFieldUseCase, UpdateLineItemCommand, UpdateLineItemUseCase,
};
use crate::domain::invoice::{InvoiceDocument, LineItemPatch};

impl From<LineItemRequest> for LineItemPatch {
  fn from(request: LineItemRequest) -> Self {
    LineItemPatch {
      date: request.date,
      description: request.description,
      quantity: request.quantity,
      unit: request.unit,
      rate: request.rate,
    }
  }
}

/// Handler for reading the live draft
///
/// GET /api/v1/draft
/// Response: DraftResponse (JSON)
pub async fn get_draft_handler(
  use_case: web::Data<Arc<GetDraftUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let response = use_case.execute().await?;
  Ok(HttpResponse::Ok().json(response))
}

/// Handler for replacing the whole draft
///
/// PUT /api/v1/draft
/// Body: InvoiceDocument (JSON)
pub async fn replace_draft_handler(
  request: web::Json<InvoiceDocument>,
  use_case: web::Data<Arc<ReplaceDraftUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let command = ReplaceDraftCommand {
    invoice: request.into_inner(),
  };
  let response = use_case.execute(command).await?;
  Ok(HttpResponse::Ok().json(response))
}

/// Handler for replacing one draft field
///
/// PATCH /api/v1/draft/fields/{field}
/// Body: {"value": ...}
pub async fn update_field_handler(
  path: web::Path<String>,
  request: web::Json<UpdateFieldRequest>,
  use_case: web::Data<Arc<UpdateDraftFieldUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let command = UpdateDraftFieldCommand {
    field: path.into_inner(),
    value: request.into_inner().value,
  };
  let response = use_case.execute(command).await?;
  Ok(HttpResponse::Ok().json(response))
}

/// Handler for appending a line item
///
/// POST /api/v1/draft/items
/// Body: optional LineItemRequest (JSON); an empty body adds a blank row
/// Response: DraftResponse (JSON) with status 201
pub async fn add_line_item_handler(
  body: web::Bytes,
  use_case: web::Data<Arc<AddLineItemUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let request: LineItemRequest = if body.iter().all(u8::is_ascii_whitespace) {
    LineItemRequest::default()
  } else {
    serde_json::from_slice(&body)
      .map_err(|e| ApiError::Validation(format!("Invalid request body: {}", e)))?
  };
  request.validate()?;

  let command = AddLineItemCommand {
    date: request.date,
    description: request.description,
    quantity: request.quantity,
    unit: request.unit,
    rate: request.rate,
  };
  let response = use_case.execute(command).await?;
  Ok(HttpResponse::Created().json(response))
}

/// Handler for editing a line item
///
/// PATCH /api/v1/draft/items/{item_id}
/// Body: LineItemRequest (JSON), only present fields change
pub async fn update_line_item_handler(
  path: web::Path<String>,
  request: web::Json<LineItemRequest>,
  use_case: web::Data<Arc<UpdateLineItemUseCase>>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;

  let command = UpdateLineItemCommand {
    item_id: path.into_inner(),
    patch: request.into_inner().into(),
  };
  let response = use_case.execute(command).await?;
  Ok(HttpResponse::Ok().json(response))
}

/// Handler for removing a line item
///
/// DELETE /api/v1/draft/items/{item_id}
pub async fn remove_line_item_handler(
  path: web::Path<String>,
  use_case: web::Data<Arc<RemoveLineItemUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let command = RemoveLineItemCommand {
    item_id: path.into_inner(),
  };
  let response = use_case.execute(command).await?;
  Ok(HttpResponse::Ok().json(response))
}

/// Handler for resetting the draft to the template
///
/// POST /api/v1/draft/reset
pub async fn reset_draft_handler(
  use_case: web::Data<Arc<ResetDraftUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let response = use_case.execute().await?;
  Ok(HttpResponse::Ok().json(response))
}

/// Handler for splitting the draft by item date
///
/// POST /api/v1/draft/split
/// Response: SplitDraftResponse (JSON); 422 when there is nothing to split
pub async fn split_draft_handler(
  use_case: web::Data<Arc<SplitDraftUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let response = use_case.execute().await?;
  Ok(HttpResponse::Ok().json(response))
}

/// Handler for smart fill
///
/// POST /api/v1/draft/smart-fill
/// Body: SmartFillRequest (JSON)
/// Response: DraftResponse (JSON); 409 while another fill is running
pub async fn smart_fill_handler(
  request: web::Json<SmartFillRequest>,
  use_case: web::Data<Arc<SmartFillUseCase>>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;

  let command = SmartFillCommand {
    text: request.into_inner().text,
  };
  let response = use_case.execute(command).await?;
  Ok(HttpResponse::Ok().json(response))
}

/// Handler for the smart fill busy indicator
///
/// GET /api/v1/draft/smart-fill/status
pub async fn extraction_status_handler(
  use_case: web::Data<Arc<GetExtractionStatusUseCase>>,
) -> HttpResponse {
  HttpResponse::Ok().json(use_case.execute().await)
}
