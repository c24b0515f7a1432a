use actix_web::{HttpResponse, web};
use std::sync::Arc;

use crate::application::draft::ListCurrenciesUseCase;

/// Handler for the supported currency list
///
/// GET /api/v1/currencies
pub async fn list_currencies_handler(
  use_case: web::Data<Arc<ListCurrenciesUseCase>>,
) -> HttpResponse {
  HttpResponse::Ok().json(use_case.execute())
}
