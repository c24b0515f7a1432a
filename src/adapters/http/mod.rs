pub mod dtos;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod routes;

// Re-export commonly used types
pub use dtos::{
  ErrorResponse, HealthResponse, LineItemRequest, SmartFillRequest, UpdateFieldRequest,
};
pub use errors::ApiError;
pub use middleware::{RequestId, RequestIdMiddleware};
pub use routes::{
  DraftRouteDependencies, configure_draft_routes, configure_health_routes,
  configure_reference_routes,
};
