//! Application layer
//!
//! This layer contains use cases that orchestrate domain logic to implement
//! application-specific workflows. Use cases coordinate the draft service
//! and shape its snapshots for the adapters.

pub mod draft;
