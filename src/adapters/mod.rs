//! Adapters layer
//!
//! Inbound adapters that expose the application to the outside world.

pub mod http;
