//! Infrastructure layer
//!
//! Configuration and the concrete implementations of the domain ports.

pub mod config;
pub mod extraction;
pub mod persistence;
