//! Shared types for the storefront
//!
//! Error types, API response structures and the JSON wire models of the
//! shipping and checkout endpoints.

pub mod error;
pub mod models;
