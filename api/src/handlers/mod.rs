//! Shared response helpers for route handlers

pub mod error;

pub use error::{handle_domain_error, json_error_handler, status_for, validation_error_response};
