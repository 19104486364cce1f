//! Utility functions shared across the service.
//!
//! - [`code_generator`] - Short code generation and alias validation
//! - [`db_error`] - Database error classification
//! - [`url_normalizer`] - URL normalization and sanitization

pub mod code_generator;
pub mod db_error;
pub mod url_normalizer;
