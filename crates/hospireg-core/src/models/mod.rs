//! Data models for the application
//!
//! `document` holds the closed set of document categories, `registration` the
//! persisted record and its wire-level request/response shapes.

mod document;
mod registration;

pub use document::*;
pub use registration::*;
