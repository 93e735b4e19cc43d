//! # Quill Shared
//!
//! Request and response types exchanged with the view layer.

pub mod dto;
pub mod response;

pub use response::{ApiResponse, ErrorResponse};
