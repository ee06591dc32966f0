//! # Blog Shared
//!
//! Wire types for the JSON endpoints: auth DTOs and RFC 7807 error bodies.

pub mod dto;
pub mod response;

pub use response::{ApiResponse, ErrorResponse};
