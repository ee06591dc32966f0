//! # Blog Core
//!
//! The domain layer of the blog.
//! Entities, visibility rules, form validation and the request operations
//! live here with zero infrastructure dependencies; storage and
//! authentication are reached through the traits in [`ports`].

pub mod caller;
pub mod domain;
pub mod error;
pub mod forms;
pub mod ports;
pub mod query;
pub mod service;
pub mod view;

pub use caller::{AuthenticatedUser, Caller};
pub use error::RepoError;
pub use service::BlogService;
pub use view::{Page, PageContext, Route, ViewOutcome};
