//! # eMenu Core
//! 
//! Domain entities, the menu query layer, services, and repository traits.

pub mod domain;
pub mod query;
pub mod services;
pub mod repositories;
pub mod error;

// Re-export domain entities
pub use domain::*;
pub use error::DomainError;
pub use query::{MenuQuery, QueryError};
