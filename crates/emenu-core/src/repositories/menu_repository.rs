//! Menu repository trait (port)

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use emenu_shared::Pagination;

use crate::domain::{Menu, MenuDraft, MenuId};
use crate::error::DomainError;
use crate::query::MenuQuery;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MenuRepository: Send + Sync {
    async fn find_by_id(&self, id: MenuId) -> Result<Option<Menu>, DomainError>;
    async fn find_by_name(&self, name: &str) -> Result<Option<Menu>, DomainError>;
    /// All menus, including empty ones, ordered by id.
    async fn list(&self, pagination: Option<Pagination>) -> Result<Vec<Menu>, DomainError>;
    /// Menus with at least one dish that satisfy `query`, in `query` order.
    async fn list_public(&self, query: &MenuQuery, pagination: Option<Pagination>) -> Result<Vec<Menu>, DomainError>;
    /// Inserts the menu and its dish associations atomically.
    async fn create(&self, draft: &MenuDraft, at: DateTime<Utc>) -> Result<Menu, DomainError>;
    /// Replaces fields and associations atomically; `None` when the menu does not exist.
    async fn update(&self, id: MenuId, draft: &MenuDraft, at: DateTime<Utc>) -> Result<Option<Menu>, DomainError>;
    async fn delete(&self, id: MenuId) -> Result<bool, DomainError>;
}
