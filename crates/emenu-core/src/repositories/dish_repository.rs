//! Dish repository trait (port)

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use emenu_shared::Pagination;

use crate::domain::{Dish, DishDraft, DishId};
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DishRepository: Send + Sync {
    async fn find_by_id(&self, id: DishId) -> Result<Option<Dish>, DomainError>;
    async fn find_by_name(&self, name: &str) -> Result<Option<Dish>, DomainError>;
    /// Dishes among `ids` that exist, ordered by id.
    async fn find_by_ids(&self, ids: &[DishId]) -> Result<Vec<Dish>, DomainError>;
    /// All dishes ordered by id.
    async fn list(&self, pagination: Option<Pagination>) -> Result<Vec<Dish>, DomainError>;
    /// Stamps both `date_added` and `date_modified` with `at`.
    async fn create(&self, draft: &DishDraft, at: DateTime<Utc>) -> Result<Dish, DomainError>;
    /// Stamps `date_modified` with `at`; `None` when the dish does not exist.
    async fn update(&self, id: DishId, draft: &DishDraft, at: DateTime<Utc>) -> Result<Option<Dish>, DomainError>;
    /// Removes the dish and its menu associations. `false` when nothing was deleted.
    async fn delete(&self, id: DishId) -> Result<bool, DomainError>;
    /// Dishes with `start <= date_added < end`.
    async fn added_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Dish>, DomainError>;
    /// Dishes with `start <= date_modified < end`.
    async fn modified_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Dish>, DomainError>;
}
