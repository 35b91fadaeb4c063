//! Dish CRUD

use std::sync::Arc;

use chrono::Utc;
use emenu_shared::Pagination;
use tracing::{info, warn};

use crate::domain::{Dish, DishChanges, DishDraft, DishId};
use crate::error::DomainError;
use crate::repositories::DishRepository;

pub struct DishService {
    dishes: Arc<dyn DishRepository>,
}

impl DishService {
    pub fn new(dishes: Arc<dyn DishRepository>) -> Self {
        Self { dishes }
    }

    pub async fn list(&self, pagination: Option<Pagination>) -> Result<Vec<Dish>, DomainError> {
        self.dishes.list(pagination).await
    }

    pub async fn get(&self, id: DishId) -> Result<Dish, DomainError> {
        self.dishes
            .find_by_id(id)
            .await?
            .ok_or(DomainError::DishNotFound(id))
    }

    pub async fn create(&self, draft: DishDraft) -> Result<Dish, DomainError> {
        self.ensure_name_available(&draft.name, None).await?;
        let dish = self.dishes.create(&draft, Utc::now()).await?;
        info!("Dish created: {} ({})", dish.name, dish.id);
        Ok(dish)
    }

    /// Full update (PUT).
    pub async fn replace(&self, id: DishId, draft: DishDraft) -> Result<Dish, DomainError> {
        self.get(id).await?;
        self.ensure_name_available(&draft.name, Some(id)).await?;
        let dish = self
            .dishes
            .update(id, &draft, Utc::now())
            .await?
            .ok_or(DomainError::DishNotFound(id))?;
        info!("Dish updated: {} ({})", dish.name, dish.id);
        Ok(dish)
    }

    /// Partial update (PATCH).
    pub async fn patch(&self, id: DishId, changes: DishChanges) -> Result<Dish, DomainError> {
        let current = self.get(id).await?;
        let draft = current.to_draft().apply(changes)?;
        self.replace(id, draft).await
    }

    pub async fn delete(&self, id: DishId) -> Result<(), DomainError> {
        if !self.dishes.delete(id).await? {
            return Err(DomainError::DishNotFound(id));
        }
        info!("Dish deleted: {}", id);
        Ok(())
    }

    async fn ensure_name_available(&self, name: &str, own_id: Option<DishId>) -> Result<(), DomainError> {
        match self.dishes.find_by_name(name).await? {
            Some(existing) if Some(existing.id) != own_id => {
                warn!("Dish name already taken: {}", name);
                Err(DomainError::DishNameAlreadyExists(name.to_string()))
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::MockDishRepository;
    use rust_decimal::Decimal;
    use std::time::Duration;

    fn draft(name: &str) -> DishDraft {
        DishDraft::new(
            name.to_string(),
            "A dish made of slowly cooked rice.".to_string(),
            Decimal::new(990, 2),
            Duration::from_secs(35 * 60),
            true,
        )
        .unwrap()
    }

    fn stored(id: DishId, draft: &DishDraft) -> Dish {
        let now = Utc::now();
        Dish {
            id,
            name: draft.name.clone(),
            description: draft.description.clone(),
            price: draft.price,
            preparation_time: draft.preparation_time,
            is_vegan: draft.is_vegan,
            date_added: now,
            date_modified: now,
        }
    }

    #[tokio::test]
    async fn test_create_dish() {
        let mut repo = MockDishRepository::new();
        repo.expect_find_by_name().returning(|_| Ok(None));
        repo.expect_create()
            .times(1)
            .returning(|draft, _| Ok(stored(7, draft)));

        let service = DishService::new(Arc::new(repo));
        let dish = service.create(draft("Risotto")).await.unwrap();
        assert_eq!(dish.id, 7);
        assert_eq!(dish.price.to_string(), "9.90");
    }

    #[tokio::test]
    async fn test_duplicate_name_is_rejected() {
        let existing = stored(1, &draft("Risotto"));
        let mut repo = MockDishRepository::new();
        repo.expect_find_by_name()
            .returning(move |_| Ok(Some(existing.clone())));
        repo.expect_create().never();

        let service = DishService::new(Arc::new(repo));
        let err = service.create(draft("Risotto")).await.unwrap_err();
        assert!(matches!(err, DomainError::DishNameAlreadyExists(_)));
        assert_eq!(err.field(), Some("name"));
    }

    #[tokio::test]
    async fn test_renaming_to_own_name_is_allowed() {
        let existing = stored(3, &draft("Risotto"));
        let found = existing.clone();
        let mut repo = MockDishRepository::new();
        repo.expect_find_by_id()
            .returning(move |_| Ok(Some(found.clone())));
        repo.expect_find_by_name()
            .returning(move |_| Ok(Some(existing.clone())));
        repo.expect_update()
            .returning(|id, draft, _| Ok(Some(stored(id, draft))));

        let service = DishService::new(Arc::new(repo));
        let dish = service
            .patch(3, DishChanges { is_vegan: Some(false), ..Default::default() })
            .await
            .unwrap();
        assert!(!dish.is_vegan);
    }

    #[tokio::test]
    async fn test_delete_missing_dish() {
        let mut repo = MockDishRepository::new();
        repo.expect_delete().returning(|_| Ok(false));

        let service = DishService::new(Arc::new(repo));
        assert!(matches!(service.delete(1).await, Err(DomainError::DishNotFound(1))));
    }
}
