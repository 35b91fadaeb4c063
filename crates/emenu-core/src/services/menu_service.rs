//! Menu CRUD plus the public, read-only listing.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use emenu_shared::Pagination;
use tracing::{debug, info, warn};

use crate::domain::{Dish, DishId, Menu, MenuChanges, MenuDetail, MenuDraft, MenuId};
use crate::error::DomainError;
use crate::query::MenuQuery;
use crate::repositories::{DishRepository, MenuRepository};

pub struct MenuService {
    menus: Arc<dyn MenuRepository>,
    dishes: Arc<dyn DishRepository>,
}

impl MenuService {
    pub fn new(menus: Arc<dyn MenuRepository>, dishes: Arc<dyn DishRepository>) -> Self {
        Self { menus, dishes }
    }

    /// Non-empty menus matching `query`, in query order, with dishes resolved.
    pub async fn list_public(
        &self,
        query: &MenuQuery,
        pagination: Option<Pagination>,
    ) -> Result<Vec<MenuDetail>, DomainError> {
        let menus = self.menus.list_public(query, pagination).await?;
        debug!("Public menu listing returned {} menus", menus.len());
        self.resolve_all(menus).await
    }

    pub async fn list_private(&self, pagination: Option<Pagination>) -> Result<Vec<Menu>, DomainError> {
        self.menus.list(pagination).await
    }

    /// Any menu by id, empty ones included.
    pub async fn get_detail(&self, id: MenuId) -> Result<MenuDetail, DomainError> {
        let menu = self.get(id).await?;
        let mut details = self.resolve_all(vec![menu]).await?;
        details.pop().ok_or(DomainError::MenuNotFound(id))
    }

    pub async fn get(&self, id: MenuId) -> Result<Menu, DomainError> {
        self.menus
            .find_by_id(id)
            .await?
            .ok_or(DomainError::MenuNotFound(id))
    }

    pub async fn create(&self, draft: MenuDraft) -> Result<Menu, DomainError> {
        self.ensure_name_available(&draft.name, None).await?;
        self.ensure_dishes_exist(&draft.dish_ids).await?;
        let menu = self.menus.create(&draft, Utc::now()).await?;
        info!("Menu created: {} ({}, {} dishes)", menu.name, menu.id, menu.dish_count());
        Ok(menu)
    }

    pub async fn replace(&self, id: MenuId, draft: MenuDraft) -> Result<Menu, DomainError> {
        self.get(id).await?;
        self.ensure_name_available(&draft.name, Some(id)).await?;
        self.ensure_dishes_exist(&draft.dish_ids).await?;
        let menu = self
            .menus
            .update(id, &draft, Utc::now())
            .await?
            .ok_or(DomainError::MenuNotFound(id))?;
        info!("Menu updated: {} ({})", menu.name, menu.id);
        Ok(menu)
    }

    pub async fn patch(&self, id: MenuId, changes: MenuChanges) -> Result<Menu, DomainError> {
        let current = self.get(id).await?;
        let draft = current.to_draft().apply(changes)?;
        self.replace(id, draft).await
    }

    pub async fn delete(&self, id: MenuId) -> Result<(), DomainError> {
        if !self.menus.delete(id).await? {
            return Err(DomainError::MenuNotFound(id));
        }
        info!("Menu deleted: {}", id);
        Ok(())
    }

    async fn resolve_all(&self, menus: Vec<Menu>) -> Result<Vec<MenuDetail>, DomainError> {
        let mut ids: Vec<DishId> = menus.iter().flat_map(|m| m.dish_ids.iter().copied()).collect();
        ids.sort_unstable();
        ids.dedup();

        let by_id: HashMap<DishId, Dish> = if ids.is_empty() {
            HashMap::new()
        } else {
            self.dishes
                .find_by_ids(&ids)
                .await?
                .into_iter()
                .map(|d| (d.id, d))
                .collect()
        };

        Ok(menus
            .into_iter()
            .map(|menu| {
                let dishes = menu
                    .dish_ids
                    .iter()
                    .filter_map(|id| by_id.get(id).cloned())
                    .collect();
                MenuDetail { menu, dishes }
            })
            .collect())
    }

    async fn ensure_name_available(&self, name: &str, own_id: Option<MenuId>) -> Result<(), DomainError> {
        match self.menus.find_by_name(name).await? {
            Some(existing) if Some(existing.id) != own_id => {
                warn!("Menu name already taken: {}", name);
                Err(DomainError::MenuNameAlreadyExists(name.to_string()))
            }
            _ => Ok(()),
        }
    }

    async fn ensure_dishes_exist(&self, ids: &[DishId]) -> Result<(), DomainError> {
        if ids.is_empty() {
            return Ok(());
        }
        let found: Vec<DishId> = self.dishes.find_by_ids(ids).await?.iter().map(|d| d.id).collect();
        let missing: Vec<DishId> = ids.iter().copied().filter(|id| !found.contains(id)).collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(DomainError::UnknownDishes(missing))
        }
    }
}
