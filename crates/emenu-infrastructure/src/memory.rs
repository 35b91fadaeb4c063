//! In-process store implementing every repository port.
//!
//! Mirrors the PostgreSQL adapters: unique names, cascading dish deletes,
//! and the same listing order. Used by tests and by `serve --in-memory`.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use emenu_core::domain::{Dish, DishDraft, DishId, Menu, MenuDraft, MenuId, NewUser, User, UserId};
use emenu_core::error::DomainError;
use emenu_core::query::MenuQuery;
use emenu_core::repositories::{DishRepository, MenuRepository, UserRepository};
use emenu_shared::Pagination;

#[derive(Default)]
struct State {
    dishes: BTreeMap<DishId, Dish>,
    menus: BTreeMap<MenuId, Menu>,
    users: BTreeMap<UserId, User>,
    next_dish_id: DishId,
    next_menu_id: MenuId,
    next_user_id: UserId,
}

fn next(counter: &mut i64) -> i64 {
    *counter += 1;
    *counter
}

fn paginate<T>(items: Vec<T>, pagination: Option<Pagination>) -> Vec<T> {
    match pagination {
        Some(p) => p.apply(items),
        None => items,
    }
}

#[derive(Default)]
pub struct InMemoryStore {
    state: RwLock<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl State {
    fn dish_name_taken(&self, name: &str, own_id: Option<DishId>) -> bool {
        self.dishes.values().any(|d| d.name == name && Some(d.id) != own_id)
    }

    fn menu_name_taken(&self, name: &str, own_id: Option<MenuId>) -> bool {
        self.menus.values().any(|m| m.name == name && Some(m.id) != own_id)
    }

    fn check_dishes(&self, ids: &[DishId]) -> Result<(), DomainError> {
        let missing: Vec<DishId> = ids.iter().copied().filter(|id| !self.dishes.contains_key(id)).collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(DomainError::UnknownDishes(missing))
        }
    }
}

#[async_trait]
impl DishRepository for InMemoryStore {
    async fn find_by_id(&self, id: DishId) -> Result<Option<Dish>, DomainError> {
        Ok(self.state.read().await.dishes.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Dish>, DomainError> {
        let state = self.state.read().await;
        Ok(state.dishes.values().find(|d| d.name == name).cloned())
    }

    async fn find_by_ids(&self, ids: &[DishId]) -> Result<Vec<Dish>, DomainError> {
        let state = self.state.read().await;
        Ok(state.dishes.values().filter(|d| ids.contains(&d.id)).cloned().collect())
    }

    async fn list(&self, pagination: Option<Pagination>) -> Result<Vec<Dish>, DomainError> {
        let state = self.state.read().await;
        Ok(paginate(state.dishes.values().cloned().collect(), pagination))
    }

    async fn create(&self, draft: &DishDraft, at: DateTime<Utc>) -> Result<Dish, DomainError> {
        let mut state = self.state.write().await;
        if state.dish_name_taken(&draft.name, None) {
            return Err(DomainError::DishNameAlreadyExists(draft.name.clone()));
        }
        let dish = Dish {
            id: next(&mut state.next_dish_id),
            name: draft.name.clone(),
            description: draft.description.clone(),
            price: draft.price,
            preparation_time: draft.preparation_time,
            is_vegan: draft.is_vegan,
            date_added: at,
            date_modified: at,
        };
        state.dishes.insert(dish.id, dish.clone());
        Ok(dish)
    }

    async fn update(&self, id: DishId, draft: &DishDraft, at: DateTime<Utc>) -> Result<Option<Dish>, DomainError> {
        let mut state = self.state.write().await;
        if state.dish_name_taken(&draft.name, Some(id)) {
            return Err(DomainError::DishNameAlreadyExists(draft.name.clone()));
        }
        let Some(dish) = state.dishes.get_mut(&id) else {
            return Ok(None);
        };
        dish.name = draft.name.clone();
        dish.description = draft.description.clone();
        dish.price = draft.price;
        dish.preparation_time = draft.preparation_time;
        dish.is_vegan = draft.is_vegan;
        dish.date_modified = at;
        Ok(Some(dish.clone()))
    }

    async fn delete(&self, id: DishId) -> Result<bool, DomainError> {
        let mut state = self.state.write().await;
        if state.dishes.remove(&id).is_none() {
            return Ok(false);
        }
        for menu in state.menus.values_mut() {
            menu.dish_ids.retain(|d| *d != id);
        }
        Ok(true)
    }

    async fn added_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Dish>, DomainError> {
        let state = self.state.read().await;
        Ok(state
            .dishes
            .values()
            .filter(|d| d.date_added >= start && d.date_added < end)
            .cloned()
            .collect())
    }

    async fn modified_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Dish>, DomainError> {
        let state = self.state.read().await;
        Ok(state
            .dishes
            .values()
            .filter(|d| d.date_modified >= start && d.date_modified < end)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl MenuRepository for InMemoryStore {
    async fn find_by_id(&self, id: MenuId) -> Result<Option<Menu>, DomainError> {
        Ok(self.state.read().await.menus.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Menu>, DomainError> {
        let state = self.state.read().await;
        Ok(state.menus.values().find(|m| m.name == name).cloned())
    }

    async fn list(&self, pagination: Option<Pagination>) -> Result<Vec<Menu>, DomainError> {
        let state = self.state.read().await;
        Ok(paginate(state.menus.values().cloned().collect(), pagination))
    }

    async fn list_public(&self, query: &MenuQuery, pagination: Option<Pagination>) -> Result<Vec<Menu>, DomainError> {
        let state = self.state.read().await;
        let mut menus: Vec<Menu> = state
            .menus
            .values()
            .filter(|m| !m.is_empty() && query.matches(m))
            .cloned()
            .collect();
        query.sort(&mut menus);
        Ok(paginate(menus, pagination))
    }

    async fn create(&self, draft: &MenuDraft, at: DateTime<Utc>) -> Result<Menu, DomainError> {
        let mut state = self.state.write().await;
        if state.menu_name_taken(&draft.name, None) {
            return Err(DomainError::MenuNameAlreadyExists(draft.name.clone()));
        }
        state.check_dishes(&draft.dish_ids)?;
        let menu = Menu {
            id: next(&mut state.next_menu_id),
            name: draft.name.clone(),
            description: draft.description.clone(),
            dish_ids: draft.dish_ids.clone(),
            date_added: at,
            date_modified: at,
        };
        state.menus.insert(menu.id, menu.clone());
        Ok(menu)
    }

    async fn update(&self, id: MenuId, draft: &MenuDraft, at: DateTime<Utc>) -> Result<Option<Menu>, DomainError> {
        let mut state = self.state.write().await;
        if state.menu_name_taken(&draft.name, Some(id)) {
            return Err(DomainError::MenuNameAlreadyExists(draft.name.clone()));
        }
        state.check_dishes(&draft.dish_ids)?;
        let Some(menu) = state.menus.get_mut(&id) else {
            return Ok(None);
        };
        menu.name = draft.name.clone();
        menu.description = draft.description.clone();
        menu.dish_ids = draft.dish_ids.clone();
        menu.date_modified = at;
        Ok(Some(menu.clone()))
    }

    async fn delete(&self, id: MenuId) -> Result<bool, DomainError> {
        Ok(self.state.write().await.menus.remove(&id).is_some())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, DomainError> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let state = self.state.read().await;
        Ok(state.users.values().find(|u| u.username == username).cloned())
    }

    async fn list_all(&self) -> Result<Vec<User>, DomainError> {
        Ok(self.state.read().await.users.values().cloned().collect())
    }

    async fn create(&self, user: &NewUser) -> Result<User, DomainError> {
        let mut state = self.state.write().await;
        if state.users.values().any(|u| u.username == user.username) {
            return Err(DomainError::UsernameAlreadyExists(user.username.clone()));
        }
        let user = User {
            id: next(&mut state.next_user_id),
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            is_active: true,
            date_joined: Utc::now(),
        };
        state.users.insert(user.id, user.clone());
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration as ChronoDuration, TimeZone};
    use rust_decimal::Decimal;
    use std::time::Duration;

    fn dish_draft(name: &str) -> DishDraft {
        DishDraft::new(
            name.to_string(),
            String::new(),
            Decimal::new(1500, 2),
            Duration::from_secs(900),
            false,
        )
        .unwrap()
    }

    fn menu_draft(name: &str, dish_ids: Vec<DishId>) -> MenuDraft {
        MenuDraft::new(name.to_string(), String::new(), dish_ids).unwrap()
    }

    #[tokio::test]
    async fn test_dish_delete_cascades_to_menus() {
        let store = InMemoryStore::new();
        let now = Utc::now();
        let a = DishRepository::create(&store, &dish_draft("Soup"), now).await.unwrap();
        let b = DishRepository::create(&store, &dish_draft("Salad"), now).await.unwrap();
        let menu = MenuRepository::create(&store, &menu_draft("Lunch", vec![a.id, b.id]), now)
            .await
            .unwrap();

        assert!(DishRepository::delete(&store, a.id).await.unwrap());
        let menu = MenuRepository::find_by_id(&store, menu.id).await.unwrap().unwrap();
        assert_eq!(menu.dish_ids, vec![b.id]);
    }

    #[tokio::test]
    async fn test_unique_names() {
        let store = InMemoryStore::new();
        let now = Utc::now();
        DishRepository::create(&store, &dish_draft("Soup"), now).await.unwrap();
        let err = DishRepository::create(&store, &dish_draft("Soup"), now).await.unwrap_err();
        assert!(matches!(err, DomainError::DishNameAlreadyExists(_)));

        MenuRepository::create(&store, &menu_draft("Lunch", vec![]), now).await.unwrap();
        let err = MenuRepository::create(&store, &menu_draft("Lunch", vec![]), now)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::MenuNameAlreadyExists(_)));
    }

    #[tokio::test]
    async fn test_list_public_hides_empty_menus() {
        let store = InMemoryStore::new();
        let now = Utc::now();
        let soup = DishRepository::create(&store, &dish_draft("Soup"), now).await.unwrap();
        MenuRepository::create(&store, &menu_draft("Empty", vec![]), now).await.unwrap();
        MenuRepository::create(&store, &menu_draft("Lunch", vec![soup.id]), now).await.unwrap();

        let public = store.list_public(&MenuQuery::default(), None).await.unwrap();
        assert_eq!(public.iter().map(|m| m.name.as_str()).collect::<Vec<_>>(), vec!["Lunch"]);

        let all = MenuRepository::list(&store, None).await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_change_windows_are_half_open() {
        let store = InMemoryStore::new();
        let start = Utc.with_ymd_and_hms(2021, 9, 11, 0, 0, 0).unwrap();
        let end = start + ChronoDuration::days(1);
        DishRepository::create(&store, &dish_draft("At start"), start).await.unwrap();
        DishRepository::create(&store, &dish_draft("At end"), end).await.unwrap();

        let added = store.added_between(start, end).await.unwrap();
        assert_eq!(added.len(), 1);
        assert_eq!(added[0].name, "At start");
    }
}
