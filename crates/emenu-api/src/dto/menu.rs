use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use emenu_core::{DishId, DomainError, Menu, MenuChanges, MenuDetail, MenuDraft, MenuId};

use super::dish::DishResponse;

pub fn public_menu_url(id: MenuId) -> String {
    format!("/public/menu/{}/", id)
}

pub fn private_menu_url(id: MenuId) -> String {
    format!("/private/menu/{}/", id)
}

/// Public list entry; dishes by name.
#[derive(Debug, Serialize)]
pub struct PublicMenuSummary {
    pub url: String,
    pub pk: MenuId,
    pub name: String,
    pub description: String,
    pub date_added: DateTime<Utc>,
    pub date_modified: DateTime<Utc>,
    pub dishes: Vec<String>,
}

impl From<MenuDetail> for PublicMenuSummary {
    fn from(detail: MenuDetail) -> Self {
        let MenuDetail { menu, dishes } = detail;
        Self {
            url: public_menu_url(menu.id),
            pk: menu.id,
            name: menu.name,
            description: menu.description,
            date_added: menu.date_added,
            date_modified: menu.date_modified,
            dishes: dishes.into_iter().map(|d| d.name).collect(),
        }
    }
}

/// Public detail; full dish records.
#[derive(Debug, Serialize)]
pub struct PublicMenuDetail {
    pub url: String,
    pub pk: MenuId,
    pub name: String,
    pub description: String,
    pub date_added: DateTime<Utc>,
    pub date_modified: DateTime<Utc>,
    pub dishes: Vec<DishResponse>,
}

impl From<MenuDetail> for PublicMenuDetail {
    fn from(detail: MenuDetail) -> Self {
        let MenuDetail { menu, dishes } = detail;
        Self {
            url: public_menu_url(menu.id),
            pk: menu.id,
            name: menu.name,
            description: menu.description,
            date_added: menu.date_added,
            date_modified: menu.date_modified,
            dishes: dishes.into_iter().map(DishResponse::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PrivateMenuResponse {
    pub url: String,
    pub pk: MenuId,
    pub name: String,
    pub description: String,
    pub date_added: DateTime<Utc>,
    pub date_modified: DateTime<Utc>,
    pub dishes: Vec<DishId>,
}

impl From<Menu> for PrivateMenuResponse {
    fn from(menu: Menu) -> Self {
        Self {
            url: private_menu_url(menu.id),
            pk: menu.id,
            name: menu.name,
            description: menu.description,
            date_added: menu.date_added,
            date_modified: menu.date_modified,
            dishes: menu.dish_ids,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct MenuRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub dishes: Vec<DishId>,
}

impl MenuRequest {
    pub fn into_draft(self) -> Result<MenuDraft, DomainError> {
        Ok(MenuDraft::new(self.name, self.description, self.dishes)?)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct MenuPatchRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub dishes: Option<Vec<DishId>>,
}

impl From<MenuPatchRequest> for MenuChanges {
    fn from(patch: MenuPatchRequest) -> Self {
        MenuChanges {
            name: patch.name,
            description: patch.description,
            dish_ids: patch.dishes,
        }
    }
}
