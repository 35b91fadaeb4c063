// ============================================================================
// eMenu Core - Menu Entity
// File: crates/emenu-core/src/domain/menu.rs
// Description: Named collection of dishes offered together
// ============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use emenu_shared::constants::MENU_NAME_MAX_LENGTH;

use super::dish::{Dish, DishId};

pub type MenuId = i64;

/// Persisted menu with its dish associations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Menu {
    pub id: MenuId,
    pub name: String,
    pub description: String,
    /// Associated dishes, sorted ascending, no duplicates.
    pub dish_ids: Vec<DishId>,

    // Audit fields
    pub date_added: DateTime<Utc>,
    pub date_modified: DateTime<Utc>,
}

impl Menu {
    pub fn dish_count(&self) -> usize {
        self.dish_ids.len()
    }

    /// Empty menus exist in storage but never show up in public listings.
    pub fn is_empty(&self) -> bool {
        self.dish_ids.is_empty()
    }

    pub fn to_draft(&self) -> MenuDraft {
        MenuDraft {
            name: self.name.clone(),
            description: self.description.clone(),
            dish_ids: self.dish_ids.clone(),
        }
    }
}

/// Menu together with its resolved dish records.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuDetail {
    pub menu: Menu,
    pub dishes: Vec<Dish>,
}

/// Validated, user-editable menu fields.
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct MenuDraft {
    #[validate(length(min = 1, max = MENU_NAME_MAX_LENGTH, message = "Menu name must be between 1 and 100 characters"))]
    pub name: String,

    pub description: String,

    pub dish_ids: Vec<DishId>,
}

impl MenuDraft {
    pub fn new(
        name: String,
        description: String,
        dish_ids: Vec<DishId>,
    ) -> Result<Self, validator::ValidationErrors> {
        let draft = Self {
            name: name.trim().to_string(),
            description,
            dish_ids: canonical_ids(dish_ids),
        };
        draft.validate()?;
        Ok(draft)
    }

    pub fn apply(self, changes: MenuChanges) -> Result<Self, validator::ValidationErrors> {
        Self::new(
            changes.name.unwrap_or(self.name),
            changes.description.unwrap_or(self.description),
            changes.dish_ids.unwrap_or(self.dish_ids),
        )
    }
}

/// Partial update; `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MenuChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub dish_ids: Option<Vec<DishId>>,
}

/// Association is a set: order is irrelevant and duplicates collapse.
fn canonical_ids(mut ids: Vec<DishId>) -> Vec<DishId> {
    ids.sort_unstable();
    ids.dedup();
    ids
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_menu_draft_dedups_dishes() {
        let draft = MenuDraft::new(
            " October Menu ".to_string(),
            "Autumn specials".to_string(),
            vec![3, 1, 3, 2],
        )
        .unwrap();
        assert_eq!(draft.name, "October Menu");
        assert_eq!(draft.dish_ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_menu_name_too_long() {
        let result = MenuDraft::new("x".repeat(101), String::new(), vec![]);
        assert!(result.unwrap_err().field_errors().contains_key("name"));
    }

    #[test]
    fn test_apply_rename_only() {
        let draft = MenuDraft::new("October Menu".to_string(), String::new(), vec![1]).unwrap();
        let renamed = draft
            .apply(MenuChanges {
                name: Some("OctoberFEST Menu".to_string()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(renamed.name, "OctoberFEST Menu");
        assert_eq!(renamed.dish_ids, vec![1]);
    }
}
