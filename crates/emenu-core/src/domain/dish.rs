// ============================================================================
// eMenu Core - Dish Entity
// File: crates/emenu-core/src/domain/dish.rs
// Description: Single menu item with price, preparation time and dietary flag
// ============================================================================

use std::time::Duration;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use emenu_shared::constants::DISH_NAME_MAX_LENGTH;

use super::preparation_time;

pub type DishId = i64;

/// Largest price magnitude that fits NUMERIC(19, 2).
const PRICE_LIMIT: i64 = 100_000_000_000_000_000;

/// Persisted dish.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dish {
    pub id: DishId,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    #[serde(with = "preparation_time")]
    pub preparation_time: Duration,
    pub is_vegan: bool,

    // Audit fields
    pub date_added: DateTime<Utc>,
    pub date_modified: DateTime<Utc>,
}

impl Dish {
    /// Editable fields of this dish, as a starting point for an update.
    pub fn to_draft(&self) -> DishDraft {
        DishDraft {
            name: self.name.clone(),
            description: self.description.clone(),
            price: self.price,
            preparation_time: self.preparation_time,
            is_vegan: self.is_vegan,
        }
    }
}

/// Validated, user-editable dish fields. Timestamps and id are owned by the store.
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct DishDraft {
    #[validate(length(min = 1, max = DISH_NAME_MAX_LENGTH, message = "Dish name must be between 1 and 200 characters"))]
    pub name: String,

    pub description: String,

    #[validate(custom(function = "validate_price"))]
    pub price: Decimal,

    pub preparation_time: Duration,
    pub is_vegan: bool,
}

impl DishDraft {
    pub fn new(
        name: String,
        description: String,
        price: Decimal,
        preparation_time: Duration,
        is_vegan: bool,
    ) -> Result<Self, validator::ValidationErrors> {
        let draft = Self {
            name: name.trim().to_string(),
            description,
            price,
            preparation_time,
            is_vegan,
        };
        draft.normalized()
    }

    /// Applies a partial update and re-validates the result.
    pub fn apply(self, changes: DishChanges) -> Result<Self, validator::ValidationErrors> {
        let draft = Self {
            name: changes.name.map(|n| n.trim().to_string()).unwrap_or(self.name),
            description: changes.description.unwrap_or(self.description),
            price: changes.price.unwrap_or(self.price),
            preparation_time: changes.preparation_time.unwrap_or(self.preparation_time),
            is_vegan: changes.is_vegan.unwrap_or(self.is_vegan),
        };
        draft.normalized()
    }

    fn normalized(mut self) -> Result<Self, validator::ValidationErrors> {
        self.validate()?;
        self.price = self.price.normalize();
        self.price.rescale(2);
        Ok(self)
    }
}

/// Partial update; `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DishChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub preparation_time: Option<Duration>,
    pub is_vegan: Option<bool>,
}

fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(ValidationError::new("price_negative")
            .with_message("Price must not be negative".into()));
    }
    if price.normalize().scale() > 2 {
        return Err(ValidationError::new("price_scale")
            .with_message("Ensure that there are no more than 2 decimal places".into()));
    }
    if *price >= Decimal::from(PRICE_LIMIT) {
        return Err(ValidationError::new("price_digits")
            .with_message("Ensure that there are no more than 17 digits before the decimal point".into()));
    }
    Ok(())
}
