use std::time::Duration;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use emenu_core::domain::preparation_time;
use emenu_core::{Dish, DishChanges, DishDraft, DishId, DomainError};

pub fn dish_url(id: DishId) -> String {
    format!("/private/dishes/{}/", id)
}

#[derive(Debug, Serialize)]
pub struct DishResponse {
    pub url: String,
    pub pk: DishId,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    #[serde(with = "preparation_time")]
    pub preparation_time: Duration,
    pub date_added: DateTime<Utc>,
    pub date_modified: DateTime<Utc>,
    pub is_vegan: bool,
}

impl From<Dish> for DishResponse {
    fn from(dish: Dish) -> Self {
        Self {
            url: dish_url(dish.id),
            pk: dish.id,
            name: dish.name,
            description: dish.description,
            price: dish.price,
            preparation_time: dish.preparation_time,
            date_added: dish.date_added,
            date_modified: dish.date_modified,
            is_vegan: dish.is_vegan,
        }
    }
}

/// Create (POST) and full update (PUT) body.
#[derive(Debug, Deserialize)]
pub struct DishRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    #[serde(with = "preparation_time")]
    pub preparation_time: Duration,
    #[serde(default)]
    pub is_vegan: bool,
}

impl DishRequest {
    pub fn into_draft(self) -> Result<DishDraft, DomainError> {
        Ok(DishDraft::new(
            self.name,
            self.description,
            self.price,
            self.preparation_time,
            self.is_vegan,
        )?)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct DishPatchRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    #[serde(default, with = "preparation_time::option")]
    pub preparation_time: Option<Duration>,
    pub is_vegan: Option<bool>,
}

impl From<DishPatchRequest> for DishChanges {
    fn from(patch: DishPatchRequest) -> Self {
        DishChanges {
            name: patch.name,
            description: patch.description,
            price: patch.price,
            preparation_time: patch.preparation_time,
            is_vegan: patch.is_vegan,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_accepts_string_price_and_clock_time() {
        let req: DishRequest = serde_json::from_str(
            r#"{"name": "Tomato soup", "price": "12.5", "preparation_time": "00:20:00"}"#,
        )
        .unwrap();
        let draft = req.into_draft().unwrap();
        assert_eq!(draft.price.to_string(), "12.50");
        assert_eq!(draft.preparation_time, Duration::from_secs(1200));
        assert!(!draft.is_vegan);
    }

    #[test]
    fn test_negative_price_is_rejected() {
        let req: DishRequest = serde_json::from_str(
            r#"{"name": "Tomato soup", "price": -1, "preparation_time": 60}"#,
        )
        .unwrap();
        let err = req.into_draft().unwrap_err();
        assert_eq!(err.field(), Some("price"));
    }

    #[test]
    fn test_patch_without_preparation_time() {
        let patch: DishPatchRequest = serde_json::from_str(r#"{"is_vegan": true}"#).unwrap();
        assert!(patch.preparation_time.is_none());
        assert_eq!(patch.is_vegan, Some(true));
    }
}
