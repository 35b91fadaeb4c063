// ============================================================================
// eMenu Infrastructure - PostgreSQL Dish Repository
// File: crates/emenu-infrastructure/src/database/postgres/dish_repo_impl.rs
// ============================================================================

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use tracing::{error, info};

use emenu_core::domain::{Dish, DishDraft, DishId};
use emenu_core::error::DomainError;
use emenu_core::repositories::DishRepository;
use emenu_shared::Pagination;

use super::{db_error, is_unique_violation, page_bounds};

const DISH_COLUMNS: &str =
    "id, name, description, price, preparation_time_us, is_vegan, date_added, date_modified";

pub struct PgDishRepository {
    pool: PgPool,
}

impl PgDishRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal row type for SQLx mapping
#[derive(Debug, FromRow)]
struct DishRow {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub preparation_time_us: i64,
    pub is_vegan: bool,
    pub date_added: DateTime<Utc>,
    pub date_modified: DateTime<Utc>,
}

impl From<DishRow> for Dish {
    fn from(row: DishRow) -> Self {
        Dish {
            id: row.id,
            name: row.name,
            description: row.description,
            price: row.price,
            preparation_time: Duration::from_micros(u64::try_from(row.preparation_time_us).unwrap_or(0)),
            is_vegan: row.is_vegan,
            date_added: row.date_added,
            date_modified: row.date_modified,
        }
    }
}

/// Stored as whole microseconds.
fn micros(duration: Duration) -> Result<i64, DomainError> {
    i64::try_from(duration.as_micros()).map_err(|_| DomainError::ValidationError {
        field: "preparation_time".to_string(),
        message: "Preparation time is too long".to_string(),
    })
}

fn write_error(draft: &DishDraft, e: sqlx::Error) -> DomainError {
    if is_unique_violation(&e) {
        DomainError::DishNameAlreadyExists(draft.name.clone())
    } else {
        error!("Database error writing dish: {}", e);
        DomainError::DatabaseError(e.to_string())
    }
}

#[async_trait]
impl DishRepository for PgDishRepository {
    async fn find_by_id(&self, id: DishId) -> Result<Option<Dish>, DomainError> {
        let row: Option<DishRow> = sqlx::query_as(&format!("SELECT {} FROM dishes WHERE id = $1", DISH_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("finding dish by id", e))?;

        Ok(row.map(Into::into))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Dish>, DomainError> {
        let row: Option<DishRow> = sqlx::query_as(&format!("SELECT {} FROM dishes WHERE name = $1", DISH_COLUMNS))
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("finding dish by name", e))?;

        Ok(row.map(Into::into))
    }

    async fn find_by_ids(&self, ids: &[DishId]) -> Result<Vec<Dish>, DomainError> {
        let rows: Vec<DishRow> = sqlx::query_as(&format!(
            "SELECT {} FROM dishes WHERE id = ANY($1) ORDER BY id",
            DISH_COLUMNS
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("finding dishes by ids", e))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list(&self, pagination: Option<Pagination>) -> Result<Vec<Dish>, DomainError> {
        let (limit, offset) = page_bounds(pagination);
        let rows: Vec<DishRow> = sqlx::query_as(&format!(
            "SELECT {} FROM dishes ORDER BY id LIMIT $1 OFFSET $2",
            DISH_COLUMNS
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("listing dishes", e))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn create(&self, draft: &DishDraft, at: DateTime<Utc>) -> Result<Dish, DomainError> {
        info!("Creating dish: {}", draft.name);

        let row: DishRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO dishes (name, description, price, preparation_time_us, is_vegan, date_added, date_modified)
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            RETURNING {}
            "#,
            DISH_COLUMNS
        ))
        .bind(&draft.name)
        .bind(&draft.description)
        .bind(draft.price)
        .bind(micros(draft.preparation_time)?)
        .bind(draft.is_vegan)
        .bind(at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| write_error(draft, e))?;

        Ok(row.into())
    }

    async fn update(&self, id: DishId, draft: &DishDraft, at: DateTime<Utc>) -> Result<Option<Dish>, DomainError> {
        let row: Option<DishRow> = sqlx::query_as(&format!(
            r#"
            UPDATE dishes
            SET
                name = $2,
                description = $3,
                price = $4,
                preparation_time_us = $5,
                is_vegan = $6,
                date_modified = $7
            WHERE id = $1
            RETURNING {}
            "#,
            DISH_COLUMNS
        ))
        .bind(id)
        .bind(&draft.name)
        .bind(&draft.description)
        .bind(draft.price)
        .bind(micros(draft.preparation_time)?)
        .bind(draft.is_vegan)
        .bind(at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| write_error(draft, e))?;

        Ok(row.map(Into::into))
    }

    async fn delete(&self, id: DishId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM dishes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("deleting dish", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn added_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Dish>, DomainError> {
        let rows: Vec<DishRow> = sqlx::query_as(&format!(
            "SELECT {} FROM dishes WHERE date_added >= $1 AND date_added < $2 ORDER BY id",
            DISH_COLUMNS
        ))
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("listing added dishes", e))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn modified_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Dish>, DomainError> {
        let rows: Vec<DishRow> = sqlx::query_as(&format!(
            "SELECT {} FROM dishes WHERE date_modified >= $1 AND date_modified < $2 ORDER BY id",
            DISH_COLUMNS
        ))
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("listing modified dishes", e))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
