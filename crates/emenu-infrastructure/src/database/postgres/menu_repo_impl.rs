// ============================================================================
// eMenu Infrastructure - PostgreSQL Menu Repository
// File: crates/emenu-infrastructure/src/database/postgres/menu_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder, Transaction};
use tracing::{debug, error, info};

use emenu_core::domain::{DishId, Menu, MenuDraft, MenuId};
use emenu_core::error::DomainError;
use emenu_core::query::{MenuFilter, MenuQuery, SortKey};
use emenu_core::repositories::MenuRepository;
use emenu_shared::Pagination;

use super::{db_error, is_foreign_key_violation, is_unique_violation, page_bounds};

/// Menu columns plus the sorted dish ids of each menu.
const MENU_SELECT: &str = r#"
    SELECT
        m.id, m.name, m.description, m.date_added, m.date_modified,
        COALESCE(
            ARRAY_AGG(md.dish_id ORDER BY md.dish_id) FILTER (WHERE md.dish_id IS NOT NULL),
            '{}'
        ) AS dish_ids
    FROM menus m
    LEFT JOIN menu_dishes md ON md.menu_id = m.id
"#;

pub struct PgMenuRepository {
    pool: PgPool,
}

impl PgMenuRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_one_where(&self, column: &str, bind: MenuKey<'_>) -> Result<Option<Menu>, DomainError> {
        let mut builder = QueryBuilder::<Postgres>::new(MENU_SELECT);
        builder.push(format!(" WHERE m.{} = ", column));
        match bind {
            MenuKey::Id(id) => builder.push_bind(id),
            MenuKey::Name(name) => builder.push_bind(name.to_string()),
        };
        builder.push(" GROUP BY m.id");

        let row: Option<MenuRow> = builder
            .build_query_as::<MenuRow>()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("finding menu", e))?;

        Ok(row.map(Into::into))
    }
}

enum MenuKey<'a> {
    Id(MenuId),
    Name(&'a str),
}

// Internal row types for SQLx mapping
#[derive(Debug, FromRow)]
struct MenuRow {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub date_added: DateTime<Utc>,
    pub date_modified: DateTime<Utc>,
    pub dish_ids: Vec<i64>,
}

impl From<MenuRow> for Menu {
    fn from(row: MenuRow) -> Self {
        Menu {
            id: row.id,
            name: row.name,
            description: row.description,
            dish_ids: row.dish_ids,
            date_added: row.date_added,
            date_modified: row.date_modified,
        }
    }
}

#[derive(Debug, FromRow)]
struct MenuHeadRow {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub date_added: DateTime<Utc>,
    pub date_modified: DateTime<Utc>,
}

impl MenuHeadRow {
    fn with_dishes(self, dish_ids: Vec<DishId>) -> Menu {
        Menu {
            id: self.id,
            name: self.name,
            description: self.description,
            dish_ids,
            date_added: self.date_added,
            date_modified: self.date_modified,
        }
    }
}

fn write_error(draft: &MenuDraft, e: sqlx::Error) -> DomainError {
    if is_unique_violation(&e) {
        DomainError::MenuNameAlreadyExists(draft.name.clone())
    } else if is_foreign_key_violation(&e) {
        DomainError::UnknownDishes(draft.dish_ids.clone())
    } else {
        error!("Database error writing menu: {}", e);
        DomainError::DatabaseError(e.to_string())
    }
}

async fn insert_associations(
    tx: &mut Transaction<'_, Postgres>,
    menu_id: MenuId,
    draft: &MenuDraft,
) -> Result<(), DomainError> {
    if draft.dish_ids.is_empty() {
        return Ok(());
    }
    sqlx::query("INSERT INTO menu_dishes (menu_id, dish_id) SELECT $1, UNNEST($2::BIGINT[])")
        .bind(menu_id)
        .bind(&draft.dish_ids)
        .execute(&mut **tx)
        .await
        .map_err(|e| write_error(draft, e))?;
    Ok(())
}

/// Appends filters, the non-empty constraint and the full ordering.
fn push_public_query(builder: &mut QueryBuilder<'_, Postgres>, query: &MenuQuery) {
    builder.push(" WHERE TRUE");
    for filter in &query.filters {
        match filter {
            MenuFilter::NameExact(name) => {
                builder.push(" AND m.name = ");
                builder.push_bind(name.clone());
            }
            MenuFilter::Date { field, comparator, value } => {
                builder.push(format!(" AND m.{} {} ", field.as_str(), comparator.sql_operator()));
                builder.push_bind(*value);
            }
        }
    }
    builder.push(" GROUP BY m.id HAVING COUNT(md.dish_id) > 0 ORDER BY ");
    for term in &query.ordering {
        let column = match term.key {
            SortKey::Name => "m.name COLLATE \"C\"",
            SortKey::DishCount => "COUNT(md.dish_id)",
        };
        builder.push(column);
        builder.push(if term.descending { " DESC, " } else { " ASC, " });
    }
    builder.push("m.id ASC");
}

#[async_trait]
impl MenuRepository for PgMenuRepository {
    async fn find_by_id(&self, id: MenuId) -> Result<Option<Menu>, DomainError> {
        self.fetch_one_where("id", MenuKey::Id(id)).await
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Menu>, DomainError> {
        self.fetch_one_where("name", MenuKey::Name(name)).await
    }

    async fn list(&self, pagination: Option<Pagination>) -> Result<Vec<Menu>, DomainError> {
        let (limit, offset) = page_bounds(pagination);
        let rows: Vec<MenuRow> = sqlx::query_as(&format!(
            "{} GROUP BY m.id ORDER BY m.id LIMIT $1 OFFSET $2",
            MENU_SELECT
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("listing menus", e))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list_public(&self, query: &MenuQuery, pagination: Option<Pagination>) -> Result<Vec<Menu>, DomainError> {
        let (limit, offset) = page_bounds(pagination);
        let mut builder = QueryBuilder::<Postgres>::new(MENU_SELECT);
        push_public_query(&mut builder, query);
        builder.push(" LIMIT ");
        builder.push_bind(limit);
        builder.push(" OFFSET ");
        builder.push_bind(offset);
        debug!("Public menu query: {}", builder.sql());

        let rows: Vec<MenuRow> = builder
            .build_query_as::<MenuRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("listing public menus", e))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn create(&self, draft: &MenuDraft, at: DateTime<Utc>) -> Result<Menu, DomainError> {
        info!("Creating menu: {}", draft.name);
        let mut tx = self.pool.begin().await.map_err(|e| db_error("starting transaction", e))?;

        let head: MenuHeadRow = sqlx::query_as(
            r#"
            INSERT INTO menus (name, description, date_added, date_modified)
            VALUES ($1, $2, $3, $3)
            RETURNING id, name, description, date_added, date_modified
            "#,
        )
        .bind(&draft.name)
        .bind(&draft.description)
        .bind(at)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| write_error(draft, e))?;

        insert_associations(&mut tx, head.id, draft).await?;
        tx.commit().await.map_err(|e| db_error("committing menu", e))?;

        Ok(head.with_dishes(draft.dish_ids.clone()))
    }

    async fn update(&self, id: MenuId, draft: &MenuDraft, at: DateTime<Utc>) -> Result<Option<Menu>, DomainError> {
        let mut tx = self.pool.begin().await.map_err(|e| db_error("starting transaction", e))?;

        let head: Option<MenuHeadRow> = sqlx::query_as(
            r#"
            UPDATE menus
            SET name = $2, description = $3, date_modified = $4
            WHERE id = $1
            RETURNING id, name, description, date_added, date_modified
            "#,
        )
        .bind(id)
        .bind(&draft.name)
        .bind(&draft.description)
        .bind(at)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| write_error(draft, e))?;

        let Some(head) = head else {
            return Ok(None);
        };

        sqlx::query("DELETE FROM menu_dishes WHERE menu_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("clearing menu dishes", e))?;
        insert_associations(&mut tx, id, draft).await?;
        tx.commit().await.map_err(|e| db_error("committing menu", e))?;

        Ok(Some(head.with_dishes(draft.dish_ids.clone())))
    }

    async fn delete(&self, id: MenuId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM menus WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("deleting menu", e))?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn public_sql(pairs: &[(&str, &str)]) -> String {
        let query = MenuQuery::from_pairs(pairs.iter().copied()).unwrap();
        let mut builder = QueryBuilder::<Postgres>::new("SELECT 1 FROM menus m");
        push_public_query(&mut builder, &query);
        builder.sql().to_string()
    }

    #[test]
    fn test_default_order_is_id() {
        let sql = public_sql(&[]);
        assert!(sql.ends_with("HAVING COUNT(md.dish_id) > 0 ORDER BY m.id ASC"));
    }

    #[test]
    fn test_ordering_terms_precede_id() {
        let sql = public_sql(&[("ordering", "-dishes__count,name")]);
        assert!(sql.contains("ORDER BY COUNT(md.dish_id) DESC, m.name COLLATE \"C\" ASC, m.id ASC"));
    }

    #[test]
    fn test_filters_become_bound_predicates() {
        let sql = public_sql(&[("name", "Lunch"), ("date_added__gte", "2021-09-01")]);
        assert!(sql.contains("AND m.name = $1"));
        assert!(sql.contains("AND m.date_added >= $2"));
    }
}
