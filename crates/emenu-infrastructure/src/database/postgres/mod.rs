//! PostgreSQL repository implementations

pub mod dish_repo_impl;
pub mod menu_repo_impl;
pub mod user_repo_impl;

pub use dish_repo_impl::PgDishRepository;
pub use menu_repo_impl::PgMenuRepository;
pub use user_repo_impl::PgUserRepository;

use emenu_core::error::DomainError;
use tracing::error;

/// Logs and wraps a driver error that has no domain meaning.
pub(crate) fn db_error(context: &str, e: sqlx::Error) -> DomainError {
    error!("Database error {}: {}", context, e);
    DomainError::DatabaseError(e.to_string())
}

pub(crate) fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_unique_violation())
}

pub(crate) fn is_foreign_key_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_foreign_key_violation())
}

/// `LIMIT`/`OFFSET` binds; a NULL limit returns every row.
pub(crate) fn page_bounds(pagination: Option<emenu_shared::Pagination>) -> (Option<i64>, i64) {
    match pagination {
        Some(p) => (
            Some(i64::try_from(p.limit()).unwrap_or(i64::MAX)),
            i64::try_from(p.offset()).unwrap_or(i64::MAX),
        ),
        None => (None, 0),
    }
}
