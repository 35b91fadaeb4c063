// ============================================================================
// eMenu Core - Menu Query Layer
// File: crates/emenu-core/src/query/mod.rs
// Description: Filter/ordering expressions for public menu listings
// ============================================================================
//! Translates the recognized query-string expressions of a menu listing into a
//! [`MenuQuery`]. Unknown filter keys are ignored; unknown ordering keys reject the
//! request. The same query is evaluated in memory ([`MenuQuery::matches`],
//! [`MenuQuery::sort`]) and translated to SQL by the PostgreSQL adapter.

pub mod filter;
pub mod ordering;

use std::cmp::Ordering;

use thiserror::Error;

use crate::domain::Menu;

pub use filter::{Comparator, DateField, MenuFilter};
pub use ordering::{SortKey, SortTerm};

pub const ORDERING_PARAM: &str = "ordering";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("Invalid ordering field: {0}")]
    UnknownOrderingField(String),

    #[error("Invalid value for {expression}: \"{value}\"")]
    InvalidFilterValue { expression: String, value: String },
}

impl QueryError {
    /// Offending query expression.
    pub fn expression(&self) -> &str {
        match self {
            QueryError::UnknownOrderingField(_) => ORDERING_PARAM,
            QueryError::InvalidFilterValue { expression, .. } => expression,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuQuery {
    pub filters: Vec<MenuFilter>,
    pub ordering: Vec<SortTerm>,
}

impl MenuQuery {
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, QueryError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut query = MenuQuery::default();
        for (key, value) in pairs {
            let (key, value) = (key.as_ref(), value.as_ref());
            if key == ORDERING_PARAM {
                query.ordering = ordering::parse_ordering(value)?;
                continue;
            }
            if value.is_empty() {
                continue;
            }
            if let Some(filter) = MenuFilter::parse(key, value)? {
                let slot = filter.slot();
                query.filters.retain(|f| f.slot() != slot);
                query.filters.push(filter);
            }
        }
        Ok(query)
    }

    pub fn matches(&self, menu: &Menu) -> bool {
        self.filters.iter().all(|f| f.matches(menu))
    }

    /// Full comparison: ordering terms left to right, then id ascending.
    pub fn compare(&self, a: &Menu, b: &Menu) -> Ordering {
        self.ordering
            .iter()
            .map(|term| term.compare(a, b))
            .find(|ord| ord.is_ne())
            .unwrap_or_else(|| a.id.cmp(&b.id))
    }

    pub fn sort(&self, menus: &mut [Menu]) {
        menus.sort_by(|a, b| self.compare(a, b));
    }
}
