//! `ordering` parameter: comma-separated keys, `-` prefix for descending.

use std::cmp::Ordering;

use super::QueryError;
use crate::domain::Menu;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Name,
    DishCount,
}

impl SortKey {
    fn parse(key: &str) -> Option<Self> {
        match key {
            "name" => Some(SortKey::Name),
            "dishes__count" | "dish_count" => Some(SortKey::DishCount),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortTerm {
    pub key: SortKey,
    pub descending: bool,
}

impl SortTerm {
    pub fn compare(&self, a: &Menu, b: &Menu) -> Ordering {
        let ord = match self.key {
            SortKey::Name => a.name.as_bytes().cmp(b.name.as_bytes()),
            SortKey::DishCount => a.dish_count().cmp(&b.dish_count()),
        };
        if self.descending {
            ord.reverse()
        } else {
            ord
        }
    }
}

/// Rejects the whole value when any key is unknown.
pub fn parse_ordering(value: &str) -> Result<Vec<SortTerm>, QueryError> {
    value
        .split(',')
        .map(str::trim)
        .filter(|term| !term.is_empty())
        .map(|term| {
            let (descending, key) = match term.strip_prefix('-') {
                Some(rest) => (true, rest),
                None => (false, term),
            };
            SortKey::parse(key)
                .map(|key| SortTerm { key, descending })
                .ok_or_else(|| QueryError::UnknownOrderingField(term.to_string()))
        })
        .collect()
}
