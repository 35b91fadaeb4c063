//! Filter expressions over menu listings.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use super::QueryError;
use crate::domain::Menu;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateField {
    Added,
    Modified,
}

impl DateField {
    pub fn as_str(&self) -> &'static str {
        match self {
            DateField::Added => "date_added",
            DateField::Modified => "date_modified",
        }
    }

    pub fn value_of(&self, menu: &Menu) -> DateTime<Utc> {
        match self {
            DateField::Added => menu.date_added,
            DateField::Modified => menu.date_modified,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    Exact,
    Lt,
    Lte,
    Gt,
    Gte,
}

impl Comparator {
    fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "exact" => Some(Comparator::Exact),
            "lt" => Some(Comparator::Lt),
            "lte" => Some(Comparator::Lte),
            "gt" => Some(Comparator::Gt),
            "gte" => Some(Comparator::Gte),
            _ => None,
        }
    }

    /// SQL operator for this comparator.
    pub fn sql_operator(&self) -> &'static str {
        match self {
            Comparator::Exact => "=",
            Comparator::Lt => "<",
            Comparator::Lte => "<=",
            Comparator::Gt => ">",
            Comparator::Gte => ">=",
        }
    }

    pub fn holds(&self, left: DateTime<Utc>, right: DateTime<Utc>) -> bool {
        match self {
            Comparator::Exact => left == right,
            Comparator::Lt => left < right,
            Comparator::Lte => left <= right,
            Comparator::Gt => left > right,
            Comparator::Gte => left >= right,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuFilter {
    NameExact(String),
    Date {
        field: DateField,
        comparator: Comparator,
        value: DateTime<Utc>,
    },
}

impl MenuFilter {
    /// Parses one query pair. `Ok(None)` means the key is not a filter field.
    pub fn parse(key: &str, value: &str) -> Result<Option<Self>, QueryError> {
        let (field, suffix) = match key.split_once("__") {
            Some((field, suffix)) => (field, Some(suffix)),
            None => (key, None),
        };

        match (field, suffix) {
            ("name", None) | ("name", Some("exact")) => Ok(Some(MenuFilter::NameExact(value.to_string()))),
            ("date_added", suffix) | ("date_modified", suffix) => {
                let comparator = match suffix {
                    None => Comparator::Exact,
                    Some(s) => match Comparator::from_suffix(s) {
                        Some(c) => c,
                        None => return Ok(None),
                    },
                };
                let field = if field == "date_added" {
                    DateField::Added
                } else {
                    DateField::Modified
                };
                let value = parse_datetime(value).ok_or_else(|| QueryError::InvalidFilterValue {
                    expression: key.to_string(),
                    value: value.to_string(),
                })?;
                Ok(Some(MenuFilter::Date { field, comparator, value }))
            }
            _ => Ok(None),
        }
    }

    /// Key under which a later occurrence replaces this filter.
    pub(crate) fn slot(&self) -> (u8, Option<DateField>, Option<Comparator>) {
        match self {
            MenuFilter::NameExact(_) => (0, None, None),
            MenuFilter::Date { field, comparator, .. } => (1, Some(*field), Some(*comparator)),
        }
    }

    pub fn matches(&self, menu: &Menu) -> bool {
        match self {
            MenuFilter::NameExact(name) => menu.name == *name,
            MenuFilter::Date { field, comparator, value } => comparator.holds(field.value_of(menu), *value),
        }
    }
}

/// RFC 3339, naive date-time (UTC) or a bare date (UTC midnight).
pub fn parse_datetime(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f%:z") {
        return Some(dt.with_timezone(&Utc));
    }
    const NAIVE_FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
    ];
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_date_forms() {
        let midnight = Utc.with_ymd_and_hms(2021, 9, 12, 0, 0, 0).unwrap();
        assert_eq!(parse_datetime("2021-09-12"), Some(midnight));
        assert_eq!(parse_datetime("2021-09-12T00:00:00Z"), Some(midnight));
        assert_eq!(parse_datetime("2021-09-12 02:00:00+02:00"), Some(midnight));
        assert_eq!(parse_datetime("2021-09-12 00:00"), Some(midnight));
        assert_eq!(parse_datetime("12/09/2021"), None);
    }

    #[test]
    fn test_unknown_keys_are_not_filters() {
        assert_eq!(MenuFilter::parse("description", "x").unwrap(), None);
        assert_eq!(MenuFilter::parse("date_added__range", "2021-01-01").unwrap(), None);
        assert_eq!(MenuFilter::parse("name__icontains", "oct").unwrap(), None);
    }

    #[test]
    fn test_malformed_date_names_expression() {
        let err = MenuFilter::parse("date_modified__gte", "yesterday").unwrap_err();
        assert_eq!(err.expression(), "date_modified__gte");
    }
}
