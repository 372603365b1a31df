use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::bulletin::FieldValue;

/// Restricts a list query to one or several identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IdFilter {
    One(Uuid),
    Many(Vec<Uuid>),
}

/// Value side of an attribute filter.
///
/// `Many` expresses set membership and must be keyed by the plural form of
/// the attribute name (`names` filters on `name`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    One(FieldValue),
    Many(Vec<FieldValue>),
}

/// Parameters of a repository `list` call.
///
/// Filters are kept in a `BTreeMap` so that two queries with the same
/// filters always iterate (and therefore serialize) in the same order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListQuery {
    pub ids: Option<IdFilter>,
    pub offset: usize,
    /// `None` means unbounded.
    pub limit: Option<usize>,
    pub filters: BTreeMap<String, FilterValue>,
}

impl ListQuery {
    /// An unfiltered, unbounded query.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: Uuid) -> Self {
        self.ids = Some(IdFilter::One(id));
        self
    }

    pub fn with_ids(mut self, ids: impl IntoIterator<Item = Uuid>) -> Self {
        self.ids = Some(IdFilter::Many(ids.into_iter().collect()));
        self
    }

    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Adds an exact-match filter on `field`.
    pub fn filter(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.filters.insert(field.into(), FilterValue::One(value.into()));
        self
    }

    /// Adds a set-membership filter; `plural_field` follows the `<field>s`
    /// convention.
    pub fn filter_in<V: Into<FieldValue>>(
        mut self,
        plural_field: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        let values = values.into_iter().map(Into::into).collect();
        self.filters.insert(plural_field.into(), FilterValue::Many(values));
        self
    }

    /// Applies `offset`/`limit` to already filtered items.
    ///
    /// Out-of-range windows produce an empty or shorter result rather than an
    /// error.
    pub fn paginate<T>(&self, items: impl IntoIterator<Item = T>) -> Vec<T> {
        items
            .into_iter()
            .skip(self.offset)
            .take(self.limit.unwrap_or(usize::MAX))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paginate_window() {
        let query = ListQuery::all().offset(1).limit(2);
        assert_eq!(query.paginate(vec![1, 2, 3, 4]), vec![2, 3]);
    }

    #[test]
    fn test_paginate_offset_past_end_is_empty() {
        let query = ListQuery::all().offset(5).limit(10);
        assert!(query.paginate(vec![1, 2, 3]).is_empty());
    }

    #[test]
    fn test_paginate_limit_past_end_is_clamped() {
        let query = ListQuery::all().offset(2).limit(10);
        assert_eq!(query.paginate(vec![1, 2, 3]), vec![3]);
    }

    #[test]
    fn test_paginate_unbounded() {
        assert_eq!(ListQuery::all().paginate(vec![1, 2, 3]), vec![1, 2, 3]);
    }

    #[test]
    fn test_filter_builders() {
        let id = Uuid::new_v4();
        let query = ListQuery::all()
            .with_id(id)
            .filter("name", "Meetup")
            .filter_in("number_of_likess", [1u64, 2]);

        assert_eq!(query.ids, Some(IdFilter::One(id)));
        assert_eq!(
            query.filters.get("name"),
            Some(&FilterValue::One(FieldValue::from("Meetup")))
        );
        assert_eq!(
            query.filters.get("number_of_likess"),
            Some(&FilterValue::Many(vec![
                FieldValue::Number(1),
                FieldValue::Number(2)
            ]))
        );
    }

    #[test]
    fn test_filter_value_deserializes_scalar_or_list() {
        let one: FilterValue = serde_json::from_str("\"Meetup\"").unwrap();
        let many: FilterValue = serde_json::from_str("[1, 2]").unwrap();

        assert_eq!(one, FilterValue::One(FieldValue::from("Meetup")));
        assert_eq!(
            many,
            FilterValue::Many(vec![FieldValue::Number(1), FieldValue::Number(2)])
        );
    }
}
