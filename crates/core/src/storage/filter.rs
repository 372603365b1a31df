//! Resolution of list-query filters against an entity's declared fields.

use std::collections::HashSet;

use uuid::Uuid;

use crate::bulletin::{Entity, Field, FieldValue};

use super::{FilterValue, IdFilter, ListQuery, RepositoryError, Result};

enum Predicate<E: 'static> {
    Equals(&'static Field<E>, FieldValue),
    OneOf(&'static Field<E>, Vec<FieldValue>),
}

impl<E: 'static> Predicate<E> {
    fn matches(&self, entity: &E) -> bool {
        match self {
            Predicate::Equals(field, expected) => (field.get)(entity) == *expected,
            Predicate::OneOf(field, allowed) => allowed.contains(&(field.get)(entity)),
        }
    }
}

/// A list query validated against the fields of `E`.
///
/// Distinct filter keys combine with AND; the values of a set filter combine
/// with OR.
pub struct CompiledFilter<E: 'static> {
    ids: Option<HashSet<Uuid>>,
    predicates: Vec<Predicate<E>>,
}

impl<E: Entity> CompiledFilter<E> {
    /// Validates every filter key of `query`.
    ///
    /// Fails with [`RepositoryError::Validation`] when a key does not name a
    /// field of `E`, or when a set filter is not keyed by a plural name.
    pub fn compile(query: &ListQuery) -> Result<Self> {
        let ids = query.ids.as_ref().map(|ids| match ids {
            IdFilter::One(id) => HashSet::from([*id]),
            IdFilter::Many(ids) => ids.iter().copied().collect(),
        });

        let predicates = query
            .filters
            .iter()
            .map(|(key, value)| match value {
                FilterValue::One(expected) => {
                    let field = lookup::<E>(key)?;
                    Ok(Predicate::Equals(field, expected.clone()))
                }
                FilterValue::Many(allowed) => {
                    let singular = key.strip_suffix('s').ok_or_else(|| {
                        RepositoryError::Validation(format!(
                            "set filter {key} must use the plural attribute name"
                        ))
                    })?;
                    let field = lookup::<E>(singular)?;
                    Ok(Predicate::OneOf(field, allowed.clone()))
                }
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { ids, predicates })
    }

    pub fn matches(&self, entity: &E) -> bool {
        if let Some(ids) = &self.ids {
            if !ids.contains(&entity.uqid()) {
                return false;
            }
        }
        self.predicates.iter().all(|p| p.matches(entity))
    }
}

fn lookup<E: Entity>(name: &str) -> Result<&'static Field<E>> {
    E::field(name).ok_or_else(|| {
        RepositoryError::Validation(format!(
            "{name} is not an attribute of {}",
            E::ENTITY_TYPE
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bulletin::Event;

    fn events() -> Vec<Event> {
        vec![
            Event::new("Meetup", "a", "").with_likes(1),
            Event::new("Hackathon", "b", "").with_likes(2),
            Event::new("Meetup", "c", "").with_likes(3),
        ]
    }

    fn names(filter: &CompiledFilter<Event>, events: &[Event]) -> Vec<String> {
        events
            .iter()
            .filter(|e| filter.matches(e))
            .map(|e| e.description.clone())
            .collect()
    }

    #[test]
    fn test_empty_query_matches_everything() {
        let filter = CompiledFilter::<Event>::compile(&ListQuery::all()).unwrap();
        assert_eq!(names(&filter, &events()), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_exact_match_filter() {
        let query = ListQuery::all().filter("name", "Meetup");
        let filter = CompiledFilter::<Event>::compile(&query).unwrap();

        assert_eq!(names(&filter, &events()), vec!["a", "c"]);
    }

    #[test]
    fn test_set_filter_uses_singular_attribute() {
        let query = ListQuery::all().filter_in("names", ["Hackathon", "Nope"]);
        let filter = CompiledFilter::<Event>::compile(&query).unwrap();

        assert_eq!(names(&filter, &events()), vec!["b"]);
    }

    #[test]
    fn test_filters_combine_with_and() {
        let query = ListQuery::all()
            .filter("name", "Meetup")
            .filter_in("number_of_likess", [2u64, 3]);
        let filter = CompiledFilter::<Event>::compile(&query).unwrap();

        assert_eq!(names(&filter, &events()), vec!["c"]);
    }

    #[test]
    fn test_id_filters() {
        let events = events();
        let one = ListQuery::all().with_id(events[1].uqid());
        let many = ListQuery::all().with_ids([events[0].uqid(), events[2].uqid()]);

        let one = CompiledFilter::<Event>::compile(&one).unwrap();
        let many = CompiledFilter::<Event>::compile(&many).unwrap();

        assert_eq!(names(&one, &events), vec!["b"]);
        assert_eq!(names(&many, &events), vec!["a", "c"]);
    }

    #[test]
    fn test_unknown_attribute_is_rejected() {
        let query = ListQuery::all().filter("colour", "red");
        let result = CompiledFilter::<Event>::compile(&query);

        assert!(matches!(
            result,
            Err(RepositoryError::Validation(msg)) if msg == "colour is not an attribute of Event"
        ));
    }

    #[test]
    fn test_unknown_plural_attribute_is_rejected() {
        let query = ListQuery::all().filter_in("colours", ["red"]);
        assert!(matches!(
            CompiledFilter::<Event>::compile(&query),
            Err(RepositoryError::Validation(_))
        ));
    }

    #[test]
    fn test_set_filter_without_plural_key_is_rejected() {
        let query = ListQuery::all().filter_in("nam", ["Meetup"]);
        assert!(matches!(
            CompiledFilter::<Event>::compile(&query),
            Err(RepositoryError::Validation(_))
        ));
    }
}
