use crate::storage::{FilterValue, IdFilter, ListQuery};

/// Returns the cache key for a list query.
///
/// Queries that select the same records map to the same key: filters are
/// ordered by name, and id and value sets are ordered before joining.
///
/// Format: `list:<ids>:<offset>:<limit>:<filters>` where `*` stands for
/// "no restriction".
///
/// # Examples
///
/// ```
/// use bulletin_core::cache::list_key;
/// use bulletin_core::storage::ListQuery;
///
/// assert_eq!(list_key(&ListQuery::all()), "list:*:0:*:");
/// assert_eq!(
///     list_key(&ListQuery::all().limit(10).filter("name", "Meetup")),
///     "list:*:0:10:name=\"Meetup\""
/// );
/// ```
pub fn list_key(query: &ListQuery) -> String {
    let ids = match &query.ids {
        None => "*".to_string(),
        Some(IdFilter::One(id)) => id.to_string(),
        Some(IdFilter::Many(ids)) => {
            let mut ids: Vec<String> = ids.iter().map(ToString::to_string).collect();
            ids.sort();
            format!("[{}]", ids.join(","))
        }
    };

    let limit = query
        .limit
        .map_or_else(|| "*".to_string(), |limit| limit.to_string());

    let filters = query
        .filters
        .iter()
        .map(|(name, value)| format!("{name}={}", filter_value_key(value)))
        .collect::<Vec<_>>()
        .join("&");

    format!("list:{ids}:{}:{limit}:{filters}", query.offset)
}

fn filter_value_key(value: &FilterValue) -> String {
    match value {
        FilterValue::One(value) => value.to_string(),
        FilterValue::Many(values) => {
            let mut values: Vec<String> = values.iter().map(ToString::to_string).collect();
            values.sort();
            format!("[{}]", values.join(","))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_list_key_unfiltered() {
        assert_eq!(list_key(&ListQuery::all()), "list:*:0:*:");
    }

    #[test]
    fn test_list_key_includes_pagination() {
        let first = list_key(&ListQuery::all().offset(0).limit(10));
        let second = list_key(&ListQuery::all().offset(10).limit(10));

        assert_eq!(first, "list:*:0:10:");
        assert_eq!(second, "list:*:10:10:");
    }

    #[test]
    fn test_list_key_is_independent_of_filter_insertion_order() {
        let a = ListQuery::all().filter("name", "Meetup").filter("description", "x");
        let b = ListQuery::all().filter("description", "x").filter("name", "Meetup");

        assert_eq!(list_key(&a), list_key(&b));
        assert_eq!(list_key(&a), "list:*:0:*:description=\"x\"&name=\"Meetup\"");
    }

    #[test]
    fn test_list_key_is_independent_of_set_order() {
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();

        let a = ListQuery::all()
            .with_ids([first, second])
            .filter_in("names", ["b", "a"]);
        let b = ListQuery::all()
            .with_ids([second, first])
            .filter_in("names", ["a", "b"]);

        assert_eq!(list_key(&a), list_key(&b));
    }

    #[test]
    fn test_list_key_distinguishes_text_from_numbers() {
        let text = ListQuery::all().filter("number_of_likes", "1");
        let number = ListQuery::all().filter("number_of_likes", 1u64);

        assert_ne!(list_key(&text), list_key(&number));
    }

    #[test]
    fn test_list_key_single_id() {
        let id = Uuid::nil();
        assert_eq!(
            list_key(&ListQuery::all().with_id(id)),
            format!("list:{id}:0:*:")
        );
    }
}
