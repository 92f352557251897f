//! In-memory candidate filtering.

use async_trait::async_trait;

use super::{ChoiceResponse, ChoiceSource};
use crate::error::SourceResult;
use crate::item::Item;

/// Filters a static candidate list by case-insensitive substring match on
/// the display field.
#[derive(Debug, Clone)]
pub struct LocalSource {
    available: Vec<Item>,
    /// Uppercased display text of each candidate, parallel to `available`.
    haystack: Vec<String>,
}

impl LocalSource {
    pub fn new(available: Vec<Item>, display_field: &str) -> Self {
        let haystack = available
            .iter()
            .map(|item| item.text(display_field).unwrap_or_default().to_uppercase())
            .collect();
        Self {
            available,
            haystack,
        }
    }

    /// Returns every candidate whose display text contains `query`, in
    /// original order. An empty query matches everything.
    pub fn filter(&self, query: &str) -> Vec<Item> {
        let needle = query.to_uppercase();
        self.haystack
            .iter()
            .zip(&self.available)
            .filter(|(text, _)| text.contains(&needle))
            .map(|(_, item)| item.clone())
            .collect()
    }
}

#[async_trait]
impl ChoiceSource for LocalSource {
    async fn get_choices(&self, query: &str) -> SourceResult<ChoiceResponse> {
        Ok(ChoiceResponse::Items(self.filter(query)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bobs() -> LocalSource {
        LocalSource::new(
            vec![
                Item::from_pair("name", "id", "Bob Gobbs", 4444),
                Item::from_pair("name", "id", "Bob Flobbs", 99994),
                Item::from_pair("name", "id", "Mary Jones", 54677),
            ],
            "name",
        )
    }

    fn names(items: &[Item]) -> Vec<String> {
        items.iter().filter_map(|i| i.text("name")).collect()
    }

    #[test]
    fn test_empty_query_returns_all_in_order() {
        let source = bobs();
        assert_eq!(
            names(&source.filter("")),
            ["Bob Gobbs", "Bob Flobbs", "Mary Jones"]
        );
    }

    #[test]
    fn test_case_insensitive_substring() {
        let source = bobs();
        assert_eq!(names(&source.filter("bob")), ["Bob Gobbs", "Bob Flobbs"]);
        assert_eq!(names(&source.filter("GOBB")), ["Bob Gobbs"]);
        assert_eq!(names(&source.filter("obbs")), ["Bob Gobbs", "Bob Flobbs"]);
    }

    #[test]
    fn test_no_match_is_empty() {
        assert!(bobs().filter("zzz").is_empty());
    }

    #[test]
    fn test_missing_display_field_only_matches_empty_query() {
        let source = LocalSource::new(vec![Item::new().with_field("id", 1)], "name");
        assert_eq!(source.filter("").len(), 1);
        assert!(source.filter("a").is_empty());
    }

    #[test]
    fn test_numeric_display_values_are_searchable() {
        let source = LocalSource::new(vec![Item::from_pair("code", "id", "x", 1)], "id");
        assert_eq!(source.filter("1").len(), 1);
    }

    #[tokio::test]
    async fn test_get_choices_resolves_items() {
        let response = bobs().get_choices("mary").await.expect("local search");
        let ChoiceResponse::Items(items) = response else {
            panic!("local source returns items");
        };
        assert_eq!(names(&items), ["Mary Jones"]);
    }
}
