//! Filterable collection view model shared by the listing screens.
//!
//! A [`FilterableCollection`] owns the full record list of a screen and a set
//! of named [`Predicate`]s. The visible subset is recomputed from scratch on
//! every predicate or source change, so it never depends on the order in which
//! filters were applied.
//!
//! # Example
//!
//! ```rust
//! use marketdir::domain::listing::{fields, Business};
//! use marketdir::ui::{FilterableCollection, Predicate};
//!
//! let business = |id: &str, industry: &str| Business {
//!     id: id.into(),
//!     name: id.into(),
//!     industry: industry.into(),
//!     description: String::new(),
//!     city: String::new(),
//!     verified: false,
//! };
//!
//! let mut view = FilterableCollection::new(vec![
//!     business("a", "Retail"),
//!     business("b", "Food"),
//!     business("c", "Retail"),
//! ]);
//! view.set_predicate(fields::INDUSTRY, Predicate::equals("Retail"));
//!
//! let ids: Vec<_> = view.visible().map(|b| b.id.as_str()).collect();
//! assert_eq!(ids, ["a", "c"]);
//! ```

use crate::domain::listing::{fields, FieldValue, Filterable};
use std::collections::BTreeMap;

/// Value meaning "no restriction" for [`Predicate::Equals`].
pub const MATCH_ALL: &str = "all";

/// A single named filter condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Exact equality. Inactive for `""` and [`MATCH_ALL`].
    Equals(String),
    /// Case-insensitive substring over the field's text. Inactive when empty.
    Contains(String),
    /// Exact equality on a boolean field.
    Is(bool),
}

impl Predicate {
    pub fn equals(value: impl Into<String>) -> Self {
        Self::Equals(value.into())
    }

    pub fn contains(query: impl Into<String>) -> Self {
        Self::Contains(query.into())
    }

    /// Builds the predicate a screen control for `key` produces from `value`.
    ///
    /// The search box yields [`Predicate::Contains`]; every other control is a
    /// picker yielding [`Predicate::Equals`].
    pub fn for_field(key: &str, value: impl Into<String>) -> Self {
        if key == fields::SEARCH_TEXT {
            Self::Contains(value.into())
        } else {
            Self::Equals(value.into())
        }
    }

    /// Returns `false` for predicates that accept every item.
    #[must_use]
    pub fn is_active(&self) -> bool {
        match self {
            Self::Equals(value) => !value.is_empty() && value != MATCH_ALL,
            Self::Contains(query) => !query.is_empty(),
            Self::Is(_) => true,
        }
    }

    /// Tests a field value. A missing field never matches.
    #[must_use]
    pub fn matches(&self, value: Option<&FieldValue<'_>>) -> bool {
        let Some(value) = value else {
            return false;
        };

        match (self, value) {
            (Self::Equals(expected), FieldValue::Category(actual)) => *actual == expected.as_str(),
            (Self::Equals(expected), FieldValue::Text(texts)) => texts.iter().any(|t| *t == expected.as_str()),
            (Self::Equals(expected), FieldValue::Flag(flag)) => {
                expected.parse::<bool>().is_ok_and(|e| e == *flag)
            }
            (Self::Contains(query), FieldValue::Category(actual)) => contains_ignore_case(actual, query),
            (Self::Contains(query), FieldValue::Text(texts)) => {
                texts.iter().any(|t| contains_ignore_case(t, query))
            }
            (Self::Is(expected), FieldValue::Flag(flag)) => expected == flag,
            (Self::Contains(_) | Self::Is(_), _) => false,
        }
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// A record list with a derived, order-preserving visible subset.
///
/// `visible` holds ascending indices into `source`, so it is always a
/// subsequence of it. The selection cursor indexes into `visible`.
#[derive(Debug, Clone)]
pub struct FilterableCollection<T> {
    source: Vec<T>,
    predicates: BTreeMap<String, Predicate>,
    visible: Vec<usize>,
    selected_index: usize,
}

impl<T> Default for FilterableCollection<T> {
    fn default() -> Self {
        Self {
            source: Vec::new(),
            predicates: BTreeMap::new(),
            visible: Vec::new(),
            selected_index: 0,
        }
    }
}

impl<T: Filterable> FilterableCollection<T> {
    /// Creates an unfiltered view over `source`.
    #[must_use]
    pub fn new(source: Vec<T>) -> Self {
        let mut view = Self {
            source,
            ..Self::default()
        };
        view.recompute();
        view
    }

    /// Sets or replaces the predicate named `key` and recomputes.
    pub fn set_predicate(&mut self, key: impl Into<String>, predicate: Predicate) {
        self.predicates.insert(key.into(), predicate);
        self.recompute();
    }

    /// Removes the predicate named `key`, returning it if present.
    pub fn remove_predicate(&mut self, key: &str) -> Option<Predicate> {
        let removed = self.predicates.remove(key);
        if removed.is_some() {
            self.recompute();
        }
        removed
    }

    /// Drops every predicate; the visible subset becomes the whole source.
    pub fn clear(&mut self) {
        self.predicates.clear();
        self.recompute();
    }

    #[must_use]
    pub fn predicate(&self, key: &str) -> Option<&Predicate> {
        self.predicates.get(key)
    }

    /// Replaces the source, keeping the predicates.
    pub fn set_source(&mut self, source: Vec<T>) {
        self.source = source;
        self.recompute();
    }

    /// Appends records, typically one fetched page at a time.
    ///
    /// Only the new records are tested; existing visibility is unchanged.
    pub fn extend_source(&mut self, items: impl IntoIterator<Item = T>) {
        let start = self.source.len();
        self.source.extend(items);
        for index in start..self.source.len() {
            if self.accepts(&self.source[index]) {
                self.visible.push(index);
            }
        }
    }

    #[must_use]
    pub fn source(&self) -> &[T] {
        &self.source
    }

    /// Visible records in source order.
    pub fn visible(&self) -> impl Iterator<Item = &T> + '_ {
        self.visible.iter().map(|&i| &self.source[i])
    }

    /// Source indices of the visible records, ascending.
    #[must_use]
    pub fn visible_indices(&self) -> &[usize] {
        &self.visible
    }

    #[must_use]
    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }

    #[must_use]
    pub const fn selected_index(&self) -> usize {
        self.selected_index
    }

    /// Returns the record under the cursor, or `None` when nothing is visible.
    #[must_use]
    pub fn selected(&self) -> Option<&T> {
        self.visible
            .get(self.selected_index)
            .map(|&i| &self.source[i])
    }

    /// Moves the cursor down one row, wrapping to the top.
    pub fn move_selection_down(&mut self) {
        if self.visible.is_empty() {
            return;
        }
        self.selected_index = (self.selected_index + 1) % self.visible.len();
    }

    /// Moves the cursor up one row, wrapping to the bottom.
    pub fn move_selection_up(&mut self) {
        if self.visible.is_empty() {
            return;
        }
        if self.selected_index == 0 {
            self.selected_index = self.visible.len() - 1;
        } else {
            self.selected_index -= 1;
        }
    }

    fn accepts(&self, item: &T) -> bool {
        self.predicates
            .iter()
            .filter(|(_, p)| p.is_active())
            .all(|(key, p)| p.matches(item.field(key).as_ref()))
    }

    fn recompute(&mut self) {
        let _span = tracing::debug_span!(
            "recompute_visible",
            source = self.source.len(),
            predicates = self.predicates.len()
        )
        .entered();

        self.visible = (0..self.source.len())
            .filter(|&i| self.accepts(&self.source[i]))
            .collect();

        if self.visible.is_empty() {
            self.selected_index = 0;
        } else {
            self.selected_index = self.selected_index.min(self.visible.len() - 1);
        }

        tracing::trace!(visible = self.visible.len(), "visible subset recomputed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Business, Profile};

    fn business(id: &str, industry: &str, name: &str, verified: bool) -> Business {
        Business {
            id: id.to_string(),
            name: name.to_string(),
            industry: industry.to_string(),
            description: String::new(),
            city: "Accra".to_string(),
            verified,
        }
    }

    fn ids(view: &FilterableCollection<Business>) -> Vec<&str> {
        view.visible().map(|b| b.id.as_str()).collect()
    }

    fn industries() -> FilterableCollection<Business> {
        FilterableCollection::new(vec![
            business("1", "A", "Mango Stand", true),
            business("2", "A", "Corner Shop", false),
            business("3", "B", "Bakery Bliss", true),
            business("4", "C", "Tailor Works", false),
            business("5", "A", "Mango Market", true),
        ])
    }

    #[test]
    fn equals_keeps_matching_items_in_order() {
        let mut view = industries();
        view.set_predicate(fields::INDUSTRY, Predicate::equals("A"));
        assert_eq!(ids(&view), ["1", "2", "5"]);
    }

    #[test]
    fn all_and_empty_disable_equals() {
        let mut view = industries();
        view.set_predicate(fields::INDUSTRY, Predicate::equals("B"));
        assert_eq!(view.visible_len(), 1);

        view.set_predicate(fields::INDUSTRY, Predicate::equals(MATCH_ALL));
        assert_eq!(view.visible_len(), 5);

        view.set_predicate(fields::INDUSTRY, Predicate::equals(""));
        assert_eq!(view.visible_len(), 5);
    }

    #[test]
    fn empty_search_clears_text_filter_only() {
        let mut view = industries();
        view.set_predicate(fields::INDUSTRY, Predicate::equals("A"));
        view.set_predicate(fields::SEARCH_TEXT, Predicate::contains("mango"));
        assert_eq!(ids(&view), ["1", "5"]);

        view.set_predicate(fields::SEARCH_TEXT, Predicate::contains(""));
        assert_eq!(ids(&view), ["1", "2", "5"]);
    }

    #[test]
    fn whitespace_query_is_matched_literally() {
        let mut view = FilterableCollection::new(vec![
            business("1", "A", "Mango Stand", true),
            business("2", "A", "Bakery", true),
            business("3", "A", "Mango", true),
        ]);

        view.set_predicate(fields::SEARCH_TEXT, Predicate::contains(" "));
        assert_eq!(ids(&view), ["1"]);

        view.set_predicate(fields::SEARCH_TEXT, Predicate::contains("MANGO "));
        assert_eq!(ids(&view), ["1"]);
    }

    #[test]
    fn contains_is_case_insensitive() {
        let mut view = industries();
        view.set_predicate(fields::SEARCH_TEXT, Predicate::for_field(fields::SEARCH_TEXT, "BAKERY"));
        assert_eq!(ids(&view), ["3"]);
    }

    #[test]
    fn boolean_predicate_and_missing_field() {
        let mut view = industries();
        view.set_predicate(fields::VERIFIED, Predicate::Is(true));
        assert_eq!(ids(&view), ["1", "3", "5"]);

        view.set_predicate(fields::AVAILABILITY, Predicate::Is(true));
        assert!(view.is_empty());
        assert_eq!(view.selected(), None);
    }

    #[test]
    fn clear_restores_whole_source() {
        let mut view = industries();
        view.set_predicate(fields::INDUSTRY, Predicate::equals("C"));
        view.set_predicate(fields::VERIFIED, Predicate::Is(false));
        assert_eq!(ids(&view), ["4"]);

        view.clear();
        assert_eq!(ids(&view), ["1", "2", "3", "4", "5"]);
        assert!(view.predicate(fields::INDUSTRY).is_none());
    }

    #[test]
    fn remove_predicate_recomputes() {
        let mut view = industries();
        view.set_predicate(fields::INDUSTRY, Predicate::equals("B"));
        assert_eq!(view.remove_predicate(fields::INDUSTRY), Some(Predicate::equals("B")));
        assert_eq!(view.visible_len(), 5);
        assert_eq!(view.remove_predicate(fields::INDUSTRY), None);
    }

    #[test]
    fn visible_is_always_an_ordered_subsequence() {
        let queries = ["", "a", "mango", "shop", "zzz"];
        let industries_list = ["all", "A", "B", "C", ""];
        let flags = [None, Some(true), Some(false)];
        let mut view = industries();

        for query in queries {
            for industry in industries_list {
                for flag in flags {
                    view.set_predicate(fields::SEARCH_TEXT, Predicate::contains(query));
                    view.set_predicate(fields::INDUSTRY, Predicate::equals(industry));
                    match flag {
                        Some(f) => view.set_predicate(fields::VERIFIED, Predicate::Is(f)),
                        None => {
                            view.remove_predicate(fields::VERIFIED);
                        }
                    }

                    let indices = view.visible_indices();
                    assert!(indices.windows(2).all(|w| w[0] < w[1]));
                    assert!(indices.iter().all(|&i| i < view.source().len()));
                    assert!(view.selected_index() <= view.visible_len().saturating_sub(1));
                }
            }
        }
    }

    #[test]
    fn recompute_is_idempotent() {
        let mut view = industries();
        view.set_predicate(fields::SEARCH_TEXT, Predicate::contains("m"));
        let first = view.visible_indices().to_vec();
        view.set_predicate(fields::SEARCH_TEXT, Predicate::contains("m"));
        assert_eq!(view.visible_indices(), first.as_slice());
    }

    #[test]
    fn selection_wraps_and_clamps() {
        let mut view = industries();
        view.move_selection_up();
        assert_eq!(view.selected().map(|b| b.id.as_str()), Some("5"));
        view.move_selection_down();
        assert_eq!(view.selected_index(), 0);

        for _ in 0..4 {
            view.move_selection_down();
        }
        view.set_predicate(fields::INDUSTRY, Predicate::equals("A"));
        assert_eq!(view.selected_index(), 2);
        assert_eq!(view.selected().map(|b| b.id.as_str()), Some("5"));
    }

    #[test]
    fn extend_source_filters_new_pages() {
        let mut view = FilterableCollection::default();
        view.set_predicate(fields::INDUSTRY, Predicate::equals("A"));

        view.extend_source(vec![business("1", "A", "x", false), business("2", "B", "y", false)]);
        view.extend_source(vec![business("3", "A", "z", false)]);
        assert_eq!(ids(&view), ["1", "3"]);
        assert_eq!(view.source().len(), 3);

        view.set_source(vec![business("9", "A", "fresh", false)]);
        assert_eq!(ids(&view), ["9"]);
    }

    #[test]
    fn equals_matches_any_text_entry() {
        let mut view = FilterableCollection::new(vec![Profile {
            id: "p".to_string(),
            name: "Ife".to_string(),
            profession: "Designer".to_string(),
            skills: vec!["Figma".to_string(), "Branding".to_string()],
            city: "Lagos".to_string(),
            available: true,
        }]);
        view.set_predicate(fields::SEARCH_TEXT, Predicate::equals("Figma"));
        assert_eq!(view.visible_len(), 1);
        view.set_predicate(fields::SEARCH_TEXT, Predicate::contains("brand"));
        assert_eq!(view.visible_len(), 1);
    }
}
