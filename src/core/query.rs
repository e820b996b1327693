//! Filter, sort and pagination state for client-side list views
//!
//! Everything here is a pure function of its inputs: the collection is only
//! ever borrowed, and the derived view holds references into it.
//!
//! # Example
//! ```rust,ignore
//! let mut filter = FilterState::default();
//! filter.set_search("report");
//! filter.set_enum("status", "done");
//!
//! let mut sort = SortState::default();
//! sort.toggle("due_date"); // ascending
//! sort.toggle("due_date"); // descending
//!
//! let view = derive_view(&tasks, &filter, &sort);
//! let page = paginate(&view, 1, 10);
//! ```

use crate::core::entity::ListItem;
use indexmap::IndexMap;
use std::cmp::Ordering;

/// Value that clears an enum constraint, as sent by "All" select options
pub const ALL: &str = "all";

/// Current predicate of a list view
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    /// Free-text search, matched case-insensitively against search fields
    search: String,

    /// Field -> required enum key (e.g. status -> done)
    enums: IndexMap<String, String>,

    /// Field -> required related record id (e.g. assigned_to -> u-1)
    relations: IndexMap<String, String>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
    }

    /// Constrain `field` to `value`; empty or `"all"` removes the constraint
    pub fn set_enum(&mut self, field: impl Into<String>, value: impl Into<String>) {
        let field = field.into();
        let value = value.into();
        if value.trim().is_empty() || value.eq_ignore_ascii_case(ALL) {
            self.enums.shift_remove(&field);
        } else {
            self.enums.insert(field, value);
        }
    }

    /// Constrain a relation field to one related id; `None` clears it
    pub fn set_relation(&mut self, field: impl Into<String>, id: Option<String>) {
        let field = field.into();
        match id.filter(|id| !id.trim().is_empty()) {
            Some(id) => {
                self.relations.insert(field, id);
            }
            None => {
                self.relations.shift_remove(&field);
            }
        }
    }

    /// Active enum constraint for `field`, if any
    pub fn enum_value(&self, field: &str) -> Option<&str> {
        self.enums.get(field).map(String::as_str)
    }

    /// Active relation constraint for `field`, if any
    pub fn relation_value(&self, field: &str) -> Option<&str> {
        self.relations.get(field).map(String::as_str)
    }

    /// Drop every predicate
    pub fn clear(&mut self) {
        self.search.clear();
        self.enums.clear();
        self.relations.clear();
    }

    /// Whether any predicate is active
    pub fn is_active(&self) -> bool {
        !self.search.trim().is_empty() || !self.enums.is_empty() || !self.relations.is_empty()
    }

    /// Check a single item against every active predicate
    pub fn matches<T: ListItem>(&self, item: &T) -> bool {
        self.matches_search(item) && self.matches_enums(item) && self.matches_relations(item)
    }

    fn matches_search<T: ListItem>(&self, item: &T) -> bool {
        let needle = self.search.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        T::search_fields().iter().any(|field| {
            item.field_value(field)
                .is_some_and(|value| value.contains_lowercase(&needle))
        })
    }

    fn matches_enums<T: ListItem>(&self, item: &T) -> bool {
        self.enums.iter().all(|(field, expected)| {
            item.field_value(field)
                .is_some_and(|value| value.matches_key(expected))
        })
    }

    fn matches_relations<T: ListItem>(&self, item: &T) -> bool {
        self.relations.iter().all(|(field, expected)| {
            item.field_value(field)
                .is_some_and(|value| value.as_text() == Some(expected.as_str()))
        })
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    pub fn flipped(self) -> Self {
        match self {
            Direction::Asc => Direction::Desc,
            Direction::Desc => Direction::Asc,
        }
    }

    /// Arrow shown next to the active column header
    pub fn arrow(self) -> char {
        match self {
            Direction::Asc => '▲',
            Direction::Desc => '▼',
        }
    }
}

/// The single active sort column
///
/// `None` keeps the collection order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortState {
    active: Option<(String, Direction)>,
}

impl SortState {
    pub fn by(field: impl Into<String>, direction: Direction) -> Self {
        Self {
            active: Some((field.into(), direction)),
        }
    }

    /// Parse `field`, `field:asc` or `field:desc`
    pub fn parse(spec: &str) -> Option<Self> {
        let (field, direction) = match spec.split_once(':') {
            Some((field, "desc")) => (field, Direction::Desc),
            Some((field, "asc")) => (field, Direction::Asc),
            Some(_) => return None,
            None => (spec, Direction::Asc),
        };
        let field = field.trim();
        if field.is_empty() {
            return None;
        }
        Some(Self::by(field, direction))
    }

    pub fn field(&self) -> Option<&str> {
        self.active.as_ref().map(|(field, _)| field.as_str())
    }

    pub fn direction(&self) -> Option<Direction> {
        self.active.as_ref().map(|(_, direction)| *direction)
    }

    /// Column header click: same field flips, new field starts ascending
    pub fn toggle(&mut self, field: &str) {
        self.active = match self.active.take() {
            Some((current, direction)) if current == field => Some((current, direction.flipped())),
            _ => Some((field.to_string(), Direction::Asc)),
        };
    }

    pub fn clear(&mut self) {
        self.active = None;
    }

    /// Compare two items under this sort; `Equal` when no sort is active
    pub fn compare<T: ListItem>(&self, a: &T, b: &T) -> Ordering {
        let Some((field, direction)) = &self.active else {
            return Ordering::Equal;
        };
        let ordering = match (a.field_value(field), b.field_value(field)) {
            (Some(a), Some(b)) => a.compare(&b),
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        match direction {
            Direction::Asc => ordering,
            Direction::Desc => ordering.reverse(),
        }
    }
}

/// Items that pass `filter`, in collection order
pub fn filter<'a, T: ListItem>(items: &'a [T], filter: &FilterState) -> Vec<&'a T> {
    items.iter().filter(|item| filter.matches(*item)).collect()
}

/// Stable sort of `items` under `sort`
pub fn sort<'a, T: ListItem>(items: &'a [T], sort: &SortState) -> Vec<&'a T> {
    let mut sorted: Vec<&T> = items.iter().collect();
    sort_refs(&mut sorted, sort);
    sorted
}

fn sort_refs<T: ListItem>(items: &mut [&T], sort: &SortState) {
    if sort.active.is_some() {
        // slice::sort_by is stable: equal keys keep collection order
        items.sort_by(|a, b| sort.compare(*a, *b));
    }
}

/// The filtered and sorted view of a collection
pub fn derive_view<'a, T: ListItem>(
    items: &'a [T],
    filter_state: &FilterState,
    sort_state: &SortState,
) -> Vec<&'a T> {
    let mut view = filter(items, filter_state);
    sort_refs(&mut view, sort_state);
    view
}

/// Maximum page size accepted by [`paginate`]
pub const MAX_PAGE_SIZE: usize = 100;

/// One page of a derived view
#[derive(Debug)]
pub struct Page<'v, T> {
    pub items: &'v [T],
    pub meta: PaginationMeta,
}

/// Pagination metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationMeta {
    /// Current page number (starts at 1)
    pub page: usize,

    /// Number of items per page
    pub limit: usize,

    /// Total number of items (after filters)
    pub total: usize,

    /// Total number of pages
    pub total_pages: usize,

    /// Whether there is a next page
    pub has_next: bool,

    /// Whether there is a previous page
    pub has_prev: bool,
}

impl PaginationMeta {
    /// Create pagination metadata, clamping page to at least 1 and limit to 1..=100
    pub fn new(page: usize, limit: usize, total: usize) -> Self {
        let page = page.max(1);
        let limit = limit.clamp(1, MAX_PAGE_SIZE);
        let total_pages = if total == 0 { 0 } else { total.div_ceil(limit) };
        let start = (page - 1).saturating_mul(limit);

        Self {
            page,
            limit,
            total,
            total_pages,
            has_next: start.saturating_add(limit) < total,
            has_prev: page > 1,
        }
    }

    fn range(&self) -> std::ops::Range<usize> {
        let start = (self.page - 1).saturating_mul(self.limit).min(self.total);
        let end = start.saturating_add(self.limit).min(self.total);
        start..end
    }
}

/// Slice one page out of a derived view
pub fn paginate<T>(view: &[T], page: usize, limit: usize) -> Page<'_, T> {
    let meta = PaginationMeta::new(page, limit, view.len());
    Page {
        items: &view[meta.range()],
        meta,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entity::RecordId;
    use crate::core::field::FieldValue;

    #[derive(Clone, Debug, PartialEq)]
    struct Row {
        id: RecordId,
        name: String,
        status: &'static str,
        owner: Option<&'static str>,
    }

    fn row(id: &str, name: &str, status: &'static str) -> Row {
        Row {
            id: RecordId::new(id),
            name: name.to_string(),
            status,
            owner: None,
        }
    }

    impl ListItem for Row {
        fn resource_name() -> &'static str {
            "rows"
        }

        fn resource_name_singular() -> &'static str {
            "row"
        }

        fn id(&self) -> &RecordId {
            &self.id
        }

        fn search_fields() -> &'static [&'static str] {
            &["name"]
        }

        fn sortable_fields() -> &'static [&'static str] {
            &["name", "status"]
        }

        fn field_value(&self, field: &str) -> Option<FieldValue> {
            match field {
                "name" => Some(FieldValue::text(&self.name)),
                "status" => Some(FieldValue::Variant {
                    ordinal: if self.status == "todo" { 0 } else { 1 },
                    key: self.status,
                    aliases: &[],
                }),
                "owner" => Some(FieldValue::optional(self.owner, FieldValue::text)),
                _ => None,
            }
        }
    }

    fn names(view: &[&Row]) -> Vec<String> {
        view.iter().map(|r| r.name.clone()).collect()
    }

    #[test]
    fn test_scenario_sort_and_filter() {
        let items = vec![row("1", "B", "todo"), row("2", "A", "done")];

        let asc = sort(&items, &SortState::by("name", Direction::Asc));
        assert_eq!(names(&asc), vec!["A", "B"]);

        let desc = sort(&items, &SortState::by("name", Direction::Desc));
        assert_eq!(names(&desc), vec!["B", "A"]);

        let mut f = FilterState::new();
        f.set_enum("status", "done");
        let filtered = filter(&items, &f);
        assert_eq!(filtered, vec![&items[1]]);
    }

    #[test]
    fn test_toggle_flips_then_resets() {
        let mut s = SortState::default();
        s.toggle("name");
        assert_eq!(s.direction(), Some(Direction::Asc));
        s.toggle("name");
        assert_eq!(s.direction(), Some(Direction::Desc));
        // a third click goes back to ascending, never to unsorted
        s.toggle("name");
        assert_eq!(s.field(), Some("name"));
        assert_eq!(s.direction(), Some(Direction::Asc));
        s.toggle("status");
        assert_eq!(s.field(), Some("status"));
        assert_eq!(s.direction(), Some(Direction::Asc));
    }

    #[test]
    fn test_all_clears_enum_constraint() {
        let mut f = FilterState::new();
        f.set_enum("status", "done");
        assert_eq!(f.enum_value("status"), Some("done"));
        f.set_enum("status", "All");
        assert_eq!(f.enum_value("status"), None);
        assert!(!f.is_active());
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let items = vec![row("1", "Quarterly Report", "todo"), row("2", "Lunch", "todo")];
        let mut f = FilterState::new();
        f.set_search("  REPORT ");
        assert_eq!(names(&filter(&items, &f)), vec!["Quarterly Report"]);
    }

    #[test]
    fn test_relation_filter() {
        let mut mine = row("1", "Mine", "todo");
        mine.owner = Some("u-1");
        let items = vec![mine, row("2", "Unassigned", "todo")];

        let mut f = FilterState::new();
        f.set_relation("owner", Some("u-1".to_string()));
        assert_eq!(names(&filter(&items, &f)), vec!["Mine"]);

        f.set_relation("owner", None);
        assert_eq!(filter(&items, &f).len(), 2);
    }

    #[test]
    fn test_unknown_field_never_matches() {
        let items = vec![row("1", "A", "todo")];
        let mut f = FilterState::new();
        f.set_enum("colour", "red");
        assert!(filter(&items, &f).is_empty());
    }

    #[test]
    fn test_stable_for_equal_keys() {
        let items = vec![
            row("1", "x", "done"),
            row("2", "y", "todo"),
            row("3", "z", "done"),
            row("4", "w", "todo"),
        ];
        let asc = sort(&items, &SortState::by("status", Direction::Asc));
        let ids: Vec<&str> = asc.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "4", "1", "3"]);

        let desc = sort(&items, &SortState::by("status", Direction::Desc));
        let ids: Vec<&str> = desc.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3", "2", "4"]);
    }

    #[test]
    fn test_no_sort_keeps_order() {
        let items = vec![row("1", "B", "todo"), row("2", "A", "todo")];
        let view = derive_view(&items, &FilterState::new(), &SortState::default());
        assert_eq!(names(&view), vec!["B", "A"]);
    }

    #[test]
    fn test_sort_parse() {
        assert_eq!(
            SortState::parse("due_date:desc"),
            Some(SortState::by("due_date", Direction::Desc))
        );
        assert_eq!(
            SortState::parse("name"),
            Some(SortState::by("name", Direction::Asc))
        );
        assert_eq!(SortState::parse("name:sideways"), None);
        assert_eq!(SortState::parse(""), None);
    }

    #[test]
    fn test_pagination_meta() {
        let meta = PaginationMeta::new(1, 20, 145);
        assert_eq!(meta.total, 145);
        assert_eq!(meta.total_pages, 8);
        assert!(!meta.has_prev);
        assert!(meta.has_next);

        let clamped = PaginationMeta::new(0, 1000, 5);
        assert_eq!(clamped.page, 1);
        assert_eq!(clamped.limit, MAX_PAGE_SIZE);
    }

    #[test]
    fn test_paginate_slices_and_handles_overflow() {
        let data: Vec<u32> = (1..=25).collect();
        let page = paginate(&data, 3, 10);
        assert_eq!(page.items, &[21, 22, 23, 24, 25]);
        assert!(!page.meta.has_next);

        let beyond = paginate(&data, 9, 10);
        assert!(beyond.items.is_empty());

        let empty: Vec<u32> = Vec::new();
        let page = paginate(&empty, 1, 10);
        assert!(page.items.is_empty());
        assert_eq!(page.meta.total_pages, 0);
    }

    #[test]
    fn test_huge_page_number_saturates() {
        let meta = PaginationMeta::new(usize::MAX, 10, 5);
        assert_eq!(meta.page, usize::MAX);
        assert_eq!(meta.total_pages, 1);
        assert!(!meta.has_next);
        assert!(meta.has_prev);

        let data: Vec<u32> = (1..=5).collect();
        let page = paginate(&data, usize::MAX, MAX_PAGE_SIZE);
        assert!(page.items.is_empty());
        assert!(!page.meta.has_next);

        let empty: Vec<u32> = Vec::new();
        assert!(paginate(&empty, usize::MAX, 1).items.is_empty());
    }
}
