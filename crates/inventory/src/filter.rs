//! User-chosen predicates that narrow the displayed list.
//!
//! A `FilterSet` holds at most one filter per kind; an item is shown when it
//! satisfies every active filter. Filters never touch the selection or the
//! underlying list, they only decide visibility.

use chrono::NaiveDate;

use homestock_core::Entity;

use crate::item::Item;
use crate::tag::Tag;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum FilterKind {
    DateRange,
    Make,
    Keywords,
    Tags,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// Acquired on a calendar day within `start..=end` (UTC).
    DateRange { start: NaiveDate, end: NaiveDate },
    /// Make equals one of these, ignoring case.
    Make(Vec<String>),
    /// Description contains every keyword, ignoring case.
    Keywords(Vec<String>),
    /// Item belongs to at least one of these tags.
    Tags(Vec<Tag>),
}

impl Filter {
    pub fn kind(&self) -> FilterKind {
        match self {
            Filter::DateRange { .. } => FilterKind::DateRange,
            Filter::Make(_) => FilterKind::Make,
            Filter::Keywords(_) => FilterKind::Keywords,
            Filter::Tags(_) => FilterKind::Tags,
        }
    }

    /// Empty make/keyword/tag lists constrain nothing.
    pub fn matches(&self, item: &Item) -> bool {
        match self {
            Filter::DateRange { start, end } => {
                let day = item.acquisition_date().date_naive();
                *start <= day && day <= *end
            }
            Filter::Make(makes) => {
                makes.is_empty()
                    || makes
                        .iter()
                        .any(|make| make.trim().eq_ignore_ascii_case(item.make().trim()))
            }
            Filter::Keywords(keywords) => keywords
                .iter()
                .map(|k| k.trim())
                .filter(|k| !k.is_empty())
                .all(|k| item.matches_keyword(k)),
            Filter::Tags(tags) => tags.is_empty() || tags.iter().any(|tag| tag.contains(item.id())),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    filters: Vec<Filter>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a filter, replacing any active filter of the same kind.
    pub fn set(&mut self, filter: Filter) {
        self.remove(filter.kind());
        self.filters.push(filter);
    }

    pub fn remove(&mut self, kind: FilterKind) -> Option<Filter> {
        let pos = self.filters.iter().position(|f| f.kind() == kind)?;
        Some(self.filters.remove(pos))
    }

    pub fn clear(&mut self) {
        self.filters.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn active(&self) -> &[Filter] {
        &self.filters
    }

    pub fn matches(&self, item: &Item) -> bool {
        self.filters.iter().all(|f| f.matches(item))
    }

    /// Visible subset, in list order.
    pub fn apply<'a>(&self, items: &'a [Item]) -> Vec<&'a Item> {
        items.iter().filter(|item| self.matches(item)).collect()
    }
}
