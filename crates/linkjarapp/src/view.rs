//! # View Derivation
//!
//! Pure functions turning the store's snapshot into what a UI shows. Nothing
//! here mutates the store or touches storage.
//!
//! ## Pipeline
//!
//! [`derive`] always runs **filter → sort → group**. Sorting before grouping
//! means the order inside each day bucket is the requested sort order, and the
//! order of the buckets themselves follows from it (first-encountered day
//! first). With the default newest-first sort, today's bucket comes first.
//!
//! ## Filters
//!
//! - **Status**: `All` or one exact [`PriorityState`].
//! - **Domain**: case-insensitive substring match against the hostname of `url`
//!   entries. Text and image entries never match a non-empty domain filter.
//! - **Category** / **Kind**: exact match.
//!
//! All active filters must match (AND).

use crate::model::{display_host, Category, Entry, EntryKind, PriorityState};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(PriorityState),
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            return Ok(StatusFilter::All);
        }
        s.parse().map(StatusFilter::Only)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryFilter {
    pub status: StatusFilter,
    pub domain: Option<String>,
    pub category: Option<Category>,
    pub kind: Option<EntryKind>,
}

impl EntryFilter {
    pub fn matches(&self, entry: &Entry) -> bool {
        let status_ok = match self.status {
            StatusFilter::All => true,
            StatusFilter::Only(state) => entry.priority == state,
        };
        status_ok
            && self.domain_matches(entry)
            && self.category.map_or(true, |c| entry.category == Some(c))
            && self.kind.map_or(true, |k| entry.kind() == k)
    }

    fn domain_matches(&self, entry: &Entry) -> bool {
        let needle = match self.domain.as_deref().map(str::trim) {
            Some(d) if !d.is_empty() => d.to_lowercase(),
            _ => return true,
        };
        match entry.url() {
            Some(url) => display_host(url).to_lowercase().contains(&needle),
            None => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    #[default]
    NewestFirst,
    OldestFirst,
    /// Flagged entries first; otherwise the incoming order is kept.
    PriorityFirst,
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SortMode::NewestFirst => "newest",
            SortMode::OldestFirst => "oldest",
            SortMode::PriorityFirst => "priority",
        };
        f.write_str(name)
    }
}

impl FromStr for SortMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "newest" | "newest-first" => Ok(SortMode::NewestFirst),
            "oldest" | "oldest-first" => Ok(SortMode::OldestFirst),
            "priority" | "priority-first" => Ok(SortMode::PriorityFirst),
            other => Err(format!("unknown sort mode '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewOptions {
    pub filter: EntryFilter,
    pub sort: SortMode,
}

/// Entries created on the same calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateGroup {
    pub date: NaiveDate,
    pub entries: Vec<Entry>,
}

impl DateGroup {
    /// Short heading such as `Oct 18`.
    pub fn label(&self) -> String {
        date_label(self.date)
    }
}

pub fn filter(entries: &[Entry], filter: &EntryFilter) -> Vec<Entry> {
    entries
        .iter()
        .filter(|e| filter.matches(e))
        .cloned()
        .collect()
}

/// Stable sort, so equal keys keep their relative order.
pub fn sort(mut entries: Vec<Entry>, mode: SortMode) -> Vec<Entry> {
    match mode {
        SortMode::NewestFirst => entries.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortMode::OldestFirst => entries.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        SortMode::PriorityFirst => entries.sort_by_key(|e| !e.priority.is_flagged()),
    }
    entries
}

/// Buckets by calendar day in `tz`, buckets ordered by first appearance.
pub fn group_by_date<Tz: TimeZone>(entries: Vec<Entry>, tz: &Tz) -> Vec<DateGroup> {
    let mut groups: Vec<DateGroup> = Vec::new();
    for entry in entries {
        let date = entry.created_at.with_timezone(tz).date_naive();
        match groups.iter_mut().find(|g| g.date == date) {
            Some(group) => group.entries.push(entry),
            None => groups.push(DateGroup {
                date,
                entries: vec![entry],
            }),
        }
    }
    groups
}

/// Filter, then sort, then group.
pub fn derive<Tz: TimeZone>(entries: &[Entry], options: &ViewOptions, tz: &Tz) -> Vec<DateGroup> {
    let filtered = filter(entries, &options.filter);
    let sorted = sort(filtered, options.sort);
    group_by_date(sorted, tz)
}

pub fn date_label(date: NaiveDate) -> String {
    date.format("%b %-d").to_string()
}

/// Wall-clock time such as `3:05 PM`.
pub fn time_label<Tz: TimeZone>(at: DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: fmt::Display,
{
    at.with_timezone(tz).format("%-I:%M %p").to_string()
}
