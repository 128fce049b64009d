//! # Entry Identifiers: Id vs Display Index
//!
//! Entry ids are millisecond timestamps: unique and stable, but nobody wants to
//! type `1729242000000`. Users refer to entries by **display index** instead.
//!
//! ## Canonical Ordering
//!
//! The display index is the 1-based position in the live, newest-first list,
//! regardless of the filter or sort applied to the current view. `lj rm 2`
//! therefore targets the same entry whether or not `lj list --status done`
//! happens to show it.
//!
//! ## Selector Grammar
//!
//! - **Index**: `N` (e.g. `1`, `42`)
//! - **Range**: `Start-End` (e.g. `1-5`); start must be <= end
//! - **Id**: `#<id>` (e.g. `#1729242000000`)

use crate::model::{favicon_url, Entry, EntryId};
use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntrySelector {
    Index(usize),
    Range(usize, usize),
    Id(EntryId),
}

impl fmt::Display for EntrySelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntrySelector::Index(i) => write!(f, "{}", i),
            EntrySelector::Range(start, end) => write!(f, "{}-{}", start, end),
            EntrySelector::Id(id) => write!(f, "#{}", id),
        }
    }
}

impl FromStr for EntrySelector {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(id) = s.strip_prefix('#') {
            return id
                .parse()
                .map(|n| EntrySelector::Id(EntryId(n)))
                .map_err(|_| format!("Invalid entry id: {}", s));
        }

        // Don't treat a leading '-' as a range separator
        if let Some(dash_pos) = s.find('-').filter(|&pos| pos > 0) {
            let start = parse_index(&s[..dash_pos])?;
            let end = parse_index(&s[dash_pos + 1..])?;
            if start > end {
                return Err(format!("Invalid range {}: start is after end", s));
            }
            return Ok(EntrySelector::Range(start, end));
        }

        parse_index(s).map(EntrySelector::Index)
    }
}

fn parse_index(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("Indexes start at 1".to_string()),
        Ok(n) => Ok(n),
        Err(_) => Err(format!("Invalid index: {}", s)),
    }
}

/// An entry together with its canonical display index.
///
/// Serializes with a derived `favicon` field for links, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayEntry {
    pub index: usize,
    pub entry: Entry,
}

impl Serialize for DisplayEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let favicon = self.entry.url().and_then(favicon_url);
        let len = if favicon.is_some() { 3 } else { 2 };
        let mut state = serializer.serialize_struct("DisplayEntry", len)?;
        state.serialize_field("index", &self.index)?;
        state.serialize_field("entry", &self.entry)?;
        if let Some(favicon) = &favicon {
            state.serialize_field("favicon", favicon)?;
        }
        state.end()
    }
}

/// Pairs every entry with its 1-based position in store order.
pub fn index_entries(entries: &[Entry]) -> Vec<DisplayEntry> {
    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| DisplayEntry {
            index: i + 1,
            entry: entry.clone(),
        })
        .collect()
}

/// Outcome of mapping selectors onto the live list.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Matched ids, deduplicated, in selector order.
    pub ids: Vec<EntryId>,
    /// Selectors (or parts of ranges) that matched nothing.
    pub missing: Vec<EntrySelector>,
}

pub fn resolve_selectors(entries: &[Entry], selectors: &[EntrySelector]) -> Resolution {
    let mut resolution = Resolution::default();
    fn push(resolution: &mut Resolution, id: EntryId) {
        if !resolution.ids.contains(&id) {
            resolution.ids.push(id);
        }
    }

    for selector in selectors {
        match *selector {
            EntrySelector::Index(i) => match entries.get(i - 1) {
                Some(entry) => push(&mut resolution, entry.id),
                None => resolution.missing.push(*selector),
            },
            EntrySelector::Range(start, end) => {
                let last = end.min(entries.len());
                for entry in entries.iter().take(last).skip(start - 1) {
                    push(&mut resolution, entry.id);
                }
                // Whatever lies past the list is reported once
                if end > entries.len() {
                    let first_missing = start.max(entries.len() + 1);
                    resolution.missing.push(if first_missing == end {
                        EntrySelector::Index(end)
                    } else {
                        EntrySelector::Range(first_missing, end)
                    });
                }
            }
            EntrySelector::Id(id) => {
                if entries.iter().any(|e| e.id == id) {
                    push(&mut resolution, id);
                } else {
                    resolution.missing.push(*selector);
                }
            }
        }
    }
    resolution
}
