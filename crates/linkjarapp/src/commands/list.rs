use crate::clock::Clock;
use crate::commands::{CmdMessage, CmdResult, ListedGroup};
use crate::error::Result;
use crate::index::DisplayEntry;
use crate::model::EntryId;
use crate::store::{EntryStore, KeyValueStore};
use crate::view::{self, ViewOptions};
use chrono::TimeZone;
use std::collections::HashMap;

/// Derives the grouped view. Entries keep their canonical index, so the
/// numbers shown under a filter still work as selectors.
pub fn run<B: KeyValueStore, C: Clock, Tz: TimeZone>(
    store: &EntryStore<B, C>,
    options: &ViewOptions,
    tz: &Tz,
) -> Result<CmdResult> {
    let positions: HashMap<EntryId, usize> = store
        .entries()
        .iter()
        .enumerate()
        .map(|(pos, e)| (e.id, pos + 1))
        .collect();

    let groups: Vec<ListedGroup> = view::derive(store.entries(), options, tz)
        .into_iter()
        .map(|group| ListedGroup {
            date: group.date,
            label: group.label(),
            entries: group
                .entries
                .into_iter()
                .map(|entry| DisplayEntry {
                    index: positions.get(&entry.id).copied().unwrap_or_default(),
                    entry,
                })
                .collect(),
        })
        .collect();

    let mut result = CmdResult::default().with_listed_groups(groups);
    if result.listed_groups.is_empty() {
        let message = if store.is_empty() {
            "No entries yet"
        } else {
            "No entries match the current filter"
        };
        result.add_message(CmdMessage::info(message));
    }
    Ok(result)
}
