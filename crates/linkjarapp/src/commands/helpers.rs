use crate::clock::Clock;
use crate::commands::{CmdMessage, CmdResult};
use crate::index::{index_entries, resolve_selectors, DisplayEntry, EntrySelector};
use crate::model::EntryId;
use crate::store::{EntryStore, KeyValueStore};

pub fn indexed_entries<B: KeyValueStore, C: Clock>(store: &EntryStore<B, C>) -> Vec<DisplayEntry> {
    index_entries(store.entries())
}

/// Resolves selectors against the live list. Selectors that match nothing
/// become warnings on `result` instead of errors.
pub fn resolve<B: KeyValueStore, C: Clock>(
    store: &EntryStore<B, C>,
    selectors: &[EntrySelector],
    result: &mut CmdResult,
) -> Vec<EntryId> {
    let resolution = resolve_selectors(store.entries(), selectors);
    for selector in &resolution.missing {
        result.add_message(CmdMessage::warning(format!("No entry at {}", selector)));
    }
    resolution.ids
}

/// The entry with `id` and its current display index.
pub fn display_entry<B: KeyValueStore, C: Clock>(
    store: &EntryStore<B, C>,
    id: EntryId,
) -> Option<DisplayEntry> {
    store
        .entries()
        .iter()
        .position(|e| e.id == id)
        .map(|pos| DisplayEntry {
            index: pos + 1,
            entry: store.entries()[pos].clone(),
        })
}

/// How long the pending batch stays restorable, for delete and clear messages.
pub fn undo_hint<B: KeyValueStore, C: Clock>(store: &EntryStore<B, C>) -> String {
    let secs = store
        .undo_remaining()
        .map(|left| left.num_seconds())
        .unwrap_or(0);
    format!("Run `undo` within {}s to restore.", secs)
}

/// `1 entry`, `3 entries`.
pub fn count_of(count: usize) -> String {
    if count == 1 {
        "1 entry".to_string()
    } else {
        format!("{} entries", count)
    }
}
