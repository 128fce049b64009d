use crate::clock::Clock;
use crate::commands::helpers::{count_of, resolve, undo_hint};
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::index::{DisplayEntry, EntrySelector};
use crate::store::{EntryStore, KeyValueStore};

/// Removes the selected entries as one undoable batch.
///
/// `affected_entries` carry the index each entry had before removal.
pub fn run<B: KeyValueStore, C: Clock>(
    store: &mut EntryStore<B, C>,
    selectors: &[EntrySelector],
) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    let ids = resolve(store, selectors, &mut result);
    if ids.is_empty() {
        result.add_message(CmdMessage::info("Nothing to delete"));
        return Ok(result);
    }

    let before: Vec<DisplayEntry> = store
        .entries()
        .iter()
        .enumerate()
        .filter(|(_, e)| ids.contains(&e.id))
        .map(|(pos, e)| DisplayEntry {
            index: pos + 1,
            entry: e.clone(),
        })
        .collect();

    let removed = store.remove_many(&ids);
    result.add_message(CmdMessage::success(format!(
        "Deleted {}. {}",
        count_of(removed.len()),
        undo_hint(store)
    )));
    Ok(result.with_affected_entries(before))
}
