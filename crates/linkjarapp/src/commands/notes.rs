use crate::clock::Clock;
use crate::commands::helpers::{display_entry, resolve};
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::index::EntrySelector;
use crate::model::EntryPatch;
use crate::store::{EntryStore, KeyValueStore};

/// Replaces the notes of the selected entries. Without `notes`, only reports
/// the selected entries so the UI can show their current notes.
pub fn run<B: KeyValueStore, C: Clock>(
    store: &mut EntryStore<B, C>,
    selectors: &[EntrySelector],
    notes: Option<String>,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    let ids = resolve(store, selectors, &mut result);

    for id in ids {
        if let Some(text) = &notes {
            store.update(id, &EntryPatch::notes(text.clone()));
        }
        let Some(shown) = display_entry(store, id) else {
            continue;
        };
        if notes.is_some() {
            result.add_message(CmdMessage::success(format!(
                "Notes updated ({}): {}",
                shown.index,
                shown.entry.display_title()
            )));
        }
        result.affected_entries.push(shown);
    }

    Ok(result)
}
