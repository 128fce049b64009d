use crate::clock::Clock;
use crate::commands::helpers::{display_entry, resolve};
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::index::EntrySelector;
use crate::model::{EntryPatch, PriorityState};
use crate::store::{EntryStore, KeyValueStore};

/// Advances each selected entry one step along the priority cycle, or sets
/// every one of them to `state` when given.
pub fn run<B: KeyValueStore, C: Clock>(
    store: &mut EntryStore<B, C>,
    selectors: &[EntrySelector],
    state: Option<PriorityState>,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    let ids = resolve(store, selectors, &mut result);

    for id in ids {
        let updated = match state {
            Some(state) => store
                .update(id, &EntryPatch::priority(state))
                .map(|e| e.priority),
            None => store.cycle_priority(id),
        };
        let (Some(priority), Some(shown)) = (updated, display_entry(store, id)) else {
            continue;
        };
        result.add_message(CmdMessage::success(format!(
            "{} ({}): {}",
            priority.label(),
            shown.index,
            shown.entry.display_title()
        )));
        result.affected_entries.push(shown);
    }

    Ok(result)
}
