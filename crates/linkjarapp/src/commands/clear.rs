use crate::clock::Clock;
use crate::commands::helpers::{count_of, undo_hint};
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::{EntryStore, KeyValueStore};

pub fn run<B: KeyValueStore, C: Clock>(store: &mut EntryStore<B, C>) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    let count = store.clear();
    if count == 0 {
        result.add_message(CmdMessage::info("Jar is already empty"));
    } else {
        result.add_message(CmdMessage::success(format!(
            "Cleared {}. {}",
            count_of(count),
            undo_hint(store)
        )));
    }
    Ok(result)
}
