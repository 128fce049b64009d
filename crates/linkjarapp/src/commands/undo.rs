use crate::clock::Clock;
use crate::commands::helpers::{count_of, display_entry};
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::{EntryStore, KeyValueStore};

/// Restores the last deleted or cleared batch if the grace window is open.
pub fn run<B: KeyValueStore, C: Clock>(store: &mut EntryStore<B, C>) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    let restored = store.undo();
    if restored.is_empty() {
        result.add_message(CmdMessage::info("Nothing to undo"));
        return Ok(result);
    }

    result.affected_entries = restored
        .iter()
        .filter_map(|id| display_entry(store, *id))
        .collect();
    result.add_message(CmdMessage::success(format!(
        "Restored {}",
        count_of(restored.len())
    )));
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{clear, delete};
    use crate::index::EntrySelector;
    use crate::store::memory::fixtures::StoreFixture;
    use chrono::Duration;

    #[test]
    fn test_undo_restores_batch_to_front() {
        let mut store = StoreFixture::new().with_texts(3).build();
        let original: Vec<_> = store.entries().iter().map(|e| e.id).collect();
        delete::run(
            &mut store,
            &[EntrySelector::Index(2), EntrySelector::Index(3)],
        )
        .unwrap();

        let result = run(&mut store).unwrap();
        let order: Vec<_> = store.entries().iter().map(|e| e.id).collect();
        assert_eq!(order, vec![original[1], original[2], original[0]]);
        let indexes: Vec<_> = result.affected_entries.iter().map(|d| d.index).collect();
        assert_eq!(indexes, vec![1, 2]);
        assert_eq!(result.messages[0].content, "Restored 2 entries");
    }

    #[test]
    fn test_second_undo_is_noop() {
        let mut store = StoreFixture::new().with_texts(2).build();
        clear::run(&mut store).unwrap();
        run(&mut store).unwrap();
        let result = run(&mut store).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(result.messages, vec![CmdMessage::info("Nothing to undo")]);
    }

    #[test]
    fn test_undo_after_grace_window_does_nothing() {
        let mut store = StoreFixture::new().with_texts(2).build();
        clear::run(&mut store).unwrap();
        store.clock().advance(Duration::seconds(6));
        let result = run(&mut store).unwrap();
        assert!(store.is_empty());
        assert!(result.affected_entries.is_empty());
    }
}
