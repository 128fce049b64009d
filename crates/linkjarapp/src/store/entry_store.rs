use super::backend::KeyValueStore;
use crate::clock::{Clock, SystemClock};
use crate::error::Result;
use crate::ids::IdGenerator;
use crate::model::{Entry, EntryDraft, EntryId, EntryPatch, PriorityState};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub const DEFAULT_STORAGE_KEY: &str = "links";
pub const DEFAULT_UNDO_GRACE_SECS: u64 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreOptions {
    /// Key the entry list is stored under. The undo batch lives at `<key>.undo`.
    pub key: String,
    /// How long a deleted batch stays restorable.
    pub grace: Duration,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            key: DEFAULT_STORAGE_KEY.to_string(),
            grace: Duration::seconds(DEFAULT_UNDO_GRACE_SECS as i64),
        }
    }
}

impl StoreOptions {
    pub fn undo_key(&self) -> String {
        format!("{}.undo", self.key)
    }
}

/// The most recent delete or clear, kept until the grace window closes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UndoBatch {
    pub captured_at: DateTime<Utc>,
    pub entries: Vec<Entry>,
}

/// Ordered, newest-first entry list synced to a [`KeyValueStore`].
///
/// Mutations never fail: each one writes through to the backend and a failed
/// write is logged and dropped. Call [`EntryStore::save`] directly when the
/// caller needs to know whether the write landed.
pub struct EntryStore<B: KeyValueStore, C: Clock = SystemClock> {
    backend: B,
    clock: C,
    options: StoreOptions,
    entries: Vec<Entry>,
    undo: Option<UndoBatch>,
    ids: IdGenerator,
}

impl<B: KeyValueStore> EntryStore<B, SystemClock> {
    pub fn open(backend: B, options: StoreOptions) -> Self {
        Self::load(backend, SystemClock, options)
    }
}

impl<B: KeyValueStore, C: Clock> EntryStore<B, C> {
    /// Reads the stored list. A missing key or unreadable data starts empty.
    pub fn load(backend: B, clock: C, options: StoreOptions) -> Self {
        let mut entries = read_entries(&backend, &options.key);
        let mut undo = read_undo(&backend, &options.undo_key())
            .filter(|batch| clock.now() - batch.captured_at <= options.grace);

        let mut ids = IdGenerator::seeded(entries.iter().map(|e| &e.id));
        if let Some(batch) = &undo {
            for entry in &batch.entries {
                ids.observe(entry.id);
            }
        }

        let now = clock.now();
        let restorable = undo.iter_mut().flat_map(|batch| batch.entries.iter_mut());
        for entry in entries.iter_mut().chain(restorable) {
            if !IdGenerator::is_valid(entry.id) {
                let fresh = ids.next(now);
                warn!(old = %entry.id, new = %fresh, "reassigning out-of-range entry id");
                entry.id = fresh;
            }
        }

        debug!(key = %options.key, count = entries.len(), "loaded entries");
        Self {
            backend,
            clock,
            options,
            entries,
            undo,
            ids,
        }
    }

    /// Writes the entry list and the undo batch.
    pub fn save(&self) -> Result<()> {
        let serialized = serde_json::to_string(&self.entries)?;
        self.backend.set(&self.options.key, &serialized)?;

        let undo_key = self.options.undo_key();
        match &self.undo {
            Some(batch) => {
                let serialized = serde_json::to_string(batch)?;
                self.backend.set(&undo_key, &serialized)?;
            }
            None => self.backend.remove(&undo_key)?,
        }
        Ok(())
    }

    fn persist(&self) {
        if let Err(e) = self.save() {
            warn!(key = %self.options.key, error = %e, "failed to persist entries");
        }
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: EntryId) -> Option<&Entry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Whether `id` belongs to a live entry or to one the pending batch could restore.
    fn id_taken(&self, id: EntryId) -> bool {
        self.get(id).is_some()
            || self
                .undo
                .as_ref()
                .is_some_and(|batch| batch.entries.iter().any(|e| e.id == id))
    }

    /// Prepends a new entry, assigning an id when the draft has none
    /// (or one that is already taken).
    pub fn add(&mut self, draft: EntryDraft) -> EntryId {
        let now = self.clock.now();
        let id = match draft.id {
            Some(id) if IdGenerator::is_valid(id) && !self.id_taken(id) => {
                self.ids.observe(id);
                id
            }
            _ => self.ids.next(now),
        };

        let entry = Entry {
            id,
            payload: draft.payload,
            created_at: draft.created_at.unwrap_or(now),
            category: draft.category,
            priority: draft.priority,
            notes: draft.notes,
        };
        debug!(%id, kind = %entry.kind(), "adding entry");
        self.entries.insert(0, entry);
        self.persist();
        id
    }

    /// Removes one entry. Absent ids are ignored.
    pub fn remove(&mut self, id: EntryId) -> Option<Entry> {
        self.remove_many(&[id]).into_iter().next()
    }

    /// Removes every listed entry as one undoable batch, in store order.
    /// Leaves the undo buffer alone when nothing matched.
    pub fn remove_many(&mut self, ids: &[EntryId]) -> Vec<Entry> {
        let (removed, kept): (Vec<Entry>, Vec<Entry>) = std::mem::take(&mut self.entries)
            .into_iter()
            .partition(|e| ids.contains(&e.id));
        self.entries = kept;

        if removed.is_empty() {
            return removed;
        }

        debug!(count = removed.len(), "removed entries");
        self.capture_undo(removed.clone());
        self.persist();
        removed
    }

    /// Applies a partial update. Returns the updated entry, or `None` if the id is unknown.
    pub fn update(&mut self, id: EntryId, patch: &EntryPatch) -> Option<&Entry> {
        let pos = self.entries.iter().position(|e| e.id == id)?;
        if patch.apply(&mut self.entries[pos]) {
            debug!(%id, "updated entry");
            self.persist();
        }
        self.entries.get(pos)
    }

    /// Advances the entry's priority one step along the cycle.
    pub fn cycle_priority(&mut self, id: EntryId) -> Option<PriorityState> {
        let next = self.get(id)?.priority.next();
        self.update(id, &EntryPatch::priority(next))
            .map(|entry| entry.priority)
    }

    /// Empties the store, keeping the old contents restorable. Returns the count removed.
    pub fn clear(&mut self) -> usize {
        if self.entries.is_empty() {
            return 0;
        }
        let removed = std::mem::take(&mut self.entries);
        let count = removed.len();
        debug!(count, "cleared entries");
        self.capture_undo(removed);
        self.persist();
        count
    }

    /// Restores the pending batch to the front of the list if the grace window
    /// is still open. Returns the restored ids; empty when there was nothing to undo.
    pub fn undo(&mut self) -> Vec<EntryId> {
        let Some(batch) = self.undo.take() else {
            return Vec::new();
        };

        if self.clock.now() - batch.captured_at > self.options.grace {
            debug!("undo window expired");
            self.persist();
            return Vec::new();
        }

        let restored: Vec<EntryId> = batch.entries.iter().map(|e| e.id).collect();
        let mut entries = batch.entries;
        entries.append(&mut self.entries);
        self.entries = entries;
        debug!(count = restored.len(), "restored entries");
        self.persist();
        restored
    }

    /// The pending batch, if it can still be restored.
    pub fn pending_undo(&self) -> Option<&UndoBatch> {
        self.undo
            .as_ref()
            .filter(|batch| self.clock.now() - batch.captured_at <= self.options.grace)
    }

    /// Time left before the pending batch is discarded.
    pub fn undo_remaining(&self) -> Option<Duration> {
        self.pending_undo()
            .map(|batch| batch.captured_at + self.options.grace - self.clock.now())
    }

    fn capture_undo(&mut self, entries: Vec<Entry>) {
        self.undo = Some(UndoBatch {
            captured_at: self.clock.now(),
            entries,
        });
    }
}

fn read_entries<B: KeyValueStore>(backend: &B, key: &str) -> Vec<Entry> {
    let raw = match backend.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            warn!(key, error = %e, "could not read stored entries, starting empty");
            return Vec::new();
        }
    };
    match serde_json::from_str(&raw) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(key, error = %e, "stored entries are unreadable, starting empty");
            Vec::new()
        }
    }
}

fn read_undo<B: KeyValueStore>(backend: &B, key: &str) -> Option<UndoBatch> {
    let raw = backend.get(key).ok().flatten()?;
    match serde_json::from_str(&raw) {
        Ok(batch) => Some(batch),
        Err(e) => {
            warn!(key, error = %e, "dropping unreadable undo batch");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::model::{Category, EntryKind, Payload};
    use crate::store::mem_backend::MemBackend;
    use std::collections::HashSet;

    fn store<'a>(
        backend: &'a MemBackend,
        clock: &'a ManualClock,
    ) -> EntryStore<&'a MemBackend, &'a ManualClock> {
        EntryStore::load(backend, clock, StoreOptions::default())
    }

    fn text(s: &str) -> EntryDraft {
        EntryDraft::new(Payload::text(s))
    }

    fn ids(store: &EntryStore<&MemBackend, &ManualClock>) -> HashSet<EntryId> {
        store.entries().iter().map(|e| e.id).collect()
    }

    #[test]
    fn add_prepends_newest_first() {
        let (backend, clock) = (MemBackend::new(), ManualClock::default());
        let mut store = store(&backend, &clock);
        store.add(text("first"));
        store.add(text("second"));
        let texts: Vec<_> = store.entries().iter().map(|e| e.payload.as_str()).collect();
        assert_eq!(texts, vec!["second", "first"]);
    }

    #[test]
    fn rapid_adds_get_unique_ids() {
        let (backend, clock) = (MemBackend::new(), ManualClock::default());
        let mut store = store(&backend, &clock);
        for i in 0..10 {
            store.add(text(&format!("entry {}", i)));
        }
        assert_eq!(ids(&store).len(), 10);
    }

    #[test]
    fn add_replaces_taken_draft_id() {
        let (backend, clock) = (MemBackend::new(), ManualClock::default());
        let mut store = store(&backend, &clock);
        let first = store.add(text("a"));
        let mut draft = text("b");
        draft.id = Some(first);
        let second = store.add(draft);
        assert_ne!(first, second);
    }

    #[test]
    fn add_rejects_id_held_by_undo_batch() {
        let (backend, clock) = (MemBackend::new(), ManualClock::default());
        let mut store = store(&backend, &clock);
        let first = store.add(text("a"));
        store.remove(first);

        let mut draft = text("b");
        draft.id = Some(first);
        let second = store.add(draft);
        assert_ne!(first, second);

        assert_eq!(store.undo(), vec![first]);
        assert_eq!(ids(&store).len(), store.len());
    }

    #[test]
    fn add_then_remove_restores_prior_set() {
        let (backend, clock) = (MemBackend::new(), ManualClock::default());
        let mut store = store(&backend, &clock);
        store.add(text("keep"));
        let before = ids(&store);
        let id = store.add(text("temp"));
        assert!(store.remove(id).is_some());
        assert_eq!(ids(&store), before);
    }

    #[test]
    fn remove_unknown_id_is_noop() {
        let (backend, clock) = (MemBackend::new(), ManualClock::default());
        let mut store = store(&backend, &clock);
        let id = store.add(text("a"));
        store.remove(id);
        assert!(store.remove(EntryId(42)).is_none());
        // the earlier batch is still pending
        assert!(store.pending_undo().is_some());
    }

    #[test]
    fn undo_restores_removed_entry_once() {
        let (backend, clock) = (MemBackend::new(), ManualClock::default());
        let mut store = store(&backend, &clock);
        store.add(text("other"));
        let id = store.add(text("hello world"));
        let before = ids(&store);

        store.remove(id);
        clock.advance(Duration::seconds(2));
        assert_eq!(store.undo(), vec![id]);
        assert_eq!(ids(&store), before);
        assert_eq!(store.entries()[0].payload.as_str(), "hello world");

        assert!(store.undo().is_empty());
        assert_eq!(ids(&store), before);
    }

    #[test]
    fn undo_after_grace_window_is_noop() {
        let (backend, clock) = (MemBackend::new(), ManualClock::default());
        let mut store = store(&backend, &clock);
        let id = store.add(text("gone"));
        store.remove(id);
        clock.advance(Duration::seconds(6));
        assert!(store.pending_undo().is_none());
        assert!(store.undo().is_empty());
        assert!(store.is_empty());
    }

    #[test]
    fn new_delete_replaces_pending_batch() {
        let (backend, clock) = (MemBackend::new(), ManualClock::default());
        let mut store = store(&backend, &clock);
        let a = store.add(text("a"));
        let b = store.add(text("b"));
        store.remove(a);
        store.remove(b);
        assert_eq!(store.undo(), vec![b]);
        assert!(store.get(a).is_none());
    }

    #[test]
    fn clear_then_undo_restores_everything_in_order() {
        let (backend, clock) = (MemBackend::new(), ManualClock::default());
        let mut store = store(&backend, &clock);
        store.add(text("a"));
        store.add(text("b"));
        let order: Vec<_> = store.entries().to_vec();
        assert_eq!(store.clear(), 2);
        assert!(store.is_empty());
        store.add(text("c"));
        store.undo();
        assert_eq!(&store.entries()[..2], &order[..]);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn clear_on_empty_store_keeps_pending_batch() {
        let (backend, clock) = (MemBackend::new(), ManualClock::default());
        let mut store = store(&backend, &clock);
        let id = store.add(text("a"));
        store.remove(id);
        assert_eq!(store.clear(), 0);
        assert_eq!(store.undo(), vec![id]);
    }

    #[test]
    fn update_applies_patch_and_ignores_unknown() {
        let (backend, clock) = (MemBackend::new(), ManualClock::default());
        let mut store = store(&backend, &clock);
        let id = store.add(text("a"));
        let updated = store
            .update(id, &EntryPatch::category(Some(Category::Work)))
            .cloned()
            .unwrap();
        assert_eq!(updated.category, Some(Category::Work));
        assert!(store.update(EntryId(1), &EntryPatch::notes("x")).is_none());
    }

    #[test]
    fn full_priority_cycle_returns_to_original() {
        let (backend, clock) = (MemBackend::new(), ManualClock::default());
        let mut store = store(&backend, &clock);
        let id = store.add(text("a"));
        for _ in 0..PriorityState::CYCLE.len() {
            store.cycle_priority(id);
        }
        assert_eq!(store.get(id).unwrap().priority, PriorityState::None);
    }

    #[test]
    fn every_mutation_is_persisted_and_reloads() {
        let (backend, clock) = (MemBackend::new(), ManualClock::default());
        {
            let mut store = store(&backend, &clock);
            store.add(EntryDraft::new(Payload::url("https://example.com/page")));
            let id = store.add(text("note me"));
            store.update(id, &EntryPatch::notes("annotated"));
            store.cycle_priority(id);
        }
        let reloaded = store(&backend, &clock);
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded.entries()[0].notes, "annotated");
        assert_eq!(reloaded.entries()[0].priority, PriorityState::Pending);
        assert_eq!(reloaded.entries()[1].kind(), EntryKind::Url);
    }

    #[test]
    fn serialized_round_trip_is_lossless() {
        let (backend, clock) = (MemBackend::new(), ManualClock::default());
        let mut store = store(&backend, &clock);
        store.add(EntryDraft::new(Payload::url("https://a.example/x")).with_category(Category::Reels));
        store.add(EntryDraft::new(Payload::image("data:image/png;base64,iVBORw0KGgo=")));
        let id = store.add(text("multi\nline"));
        store.update(id, &EntryPatch::priority(PriorityState::Remaining));
        store.remove(id);
        store.undo();

        let raw = backend.raw("links").unwrap();
        let parsed: Vec<Entry> = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed, store.entries());
    }

    #[test]
    fn out_of_range_ids_are_reassigned_on_load() {
        let (backend, clock) = (MemBackend::new(), ManualClock::default());
        let mut stored = {
            let mut store = store(&backend, &clock);
            store.add(text("older"));
            store.add(text("newer"));
            store.entries().to_vec()
        };
        stored[1].id = EntryId(u64::MAX);
        backend.insert_raw("links", &serde_json::to_string(&stored).unwrap());

        let mut reloaded = store(&backend, &clock);
        assert_eq!(reloaded.entries()[1].payload.as_str(), "older");
        assert!(IdGenerator::is_valid(reloaded.entries()[1].id));

        let mut draft = text("after");
        draft.id = Some(EntryId(u64::MAX));
        let fresh = reloaded.add(draft);
        assert!(IdGenerator::is_valid(fresh));
        assert_eq!(ids(&reloaded).len(), 3);
    }

    #[test]
    fn corrupted_data_loads_as_empty() {
        let (backend, clock) = (MemBackend::new(), ManualClock::default());
        backend.insert_raw("links", "{not json");
        let store = store(&backend, &clock);
        assert!(store.is_empty());
    }

    #[test]
    fn write_failures_do_not_fail_mutations() {
        let (backend, clock) = (MemBackend::new(), ManualClock::default());
        let mut store = store(&backend, &clock);
        backend.set_simulate_write_error(true);
        let id = store.add(text("still here"));
        assert!(store.get(id).is_some());
        assert!(store.save().is_err());
        assert!(backend.raw("links").is_none());
    }

    #[test]
    fn undo_batch_survives_reload_within_window() {
        let (backend, clock) = (MemBackend::new(), ManualClock::default());
        let id = {
            let mut store = store(&backend, &clock);
            let id = store.add(text("across processes"));
            store.remove(id);
            id
        };
        clock.advance(Duration::seconds(1));
        let mut reloaded = store(&backend, &clock);
        assert_eq!(reloaded.undo(), vec![id]);
        assert!(backend.raw("links.undo").is_none());
    }

    #[test]
    fn expired_undo_batch_is_not_loaded() {
        let (backend, clock) = (MemBackend::new(), ManualClock::default());
        {
            let mut store = store(&backend, &clock);
            let id = store.add(text("late"));
            store.remove(id);
        }
        clock.advance(Duration::seconds(30));
        let mut reloaded = store(&backend, &clock);
        assert!(reloaded.undo().is_empty());
    }

    #[test]
    fn ids_stay_unique_after_reload() {
        let (backend, clock) = (MemBackend::new(), ManualClock::default());
        let first = store(&backend, &clock).add(text("a"));
        let second = store(&backend, &clock).add(text("b"));
        assert!(second > first);
    }

    mod laws {
        use super::{store, text};
        use crate::clock::ManualClock;
        use crate::model::{Entry, EntryId, EntryPatch};
        use crate::store::mem_backend::MemBackend;
        use chrono::Duration;
        use proptest::prelude::*;
        use std::collections::HashSet;

        #[derive(Debug, Clone)]
        enum Op {
            Add(String),
            Remove(usize),
            CyclePriority(usize),
            Annotate(usize, String),
            Clear,
            Undo,
            Wait(i64),
        }

        fn op() -> impl Strategy<Value = Op> {
            prop_oneof![
                3 => "[a-z ]{1,16}".prop_map(Op::Add),
                2 => (0usize..8).prop_map(Op::Remove),
                1 => (0usize..8).prop_map(Op::CyclePriority),
                1 => ((0usize..8), "[a-z\n]{0,12}").prop_map(|(i, n)| Op::Annotate(i, n)),
                1 => Just(Op::Clear),
                2 => Just(Op::Undo),
                1 => (0i64..4).prop_map(Op::Wait),
            ]
        }

        proptest! {
            #[test]
            fn stored_list_always_matches_memory(ops in proptest::collection::vec(op(), 0..40)) {
                let (backend, clock) = (MemBackend::new(), ManualClock::default());
                let mut jar = store(&backend, &clock);

                for op in ops {
                    let pick = |i: usize| jar.entries().get(i % jar.len().max(1)).map(|e| e.id);
                    match op {
                        Op::Add(s) => {
                            jar.add(text(&s));
                        }
                        Op::Remove(i) => {
                            if let Some(id) = pick(i) {
                                jar.remove(id);
                            }
                        }
                        Op::CyclePriority(i) => {
                            if let Some(id) = pick(i) {
                                jar.cycle_priority(id);
                            }
                        }
                        Op::Annotate(i, notes) => {
                            if let Some(id) = pick(i) {
                                jar.update(id, &EntryPatch::notes(notes));
                            }
                        }
                        Op::Clear => {
                            jar.clear();
                        }
                        Op::Undo => {
                            jar.undo();
                        }
                        Op::Wait(secs) => clock.advance(Duration::seconds(secs)),
                    }

                    let stored: Vec<Entry> = backend
                        .raw("links")
                        .map(|raw| serde_json::from_str(&raw).unwrap())
                        .unwrap_or_default();
                    prop_assert_eq!(stored.as_slice(), jar.entries());

                    let mut seen: HashSet<EntryId> = jar.entries().iter().map(|e| e.id).collect();
                    prop_assert_eq!(seen.len(), jar.len());
                    if let Some(batch) = jar.pending_undo() {
                        for entry in &batch.entries {
                            prop_assert!(seen.insert(entry.id), "id {} is both live and restorable", entry.id);
                        }
                    }
                }

                let reloaded = store(&backend, &clock);
                prop_assert_eq!(reloaded.entries(), jar.entries());
                prop_assert_eq!(reloaded.pending_undo(), jar.pending_undo());
            }
        }
    }
}
