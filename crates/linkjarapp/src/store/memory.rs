use super::entry_store::{EntryStore, StoreOptions};
use super::mem_backend::MemBackend;
use crate::clock::ManualClock;

pub type InMemoryStore = EntryStore<MemBackend, ManualClock>;

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        EntryStore::load(MemBackend::new(), ManualClock::default(), StoreOptions::default())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::model::{Category, EntryDraft, Payload, PriorityState};
    use chrono::Duration;

    pub struct StoreFixture {
        pub store: InMemoryStore,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                store: InMemoryStore::new(),
            }
        }

        /// Adds `count` text entries one minute apart.
        pub fn with_texts(mut self, count: usize) -> Self {
            for i in 0..count {
                self.store
                    .add(EntryDraft::new(Payload::text(format!("Snippet {}", i + 1))));
                self.store.clock().advance(Duration::minutes(1));
            }
            self
        }

        pub fn with_url(mut self, url: &str) -> Self {
            self.store.add(EntryDraft::new(Payload::url(url)));
            self.store.clock().advance(Duration::minutes(1));
            self
        }

        pub fn with_flagged_url(mut self, url: &str, priority: PriorityState) -> Self {
            self.store
                .add(EntryDraft::new(Payload::url(url)).with_priority(priority));
            self.store.clock().advance(Duration::minutes(1));
            self
        }

        pub fn with_categorized_url(mut self, url: &str, category: Category) -> Self {
            self.store
                .add(EntryDraft::new(Payload::url(url)).with_category(category));
            self.store.clock().advance(Duration::minutes(1));
            self
        }

        pub fn build(self) -> InMemoryStore {
            self.store
        }
    }
}
