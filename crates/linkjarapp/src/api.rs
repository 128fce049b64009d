//! # API Facade
//!
//! A thin facade over the command layer and the single entry point for UIs.
//!
//! The facade:
//! - **Dispatches** to the matching `commands::*::run`
//! - **Normalizes inputs**: selector strings become [`EntrySelector`]s
//! - **Returns structured types**: `Result<CmdResult>`, never strings
//!
//! Business logic stays in `commands/*.rs`; storage behaviour stays in `store/`.
//!
//! ## Selectors
//!
//! Users act on batches (`lj rm 1-3 #1729242000000`). Each argument is parsed
//! with [`EntrySelector::from_str`]; a malformed argument fails the whole call
//! with [`LinkjarError::Api`] before anything is touched. Well-formed selectors
//! that match nothing only produce warnings.
//!
//! ## Generic Over the Store
//!
//! `LinkjarApi<B, C>` wraps an `EntryStore<B, C>`:
//! - Production: `LinkjarApi<FsBackend>` (wall-clock time)
//! - Testing: `LinkjarApi<MemBackend, ManualClock>`
//!
//! [`EntrySelector::from_str`]: std::str::FromStr::from_str

use crate::classify::{Classifier, RawInput};
use crate::clock::{Clock, SystemClock};
use crate::commands::{self, CmdResult};
use crate::error::{LinkjarError, Result};
use crate::index::EntrySelector;
use crate::model::{Category, PriorityState};
use crate::store::{EntryStore, KeyValueStore};
use crate::view::ViewOptions;
use chrono::TimeZone;

pub struct LinkjarApi<B: KeyValueStore, C: Clock = SystemClock> {
    store: EntryStore<B, C>,
    classifier: Classifier,
}

impl<B: KeyValueStore, C: Clock> LinkjarApi<B, C> {
    pub fn new(store: EntryStore<B, C>, classifier: Classifier) -> Self {
        Self { store, classifier }
    }

    pub fn add(&mut self, input: RawInput) -> Result<CmdResult> {
        commands::add::run(&mut self.store, &self.classifier, input)
    }

    pub fn list<Tz: TimeZone>(&self, options: &ViewOptions, tz: &Tz) -> Result<CmdResult> {
        commands::list::run(&self.store, options, tz)
    }

    pub fn delete<I: AsRef<str>>(&mut self, selectors: &[I]) -> Result<CmdResult> {
        let selectors = parse_selectors(selectors)?;
        commands::delete::run(&mut self.store, &selectors)
    }

    pub fn clear(&mut self) -> Result<CmdResult> {
        commands::clear::run(&mut self.store)
    }

    pub fn undo(&mut self) -> Result<CmdResult> {
        commands::undo::run(&mut self.store)
    }

    /// Cycles priority, or sets it to `state` when given.
    pub fn priority<I: AsRef<str>>(
        &mut self,
        selectors: &[I],
        state: Option<PriorityState>,
    ) -> Result<CmdResult> {
        let selectors = parse_selectors(selectors)?;
        commands::priority::run(&mut self.store, &selectors, state)
    }

    pub fn categorize<I: AsRef<str>>(
        &mut self,
        selectors: &[I],
        category: Option<Category>,
    ) -> Result<CmdResult> {
        let selectors = parse_selectors(selectors)?;
        commands::categorize::run(&mut self.store, &selectors, category)
    }

    pub fn notes<I: AsRef<str>>(
        &mut self,
        selectors: &[I],
        notes: Option<String>,
    ) -> Result<CmdResult> {
        let selectors = parse_selectors(selectors)?;
        commands::notes::run(&mut self.store, &selectors, notes)
    }

    pub fn open<I: AsRef<str>>(&self, selectors: &[I]) -> Result<CmdResult> {
        let selectors = parse_selectors(selectors)?;
        commands::open::run(&self.store, &selectors)
    }

    pub fn store(&self) -> &EntryStore<B, C> {
        &self.store
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }
}

fn parse_selectors<I: AsRef<str>>(inputs: &[I]) -> Result<Vec<EntrySelector>> {
    if inputs.is_empty() {
        return Err(LinkjarError::Api("No entries selected".to_string()));
    }

    let mut selectors = Vec::with_capacity(inputs.len());
    for input in inputs {
        let selector: EntrySelector = input.as_ref().parse().map_err(LinkjarError::Api)?;
        if !selectors.contains(&selector) {
            selectors.push(selector);
        }
    }
    Ok(selectors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::model::EntryId;
    use crate::store::mem_backend::MemBackend;
    use crate::store::StoreOptions;
    use chrono::Utc;

    fn api() -> LinkjarApi<MemBackend, ManualClock> {
        let store = EntryStore::load(
            MemBackend::new(),
            ManualClock::default(),
            StoreOptions::default(),
        );
        LinkjarApi::new(store, Classifier::default())
    }

    #[test]
    fn test_parse_selectors_dedups_in_order() {
        let selectors = parse_selectors(&["2", "1-3", "2", "#7"]).unwrap();
        assert_eq!(
            selectors,
            vec![
                EntrySelector::Index(2),
                EntrySelector::Range(1, 3),
                EntrySelector::Id(EntryId(7))
            ]
        );
    }

    #[test]
    fn test_parse_selectors_rejects_garbage() {
        assert!(matches!(
            parse_selectors(&["1", "nope"]),
            Err(LinkjarError::Api(_))
        ));
        let empty: [&str; 0] = [];
        assert!(matches!(parse_selectors(&empty), Err(LinkjarError::Api(_))));
    }

    #[test]
    fn test_malformed_selector_touches_nothing() {
        let mut api = api();
        api.add(RawInput::Typed("https://a.com".into())).unwrap();
        assert!(api.delete(&["1", "x"]).is_err());
        assert_eq!(api.store().len(), 1);
    }

    #[test]
    fn test_dispatch_round_trip() {
        let mut api = api();
        api.add(RawInput::Typed("https://a.com".into())).unwrap();
        api.priority(&["1"], None).unwrap();
        api.categorize(&["1"], Some(Category::Reading)).unwrap();
        api.notes(&["1"], Some("later".into())).unwrap();

        let listed = api.list(&ViewOptions::default(), &Utc).unwrap();
        let entry = &listed.listed_entries().next().unwrap().entry;
        assert_eq!(entry.priority, PriorityState::Pending);
        assert_eq!(entry.category, Some(Category::Reading));
        assert_eq!(entry.notes, "later");

        assert_eq!(api.open(&["1"]).unwrap().links, vec!["https://a.com"]);

        api.delete(&["1"]).unwrap();
        assert!(api.store().is_empty());
        api.undo().unwrap();
        assert_eq!(api.store().len(), 1);
        api.clear().unwrap();
        assert!(api.store().is_empty());
    }
}
