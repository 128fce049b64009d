use crate::clock::Clock;
use crate::commands::helpers::{display_entry, resolve};
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::index::EntrySelector;
use crate::model::{Category, EntryPatch};
use crate::store::{EntryStore, KeyValueStore};

/// Sets (or with `None`, clears) the category of the selected entries.
pub fn run<B: KeyValueStore, C: Clock>(
    store: &mut EntryStore<B, C>,
    selectors: &[EntrySelector],
    category: Option<Category>,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    let ids = resolve(store, selectors, &mut result);
    let patch = EntryPatch::category(category);

    for id in ids {
        if store.update(id, &patch).is_none() {
            continue;
        }
        if let Some(shown) = display_entry(store, id) {
            let label = category.map_or("No category", |c| c.label());
            result.add_message(CmdMessage::success(format!(
                "{} ({}): {}",
                label,
                shown.index,
                shown.entry.display_title()
            )));
            result.affected_entries.push(shown);
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::fixtures::StoreFixture;

    #[test]
    fn test_sets_and_clears_category() {
        let mut store = StoreFixture::new().with_url("https://shop.example").build();
        run(
            &mut store,
            &[EntrySelector::Index(1)],
            Some(Category::Shopping),
        )
        .unwrap();
        assert_eq!(store.entries()[0].category, Some(Category::Shopping));

        let result = run(&mut store, &[EntrySelector::Index(1)], None).unwrap();
        assert_eq!(store.entries()[0].category, None);
        assert_eq!(
            result.messages[0].content,
            "No category (1): shop.example"
        );
    }

    #[test]
    fn test_missing_entry_warns() {
        let mut store = StoreFixture::new().build();
        let result = run(&mut store, &[EntrySelector::Index(1)], Some(Category::Work)).unwrap();
        assert!(result.affected_entries.is_empty());
        assert_eq!(result.messages[0].content, "No entry at 1");
    }
}
