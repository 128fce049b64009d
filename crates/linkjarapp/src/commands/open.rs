use crate::clock::Clock;
use crate::commands::helpers::{display_entry, resolve};
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::index::EntrySelector;
use crate::store::{EntryStore, KeyValueStore};

/// Collects the URLs of the selected entries. Opening them is the caller's job.
pub fn run<B: KeyValueStore, C: Clock>(
    store: &EntryStore<B, C>,
    selectors: &[EntrySelector],
) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    let ids = resolve(store, selectors, &mut result);

    for id in ids {
        let Some(shown) = display_entry(store, id) else {
            continue;
        };
        match shown.entry.url() {
            Some(url) => result.links.push(url.to_string()),
            None => result.add_message(CmdMessage::warning(format!(
                "Entry {} is {}, not a link",
                shown.index,
                shown.entry.kind()
            ))),
        }
        result.affected_entries.push(shown);
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::fixtures::StoreFixture;

    #[test]
    fn test_collects_only_links() {
        let store = StoreFixture::new()
            .with_url("https://a.com/x")
            .with_texts(1)
            .build();
        let result = run(&store, &[EntrySelector::Range(1, 2)]).unwrap();
        assert_eq!(result.links, vec!["https://a.com/x".to_string()]);
        assert_eq!(
            result.messages,
            vec![CmdMessage::warning("Entry 1 is text, not a link")]
        );
    }
}
