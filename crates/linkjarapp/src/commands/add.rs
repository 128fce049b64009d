use crate::classify::{Classification, Classifier, RawInput};
use crate::clock::Clock;
use crate::commands::helpers::{count_of, display_entry};
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::{EntryDraft, Payload};
use crate::store::{EntryStore, KeyValueStore};
use tracing::warn;

/// Classifies `input` and stores whatever it yields.
///
/// Several payloads from one input (a split URL list) are added so that they
/// read top to bottom in the order they appeared.
pub fn run<B: KeyValueStore, C: Clock>(
    store: &mut EntryStore<B, C>,
    classifier: &Classifier,
    input: RawInput,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();

    let payloads = match classifier.classify(input) {
        Classification::Empty => {
            result.add_message(CmdMessage::info("Nothing to add"));
            return Ok(result);
        }
        Classification::Ready(payloads) => payloads,
        Classification::PendingImage(pending) => match pending.decode() {
            Ok(payload) => vec![payload],
            Err(e) => {
                warn!(error = %e, "image decode failed");
                result.add_message(CmdMessage::warning(e.to_string()));
                return Ok(result);
            }
        },
    };

    Ok(add_payloads(store, payloads, result))
}

fn add_payloads<B: KeyValueStore, C: Clock>(
    store: &mut EntryStore<B, C>,
    payloads: Vec<Payload>,
    mut result: CmdResult,
) -> CmdResult {
    let ids: Vec<_> = payloads
        .into_iter()
        .rev()
        .map(|payload| store.add(EntryDraft::new(payload)))
        .collect();

    for id in ids.into_iter().rev() {
        if let Some(shown) = display_entry(store, id) {
            result.affected_entries.push(shown);
        }
    }

    let message = match result.affected_entries.as_slice() {
        [one] => format!("Added {}: {}", one.entry.kind(), one.entry.display_title()),
        many => format!("Added {}", count_of(many.len())),
    };
    result.add_message(CmdMessage::success(message));
    result
}
