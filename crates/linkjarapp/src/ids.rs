use crate::model::EntryId;
use chrono::{DateTime, Utc};

/// Hands out creation-time ids that stay unique under rapid creation.
///
/// The id is the creation time in milliseconds unless that would not be larger
/// than the last id issued, in which case it is `last + 1`.
/// Ids above [`IdGenerator::MAX`] are never issued and are ignored when seeding.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    last: u64,
}

impl IdGenerator {
    /// Largest id the generator hands out, the last representable millisecond.
    pub const MAX: u64 = i64::MAX as u64;

    /// Starts after the largest id already in use.
    pub fn seeded<'a>(existing: impl IntoIterator<Item = &'a EntryId>) -> Self {
        let mut ids = Self::default();
        for id in existing {
            ids.observe(*id);
        }
        ids
    }

    pub fn is_valid(id: EntryId) -> bool {
        id.0 <= Self::MAX
    }

    pub fn next(&mut self, now: DateTime<Utc>) -> EntryId {
        let millis = u64::try_from(now.timestamp_millis()).unwrap_or(0);
        self.last = millis.max(self.last.saturating_add(1)).min(Self::MAX);
        EntryId(self.last)
    }

    /// Records an externally supplied id so later ones do not collide with it.
    pub fn observe(&mut self, id: EntryId) {
        if Self::is_valid(id) {
            self.last = self.last.max(id.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_millisecond_ids_are_bumped() {
        let now = DateTime::from_timestamp_millis(1_000).unwrap();
        let mut ids = IdGenerator::default();
        let a = ids.next(now);
        let b = ids.next(now);
        let c = ids.next(now);
        assert_eq!(a, EntryId(1_000));
        assert_eq!(b, EntryId(1_001));
        assert_eq!(c, EntryId(1_002));
    }

    #[test]
    fn seeded_generator_skips_existing_ids() {
        let existing = [EntryId(5_000), EntryId(9_000)];
        let mut ids = IdGenerator::seeded(existing.iter());
        let next = ids.next(DateTime::from_timestamp_millis(2_000).unwrap());
        assert_eq!(next, EntryId(9_001));
    }

    #[test]
    fn out_of_range_ids_are_not_seeded() {
        let existing = [EntryId(7_000), EntryId(u64::MAX)];
        let mut ids = IdGenerator::seeded(existing.iter());
        let next = ids.next(DateTime::from_timestamp_millis(1_000).unwrap());
        assert_eq!(next, EntryId(7_001));
    }

    #[test]
    fn next_never_overflows() {
        let mut ids = IdGenerator::default();
        ids.observe(EntryId(IdGenerator::MAX));
        let next = ids.next(DateTime::from_timestamp_millis(1_000).unwrap());
        assert_eq!(next, EntryId(IdGenerator::MAX));
    }

    #[test]
    fn clock_ahead_of_last_id_wins() {
        let mut ids = IdGenerator::default();
        ids.observe(EntryId(10));
        let next = ids.next(DateTime::from_timestamp_millis(50).unwrap());
        assert_eq!(next, EntryId(50));
    }
}
