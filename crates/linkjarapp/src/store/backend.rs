use crate::error::Result;

/// Abstract interface for raw key-value persistence.
/// This trait handles the "how" of storage (filesystem vs memory),
/// while EntryStore handles the "what" (entries, undo, ids).
pub trait KeyValueStore {
    /// Read the value stored under `key`.
    /// Returns Ok(None) if nothing was ever written there.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write `value` under `key`, replacing any previous value.
    /// MUST be atomic (e.g. write to tmp then rename) to avoid partial writes.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

impl<B: KeyValueStore + ?Sized> KeyValueStore for &B {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}
