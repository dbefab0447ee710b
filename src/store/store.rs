/*!
 * The store abstraction
 */

use crate::error::{KeyError, KeyResult};
use crate::record::KeyRecord;

/// Home of the key records behind a lifecycle manager
///
/// Implementations are safe to share across threads: every method takes
/// `&self` and synchronizes internally. A store holds at most one current
/// key; saving a new one demotes the prior current key to history, where
/// it stays retrievable for verification until [`KeyStore::clear`].
pub trait KeyStore: Send + Sync {
    /// Install `record` as the current key, demoting the prior current
    /// key to history
    ///
    /// Backing storage is created lazily on the first save.
    fn save(&self, record: &KeyRecord) -> KeyResult<()>;

    /// Get the current signing record
    ///
    /// # Errors
    ///
    /// Returns `KeyError::NotFound` when no key was ever saved, or the
    /// store has been cleared since.
    fn current(&self) -> KeyResult<KeyRecord>;

    /// Get up to `quantity` records, the current key and history, newest
    /// first by creation date
    fn recent(&self, quantity: usize) -> KeyResult<Vec<KeyRecord>>;

    /// Discard every stored record, the current key included
    fn clear(&self) -> KeyResult<()>;

    /// True when rotation is due: there is no current key, or the current
    /// key's age exceeds `max_age_days`
    ///
    /// The age check compares date-truncated UTC days of the record's
    /// creation date, so sub-day clock skew never triggers a rotation.
    fn needs_rotation(&self, max_age_days: i64) -> KeyResult<bool> {
        match self.current() {
            Ok(record) => Ok(record.is_expired(max_age_days)),
            Err(KeyError::NotFound { .. }) => Ok(true),
            Err(e) => Err(e),
        }
    }
}

// A shared handle to a store is itself a store.
impl<S: KeyStore + ?Sized> KeyStore for std::sync::Arc<S> {
    fn save(&self, record: &KeyRecord) -> KeyResult<()> {
        (**self).save(record)
    }

    fn current(&self) -> KeyResult<KeyRecord> {
        (**self).current()
    }

    fn recent(&self, quantity: usize) -> KeyResult<Vec<KeyRecord>> {
        (**self).recent(quantity)
    }

    fn clear(&self) -> KeyResult<()> {
        (**self).clear()
    }

    fn needs_rotation(&self, max_age_days: i64) -> KeyResult<bool> {
        (**self).needs_rotation(max_age_days)
    }
}
