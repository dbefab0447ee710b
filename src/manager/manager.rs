/*!
 * Rotation decisions and credential retrieval
 *
 * The manager never mutates records itself; every change to the record
 * collection goes through the store. The rotation decision and the
 * generation that follows it run under one mutex, so concurrent callers
 * observing an expired key wait for a single fresh key instead of each
 * generating their own.
 */

use std::sync::Mutex;

use crate::error::KeyResult;
use crate::jwk::JsonWebKeySet;
use crate::keygen::{KeyFactory, SystemKeyFactory};
use crate::options::JwksOptions;
use crate::record::{KeyRecord, SigningCredentials};
use crate::store::KeyStore;

/// Orchestrates key generation, rotation and credential retrieval over a
/// store
///
/// A manager owns its policy options and a key factory; the store may be
/// any [`KeyStore`]. Shared across threads, at most one generation is in
/// flight at a time and concurrent callers reuse its result.
pub struct JwksManager<S: KeyStore> {
    store: S,
    factory: Box<dyn KeyFactory>,
    options: JwksOptions,
    // admits one rotation-decision-and-generate sequence at a time
    rotation: Mutex<()>,
}

impl<S: KeyStore> JwksManager<S> {
    /// Create a manager over `store` generating through the system RNG
    pub fn new(store: S, options: JwksOptions) -> Self {
        Self::with_factory(store, options, Box::new(SystemKeyFactory::new()))
    }

    /// Create a manager generating through a caller-supplied factory
    ///
    /// Deployments substitute a hardware-backed source here; tests
    /// substitute counting or failing factories.
    pub fn with_factory(store: S, options: JwksOptions, factory: Box<dyn KeyFactory>) -> Self {
        JwksManager {
            store,
            factory,
            options,
            rotation: Mutex::new(()),
        }
    }

    /// Get the configured policy options
    pub fn options(&self) -> &JwksOptions {
        &self.options
    }

    /// Get the underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Generate and install a new current key under the configured policy
    ///
    /// The returned credentials are built from the freshly generated
    /// material, not read back from the store.
    ///
    /// # Errors
    ///
    /// Returns `KeyError::GenerationError` when the factory fails, or the
    /// store's error when persisting the record fails. No prior key is
    /// substituted on failure.
    pub fn generate(&self) -> KeyResult<SigningCredentials> {
        self.generate_with(&self.options)
    }

    /// Generate and install a new current key under the given policy
    pub fn generate_with(&self, options: &JwksOptions) -> KeyResult<SigningCredentials> {
        let _guard = self.rotation.lock().unwrap();
        self.generate_locked(options)
    }

    // Caller must hold the rotation lock.
    fn generate_locked(&self, options: &JwksOptions) -> KeyResult<SigningCredentials> {
        let key_pair = self.factory.generate(options.algorithm)?;
        let record = KeyRecord::new(&key_pair, options.algorithm)?;
        self.store.save(&record)?;
        log::info!(
            "Generated new {} signing key {}",
            options.algorithm,
            record.key_id
        );
        Ok(SigningCredentials {
            key: key_pair,
            algorithm: options.algorithm,
            key_id: record.key_id,
        })
    }

    /// Get the current signing credentials under the configured policy,
    /// rotating first when the current key is expired, absent or serves a
    /// different algorithm
    pub fn current(&self) -> KeyResult<SigningCredentials> {
        self.current_with(&self.options)
    }

    /// Get the current signing credentials under the given policy
    ///
    /// When the store is empty or the current key's age exceeds
    /// `options.days_until_expire`, a new key is generated and returned.
    /// When the current key serves a different algorithm than
    /// `options.algorithm`, a key for the requested algorithm is
    /// generated; the old key stays in history and keeps verifying the
    /// tokens it signed.
    ///
    /// # Errors
    ///
    /// Store, codec and factory errors propagate unchanged; the manager
    /// never falls back to a stale or default key.
    pub fn current_with(&self, options: &JwksOptions) -> KeyResult<SigningCredentials> {
        let _guard = self.rotation.lock().unwrap();

        if self.store.needs_rotation(options.days_until_expire)? {
            log::info!(
                "Current signing key absent or older than {} days, rotating",
                options.days_until_expire
            );
            return self.generate_locked(options);
        }

        let record = self.store.current()?;
        if record.algorithm != options.algorithm {
            log::info!(
                "Current signing key serves {} but {} was requested, rotating",
                record.algorithm,
                options.algorithm
            );
            self.generate_locked(options)?;
            return self.store.current()?.credentials();
        }
        record.credentials()
    }

    /// Get up to `quantity` records, newest first
    ///
    /// A store that has never held a key is bootstrapped with one
    /// [`Self::current`] call first, so callers never observe an empty
    /// result from a never-used store.
    pub fn recent_keys(&self, quantity: usize) -> KeyResult<Vec<KeyRecord>> {
        let records = self.store.recent(quantity)?;
        if !records.is_empty() || quantity == 0 {
            return Ok(records);
        }
        self.current()?;
        self.store.recent(quantity)
    }

    /// Assemble the public key set for publication
    ///
    /// Covers up to `quantity` most recent keys, private components
    /// stripped from every one.
    pub fn key_set(&self, quantity: usize) -> KeyResult<JsonWebKeySet> {
        let records = self.recent_keys(quantity)?;
        Ok(JsonWebKeySet::from_keys(
            records.iter().map(|record| &record.parameters),
        ))
    }
}
