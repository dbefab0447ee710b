/*!
 * JWKS Manager
 *
 * This crate manages the lifecycle of the asymmetric signing keys behind a
 * JSON Web Key Set: generating key pairs on demand, persisting them
 * durably across restarts, rotating them when they age out or the
 * configured algorithm changes, and reconstructing usable key objects
 * from the stored form.
 *
 * The main pieces are:
 *
 * - [`JwksManager`] for rotation decisions and credential retrieval
 * - [`KeyStore`] with a durable filesystem implementation and a volatile
 *   in-memory one
 * - [`JsonWebKey`] as the codec between key material and its stored and
 *   published JWK form
 *
 * Superseded keys are demoted to history and retained, so tokens signed
 * before a rotation keep verifying against the published key set.
 *
 * # Example
 *
 * ```no_run
 * use jwks_manager::prelude::*;
 *
 * fn main() -> Result<(), KeyError> {
 *     let store = FileSystemStore::new("/var/lib/myservice/keys", "");
 *     let manager = JwksManager::new(store, JwksOptions::default());
 *
 *     // Rotates automatically when the current key is missing or stale
 *     let credentials = manager.current()?;
 *     println!("signing with kid {}", credentials.key_id);
 *
 *     // The public set a JWKS endpoint would serve
 *     let key_set = manager.key_set(5)?;
 *     println!("{}", serde_json::to_string_pretty(&key_set).unwrap());
 *     Ok(())
 * }
 * ```
 */

/// Signing algorithm and key type identifiers
pub mod algorithm;

/// Common error types for key lifecycle operations
pub mod error;

/// JWK encoding and decoding of key material
pub mod jwk;

/// Key pair generation and the key factory seam
pub mod keygen;

/// The lifecycle manager orchestrating rotation and retrieval
pub mod manager;

/// Lifecycle policy configuration
pub mod options;

/// Persisted key records and decoded signing credentials
pub mod record;

/// Key stores: durable filesystem and volatile in-memory
pub mod store;

// Re-export main types for convenience
pub use algorithm::KeyType;
pub use algorithm::SigningAlgorithm;
pub use error::{KeyError, KeyResult};
pub use jwk::JsonWebKey;
pub use jwk::JsonWebKeySet;
pub use keygen::KeyFactory;
pub use keygen::SigningKeyPair;
pub use keygen::SigningPublicKey;
pub use keygen::SystemKeyFactory;
pub use manager::JwksManager;
pub use options::JwksOptions;
pub use record::KeyRecord;
pub use record::SigningCredentials;
pub use store::FileSystemStore;
pub use store::InMemoryStore;
pub use store::KeyStore;

/// Provides the types most deployments touch under one import.
pub mod prelude {
    pub use crate::algorithm::KeyType;
    pub use crate::algorithm::SigningAlgorithm;
    pub use crate::error::KeyError;
    pub use crate::error::KeyResult;
    pub use crate::jwk::JsonWebKey;
    pub use crate::jwk::JsonWebKeySet;
    pub use crate::keygen::KeyFactory;
    pub use crate::keygen::SigningKeyPair;
    pub use crate::keygen::SystemKeyFactory;
    pub use crate::manager::JwksManager;
    pub use crate::options::JwksOptions;
    pub use crate::record::KeyRecord;
    pub use crate::record::SigningCredentials;
    pub use crate::store::FileSystemStore;
    pub use crate::store::InMemoryStore;
    pub use crate::store::KeyStore;
}
