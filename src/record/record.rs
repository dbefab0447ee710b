/*!
 * The key record entity and the credentials decoded from it
 */

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::algorithm::{KeyType, SigningAlgorithm};
use crate::error::{KeyError, KeyResult};
use crate::jwk::JsonWebKey;
use crate::keygen::SigningKeyPair;

/// Stored form of one generated signing key
///
/// `creation_date` is assigned once and never rewritten, including when
/// the record moves from current to history. Age decisions read it, never
/// filesystem metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyRecord {
    /// Record identity, assigned at creation and never reused
    pub id: Uuid,
    /// JWK form of the key material, private components included
    pub parameters: JsonWebKey,
    /// Published key identifier, equal to `parameters.kid`
    pub key_id: String,
    /// Key type of the material
    #[serde(rename = "type")]
    pub key_type: KeyType,
    /// Algorithm the key was generated for
    pub algorithm: SigningAlgorithm,
    /// UTC timestamp the key was generated at
    pub creation_date: DateTime<Utc>,
}

impl KeyRecord {
    /// Wrap a freshly generated key pair into a record
    ///
    /// # Errors
    ///
    /// Returns `KeyError::InvalidKeyFormat` if the key material cannot
    /// serve the requested algorithm.
    pub fn new(key_pair: &SigningKeyPair, algorithm: SigningAlgorithm) -> KeyResult<Self> {
        let parameters = JsonWebKey::encode(key_pair, algorithm)?;
        let key_id = parameters
            .kid
            .clone()
            .ok_or_else(|| KeyError::invalid_format("kid", "encoder produced no key id"))?;
        Ok(KeyRecord {
            id: Uuid::new_v4(),
            parameters,
            key_id,
            key_type: algorithm.key_type(),
            algorithm,
            creation_date: Utc::now(),
        })
    }

    /// Reconstruct the private key pair stored in this record
    ///
    /// # Errors
    ///
    /// Returns `KeyError::InvalidKeyFormat` if the material does not
    /// decode, or decodes to a different key type than the record claims.
    pub fn signing_key(&self) -> KeyResult<SigningKeyPair> {
        let key_pair = self.parameters.decode()?;
        if key_pair.key_type() != self.key_type {
            return Err(KeyError::invalid_format(
                "key record",
                &format!(
                    "material decodes as {} but the record claims {}",
                    key_pair.key_type(),
                    self.key_type
                ),
            ));
        }
        Ok(key_pair)
    }

    /// Decode this record into usable signing credentials
    pub fn credentials(&self) -> KeyResult<SigningCredentials> {
        Ok(SigningCredentials {
            key: self.signing_key()?,
            algorithm: self.algorithm,
            key_id: self.key_id.clone(),
        })
    }

    /// True once the key's age, by date-truncated UTC day, exceeds the
    /// given maximum
    ///
    /// Sub-day clock skew never flips this: a key expires at the first
    /// UTC midnight after `creation_date + max_age_days`.
    pub fn is_expired(&self, max_age_days: i64) -> bool {
        let expiry = self.creation_date + Duration::days(max_age_days);
        Utc::now().date_naive() > expiry.date_naive()
    }
}

/// A decoded signing credential: the private key object, the algorithm
/// and the published kid
#[derive(Debug, Clone)]
pub struct SigningCredentials {
    /// Private key material
    pub key: SigningKeyPair,
    /// Algorithm the key serves
    pub algorithm: SigningAlgorithm,
    /// Published key identifier
    pub key_id: String,
}
