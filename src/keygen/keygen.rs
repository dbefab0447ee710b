/*!
 * Key material types and the key factory
 *
 * A generated key pair is held as the private object of its family; the
 * public half is always derived from it, so the two can never disagree.
 */

use rand::rngs::OsRng;
use rsa::{RsaPrivateKey, RsaPublicKey};

use crate::algorithm::{KeyType, SigningAlgorithm};
use crate::error::{KeyError, KeyResult};

/// Modulus size for generated RSA keys, in bits
pub const RSA_KEY_BITS: usize = 2048;

/// Asymmetric key pair for one of the supported algorithm families
#[derive(Debug, Clone)]
pub enum SigningKeyPair {
    /// RSA private key
    Rsa(RsaPrivateKey),
    /// P-256 private scalar
    EllipticCurve(p256::SecretKey),
}

impl SigningKeyPair {
    /// Get the key type of this pair
    pub fn key_type(&self) -> KeyType {
        match self {
            SigningKeyPair::Rsa(_) => KeyType::Rsa,
            SigningKeyPair::EllipticCurve(_) => KeyType::EllipticCurve,
        }
    }

    /// Get the public half of this pair, for verification use
    pub fn public_key(&self) -> SigningPublicKey {
        match self {
            SigningKeyPair::Rsa(private_key) => {
                SigningPublicKey::Rsa(private_key.to_public_key())
            }
            SigningKeyPair::EllipticCurve(secret_key) => {
                SigningPublicKey::EllipticCurve(secret_key.public_key())
            }
        }
    }
}

impl PartialEq for SigningKeyPair {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (SigningKeyPair::Rsa(a), SigningKeyPair::Rsa(b)) => a == b,
            (SigningKeyPair::EllipticCurve(a), SigningKeyPair::EllipticCurve(b)) => {
                a.to_bytes() == b.to_bytes()
            }
            _ => false,
        }
    }
}

/// Public half of a signing key pair
#[derive(Debug, Clone, PartialEq)]
pub enum SigningPublicKey {
    /// RSA public key
    Rsa(RsaPublicKey),
    /// P-256 public point
    EllipticCurve(p256::PublicKey),
}

impl SigningPublicKey {
    /// Get the key type of this public key
    pub fn key_type(&self) -> KeyType {
        match self {
            SigningPublicKey::Rsa(_) => KeyType::Rsa,
            SigningPublicKey::EllipticCurve(_) => KeyType::EllipticCurve,
        }
    }
}

/// Source of fresh key pairs for the lifecycle manager
///
/// The manager generates through this seam so deployments can substitute
/// a hardware-backed or deterministic source.
pub trait KeyFactory: Send + Sync {
    /// Generate a fresh key pair able to serve the given algorithm
    ///
    /// # Errors
    ///
    /// Returns `KeyError::GenerationError` if the underlying generator
    /// cannot produce a key.
    fn generate(&self, algorithm: SigningAlgorithm) -> KeyResult<SigningKeyPair>;
}

/// Key factory backed by the operating system RNG
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemKeyFactory;

impl SystemKeyFactory {
    /// Create a new system key factory
    pub fn new() -> Self {
        SystemKeyFactory
    }
}

impl KeyFactory for SystemKeyFactory {
    fn generate(&self, algorithm: SigningAlgorithm) -> KeyResult<SigningKeyPair> {
        match algorithm.key_type() {
            KeyType::Rsa => {
                let private_key = RsaPrivateKey::new(&mut OsRng, RSA_KEY_BITS).map_err(|e| {
                    KeyError::generation_error(&algorithm.to_string(), &e.to_string())
                })?;
                Ok(SigningKeyPair::Rsa(private_key))
            }
            KeyType::EllipticCurve => {
                let secret_key = p256::SecretKey::random(&mut OsRng);
                Ok(SigningKeyPair::EllipticCurve(secret_key))
            }
        }
    }
}
