/*!
 * Signing algorithm and key type identifiers
 *
 * JWA algorithm names (RFC 7518) for the asymmetric signing algorithms the
 * manager can generate, and the JWK key types their material serializes as.
 */

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::KeyError;

/// Asymmetric signing algorithms available for key generation
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum SigningAlgorithm {
    /// RSASSA-PKCS1-v1_5 with SHA-256
    RS256,
    /// RSASSA-PKCS1-v1_5 with SHA-384
    RS384,
    /// RSASSA-PKCS1-v1_5 with SHA-512
    RS512,
    /// ECDSA with curve P-256 and SHA-256
    ES256,
}

impl fmt::Display for SigningAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SigningAlgorithm::RS256 => write!(f, "RS256"),
            SigningAlgorithm::RS384 => write!(f, "RS384"),
            SigningAlgorithm::RS512 => write!(f, "RS512"),
            SigningAlgorithm::ES256 => write!(f, "ES256"),
        }
    }
}

impl FromStr for SigningAlgorithm {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "RS256" => Ok(SigningAlgorithm::RS256),
            "RS384" => Ok(SigningAlgorithm::RS384),
            "RS512" => Ok(SigningAlgorithm::RS512),
            "ES256" => Ok(SigningAlgorithm::ES256),
            other => Err(KeyError::invalid_format(
                "signing algorithm",
                &format!("unrecognized name '{}'", other),
            )),
        }
    }
}

impl SigningAlgorithm {
    /// Get the key type backing this algorithm
    pub fn key_type(&self) -> KeyType {
        match self {
            SigningAlgorithm::RS256 | SigningAlgorithm::RS384 | SigningAlgorithm::RS512 => {
                KeyType::Rsa
            }
            SigningAlgorithm::ES256 => KeyType::EllipticCurve,
        }
    }

    /// Get the JWK curve name for elliptic curve algorithms
    pub fn curve(&self) -> Option<&'static str> {
        match self {
            SigningAlgorithm::ES256 => Some("P-256"),
            _ => None,
        }
    }
}

/// JWK key types for the supported algorithm families
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum KeyType {
    /// RSA key pairs
    #[serde(rename = "RSA")]
    Rsa,
    /// Elliptic curve key pairs
    #[serde(rename = "EC")]
    EllipticCurve,
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyType::Rsa => write!(f, "RSA"),
            KeyType::EllipticCurve => write!(f, "EC"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_algorithm_display_round_trip() {
        for algorithm in [
            SigningAlgorithm::RS256,
            SigningAlgorithm::RS384,
            SigningAlgorithm::RS512,
            SigningAlgorithm::ES256,
        ] {
            let parsed: SigningAlgorithm = algorithm
                .to_string()
                .parse()
                .expect("display form should parse back");
            assert_eq!(parsed, algorithm);
        }
    }

    #[test]
    fn test_unknown_algorithm_rejected() {
        let result = "HS256".parse::<SigningAlgorithm>();
        assert!(result.is_err());
    }

    #[test]
    fn test_key_type_mapping() {
        assert_eq!(SigningAlgorithm::RS384.key_type(), KeyType::Rsa);
        assert_eq!(SigningAlgorithm::ES256.key_type(), KeyType::EllipticCurve);
        assert_eq!(SigningAlgorithm::ES256.curve(), Some("P-256"));
        assert_eq!(SigningAlgorithm::RS256.curve(), None);
    }

    #[test]
    fn test_key_type_wire_names() {
        let rsa = serde_json::to_string(&KeyType::Rsa).expect("serialize key type");
        let ec = serde_json::to_string(&KeyType::EllipticCurve).expect("serialize key type");
        assert_eq!(rsa, "\"RSA\"");
        assert_eq!(ec, "\"EC\"");
    }
}
