use super::*;
use crate::algorithm::{KeyType, SigningAlgorithm};

#[test]
fn test_generate_rsa_key_pair() {
    let factory = SystemKeyFactory::new();

    let key_pair = factory.generate(SigningAlgorithm::RS256).unwrap();

    assert_eq!(key_pair.key_type(), KeyType::Rsa);
    assert_eq!(key_pair.public_key().key_type(), KeyType::Rsa);
}

#[test]
fn test_generate_ec_key_pair() {
    let factory = SystemKeyFactory::new();

    let key_pair = factory.generate(SigningAlgorithm::ES256).unwrap();

    assert_eq!(key_pair.key_type(), KeyType::EllipticCurve);
    assert_eq!(key_pair.public_key().key_type(), KeyType::EllipticCurve);
}

#[test]
fn test_generated_keys_are_distinct() {
    let factory = SystemKeyFactory::new();

    // Two draws from the RNG must never coincide
    let first = factory.generate(SigningAlgorithm::ES256).unwrap();
    let second = factory.generate(SigningAlgorithm::ES256).unwrap();

    assert_ne!(first, second);
}

#[test]
fn test_key_pair_equality() {
    let factory = SystemKeyFactory::new();

    let key_pair = factory.generate(SigningAlgorithm::ES256).unwrap();
    let copy = key_pair.clone();

    assert_eq!(key_pair, copy);

    // Different families never compare equal
    let rsa = factory.generate(SigningAlgorithm::RS256).unwrap();
    assert_ne!(key_pair, rsa);
}
