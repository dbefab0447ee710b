/*!
 * JSON Web Key codec
 *
 * Serializes key pairs into their JWK form (RFC 7517) and reconstructs
 * usable key objects from it, including the private components needed to
 * sign. Also carries the public key-set projection served to verifiers.
 */

mod jwk;

pub use jwk::*;
