/*!
 * Persisted key records
 *
 * A record is the stored form of one generated key: identifiers, algorithm,
 * the JWK-encoded material and the creation timestamp every age decision is
 * made from.
 */

mod record;

pub use record::*;
