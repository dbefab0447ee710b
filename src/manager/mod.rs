/*!
 * Key lifecycle manager
 *
 * The orchestration layer: decides when the current key has to be
 * rotated, drives generation through the key factory, and hands out
 * signing credentials and the public key set built from the store.
 */

mod manager;

pub use manager::JwksManager;
