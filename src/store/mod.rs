/*!
 * Key stores
 *
 * The storage abstraction behind the lifecycle manager and its two
 * implementations: a durable filesystem store with one file per record,
 * and a volatile in-memory store for tests and ephemeral deployments.
 *
 * Both stores answer the rotation question from the record's own
 * creation date, so a record can move between hosts or be restored from
 * backup without its age changing.
 */

mod store;

mod filesystem;
mod memory;

pub use filesystem::FileSystemStore;
pub use memory::InMemoryStore;
pub use store::KeyStore;

#[cfg(test)]
mod tests;
