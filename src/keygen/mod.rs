/*!
 * Asymmetric key pair generation
 *
 * Key material types for the supported algorithm families and the factory
 * seam the lifecycle manager generates fresh keys through.
 */

mod keygen;

pub use keygen::*;

#[cfg(test)]
mod tests;
