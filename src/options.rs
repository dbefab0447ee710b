/*!
 * Lifecycle configuration
 *
 * The policy knobs a deployment supplies: which algorithm to generate,
 * how long a key may stay current, and how store files are prefixed.
 */

use serde::{Deserialize, Serialize};

use crate::algorithm::SigningAlgorithm;

/// Configuration the lifecycle manager reads its policy from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JwksOptions {
    /// Algorithm for newly generated keys
    pub algorithm: SigningAlgorithm,
    /// Maximum age of the current key before rotation, in days
    pub days_until_expire: i64,
    /// Prefix for the store's file names
    pub key_prefix: String,
}

impl Default for JwksOptions {
    fn default() -> Self {
        JwksOptions {
            algorithm: SigningAlgorithm::RS256,
            days_until_expire: 90,
            key_prefix: String::new(),
        }
    }
}

impl JwksOptions {
    /// Create options with the default policy
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the algorithm for newly generated keys
    pub fn with_algorithm(mut self, algorithm: SigningAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Set the maximum current-key age in days
    pub fn with_days_until_expire(mut self, days: i64) -> Self {
        self.days_until_expire = days;
        self
    }

    /// Set the file name prefix for durable stores
    pub fn with_key_prefix(mut self, prefix: &str) -> Self {
        self.key_prefix = prefix.to_string();
        self
    }
}
