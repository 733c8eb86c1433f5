//! Parser configuration.

use serde::{Deserialize, Serialize};

/// Default nesting limit for [`GrammarConfig::max_depth`].
pub const DEFAULT_MAX_DEPTH: usize = 65_536;

/// Limits applied while reading the textual notation.
///
/// Missing fields deserialize to their defaults, so `{}` is a valid config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrammarConfig {
    /// Maximum number of nested cuts below the root.
    pub max_depth: usize,
}

impl GrammarConfig {
    /// Creates a config with the given depth limit.
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self { max_depth }
    }
}

impl Default for GrammarConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}
