//! Translator configuration.

use serde::{Deserialize, Serialize};

use crate::flags::JsonFlags;

/// Default upper bound on container nesting.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Construction-time settings of a [`JsonTranslator`](crate::JsonTranslator).
///
/// Missing fields fall back to their defaults when deserialized, so an empty
/// table is a valid configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslatorConfig {
    /// Deepest container nesting accepted on encode and decode. `0` admits
    /// scalars only.
    pub max_depth: usize,
    pub flags: JsonFlags,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            flags: JsonFlags::default(),
        }
    }
}

impl TranslatorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_flags(mut self, flags: JsonFlags) -> Self {
        self.flags = flags;
        self
    }
}
