//! Encoding flags.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// A single named encoding flag, as written in configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JsonFlag {
    /// Write `/` as is instead of `\/`.
    UnescapedSlashes,
    /// Write non-ASCII characters as is instead of `\uXXXX`.
    UnescapedUnicode,
    /// Indent output with four spaces per level.
    PrettyPrint,
    /// Report every codec failure. Always set on a translator.
    ThrowOnError,
}

impl JsonFlag {
    pub const ALL: [JsonFlag; 4] = [
        JsonFlag::UnescapedSlashes,
        JsonFlag::UnescapedUnicode,
        JsonFlag::PrettyPrint,
        JsonFlag::ThrowOnError,
    ];

    pub const fn bit(self) -> JsonFlags {
        match self {
            JsonFlag::UnescapedSlashes => JsonFlags::UNESCAPED_SLASHES,
            JsonFlag::UnescapedUnicode => JsonFlags::UNESCAPED_UNICODE,
            JsonFlag::PrettyPrint => JsonFlags::PRETTY_PRINT,
            JsonFlag::ThrowOnError => JsonFlags::THROW_ON_ERROR,
        }
    }
}

bitflags! {
    /// Set of [`JsonFlag`]s.
    ///
    /// Serialized as the list of flag names it contains.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(from = "Vec<JsonFlag>", into = "Vec<JsonFlag>")]
    pub struct JsonFlags: u32 {
        const UNESCAPED_SLASHES = 1 << 0;
        const UNESCAPED_UNICODE = 1 << 1;
        const PRETTY_PRINT = 1 << 2;
        const THROW_ON_ERROR = 1 << 3;
    }
}

impl Default for JsonFlags {
    fn default() -> Self {
        JsonFlags::UNESCAPED_SLASHES | JsonFlags::UNESCAPED_UNICODE
    }
}

impl From<JsonFlag> for JsonFlags {
    fn from(flag: JsonFlag) -> Self {
        flag.bit()
    }
}

impl From<Vec<JsonFlag>> for JsonFlags {
    fn from(flags: Vec<JsonFlag>) -> Self {
        flags.into_iter().map(JsonFlag::bit).collect()
    }
}

impl From<JsonFlags> for Vec<JsonFlag> {
    fn from(flags: JsonFlags) -> Self {
        JsonFlag::ALL
            .into_iter()
            .filter(|flag| flags.contains(flag.bit()))
            .collect()
    }
}
