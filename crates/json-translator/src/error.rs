//! Failure types raised by the translator.
//!
//! Codec failures are never surfaced raw. Encoding wraps them into
//! [`SerializeFailure`], decoding into [`UnserializeFailure`], and both keep the
//! original [`CodecError`] reachable through `source()`.

use serde_json::error::Category;
use thiserror::Error;

/// Category of a codec failure, with a stable numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodecErrorKind {
    /// Nesting deeper than the configured maximum depth.
    Depth,
    /// Unescaped control character inside a string literal.
    ControlCharacter,
    Syntax,
    /// Output bytes that are not valid UTF-8.
    Utf8,
    /// NaN or infinite number on encode.
    NonFinite,
    /// A value JSON cannot represent, such as a non-string map key.
    Unsupported,
    /// Broken `\u` escape, including unpaired surrogates.
    Utf16,
    Io,
    /// Number literal outside the range of `f64`.
    NumberRange,
}

impl CodecErrorKind {
    pub const fn code(self) -> u32 {
        match self {
            CodecErrorKind::Depth => 1,
            CodecErrorKind::ControlCharacter => 3,
            CodecErrorKind::Syntax => 4,
            CodecErrorKind::Utf8 => 5,
            CodecErrorKind::NonFinite => 7,
            CodecErrorKind::Unsupported => 8,
            CodecErrorKind::Utf16 => 10,
            CodecErrorKind::Io => 11,
            CodecErrorKind::NumberRange => 12,
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            CodecErrorKind::Depth => "Maximum stack depth exceeded",
            CodecErrorKind::ControlCharacter => {
                "Control character error, possibly incorrectly encoded"
            }
            CodecErrorKind::Syntax => "Syntax error",
            CodecErrorKind::Utf8 => "Malformed UTF-8 characters, possibly incorrectly encoded",
            CodecErrorKind::NonFinite => "Inf and NaN cannot be JSON encoded",
            CodecErrorKind::Unsupported => "Type is not supported",
            CodecErrorKind::Utf16 => "Single unpaired UTF-16 surrogate in unicode escape",
            CodecErrorKind::Io => "I/O error",
            CodecErrorKind::NumberRange => "Number out of range",
        }
    }

    fn categorize(err: &serde_json::Error) -> Self {
        match err.classify() {
            Category::Io => CodecErrorKind::Io,
            Category::Eof => CodecErrorKind::Syntax,
            Category::Data => CodecErrorKind::Unsupported,
            Category::Syntax => Self::categorize_message(&err.to_string()),
        }
    }

    fn categorize_message(message: &str) -> Self {
        const TABLE: &[(&str, CodecErrorKind)] = &[
            ("control character", CodecErrorKind::ControlCharacter),
            ("lone leading surrogate", CodecErrorKind::Utf16),
            ("unexpected end of hex escape", CodecErrorKind::Utf16),
            ("invalid unicode code point", CodecErrorKind::Utf16),
            ("recursion limit exceeded", CodecErrorKind::Depth),
            ("number out of range", CodecErrorKind::NumberRange),
            ("float key must be finite", CodecErrorKind::NonFinite),
        ];
        TABLE
            .iter()
            .find(|(prefix, _)| message.starts_with(prefix))
            .map(|(_, kind)| *kind)
            .unwrap_or(CodecErrorKind::Syntax)
    }
}

/// Low-level failure reported by the JSON codec.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct CodecError {
    kind: CodecErrorKind,
    message: String,
    #[source]
    source: Option<serde_json::Error>,
}

impl CodecError {
    pub fn new(kind: CodecErrorKind) -> Self {
        Self {
            kind,
            message: kind.description().to_string(),
            source: None,
        }
    }

    pub(crate) fn with_detail(kind: CodecErrorKind, detail: impl std::fmt::Display) -> Self {
        Self {
            kind,
            message: format!("{}: {detail}", kind.description()),
            source: None,
        }
    }

    /// Wraps a parse failure.
    pub(crate) fn from_json(err: serde_json::Error) -> Self {
        let kind = CodecErrorKind::categorize(&err);
        Self::wrap(kind, err)
    }

    /// Wraps a serialization failure. Anything that is not a number or I/O
    /// problem means the value has no JSON representation.
    pub(crate) fn from_json_encode(err: serde_json::Error) -> Self {
        let kind = match CodecErrorKind::categorize(&err) {
            kind @ (CodecErrorKind::NonFinite | CodecErrorKind::Io) => kind,
            _ => CodecErrorKind::Unsupported,
        };
        Self::wrap(kind, err)
    }

    fn wrap(kind: CodecErrorKind, err: serde_json::Error) -> Self {
        Self {
            kind,
            message: format!("{}: {err}", kind.description()),
            source: Some(err),
        }
    }

    pub fn kind(&self) -> CodecErrorKind {
        self.kind
    }

    pub fn code(&self) -> u32 {
        self.kind.code()
    }
}

/// Encoding failed.
#[derive(Debug, Error)]
#[error("Failed to serialize {subject} into JSON: {source}")]
pub struct SerializeFailure {
    subject: &'static str,
    #[source]
    source: CodecError,
}

impl SerializeFailure {
    pub(crate) fn new(subject: &'static str, source: CodecError) -> Self {
        Self { subject, source }
    }

    pub fn code(&self) -> u32 {
        self.source.code()
    }

    pub fn kind(&self) -> CodecErrorKind {
        self.source.kind()
    }

    pub fn cause(&self) -> &CodecError {
        &self.source
    }
}

/// Decoding failed. The message carries the offending input verbatim.
#[derive(Debug, Error)]
#[error("Failed to unserialize JSON string into {target}: {source} ; string: {input}")]
pub struct UnserializeFailure {
    target: &'static str,
    input: String,
    #[source]
    source: CodecError,
}

impl UnserializeFailure {
    pub(crate) fn new(target: &'static str, input: &str, source: CodecError) -> Self {
        Self {
            target,
            input: input.to_string(),
            source,
        }
    }

    pub fn code(&self) -> u32 {
        self.source.code()
    }

    pub fn kind(&self) -> CodecErrorKind {
        self.source.kind()
    }

    pub fn cause(&self) -> &CodecError {
        &self.source
    }

    pub fn input(&self) -> &str {
        &self.input
    }
}

/// Either translation failure, for callers that handle both directions alike.
#[derive(Debug, Error)]
pub enum SerializationError {
    #[error(transparent)]
    Serialize(#[from] SerializeFailure),
    #[error(transparent)]
    Unserialize(#[from] UnserializeFailure),
}

impl SerializationError {
    pub fn code(&self) -> u32 {
        match self {
            SerializationError::Serialize(failure) => failure.code(),
            SerializationError::Unserialize(failure) => failure.code(),
        }
    }
}
