//! The translator contract and its JSON implementation.

use std::any::type_name;

use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Serialize};
use serde_json::ser::{CompactFormatter, Formatter, PrettyFormatter};
use serde_json::Value;

use crate::config::TranslatorConfig;
use crate::error::{CodecError, CodecErrorKind, SerializeFailure, UnserializeFailure};
use crate::flags::JsonFlags;
use crate::format::FlagFormatter;
use crate::inspect::inspect;
use crate::mapping::Mapping;
use crate::record::Record;
use crate::scan::depth_overflow;

const PRETTY_INDENT: &[u8] = b"    ";

/// Conversion between in-memory containers and JSON text.
///
/// Every call is independent and side-effect free. Failures always carry the
/// codec error that caused them.
pub trait Translator: Send + Sync {
    /// Encodes a mapping as a JSON object, keys in insertion order.
    fn encode_mapping(&self, mapping: &Mapping) -> Result<String, SerializeFailure>;

    /// Decodes text into a mapping, coercing non-container results.
    ///
    /// `null` yields an empty mapping; any other scalar yields `{0: scalar}`.
    fn decode_to_mapping(&self, text: &str) -> Result<Mapping, UnserializeFailure>;

    /// Encodes a record. The text equals that of the field-equivalent mapping.
    fn encode_record(&self, record: &Record) -> Result<String, SerializeFailure>;

    /// Decodes text into a record, coercing non-object results.
    ///
    /// `null` yields an empty record; any other scalar is stored under
    /// [`SCALAR_FIELD`](crate::record::SCALAR_FIELD).
    fn decode_to_record(&self, text: &str) -> Result<Record, UnserializeFailure>;
}

/// [`Translator`] backed by `serde_json`.
///
/// # Example
///
/// ```
/// use json_translator::{JsonTranslator, Mapping, Translator};
///
/// let translator = JsonTranslator::default();
///
/// let mut mapping = Mapping::new();
/// mapping.insert("path", "a/b");
/// mapping.insert("name", "héllo");
///
/// let text = translator.encode_mapping(&mapping).unwrap();
/// assert_eq!(text, r#"{"path":"a/b","name":"héllo"}"#);
/// assert_eq!(translator.decode_to_mapping(&text).unwrap(), mapping);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonTranslator {
    config: TranslatorConfig,
}

impl Default for JsonTranslator {
    fn default() -> Self {
        Self::new(TranslatorConfig::default())
    }
}

impl JsonTranslator {
    /// Creates a translator. [`JsonFlags::THROW_ON_ERROR`] is always added.
    pub fn new(config: TranslatorConfig) -> Self {
        Self {
            config: TranslatorConfig {
                flags: config.flags | JsonFlags::THROW_ON_ERROR,
                ..config
            },
        }
    }

    pub fn config(&self) -> &TranslatorConfig {
        &self.config
    }

    pub fn max_depth(&self) -> usize {
        self.config.max_depth
    }

    pub fn flags(&self) -> JsonFlags {
        self.config.flags
    }

    /// Encodes any serializable record, such as a struct with named fields.
    ///
    /// # Errors
    ///
    /// Fails on nesting deeper than the configured maximum, on NaN or
    /// infinite floats, and on values JSON cannot represent.
    pub fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<String, SerializeFailure> {
        self.write(value)
            .map_err(|err| encode_failure("record", err))
    }

    /// Decodes text straight into a typed record.
    pub fn decode<T: DeserializeOwned>(&self, text: &str) -> Result<T, UnserializeFailure> {
        self.read(text)
            .map_err(|err| decode_failure(type_name::<T>(), text, err))
    }

    fn write<T: Serialize + ?Sized>(&self, value: &T) -> Result<String, CodecError> {
        inspect(value, self.config.max_depth)?;
        let flags = self.config.flags;
        let bytes = if flags.contains(JsonFlags::PRETTY_PRINT) {
            let formatter = PrettyFormatter::with_indent(PRETTY_INDENT);
            write_with(value, FlagFormatter::new(formatter, flags))?
        } else {
            write_with(value, FlagFormatter::new(CompactFormatter, flags))?
        };
        String::from_utf8(bytes)
            .map_err(|err| CodecError::with_detail(CodecErrorKind::Utf8, err))
    }

    fn read<T: DeserializeOwned>(&self, text: &str) -> Result<T, CodecError> {
        if let Some(offset) = depth_overflow(text, self.config.max_depth) {
            check_prefix(&text[..offset])?;
        }
        let mut deserializer = serde_json::Deserializer::from_str(text);
        deserializer.disable_recursion_limit();
        let value = T::deserialize(&mut deserializer).map_err(CodecError::from_json)?;
        deserializer.end().map_err(CodecError::from_json)?;
        Ok(value)
    }
}

impl Translator for JsonTranslator {
    fn encode_mapping(&self, mapping: &Mapping) -> Result<String, SerializeFailure> {
        self.write(mapping)
            .map_err(|err| encode_failure("mapping", err))
    }

    fn decode_to_mapping(&self, text: &str) -> Result<Mapping, UnserializeFailure> {
        self.read::<Value>(text)
            .map(Mapping::from)
            .map_err(|err| decode_failure("mapping", text, err))
    }

    fn encode_record(&self, record: &Record) -> Result<String, SerializeFailure> {
        self.encode(record)
    }

    fn decode_to_record(&self, text: &str) -> Result<Record, UnserializeFailure> {
        self.read::<Value>(text)
            .map(Record::from)
            .map_err(|err| decode_failure("record", text, err))
    }
}

/// Parses the text preceding a depth overflow so that an earlier syntax error
/// wins over the overflow.
///
/// A prefix that runs out mid-value means the overflow is the first problem.
/// A prefix holding a complete value means the overflowing bracket is trailing
/// content, which the full parse then reports.
fn check_prefix(prefix: &str) -> Result<(), CodecError> {
    let mut deserializer = serde_json::Deserializer::from_str(prefix);
    deserializer.disable_recursion_limit();
    match IgnoredAny::deserialize(&mut deserializer).and_then(|_| deserializer.end()) {
        Ok(()) => Ok(()),
        Err(err) if err.is_eof() => Err(CodecError::new(CodecErrorKind::Depth)),
        Err(err) => Err(CodecError::from_json(err)),
    }
}

fn write_with<T, F>(value: &T, formatter: F) -> Result<Vec<u8>, CodecError>
where
    T: Serialize + ?Sized,
    F: Formatter,
{
    let mut out = Vec::with_capacity(128);
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    value
        .serialize(&mut serializer)
        .map_err(CodecError::from_json_encode)?;
    Ok(out)
}

fn encode_failure(subject: &'static str, err: CodecError) -> SerializeFailure {
    tracing::debug!(subject, code = err.code(), error = %err, "JSON encode failed");
    SerializeFailure::new(subject, err)
}

fn decode_failure(target: &'static str, text: &str, err: CodecError) -> UnserializeFailure {
    tracing::debug!(
        target_type = target,
        code = err.code(),
        input_len = text.len(),
        error = %err,
        "JSON decode failed"
    );
    UnserializeFailure::new(target, text, err)
}
