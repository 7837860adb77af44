//! JSON translation for ordered mappings and records.
//!
//! [`Translator`] converts a [`Mapping`] (ordered, integer or string keys) or a
//! [`Record`] (named fields) to JSON text and back. [`JsonTranslator`] is the
//! `serde_json` implementation; [`JsonComponentRegistrar`] installs it into a
//! [`component_container::Container`] so consumers can depend on
//! `dyn Translator`.
//!
//! # Example
//!
//! ```
//! use json_translator::{JsonTranslator, MapKey, Mapping, Translator};
//! use serde_json::json;
//!
//! let translator = JsonTranslator::default();
//!
//! let mapping: Mapping = translator
//!     .decode_to_mapping(r#"{"a":"b","2":null,"":3}"#)
//!     .unwrap();
//! assert_eq!(mapping.get(2), Some(&json!(null)));
//! assert_eq!(mapping.get(MapKey::null()), Some(&json!(3)));
//!
//! // Scalars are coerced into a one-element mapping.
//! let scalar = translator.decode_to_mapping("false").unwrap();
//! assert_eq!(scalar.get(0), Some(&json!(false)));
//!
//! let err = translator.decode_to_mapping("{invalid json").unwrap_err();
//! assert!(err.to_string().ends_with("; string: {invalid json"));
//! ```

pub mod config;
pub mod error;
pub mod flags;
mod format;
mod inspect;
pub mod integration;
pub mod mapping;
pub mod record;
mod scan;
pub mod translator;

pub use config::{TranslatorConfig, DEFAULT_MAX_DEPTH};
pub use error::{
    CodecError, CodecErrorKind, SerializationError, SerializeFailure, UnserializeFailure,
};
pub use flags::{JsonFlag, JsonFlags};
pub use integration::JsonComponentRegistrar;
pub use mapping::{MapKey, Mapping};
pub use record::{Record, SCALAR_FIELD};
pub use translator::{JsonTranslator, Translator};
