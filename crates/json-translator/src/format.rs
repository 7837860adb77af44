//! Output formatting driven by [`JsonFlags`].
//!
//! `serde_json` already leaves `/` and non-ASCII characters alone; this
//! formatter adds the escapes when the corresponding flags are cleared and
//! delegates layout to the wrapped formatter.

use std::io;

use serde_json::ser::Formatter;

use crate::flags::JsonFlags;

pub(crate) struct FlagFormatter<F> {
    inner: F,
    escape_slashes: bool,
    escape_unicode: bool,
}

impl<F: Formatter> FlagFormatter<F> {
    pub(crate) fn new(inner: F, flags: JsonFlags) -> Self {
        Self {
            inner,
            escape_slashes: !flags.contains(JsonFlags::UNESCAPED_SLASHES),
            escape_unicode: !flags.contains(JsonFlags::UNESCAPED_UNICODE),
        }
    }

    fn needs_escape(&self, ch: char) -> bool {
        (ch == '/' && self.escape_slashes) || (!ch.is_ascii() && self.escape_unicode)
    }
}

impl<F: Formatter> Formatter for FlagFormatter<F> {
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if !self.escape_slashes && !self.escape_unicode {
            return self.inner.write_string_fragment(writer, fragment);
        }

        let mut start = 0;
        for (index, ch) in fragment.char_indices() {
            if !self.needs_escape(ch) {
                continue;
            }
            if start < index {
                self.inner
                    .write_string_fragment(writer, &fragment[start..index])?;
            }
            if ch == '/' {
                writer.write_all(b"\\/")?;
            } else {
                let mut units = [0u16; 2];
                for unit in ch.encode_utf16(&mut units) {
                    write!(writer, "\\u{unit:04x}")?;
                }
            }
            start = index + ch.len_utf8();
        }
        if start < fragment.len() {
            self.inner.write_string_fragment(writer, &fragment[start..])?;
        }
        Ok(())
    }

    fn begin_array<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.begin_array(writer)
    }

    fn end_array<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.end_array(writer)
    }

    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.begin_array_value(writer, first)
    }

    fn end_array_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.end_array_value(writer)
    }

    fn begin_object<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.begin_object(writer)
    }

    fn end_object<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.end_object(writer)
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.begin_object_key(writer, first)
    }

    fn end_object_key<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.end_object_key(writer)
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.begin_object_value(writer)
    }

    fn end_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.end_object_value(writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;
    use serde_json::json;
    use serde_json::ser::{CompactFormatter, PrettyFormatter};

    fn render<F: Formatter>(value: &serde_json::Value, formatter: F) -> String {
        let mut out = Vec::new();
        let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
        value.serialize(&mut serializer).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_defaults_leave_slashes_and_unicode() {
        let value = json!({"path": "a/b", "name": "héllo"});
        let formatter = FlagFormatter::new(CompactFormatter, JsonFlags::default());
        assert_eq!(render(&value, formatter), r#"{"path":"a/b","name":"héllo"}"#);
    }

    #[test]
    fn test_escape_slashes() {
        let flags = JsonFlags::UNESCAPED_UNICODE;
        let formatter = FlagFormatter::new(CompactFormatter, flags);
        assert_eq!(render(&json!("a/b/"), formatter), r#""a\/b\/""#);
    }

    #[test]
    fn test_escape_unicode_uses_utf16_units() {
        let flags = JsonFlags::UNESCAPED_SLASHES;
        let formatter = FlagFormatter::new(CompactFormatter, flags);
        assert_eq!(
            render(&json!("é😀/"), formatter),
            r#""\u00e9\ud83d\ude00/""#
        );
    }

    #[test]
    fn test_keys_are_escaped_too() {
        let formatter = FlagFormatter::new(CompactFormatter, JsonFlags::empty());
        assert_eq!(render(&json!({"ü/": 1}), formatter), r#"{"\u00fc\/":1}"#);
    }

    #[test]
    fn test_existing_escapes_survive() {
        let formatter = FlagFormatter::new(CompactFormatter, JsonFlags::empty());
        assert_eq!(render(&json!("\"é\"\n"), formatter), r#""\"\u00e9\"\n""#);
    }

    #[test]
    fn test_pretty_layout_is_delegated() {
        let formatter = FlagFormatter::new(PrettyFormatter::with_indent(b"    "), JsonFlags::default());
        assert_eq!(
            render(&json!({"a": [1]}), formatter),
            "{\n    \"a\": [\n        1\n    ]\n}"
        );
    }
}
