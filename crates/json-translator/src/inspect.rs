//! Pre-encode validation pass.
//!
//! `serde_json` writes NaN and infinities as `null` and has no nesting bound on
//! output, so values are walked once with a serializer that only records
//! container depth and rejects non-finite floats. Containers are counted the
//! way they appear in the JSON text: enum variants with content add the
//! wrapping object, byte strings become arrays, map keys are not descended.

use std::fmt;

use serde::ser::{self, Serialize};

use crate::error::{CodecError, CodecErrorKind};

/// Checks that `value` nests at most `max_depth` containers and holds only
/// finite numbers.
pub(crate) fn inspect<T: Serialize + ?Sized>(value: &T, max_depth: usize) -> Result<(), CodecError> {
    let mut inspector = Inspector {
        depth: 0,
        max_depth,
    };
    value.serialize(&mut inspector).map_err(|violation| match violation {
        Violation::Depth => CodecError::new(CodecErrorKind::Depth),
        Violation::NonFinite => CodecError::new(CodecErrorKind::NonFinite),
        Violation::Custom(message) => CodecError::with_detail(CodecErrorKind::Unsupported, message),
    })
}

#[derive(Debug)]
enum Violation {
    Depth,
    NonFinite,
    Custom(String),
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::Depth => f.write_str(CodecErrorKind::Depth.description()),
            Violation::NonFinite => f.write_str(CodecErrorKind::NonFinite.description()),
            Violation::Custom(message) => f.write_str(message),
        }
    }
}

impl std::error::Error for Violation {}

impl ser::Error for Violation {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Violation::Custom(msg.to_string())
    }
}

struct Inspector {
    depth: usize,
    max_depth: usize,
}

impl Inspector {
    fn enter(&mut self, levels: usize) -> Result<(), Violation> {
        self.depth += levels;
        if self.depth > self.max_depth {
            return Err(Violation::Depth);
        }
        Ok(())
    }

    fn leave(&mut self, levels: usize) {
        self.depth -= levels;
    }

    fn float(&mut self, finite: bool) -> Result<(), Violation> {
        if finite {
            Ok(())
        } else {
            Err(Violation::NonFinite)
        }
    }
}

impl<'a> ser::Serializer for &'a mut Inspector {
    type Ok = ();
    type Error = Violation;

    type SerializeSeq = Self;
    type SerializeTuple = Self;
    type SerializeTupleStruct = Self;
    type SerializeTupleVariant = Self;
    type SerializeMap = Self;
    type SerializeStruct = Self;
    type SerializeStructVariant = Self;

    fn serialize_bool(self, _v: bool) -> Result<(), Violation> {
        Ok(())
    }

    fn serialize_i8(self, _v: i8) -> Result<(), Violation> {
        Ok(())
    }

    fn serialize_i16(self, _v: i16) -> Result<(), Violation> {
        Ok(())
    }

    fn serialize_i32(self, _v: i32) -> Result<(), Violation> {
        Ok(())
    }

    fn serialize_i64(self, _v: i64) -> Result<(), Violation> {
        Ok(())
    }

    fn serialize_i128(self, _v: i128) -> Result<(), Violation> {
        Ok(())
    }

    fn serialize_u8(self, _v: u8) -> Result<(), Violation> {
        Ok(())
    }

    fn serialize_u16(self, _v: u16) -> Result<(), Violation> {
        Ok(())
    }

    fn serialize_u32(self, _v: u32) -> Result<(), Violation> {
        Ok(())
    }

    fn serialize_u64(self, _v: u64) -> Result<(), Violation> {
        Ok(())
    }

    fn serialize_u128(self, _v: u128) -> Result<(), Violation> {
        Ok(())
    }

    fn serialize_f32(self, v: f32) -> Result<(), Violation> {
        self.float(v.is_finite())
    }

    fn serialize_f64(self, v: f64) -> Result<(), Violation> {
        self.float(v.is_finite())
    }

    fn serialize_char(self, _v: char) -> Result<(), Violation> {
        Ok(())
    }

    fn serialize_str(self, _v: &str) -> Result<(), Violation> {
        Ok(())
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<(), Violation> {
        self.enter(1)?;
        self.leave(1);
        Ok(())
    }

    fn serialize_none(self) -> Result<(), Violation> {
        Ok(())
    }

    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> Result<(), Violation> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<(), Violation> {
        Ok(())
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<(), Violation> {
        Ok(())
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
    ) -> Result<(), Violation> {
        Ok(())
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<(), Violation> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        value: &T,
    ) -> Result<(), Violation> {
        self.enter(1)?;
        value.serialize(&mut *self)?;
        self.leave(1);
        Ok(())
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self, Violation> {
        self.enter(1)?;
        Ok(self)
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self, Violation> {
        self.enter(1)?;
        Ok(self)
    }

    fn serialize_tuple_struct(self, _name: &'static str, _len: usize) -> Result<Self, Violation> {
        self.enter(1)?;
        Ok(self)
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self, Violation> {
        self.enter(2)?;
        Ok(self)
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self, Violation> {
        self.enter(1)?;
        Ok(self)
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self, Violation> {
        self.enter(1)?;
        Ok(self)
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self, Violation> {
        self.enter(2)?;
        Ok(self)
    }
}

impl<'a> ser::SerializeSeq for &'a mut Inspector {
    type Ok = ();
    type Error = Violation;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), Violation> {
        value.serialize(&mut **self)
    }

    fn end(self) -> Result<(), Violation> {
        self.leave(1);
        Ok(())
    }
}

impl<'a> ser::SerializeTuple for &'a mut Inspector {
    type Ok = ();
    type Error = Violation;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), Violation> {
        value.serialize(&mut **self)
    }

    fn end(self) -> Result<(), Violation> {
        self.leave(1);
        Ok(())
    }
}

impl<'a> ser::SerializeTupleStruct for &'a mut Inspector {
    type Ok = ();
    type Error = Violation;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), Violation> {
        value.serialize(&mut **self)
    }

    fn end(self) -> Result<(), Violation> {
        self.leave(1);
        Ok(())
    }
}

impl<'a> ser::SerializeTupleVariant for &'a mut Inspector {
    type Ok = ();
    type Error = Violation;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), Violation> {
        value.serialize(&mut **self)
    }

    fn end(self) -> Result<(), Violation> {
        self.leave(2);
        Ok(())
    }
}

impl<'a> ser::SerializeMap for &'a mut Inspector {
    type Ok = ();
    type Error = Violation;

    // Key validity is left to serde_json.
    fn serialize_key<T: Serialize + ?Sized>(&mut self, _key: &T) -> Result<(), Violation> {
        Ok(())
    }

    fn serialize_value<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), Violation> {
        value.serialize(&mut **self)
    }

    fn end(self) -> Result<(), Violation> {
        self.leave(1);
        Ok(())
    }
}

impl<'a> ser::SerializeStruct for &'a mut Inspector {
    type Ok = ();
    type Error = Violation;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        _key: &'static str,
        value: &T,
    ) -> Result<(), Violation> {
        value.serialize(&mut **self)
    }

    fn end(self) -> Result<(), Violation> {
        self.leave(1);
        Ok(())
    }
}

impl<'a> ser::SerializeStructVariant for &'a mut Inspector {
    type Ok = ();
    type Error = Violation;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        _key: &'static str,
        value: &T,
    ) -> Result<(), Violation> {
        value.serialize(&mut **self)
    }

    fn end(self) -> Result<(), Violation> {
        self.leave(2);
        Ok(())
    }
}
