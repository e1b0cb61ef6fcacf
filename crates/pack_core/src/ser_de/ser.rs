//! Implementation of [serde::ser::Serializer] for [PackSerializer]

use serde::{ser, Serialize};

use crate::{
    err::{Error, PackResult},
    packer::Packer,
    types::PackType,
};

/// This data structure contains the packed payload of any arbitrary data structure.
///
/// Structs/enums to be serialized need to derive [serde::Serialize].
#[derive(Default)]
pub struct PackSerializer {
    pub(crate) output: Packer,
}

/// Impl serialize for primitives that have a [PackType] binding
macro_rules! serialize_primitive {
    ($fn_name: ident, $prim_type: ty) => {
        fn $fn_name(self, v: $prim_type) -> Result<Self::Ok, Self::Error> {
            v.pack_value(&mut self.output)
        }
    };
}

impl PackSerializer {
    /// Enum variants are written as their `u32` index.
    fn write_variant_index(&mut self, variant_index: u32) -> PackResult<()> {
        variant_index.pack_value(&mut self.output)
    }

    /// Reserve a 4-byte count that is filled in once the elements are written.
    fn begin_counted(&mut self) -> Counted<'_> {
        let count_at = self.output.len();
        self.output.push(0_u32.to_le_bytes());

        Counted {
            ser: self,
            count_at,
            count: 0,
        }
    }
}

impl<'a> ser::Serializer for &'a mut PackSerializer {
    type Ok = ();

    type Error = Error;

    type SerializeSeq = Counted<'a>;

    type SerializeTuple = Self;

    type SerializeTupleStruct = Self;

    type SerializeTupleVariant = Self;

    type SerializeMap = Counted<'a>;

    type SerializeStruct = Self;

    type SerializeStructVariant = Self;

    fn is_human_readable(&self) -> bool {
        false
    }

    serialize_primitive! {serialize_bool, bool}

    serialize_primitive! {serialize_i8, i8}
    serialize_primitive! {serialize_i16, i16}
    serialize_primitive! {serialize_i32, i32}
    serialize_primitive! {serialize_i64, i64}

    serialize_primitive! {serialize_u8, u8}
    serialize_primitive! {serialize_u16, u16}
    serialize_primitive! {serialize_u32, u32}
    serialize_primitive! {serialize_u64, u64}

    serialize_primitive! {serialize_f32, f32}
    serialize_primitive! {serialize_f64, f64}

    // chars are their unicode scalar value
    fn serialize_char(self, v: char) -> Result<Self::Ok, Self::Error> {
        (v as u32).pack_value(&mut self.output)
    }

    fn serialize_str(self, v: &str) -> Result<Self::Ok, Self::Error> {
        ser::Serializer::serialize_bytes(self, v.as_bytes())
    }

    // same layout as a list of u8
    fn serialize_bytes(self, v: &[u8]) -> Result<Self::Ok, Self::Error> {
        self.output.push_count(v.len())?;
        self.output.push(v);
        Ok(())
    }

    fn serialize_none(self) -> Result<Self::Ok, Self::Error> {
        false.pack_value(&mut self.output)
    }

    fn serialize_some<T: ?Sized>(self, value: &T) -> Result<Self::Ok, Self::Error>
    where
        T: Serialize,
    {
        true.pack_value(&mut self.output)?;
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Self::Ok, Self::Error> {
        Ok(())
    }

    fn serialize_unit_struct(self, _: &'static str) -> Result<Self::Ok, Self::Error> {
        ser::Serializer::serialize_unit(self)
    }

    fn serialize_unit_variant(
        self,
        _: &'static str,
        variant_index: u32,
        _: &'static str,
    ) -> Result<Self::Ok, Self::Error> {
        self.write_variant_index(variant_index)
    }

    // serialize the inner value
    fn serialize_newtype_struct<T: ?Sized>(
        self,
        _: &'static str,
        value: &T,
    ) -> Result<Self::Ok, Self::Error>
    where
        T: Serialize,
    {
        value.serialize(self)
    }

    // serialize the index, then the inner variant
    fn serialize_newtype_variant<T: ?Sized>(
        self,
        _: &'static str,
        variant_index: u32,
        _: &'static str,
        value: &T,
    ) -> Result<Self::Ok, Self::Error>
    where
        T: Serialize,
    {
        self.write_variant_index(variant_index)?;
        value.serialize(self)
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq, Self::Error> {
        Ok(self.begin_counted())
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple, Self::Error> {
        Ok(self)
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleStruct, Self::Error> {
        ser::Serializer::serialize_tuple(self, len)
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant, Self::Error> {
        self.write_variant_index(variant_index)?;
        Ok(self)
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap, Self::Error> {
        Ok(self.begin_counted())
    }

    // structs are tuples of their fields, in declaration order
    fn serialize_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStruct, Self::Error> {
        Ok(self)
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant, Self::Error> {
        self.write_variant_index(variant_index)?;
        Ok(self)
    }
}

/// Sequences and maps whose 4-byte count is patched in at the end.
///
/// Serde does not always know the length of a sequence up front, so the
/// elements are counted as they are written.
pub struct Counted<'a> {
    ser: &'a mut PackSerializer,
    count_at: usize,
    count: usize,
}

impl<'a> Counted<'a> {
    fn finish(self) -> PackResult<()> {
        let count = u32::try_from(self.count).map_err(|_| Error::LengthOverflow {
            limit: u32::MAX as usize,
            actual: self.count,
        })?;

        self.ser
            .output
            .output
            .overwrite(self.count_at, &count.to_le_bytes());
        Ok(())
    }
}

impl<'a> ser::SerializeSeq for Counted<'a> {
    type Ok = ();

    type Error = Error;

    fn serialize_element<T: ?Sized>(&mut self, value: &T) -> Result<(), Self::Error>
    where
        T: Serialize,
    {
        self.count += 1;
        value.serialize(&mut *self.ser)
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        self.finish()
    }
}

impl<'a> ser::SerializeMap for Counted<'a> {
    type Ok = ();

    type Error = Error;

    // entries are (key, value) tuples
    fn serialize_key<T: ?Sized>(&mut self, key: &T) -> Result<(), Self::Error>
    where
        T: Serialize,
    {
        self.count += 1;
        key.serialize(&mut *self.ser)
    }

    fn serialize_value<T: ?Sized>(&mut self, value: &T) -> Result<(), Self::Error>
    where
        T: Serialize,
    {
        value.serialize(&mut *self.ser)
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        self.finish()
    }
}

impl<'a> ser::SerializeTuple for &'a mut PackSerializer {
    type Ok = ();

    type Error = Error;

    fn serialize_element<T: ?Sized>(&mut self, value: &T) -> Result<(), Self::Error>
    where
        T: Serialize,
    {
        value.serialize(&mut **self)
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        Ok(())
    }
}

impl<'a> ser::SerializeTupleStruct for &'a mut PackSerializer {
    type Ok = ();

    type Error = Error;

    fn serialize_field<T: ?Sized>(&mut self, value: &T) -> Result<(), Self::Error>
    where
        T: Serialize,
    {
        value.serialize(&mut **self)
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        Ok(())
    }
}

impl<'a> ser::SerializeTupleVariant for &'a mut PackSerializer {
    type Ok = ();

    type Error = Error;

    fn serialize_field<T: ?Sized>(&mut self, value: &T) -> Result<(), Self::Error>
    where
        T: Serialize,
    {
        value.serialize(&mut **self)
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        Ok(())
    }
}

impl<'a> ser::SerializeStruct for &'a mut PackSerializer {
    type Ok = ();

    type Error = Error;

    fn serialize_field<T: ?Sized>(
        &mut self,
        _key: &'static str,
        value: &T,
    ) -> Result<(), Self::Error>
    where
        T: Serialize,
    {
        value.serialize(&mut **self)
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        Ok(())
    }
}

impl<'a> ser::SerializeStructVariant for &'a mut PackSerializer {
    type Ok = ();

    type Error = Error;

    fn serialize_field<T: ?Sized>(
        &mut self,
        _key: &'static str,
        value: &T,
    ) -> Result<(), Self::Error>
    where
        T: Serialize,
    {
        value.serialize(&mut **self)
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        Ok(())
    }
}
