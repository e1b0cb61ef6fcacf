//! Implementation of [serde::de::Deserializer] for [PackDeserializer]

use serde::de::{
    self, DeserializeSeed, EnumAccess, IntoDeserializer, MapAccess, SeqAccess, VariantAccess,
};

use crate::{err::Error, types::PackType, unpacker::Unpacker};

/// This data structure reads packed payloads back into arbitrary data structures.
///
/// Structs/enums to be deserialized need to derive [serde::Deserialize].
pub struct PackDeserializer<'de> {
    pub(crate) input: Unpacker<'de>,
}

impl<'de> PackDeserializer<'de> {
    pub fn from_slice(s: &'de [u8]) -> Self {
        Self {
            input: Unpacker::new(s),
        }
    }

    /// Read the 4-byte count of a list, string, byte string or map.
    fn next_count(&mut self) -> Result<usize, Error> {
        Ok(u32::unpack_value(&mut self.input)? as usize)
    }

    /// Read a counted run of bytes without copying.
    fn next_bytes(&mut self) -> Result<&'de [u8], Error> {
        let len = self.next_count()?;
        self.input.consume(len)
    }
}

/// Impl deserialize for primitives that have a [PackType] binding
macro_rules! deserialize_primitive {
    ($fn_name: ident: $prim_type: ty => $visitor_fn: ident) => {
        fn $fn_name<V>(self, visitor: V) -> Result<V::Value, Self::Error>
        where
            V: de::Visitor<'de>,
        {
            visitor.$visitor_fn(<$prim_type>::unpack_value(&mut self.input)?)
        }
    };
}

impl<'de, 'a> de::Deserializer<'de> for &'a mut PackDeserializer<'de> {
    type Error = Error;

    // payloads carry no type information
    fn deserialize_any<V>(self, _visitor: V) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        Err(Error::Custom(
            "packed payloads are not self-describing".to_string(),
        ))
    }

    fn is_human_readable(&self) -> bool {
        false
    }

    deserialize_primitive! {deserialize_bool: bool => visit_bool}

    deserialize_primitive! {deserialize_i8: i8 => visit_i8}
    deserialize_primitive! {deserialize_i16: i16 => visit_i16}
    deserialize_primitive! {deserialize_i32: i32 => visit_i32}
    deserialize_primitive! {deserialize_i64: i64 => visit_i64}

    deserialize_primitive! {deserialize_u8: u8 => visit_u8}
    deserialize_primitive! {deserialize_u16: u16 => visit_u16}
    deserialize_primitive! {deserialize_u32: u32 => visit_u32}
    deserialize_primitive! {deserialize_u64: u64 => visit_u64}

    deserialize_primitive! {deserialize_f32: f32 => visit_f32}
    deserialize_primitive! {deserialize_f64: f64 => visit_f64}

    fn deserialize_char<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        let scalar = u32::unpack_value(&mut self.input)?;
        match char::from_u32(scalar) {
            Some(c) => visitor.visit_char(c),
            None => Err(Error::Custom(format!(
                "{:#x} is not a unicode scalar value",
                scalar
            ))),
        }
    }

    fn deserialize_str<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        let bytes = self.next_bytes()?;
        let s = std::str::from_utf8(bytes).map_err(|_| Error::InvalidUtf8)?;
        visitor.visit_borrowed_str(s)
    }

    fn deserialize_string<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        de::Deserializer::deserialize_str(self, visitor)
    }

    fn deserialize_bytes<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_borrowed_bytes(self.next_bytes()?)
    }

    fn deserialize_byte_buf<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_byte_buf(self.next_bytes()?.to_vec())
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        match bool::unpack_value(&mut self.input)? {
            true => visitor.visit_some(self),
            false => visitor.visit_none(),
        }
    }

    fn deserialize_unit<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_unit()
    }

    fn deserialize_unit_struct<V>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        de::Deserializer::deserialize_unit(self, visitor)
    }

    fn deserialize_newtype_struct<V>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        let count = self.next_count()?;
        visitor.visit_seq(CountedAccess::new(self, count))
    }

    fn deserialize_tuple<V>(self, len: usize, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_seq(CountedAccess::new(self, len))
    }

    fn deserialize_tuple_struct<V>(
        self,
        _name: &'static str,
        len: usize,
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        de::Deserializer::deserialize_tuple(self, len, visitor)
    }

    fn deserialize_map<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        let count = self.next_count()?;
        visitor.visit_map(CountedAccess::new(self, count))
    }

    // structs are read as tuples of their fields
    fn deserialize_struct<V>(
        self,
        _name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        de::Deserializer::deserialize_tuple(self, fields.len(), visitor)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_enum(self)
    }

    // variant identifiers are their u32 index
    fn deserialize_identifier<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        de::Deserializer::deserialize_u32(self, visitor)
    }

    fn deserialize_ignored_any<V>(self, _visitor: V) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        Err(Error::Custom(
            "cannot skip values in a payload that is not self-describing".to_string(),
        ))
    }
}

impl<'de, 'a> EnumAccess<'de> for &'a mut PackDeserializer<'de> {
    type Error = Error;

    type Variant = Self;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant), Self::Error>
    where
        V: DeserializeSeed<'de>,
    {
        let variant_index: de::value::U32Deserializer<Error> =
            u32::unpack_value(&mut self.input)?.into_deserializer();
        let val = seed.deserialize(variant_index)?;

        Ok((val, self))
    }
}

impl<'de, 'a> VariantAccess<'de> for &'a mut PackDeserializer<'de> {
    type Error = Error;

    fn unit_variant(self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value, Self::Error>
    where
        T: DeserializeSeed<'de>,
    {
        seed.deserialize(self)
    }

    fn tuple_variant<V>(self, len: usize, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        de::Deserializer::deserialize_tuple(self, len, visitor)
    }

    fn struct_variant<V>(
        self,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        de::Deserializer::deserialize_tuple(self, fields.len(), visitor)
    }
}

/// Hands out a known number of elements (or map entries) to a visitor.
struct CountedAccess<'a, 'de: 'a> {
    des: &'a mut PackDeserializer<'de>,
    left: usize,
}

impl<'a, 'de> CountedAccess<'a, 'de> {
    fn new(des: &'a mut PackDeserializer<'de>, left: usize) -> Self {
        Self { des, left }
    }
}

impl<'a, 'de> SeqAccess<'de> for CountedAccess<'a, 'de> {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>, Self::Error>
    where
        T: DeserializeSeed<'de>,
    {
        if self.left == 0 {
            return Ok(None);
        }
        self.left -= 1;
        seed.deserialize(&mut *self.des).map(Some)
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.left)
    }
}

impl<'a, 'de> MapAccess<'de> for CountedAccess<'a, 'de> {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>, Self::Error>
    where
        K: DeserializeSeed<'de>,
    {
        if self.left == 0 {
            return Ok(None);
        }
        self.left -= 1;
        seed.deserialize(&mut *self.des).map(Some)
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value, Self::Error>
    where
        V: DeserializeSeed<'de>,
    {
        seed.deserialize(&mut *self.des)
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.left)
    }
}
