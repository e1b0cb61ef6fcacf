//! Serde bridge.
//!
//! Writes any [serde::Serialize] type as a raw packed payload, and reads it
//! back with [serde::Deserialize]. The layout is the one the [crate::PackType]
//! bindings use, with structs packed like tuples of their fields, maps like
//! lists of `(key, value)` tuples and enums as a `u32` variant index followed
//! by the variant's fields. No type descriptor is written.

use crate::{
    err::{Error, PackResult},
    pack::Pack,
};

mod de;
mod ser;

pub use de::PackDeserializer;
pub use ser::PackSerializer;

/// Serialize a data structure to a packed payload
pub fn to_pack<T: serde::Serialize>(value: &T) -> PackResult<Pack> {
    let mut serializer = PackSerializer::default();

    value.serialize(&mut serializer)?;

    Ok(serializer.output.into_pack())
}

/// Deserialize a data structure from a packed payload.
///
/// The whole slice must be consumed.
pub fn from_pack<'de, T>(bytes: &'de [u8]) -> PackResult<T>
where
    T: serde::Deserialize<'de>,
{
    let mut deserializer = PackDeserializer::from_slice(bytes);

    let value = T::deserialize(&mut deserializer)?;

    match deserializer.input.bytes_left() {
        0 => Ok(value),
        n => Err(Error::TrailingBytes(n)),
    }
}
