//! Codec bindings.
//!
//! Every packable type implements [PackType], which ties together its
//! [TypeInfo], how its payload is written and how it is read back.
//! Composite bindings are generic over the bindings of their components, so
//! `Vec<Option<(u8, String)>>` is packable without any code of its own.

mod collections;
mod tuples;
mod unions;

use crate::{
    err::PackResult,
    packer::Packer,
    type_info::{TypeId, TypeInfo},
    unpacker::Unpacker,
};

pub use unions::{Union2, Union3, Union4};
pub(crate) use unions::check_arm;

/// The codec binding of a concrete type.
pub trait PackType: Sized {
    /// The type descriptor. A pure function of the type, never of a value.
    fn type_info() -> TypeInfo;

    /// Write the payload of `self`, without a type descriptor.
    fn pack_value(&self, packer: &mut Packer) -> PackResult<()>;

    /// Read a payload written by [PackType::pack_value].
    fn unpack_value(unpacker: &mut Unpacker<'_>) -> PackResult<Self>;
}

/// A fixed sequence of independently tagged values, read or written in order.
///
/// Implemented for tuples of [PackType]s. Unlike [PackType::pack_value] on a
/// tuple, every component gets its own type descriptor.
pub trait TaggedSequence: Sized {
    /// Pack each component with its type descriptor.
    fn pack_tagged(&self, packer: &mut Packer) -> PackResult<()>;

    /// Check and decode each component in turn.
    fn unpack_tagged(unpacker: &mut Unpacker<'_>) -> PackResult<Self>;
}

/// Zero-sized type with an empty payload.
///
/// Lets "nothing" be named and checked like any other type. `()` packs the
/// same way.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Unit;

/// Impl [PackType] for fixed-width numeric primitives.
///
/// The payload is the little-endian byte representation of the value.
macro_rules! pack_numeric_primitive {
    ($num_type: ty => $id: ident) => {
        impl PackType for $num_type {
            fn type_info() -> TypeInfo {
                TypeInfo::leaf(TypeId::$id)
            }

            fn pack_value(&self, packer: &mut Packer) -> PackResult<()> {
                packer.push(self.to_le_bytes());
                Ok(())
            }

            fn unpack_value(unpacker: &mut Unpacker<'_>) -> PackResult<Self> {
                const NUM_BYTES: usize = std::mem::size_of::<$num_type>();
                let bytes = unpacker.consume_array::<NUM_BYTES>()?;
                Ok(<$num_type>::from_le_bytes(bytes))
            }
        }
    };
}

pack_numeric_primitive! {u8 => UInt8}
pack_numeric_primitive! {u16 => UInt16}
pack_numeric_primitive! {u32 => UInt32}
pack_numeric_primitive! {u64 => UInt64}

pack_numeric_primitive! {i8 => Int8}
pack_numeric_primitive! {i16 => Int16}
pack_numeric_primitive! {i32 => Int32}
pack_numeric_primitive! {i64 => Int64}

pack_numeric_primitive! {f32 => Float}
pack_numeric_primitive! {f64 => Double}

impl PackType for bool {
    fn type_info() -> TypeInfo {
        TypeInfo::leaf(TypeId::Bool)
    }

    fn pack_value(&self, packer: &mut Packer) -> PackResult<()> {
        packer.push([*self as u8]);
        Ok(())
    }

    // any non-zero byte reads as true
    fn unpack_value(unpacker: &mut Unpacker<'_>) -> PackResult<Self> {
        Ok(unpacker.consume_byte()? != 0)
    }
}

impl PackType for Unit {
    fn type_info() -> TypeInfo {
        TypeInfo::leaf(TypeId::Unit)
    }

    fn pack_value(&self, _: &mut Packer) -> PackResult<()> {
        Ok(())
    }

    fn unpack_value(_: &mut Unpacker<'_>) -> PackResult<Self> {
        Ok(Unit)
    }
}

impl PackType for () {
    fn type_info() -> TypeInfo {
        Unit::type_info()
    }

    fn pack_value(&self, _: &mut Packer) -> PackResult<()> {
        Ok(())
    }

    fn unpack_value(_: &mut Unpacker<'_>) -> PackResult<Self> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rand::Rng;

    use super::*;
    use crate::err::Error;

    /// Performs a raw and a tagged pack-unpack loop
    pub(crate) fn pack_loop<T: PackType + std::fmt::Debug + PartialEq>(input: T) {
        let mut p = Packer::new();
        p.pack_value(&input).unwrap();
        let raw = p.into_pack();

        println!("raw: {} - {}", raw.len(), raw.hex());
        let out: T = Unpacker::new(&raw).unpack_value().unwrap();
        assert_eq!(out, input);

        let mut p = Packer::new();
        p.pack(&input).unwrap();
        let tagged = p.into_pack();

        println!("tagged: {} - {}", tagged.len(), tagged.hex());
        let mut up = Unpacker::new(&tagged);
        let out: T = up.unpack().unwrap();
        assert_eq!(out, input);
        assert!(up.is_empty());

        // every strict prefix must fail as a truncation, never yield a value
        for cut in 0..tagged.len() {
            let res = Unpacker::new(&tagged[..cut]).unpack::<T>();
            assert!(
                matches!(res, Err(Error::NotEnoughData { .. })),
                "prefix of {} byte(s) gave {:?}",
                cut,
                res
            );
        }
    }

    #[test]
    fn test_leaf_type_infos() {
        let cases = [
            (u8::type_info(), 0x10_u8),
            (u16::type_info(), 0x11),
            (u32::type_info(), 0x12),
            (u64::type_info(), 0x13),
            (i8::type_info(), 0x18),
            (i16::type_info(), 0x19),
            (i32::type_info(), 0x1a),
            (i64::type_info(), 0x1b),
            (f32::type_info(), 0x20),
            (f64::type_info(), 0x21),
            (bool::type_info(), 0x30),
            (Unit::type_info(), 0x02),
            (<()>::type_info(), 0x02),
        ];

        for (info, tag) in cases {
            assert_eq!(info.as_slice(), &[tag]);
        }
    }

    #[test]
    fn test_uint32_scenario() {
        let mut p = Packer::new();
        p.pack_value(&5_u32).unwrap();
        assert_eq!(p.finish(), vec![5, 0, 0, 0]);

        let raw = p.into_pack();
        assert_eq!(Unpacker::new(&raw).unpack_value::<u32>().unwrap(), 5);
    }

    #[test]
    fn test_pack_numerics() {
        pack_loop(u8::MAX);
        pack_loop(u16::MAX - 1);
        pack_loop(0xdead_beef_u32);
        pack_loop(u64::MAX);
        pack_loop(i8::MIN);
        pack_loop(-300_i16);
        pack_loop(i32::MIN + 1);
        pack_loop(i64::MAX);
        pack_loop(1.5_f32);
        pack_loop(-0.1_f64);
    }

    #[test]
    fn test_pack_numerics_random() {
        let mut rng = rand::thread_rng();
        for _ in 0..100 {
            pack_loop(rng.gen::<u64>());
            pack_loop(rng.gen::<i32>());
            pack_loop(rng.gen::<i16>());
            pack_loop(rng.gen::<f64>());
        }
    }

    #[test]
    fn test_pack_bool() {
        pack_loop(true);
        pack_loop(false);

        let bytes = [0x02];
        assert!(Unpacker::new(&bytes).unpack_value::<bool>().unwrap());
    }

    #[test]
    fn test_pack_unit() {
        let mut p = Packer::new();
        p.pack_value(&Unit).unwrap();
        assert!(p.is_empty());

        p.pack(&()).unwrap();
        assert_eq!(p.finish(), vec![0x02]);

        // unit and () are interchangeable
        let bytes = p.into_pack();
        assert_eq!(Unpacker::new(&bytes).unpack::<Unit>().unwrap(), Unit);

        // unpacking a unit consumes nothing, even from an empty buffer
        let mut up = Unpacker::new(&[]);
        assert_eq!(up.unpack_value::<Unit>().unwrap(), Unit);
        assert_eq!(up.position(), 0);
    }
}
