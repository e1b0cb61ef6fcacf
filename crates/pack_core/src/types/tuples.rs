//! Tuple bindings, arities 1 through 12.
//!
//! Components are packed back to back with no per-component descriptor.
//! The tuple's own descriptor carries all component descriptors, so a tagged
//! tuple is checked as a whole before any component is read.
//!
//! Tuples are also how several independently tagged values are read in one
//! go, see [TaggedSequence].

use super::{PackType, TaggedSequence};
use crate::{
    err::PackResult,
    packer::Packer,
    type_info::{TypeId, TypeInfo},
    unpacker::Unpacker,
};

/// Impl [PackType] for a tuple of the given arity
macro_rules! pack_tuple {
    ($($idx: tt : $name: ident),+) => {
        impl<$($name: PackType),+> PackType for ($($name,)+) {
            fn type_info() -> TypeInfo {
                TypeInfo::group(TypeId::Tuple, &[$($name::type_info()),+])
            }

            fn pack_value(&self, packer: &mut Packer) -> PackResult<()> {
                $(self.$idx.pack_value(packer)?;)+
                Ok(())
            }

            fn unpack_value(unpacker: &mut Unpacker<'_>) -> PackResult<Self> {
                Ok(($($name::unpack_value(unpacker)?,)+))
            }
        }

        impl<$($name: PackType),+> TaggedSequence for ($($name,)+) {
            fn pack_tagged(&self, packer: &mut Packer) -> PackResult<()> {
                packer.atomically(|packer| {
                    $(packer.pack(&self.$idx)?;)+
                    Ok(())
                })?;
                Ok(())
            }

            fn unpack_tagged(unpacker: &mut Unpacker<'_>) -> PackResult<Self> {
                Ok(($(unpacker.unpack::<$name>()?,)+))
            }
        }
    };
}

pack_tuple!(0: A);
pack_tuple!(0: A, 1: B);
pack_tuple!(0: A, 1: B, 2: C);
pack_tuple!(0: A, 1: B, 2: C, 3: D);
pack_tuple!(0: A, 1: B, 2: C, 3: D, 4: E);
pack_tuple!(0: A, 1: B, 2: C, 3: D, 4: E, 5: F);
pack_tuple!(0: A, 1: B, 2: C, 3: D, 4: E, 5: F, 6: G);
pack_tuple!(0: A, 1: B, 2: C, 3: D, 4: E, 5: F, 6: G, 7: H);
pack_tuple!(0: A, 1: B, 2: C, 3: D, 4: E, 5: F, 6: G, 7: H, 8: I);
pack_tuple!(0: A, 1: B, 2: C, 3: D, 4: E, 5: F, 6: G, 7: H, 8: I, 9: J);
pack_tuple!(0: A, 1: B, 2: C, 3: D, 4: E, 5: F, 6: G, 7: H, 8: I, 9: J, 10: K);
pack_tuple!(0: A, 1: B, 2: C, 3: D, 4: E, 5: F, 6: G, 7: H, 8: I, 9: J, 10: K, 11: L);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{err::Error, types::tests::pack_loop};

    type Mixed = (Vec<i8>, Option<bool>, String, u32);

    fn mixed() -> Mixed {
        (vec![-1, -2], None, String::from("hi"), 12)
    }

    #[test]
    fn test_tuple_scenario() {
        let mut p = Packer::new();
        p.pack_value(&mixed()).unwrap();
        let raw = p.into_pack();

        assert_eq!(
            raw,
            vec![
                2, 0, 0, 0, 0xff, 0xfe, // list
                0x00, // absent optional
                2, 0, 0, 0, b'h', b'i', // string
                12, 0, 0, 0, // u32
            ]
        );

        let out: Mixed = Unpacker::new(&raw).unpack_value().unwrap();
        assert_eq!(out, mixed());
    }

    #[test]
    fn test_tuple_type_info() {
        assert_eq!(
            Mixed::type_info().as_slice(),
            &[0x43, 4, 0x40, 0x18, 0x42, 0x30, 0x41, 0x12]
        );
        assert_eq!(<(u8,)>::type_info().as_slice(), &[0x43, 1, 0x10]);

        // computing it twice gives the same bytes
        assert_eq!(Mixed::type_info(), Mixed::type_info());
    }

    #[test]
    fn test_pack_tuples() {
        pack_loop(mixed());
        pack_loop((1_u8,));
        pack_loop(((1_u8, 2_u16), (String::from("nested"), vec![(true, 0.5_f32)])));
        pack_loop((1_u8, 2_u8, 3_u8, 4_u8, 5_u8, 6_u8, 7_u8, 8_u8, 9_u8, 10_u8, 11_u8, 12_u8));
    }

    #[test]
    fn test_tuple_component_mismatch() {
        let mut p = Packer::new();
        p.pack(&(1_u8, 2_u16)).unwrap();
        let tagged = p.into_pack();

        // same arity, different second component
        let err = Unpacker::new(&tagged).unpack::<(u8, u32)>().unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { .. }));
    }

    #[test]
    fn test_tagged_sequence() {
        let mut p = Packer::new();
        (5_u32, String::from("a"), true).pack_tagged(&mut p).unwrap();
        let tagged = p.into_pack();

        // each component carries its own descriptor
        assert_eq!(
            tagged,
            vec![0x12, 5, 0, 0, 0, 0x41, 1, 0, 0, 0, b'a', 0x30, 1]
        );

        let mut up = Unpacker::new(&tagged);
        let out = <(u32, String, bool)>::unpack_tagged(&mut up).unwrap();
        assert_eq!(out, (5, String::from("a"), true));
        assert!(up.is_empty());
    }

    #[test]
    fn test_tagged_sequence_failure_appends_nothing() {
        let too_long = TypeInfo::group(TypeId::Tuple, &vec![bool::type_info(); 255]);

        // the first component packs fine, the second does not
        let mut p = Packer::new();
        let res = (7_u8, too_long).pack_tagged(&mut p);

        assert!(matches!(res, Err(Error::LengthOverflow { .. })));
        assert!(p.is_empty());
    }
}
