//! Tagged unions: a value that is exactly one of a fixed set of types.
//!
//! The payload starts with the 1-byte index of the selected arm, then the
//! arm's [TypeInfo] packed as a value, then the arm's own payload. The index
//! keeps arms of the same type apart; the descriptor is checked against the
//! arm the index names.

use super::PackType;
use crate::{
    err::{Error, PackResult},
    packer::Packer,
    type_info::{TypeId, TypeInfo},
    unpacker::Unpacker,
};

/// Declare a union enum and impl [PackType] for it
macro_rules! pack_union {
    ($(#[$meta: meta])* $union: ident { $($idx: literal => $variant: ident ($name: ident)),+ }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub enum $union<$($name),+> {
            $($variant($name)),+
        }

        impl<$($name: PackType),+> PackType for $union<$($name),+> {
            fn type_info() -> TypeInfo {
                TypeInfo::group(TypeId::Union, &[$($name::type_info()),+])
            }

            fn pack_value(&self, packer: &mut Packer) -> PackResult<()> {
                match self {
                    $(
                        Self::$variant(value) => {
                            packer.push([$idx as u8]);
                            $name::type_info().pack_value(packer)?;
                            value.pack_value(packer)
                        }
                    )+
                }
            }

            fn unpack_value(unpacker: &mut Unpacker<'_>) -> PackResult<Self> {
                let index = u8::unpack_value(unpacker)?;
                let arm = TypeInfo::unpack_value(unpacker)?;

                match index {
                    $(
                        $idx => {
                            check_arm(&$name::type_info(), arm)?;
                            Ok(Self::$variant($name::unpack_value(unpacker)?))
                        }
                    )+
                    _ => {
                        log::debug!("{} has no arm {} ({})", Self::type_info(), index, arm);
                        Err(Error::UnknownUnionArm(arm))
                    }
                }
            }
        }
    };
}

/// The descriptor in the payload must be the one of the arm its index names.
pub(crate) fn check_arm(expected: &TypeInfo, found: TypeInfo) -> PackResult<()> {
    match *expected == found {
        true => Ok(()),
        false => {
            log::debug!("union arm mismatch: expected {}, found {}", expected, found);
            Err(Error::TypeMismatch {
                expected: expected.clone(),
                found: found.into(),
            })
        }
    }
}

pack_union! {
    /// One of two types
    Union2 { 0 => First(A), 1 => Second(B) }
}

pack_union! {
    /// One of three types
    Union3 { 0 => First(A), 1 => Second(B), 2 => Third(C) }
}

pack_union! {
    /// One of four types
    Union4 { 0 => First(A), 1 => Second(B), 2 => Third(C), 3 => Fourth(D) }
}
