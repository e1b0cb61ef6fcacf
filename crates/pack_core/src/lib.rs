//! Self-describing binary packing of typed values.
//!
//! Every packable type has a [TypeInfo], a short byte string naming its
//! shape. Values are packed either raw (payload only) or tagged (descriptor
//! followed by payload). Tagged values can be checked against an expected
//! type before they are decoded, or decoded with no static type at all
//! through [Unpacker::unpack_dynamic].
//!
//! ```ignore
//! use pack_core::{pack_one, unpack_one};
//!
//! let packed = pack_one(&(vec![-1_i8, 1], String::from("hi")))?;
//! let (list, s): (Vec<i8>, String) = unpack_one(&packed)?;
//! ```

// lets `#[derive(PackType)]` refer to `::pack_core` from inside this crate
extern crate self as pack_core;

mod err;
mod pack;
mod packer;
mod type_info;
mod types;
mod unpacker;
mod value;

pub mod ser_de;

pub use err::{Error, PackResult};
pub use pack::Pack;
pub use packer::Packer;
pub use type_info::{TypeId, TypeInfo, TypeShape, MAX_NESTING};
pub use types::{PackType, TaggedSequence, Union2, Union3, Union4, Unit};
pub use unpacker::Unpacker;
pub use value::Value;

pub use ser_de::{from_pack, to_pack};

/// Derive [PackType] for a struct, packing it as the tuple of its fields.
pub use pack_macros::PackType;

/// Pack a single value, tagged with its type descriptor.
pub fn pack_one<T: PackType>(value: &T) -> PackResult<Pack> {
    let mut packer = Packer::new();
    packer.pack(value)?;
    Ok(packer.into_pack())
}

/// Unpack a single tagged value.
///
/// The descriptor must match `T` and the value must span the whole slice.
pub fn unpack_one<T: PackType>(bytes: &[u8]) -> PackResult<T> {
    let mut unpacker = Unpacker::new(bytes);
    let value = unpacker.unpack()?;
    ensure_consumed(&unpacker)?;
    Ok(value)
}

/// Unpack a sequence of tagged values into a tuple, in order.
///
/// Fails if any of the values is missing or of another type, or if bytes are
/// left over after the last one.
///
/// ```ignore
/// let bytes = pack_core::pack!(5_u32, String::from("a"))?;
/// let (n, s) = pack_core::unpack::<(u32, String)>(&bytes)?;
/// ```
pub fn unpack<T: TaggedSequence>(bytes: &[u8]) -> PackResult<T> {
    let mut unpacker = Unpacker::new(bytes);
    let values = T::unpack_tagged(&mut unpacker)?;
    ensure_consumed(&unpacker)?;
    Ok(values)
}

fn ensure_consumed(unpacker: &Unpacker<'_>) -> PackResult<()> {
    match unpacker.bytes_left() {
        0 => Ok(()),
        n => Err(Error::TrailingBytes(n)),
    }
}

/// Pack any number of values, each tagged with its type descriptor.
///
/// Evaluates to a `PackResult<Pack>`.
#[macro_export]
macro_rules! pack {
    ($($value: expr),* $(,)?) => {{
        #[allow(unused_mut)]
        let mut packer = $crate::Packer::new();
        let packed = (|| -> $crate::PackResult<()> {
            $(packer.pack(&$value)?;)*
            Ok(())
        })();
        packed.map(|_| packer.into_pack())
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init_logger() {
        let _ = pretty_env_logger::try_init();
    }

    #[test]
    fn test_tagged_uint32() {
        init_logger();

        let bytes = pack_one(&5_u32).unwrap();
        assert_eq!(bytes, vec![0x12, 5, 0, 0, 0]);
        assert_eq!(unpack_one::<u32>(&bytes).unwrap(), 5);
    }

    #[test]
    fn test_tagged_list() {
        let bytes = pack_one(&vec![-1_i8, 1, -2, 2]).unwrap();
        assert_eq!(bytes, vec![0x40, 0x18, 4, 0, 0, 0, 0xff, 0x01, 0xfe, 0x02]);
        assert_eq!(unpack_one::<Vec<i8>>(&bytes).unwrap(), vec![-1, 1, -2, 2]);
    }

    #[test]
    fn test_tagged_string() {
        let bytes = pack_one(&String::from("hello world")).unwrap();
        assert_eq!(&bytes[..5], &[0x41, 11, 0, 0, 0]);
        assert_eq!(&bytes[5..], b"hello world");
        assert_eq!(unpack_one::<String>(&bytes).unwrap(), "hello world");
    }

    #[test]
    fn test_tagged_type_mismatch() {
        init_logger();

        let bytes = pack_one(&String::from("hello world")).unwrap();
        let mut up = Unpacker::new(&bytes);

        assert_eq!(
            up.unpack::<u32>(),
            Err(Error::TypeMismatch {
                expected: u32::type_info(),
                found: Pack::from(vec![0x41]),
            })
        );

        // the cursor did not move, a second attempt with the right type works
        assert_eq!(up.position(), 0);
        assert_eq!(up.unpack::<String>().unwrap(), "hello world");
    }

    #[test]
    fn test_unpack_one_trailing() {
        let mut bytes = pack_one(&true).unwrap();
        bytes.push(0);
        assert_eq!(unpack_one::<bool>(&bytes), Err(Error::TrailingBytes(1)));
    }

    #[test]
    fn test_pack_macro() {
        let bytes = pack!(5_u32, String::from("a"), vec![1_u8]).unwrap();

        let mut p = Packer::new();
        p.pack(&5_u32).unwrap();
        p.pack(&String::from("a")).unwrap();
        p.pack(&vec![1_u8]).unwrap();
        assert_eq!(bytes, p.into_pack());

        let (n, s, v) = unpack::<(u32, String, Vec<u8>)>(&bytes).unwrap();
        assert_eq!((n, s.as_str(), v), (5, "a", vec![1]));

        assert_eq!(pack!().unwrap(), Pack::new());
    }

    #[test]
    fn test_unpack_sequence_failures() {
        let bytes = pack!(5_u32, true).unwrap();

        // second value has another type
        assert!(matches!(
            unpack::<(u32, u8)>(&bytes),
            Err(Error::TypeMismatch { .. })
        ));

        // third value is missing
        assert!(matches!(
            unpack::<(u32, bool, bool)>(&bytes),
            Err(Error::NotEnoughData { .. })
        ));

        // one value too many
        assert_eq!(unpack::<(u32,)>(&bytes), Err(Error::TrailingBytes(2)));
    }

    #[test]
    fn test_sequence_of_mixed_values() {
        let mut p = Packer::new();
        p.pack(&1_u8)
            .unwrap()
            .pack(&Unit)
            .unwrap()
            .pack(&Some(String::from("x")))
            .unwrap()
            .pack(&None::<i64>)
            .unwrap();
        let bytes = p.into_pack();

        let mut up = Unpacker::new(&bytes);
        assert_eq!(up.unpack::<u8>().unwrap(), 1);
        assert_eq!(up.unpack::<()>().unwrap(), ());
        assert_eq!(up.unpack::<Option<String>>().unwrap(), Some(String::from("x")));
        assert_eq!(up.unpack::<Option<i64>>().unwrap(), None);
        assert!(up.is_empty());
        assert_eq!(up.unpack::<u8>(), Err(Error::NotEnoughData { requested: 1, available: 0 }));
    }

    #[derive(Debug, PartialEq, PackType)]
    struct Reading {
        sensor: String,
        samples: Vec<i16>,
        calibrated: Option<bool>,
    }

    #[derive(Debug, PartialEq, PackType)]
    struct Pair(u8, Reading);

    #[test]
    fn test_derive_named_struct() {
        assert_eq!(
            Reading::type_info(),
            <(String, Vec<i16>, Option<bool>)>::type_info()
        );

        let reading = Reading {
            sensor: String::from("t0"),
            samples: vec![-1, 300],
            calibrated: Some(true),
        };

        // same payload as the tuple of its fields
        let mut p = Packer::new();
        p.pack_value(&reading).unwrap();
        let mut q = Packer::new();
        q.pack_value(&(String::from("t0"), vec![-1_i16, 300], Some(true)))
            .unwrap();
        assert_eq!(p.finish(), q.finish());

        let bytes = pack_one(&reading).unwrap();
        assert_eq!(unpack_one::<Reading>(&bytes).unwrap(), reading);
    }

    #[test]
    fn test_derive_tuple_struct() {
        let pair = Pair(
            7,
            Reading {
                sensor: String::new(),
                samples: vec![],
                calibrated: None,
            },
        );

        assert_eq!(
            Pair::type_info().to_string(),
            "Tuple[UInt8, Tuple[String, List[Int16], Optional[Bool]]]"
        );

        let bytes = pack_one(&pair).unwrap();
        let (shape, value) = Unpacker::new(&bytes).unpack_dynamic().unwrap();
        assert_eq!(shape.type_info(), Pair::type_info());
        assert_eq!(value.to_string(), "(7, (\"\", [], none))");

        assert_eq!(unpack_one::<Pair>(&bytes).unwrap(), pair);
    }

    #[derive(Debug, PartialEq, PackType)]
    struct Tagged<T> {
        label: String,
        inner: T,
    }

    #[test]
    fn test_derive_generic_struct() {
        assert_eq!(
            <Tagged<u16>>::type_info(),
            <(String, u16)>::type_info()
        );
        assert_eq!(
            <Tagged<Vec<bool>>>::type_info().to_string(),
            "Tuple[String, List[Bool]]"
        );

        let value = Tagged {
            label: String::from("x"),
            inner: Some(Tagged {
                label: String::new(),
                inner: -5_i64,
            }),
        };

        let bytes = pack_one(&value).unwrap();
        assert_eq!(unpack_one::<Tagged<Option<Tagged<i64>>>>(&bytes).unwrap(), value);
    }
}
