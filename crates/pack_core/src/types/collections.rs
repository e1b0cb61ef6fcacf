//! Bindings for variable-length and optional values, and for type
//! descriptors packed as values.

use super::PackType;
use crate::{
    err::{Error, PackResult},
    packer::Packer,
    type_info::{TypeId, TypeInfo},
    unpacker::Unpacker,
};

/// Read the 4-byte count in front of a list or string.
fn unpack_count(unpacker: &mut Unpacker<'_>) -> PackResult<usize> {
    Ok(u32::unpack_value(unpacker)? as usize)
}

/// `count (u32) ++ elements`
impl<T: PackType> PackType for Vec<T> {
    fn type_info() -> TypeInfo {
        TypeInfo::wrap(TypeId::List, &T::type_info())
    }

    fn pack_value(&self, packer: &mut Packer) -> PackResult<()> {
        packer.push_count(self.len())?;
        for elem in self {
            elem.pack_value(packer)?;
        }
        Ok(())
    }

    fn unpack_value(unpacker: &mut Unpacker<'_>) -> PackResult<Self> {
        let count = unpack_count(unpacker)?;

        // the count is untrusted, do not reserve more than the buffer could hold
        let mut value = Vec::with_capacity(count.min(unpacker.bytes_left()));
        for _ in 0..count {
            value.push(T::unpack_value(unpacker)?);
        }

        Ok(value)
    }
}

/// `length in bytes (u32) ++ utf-8 bytes`
impl PackType for String {
    fn type_info() -> TypeInfo {
        TypeInfo::leaf(TypeId::String)
    }

    fn pack_value(&self, packer: &mut Packer) -> PackResult<()> {
        packer.push_count(self.len())?;
        packer.push(self.as_bytes());
        Ok(())
    }

    fn unpack_value(unpacker: &mut Unpacker<'_>) -> PackResult<Self> {
        let len = unpack_count(unpacker)?;
        let bytes = unpacker.consume(len)?;

        std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|_| Error::InvalidUtf8)
    }
}

/// `present (bool) [++ value]`
impl<T: PackType> PackType for Option<T> {
    fn type_info() -> TypeInfo {
        TypeInfo::wrap(TypeId::Optional, &T::type_info())
    }

    fn pack_value(&self, packer: &mut Packer) -> PackResult<()> {
        self.is_some().pack_value(packer)?;
        match self {
            Some(value) => value.pack_value(packer),
            None => Ok(()),
        }
    }

    fn unpack_value(unpacker: &mut Unpacker<'_>) -> PackResult<Self> {
        match bool::unpack_value(unpacker)? {
            true => Ok(Some(T::unpack_value(unpacker)?)),
            false => Ok(None),
        }
    }
}

/// `length (u8) ++ descriptor bytes`
impl PackType for TypeInfo {
    fn type_info() -> TypeInfo {
        TypeInfo::leaf(TypeId::TypeInfo)
    }

    // rejects what unpack_value would, so a packed descriptor always reads back
    fn pack_value(&self, packer: &mut Packer) -> PackResult<()> {
        let len = self.value_len()?;

        packer.push([len]);
        packer.push(self);
        Ok(())
    }

    fn unpack_value(unpacker: &mut Unpacker<'_>) -> PackResult<Self> {
        let len = u8::unpack_value(unpacker)?;
        let bytes = unpacker.consume(len as usize)?;
        TypeInfo::from_bytes(bytes)
    }
}

#[cfg(test)]
mod tests {
    use rand::Rng;

    use super::*;
    use crate::{type_info::MAX_NESTING, types::tests::pack_loop};

    fn pack_raw<T: PackType>(value: &T) -> Vec<u8> {
        let mut p = Packer::new();
        p.pack_value(value).unwrap();
        p.into_pack().into_vec()
    }

    #[test]
    fn test_list_scenario() {
        let list: Vec<i8> = vec![-1, 1, -2, 2];
        let raw = pack_raw(&list);

        assert_eq!(raw, vec![0x04, 0x00, 0x00, 0x00, 0xff, 0x01, 0xfe, 0x02]);
        assert_eq!(Unpacker::new(&raw).unpack_value::<Vec<i8>>().unwrap(), list);
    }

    #[test]
    fn test_list_type_info() {
        assert_eq!(Vec::<u64>::type_info().as_slice(), &[0x40, 0x13]);
        assert_eq!(
            Vec::<Vec<bool>>::type_info().as_slice(),
            &[0x40, 0x40, 0x30]
        );

        // list descriptors are the list tag followed by the element descriptor
        let elem = Option::<String>::type_info();
        let mut expected = vec![TypeId::List as u8];
        expected.extend_from_slice(&elem);
        assert_eq!(Vec::<Option<String>>::type_info(), TypeInfo::from_bytes(&expected).unwrap());
    }

    #[test]
    fn test_empty_list() {
        let raw = pack_raw(&Vec::<u32>::new());
        assert_eq!(raw, vec![0, 0, 0, 0]);

        let out = Unpacker::new(&raw).unpack_value::<Vec<u32>>().unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_pack_lists() {
        pack_loop(vec![100_u16, 200, 300, 400]);
        pack_loop(vec![vec![1_i64], vec![], vec![-2, 3]]);
        pack_loop(vec![String::from("a"), String::new()]);
        pack_loop(Vec::<bool>::new());

        let mut rng = rand::thread_rng();
        let random = (0..rng.gen_range(0..64))
            .map(|_| rng.gen::<i32>())
            .collect::<Vec<_>>();
        pack_loop(random);
    }

    #[test]
    fn test_list_huge_count_does_not_allocate() {
        // claims u32::MAX elements, holds one
        let bytes = [0xff, 0xff, 0xff, 0xff, 0x01];
        let res = Unpacker::new(&bytes).unpack_value::<Vec<u8>>();
        assert!(matches!(res, Err(Error::NotEnoughData { .. })));
    }

    #[test]
    fn test_pack_strings() {
        assert_eq!(pack_raw(&String::from("hi")), vec![2, 0, 0, 0, b'h', b'i']);

        pack_loop(String::from("hello world"));
        pack_loop(String::new());
        pack_loop(String::from("how about that 👏👏👏"));
    }

    #[test]
    fn test_string_invalid_utf8() {
        let bytes = [2, 0, 0, 0, 0xc3, 0x28];
        assert_eq!(
            Unpacker::new(&bytes).unpack_value::<String>(),
            Err(Error::InvalidUtf8)
        );
    }

    #[test]
    fn test_optional_scenario() {
        let raw = pack_raw(&None::<u32>);
        assert_eq!(raw, vec![0x00]);

        let mut up = Unpacker::new(&raw);
        assert_eq!(up.unpack_value::<Option<u32>>().unwrap(), None);
        assert!(up.is_empty());

        assert_eq!(pack_raw(&Some(7_u8)), vec![0x01, 0x07]);
        assert_eq!(Option::<u8>::type_info().as_slice(), &[0x42, 0x10]);
    }

    #[test]
    fn test_pack_optionals() {
        pack_loop(Some(12_u32));
        pack_loop(None::<String>);
        pack_loop(Some(Some(false)));
        pack_loop(Some(None::<i8>));
        pack_loop(vec![Some(1_u8), None, Some(3)]);
    }

    #[test]
    fn test_pack_type_info_value() {
        let info = Vec::<Option<u16>>::type_info();
        assert_eq!(pack_raw(&info), vec![3, 0x40, 0x42, 0x11]);

        pack_loop(info);
        pack_loop(String::type_info());
    }

    #[test]
    fn test_type_info_value_must_be_valid() {
        let bytes = [2, 0x40, 0x7f];
        assert_eq!(
            Unpacker::new(&bytes).unpack_value::<TypeInfo>(),
            Err(Error::UnknownTypeId(0x7f))
        );
    }

    #[test]
    fn test_type_info_value_too_long() {
        let info = TypeInfo::group(
            TypeId::Tuple,
            &(0..255)
                .map(|_| TypeInfo::leaf(TypeId::Bool))
                .collect::<Vec<_>>(),
        );
        assert_eq!(info.len(), 257);

        let mut p = Packer::new();
        assert_eq!(
            p.pack_value(&info).map(|_| ()),
            Err(Error::LengthOverflow {
                limit: 255,
                actual: 257
            })
        );
    }

    #[test]
    fn test_type_info_value_too_deep() {
        // a valid descriptor, but nested past what the parser accepts
        let mut info = u8::type_info();
        for _ in 0..MAX_NESTING + 1 {
            info = TypeInfo::wrap(TypeId::List, &info);
        }
        assert_eq!(info.len(), MAX_NESTING + 2);

        let mut p = Packer::new();
        assert_eq!(
            p.pack_value(&info).map(|_| ()),
            Err(Error::NestingTooDeep(MAX_NESTING))
        );
        assert!(p.is_empty());

        // one level less packs and reads back
        let mut info = u8::type_info();
        for _ in 0..MAX_NESTING {
            info = TypeInfo::wrap(TypeId::List, &info);
        }
        pack_loop(info);
    }
}
