//! The owned byte buffer that packed data and type descriptors live in.

use std::ops::Deref;

use serde::{Deserialize, Serialize};

use crate::type_info::TypeId;

/// Number of bytes shown per line by [Pack::hex_dump].
const DUMP_LINE_WIDTH: usize = 8;

/// A growable, owned sequence of bytes.
///
/// Packed payloads are built up in a [Pack], and every [crate::TypeInfo] is a
/// [Pack] with a reserved interpretation. Equality is element-wise.
#[derive(Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pack(#[serde(with = "serde_bytes")] Vec<u8>);

impl Pack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Concatenate byte sequences, raw bytes or type tags into one pack.
    ///
    /// ```
    /// use pack_core::{Pack, TypeId};
    ///
    /// let p = Pack::from_parts([Pack::from(TypeId::List), Pack::from(vec![0x18])]);
    /// assert_eq!(p.as_slice(), &[0x40, 0x18]);
    /// ```
    pub fn from_parts<I, P>(parts: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Pack>,
    {
        let mut pack = Self::new();
        for part in parts {
            pack.append(part.into());
        }
        pack
    }

    /// Append another byte sequence to the end of this one.
    pub fn append(&mut self, other: impl AsRef<[u8]>) {
        self.0.extend_from_slice(other.as_ref());
    }

    /// Append a single byte
    pub fn push(&mut self, byte: u8) {
        self.0.push(byte);
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }

    /// Overwrite bytes starting at `offset`. Used to patch counters that
    /// are only known after their elements were written.
    pub(crate) fn overwrite(&mut self, offset: usize, bytes: &[u8]) {
        self.0[offset..offset + bytes.len()].copy_from_slice(bytes);
    }

    /// Drop everything after the first `len` bytes.
    pub(crate) fn truncate(&mut self, len: usize) {
        self.0.truncate(len);
    }

    /// Single-line hex rendering, bytes separated by spaces.
    pub fn hex(&self) -> String {
        self.0
            .iter()
            .map(|byte| format!("{:02x}", byte))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Multi-line hex rendering with 8 bytes per line.
    ///
    /// ```
    /// use pack_core::Pack;
    ///
    /// let p = Pack::from((0_u8..10).collect::<Vec<_>>());
    /// assert_eq!(p.hex_dump(), "00 01 02 03 04 05 06 07\n08 09");
    /// ```
    pub fn hex_dump(&self) -> String {
        self.0
            .chunks(DUMP_LINE_WIDTH)
            .map(|line| Pack::from(line).hex())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Deref for Pack {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<[u8]> for Pack {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Debug for Pack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Pack[{}]", self.hex())
    }
}

impl From<Vec<u8>> for Pack {
    fn from(value: Vec<u8>) -> Self {
        Self(value)
    }
}

impl From<&[u8]> for Pack {
    fn from(value: &[u8]) -> Self {
        Self(value.to_vec())
    }
}

impl<const N: usize> From<[u8; N]> for Pack {
    fn from(value: [u8; N]) -> Self {
        Self(value.to_vec())
    }
}

impl From<u8> for Pack {
    fn from(value: u8) -> Self {
        Self(vec![value])
    }
}

// type tags coerce to their single byte
impl From<TypeId> for Pack {
    fn from(value: TypeId) -> Self {
        Self(vec![value as u8])
    }
}

impl From<Pack> for Vec<u8> {
    fn from(value: Pack) -> Self {
        value.0
    }
}

impl Extend<u8> for Pack {
    fn extend<T: IntoIterator<Item = u8>>(&mut self, iter: T) {
        self.0.extend(iter)
    }
}

impl PartialEq<[u8]> for Pack {
    fn eq(&self, other: &[u8]) -> bool {
        self.0 == other
    }
}

impl PartialEq<Vec<u8>> for Pack {
    fn eq(&self, other: &Vec<u8>) -> bool {
        &self.0 == other
    }
}
