//! Implementation of [Packer], the writing half of the format.

use crate::{
    err::{Error, PackResult},
    pack::Pack,
    types::PackType,
};

/// This data structure accumulates the packed bytes of any number of values,
/// in the order they were packed.
#[derive(Debug, Default, Clone)]
pub struct Packer {
    pub(crate) output: Pack,
}

impl Packer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the payload of a value, without its type descriptor.
    ///
    /// If the value cannot be packed, nothing is appended.
    pub fn pack_value<T: PackType>(&mut self, value: &T) -> PackResult<&mut Self> {
        self.atomically(|packer| value.pack_value(packer))
    }

    /// Append the type descriptor of `T` followed by the payload of the value.
    ///
    /// If the value cannot be packed, nothing is appended.
    pub fn pack<T: PackType>(&mut self, value: &T) -> PackResult<&mut Self> {
        let info = T::type_info();
        log::trace!("packing tagged value, type info {}", info.hex());

        self.atomically(|packer| {
            packer.push(&info);
            value.pack_value(packer)
        })
    }

    /// Run a write step, dropping whatever it appended if it fails.
    pub(crate) fn atomically<F>(&mut self, f: F) -> PackResult<&mut Self>
    where
        F: FnOnce(&mut Self) -> PackResult<()>,
    {
        let start = self.output.len();
        match f(self) {
            Ok(()) => Ok(self),
            Err(e) => {
                log::debug!("pack failed, dropping {} byte(s)", self.output.len() - start);
                self.output.truncate(start);
                Err(e)
            }
        }
    }

    /// Append raw bytes.
    pub fn push(&mut self, data: impl AsRef<[u8]>) {
        self.output.append(data)
    }

    /// Write a collection length as the 4-byte count.
    pub(crate) fn push_count(&mut self, len: usize) -> PackResult<()> {
        let count = u32::try_from(len).map_err(|_| Error::LengthOverflow {
            limit: u32::MAX as usize,
            actual: len,
        })?;

        self.push(count.to_le_bytes());
        Ok(())
    }

    /// Number of bytes written so far
    pub fn len(&self) -> usize {
        self.output.len()
    }

    pub fn is_empty(&self) -> bool {
        self.output.is_empty()
    }

    /// A copy of everything packed so far.
    ///
    /// The packer stays usable and keeps accumulating afterwards.
    pub fn finish(&self) -> Pack {
        self.output.clone()
    }

    /// Consume the packer and return its bytes.
    pub fn into_pack(self) -> Pack {
        self.output
    }
}
