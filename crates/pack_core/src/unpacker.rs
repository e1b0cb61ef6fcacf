//! Implementation of [Unpacker], the reading half of the format.

use crate::{
    err::{Error, PackResult},
    pack::Pack,
    type_info::{TypeInfo, TypeShape},
    types::PackType,
    value::Value,
};

/// A cursor over a slice of packed bytes.
///
/// The cursor starts at `0`, only moves forward on success and never passes
/// the end of the slice. Every `unpack*` call is all-or-nothing: if decoding
/// fails anywhere inside the value, the cursor is put back where the call
/// started.
#[derive(Debug, Clone)]
pub struct Unpacker<'arr> {
    slice: &'arr [u8],
    offset: usize,
}

impl<'arr> Unpacker<'arr> {
    /// Create a new unpacker on a byte slice
    pub fn new(s: &'arr [u8]) -> Self {
        Self {
            slice: s,
            offset: 0,
        }
    }

    /// Current cursor position
    pub fn position(&self) -> usize {
        self.offset
    }

    /// Number of bytes between the cursor and the end
    pub fn bytes_left(&self) -> usize {
        self.slice.len() - self.offset
    }

    pub fn is_empty(&self) -> bool {
        self.bytes_left() == 0
    }

    /// Move the cursor back to an earlier position.
    pub(crate) fn rewind(&mut self, pos: usize) {
        debug_assert!(pos <= self.offset);
        self.offset = pos;
    }

    /// Returns the next `n` bytes and advances the cursor.
    ///
    /// Fails without moving the cursor if fewer than `n` bytes are left.
    pub fn consume(&mut self, n: usize) -> PackResult<&'arr [u8]> {
        let available = self.bytes_left();
        if n > available {
            return Err(Error::NotEnoughData {
                requested: n,
                available,
            });
        }

        let view = &self.slice[self.offset..self.offset + n];
        self.offset += n;

        log::trace!("consumed {} byte(s), {} left", n, self.bytes_left());
        Ok(view)
    }

    /// Return the next byte and advance the cursor
    pub fn consume_byte(&mut self) -> PackResult<u8> {
        Ok(self.consume(1)?[0])
    }

    /// Returns a copy of the next bytes as a fixed-size array.
    pub fn consume_array<const ARR_SIZE: usize>(&mut self) -> PackResult<[u8; ARR_SIZE]> {
        let mut arr = [0_u8; ARR_SIZE];
        arr.copy_from_slice(self.consume(ARR_SIZE)?);
        Ok(arr)
    }

    /// Consume everything from the cursor to the end.
    pub fn remaining(&mut self) -> &'arr [u8] {
        let rest = &self.slice[self.offset..];
        self.offset = self.slice.len();
        rest
    }

    /// Decode a payload without a type descriptor.
    ///
    /// The caller is trusted to know that a `T` is next.
    pub fn unpack_value<T: PackType>(&mut self) -> PackResult<T> {
        self.atomically(|up| T::unpack_value(up))
    }

    /// Check the type descriptor of `T` at the cursor, then decode the payload.
    pub fn unpack<T: PackType>(&mut self) -> PackResult<T> {
        self.atomically(|up| {
            up.expect(&T::type_info())?;
            T::unpack_value(up)
        })
    }

    /// Read whatever tagged value is next, without knowing its type up front.
    ///
    /// The descriptor is parsed first and then drives the payload decode.
    pub fn unpack_dynamic(&mut self) -> PackResult<(TypeShape, Value)> {
        self.atomically(|up| {
            let shape = TypeShape::parse(up)?;
            let value = Value::unpack_shaped(&shape, up)?;
            Ok((shape, value))
        })
    }

    /// Consume as many bytes as `expected` has and compare.
    pub(crate) fn expect(&mut self, expected: &TypeInfo) -> PackResult<()> {
        let found = self.consume(expected.len())?;

        match found == expected.as_slice() {
            true => Ok(()),
            false => {
                log::debug!(
                    "type info mismatch: expected {}, found {}",
                    expected.hex(),
                    Pack::from(found).hex()
                );
                Err(Error::TypeMismatch {
                    expected: expected.clone(),
                    found: Pack::from(found),
                })
            }
        }
    }

    /// Run a decode step, restoring the cursor if it fails.
    fn atomically<T, F>(&mut self, f: F) -> PackResult<T>
    where
        F: FnOnce(&mut Self) -> PackResult<T>,
    {
        let start = self.offset;
        let res = f(self);
        if res.is_err() {
            self.rewind(start);
        }
        res
    }
}
