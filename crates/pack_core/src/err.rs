//! Error implementations

use serde::{de, ser};

use crate::{pack::Pack, type_info::TypeInfo};

/// Result type returned by every fallible packing/unpacking operation.
pub type PackResult<T> = Result<T, Error>;

/// Custom error object for this library
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// The unpacker was asked for more bytes than are left in the buffer.
    NotEnoughData {
        /// Number of bytes requested
        requested: usize,
        /// Number of bytes left after the cursor
        available: usize,
    },

    /// A tagged unpack found a different type descriptor at the cursor.
    TypeMismatch {
        /// Descriptor of the type the caller asked for
        expected: TypeInfo,
        /// Bytes actually present where the descriptor should be
        found: Pack,
    },

    /// A length or count does not fit into its fixed-width counter.
    LengthOverflow { limit: usize, actual: usize },

    /// String payload is not valid UTF-8
    InvalidUtf8,

    /// A type descriptor starts with a tag that is not in the tag table
    UnknownTypeId(u8),

    /// A type descriptor nests composites deeper than the parser allows
    NestingTooDeep(usize),

    /// A union payload names an arm that is not part of the union
    UnknownUnionArm(TypeInfo),

    /// Bytes were left over after a complete value was decoded
    TrailingBytes(usize),

    /// Errors raised through the serde bridge
    Custom(String),
}

impl std::error::Error for Error {}

impl ser::Error for Error {
    fn custom<T>(msg: T) -> Self
    where
        T: std::fmt::Display,
    {
        Self::Custom(msg.to_string())
    }
}

impl de::Error for Error {
    fn custom<T>(msg: T) -> Self
    where
        T: std::fmt::Display,
    {
        Self::Custom(msg.to_string())
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::NotEnoughData {
                requested,
                available,
            } => write!(
                f,
                "expecting {} byte(s), only {} available",
                requested, available
            ),
            Error::TypeMismatch { expected, found } => write!(
                f,
                "expecting type info {}, got {}",
                expected.hex(),
                found.hex()
            ),
            Error::LengthOverflow { limit, actual } => {
                write!(f, "length {} exceeds counter limit {}", actual, limit)
            }
            Error::InvalidUtf8 => write!(f, "string payload is not valid utf-8"),
            Error::UnknownTypeId(id) => write!(f, "bad type id: {:#04x}", id),
            Error::NestingTooDeep(limit) => {
                write!(f, "type info nests deeper than {} levels", limit)
            }
            Error::UnknownUnionArm(arm) => {
                write!(f, "union has no arm with type info {}", arm.hex())
            }
            Error::TrailingBytes(n) => write!(f, "{} trailing byte(s) after value", n),
            Error::Custom(msg) => write!(f, "{}", msg),
        }
    }
}
