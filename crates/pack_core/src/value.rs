//! Dynamically typed values, for decoding tagged data whose type is not
//! known at compile time.

use crate::{
    err::{Error, PackResult},
    type_info::{TypeInfo, TypeShape},
    types::{check_arm, PackType, Unit},
    unpacker::Unpacker,
};

/// A decoded value of any packable shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    TypeInfo(TypeInfo),
    Unit,
    UInt8(u8),
    UInt16(u16),
    UInt32(u32),
    UInt64(u64),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Float(f32),
    Double(f64),
    Bool(bool),
    List(Vec<Value>),
    String(String),
    Optional(Option<Box<Value>>),
    Tuple(Vec<Value>),
    /// The index of the selected arm, and its value
    Union(usize, Box<Value>),
}

impl Value {
    /// Decode a payload laid out according to `shape`.
    pub fn unpack_shaped(shape: &TypeShape, up: &mut Unpacker<'_>) -> PackResult<Self> {
        let value = match shape {
            TypeShape::TypeInfo => Self::TypeInfo(TypeInfo::unpack_value(up)?),
            TypeShape::Unit => {
                Unit::unpack_value(up)?;
                Self::Unit
            }
            TypeShape::UInt8 => Self::UInt8(u8::unpack_value(up)?),
            TypeShape::UInt16 => Self::UInt16(u16::unpack_value(up)?),
            TypeShape::UInt32 => Self::UInt32(u32::unpack_value(up)?),
            TypeShape::UInt64 => Self::UInt64(u64::unpack_value(up)?),
            TypeShape::Int8 => Self::Int8(i8::unpack_value(up)?),
            TypeShape::Int16 => Self::Int16(i16::unpack_value(up)?),
            TypeShape::Int32 => Self::Int32(i32::unpack_value(up)?),
            TypeShape::Int64 => Self::Int64(i64::unpack_value(up)?),
            TypeShape::Float => Self::Float(f32::unpack_value(up)?),
            TypeShape::Double => Self::Double(f64::unpack_value(up)?),
            TypeShape::Bool => Self::Bool(bool::unpack_value(up)?),
            TypeShape::String => Self::String(String::unpack_value(up)?),
            TypeShape::List(elem) => {
                let count = u32::unpack_value(up)? as usize;
                let mut list = Vec::with_capacity(count.min(up.bytes_left()));
                for _ in 0..count {
                    list.push(Self::unpack_shaped(elem, up)?);
                }
                Self::List(list)
            }
            TypeShape::Optional(inner) => match bool::unpack_value(up)? {
                true => Self::Optional(Some(Box::new(Self::unpack_shaped(inner, up)?))),
                false => Self::Optional(None),
            },
            TypeShape::Tuple(comps) => Self::Tuple(
                comps
                    .iter()
                    .map(|comp| Self::unpack_shaped(comp, up))
                    .collect::<PackResult<_>>()?,
            ),
            TypeShape::Union(arms) => {
                let index = u8::unpack_value(up)? as usize;
                let arm = TypeInfo::unpack_value(up)?;

                let shape = match arms.get(index) {
                    Some(shape) => shape,
                    None => return Err(Error::UnknownUnionArm(arm)),
                };
                check_arm(&shape.type_info(), arm)?;

                Self::Union(index, Box::new(Self::unpack_shaped(shape, up)?))
            }
        };

        Ok(value)
    }
}

/// Writes `open a, b close`
fn write_seq(
    f: &mut std::fmt::Formatter<'_>,
    open: &str,
    items: &[Value],
    close: &str,
) -> std::fmt::Result {
    let joined = items
        .iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    write!(f, "{}{}{}", open, joined, close)
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::TypeInfo(info) => write!(f, "type {}", info),
            Value::Unit => write!(f, "unit"),
            Value::UInt8(v) => write!(f, "{}", v),
            Value::UInt16(v) => write!(f, "{}", v),
            Value::UInt32(v) => write!(f, "{}", v),
            Value::UInt64(v) => write!(f, "{}", v),
            Value::Int8(v) => write!(f, "{}", v),
            Value::Int16(v) => write!(f, "{}", v),
            Value::Int32(v) => write!(f, "{}", v),
            Value::Int64(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Double(v) => write!(f, "{}", v),
            Value::Bool(v) => write!(f, "{}", v),
            Value::List(items) => write_seq(f, "[", items, "]"),
            Value::String(s) => write!(f, "{:?}", s),
            Value::Optional(None) => write!(f, "none"),
            Value::Optional(Some(inner)) => write!(f, "{}", inner),
            Value::Tuple(items) => write_seq(f, "(", items, ")"),
            Value::Union(_, inner) => write!(f, "{}", inner),
        }
    }
}
