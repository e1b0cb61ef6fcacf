//! Type descriptors.
//!
//! A [TypeInfo] names the shape of a packed value. Its first byte is a
//! [TypeId] tag; composite tags are followed by the descriptors of their
//! component types, embedded verbatim:
//!
//! - list, optional: `tag ++ type_info(T)`
//! - tuple, union: `tag ++ count (1 byte) ++ type_info(T1) ++ .. ++ type_info(Tn)`
//! - everything else: `tag`
//!
//! Descriptors are self-delimiting, so [TypeShape::parse] can recover the
//! whole tree from the front of a buffer.

use std::ops::Deref;

use serde::{
    de,
    ser::{self, SerializeTuple},
    Deserialize, Serialize,
};

use crate::{
    err::{Error, PackResult},
    pack::Pack,
    unpacker::Unpacker,
};

/// Composites nested deeper than this are rejected by the descriptor parser.
pub const MAX_NESTING: usize = 64;

/// One-byte type tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TypeId {
    TypeInfo = 0x01,
    Unit = 0x02,
    UInt8 = 0x10,
    UInt16 = 0x11,
    UInt32 = 0x12,
    UInt64 = 0x13,
    Int8 = 0x18,
    Int16 = 0x19,
    Int32 = 0x1a,
    Int64 = 0x1b,
    Float = 0x20,
    Double = 0x21,
    Bool = 0x30,
    List = 0x40,
    String = 0x41,
    Optional = 0x42,
    Tuple = 0x43,
    Union = 0x44,
}

impl TryFrom<u8> for TypeId {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        let id = match value {
            0x01 => Self::TypeInfo,
            0x02 => Self::Unit,
            0x10 => Self::UInt8,
            0x11 => Self::UInt16,
            0x12 => Self::UInt32,
            0x13 => Self::UInt64,
            0x18 => Self::Int8,
            0x19 => Self::Int16,
            0x1a => Self::Int32,
            0x1b => Self::Int64,
            0x20 => Self::Float,
            0x21 => Self::Double,
            0x30 => Self::Bool,
            0x40 => Self::List,
            0x41 => Self::String,
            0x42 => Self::Optional,
            0x43 => Self::Tuple,
            0x44 => Self::Union,
            other => return Err(Error::UnknownTypeId(other)),
        };

        Ok(id)
    }
}

/// The byte encoding of a type's shape.
///
/// Two [TypeInfo]s describe the same type exactly when their bytes are equal;
/// there is no other notion of type identity.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct TypeInfo(Pack);

impl TypeInfo {
    /// Descriptor of a type without components.
    pub fn leaf(id: TypeId) -> Self {
        Self(Pack::from(id))
    }

    /// Descriptor of a type with exactly one component (list, optional).
    pub fn wrap(id: TypeId, inner: &TypeInfo) -> Self {
        Self(Pack::from_parts([Pack::from(id), inner.0.clone()]))
    }

    /// Descriptor of a type with a fixed list of components (tuple, union).
    ///
    /// Component counts are bounded by the arities the crate generates
    /// bindings for, which all fit the 1-byte count.
    pub fn group(id: TypeId, components: &[TypeInfo]) -> Self {
        assert!(
            components.len() <= u8::MAX as usize,
            "at most 255 components fit a type info"
        );

        let mut pack = Pack::from(id);
        pack.push(components.len() as u8);
        for comp in components {
            pack.append(&comp.0);
        }

        Self(pack)
    }

    /// Validate raw bytes as a single, complete descriptor.
    pub fn from_bytes(bytes: &[u8]) -> PackResult<Self> {
        let mut up = Unpacker::new(bytes);
        let shape = TypeShape::parse(&mut up)?;

        match up.bytes_left() {
            0 => Ok(shape.type_info()),
            n => Err(Error::TrailingBytes(n)),
        }
    }

    /// The leading tag
    pub fn type_id(&self) -> PackResult<TypeId> {
        match self.0.first() {
            Some(byte) => TypeId::try_from(*byte),
            None => Err(Error::NotEnoughData {
                requested: 1,
                available: 0,
            }),
        }
    }

    /// Parse the descriptor into a tree.
    pub fn shape(&self) -> PackResult<TypeShape> {
        TypeShape::parse(&mut Unpacker::new(&self.0))
    }

    pub fn as_pack(&self) -> &Pack {
        &self.0
    }

    /// The 1-byte length this descriptor carries when packed as a value.
    ///
    /// Only descriptors that read back are accepted: at most 255 bytes long
    /// and nested no deeper than [MAX_NESTING].
    pub(crate) fn value_len(&self) -> PackResult<u8> {
        self.shape()?;

        u8::try_from(self.len()).map_err(|_| Error::LengthOverflow {
            limit: u8::MAX as usize,
            actual: self.len(),
        })
    }
}

/// Same layout as the [crate::PackType] payload: `length (u8) ++ bytes`
impl Serialize for TypeInfo {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let len = self.value_len().map_err(ser::Error::custom)?;

        let mut tup = serializer.serialize_tuple(1 + self.len())?;
        tup.serialize_element(&len)?;
        for byte in self.0.iter() {
            tup.serialize_element(byte)?;
        }
        tup.end()
    }
}

impl<'de> Deserialize<'de> for TypeInfo {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        // the length byte plus the longest descriptor it can announce
        deserializer.deserialize_tuple(1 + u8::MAX as usize, TypeInfoVisitor)
    }
}

struct TypeInfoVisitor;

impl<'de> de::Visitor<'de> for TypeInfoVisitor {
    type Value = TypeInfo;

    fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "a length-prefixed type info")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: de::SeqAccess<'de>,
    {
        let len: u8 = seq
            .next_element()?
            .ok_or_else(|| de::Error::invalid_length(0, &self))?;

        let mut bytes = Vec::with_capacity(len as usize);
        for idx in 0..len as usize {
            let byte: u8 = seq
                .next_element()?
                .ok_or_else(|| de::Error::invalid_length(idx + 1, &self))?;
            bytes.push(byte);
        }

        TypeInfo::from_bytes(&bytes).map_err(de::Error::custom)
    }
}

impl Deref for TypeInfo {
    type Target = Pack;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<[u8]> for TypeInfo {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<TypeInfo> for Pack {
    fn from(value: TypeInfo) -> Self {
        value.0
    }
}

impl std::fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TypeInfo[{}]", self.0.hex())
    }
}

impl std::fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.shape() {
            Ok(shape) => write!(f, "{}", shape),
            Err(_) => write!(f, "<bad type info {}>", self.0.hex()),
        }
    }
}

/// A parsed [TypeInfo].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeShape {
    TypeInfo,
    Unit,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Int8,
    Int16,
    Int32,
    Int64,
    Float,
    Double,
    Bool,
    List(Box<TypeShape>),
    String,
    Optional(Box<TypeShape>),
    Tuple(Vec<TypeShape>),
    Union(Vec<TypeShape>),
}

impl TypeShape {
    /// Read one descriptor from the unpacker's cursor.
    ///
    /// On failure the cursor is left where it was.
    pub fn parse(up: &mut Unpacker<'_>) -> PackResult<Self> {
        let start = up.position();
        let res = Self::parse_nested(up, 0);
        if res.is_err() {
            up.rewind(start);
        }
        res
    }

    fn parse_nested(up: &mut Unpacker<'_>, depth: usize) -> PackResult<Self> {
        if depth > MAX_NESTING {
            return Err(Error::NestingTooDeep(MAX_NESTING));
        }

        let id = TypeId::try_from(up.consume_byte()?)?;

        let shape = match id {
            TypeId::TypeInfo => Self::TypeInfo,
            TypeId::Unit => Self::Unit,
            TypeId::UInt8 => Self::UInt8,
            TypeId::UInt16 => Self::UInt16,
            TypeId::UInt32 => Self::UInt32,
            TypeId::UInt64 => Self::UInt64,
            TypeId::Int8 => Self::Int8,
            TypeId::Int16 => Self::Int16,
            TypeId::Int32 => Self::Int32,
            TypeId::Int64 => Self::Int64,
            TypeId::Float => Self::Float,
            TypeId::Double => Self::Double,
            TypeId::Bool => Self::Bool,
            TypeId::String => Self::String,
            TypeId::List => Self::List(Box::new(Self::parse_nested(up, depth + 1)?)),
            TypeId::Optional => Self::Optional(Box::new(Self::parse_nested(up, depth + 1)?)),
            TypeId::Tuple => Self::Tuple(Self::parse_components(up, depth)?),
            TypeId::Union => Self::Union(Self::parse_components(up, depth)?),
        };

        Ok(shape)
    }

    fn parse_components(up: &mut Unpacker<'_>, depth: usize) -> PackResult<Vec<Self>> {
        let count = up.consume_byte()?;
        (0..count)
            .map(|_| Self::parse_nested(up, depth + 1))
            .collect()
    }

    /// The tag of the outermost type
    pub fn type_id(&self) -> TypeId {
        match self {
            Self::TypeInfo => TypeId::TypeInfo,
            Self::Unit => TypeId::Unit,
            Self::UInt8 => TypeId::UInt8,
            Self::UInt16 => TypeId::UInt16,
            Self::UInt32 => TypeId::UInt32,
            Self::UInt64 => TypeId::UInt64,
            Self::Int8 => TypeId::Int8,
            Self::Int16 => TypeId::Int16,
            Self::Int32 => TypeId::Int32,
            Self::Int64 => TypeId::Int64,
            Self::Float => TypeId::Float,
            Self::Double => TypeId::Double,
            Self::Bool => TypeId::Bool,
            Self::List(_) => TypeId::List,
            Self::String => TypeId::String,
            Self::Optional(_) => TypeId::Optional,
            Self::Tuple(_) => TypeId::Tuple,
            Self::Union(_) => TypeId::Union,
        }
    }

    /// Re-encode the tree as a descriptor.
    pub fn type_info(&self) -> TypeInfo {
        match self {
            Self::List(inner) | Self::Optional(inner) => {
                TypeInfo::wrap(self.type_id(), &inner.type_info())
            }
            Self::Tuple(comps) | Self::Union(comps) => TypeInfo::group(
                self.type_id(),
                &comps.iter().map(Self::type_info).collect::<Vec<_>>(),
            ),
            _ => TypeInfo::leaf(self.type_id()),
        }
    }
}

/// Writes `Name[A, B]` for the components of a composite.
fn write_components(
    f: &mut std::fmt::Formatter<'_>,
    name: &str,
    comps: &[TypeShape],
) -> std::fmt::Result {
    let joined = comps
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    write!(f, "{}[{}]", name, joined)
}

impl std::fmt::Display for TypeShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::List(inner) => write!(f, "List[{}]", inner),
            Self::Optional(inner) => write!(f, "Optional[{}]", inner),
            Self::Tuple(comps) => write_components(f, "Tuple", comps),
            Self::Union(comps) => write_components(f, "Union", comps),
            // leaf names match their tags
            leaf => write!(f, "{:?}", leaf.type_id()),
        }
    }
}
