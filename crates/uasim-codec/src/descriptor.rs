use std::fmt;

use serde::{Deserialize, Serialize};
use uasim_types::{ByteString, NodeId, Variant};

use crate::binary::{BinaryDecoder, BinaryEncoder};
use crate::error::{CodecError, CodecResult};

/// Primitive wire kind of a structure field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldKind {
    Boolean,
    SByte,
    Byte,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Float,
    Double,
    String,
    DateTime,
    Guid,
    ByteString,
}

impl FieldKind {
    /// Whether the given value can be written as this kind. Strings and byte
    /// strings also accept [`Variant::Empty`], which encodes as null.
    pub fn accepts(&self, value: &Variant) -> bool {
        matches!(
            (self, value),
            (Self::Boolean, Variant::Boolean(_))
                | (Self::SByte, Variant::SByte(_))
                | (Self::Byte, Variant::Byte(_))
                | (Self::Int16, Variant::Int16(_))
                | (Self::UInt16, Variant::UInt16(_))
                | (Self::Int32, Variant::Int32(_))
                | (Self::UInt32, Variant::UInt32(_))
                | (Self::Int64, Variant::Int64(_))
                | (Self::UInt64, Variant::UInt64(_))
                | (Self::Float, Variant::Float(_))
                | (Self::Double, Variant::Double(_))
                | (Self::String, Variant::String(_) | Variant::Empty)
                | (Self::DateTime, Variant::DateTime(_))
                | (Self::Guid, Variant::Guid(_))
                | (Self::ByteString, Variant::ByteString(_) | Variant::Empty)
        )
    }

    /// Encode `value`; the caller must have checked [`Self::accepts`].
    pub(crate) fn encode(&self, value: &Variant, enc: &mut BinaryEncoder) -> CodecResult<()> {
        match value {
            Variant::Boolean(v) => enc.write_bool(*v),
            Variant::SByte(v) => enc.write_i8(*v),
            Variant::Byte(v) => enc.write_u8(*v),
            Variant::Int16(v) => enc.write_i16(*v),
            Variant::UInt16(v) => enc.write_u16(*v),
            Variant::Int32(v) => enc.write_i32(*v),
            Variant::UInt32(v) => enc.write_u32(*v),
            Variant::Int64(v) => enc.write_i64(*v),
            Variant::UInt64(v) => enc.write_u64(*v),
            Variant::Float(v) => enc.write_f32(*v),
            Variant::Double(v) => enc.write_f64(*v),
            Variant::String(v) => enc.write_string(Some(v))?,
            Variant::DateTime(v) => enc.write_date_time(v)?,
            Variant::Guid(v) => enc.write_guid(v),
            Variant::ByteString(v) => enc.write_bytes(Some(&v.0))?,
            Variant::Empty => enc.write_bytes(None)?,
            other => {
                return Err(CodecError::OutOfRange(format!(
                    "{} is not a primitive field value",
                    other.type_name()
                )))
            }
        }
        Ok(())
    }

    pub(crate) fn decode(&self, dec: &mut BinaryDecoder<'_>) -> CodecResult<Variant> {
        let value = match self {
            Self::Boolean => Variant::Boolean(dec.read_bool()?),
            Self::SByte => Variant::SByte(dec.read_i8()?),
            Self::Byte => Variant::Byte(dec.read_u8()?),
            Self::Int16 => Variant::Int16(dec.read_i16()?),
            Self::UInt16 => Variant::UInt16(dec.read_u16()?),
            Self::Int32 => Variant::Int32(dec.read_i32()?),
            Self::UInt32 => Variant::UInt32(dec.read_u32()?),
            Self::Int64 => Variant::Int64(dec.read_i64()?),
            Self::UInt64 => Variant::UInt64(dec.read_u64()?),
            Self::Float => Variant::Float(dec.read_f32()?),
            Self::Double => Variant::Double(dec.read_f64()?),
            Self::String => dec.read_string()?.map_or(Variant::Empty, Variant::String),
            Self::DateTime => Variant::DateTime(dec.read_date_time()?),
            Self::Guid => Variant::Guid(dec.read_guid()?),
            Self::ByteString => dec
                .read_bytes()?
                .map_or(Variant::Empty, |b| Variant::ByteString(ByteString(b))),
        };
        Ok(value)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    pub kind: FieldKind,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Layout of a custom structured type.
///
/// Field order is the wire contract: encoder and decoder agree on identity
/// by position alone.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredTypeDescriptor {
    pub name: String,
    pub dictionary_uri: String,
    pub data_type_id: NodeId,
    pub encoding_id: NodeId,
    pub fields: Vec<FieldDescriptor>,
}

impl StructuredTypeDescriptor {
    pub fn new(
        name: impl Into<String>,
        dictionary_uri: impl Into<String>,
        data_type_id: NodeId,
        encoding_id: NodeId,
    ) -> Self {
        Self {
            name: name.into(),
            dictionary_uri: dictionary_uri.into(),
            data_type_id,
            encoding_id,
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.fields.push(FieldDescriptor::new(name, kind));
        self
    }
}
