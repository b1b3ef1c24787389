use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::TypeError;
use crate::ids;
use crate::names::{LocalizedText, QualifiedName};
use crate::node_id::NodeId;

/// UTC timestamp used for DateTime values and data-value timestamps.
pub type DateTime = chrono::DateTime<chrono::Utc>;

/// Raw bytes carried as a single value.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ByteString(pub Vec<u8>);

impl fmt::Display for ByteString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(&self.0))
    }
}

/// An XML fragment carried as text.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct XmlElement(pub String);

/// A structured value in encoded form.
///
/// The payload is opaque until a codec registered under `encoding_id` is
/// used to decode it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExtensionObject {
    pub encoding_id: NodeId,
    pub body: Vec<u8>,
}

impl ExtensionObject {
    pub fn new(encoding_id: NodeId, body: Vec<u8>) -> Self {
        Self { encoding_id, body }
    }
}

/// Tagged union over every value kind an attribute can hold.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum Variant {
    #[default]
    Empty,
    Boolean(bool),
    SByte(i8),
    Byte(u8),
    Int16(i16),
    UInt16(u16),
    Int32(i32),
    UInt32(u32),
    Int64(i64),
    UInt64(u64),
    Float(f32),
    Double(f64),
    String(String),
    DateTime(DateTime),
    Guid(Uuid),
    ByteString(ByteString),
    XmlElement(XmlElement),
    LocalizedText(LocalizedText),
    QualifiedName(QualifiedName),
    NodeId(NodeId),
    ExtensionObject(ExtensionObject),
}

impl Variant {
    /// The built-in data type this value is encoded as, or `None` for
    /// [`Variant::Empty`]. Extension objects report `Structure`.
    pub fn data_type_id(&self) -> Option<NodeId> {
        let id = match self {
            Self::Empty => return None,
            Self::Boolean(_) => ids::BOOLEAN,
            Self::SByte(_) => ids::SBYTE,
            Self::Byte(_) => ids::BYTE,
            Self::Int16(_) => ids::INT16,
            Self::UInt16(_) => ids::UINT16,
            Self::Int32(_) => ids::INT32,
            Self::UInt32(_) => ids::UINT32,
            Self::Int64(_) => ids::INT64,
            Self::UInt64(_) => ids::UINT64,
            Self::Float(_) => ids::FLOAT,
            Self::Double(_) => ids::DOUBLE,
            Self::String(_) => ids::STRING,
            Self::DateTime(_) => ids::DATE_TIME,
            Self::Guid(_) => ids::GUID,
            Self::ByteString(_) => ids::BYTE_STRING,
            Self::XmlElement(_) => ids::XML_ELEMENT,
            Self::LocalizedText(_) => ids::LOCALIZED_TEXT,
            Self::QualifiedName(_) => ids::QUALIFIED_NAME,
            Self::NodeId(_) => ids::NODE_ID,
            Self::ExtensionObject(_) => ids::STRUCTURE,
        };
        Some(id)
    }

    /// Short name of the value kind, e.g. `"Int32"`.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Empty => "Empty",
            Self::Boolean(_) => "Boolean",
            Self::SByte(_) => "SByte",
            Self::Byte(_) => "Byte",
            Self::Int16(_) => "Int16",
            Self::UInt16(_) => "UInt16",
            Self::Int32(_) => "Int32",
            Self::UInt32(_) => "UInt32",
            Self::Int64(_) => "Int64",
            Self::UInt64(_) => "UInt64",
            Self::Float(_) => "Float",
            Self::Double(_) => "Double",
            Self::String(_) => "String",
            Self::DateTime(_) => "DateTime",
            Self::Guid(_) => "Guid",
            Self::ByteString(_) => "ByteString",
            Self::XmlElement(_) => "XmlElement",
            Self::LocalizedText(_) => "LocalizedText",
            Self::QualifiedName(_) => "QualifiedName",
            Self::NodeId(_) => "NodeId",
            Self::ExtensionObject(_) => "ExtensionObject",
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Parse text as a value of the given built-in data type.
    ///
    /// `Duration` parses as a Double and `UtcTime` as a DateTime (RFC 3339).
    pub fn parse_as(data_type: &NodeId, text: &str) -> Result<Self, TypeError> {
        let invalid = || TypeError::InvalidValue {
            text: text.to_string(),
            data_type: data_type.to_string(),
        };

        macro_rules! number {
            ($variant:ident) => {
                Self::$variant(text.trim().parse().map_err(|_| invalid())?)
            };
        }

        let value = match data_type {
            id if *id == ids::BOOLEAN => number!(Boolean),
            id if *id == ids::SBYTE => number!(SByte),
            id if *id == ids::BYTE => number!(Byte),
            id if *id == ids::INT16 => number!(Int16),
            id if *id == ids::UINT16 => number!(UInt16),
            id if *id == ids::INT32 => number!(Int32),
            id if *id == ids::UINT32 => number!(UInt32),
            id if *id == ids::INT64 => number!(Int64),
            id if *id == ids::UINT64 => number!(UInt64),
            id if *id == ids::FLOAT => number!(Float),
            id if *id == ids::DOUBLE || *id == ids::DURATION => number!(Double),
            id if *id == ids::STRING => Self::String(text.to_string()),
            id if *id == ids::DATE_TIME || *id == ids::UTC_TIME => Self::DateTime(
                chrono::DateTime::parse_from_rfc3339(text)
                    .map_err(|_| invalid())?
                    .with_timezone(&chrono::Utc),
            ),
            id if *id == ids::GUID => Self::Guid(Uuid::parse_str(text).map_err(|_| invalid())?),
            id if *id == ids::BYTE_STRING => {
                let digits = text.strip_prefix("0x").unwrap_or(text);
                Self::ByteString(ByteString(
                    hex::decode(digits).map_err(|e| TypeError::InvalidHex(e.to_string()))?,
                ))
            }
            id if *id == ids::XML_ELEMENT => Self::XmlElement(XmlElement(text.to_string())),
            id if *id == ids::LOCALIZED_TEXT => Self::LocalizedText(LocalizedText::english(text)),
            id if *id == ids::QUALIFIED_NAME => {
                let (ns, name) = text.split_once(':').ok_or_else(invalid)?;
                Self::QualifiedName(QualifiedName::new(
                    ns.parse().map_err(|_| invalid())?,
                    name,
                ))
            }
            id if *id == ids::NODE_ID => Self::NodeId(text.parse()?),
            other => return Err(TypeError::UnsupportedDataType(other.to_string())),
        };
        Ok(value)
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "<empty>"),
            Self::Boolean(v) => write!(f, "{v}"),
            Self::SByte(v) => write!(f, "{v}"),
            Self::Byte(v) => write!(f, "{v}"),
            Self::Int16(v) => write!(f, "{v}"),
            Self::UInt16(v) => write!(f, "{v}"),
            Self::Int32(v) => write!(f, "{v}"),
            Self::UInt32(v) => write!(f, "{v}"),
            Self::Int64(v) => write!(f, "{v}"),
            Self::UInt64(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Double(v) => write!(f, "{v}"),
            Self::String(v) => write!(f, "{v:?}"),
            Self::DateTime(v) => write!(f, "{}", v.to_rfc3339()),
            Self::Guid(v) => write!(f, "{v}"),
            Self::ByteString(v) => write!(f, "{v}"),
            Self::XmlElement(v) => write!(f, "{}", v.0),
            Self::LocalizedText(v) => write!(f, "{v}"),
            Self::QualifiedName(v) => write!(f, "{v}"),
            Self::NodeId(v) => write!(f, "{v}"),
            Self::ExtensionObject(v) => {
                write!(f, "ExtensionObject({}, {} bytes)", v.encoding_id, v.body.len())
            }
        }
    }
}

macro_rules! impl_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(impl From<$ty> for Variant {
            fn from(value: $ty) -> Self {
                Self::$variant(value)
            }
        })*
    };
}

impl_from! {
    bool => Boolean,
    i8 => SByte,
    u8 => Byte,
    i16 => Int16,
    u16 => UInt16,
    i32 => Int32,
    u32 => UInt32,
    i64 => Int64,
    u64 => UInt64,
    f32 => Float,
    f64 => Double,
    String => String,
    DateTime => DateTime,
    Uuid => Guid,
    ByteString => ByteString,
    XmlElement => XmlElement,
    LocalizedText => LocalizedText,
    QualifiedName => QualifiedName,
    NodeId => NodeId,
    ExtensionObject => ExtensionObject,
}

impl From<&str> for Variant {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}
