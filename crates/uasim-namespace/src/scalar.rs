//! Descriptors for the scalar variables of a namespace.

use uasim_types::{
    ids, ByteString, LocalizedText, NodeId, QualifiedName, Variant, XmlElement,
};
use uuid::Uuid;

/// One scalar variable: its browse name, declared DataType and initial value.
#[derive(Clone, Debug, PartialEq)]
pub struct ScalarDescriptor {
    pub name: String,
    pub data_type: NodeId,
    pub initial: Variant,
}

impl ScalarDescriptor {
    pub fn new(name: impl Into<String>, data_type: NodeId, initial: impl Into<Variant>) -> Self {
        Self {
            name: name.into(),
            data_type,
            initial: initial.into(),
        }
    }
}

/// One variable per built-in scalar type, including the Duration and
/// UtcTime aliases.
#[allow(clippy::approx_constant)]
pub fn default_scalars() -> Vec<ScalarDescriptor> {
    let now = chrono::Utc::now();
    vec![
        ScalarDescriptor::new("Boolean", ids::BOOLEAN, false),
        ScalarDescriptor::new("Byte", ids::BYTE, 0xCCu8),
        ScalarDescriptor::new("SByte", ids::SBYTE, -1i8),
        ScalarDescriptor::new("Int16", ids::INT16, 16i16),
        ScalarDescriptor::new("Int32", ids::INT32, 32i32),
        ScalarDescriptor::new("Int64", ids::INT64, 64i64),
        ScalarDescriptor::new("UInt16", ids::UINT16, 16u16),
        ScalarDescriptor::new("UInt32", ids::UINT32, 32u32),
        ScalarDescriptor::new("UInt64", ids::UINT64, 64u64),
        ScalarDescriptor::new("Float", ids::FLOAT, 3.14f32),
        ScalarDescriptor::new("Double", ids::DOUBLE, 3.14f64),
        ScalarDescriptor::new("String", ids::STRING, "string value"),
        ScalarDescriptor::new("DateTime", ids::DATE_TIME, now),
        ScalarDescriptor::new("Guid", ids::GUID, Uuid::new_v4()),
        ScalarDescriptor::new("ByteString", ids::BYTE_STRING, ByteString(vec![0x01, 0x02, 0x03, 0x04])),
        ScalarDescriptor::new("XmlElement", ids::XML_ELEMENT, XmlElement("<a>hello</a>".into())),
        ScalarDescriptor::new("LocalizedText", ids::LOCALIZED_TEXT, LocalizedText::english("localized text")),
        ScalarDescriptor::new("QualifiedName", ids::QUALIFIED_NAME, QualifiedName::new(1234, "defg")),
        ScalarDescriptor::new("NodeId", ids::NODE_ID, NodeId::string(1234, "abcd")),
        ScalarDescriptor::new("Duration", ids::DURATION, 1.0f64),
        ScalarDescriptor::new("UtcTime", ids::UTC_TIME, now),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn defaults_cover_every_scalar_once() {
        let scalars = default_scalars();
        assert_eq!(scalars.len(), 21);
        let names: HashSet<_> = scalars.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names.len(), scalars.len());
    }

    #[test]
    fn aliases_carry_their_base_encoding() {
        let scalars = default_scalars();
        let find = |name: &str| scalars.iter().find(|s| s.name == name).unwrap();
        assert_eq!(find("Duration").initial, Variant::Double(1.0));
        assert!(matches!(find("UtcTime").initial, Variant::DateTime(_)));
        assert_eq!(find("Byte").initial, Variant::Byte(0xCC));
    }

    #[test]
    #[allow(clippy::approx_constant)]
    fn floating_point_defaults() {
        let scalars = default_scalars();
        let find = |name: &str| scalars.iter().find(|s| s.name == name).unwrap();
        assert_eq!(find("Float").initial, Variant::Float(3.14));
        assert_eq!(find("Double").initial, Variant::Double(3.14));
    }
}
