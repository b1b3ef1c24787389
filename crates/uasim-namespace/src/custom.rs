//! `CustomDataType`: the demonstration structure carried inside
//! `CustomDataTypeVariable`.

use uasim_codec::{
    CodecError, CodecResult, FieldDescriptor, FieldKind, StructuredType, StructuredTypeDescriptor,
    StructuredValue,
};
use uasim_types::{NodeId, Variant};

/// Dictionary every namespace registers `CustomDataType` under.
pub const DICTIONARY_URI: &str = "urn:uasim:custom-data-type";

/// A three-field structure: `Foo: String`, `Bar: UInt32`, `Baz: Boolean`.
///
/// `foo` is optional because the wire format distinguishes a null string
/// from an empty one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CustomDataType {
    pub foo: Option<String>,
    pub bar: u32,
    pub baz: bool,
}

impl CustomDataType {
    pub fn new(foo: impl Into<String>, bar: u32, baz: bool) -> Self {
        Self {
            foo: Some(foo.into()),
            bar,
            baz,
        }
    }

    /// Descriptor for registering this type in a namespace.
    pub fn descriptor(data_type_id: NodeId, encoding_id: NodeId) -> StructuredTypeDescriptor {
        StructuredTypeDescriptor {
            fields: Self::fields(),
            ..StructuredTypeDescriptor::new(Self::TYPE_NAME, DICTIONARY_URI, data_type_id, encoding_id)
        }
    }
}

fn mismatch(index: usize, name: &str, expected: FieldKind, actual: &Variant) -> CodecError {
    CodecError::FieldMismatch {
        index,
        name: name.to_string(),
        expected: expected.to_string(),
        actual: actual.type_name().to_string(),
    }
}

impl StructuredType for CustomDataType {
    const TYPE_NAME: &'static str = "CustomDataType";

    fn fields() -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::new("Foo", FieldKind::String),
            FieldDescriptor::new("Bar", FieldKind::UInt32),
            FieldDescriptor::new("Baz", FieldKind::Boolean),
        ]
    }

    fn to_structured(&self, encoding_id: NodeId) -> StructuredValue {
        let foo = self.foo.clone().map_or(Variant::Empty, Variant::String);
        StructuredValue::new(encoding_id)
            .with_field("Foo", foo)
            .with_field("Bar", self.bar)
            .with_field("Baz", self.baz)
    }

    fn from_structured(value: &StructuredValue) -> CodecResult<Self> {
        let foo = match value.require("Foo")? {
            Variant::String(s) => Some(s.clone()),
            Variant::Empty => None,
            other => return Err(mismatch(0, "Foo", FieldKind::String, other)),
        };
        let bar = match value.require("Bar")? {
            Variant::UInt32(v) => *v,
            other => return Err(mismatch(1, "Bar", FieldKind::UInt32, other)),
        };
        let baz = match value.require("Baz")? {
            Variant::Boolean(v) => *v,
            other => return Err(mismatch(2, "Baz", FieldKind::Boolean, other)),
        };
        Ok(Self { foo, bar, baz })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uasim_codec::TypeRegistry;

    fn registry() -> (TypeRegistry, NodeId) {
        let encoding = NodeId::string(2, "DataType.CustomDataType.BinaryEncoding");
        let mut registry = TypeRegistry::new();
        registry
            .register_type(CustomDataType::descriptor(
                NodeId::string(2, "DataType.CustomDataType"),
                encoding.clone(),
            ))
            .unwrap();
        (registry, encoding)
    }

    #[test]
    fn wire_layout() {
        let (registry, encoding) = registry();
        let bytes = registry
            .encode(&CustomDataType::new("foo", 42, true).to_structured(encoding))
            .unwrap();
        assert_eq!(bytes, vec![3, 0, 0, 0, b'f', b'o', b'o', 42, 0, 0, 0, 1]);
    }

    #[test]
    fn null_foo_survives_the_wire() {
        let (registry, encoding) = registry();
        let value = CustomDataType {
            foo: None,
            bar: 7,
            baz: false,
        };
        let xo = registry
            .encode_extension_object(&value.to_structured(encoding))
            .unwrap();
        let decoded = CustomDataType::from_structured(&registry.decode_extension_object(&xo).unwrap()).unwrap();
        assert_eq!(decoded, value);
    }

    #[test]
    fn wrong_field_type_is_reported() {
        let value = StructuredValue::new(NodeId::string(2, "enc"))
            .with_field("Foo", "x")
            .with_field("Bar", true)
            .with_field("Baz", true);
        let err = CustomDataType::from_structured(&value).unwrap_err();
        assert!(matches!(err, CodecError::FieldMismatch { index: 1, .. }));
    }
}
