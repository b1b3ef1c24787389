//! Assignability of written values to a Variable's declared DataType.

use uasim_codec::TypeRegistry;
use uasim_space::AddressSpace;
use uasim_types::{ids, NodeId, StatusCode, Variant};

use crate::error::{AttributeError, AttributeResult};

/// Check that `value` may be stored in a Variable declared as `declared`.
///
/// A built-in value is assignable to its own type, to any supertype of it,
/// and to a subtype of it that adds no encoding of its own (Duration takes
/// a Double, UtcTime a DateTime). An ExtensionObject written to a
/// registered structure must carry that structure's encoding and decode
/// cleanly.
pub fn check_assignable(
    space: &AddressSpace,
    registry: &TypeRegistry,
    declared: &NodeId,
    value: &Variant,
) -> AttributeResult<()> {
    let mismatch = || {
        AttributeError::rejected(
            StatusCode::BAD_TYPE_MISMATCH,
            format!("{} is not assignable to {declared}", value.type_name()),
        )
    };

    match value {
        Variant::Empty => Err(mismatch()),
        Variant::ExtensionObject(xo) => {
            if !registry.is_structured_data_type(declared) {
                return if space.is_subtype_of(&ids::STRUCTURE, declared) {
                    Ok(())
                } else {
                    Err(mismatch())
                };
            }
            registry.decode_extension_object(xo)?;
            let encodes = registry
                .codec_for(&xo.encoding_id)
                .is_some_and(|desc| space.is_subtype_of(&desc.data_type_id, declared));
            if encodes {
                Ok(())
            } else {
                Err(mismatch())
            }
        }
        builtin => {
            let Some(actual) = builtin.data_type_id() else {
                return Err(mismatch());
            };
            if space.is_subtype_of(&actual, declared) || space.is_subtype_of(declared, &actual) {
                Ok(())
            } else {
                Err(mismatch())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uasim_codec::{FieldKind, StructuredTypeDescriptor, StructuredValue};
    use uasim_space::Node;
    use uasim_types::ExtensionObject;

    fn custom_type() -> NodeId {
        NodeId::string(2, "DataType.Point")
    }

    fn encoding() -> NodeId {
        NodeId::string(2, "DataType.Point.BinaryEncoding")
    }

    fn fixture() -> (AddressSpace, TypeRegistry) {
        let mut space = AddressSpace::with_core_nodes();
        space.add_node(Node::data_type(custom_type(), "Point", false)).unwrap();
        space.link(&ids::STRUCTURE, &ids::HAS_SUBTYPE, &custom_type()).unwrap();

        let mut registry = TypeRegistry::new();
        registry
            .register_type(
                StructuredTypeDescriptor::new("Point", "urn:test", custom_type(), encoding())
                    .field("X", FieldKind::Int32),
            )
            .unwrap();
        (space, registry)
    }

    fn status(result: AttributeResult<()>) -> StatusCode {
        result.map_or_else(|e| e.status_code(), |()| StatusCode::GOOD)
    }

    #[test]
    fn builtin_rules() {
        let (space, registry) = fixture();
        let check = |declared: NodeId, value: Variant| status(check_assignable(&space, &registry, &declared, &value));

        assert_eq!(check(ids::INT32, Variant::Int32(1)), StatusCode::GOOD);
        assert_eq!(check(ids::NUMBER, Variant::Int32(1)), StatusCode::GOOD);
        assert_eq!(check(ids::BASE_DATA_TYPE, Variant::from("s")), StatusCode::GOOD);
        assert_eq!(check(ids::DURATION, Variant::Double(1.0)), StatusCode::GOOD);
        assert_eq!(check(ids::INT32, Variant::Int16(1)), StatusCode::BAD_TYPE_MISMATCH);
        assert_eq!(check(ids::STRING, Variant::Empty), StatusCode::BAD_TYPE_MISMATCH);
    }

    #[test]
    fn structured_values_must_decode() {
        let (space, registry) = fixture();
        let good = registry
            .encode_extension_object(&StructuredValue::new(encoding()).with_field("X", 5i32))
            .unwrap();
        assert_eq!(
            status(check_assignable(&space, &registry, &custom_type(), &good.clone().into())),
            StatusCode::GOOD
        );

        let truncated = ExtensionObject::new(encoding(), vec![1, 2]);
        let err = check_assignable(&space, &registry, &custom_type(), &truncated.into()).unwrap_err();
        assert!(matches!(err, AttributeError::Codec(_)));
        assert_eq!(err.status_code(), StatusCode::BAD_DECODING_ERROR);

        let unknown = ExtensionObject::new(NodeId::string(2, "nope"), vec![]);
        let err = check_assignable(&space, &registry, &custom_type(), &unknown.into()).unwrap_err();
        assert!(matches!(err, AttributeError::UnknownEncodingId(_)));

        assert_eq!(
            status(check_assignable(&space, &registry, &custom_type(), &Variant::Int32(5))),
            StatusCode::BAD_TYPE_MISMATCH
        );
        assert_eq!(
            status(check_assignable(&space, &registry, &ids::INT32, &good.into())),
            StatusCode::BAD_TYPE_MISMATCH
        );
    }
}
