use std::collections::{BTreeMap, HashMap};

use tracing::debug;
use uasim_types::{ExtensionObject, NodeId};

use crate::binary::{BinaryDecoder, BinaryEncoder};
use crate::descriptor::StructuredTypeDescriptor;
use crate::error::{CodecError, CodecResult};
use crate::value::StructuredValue;

/// Receipt for a successful type registration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeRegistration {
    pub name: String,
    pub dictionary_uri: String,
    pub data_type_id: NodeId,
    pub encoding_id: NodeId,
}

/// Registry of structured-type descriptors, keyed by binary-encoding id.
///
/// The registry is owned by the server context. It is populated while
/// namespaces are built and is read-only afterwards, so lookups need no
/// synchronization once it is shared.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    by_encoding: HashMap<NodeId, StructuredTypeDescriptor>,
    by_data_type: HashMap<NodeId, NodeId>,
    dictionaries: BTreeMap<String, Vec<NodeId>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.by_encoding.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_encoding.is_empty()
    }

    /// Register a descriptor. Descriptors are immutable once registered.
    pub fn register_type(
        &mut self,
        descriptor: StructuredTypeDescriptor,
    ) -> CodecResult<TypeRegistration> {
        if self.by_encoding.contains_key(&descriptor.encoding_id) {
            return Err(CodecError::DuplicateEncodingId(descriptor.encoding_id));
        }

        let registration = TypeRegistration {
            name: descriptor.name.clone(),
            dictionary_uri: descriptor.dictionary_uri.clone(),
            data_type_id: descriptor.data_type_id.clone(),
            encoding_id: descriptor.encoding_id.clone(),
        };

        debug!(
            name = %registration.name,
            dictionary = %registration.dictionary_uri,
            encoding_id = %registration.encoding_id,
            fields = descriptor.fields.len(),
            "registered structured type"
        );

        self.by_data_type
            .insert(descriptor.data_type_id.clone(), descriptor.encoding_id.clone());
        self.dictionaries
            .entry(descriptor.dictionary_uri.clone())
            .or_default()
            .push(descriptor.encoding_id.clone());
        self.by_encoding
            .insert(descriptor.encoding_id.clone(), descriptor);

        Ok(registration)
    }

    /// Codec lookup by binary-encoding id.
    pub fn codec_for(&self, encoding_id: &NodeId) -> Option<&StructuredTypeDescriptor> {
        self.by_encoding.get(encoding_id)
    }

    /// The binary-encoding id registered for a data type.
    pub fn encoding_for_data_type(&self, data_type_id: &NodeId) -> Option<&NodeId> {
        self.by_data_type.get(data_type_id)
    }

    pub fn is_structured_data_type(&self, data_type_id: &NodeId) -> bool {
        self.by_data_type.contains_key(data_type_id)
    }

    pub fn dictionary_uris(&self) -> impl Iterator<Item = &str> {
        self.dictionaries.keys().map(String::as_str)
    }

    /// Descriptors registered under a dictionary, in registration order.
    pub fn dictionary(&self, uri: &str) -> Vec<&StructuredTypeDescriptor> {
        self.dictionaries
            .get(uri)
            .map(|ids| ids.iter().filter_map(|id| self.by_encoding.get(id)).collect())
            .unwrap_or_default()
    }

    /// Drop every descriptor whose encoding id lives in `namespace`.
    /// Returns the number removed.
    pub fn unregister_namespace(&mut self, namespace: u16) -> usize {
        let before = self.by_encoding.len();
        self.by_encoding.retain(|id, _| id.namespace != namespace);
        self.by_data_type
            .retain(|data_type, encoding| data_type.namespace != namespace && encoding.namespace != namespace);
        for ids in self.dictionaries.values_mut() {
            ids.retain(|id| id.namespace != namespace);
        }
        self.dictionaries.retain(|_, ids| !ids.is_empty());
        before - self.by_encoding.len()
    }

    /// Encode the fields of `value` in the order its descriptor declares.
    pub fn encode(&self, value: &StructuredValue) -> CodecResult<Vec<u8>> {
        let descriptor = self
            .codec_for(&value.encoding_id)
            .ok_or_else(|| CodecError::UnknownEncodingId(value.encoding_id.clone()))?;

        if descriptor.fields.len() != value.fields.len() {
            return Err(CodecError::FieldCount {
                expected: descriptor.fields.len(),
                actual: value.fields.len(),
            });
        }

        let mut enc = BinaryEncoder::new();
        for (index, (field, (name, field_value))) in
            descriptor.fields.iter().zip(&value.fields).enumerate()
        {
            if field.name != *name || !field.kind.accepts(field_value) {
                return Err(CodecError::FieldMismatch {
                    index,
                    name: field.name.clone(),
                    expected: format!("{} {}", field.name, field.kind),
                    actual: format!("{name} {}", field_value.type_name()),
                });
            }
            field.kind.encode(field_value, &mut enc)?;
        }
        Ok(enc.finish())
    }

    /// Decode `bytes` using the descriptor registered for `encoding_id`.
    pub fn decode(&self, bytes: &[u8], encoding_id: &NodeId) -> CodecResult<StructuredValue> {
        let descriptor = self
            .codec_for(encoding_id)
            .ok_or_else(|| CodecError::UnknownEncodingId(encoding_id.clone()))?;

        let mut dec = BinaryDecoder::new(bytes);
        let mut value = StructuredValue::new(encoding_id.clone());
        for field in &descriptor.fields {
            let field_value = field.kind.decode(&mut dec)?;
            value.fields.push((field.name.clone(), field_value));
        }
        dec.finish()?;
        Ok(value)
    }

    pub fn encode_extension_object(&self, value: &StructuredValue) -> CodecResult<ExtensionObject> {
        let body = self.encode(value)?;
        Ok(ExtensionObject::new(value.encoding_id.clone(), body))
    }

    pub fn decode_extension_object(&self, xo: &ExtensionObject) -> CodecResult<StructuredValue> {
        self.decode(&xo.body, &xo.encoding_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::FieldKind;
    use proptest::prelude::*;
    use uasim_types::{ByteString, Variant};

    fn encoding_id() -> NodeId {
        NodeId::string(2, "DataType.CustomDataType.BinaryEncoding")
    }

    fn custom_descriptor() -> StructuredTypeDescriptor {
        StructuredTypeDescriptor::new(
            "CustomDataType",
            "urn:uasim:custom-data-type",
            NodeId::string(2, "DataType.CustomDataType"),
            encoding_id(),
        )
        .field("foo", FieldKind::String)
        .field("bar", FieldKind::UInt32)
        .field("baz", FieldKind::Boolean)
    }

    fn registry() -> TypeRegistry {
        let mut registry = TypeRegistry::new();
        registry.register_type(custom_descriptor()).unwrap();
        registry
    }

    fn sample() -> StructuredValue {
        StructuredValue::new(encoding_id())
            .with_field("foo", "foo")
            .with_field("bar", 42u32)
            .with_field("baz", true)
    }

    #[test]
    fn register_and_lookup() {
        let registry = registry();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.codec_for(&encoding_id()).unwrap().name, "CustomDataType");
        assert_eq!(
            registry.encoding_for_data_type(&NodeId::string(2, "DataType.CustomDataType")),
            Some(&encoding_id())
        );
        assert_eq!(registry.dictionary("urn:uasim:custom-data-type").len(), 1);
        assert_eq!(registry.dictionary_uris().collect::<Vec<_>>(), ["urn:uasim:custom-data-type"]);
    }

    #[test]
    fn duplicate_encoding_id_rejected() {
        let mut registry = registry();
        let err = registry.register_type(custom_descriptor()).unwrap_err();
        assert_eq!(err, CodecError::DuplicateEncodingId(encoding_id()));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn encode_is_positional_and_untagged() {
        let bytes = registry().encode(&sample()).unwrap();
        assert_eq!(
            bytes,
            vec![3, 0, 0, 0, b'f', b'o', b'o', 42, 0, 0, 0, 1]
        );
    }

    #[test]
    fn roundtrip_sample() {
        let registry = registry();
        let xo = registry.encode_extension_object(&sample()).unwrap();
        assert_eq!(xo.encoding_id, encoding_id());
        assert_eq!(registry.decode_extension_object(&xo).unwrap(), sample());
    }

    #[test]
    fn decode_unknown_encoding_id() {
        let err = registry().decode(&[], &NodeId::string(2, "nope")).unwrap_err();
        assert_eq!(err, CodecError::UnknownEncodingId(NodeId::string(2, "nope")));
    }

    #[test]
    fn decode_truncated_payload() {
        let registry = registry();
        let bytes = registry.encode(&sample()).unwrap();
        for cut in 0..bytes.len() {
            let err = registry.decode(&bytes[..cut], &encoding_id()).unwrap_err();
            assert!(matches!(err, CodecError::Truncated { .. }), "cut at {cut}: {err:?}");
        }
    }

    #[test]
    fn decode_rejects_trailing_bytes() {
        let registry = registry();
        let mut bytes = registry.encode(&sample()).unwrap();
        bytes.push(0);
        assert_eq!(
            registry.decode(&bytes, &encoding_id()).unwrap_err(),
            CodecError::TrailingBytes(1)
        );
    }

    #[test]
    fn encode_rejects_wrong_field_kind() {
        let value = StructuredValue::new(encoding_id())
            .with_field("foo", "foo")
            .with_field("bar", 42i32)
            .with_field("baz", true);
        assert!(matches!(
            registry().encode(&value),
            Err(CodecError::FieldMismatch { index: 1, .. })
        ));
    }

    #[test]
    fn encode_rejects_wrong_field_count() {
        let value = StructuredValue::new(encoding_id()).with_field("foo", "foo");
        assert_eq!(
            registry().encode(&value).unwrap_err(),
            CodecError::FieldCount { expected: 3, actual: 1 }
        );
    }

    #[test]
    fn null_string_roundtrips_as_empty() {
        let registry = registry();
        let value = StructuredValue::new(encoding_id())
            .with_field("foo", Variant::Empty)
            .with_field("bar", 0u32)
            .with_field("baz", false);
        let bytes = registry.encode(&value).unwrap();
        assert_eq!(registry.decode(&bytes, &encoding_id()).unwrap(), value);
    }

    #[test]
    fn unregister_namespace_removes_types() {
        let mut registry = registry();
        assert_eq!(registry.unregister_namespace(3), 0);
        assert_eq!(registry.unregister_namespace(2), 1);
        assert!(registry.is_empty());
        assert!(registry.dictionary_uris().next().is_none());
        assert!(!registry.is_structured_data_type(&NodeId::string(2, "DataType.CustomDataType")));
    }

    fn wide_descriptor() -> StructuredTypeDescriptor {
        StructuredTypeDescriptor::new(
            "Wide",
            "urn:test",
            NodeId::numeric(1, 100),
            NodeId::numeric(1, 101),
        )
        .field("b", FieldKind::Boolean)
        .field("i8", FieldKind::SByte)
        .field("u8", FieldKind::Byte)
        .field("i16", FieldKind::Int16)
        .field("u16", FieldKind::UInt16)
        .field("i32", FieldKind::Int32)
        .field("u32", FieldKind::UInt32)
        .field("i64", FieldKind::Int64)
        .field("u64", FieldKind::UInt64)
        .field("f32", FieldKind::Float)
        .field("f64", FieldKind::Double)
        .field("s", FieldKind::String)
        .field("t", FieldKind::DateTime)
        .field("g", FieldKind::Guid)
        .field("bytes", FieldKind::ByteString)
    }

    fn wide_registry() -> TypeRegistry {
        let mut registry = TypeRegistry::new();
        registry.register_type(wide_descriptor()).unwrap();
        registry
    }

    fn wide_value(when: uasim_types::DateTime) -> StructuredValue {
        StructuredValue::new(NodeId::numeric(1, 101))
            .with_field("b", true)
            .with_field("i8", -1i8)
            .with_field("u8", 1u8)
            .with_field("i16", -2i16)
            .with_field("u16", 2u16)
            .with_field("i32", -3i32)
            .with_field("u32", 3u32)
            .with_field("i64", -4i64)
            .with_field("u64", 4u64)
            .with_field("f32", 0.5f32)
            .with_field("f64", 0.25f64)
            .with_field("s", "s")
            .with_field("t", when)
            .with_field("g", uuid::Uuid::nil())
            .with_field("bytes", ByteString(vec![1]))
    }

    #[test]
    fn every_field_kind_is_covered() {
        let kinds: std::collections::HashSet<_> =
            wide_descriptor().fields.iter().map(|f| f.kind).collect();
        assert_eq!(kinds.len(), 15);
    }

    #[test]
    fn sub_tick_date_time_field_fails_encode() {
        let when = uasim_types::DateTime::from_timestamp(0, 123).unwrap();
        assert!(matches!(
            wide_registry().encode(&wide_value(when)),
            Err(CodecError::OutOfRange(_))
        ));
    }

    /// Finite floats plus infinities; NaN is excluded since it never equals
    /// itself.
    fn f32_values() -> impl Strategy<Value = f32> {
        prop::num::f32::NORMAL
            | prop::num::f32::SUBNORMAL
            | prop::num::f32::ZERO
            | prop::num::f32::INFINITE
    }

    fn f64_values() -> impl Strategy<Value = f64> {
        prop::num::f64::NORMAL
            | prop::num::f64::SUBNORMAL
            | prop::num::f64::ZERO
            | prop::num::f64::INFINITE
    }

    // Seconds span roughly +/- 28,000 years around 1970, well inside both
    // chrono's range and the Int64 tick range.
    const SECS: std::ops::Range<i64> = -900_000_000_000..900_000_000_000;

    proptest! {
        #[test]
        fn decode_inverts_encode(
            b in any::<bool>(),
            i8v in any::<i8>(),
            u8v in any::<u8>(),
            i16v in any::<i16>(),
            u16v in any::<u16>(),
            i32v in any::<i32>(),
            u32v in any::<u32>(),
            i64v in any::<i64>(),
            u64v in any::<u64>(),
            f32v in f32_values(),
            f64v in f64_values(),
            s in ".{0,64}",
            secs in SECS,
            ticks in 0u32..10_000_000,
            guid in any::<[u8; 16]>(),
            bytes in proptest::collection::vec(any::<u8>(), 0..64),
        ) {
            let registry = wide_registry();
            let when = uasim_types::DateTime::from_timestamp(secs, ticks * 100).unwrap();

            let value = StructuredValue::new(NodeId::numeric(1, 101))
                .with_field("b", b)
                .with_field("i8", i8v)
                .with_field("u8", u8v)
                .with_field("i16", i16v)
                .with_field("u16", u16v)
                .with_field("i32", i32v)
                .with_field("u32", u32v)
                .with_field("i64", i64v)
                .with_field("u64", u64v)
                .with_field("f32", f32v)
                .with_field("f64", f64v)
                .with_field("s", s)
                .with_field("t", when)
                .with_field("g", uuid::Uuid::from_bytes(guid))
                .with_field("bytes", ByteString(bytes));

            let encoded = registry.encode(&value).unwrap();
            let decoded = registry.decode(&encoded, &NodeId::numeric(1, 101)).unwrap();
            prop_assert_eq!(decoded, value);
        }

        #[test]
        fn date_time_encodes_exactly_or_fails(
            secs in SECS,
            nanos in 0u32..1_000_000_000,
        ) {
            let registry = wide_registry();
            let value = wide_value(uasim_types::DateTime::from_timestamp(secs, nanos).unwrap());
            match registry.encode(&value) {
                Ok(encoded) => {
                    prop_assert_eq!(nanos % 100, 0);
                    let decoded = registry.decode(&encoded, &NodeId::numeric(1, 101)).unwrap();
                    prop_assert_eq!(decoded, value);
                }
                Err(err) => {
                    prop_assert_ne!(nanos % 100, 0);
                    prop_assert!(matches!(err, CodecError::OutOfRange(_)));
                }
            }
        }
    }
}
