use std::sync::Arc;

use uasim_codec::StructuredType;
use uasim_dispatch::{ReadValueId, SeededRandom, WriteValue};
use uasim_namespace::{CustomDataType, NamespaceBuilder};
use uasim_server::{ServerConfig, UaServer};
use uasim_space::{AddressSpace, Reference};
use uasim_types::{
    ids, AttributeId, DataValue, ExtensionObject, Identity, NodeClass, NodeId, StatusCode,
    TimestampsToReturn, Variant,
};

fn server() -> UaServer {
    UaServer::start_with_random(ServerConfig::default(), Arc::new(SeededRandom::new(7))).unwrap()
}

fn sim(path: &str) -> NodeId {
    NodeId::string(1, path)
}

fn read(server: &UaServer, identity: &Identity, item: ReadValueId) -> DataValue {
    server
        .dispatcher()
        .read(identity, 0.0, TimestampsToReturn::Both, &[item])
        .remove(0)
}

fn read_value(server: &UaServer, identity: &Identity, id: &NodeId) -> DataValue {
    read(server, identity, ReadValueId::value(id.clone()))
}

fn write(server: &UaServer, identity: &Identity, id: &NodeId, value: impl Into<Variant>) -> StatusCode {
    server
        .dispatcher()
        .write(identity, &[WriteValue::value(id.clone(), value)])
        .remove(0)
        .status
}

// ---------------------------------------------------------------------------
// Access control
// ---------------------------------------------------------------------------

#[test]
fn only_admin_can_write() {
    let server = server();
    let id = sim("Simulation/OnlyAdminCanWrite/String");
    let admin = Identity::user("admin");
    let user = Identity::user("user");

    assert_eq!(write(&server, &admin, &id, "admin edit"), StatusCode::GOOD);
    assert_eq!(read_value(&server, &user, &id).value, Some(Variant::from("admin edit")));

    let outcome = server
        .dispatcher()
        .write(&user, &[WriteValue::value(id.clone(), "user edit")])
        .remove(0);
    assert_eq!(outcome.status, StatusCode::BAD_USER_ACCESS_DENIED);
    assert!(outcome.reason.is_some());
    assert_eq!(read_value(&server, &admin, &id).value, Some(Variant::from("admin edit")));
}

#[test]
fn only_admin_can_read() {
    let server = server();
    let id = sim("Simulation/OnlyAdminCanRead/String");

    let admin = read_value(&server, &Identity::user("admin"), &id);
    assert_eq!(admin.value, Some(Variant::from("shh... don't tell the lusers")));

    for identity in [Identity::user("user"), Identity::Anonymous] {
        let denied = read_value(&server, &identity, &id);
        assert_eq!(denied.status, StatusCode::BAD_USER_ACCESS_DENIED);
        assert!(denied.value.is_none());
    }

    let level = ReadValueId::new(id, AttributeId::UserAccessLevel);
    assert_eq!(read(&server, &Identity::user("user"), level.clone()).value, Some(Variant::Byte(0)));
    assert_eq!(read(&server, &Identity::user("admin"), level).value, Some(Variant::Byte(3)));
}

#[test]
fn write_only_cannot_be_read() {
    let server = server();
    let id = sim("Simulation/WriteOnly/String");
    assert_eq!(read_value(&server, &Identity::Anonymous, &id).status, StatusCode::BAD_NOT_READABLE);
    assert_eq!(write(&server, &Identity::Anonymous, &id, "written"), StatusCode::GOOD);
}

// ---------------------------------------------------------------------------
// Dynamic values
// ---------------------------------------------------------------------------

#[test]
fn dynamic_boolean_sees_both_values() {
    let server = server();
    let id = sim("Simulation/Dynamic/Boolean");
    let items = vec![ReadValueId::value(id); 1000];
    let values = server
        .dispatcher()
        .read(&Identity::Anonymous, 0.0, TimestampsToReturn::Both, &items);

    assert!(values.iter().all(DataValue::is_good));
    assert!(values.iter().any(|v| v.value == Some(Variant::Boolean(true))));
    assert!(values.iter().any(|v| v.value == Some(Variant::Boolean(false))));
}

#[test]
fn dynamic_values_match_their_type() {
    let server = server();
    let int = read_value(&server, &Identity::Anonymous, &sim("Simulation/Dynamic/Int32"));
    assert!(matches!(int.value, Some(Variant::Int32(_))));
    let double = read_value(&server, &Identity::Anonymous, &sim("Simulation/Dynamic/Double"));
    assert!(matches!(double.value, Some(Variant::Double(_))));
}

// ---------------------------------------------------------------------------
// Batches
// ---------------------------------------------------------------------------

#[test]
fn mixed_batch_reports_per_item() {
    let server = server();
    let values = server.dispatcher().read(
        &Identity::Anonymous,
        0.0,
        TimestampsToReturn::Both,
        &[
            ReadValueId::value(sim("Simulation/ScalarNodes/Int32")),
            ReadValueId::value(sim("Simulation/NoSuchNode")),
        ],
    );
    assert_eq!(values.len(), 2);
    assert_eq!(values[0].value, Some(Variant::Int32(32)));
    assert_eq!(values[1].status, StatusCode::BAD_NODE_ID_UNKNOWN);
}

#[test]
fn second_namespace_is_independent() {
    let server = server();
    let first = sim("Simulation/ScalarNodes/Int32");
    let second = NodeId::string(2, "Simulation2/ScalarNodes/Int32");

    assert_eq!(write(&server, &Identity::Anonymous, &first, 1i32), StatusCode::GOOD);
    assert_eq!(read_value(&server, &Identity::Anonymous, &second).value, Some(Variant::Int32(32)));
}

#[test]
fn header_attributes_of_method() {
    let server = server();
    let id = sim("Simulation/sqrt(x)");
    let class = read(&server, &Identity::Anonymous, ReadValueId::new(id.clone(), AttributeId::NodeClass));
    assert_eq!(class.value, Some(Variant::Int32(NodeClass::Method as i32)));
    let description = read(&server, &Identity::Anonymous, ReadValueId::new(id, AttributeId::Description));
    assert!(matches!(description.value, Some(Variant::LocalizedText(ref t)) if t.text.contains("square root")));
}

// ---------------------------------------------------------------------------
// Custom structured values
// ---------------------------------------------------------------------------

#[test]
fn custom_data_type_round_trip() {
    let server = server();
    let id = sim("Simulation/CustomDataTypeVariable");
    let encoding = sim("DataType.CustomDataType.BinaryEncoding");
    let registry = server.dispatcher().registry();

    let initial = read_value(&server, &Identity::Anonymous, &id);
    let Some(Variant::ExtensionObject(xo)) = initial.value else {
        panic!("expected an extension object, got {:?}", initial.value);
    };
    let decoded = CustomDataType::from_structured(&registry.decode_extension_object(&xo).unwrap()).unwrap();
    assert_eq!(decoded, CustomDataType::new("foo", 42, true));

    let updated = CustomDataType {
        foo: None,
        bar: 7,
        baz: false,
    };
    let xo = registry
        .encode_extension_object(&updated.to_structured(encoding.clone()))
        .unwrap();
    assert_eq!(write(&server, &Identity::Anonymous, &id, xo), StatusCode::GOOD);

    let Some(Variant::ExtensionObject(xo)) = read_value(&server, &Identity::Anonymous, &id).value else {
        panic!("expected an extension object");
    };
    let decoded = CustomDataType::from_structured(&registry.decode_extension_object(&xo).unwrap()).unwrap();
    assert_eq!(decoded, updated);
    assert!(server.dispatcher().codec_for(&encoding).is_some());
}

#[test]
fn bad_structured_writes_are_rejected() {
    let server = server();
    let id = sim("Simulation/CustomDataTypeVariable");
    let encoding = sim("DataType.CustomDataType.BinaryEncoding");

    let truncated = ExtensionObject::new(encoding, vec![3, 0, 0, 0, b'f']);
    assert_eq!(write(&server, &Identity::Anonymous, &id, truncated), StatusCode::BAD_DECODING_ERROR);

    let unknown = ExtensionObject::new(sim("Nope.BinaryEncoding"), Vec::new());
    assert_eq!(write(&server, &Identity::Anonymous, &id, unknown), StatusCode::BAD_DECODING_ERROR);

    assert_eq!(write(&server, &Identity::Anonymous, &id, 5i32), StatusCode::BAD_TYPE_MISMATCH);

    let value = read_value(&server, &Identity::Anonymous, &id);
    assert!(value.is_good());
}

// ---------------------------------------------------------------------------
// Methods
// ---------------------------------------------------------------------------

#[test]
fn call_sqrt() {
    let server = server();
    let root = sim("Simulation");
    let method = sim("Simulation/sqrt(x)");

    let result = server
        .dispatcher()
        .call(&Identity::Anonymous, &root, &method, &[Variant::Double(2.25)]);
    assert_eq!(result.status, StatusCode::GOOD);
    assert_eq!(result.output_arguments, vec![Variant::Double(1.5)]);

    let result = server
        .dispatcher()
        .call(&Identity::Anonymous, &root, &method, &[Variant::Int32(4)]);
    assert_eq!(result.status, StatusCode::BAD_INVALID_ARGUMENT);
}

// ---------------------------------------------------------------------------
// Reference symmetry
// ---------------------------------------------------------------------------

#[test]
fn started_server_has_no_asymmetric_references() {
    let server = server();
    assert!(server.space().asymmetric_references(None).is_empty());
    assert!(server.space().asymmetric_references(Some(&ids::ORGANIZES)).is_empty());
}

#[test]
fn forward_only_edge_is_reported() {
    let mut space = AddressSpace::with_core_nodes();
    let mut registry = uasim_codec::TypeRegistry::new();
    NamespaceBuilder::new(1, "urn:test", "Simulation")
        .build(&mut space, &mut registry)
        .unwrap();

    let target = sim("Simulation/Dynamic/Double");
    space
        .add_reference(
            &sim("Simulation"),
            Reference::forward(ids::ORGANIZES, target.clone(), NodeClass::Variable),
        )
        .unwrap();

    let report = space.asymmetric_references(Some(&ids::ORGANIZES));
    assert_eq!(report.len(), 1);
    assert_eq!(report[0].source, sim("Simulation"));
    assert_eq!(report[0].reference.local_target(), Some(&target));
}
