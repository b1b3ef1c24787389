//! Batched attribute access over a built address space.
//!
//! Every item in a batch is resolved independently: a failure becomes that
//! item's status code and never affects its siblings.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};
use uasim_codec::{StructuredTypeDescriptor, TypeRegistry};
use uasim_space::{
    AccessOperation, AddressSpace, AttributeContext, InvocationContext, MethodHandler, Node,
    NodeKind, Reference,
};
use uasim_types::{
    ids, AttributeId, DataValue, Identity, LocalizedText, NodeId, StatusCode,
    TimestampsToReturn, Variant,
};

use crate::access;
use crate::error::{AttributeError, AttributeResult};
use crate::request::{CallResult, IndexRange, ReadValueId, WriteOutcome, WriteValue};
use crate::typecheck::check_assignable;

/// Routes read, write, browse and call requests to nodes.
#[derive(Clone, Debug)]
pub struct AttributeDispatcher {
    space: Arc<AddressSpace>,
    registry: Arc<TypeRegistry>,
}

impl AttributeDispatcher {
    pub fn new(space: Arc<AddressSpace>, registry: Arc<TypeRegistry>) -> Self {
        Self { space, registry }
    }

    pub fn space(&self) -> &AddressSpace {
        &self.space
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Codec lookup by binary-encoding id.
    pub fn codec_for(&self, encoding_id: &NodeId) -> Option<&StructuredTypeDescriptor> {
        self.registry.codec_for(encoding_id)
    }

    /// Every reference stored on a node, unfiltered.
    pub fn browse(&self, node_id: &NodeId) -> AttributeResult<Vec<Reference>> {
        self.space
            .browse(node_id)
            .map(<[Reference]>::to_vec)
            .map_err(|_| AttributeError::NodeNotFound(node_id.clone()))
    }

    // ---------------------------------------------------------------
    // Read
    // ---------------------------------------------------------------

    /// Read a batch. Returns one result per item, in order.
    ///
    /// A negative or NaN `max_age` fails every item with `BadMaxAgeInvalid`.
    pub fn read(
        &self,
        identity: &Identity,
        max_age: f64,
        timestamps: TimestampsToReturn,
        items: &[ReadValueId],
    ) -> Vec<DataValue> {
        if max_age.is_nan() || max_age < 0.0 {
            return items
                .iter()
                .map(|_| DataValue::error(StatusCode::BAD_MAX_AGE_INVALID))
                .collect();
        }

        let now = Utc::now();
        items
            .iter()
            .map(|item| match self.read_one(identity, item) {
                Ok(value) => value.with_timestamps(timestamps, now),
                Err(err) => {
                    debug!(node = %item.node_id, attribute = item.attribute_id, error = %err, "read failed");
                    DataValue::error(err.status_code())
                }
            })
            .collect()
    }

    fn read_one(&self, identity: &Identity, item: &ReadValueId) -> AttributeResult<DataValue> {
        let node = self
            .space
            .get(&item.node_id)
            .ok_or_else(|| AttributeError::NodeNotFound(item.node_id.clone()))?;
        let attribute = AttributeId::try_from(item.attribute_id).map_err(|_| {
            AttributeError::AttributeUnsupported {
                node_id: item.node_id.clone(),
                attribute: item.attribute_id,
            }
        })?;

        if let Some(encoding) = &item.data_encoding {
            if attribute != AttributeId::Value {
                return Err(AttributeError::invalid(
                    StatusCode::BAD_DATA_ENCODING_INVALID,
                    format!("data encoding is not allowed for {attribute}"),
                ));
            }
            if encoding.namespace_index != 0 || encoding.name != ids::DEFAULT_BINARY {
                return Err(AttributeError::invalid(
                    StatusCode::BAD_DATA_ENCODING_UNSUPPORTED,
                    format!("unsupported data encoding {encoding}"),
                ));
            }
        }

        let range = item.index_range.as_deref().map(IndexRange::parse).transpose()?;

        let mut value = match attribute {
            AttributeId::Value => self.read_value(identity, node)?,
            other => DataValue::attribute(self.attribute_value(identity, node, other)?),
        };

        if let Some(range) = range {
            if attribute != AttributeId::Value {
                return Err(AttributeError::invalid(
                    StatusCode::BAD_INDEX_RANGE_INVALID,
                    format!("index range is not allowed for {attribute}"),
                ));
            }
            if let Some(v) = &value.value {
                value.value = Some(range.apply(v)?);
            }
        }
        Ok(value)
    }

    fn read_value(&self, identity: &Identity, node: &Node) -> AttributeResult<DataValue> {
        let target = node.as_variable().ok_or_else(|| self.unsupported(node, AttributeId::Value))?;
        access::check(identity, target, AccessOperation::Read)?;
        let ctx = AttributeContext::new(identity.clone());
        Ok(target.variable.chain().get_value(&ctx, target)?)
    }

    /// Non-Value attributes, computed from the node's fixed fields.
    fn attribute_value(&self, identity: &Identity, node: &Node, attribute: AttributeId) -> AttributeResult<Variant> {
        let header = &node.header;
        let value = match (attribute, &node.kind) {
            (AttributeId::NodeId, _) => Variant::NodeId(header.node_id.clone()),
            (AttributeId::NodeClass, _) => Variant::Int32(node.node_class() as i32),
            (AttributeId::BrowseName, _) => Variant::QualifiedName(header.browse_name.clone()),
            (AttributeId::DisplayName, _) => Variant::LocalizedText(header.display_name.clone()),
            (AttributeId::Description, _) => Variant::LocalizedText(
                header
                    .description
                    .clone()
                    .unwrap_or_else(|| LocalizedText::new(None, "")),
            ),
            (AttributeId::IsAbstract, _) => match node.is_abstract() {
                Some(is_abstract) => Variant::Boolean(is_abstract),
                None => return Err(self.unsupported(node, attribute)),
            },
            (AttributeId::DataType, NodeKind::Variable(v)) => Variant::NodeId(v.data_type.clone()),
            (AttributeId::DataType, NodeKind::VariableType(t)) => Variant::NodeId(t.data_type.clone()),
            (AttributeId::ValueRank, NodeKind::Variable(v)) => Variant::Int32(v.value_rank),
            (AttributeId::AccessLevel, NodeKind::Variable(v)) => Variant::Byte(v.access_level.bits()),
            (AttributeId::UserAccessLevel, NodeKind::Variable(_)) => {
                let target = node.as_variable().ok_or_else(|| self.unsupported(node, attribute))?;
                let level = access::effective_level(identity, target, AccessOperation::Read);
                Variant::Byte(level.bits())
            }
            (AttributeId::Executable, NodeKind::Method(m)) => Variant::Boolean(m.executable),
            (AttributeId::UserExecutable, NodeKind::Method(m)) => Variant::Boolean(m.user_executable),
            _ => return Err(self.unsupported(node, attribute)),
        };
        Ok(value)
    }

    fn unsupported(&self, node: &Node, attribute: AttributeId) -> AttributeError {
        AttributeError::AttributeUnsupported {
            node_id: node.node_id().clone(),
            attribute: attribute as u32,
        }
    }

    // ---------------------------------------------------------------
    // Write
    // ---------------------------------------------------------------

    /// Write a batch. Returns one outcome per item, in order.
    pub fn write(&self, identity: &Identity, items: &[WriteValue]) -> Vec<WriteOutcome> {
        items
            .iter()
            .map(|item| match self.write_one(identity, item) {
                Ok(()) => {
                    info!(
                        node = %item.node_id,
                        attribute = item.attribute_id,
                        identity = %identity,
                        value = ?item.value.value,
                        "wrote value"
                    );
                    WriteOutcome::good()
                }
                Err(err) => {
                    warn!(node = %item.node_id, identity = %identity, error = %err, "write rejected");
                    WriteOutcome::from(&err)
                }
            })
            .collect()
    }

    fn write_one(&self, identity: &Identity, item: &WriteValue) -> AttributeResult<()> {
        let node = self
            .space
            .get(&item.node_id)
            .ok_or_else(|| AttributeError::NodeNotFound(item.node_id.clone()))?;
        let attribute = AttributeId::try_from(item.attribute_id).map_err(|_| {
            AttributeError::AttributeUnsupported {
                node_id: item.node_id.clone(),
                attribute: item.attribute_id,
            }
        })?;
        if attribute != AttributeId::Value {
            return Err(AttributeError::rejected(
                StatusCode::BAD_NOT_WRITABLE,
                format!("{attribute} is not writable"),
            ));
        }
        let target = node.as_variable().ok_or_else(|| self.unsupported(node, attribute))?;
        if item.index_range.is_some() {
            return Err(AttributeError::rejected(
                StatusCode::BAD_WRITE_NOT_SUPPORTED,
                "index range writes are not supported",
            ));
        }

        access::check(identity, target, AccessOperation::Write)?;

        let value = item.value.value.as_ref().unwrap_or(&Variant::Empty);
        check_assignable(&self.space, &self.registry, target.data_type(), value)?;

        let mut stored = item.value.clone();
        stored.source_timestamp.get_or_insert_with(Utc::now);
        stored.server_timestamp = None;

        let ctx = AttributeContext::new(identity.clone());
        target.variable.chain().set_value(&ctx, target, stored)?;
        Ok(())
    }

    // ---------------------------------------------------------------
    // Call
    // ---------------------------------------------------------------

    /// Handler registered on a Method node.
    pub fn invocation_handler(&self, method_id: &NodeId) -> Option<&Arc<dyn MethodHandler>> {
        self.space.get(method_id)?.as_method().map(|m| m.handler())
    }

    /// Call `method_id` on `object_id` after checking the inputs against the
    /// method's declared arguments.
    pub fn call(&self, identity: &Identity, object_id: &NodeId, method_id: &NodeId, inputs: &[Variant]) -> CallResult {
        let Some(object) = self.space.get(object_id) else {
            return CallResult::error(StatusCode::BAD_NODE_ID_UNKNOWN);
        };
        let Some(method_node) = self.space.get(method_id) else {
            return CallResult::error(StatusCode::BAD_METHOD_INVALID);
        };
        let Some(method) = method_node.as_method() else {
            return CallResult::error(StatusCode::BAD_METHOD_INVALID);
        };
        let is_component = object
            .forward_references(&ids::HAS_COMPONENT)
            .any(|r| r.local_target() == Some(method_id));
        if !is_component {
            return CallResult::error(StatusCode::BAD_METHOD_INVALID);
        }
        if !(method.executable && method.user_executable) {
            return CallResult::error(StatusCode::BAD_USER_ACCESS_DENIED);
        }

        let declared = &method.input_arguments;
        if inputs.len() < declared.len() {
            return CallResult::error(StatusCode::BAD_ARGUMENTS_MISSING);
        }
        if inputs.len() > declared.len() {
            return CallResult::error(StatusCode::BAD_TOO_MANY_ARGUMENTS);
        }

        let input_results: Vec<StatusCode> = declared
            .iter()
            .zip(inputs)
            .map(|(arg, input)| {
                check_assignable(&self.space, &self.registry, &arg.data_type, input)
                    .map_or_else(|_| StatusCode::BAD_TYPE_MISMATCH, |()| StatusCode::GOOD)
            })
            .collect();
        if input_results.iter().any(StatusCode::is_bad) {
            return CallResult {
                status: StatusCode::BAD_INVALID_ARGUMENT,
                input_argument_results: input_results,
                output_arguments: Vec::new(),
            };
        }

        let ctx = InvocationContext {
            identity,
            object,
            method: method_node,
        };
        match method.handler().invoke(&ctx, inputs) {
            Ok(outputs) => {
                debug!(object = %object_id, method = %method_id, "method invoked");
                CallResult {
                    status: StatusCode::GOOD,
                    input_argument_results: input_results,
                    output_arguments: outputs,
                }
            }
            Err(err) => {
                warn!(object = %object_id, method = %method_id, error = %err, "method failed");
                CallResult::error(err.status)
            }
        }
    }
}
