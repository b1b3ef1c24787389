use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use uasim_types::{ids, AccessLevel, DataValue, NodeId};

use crate::delegate::{AttributeDelegate, DelegateChain};
use crate::node::Node;
use crate::policy::AccessPolicy;

/// Payload of a Variable node.
///
/// The stored value sits behind a lock so it can be read and written
/// through a shared address space; every other field is fixed once the
/// node is built.
pub struct VariableNode {
    pub data_type: NodeId,
    /// `-1` for scalars.
    pub value_rank: i32,
    pub type_definition: NodeId,
    pub access_level: AccessLevel,
    pub user_access_level: AccessLevel,
    value: RwLock<DataValue>,
    chain: DelegateChain,
    access_policy: Option<Arc<dyn AccessPolicy>>,
}

impl VariableNode {
    /// A read-only scalar variable of `data_type` holding `value`.
    pub fn new(data_type: NodeId, value: DataValue) -> Self {
        Self {
            data_type,
            value_rank: -1,
            type_definition: ids::BASE_DATA_VARIABLE_TYPE,
            access_level: AccessLevel::READ_ONLY,
            user_access_level: AccessLevel::READ_ONLY,
            value: RwLock::new(value),
            chain: DelegateChain::default(),
            access_policy: None,
        }
    }

    pub fn access_level(mut self, level: AccessLevel) -> Self {
        self.access_level = level;
        self
    }

    pub fn user_access_level(mut self, level: AccessLevel) -> Self {
        self.user_access_level = level;
        self
    }

    /// Set both the static and the user access level.
    pub fn access(self, level: AccessLevel) -> Self {
        self.access_level(level).user_access_level(level)
    }

    /// Append a delegate link. Links added first are outermost.
    pub fn delegate(mut self, link: Arc<dyn AttributeDelegate>) -> Self {
        self.chain.push(link);
        self
    }

    pub fn access_policy(mut self, policy: Arc<dyn AccessPolicy>) -> Self {
        self.access_policy = Some(policy);
        self
    }

    pub fn chain(&self) -> &DelegateChain {
        &self.chain
    }

    pub fn policy(&self) -> Option<&Arc<dyn AccessPolicy>> {
        self.access_policy.as_ref()
    }

    /// Snapshot of the stored value.
    pub fn stored_value(&self) -> DataValue {
        self.value
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the stored value.
    pub fn store_value(&self, value: DataValue) {
        *self.value.write().unwrap_or_else(PoisonError::into_inner) = value;
    }

    /// Copy of this declaration for an object-type instance. The copy shares
    /// the delegate links and policy but owns its own value.
    pub fn instance_copy(&self) -> Self {
        Self {
            data_type: self.data_type.clone(),
            value_rank: self.value_rank,
            type_definition: self.type_definition.clone(),
            access_level: self.access_level,
            user_access_level: self.user_access_level,
            value: RwLock::new(self.stored_value()),
            chain: self.chain.clone(),
            access_policy: self.access_policy.clone(),
        }
    }
}

impl fmt::Debug for VariableNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VariableNode")
            .field("data_type", &self.data_type)
            .field("value_rank", &self.value_rank)
            .field("access_level", &self.access_level)
            .field("user_access_level", &self.user_access_level)
            .field("value", &self.stored_value())
            .field("chain", &self.chain)
            .field("has_policy", &self.access_policy.is_some())
            .finish()
    }
}

/// A borrowed Variable node: the node header plus its variable payload.
#[derive(Clone, Copy, Debug)]
pub struct VariableRef<'a> {
    pub node: &'a Node,
    pub variable: &'a VariableNode,
}

impl<'a> VariableRef<'a> {
    pub fn node_id(&self) -> &'a NodeId {
        self.node.node_id()
    }

    pub fn data_type(&self) -> &'a NodeId {
        &self.variable.data_type
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_read_only_scalar() {
        let v = VariableNode::new(ids::STRING, DataValue::new("x"));
        assert_eq!(v.value_rank, -1);
        assert_eq!(v.access_level, AccessLevel::READ_ONLY);
        assert_eq!(v.type_definition, ids::BASE_DATA_VARIABLE_TYPE);
        assert!(v.chain().is_empty());
    }

    #[test]
    fn store_replaces_value() {
        let v = VariableNode::new(ids::INT32, DataValue::new(1i32));
        v.store_value(DataValue::new(2i32));
        assert_eq!(v.stored_value().value, Some(2i32.into()));
    }

    #[test]
    fn instance_copy_owns_its_value() {
        let decl = VariableNode::new(ids::INT16, DataValue::new(0i16)).access(AccessLevel::READ_WRITE);
        let copy = decl.instance_copy();
        copy.store_value(DataValue::new(5i16));
        assert_eq!(decl.stored_value().value, Some(0i16.into()));
        assert_eq!(copy.access_level, AccessLevel::READ_WRITE);
    }
}
