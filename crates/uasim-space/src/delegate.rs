//! Attribute delegate chain.
//!
//! A Variable's Value is produced and consumed by an ordered list of
//! [`AttributeDelegate`] links. Each link receives a [`Next`] continuation
//! for the links inside it; it may handle the call itself, forward it, or
//! forward it and act on the result. When no links remain, the terminal
//! behavior reads or writes the node's stored value.

use std::fmt;
use std::sync::Arc;

use uasim_types::{DataValue, Identity};

use crate::error::DelegateResult;
use crate::variable::VariableRef;

/// Per-call context handed to every delegate link.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AttributeContext {
    pub identity: Identity,
}

impl AttributeContext {
    pub fn new(identity: Identity) -> Self {
        Self { identity }
    }
}

/// One link in a Variable's delegate chain.
///
/// Both methods default to forwarding, so a link only overrides what it
/// intercepts.
pub trait AttributeDelegate: Send + Sync {
    /// Short name used in logs and diagnostics.
    fn name(&self) -> &str;

    fn get_value(
        &self,
        ctx: &AttributeContext,
        target: VariableRef<'_>,
        next: Next<'_>,
    ) -> DelegateResult<DataValue> {
        next.get_value(ctx, target)
    }

    fn set_value(
        &self,
        ctx: &AttributeContext,
        target: VariableRef<'_>,
        value: DataValue,
        next: Next<'_>,
    ) -> DelegateResult<()> {
        next.set_value(ctx, target, value)
    }
}

/// Continuation over the links inside the current one.
#[derive(Clone, Copy)]
pub struct Next<'a> {
    remaining: &'a [Arc<dyn AttributeDelegate>],
}

impl<'a> Next<'a> {
    pub fn get_value(self, ctx: &AttributeContext, target: VariableRef<'_>) -> DelegateResult<DataValue> {
        match self.remaining.split_first() {
            Some((link, rest)) => link.get_value(ctx, target, Next { remaining: rest }),
            None => Ok(target.variable.stored_value()),
        }
    }

    pub fn set_value(
        self,
        ctx: &AttributeContext,
        target: VariableRef<'_>,
        value: DataValue,
    ) -> DelegateResult<()> {
        match self.remaining.split_first() {
            Some((link, rest)) => link.set_value(ctx, target, value, Next { remaining: rest }),
            None => {
                target.variable.store_value(value);
                Ok(())
            }
        }
    }
}

/// Ordered delegate links, outermost first.
#[derive(Clone, Default)]
pub struct DelegateChain {
    links: Vec<Arc<dyn AttributeDelegate>>,
}

impl DelegateChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, link: Arc<dyn AttributeDelegate>) {
        self.links.push(link);
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.links.iter().map(|link| link.name()).collect()
    }

    /// Run a read through the whole chain.
    pub fn get_value(&self, ctx: &AttributeContext, target: VariableRef<'_>) -> DelegateResult<DataValue> {
        Next {
            remaining: &self.links,
        }
        .get_value(ctx, target)
    }

    /// Run a write through the whole chain.
    pub fn set_value(
        &self,
        ctx: &AttributeContext,
        target: VariableRef<'_>,
        value: DataValue,
    ) -> DelegateResult<()> {
        Next {
            remaining: &self.links,
        }
        .set_value(ctx, target, value)
    }
}

impl fmt::Debug for DelegateChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
