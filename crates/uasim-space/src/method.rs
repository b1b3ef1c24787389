//! Method nodes and their typed invocation handlers.

use std::fmt;
use std::sync::Arc;

use uasim_types::{Identity, LocalizedText, NodeId, Variant};

use crate::error::DelegateResult;
use crate::node::Node;

/// Declared input or output parameter of a method.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Argument {
    pub name: String,
    pub data_type: NodeId,
    pub value_rank: i32,
    pub description: Option<LocalizedText>,
}

impl Argument {
    /// A scalar argument.
    pub fn new(name: impl Into<String>, data_type: NodeId) -> Self {
        Self {
            name: name.into(),
            data_type,
            value_rank: -1,
            description: None,
        }
    }

    pub fn describe(mut self, text: impl Into<String>) -> Self {
        self.description = Some(LocalizedText::english(text));
        self
    }
}

/// What a handler sees of the call it is serving.
#[derive(Clone, Copy, Debug)]
pub struct InvocationContext<'a> {
    pub identity: &'a Identity,
    /// The object the method was called on.
    pub object: &'a Node,
    pub method: &'a Node,
}

/// Typed method body. Inputs have already been checked against the
/// method's declared input arguments.
pub trait MethodHandler: Send + Sync {
    fn invoke(&self, ctx: &InvocationContext<'_>, inputs: &[Variant]) -> DelegateResult<Vec<Variant>>;
}

/// Payload of a Method node.
pub struct MethodNode {
    pub input_arguments: Vec<Argument>,
    pub output_arguments: Vec<Argument>,
    pub executable: bool,
    pub user_executable: bool,
    handler: Arc<dyn MethodHandler>,
}

impl MethodNode {
    pub fn new(handler: Arc<dyn MethodHandler>) -> Self {
        Self {
            input_arguments: Vec::new(),
            output_arguments: Vec::new(),
            executable: true,
            user_executable: true,
            handler,
        }
    }

    pub fn input(mut self, argument: Argument) -> Self {
        self.input_arguments.push(argument);
        self
    }

    pub fn output(mut self, argument: Argument) -> Self {
        self.output_arguments.push(argument);
        self
    }

    pub fn handler(&self) -> &Arc<dyn MethodHandler> {
        &self.handler
    }
}

impl fmt::Debug for MethodNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodNode")
            .field("input_arguments", &self.input_arguments)
            .field("output_arguments", &self.output_arguments)
            .field("executable", &self.executable)
            .field("user_executable", &self.user_executable)
            .finish_non_exhaustive()
    }
}
