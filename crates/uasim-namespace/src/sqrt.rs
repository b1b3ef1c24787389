use tracing::debug;
use uasim_space::{Argument, DelegateError, DelegateResult, InvocationContext, MethodHandler, MethodNode};
use uasim_types::{ids, StatusCode, Variant};

/// `sqrt(x)`: the correctly rounded positive square root of a Double.
#[derive(Clone, Copy, Debug, Default)]
pub struct SqrtMethod;

impl SqrtMethod {
    pub const DESCRIPTION: &'static str = "Returns the correctly rounded positive square root of a double value.";

    /// Method payload with the declared `x` input and `x_sqrt` output.
    pub fn node(self) -> MethodNode {
        MethodNode::new(std::sync::Arc::new(self))
            .input(Argument::new("x", ids::DOUBLE).describe("A value."))
            .output(Argument::new("x_sqrt", ids::DOUBLE).describe(
                "The positive square root of x. If the argument is NaN or less than zero, the result is NaN.",
            ))
    }
}

impl MethodHandler for SqrtMethod {
    fn invoke(&self, ctx: &InvocationContext<'_>, inputs: &[Variant]) -> DelegateResult<Vec<Variant>> {
        let x = match inputs {
            [Variant::Double(x)] => *x,
            _ => {
                return Err(DelegateError::new(
                    StatusCode::BAD_INVALID_ARGUMENT,
                    "sqrt(x) takes a single Double",
                ))
            }
        };
        debug!(object = %ctx.object.browse_name().name, x, "invoking sqrt()");
        Ok(vec![Variant::Double(x.sqrt())])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uasim_space::Node;
    use uasim_types::{Identity, NodeId};

    fn call(inputs: &[Variant]) -> DelegateResult<Vec<Variant>> {
        let object = Node::folder(NodeId::string(1, "Root"), "Root");
        let method = Node::method(NodeId::string(1, "Root/sqrt(x)"), "sqrt(x)", SqrtMethod.node());
        let ctx = InvocationContext {
            identity: &Identity::Anonymous,
            object: &object,
            method: &method,
        };
        SqrtMethod.invoke(&ctx, inputs)
    }

    #[test]
    fn square_root() {
        assert_eq!(call(&[Variant::Double(16.0)]).unwrap(), vec![Variant::Double(4.0)]);
    }

    #[test]
    fn negative_is_nan() {
        let out = call(&[Variant::Double(-1.0)]).unwrap();
        assert!(matches!(out[..], [Variant::Double(v)] if v.is_nan()));
    }

    #[test]
    fn wrong_input_is_invalid_argument() {
        let err = call(&[Variant::Int32(4)]).unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_INVALID_ARGUMENT);
    }

    #[test]
    fn declares_arguments() {
        let node = SqrtMethod.node();
        assert_eq!(node.input_arguments[0].name, "x");
        assert_eq!(node.output_arguments[0].name, "x_sqrt");
        assert_eq!(node.output_arguments[0].data_type, ids::DOUBLE);
    }
}
