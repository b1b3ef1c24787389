use tracing::debug;
use uasim_space::{AttributeContext, AttributeDelegate, DelegateResult, Next, VariableRef};
use uasim_types::DataValue;

/// Logs every value read or written through it.
///
/// Always forwards first and logs the outcome, so it can sit outside any
/// link that produces values.
#[derive(Clone, Copy, Debug, Default)]
pub struct ValueLoggingDelegate;

impl AttributeDelegate for ValueLoggingDelegate {
    fn name(&self) -> &str {
        "value-logging"
    }

    fn get_value(
        &self,
        ctx: &AttributeContext,
        target: VariableRef<'_>,
        next: Next<'_>,
    ) -> DelegateResult<DataValue> {
        let value = next.get_value(ctx, target)?;
        debug!(
            node = %target.node_id(),
            identity = %ctx.identity,
            value = ?value.value,
            status = %value.status,
            "get value"
        );
        Ok(value)
    }

    fn set_value(
        &self,
        ctx: &AttributeContext,
        target: VariableRef<'_>,
        value: DataValue,
        next: Next<'_>,
    ) -> DelegateResult<()> {
        let logged = value.value.clone();
        next.set_value(ctx, target, value)?;
        debug!(
            node = %target.node_id(),
            identity = %ctx.identity,
            value = ?logged,
            "set value"
        );
        Ok(())
    }
}
