//! Per-read random values.
//!
//! [`DynamicValueDelegate`] ignores a Variable's stored value and draws a
//! fresh one of the node's DataType on every read, from an injected
//! [`RandomSource`].

use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use uasim_space::{AttributeContext, AttributeDelegate, DelegateError, DelegateResult, Next, VariableRef};
use uasim_types::{ids, DataValue, NodeId, StatusCode, Variant};
use uuid::Uuid;

/// Source of random draws. Must be safe to share across threads.
pub trait RandomSource: Send + Sync {
    fn next_u64(&self) -> u64;

    /// Uniform in `[0, 1)`.
    fn next_f64(&self) -> f64;

    fn next_bool(&self) -> bool {
        self.next_u64() & 1 == 1
    }
}

/// Draws from the calling thread's RNG; no shared state between threads.
#[derive(Clone, Copy, Debug, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn next_u64(&self) -> u64 {
        rand::thread_rng().gen()
    }

    fn next_f64(&self) -> f64 {
        rand::thread_rng().gen()
    }

    fn next_bool(&self) -> bool {
        rand::thread_rng().gen()
    }
}

/// Reproducible sequence from a fixed seed.
#[derive(Debug)]
pub struct SeededRandom {
    rng: Mutex<StdRng>,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl RandomSource for SeededRandom {
    fn next_u64(&self) -> u64 {
        self.rng.lock().unwrap_or_else(PoisonError::into_inner).gen()
    }

    fn next_f64(&self) -> f64 {
        self.rng.lock().unwrap_or_else(PoisonError::into_inner).gen()
    }
}

/// Read-side value generator. Writes pass through to the next link.
#[derive(Clone)]
pub struct DynamicValueDelegate {
    source: Arc<dyn RandomSource>,
}

impl DynamicValueDelegate {
    pub fn new(source: Arc<dyn RandomSource>) -> Self {
        Self { source }
    }

    /// A fresh value of `data_type`, or `None` if it cannot be generated.
    pub fn generate(&self, data_type: &NodeId) -> Option<Variant> {
        let s = &self.source;
        // Truncating casts are intended: any bit pattern is a valid draw.
        let value = match data_type {
            t if *t == ids::BOOLEAN => Variant::Boolean(s.next_bool()),
            t if *t == ids::SBYTE => Variant::SByte(s.next_u64() as i8),
            t if *t == ids::BYTE => Variant::Byte(s.next_u64() as u8),
            t if *t == ids::INT16 => Variant::Int16(s.next_u64() as i16),
            t if *t == ids::UINT16 => Variant::UInt16(s.next_u64() as u16),
            t if *t == ids::INT32 => Variant::Int32(s.next_u64() as i32),
            t if *t == ids::UINT32 => Variant::UInt32(s.next_u64() as u32),
            t if *t == ids::INT64 => Variant::Int64(s.next_u64() as i64),
            t if *t == ids::UINT64 => Variant::UInt64(s.next_u64()),
            t if *t == ids::FLOAT => Variant::Float(s.next_f64() as f32),
            t if *t == ids::DOUBLE || *t == ids::DURATION => Variant::Double(s.next_f64()),
            t if *t == ids::STRING => Variant::String(format!("{:016x}", s.next_u64())),
            t if *t == ids::DATE_TIME || *t == ids::UTC_TIME => Variant::DateTime(Utc::now()),
            t if *t == ids::GUID => Variant::Guid(Uuid::from_u64_pair(s.next_u64(), s.next_u64())),
            _ => return None,
        };
        Some(value)
    }
}

impl Default for DynamicValueDelegate {
    fn default() -> Self {
        Self::new(Arc::new(ThreadRandom))
    }
}

impl AttributeDelegate for DynamicValueDelegate {
    fn name(&self) -> &str {
        "dynamic-value"
    }

    fn get_value(
        &self,
        _ctx: &AttributeContext,
        target: VariableRef<'_>,
        _next: Next<'_>,
    ) -> DelegateResult<DataValue> {
        self.generate(target.data_type())
            .map(DataValue::new)
            .ok_or_else(|| {
                DelegateError::new(
                    StatusCode::BAD_NOT_SUPPORTED,
                    format!("cannot generate values of type {}", target.data_type()),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uasim_space::{DelegateChain, Node, VariableNode};

    fn read(delegate: DynamicValueDelegate, data_type: NodeId) -> DelegateResult<DataValue> {
        let node = Node::variable(
            NodeId::string(1, "d"),
            "d",
            VariableNode::new(data_type, DataValue::new(false)),
        );
        let target = node.as_variable().unwrap();
        let mut chain = DelegateChain::new();
        chain.push(Arc::new(delegate));
        chain.get_value(&AttributeContext::default(), target)
    }

    #[test]
    fn value_kind_follows_data_type() {
        let delegate = DynamicValueDelegate::new(Arc::new(SeededRandom::new(7)));
        for (data_type, kind) in [
            (ids::BOOLEAN, "Boolean"),
            (ids::INT32, "Int32"),
            (ids::DOUBLE, "Double"),
            (ids::DURATION, "Double"),
            (ids::STRING, "String"),
            (ids::GUID, "Guid"),
            (ids::UTC_TIME, "DateTime"),
        ] {
            let value = delegate.generate(&data_type).unwrap();
            assert_eq!(value.type_name(), kind, "{data_type}");
        }
    }

    #[test]
    fn seeded_sources_repeat() {
        let a = SeededRandom::new(42);
        let b = SeededRandom::new(42);
        let xs: Vec<u64> = (0..8).map(|_| a.next_u64()).collect();
        let ys: Vec<u64> = (0..8).map(|_| b.next_u64()).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn doubles_are_unit_interval() {
        let source = ThreadRandom;
        for _ in 0..1000 {
            let x = source.next_f64();
            assert!((0.0..1.0).contains(&x));
        }
    }

    #[test]
    fn ignores_stored_value() {
        let mut seen = [false; 2];
        for _ in 0..1000 {
            let value = read(DynamicValueDelegate::default(), ids::BOOLEAN).unwrap();
            if let Some(Variant::Boolean(b)) = value.value {
                seen[usize::from(b)] = true;
            }
        }
        assert_eq!(seen, [true, true]);
    }

    #[test]
    fn unsupported_type_is_an_error() {
        let err = read(DynamicValueDelegate::default(), ids::XML_ELEMENT).unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_NOT_SUPPORTED);
    }
}
