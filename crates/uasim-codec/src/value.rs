use serde::{Deserialize, Serialize};
use uasim_types::{NodeId, Variant};

use crate::descriptor::FieldDescriptor;
use crate::error::{CodecError, CodecResult};

/// A decoded structured value: an encoding id plus its fields in wire order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StructuredValue {
    pub encoding_id: NodeId,
    pub fields: Vec<(String, Variant)>,
}

impl StructuredValue {
    pub fn new(encoding_id: NodeId) -> Self {
        Self {
            encoding_id,
            fields: Vec::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Variant>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    /// Value of the named field.
    pub fn get(&self, name: &str) -> Option<&Variant> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    /// Value of the named field, or a `FieldMismatch` error naming it.
    pub fn require(&self, name: &str) -> CodecResult<&Variant> {
        self.get(name).ok_or_else(|| CodecError::FieldMismatch {
            index: self.fields.len(),
            name: name.to_string(),
            expected: "present".into(),
            actual: "missing".into(),
        })
    }
}

/// A Rust type with a fixed structured layout.
///
/// Implementors convert to and from the generic [`StructuredValue`] so the
/// registry can encode them.
pub trait StructuredType: Sized {
    /// Type name as registered in its dictionary.
    const TYPE_NAME: &'static str;

    /// Field layout in wire order.
    fn fields() -> Vec<FieldDescriptor>;

    fn to_structured(&self, encoding_id: NodeId) -> StructuredValue;

    fn from_structured(value: &StructuredValue) -> CodecResult<Self>;
}
