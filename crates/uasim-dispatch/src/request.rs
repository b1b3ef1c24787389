//! Request and result items for batched attribute operations.

use serde::{Deserialize, Serialize};
use uasim_types::{
    AttributeId, ByteString, DataValue, NodeId, QualifiedName, StatusCode, Variant,
};

use crate::error::{AttributeError, AttributeResult};

/// One item of a read batch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadValueId {
    pub node_id: NodeId,
    pub attribute_id: u32,
    pub index_range: Option<String>,
    pub data_encoding: Option<QualifiedName>,
}

impl ReadValueId {
    pub fn new(node_id: NodeId, attribute: AttributeId) -> Self {
        Self {
            node_id,
            attribute_id: attribute as u32,
            index_range: None,
            data_encoding: None,
        }
    }

    /// Read of the Value attribute.
    pub fn value(node_id: NodeId) -> Self {
        Self::new(node_id, AttributeId::Value)
    }

    pub fn with_index_range(mut self, range: impl Into<String>) -> Self {
        self.index_range = Some(range.into());
        self
    }

    pub fn with_data_encoding(mut self, encoding: QualifiedName) -> Self {
        self.data_encoding = Some(encoding);
        self
    }
}

/// One item of a write batch.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WriteValue {
    pub node_id: NodeId,
    pub attribute_id: u32,
    pub index_range: Option<String>,
    pub value: DataValue,
}

impl WriteValue {
    /// Write of the Value attribute.
    pub fn value(node_id: NodeId, value: impl Into<Variant>) -> Self {
        Self {
            node_id,
            attribute_id: AttributeId::Value as u32,
            index_range: None,
            value: DataValue::new(value),
        }
    }
}

/// Result of one write item.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteOutcome {
    pub status: StatusCode,
    /// Why the write was rejected, if it was.
    pub reason: Option<String>,
}

impl WriteOutcome {
    pub fn good() -> Self {
        Self {
            status: StatusCode::GOOD,
            reason: None,
        }
    }

    pub fn is_good(&self) -> bool {
        self.status.is_good()
    }
}

impl From<&AttributeError> for WriteOutcome {
    fn from(err: &AttributeError) -> Self {
        Self {
            status: err.status_code(),
            reason: Some(err.to_string()),
        }
    }
}

/// Result of a method call.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CallResult {
    pub status: StatusCode,
    /// One status per supplied input, set when argument checking fails.
    pub input_argument_results: Vec<StatusCode>,
    pub output_arguments: Vec<Variant>,
}

impl CallResult {
    pub fn error(status: StatusCode) -> Self {
        Self {
            status,
            input_argument_results: Vec::new(),
            output_arguments: Vec::new(),
        }
    }
}

/// Parsed `"n"` or `"a:b"` index range, inclusive at both ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IndexRange {
    pub start: usize,
    pub end: usize,
}

impl IndexRange {
    pub fn parse(text: &str) -> AttributeResult<Self> {
        let invalid = || {
            AttributeError::invalid(
                StatusCode::BAD_INDEX_RANGE_INVALID,
                format!("malformed index range {text:?}"),
            )
        };
        let bound = |s: &str| s.parse::<usize>().map_err(|_| invalid());

        match text.split_once(':') {
            None => {
                let index = bound(text)?;
                Ok(Self {
                    start: index,
                    end: index,
                })
            }
            Some((start, end)) => {
                let (start, end) = (bound(start)?, bound(end)?);
                if start >= end {
                    return Err(invalid());
                }
                Ok(Self { start, end })
            }
        }
    }

    /// Slice a String or ByteString value. The end is clipped to the value's
    /// length; a start past the end is `BadIndexRangeNoData`.
    pub fn apply(&self, value: &Variant) -> AttributeResult<Variant> {
        match value {
            Variant::String(s) => {
                let chars: Vec<char> = s.chars().collect();
                let range = self.clip(chars.len())?;
                Ok(Variant::String(chars[range].iter().collect()))
            }
            Variant::ByteString(b) => {
                let range = self.clip(b.0.len())?;
                Ok(Variant::ByteString(ByteString(b.0[range].to_vec())))
            }
            other => Err(AttributeError::invalid(
                StatusCode::BAD_INDEX_RANGE_NO_DATA,
                format!("{} values cannot be indexed", other.type_name()),
            )),
        }
    }

    fn clip(&self, len: usize) -> AttributeResult<std::ops::Range<usize>> {
        if self.start >= len {
            return Err(AttributeError::invalid(
                StatusCode::BAD_INDEX_RANGE_NO_DATA,
                format!("index {} is past the end ({len})", self.start),
            ));
        }
        Ok(self.start..self.end.min(len - 1) + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_single_and_span() {
        assert_eq!(IndexRange::parse("3").unwrap(), IndexRange { start: 3, end: 3 });
        assert_eq!(IndexRange::parse("1:4").unwrap(), IndexRange { start: 1, end: 4 });
    }

    #[test]
    fn parse_rejects_malformed() {
        for text in ["", "a", "4:1", "2:2", "1:", ":3", "-1"] {
            let err = IndexRange::parse(text).unwrap_err();
            assert_eq!(err.status_code(), StatusCode::BAD_INDEX_RANGE_INVALID, "{text:?}");
        }
    }

    #[test]
    fn apply_to_string_and_bytes() {
        let range = IndexRange::parse("1:3").unwrap();
        assert_eq!(range.apply(&Variant::from("abcdef")).unwrap(), Variant::from("bcd"));
        assert_eq!(
            range.apply(&Variant::ByteString(ByteString(vec![1, 2]))).unwrap(),
            Variant::ByteString(ByteString(vec![2]))
        );
    }

    #[test]
    fn apply_out_of_bounds() {
        let range = IndexRange::parse("10").unwrap();
        let err = range.apply(&Variant::from("abc")).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_INDEX_RANGE_NO_DATA);

        let err = IndexRange::parse("0").unwrap().apply(&Variant::Int32(1)).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_INDEX_RANGE_NO_DATA);
    }
}
