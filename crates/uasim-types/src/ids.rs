//! Well-known namespace-0 node ids.
//!
//! Only the subset used by UASim is listed: the standard folders, the
//! reference types, the base object/variable types, and the built-in data
//! types.

use crate::node_id::NodeId;

/// URI of namespace 0.
pub const CORE_NAMESPACE_URI: &str = "http://opcfoundation.org/UA/";

/// Browse name of the default binary encoding of a structured data type.
pub const DEFAULT_BINARY: &str = "Default Binary";

// Folders
pub const ROOT_FOLDER: NodeId = NodeId::numeric(0, 84);
pub const OBJECTS_FOLDER: NodeId = NodeId::numeric(0, 85);
pub const TYPES_FOLDER: NodeId = NodeId::numeric(0, 86);

// Reference types
pub const HAS_ENCODING: NodeId = NodeId::numeric(0, 38);
pub const HAS_TYPE_DEFINITION: NodeId = NodeId::numeric(0, 40);
pub const HAS_SUBTYPE: NodeId = NodeId::numeric(0, 45);
pub const HAS_PROPERTY: NodeId = NodeId::numeric(0, 46);
pub const HAS_COMPONENT: NodeId = NodeId::numeric(0, 47);
pub const ORGANIZES: NodeId = NodeId::numeric(0, 35);

// Object and variable types
pub const BASE_OBJECT_TYPE: NodeId = NodeId::numeric(0, 58);
pub const FOLDER_TYPE: NodeId = NodeId::numeric(0, 61);
pub const BASE_DATA_VARIABLE_TYPE: NodeId = NodeId::numeric(0, 63);
pub const DATA_TYPE_ENCODING_TYPE: NodeId = NodeId::numeric(0, 76);

// Data types
pub const BOOLEAN: NodeId = NodeId::numeric(0, 1);
pub const SBYTE: NodeId = NodeId::numeric(0, 2);
pub const BYTE: NodeId = NodeId::numeric(0, 3);
pub const INT16: NodeId = NodeId::numeric(0, 4);
pub const UINT16: NodeId = NodeId::numeric(0, 5);
pub const INT32: NodeId = NodeId::numeric(0, 6);
pub const UINT32: NodeId = NodeId::numeric(0, 7);
pub const INT64: NodeId = NodeId::numeric(0, 8);
pub const UINT64: NodeId = NodeId::numeric(0, 9);
pub const FLOAT: NodeId = NodeId::numeric(0, 10);
pub const DOUBLE: NodeId = NodeId::numeric(0, 11);
pub const STRING: NodeId = NodeId::numeric(0, 12);
pub const DATE_TIME: NodeId = NodeId::numeric(0, 13);
pub const GUID: NodeId = NodeId::numeric(0, 14);
pub const BYTE_STRING: NodeId = NodeId::numeric(0, 15);
pub const XML_ELEMENT: NodeId = NodeId::numeric(0, 16);
pub const NODE_ID: NodeId = NodeId::numeric(0, 17);
pub const QUALIFIED_NAME: NodeId = NodeId::numeric(0, 20);
pub const LOCALIZED_TEXT: NodeId = NodeId::numeric(0, 21);
pub const STRUCTURE: NodeId = NodeId::numeric(0, 22);
pub const BASE_DATA_TYPE: NodeId = NodeId::numeric(0, 24);
pub const NUMBER: NodeId = NodeId::numeric(0, 26);
pub const INTEGER: NodeId = NodeId::numeric(0, 27);
pub const UINTEGER: NodeId = NodeId::numeric(0, 28);
pub const DURATION: NodeId = NodeId::numeric(0, 290);
pub const UTC_TIME: NodeId = NodeId::numeric(0, 294);

/// Returns `true` for the built-in (wire-level) data types, i.e. the ones a
/// [`Variant`](crate::Variant) reports as its own type.
pub fn is_builtin_data_type(id: &NodeId) -> bool {
    id.namespace == 0 && matches!(id.as_numeric(), Some(1..=25))
}
