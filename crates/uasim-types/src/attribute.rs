use std::fmt;
use std::ops::{BitAnd, BitOr};

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Node attributes addressable by read and write requests.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u32)]
pub enum AttributeId {
    NodeId = 1,
    NodeClass = 2,
    BrowseName = 3,
    DisplayName = 4,
    Description = 5,
    WriteMask = 6,
    UserWriteMask = 7,
    IsAbstract = 8,
    Symmetric = 9,
    InverseName = 10,
    ContainsNoLoops = 11,
    EventNotifier = 12,
    Value = 13,
    DataType = 14,
    ValueRank = 15,
    ArrayDimensions = 16,
    AccessLevel = 17,
    UserAccessLevel = 18,
    MinimumSamplingInterval = 19,
    Historizing = 20,
    Executable = 21,
    UserExecutable = 22,
}

impl AttributeId {
    const ALL: [AttributeId; 22] = [
        Self::NodeId,
        Self::NodeClass,
        Self::BrowseName,
        Self::DisplayName,
        Self::Description,
        Self::WriteMask,
        Self::UserWriteMask,
        Self::IsAbstract,
        Self::Symmetric,
        Self::InverseName,
        Self::ContainsNoLoops,
        Self::EventNotifier,
        Self::Value,
        Self::DataType,
        Self::ValueRank,
        Self::ArrayDimensions,
        Self::AccessLevel,
        Self::UserAccessLevel,
        Self::MinimumSamplingInterval,
        Self::Historizing,
        Self::Executable,
        Self::UserExecutable,
    ];

    /// Look up an attribute by name (case-insensitive), e.g. `"value"`.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|attr| format!("{attr:?}").eq_ignore_ascii_case(name))
    }
}

impl TryFrom<u32> for AttributeId {
    type Error = TypeError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|attr| *attr as u32 == value)
            .ok_or(TypeError::UnknownAttribute(value))
    }
}

impl fmt::Display for AttributeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Classification of a node, as reported by the NodeClass attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum NodeClass {
    Object = 1,
    Variable = 2,
    Method = 4,
    ObjectType = 8,
    VariableType = 16,
    ReferenceType = 32,
    DataType = 64,
    View = 128,
}

/// Bitmask describing whether an attribute value may be read and/or written.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccessLevel(u8);

impl AccessLevel {
    pub const NONE: AccessLevel = AccessLevel(0);
    pub const CURRENT_READ: AccessLevel = AccessLevel(0x01);
    pub const CURRENT_WRITE: AccessLevel = AccessLevel(0x02);
    pub const READ_ONLY: AccessLevel = Self::CURRENT_READ;
    pub const WRITE_ONLY: AccessLevel = Self::CURRENT_WRITE;
    pub const READ_WRITE: AccessLevel = AccessLevel(0x03);

    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    pub const fn bits(&self) -> u8 {
        self.0
    }

    pub fn contains(&self, other: AccessLevel) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_readable(&self) -> bool {
        self.contains(Self::CURRENT_READ)
    }

    pub fn is_writable(&self) -> bool {
        self.contains(Self::CURRENT_WRITE)
    }
}

impl BitAnd for AccessLevel {
    type Output = AccessLevel;

    fn bitand(self, rhs: Self) -> Self::Output {
        AccessLevel(self.0 & rhs.0)
    }
}

impl BitOr for AccessLevel {
    type Output = AccessLevel;

    fn bitor(self, rhs: Self) -> Self::Output {
        AccessLevel(self.0 | rhs.0)
    }
}

impl fmt::Debug for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccessLevel({self})")
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match (self.is_readable(), self.is_writable()) {
            (true, true) => "read-write",
            (true, false) => "read-only",
            (false, true) => "write-only",
            (false, false) => "none",
        };
        write!(f, "{text}")
    }
}
