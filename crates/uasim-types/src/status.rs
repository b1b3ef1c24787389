use std::fmt;

use serde::{Deserialize, Serialize};

/// A 32-bit result code. The top two bits carry the severity: `00` good,
/// `01` uncertain, `10` bad.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatusCode(u32);

macro_rules! status_codes {
    ($($name:ident = $value:literal, $text:literal;)*) => {
        impl StatusCode {
            $(pub const $name: StatusCode = StatusCode($value);)*

            /// Symbolic name of a known code.
            pub fn name(&self) -> Option<&'static str> {
                match self.0 {
                    $($value => Some($text),)*
                    _ => None,
                }
            }
        }
    };
}

status_codes! {
    GOOD = 0x0000_0000, "Good";
    BAD_INTERNAL_ERROR = 0x8002_0000, "Bad_InternalError";
    BAD_DECODING_ERROR = 0x8007_0000, "Bad_DecodingError";
    BAD_USER_ACCESS_DENIED = 0x801F_0000, "Bad_UserAccessDenied";
    BAD_NODE_ID_UNKNOWN = 0x8034_0000, "Bad_NodeIdUnknown";
    BAD_ATTRIBUTE_ID_INVALID = 0x8035_0000, "Bad_AttributeIdInvalid";
    BAD_INDEX_RANGE_INVALID = 0x8036_0000, "Bad_IndexRangeInvalid";
    BAD_INDEX_RANGE_NO_DATA = 0x8037_0000, "Bad_IndexRangeNoData";
    BAD_DATA_ENCODING_INVALID = 0x8038_0000, "Bad_DataEncodingInvalid";
    BAD_DATA_ENCODING_UNSUPPORTED = 0x8039_0000, "Bad_DataEncodingUnsupported";
    BAD_NOT_READABLE = 0x803A_0000, "Bad_NotReadable";
    BAD_NOT_WRITABLE = 0x803B_0000, "Bad_NotWritable";
    BAD_NOT_SUPPORTED = 0x803D_0000, "Bad_NotSupported";
    BAD_METHOD_INVALID = 0x8075_0000, "Bad_MethodInvalid";
    BAD_ARGUMENTS_MISSING = 0x8076_0000, "Bad_ArgumentsMissing";
    BAD_MAX_AGE_INVALID = 0x8070_0000, "Bad_MaxAgeInvalid";
    BAD_WRITE_NOT_SUPPORTED = 0x8073_0000, "Bad_WriteNotSupported";
    BAD_TYPE_MISMATCH = 0x8074_0000, "Bad_TypeMismatch";
    BAD_INVALID_ARGUMENT = 0x80AB_0000, "Bad_InvalidArgument";
    BAD_TOO_MANY_ARGUMENTS = 0x80E5_0000, "Bad_TooManyArguments";
}

impl StatusCode {
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn bits(&self) -> u32 {
        self.0
    }

    pub fn is_good(&self) -> bool {
        self.0 & 0xC000_0000 == 0
    }

    pub fn is_bad(&self) -> bool {
        self.0 & 0x8000_0000 != 0
    }
}

impl Default for StatusCode {
    fn default() -> Self {
        Self::GOOD
    }
}

impl fmt::Debug for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StatusCode({self})")
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{name}"),
            None => write!(f, "0x{:08X}", self.0),
        }
    }
}
