use serde::{Deserialize, Serialize};

use crate::status::StatusCode;
use crate::variant::{DateTime, Variant};

/// Which timestamps a read should return.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampsToReturn {
    Source,
    Server,
    #[default]
    Both,
    Neither,
}

/// An attribute value together with its status and timestamps.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DataValue {
    pub value: Option<Variant>,
    pub status: StatusCode,
    pub source_timestamp: Option<DateTime>,
    pub server_timestamp: Option<DateTime>,
}

impl DataValue {
    /// A good value stamped with the current time as its source timestamp.
    pub fn new(value: impl Into<Variant>) -> Self {
        Self {
            value: Some(value.into()),
            status: StatusCode::GOOD,
            source_timestamp: Some(chrono::Utc::now()),
            server_timestamp: None,
        }
    }

    /// A good value with no timestamps, used for non-Value attributes.
    pub fn attribute(value: impl Into<Variant>) -> Self {
        Self {
            value: Some(value.into()),
            ..Default::default()
        }
    }

    /// A value-less result carrying only a status.
    pub fn error(status: StatusCode) -> Self {
        Self {
            value: None,
            status,
            source_timestamp: None,
            server_timestamp: None,
        }
    }

    pub fn is_good(&self) -> bool {
        self.status.is_good()
    }

    /// Apply the requested timestamps policy, stamping `server_time` as the
    /// server timestamp where one is wanted.
    pub fn with_timestamps(mut self, policy: TimestampsToReturn, server_time: DateTime) -> Self {
        let (source, server) = match policy {
            TimestampsToReturn::Source => (true, false),
            TimestampsToReturn::Server => (false, true),
            TimestampsToReturn::Both => (true, true),
            TimestampsToReturn::Neither => (false, false),
        };
        if !source {
            self.source_timestamp = None;
        }
        self.server_timestamp = server.then_some(server_time);
        self
    }
}
