use std::fmt;
use std::time::Duration;

use crate::image_pipeline::common::error::Result;

/// Identity of one submitted request. Later requests compare greater.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(u64);

impl RequestId {
    pub fn value(&self) -> u64 {
        self.0
    }

    pub(crate) fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A finished job delivered back to the submitting side.
#[derive(Debug)]
pub struct JobOutcome<T> {
    pub id: RequestId,
    pub label: String,
    pub result: Result<T>,
    pub elapsed: Duration,
}
