//! Parcel status values.
//!
//! The remote service stores a parcel's status as free-form text, so
//! [`ParcelStatus`] accepts any string. [`Lifecycle`] names the values the
//! console itself offers and the forward transitions between them, for
//! callers that want stricter guarantees.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Status of a parcel as stored by the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParcelStatus(String);

impl ParcelStatus {
    /// Create a status from any string.
    #[must_use]
    pub fn new(status: impl Into<String>) -> Self {
        Self(status.into())
    }

    /// Returns the status as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the well-known lifecycle stage, if this is one.
    #[must_use]
    pub fn lifecycle(&self) -> Option<Lifecycle> {
        self.0.parse().ok()
    }
}

impl fmt::Display for ParcelStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ParcelStatus {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for ParcelStatus {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<Lifecycle> for ParcelStatus {
    fn from(stage: Lifecycle) -> Self {
        Self(stage.to_string())
    }
}

/// Well-known lifecycle stages of a parcel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Lifecycle {
    /// Registered but not yet moving.
    Pending,
    /// On its way.
    InProgress,
    /// Delivered. Terminal.
    Done,
}

impl Lifecycle {
    /// Whether moving from `self` to `next` is a forward step.
    ///
    /// Re-applying the current stage is allowed; nothing leaves `Done`.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        match self {
            Self::Done => next == Self::Done,
            _ => next >= self,
        }
    }
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "Pending"),
            Self::InProgress => write!(f, "In Progress"),
            Self::Done => write!(f, "Done"),
        }
    }
}

impl std::str::FromStr for Lifecycle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(Self::Pending),
            "In Progress" => Ok(Self::InProgress),
            "Done" => Ok(Self::Done),
            _ => Err(format!("unknown lifecycle stage: {s}")),
        }
    }
}
