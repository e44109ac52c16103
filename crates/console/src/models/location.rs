//! Location history domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use parcel_console_core::LocationId;

/// A timestamped description of where a parcel has been.
///
/// Owned by exactly one parcel on the server (by `parcelId` reference); the
/// console caches it inside the parcel's [`LocationHistory`] for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationEvent {
    /// Server-assigned identifier.
    pub id: LocationId,
    /// Where the parcel was.
    #[serde(rename = "locationDescription")]
    pub description: String,
    /// When it was there.
    #[serde(with = "timestamp")]
    pub timestamp: DateTime<Utc>,
}

/// Cached location history of a parcel.
///
/// "Not loaded yet" and "loaded, but empty" are different states and are
/// never collapsed into each other.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LocationHistory {
    /// Nothing has been fetched for this parcel.
    #[default]
    NotLoaded,
    /// The full, ordered history as last confirmed by the server.
    Loaded(Vec<LocationEvent>),
}

impl LocationHistory {
    /// Returns `true` once a definite history has been fetched.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }

    /// Returns the events, or `None` if the history has not been loaded.
    #[must_use]
    pub fn events(&self) -> Option<&[LocationEvent]> {
        match self {
            Self::NotLoaded => None,
            Self::Loaded(events) => Some(events),
        }
    }

    /// Appends a confirmed event.
    ///
    /// An unloaded history stays unloaded: a single event is not the full
    /// history, and only a refresh may turn `NotLoaded` into `Loaded`.
    pub fn push(&mut self, event: LocationEvent) {
        if let Self::Loaded(events) = self {
            events.push(event);
        }
    }

    /// Removes the event with the given id. Returns `true` if one was removed.
    pub fn remove(&mut self, id: LocationId) -> bool {
        match self {
            Self::NotLoaded => false,
            Self::Loaded(events) => {
                let before = events.len();
                events.retain(|event| event.id != id);
                events.len() != before
            }
        }
    }
}

impl Serialize for LocationHistory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.events().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for LocationHistory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Option::<Vec<LocationEvent>>::deserialize(deserializer)?
            .map_or(Self::NotLoaded, Self::Loaded))
    }
}

/// Timestamp wire format.
///
/// Written as RFC 3339. Read as RFC 3339, or as a zone-less ISO-8601 local
/// date-time (which the service emits for its own records) taken to be UTC.
pub(crate) mod timestamp {
    use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Secs, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| D::Error::custom(format!("invalid timestamp: {raw}")))
    }

    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
            return Some(ts.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc())
    }
}
