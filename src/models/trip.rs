use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted trip. Field names follow the stored JSON layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub id: String,
    pub load_location: String,
    pub unload_location: String,
    #[serde(with = "iso_millis")]
    pub date: DateTime<Utc>,
}

impl Trip {
    pub fn from_new(id: String, new_trip: NewTrip) -> Self {
        Self {
            id,
            load_location: new_trip.load_location,
            unload_location: new_trip.unload_location,
            date: new_trip.date,
        }
    }

    pub fn route_text(&self) -> String {
        format!("{} → {}", self.load_location, self.unload_location)
    }
}

/// Raw trip form input, before validation.
#[derive(Debug, Clone, Default)]
pub struct TripDraft {
    pub load_location: String,
    pub unload_location: String,
    pub date: Option<DateTime<Utc>>,
}

impl TripDraft {
    pub fn new(
        load_location: impl Into<String>,
        unload_location: impl Into<String>,
        date: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            load_location: load_location.into(),
            unload_location: unload_location.into(),
            date,
        }
    }
}

/// A draft that passed validation and is ready to receive an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTrip {
    pub load_location: String,
    pub unload_location: String,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Dhaka,
    Chittagong,
    Sylhet,
    Khulna,
    Rajshahi,
}

impl Location {
    /// Picker order.
    pub const ALL: [Location; 5] = [
        Location::Dhaka,
        Location::Chittagong,
        Location::Sylhet,
        Location::Khulna,
        Location::Rajshahi,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Location::Dhaka => "Dhaka",
            Location::Chittagong => "Chittagong",
            Location::Sylhet => "Sylhet",
            Location::Khulna => "Khulna",
            Location::Rajshahi => "Rajshahi",
        }
    }
}

/// ISO-8601 with millisecond precision and a `Z` suffix, e.g. `2024-01-01T00:00:00.000Z`.
/// Reading accepts any RFC 3339 timestamp.
pub mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

    pub fn format(date: &DateTime<Utc>) -> String {
        date.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    pub fn parse(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
        DateTime::parse_from_rfc3339(raw.trim()).map(|date| date.with_timezone(&Utc))
    }

    pub fn serialize<S>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format(date))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(D::Error::custom)
    }
}
