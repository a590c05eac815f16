use serde::{Serialize, Serializer};
use time::format_description::FormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

pub const BOOKED_TITLE: &str = "Réservé";

/// Same shape as javascript's `Date.prototype.toISOString`, which the booking widget parses.
const ISO_MILLIS: &[FormatItem<'static>] = format_description!(
    "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z"
);

#[derive(Clone, Serialize, Debug, PartialEq, Eq)]
pub struct CalendarEvent {
    #[serde(serialize_with = "serialize_iso_millis")]
    pub start: OffsetDateTime,
    #[serde(serialize_with = "serialize_iso_millis")]
    pub end: OffsetDateTime,
    pub title: String,
}

impl CalendarEvent {
    pub fn booked(start: OffsetDateTime, end: OffsetDateTime) -> Self {
        Self {
            start,
            end,
            title: BOOKED_TITLE.to_string(),
        }
    }
}

fn serialize_iso_millis<S: Serializer>(
    timestamp: &OffsetDateTime,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let formatted = timestamp
        .to_offset(UtcOffset::UTC)
        .format(ISO_MILLIS)
        .map_err(serde::ser::Error::custom)?;
    serializer.serialize_str(&formatted)
}
