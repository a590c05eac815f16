//! Minimal iCalendar (RFC 5545) reader.
//!
//! Only what the booked-dates endpoint needs: content line unfolding, component nesting
//! and the `DTSTART`/`DTEND` of every `VEVENT`. Everything else in the feed is skipped.

use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Tz;
use thiserror::Error;
use time::format_description::FormatItem;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime};
use tracing::warn;

use crate::models::calendar_event::CalendarEvent;

const DATE_TIME: &[FormatItem<'static>] =
    format_description!("[year][month][day]T[hour][minute][second]");
const DATE: &[FormatItem<'static>] = format_description!("[year][month][day]");

#[derive(Error, Debug, PartialEq, Eq)]
pub enum IcalParseError {
    #[error("document does not contain a VCALENDAR")]
    NotACalendar,

    #[error("line {0}: content line has no value separator")]
    MalformedLine(usize),

    #[error("line {0}: content outside of any component")]
    OutsideComponent(usize),

    #[error("line {line}: END:{found} does not close {expected}")]
    UnbalancedComponent {
        line: usize,
        expected: String,
        found: String,
    },

    #[error("component {0} is never closed")]
    Unterminated(String),

    #[error("line {line}: VEVENT has no {property}")]
    MissingProperty { line: usize, property: &'static str },

    #[error("line {line}: cannot read {value:?} as a date or date-time")]
    InvalidTimestamp { line: usize, value: String },
}

struct ContentLine {
    number: usize,
    name: String,
    tzid: Option<String>,
    value: String,
}

#[derive(Default)]
struct PendingEvent {
    start: Option<OffsetDateTime>,
    end: Option<OffsetDateTime>,
}

/// Reads every `VEVENT` of the document, in document order, as a booked range.
pub fn parse_booked_events(document: &str) -> Result<Vec<CalendarEvent>, IcalParseError> {
    let mut events = Vec::new();
    let mut components: Vec<String> = Vec::new();
    let mut pending: Option<PendingEvent> = None;
    let mut saw_calendar = false;

    for line in content_lines(document)? {
        match line.name.as_str() {
            "BEGIN" => {
                let component = line.value.trim().to_ascii_uppercase();
                if components.is_empty() {
                    if component != "VCALENDAR" {
                        return Err(IcalParseError::OutsideComponent(line.number));
                    }
                    saw_calendar = true;
                }
                if component == "VEVENT" {
                    pending = Some(PendingEvent::default());
                }
                components.push(component);
            }
            "END" => {
                let component = line.value.trim().to_ascii_uppercase();
                match components.pop() {
                    Some(open) if open == component => {}
                    Some(open) => {
                        return Err(IcalParseError::UnbalancedComponent {
                            line: line.number,
                            expected: open,
                            found: component,
                        });
                    }
                    None => return Err(IcalParseError::OutsideComponent(line.number)),
                }
                if component == "VEVENT" {
                    let event = pending.take().unwrap_or_default();
                    let start = event.start.ok_or(IcalParseError::MissingProperty {
                        line: line.number,
                        property: "DTSTART",
                    })?;
                    let end = event.end.ok_or(IcalParseError::MissingProperty {
                        line: line.number,
                        property: "DTEND",
                    })?;
                    events.push(CalendarEvent::booked(start, end));
                }
            }
            _ if components.is_empty() => {
                return Err(IcalParseError::OutsideComponent(line.number));
            }
            "DTSTART" | "DTEND" if components.last().map(String::as_str) == Some("VEVENT") => {
                let timestamp = parse_timestamp(&line.value, line.tzid.as_deref()).ok_or_else(|| {
                    IcalParseError::InvalidTimestamp {
                        line: line.number,
                        value: line.value.clone(),
                    }
                })?;
                if let Some(event) = pending.as_mut() {
                    if line.name == "DTSTART" {
                        event.start = Some(timestamp);
                    } else {
                        event.end = Some(timestamp);
                    }
                }
            }
            _ => {}
        }
    }

    if let Some(open) = components.pop() {
        return Err(IcalParseError::Unterminated(open));
    }
    if !saw_calendar {
        return Err(IcalParseError::NotACalendar);
    }

    Ok(events)
}

/// Unfolds continuation lines and splits each logical line into its property name, its
/// `TZID` parameter and its value. Other parameters (`;VALUE=DATE`) are dropped, the value
/// form is enough to tell a date from a date-time.
fn content_lines(document: &str) -> Result<Vec<ContentLine>, IcalParseError> {
    let mut unfolded: Vec<(usize, String)> = Vec::new();
    for (index, raw) in document.lines().enumerate() {
        let raw = raw.strip_suffix('\r').unwrap_or(raw);
        if let Some(continuation) = raw.strip_prefix(|c: char| c == ' ' || c == '\t') {
            if let Some((_, last)) = unfolded.last_mut() {
                last.push_str(continuation);
                continue;
            }
        }
        if raw.trim().is_empty() {
            continue;
        }
        unfolded.push((index + 1, raw.to_string()));
    }

    unfolded
        .into_iter()
        .map(|(number, text)| -> Result<ContentLine, IcalParseError> {
            let separator = value_separator(&text).ok_or(IcalParseError::MalformedLine(number))?;
            let mut parts = text[..separator].split(';');
            let name = parts.next().unwrap_or_default().trim().to_ascii_uppercase();
            let tzid = parts.find_map(|parameter| {
                let (key, value) = parameter.split_once('=')?;
                key.trim()
                    .eq_ignore_ascii_case("TZID")
                    .then(|| value.trim().trim_matches('"').to_string())
            });
            Ok(ContentLine {
                number,
                name,
                tzid,
                value: text[separator + 1..].to_string(),
            })
        })
        .collect()
}

/// First `:` outside of a double-quoted parameter value.
fn value_separator(line: &str) -> Option<usize> {
    let mut quoted = false;
    for (position, character) in line.char_indices() {
        match character {
            '"' => quoted = !quoted,
            ':' if !quoted => return Some(position),
            _ => {}
        }
    }
    None
}

/// `20240701T120000Z` is UTC. `TZID` qualified date-times are resolved in that IANA zone,
/// floating ones are read as UTC. All-day `20240701` values start at midnight UTC.
fn parse_timestamp(value: &str, tzid: Option<&str>) -> Option<OffsetDateTime> {
    let value = value.trim();

    if let Some(utc) = value.strip_suffix(|c: char| c == 'Z' || c == 'z') {
        return PrimitiveDateTime::parse(utc, DATE_TIME)
            .ok()
            .map(PrimitiveDateTime::assume_utc);
    }

    if value.contains('T') {
        let local = PrimitiveDateTime::parse(value, DATE_TIME).ok()?;
        return Some(match tzid {
            Some(tzid) => in_zone(local, tzid),
            None => local.assume_utc(),
        });
    }

    Date::parse(value, DATE)
        .ok()
        .map(|date| date.midnight().assume_utc())
}

/// Wall clock time `local` in zone `tzid`. Zones outside the IANA database (Windows names
/// some exporters use) and wall clock times skipped by a DST change fall back to UTC.
fn in_zone(local: PrimitiveDateTime, tzid: &str) -> OffsetDateTime {
    let as_utc = local.assume_utc();

    let zone: Tz = match tzid.parse() {
        Ok(zone) => zone,
        Err(_) => {
            warn!("Unknown TZID {:?} in calendar feed, reading {} as UTC", tzid, local);
            return as_utc;
        }
    };

    let resolved = DateTime::<Utc>::from_timestamp(as_utc.unix_timestamp(), 0)
        .and_then(|wall_clock| zone.from_local_datetime(&wall_clock.naive_utc()).earliest())
        .and_then(|zoned| OffsetDateTime::from_unix_timestamp(zoned.timestamp()).ok());

    match resolved {
        Some(timestamp) => timestamp,
        None => {
            warn!("{} does not exist in {}, reading it as UTC", local, tzid);
            as_utc
        }
    }
}
