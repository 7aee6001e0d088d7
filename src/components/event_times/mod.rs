//! Turning the published date and time strings into zoned timestamps.

mod repair;

pub use repair::{fix_broken_times, RepairMode};

use crate::error::{parse_error, AppResult};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};
use chrono_tz::Tz;

/// Format of an event boundary, e.g. `May 3, 2024 2:00 PM`
pub const EVENT_TIME_FORMAT: &str = "%B %d, %Y %I:%M %p";
/// Format of the posted/updated stamps, e.g. `Apr 20, 2024`
pub const STAMP_FORMAT: &str = "%b %d, %Y";

/// The four timestamps of an event, all in the configured civil zone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventTimes {
    pub start_at: DateTime<Tz>,
    pub end_at: DateTime<Tz>,
    pub created_at: DateTime<Tz>,
    pub modified_at: DateTime<Tz>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Meridiem {
    Am,
    Pm,
}

impl Meridiem {
    fn of(boundary: &str) -> Option<Self> {
        let upper = boundary.trim_end().to_ascii_uppercase();
        if upper.ends_with("AM") {
            Some(Self::Am)
        } else if upper.ends_with("PM") {
            Some(Self::Pm)
        } else {
            None
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Am => "AM",
            Self::Pm => "PM",
        }
    }
}

/// Split a time range at its first hyphen into trimmed start and end parts
pub fn split_time_range(time_text: &str) -> AppResult<(&str, &str)> {
    let (start, end) = time_text
        .split_once('-')
        .ok_or_else(|| parse_error(time_text, "a time range such as \"2:00 - 3:00 PM\""))?;
    Ok((start.trim(), end.trim()))
}

/// Give both boundaries an AM/PM marker.
///
/// A boundary without a marker takes the other boundary's marker, so
/// `2:00 - 3:00 PM` reads as `2:00 PM - 3:00 PM` and `9:30 AM - 11:00` as
/// `9:30 AM - 11:00 AM`. A range with no marker at all is rejected.
pub fn resolve_meridiems(start: &str, end: &str) -> AppResult<(String, String)> {
    match (Meridiem::of(start), Meridiem::of(end)) {
        (Some(_), Some(_)) => Ok((start.to_string(), end.to_string())),
        (None, Some(marker)) => Ok((format!("{} {}", start, marker.as_str()), end.to_string())),
        (Some(marker), None) => Ok((start.to_string(), format!("{} {}", end, marker.as_str()))),
        (None, None) => Err(parse_error(
            &format!("{} - {}", start, end),
            "a time range with an AM/PM marker",
        )),
    }
}

/// Parse `May 3, 2024` plus `2:00 PM` into a civil instant
pub fn parse_event_boundary(date_text: &str, time: &str) -> AppResult<NaiveDateTime> {
    let text = format!("{} {}", date_text, time);
    NaiveDateTime::parse_from_str(&text, EVENT_TIME_FORMAT)
        .map_err(|_| parse_error(&text, "\"Month D, YYYY H:MM AM/PM\""))
}

/// Parse a posted/updated stamp such as `Apr 20, 2024`, at midnight
pub fn parse_stamp(text: &str) -> AppResult<NaiveDateTime> {
    NaiveDate::parse_from_str(text, STAMP_FORMAT)
        .map(|date| date.and_time(chrono::NaiveTime::MIN))
        .map_err(|_| parse_error(text, "\"Mon D, YYYY\""))
}

/// Anchor a civil instant in `zone`.
///
/// Times repeated by a DST change resolve to the earlier instant; times
/// skipped by one are an error.
pub fn localize(naive: NaiveDateTime, zone: Tz) -> AppResult<DateTime<Tz>> {
    match zone.from_local_datetime(&naive) {
        chrono::LocalResult::Single(dt) => Ok(dt),
        chrono::LocalResult::Ambiguous(earliest, _) => Ok(earliest),
        chrono::LocalResult::None => Err(parse_error(
            &naive.to_string(),
            &format!("a time that exists in {}", zone.name()),
        )),
    }
}

/// Convert the published strings into zoned timestamps, repairing an end
/// time that precedes the start
pub fn normalize(
    date_text: &str,
    time_text: &str,
    created_text: &str,
    modified_text: &str,
    zone: Tz,
    repair: RepairMode,
) -> AppResult<EventTimes> {
    let (start, end) = split_time_range(time_text)?;
    let (start, end) = resolve_meridiems(start, end)?;

    let start = parse_event_boundary(date_text, &start)?;
    let end = parse_event_boundary(date_text, &end)?;
    let (start, end) = fix_broken_times(start, end, repair);

    Ok(EventTimes {
        start_at: localize(start, zone)?,
        end_at: localize(end, zone)?,
        created_at: localize(parse_stamp(created_text)?, zone)?,
        modified_at: localize(parse_stamp(modified_text)?, zone)?,
    })
}
