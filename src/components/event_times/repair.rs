use crate::error::{config_error, Error};
use chrono::{Duration, NaiveDateTime, Timelike};
use std::str::FromStr;

/// Earliest plausible hour for a seminar
const EARLIEST_HOUR: u32 = 7;
/// Latest plausible hour for a seminar
const LATEST_HOUR: u32 = 19;

/// How the repair pass handles an end time that is too late
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RepairMode {
    /// Move the start back 12 hours, as the published feed has always been
    /// treated
    #[default]
    Literal,
    /// Move the end back 12 hours
    Corrected,
}

impl FromStr for RepairMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "literal" => Ok(Self::Literal),
            "corrected" => Ok(Self::Corrected),
            other => Err(config_error(&format!(
                "Unknown repair mode {:?}, expected \"literal\" or \"corrected\"",
                other
            ))),
        }
    }
}

/// Fix an event that ends before it starts, assuming one of the times was
/// entered on the wrong side of noon.
///
/// Only runs when `start > end`. A start before 07:00 moves forward 12
/// hours, one after 19:00 moves back. An end before 07:00 moves forward;
/// an end after 19:00 moves the start back in [`RepairMode::Literal`] and the
/// end back in [`RepairMode::Corrected`]. Runs once and does not check the
/// result, so the output may still be out of order.
pub fn fix_broken_times(
    start: NaiveDateTime,
    end: NaiveDateTime,
    mode: RepairMode,
) -> (NaiveDateTime, NaiveDateTime) {
    if start <= end {
        return (start, end);
    }

    let half_day = Duration::hours(12);
    let (mut start, mut end) = (start, end);

    if start.hour() < EARLIEST_HOUR {
        start += half_day;
    } else if start.hour() > LATEST_HOUR {
        start -= half_day;
    }

    // Checked against the end as it was before the start moved
    if end.hour() < EARLIEST_HOUR {
        end += half_day;
    } else if end.hour() > LATEST_HOUR {
        match mode {
            RepairMode::Literal => start -= half_day,
            RepairMode::Corrected => end -= half_day,
        }
    }

    (start, end)
}
