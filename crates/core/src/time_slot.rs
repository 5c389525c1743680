//! # Time-Slot Table
//!
//! The fixed half-hour booking slots offered to every doctor, plus the
//! 24h → 12h display formatting used wherever a time is shown.
//!
//! Every slot is always offered. Whether two patients may book the same
//! doctor at the same time is decided by the backend, not here.

use std::{fmt, str::FromStr};

use chrono::{NaiveTime, Timelike};

use crate::errors::{MeetError, MeetResult};

/// Ordered slot table, "HH:MM" 24-hour.
pub const TIME_SLOTS: [&str; 18] = [
    "10:00", "10:30", "11:00", "11:30", "12:00", "12:30", "13:00", "13:30", "14:00", "14:30",
    "15:00", "15:30", "16:00", "16:30", "17:00", "17:30", "18:00", "18:30",
];

const SLOT_FORMAT: &str = "%H:%M";

/// One entry of [`TIME_SLOTS`]. Can only be built from a time in the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeSlot(NaiveTime);

impl TimeSlot {
    /// All slots, in table order.
    pub fn all() -> Vec<TimeSlot> {
        TIME_SLOTS
            .iter()
            .filter_map(|slot| NaiveTime::parse_from_str(slot, SLOT_FORMAT).ok())
            .map(TimeSlot)
            .collect()
    }

    pub fn from_time(time: NaiveTime) -> MeetResult<Self> {
        let slot = TimeSlot(time);
        if TimeSlot::all().contains(&slot) {
            Ok(slot)
        } else {
            Err(MeetError::Validation(format!(
                "{} is not an offered time slot",
                time.format(SLOT_FORMAT)
            )))
        }
    }

    pub fn time(&self) -> NaiveTime {
        self.0
    }

    /// 12-hour form, e.g. "1:30 PM".
    pub fn display(&self) -> String {
        format_time_for_display(self.0)
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(SLOT_FORMAT))
    }
}

impl FromStr for TimeSlot {
    type Err = MeetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let time = NaiveTime::parse_from_str(s.trim(), SLOT_FORMAT)
            .map_err(|_| MeetError::Validation(format!("Invalid time: {}", s)))?;
        TimeSlot::from_time(time)
    }
}

/// Formats any time of day as "H:MM AM/PM".
pub fn format_time_for_display(time: NaiveTime) -> String {
    let minute = time.minute();
    match time.hour() {
        0 => format!("12:{:02} AM", minute),
        hour @ 1..=11 => format!("{}:{:02} AM", hour, minute),
        12 => format!("12:{:02} PM", minute),
        hour => format!("{}:{:02} PM", hour - 12, minute),
    }
}

/// Formats a 24-hour "HH:MM" string, slot or not.
pub fn format_slot_for_display(slot: &str) -> MeetResult<String> {
    let time = NaiveTime::parse_from_str(slot.trim(), SLOT_FORMAT)
        .map_err(|_| MeetError::Validation(format!("Invalid time: {}", slot)))?;
    Ok(format_time_for_display(time))
}

/// Inverse of [`format_time_for_display`].
pub fn parse_display_time(display: &str) -> MeetResult<NaiveTime> {
    let invalid = || MeetError::Validation(format!("Invalid display time: {}", display));

    let (clock, meridiem) = display.trim().split_once(' ').ok_or_else(invalid)?;
    let (hour, minute) = clock.split_once(':').ok_or_else(invalid)?;
    let hour: u32 = hour.parse().map_err(|_| invalid())?;
    let minute: u32 = minute.parse().map_err(|_| invalid())?;
    if !(1..=12).contains(&hour) {
        return Err(invalid());
    }

    let hour = match meridiem.to_ascii_uppercase().as_str() {
        "AM" => hour % 12,
        "PM" => hour % 12 + 12,
        _ => return Err(invalid()),
    };

    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(invalid)
}
