use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// First year of the default two-digit year window (2000-2099).
pub const DEFAULT_CENTURY: u16 = 2000;
/// Date field value of a barcode without a due date.
pub const NO_DUE_DATE: &str = "000000";
const FIELD_WIDTH: usize = 6;
const ACCEPTED_FORMATS: &[&str] = &["%Y-%m-%d", "%d.%m.%Y"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateError {
    #[error("{year}-{month:02}-{day:02} is not a calendar date")]
    NotACalendarDate { year: i32, month: u32, day: u32 },

    #[error("Cannot parse date {0:?}, expected YYYY-MM-DD or DD.MM.YYYY")]
    Unparseable(String),

    #[error("Year {year} cannot be encoded with two digits, the window is {first}-{last}")]
    OutsideCenturyWindow { year: i32, first: i32, last: i32 },

    #[error("Date field {0:?} is not six digits")]
    InvalidField(String),
}

/// Calendar date on which a payment is due. Has no time component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DueDate(NaiveDate);

impl DueDate {
    pub fn new(date: NaiveDate) -> Self {
        DueDate(date)
    }

    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self, DateError> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(DueDate)
            .ok_or(DateError::NotACalendarDate { year, month, day })
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// `YYMMDD` with the year taken relative to `century`.
    pub fn to_yymmdd(&self, century: u16) -> Result<String, DateError> {
        let first = i32::from(century);
        let last = first + 99;
        let year = self.0.year();
        if !(first..=last).contains(&year) {
            return Err(DateError::OutsideCenturyWindow { year, first, last });
        }
        Ok(format!(
            "{:02}{:02}{:02}",
            year - first,
            self.0.month(),
            self.0.day()
        ))
    }

    /// Reads a `YYMMDD` field. The all-zero field means the payment has no due date.
    pub fn from_yymmdd(field: &str, century: u16) -> Result<Option<Self>, DateError> {
        if field.len() != FIELD_WIDTH || !field.chars().all(|c| c.is_ascii_digit()) {
            return Err(DateError::InvalidField(field.to_string()));
        }
        if field == NO_DUE_DATE {
            return Ok(None);
        }
        let number = |range: std::ops::Range<usize>| -> u32 {
            field[range]
                .bytes()
                .fold(0, |acc, b| acc * 10 + u32::from(b - b'0'))
        };
        let year = i32::from(century) + number(0..2) as i32;
        Self::from_ymd(year, number(2..4), number(4..6)).map(Some)
    }
}

impl fmt::Display for DueDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%d.%m.%Y"))
    }
}

impl From<NaiveDate> for DueDate {
    fn from(date: NaiveDate) -> Self {
        DueDate(date)
    }
}

impl FromStr for DueDate {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        ACCEPTED_FORMATS
            .iter()
            .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
            .map(DueDate)
            .ok_or_else(|| DateError::Unparseable(s.to_string()))
    }
}
