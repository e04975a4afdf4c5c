// Calendar dates in the `YYYY-MM-DD` form used by the APOD service.
//
// Parsing is positional: the year, month and day are read from offsets
// `[0..4]`, `[5..7]` and `[8..10]`. The separator bytes are not checked, and
// no calendar validation happens, so `2024/02/31` is accepted and rendered
// back as `2024-02-31`.

use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::Range;
use std::str::FromStr;

/// Shortest input the parser accepts.
pub const DATE_LEN: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ApodDate {
    pub year: u16,
    pub month: u8,
    pub day: u8,
}

impl ApodDate {
    pub fn new(year: u16, month: u8, day: u8) -> Self {
        Self { year, month, day }
    }

    /// Parse the positional `YYYY-MM-DD` form. Anything after the tenth
    /// character is ignored.
    pub fn parse(s: &str) -> Result<Self> {
        if s.len() < DATE_LEN {
            return Err(Error::InvalidDate(s.to_string()));
        }
        Ok(Self {
            year: field(s, 0..4)?,
            month: field(s, 5..7)?,
            day: field(s, 8..10)?,
        })
    }

    /// File name under which the record for this date is stored.
    pub fn file_name(&self) -> String {
        format!("{self}.json")
    }
}

fn field<T: FromStr>(s: &str, range: Range<usize>) -> Result<T> {
    s.get(range)
        .and_then(|part| part.parse().ok())
        .ok_or_else(|| Error::InvalidDate(s.to_string()))
}

impl fmt::Display for ApodDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl FromStr for ApodDate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for ApodDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ApodDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
