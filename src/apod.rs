// The APOD record as returned by the remote service and stored on disk.
// Unknown fields are ignored on input; absent optional fields are left out
// when a record is written back.

use crate::date::ApodDate;
use serde::{Deserialize, Serialize};
use serde_json::ser::{PrettyFormatter, Serializer};
use std::fmt;

/// Kind of media an entry points at.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
    /// Interactive or otherwise unclassified entries.
    #[serde(other)]
    Other,
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Image => "image",
            Self::Video => "video",
            Self::Other => "other",
        })
    }
}

/// One day's entry. Identity is `date`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Apod {
    pub date: ApodDate,
    pub title: String,
    pub explanation: String,
    pub url: String,
    pub media_type: MediaType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hdurl: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concepts: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copyright: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_version: Option<String>,
}

impl Apod {
    /// Encode as JSON indented with four spaces, the on-disk layout.
    pub fn to_pretty_json(&self) -> serde_json::Result<Vec<u8>> {
        let mut buf = Vec::new();
        let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
        self.serialize(&mut ser)?;
        buf.push(b'\n');
        Ok(buf)
    }

    /// Link shown to the user: the high resolution one when available.
    pub fn best_url(&self) -> &str {
        self.hdurl.as_deref().unwrap_or(&self.url)
    }
}
