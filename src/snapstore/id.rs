//! Batch identifiers: `<ordinal:03>_<YYYYMMDDTHHMMSS>` (UTC).
//!
//! The id doubles as the batch directory name. Ordinals wider than three
//! digits are printed as is (`1000_...`), so ordering always goes through
//! the parsed ordinal, never through the raw string.

use chrono::{NaiveDateTime, Utc};
use std::cmp::Ordering;
use std::fmt;

pub const TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%S";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BatchId {
    pub ordinal: u64,
    /// Timestamp component exactly as it appears in the directory name.
    pub stamp: String,
}

impl BatchId {
    pub fn new(ordinal: u64, stamp: impl Into<String>) -> Self {
        Self {
            ordinal,
            stamp: stamp.into(),
        }
    }

    /// Parse a directory name. Requires `<digits>_<non-empty>`.
    pub fn parse(name: &str) -> Option<Self> {
        let (ord, stamp) = name.split_once('_')?;
        if ord.is_empty() || stamp.is_empty() || !ord.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let ordinal = ord.parse::<u64>().ok()?;
        Some(Self::new(ordinal, stamp))
    }

    /// Parsed UTC creation time; None when the stamp is not `YYYYMMDDTHHMMSS`.
    pub fn created_at(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.stamp, TIMESTAMP_FORMAT).ok()
    }

    /// Directory / external handle form.
    pub fn dir_name(&self) -> String {
        self.to_string()
    }

    /// Short human label: `003 (20240115T093000)`.
    pub fn label(&self) -> String {
        format!("{:03} ({})", self.ordinal, self.stamp)
    }
}

impl fmt::Display for BatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03}_{}", self.ordinal, self.stamp)
    }
}

impl Ord for BatchId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.ordinal
            .cmp(&other.ordinal)
            .then_with(|| self.stamp.cmp(&other.stamp))
    }
}

impl PartialOrd for BatchId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Current UTC time in the batch stamp format.
pub fn now_stamp() -> String {
    Utc::now().format(TIMESTAMP_FORMAT).to_string()
}
