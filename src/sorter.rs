use crate::rich_line::RichLine;
use crate::timestamp::parse_leading_timestamp;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::cmp::Ordering;
use tracing::debug;

/// What lines are compared by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Raw line text, compared by code point.
    Text,
    /// Leading timestamp. Lines without one compare as least.
    #[default]
    Timestamp,
}

impl std::str::FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(SortKey::Text),
            "timestamp" | "time" => Ok(SortKey::Timestamp),
            _ => Err(format!("unknown sort key '{s}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn from_ascending(ascending: bool) -> Self {
        if ascending {
            SortOrder::Ascending
        } else {
            SortOrder::Descending
        }
    }
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum KeyValue<'a> {
    Text(&'a str),
    // `None < Some(_)`, so lines without a timestamp sort first.
    Time(Option<DateTime<Utc>>),
}

impl SortKey {
    fn extract<'a>(&self, line: &'a RichLine) -> KeyValue<'a> {
        match self {
            SortKey::Text => KeyValue::Text(line.text()),
            SortKey::Timestamp => KeyValue::Time(parse_leading_timestamp(line.text())),
        }
    }
}

/// Returns `lines` reordered by `key`, leaving the input untouched.
///
/// Each line keeps its own format runs. The sort is stable: lines with equal
/// keys keep their relative order in both directions.
pub fn sort_lines(lines: &[RichLine], order: SortOrder, key: SortKey) -> Vec<RichLine> {
    // Keys are computed once; timestamp parsing is the expensive part.
    let mut keyed: Vec<(KeyValue<'_>, &RichLine)> =
        lines.iter().map(|line| (key.extract(line), line)).collect();

    keyed.sort_by(|(a, _), (b, _)| match order {
        SortOrder::Ascending => a.cmp(b),
        SortOrder::Descending => b.cmp(a),
    });

    debug!("Sorted {} lines by {:?} ({:?})", lines.len(), key, order);
    keyed.into_iter().map(|(_, line)| line.clone()).collect()
}

/// Compares two lines the way [`sort_lines`] does in ascending order.
pub fn compare_lines(a: &RichLine, b: &RichLine, key: SortKey) -> Ordering {
    key.extract(a).cmp(&key.extract(b))
}
