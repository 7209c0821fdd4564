//! Series spec parsing.
//!
//! Coaches write set targets as compact strings:
//!
//! - `3x10` - three sets of ten reps
//! - `3x30s` - three sets of thirty seconds
//! - `4x(10,10,8,8)` - one target per set; the list length wins over the count
//!
//! Whitespace and case are ignored.

use crate::model::SeriesSpecType;
use crate::{error::Result, Error};
use serde::{Deserialize, Serialize};

/// Target for a single set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SetTarget {
    Reps(u32),
    Seconds(u32),
}

/// Upper bound on sets in a single spec.
pub const MAX_SETS: u32 = 100;

enum Shape {
    Uniform { count: u32, value: u32, seconds: bool },
    List(Vec<u32>),
}

/// Parse a series spec into per-set targets.
pub fn parse(spec: &str, kind: SeriesSpecType) -> Result<Vec<SetTarget>> {
    let target = |value: u32, seconds: bool| {
        if seconds || kind == SeriesSpecType::Time {
            SetTarget::Seconds(value)
        } else {
            SetTarget::Reps(value)
        }
    };

    Ok(match shape(spec)? {
        Shape::Uniform {
            count,
            value,
            seconds,
        } => (0..count).map(|_| target(value, seconds)).collect(),
        Shape::List(values) => values.into_iter().map(|v| target(v, false)).collect(),
    })
}

/// Check a spec without materializing targets.
pub fn validate(spec: &str) -> Result<()> {
    shape(spec).map(|_| ())
}

fn shape(spec: &str) -> Result<Shape> {
    let clean: String = spec
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase();

    let invalid = || Error::InvalidSeriesSpec(spec.to_string());

    let (count, rest) = clean.split_once('x').ok_or_else(invalid)?;
    let count = parse_number(count).ok_or_else(invalid)?;
    if count == 0 || count > MAX_SETS {
        return Err(invalid());
    }

    if let Some(list) = rest.strip_prefix('(').and_then(|r| r.strip_suffix(')')) {
        if list.split(',').count() > MAX_SETS as usize {
            return Err(invalid());
        }
        return list
            .split(',')
            .map(|v| parse_number(v).ok_or_else(invalid))
            .collect::<Result<Vec<_>>>()
            .map(Shape::List);
    }

    let (value, seconds) = match rest.strip_suffix('s') {
        Some(v) => (v, true),
        None => (rest, false),
    };
    let value = parse_number(value).ok_or_else(invalid)?;

    Ok(Shape::Uniform {
        count,
        value,
        seconds,
    })
}

fn parse_number(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}
