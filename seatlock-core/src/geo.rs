use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{CoreError, CoreResult};

/// Countdown state of one partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoStatus {
    pub is_unlocked: bool,
    /// Epoch seconds; `None` when the partition has no entry.
    pub unlocks_at: Option<i64>,
    pub remaining_seconds: i64,
}

impl GeoStatus {
    /// No entry means open.
    pub fn open() -> Self {
        Self {
            is_unlocked: true,
            unlocks_at: None,
            remaining_seconds: 0,
        }
    }

    pub fn at(unlocks_at: i64, now: i64) -> Self {
        Self {
            is_unlocked: now >= unlocks_at,
            unlocks_at: Some(unlocks_at),
            remaining_seconds: (unlocks_at - now).max(0),
        }
    }
}

/// A configured partition as listed by a prefix scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeoEntry {
    pub timestamp: i64,
    pub date: DateTime<Utc>,
}

impl GeoEntry {
    pub fn from_seconds(timestamp: i64) -> Option<Self> {
        DateTime::<Utc>::from_timestamp(timestamp, 0).map(|date| Self { timestamp, date })
    }
}

/// Unlock time as supplied by an operator.
#[derive(Debug, Clone, PartialEq)]
pub enum UnlockTime {
    Iso(String),
    Seconds(serde_json::Number),
    Unsupported(Value),
}

impl From<Value> for UnlockTime {
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) => UnlockTime::Iso(s),
            Value::Number(n) => UnlockTime::Seconds(n),
            other => UnlockTime::Unsupported(other),
        }
    }
}

impl UnlockTime {
    pub fn epoch_seconds(&self) -> Option<i64> {
        match self {
            UnlockTime::Iso(s) => parse_iso(s),
            UnlockTime::Seconds(n) => {
                if let Some(secs) = n.as_i64() {
                    return (secs >= 0).then_some(secs);
                }
                let secs = n.as_f64()?;
                if secs.is_finite() && secs >= 0.0 && secs < i64::MAX as f64 {
                    Some(secs.trunc() as i64)
                } else {
                    None
                }
            }
            UnlockTime::Unsupported(_) => None,
        }
    }

    /// The value as the caller sent it, for error reporting.
    pub fn raw(&self) -> String {
        match self {
            UnlockTime::Iso(s) => s.clone(),
            UnlockTime::Seconds(n) => n.to_string(),
            UnlockTime::Unsupported(v) => v.to_string(),
        }
    }
}

fn parse_iso(s: &str) -> Option<i64> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|naive| naive.and_utc().timestamp())
}

/// Partition keys are case-insensitive.
pub fn normalize_partition(raw: &str) -> CoreResult<String> {
    let key = raw.trim().to_lowercase();
    if key.is_empty() {
        return Err(CoreError::InvalidRequest("partition key is required".to_string()));
    }
    Ok(key)
}
