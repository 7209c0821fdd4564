//! Persisted form of the local state.
//!
//! Snapshots are the bridge between the in-memory [`Store`](crate::Store) and
//! the device's durable storage. Containers are `BTreeMap`s so serialization
//! is deterministic, and older format versions are migrated on load without
//! dropping rows.

use crate::model::{Assignment, Exercise, WorkoutLog};
use crate::plan::Plan;
use crate::{error::Result, Error, FormatVersion, MutationId, PendingMutation};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;

/// Current local state format.
///
/// - 1: `exercises`, `plans`, `syncQueue` holding bare mutations
/// - 2: adds `assignments`, `workoutLogs`, `deadLetters`; queue entries carry
///   attempt bookkeeping
pub const LOCAL_FORMAT_VERSION: FormatVersion = 2;

/// Point-in-time copy of every local container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalSnapshot {
    pub format_version: FormatVersion,
    #[serde(default)]
    pub exercises: BTreeMap<String, Exercise>,
    #[serde(default)]
    pub plans: BTreeMap<String, Plan>,
    #[serde(default)]
    pub assignments: BTreeMap<String, Assignment>,
    #[serde(default)]
    pub workout_logs: BTreeMap<String, WorkoutLog>,
    #[serde(default)]
    pub sync_queue: BTreeMap<MutationId, PendingMutation>,
    #[serde(default)]
    pub dead_letters: BTreeMap<MutationId, PendingMutation>,
}

impl Default for LocalSnapshot {
    fn default() -> Self {
        Self {
            format_version: LOCAL_FORMAT_VERSION,
            exercises: BTreeMap::new(),
            plans: BTreeMap::new(),
            assignments: BTreeMap::new(),
            workout_logs: BTreeMap::new(),
            sync_queue: BTreeMap::new(),
            dead_letters: BTreeMap::new(),
        }
    }
}

impl LocalSnapshot {
    /// Serialize to JSON with deterministic ordering.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| Error::InvalidState(e.to_string()))
    }

    /// Deserialize from JSON, upgrading older formats.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| Error::InvalidState(e.to_string()))?;
        Self::from_value(value)
    }

    fn from_value(mut value: Value) -> Result<Self> {
        let version = match value.get("formatVersion") {
            None => 1,
            Some(raw) => raw
                .as_u64()
                .and_then(|v| FormatVersion::try_from(v).ok())
                .ok_or_else(|| Error::UnsupportedFormat {
                    found: FormatVersion::MAX,
                    supported: LOCAL_FORMAT_VERSION,
                })?,
        };

        if version > LOCAL_FORMAT_VERSION {
            return Err(Error::UnsupportedFormat {
                found: version,
                supported: LOCAL_FORMAT_VERSION,
            });
        }

        if version < 2 {
            value = migrate_v1(value)?;
        }

        serde_json::from_value(value).map_err(|e| Error::InvalidState(e.to_string()))
    }
}

/// Wrap bare v1 queue entries into pending entries.
fn migrate_v1(mut value: Value) -> Result<Value> {
    let obj = value
        .as_object_mut()
        .ok_or_else(|| Error::InvalidState("local state must be an object".into()))?;

    if let Some(Value::Object(queue)) = obj.get_mut("syncQueue") {
        for entry in queue.values_mut() {
            let mutation = entry.take();
            *entry = json!({ "mutation": mutation, "attempts": 0 });
        }
    }

    obj.insert("formatVersion".into(), json!(2));
    Ok(value)
}
