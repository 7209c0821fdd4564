//! Mutations: client-recorded intents queued until the server confirms them.
//!
//! The stored/wire shape is always `{ id, type, timestamp, payload }` with an
//! opaque JSON payload. The typed view is [`MutationIntent`], decoded per
//! mutation, so new variants never change what sits in the queue.

use crate::workout::WorkoutPayload;
use crate::{error::Result, Error, Timestamp};
use serde::{Deserialize, Serialize};

/// Client-generated mutation identifier; the idempotency key.
pub type MutationId = String;

/// Discriminant of a mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MutationKind {
    /// A finished workout session
    #[serde(rename = "LOG_WORKOUT")]
    LogWorkout,
    /// Any type this build does not understand
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for MutationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MutationKind::LogWorkout => write!(f, "LOG_WORKOUT"),
            MutationKind::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// Typed mutation content.
#[derive(Debug, Clone, PartialEq)]
pub enum MutationIntent {
    LogWorkout(WorkoutPayload),
}

impl MutationIntent {
    /// The discriminant stored alongside the payload.
    pub fn kind(&self) -> MutationKind {
        match self {
            MutationIntent::LogWorkout(_) => MutationKind::LogWorkout,
        }
    }

    fn to_payload(&self) -> Result<serde_json::Value> {
        let value = match self {
            MutationIntent::LogWorkout(payload) => serde_json::to_value(payload),
        };
        value.map_err(|e| Error::InvalidPayload(e.to_string()))
    }
}

/// A mutation as queued and pushed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mutation {
    /// Stable across retries
    pub id: MutationId,
    #[serde(rename = "type")]
    pub kind: MutationKind,
    /// Creation time (milliseconds since epoch)
    pub timestamp: Timestamp,
    pub payload: serde_json::Value,
}

impl Mutation {
    /// Build a mutation from a typed intent.
    pub fn new(
        id: impl Into<MutationId>,
        intent: &MutationIntent,
        timestamp: Timestamp,
    ) -> Result<Self> {
        Ok(Self {
            id: id.into(),
            kind: intent.kind(),
            timestamp,
            payload: intent.to_payload()?,
        })
    }

    /// Decode the payload into its typed form.
    pub fn decode(&self) -> Result<MutationIntent> {
        match self.kind {
            MutationKind::LogWorkout => serde_json::from_value(self.payload.clone())
                .map(MutationIntent::LogWorkout)
                .map_err(|e| Error::InvalidPayload(e.to_string())),
            MutationKind::Unknown => Err(Error::UnsupportedMutation(self.kind.to_string())),
        }
    }
}

/// A queued mutation waiting for acknowledgment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingMutation {
    pub mutation: Mutation,
    /// Pushes the server reported as failed
    #[serde(default)]
    pub attempts: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_failed_at: Option<Timestamp>,
}

impl PendingMutation {
    pub fn new(mutation: Mutation) -> Self {
        Self {
            mutation,
            attempts: 0,
            last_failed_at: None,
        }
    }

    pub fn id(&self) -> &MutationId {
        &self.mutation.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workout::{ExercisePayload, SetPayload};
    use serde_json::json;

    fn workout() -> WorkoutPayload {
        WorkoutPayload {
            plan_id: Some("plan-1".into()),
            day_id: Some("day-1".into()),
            duration_minutes: 50,
            feedback: None,
            timestamp: Some(1706745600000),
            exercises: vec![ExercisePayload {
                exercise_id: "ex-1".into(),
                sets: vec![SetPayload {
                    set_number: 1,
                    reps: 10,
                    weight: 40.0,
                    rpe: 7,
                }],
            }],
        }
    }

    #[test]
    fn wire_shape() {
        let mutation = Mutation::new(
            "m-1",
            &MutationIntent::LogWorkout(workout()),
            1706745600000,
        )
        .unwrap();

        let value = serde_json::to_value(&mutation).unwrap();
        assert_eq!(value["id"], "m-1");
        assert_eq!(value["type"], "LOG_WORKOUT");
        assert_eq!(value["timestamp"], 1706745600000u64);
        assert_eq!(value["payload"]["durationMinutes"], 50);
        assert_eq!(value["payload"]["exercises"][0]["sets"][0]["setNumber"], 1);
    }

    #[test]
    fn decode_round_trips_intent() {
        let intent = MutationIntent::LogWorkout(workout());
        let mutation = Mutation::new("m-1", &intent, 1000).unwrap();
        assert_eq!(mutation.decode().unwrap(), intent);
    }

    #[test]
    fn unknown_type_deserializes_but_does_not_decode() {
        let mutation: Mutation = serde_json::from_value(json!({
            "id": "m-9",
            "type": "PLAN_UPDATE",
            "timestamp": 1000,
            "payload": {}
        }))
        .unwrap();

        assert_eq!(mutation.kind, MutationKind::Unknown);
        assert!(matches!(
            mutation.decode(),
            Err(Error::UnsupportedMutation(_))
        ));
    }

    #[test]
    fn malformed_payload_fails_decode() {
        let mutation: Mutation = serde_json::from_value(json!({
            "id": "m-2",
            "type": "LOG_WORKOUT",
            "timestamp": 1000,
            "payload": {"exercises": "not a list"}
        }))
        .unwrap();

        assert!(matches!(mutation.decode(), Err(Error::InvalidPayload(_))));
    }

    #[test]
    fn pending_defaults_when_fields_missing() {
        let pending: PendingMutation = serde_json::from_value(json!({
            "mutation": {"id": "m-1", "type": "LOG_WORKOUT", "timestamp": 1, "payload": {}}
        }))
        .unwrap();

        assert_eq!(pending.attempts, 0);
        assert_eq!(pending.last_failed_at, None);
        assert_eq!(pending.id(), "m-1");
    }
}
