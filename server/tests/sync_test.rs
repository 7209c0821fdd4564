//! Wire-format tests for the sync protocol.
//!
//! These pin the JSON shapes exchanged with devices; they need no database.

use ptsync_engine::{
    BootstrapSnapshot, Mutation, MutationIntent, MutationKind, NewPlan, PushRequest,
    PushResponse,
};
use serde_json::json;

#[cfg(test)]
mod protocol_tests {
    use super::*;

    #[test]
    fn test_push_request_from_device() {
        let json = json!({
            "mutations": [
                {
                    "id": "0b9f3c1e-6f7e-4b8a-9d59-2f1f8f0e2a11",
                    "type": "LOG_WORKOUT",
                    "timestamp": 1706745600000u64,
                    "payload": {
                        "planId": "plan-1",
                        "dayId": "day-1",
                        "durationMinutes": 62,
                        "feedback": "Heavy but good",
                        "exercises": [
                            {
                                "exerciseId": "ex-squat",
                                "sets": [
                                    {"setNumber": 1, "reps": 5, "weight": 100.0, "rpe": 7},
                                    {"setNumber": 2, "reps": 5, "weight": 105.5, "rpe": 8}
                                ]
                            }
                        ]
                    }
                },
                {
                    "id": "m-future",
                    "type": "UPDATE_PROFILE",
                    "timestamp": 1706745600001u64,
                    "payload": {"name": "x"}
                }
            ]
        });

        let request: PushRequest = serde_json::from_value(json).unwrap();
        assert_eq!(request.mutations.len(), 2);

        let MutationIntent::LogWorkout(payload) = request.mutations[0].decode().unwrap();
        assert_eq!(payload.duration_minutes, 62);
        assert_eq!(payload.exercises[0].sets[1].weight, 105.5);

        // Unknown types parse, then fail on decode
        assert_eq!(request.mutations[1].kind, MutationKind::Unknown);
        assert!(request.mutations[1].decode().is_err());
    }

    #[test]
    fn test_push_response_shape() {
        let mut response = PushResponse::default();
        response.processed("m1");
        response.failed("m2");

        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({"processedIds": ["m1"], "failedIds": ["m2"]})
        );
    }

    #[test]
    fn test_mutation_keeps_type_field_name() {
        let json = json!({
            "id": "m1",
            "type": "LOG_WORKOUT",
            "timestamp": 1,
            "payload": {"durationMinutes": 10}
        });
        let mutation: Mutation = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(serde_json::to_value(&mutation).unwrap(), json);
    }

    #[test]
    fn test_bootstrap_response_serialization() {
        let snapshot: BootstrapSnapshot = serde_json::from_value(json!({
            "assignedPlans": [{
                "id": "as-1",
                "planId": "plan-1",
                "studentId": "student-1",
                "startDate": "2024-01-01T00:00:00Z",
                "endDate": null,
                "isActive": true,
                "plan": {
                    "id": "plan-1",
                    "coachId": "coach-1",
                    "title": "Base",
                    "days": [{
                        "id": "d1", "name": "A", "order": 1,
                        "exercises": [{
                            "id": "pe-1",
                            "exerciseId": "ex-1",
                            "seriesSpecType": "REPS",
                            "sets": 3,
                            "reps": "3x(12,10,8)",
                            "rpe": 8,
                            "restSeconds": 90,
                            "order": 1,
                            "exercise": {"id": "ex-1", "title": "Bench Press", "muscleGroup": "chest"}
                        }]
                    }]
                }
            }],
            "workoutLogs": [{
                "id": "log-1",
                "studentId": "student-1",
                "date": "2024-01-02T18:30:00Z",
                "durationMinutes": 48,
                "exerciseLogs": [
                    {"id": "el-1", "exerciseId": "ex-1", "setNumber": 1, "reps": 12, "weight": 40.0, "rpe": 7}
                ]
            }],
            "exercises": [{"id": "ex-1", "title": "Bench Press", "muscleGroup": "chest"}],
            "timestamp": 1704220200000u64
        }))
        .unwrap();

        let value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(value["assignedPlans"][0]["plan"]["days"][0]["exercises"][0]["seriesSpecType"], "REPS");
        assert_eq!(value["workoutLogs"][0]["exerciseLogs"][0]["setNumber"], 1);
        assert_eq!(value["exercises"][0]["muscleGroup"], "chest");
        assert_eq!(value["timestamp"], 1704220200000u64);
    }

    #[test]
    fn test_create_plan_request() {
        let plan: NewPlan = serde_json::from_value(json!({
            "title": "Upper/Lower",
            "description": "4 days",
            "days": [
                {"name": "Lower", "order": 2, "exercises": [
                    {"exerciseId": "ex-squat", "seriesSpecType": "REPS", "sets": 4, "reps": "4x8", "order": 1}
                ]},
                {"name": "Upper", "order": 1, "exercises": [
                    {"exerciseId": "ex-plank", "seriesSpecType": "TIME", "sets": 3, "reps": "3x45s", "order": 1}
                ]}
            ]
        }))
        .unwrap();

        assert!(plan.validate().is_ok());
    }

    #[test]
    fn test_create_plan_rejects_bad_series_spec() {
        let plan: NewPlan = serde_json::from_value(json!({
            "title": "Broken",
            "days": [{"name": "A", "order": 1, "exercises": [
                {"exerciseId": "ex-1", "seriesSpecType": "REPS", "sets": 3, "reps": "three by ten", "order": 1}
            ]}]
        }))
        .unwrap();

        assert!(plan.validate().is_err());
    }
}
