//! HTTP route definitions.

mod auth;
mod exercises;
mod health;
mod plans;
mod sync;

use crate::AppState;
use axum::Router;

/// Create all application routes.
pub fn create_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(sync::routes())
        .merge(plans::routes())
        .merge(exercises::routes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{issue_token, Role};
    use crate::config::test_config;
    use crate::db::MemoryRepository;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use ptsync_engine::{Mutation, MutationIntent, PushRequest, WorkoutPayload};
    use serde_json::{json, Value};
    use sqlx::postgres::PgPoolOptions;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app(repo: Arc<MemoryRepository>) -> Router {
        let state = AppState {
            pool: PgPoolOptions::new()
                .connect_lazy("postgres://localhost/ptsync_test")
                .unwrap(),
            config: Arc::new(test_config()),
            sync: repo,
        };
        create_routes().with_state(state)
    }

    fn token(user_id: &str, role: Role) -> String {
        issue_token(user_id, role, &test_config().jwt_secret, 600).unwrap()
    }

    fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn push_body(id: &str) -> Value {
        let intent = MutationIntent::LogWorkout(WorkoutPayload {
            plan_id: None,
            day_id: None,
            duration_minutes: 30,
            feedback: None,
            timestamp: None,
            exercises: vec![],
        });
        let request = PushRequest {
            mutations: vec![Mutation::new(id, &intent, 1706745600000).unwrap()],
        };
        serde_json::to_value(request).unwrap()
    }

    #[tokio::test]
    async fn health_reports_version() {
        let (status, body) = send(
            app(Arc::default()),
            request("GET", "/health", None, None),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn sync_requires_a_valid_token() {
        let (status, body) = send(
            app(Arc::default()),
            request("GET", "/sync/bootstrap", None, None),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Unauthorized");

        let (status, _) = send(
            app(Arc::default()),
            request("GET", "/sync/bootstrap", Some("not-a-jwt"), None),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let forged = issue_token("student-1", Role::Student, "wrong-secret", 600).unwrap();
        let (status, _) = send(
            app(Arc::default()),
            request("POST", "/sync/push", Some(&forged), Some(push_body("m1"))),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn sync_is_for_students_only() {
        let coach = token("coach-1", Role::Coach);
        let (status, body) = send(
            app(Arc::default()),
            request("POST", "/sync/push", Some(&coach), Some(push_body("m1"))),
        )
        .await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "Forbidden");
    }

    #[tokio::test]
    async fn push_uses_token_identity() {
        let repo = Arc::new(MemoryRepository::default());
        let student = token("student-7", Role::Student);

        let (status, body) = send(
            app(repo.clone()),
            request("POST", "/sync/push", Some(&student), Some(push_body("m1"))),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "processedIds": ["m1"], "failedIds": [] }));
        assert_eq!(repo.workout_logs()[0].student_id, "student-7");
    }

    #[tokio::test]
    async fn bootstrap_wire_shape() {
        let student = token("student-1", Role::Student);
        let (status, body) = send(
            app(Arc::default()),
            request("GET", "/sync/bootstrap", Some(&student), None),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["assignedPlans"], json!([]));
        assert_eq!(body["workoutLogs"], json!([]));
        assert_eq!(body["exercises"], json!([]));
        assert!(body["timestamp"].as_u64().unwrap() > 0);
    }

    #[tokio::test]
    async fn invalid_plan_is_rejected() {
        let coach = token("coach-1", Role::Coach);
        let plan = json!({
            "title": "Split",
            "days": [
                { "name": "A", "order": 1, "exercises": [] },
                { "name": "B", "order": 1, "exercises": [] }
            ]
        });

        let (status, body) = send(
            app(Arc::default()),
            request("POST", "/plans", Some(&coach), Some(plan)),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Validation failed");
        assert!(body["details"].as_str().unwrap().contains("duplicate order"));
    }

    #[tokio::test]
    async fn students_cannot_manage_plans() {
        let student = token("student-1", Role::Student);
        let (status, _) = send(
            app(Arc::default()),
            request(
                "POST",
                "/plans/plan-1/assign",
                Some(&student),
                Some(json!({ "studentId": "student-1", "startDate": "2024-03-10T00:00:00Z" })),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn registration_is_validated_before_storage() {
        let (status, body) = send(
            app(Arc::default()),
            request(
                "POST",
                "/auth/register",
                None,
                Some(json!({ "email": "ana@example.com", "password": "123", "name": "Ana" })),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("Password"));
    }

    #[tokio::test]
    async fn exercise_catalog_is_role_checked() {
        let student = token("student-1", Role::Student);
        let (status, _) = send(
            app(Arc::default()),
            request(
                "POST",
                "/exercises",
                Some(&student),
                Some(json!({ "title": "Deadlift" })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let admin = token("admin-1", Role::Admin);
        let (status, _) = send(
            app(Arc::default()),
            request("GET", "/exercises", Some(&admin), None),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = send(app(Arc::default()), request("GET", "/exercises", None, None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn invalid_exercise_is_rejected() {
        let coach = token("coach-1", Role::Coach);
        let (status, body) = send(
            app(Arc::default()),
            request(
                "POST",
                "/exercises",
                Some(&coach),
                Some(json!({ "title": "Row", "defaultSeriesSpec": "4000000000x10" })),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Validation failed");
    }

    #[tokio::test]
    async fn oversized_series_spec_is_rejected() {
        let coach = token("coach-1", Role::Coach);
        let plan = json!({
            "title": "Volume",
            "days": [{ "name": "A", "order": 1, "exercises": [
                { "exerciseId": "ex-1", "seriesSpecType": "REPS", "sets": 3, "reps": "4000000000x10", "order": 1 }
            ]}]
        });

        let (status, body) = send(
            app(Arc::default()),
            request("POST", "/plans", Some(&coach), Some(plan)),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["details"].as_str().unwrap().contains("series spec"));
    }
}
