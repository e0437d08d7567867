//! HTTP routes.
//!
//! Every response body is JSON with a `success` flag. Calculation errors
//! are a `200`, a malformed request body keeps the status axum assigns to
//! it, and a panic inside a calculation turns into a `500`.

use std::any::Any;
use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tokio::task::{self, JoinError};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use quadrant::{load_example, CalculationRequest, Calculator, ExamplePreset};

#[derive(Serialize)]
struct Success<T> {
    success: bool,
    #[serde(flatten)]
    body: T,
}

#[derive(Serialize)]
struct Failure {
    success: bool,
    error: String,
}

#[derive(Serialize)]
struct ExampleBody {
    example: ExamplePreset,
}

fn success<T: Serialize>(body: T) -> Response {
    Json(Success {
        success: true,
        body,
    })
    .into_response()
}

fn failure(status: StatusCode, error: String) -> Response {
    (
        status,
        Json(Failure {
            success: false,
            error,
        }),
    )
        .into_response()
}

/// Builds the application router around a shared calculator.
pub fn app(calculator: Calculator) -> Router {
    Router::new()
        .route("/calculate", post(calculate))
        .route("/example/{name}", get(example))
        .route("/favicon.ico", get(favicon))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(calculator))
}

async fn calculate(
    State(calculator): State<Arc<Calculator>>,
    body: Result<Json<CalculationRequest>, JsonRejection>,
) -> Response {
    let request = match body {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "malformed calculation request");
            return failure(rejection.status(), rejection.body_text());
        }
    };
    // Symbolic work and PNG encoding are CPU-bound.
    let outcome = task::spawn_blocking(move || calculator.calculate(&request)).await;
    match outcome {
        Ok(Ok(response)) => success(response),
        Ok(Err(err)) => {
            warn!(error = %err, "calculation rejected");
            failure(StatusCode::OK, err.to_string())
        }
        Err(join) => {
            let message = join_message(join);
            error!(%message, "calculation panicked");
            failure(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("unexpected error: {message}"),
            )
        }
    }
}

async fn example(Path(name): Path<String>) -> Response {
    match load_example(&name) {
        Ok(example) => success(ExampleBody { example }),
        Err(err) => failure(StatusCode::OK, err.to_string()),
    }
}

async fn favicon() -> StatusCode {
    StatusCode::NO_CONTENT
}

fn join_message(join: JoinError) -> String {
    if !join.is_panic() {
        return join.to_string();
    }
    panic_message(join.into_panic())
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    match payload.downcast::<String>() {
        Ok(s) => *s,
        Err(payload) => payload
            .downcast_ref::<&str>()
            .map_or_else(|| "calculation panicked".to_owned(), |s| (*s).to_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use quadrant::plot::PlotOptions;
    use quadrant::CalculatorConfig;

    fn router() -> Router {
        app(Calculator::with_config(CalculatorConfig {
            plot: PlotOptions {
                width: 200,
                height: 120,
                ..PlotOptions::default()
            },
            ..CalculatorConfig::default()
        }))
    }

    async fn send(request: Request<Body>) -> (StatusCode, Value) {
        let response = router().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    fn post_json(body: &Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/calculate")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_calculate_success() {
        let (status, body) = send(post_json(&json!({
            "function": "x^2",
            "lower": "0",
            "upper": "2",
            "compute_area": true,
            "show_area_steps": true,
        })))
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["function"], "x**2");
        assert_eq!(body["area"]["symbolic"], "8/3");
        assert!(body["area"]["steps"].as_array().is_some_and(|s| !s.is_empty()));
        assert!(body.get("volume").is_none());
        assert!(body["plot"].as_str().is_some_and(|p| !p.is_empty()));
    }

    #[test]
    fn test_calculate_missing_fields_default() {
        let request: CalculationRequest = serde_json::from_value(json!({"function": "x"})).unwrap();
        assert!(!request.compute_area);
        assert!(request.lower.is_empty());
    }

    #[tokio::test]
    async fn test_calculate_failure_is_ok_status() {
        let (status, body) = send(post_json(&json!({
            "function": "x + y",
            "lower": "0",
            "upper": "1",
            "compute_area": true,
        })))
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().is_some_and(|e| e.contains('y')));

        let (_, body) = send(post_json(&json!({"function": "x", "lower": "0", "upper": "1"}))).await;
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_malformed_body_is_json() {
        let request = Request::builder()
            .method("POST")
            .uri("/calculate")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().is_some_and(|e| !e.is_empty()));

        let (status, body) = send(post_json(&json!({"function": "x", "compute_area": "yes"}))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().is_some_and(|e| e.contains("compute_area")));

        let request = Request::builder()
            .method("POST")
            .uri("/calculate")
            .body(Body::from("{}"))
            .unwrap();
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_deeply_nested_function_is_rejected() {
        let function = format!("{}x{}", "(".repeat(20_000), ")".repeat(20_000));
        let (status, body) = send(post_json(&json!({
            "function": function,
            "lower": "0",
            "upper": "1",
            "compute_area": true,
        })))
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().is_some_and(|e| e.contains("nested")));
    }

    #[tokio::test]
    async fn test_example() {
        let request = Request::get("/example/parabola").body(Body::empty()).unwrap();
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "success": true,
                "example": {
                    "function": "x**2",
                    "lower": "0",
                    "upper": "2",
                    "compute_area": true,
                    "compute_volume": false,
                }
            })
        );

        let request = Request::get("/example/spiral").body(Body::empty()).unwrap();
        let (_, body) = send(request).await;
        assert_eq!(body, json!({"success": false, "error": "example not found: spiral"}));
    }

    #[tokio::test]
    async fn test_favicon() {
        let request = Request::get("/favicon.ico").body(Body::empty()).unwrap();
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(body, Value::Null);
    }

    #[tokio::test]
    async fn test_panic_becomes_500() {
        let join = task::spawn_blocking(|| panic!("boom")).await.unwrap_err();
        let response = failure(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("unexpected error: {}", join_message(join)),
        );
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({"success": false, "error": "unexpected error: boom"}));
    }
}
