use axum::http::{Method, header::CONTENT_TYPE};
use axum::middleware;
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api::origin::validate_origin;
use crate::api::plans::{
    AppState, generate_nutrition, generate_workout, method_not_allowed, swap_exercise,
};

pub mod errors;
pub mod origin;
pub mod plans;

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route(
            "/api/workout",
            post(generate_workout).fallback(method_not_allowed),
        )
        .route(
            "/api/nutrition",
            post(generate_nutrition).fallback(method_not_allowed),
        )
        .route(
            "/api/workout/edit",
            post(swap_exercise).fallback(method_not_allowed),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), validate_origin));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        .route("/", get(|| async { "ok" }))
        .merge(api)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::gemini::GeminiClient;
    use crate::config::{Config, Environment, PlanStoreBackend};
    use crate::services::plan_generator::PlanService;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header::REFERER};
    use axum::response::Response;
    use serde_json::{Value, json};
    use tower::ServiceExt;
    use wiremock::matchers::{body_string_contains, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn app_replying(reply: &str, environment: Environment) -> (MockServer, Router) {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{"content": {"parts": [{"text": reply}]}}]
            })))
            .mount(&server)
            .await;
        let app = app_for(&server, environment);
        (server, app)
    }

    fn app_for(server: &MockServer, environment: Environment) -> Router {
        let config = Config {
            gemini_api_key: "test-key".to_string(),
            gemini_api_url: format!("{}/generate", server.uri()),
            gemini_timeout_secs: 5,
            port: "0".to_string(),
            allowed_origins: vec!["aitrainer.marlonbochi.com.br".to_string()],
            environment,
            plan_store: PlanStoreBackend::Disabled,
        };
        let plan_service = PlanService::new(GeminiClient::new(&config).unwrap());
        router(AppState {
            config,
            plan_service,
        })
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let server = MockServer::start().await;
        let response = app_for(&server, Environment::Production)
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"ok");
    }

    #[tokio::test]
    async fn test_generate_workout() {
        let (_server, app) = app_replying(
            "```json\n{\"workout\":{\"monday\":[{\"name\":\"Squat\",\"description\":\"3x12\"}]}}\n```",
            Environment::Production,
        )
        .await;

        let response = app
            .oneshot(post_json(
                "/api/workout",
                r#"{"language":"en","fitnessLevel":"beginner","goal":"weight_loss","selectedDays":["monday","wednesday","friday"]}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!({"monday": [{"name": "Squat", "description": "3x12"}]})
        );
    }

    #[tokio::test]
    async fn test_prompt_reaches_upstream() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_string_contains("Rest days: tuesday, thursday, saturday, sunday."))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{"content": {"parts": [{"text": "{}"}]}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let response = app_for(&server, Environment::Production)
            .oneshot(post_json(
                "/api/workout",
                r#"{"selectedDays":["monday","wednesday","friday"]}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, json!({}));
    }

    #[tokio::test]
    async fn test_generate_nutrition_in_portuguese() {
        let (_server, app) = app_replying(
            r#"{"meal_plan": {"Segunda": {"lunch": {"name": "Feijoada"}}}}"#,
            Environment::Production,
        )
        .await;

        let response = app
            .oneshot(post_json("/api/nutrition", r#"{"language":"pt"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!({"segunda-feira": {"lunch": {"name": "Feijoada"}}})
        );
    }

    #[tokio::test]
    async fn test_swap_exercise() {
        let (_server, app) = app_replying(
            r#"{"exercise": {"name": "Leg Press", "description": "4x10"}}"#,
            Environment::Production,
        )
        .await;

        let response = app
            .oneshot(post_json(
                "/api/workout/edit",
                r#"{"nameWorkout":"Squat","descriptionWorkout":"4x10","language":"en"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!({"name": "Leg Press", "description": "4x10"})
        );
    }

    #[tokio::test]
    async fn test_wrong_method() {
        let server = MockServer::start().await;

        let response = app_for(&server, Environment::Production)
            .oneshot(Request::get("/api/nutrition").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(json_body(response).await, json!({"error": "Method not allowed"}));
    }

    #[tokio::test]
    async fn test_foreign_referer_is_forbidden() {
        let server = MockServer::start().await;
        let mut request = post_json("/api/workout", "{}");
        request
            .headers_mut()
            .insert(REFERER, "https://evil.example.com/".parse().unwrap());

        let response = app_for(&server, Environment::Production)
            .oneshot(request)
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            json_body(response).await,
            json!({"error": "Forbidden - Invalid origin"})
        );
    }

    #[tokio::test]
    async fn test_allowed_referer_and_development_pass() {
        let (_server, app) = app_replying("{\"monday\": \"Rest day\"}", Environment::Production).await;
        let mut request = post_json("/api/workout", "{}");
        request.headers_mut().insert(
            REFERER,
            "https://AITrainer.marlonbochi.com.br/plan".parse().unwrap(),
        );
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let (_server, app) = app_replying("{\"monday\": \"Rest day\"}", Environment::Development).await;
        let mut request = post_json("/api/workout", "{}");
        request
            .headers_mut()
            .insert(REFERER, "https://evil.example.com/".parse().unwrap());
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unparseable_reply_is_a_localized_500() {
        let (_server, app) = app_replying("{\"monday\": [", Environment::Production).await;

        let response = app
            .oneshot(post_json("/api/workout", r#"{"language":"pt-BR"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            json_body(response).await,
            json!({"error": "Falha ao gerar o plano de treino"})
        );
    }

    #[tokio::test]
    async fn test_error_details_in_development() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let response = app_for(&server, Environment::Development)
            .oneshot(post_json("/api/nutrition", "not json"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(response).await;
        assert_eq!(body["error"], "Failed to generate meal plan");
        assert!(body["details"].as_str().unwrap().contains("overloaded"));
    }
}
