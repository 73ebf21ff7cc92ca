use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::clients::gemini::{GatewayError, GeminiClient};
use crate::services::ai_parser::{self, ParseError};
use crate::services::ai_prompt;
use crate::services::language::Language;
use crate::services::plan::{CanonicalPlan, Exercise, MealPlan, PlanKind, WorkoutPlan};
use crate::services::plan_store::{PlanStore, StoreKey};
use crate::services::preferences::{ExerciseSwapRequest, NutritionPreferences, WorkoutPreferences};
use crate::services::weekdays::{self, WEEK};

#[derive(Debug, Error)]
pub enum PlanError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

#[derive(Clone)]
pub struct PlanService {
    gemini_client: GeminiClient,
    store: Option<Arc<dyn PlanStore>>,
}

impl PlanService {
    pub fn new(gemini_client: GeminiClient) -> Self {
        Self {
            gemini_client,
            store: None,
        }
    }

    pub fn with_store(mut self, store: Arc<dyn PlanStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub async fn generate_workout(
        &self,
        preferences: &WorkoutPreferences,
    ) -> Result<WorkoutPlan, PlanError> {
        let prompt = ai_prompt::build_workout_prompt(preferences);
        let plan = self.request_plan(&prompt, preferences.language).await?;

        info!(
            language = %preferences.language,
            days = plan.day_count(),
            "plan.workout.generated"
        );
        self.remember(StoreKey::WorkoutPreferences, preferences);
        self.remember(StoreKey::GeneratedWorkout, &plan);
        Ok(plan)
    }

    pub async fn generate_nutrition(
        &self,
        preferences: &NutritionPreferences,
    ) -> Result<MealPlan, PlanError> {
        let prompt = ai_prompt::build_nutrition_prompt(preferences);
        let plan = self.request_plan(&prompt, preferences.language).await?;

        info!(
            language = %preferences.language,
            days = plan.day_count(),
            "plan.nutrition.generated"
        );
        self.remember(StoreKey::NutritionPreferences, preferences);
        self.remember(StoreKey::GeneratedNutrition, &plan);
        Ok(plan)
    }

    pub async fn swap_exercise(&self, request: &ExerciseSwapRequest) -> Result<Exercise, PlanError> {
        let prompt = ai_prompt::build_exercise_swap_prompt(request);
        let reply = self.ask(&prompt).await?;

        let exercise = ai_parser::parse_exercise_reply(&reply).inspect_err(|e| {
            error!(error = %e, response = %reply, "exercise.parse_failed");
        })?;

        info!(
            replaced = %request.name_workout,
            replacement = exercise.name.as_deref().unwrap_or_default(),
            "exercise.swapped"
        );
        Ok(exercise)
    }

    async fn request_plan<K: PlanKind>(
        &self,
        prompt: &str,
        language: Language,
    ) -> Result<CanonicalPlan<K>, PlanError> {
        let reply = self.ask(prompt).await?;

        let plan = ai_parser::parse_plan_reply::<K>(&reply, language).inspect_err(|e| {
            error!(kind = K::NAME, error = %e, response = %reply, "plan.parse_failed");
        })?;

        // Accepted as is; the caller still gets whatever days came back.
        let missing = plan.missing_days(&WEEK);
        if !missing.is_empty() {
            warn!(
                kind = K::NAME,
                missing = %weekdays::join_keys(&missing, language),
                "plan.missing_days"
            );
        }

        Ok(plan)
    }

    async fn ask(&self, prompt: &str) -> Result<String, GatewayError> {
        debug!(prompt = %prompt, "gemini.prompt");
        let reply = self.gemini_client.generate_text(prompt).await?;
        debug!(response = %reply, "gemini.response");
        Ok(reply)
    }

    fn remember<T: Serialize>(&self, key: StoreKey, value: &T) {
        let Some(store) = &self.store else {
            return;
        };
        match serde_json::to_value(value) {
            Ok(value) => {
                let replaced = store.load(key).is_some();
                store.save(key, value);
                debug!(key = key.as_str(), replaced, "plan_store.saved");
            }
            Err(e) => warn!(key = key.as_str(), error = %e, "plan_store.save_failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, Environment, PlanStoreBackend};
    use crate::services::plan::WorkoutDay;
    use crate::services::plan_store::MemoryPlanStore;
    use crate::services::preferences::{nutrition_from_slice, workout_from_slice};
    use crate::services::weekdays::Weekday;
    use serde_json::json;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn service_replying(reply: &str) -> (MockServer, PlanService) {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{"content": {"parts": [{"text": reply}]}}]
            })))
            .mount(&server)
            .await;

        let config = Config {
            gemini_api_key: "test-key".to_string(),
            gemini_api_url: format!("{}/generate", server.uri()),
            gemini_timeout_secs: 5,
            port: "0".to_string(),
            allowed_origins: Vec::new(),
            environment: Environment::Development,
            plan_store: PlanStoreBackend::Disabled,
        };
        let service = PlanService::new(GeminiClient::new(&config).unwrap());
        (server, service)
    }

    #[tokio::test]
    async fn test_generate_workout_in_portuguese() {
        let (_server, service) = service_replying(
            "```json\n{\"workout\": {\"monday\": [{\"name\": \"Agachamento\", \"description\": \"3x12\"}], \"tuesday\": \"Dia de descanso\"}}\n```",
        )
        .await;
        let store = Arc::new(MemoryPlanStore::new());
        let service = service.with_store(store.clone());
        let preferences = workout_from_slice(br#"{"language": "pt-BR"}"#);

        let plan = service.generate_workout(&preferences).await.unwrap();

        assert_eq!(
            plan.day(Weekday::Tuesday),
            Some(&WorkoutDay::Rest("Dia de descanso".to_string()))
        );
        let saved = store.load(StoreKey::GeneratedWorkout).unwrap();
        assert_eq!(saved["segunda-feira"][0]["name"], "Agachamento");
        assert_eq!(
            store.load(StoreKey::WorkoutPreferences).unwrap()["language"],
            "pt"
        );
    }

    #[tokio::test]
    async fn test_store_keeps_only_the_latest_plan() {
        let store = Arc::new(MemoryPlanStore::new());

        let (_first, service) = service_replying(r#"{"monday": "Rest day"}"#).await;
        let service = service.with_store(store.clone());
        service
            .generate_workout(&workout_from_slice(b"{}"))
            .await
            .unwrap();

        let (_second, service) = service_replying(r#"{"friday": "Rest day"}"#).await;
        let service = service.with_store(store.clone());
        service
            .generate_workout(&workout_from_slice(br#"{"age": 40}"#))
            .await
            .unwrap();

        assert_eq!(
            store.load(StoreKey::GeneratedWorkout),
            Some(json!({"friday": "Rest day"}))
        );
        assert_eq!(store.load(StoreKey::WorkoutPreferences).unwrap()["age"], 40);
        assert_eq!(store.load(StoreKey::GeneratedNutrition), None);
    }

    #[tokio::test]
    async fn test_generate_nutrition() {
        let (_server, service) = service_replying(
            r#"{"mealPlan": {"sunday": {"breakfast": {"name": "Oats"}}}}"#,
        )
        .await;

        let plan = service
            .generate_nutrition(&nutrition_from_slice(b"{}"))
            .await
            .unwrap();

        assert_eq!(
            serde_json::to_value(&plan).unwrap(),
            json!({"sunday": {"breakfast": {"name": "Oats"}}})
        );
    }

    #[tokio::test]
    async fn test_unparseable_reply_is_a_parse_error() {
        let (_server, service) = service_replying("Sorry, I can't help with that.").await;

        let error = service
            .generate_workout(&workout_from_slice(b"{}"))
            .await
            .unwrap_err();

        assert!(matches!(error, PlanError::Parse(ParseError::InvalidJson(_))));
    }

    #[tokio::test]
    async fn test_upstream_failure_is_a_gateway_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        let config = Config {
            gemini_api_key: "test-key".to_string(),
            gemini_api_url: server.uri(),
            gemini_timeout_secs: 5,
            port: "0".to_string(),
            allowed_origins: Vec::new(),
            environment: Environment::Production,
            plan_store: PlanStoreBackend::Disabled,
        };
        let service = PlanService::new(GeminiClient::new(&config).unwrap());

        let error = service
            .generate_nutrition(&nutrition_from_slice(b"{}"))
            .await
            .unwrap_err();

        assert!(matches!(
            error,
            PlanError::Gateway(GatewayError::Status { .. })
        ));
    }

    #[tokio::test]
    async fn test_swap_exercise() {
        let (_server, service) = service_replying(
            r#"{"workout": {"name": "Leg Press", "description": "4x10", "image": "press.png"}}"#,
        )
        .await;
        let request = ExerciseSwapRequest {
            language: Language::En,
            name_workout: "Squat".to_string(),
            description_workout: "4x10".to_string(),
        };

        let exercise = service.swap_exercise(&request).await.unwrap();

        assert_eq!(exercise.name.as_deref(), Some("Leg Press"));
        assert_eq!(exercise.image.as_deref(), Some("press.png"));
    }
}
