use axum::Json;
use axum::body::Bytes;
use axum::extract::State;

use crate::api::errors::{ApiError, PlanType};
use crate::config::Config;
use crate::services::plan::{Exercise, MealPlan, WorkoutPlan};
use crate::services::plan_generator::PlanService;
use crate::services::preferences;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub plan_service: PlanService,
}

impl AppState {
    fn expose_error_details(&self) -> bool {
        self.config.environment.is_development()
    }
}

pub async fn generate_workout(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<WorkoutPlan>, ApiError> {
    let preferences = preferences::workout_from_slice(&body);
    tracing::info!(
        language = %preferences.language,
        days_per_week = preferences.days_per_week,
        "workout.requested"
    );

    match state.plan_service.generate_workout(&preferences).await {
        Ok(plan) => Ok(Json(plan)),
        Err(e) => {
            tracing::error!(error = %e, "failed to generate workout plan");
            Err(ApiError::generation(
                PlanType::Workout,
                preferences.language,
                &e,
                state.expose_error_details(),
            ))
        }
    }
}

pub async fn generate_nutrition(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<MealPlan>, ApiError> {
    let preferences = preferences::nutrition_from_slice(&body);
    tracing::info!(
        language = %preferences.language,
        calories_per_day = preferences.calories_per_day,
        "nutrition.requested"
    );

    match state.plan_service.generate_nutrition(&preferences).await {
        Ok(plan) => Ok(Json(plan)),
        Err(e) => {
            tracing::error!(error = %e, "failed to generate meal plan");
            Err(ApiError::generation(
                PlanType::Nutrition,
                preferences.language,
                &e,
                state.expose_error_details(),
            ))
        }
    }
}

pub async fn swap_exercise(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Exercise>, ApiError> {
    let request = preferences::exercise_swap_from_slice(&body);
    tracing::info!(exercise = %request.name_workout, "exercise_swap.requested");

    match state.plan_service.swap_exercise(&request).await {
        Ok(exercise) => Ok(Json(exercise)),
        Err(e) => {
            tracing::error!(error = %e, "failed to swap exercise");
            Err(ApiError::generation(
                PlanType::ExerciseSwap,
                request.language,
                &e,
                state.expose_error_details(),
            ))
        }
    }
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
