use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::services::language::Language;
use crate::services::weekdays::{WeekSchedule, Weekday};

const DAYS_PER_WEEK_RANGE: (i64, i64) = (2, 7);
const MEALS_PER_DAY_RANGE: (i64, i64) = (3, 8);
const AGE_RANGE: (i64, i64) = (15, 99);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitnessLevel {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutGoal {
    WeightLoss,
    #[default]
    MuscleGain,
    Endurance,
    Strength,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WorkoutDuration {
    #[serde(rename = "15_min")]
    Min15,
    #[default]
    #[serde(rename = "30_min")]
    Min30,
    #[serde(rename = "45_min")]
    Min45,
    #[serde(rename = "60_min")]
    Min60,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DietGoal {
    WeightLoss,
    MuscleGain,
    #[default]
    Maintenance,
    Endurance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    #[default]
    Male,
    Female,
}

impl FitnessLevel {
    pub fn label(self, language: Language) -> &'static str {
        match (self, language) {
            (FitnessLevel::Beginner, Language::En) => "Beginner",
            (FitnessLevel::Intermediate, Language::En) => "Intermediate",
            (FitnessLevel::Advanced, Language::En) => "Advanced",
            (FitnessLevel::Beginner, Language::Pt) => "Iniciante",
            (FitnessLevel::Intermediate, Language::Pt) => "Intermediário",
            (FitnessLevel::Advanced, Language::Pt) => "Avançado",
        }
    }
}

impl WorkoutGoal {
    pub fn label(self, language: Language) -> &'static str {
        match (self, language) {
            (WorkoutGoal::WeightLoss, Language::En) => "Weight Loss",
            (WorkoutGoal::MuscleGain, Language::En) => "Muscle Gain",
            (WorkoutGoal::Endurance, Language::En) => "Endurance",
            (WorkoutGoal::Strength, Language::En) => "Strength",
            (WorkoutGoal::WeightLoss, Language::Pt) => "Perda de Peso",
            (WorkoutGoal::MuscleGain, Language::Pt) => "Ganho de Massa Muscular",
            (WorkoutGoal::Endurance, Language::Pt) => "Resistência",
            (WorkoutGoal::Strength, Language::Pt) => "Força",
        }
    }
}

impl WorkoutDuration {
    pub fn minutes(self) -> u32 {
        match self {
            WorkoutDuration::Min15 => 15,
            WorkoutDuration::Min30 => 30,
            WorkoutDuration::Min45 => 45,
            WorkoutDuration::Min60 => 60,
        }
    }
}

impl DietGoal {
    pub fn label(self, language: Language) -> &'static str {
        match (self, language) {
            (DietGoal::WeightLoss, Language::En) => "Weight Loss",
            (DietGoal::MuscleGain, Language::En) => "Muscle Gain",
            (DietGoal::Maintenance, Language::En) => "Maintenance",
            (DietGoal::Endurance, Language::En) => "Endurance",
            (DietGoal::WeightLoss, Language::Pt) => "Perda de peso",
            (DietGoal::MuscleGain, Language::Pt) => "Ganho de massa muscular",
            (DietGoal::Maintenance, Language::Pt) => "Manutenção",
            (DietGoal::Endurance, Language::Pt) => "Resistência",
        }
    }
}

impl Gender {
    pub fn label(self, language: Language) -> &'static str {
        match (self, language) {
            (Gender::Male, Language::En) => "male",
            (Gender::Female, Language::En) => "female",
            (Gender::Male, Language::Pt) => "masculino",
            (Gender::Female, Language::Pt) => "feminino",
        }
    }
}

/// Fully defaulted workout preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutPreferences {
    pub language: Language,
    pub fitness_level: FitnessLevel,
    pub goal: WorkoutGoal,
    pub duration: WorkoutDuration,
    pub days_per_week: u8,
    pub selected_days: Vec<Weekday>,
    pub available_equipment: Vec<String>,
    pub specific_focus_areas: Vec<String>,
    pub injuries: String,
    pub additional_notes: String,
    pub age: u8,
    pub gender: Gender,
}

impl Default for WorkoutPreferences {
    fn default() -> Self {
        WorkoutRequest::default().normalize()
    }
}

impl WorkoutPreferences {
    /// Training and rest days for the week. With no days selected this is
    /// the single default day.
    pub fn schedule(&self) -> WeekSchedule {
        WeekSchedule::from_selected(&self.selected_days)
    }
}

/// Fully defaulted nutrition preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionPreferences {
    pub language: Language,
    pub diet_goal: DietGoal,
    pub calories_per_day: u32,
    pub budget_per_week: u32,
    pub meals_per_day: u8,
    pub dietary_restrictions: Vec<String>,
    pub allergies: Vec<String>,
    pub preferred_cuisines: Vec<String>,
    pub additional_notes: String,
    pub age: u8,
    pub gender: Gender,
}

impl Default for NutritionPreferences {
    fn default() -> Self {
        NutritionRequest::default().normalize()
    }
}

/// Workout request body as sent by the client. Every field is optional and a
/// field of the wrong type reads as absent.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutRequest {
    #[serde(default, deserialize_with = "lenient")]
    pub language: Option<Language>,
    #[serde(default, deserialize_with = "lenient")]
    pub fitness_level: Option<FitnessLevel>,
    #[serde(default, deserialize_with = "lenient")]
    pub goal: Option<WorkoutGoal>,
    #[serde(default, deserialize_with = "lenient")]
    pub duration: Option<WorkoutDuration>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub days_per_week: Option<i64>,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub selected_days: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub available_equipment: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub trainer_location: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub specific_focus_areas: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient")]
    pub injuries: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub additional_notes: Option<String>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub age: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub gender: Option<Gender>,
}

impl WorkoutRequest {
    pub fn normalize(self) -> WorkoutPreferences {
        let selected_days = resolve_days(self.selected_days.unwrap_or_default());

        let days_per_week = if selected_days.is_empty() {
            clamp(self.days_per_week.unwrap_or(3), DAYS_PER_WEEK_RANGE)
        } else {
            selected_days.len() as u8
        };

        let mut available_equipment = self.available_equipment.unwrap_or_default();
        available_equipment.extend(self.trainer_location.unwrap_or_default());

        WorkoutPreferences {
            language: self.language.unwrap_or_default(),
            fitness_level: self.fitness_level.unwrap_or_default(),
            goal: self.goal.unwrap_or_default(),
            duration: self.duration.unwrap_or_default(),
            days_per_week,
            selected_days,
            available_equipment: clean_list(available_equipment),
            specific_focus_areas: clean_list(self.specific_focus_areas.unwrap_or_default()),
            injuries: clean_text(self.injuries),
            additional_notes: clean_text(self.additional_notes),
            age: clamp(self.age.unwrap_or(30), AGE_RANGE),
            gender: self.gender.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionRequest {
    #[serde(default, deserialize_with = "lenient")]
    pub language: Option<Language>,
    #[serde(default, deserialize_with = "lenient")]
    pub diet_goal: Option<DietGoal>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub calories_per_day: Option<i64>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub budget_per_week: Option<i64>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub meals_per_day: Option<i64>,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub dietary_restrictions: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub allergies: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub preferred_cuisines: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient")]
    pub additional_notes: Option<String>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub age: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub gender: Option<Gender>,
}

impl NutritionRequest {
    pub fn normalize(self) -> NutritionPreferences {
        NutritionPreferences {
            language: self.language.unwrap_or_default(),
            diet_goal: self.diet_goal.unwrap_or_default(),
            calories_per_day: non_negative(self.calories_per_day, 2000),
            budget_per_week: non_negative(self.budget_per_week, 100),
            meals_per_day: clamp(self.meals_per_day.unwrap_or(3), MEALS_PER_DAY_RANGE),
            dietary_restrictions: clean_list(self.dietary_restrictions.unwrap_or_default()),
            allergies: clean_list(self.allergies.unwrap_or_default()),
            preferred_cuisines: clean_list(self.preferred_cuisines.unwrap_or_default()),
            additional_notes: clean_text(self.additional_notes),
            age: clamp(self.age.unwrap_or(30), AGE_RANGE),
            gender: self.gender.unwrap_or_default(),
        }
    }
}

/// Request to replace one exercise of an existing plan.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseSwapRequest {
    #[serde(default, deserialize_with = "lenient_or_default")]
    pub language: Language,
    #[serde(default, deserialize_with = "lenient_or_default")]
    pub name_workout: String,
    #[serde(default, deserialize_with = "lenient_or_default")]
    pub description_workout: String,
}

pub fn workout_from_slice(body: &[u8]) -> WorkoutPreferences {
    from_slice_or_default::<WorkoutRequest>(body).normalize()
}

pub fn nutrition_from_slice(body: &[u8]) -> NutritionPreferences {
    from_slice_or_default::<NutritionRequest>(body).normalize()
}

pub fn exercise_swap_from_slice(body: &[u8]) -> ExerciseSwapRequest {
    let mut request = from_slice_or_default::<ExerciseSwapRequest>(body);
    request.name_workout = request.name_workout.trim().to_string();
    request.description_workout = request.description_workout.trim().to_string();
    request
}

fn from_slice_or_default<T: DeserializeOwned + Default>(body: &[u8]) -> T {
    if body.iter().all(u8::is_ascii_whitespace) {
        return T::default();
    }

    match serde_json::from_slice(body) {
        Ok(request) => request,
        Err(e) => {
            tracing::warn!(error = %e, "preferences.invalid_body_using_defaults");
            T::default()
        }
    }
}

fn resolve_days(raw_days: Vec<String>) -> Vec<Weekday> {
    let mut days = Vec::with_capacity(raw_days.len());
    for raw in raw_days {
        match Weekday::parse(&raw) {
            Some(day) if !days.contains(&day) => days.push(day),
            Some(_) => {}
            None => tracing::warn!(day = %raw, "preferences.unknown_day_dropped"),
        }
    }
    days
}

fn clamp(value: i64, (min, max): (i64, i64)) -> u8 {
    value.clamp(min, max) as u8
}

fn non_negative(value: Option<i64>, default: u32) -> u32 {
    value
        .and_then(|v| u32::try_from(v).ok())
        .unwrap_or(default)
}

fn clean_list(values: Vec<String>) -> Vec<String> {
    let mut cleaned: Vec<String> = Vec::with_capacity(values.len());
    for value in values {
        let value = value.trim();
        if !value.is_empty() && !cleaned.iter().any(|v| v == value) {
            cleaned.push(value.to_string());
        }
    }
    cleaned
}

fn clean_text(value: Option<String>) -> String {
    value.map(|v| v.trim().to_string()).unwrap_or_default()
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

fn lenient_or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    Ok(lenient(deserializer)?.unwrap_or_default())
}

// Form selects post numbers as strings ("3"), so both shapes are accepted.
fn lenient_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.round() as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_strings<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => Some(
            items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s),
                    _ => None,
                })
                .collect(),
        ),
        Value::String(s) => Some(vec![s]),
        _ => None,
    })
}
