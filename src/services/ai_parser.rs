use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::services::language::Language;
use crate::services::plan::{
    CanonicalPlan, Exercise, Nutrition, NutritionDay, PlanKind, Workout, WorkoutDay,
};
use crate::services::weekdays::{self, DayKey};

static OPENING_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\A\s*```(?:json)?[ \t]*").expect("valid fence regex"));
static CLOSING_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```\s*\z").expect("valid fence regex"));

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to parse upstream response: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("upstream response is a JSON {found}, expected an object")]
    UnexpectedShape { found: &'static str },
}

#[derive(Deserialize)]
#[serde(untagged)]
pub enum WorkoutEnvelope {
    Wrapped { workout: Map<String, Value> },
    Bare(Map<String, Value>),
}

impl From<WorkoutEnvelope> for Map<String, Value> {
    fn from(envelope: WorkoutEnvelope) -> Self {
        match envelope {
            WorkoutEnvelope::Wrapped { workout } => workout,
            WorkoutEnvelope::Bare(body) => body,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
pub enum MealPlanEnvelope {
    Wrapped {
        #[serde(rename = "mealPlan", alias = "meal_plan")]
        meal_plan: Map<String, Value>,
    },
    Bare(Map<String, Value>),
}

impl From<MealPlanEnvelope> for Map<String, Value> {
    fn from(envelope: MealPlanEnvelope) -> Self {
        match envelope {
            MealPlanEnvelope::Wrapped { meal_plan } => meal_plan,
            MealPlanEnvelope::Bare(body) => body,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ExerciseEnvelope {
    Workout { workout: Exercise },
    Exercise { exercise: Exercise },
    Bare(Exercise),
}

impl PlanKind for Workout {
    const NAME: &'static str = "workout";
    type Day = WorkoutDay;
    type Envelope = WorkoutEnvelope;
}

impl PlanKind for Nutrition {
    const NAME: &'static str = "nutrition";
    type Day = NutritionDay;
    type Envelope = MealPlanEnvelope;
}

/// Turns a raw model reply into a plan keyed by `language`'s weekdays.
pub fn parse_plan_reply<K: PlanKind>(
    reply: &str,
    language: Language,
) -> Result<CanonicalPlan<K>, ParseError> {
    let parsed_json = parse_reply_json(reply)?;
    let body = unwrap_envelope::<K>(parsed_json)?;

    let days: BTreeMap<DayKey, K::Day> = weekdays::canonicalize_keys(body)
        .into_iter()
        .map(|(key, value)| -> Result<_, ParseError> {
            Ok((key, serde_json::from_value(value)?))
        })
        .collect::<Result<_, _>>()?;

    Ok(CanonicalPlan::new(language, days))
}

/// Reads a single replacement exercise out of a model reply.
pub fn parse_exercise_reply(reply: &str) -> Result<Exercise, ParseError> {
    let parsed_json = parse_reply_json(reply)?;
    if !parsed_json.is_object() {
        return Err(ParseError::UnexpectedShape {
            found: json_kind(&parsed_json),
        });
    }

    let exercise = match serde_json::from_value(parsed_json)? {
        ExerciseEnvelope::Workout { workout } => workout,
        ExerciseEnvelope::Exercise { exercise } => exercise,
        ExerciseEnvelope::Bare(exercise) => exercise,
    };
    Ok(exercise)
}

pub fn strip_code_fences(reply: &str) -> &str {
    let start = OPENING_FENCE.find(reply).map_or(0, |m| m.end());
    let rest = &reply[start..];
    let end = CLOSING_FENCE.find(rest).map_or(rest.len(), |m| m.start());
    rest[..end].trim()
}

fn parse_reply_json(reply: &str) -> Result<Value, ParseError> {
    let parsed_json: Value = serde_json::from_str(strip_code_fences(reply))?;

    // Some replies arrive as a JSON string holding the actual document.
    match parsed_json {
        Value::String(inner) => Ok(serde_json::from_str(strip_code_fences(&inner))?),
        other => Ok(other),
    }
}

fn unwrap_envelope<K: PlanKind>(parsed_json: Value) -> Result<Map<String, Value>, ParseError> {
    let found = json_kind(&parsed_json);
    serde_json::from_value::<K::Envelope>(parsed_json)
        .map(Into::into)
        .map_err(|_| ParseError::UnexpectedShape { found })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
