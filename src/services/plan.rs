use std::collections::BTreeMap;
use std::fmt::Debug;

use serde::de::DeserializeOwned;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Number, Value};

use crate::services::language::Language;
use crate::services::weekdays::{DayKey, Weekday};

/// The two plan domains. Each names the per-day payload and the envelope the
/// model may wrap its answer in.
pub trait PlanKind {
    const NAME: &'static str;

    type Day: DeserializeOwned + Serialize + Debug + Clone + PartialEq;

    /// Tagged union of accepted top-level reply shapes, collapsed into the plan body.
    type Envelope: DeserializeOwned + Into<Map<String, Value>>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Workout;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Nutrition;

pub type WorkoutPlan = CanonicalPlan<Workout>;
pub type MealPlan = CanonicalPlan<Nutrition>;

/// One exercise of a workout day. Fields the model adds beyond these are kept.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Exercise {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WorkoutDay {
    Exercises(Vec<Exercise>),
    Rest(String),
    Other(Value),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NutritionFacts {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calories: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protein: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carbs: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fat: Option<Number>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Meal {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nutrition: Option<NutritionFacts>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DayMeals {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breakfast: Option<Meal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lunch: Option<Meal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dinner: Option<Meal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snacks: Option<Vec<Meal>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NutritionDay {
    Meals(DayMeals),
    Other(Value),
}

/// A plan keyed by weekday. Serializes as a JSON object whose weekday keys are
/// spelled in the plan's language.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalPlan<K: PlanKind> {
    language: Language,
    days: BTreeMap<DayKey, K::Day>,
}

impl<K: PlanKind> CanonicalPlan<K> {
    pub fn new(language: Language, days: BTreeMap<DayKey, K::Day>) -> Self {
        Self { language, days }
    }

    pub fn day_count(&self) -> usize {
        self.days.len()
    }

    /// Days from `expected` the model left out.
    pub fn missing_days(&self, expected: &[Weekday]) -> Vec<Weekday> {
        expected
            .iter()
            .copied()
            .filter(|day| !self.days.contains_key(&DayKey::Day(*day)))
            .collect()
    }
}

#[cfg(test)]
impl<K: PlanKind> CanonicalPlan<K> {
    pub fn day(&self, day: Weekday) -> Option<&K::Day> {
        self.days.get(&DayKey::Day(day))
    }
}

impl<K: PlanKind> Serialize for CanonicalPlan<K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.days.len()))?;
        for (key, day) in &self.days {
            map.serialize_entry(key.render(self.language), day)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_workout_day_shapes() {
        let exercises: WorkoutDay =
            serde_json::from_value(json!([{"name": "Squat", "description": "3x12", "sets": 3}]))
                .unwrap();
        let WorkoutDay::Exercises(list) = &exercises else {
            panic!("expected exercises, got {exercises:?}");
        };
        assert_eq!(list[0].name.as_deref(), Some("Squat"));
        assert_eq!(list[0].image, None);
        assert_eq!(list[0].extra.get("sets"), Some(&json!(3)));

        let rest: WorkoutDay = serde_json::from_value(json!("Rest day")).unwrap();
        assert_eq!(rest, WorkoutDay::Rest("Rest day".to_string()));

        let other: WorkoutDay = serde_json::from_value(json!({"focus": "legs"})).unwrap();
        assert_eq!(other, WorkoutDay::Other(json!({"focus": "legs"})));
    }

    #[test]
    fn test_meal_keeps_absent_fields_absent() {
        let day: NutritionDay = serde_json::from_value(json!({
            "breakfast": {"name": "Oats", "nutrition": {"calories": 280, "protein": 12.5}},
            "snacks": []
        }))
        .unwrap();

        assert_eq!(
            serde_json::to_value(&day).unwrap(),
            json!({
                "breakfast": {"name": "Oats", "nutrition": {"calories": 280, "protein": 12.5}},
                "snacks": []
            })
        );
    }

    #[test]
    fn test_plan_serializes_localized_keys_in_week_order() {
        let mut days = BTreeMap::new();
        days.insert(
            DayKey::Day(Weekday::Wednesday),
            WorkoutDay::Rest("Dia de descanso".to_string()),
        );
        days.insert(DayKey::Other("extra".to_string()), WorkoutDay::Other(json!(1)));
        days.insert(
            DayKey::Day(Weekday::Monday),
            WorkoutDay::Exercises(vec![Exercise {
                name: Some("Agachamento".to_string()),
                ..Default::default()
            }]),
        );
        let plan = WorkoutPlan::new(Language::Pt, days);

        let rendered = serde_json::to_string(&plan).unwrap();
        assert_eq!(
            rendered,
            r#"{"segunda-feira":[{"name":"Agachamento"}],"quarta-feira":"Dia de descanso","extra":1}"#
        );
        assert_eq!(
            plan.missing_days(&[Weekday::Monday, Weekday::Friday]),
            vec![Weekday::Friday]
        );
    }
}
