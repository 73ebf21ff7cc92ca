use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use serde_json::Value;

/// Slots a client keeps its last request and plan under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKey {
    WorkoutPreferences,
    GeneratedWorkout,
    NutritionPreferences,
    GeneratedNutrition,
}

impl StoreKey {
    pub fn as_str(self) -> &'static str {
        match self {
            StoreKey::WorkoutPreferences => "workoutPreferences",
            StoreKey::GeneratedWorkout => "generatedWorkout",
            StoreKey::NutritionPreferences => "nutritionPreferences",
            StoreKey::GeneratedNutrition => "generatedNutrition",
        }
    }
}

/// Key-value port for remembering the most recent preferences and plan.
/// Writes are last-write-wins.
pub trait PlanStore: Send + Sync {
    fn load(&self, key: StoreKey) -> Option<Value>;
    fn save(&self, key: StoreKey, value: Value);
}

#[derive(Debug, Default)]
pub struct MemoryPlanStore {
    entries: Mutex<HashMap<StoreKey, Value>>,
}

impl MemoryPlanStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PlanStore for MemoryPlanStore {
    fn load(&self, key: StoreKey) -> Option<Value> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
            .cloned()
    }

    fn save(&self, key: StoreKey, value: Value) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_last_write_wins() {
        let store = MemoryPlanStore::new();
        assert_eq!(store.load(StoreKey::GeneratedWorkout), None);

        store.save(StoreKey::GeneratedWorkout, json!({"monday": []}));
        store.save(StoreKey::GeneratedWorkout, json!({"tuesday": []}));

        assert_eq!(
            store.load(StoreKey::GeneratedWorkout),
            Some(json!({"tuesday": []}))
        );
        assert_eq!(store.load(StoreKey::GeneratedNutrition), None);
    }

    #[test]
    fn test_key_names() {
        assert_eq!(StoreKey::WorkoutPreferences.as_str(), "workoutPreferences");
        assert_eq!(StoreKey::GeneratedNutrition.as_str(), "generatedNutrition");
    }
}
