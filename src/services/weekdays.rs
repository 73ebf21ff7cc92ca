use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::services::language::Language;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

pub const WEEK: [Weekday; 7] = [
    Weekday::Monday,
    Weekday::Tuesday,
    Weekday::Wednesday,
    Weekday::Thursday,
    Weekday::Friday,
    Weekday::Saturday,
    Weekday::Sunday,
];

// Every spelling we accept, already folded (lowercase, no accents, '-' separators).
// Canonical keys from `Weekday::key` must be listed here too.
const SPELLINGS: &[(&str, Language, Weekday)] = &[
    ("monday", Language::En, Weekday::Monday),
    ("mon", Language::En, Weekday::Monday),
    ("segunda-feira", Language::Pt, Weekday::Monday),
    ("segunda", Language::Pt, Weekday::Monday),
    ("seg", Language::Pt, Weekday::Monday),
    ("tuesday", Language::En, Weekday::Tuesday),
    ("tue", Language::En, Weekday::Tuesday),
    ("tues", Language::En, Weekday::Tuesday),
    ("terca-feira", Language::Pt, Weekday::Tuesday),
    ("terca", Language::Pt, Weekday::Tuesday),
    ("ter", Language::Pt, Weekday::Tuesday),
    ("wednesday", Language::En, Weekday::Wednesday),
    ("wed", Language::En, Weekday::Wednesday),
    ("quarta-feira", Language::Pt, Weekday::Wednesday),
    ("quarta", Language::Pt, Weekday::Wednesday),
    ("qua", Language::Pt, Weekday::Wednesday),
    ("thursday", Language::En, Weekday::Thursday),
    ("thu", Language::En, Weekday::Thursday),
    ("thurs", Language::En, Weekday::Thursday),
    ("quinta-feira", Language::Pt, Weekday::Thursday),
    ("quinta", Language::Pt, Weekday::Thursday),
    ("qui", Language::Pt, Weekday::Thursday),
    ("friday", Language::En, Weekday::Friday),
    ("fri", Language::En, Weekday::Friday),
    ("sexta-feira", Language::Pt, Weekday::Friday),
    ("sexta", Language::Pt, Weekday::Friday),
    ("sex", Language::Pt, Weekday::Friday),
    ("saturday", Language::En, Weekday::Saturday),
    ("sat", Language::En, Weekday::Saturday),
    ("sabado", Language::Pt, Weekday::Saturday),
    ("sab", Language::Pt, Weekday::Saturday),
    ("sunday", Language::En, Weekday::Sunday),
    ("sun", Language::En, Weekday::Sunday),
    ("domingo", Language::Pt, Weekday::Sunday),
    ("dom", Language::Pt, Weekday::Sunday),
];

impl Weekday {
    /// Resolves any known spelling in either language.
    pub fn parse(raw: &str) -> Option<Self> {
        let folded = fold_spelling(raw);
        SPELLINGS
            .iter()
            .find(|(spelling, _, _)| *spelling == folded)
            .map(|(_, _, day)| *day)
    }

    /// Canonical plan key for this day in `language`.
    pub fn key(self, language: Language) -> &'static str {
        match (self, language) {
            (Weekday::Monday, Language::En) => "monday",
            (Weekday::Tuesday, Language::En) => "tuesday",
            (Weekday::Wednesday, Language::En) => "wednesday",
            (Weekday::Thursday, Language::En) => "thursday",
            (Weekday::Friday, Language::En) => "friday",
            (Weekday::Saturday, Language::En) => "saturday",
            (Weekday::Sunday, Language::En) => "sunday",
            (Weekday::Monday, Language::Pt) => "segunda-feira",
            (Weekday::Tuesday, Language::Pt) => "terca-feira",
            (Weekday::Wednesday, Language::Pt) => "quarta-feira",
            (Weekday::Thursday, Language::Pt) => "quinta-feira",
            (Weekday::Friday, Language::Pt) => "sexta-feira",
            (Weekday::Saturday, Language::Pt) => "sabado",
            (Weekday::Sunday, Language::Pt) => "domingo",
        }
    }
}

impl Serialize for Weekday {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.key(Language::En))
    }
}

fn fold_spelling(raw: &str) -> String {
    raw.trim()
        .chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ã' => 'a',
            'é' | 'ê' => 'e',
            'í' => 'i',
            'ó' | 'ô' | 'õ' => 'o',
            'ú' | 'ü' => 'u',
            'ç' => 'c',
            ' ' | '_' => '-',
            other => other,
        })
        .collect()
}

pub fn join_keys(days: &[Weekday], language: Language) -> String {
    days.iter()
        .map(|day| day.key(language))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Training days requested by the caller and the rest days they imply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekSchedule {
    training: Vec<Weekday>,
}

impl WeekSchedule {
    /// Never empty: with nothing selected the schedule falls back to Monday.
    pub fn from_selected(selected: &[Weekday]) -> Self {
        let mut training = Vec::with_capacity(selected.len());
        for day in selected {
            if !training.contains(day) {
                training.push(*day);
            }
        }
        if training.is_empty() {
            training.push(Weekday::Monday);
        }
        Self { training }
    }

    pub fn training_days(&self) -> &[Weekday] {
        &self.training
    }

    pub fn rest_days(&self) -> Vec<Weekday> {
        WEEK.iter()
            .copied()
            .filter(|day| !self.training.contains(day))
            .collect()
    }

    pub fn is_training_day(&self, day: Weekday) -> bool {
        self.training.contains(&day)
    }
}

/// Key of a plan entry: a recognized weekday, or whatever the model wrote.
/// Weekdays sort in week order ahead of unrecognized keys.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DayKey {
    Day(Weekday),
    Other(String),
}

impl DayKey {
    pub fn from_raw(raw: &str) -> Self {
        match Weekday::parse(raw) {
            Some(day) => DayKey::Day(day),
            None => DayKey::Other(raw.to_string()),
        }
    }

    pub fn render(&self, language: Language) -> &str {
        match self {
            DayKey::Day(day) => day.key(language),
            DayKey::Other(raw) => raw,
        }
    }
}

/// Re-keys a reply body by weekday. When two spellings land on the same day the
/// first one seen is kept.
pub fn canonicalize_keys(body: Map<String, Value>) -> BTreeMap<DayKey, Value> {
    let mut days = BTreeMap::new();

    for (raw_key, value) in body {
        match days.entry(DayKey::from_raw(&raw_key)) {
            Entry::Vacant(slot) => {
                slot.insert(value);
            }
            Entry::Occupied(slot) => {
                tracing::warn!(
                    day = %raw_key,
                    kept = ?slot.key(),
                    "plan.duplicate_day_dropped"
                );
            }
        }
    }

    days
}
