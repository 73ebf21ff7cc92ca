use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Language a plan is requested in. Decides prompt phrasing and the weekday
/// keys of the returned plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Pt,
}

impl Language {
    /// Any `pt*` tag (`pt`, `pt-BR`, `PT_pt`) is Portuguese, everything else English.
    pub fn from_tag(tag: &str) -> Self {
        if tag.trim().to_ascii_lowercase().starts_with("pt") {
            Language::Pt
        } else {
            Language::En
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Pt => "pt",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Language {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(Self::from_tag(&tag))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_tag() {
        assert_eq!(Language::from_tag("pt"), Language::Pt);
        assert_eq!(Language::from_tag("pt-BR"), Language::Pt);
        assert_eq!(Language::from_tag(" PT "), Language::Pt);
        assert_eq!(Language::from_tag("en"), Language::En);
        assert_eq!(Language::from_tag("es"), Language::En);
        assert_eq!(Language::from_tag(""), Language::En);
    }
}
