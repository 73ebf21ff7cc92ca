use std::env;

use anyhow::Context;

const DEFAULT_GEMINI_API_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent";
const DEFAULT_ALLOWED_ORIGINS: &str = "aitrainer.marlonbochi.com.br,projects.vercel.app";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    /// Anything other than `development`/`dev` runs as production.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Environment::Development,
            _ => Environment::Production,
        }
    }

    pub fn is_development(self) -> bool {
        self == Environment::Development
    }
}

/// Where the last preferences and plan are remembered, if anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanStoreBackend {
    Disabled,
    Memory,
}

impl PlanStoreBackend {
    pub fn from_name(name: &str) -> anyhow::Result<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "" | "none" | "off" => Ok(PlanStoreBackend::Disabled),
            "memory" => Ok(PlanStoreBackend::Memory),
            other => anyhow::bail!("PLAN_STORE must be `none` or `memory`, got `{other}`"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub gemini_api_url: String,
    pub gemini_timeout_secs: u64,
    pub port: String,
    pub allowed_origins: Vec<String>,
    pub environment: Environment,
    pub plan_store: PlanStoreBackend,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let gemini_api_key = lookup("GEMINI_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .context("GEMINI_API_KEY must be set")?;
        let gemini_api_url =
            lookup("GEMINI_API_URL").unwrap_or_else(|| DEFAULT_GEMINI_API_URL.to_string());
        let gemini_timeout_secs = match lookup("GEMINI_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .with_context(|| format!("GEMINI_TIMEOUT_SECS must be a positive number: {raw}"))?,
            None => 60,
        };
        let port = lookup("PORT").unwrap_or_else(|| "3000".to_string());
        let allowed_origins = parse_origins(
            &lookup("ALLOWED_ORIGINS").unwrap_or_else(|| DEFAULT_ALLOWED_ORIGINS.to_string()),
        );
        let environment = lookup("APP_ENV")
            .map(|name| Environment::from_name(&name))
            .unwrap_or(Environment::Production);
        let plan_store = match lookup("PLAN_STORE") {
            Some(name) => PlanStoreBackend::from_name(&name)?,
            None => PlanStoreBackend::Disabled,
        };

        Ok(Self {
            gemini_api_key,
            gemini_api_url,
            gemini_timeout_secs,
            port,
            allowed_origins,
            environment,
            plan_store,
        })
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|origin| origin.trim().to_ascii_lowercase())
        .filter(|origin| !origin.is_empty())
        .collect()
}
