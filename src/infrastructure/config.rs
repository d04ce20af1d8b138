use crate::domain::subject::{Subject, SubjectCatalog};
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub gemini: GeminiSettings,
    #[serde(default)]
    pub forecast: ForecastSettings,
    #[serde(default)]
    pub series: SeriesSettings,
    #[serde(default)]
    pub chart: ChartSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeminiSettings {
    #[serde(default = "default_gemini_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_gemini_model")]
    pub model: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            base_url: default_gemini_base_url(),
            api_key: String::new(),
            model: default_gemini_model(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ForecastSettings {
    /// Overrides the built-in prompt; supports `${disease}`, `${unit}`,
    /// `${history}`, `${horizon}` and `${start_date}`
    pub prompt_template: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SeriesSettings {
    #[serde(default = "default_weeks")]
    pub weeks: u32,
    pub default_subject: Option<String>,
}

impl Default for SeriesSettings {
    fn default() -> Self {
        Self {
            weeks: default_weeks(),
            default_subject: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChartSettings {
    #[serde(default = "default_chart_width")]
    pub width: f64,
    #[serde(default = "default_chart_height")]
    pub height: f64,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            width: default_chart_width(),
            height: default_chart_height(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct CatalogConfig {
    #[serde(default)]
    pub subjects: Vec<SubjectConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SubjectConfig {
    pub id: String,
    pub name: String,
    pub unit: String,
    pub description: String,
    pub color: String,
    pub weather_factor: String,
    pub base_magnitude: f64,
}

impl From<SubjectConfig> for Subject {
    fn from(config: SubjectConfig) -> Self {
        Subject {
            id: config.id,
            name: config.name,
            unit: config.unit,
            description: config.description,
            color: config.color,
            weather_factor: config.weather_factor,
            base_magnitude: config.base_magnitude,
        }
    }
}

fn default_bind_address() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_gemini_model() -> String {
    "gemini-3-flash-preview".to_string()
}

fn default_timeout_secs() -> u64 {
    crate::application::forecast_client::DEFAULT_TIMEOUT_SECS
}

fn default_weeks() -> u32 {
    crate::application::series_generator::DEFAULT_HISTORY_WEEKS
}

fn default_chart_width() -> f64 {
    900.0
}

fn default_chart_height() -> f64 {
    450.0
}

pub fn load_app_config() -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/epicast"))
        .add_source(config::Environment::with_prefix("EPICAST").separator("__"))
        .build()?;

    let mut app_config: AppConfig = settings.try_deserialize()?;
    if app_config.gemini.api_key.is_empty() {
        if let Ok(key) = std::env::var("GEMINI_API_KEY") {
            app_config.gemini.api_key = key;
        }
    }
    if app_config.gemini.api_key.is_empty() {
        tracing::warn!("no Gemini API key configured; forecast requests will be rejected upstream");
    }

    Ok(app_config)
}

pub fn load_subject_catalog() -> anyhow::Result<SubjectCatalog> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/subjects"))
        .build()?;

    catalog_from(settings.try_deserialize()?)
}

fn catalog_from(config: CatalogConfig) -> anyhow::Result<SubjectCatalog> {
    SubjectCatalog::new(config.subjects.into_iter().map(Subject::from).collect())
}

/// Replace `${name}` placeholders in a prompt template
pub fn prepare_prompt(template: &str, vars: &HashMap<String, String>) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        let placeholder = format!("${{{}}}", key);
        result = result.replace(&placeholder, value);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{Config, File, FileFormat};

    fn parse<T: serde::de::DeserializeOwned>(toml: &str) -> T {
        Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_prepare_prompt() {
        let mut vars = HashMap::new();
        vars.insert("disease".to_string(), "Dengue Fever".to_string());
        vars.insert("horizon".to_string(), "4".to_string());

        let template = "Forecast ${disease} for ${horizon} weeks, ${unknown} stays";
        let result = prepare_prompt(template, &vars);

        assert_eq!(result, "Forecast Dengue Fever for 4 weeks, ${unknown} stays");
    }

    #[test]
    fn test_defaults_apply_for_missing_sections() {
        let config: AppConfig = parse(
            r#"
            [gemini]
            api_key = "secret"
            "#,
        );

        assert_eq!(config.server.bind_address, "0.0.0.0:8080");
        assert_eq!(config.gemini.api_key, "secret");
        assert_eq!(config.gemini.model, "gemini-3-flash-preview");
        assert_eq!(config.gemini.timeout_secs, 60);
        assert_eq!(config.series.weeks, 26);
        assert!(config.series.default_subject.is_none());
        assert!(config.forecast.prompt_template.is_none());
        assert_eq!(config.chart.width, 900.0);
    }

    #[test]
    fn test_bundled_config_files_parse() {
        let app: AppConfig = parse(include_str!("../../config/epicast.toml"));
        assert_eq!(app.series.default_subject.as_deref(), Some("dengue"));

        let catalog = catalog_from(parse(include_str!("../../config/subjects.toml"))).unwrap();
        let ids: Vec<&str> = catalog.subjects().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["dengue", "influenza", "covid19"]);

        let dengue = catalog.get("dengue").unwrap();
        assert_eq!(dengue.base_magnitude, 120.0);
        assert_eq!(dengue.unit, "Weekly Cases");
        assert_eq!(catalog.get("covid19").unwrap().base_magnitude, 2000.0);
    }
}
