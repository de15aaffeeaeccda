use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// GeminiConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// API key; falls back to GEMINI_API_KEY / GOOGLE_API_KEY when unset here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            base_url: default_base_url(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(default)]
    pub gemini: GeminiConfig,
}

fn default_port() -> u16 {
    8787
}

fn default_database_url() -> String {
    "sqlite://stepwise.db".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            database_url: default_database_url(),
            gemini: GeminiConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration: YAML file if present, then env overrides
    /// (STEPWISE_PORT, STEPWISE_DATABASE_URL, STEPWISE_GEMINI_MODEL,
    /// GEMINI_API_KEY / GOOGLE_API_KEY).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) if p.exists() => {
                let data = std::fs::read_to_string(p)?;
                serde_yaml::from_str(&data)?
            }
            _ => Config::default(),
        };
        config.apply_env();
        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Some(port) = std::env::var("STEPWISE_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            self.port = port;
        }
        if let Ok(url) = std::env::var("STEPWISE_DATABASE_URL") {
            self.database_url = url;
        }
        if let Ok(model) = std::env::var("STEPWISE_GEMINI_MODEL") {
            self.gemini.model = model;
        }
        if self.gemini.api_key.as_deref().unwrap_or("").is_empty() {
            self.gemini.api_key = std::env::var("GEMINI_API_KEY")
                .or_else(|_| std::env::var("GOOGLE_API_KEY"))
                .ok()
                .filter(|k| !k.is_empty());
        }
    }

    /// Non-fatal configuration problems, reported at startup.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.gemini.api_key.as_deref().unwrap_or("").is_empty() {
            warnings.push(
                "no Gemini API key configured: goal generation will fail \
                 (set GEMINI_API_KEY or GOOGLE_API_KEY)"
                    .to_string(),
            );
        }
        if self.gemini.model.trim().is_empty() {
            warnings.push("gemini.model is empty".to_string());
        }
        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let yaml = serde_yaml::to_string(&cfg).unwrap();
        let parsed: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.port, 8787);
        assert_eq!(parsed.database_url, "sqlite://stepwise.db");
        assert_eq!(parsed.gemini.model, "gemini-2.5-flash");
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let yaml = "port: 9000\n";
        let cfg: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.port, 9000);
        assert_eq!(cfg.database_url, "sqlite://stepwise.db");
        assert!(cfg.gemini.api_key.is_none());
    }

    #[test]
    fn gemini_section_parses() {
        let yaml = "gemini:\n  api_key: abc123\n  model: gemini-2.0-flash\n";
        let cfg: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.gemini.api_key.as_deref(), Some("abc123"));
        assert_eq!(cfg.gemini.model, "gemini-2.0-flash");
        assert_eq!(cfg.gemini.base_url, "https://generativelanguage.googleapis.com");
    }

    #[test]
    fn validate_warns_on_missing_api_key() {
        let cfg = Config::default();
        let warnings = cfg.validate();
        assert!(warnings.iter().any(|w| w.contains("API key")));
    }

    #[test]
    fn validate_accepts_configured_key() {
        let mut cfg = Config::default();
        cfg.gemini.api_key = Some("abc123".to_string());
        assert!(cfg.validate().is_empty());
    }

    #[test]
    fn api_key_not_serialized_when_absent() {
        let cfg = Config::default();
        let yaml = serde_yaml::to_string(&cfg).unwrap();
        assert!(!yaml.contains("api_key"));
    }
}
