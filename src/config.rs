//! Configuration module

use std::env;
use std::str::FromStr;

use crate::assessment::desk::StalenessPolicy;
use crate::assessment::gateway::GatewayConfig;
use crate::assessment::Convention;
use crate::models::FormVariant;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-preview-04-17";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// Gemini API key (`None` when unset or empty)
    pub api_key: Option<String>,

    /// Model identifier sent with every request
    pub model: String,

    /// Base URL of the generative language API
    pub api_base_url: String,

    /// Reply shape the parser expects
    pub convention: Convention,

    /// Which transaction fields the form collects
    pub form_variant: FormVariant,

    /// What to do with a reply that answers a superseded submission
    pub stale_responses: StalenessPolicy,

    /// Environment (development, production)
    pub environment: String,

    /// Settings whose values were not recognised and fell back to defaults
    pub ignored: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let mut ignored = Vec::new();

        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),

            api_key: env::var("API_KEY")
                .ok()
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty()),

            model: env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| DEFAULT_MODEL.to_string()),

            api_base_url: env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),

            convention: parse_or_default("RESPONSE_CONVENTION", &mut ignored),

            form_variant: parse_or_default("FORM_VARIANT", &mut ignored),

            stale_responses: parse_or_default("STALE_RESPONSES", &mut ignored),

            environment: env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),

            ignored,
        }
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Check if a credential was supplied
    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    /// Gateway settings derived from this configuration
    pub fn gateway(&self) -> GatewayConfig {
        GatewayConfig {
            api_key: self.api_key.clone(),
            model: self.model.clone(),
            base_url: self.api_base_url.clone(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            api_base_url: DEFAULT_BASE_URL.to_string(),
            convention: Convention::default(),
            form_variant: FormVariant::default(),
            stale_responses: StalenessPolicy::default(),
            environment: "development".to_string(),
            ignored: Vec::new(),
        }
    }
}

/// Parse `key` if set; an unparseable value is recorded in `ignored`
fn parse_or_default<T>(key: &str, ignored: &mut Vec<String>) -> T
where
    T: FromStr + Default,
{
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            ignored.push(format!("{}='{}'", key, raw));
            T::default()
        }),
        Err(_) => T::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.port, 8080);
        assert!(!config.has_credential());
        assert_eq!(config.convention, Convention::Json);
        assert_eq!(config.form_variant, FormVariant::Extended);
        assert_eq!(config.stale_responses, StalenessPolicy::Discard);
        assert!(!config.is_production());
    }

    #[test]
    fn test_unrecognised_value_falls_back() {
        let mut ignored = Vec::new();
        std::env::set_var("FRAUD_LENS_TEST_VARIANT", "full");
        let variant: FormVariant = parse_or_default("FRAUD_LENS_TEST_VARIANT", &mut ignored);
        assert_eq!(variant, FormVariant::Extended);
        assert_eq!(ignored, vec!["FRAUD_LENS_TEST_VARIANT='full'".to_string()]);

        let policy: StalenessPolicy = parse_or_default("FRAUD_LENS_TEST_UNSET", &mut ignored);
        assert_eq!(policy, StalenessPolicy::Discard);
        assert_eq!(ignored.len(), 1);
    }

    #[test]
    fn test_production_environment() {
        let config = Config {
            environment: "production".to_string(),
            ..Default::default()
        };
        assert!(config.is_production());
    }

    #[test]
    fn test_gateway_carries_credential() {
        let config = Config {
            api_key: Some("test-key".to_string()),
            model: "gemini-test".to_string(),
            ..Default::default()
        };
        let gateway = config.gateway();
        assert_eq!(gateway.api_key.as_deref(), Some("test-key"));
        assert_eq!(gateway.model, "gemini-test");
        assert_eq!(gateway.base_url, DEFAULT_BASE_URL);
    }
}
