use crate::clients::flexible::{FlexibleClient, ModelKind};
use crate::error::QuizError;
use crate::interceptors::{FileInterceptor, Interceptor};
use crate::parser::ParseMode;
use crate::retrieval::DEFAULT_TOP_K;
use crate::validator::ValidationPolicy;
use std::env;
use std::path::PathBuf;
use std::sync::Arc;

/// Trait for types that can retrieve their API key from environment variables
pub trait KeyFromEnv {
    /// The environment variable name for this client's API key
    const KEY_NAME: &'static str;

    /// Find the API key by checking environment variables first, then .env file
    fn find_key() -> Option<String> {
        // First try to load .env file (silently fail if not found)
        let _ = dotenvy::dotenv();

        env::var(Self::KEY_NAME).ok().filter(|key| !key.trim().is_empty())
    }

    /// Like `find_key`, but a missing key is a configuration error.
    fn require_key() -> Result<String, QuizError> {
        Self::find_key().ok_or_else(|| {
            QuizError::Configuration(format!("environment variable {} is not set", Self::KEY_NAME))
        })
    }
}

/// Runtime settings, read from the environment and an optional `.env` file.
#[derive(Debug, Clone)]
pub struct QuizConfig {
    /// Explicit model choice; `None` means detect from available keys
    pub model: Option<ModelKind>,
    pub parse_mode: ParseMode,
    pub validation: ValidationPolicy,
    pub schema_guidance: bool,
    pub transcript_dir: Option<PathBuf>,
    pub top_k: usize,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            model: None,
            parse_mode: ParseMode::default(),
            validation: ValidationPolicy::default(),
            schema_guidance: false,
            transcript_dir: None,
            top_k: DEFAULT_TOP_K,
        }
    }
}

impl QuizConfig {
    pub const MODEL_VAR: &'static str = "QUIZZIFY_MODEL";
    pub const PARSE_MODE_VAR: &'static str = "QUIZZIFY_PARSE_MODE";
    pub const VALIDATION_VAR: &'static str = "QUIZZIFY_VALIDATION";
    pub const SCHEMA_GUIDANCE_VAR: &'static str = "QUIZZIFY_SCHEMA_GUIDANCE";
    pub const TRANSCRIPT_DIR_VAR: &'static str = "QUIZZIFY_TRANSCRIPT_DIR";
    pub const TOP_K_VAR: &'static str = "QUIZZIFY_TOP_K";

    pub fn from_env() -> Result<Self, QuizError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup; unset and blank values take defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, QuizError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let invalid = |name: &str, msg: String| QuizError::Configuration(format!("{}: {}", name, msg));

        let model = get(Self::MODEL_VAR)
            .map(|v| ModelKind::from_str(&v).map_err(|e| invalid(Self::MODEL_VAR, e)))
            .transpose()?;
        let parse_mode = get(Self::PARSE_MODE_VAR)
            .map(|v| ParseMode::from_str(&v).map_err(|e| invalid(Self::PARSE_MODE_VAR, e)))
            .transpose()?
            .unwrap_or_default();
        let validation = get(Self::VALIDATION_VAR)
            .map(|v| ValidationPolicy::from_str(&v).map_err(|e| invalid(Self::VALIDATION_VAR, e)))
            .transpose()?
            .unwrap_or_default();
        let schema_guidance = get(Self::SCHEMA_GUIDANCE_VAR)
            .map(|v| v.parse::<bool>().map_err(|e| invalid(Self::SCHEMA_GUIDANCE_VAR, e.to_string())))
            .transpose()?
            .unwrap_or(false);
        let top_k = get(Self::TOP_K_VAR)
            .map(|v| v.parse::<usize>().map_err(|e| invalid(Self::TOP_K_VAR, e.to_string())))
            .transpose()?
            .unwrap_or(DEFAULT_TOP_K);

        Ok(Self {
            model,
            parse_mode,
            validation,
            schema_guidance,
            transcript_dir: get(Self::TRANSCRIPT_DIR_VAR).map(PathBuf::from),
            top_k,
        })
    }

    /// The configured model, or the first one with credentials available.
    pub fn model_client(&self) -> Result<FlexibleClient, QuizError> {
        let kind = self.model.or_else(ModelKind::detect).ok_or_else(|| {
            QuizError::Configuration(format!(
                "no model configured: set {} or an API key for one of: {}",
                Self::MODEL_VAR,
                ModelKind::supported().join(", ")
            ))
        })?;
        FlexibleClient::from_kind(kind)
    }

    pub fn transcript_interceptor(&self) -> Option<Arc<dyn Interceptor>> {
        self.transcript_dir
            .as_ref()
            .map(|dir| Arc::new(FileInterceptor::new(dir.clone())) as Arc<dyn Interceptor>)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = QuizConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.model, None);
        assert_eq!(config.parse_mode, ParseMode::Strict);
        assert_eq!(config.validation, ValidationPolicy::Presence);
        assert!(!config.schema_guidance);
        assert!(config.transcript_interceptor().is_none());
        assert_eq!(config.top_k, DEFAULT_TOP_K);
    }

    #[test]
    fn test_reads_overrides() {
        let config = QuizConfig::from_lookup(lookup(&[
            ("QUIZZIFY_PARSE_MODE", "Lenient"),
            ("QUIZZIFY_VALIDATION", "strict"),
            ("QUIZZIFY_SCHEMA_GUIDANCE", "true"),
            ("QUIZZIFY_TRANSCRIPT_DIR", "/tmp/quiz-transcripts"),
            ("QUIZZIFY_TOP_K", "2"),
        ]))
        .unwrap();
        assert_eq!(config.parse_mode, ParseMode::Lenient);
        assert_eq!(config.validation, ValidationPolicy::Strict);
        assert!(config.schema_guidance);
        assert!(config.transcript_interceptor().is_some());
        assert_eq!(config.top_k, 2);
    }

    #[test]
    fn test_mock_model_is_accepted() {
        let config = QuizConfig::from_lookup(lookup(&[("QUIZZIFY_MODEL", "mock")])).unwrap();
        assert_eq!(config.model, Some(ModelKind::Mock));
        assert!(config.model_client().is_ok());
    }

    #[test]
    fn test_invalid_values_are_configuration_errors() {
        assert!(matches!(
            QuizConfig::from_lookup(lookup(&[("QUIZZIFY_MODEL", "gpt-9000")])),
            Err(QuizError::Configuration(_))
        ));
        assert!(matches!(
            QuizConfig::from_lookup(lookup(&[("QUIZZIFY_SCHEMA_GUIDANCE", "sometimes")])),
            Err(QuizError::Configuration(_))
        ));
    }
}
