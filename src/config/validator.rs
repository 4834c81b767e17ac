use crate::config::{parse_duration, Config};
use crate::error::{Result, SentimError, ValidationError};

/// Largest page the comment-listing API will serve
const MAX_PAGE_SIZE: u32 = 100;

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration
    pub fn validate(config: &Config) -> Result<()> {
        let mut errors = Vec::new();

        Self::validate_schema_version(config, &mut errors);
        Self::validate_youtube(config, &mut errors);
        Self::validate_backend(config, &mut errors);
        Self::validate_http(config, &mut errors);
        Self::validate_output(config, &mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SentimError::ConfigValidation { errors })
        }
    }

    fn validate_schema_version(config: &Config, errors: &mut Vec<ValidationError>) {
        let version = &config.meta.schema_version;
        if version != "1.0.0" {
            errors.push(ValidationError::new(
                "_meta.schema_version",
                format!("Unsupported schema version: {}", version),
            ));
        }
    }

    fn validate_youtube(config: &Config, errors: &mut Vec<ValidationError>) {
        if !Self::is_http_url(&config.youtube.api_base) {
            errors.push(ValidationError::new(
                "youtube.api_base",
                format!("Must be an http(s) URL, got '{}'", config.youtube.api_base),
            ));
        }

        // The key itself is checked when a run needs it, not here
        if config.youtube.api_key_env.trim().is_empty() {
            errors.push(ValidationError::new(
                "youtube.api_key_env",
                "Credential environment variable name cannot be empty",
            ));
        }

        let page_size = config.youtube.page_size;
        if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
            errors.push(ValidationError::new(
                "youtube.page_size",
                format!(
                    "Page size must be between 1 and {}, got {}",
                    MAX_PAGE_SIZE, page_size
                ),
            ));
        }
    }

    fn validate_backend(config: &Config, errors: &mut Vec<ValidationError>) {
        if !Self::is_http_url(&config.backend.base_url) {
            errors.push(ValidationError::new(
                "backend.base_url",
                format!("Must be an http(s) URL, got '{}'", config.backend.base_url),
            ));
        }
    }

    fn validate_http(config: &Config, errors: &mut Vec<ValidationError>) {
        match parse_duration(&config.http.timeout) {
            Some(d) if d.is_zero() => errors.push(ValidationError::new(
                "http.timeout",
                "Timeout must be greater than 0",
            )),
            Some(_) => {}
            None => errors.push(ValidationError::new(
                "http.timeout",
                format!("Invalid duration format: {}", config.http.timeout),
            )),
        }
    }

    fn validate_output(config: &Config, errors: &mut Vec<ValidationError>) {
        if config.output.chart_dir.as_os_str().is_empty() {
            errors.push(ValidationError::new(
                "output.chart_dir",
                "Chart directory cannot be empty",
            ));
        }
    }

    fn is_http_url(s: &str) -> bool {
        s.starts_with("http://") || s.starts_with("https://")
    }
}
