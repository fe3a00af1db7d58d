use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

/// A single invalid setting.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// JSON path to the field (e.g., "rootPrefix")
    pub field_path: String,
    /// What is wrong and an example of a valid value
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

/// Failure to produce usable settings.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Settings parsed but failed validation
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    /// Settings file could not be read
    #[error("Failed to load configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// Settings file is not valid JSON for the settings
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Settings of the adapter, read from `.translate-fallback.json`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdapterSettings {
    /// Prefix of the top-level scope. Include the separator yourself (`"app."`).
    pub root_prefix: String,

    /// Shown by the directive as `{message}[{key}]` when the provider fails.
    pub not_found_message: String,

    /// Trim surrounding whitespace from element content captured as a default.
    pub trim_markup_defaults: bool,
}

impl AdapterSettings {
    /// # Errors
    /// - Prefix containing whitespace
    /// - Empty not-found message
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.root_prefix.chars().any(char::is_whitespace) {
            errors.push(ValidationError::new(
                "rootPrefix",
                format!(
                    "The prefix cannot contain whitespace, got '{}'. Example: \"app.\"",
                    self.root_prefix
                ),
            ));
        }

        if self.not_found_message.is_empty() {
            errors.push(ValidationError::new(
                "notFoundMessage",
                "The message cannot be empty. Example: \"translation-not-found\"",
            ));
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

impl Default for AdapterSettings {
    fn default() -> Self {
        Self {
            root_prefix: String::new(),
            not_found_message: "translation-not-found".to_string(),
            trim_markup_defaults: true,
        }
    }
}
