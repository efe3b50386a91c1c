use colored::Colorize;
use std::fmt;

/// Errors that can occur while evaluating a configuration descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConfigError {
    /// A required environment variable is not set
    Missing {
        key: String,
        description: Option<String>,
    },
    /// An environment variable is set but failed conversion or validation
    InvalidData {
        key: String,
        message: String,
        description: Option<String>,
    },
}

impl ConfigError {
    pub fn missing(key: impl Into<String>) -> Self {
        ConfigError::Missing {
            key: key.into(),
            description: None,
        }
    }

    pub fn invalid_data(key: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::InvalidData {
            key: key.into(),
            message: message.into(),
            description: None,
        }
    }

    /// Environment variable this error refers to
    pub fn key(&self) -> &str {
        match self {
            ConfigError::Missing { key, .. } | ConfigError::InvalidData { key, .. } => key,
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            ConfigError::Missing { description, .. }
            | ConfigError::InvalidData { description, .. } => description.as_deref(),
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, ConfigError::Missing { .. })
    }

    pub fn is_invalid_data(&self) -> bool {
        matches!(self, ConfigError::InvalidData { .. })
    }

    /// Attach a description unless one is already present
    pub(crate) fn with_description(mut self, text: &str) -> Self {
        match &mut self {
            ConfigError::Missing { description, .. }
            | ConfigError::InvalidData { description, .. } => {
                if description.is_none() {
                    *description = Some(text.to_string());
                }
            }
        }
        self
    }
}

/// True when every error is a missing variable and there is at least one
pub(crate) fn is_missing_only(errors: &[ConfigError]) -> bool {
    !errors.is_empty() && errors.iter().all(ConfigError::is_missing)
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing { key, description } => {
                writeln!(
                    f,
                    "{}: Is missing from environment and is required",
                    key.magenta().bold()
                )?;
                if let Some(description) = description {
                    writeln!(f, "\tDescription: {}", description)?;
                }
                Ok(())
            }
            ConfigError::InvalidData {
                key,
                message,
                description,
            } => {
                writeln!(f, "{}: Invalid data: {}", key.magenta().bold(), message.red())?;
                if let Some(description) = description {
                    writeln!(f, "\tDescription: {}", description)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Helper to format multiple configuration errors into a single report
pub fn format_config_errors(errors: &[ConfigError]) -> String {
    let error_summary = errors
        .iter()
        .map(|e| format!("  - {}", e))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Configuration failed with {} error(s):\n{}",
        errors.len().to_string().yellow().bold(),
        error_summary
    )
}
