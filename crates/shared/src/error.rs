//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input snapshot or request could not be read.
    #[error("Input unavailable: {0}")]
    InputUnavailable(String),

    /// Input was read but is not well-formed.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Referenced resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Ledger data cannot be classified (unknown account type, dangling line).
    #[error("Ledger configuration error: {0}")]
    LedgerConfiguration(String),

    /// Report output could not be written.
    #[error("Output error: {0}")]
    Output(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the process exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 78,
            Self::InputUnavailable(_) => 66,
            Self::InvalidInput(_) | Self::NotFound(_) => 65,
            Self::LedgerConfiguration(_) => 3,
            Self::Output(_) => 74,
            Self::Internal(_) => 70,
        }
    }

    /// Returns the machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG_ERROR",
            Self::InputUnavailable(_) => "INPUT_UNAVAILABLE",
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::NotFound(_) => "NOT_FOUND",
            Self::LedgerConfiguration(_) => "LEDGER_CONFIGURATION_ERROR",
            Self::Output(_) => "OUTPUT_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(AppError::Config(String::new()).exit_code(), 78);
        assert_eq!(AppError::InputUnavailable(String::new()).exit_code(), 66);
        assert_eq!(AppError::InvalidInput(String::new()).exit_code(), 65);
        assert_eq!(AppError::NotFound(String::new()).exit_code(), 65);
        assert_eq!(AppError::LedgerConfiguration(String::new()).exit_code(), 3);
        assert_eq!(AppError::Output(String::new()).exit_code(), 74);
        assert_eq!(AppError::Internal(String::new()).exit_code(), 70);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(AppError::Config(String::new()).error_code(), "CONFIG_ERROR");
        assert_eq!(
            AppError::InputUnavailable(String::new()).error_code(),
            "INPUT_UNAVAILABLE"
        );
        assert_eq!(
            AppError::InvalidInput(String::new()).error_code(),
            "INVALID_INPUT"
        );
        assert_eq!(AppError::NotFound(String::new()).error_code(), "NOT_FOUND");
        assert_eq!(
            AppError::LedgerConfiguration(String::new()).error_code(),
            "LEDGER_CONFIGURATION_ERROR"
        );
        assert_eq!(AppError::Output(String::new()).error_code(), "OUTPUT_ERROR");
        assert_eq!(
            AppError::Internal(String::new()).error_code(),
            "INTERNAL_ERROR"
        );
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            AppError::Config("msg".into()).to_string(),
            "Configuration error: msg"
        );
        assert_eq!(
            AppError::InputUnavailable("msg".into()).to_string(),
            "Input unavailable: msg"
        );
        assert_eq!(
            AppError::LedgerConfiguration("msg".into()).to_string(),
            "Ledger configuration error: msg"
        );
    }

    #[test]
    fn test_config_error_converts() {
        let err: AppError = config::ConfigError::Message("boom".into()).into();
        assert_eq!(err.error_code(), "CONFIG_ERROR");
        assert!(err.to_string().contains("boom"));
    }
}
