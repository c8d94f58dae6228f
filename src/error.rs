use thiserror::Error;

/// Application-level error: a message plus the process exit code it maps to.
///
/// Exit codes:
/// - `2` invalid input or configuration (bad CSV, bad flags, feature errors)
/// - `3` no usable data left after ingest
/// - `4` external collaborator or terminal failure (HTTP, TUI)
#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

/// Errors raised by the feature computations themselves.
///
/// Structural errors abort the whole call before any column is written.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeatureError {
    #[error("missing required column `{0}`")]
    MissingColumn(String),

    #[error("column `{column}` holds {found} values, expected {expected}")]
    ColumnType {
        column: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("column `{column}` has {found} rows but the table has {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        found: usize,
    },

    #[error("unsupported country `{0}` (expected one of Argentina, Canada, Estonia, Japan, Spain)")]
    UnsupportedCountry(String),
}

impl FeatureError {
    /// `true` for errors caused by the shape of an input table.
    pub fn is_structural(&self) -> bool {
        !matches!(self, FeatureError::UnsupportedCountry(_))
    }
}

impl From<FeatureError> for AppError {
    fn from(err: FeatureError) -> Self {
        AppError::new(2, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feature_errors_map_to_input_exit_code() {
        let err: AppError = FeatureError::MissingColumn("date".to_string()).into();
        assert_eq!(err.exit_code(), 2);
        assert_eq!(err.to_string(), "missing required column `date`");
    }

    #[test]
    fn unsupported_country_is_not_structural() {
        assert!(!FeatureError::UnsupportedCountry("France".to_string()).is_structural());
        assert!(FeatureError::MissingColumn("day".to_string()).is_structural());
    }
}
