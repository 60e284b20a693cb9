// ⚠️ Report Errors - Narrow, typed failures for malformed data
//
// Only genuinely malformed input raises. "No data" (empty lists, unknown
// filter values, missing optional fields) is never an error.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReportError {
    /// A transaction date could not be interpreted as a point in time
    #[error("unable to parse transaction date '{value}'")]
    DateParse { value: String },

    /// A month key is not of the form "YYYY-MM" with a month in 1..=12
    #[error("invalid month key '{key}'")]
    InvalidKey { key: String },
}

impl ReportError {
    pub fn date_parse(value: impl Into<String>) -> Self {
        Self::DateParse { value: value.into() }
    }

    pub fn invalid_key(key: impl Into<String>) -> Self {
        Self::InvalidKey { key: key.into() }
    }
}

pub type ReportResult<T> = Result<T, ReportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_bad_value() {
        assert_eq!(
            ReportError::date_parse("not-a-date").to_string(),
            "unable to parse transaction date 'not-a-date'"
        );
        assert_eq!(
            ReportError::invalid_key("2026-13").to_string(),
            "invalid month key '2026-13'"
        );
    }
}
