use thiserror::Error;

/// Fatal filter configuration errors, raised while initializing the filter
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    /// Id range is enabled but its threshold has no leading integer
    #[error("id is not a number!")]
    InvalidIdThreshold { value: String },

    /// Post date rule is enabled but its threshold is not a date
    #[error("Date format error!")]
    InvalidDateThreshold { value: String },
}

/// Result type for filter operations
pub type FilterResult<T> = Result<T, FilterError>;

impl FilterError {
    pub fn invalid_id(value: impl Into<String>) -> Self {
        Self::InvalidIdThreshold {
            value: value.into(),
        }
    }

    pub fn invalid_date(value: impl Into<String>) -> Self {
        Self::InvalidDateThreshold {
            value: value.into(),
        }
    }

    /// The offending threshold as entered
    pub fn value(&self) -> &str {
        match self {
            Self::InvalidIdThreshold { value } | Self::InvalidDateThreshold { value } => value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(FilterError::invalid_id("abc").to_string(), "id is not a number!");
        assert_eq!(
            FilterError::invalid_date("soon").to_string(),
            "Date format error!"
        );
    }

    #[test]
    fn test_error_keeps_value() {
        let err = FilterError::invalid_date("2020-99-99");
        assert_eq!(err.value(), "2020-99-99");
    }
}
