//! Unified error handling for the trajectory-analytics library.
//!
//! This module provides a consistent error type for all analyzer operations,
//! replacing mixed error handling patterns (Option, panic, silent failures).

use std::fmt;

/// Unified error type for trajectory-analytics operations.
#[derive(Debug, Clone)]
pub enum AnalysisError {
    /// GPX, waypoint, or stop-zone CSV document could not be parsed.
    ParseError {
        source: String,
        message: String,
        line: Option<usize>,
    },
    /// A parameter was missing, negative, or had inverted bounds.
    ParameterError { parameter: String, message: String },
    /// The grid built from a sample stream had zero width or height.
    DegenerateGridError { width: usize, height: usize },
    /// A sample's latitude/longitude fell outside the valid range.
    OutOfRangeError {
        sample_index: usize,
        field: String,
        value: f64,
    },
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisError::ParseError {
                source,
                message,
                line,
            } => {
                if let Some(line) = line {
                    write!(f, "{} parse error at line {}: {}", source, line, message)
                } else {
                    write!(f, "{} parse error: {}", source, message)
                }
            }
            AnalysisError::ParameterError { parameter, message } => {
                write!(f, "parameter '{}' is invalid: {}", parameter, message)
            }
            AnalysisError::DegenerateGridError { width, height } => {
                write!(f, "degenerate grid: width={}, height={}", width, height)
            }
            AnalysisError::OutOfRangeError {
                sample_index,
                field,
                value,
            } => {
                write!(
                    f,
                    "sample {} has out-of-range {}: {}",
                    sample_index, field, value
                )
            }
        }
    }
}

impl std::error::Error for AnalysisError {}

/// Result type alias for trajectory-analytics operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Extension trait for converting `Option` into an `AnalysisError`-bearing `Result`.
pub trait OptionExt<T> {
    /// Convert `None` into a `ParameterError` for the named parameter.
    fn ok_or_missing_parameter(self, parameter: &str) -> Result<T>;

    /// Convert `None` into a generic internal `ParameterError`.
    fn ok_or_internal(self, message: &str) -> Result<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_missing_parameter(self, parameter: &str) -> Result<T> {
        self.ok_or_else(|| AnalysisError::ParameterError {
            parameter: parameter.to_string(),
            message: "required but not supplied".to_string(),
        })
    }

    fn ok_or_internal(self, message: &str) -> Result<T> {
        self.ok_or_else(|| AnalysisError::ParameterError {
            parameter: "internal".to_string(),
            message: message.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AnalysisError::DegenerateGridError {
            width: 0,
            height: 3,
        };
        assert!(err.to_string().contains("width=0"));
    }

    #[test]
    fn test_option_ext() {
        let none: Option<i32> = None;
        let result = none.ok_or_missing_parameter("cell_size_km");
        assert!(matches!(result, Err(AnalysisError::ParameterError { .. })));
    }
}
