//! Error types for FINS frame construction.

use thiserror::Error;

/// Result type alias for FINS operations.
pub type Result<T> = std::result::Result<T, FinsError>;

/// Errors that can occur while building a FINS frame.
///
/// Every error is raised before the first byte of a frame is written, so a
/// failed construction never leaves a partially encoded frame behind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FinsError {
    /// Register address or bit offset outside the representable range.
    #[error("Invalid address: {reason}")]
    InvalidAddress {
        /// Description of the addressing error.
        reason: String,
    },

    /// A value cannot be represented in the requested encoding.
    #[error("Invalid value {value}: {reason}")]
    InvalidValueRange {
        /// The offending value.
        value: u64,
        /// Description of the allowed range.
        reason: String,
    },

    /// A write command was requested without any values.
    #[error("Write command requires at least one value")]
    EmptyValueSet,

    /// Fields were supplied that do not belong to the requested operation.
    #[error("Inconsistent parameters: {reason}")]
    InconsistentParameters {
        /// Description of the conflict.
        reason: String,
    },

    /// Invalid parameter provided.
    #[error("Invalid parameter '{parameter}': {reason}")]
    InvalidParameter {
        /// Name of the invalid parameter.
        parameter: String,
        /// Description of why the parameter is invalid.
        reason: String,
    },
}

impl FinsError {
    /// Creates a new `InvalidAddress` error.
    ///
    /// # Example
    ///
    /// ```
    /// use fins_frame::FinsError;
    ///
    /// let err = FinsError::invalid_address("register address 70000 exceeds 0xFFFF");
    /// ```
    pub fn invalid_address(reason: impl Into<String>) -> Self {
        Self::InvalidAddress {
            reason: reason.into(),
        }
    }

    /// Creates a new `InvalidValueRange` error.
    ///
    /// # Example
    ///
    /// ```
    /// use fins_frame::FinsError;
    ///
    /// let err = FinsError::invalid_value_range(10_000u32, "BCD words hold 0-9999");
    /// ```
    pub fn invalid_value_range(value: impl Into<u64>, reason: impl Into<String>) -> Self {
        Self::InvalidValueRange {
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Creates a new `InconsistentParameters` error.
    pub fn inconsistent_parameters(reason: impl Into<String>) -> Self {
        Self::InconsistentParameters {
            reason: reason.into(),
        }
    }

    /// Creates a new `InvalidParameter` error.
    ///
    /// # Example
    ///
    /// ```
    /// use fins_frame::FinsError;
    ///
    /// let err = FinsError::invalid_parameter("word", "nibble 0xA is not a decimal digit");
    /// ```
    pub fn invalid_parameter(parameter: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_address_display() {
        let err = FinsError::invalid_address("bit offset 16 exceeds 15");
        assert_eq!(err.to_string(), "Invalid address: bit offset 16 exceeds 15");
    }

    #[test]
    fn test_invalid_value_range_display() {
        let err = FinsError::invalid_value_range(10_000u32, "BCD words hold 0-9999");
        assert_eq!(
            err.to_string(),
            "Invalid value 10000: BCD words hold 0-9999"
        );
    }

    #[test]
    fn test_empty_value_set_display() {
        assert_eq!(
            FinsError::EmptyValueSet.to_string(),
            "Write command requires at least one value"
        );
    }

    #[test]
    fn test_inconsistent_parameters_display() {
        let err = FinsError::inconsistent_parameters("values supplied for a read command");
        assert_eq!(
            err.to_string(),
            "Inconsistent parameters: values supplied for a read command"
        );
    }

    #[test]
    fn test_invalid_parameter_display() {
        let err = FinsError::invalid_parameter("word", "not BCD");
        assert_eq!(err.to_string(), "Invalid parameter 'word': not BCD");
    }
}
