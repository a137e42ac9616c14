use std::fmt;

/// Structural error raised while serializing a value or converting a
/// host table into one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeError {
    /// Table mixed string and integer keys, or used an index below 1.
    MixedKeys,
    /// Integer keys were not the dense run 1..=N.
    SparseArray,
    /// NaN or infinity has no JSON representation.
    NonFiniteNumber,
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodeError::MixedKeys => write!(f, "invalid table: mixed or invalid key types"),
            EncodeError::SparseArray => write!(f, "invalid table: sparse array"),
            EncodeError::NonFiniteNumber => write!(f, "unexpected number value"),
        }
    }
}

impl std::error::Error for EncodeError {}

/// Syntax error reported by the parser, with the 1-based position of the
/// offending character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at line {} column {}", self.message, self.line, self.column)
    }
}

impl std::error::Error for DecodeError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_error_messages() {
        assert_eq!(
            EncodeError::MixedKeys.to_string(),
            "invalid table: mixed or invalid key types"
        );
        assert_eq!(EncodeError::SparseArray.to_string(), "invalid table: sparse array");
        assert_eq!(EncodeError::NonFiniteNumber.to_string(), "unexpected number value");
    }

    #[test]
    fn test_decode_error_display() {
        let e = DecodeError {
            line: 2,
            column: 7,
            message: "trailing garbage".to_string(),
        };
        assert_eq!(e.to_string(), "trailing garbage at line 2 column 7");
    }
}
