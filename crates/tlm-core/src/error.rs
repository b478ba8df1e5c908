use thiserror::Error;

use crate::units::Unit;

pub type TlmResult<T> = Result<T, TlmError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TlmError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: String, value: f64 },

    #[error("{what} is measured in {expected}, got a value in {found}")]
    UnitMismatch {
        what: String,
        expected: Unit,
        found: Unit,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_mismatch_names_both_units() {
        let err = TlmError::UnitMismatch {
            what: "m".to_string(),
            expected: Unit::Kilogram,
            found: Unit::Newton,
        };
        assert_eq!(err.to_string(), "m is measured in kg, got a value in N");
    }
}
