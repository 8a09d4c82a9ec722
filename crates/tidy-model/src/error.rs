use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("duplicate column name: {name}")]
    DuplicateColumn { name: String },
    #[error("row {row} has {found} values, expected {expected}")]
    RowLength {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("unknown {kind} '{value}'")]
    UnknownVariant { kind: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, ModelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_value() {
        let err = ModelError::UnknownVariant {
            kind: "fill strategy",
            value: "guess".to_string(),
        };
        assert_eq!(err.to_string(), "unknown fill strategy 'guess'");

        let err = ModelError::RowLength {
            row: 3,
            expected: 2,
            found: 1,
        };
        assert_eq!(err.to_string(), "row 3 has 1 values, expected 2");
    }
}
