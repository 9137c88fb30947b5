use rust_decimal::Decimal;
use thiserror::Error;

/// The kind of catalog record an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    TreeType,
    Location,
    StockEntry,
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordKind::TreeType => write!(f, "Tree type"),
            RecordKind::Location => write!(f, "Location"),
            RecordKind::StockEntry => write!(f, "Stock entry"),
        }
    }
}

#[derive(Error, Debug)]
pub enum GreenGrowError {
    #[error("Quantity must be a positive integer (got {0})")]
    InvalidQuantity(i64),

    #[error("Base price cannot be negative (got {0})")]
    InvalidPrice(Decimal),

    #[error("Name cannot be empty")]
    InvalidName,

    #[error("Start date {from} is after end date {to}")]
    InvalidDateRange {
        from: chrono::NaiveDate,
        to: chrono::NaiveDate,
    },

    #[error("Source and destination are the same location: {0}")]
    SameLocation(String),

    #[error("Amount too large: {0}")]
    Overflow(String),

    #[error("{kind} not found: {key}")]
    NotFound { kind: RecordKind, key: String },

    #[error("Not enough stock of '{tree_type}' to take {requested} (available: {available})")]
    InsufficientStock {
        tree_type: String,
        requested: i64,
        available: i64,
    },

    #[error("{kind} '{name}' already exists")]
    DuplicateName { kind: RecordKind, name: String },

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(String),
}

impl GreenGrowError {
    pub fn not_found(kind: RecordKind, key: impl Into<String>) -> Self {
        GreenGrowError::NotFound {
            kind,
            key: key.into(),
        }
    }

    /// Process exit status the CLI reports for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            GreenGrowError::InvalidQuantity(_)
            | GreenGrowError::InvalidPrice(_)
            | GreenGrowError::InvalidName
            | GreenGrowError::InvalidDateRange { .. }
            | GreenGrowError::SameLocation(_)
            | GreenGrowError::Overflow(_) => 2,
            GreenGrowError::NotFound { .. } => 3,
            GreenGrowError::InsufficientStock { .. } => 4,
            GreenGrowError::DuplicateName { .. } => 5,
            GreenGrowError::Storage(_) | GreenGrowError::Io(_) | GreenGrowError::Config(_) => 1,
        }
    }
}

impl From<serde_json::Error> for GreenGrowError {
    fn from(err: serde_json::Error) -> Self {
        GreenGrowError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GreenGrowError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_failure_kind_exits_non_zero() {
        let errors = vec![
            GreenGrowError::InvalidQuantity(0),
            GreenGrowError::InvalidName,
            GreenGrowError::not_found(RecordKind::Location, "Shed"),
            GreenGrowError::InsufficientStock {
                tree_type: "Oak".into(),
                requested: 40,
                available: 30,
            },
            GreenGrowError::DuplicateName {
                kind: RecordKind::TreeType,
                name: "Oak".into(),
            },
            GreenGrowError::Config("bad".into()),
            GreenGrowError::Overflow("total stock value".into()),
        ];
        for err in errors {
            assert_ne!(err.exit_code(), 0, "{err}");
        }
    }

    #[test]
    fn messages_name_the_record() {
        let err = GreenGrowError::not_found(RecordKind::TreeType, "Birch");
        assert_eq!(err.to_string(), "Tree type not found: Birch");

        let err = GreenGrowError::InsufficientStock {
            tree_type: "Oak".into(),
            requested: 40,
            available: 30,
        };
        assert_eq!(
            err.to_string(),
            "Not enough stock of 'Oak' to take 40 (available: 30)"
        );
    }
}
