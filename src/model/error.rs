use thiserror::Error;

use crate::core::{Category, SeverityLevel};

pub type Result<T> = std::result::Result<T, ModelError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("{category}{}: {what} has a zero denominator", level_suffix(.level))]
    DivisionByZero {
        category: Category,
        level: Option<SeverityLevel>,
        what: &'static str,
    },

    #[error("{category}{}: no such bucket in the snapshot", level_suffix(.level))]
    InvalidBucket {
        category: Category,
        level: Option<SeverityLevel>,
    },

    #[error("{category}/{level}: finding #{index} is missing `{field}`")]
    SchemaMismatch {
        category: Category,
        level: SeverityLevel,
        index: usize,
        field: &'static str,
    },
}

fn level_suffix(level: &Option<SeverityLevel>) -> String {
    match level {
        Some(level) => format!("/{level}"),
        None => String::new(),
    }
}
