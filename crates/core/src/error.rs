use thiserror::Error;

use crate::data::Table;

#[derive(Error, Debug)]
pub enum PedigreeError {
    #[error("Required column(s) {missing:?} not found in pedigree")]
    Schema { missing: Vec<String> },

    #[error("{count} parents did not have their own record in the pedigree")]
    Integrity { count: usize, rows: Box<Table> },

    #[error("Data error: {0}")]
    Data(String),

    #[error("Dimension mismatch: expected {expected}, got {got} in {context}")]
    DimensionMismatch {
        expected: usize,
        got: usize,
        context: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, PedigreeError>;
