pub mod data;
pub mod error;
pub mod pedigree;

pub use data::{Column, Id, Table, Value};
pub use error::{PedigreeError, Result};
pub use pedigree::{PedigreeGraph, PedigreeLabels};
