use serde::{Deserialize, Serialize};

use crate::data::{Column, Id, Table, Value};
use crate::error::Result;

/// Column names for the individual (1st), male parent (2nd) and female
/// parent (3rd) of a pedigree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PedigreeLabels {
    pub subject: String,
    pub parent_a: String,
    pub parent_b: String,
}

impl PedigreeLabels {
    pub fn new(subject: &str, parent_a: &str, parent_b: &str) -> Self {
        Self {
            subject: subject.to_string(),
            parent_a: parent_a.to_string(),
            parent_b: parent_b.to_string(),
        }
    }

    /// The two parent labels, `parent_a` first.
    pub fn parents(&self) -> [&str; 2] {
        [&self.parent_a, &self.parent_b]
    }

    /// All three labels, subject first.
    pub fn all(&self) -> [&str; 3] {
        [&self.subject, &self.parent_a, &self.parent_b]
    }
}

impl Default for PedigreeLabels {
    fn default() -> Self {
        Self::new("animal", "sire", "dam")
    }
}

/// Sex codes expected for animals used in the `parent_a` and `parent_b` roles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SexCodes {
    pub parent_a: Id,
    pub parent_b: Id,
}

impl SexCodes {
    pub fn new(parent_a: impl Into<Id>, parent_b: impl Into<Id>) -> Self {
        Self {
            parent_a: parent_a.into(),
            parent_b: parent_b.into(),
        }
    }

    /// Map a commonly used sex spelling to the configured code.
    ///
    /// `1`, `M` and `male` map to `parent_a`; `2`, `F` and `female` map to
    /// `parent_b` (case-insensitive). The configured codes themselves are
    /// always recognised.
    pub fn canonical(&self, value: &Value) -> Option<Id> {
        if let Some(id) = value.as_id() {
            if id == self.parent_a || id == self.parent_b {
                return Some(id);
            }
        }
        let male = match value {
            Value::Int(1) => true,
            Value::Int(2) => false,
            Value::Text(s) => match s.to_ascii_lowercase().as_str() {
                "1" | "m" | "male" => true,
                "2" | "f" | "female" => false,
                _ => return None,
            },
            _ => return None,
        };
        Some(if male {
            self.parent_a.clone()
        } else {
            self.parent_b.clone()
        })
    }
}

impl Default for SexCodes {
    fn default() -> Self {
        Self::new(1, 2)
    }
}

/// Sex column name together with the codes for each parental role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SexLabels {
    pub label: String,
    pub codes: SexCodes,
}

impl SexLabels {
    pub fn new(label: &str, codes: SexCodes) -> Self {
        Self {
            label: label.to_string(),
            codes,
        }
    }
}

impl Default for SexLabels {
    fn default() -> Self {
        Self::new("sex", SexCodes::default())
    }
}

/// Rewrite a sex column through [`SexCodes::canonical`].
///
/// The column kind follows the configured codes; values that are not
/// recognised become null.
///
/// # Errors
/// Returns an error if the sex column is missing or the two codes are of
/// different kinds.
pub fn normalize_sex_codes(table: &Table, sex: &SexLabels) -> Result<Table> {
    let column = table.get_column(&sex.label)?;
    let canonical = (0..table.nrows()).map(|r| {
        column
            .get(r)
            .and_then(|v| sex.codes.canonical(&v))
    });
    let rewritten = Column::from_ids(sex.codes.parent_a.kind(), canonical)?;
    table.with_column(&sex.label, rewritten)
}
