use std::cmp::Ordering;
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{PedigreeError, Result};

/// Identifier of an individual, as stored in an id-bearing column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Id {
    Int(i64),
    Token(String),
}

impl Id {
    /// The kind of column this identifier can live in.
    pub fn kind(&self) -> IdKind {
        match self {
            Id::Int(_) => IdKind::Integer,
            Id::Token(_) => IdKind::Token,
        }
    }
}

impl From<i64> for Id {
    fn from(v: i64) -> Self {
        Id::Int(v)
    }
}

impl From<i32> for Id {
    fn from(v: i32) -> Self {
        Id::Int(v as i64)
    }
}

impl From<&str> for Id {
    fn from(v: &str) -> Self {
        Id::Token(v.to_string())
    }
}

impl From<String> for Id {
    fn from(v: String) -> Self {
        Id::Token(v)
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Id::Int(v) => write!(f, "{}", v),
            Id::Token(s) => f.write_str(s),
        }
    }
}

/// Whether an id column is integer-keyed or token-keyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdKind {
    Integer,
    Token,
}

/// A single cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    /// Convert to an identifier. Floats never identify individuals.
    pub fn as_id(&self) -> Option<Id> {
        match self {
            Value::Int(v) => Some(Id::Int(*v)),
            Value::Text(s) => Some(Id::Token(s.clone())),
            Value::Float(_) => None,
        }
    }
}

impl From<Id> for Value {
    fn from(id: Id) -> Self {
        match id {
            Id::Int(v) => Value::Int(v),
            Id::Token(s) => Value::Text(s),
        }
    }
}

impl PartialOrd for Value {
    /// Numeric values compare numerically, text compares lexically and
    /// mixing text with numbers is unordered.
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
            (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
            (Value::Int(a), Value::Float(b)) => (*a as f64).partial_cmp(b),
            (Value::Float(a), Value::Int(b)) => a.partial_cmp(&(*b as f64)),
            (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

/// Physical type of a [`Column`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Integer,
    Float,
    Text,
}

impl From<IdKind> for ColumnKind {
    fn from(kind: IdKind) -> Self {
        match kind {
            IdKind::Integer => ColumnKind::Integer,
            IdKind::Token => ColumnKind::Text,
        }
    }
}

/// A single nullable column in a [`Table`].
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    /// 64-bit signed integers.
    Integer(Vec<Option<i64>>),
    /// 64-bit floating-point values.
    Float(Vec<Option<f64>>),
    /// Strings, including token identifiers.
    Text(Vec<Option<String>>),
}

impl Column {
    /// Returns the number of elements in the column.
    pub fn len(&self) -> usize {
        match self {
            Column::Integer(v) => v.len(),
            Column::Float(v) => v.len(),
            Column::Text(v) => v.len(),
        }
    }

    /// Returns `true` if the column is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn kind(&self) -> ColumnKind {
        match self {
            Column::Integer(_) => ColumnKind::Integer,
            Column::Float(_) => ColumnKind::Float,
            Column::Text(_) => ColumnKind::Text,
        }
    }

    /// The identifier kind this column carries, or `None` for float columns.
    pub fn id_kind(&self) -> Option<IdKind> {
        match self {
            Column::Integer(_) => Some(IdKind::Integer),
            Column::Text(_) => Some(IdKind::Token),
            Column::Float(_) => None,
        }
    }

    /// A column of `len` nulls.
    pub fn nulls(kind: ColumnKind, len: usize) -> Self {
        match kind {
            ColumnKind::Integer => Column::Integer(vec![None; len]),
            ColumnKind::Float => Column::Float(vec![None; len]),
            ColumnKind::Text => Column::Text(vec![None; len]),
        }
    }

    /// Build an id column of the given kind.
    ///
    /// # Errors
    /// Returns an error if an identifier does not fit the requested kind.
    pub fn from_ids<I>(kind: IdKind, ids: I) -> Result<Self>
    where
        I: IntoIterator<Item = Option<Id>>,
    {
        let mismatch = |id: &Id| {
            PedigreeError::Data(format!(
                "Identifier '{}' cannot be stored in a {:?} column",
                id, kind
            ))
        };
        match kind {
            IdKind::Integer => ids
                .into_iter()
                .map(|id| match id {
                    None => Ok(None),
                    Some(Id::Int(v)) => Ok(Some(v)),
                    Some(other) => Err(mismatch(&other)),
                })
                .collect::<Result<Vec<_>>>()
                .map(Column::Integer),
            IdKind::Token => ids
                .into_iter()
                .map(|id| match id {
                    None => Ok(None),
                    Some(Id::Token(s)) => Ok(Some(s)),
                    Some(other) => Err(mismatch(&other)),
                })
                .collect::<Result<Vec<_>>>()
                .map(Column::Text),
        }
    }

    /// Value at `row`, or `None` if null.
    ///
    /// # Panics
    /// Panics if `row` is out of bounds.
    pub fn get(&self, row: usize) -> Option<Value> {
        match self {
            Column::Integer(v) => v[row].map(Value::Int),
            Column::Float(v) => v[row].map(Value::Float),
            Column::Text(v) => v[row].clone().map(Value::Text),
        }
    }

    /// Identifier at `row`, or `None` if null (or a float column).
    pub fn id(&self, row: usize) -> Option<Id> {
        match self {
            Column::Integer(v) => v[row].map(Id::Int),
            Column::Text(v) => v[row].clone().map(Id::Token),
            Column::Float(_) => None,
        }
    }

    pub fn is_null(&self, row: usize) -> bool {
        match self {
            Column::Integer(v) => v[row].is_none(),
            Column::Float(v) => v[row].is_none(),
            Column::Text(v) => v[row].is_none(),
        }
    }

    /// Gather the given rows, in the given order.
    pub fn take(&self, rows: &[usize]) -> Self {
        match self {
            Column::Integer(v) => Column::Integer(rows.iter().map(|&r| v[r]).collect()),
            Column::Float(v) => Column::Float(rows.iter().map(|&r| v[r]).collect()),
            Column::Text(v) => Column::Text(rows.iter().map(|&r| v[r].clone()).collect()),
        }
    }

    /// Replace every identifier matching `pred` with null. Float columns are
    /// returned unchanged.
    pub fn null_ids_where<F>(&self, pred: F) -> Self
    where
        F: Fn(&Id) -> bool,
    {
        match self {
            Column::Integer(v) => Column::Integer(
                v.iter()
                    .map(|x| x.filter(|&i| !pred(&Id::Int(i))))
                    .collect(),
            ),
            Column::Text(v) => Column::Text(
                v.iter()
                    .map(|x| {
                        x.as_ref()
                            .filter(|s| !pred(&Id::Token((*s).clone())))
                            .cloned()
                    })
                    .collect(),
            ),
            Column::Float(_) => self.clone(),
        }
    }

    fn extend_from(&mut self, other: &Column) -> Result<()> {
        match (self, other) {
            (Column::Integer(a), Column::Integer(b)) => a.extend_from_slice(b),
            (Column::Float(a), Column::Float(b)) => a.extend_from_slice(b),
            (Column::Text(a), Column::Text(b)) => a.extend_from_slice(b),
            (a, b) => {
                return Err(PedigreeError::Data(format!(
                    "Cannot concatenate {:?} column with {:?} column",
                    a.kind(),
                    b.kind()
                )))
            }
        }
        Ok(())
    }
}

/// A lightweight columnar table of pedigree records.
///
/// Columns are stored in insertion order using an [`IndexMap`]. All columns
/// must have the same number of rows. Every operation in this crate treats a
/// `Table` as immutable input and returns new tables.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Ordered map of column name -> column data.
    pub(crate) columns: IndexMap<String, Column>,
    /// Number of rows.
    pub(crate) nrows: usize,
}

impl Table {
    /// Create an empty table with no columns and no rows.
    pub fn new() -> Self {
        Table {
            columns: IndexMap::new(),
            nrows: 0,
        }
    }

    /// Add an integer column.
    ///
    /// # Errors
    /// Returns an error if the column length does not match existing rows,
    /// or if a column with the same name already exists.
    pub fn add_integer_column(&mut self, name: &str, data: Vec<Option<i64>>) -> Result<()> {
        self.add_column(name, Column::Integer(data))
    }

    /// Add a floating-point column.
    ///
    /// # Errors
    /// Same as [`Table::add_integer_column`].
    pub fn add_float_column(&mut self, name: &str, data: Vec<Option<f64>>) -> Result<()> {
        self.add_column(name, Column::Float(data))
    }

    /// Add a text column from string slices.
    ///
    /// # Errors
    /// Same as [`Table::add_integer_column`].
    pub fn add_text_column(&mut self, name: &str, data: &[Option<&str>]) -> Result<()> {
        let data = data.iter().map(|s| s.map(str::to_string)).collect();
        self.add_column(name, Column::Text(data))
    }

    /// Add a pre-built column.
    ///
    /// # Errors
    /// Same as [`Table::add_integer_column`].
    pub fn add_column(&mut self, name: &str, column: Column) -> Result<()> {
        if self.columns.contains_key(name) {
            return Err(PedigreeError::Data(format!(
                "Column '{}' already exists in table",
                name
            )));
        }

        let col_len = column.len();

        if self.columns.is_empty() {
            self.nrows = col_len;
        } else if col_len != self.nrows {
            return Err(PedigreeError::DimensionMismatch {
                expected: self.nrows,
                got: col_len,
                context: format!("adding column '{}'", name),
            });
        }

        self.columns.insert(name.to_string(), column);
        Ok(())
    }

    /// Return a copy of this table with `name` set to `column`, replacing the
    /// existing column in place or appending a new one.
    ///
    /// # Errors
    /// Returns an error if the column length does not match the table.
    pub fn with_column(&self, name: &str, column: Column) -> Result<Self> {
        if !self.columns.is_empty() && column.len() != self.nrows {
            return Err(PedigreeError::DimensionMismatch {
                expected: self.nrows,
                got: column.len(),
                context: format!("replacing column '{}'", name),
            });
        }
        let mut out = self.clone();
        out.nrows = column.len();
        out.columns.insert(name.to_string(), column);
        Ok(out)
    }

    /// Retrieve a column by name.
    ///
    /// # Errors
    /// Returns [`PedigreeError::Schema`] if no column with the given name exists.
    pub fn get_column(&self, name: &str) -> Result<&Column> {
        self.columns.get(name).ok_or_else(|| PedigreeError::Schema {
            missing: vec![name.to_string()],
        })
    }

    /// Check that every label names a column of this table.
    ///
    /// # Errors
    /// Returns [`PedigreeError::Schema`] listing all absent labels.
    pub fn require_columns(&self, labels: &[&str]) -> Result<()> {
        let missing: Vec<String> = labels
            .iter()
            .filter(|l| !self.columns.contains_key(**l))
            .map(|l| l.to_string())
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(PedigreeError::Schema { missing })
        }
    }

    /// Identifiers of an id-bearing column, one per row.
    ///
    /// # Errors
    /// Returns an error if the column is missing or holds floats.
    pub fn ids(&self, name: &str) -> Result<Vec<Option<Id>>> {
        let column = self.get_column(name)?;
        if column.id_kind().is_none() {
            return Err(PedigreeError::Data(format!(
                "Column '{}' is a Float column and cannot hold identifiers",
                name
            )));
        }
        Ok((0..self.nrows).map(|r| column.id(r)).collect())
    }

    /// Cell value at `row` of column `name`.
    ///
    /// # Errors
    /// Returns an error if the column does not exist.
    pub fn value(&self, name: &str, row: usize) -> Result<Option<Value>> {
        Ok(self.get_column(name)?.get(row))
    }

    /// Returns the number of rows.
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    /// Returns the number of columns.
    pub fn ncols(&self) -> usize {
        self.columns.len()
    }

    /// Returns `true` if a column with this name exists.
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Returns a vector of column names in insertion order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.keys().map(|s| s.as_str()).collect()
    }

    /// Select the given rows (in the given order) into a new table.
    pub fn take(&self, rows: &[usize]) -> Self {
        Table {
            columns: self
                .columns
                .iter()
                .map(|(name, col)| (name.clone(), col.take(rows)))
                .collect(),
            nrows: rows.len(),
        }
    }

    /// Keep the rows for which `pred(row_index)` holds.
    pub fn filter<F>(&self, pred: F) -> Self
    where
        F: Fn(usize) -> bool,
    {
        let rows: Vec<usize> = (0..self.nrows).filter(|&r| pred(r)).collect();
        self.take(&rows)
    }

    /// A table with the same schema and no rows.
    pub fn empty_like(&self) -> Self {
        self.take(&[])
    }

    /// `n` rows of nulls with this table's schema.
    pub fn null_rows_like(&self, n: usize) -> Self {
        Table {
            columns: self
                .columns
                .iter()
                .map(|(name, col)| (name.clone(), Column::nulls(col.kind(), n)))
                .collect(),
            nrows: n,
        }
    }

    /// Append the rows of `other` below this table's rows.
    ///
    /// # Errors
    /// Returns an error unless both tables have identical column names, order
    /// and kinds.
    pub fn vstack(&self, other: &Table) -> Result<Self> {
        let same_schema = self.columns.len() == other.columns.len()
            && self
                .columns
                .iter()
                .zip(other.columns.iter())
                .all(|((a, ca), (b, cb))| a == b && ca.kind() == cb.kind());
        if !same_schema {
            return Err(PedigreeError::Data(format!(
                "Cannot concatenate tables with schemas {:?} and {:?}",
                self.column_names(),
                other.column_names()
            )));
        }
        let mut out = self.clone();
        for (col, other_col) in out.columns.values_mut().zip(other.columns.values()) {
            col.extend_from(other_col)?;
        }
        out.nrows = self.nrows + other.nrows;
        Ok(out)
    }

    /// Concatenate several tables sharing one schema.
    ///
    /// # Errors
    /// Returns an error if the schemas differ or `tables` is empty.
    pub fn concat(tables: &[Table]) -> Result<Self> {
        let (first, rest) = tables
            .split_first()
            .ok_or_else(|| PedigreeError::Data("Cannot concatenate zero tables".into()))?;
        rest.iter().try_fold(first.clone(), |acc, t| acc.vstack(t))
    }
}

impl Default for Table {
    fn default() -> Self {
        Self::new()
    }
}
