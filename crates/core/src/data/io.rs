use std::io::Read;
use std::path::Path;

use crate::error::{PedigreeError, Result};

use super::table::{Column, Table};

impl Table {
    /// Read a CSV file into a table.
    ///
    /// The first row is treated as a header and lines starting with `#` are
    /// skipped. Each column is auto-detected:
    /// - If every non-empty value parses as `i64`, it becomes an `Integer` column.
    /// - Otherwise, if every non-empty value parses as `f64`, it becomes `Float`.
    /// - Otherwise it becomes a `Text` column.
    ///
    /// Empty fields are read as nulls. Sentinels such as `0` or `.` are kept
    /// as-is; see [`crate::pedigree::normalize_unknown_parents`].
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened, if the CSV is malformed,
    /// or if rows have inconsistent numbers of fields.
    ///
    /// # Examples
    /// ```no_run
    /// use pedigree_integrity_core::data::Table;
    ///
    /// let ped = Table::from_csv("pedigree.csv").unwrap();
    /// println!("rows = {}, cols = {}", ped.nrows(), ped.ncols());
    /// ```
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path.as_ref())?;
        Self::from_csv_reader(file)
    }

    /// Read CSV data from any reader. See [`Table::from_csv`].
    ///
    /// # Errors
    /// Same as [`Table::from_csv`].
    pub fn from_csv_reader<R: Read>(rdr: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .comment(Some(b'#'))
            .trim(csv::Trim::All)
            .from_reader(rdr);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.to_string())
            .collect();

        let ncols = headers.len();
        let mut string_columns: Vec<Vec<String>> = vec![Vec::new(); ncols];

        for result in reader.records() {
            let record = result?;
            if record.len() != ncols {
                return Err(PedigreeError::Data(format!(
                    "Row has {} fields but header has {} columns",
                    record.len(),
                    ncols
                )));
            }
            for (i, field) in record.iter().enumerate() {
                string_columns[i].push(field.to_string());
            }
        }

        let mut table = Table::new();
        for (header, raw) in headers.iter().zip(string_columns) {
            table.add_column(header, detect_column(raw))?;
        }
        Ok(table)
    }
}

fn detect_column(raw: Vec<String>) -> Column {
    let present = || raw.iter().filter(|s| !s.is_empty());

    // Nothing to infer from.
    if present().next().is_none() {
        return Column::Text(vec![None; raw.len()]);
    }

    if present().all(|s| s.parse::<i64>().is_ok()) {
        return Column::Integer(
            raw.iter()
                .map(|s| s.parse::<i64>().ok())
                .collect(),
        );
    }
    if present().all(|s| s.parse::<f64>().is_ok()) {
        return Column::Float(
            raw.iter()
                .map(|s| s.parse::<f64>().ok())
                .collect(),
        );
    }
    Column::Text(
        raw.into_iter()
            .map(|s| if s.is_empty() { None } else { Some(s) })
            .collect(),
    )
}
