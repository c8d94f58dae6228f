//! Column-oriented feature table.
//!
//! The sales data is a handful of typed columns of equal length. Feature code
//! looks columns up by name and appends new float columns; looking up a column
//! that is absent (or of the wrong type) is a structural error.

use chrono::NaiveDate;

use crate::error::FeatureError;

/// A single typed column.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Date(Vec<NaiveDate>),
    Text(Vec<String>),
    Int(Vec<i64>),
    Float(Vec<f64>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Date(v) => v.len(),
            Column::Text(v) => v.len(),
            Column::Int(v) => v.len(),
            Column::Float(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Column::Date(_) => "date",
            Column::Text(_) => "text",
            Column::Int(_) => "integer",
            Column::Float(_) => "float",
        }
    }

    /// Render one cell for CSV output.
    pub fn format_cell(&self, row: usize) -> String {
        match self {
            Column::Date(v) => v[row].format("%Y-%m-%d").to_string(),
            Column::Text(v) => v[row].clone(),
            Column::Int(v) => v[row].to_string(),
            Column::Float(v) => {
                let x = v[row];
                if x.is_nan() { String::new() } else { x.to_string() }
            }
        }
    }
}

/// Ordered set of named columns sharing one row count.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureTable {
    columns: Vec<(String, Column)>,
    rows: usize,
}

impl FeatureTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|(n, _)| n == name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|(n, _)| n == name).map(|(_, c)| c)
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, &Column)> {
        self.columns.iter().map(|(n, c)| (n.as_str(), c))
    }

    /// Append a column, or replace an existing one with the same name in place.
    ///
    /// The first column fixes the row count of an empty table.
    pub fn insert(&mut self, name: impl Into<String>, column: Column) -> Result<(), FeatureError> {
        let name = name.into();
        if !self.columns.is_empty() && column.len() != self.rows {
            return Err(FeatureError::LengthMismatch {
                column: name,
                expected: self.rows,
                found: column.len(),
            });
        }
        if self.columns.is_empty() {
            self.rows = column.len();
        }

        match self.columns.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = column,
            None => self.columns.push((name, column)),
        }
        Ok(())
    }

    /// Fail fast unless every named column is present.
    pub fn require(&self, names: &[&str]) -> Result<(), FeatureError> {
        for name in names {
            if !self.has_column(name) {
                return Err(FeatureError::MissingColumn((*name).to_string()));
            }
        }
        Ok(())
    }

    fn lookup(&self, name: &str) -> Result<&Column, FeatureError> {
        self.column(name)
            .ok_or_else(|| FeatureError::MissingColumn(name.to_string()))
    }

    pub fn dates(&self, name: &str) -> Result<&[NaiveDate], FeatureError> {
        match self.lookup(name)? {
            Column::Date(v) => Ok(v),
            other => Err(type_error(name, "date", other)),
        }
    }

    pub fn texts(&self, name: &str) -> Result<&[String], FeatureError> {
        match self.lookup(name)? {
            Column::Text(v) => Ok(v),
            other => Err(type_error(name, "text", other)),
        }
    }

    pub fn ints(&self, name: &str) -> Result<&[i64], FeatureError> {
        match self.lookup(name)? {
            Column::Int(v) => Ok(v),
            other => Err(type_error(name, "integer", other)),
        }
    }

    /// Numeric view of a column; integer columns are widened.
    pub fn numbers(&self, name: &str) -> Result<Vec<f64>, FeatureError> {
        match self.lookup(name)? {
            Column::Float(v) => Ok(v.clone()),
            Column::Int(v) => Ok(v.iter().map(|&x| x as f64).collect()),
            other => Err(type_error(name, "float", other)),
        }
    }

    pub fn floats(&self, name: &str) -> Result<&[f64], FeatureError> {
        match self.lookup(name)? {
            Column::Float(v) => Ok(v),
            other => Err(type_error(name, "float", other)),
        }
    }
}

fn type_error(name: &str, expected: &'static str, found: &Column) -> FeatureError {
    FeatureError::ColumnType {
        column: name.to_string(),
        expected,
        found: found.kind(),
    }
}
