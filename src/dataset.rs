use std::collections::BTreeMap;

use crate::schema::ColumnSchema;

/// A single cell of the source table.
///
/// Mirrors what the workbook reader yields: text, a number (integers are
/// widened to `f64`), or nothing at all.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Text(String),
    Number(f64),
    Empty,
}

impl Value {
    /// Text rendition of the cell. Numbers are formatted, empty cells
    /// become the empty string.
    pub fn as_text(&self) -> String {
        match self {
            Value::Text(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Empty => String::new(),
        }
    }

    /// Numeric rendition of the cell. Text is parsed if possible;
    /// anything else counts as zero, matching how unparseable cells are
    /// treated on load.
    pub fn as_number(&self) -> f64 {
        match self {
            Value::Number(n) => *n,
            Value::Text(s) => s.trim().parse().unwrap_or(0.0),
            Value::Empty => 0.0,
        }
    }
}

/// Sanitize a column header: spaces become underscores, then every
/// character outside `[A-Za-z0-9_]` is dropped.
///
/// This reproduces the production workbook's header mangling exactly —
/// accented characters disappear rather than being transliterated, case
/// is untouched, repeated underscores are kept. The required-column check
/// depends on matching these mangled names, so the behavior is load-bearing.
///
/// The transformation is idempotent: a normalized name passes through
/// unchanged.
pub fn normalize_column_name(name: &str) -> String {
    name.chars()
        .map(|c| if c == ' ' { '_' } else { c })
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect()
}

/// One therapy session, projected out of a validated [`Dataset`] row.
///
/// The five required columns become typed fields; any other column lands
/// in `extra` untouched.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionRecord {
    pub therapist: String,
    pub therapy_type: String,
    pub cost: f64,
    pub duration: f64,
    pub participants: f64,
    pub extra: BTreeMap<String, Value>,
}

/// The in-memory table read from the workbook: normalized column names
/// plus row data in source order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Dataset {
    /// The degraded output of a failed load: no rows, no columns.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a dataset from already-normalized column names.
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Append a row, padding or truncating it to the column count so
    /// that positional access stays in bounds.
    pub fn push_row(&mut self, mut row: Vec<Value>) {
        row.resize(self.columns.len(), Value::Empty);
        self.rows.push(row);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Distinct text values of a column, in first-appearance order.
    /// Used to populate the filter controls and their all-selected
    /// defaults.
    pub fn distinct_text(&self, column: &str) -> Vec<String> {
        let Some(idx) = self.column_index(column) else {
            return Vec::new();
        };
        let mut seen = Vec::new();
        for row in &self.rows {
            let text = row[idx].as_text();
            if !seen.contains(&text) {
                seen.push(text);
            }
        }
        seen
    }

    /// Project every row into a typed [`SessionRecord`] using the given
    /// column schema. Columns the schema does not claim are carried in
    /// each record's `extra` bag.
    ///
    /// Callers are expected to have validated the schema first; a row
    /// whose required cell is missing or non-numeric projects as an
    /// empty string or `0.0` rather than failing.
    pub fn sessions(&self, schema: &ColumnSchema) -> Vec<SessionRecord> {
        let therapist = self.column_index(&schema.therapist);
        let therapy_type = self.column_index(&schema.therapy_type);
        let cost = self.column_index(&schema.cost);
        let duration = self.column_index(&schema.duration);
        let participants = self.column_index(&schema.participants);
        let required = [therapist, therapy_type, cost, duration, participants];

        self.rows
            .iter()
            .map(|row| {
                let text = |idx: Option<usize>| {
                    idx.map(|i| row[i].as_text()).unwrap_or_default()
                };
                let number = |idx: Option<usize>| {
                    idx.map(|i| row[i].as_number()).unwrap_or(0.0)
                };
                let extra = self
                    .columns
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| !required.contains(&Some(*i)))
                    .map(|(i, name)| (name.clone(), row[i].clone()))
                    .collect();
                SessionRecord {
                    therapist: text(therapist),
                    therapy_type: text(therapy_type),
                    cost: number(cost),
                    duration: number(duration),
                    participants: number(participants),
                    extra,
                }
            })
            .collect()
    }
}
