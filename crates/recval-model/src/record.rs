//! Typed records with a shared, ordered schema.
//!
//! A [`Schema`] is fixed when the source is loaded. Every [`Record`] keeps a
//! handle to it, so field access by name is checked instead of silently
//! yielding nothing for a misspelled column.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{ModelError, Result};

/// Ordered, duplicate-free field names of a record source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    fields: Vec<String>,
    index: HashMap<String, usize>,
}

impl Schema {
    pub fn new<I, S>(fields: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names = Vec::new();
        let mut index = HashMap::new();
        for field in fields {
            let field = field.into();
            if index.insert(field.clone(), names.len()).is_some() {
                return Err(ModelError::DuplicateField { field });
            }
            names.push(field);
        }
        Ok(Self {
            fields: names,
            index,
        })
    }

    /// Field names in source order.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.index.contains_key(field)
    }

    /// Position of `field` within the schema.
    pub fn index_of(&self, field: &str) -> Result<usize> {
        self.index
            .get(field)
            .copied()
            .ok_or_else(|| ModelError::FieldNotFound {
                field: field.to_string(),
            })
    }
}

/// One input row.
///
/// `position` is the 1-based index of the row in the source sequence and is
/// what diagnostics report as the row number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    position: usize,
    schema: Arc<Schema>,
    values: Vec<String>,
}

impl Record {
    pub fn new(position: usize, schema: Arc<Schema>, values: Vec<String>) -> Result<Self> {
        if values.len() != schema.len() {
            return Err(ModelError::Arity {
                position,
                expected: schema.len(),
                found: values.len(),
            });
        }
        Ok(Self {
            position,
            schema,
            values,
        })
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Value of `field`, or [`ModelError::FieldNotFound`].
    pub fn get(&self, field: &str) -> Result<&str> {
        let idx = self.schema.index_of(field)?;
        Ok(self.values[idx].as_str())
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// `(field, value)` pairs in schema order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.schema
            .fields()
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().map(String::as_str))
    }
}

/// A schema plus the records loaded against it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSet {
    schema: Arc<Schema>,
    records: Vec<Record>,
}

impl RecordSet {
    pub fn new(schema: Arc<Schema>) -> Self {
        Self {
            schema,
            records: Vec::new(),
        }
    }

    /// Append a row of raw values; its position is the next 1-based index.
    pub fn push_values(&mut self, values: Vec<String>) -> Result<&Record> {
        let position = self.records.len() + 1;
        let record = Record::new(position, Arc::clone(&self.schema), values)?;
        self.records.push(record);
        Ok(&self.records[self.records.len() - 1])
    }

    /// Append an already loaded record, keeping its original position.
    pub fn push(&mut self, record: Record) {
        debug_assert!(
            *record.schema == *self.schema,
            "record schema differs from set schema"
        );
        self.records.push(record);
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn shared_schema(&self) -> Arc<Schema> {
        Arc::clone(&self.schema)
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }
}

impl<'a> IntoIterator for &'a RecordSet {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
