use serde_json::Value;

/// Ordered list of field names, fixed for the lifetime of a run.
///
/// The schema determines both which source fields are harvested and the
/// column order of every sink row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSchema {
    fields: Vec<String>,
}

impl FieldSchema {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Projects one source row object into a [`Record`].
    ///
    /// Absent, null and non-scalar fields become the empty string so the
    /// sink schema stays stable; scalar non-strings are stringified.
    pub fn project(&self, row: &Value) -> Record {
        let values = self
            .fields
            .iter()
            .map(|field| match row.get(field) {
                Some(Value::String(text)) => text.clone(),
                Some(Value::Number(number)) => number.to_string(),
                Some(Value::Bool(flag)) => flag.to_string(),
                Some(_) | None => String::new(),
            })
            .collect();
        Record { values }
    }
}

/// One harvested entity: a value per schema field, in schema order.
///
/// Every schema field is present; missing source fields are represented by
/// the empty string, never omitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    values: Vec<String>,
}

impl Record {
    pub fn new(values: Vec<String>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }
}
