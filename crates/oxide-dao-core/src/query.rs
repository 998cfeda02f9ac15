//! The per-statement SQL accumulator.

use crate::binder::find_placeholders;
use crate::value::SqlValue;

/// SQL text plus its positional parameters.
///
/// The Nth `?` in the text is bound to the Nth parameter. Use
/// [`Query::push_param`] to append both together so they never drift.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    sql: String,
    params: Vec<SqlValue>,
}

impl Query {
    /// Creates an empty query.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a query that writes into an existing buffer.
    #[must_use]
    pub const fn with_buffer(sql: String) -> Self {
        Self {
            sql,
            params: Vec::new(),
        }
    }

    /// Appends raw SQL text.
    pub fn push_sql(&mut self, sql: &str) {
        self.sql.push_str(sql);
    }

    /// Appends a single character.
    pub fn push_char(&mut self, ch: char) {
        self.sql.push(ch);
    }

    /// Appends a `?` placeholder and its value.
    pub fn push_param(&mut self, value: SqlValue) {
        self.sql.push('?');
        self.params.push(value);
    }

    /// Appends a value for a placeholder already written by the caller.
    pub fn bind(&mut self, value: SqlValue) {
        self.params.push(value);
    }

    /// Returns the SQL text.
    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Returns the parameters.
    #[must_use]
    pub fn params(&self) -> &[SqlValue] {
        &self.params
    }

    /// Counts the placeholders in the text, ignoring quoted sections.
    #[must_use]
    pub fn placeholder_count(&self) -> usize {
        find_placeholders(&self.sql).len()
    }

    /// Consumes the query and returns the SQL and parameters.
    #[must_use]
    pub fn into_parts(self) -> (String, Vec<SqlValue>) {
        (self.sql, self.params)
    }
}
