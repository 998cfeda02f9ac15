//! Parameter binding.
//!
//! Commands are built with positional `?` placeholders. Before execution
//! the binder renames every placeholder into the backend's native marker
//! and turns each value into something the backend client accepts.
//!
//! ```rust
//! use oxide_dao_core::binder::ParameterBinder;
//! use oxide_dao_core::dialect::GenericDialect;
//! use oxide_dao_core::SqlValue;
//!
//! let dialect = GenericDialect::new();
//! let bound = ParameterBinder::new(&dialect)
//!     .bind("SELECT * FROM T WHERE A = ? AND B = 'literal ?'", vec![SqlValue::Int(7)])
//!     .unwrap();
//! assert_eq!(bound.parameters.len(), 1);
//! assert_eq!(bound.parameters[0].name, "param0");
//! ```

use std::borrow::Cow;

use tracing::{debug, trace};

use crate::dialect::Dialect;
use crate::error::{DaoError, Result};
use crate::pool::param_name;
use crate::query::Query;
use crate::value::SqlValue;

/// Returns the byte offsets of every `?` placeholder in `sql`, left to
/// right.
///
/// Question marks inside `'...'` literals, `"..."` identifiers, `--` line
/// comments and `/* */` block comments are not placeholders.
#[must_use]
pub fn find_placeholders(sql: &str) -> Vec<usize> {
    let bytes = sql.as_bytes();
    let mut found = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'?' => found.push(i),
            quote @ (b'\'' | b'"') => {
                i += 1;
                while i < bytes.len() {
                    if bytes[i] == quote {
                        // A doubled quote is an escaped quote.
                        if bytes.get(i + 1) == Some(&quote) {
                            i += 1;
                        } else {
                            break;
                        }
                    }
                    i += 1;
                }
            }
            b'-' if bytes.get(i + 1) == Some(&b'-') => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i += 2;
                while i < bytes.len() && !(bytes[i] == b'*' && bytes.get(i + 1) == Some(&b'/')) {
                    i += 1;
                }
                i += 1;
            }
            _ => {}
        }
        i += 1;
    }
    found
}

/// How a parameter is handed to the backend client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterKind {
    /// An ordinary inline value.
    Inline,
    /// A character large object; inline strings of this size would be
    /// rejected or truncated.
    LargeObject,
}

/// A value in the form a backend client accepts.
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    /// The backend's null marker.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value. Enums arrive here as their code.
    Int(i64),
    /// Float value.
    Float(f64),
    /// Text value. Geometries arrive here as WKT.
    Text(String),
    /// Binary value.
    Blob(Vec<u8>),
}

/// One named parameter of a bound command.
#[derive(Debug, Clone, PartialEq)]
pub struct NativeParameter {
    /// Generated name, `param0`, `param1`, ...
    pub name: Cow<'static, str>,
    /// The converted value.
    pub value: BindValue,
    /// Inline or large object.
    pub kind: ParameterKind,
}

/// Command text in native parameter syntax plus its parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundCommand {
    /// Rewritten command text.
    pub sql: String,
    /// Parameters, in placeholder order.
    pub parameters: Vec<NativeParameter>,
}

/// Rewrites placeholders and converts values for one dialect.
#[derive(Debug, Clone, Copy)]
pub struct ParameterBinder<'d, D: Dialect + ?Sized> {
    dialect: &'d D,
}

impl<'d, D: Dialect + ?Sized> ParameterBinder<'d, D> {
    /// Creates a binder for `dialect`.
    #[must_use]
    pub const fn new(dialect: &'d D) -> Self {
        Self { dialect }
    }

    /// Binds a finished query.
    ///
    /// # Errors
    ///
    /// See [`ParameterBinder::bind`].
    pub fn bind_query(&self, query: Query) -> Result<BoundCommand> {
        let (sql, params) = query.into_parts();
        self.bind(&sql, params)
    }

    /// Binds `values` to the placeholders of `sql`.
    ///
    /// # Errors
    ///
    /// Returns [`DaoError::ParameterCountMismatch`] unless there is exactly
    /// one value per placeholder.
    pub fn bind(&self, sql: &str, values: Vec<SqlValue>) -> Result<BoundCommand> {
        let placeholders = find_placeholders(sql);
        if values.len() != placeholders.len() {
            return Err(DaoError::ParameterCountMismatch {
                placeholders: placeholders.len(),
                values: values.len(),
                sql: sql.to_string(),
            });
        }

        let mut text = sql.to_string();
        let mut parameters = Vec::with_capacity(values.len());
        // Each replacement shifts everything to its right.
        let mut offset = 0;
        for (index, (position, value)) in placeholders.into_iter().zip(values).enumerate() {
            let name = param_name(index);
            if let Some(marker) = self
                .dialect
                .named_parameter(&name)
                .filter(|m| !m.is_empty())
            {
                let at = position + offset;
                text.replace_range(at..=at, &marker);
                offset += marker.len() - 1;
            }
            let (value, kind) = self.convert(&name, value);
            parameters.push(NativeParameter { name, value, kind });
        }

        debug!(
            dialect = self.dialect.name(),
            sql = %text,
            parameters = parameters.len(),
            "bound command"
        );
        Ok(BoundCommand {
            sql: text,
            parameters,
        })
    }

    fn convert(&self, name: &str, value: SqlValue) -> (BindValue, ParameterKind) {
        let value = match value {
            SqlValue::Null => return (BindValue::Null, ParameterKind::Inline),
            SqlValue::Bool(b) => BindValue::Bool(b),
            SqlValue::Int(n) => BindValue::Int(n),
            SqlValue::Float(f) => BindValue::Float(f),
            SqlValue::Blob(b) => BindValue::Blob(b),
            e @ SqlValue::Enum(_) => return self.convert(name, e.normalized()),
            SqlValue::Text(s) => BindValue::Text(s),
            SqlValue::Geometry(g) => BindValue::Text(self.dialect.geometry_codec().encode(&g)),
        };
        let limit = self.dialect.max_inline_string_chars();
        if let (BindValue::Text(s), Some(limit)) = (&value, limit) {
            let chars = s.chars().count();
            if chars > limit {
                trace!(parameter = name, chars, limit, "binding string as large object");
                return (value, ParameterKind::LargeObject);
            }
        }
        (value, ParameterKind::Inline)
    }
}
