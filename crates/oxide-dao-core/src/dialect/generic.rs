//! Generic SQL dialect.

use std::borrow::Cow;

use super::{Dialect, TypeKind};
use crate::error::{DaoError, Result};
use crate::query::Query;
use crate::sequence::validate_sequence_name;

/// A generic SQL dialect using ANSI SQL standards.
///
/// Positional `?` parameters, no spatial functions, `NEXT VALUE FOR`
/// sequences.
#[derive(Debug, Default, Clone, Copy)]
pub struct GenericDialect;

impl GenericDialect {
    /// Creates a new generic dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for GenericDialect {
    fn name(&self) -> &'static str {
        "generic"
    }

    fn type_name_for(&self, kind: TypeKind) -> Result<Cow<'static, str>> {
        match kind {
            TypeKind::AutoNumber => Ok(Cow::Borrowed("INTEGER GENERATED BY DEFAULT AS IDENTITY")),
            TypeKind::ByteArray => Ok(Cow::Borrowed("BLOB")),
            TypeKind::LongInteger => Ok(Cow::Borrowed("BIGINT")),
            TypeKind::UnicodeString => Ok(Cow::Borrowed("NVARCHAR(2000)")),
            TypeKind::AsciiString => Ok(Cow::Borrowed("VARCHAR(2000)")),
            TypeKind::Geometry => Err(DaoError::UnsupportedCapability {
                dialect: self.name(),
                capability: kind.to_string(),
                hint: "use a spatially enabled dialect",
            }),
        }
    }

    fn sequence_value_query(&self, sequence: &str) -> Result<Query> {
        let name = validate_sequence_name(sequence)?;
        let mut q = Query::new();
        q.push_sql("SELECT NEXT VALUE FOR ");
        q.push_sql(name);
        Ok(q)
    }
}
