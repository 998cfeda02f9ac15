//! SQL dialect support.
//!
//! Backends differ in alias syntax, type names, parameter markers, sequence
//! mechanisms and spatial functions. A [`Dialect`] is a read-only bundle of
//! those facts, built once per connection and shared by every query built
//! over it. The query builder is generic over the dialect; there is no
//! per-backend builder.

mod generic;

pub use generic::GenericDialect;

use std::borrow::Cow;
use std::fmt;

use crate::error::Result;
use crate::geometry::{GeometryCodec, StandardCodec};
use crate::query::Query;

/// Column type families a dialect must name for DDL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    /// Auto-incrementing integer key.
    AutoNumber,
    /// Binary data.
    ByteArray,
    /// 64-bit integer.
    LongInteger,
    /// Unicode text.
    UnicodeString,
    /// ASCII-only text.
    AsciiString,
    /// Spatial column.
    Geometry,
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::AutoNumber => "autonumber columns",
            Self::ByteArray => "byte array columns",
            Self::LongInteger => "long integer columns",
            Self::UnicodeString => "unicode string columns",
            Self::AsciiString => "ascii string columns",
            Self::Geometry => "geometry columns",
        };
        f.write_str(name)
    }
}

/// Backend spatial function names.
///
/// The builder always passes the column as the first argument and the
/// literal geometry as the second to the relationship functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpatialFunctions {
    /// `f(a, b)` returning 1 when `a` intersects `b`.
    pub intersects: &'static str,
    /// `f(a, b)` returning 1 when `a` lies within `b`.
    pub within: &'static str,
    /// `f(a, b)` returning 1 when `a` contains `b`.
    pub contains: &'static str,
    /// `f(a, b)` returning the planar distance.
    pub distance: &'static str,
    /// `f(wkt, srid)` building a geometry from text.
    pub from_text: &'static str,
    /// `f(geom)` returning the SRID.
    pub srid: &'static str,
    /// `f(geom)` returning WKT.
    pub as_text: &'static str,
    /// String concatenation operator.
    pub concat: &'static str,
}

/// Trait for SQL dialect-specific behavior.
pub trait Dialect: Send + Sync {
    /// Returns the name of the dialect.
    fn name(&self) -> &'static str;

    /// Returns whether selected columns must be aliased.
    fn needs_column_alias(&self) -> bool {
        false
    }

    /// Returns whether column aliases need the `AS` keyword.
    fn needs_as_for_column_alias(&self) -> bool {
        true
    }

    /// Text placed before a column alias.
    fn column_alias_prefix(&self) -> &'static str {
        ""
    }

    /// Text placed after a column alias.
    fn column_alias_suffix(&self) -> &'static str {
        ""
    }

    /// Text placed before a table alias.
    fn table_alias_prefix(&self) -> &'static str {
        ""
    }

    /// Text placed after a table alias.
    fn table_alias_suffix(&self) -> &'static str {
        ""
    }

    /// Returns whether ORDER BY may refer to a column alias.
    fn can_use_alias_in_order_clause(&self) -> bool {
        false
    }

    /// Formats `alias` as a column alias, including the leading space.
    fn column_alias(&self, alias: &str) -> String {
        let keyword = if self.needs_as_for_column_alias() {
            " AS "
        } else {
            " "
        };
        format!("{keyword}{}", self.alias_reference(alias))
    }

    /// Formats a reference to a column alias, as used in ORDER BY.
    fn alias_reference(&self, alias: &str) -> String {
        format!(
            "{}{alias}{}",
            self.column_alias_prefix(),
            self.column_alias_suffix()
        )
    }

    /// Formats `alias` as a table alias.
    fn table_alias(&self, alias: &str) -> String {
        format!(
            "{}{alias}{}",
            self.table_alias_prefix(),
            self.table_alias_suffix()
        )
    }

    /// Returns the backend type name for a column type family.
    ///
    /// # Errors
    ///
    /// Returns [`DaoError::UnsupportedCapability`](crate::DaoError::UnsupportedCapability)
    /// for families the backend cannot represent.
    fn type_name_for(&self, kind: TypeKind) -> Result<Cow<'static, str>>;

    /// Returns true if the backend client pools its own connections, in
    /// which case the generic layer must not pool them again.
    fn uses_own_connection_pooling(&self) -> bool {
        false
    }

    /// Returns the native marker for a named parameter, or `None` to keep
    /// positional `?` markers.
    fn named_parameter(&self, name: &str) -> Option<String> {
        let _ = name;
        None
    }

    /// Longest string, in characters, that may be bound inline. Longer
    /// strings are bound as large objects.
    fn max_inline_string_chars(&self) -> Option<usize> {
        None
    }

    /// SQL before and after the divisor placeholder of a modulus clause.
    fn modulus_clause(&self, column: &str) -> (String, &'static str) {
        (format!("{column} % "), "")
    }

    /// Builds the query returning the next value of a sequence.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is malformed or the backend has no
    /// sequences.
    fn sequence_value_query(&self, sequence: &str) -> Result<Query>;

    /// Builds a query counting tables named `table` (owner already
    /// stripped), ignoring case.
    fn table_exists_query(&self, table: &str) -> Query {
        let mut q = Query::new();
        q.push_sql("SELECT COUNT(*) FROM information_schema.tables WHERE UPPER(table_name) = ");
        q.push_param(crate::SqlValue::Text(table.to_uppercase()));
        q
    }

    /// Builds a query counting sequences named `sequence`, ignoring case.
    fn sequence_exists_query(&self, sequence: &str) -> Query {
        let mut q = Query::new();
        q.push_sql(
            "SELECT COUNT(*) FROM information_schema.sequences WHERE UPPER(sequence_name) = ",
        );
        q.push_param(crate::SqlValue::Text(sequence.to_uppercase()));
        q
    }

    /// Returns the spatial function table, if the backend has one.
    fn spatial(&self) -> Option<&SpatialFunctions> {
        None
    }

    /// Returns the codec for geometry text crossing the SQL boundary.
    fn geometry_codec(&self) -> &dyn GeometryCodec {
        &StandardCodec
    }

    /// Describes the connection with credentials removed, for logging.
    fn sanitized_connection_string(&self) -> Cow<'_, str> {
        Cow::Borrowed("")
    }
}
