//! Statement generation from class mappings and criteria.
//!
//! One builder serves every backend: the [`Dialect`] passed in decides
//! aliasing, modulus syntax, spatial functions and geometry text.
//!
//! # Example
//!
//! ```rust
//! use oxide_dao_core::builder::QueryBuilder;
//! use oxide_dao_core::criteria::{Criteria, Expression};
//! use oxide_dao_core::dialect::GenericDialect;
//! use oxide_dao_core::mapping::ClassMapping;
//!
//! let mapping = ClassMapping::new("USERS")
//!     .attribute("id", "ID")
//!     .attribute("name", "NAME");
//! let dialect = GenericDialect::new();
//! let builder = QueryBuilder::new(&dialect);
//!
//! let query = builder
//!     .build_select(&mapping, &Criteria::new().filter(Expression::eq("name", "Ann")))
//!     .unwrap();
//! assert_eq!(
//!     query.sql(),
//!     "SELECT USERS.ID, USERS.NAME FROM USERS WHERE (USERS.NAME = ?)"
//! );
//! ```

use tracing::{debug, trace};

use crate::criteria::{CompareOp, Criteria, DistanceKind, Expression, OrderDirection};
use crate::dialect::{Dialect, SpatialFunctions};
use crate::error::{DaoError, Result};
use crate::geometry::Geometry;
use crate::mapping::{AttributeMapping, ClassMapping, ColumnKind};
use crate::pool::BufferPool;
use crate::query::Query;
use crate::value::SqlValue;

/// Column/value pairs for an INSERT or UPDATE, in column order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyValues {
    entries: Vec<(String, SqlValue)>,
}

impl PropertyValues {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the value for `column`.
    #[must_use]
    pub fn with(mut self, column: &str, value: impl crate::ToSqlValue) -> Self {
        self.set(column, value.to_sql_value());
        self
    }

    /// Sets the value for `column`, replacing any earlier one.
    pub fn set(&mut self, column: &str, value: SqlValue) {
        match self.entries.iter_mut().find(|(c, _)| c == column) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((column.to_string(), value)),
        }
    }

    /// Returns the value for `column`.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&SqlValue> {
        self.entries
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, v)| v)
    }

    /// Iterates over column/value pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SqlValue)> {
        self.entries.iter().map(|(c, v)| (c.as_str(), v))
    }

    /// Number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no columns are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Builds SELECT, COUNT, INSERT, UPDATE and DELETE statements for a dialect.
///
/// The builder holds no per-query state and may be shared between threads.
#[derive(Debug)]
pub struct QueryBuilder<'d, D: Dialect + ?Sized> {
    dialect: &'d D,
    buffers: BufferPool,
}

impl<'d, D: Dialect + ?Sized> QueryBuilder<'d, D> {
    /// Creates a builder for `dialect`.
    #[must_use]
    pub fn new(dialect: &'d D) -> Self {
        debug!(
            dialect = dialect.name(),
            connection = %dialect.sanitized_connection_string(),
            "query builder created"
        );
        Self {
            dialect,
            buffers: BufferPool::new(),
        }
    }

    /// Returns the dialect.
    #[must_use]
    pub const fn dialect(&self) -> &'d D {
        self.dialect
    }

    /// Returns a finished query's buffer to the pool.
    pub fn release(&self, query: Query) {
        let (sql, _) = query.into_parts();
        self.buffers.release(sql);
    }

    /// Runs `render` against a query backed by a pooled buffer. The buffer
    /// goes back to the pool if rendering fails.
    fn build<F>(&self, render: F) -> Result<Query>
    where
        F: FnOnce(&mut Query) -> Result<()>,
    {
        let mut query = Query::with_buffer(self.buffers.acquire().into_string());
        if let Err(e) = render(&mut query) {
            self.release(query);
            return Err(e);
        }
        trace!(
            sql = query.sql(),
            params = query.params().len(),
            "built query"
        );
        Ok(query)
    }

    fn spatial(&self, expr: &Expression) -> Result<&SpatialFunctions> {
        self.dialect.spatial().ok_or_else(|| unsupported(expr))
    }

    /// Returns `alias.column` or `table.column` unless the column is
    /// already qualified.
    fn qualified(&self, mapping: &ClassMapping, column: &str) -> String {
        if column.contains('.') {
            return column.to_string();
        }
        match mapping.alias() {
            Some(alias) => format!("{}.{column}", self.dialect.table_alias(alias)),
            None => format!("{}.{column}", mapping.table()),
        }
    }

    /// `table` or `table alias`
    fn push_table(&self, q: &mut Query, mapping: &ClassMapping) {
        q.push_sql(mapping.table());
        if let Some(alias) = mapping.alias() {
            q.push_char(' ');
            q.push_sql(&self.dialect.table_alias(alias));
        }
    }

    fn projects_geometry(&self, attr: &AttributeMapping) -> bool {
        attr.kind == ColumnKind::Geometry && self.dialect.spatial().is_some()
    }

    /// Returns whether the SELECT projection aliases `attr`.
    fn is_aliased(&self, attr: &AttributeMapping) -> bool {
        self.dialect.needs_column_alias() || self.projects_geometry(attr)
    }

    /// Builds a SELECT of every mapped attribute.
    ///
    /// Geometry columns are projected as a single `SRID:WKT` text token
    /// aliased back to the column name; other columns are qualified with
    /// the table name (or its alias) unless they already are, and aliased
    /// when the dialect requires column aliases.
    ///
    /// # Errors
    ///
    /// Returns [`DaoError::EmptyMapping`] if the mapping declares no
    /// attributes. Fails if the criteria name an unmapped attribute or an
    /// expression the dialect cannot translate.
    pub fn build_select(&self, mapping: &ClassMapping, criteria: &Criteria) -> Result<Query> {
        if mapping.attributes().is_empty() {
            return Err(DaoError::EmptyMapping {
                table: mapping.table().to_string(),
            });
        }
        self.build(|q| {
            q.push_sql("SELECT ");
            for (i, attr) in mapping.attributes().iter().enumerate() {
                if i > 0 {
                    q.push_sql(", ");
                }
                self.project(q, mapping, attr);
            }
            q.push_sql(" FROM ");
            self.push_table(q, mapping);
            self.expressions_to_query(q, criteria, mapping)?;
            self.orders_to_query(q, criteria, mapping)
        })
    }

    fn project(&self, q: &mut Query, mapping: &ClassMapping, attr: &AttributeMapping) {
        match (attr.kind, self.dialect.spatial()) {
            (ColumnKind::Geometry, Some(f)) => self.project_geometry(q, f, &attr.column),
            _ => q.push_sql(&self.qualified(mapping, &attr.column)),
        }
        if self.is_aliased(attr) {
            q.push_sql(&self.dialect.column_alias(bare_column(&attr.column)));
        }
    }

    /// `srid(col) || ':' || as_text(col)`
    fn project_geometry(&self, q: &mut Query, f: &SpatialFunctions, column: &str) {
        let mut scratch = self.buffers.acquire();
        scratch.push_str(f.srid);
        scratch.push('(');
        scratch.push_str(column);
        scratch.push_str(") ");
        scratch.push_str(f.concat);
        scratch.push_str(" ':' ");
        scratch.push_str(f.concat);
        scratch.push(' ');
        scratch.push_str(f.as_text);
        scratch.push('(');
        scratch.push_str(column);
        scratch.push(')');
        q.push_sql(&scratch);
    }

    /// Builds `SELECT COUNT(*)` over the rows matching `criteria`.
    ///
    /// # Errors
    ///
    /// Same as [`QueryBuilder::build_select`].
    pub fn build_count(&self, mapping: &ClassMapping, criteria: &Criteria) -> Result<Query> {
        self.build(|q| {
            q.push_sql("SELECT COUNT(*) FROM ");
            self.push_table(q, mapping);
            self.expressions_to_query(q, criteria, mapping)
        })
    }

    /// Builds a DELETE of the rows matching `criteria`.
    ///
    /// # Errors
    ///
    /// Same as [`QueryBuilder::build_select`].
    pub fn build_delete(&self, mapping: &ClassMapping, criteria: &Criteria) -> Result<Query> {
        self.build(|q| {
            q.push_sql("DELETE FROM ");
            self.push_table(q, mapping);
            self.expressions_to_query(q, criteria, mapping)
        })
    }

    /// Builds an INSERT of `values` into the mapped table.
    ///
    /// # Errors
    ///
    /// Does not currently fail.
    pub fn build_insert(
        &self,
        mapping: &ClassMapping,
        mut values: PropertyValues,
    ) -> Result<Query> {
        let placeholders = self.value_placeholders(&values);
        self.preprocess_values(&mut values);
        self.build(|q| {
            q.push_sql("INSERT INTO ");
            q.push_sql(mapping.table());
            q.push_sql(" (");
            let columns: Vec<&str> = placeholders.iter().map(|(c, _)| c.as_str()).collect();
            q.push_sql(&columns.join(", "));
            q.push_sql(") VALUES (");
            let exprs: Vec<&str> = placeholders.iter().map(|(_, p)| p.as_str()).collect();
            q.push_sql(&exprs.join(", "));
            q.push_char(')');
            for (_, value) in values.entries {
                q.bind(value);
            }
            Ok(())
        })
    }

    /// Builds an UPDATE setting `values` on the rows matching `criteria`.
    ///
    /// # Errors
    ///
    /// Same as [`QueryBuilder::build_select`].
    pub fn build_update(
        &self,
        mapping: &ClassMapping,
        mut values: PropertyValues,
        criteria: &Criteria,
    ) -> Result<Query> {
        let placeholders = self.value_placeholders(&values);
        self.preprocess_values(&mut values);
        self.build(|q| {
            q.push_sql("UPDATE ");
            self.push_table(q, mapping);
            q.push_sql(" SET ");
            for (i, ((column, placeholder), (_, value))) in
                placeholders.iter().zip(values.entries).enumerate()
            {
                if i > 0 {
                    q.push_sql(", ");
                }
                q.push_sql(column);
                q.push_sql(" = ");
                q.push_sql(placeholder);
                q.bind(value);
            }
            self.expressions_to_query(q, criteria, mapping)
        })
    }

    /// Returns the value expression for each column: a bare `?`, or for
    /// geometry values `from_text(?, srid)` so the backend receives WKT.
    #[must_use]
    pub fn value_placeholders(&self, values: &PropertyValues) -> Vec<(String, String)> {
        values
            .iter()
            .map(|(column, value)| {
                let placeholder = match (value, self.dialect.spatial()) {
                    (SqlValue::Geometry(g), Some(f)) => geometry_param(f, g.srid),
                    _ => String::from("?"),
                };
                (column.to_string(), placeholder)
            })
            .collect()
    }

    /// Converts geometry values to the dialect's WKT and enum values to
    /// their integer codes. Insert and update both go through here.
    pub fn preprocess_values(&self, values: &mut PropertyValues) {
        let codec = self.dialect.geometry_codec();
        for (_, value) in &mut values.entries {
            *value = match std::mem::replace(value, SqlValue::Null) {
                SqlValue::Geometry(g) => SqlValue::Text(codec.encode(&g)),
                other => other.normalized(),
            };
        }
    }

    /// Converts a raw result value into the mapped logical type. Geometry
    /// columns arrive as `SRID:WKT` tokens.
    ///
    /// # Errors
    ///
    /// Returns [`DaoError::GeometryDecode`] for malformed geometry tokens.
    pub fn coerce_result(&self, kind: ColumnKind, raw: SqlValue) -> Result<SqlValue> {
        match (kind, raw) {
            (ColumnKind::Geometry, SqlValue::Text(token)) => Ok(self
                .dialect
                .geometry_codec()
                .decode(&token)?
                .map_or(SqlValue::Null, SqlValue::Geometry)),
            (_, raw) => Ok(raw),
        }
    }

    fn expressions_to_query(
        &self,
        q: &mut Query,
        criteria: &Criteria,
        mapping: &ClassMapping,
    ) -> Result<()> {
        if criteria.expressions().is_empty() {
            return Ok(());
        }
        q.push_sql(" WHERE ");
        self.criteria_body(q, criteria, mapping)
    }

    fn criteria_body(
        &self,
        q: &mut Query,
        criteria: &Criteria,
        mapping: &ClassMapping,
    ) -> Result<()> {
        let joiner = format!(" {} ", criteria.boolean().as_sql());
        for (i, expr) in criteria.expressions().iter().enumerate() {
            if i > 0 {
                q.push_sql(&joiner);
            }
            q.push_char('(');
            self.expression_to_query(q, expr, mapping)?;
            q.push_char(')');
        }
        Ok(())
    }

    fn expression_to_query(
        &self,
        q: &mut Query,
        expr: &Expression,
        mapping: &ClassMapping,
    ) -> Result<()> {
        let column = |attribute: &String| -> Result<String> {
            mapping
                .column_for(attribute)
                .map(|c| self.qualified(mapping, c))
        };
        match expr {
            Expression::Compare {
                attribute,
                op,
                value,
                negated,
            } => {
                let op = if *negated { op.negate() } else { *op };
                q.push_sql(&column(attribute)?);
                match (value, op) {
                    (SqlValue::Null, CompareOp::Eq) => q.push_sql(" IS NULL"),
                    (SqlValue::Null, CompareOp::Ne) => q.push_sql(" IS NOT NULL"),
                    _ => {
                        q.push_sql(&format!(" {op} "));
                        q.push_param(value.clone());
                    }
                }
            }
            Expression::Between {
                attribute,
                low,
                high,
                negated,
            } => {
                q.push_sql(&column(attribute)?);
                q.push_sql(if *negated { " NOT BETWEEN " } else { " BETWEEN " });
                q.push_param(low.clone());
                q.push_sql(" AND ");
                q.push_param(high.clone());
            }
            Expression::In {
                attribute,
                values,
                negated,
            } => {
                let col = column(attribute)?;
                if values.is_empty() {
                    // Nothing is in an empty list.
                    q.push_sql(if *negated { "1 = 1" } else { "1 = 0" });
                } else {
                    q.push_sql(&col);
                    q.push_sql(if *negated { " NOT IN (" } else { " IN (" });
                    for (i, v) in values.iter().enumerate() {
                        if i > 0 {
                            q.push_sql(", ");
                        }
                        q.push_param(v.clone());
                    }
                    q.push_char(')');
                }
            }
            Expression::Like {
                attribute,
                pattern,
                negated,
            } => {
                q.push_sql(&column(attribute)?);
                q.push_sql(if *negated { " NOT LIKE " } else { " LIKE " });
                q.push_param(SqlValue::Text(pattern.clone()));
            }
            Expression::IsNull { attribute, negated } => {
                q.push_sql(&column(attribute)?);
                q.push_sql(if *negated { " IS NOT NULL" } else { " IS NULL" });
            }
            Expression::Modulus {
                attribute,
                divisor,
                remainder,
                negated,
            } => {
                let (before, after) = self.dialect.modulus_clause(&column(attribute)?);
                q.push_sql(&before);
                q.push_param(SqlValue::Int(*divisor));
                q.push_sql(after);
                q.push_sql(if *negated { " <> " } else { " = " });
                q.push_param(SqlValue::Int(*remainder));
            }
            Expression::Group { criteria, negated } => {
                if criteria.expressions().is_empty() {
                    q.push_sql(if *negated { "1 = 0" } else { "1 = 1" });
                } else {
                    if *negated {
                        q.push_sql("NOT (");
                    }
                    self.criteria_body(q, criteria, mapping)?;
                    if *negated {
                        q.push_char(')');
                    }
                }
            }
            Expression::Intersects {
                attribute,
                shape,
                negated,
            } => {
                let f = self.spatial(expr)?;
                self.relationship(q, f.intersects, f, &column(attribute)?, shape, *negated);
            }
            Expression::Within {
                attribute,
                shape,
                negated,
            } => {
                let f = self.spatial(expr)?;
                self.relationship(q, f.within, f, &column(attribute)?, shape, *negated);
            }
            Expression::Contains {
                attribute,
                shape,
                negated,
            } => {
                let f = self.spatial(expr)?;
                self.relationship(q, f.contains, f, &column(attribute)?, shape, *negated);
            }
            Expression::Distance {
                attribute,
                shape,
                kind,
                distance,
                negated,
            } => {
                let f = self.spatial(expr)?;
                q.push_sql(f.distance);
                q.push_char('(');
                q.push_sql(&geometry_param(f, shape.srid));
                q.bind(self.shape_param(shape));
                q.push_sql(", ");
                q.push_sql(&column(attribute)?);
                q.push_char(')');
                // Negation flips the comparison instead of wrapping in NOT.
                let op = match (kind, negated) {
                    (DistanceKind::Lesser, false) => " < ",
                    (DistanceKind::Lesser, true) => " >= ",
                    (DistanceKind::Greater, false) => " > ",
                    (DistanceKind::Greater, true) => " <= ",
                };
                q.push_sql(op);
                q.push_param(SqlValue::Float(*distance));
            }
            Expression::DistanceSphere { .. } => return Err(unsupported(expr)),
        }
        Ok(())
    }

    /// `function(column, from_text(?, srid)) = 1`
    ///
    /// The literal geometry must be the second argument or the backend
    /// skips the spatial index.
    fn relationship(
        &self,
        q: &mut Query,
        function: &str,
        f: &SpatialFunctions,
        column: &str,
        shape: &Geometry,
        negated: bool,
    ) {
        q.push_sql(function);
        q.push_char('(');
        q.push_sql(column);
        q.push_sql(", ");
        q.push_sql(&geometry_param(f, shape.srid));
        q.bind(self.shape_param(shape));
        q.push_sql(if negated { ") = 0" } else { ") = 1" });
    }

    fn shape_param(&self, shape: &Geometry) -> SqlValue {
        SqlValue::Text(self.dialect.geometry_codec().encode(shape))
    }

    /// Orders by the projected alias where the dialect allows it, by the
    /// qualified column otherwise.
    fn orders_to_query(
        &self,
        q: &mut Query,
        criteria: &Criteria,
        mapping: &ClassMapping,
    ) -> Result<()> {
        if criteria.orders().is_empty() {
            return Ok(());
        }
        q.push_sql(" ORDER BY ");
        for (i, order) in criteria.orders().iter().enumerate() {
            if i > 0 {
                q.push_sql(", ");
            }
            let attr = mapping.lookup(&order.attribute)?;
            if self.dialect.can_use_alias_in_order_clause() && self.is_aliased(attr) {
                q.push_sql(&self.dialect.alias_reference(bare_column(&attr.column)));
            } else {
                q.push_sql(&self.qualified(mapping, &attr.column));
            }
            q.push_sql(match order.direction {
                OrderDirection::Asc => " ASC",
                OrderDirection::Desc => " DESC",
            });
        }
        Ok(())
    }
}

/// The column name without any `table.` qualifier.
fn bare_column(column: &str) -> &str {
    column.rsplit('.').next().unwrap_or(column)
}

fn unsupported(expr: &Expression) -> DaoError {
    DaoError::UnsupportedExpression {
        expression: expr.type_name(),
        attribute: expr.attribute().unwrap_or_default().to_string(),
    }
}

/// `from_text(?, srid)`
fn geometry_param(f: &SpatialFunctions, srid: i32) -> String {
    format!("{}(?, {srid})", f.from_text)
}
