//! Class-to-table mappings.
//!
//! A mapping is owned by the host framework and read-only here. It says
//! which column each object attribute lives in and what logical type the
//! column holds.

use crate::error::{DaoError, Result};

/// Logical type of a mapped column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Ordinary scalar column.
    Scalar,
    /// Enum stored as its integer code.
    Enum,
    /// Spatial column.
    Geometry,
}

/// One attribute-to-column entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeMapping {
    /// Object attribute name.
    pub name: String,
    /// Column name, possibly already qualified (`table.column`).
    pub column: String,
    /// Logical type.
    pub kind: ColumnKind,
}

/// Maps an object type onto a table.
///
/// Attribute order is preserved and is the projection order of SELECTs.
///
/// ```rust
/// use oxide_dao_core::mapping::{ClassMapping, ColumnKind};
///
/// let mapping = ClassMapping::new("PARCELS")
///     .attribute("id", "PARCEL_ID")
///     .geometry("shape", "GEOM");
///
/// assert_eq!(mapping.column_for("shape").unwrap(), "GEOM");
/// assert_eq!(mapping.kind_of("shape").unwrap(), ColumnKind::Geometry);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassMapping {
    table: String,
    alias: Option<String>,
    attributes: Vec<AttributeMapping>,
}

impl ClassMapping {
    /// Creates an empty mapping for `table`.
    #[must_use]
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            alias: None,
            attributes: Vec::new(),
        }
    }

    /// Adds an attribute with an explicit kind.
    #[must_use]
    pub fn map(
        mut self,
        name: impl Into<String>,
        column: impl Into<String>,
        kind: ColumnKind,
    ) -> Self {
        self.attributes.push(AttributeMapping {
            name: name.into(),
            column: column.into(),
            kind,
        });
        self
    }

    /// Adds a scalar attribute.
    #[must_use]
    pub fn attribute(self, name: impl Into<String>, column: impl Into<String>) -> Self {
        self.map(name, column, ColumnKind::Scalar)
    }

    /// Adds an enum attribute.
    #[must_use]
    pub fn enum_attribute(self, name: impl Into<String>, column: impl Into<String>) -> Self {
        self.map(name, column, ColumnKind::Enum)
    }

    /// Adds a geometry attribute.
    #[must_use]
    pub fn geometry(self, name: impl Into<String>, column: impl Into<String>) -> Self {
        self.map(name, column, ColumnKind::Geometry)
    }

    /// Names the table `alias` in generated statements. Unqualified
    /// columns are then qualified with the alias.
    #[must_use]
    pub fn aliased(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Returns the table alias, if any.
    #[must_use]
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// Returns the table name.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Returns the attributes in declaration order.
    #[must_use]
    pub fn attributes(&self) -> &[AttributeMapping] {
        &self.attributes
    }

    /// Returns the entry for an attribute.
    ///
    /// # Errors
    ///
    /// Returns [`DaoError::UnknownAttribute`] if the attribute is not mapped.
    pub fn lookup(&self, attribute: &str) -> Result<&AttributeMapping> {
        self.attributes
            .iter()
            .find(|a| a.name == attribute)
            .ok_or_else(|| DaoError::UnknownAttribute {
                attribute: attribute.to_string(),
                table: self.table.clone(),
            })
    }

    /// Returns the column an attribute maps to.
    ///
    /// # Errors
    ///
    /// Returns [`DaoError::UnknownAttribute`] if the attribute is not mapped.
    pub fn column_for(&self, attribute: &str) -> Result<&str> {
        self.lookup(attribute).map(|a| a.column.as_str())
    }

    /// Returns the logical type of an attribute.
    ///
    /// # Errors
    ///
    /// Returns [`DaoError::UnknownAttribute`] if the attribute is not mapped.
    pub fn kind_of(&self, attribute: &str) -> Result<ColumnKind> {
        self.lookup(attribute).map(|a| a.kind)
    }
}
