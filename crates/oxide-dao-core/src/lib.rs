//! # oxide-dao-core
//!
//! Dialect-pluggable SQL generation and parameter binding for data-access
//! layers.
//!
//! This crate provides:
//! - A [`Dialect`] trait describing one backend's syntax, type names,
//!   sequences and spatial functions
//! - A [`QueryBuilder`] turning class mappings and criteria into SQL with
//!   positional `?` parameters
//! - A [`ParameterBinder`] rewriting those placeholders into the backend's
//!   native markers and converting values for its client
//! - A WKT geometry model with a [`GeometryCodec`] contract for backend
//!   text quirks
//! - A [`SequenceResolver`] for identity values and metadata checks
//!
//! ## Building and binding
//!
//! ```rust
//! use oxide_dao_core::{
//!     ClassMapping, Criteria, Expression, GenericDialect, ParameterBinder, QueryBuilder,
//! };
//!
//! let mapping = ClassMapping::new("EMPLOYEES")
//!     .attribute("id", "EMP_ID")
//!     .attribute("name", "NAME");
//! let dialect = GenericDialect::new();
//!
//! let query = QueryBuilder::new(&dialect)
//!     .build_select(&mapping, &Criteria::new().filter(Expression::eq("name", "Ann")))
//!     .unwrap();
//! let bound = ParameterBinder::new(&dialect).bind_query(query).unwrap();
//!
//! assert_eq!(
//!     bound.sql,
//!     "SELECT EMPLOYEES.EMP_ID, EMPLOYEES.NAME FROM EMPLOYEES WHERE (EMPLOYEES.NAME = ?)"
//! );
//! assert_eq!(bound.parameters.len(), 1);
//! ```
//!
//! Values never reach the SQL text; user input is always a parameter.

pub mod binder;
pub mod builder;
pub mod criteria;
pub mod dialect;
pub mod error;
pub mod geometry;
pub mod mapping;
pub mod pool;
pub mod query;
pub mod sequence;
pub mod value;

pub use binder::{BindValue, BoundCommand, NativeParameter, ParameterBinder, ParameterKind};
pub use builder::{PropertyValues, QueryBuilder};
pub use criteria::{Criteria, Expression, OrderBy};
pub use dialect::{Dialect, GenericDialect, SpatialFunctions, TypeKind};
pub use error::{DaoError, Result};
pub use geometry::{Geometry, GeometryCodec, StandardCodec};
pub use mapping::{ClassMapping, ColumnKind};
pub use query::Query;
pub use sequence::{Executor, SequenceResolver};
pub use value::{SqlValue, ToSqlValue};
