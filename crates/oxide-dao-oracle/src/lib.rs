//! # oxide-dao-oracle
//!
//! Oracle dialect for `oxide-dao-core`, with optional ArcSDE
//! `ST_Geometry` support.
//!
//! ```rust
//! use oxide_dao_core::{ClassMapping, Criteria, Expression, ParameterBinder, QueryBuilder};
//! use oxide_dao_core::geometry::Geometry;
//! use oxide_dao_oracle::{OracleConfig, OracleDescriptor};
//!
//! let oracle = OracleDescriptor::with_sde_st(OracleConfig::new("gisdb", "gis", "pw"));
//! let mapping = ClassMapping::new("PARCELS")
//!     .attribute("id", "PARCEL_ID")
//!     .geometry("shape", "SHAPE");
//!
//! let near = Geometry::point(1.0, 2.0).with_srid(4326);
//! let query = QueryBuilder::new(&oracle)
//!     .build_count(&mapping, &Criteria::new().filter(Expression::intersects("shape", near)))
//!     .unwrap();
//! let bound = ParameterBinder::new(&oracle).bind_query(query).unwrap();
//!
//! assert_eq!(
//!     bound.sql,
//!     "SELECT COUNT(*) FROM PARCELS \
//!      WHERE (SDE.ST_Intersects(PARCELS.SHAPE, SDE.ST_Geometry(:param0, 4326)) = 1)"
//! );
//! ```

pub mod codec;
pub mod config;
pub mod descriptor;

pub use codec::SdeStCodec;
pub use config::{ConfigError, OracleConfig};
pub use descriptor::OracleDescriptor;
