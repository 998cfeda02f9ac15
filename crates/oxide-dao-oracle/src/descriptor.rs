//! The Oracle dialect, with or without SDE `ST_Geometry` support.

use std::borrow::Cow;

use oxide_dao_core::dialect::{Dialect, SpatialFunctions, TypeKind};
use oxide_dao_core::geometry::{GeometryCodec, StandardCodec};
use oxide_dao_core::sequence::{split_owner_table, validate_sequence_name};
use oxide_dao_core::{DaoError, Query, Result, SqlValue};
use tracing::info;

use crate::codec::SdeStCodec;
use crate::config::OracleConfig;

/// Longest string ODP.NET binds inline; longer ones must be CLOBs.
pub const MAX_INLINE_STRING_CHARS: usize = 3999;

const SDE_ST: SpatialFunctions = SpatialFunctions {
    intersects: "SDE.ST_Intersects",
    within: "SDE.ST_Within",
    contains: "SDE.ST_Contains",
    distance: "SDE.ST_Distance",
    from_text: "SDE.ST_Geometry",
    srid: "SDE.ST_SRID",
    as_text: "SDE.ST_AsText",
    concat: "||",
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flavour {
    Plain,
    SdeSt,
}

/// Oracle capability descriptor.
///
/// Built once per logical connection and shared by every query over it.
///
/// ```rust
/// use oxide_dao_core::Dialect;
/// use oxide_dao_oracle::{OracleConfig, OracleDescriptor};
///
/// let oracle = OracleDescriptor::with_sde_st(OracleConfig::new("gisdb", "gis", "pw"));
/// assert_eq!(oracle.named_parameter("param0").as_deref(), Some(":param0"));
/// assert!(oracle.spatial().is_some());
/// ```
#[derive(Debug, Clone)]
pub struct OracleDescriptor {
    config: OracleConfig,
    clean_connection_string: String,
    flavour: Flavour,
}

impl OracleDescriptor {
    fn build(config: OracleConfig, flavour: Flavour) -> Self {
        let clean_connection_string = config.clean_connection_string();
        let descriptor = Self {
            config,
            clean_connection_string,
            flavour,
        };
        info!(
            dialect = descriptor.name(),
            connection = %descriptor.clean_connection_string,
            "created Oracle descriptor"
        );
        descriptor
    }

    /// Plain Oracle: sequences via `NEXTVAL`, no spatial functions.
    #[must_use]
    pub fn new(config: OracleConfig) -> Self {
        Self::build(config, Flavour::Plain)
    }

    /// Oracle with ArcSDE `ST_Geometry` columns.
    ///
    /// Sequence names are `OWNER.TABLE` and resolve through the SDE table
    /// registry.
    #[must_use]
    pub fn with_sde_st(config: OracleConfig) -> Self {
        Self::build(config, Flavour::SdeSt)
    }

    /// Returns the connection configuration.
    #[must_use]
    pub const fn config(&self) -> &OracleConfig {
        &self.config
    }

    /// The full client connection string, password included.
    #[must_use]
    pub fn connection_string(&self) -> String {
        self.config.connection_string()
    }
}

impl Dialect for OracleDescriptor {
    fn name(&self) -> &'static str {
        match self.flavour {
            Flavour::Plain => "oracle",
            Flavour::SdeSt => "oracle-sde-st",
        }
    }

    fn needs_column_alias(&self) -> bool {
        true
    }

    fn needs_as_for_column_alias(&self) -> bool {
        false
    }

    fn column_alias_prefix(&self) -> &'static str {
        "\""
    }

    fn column_alias_suffix(&self) -> &'static str {
        "\""
    }

    fn can_use_alias_in_order_clause(&self) -> bool {
        true
    }

    fn type_name_for(&self, kind: TypeKind) -> Result<Cow<'static, str>> {
        let unsupported = |hint| DaoError::UnsupportedCapability {
            dialect: self.name(),
            capability: kind.to_string(),
            hint,
        };
        match kind {
            TypeKind::AutoNumber => Err(unsupported("Oracle has no autonumbers, use a sequence")),
            TypeKind::ByteArray => Ok(Cow::Borrowed("BLOB")),
            TypeKind::LongInteger => Ok(Cow::Borrowed("NUMBER(19)")),
            TypeKind::UnicodeString | TypeKind::AsciiString => Ok(Cow::Borrowed("VARCHAR2(2000)")),
            TypeKind::Geometry => match self.flavour {
                Flavour::SdeSt => Ok(Cow::Borrowed("SDE.ST_GEOMETRY")),
                Flavour::Plain => Err(unsupported("use OracleDescriptor::with_sde_st")),
            },
        }
    }

    fn uses_own_connection_pooling(&self) -> bool {
        true
    }

    fn named_parameter(&self, name: &str) -> Option<String> {
        Some(format!(":{name}"))
    }

    fn max_inline_string_chars(&self) -> Option<usize> {
        Some(MAX_INLINE_STRING_CHARS)
    }

    fn modulus_clause(&self, column: &str) -> (String, &'static str) {
        (format!("MOD({column}, "), ")")
    }

    fn sequence_value_query(&self, sequence: &str) -> Result<Query> {
        let mut q = Query::new();
        match self.flavour {
            Flavour::Plain => {
                q.push_sql("SELECT ");
                q.push_sql(validate_sequence_name(sequence)?);
                q.push_sql(".NEXTVAL FROM DUAL");
            }
            Flavour::SdeSt => {
                let (owner, table) = split_owner_table(sequence)?;
                q.push_sql("SELECT sde.version_user_ddl.next_row_id(");
                q.push_param(SqlValue::Text(owner.to_string()));
                q.push_sql(", (SELECT registration_id FROM sde.table_registry WHERE table_name = ");
                q.push_param(SqlValue::Text(table.to_string()));
                q.push_sql(" AND owner = ");
                q.push_param(SqlValue::Text(owner.to_string()));
                q.push_sql(")) FROM DUAL");
            }
        }
        Ok(q)
    }

    fn table_exists_query(&self, table: &str) -> Query {
        let mut q = Query::new();
        q.push_sql("SELECT COUNT(*) FROM user_tables WHERE table_name = ");
        q.push_param(SqlValue::Text(table.to_uppercase()));
        q
    }

    fn sequence_exists_query(&self, sequence: &str) -> Query {
        let mut q = Query::new();
        q.push_sql("SELECT COUNT(*) FROM user_sequences WHERE sequence_name = ");
        q.push_param(SqlValue::Text(sequence.to_uppercase()));
        q
    }

    fn spatial(&self) -> Option<&SpatialFunctions> {
        match self.flavour {
            Flavour::SdeSt => Some(&SDE_ST),
            Flavour::Plain => None,
        }
    }

    fn geometry_codec(&self) -> &dyn GeometryCodec {
        match self.flavour {
            Flavour::SdeSt => &SdeStCodec,
            Flavour::Plain => &StandardCodec,
        }
    }

    fn sanitized_connection_string(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.clean_connection_string)
    }
}
