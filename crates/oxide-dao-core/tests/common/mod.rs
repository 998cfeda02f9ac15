#![allow(dead_code)]

use std::borrow::Cow;
use std::sync::Mutex;

use oxide_dao_core::dialect::{Dialect, SpatialFunctions, TypeKind};
use oxide_dao_core::geometry::Geometry;
use oxide_dao_core::{BoundCommand, ClassMapping, Executor, Query, Result};

/// A PostGIS-flavoured dialect with `$name` markers.
#[derive(Debug, Default)]
pub struct SpatialDialect;

const POSTGIS: SpatialFunctions = SpatialFunctions {
    intersects: "ST_Intersects",
    within: "ST_Within",
    contains: "ST_Contains",
    distance: "ST_Distance",
    from_text: "ST_GeomFromText",
    srid: "ST_SRID",
    as_text: "ST_AsText",
    concat: "||",
};

impl Dialect for SpatialDialect {
    fn name(&self) -> &'static str {
        "spatial-test"
    }

    fn type_name_for(&self, kind: TypeKind) -> Result<Cow<'static, str>> {
        Ok(Cow::Owned(format!("{kind:?}").to_uppercase()))
    }

    fn named_parameter(&self, name: &str) -> Option<String> {
        Some(format!("${name}"))
    }

    fn sequence_value_query(&self, sequence: &str) -> Result<Query> {
        let mut q = Query::new();
        q.push_sql("SELECT nextval(");
        q.push_param(oxide_dao_core::SqlValue::Text(sequence.to_string()));
        q.push_char(')');
        Ok(q)
    }

    fn spatial(&self) -> Option<&SpatialFunctions> {
        Some(&POSTGIS)
    }
}

pub fn parcels() -> ClassMapping {
    ClassMapping::new("PARCELS")
        .attribute("id", "PARCEL_ID")
        .attribute("zoning", "ZONING")
        .geometry("shape", "GEOM")
}

pub fn unit_square(srid: i32) -> Geometry {
    Geometry::polygon([vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0), (0.0, 0.0)]])
        .with_srid(srid)
}

/// Records every command and answers with a fixed integer.
#[derive(Debug, Default)]
pub struct RecordingExecutor {
    pub answer: i64,
    pub commands: Mutex<Vec<BoundCommand>>,
}

impl RecordingExecutor {
    pub fn answering(answer: i64) -> Self {
        Self {
            answer,
            ..Self::default()
        }
    }

    pub fn last(&self) -> BoundCommand {
        self.commands
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no command was executed")
    }
}

impl Executor for RecordingExecutor {
    fn query_int(&self, command: &BoundCommand) -> Result<i64> {
        self.commands.lock().unwrap().push(command.clone());
        Ok(self.answer)
    }
}
