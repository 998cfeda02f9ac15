#![allow(dead_code)]

use std::sync::Mutex;

use oxide_dao_core::geometry::Geometry;
use oxide_dao_core::{BoundCommand, ClassMapping, Executor, Result};
use oxide_dao_oracle::{OracleConfig, OracleDescriptor};

pub fn config() -> OracleConfig {
    OracleConfig::new("gisdb", "gis", "secret")
}

pub fn oracle() -> OracleDescriptor {
    OracleDescriptor::new(config())
}

pub fn sde() -> OracleDescriptor {
    OracleDescriptor::with_sde_st(config())
}

pub fn parcels() -> ClassMapping {
    ClassMapping::new("PARCELS")
        .attribute("id", "PARCEL_ID")
        .enum_attribute("status", "STATUS")
        .geometry("shape", "GEOM")
}

pub fn square(srid: i32) -> Geometry {
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
