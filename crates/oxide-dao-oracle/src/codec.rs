//! Geometry text as SDE `ST_Geometry` reads and writes it.
//!
//! `SDE.ST_GeomFromText` only accepts ungrouped multipoints, and
//! `SDE.ST_AsText` drops the type keyword from line strings, polygons and
//! multipolygons. Both quirks stay inside this codec.

use oxide_dao_core::geometry::{
    GeometryCodec, GeometryKind, WktWriter, read_with_srid, split_srid_token,
};
use oxide_dao_core::{Geometry, Result};

/// Codec for SDE `ST_Geometry` columns.
#[derive(Debug, Default, Clone, Copy)]
pub struct SdeStCodec;

impl SdeStCodec {
    /// Creates the codec.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

/// Infers the type keyword `ST_AsText` left off, from how deeply the text
/// opens.
fn implied_kind(wkt: &str) -> Option<GeometryKind> {
    let depth = wkt
        .chars()
        .filter(|c| !c.is_whitespace())
        .take_while(|&c| c == '(')
        .count();
    match depth {
        0 => None,
        1 => Some(GeometryKind::LineString),
        2 => Some(GeometryKind::Polygon),
        _ => Some(GeometryKind::MultiPolygon),
    }
}

impl GeometryCodec for SdeStCodec {
    fn encode(&self, geometry: &Geometry) -> String {
        WktWriter::new().ungrouped_multipoints().write(geometry)
    }

    fn decode(&self, token: &str) -> Result<Option<Geometry>> {
        let (srid, wkt) = split_srid_token(token)?;
        if wkt.eq_ignore_ascii_case("EMPTY") {
            return Ok(None);
        }
        let geometry = match implied_kind(wkt) {
            Some(kind) => read_with_srid(token, srid, &format!("{kind} {wkt}"))?,
            None => read_with_srid(token, srid, wkt)?,
        };
        Ok(Some(geometry))
    }
}
