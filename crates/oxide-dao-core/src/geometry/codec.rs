//! Geometry codecs: the text contract between projection and decoding.

use super::{Geometry, WktReader, WktWriter};
use crate::error::{DaoError, Result};

/// Converts geometries to and from the text that crosses the SQL boundary.
///
/// Parameters are sent as plain WKT with the SRID passed separately to the
/// backend's geometry constructor. Results come back as a single
/// `SRID:WKT` token built by the SELECT projection.
pub trait GeometryCodec: Send + Sync {
    /// Encodes a geometry as WKT accepted by the backend.
    fn encode(&self, geometry: &Geometry) -> String;

    /// Decodes an `SRID:WKT` token. `EMPTY` decodes to `None`.
    ///
    /// # Errors
    ///
    /// Returns [`DaoError::GeometryDecode`] if the token is malformed.
    fn decode(&self, token: &str) -> Result<Option<Geometry>>;

    /// Encodes a geometry in the same `SRID:WKT` form a projection returns.
    fn encode_token(&self, geometry: &Geometry) -> String {
        format!("{}:{}", geometry.srid, self.encode(geometry))
    }
}

/// Splits an `SRID:WKT` token on its first colon.
///
/// # Errors
///
/// Returns [`DaoError::GeometryDecode`] if there is no colon or the SRID is
/// not an integer.
pub fn split_srid_token(token: &str) -> Result<(i32, &str)> {
    let (srid, wkt) = token
        .split_once(':')
        .ok_or_else(|| DaoError::geometry(token, "missing ':' between SRID and WKT"))?;
    let srid = srid
        .trim()
        .parse::<i32>()
        .map_err(|e| DaoError::geometry(token, format!("invalid SRID: {e}")))?;
    Ok((srid, wkt.trim()))
}

/// Reads `wkt` and stamps it with `srid`. Errors name the whole `token`.
///
/// # Errors
///
/// Returns [`DaoError::GeometryDecode`] if `wkt` does not parse.
pub fn read_with_srid(token: &str, srid: i32, wkt: &str) -> Result<Geometry> {
    WktReader::new(wkt)
        .read()
        .map(|g| g.with_srid(srid))
        .map_err(|e| DaoError::geometry(token, e.to_string()))
}

/// Plain OGC text in both directions, no backend quirks.
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardCodec;

impl GeometryCodec for StandardCodec {
    fn encode(&self, geometry: &Geometry) -> String {
        WktWriter::new().write(geometry)
    }

    fn decode(&self, token: &str) -> Result<Option<Geometry>> {
        let (srid, wkt) = split_srid_token(token)?;
        if wkt.eq_ignore_ascii_case("EMPTY") {
            return Ok(None);
        }
        read_with_srid(token, srid, wkt).map(Some)
    }
}
