//! Geometry values and their well-known text encoding.
//!
//! Geometries cross the SQL boundary as text. This module holds the
//! structured value, a WKT writer and reader, and the [`GeometryCodec`]
//! contract a dialect implements to absorb its backend's text quirks.
//!
//! ```rust
//! use oxide_dao_core::geometry::Geometry;
//!
//! let g = Geometry::multi_point([(0.0, 1.0), (2.0, 3.0)]).with_srid(4326);
//! assert_eq!(g.to_string(), "MULTIPOINT ((0 1), (2 3))");
//! ```

mod codec;
mod wkt;

pub use codec::{GeometryCodec, StandardCodec, read_with_srid, split_srid_token};
pub use wkt::{WktError, WktReader, WktWriter};

use std::fmt;

/// A single 2D coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coord {
    /// X ordinate (easting or longitude).
    pub x: f64,
    /// Y ordinate (northing or latitude).
    pub y: f64,
}

impl Coord {
    /// Creates a coordinate.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Coord {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// A closed ring or an open line: an ordered coordinate sequence.
pub type CoordSeq = Vec<Coord>;

/// Polygon rings, exterior first.
pub type Rings = Vec<CoordSeq>;

/// The shape part of a geometry.
///
/// Every variant may be empty (`POINT EMPTY`, `POLYGON EMPTY`, ...).
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// A point, or `None` for `POINT EMPTY`.
    Point(Option<Coord>),
    /// A line string.
    LineString(CoordSeq),
    /// A polygon given as rings, exterior first.
    Polygon(Rings),
    /// A set of points.
    MultiPoint(CoordSeq),
    /// A set of line strings.
    MultiLineString(Vec<CoordSeq>),
    /// A set of polygons.
    MultiPolygon(Vec<Rings>),
}

/// Geometry type tags, used for WKT keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryKind {
    /// `POINT`
    Point,
    /// `LINESTRING`
    LineString,
    /// `POLYGON`
    Polygon,
    /// `MULTIPOINT`
    MultiPoint,
    /// `MULTILINESTRING`
    MultiLineString,
    /// `MULTIPOLYGON`
    MultiPolygon,
}

impl GeometryKind {
    /// Returns the upper-case WKT keyword.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Point => "POINT",
            Self::LineString => "LINESTRING",
            Self::Polygon => "POLYGON",
            Self::MultiPoint => "MULTIPOINT",
            Self::MultiLineString => "MULTILINESTRING",
            Self::MultiPolygon => "MULTIPOLYGON",
        }
    }

    /// Looks up a kind by WKT keyword, ignoring case.
    #[must_use]
    pub fn from_keyword(word: &str) -> Option<Self> {
        [
            Self::Point,
            Self::LineString,
            Self::Polygon,
            Self::MultiPoint,
            Self::MultiLineString,
            Self::MultiPolygon,
        ]
        .into_iter()
        .find(|kind| kind.keyword().eq_ignore_ascii_case(word))
    }
}

impl fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A geometry: a shape plus the spatial reference it is expressed in.
///
/// Equality is structural and includes the SRID.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    /// Spatial reference system identifier. Zero when unknown.
    pub srid: i32,
    /// The shape.
    pub shape: Shape,
}

fn collect<I, C>(coords: I) -> CoordSeq
where
    I: IntoIterator<Item = C>,
    C: Into<Coord>,
{
    coords.into_iter().map(Into::into).collect()
}

impl Geometry {
    /// Creates a geometry with SRID 0.
    #[must_use]
    pub const fn new(shape: Shape) -> Self {
        Self { srid: 0, shape }
    }

    /// Creates a point.
    #[must_use]
    pub const fn point(x: f64, y: f64) -> Self {
        Self::new(Shape::Point(Some(Coord::new(x, y))))
    }

    /// Creates a line string.
    #[must_use]
    pub fn line_string<I, C>(coords: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Coord>,
    {
        Self::new(Shape::LineString(collect(coords)))
    }

    /// Creates a polygon from its rings, exterior first.
    #[must_use]
    pub fn polygon<R, I, C>(rings: R) -> Self
    where
        R: IntoIterator<Item = I>,
        I: IntoIterator<Item = C>,
        C: Into<Coord>,
    {
        Self::new(Shape::Polygon(rings.into_iter().map(collect).collect()))
    }

    /// Creates a multipoint.
    #[must_use]
    pub fn multi_point<I, C>(coords: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Coord>,
    {
        Self::new(Shape::MultiPoint(collect(coords)))
    }

    /// Creates a multi line string.
    #[must_use]
    pub fn multi_line_string<L, I, C>(lines: L) -> Self
    where
        L: IntoIterator<Item = I>,
        I: IntoIterator<Item = C>,
        C: Into<Coord>,
    {
        Self::new(Shape::MultiLineString(
            lines.into_iter().map(collect).collect(),
        ))
    }

    /// Creates a multipolygon from polygons given as ring lists.
    #[must_use]
    pub fn multi_polygon(polygons: Vec<Rings>) -> Self {
        Self::new(Shape::MultiPolygon(polygons))
    }

    /// Returns the same geometry tagged with `srid`.
    #[must_use]
    pub const fn with_srid(mut self, srid: i32) -> Self {
        self.srid = srid;
        self
    }

    /// Returns the geometry type.
    #[must_use]
    pub const fn kind(&self) -> GeometryKind {
        match self.shape {
            Shape::Point(_) => GeometryKind::Point,
            Shape::LineString(_) => GeometryKind::LineString,
            Shape::Polygon(_) => GeometryKind::Polygon,
            Shape::MultiPoint(_) => GeometryKind::MultiPoint,
            Shape::MultiLineString(_) => GeometryKind::MultiLineString,
            Shape::MultiPolygon(_) => GeometryKind::MultiPolygon,
        }
    }

    /// Returns true if the shape has no coordinates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match &self.shape {
            Shape::Point(p) => p.is_none(),
            Shape::LineString(c) | Shape::MultiPoint(c) => c.is_empty(),
            Shape::Polygon(r) | Shape::MultiLineString(r) => r.is_empty(),
            Shape::MultiPolygon(p) => p.is_empty(),
        }
    }
}

/// Writes the standard WKT form (without SRID).
impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        WktWriter::new().fmt_geometry(self, f)
    }
}
