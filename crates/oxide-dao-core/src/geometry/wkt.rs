//! Well-known text writer and reader.

use std::fmt;

use super::{Coord, CoordSeq, Geometry, GeometryKind, Rings, Shape};

/// Writes geometries as OGC well-known text.
///
/// The default output puts one space between the keyword and the body and
/// wraps each multipoint member in its own parentheses:
/// `MULTIPOINT ((0 1), (2 3))`. Some backends only accept the ungrouped
/// form, see [`WktWriter::ungrouped_multipoints`]. Empty rings and empty
/// member polygons are written as `EMPTY`.
#[derive(Debug, Clone, Copy)]
pub struct WktWriter {
    group_multipoints: bool,
}

impl Default for WktWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl WktWriter {
    /// Creates a writer producing the standard form.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            group_multipoints: true,
        }
    }

    /// Writes multipoints as `MULTIPOINT (0 1, 2 3)`.
    #[must_use]
    pub const fn ungrouped_multipoints(mut self) -> Self {
        self.group_multipoints = false;
        self
    }

    /// Returns the WKT of `geometry`. The SRID is not part of the output.
    #[must_use]
    pub fn write(&self, geometry: &Geometry) -> String {
        struct Wkt<'a>(&'a WktWriter, &'a Geometry);

        impl fmt::Display for Wkt<'_> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt_geometry(self.1, f)
            }
        }

        Wkt(self, geometry).to_string()
    }

    pub(super) fn fmt_geometry(
        &self,
        geometry: &Geometry,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(geometry.kind().keyword())?;
        if geometry.is_empty() {
            return f.write_str(" EMPTY");
        }
        f.write_str(" ")?;
        match &geometry.shape {
            Shape::Point(Some(c)) => {
                f.write_str("(")?;
                fmt_coord(*c, f)?;
                f.write_str(")")
            }
            Shape::Point(None) => Ok(()),
            Shape::LineString(coords) => fmt_seq(coords, f),
            Shape::Polygon(rings) => fmt_rings(rings, f),
            Shape::MultiPoint(points) => {
                f.write_str("(")?;
                for (i, c) in points.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    if self.group_multipoints {
                        f.write_str("(")?;
                        fmt_coord(*c, f)?;
                        f.write_str(")")?;
                    } else {
                        fmt_coord(*c, f)?;
                    }
                }
                f.write_str(")")
            }
            Shape::MultiLineString(lines) => fmt_rings(lines, f),
            Shape::MultiPolygon(polygons) => {
                f.write_str("(")?;
                for (i, rings) in polygons.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    fmt_rings(rings, f)?;
                }
                f.write_str(")")
            }
        }
    }
}

fn fmt_coord(c: Coord, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} {}", c.x, c.y)
}

fn fmt_seq(coords: &[Coord], f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if coords.is_empty() {
        return f.write_str("EMPTY");
    }
    f.write_str("(")?;
    for (i, c) in coords.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        fmt_coord(*c, f)?;
    }
    f.write_str(")")
}

fn fmt_rings(rings: &[CoordSeq], f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if rings.is_empty() {
        return f.write_str("EMPTY");
    }
    f.write_str("(")?;
    for (i, ring) in rings.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        fmt_seq(ring, f)?;
    }
    f.write_str(")")
}

/// A WKT syntax error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} at position {position}")]
pub struct WktError {
    /// What went wrong.
    pub message: String,
    /// Byte offset into the input.
    pub position: usize,
}

/// A hand-written recursive descent reader for 2D WKT.
///
/// Accepts any keyword case, an optional `SRID=n;` prefix, `EMPTY` for
/// whole geometries, rings and member polygons, and both multipoint forms.
pub struct WktReader<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> WktReader<'a> {
    /// Creates a reader over `input`.
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Parses one geometry and requires the input to be fully consumed.
    ///
    /// # Errors
    ///
    /// Returns a [`WktError`] for malformed or unsupported text.
    pub fn read(mut self) -> Result<Geometry, WktError> {
        self.skip_whitespace();
        let srid = self.srid_prefix()?;
        let geometry = self.geometry()?.with_srid(srid);
        self.skip_whitespace();
        if self.pos < self.input.len() {
            return Err(self.error("unexpected trailing input"));
        }
        Ok(geometry)
    }

    fn error(&self, message: impl Into<String>) -> WktError {
        WktError {
            message: message.into(),
            position: self.pos,
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek().filter(|c| c.is_whitespace()) {
            self.pos += c.len_utf8();
        }
    }

    fn word(&mut self) -> &'a str {
        self.skip_whitespace();
        let input = self.input;
        let start = self.pos;
        while let Some(c) = self.peek().filter(|c| c.is_ascii_alphabetic()) {
            self.pos += c.len_utf8();
        }
        &input[start..self.pos]
    }

    fn expect(&mut self, ch: char) -> Result<(), WktError> {
        self.skip_whitespace();
        if self.peek() == Some(ch) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.error(format!("expected '{ch}'")))
        }
    }

    /// Consumes `ch` if it is next. Returns whether it did.
    fn accept(&mut self, ch: char) -> bool {
        self.skip_whitespace();
        if self.peek() == Some(ch) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Consumes the `EMPTY` keyword if it is next. Returns whether it did.
    fn accept_empty(&mut self) -> bool {
        let save = self.pos;
        if self.word().eq_ignore_ascii_case("EMPTY") {
            true
        } else {
            self.pos = save;
            false
        }
    }

    fn srid_prefix(&mut self) -> Result<i32, WktError> {
        let input = self.input;
        let rest = &input[self.pos..];
        if !rest.get(..5).is_some_and(|p| p.eq_ignore_ascii_case("SRID=")) {
            return Ok(0);
        }
        self.pos += 5;
        let start = self.pos;
        let end = rest[5..]
            .find(';')
            .ok_or_else(|| self.error("expected ';' after SRID"))?;
        let text = &input[start..start + end];
        let srid = text
            .trim()
            .parse::<i32>()
            .map_err(|_| self.error(format!("invalid SRID '{text}'")))?;
        self.pos = start + end + 1;
        Ok(srid)
    }

    fn geometry(&mut self) -> Result<Geometry, WktError> {
        let keyword = self.word();
        let kind = GeometryKind::from_keyword(keyword).ok_or_else(|| {
            if keyword.is_empty() {
                self.error("expected geometry type keyword")
            } else {
                self.error(format!("unsupported geometry type '{keyword}'"))
            }
        })?;

        if self.accept_empty() {
            return Ok(Geometry::new(empty_shape(kind)));
        }

        let shape = match kind {
            GeometryKind::Point => {
                self.expect('(')?;
                let c = self.coord()?;
                self.expect(')')?;
                Shape::Point(Some(c))
            }
            GeometryKind::LineString => Shape::LineString(self.coord_seq()?),
            GeometryKind::Polygon => Shape::Polygon(self.rings()?),
            GeometryKind::MultiPoint => Shape::MultiPoint(self.multi_point_body()?),
            GeometryKind::MultiLineString => Shape::MultiLineString(self.rings()?),
            GeometryKind::MultiPolygon => {
                self.expect('(')?;
                let mut polygons = vec![self.rings()?];
                while self.accept(',') {
                    polygons.push(self.rings()?);
                }
                self.expect(')')?;
                Shape::MultiPolygon(polygons)
            }
        };
        Ok(Geometry::new(shape))
    }

    fn number(&mut self) -> Result<f64, WktError> {
        self.skip_whitespace();
        let input = self.input;
        let start = self.pos;
        while let Some(c) = self
            .peek()
            .filter(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'))
        {
            self.pos += c.len_utf8();
        }
        let text = &input[start..self.pos];
        if text.is_empty() {
            return Err(self.error("expected number"));
        }
        text.parse::<f64>()
            .map_err(|_| self.error(format!("invalid number '{text}'")))
    }

    fn coord(&mut self) -> Result<Coord, WktError> {
        let x = self.number()?;
        let y = self.number()?;
        Ok(Coord::new(x, y))
    }

    fn coord_seq(&mut self) -> Result<CoordSeq, WktError> {
        if self.accept_empty() {
            return Ok(Vec::new());
        }
        self.expect('(')?;
        let mut coords = vec![self.coord()?];
        while self.accept(',') {
            coords.push(self.coord()?);
        }
        self.expect(')')?;
        Ok(coords)
    }

    fn rings(&mut self) -> Result<Rings, WktError> {
        if self.accept_empty() {
            return Ok(Vec::new());
        }
        self.expect('(')?;
        let mut rings = vec![self.coord_seq()?];
        while self.accept(',') {
            rings.push(self.coord_seq()?);
        }
        self.expect(')')?;
        Ok(rings)
    }

    fn multi_point_member(&mut self) -> Result<Coord, WktError> {
        if self.accept('(') {
            let c = self.coord()?;
            self.expect(')')?;
            Ok(c)
        } else {
            self.coord()
        }
    }

    fn multi_point_body(&mut self) -> Result<CoordSeq, WktError> {
        self.expect('(')?;
        let mut points = vec![self.multi_point_member()?];
        while self.accept(',') {
            points.push(self.multi_point_member()?);
        }
        self.expect(')')?;
        Ok(points)
    }
}

const fn empty_shape(kind: GeometryKind) -> Shape {
    match kind {
        GeometryKind::Point => Shape::Point(None),
        GeometryKind::LineString => Shape::LineString(Vec::new()),
        GeometryKind::Polygon => Shape::Polygon(Vec::new()),
        GeometryKind::MultiPoint => Shape::MultiPoint(Vec::new()),
        GeometryKind::MultiLineString => Shape::MultiLineString(Vec::new()),
        GeometryKind::MultiPolygon => Shape::MultiPolygon(Vec::new()),
    }
}
