//! Stroke file loading
//!
//! A stroke file is plain UTF-8 text with one `x,y` point per line. Lines
//! starting with `#` separate strokes, so a file looks like:
//!
//! ```text
//! # stroke 1
//! 10.5,20
//! 11,21.25
//! # stroke 2
//! 40,8
//! 41,9
//! ```
//!
//! Blank lines and lines with fewer than two fields are skipped. A line with
//! two fields that don't parse as finite numbers fails the whole load.

use crate::{Error, Result};
use std::path::Path;

/// A 2-D point, either in source-drawing space or canvas pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One continuous pen-down path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stroke {
    points: Vec<Point>,
}

impl Stroke {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Every `stride`-th point starting with the first one.
    ///
    /// A stride of 0 is treated as 1.
    pub fn decimated(&self, stride: usize) -> impl Iterator<Item = &Point> + '_ {
        self.points.iter().step_by(stride.max(1))
    }
}

impl From<Vec<Point>> for Stroke {
    fn from(points: Vec<Point>) -> Self {
        Self::new(points)
    }
}

/// The ordered strokes loaded from one file.
///
/// A `Drawing` always holds at least one stroke and every stroke holds at
/// least one point.
#[derive(Debug, Clone, PartialEq)]
pub struct Drawing {
    strokes: Vec<Stroke>,
}

impl Drawing {
    /// Build a drawing from already-split strokes, dropping empty ones.
    ///
    /// `source` names the origin of the strokes for error messages.
    pub fn from_strokes(strokes: Vec<Stroke>, source: &str) -> Result<Self> {
        let strokes: Vec<Stroke> = strokes.into_iter().filter(|s| !s.is_empty()).collect();
        if strokes.is_empty() {
            return Err(Error::EmptyDrawing(source.to_string()));
        }
        Ok(Self { strokes })
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    /// Number of strokes
    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    /// Total number of points across all strokes
    pub fn point_count(&self) -> usize {
        self.strokes.iter().map(Stroke::len).sum()
    }

    /// Iterate every point of every stroke in file order.
    pub fn points(&self) -> impl Iterator<Item = &Point> + '_ {
        self.strokes.iter().flat_map(|s| s.points.iter())
    }
}

/// Load and parse a stroke file.
pub fn load_strokes(path: impl AsRef<Path>) -> Result<Drawing> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| Error::from_read(path, e))?;
    parse_strokes(&text, &path.display().to_string())
}

/// Parse stroke-file text. `source` is used in the `EmptyDrawing` error.
pub fn parse_strokes(text: &str, source: &str) -> Result<Drawing> {
    let mut strokes = Vec::new();
    let mut current = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        if line.starts_with('#') {
            if !current.is_empty() {
                strokes.push(Stroke::new(std::mem::take(&mut current)));
            }
            continue;
        }

        if let Some(point) = parse_point(line, idx + 1)? {
            current.push(point);
        }
    }

    if !current.is_empty() {
        strokes.push(Stroke::new(current));
    }

    Drawing::from_strokes(strokes, source)
}

/// Parse one trimmed data line. `Ok(None)` means the line has fewer than two
/// fields and is skipped.
fn parse_point(line: &str, line_no: usize) -> Result<Option<Point>> {
    let mut fields: Vec<&str> = line.split(',').collect();
    // Trailing empty fields don't count ("1," has one field).
    while fields.last() == Some(&"") {
        fields.pop();
    }
    if fields.len() < 2 {
        return Ok(None);
    }

    let coord = |field: &str| -> Result<f64> {
        field
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| Error::MalformedPoint { line: line_no, content: line.to_string() })
    };

    Ok(Some(Point::new(coord(fields[0])?, coord(fields[1])?)))
}
