//! Fit-to-canvas transform
//!
//! Maps source-drawing coordinates into canvas pixels with one uniform scale
//! factor, so the aspect ratio is preserved, and centers the result inside the
//! canvas. Source space is Y-up while the canvas is Y-down, so `apply` flips
//! the Y axis.

use crate::stroke::{Drawing, Point};

/// Smallest extent used for any dimension, so degenerate drawings (a single
/// point, a perfectly horizontal line) and oversized padding never divide by
/// zero.
pub const EPSILON: f64 = 1e-6;

/// Pixel size of the target canvas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

impl CanvasSize {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned bounds of every point in a drawing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Scan every point of `drawing` once.
    pub fn of(drawing: &Drawing) -> Self {
        let mut bb = BoundingBox {
            min_x: f64::INFINITY,
            min_y: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            max_y: f64::NEG_INFINITY,
        };
        for p in drawing.points() {
            bb.min_x = bb.min_x.min(p.x);
            bb.min_y = bb.min_y.min(p.y);
            bb.max_x = bb.max_x.max(p.x);
            bb.max_y = bb.max_y.max(p.y);
        }
        bb
    }

    /// Width, clamped to `EPSILON`
    pub fn width(&self) -> f64 {
        (self.max_x - self.min_x).max(EPSILON)
    }

    /// Height, clamped to `EPSILON`
    pub fn height(&self) -> f64 {
        (self.max_y - self.min_y).max(EPSILON)
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }
}

/// Uniform scale plus centering offsets, shared by every stroke of a drawing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
    /// Source bounds the transform was fitted to
    pub bounds: BoundingBox,
    /// Width of the drawing once placed on the canvas
    pub drawn_width: f64,
    /// Height of the drawing once placed on the canvas
    pub drawn_height: f64,
}

impl Transform {
    /// Fit `drawing` into `canvas`, leaving `padding` pixels on every side.
    pub fn fit(drawing: &Drawing, canvas: CanvasSize, padding: f64) -> Self {
        Self::fit_bounds(BoundingBox::of(drawing), canvas, padding)
    }

    /// Fit precomputed bounds into `canvas`.
    pub fn fit_bounds(bounds: BoundingBox, canvas: CanvasSize, padding: f64) -> Self {
        let drawing_w = bounds.width();
        let drawing_h = bounds.height();

        let usable_w = (canvas.width - 2.0 * padding).max(EPSILON);
        let usable_h = (canvas.height - 2.0 * padding).max(EPSILON);

        // The binding axis decides; the other axis gets slack that centering absorbs.
        let scale = (usable_w / drawing_w).min(usable_h / drawing_h);

        let drawn_width = drawing_w * scale;
        let drawn_height = drawing_h * scale;

        Self {
            scale,
            offset_x: (canvas.width - drawn_width) / 2.0,
            offset_y: (canvas.height - drawn_height) / 2.0,
            bounds,
            drawn_width,
            drawn_height,
        }
    }

    /// Whether every mapped point will be a finite pixel.
    ///
    /// Finite coordinates far apart (`-1e308` and `1e308`) overflow the
    /// extent, which leaves a zero scale and NaN offsets.
    pub fn is_finite(&self) -> bool {
        self.scale.is_finite()
            && self.scale > 0.0
            && self.drawn_width.is_finite()
            && self.drawn_height.is_finite()
            && self.offset_x.is_finite()
            && self.offset_y.is_finite()
    }

    /// Map a source point to canvas pixels (Y flipped).
    pub fn apply(&self, p: Point) -> Point {
        let nx = (p.x - self.bounds.min_x) / self.bounds.width();
        let ny = 1.0 - (p.y - self.bounds.min_y) / self.bounds.height();
        Point::new(nx * self.drawn_width + self.offset_x, ny * self.drawn_height + self.offset_y)
    }
}
