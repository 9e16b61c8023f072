//! Stroke replay
//!
//! Sends each stroke of a drawing to a [`DrawSurface`] as its own batch of
//! canvas-space points. Points from different strokes never share a call.

use crate::stroke::{Drawing, Point, Stroke};
use crate::transform::Transform;
use crate::{DrawConfig, DrawSurface, Result};
use log::debug;
use std::time::{Duration, Instant};

/// Replay tuning taken from [`DrawConfig`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReplayOptions {
    /// Keep every Nth point of each stroke
    pub stride: usize,
    /// Upper bound on the pause after each stroke
    pub stroke_delay: Duration,
    /// Pause after the last stroke
    pub final_settle: Duration,
    /// Interval between idle probes
    pub poll_interval: Duration,
}

impl Default for ReplayOptions {
    fn default() -> Self {
        Self::from(&DrawConfig::default())
    }
}

impl From<&DrawConfig> for ReplayOptions {
    fn from(cfg: &DrawConfig) -> Self {
        Self {
            stride: cfg.point_stride.max(1),
            stroke_delay: Duration::from_millis(cfg.stroke_delay_ms),
            final_settle: Duration::from_millis(cfg.final_settle_ms),
            poll_interval: Duration::from_millis(cfg.poll_interval_ms.max(1)),
        }
    }
}

impl ReplayOptions {
    /// Options with every wait disabled
    pub fn immediate(stride: usize) -> Self {
        Self {
            stride: stride.max(1),
            stroke_delay: Duration::ZERO,
            final_settle: Duration::ZERO,
            poll_interval: Duration::from_millis(1),
        }
    }
}

/// Counters describing one replay
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayStats {
    pub strokes_total: usize,
    pub strokes_drawn: usize,
    pub strokes_skipped: usize,
    pub points_sent: usize,
}

/// Replays a drawing through one shared transform.
pub struct ReplayEngine<'a> {
    transform: &'a Transform,
    options: ReplayOptions,
}

impl<'a> ReplayEngine<'a> {
    pub fn new(transform: &'a Transform, options: ReplayOptions) -> Self {
        Self { transform, options }
    }

    /// Canvas-space points for one stroke, or `None` when fewer than two points
    /// survive decimation.
    pub fn batch(&self, stroke: &Stroke) -> Option<Vec<Point>> {
        let pts: Vec<Point> = stroke
            .decimated(self.options.stride)
            .map(|&p| self.transform.apply(p))
            .collect();
        (pts.len() >= 2).then_some(pts)
    }

    /// Send every qualifying stroke to `surface`, in order.
    pub fn replay<S>(&self, drawing: &Drawing, surface: &mut S) -> Result<ReplayStats>
    where
        S: DrawSurface + ?Sized,
    {
        let mut stats = ReplayStats { strokes_total: drawing.len(), ..Default::default() };

        for (idx, stroke) in drawing.strokes().iter().enumerate() {
            let Some(points) = self.batch(stroke) else {
                debug!("stroke {}: {} point(s) after decimation, skipped", idx, stroke.decimated(self.options.stride).count());
                stats.strokes_skipped += 1;
                continue;
            };

            debug!("stroke {}: sending {} points", idx, points.len());
            surface.draw_stroke(&points)?;
            stats.strokes_drawn += 1;
            stats.points_sent += points.len();

            self.settle(surface)?;
        }

        if !self.options.final_settle.is_zero() {
            std::thread::sleep(self.options.final_settle);
        }

        Ok(stats)
    }

    /// Wait for the surface to catch up after a batch.
    ///
    /// Polls `is_idle` when the surface reports one, never for longer than the
    /// stroke delay; otherwise sleeps the full delay. A failing idle check is
    /// treated as "no signal". Neither path guarantees the page actually
    /// finished rendering.
    fn settle<S>(&self, surface: &mut S) -> Result<()>
    where
        S: DrawSurface + ?Sized,
    {
        let delay = self.options.stroke_delay;
        if delay.is_zero() {
            return Ok(());
        }

        let deadline = Instant::now() + delay;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            let idle = surface.is_idle().unwrap_or_else(|e| {
                debug!("idle check failed: {}, falling back to delay", e);
                None
            });
            match idle {
                Some(true) => return Ok(()),
                None => {
                    std::thread::sleep(remaining);
                    return Ok(());
                }
                Some(false) if remaining.is_zero() => {
                    debug!("surface still busy after {:?}, continuing", delay);
                    return Ok(());
                }
                Some(false) => std::thread::sleep(remaining.min(self.options.poll_interval)),
            }
        }
    }
}
