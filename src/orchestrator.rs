//! Draw orchestration
//!
//! Runs one replay end to end against a [`DrawSurface`]: wait for the drawing
//! API, measure the canvas, load and fit the drawing, shrink the brush,
//! replay, capture. The surface is closed on every exit path.

use crate::capture;
use crate::replay::{ReplayEngine, ReplayOptions, ReplayStats};
use crate::stroke::load_strokes;
use crate::transform::Transform;
use crate::{DrawConfig, DrawSurface, Error, Result};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Outcome of a successful run
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Where the screenshot was written
    pub output_path: PathBuf,
    pub stats: ReplayStats,
    pub transform: Transform,
}

/// Owns the run configuration and sequences the pipeline stages.
#[derive(Debug, Clone)]
pub struct Orchestrator {
    config: DrawConfig,
}

impl Orchestrator {
    /// Validate `config` and build an orchestrator around it.
    pub fn new(config: DrawConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &DrawConfig {
        &self.config
    }

    /// Replay the stroke file at `drawing` onto `surface`.
    ///
    /// The first failing stage aborts the run. `surface` is closed afterwards
    /// whatever happened; a close failure is only reported when the run itself
    /// succeeded.
    pub fn run<S: DrawSurface>(&self, mut surface: S, drawing: impl AsRef<Path>) -> Result<RunReport> {
        let outcome = self.run_stages(&mut surface, drawing.as_ref());
        let closed = surface.close();

        match (outcome, closed) {
            (Ok(report), Ok(())) => Ok(report),
            (Ok(_), Err(e)) => Err(e),
            (Err(e), Ok(())) => Err(e),
            (Err(e), Err(close_err)) => {
                warn!("Failed to close surface after error: {}", close_err);
                Err(e)
            }
        }
    }

    fn run_stages<S: DrawSurface>(&self, surface: &mut S, path: &Path) -> Result<RunReport> {
        let cfg = &self.config;

        wait_until_ready(
            surface,
            Duration::from_millis(cfg.ready_timeout_ms),
            Duration::from_millis(cfg.poll_interval_ms),
        )?;

        let canvas = surface.canvas_size()?;
        let drawing = load_strokes(path)?;
        let transform = Transform::fit(&drawing, canvas, cfg.padding);
        if !transform.is_finite() {
            return Err(Error::UnscalableDrawing {
                width: transform.bounds.width(),
                height: transform.bounds.height(),
            });
        }

        info!(
            "Canvas: {:.0}x{:.0} | drawing: {:.2}x{:.2} | scale: {:.4} | strokes: {}",
            canvas.width,
            canvas.height,
            transform.bounds.width(),
            transform.bounds.height(),
            transform.scale,
            drawing.len()
        );

        if cfg.adjust_brush {
            surface.adjust_brush()?;
        }

        let stats = ReplayEngine::new(&transform, ReplayOptions::from(cfg)).replay(&drawing, surface)?;
        info!(
            "Replayed {}/{} strokes ({} points, {} skipped)",
            stats.strokes_drawn, stats.strokes_total, stats.points_sent, stats.strokes_skipped
        );

        let png = surface.capture_canvas()?;
        if png.is_empty() {
            return Err(Error::ExternalCall("canvas screenshot was empty".into()));
        }
        let output_path = capture::save_screenshot(&cfg.output_dir, &cfg.file_prefix, &png)?;

        Ok(RunReport { output_path, stats, transform })
    }
}

/// Poll `is_ready` until it returns `true` or `timeout` elapses.
///
/// A failing probe counts as "not ready yet"; pages that are still loading
/// routinely reject evaluation.
pub fn wait_until_ready<S>(surface: &mut S, timeout: Duration, poll: Duration) -> Result<()>
where
    S: DrawSurface + ?Sized,
{
    let started = Instant::now();
    loop {
        match surface.is_ready() {
            Ok(true) => {
                debug!("drawing API ready after {:?}", started.elapsed());
                return Ok(());
            }
            Ok(false) => {}
            Err(e) => debug!("readiness probe failed: {}", e),
        }

        let elapsed = started.elapsed();
        if elapsed >= timeout {
            return Err(Error::ReadinessTimeout(timeout.as_millis() as u64));
        }
        std::thread::sleep(poll.min(timeout - elapsed));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stroke::Point;
    use crate::transform::CanvasSize;

    #[derive(Default)]
    struct Stub {
        ready_after: usize,
        probes: usize,
        draws: usize,
    }

    impl DrawSurface for Stub {
        fn is_ready(&mut self) -> Result<bool> {
            self.probes += 1;
            if self.probes == 1 {
                return Err(Error::ExternalCall("page still loading".into()));
            }
            Ok(self.probes > self.ready_after)
        }

        fn canvas_size(&mut self) -> Result<CanvasSize> {
            Ok(CanvasSize::new(100.0, 100.0))
        }

        fn draw_stroke(&mut self, _points: &[Point]) -> Result<()> {
            self.draws += 1;
            Ok(())
        }

        fn adjust_brush(&mut self) -> Result<()> {
            Ok(())
        }

        fn capture_canvas(&mut self) -> Result<Vec<u8>> {
            Ok(vec![1])
        }

        fn close(self) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn readiness_tolerates_probe_errors() {
        let mut s = Stub { ready_after: 3, ..Default::default() };
        wait_until_ready(&mut s, Duration::from_secs(5), Duration::from_millis(1)).unwrap();
        assert_eq!(s.probes, 4);
    }

    #[test]
    fn readiness_times_out() {
        let mut s = Stub { ready_after: usize::MAX, ..Default::default() };
        let err = wait_until_ready(&mut s, Duration::from_millis(20), Duration::from_millis(5)).unwrap_err();
        assert!(matches!(err, Error::ReadinessTimeout(20)));
        assert_eq!(s.draws, 0);
    }

    #[test]
    fn invalid_config_is_rejected_up_front() {
        let cfg = DrawConfig { point_stride: 0, ..Default::default() };
        assert!(matches!(Orchestrator::new(cfg), Err(Error::Config(_))));
    }
}
