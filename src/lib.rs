//! Canvas Replay
//!
//! Replays a pre-baked line drawing onto a web canvas through the page's own
//! drawing API and captures the result as a PNG.
//!
//! # Pipeline
//!
//! - **Parse**: a stroke file (`x,y` lines, `#` between strokes) becomes a
//!   [`Drawing`]
//! - **Fit**: one aspect-preserving [`Transform`] maps the whole drawing into
//!   the canvas, centered with a padding margin
//! - **Replay**: each stroke is sent to the surface as its own draw call, so
//!   separate strokes are never joined
//! - **Capture**: the canvas is screenshotted to a timestamped file
//!
//! The browser side sits behind the [`DrawSurface`] trait. The `cdp` feature
//! provides a headless Chrome implementation driving <https://kleki.com/>.
//!
//! # Example
//!
//! ```no_run
//! # #[cfg(feature = "cdp")]
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use canvas_replay::{cdp::CdpSurface, DrawConfig, Orchestrator};
//!
//! let config = DrawConfig { padding: 40.0, ..Default::default() };
//! let surface = CdpSurface::launch(&config)?;
//! let report = Orchestrator::new(config)?.run(surface, "lineart.dat")?;
//! println!("Saved {}", report.output_path.display());
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "cdp"))]
//! # fn main() {}
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub mod error;
pub use error::{Error, Result};

pub mod stroke;
pub use stroke::{load_strokes, parse_strokes, Drawing, Point, Stroke};

pub mod transform;
pub use transform::{BoundingBox, CanvasSize, Transform};

pub mod replay;
pub use replay::{ReplayEngine, ReplayOptions, ReplayStats};

pub mod capture;

pub mod kleki;

pub mod orchestrator;
pub use orchestrator::{Orchestrator, RunReport};

// Async-friendly facade (worker thread + oneshot)
pub mod async_api;

#[cfg(feature = "cdp")]
pub mod cdp;

/// Configuration for a replay run
///
/// Defaults target the Kleki web painter and mirror the timings that keep it
/// responsive while strokes stream in.
///
/// # Examples
///
/// ```
/// let cfg = canvas_replay::DrawConfig::default();
/// assert_eq!(cfg.point_stride, 1);
/// assert!(cfg.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawConfig {
    /// Page hosting the drawing API
    pub url: String,
    /// Browser window size
    pub viewport: Viewport,
    /// Launch the browser without a window
    pub headless: bool,
    /// Margin in pixels kept free on every side of the canvas
    pub padding: f64,
    /// Keep every Nth point of each stroke (1 keeps all)
    pub point_stride: usize,
    /// How long to wait for the drawing API to appear
    pub ready_timeout_ms: u64,
    /// How long to wait for page elements (toolbar, canvas) to appear
    pub locate_timeout_ms: u64,
    /// Interval between readiness / idle probes
    pub poll_interval_ms: u64,
    /// Upper bound on the pause after each stroke
    pub stroke_delay_ms: u64,
    /// Pause after the last stroke before capturing
    pub final_settle_ms: u64,
    /// Shrink the brush before drawing
    pub adjust_brush: bool,
    /// Click offset (x, y) from the center of the toolbar control
    pub brush_offset: (f64, f64),
    /// XPath of the toolbar control used as the brush click anchor
    pub toolbar_xpath: String,
    /// CSS selector of the target canvas
    pub canvas_selector: String,
    /// Optional script returning `true` once the page finished a batch
    pub idle_probe: Option<String>,
    /// Directory receiving screenshots
    pub output_dir: PathBuf,
    /// File name prefix for screenshots
    pub file_prefix: String,
}

impl Default for DrawConfig {
    fn default() -> Self {
        Self {
            url: "https://kleki.com/".to_string(),
            viewport: Viewport::default(),
            headless: true,
            padding: 60.0,
            point_stride: 1,
            ready_timeout_ms: 8000,
            locate_timeout_ms: 3000,
            poll_interval_ms: 100,
            stroke_delay_ms: 25,
            final_settle_ms: 300,
            adjust_brush: true,
            brush_offset: (-111.0, 0.0),
            toolbar_xpath: "//div[@class='kl-toolspace kl-toolspace--right']/div/div[5]/div[3]/div[1]/div/div"
                .to_string(),
            canvas_selector: "canvas".to_string(),
            idle_probe: None,
            output_dir: PathBuf::from("output"),
            file_prefix: "result".to_string(),
        }
    }
}

impl DrawConfig {
    /// Load a JSON config; missing keys fall back to the defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| Error::from_read(path, e))?;
        let config: DrawConfig = serde_json::from_str(&text)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        Ok(config)
    }

    /// Reject values the pipeline cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.point_stride == 0 {
            return Err(Error::Config("point_stride must be at least 1".into()));
        }
        if !self.padding.is_finite() || self.padding < 0.0 {
            return Err(Error::Config(format!("padding must be a non-negative number, got {}", self.padding)));
        }
        if self.viewport.width == 0 || self.viewport.height == 0 {
            return Err(Error::Config("viewport dimensions must be non-zero".into()));
        }
        if self.poll_interval_ms == 0 {
            return Err(Error::Config("poll_interval_ms must be at least 1".into()));
        }
        if self.file_prefix.contains(&['/', '\\'][..]) {
            return Err(Error::Config(format!("file_prefix must not contain path separators: {:?}", self.file_prefix)));
        }
        Ok(())
    }
}

/// Browser window dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

/// A page exposing a point-sequence drawing primitive
///
/// Implementations wrap whatever hosts the canvas (a browser tab in the `cdp`
/// backend, a recorder in tests). All calls are blocking and issued one at a
/// time by the orchestrator.
pub trait DrawSurface {
    /// Whether the drawing primitive is installed and callable
    fn is_ready(&mut self) -> Result<bool>;

    /// Pixel size of the target canvas
    fn canvas_size(&mut self) -> Result<CanvasSize>;

    /// Draw one continuous path through `points` (canvas pixel space)
    fn draw_stroke(&mut self, points: &[Point]) -> Result<()>;

    /// Whether the page has finished processing the last batch.
    ///
    /// `Ok(None)` means the surface has no such signal, in which case callers
    /// fall back to a fixed delay.
    fn is_idle(&mut self) -> Result<Option<bool>> {
        Ok(None)
    }

    /// Shrink the brush before drawing (UI side effect)
    fn adjust_brush(&mut self) -> Result<()>;

    /// PNG bytes of the canvas element
    fn capture_canvas(&mut self) -> Result<Vec<u8>>;

    /// Tear down the session
    fn close(self) -> Result<()>
    where
        Self: Sized;
}
