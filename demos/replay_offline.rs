//! Replays a stroke file against a surface that just prints the page scripts.
//!
//! Handy for checking how a file will be placed without launching a browser:
//!
//! ```text
//! cargo run --example replay_offline -- tests/fixtures/house.dat
//! ```

use canvas_replay::kleki::draw_call;
use canvas_replay::{
    load_strokes, BoundingBox, CanvasSize, DrawSurface, Point, ReplayEngine, ReplayOptions, Result,
    Transform,
};

struct PrintSurface;

impl DrawSurface for PrintSurface {
    fn is_ready(&mut self) -> Result<bool> {
        Ok(true)
    }

    fn canvas_size(&mut self) -> Result<CanvasSize> {
        Ok(CanvasSize::new(1280.0, 720.0))
    }

    fn draw_stroke(&mut self, points: &[Point]) -> Result<()> {
        println!("{}", draw_call(points));
        Ok(())
    }

    fn adjust_brush(&mut self) -> Result<()> {
        Ok(())
    }

    fn capture_canvas(&mut self) -> Result<Vec<u8>> {
        Ok(Vec::new())
    }

    fn close(self) -> Result<()> {
        Ok(())
    }
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let path = std::env::args().nth(1).ok_or("usage: replay_offline <stroke-file>")?;

    let drawing = load_strokes(&path)?;
    let mut surface = PrintSurface;
    let canvas = surface.canvas_size()?;
    let bounds = BoundingBox::of(&drawing);
    let transform = Transform::fit_bounds(bounds, canvas, 60.0);

    eprintln!(
        "{} strokes, {} points, bounds {:.2}x{:.2}, scale {:.4}",
        drawing.len(),
        drawing.point_count(),
        bounds.width(),
        bounds.height(),
        transform.scale
    );

    let stats = ReplayEngine::new(&transform, ReplayOptions::immediate(1)).replay(&drawing, &mut surface)?;
    eprintln!("{} draw calls, {} skipped", stats.strokes_drawn, stats.strokes_skipped);
    surface.close()?;
    Ok(())
}
