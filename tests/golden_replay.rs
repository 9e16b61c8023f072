use std::fs;
use std::path::PathBuf;

use canvas_replay::kleki::draw_call;
use canvas_replay::{
    load_strokes, CanvasSize, DrawSurface, Point, ReplayEngine, ReplayOptions, Result, Transform,
};
use sha2::{Digest, Sha256};

/// Collects the page script for every draw call.
#[derive(Default)]
struct ScriptLog {
    scripts: Vec<String>,
}

impl DrawSurface for ScriptLog {
    fn is_ready(&mut self) -> Result<bool> {
        Ok(true)
    }

    fn canvas_size(&mut self) -> Result<CanvasSize> {
        Ok(CanvasSize::new(800.0, 600.0))
    }

    fn draw_stroke(&mut self, points: &[Point]) -> Result<()> {
        self.scripts.push(draw_call(points));
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

fn golden_path(name: &str) -> PathBuf {
    let mut p = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    p.push("tests/goldens/expected");
    p.push(name);
    p
}

fn replay_digest(stride: usize) -> String {
    let drawing = load_strokes(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/house.dat"))
        .expect("load fixture");
    let mut log = ScriptLog::default();
    let canvas = log.canvas_size().unwrap();
    let transform = Transform::fit(&drawing, canvas, 60.0);
    ReplayEngine::new(&transform, ReplayOptions::immediate(stride))
        .replay(&drawing, &mut log)
        .expect("replay");

    let mut hasher = Sha256::new();
    for script in &log.scripts {
        hasher.update(script.as_bytes());
        hasher.update(b"\n");
    }
    hex::encode(hasher.finalize())
}

fn check_golden(name: &str, digest: &str) {
    let expected_path = golden_path(name);
    if std::env::var("UPDATE_GOLDENS").is_ok() {
        fs::create_dir_all(expected_path.parent().unwrap()).ok();
        fs::write(&expected_path, digest).expect("write golden");
        println!("Updated golden: {:?}", expected_path);
        return;
    }

    if !expected_path.exists() {
        println!(
            "No golden at {:?}; run with UPDATE_GOLDENS=1 to create it. Skipping.",
            expected_path
        );
        return;
    }

    let exp = fs::read_to_string(&expected_path).expect("unable to read golden");
    assert_eq!(digest, exp.trim(), "draw scripts changed for {}", name);
}

#[test]
fn golden_house_full_density() {
    check_golden("house_stride1.sha256", &replay_digest(1));
}

#[test]
fn golden_house_decimated() {
    check_golden("house_stride2.sha256", &replay_digest(2));
}
