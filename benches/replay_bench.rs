use canvas_replay::{
    parse_strokes, CanvasSize, DrawSurface, Point, ReplayEngine, ReplayOptions, Result, Transform,
};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

/// Counts points and throws them away.
#[derive(Default)]
struct Sink {
    points: usize,
}

impl DrawSurface for Sink {
    fn is_ready(&mut self) -> Result<bool> {
        Ok(true)
    }

    fn canvas_size(&mut self) -> Result<CanvasSize> {
        Ok(CanvasSize::new(1280.0, 720.0))
    }

    fn draw_stroke(&mut self, points: &[Point]) -> Result<()> {
        self.points += points.len();
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

/// A spiral split into strokes of 200 points, roughly what a pre-baked
/// line-art file looks like.
fn spiral_file(points: usize) -> String {
    let mut text = String::with_capacity(points * 20);
    for i in 0..points {
        if i % 200 == 0 {
            text.push_str("# stroke\n");
        }
        let t = i as f64 * 0.01;
        text.push_str(&format!("{:.3},{:.3}\n", t.cos() * t, t.sin() * t));
    }
    text
}

fn bench_parse(c: &mut Criterion) {
    let text = spiral_file(50_000);
    c.bench_function("parse_strokes_50k", |b| {
        b.iter(|| parse_strokes(black_box(&text), "bench").unwrap())
    });
}

fn bench_fit(c: &mut Criterion) {
    let drawing = parse_strokes(&spiral_file(50_000), "bench").unwrap();
    c.bench_function("transform_fit_50k", |b| {
        b.iter(|| Transform::fit(black_box(&drawing), CanvasSize::new(1280.0, 720.0), 60.0))
    });
}

fn bench_replay(c: &mut Criterion) {
    let drawing = parse_strokes(&spiral_file(50_000), "bench").unwrap();
    let transform = Transform::fit(&drawing, CanvasSize::new(1280.0, 720.0), 60.0);

    let mut group = c.benchmark_group("replay_50k");
    for stride in [1usize, 4] {
        group.bench_function(format!("stride_{}", stride), |b| {
            b.iter(|| {
                let mut sink = Sink::default();
                ReplayEngine::new(&transform, ReplayOptions::immediate(stride))
                    .replay(black_box(&drawing), &mut sink)
                    .unwrap();
                sink.points
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_parse, bench_fit, bench_replay);
criterion_main!(benches);
