//! Draws a stroke file on kleki.com through the async facade.

use canvas_replay::{async_api, DrawConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let path = std::env::args().nth(1).ok_or("usage: draw_kleki <stroke-file>")?;
    let config = DrawConfig {
        point_stride: 2,
        ..Default::default()
    };

    println!("Replaying {} onto {}", path, config.url);
    let report = async_api::draw(config, path).await?;
    println!(
        "Drew {} strokes ({} points), saved {}",
        report.stats.strokes_drawn,
        report.stats.points_sent,
        report.output_path.display()
    );
    Ok(())
}
