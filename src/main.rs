use canvas_replay::cdp::CdpSurface;
use canvas_replay::{DrawConfig, Orchestrator, Result};
use clap::Parser;
use log::error;
use std::path::PathBuf;
use std::process::ExitCode;

/// Replay a stroke file onto the Kleki canvas and save a screenshot.
#[derive(Parser, Debug)]
#[command(name = "canvas-replay", version, about)]
struct Cli {
    /// Stroke file (`x,y` per line, `#` between strokes)
    file: PathBuf,

    /// JSON config file; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Page hosting the drawing API
    #[arg(long)]
    url: Option<String>,

    /// Margin in pixels around the drawing
    #[arg(long)]
    padding: Option<f64>,

    /// Keep every Nth point of each stroke
    #[arg(long)]
    stride: Option<usize>,

    /// Directory for screenshots
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// How long to wait for the drawing API (milliseconds)
    #[arg(long)]
    ready_timeout_ms: Option<u64>,

    /// Leave the brush size alone
    #[arg(long)]
    no_brush: bool,

    /// Show the browser window
    #[arg(long)]
    headful: bool,
}

impl Cli {
    fn into_config(self) -> Result<(DrawConfig, PathBuf)> {
        let mut cfg = match &self.config {
            Some(path) => DrawConfig::from_json_file(path)?,
            None => DrawConfig::default(),
        };

        if let Some(url) = self.url {
            cfg.url = url;
        }
        if let Some(padding) = self.padding {
            cfg.padding = padding;
        }
        if let Some(stride) = self.stride {
            cfg.point_stride = stride;
        }
        if let Some(dir) = self.output_dir {
            cfg.output_dir = dir;
        }
        if let Some(ms) = self.ready_timeout_ms {
            cfg.ready_timeout_ms = ms;
        }
        if self.no_brush {
            cfg.adjust_brush = false;
        }
        if self.headful {
            cfg.headless = false;
        }

        Ok((cfg, self.file))
    }
}

fn run(cli: Cli) -> Result<PathBuf> {
    let (cfg, file) = cli.into_config()?;
    let orchestrator = Orchestrator::new(cfg)?;
    let surface = CdpSurface::launch(orchestrator.config())?;
    let report = orchestrator.run(surface, &file)?;
    Ok(report.output_path)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(Cli::parse()) {
        Ok(path) => {
            println!("Done. Saved: {}", path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::parse_from([
            "canvas-replay",
            "art.dat",
            "--padding",
            "10",
            "--stride",
            "3",
            "--no-brush",
            "--headful",
        ]);
        let (cfg, file) = cli.into_config().unwrap();
        assert_eq!(file, PathBuf::from("art.dat"));
        assert_eq!(cfg.padding, 10.0);
        assert_eq!(cfg.point_stride, 3);
        assert!(!cfg.adjust_brush);
        assert!(!cfg.headless);
        assert_eq!(cfg.url, DrawConfig::default().url);
    }

    #[test]
    fn missing_config_file_fails() {
        let cli = Cli::parse_from(["canvas-replay", "art.dat", "--config", "/nonexistent/cfg.json"]);
        assert!(cli.into_config().is_err());
    }
}
