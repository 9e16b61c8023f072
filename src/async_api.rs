use crate::{DrawConfig, DrawSurface, Error, Orchestrator, Result, RunReport};
use std::path::PathBuf;
use std::thread;
use tokio::sync::oneshot;

/// A replay running on a dedicated worker thread.
///
/// The surface is created by the factory on the worker thread and never
/// leaves it, so surfaces that aren't `Send` (browser tabs, recorders holding
/// `Rc`s) work from async code.
pub struct DrawHandle {
    rx: oneshot::Receiver<Result<RunReport>>,
}

impl DrawHandle {
    /// Wait for the run to finish.
    pub async fn wait(self) -> Result<RunReport> {
        self.rx
            .await
            .map_err(|e| Error::ExternalCall(format!("Draw worker canceled: {}", e)))?
    }
}

/// Start a replay of `drawing` in the background.
///
/// `factory` receives the validated config and builds the surface; a factory
/// error is reported through the handle like any other stage failure.
pub fn spawn_draw<S, F>(config: DrawConfig, drawing: impl Into<PathBuf>, factory: F) -> DrawHandle
where
    S: DrawSurface,
    F: FnOnce(&DrawConfig) -> Result<S> + Send + 'static,
{
    let drawing = drawing.into();
    let (tx, rx) = oneshot::channel();

    thread::spawn(move || {
        let res = Orchestrator::new(config).and_then(|orch| {
            let surface = factory(orch.config())?;
            orch.run(surface, &drawing)
        });
        // Receiver may have been dropped; nothing left to notify then.
        let _ = tx.send(res);
    });

    DrawHandle { rx }
}

/// Launch headless Chrome and replay `drawing`, without blocking the runtime.
#[cfg(feature = "cdp")]
pub async fn draw(config: DrawConfig, drawing: impl Into<PathBuf>) -> Result<RunReport> {
    spawn_draw(config, drawing, crate::cdp::CdpSurface::launch).wait().await
}
