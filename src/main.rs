use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;

use anyhow::{bail, Context};
use framekit::{init_logging, Config, PlayerShell, Session, BUILD_DATE, VERSION};
use tracing::info;

/// Pane size the session lays its surfaces out at.
const PANE_SIZE: (u32, u32) = (960, 540);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    init_logging()?;

    let mut args = std::env::args_os().skip(1);
    let Some(image) = args.next().map(PathBuf::from) else {
        bail!("usage: framekit <frame-image> [script]");
    };
    let script = args.next().map(PathBuf::from);

    info!("FrameKit {} (built {})", VERSION, BUILD_DATE);

    let config = Config::load_or_default();
    let mut session = Session::new(PlayerShell::new(config), PANE_SIZE);
    session.load_image(&image)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let summary = match script {
        Some(path) => {
            let file =
                File::open(&path).with_context(|| format!("Failed to open {}", path.display()))?;
            session.run_script(BufReader::new(file), &mut out).await?
        }
        None => session.run_script(io::stdin().lock(), &mut out).await?,
    };

    info!(
        executed = summary.executed,
        skipped = summary.skipped,
        "Session finished"
    );
    Ok(())
}
