//! Scripted annotation sessions.
//!
//! Drives a [`PlayerShell`] from a line-based script, one command per line.
//! Blank lines and `#` comments are ignored; lines that fail to parse are
//! reported and skipped. Every command is followed by one frame tick so the
//! panes repaint and their events reach the shell.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use framekit_annotate::surface::PointerEvent;
use framekit_annotate::video::FrameSequence;
use framekit_player::{PlayerShell, Side};
use tracing::{info, warn};

use crate::types::{Command, ScriptSummary};

pub struct Session {
    shell: PlayerShell,
    pane: (u32, u32),
    output_dir: PathBuf,
    last_pointer: (f64, f64),
}

impl Session {
    /// Wraps `shell`, laying out both panes at `pane` pixels.
    pub fn new(mut shell: PlayerShell, pane: (u32, u32)) -> Self {
        for side in Side::BOTH {
            shell.set_container_size(side, pane.0, pane.1);
        }
        Self {
            shell,
            pane,
            output_dir: PathBuf::from("."),
            last_pointer: (0.0, 0.0),
        }
    }

    /// Directory for snapshots saved without an explicit path.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn shell(&self) -> &PlayerShell {
        &self.shell
    }

    pub fn shell_mut(&mut self) -> &mut PlayerShell {
        &mut self.shell
    }

    /// Opens an image file and shows it as a still video on the active pane.
    pub fn load_image(&mut self, path: &Path) -> Result<()> {
        let video = FrameSequence::open(path)
            .with_context(|| format!("Failed to load frame {}", path.display()))?;
        let side = self.shell.active_side();
        self.shell.load_video(side, Box::new(video));
        self.shell.tick(0.0, self.pane);
        info!(path = %path.display(), %side, "Frame loaded");
        Ok(())
    }

    /// Runs one command and returns the text to print, if any.
    pub async fn execute(&mut self, command: Command) -> Result<Option<String>> {
        let side = self.shell.active_side();
        let mut dt = 0.0;

        let output = match command {
            Command::Tool(tool) => {
                self.shell.set_tool(tool);
                None
            }
            Command::Color(color) => {
                self.shell.set_color(color);
                None
            }
            Command::Width(width) => {
                self.shell.set_line_width(width);
                None
            }
            Command::Down(x, y) => {
                self.last_pointer = (x, y);
                self.shell.pointer_down(side, PointerEvent::at(x, y));
                None
            }
            Command::Move(x, y) => {
                self.last_pointer = (x, y);
                self.shell.pointer_move(side, PointerEvent::at(x, y));
                None
            }
            Command::Up => {
                let (x, y) = self.last_pointer;
                self.shell.pointer_up(side, PointerEvent::at(x, y));
                None
            }
            Command::Zoom(delta) => {
                self.shell.adjust_zoom(delta);
                None
            }
            Command::Key(key) => {
                self.shell.handle_key(key);
                None
            }
            Command::Speed(rate) => {
                self.shell.change_speed(rate);
                None
            }
            Command::Tick(seconds) => {
                dt = seconds;
                None
            }
            Command::Clear => {
                self.shell.clear_shapes();
                None
            }
            Command::Snapshot(path) => Some(self.snapshot(path).await?),
            Command::Status => Some(self.shell.to_string()),
        };

        self.shell.tick(dt, self.pane);
        Ok(output)
    }

    async fn snapshot(&self, path: Option<PathBuf>) -> Result<String> {
        let Some(snapshot) = self.shell.snapshot().await else {
            warn!("Nothing to snapshot");
            return Ok("snapshot unavailable".to_string());
        };
        let path = path.unwrap_or_else(|| self.output_dir.join(self.shell.snapshot_file_name()));
        snapshot
            .write_to(&path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!(path = %path.display(), bytes = snapshot.jpeg.len(), "Snapshot saved");
        Ok(format!(
            "snapshot {}x{} saved to {}",
            snapshot.width,
            snapshot.height,
            path.display()
        ))
    }

    /// Executes every line of `script`, writing command output to `out`.
    pub async fn run_script<R: BufRead, W: Write>(
        &mut self,
        script: R,
        out: &mut W,
    ) -> Result<ScriptSummary> {
        let mut summary = ScriptSummary::default();

        for (index, line) in script.lines().enumerate() {
            let line = line.context("Failed to read script")?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            match line.parse::<Command>() {
                Ok(command) => {
                    if let Some(text) = self.execute(command).await? {
                        writeln!(out, "{}", text)?;
                    }
                    summary.executed += 1;
                }
                Err(e) => {
                    warn!(line = index + 1, "Skipping script line: {}", e);
                    writeln!(out, "line {}: {}", index + 1, e)?;
                    summary.skipped += 1;
                }
            }
        }

        Ok(summary)
    }
}
