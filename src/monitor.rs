use crate::config::Config;
use crate::error::MdtailError;
use crate::renderer::TerminalRenderer;
use crate::terminal::FrameWriter;
use crate::utils::strip_leading_bom;
use anyhow::Result;
use notify::{Event as NotifyEvent, EventKind, RecursiveMode, Watcher};
use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::{Duration, Instant};

/// Follow a file that is being appended to, redrawing the repaired frame
/// in place every time it changes.
pub fn follow_file(filename: &str, config: &Config) -> Result<()> {
    let path = PathBuf::from(filename);
    if !path.exists() {
        return Err(MdtailError::MonitorError(format!("File not found: {}", filename)).into());
    }

    log::info!("Following file: {} (Press Ctrl+C to stop)", filename);

    let renderer = TerminalRenderer::new(config)?;
    let mut frames = FrameWriter::new(io::stdout(), config.get_terminal_width());
    if !io::stdout().is_terminal() {
        log::info!("stdout is not a terminal; writing each change as a new frame");
        frames = frames.append_only();
    }
    let mut follower = Follower::new(&renderer, frames, config.raw);

    let (tx, rx) = mpsc::channel();
    let mut watcher = notify::recommended_watcher(tx)
        .map_err(|e| MdtailError::MonitorError(e.to_string()))?;

    watcher
        .watch(&path, RecursiveMode::NonRecursive)
        .map_err(|e| MdtailError::MonitorError(e.to_string()))?;

    follower.update(read_source(&path)?)?;

    let mut last_render = Instant::now();
    let debounce_duration = Duration::from_millis(100);
    let mut dirty = false;

    loop {
        match rx.recv_timeout(Duration::from_millis(50)) {
            Ok(Ok(event)) => {
                if should_trigger_render(&event) {
                    dirty = true;
                }
            }
            Ok(Err(e)) => log::warn!("Watch error: {}", e),
            Err(mpsc::RecvTimeoutError::Timeout) => {}
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        }

        let now = Instant::now();
        if dirty && now.duration_since(last_render) > debounce_duration {
            dirty = false;
            last_render = now;
            match read_source(&path) {
                Ok(content) => {
                    follower.update(content)?;
                }
                Err(e) => log::warn!("Error reading {}: {}", path.display(), e),
            }
        }
    }

    Ok(())
}

fn should_trigger_render(event: &NotifyEvent) -> bool {
    matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_))
}

fn read_source(path: &Path) -> Result<String> {
    let mut content = std::fs::read_to_string(path)?;
    strip_leading_bom(&mut content);
    Ok(content)
}

/// Redraws a followed file when its content changes.
struct Follower<'r, W: Write> {
    renderer: &'r TerminalRenderer,
    frames: FrameWriter<W>,
    raw: bool,
    shown: Option<String>,
}

impl<'r, W: Write> Follower<'r, W> {
    fn new(renderer: &'r TerminalRenderer, frames: FrameWriter<W>, raw: bool) -> Self {
        Self {
            renderer,
            frames,
            raw,
            shown: None,
        }
    }

    /// Returns whether a new frame was drawn.
    fn update(&mut self, content: String) -> Result<bool> {
        if self.shown.as_deref() == Some(content.as_str()) {
            return Ok(false);
        }

        let frame = if self.raw {
            content.clone()
        } else {
            self.renderer.render(&content)?
        };
        self.frames.draw(&frame)?;
        log::debug!("redrew {} bytes as {} rows", content.len(), self.frames.prev_lines());
        self.shown = Some(content);
        Ok(true)
    }

    #[cfg(test)]
    fn into_output(self) -> Result<W> {
        self.frames.finish()
    }
}
