//! Renderer Actor: Dedicated thread for rendering to the terminal.
//!
//! This actor owns stdout and the visible buffer. It receives complete
//! frames from the main loop, diffs them against what is on screen and
//! writes only the changed cells in a single flush.

use super::messages::RenderCommand;
use crate::buffer::diff::{render_diff, render_full, DiffState};
use crate::buffer::Buffer;
use crossbeam_channel::{Receiver, RecvTimeoutError};
use crossterm::cursor::Hide;
use crossterm::queue;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Renderer actor that handles terminal output.
pub struct RendererActor {
    /// Handle to the render thread.
    handle: Option<JoinHandle<()>>,
    /// Flag to signal shutdown.
    shutdown: Arc<AtomicBool>,
}

/// Render statistics for debugging/profiling.
#[derive(Debug, Clone, Default)]
pub struct RenderStats {
    /// Total frames rendered.
    pub frames: u64,
    /// Total cells changed across all frames.
    pub cells_changed: u64,
    /// Total bytes written to terminal.
    pub bytes_written: u64,
    /// Last render time in microseconds.
    pub last_render_us: u64,
}

/// Internal renderer state.
struct Renderer<W: Write> {
    /// What the terminal currently shows.
    current: Buffer,
    /// Diff state for cursor/color tracking.
    diff_state: DiffState,
    /// Pre-allocated output buffer.
    output: Vec<u8>,
    /// Terminal handle.
    out: W,
    /// Render statistics.
    stats: RenderStats,
    /// Whether the next frame must be drawn in full.
    needs_full_redraw: bool,
}

impl<W: Write> Renderer<W> {
    fn new(out: W, width: u16, height: u16) -> Self {
        Self {
            current: Buffer::new(width, height),
            diff_state: DiffState::new(),
            output: Vec::with_capacity(16 * 1024),
            out,
            stats: RenderStats::default(),
            needs_full_redraw: true,
        }
    }

    /// Draw `next` and make it the current frame.
    fn render(&mut self, next: &Buffer) -> io::Result<()> {
        let start = Instant::now();
        self.output.clear();

        let result = if self.needs_full_redraw {
            self.needs_full_redraw = false;
            render_full(next, &mut self.output, &mut self.diff_state)?
        } else {
            render_diff(&self.current, next, &mut self.output, &mut self.diff_state)?
        };
        queue!(self.output, Hide)?;

        if !self.output.is_empty() {
            self.out.write_all(&self.output)?;
            self.out.flush()?;
        }
        self.current.copy_from(next);

        self.stats.frames += 1;
        self.stats.cells_changed += result.cells_changed as u64;
        self.stats.bytes_written += self.output.len() as u64;
        self.stats.last_render_us =
            u64::try_from(start.elapsed().as_micros()).unwrap_or(u64::MAX);
        Ok(())
    }

    fn resize(&mut self, width: u16, height: u16) {
        self.current.resize(width, height);
        self.needs_full_redraw = true;
    }

    /// Apply one command. Returns `false` on shutdown.
    fn handle(&mut self, command: RenderCommand) -> io::Result<bool> {
        match command {
            RenderCommand::FullRedraw(buffer) => {
                self.needs_full_redraw = true;
                self.render(&buffer)?;
            }
            RenderCommand::Update(buffer) => self.render(&buffer)?,
            RenderCommand::Resize { width, height } => self.resize(width, height),
            RenderCommand::Shutdown => return Ok(false),
        }
        Ok(true)
    }
}

impl RendererActor {
    /// Spawn the renderer actor thread drawing to stdout.
    ///
    /// # Arguments
    ///
    /// * `receiver` - Channel to receive render commands from.
    /// * `width` - Initial terminal width.
    /// * `height` - Initial terminal height.
    pub fn spawn(receiver: Receiver<RenderCommand>, width: u16, height: u16) -> Self {
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();

        let handle = thread::Builder::new()
            .name("paddock-render".to_string())
            .spawn(move || {
                let mut renderer = Renderer::new(io::stdout(), width, height);
                match Self::run_loop(&mut renderer, &receiver, &shutdown_clone) {
                    Ok(()) => log::debug!("render thread done: {:?}", renderer.stats),
                    Err(e) => log::error!("render thread error: {e}"),
                }
            })
            .expect("Failed to spawn render thread");

        Self {
            handle: Some(handle),
            shutdown,
        }
    }

    /// Signal the render thread to shutdown.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Wait for the render thread to finish.
    pub fn join(mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    fn run_loop<W: Write>(
        renderer: &mut Renderer<W>,
        receiver: &Receiver<RenderCommand>,
        shutdown: &AtomicBool,
    ) -> io::Result<()> {
        while !shutdown.load(Ordering::Relaxed) {
            match receiver.recv_timeout(Duration::from_millis(16)) {
                Ok(command) => {
                    if !renderer.handle(command)? {
                        break;
                    }
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        Ok(())
    }
}
