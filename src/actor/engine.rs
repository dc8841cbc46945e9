//! Engine: Terminal owner that ties the input and render actors together.
//!
//! Creating an engine switches the terminal to raw mode on the alternate
//! screen and spawns the actors; dropping it restores the terminal.

use super::messages::{InputEvent, RenderCommand};
use super::{InputActor, RendererActor};
use crate::buffer::Buffer;
use crossbeam_channel::{bounded, Receiver, Sender};
use crossterm::{
    cursor, execute,
    event::{DisableBracketedPaste, EnableBracketedPaste},
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::io;
use std::time::Duration;

/// Configuration for the Engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Input poll timeout.
    pub input_poll_timeout: Duration,
    /// Whether to use alternate screen buffer.
    pub alternate_screen: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            input_poll_timeout: Duration::from_millis(10),
            alternate_screen: true,
        }
    }
}

/// The terminal engine.
pub struct Engine {
    config: EngineConfig,
    input_rx: Receiver<InputEvent>,
    render_tx: Sender<RenderCommand>,
    input_actor: Option<InputActor>,
    renderer_actor: Option<RendererActor>,
    /// Frame being composed by the application.
    buffer: Buffer,
}

impl Engine {
    /// Take over the terminal with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal setup fails (raw mode, alternate screen, etc.).
    pub fn with_config(config: EngineConfig) -> io::Result<Self> {
        let (width, height) = terminal::size()?;

        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        if config.alternate_screen {
            execute!(stdout, EnterAlternateScreen)?;
        }
        execute!(stdout, EnableBracketedPaste, cursor::Hide)?;

        let (input_tx, input_rx) = bounded::<InputEvent>(64);
        let (render_tx, render_rx) = bounded::<RenderCommand>(4);

        let input_actor = InputActor::spawn(input_tx, config.input_poll_timeout);
        let renderer_actor = RendererActor::spawn(render_rx, width, height);
        log::info!("terminal engine started at {width}x{height}");

        Ok(Self {
            config,
            input_rx,
            render_tx,
            input_actor: Some(input_actor),
            renderer_actor: Some(renderer_actor),
            buffer: Buffer::new(width, height),
        })
    }

    /// Terminal width.
    pub const fn width(&self) -> u16 {
        self.buffer.width()
    }

    /// Terminal height.
    pub const fn height(&self) -> u16 {
        self.buffer.height()
    }

    /// The frame being composed.
    pub const fn buffer_mut(&mut self) -> &mut Buffer {
        &mut self.buffer
    }

    /// Input receiver for `select!` loops.
    pub const fn input_receiver(&self) -> &Receiver<InputEvent> {
        &self.input_rx
    }

    /// Send the composed frame for a diff-based update.
    pub fn request_update(&self) {
        let _ = self
            .render_tx
            .send(RenderCommand::Update(Box::new(self.buffer.clone())));
    }

    /// Send the composed frame for a full repaint.
    pub fn request_redraw(&self) {
        let _ = self
            .render_tx
            .send(RenderCommand::FullRedraw(Box::new(self.buffer.clone())));
    }

    /// Track a terminal resize.
    pub fn handle_resize(&mut self, width: u16, height: u16) {
        self.buffer.resize(width, height);
        let _ = self.render_tx.send(RenderCommand::Resize { width, height });
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        if let Some(actor) = self.input_actor.take() {
            actor.join();
        }

        let _ = self.render_tx.send(RenderCommand::Shutdown);
        if let Some(actor) = self.renderer_actor.take() {
            actor.shutdown();
            actor.join();
        }

        // Restore terminal state
        let mut stdout = io::stdout();
        let _ = execute!(stdout, DisableBracketedPaste, cursor::Show);
        if self.config.alternate_screen {
            let _ = execute!(stdout, LeaveAlternateScreen);
        }
        let _ = terminal::disable_raw_mode();
        log::info!("terminal restored");
    }
}
