//! Output surfaces: where a race writes its frames.
//!
//! A surface is a plain text sink with two operations, `clear` and `append`.
//! The race is the only writer. Three sinks are provided:
//!
//! - [`TextSurface`]: an in-memory string, used by tests and by the UI to
//!   hold what it has been sent.
//! - [`ChannelSurface`]: forwards every operation as a [`SurfaceUpdate`]
//!   message, so a race on a background thread never shares memory with the
//!   presentation thread.
//! - [`StdoutSurface`]: writes frames to a terminal for headless runs.

use crossbeam_channel::Sender;
use std::io::{self, Write};

/// A text sink a race renders into.
pub trait OutputSurface {
    /// Discard everything shown so far.
    fn clear(&mut self);

    /// Append text after the current content.
    fn append(&mut self, text: &str);
}

impl<S: OutputSurface + ?Sized> OutputSurface for &mut S {
    fn clear(&mut self) {
        (**self).clear();
    }

    fn append(&mut self, text: &str) {
        (**self).append(text);
    }
}

impl<S: OutputSurface + ?Sized> OutputSurface for Box<S> {
    fn clear(&mut self) {
        (**self).clear();
    }

    fn append(&mut self, text: &str) {
        (**self).append(text);
    }
}

/// An in-memory text area.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextSurface {
    text: String,
}

impl TextSurface {
    /// Empty surface.
    pub const fn new() -> Self {
        Self {
            text: String::new(),
        }
    }

    /// Current content.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Iterate over content lines.
    pub fn lines(&self) -> std::str::Lines<'_> {
        self.text.lines()
    }

    /// Replace the content entirely.
    pub fn set_text(&mut self, text: &str) {
        self.text.clear();
        self.text.push_str(text);
    }

    /// Apply an update received from a [`ChannelSurface`].
    pub fn apply(&mut self, update: SurfaceUpdate) {
        match update {
            SurfaceUpdate::Clear => self.clear(),
            SurfaceUpdate::Append(text) => self.append(&text),
        }
    }
}

impl OutputSurface for TextSurface {
    fn clear(&mut self) {
        self.text.clear();
    }

    fn append(&mut self, text: &str) {
        self.text.push_str(text);
    }
}

/// One surface operation, in transit between threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceUpdate {
    /// Clear the receiving text area.
    Clear,
    /// Append to the receiving text area.
    Append(String),
}

/// Surface that forwards operations over a channel.
///
/// Sends are fire-and-forget: if the receiver has gone away the race keeps
/// running and its output is dropped.
#[derive(Debug, Clone)]
pub struct ChannelSurface<T> {
    sender: Sender<T>,
}

impl<T: From<SurfaceUpdate>> ChannelSurface<T> {
    /// Forward updates into `sender`, wrapped into the channel's message type.
    pub const fn new(sender: Sender<T>) -> Self {
        Self { sender }
    }

    fn send(&self, update: SurfaceUpdate) {
        if self.sender.send(T::from(update)).is_err() {
            log::trace!("surface receiver dropped; discarding update");
        }
    }
}

impl<T: From<SurfaceUpdate>> OutputSurface for ChannelSurface<T> {
    fn clear(&mut self) {
        self.send(SurfaceUpdate::Clear);
    }

    fn append(&mut self, text: &str) {
        self.send(SurfaceUpdate::Append(text.to_string()));
    }
}

/// Surface that draws on a terminal.
///
/// `clear` wipes the screen and homes the cursor, so each frame overwrites
/// the previous one.
pub struct StdoutSurface<W: Write = io::Stdout> {
    out: W,
}

impl StdoutSurface {
    /// Surface over the process stdout.
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> StdoutSurface<W> {
    /// Surface over any writer.
    pub const fn new(out: W) -> Self {
        Self { out }
    }

    /// Give back the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write(&mut self, bytes: &[u8]) {
        if let Err(e) = self.out.write_all(bytes).and_then(|()| self.out.flush()) {
            log::warn!("failed to write race output: {e}");
        }
    }
}

impl<W: Write> OutputSurface for StdoutSurface<W> {
    fn clear(&mut self) {
        self.write(b"\x1b[2J\x1b[H");
    }

    fn append(&mut self, text: &str) {
        self.write(text.as_bytes());
    }
}
