//! Message types for actor communication.
//!
//! These enums define the protocol between the input, race, render and main
//! threads.

use crate::buffer::Buffer;
use crate::error::RaceError;
use crate::horse::Horse;
use crate::race::RaceOutcome;
use crate::surface::SurfaceUpdate;

/// Key codes for keyboard input.
///
/// The subset of crossterm's `KeyCode` the paddock screens react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A printable character.
    Char(char),
    /// Backspace key.
    Backspace,
    /// Enter/Return key.
    Enter,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Home key.
    Home,
    /// End key.
    End,
    /// Tab key.
    Tab,
    /// Backtab (Shift+Tab).
    BackTab,
    /// Delete key.
    Delete,
    /// Escape key.
    Esc,
}

/// Key modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct KeyModifiers {
    /// Shift key held.
    pub shift: bool,
    /// Control key held.
    pub control: bool,
    /// Alt/Option key held.
    pub alt: bool,
}

impl KeyModifiers {
    /// No modifiers.
    pub const NONE: Self = Self {
        shift: false,
        control: false,
        alt: false,
    };

    /// Only Control.
    pub const CONTROL: Self = Self {
        shift: false,
        control: true,
        alt: false,
    };

    /// Check if any modifier is active.
    pub const fn any(&self) -> bool {
        self.shift || self.control || self.alt
    }
}

/// Events from the input thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// A key was pressed.
    Key {
        /// The key code.
        code: KeyCode,
        /// Modifiers held during keypress.
        modifiers: KeyModifiers,
    },

    /// Terminal was resized.
    Resize {
        /// New width in columns.
        width: u16,
        /// New height in rows.
        height: u16,
    },

    /// Paste event (bracketed paste).
    Paste(String),

    /// Input thread encountered an error.
    Error(String),

    /// Input thread is shutting down.
    Shutdown,
}

impl InputEvent {
    /// A plain key press without modifiers.
    pub const fn key(code: KeyCode) -> Self {
        Self::Key {
            code,
            modifiers: KeyModifiers::NONE,
        }
    }
}

/// Commands sent to the render thread.
#[derive(Debug)]
pub enum RenderCommand {
    /// Repaint every cell of the given frame.
    FullRedraw(Box<Buffer>),

    /// Paint only the cells that differ from the previous frame.
    Update(Box<Buffer>),

    /// Resize the buffers.
    Resize {
        /// New width.
        width: u16,
        /// New height.
        height: u16,
    },

    /// Shutdown the render thread.
    Shutdown,
}

/// Events from the race thread.
#[derive(Debug, Clone, PartialEq)]
pub enum RaceEvent {
    /// The race wrote to its surface.
    Surface(SurfaceUpdate),

    /// The race is over (or never started).
    Finished {
        /// Outcome, or why the race could not run.
        outcome: Result<RaceOutcome, RaceError>,
        /// The horses that ran, keyed by lane, with post-race confidence.
        horses: Vec<(usize, Horse)>,
    },
}

impl From<SurfaceUpdate> for RaceEvent {
    fn from(update: SurfaceUpdate) -> Self {
        Self::Surface(update)
    }
}
