//! Diffing Engine: Generate minimal terminal commands from buffer changes.
//!
//! 1. Compare the current and next buffers cell by cell
//! 2. Queue crossterm commands only for cells that changed
//! 3. Skip cursor moves when the next change is adjacent
//! 4. Track color and attribute state to avoid redundant SGR sequences
//!
//! Everything is queued into one byte buffer that the renderer flushes with a
//! single write.

use super::{Buffer, Cell, Modifiers, Rgb};
use crossterm::cursor::MoveTo;
use crossterm::style::{
    Attribute, Print, SetAttribute, SetBackgroundColor, SetForegroundColor,
};
use crossterm::terminal::{Clear, ClearType};
use crossterm::queue;
use std::io::{self, Write};

/// Terminal state the diff believes is current.
#[derive(Debug, Clone, Default)]
pub struct DiffState {
    cursor: Option<(u16, u16)>,
    fg: Option<Rgb>,
    bg: Option<Rgb>,
    modifiers: Option<Modifiers>,
}

impl DiffState {
    /// Unknown terminal state.
    pub const fn new() -> Self {
        Self {
            cursor: None,
            fg: None,
            bg: None,
            modifiers: None,
        }
    }

    /// Forget everything (e.g., after a full screen clear).
    pub const fn reset(&mut self) {
        self.cursor = None;
        self.fg = None;
        self.bg = None;
        self.modifiers = None;
    }
}

/// Counters from one diff pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffResult {
    /// Cells written.
    pub cells_changed: usize,
    /// Cursor moves queued.
    pub cursor_moves: usize,
    /// Color changes queued.
    pub color_changes: usize,
}

/// Queue commands turning `current` into `next`.
///
/// Both buffers must have the same dimensions; otherwise `next` is drawn in
/// full.
pub fn render_diff<W: Write>(
    current: &Buffer,
    next: &Buffer,
    out: &mut W,
    state: &mut DiffState,
) -> io::Result<DiffResult> {
    if current.width() != next.width() || current.height() != next.height() {
        return render_full(next, out, state);
    }

    let mut result = DiffResult::default();
    let width = usize::from(next.width().max(1));
    for (idx, (old, new)) in current.cells().iter().zip(next.cells()).enumerate() {
        if old == new || new.is_continuation() {
            continue;
        }
        #[allow(clippy::cast_possible_truncation)]
        let (x, y) = ((idx % width) as u16, (idx / width) as u16);
        write_cell(out, x, y, new, state, &mut result)?;
    }
    Ok(result)
}

/// Clear the screen and queue every cell of `next`.
pub fn render_full<W: Write>(
    next: &Buffer,
    out: &mut W,
    state: &mut DiffState,
) -> io::Result<DiffResult> {
    queue!(out, SetAttribute(Attribute::Reset), Clear(ClearType::All))?;
    state.reset();

    let mut result = DiffResult::default();
    let width = usize::from(next.width().max(1));
    for (idx, cell) in next.cells().iter().enumerate() {
        if cell.is_continuation() {
            continue;
        }
        #[allow(clippy::cast_possible_truncation)]
        let (x, y) = ((idx % width) as u16, (idx / width) as u16);
        write_cell(out, x, y, cell, state, &mut result)?;
    }
    Ok(result)
}

fn write_cell<W: Write>(
    out: &mut W,
    x: u16,
    y: u16,
    cell: &Cell,
    state: &mut DiffState,
    result: &mut DiffResult,
) -> io::Result<()> {
    result.cells_changed += 1;

    if state.cursor != Some((x, y)) {
        queue!(out, MoveTo(x, y))?;
        result.cursor_moves += 1;
    }

    // Dropping an attribute needs a full reset, which also drops colors.
    let mods = cell.modifiers();
    let active = state.modifiers.unwrap_or_else(Modifiers::empty);
    if state.modifiers.is_none() || !active.difference(mods).is_empty() {
        queue!(out, SetAttribute(Attribute::Reset))?;
        state.fg = None;
        state.bg = None;
        queue_modifiers(out, mods)?;
        state.modifiers = Some(mods);
    } else if active != mods {
        queue_modifiers(out, mods.difference(active))?;
        state.modifiers = Some(mods);
    }

    if state.fg != Some(cell.fg()) {
        queue!(out, SetForegroundColor(cell.fg().into()))?;
        state.fg = Some(cell.fg());
        result.color_changes += 1;
    }
    if state.bg != Some(cell.bg()) {
        queue!(out, SetBackgroundColor(cell.bg().into()))?;
        state.bg = Some(cell.bg());
        result.color_changes += 1;
    }

    queue!(out, Print(cell.ch()))?;
    state.cursor = Some((x + u16::from(cell.width()), y));
    Ok(())
}

fn queue_modifiers<W: Write>(out: &mut W, mods: Modifiers) -> io::Result<()> {
    for (flag, attribute) in [
        (Modifiers::BOLD, Attribute::Bold),
        (Modifiers::DIM, Attribute::Dim),
        (Modifiers::UNDERLINE, Attribute::Underlined),
        (Modifiers::REVERSED, Attribute::Reverse),
    ] {
        if mods.contains(flag) {
            queue!(out, SetAttribute(attribute))?;
        }
    }
    Ok(())
}
