//! Horse Form Widget: a small dialog for entering a new horse.
//!
//! ```text
//! ┌ Add a Horse ───────────────┐
//! │ Name:       Pegasus_       │
//! │ Symbol:     ◀ ♘ ▶          │
//! │ Confidence: ◀ 0.5 ▶        │
//! │ Enter add · Esc cancel     │
//! └────────────────────────────┘
//! ```
//!
//! Tab and Shift-Tab move between fields. Left/Right cycle the symbol,
//! Up/Down step the confidence by a tenth.

use super::text_input::{TextInput, TextInputConfig};
use super::traits::Widget;
use crate::actor::{InputEvent, KeyCode};
use crate::buffer::{Buffer, Cell, Modifiers, Rgb, Style};
use crate::horse::Horse;
use crate::layout::Rect;

/// Dialog size including the frame.
pub const FORM_WIDTH: u16 = 36;
/// Dialog height including the frame.
pub const FORM_HEIGHT: u16 = 6;

const LABEL_WIDTH: u16 = 13;
const FRAME: Style = Style::new(Rgb::new(150, 180, 255), Rgb::new(25, 25, 45));
const LABEL: Style = Style::new(Rgb::new(200, 200, 200), Rgb::new(25, 25, 45));
const HINT: Style = Style::new(Rgb::new(120, 120, 140), Rgb::new(25, 25, 45));

/// Which field has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    /// Name text field.
    Name,
    /// Symbol picker.
    Symbol,
    /// Confidence spinner.
    Confidence,
}

impl FormField {
    const fn next(self) -> Self {
        match self {
            Self::Name => Self::Symbol,
            Self::Symbol => Self::Confidence,
            Self::Confidence => Self::Name,
        }
    }

    const fn prev(self) -> Self {
        match self {
            Self::Name => Self::Confidence,
            Self::Symbol => Self::Name,
            Self::Confidence => Self::Symbol,
        }
    }
}

/// What a key press did to the form.
#[derive(Debug, Clone, PartialEq)]
pub enum FormOutcome {
    /// Not for the form.
    Ignored,
    /// Handled, form still open.
    Consumed,
    /// The user confirmed a horse.
    Submitted(Horse),
    /// The user closed the form.
    Cancelled,
    /// Enter was pressed but the entry is incomplete.
    Rejected(&'static str),
}

/// New-horse dialog.
#[derive(Debug)]
pub struct HorseForm {
    name: TextInput,
    symbols: Vec<char>,
    symbol_index: usize,
    /// Confidence in tenths, `0..=10`.
    confidence_tenths: u8,
    focus: FormField,
    bounds: Rect,
    dirty: bool,
}

impl HorseForm {
    /// Form offering `symbols`, starting at `default_confidence`.
    ///
    /// An empty symbol list falls back to `'H'`.
    pub fn new(bounds: Rect, symbols: &[char], default_confidence: f64) -> Self {
        let symbols = if symbols.is_empty() {
            vec!['H']
        } else {
            symbols.to_vec()
        };
        let mut name = TextInput::with_config(
            Rect::ZERO,
            TextInputConfig {
                max_chars: 24,
                ..TextInputConfig::default()
            },
        );
        name.set_focused(true);

        let mut form = Self {
            name,
            symbols,
            symbol_index: 0,
            confidence_tenths: to_tenths(default_confidence),
            focus: FormField::Name,
            bounds,
            dirty: true,
        };
        form.set_bounds(bounds);
        form
    }

    /// Field with focus.
    pub const fn focus(&self) -> FormField {
        self.focus
    }

    /// Selected symbol.
    pub fn symbol(&self) -> char {
        self.symbols[self.symbol_index]
    }

    /// Selected confidence.
    pub fn confidence(&self) -> f64 {
        f64::from(self.confidence_tenths) / 10.0
    }

    /// Name typed so far.
    pub fn name(&self) -> &str {
        self.name.content()
    }

    /// React to one input event.
    pub fn handle_key(&mut self, event: &InputEvent) -> FormOutcome {
        let InputEvent::Key { code, .. } = event else {
            return self.forward_to_name(event);
        };

        match code {
            KeyCode::Esc => return FormOutcome::Cancelled,
            KeyCode::Enter => return self.submit(),
            KeyCode::Tab => self.set_focus(self.focus.next()),
            KeyCode::BackTab => self.set_focus(self.focus.prev()),
            _ => match self.focus {
                FormField::Name => return self.forward_to_name(event),
                FormField::Symbol => match code {
                    KeyCode::Left => {
                        self.symbol_index =
                            (self.symbol_index + self.symbols.len() - 1) % self.symbols.len();
                    }
                    KeyCode::Right | KeyCode::Char(' ') => {
                        self.symbol_index = (self.symbol_index + 1) % self.symbols.len();
                    }
                    _ => return FormOutcome::Ignored,
                },
                FormField::Confidence => match code {
                    KeyCode::Up | KeyCode::Right => {
                        self.confidence_tenths = (self.confidence_tenths + 1).min(10);
                    }
                    KeyCode::Down | KeyCode::Left => {
                        self.confidence_tenths = self.confidence_tenths.saturating_sub(1);
                    }
                    _ => return FormOutcome::Ignored,
                },
            },
        }
        self.dirty = true;
        FormOutcome::Consumed
    }

    fn forward_to_name(&mut self, event: &InputEvent) -> FormOutcome {
        if self.focus == FormField::Name && self.name.handle_input(event) {
            self.dirty = true;
            FormOutcome::Consumed
        } else {
            FormOutcome::Ignored
        }
    }

    fn set_focus(&mut self, field: FormField) {
        self.focus = field;
        self.name.set_focused(field == FormField::Name);
    }

    fn submit(&mut self) -> FormOutcome {
        let name = self.name.content().trim();
        if name.is_empty() {
            self.set_focus(FormField::Name);
            self.dirty = true;
            return FormOutcome::Rejected("A horse needs a name.");
        }
        FormOutcome::Submitted(Horse::new(self.symbol(), name, self.confidence()))
    }

    fn render_row(&self, buffer: &mut Buffer, row: u16, label: &str, field: FormField, value: &str) {
        let inner = self.bounds.shrink(1);
        let y = inner.y + row;
        buffer.put_str(inner.x + 1, y, inner.right(), label, LABEL);
        let value_style = if self.focus == field {
            LABEL.with_modifiers(Modifiers::BOLD | Modifiers::REVERSED)
        } else {
            LABEL
        };
        buffer.put_str(inner.x + 1 + LABEL_WIDTH, y, inner.right(), value, value_style);
    }
}

impl Widget for HorseForm {
    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
        let inner = bounds.shrink(1);
        self.name.set_bounds(Rect::new(
            inner.x + 1 + LABEL_WIDTH,
            inner.y,
            inner.width.saturating_sub(LABEL_WIDTH + 2),
            u16::from(!inner.is_empty()),
        ));
        self.dirty = true;
    }

    fn render(&self, buffer: &mut Buffer) {
        let inner = self.bounds.shrink(1);
        if inner.is_empty() || inner.height < 4 {
            return;
        }
        buffer.fill(self.bounds, Cell::new(' ').with_bg(FRAME.bg));
        draw_frame(buffer, self.bounds, " Add a Horse ");

        buffer.put_str(inner.x + 1, inner.y, inner.right(), "Name:", LABEL);
        self.name.render(buffer);
        self.render_row(
            buffer,
            1,
            "Symbol:",
            FormField::Symbol,
            &format!("◀ {} ▶", self.symbol()),
        );
        self.render_row(
            buffer,
            2,
            "Confidence:",
            FormField::Confidence,
            &format!("◀ {:.1} ▶", self.confidence()),
        );
        buffer.put_str(
            inner.x + 1,
            inner.y + 3,
            inner.right(),
            "Enter add · Tab next · Esc cancel",
            HINT,
        );
    }

    fn handle_input(&mut self, event: &InputEvent) -> bool {
        !matches!(self.handle_key(event), FormOutcome::Ignored)
    }

    fn needs_redraw(&self) -> bool {
        self.dirty || self.name.needs_redraw()
    }

    fn clear_redraw(&mut self) {
        self.dirty = false;
        self.name.clear_redraw();
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_tenths(confidence: f64) -> u8 {
    if confidence.is_nan() {
        return 0;
    }
    (confidence.clamp(0.0, 1.0) * 10.0).round() as u8
}

fn draw_frame(buffer: &mut Buffer, rect: Rect, title: &str) {
    if rect.width < 2 || rect.height < 2 {
        return;
    }
    let right = rect.right() - 1;
    let bottom = rect.bottom() - 1;
    for x in rect.x + 1..right {
        buffer.set(x, rect.y, frame_cell('─'));
        buffer.set(x, bottom, frame_cell('─'));
    }
    for y in rect.y + 1..bottom {
        buffer.set(rect.x, y, frame_cell('│'));
        buffer.set(right, y, frame_cell('│'));
    }
    buffer.set(rect.x, rect.y, frame_cell('┌'));
    buffer.set(right, rect.y, frame_cell('┐'));
    buffer.set(rect.x, bottom, frame_cell('└'));
    buffer.set(right, bottom, frame_cell('┘'));
    buffer.put_str(rect.x + 2, rect.y, right, title, FRAME);
}

const fn frame_cell(ch: char) -> Cell {
    Cell::new(ch).with_fg(FRAME.fg).with_bg(FRAME.bg)
}
