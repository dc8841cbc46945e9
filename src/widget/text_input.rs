//! Text Input Widget: Single-line text field with cursor.
//!
//! Used for the race length and the horse name. An optional character
//! filter and length cap restrict what can be typed.

use super::traits::Widget;
use crate::actor::{InputEvent, KeyCode};
use crate::buffer::{Buffer, Cell, Modifiers, Rgb, Style};
use crate::layout::Rect;

/// Configuration for the text input widget.
#[derive(Debug, Clone)]
pub struct TextInputConfig {
    /// Label drawn before the field (e.g., "Length: ").
    pub prompt: String,
    /// Placeholder text shown when empty.
    pub placeholder: String,
    /// Maximum number of characters.
    pub max_chars: usize,
    /// Characters the field accepts.
    pub accept: fn(char) -> bool,
    /// Text colors.
    pub style: Style,
    /// Prompt colors.
    pub prompt_style: Style,
    /// Placeholder colors.
    pub placeholder_fg: Rgb,
}

impl Default for TextInputConfig {
    fn default() -> Self {
        Self {
            prompt: String::new(),
            placeholder: String::new(),
            max_chars: 32,
            accept: |c| !c.is_control(),
            style: Style::new(Rgb::WHITE, Rgb::new(30, 30, 30)),
            prompt_style: Style::new(Rgb::new(0, 200, 200), Rgb::DEFAULT_BG),
            placeholder_fg: Rgb::new(100, 100, 100),
        }
    }
}

impl TextInputConfig {
    /// A field that only takes ASCII digits.
    pub fn numeric(prompt: impl Into<String>, max_chars: usize) -> Self {
        Self {
            prompt: prompt.into(),
            max_chars,
            accept: |c| c.is_ascii_digit(),
            ..Self::default()
        }
    }
}

/// A single-line text input widget.
#[derive(Debug)]
pub struct TextInput {
    /// Current content.
    content: String,
    /// Cursor position in characters.
    cursor: usize,
    bounds: Rect,
    focused: bool,
    config: TextInputConfig,
    dirty: bool,
}

impl TextInput {
    /// Create a text input with custom configuration.
    pub const fn with_config(bounds: Rect, config: TextInputConfig) -> Self {
        Self {
            content: String::new(),
            cursor: 0,
            bounds,
            focused: false,
            config,
            dirty: true,
        }
    }

    /// Get the current text content.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Replace the content, dropping rejected characters, cursor at end.
    pub fn set_content(&mut self, content: &str) {
        self.content = content
            .chars()
            .filter(|&c| (self.config.accept)(c))
            .take(self.config.max_chars)
            .collect();
        self.cursor = self.content.chars().count();
        self.dirty = true;
    }

    /// Clear the content.
    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor = 0;
        self.dirty = true;
    }

    /// Check if the input is empty.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Set focus state.
    pub const fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
        self.dirty = true;
    }

    /// Check if focused.
    pub const fn is_focused(&self) -> bool {
        self.focused
    }

    fn byte_offset(&self, char_pos: usize) -> usize {
        self.content
            .char_indices()
            .nth(char_pos)
            .map_or(self.content.len(), |(i, _)| i)
    }

    fn insert_char(&mut self, c: char) -> bool {
        if !(self.config.accept)(c) || self.content.chars().count() >= self.config.max_chars {
            return false;
        }
        let at = self.byte_offset(self.cursor);
        self.content.insert(at, c);
        self.cursor += 1;
        self.dirty = true;
        true
    }

    fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = self.byte_offset(self.cursor);
            self.content.remove(at);
            self.dirty = true;
        }
    }

    fn delete(&mut self) {
        if self.cursor < self.content.chars().count() {
            let at = self.byte_offset(self.cursor);
            self.content.remove(at);
            self.dirty = true;
        }
    }

    fn move_cursor(&mut self, to: usize) {
        let to = to.min(self.content.chars().count());
        if to != self.cursor {
            self.cursor = to;
            self.dirty = true;
        }
    }
}

impl Widget for TextInput {
    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
        self.dirty = true;
    }

    fn render(&self, buffer: &mut Buffer) {
        if self.bounds.is_empty() {
            return;
        }
        let Rect { x, y, .. } = self.bounds;
        let right = self.bounds.right();

        let text_start = buffer.put_str(x, y, right, &self.config.prompt, self.config.prompt_style);
        let field = Rect::new(text_start, y, right.saturating_sub(text_start), 1);
        buffer.fill(field, Cell::new(' ').with_bg(self.config.style.bg));

        if self.content.is_empty() {
            let hint = Style::new(self.config.placeholder_fg, self.config.style.bg);
            buffer.put_str(text_start, y, right, &self.config.placeholder, hint);
        } else {
            // Scroll so the cursor stays visible.
            let visible = usize::from(field.width.saturating_sub(1)).max(1);
            let skip = self.cursor.saturating_sub(visible);
            let shown: String = self.content.chars().skip(skip).collect();
            buffer.put_str(text_start, y, right, &shown, self.config.style);
        }

        if self.focused && field.width > 0 {
            let visible = usize::from(field.width.saturating_sub(1)).max(1);
            let offset = self.cursor.min(visible);
            #[allow(clippy::cast_possible_truncation)]
            let cx = text_start + offset as u16;
            let under = buffer.get(cx, y).map_or(' ', Cell::ch);
            let cursor_cell = Cell::new(under)
                .with_fg(self.config.style.fg)
                .with_bg(self.config.style.bg)
                .with_modifiers(Modifiers::REVERSED);
            buffer.set(cx, y, cursor_cell);
        }
    }

    fn handle_input(&mut self, event: &InputEvent) -> bool {
        if !self.focused {
            return false;
        }

        match event {
            InputEvent::Key { code, modifiers } => match code {
                KeyCode::Char(c) if !modifiers.control && !modifiers.alt => self.insert_char(*c),
                KeyCode::Backspace => {
                    self.backspace();
                    true
                }
                KeyCode::Delete => {
                    self.delete();
                    true
                }
                KeyCode::Left => {
                    self.move_cursor(self.cursor.saturating_sub(1));
                    true
                }
                KeyCode::Right => {
                    self.move_cursor(self.cursor + 1);
                    true
                }
                KeyCode::Home => {
                    self.move_cursor(0);
                    true
                }
                KeyCode::End => {
                    self.move_cursor(usize::MAX);
                    true
                }
                _ => false,
            },
            InputEvent::Paste(text) => {
                let mut any = false;
                for c in text.chars() {
                    any |= self.insert_char(c);
                }
                any
            }
            _ => false,
        }
    }

    fn needs_redraw(&self) -> bool {
        self.dirty
    }

    fn clear_redraw(&mut self) {
        self.dirty = false;
    }
}
