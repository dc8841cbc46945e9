//! Status Bar Widget: one line with a notice on the left and the race state
//! on the right.

use super::traits::Widget;
use crate::buffer::{Buffer, Cell, Modifiers, Rgb, Style};
use crate::layout::Rect;

/// How loudly a notice is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    /// Neutral information.
    #[default]
    Info,
    /// Something the user should fix (e.g., too few horses).
    Warning,
    /// Something went wrong.
    Error,
}

/// Configuration for the status bar widget.
#[derive(Debug, Clone)]
pub struct StatusBarConfig {
    /// Background color.
    pub bg: Rgb,
    /// Info notice color.
    pub info_fg: Rgb,
    /// Warning notice color.
    pub warning_fg: Rgb,
    /// Error notice color.
    pub error_fg: Rgb,
    /// Right section color.
    pub right_fg: Rgb,
}

impl Default for StatusBarConfig {
    fn default() -> Self {
        Self {
            bg: Rgb::new(40, 40, 40),
            info_fg: Rgb::new(200, 200, 200),
            warning_fg: Rgb::new(240, 190, 60),
            error_fg: Rgb::new(240, 80, 80),
            right_fg: Rgb::new(100, 200, 100),
        }
    }
}

/// A notice line with a right-aligned state label.
#[derive(Debug)]
pub struct StatusBar {
    notice: String,
    severity: Severity,
    right: String,
    bounds: Rect,
    config: StatusBarConfig,
    dirty: bool,
}

impl StatusBar {
    /// Create a new status bar with the given bounds.
    pub fn new(bounds: Rect) -> Self {
        Self {
            notice: String::new(),
            severity: Severity::Info,
            right: String::new(),
            bounds,
            config: StatusBarConfig::default(),
            dirty: true,
        }
    }

    /// Show a notice.
    pub fn set_notice(&mut self, severity: Severity, text: impl Into<String>) {
        self.notice = text.into();
        self.severity = severity;
        self.dirty = true;
    }

    /// Set the right section content.
    pub fn set_right(&mut self, text: impl Into<String>) {
        self.right = text.into();
        self.dirty = true;
    }

    /// Current notice.
    pub fn notice(&self) -> &str {
        &self.notice
    }

    /// Severity of the current notice.
    pub const fn severity(&self) -> Severity {
        self.severity
    }

    /// Right section content.
    pub fn right(&self) -> &str {
        &self.right
    }
}

impl Widget for StatusBar {
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
        let Rect { x, y, width, .. } = self.bounds;
        let bg = self.config.bg;
        buffer.fill(self.bounds, Cell::new(' ').with_bg(bg));

        // Right section first so the notice can't overwrite it.
        let right_width = u16::try_from(self.right.chars().count())
            .unwrap_or(width)
            .min(width / 2);
        let right_start = x + width - right_width;
        buffer.put_str(
            right_start,
            y,
            x + width,
            &self.right,
            Style::new(self.config.right_fg, bg),
        );

        let (fg, modifiers) = match self.severity {
            Severity::Info => (self.config.info_fg, Modifiers::empty()),
            Severity::Warning => (self.config.warning_fg, Modifiers::BOLD),
            Severity::Error => (self.config.error_fg, Modifiers::BOLD),
        };
        buffer.put_str(
            x + 1,
            y,
            right_start.saturating_sub(1),
            &self.notice,
            Style::new(fg, bg).with_modifiers(modifiers),
        );
    }

    fn needs_redraw(&self) -> bool {
        self.dirty
    }

    fn clear_redraw(&mut self) {
        self.dirty = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_bar_layout() {
        let mut bar = StatusBar::new(Rect::new(0, 0, 30, 1));
        bar.set_notice(Severity::Warning, "Too few horses");
        bar.set_right("idle");

        let mut buffer = Buffer::new(30, 1);
        bar.render(&mut buffer);
        assert_eq!(buffer.row_text(0), " Too few horses           idle");
        assert_eq!(bar.severity(), Severity::Warning);
        assert!(buffer.get(1, 0).unwrap().modifiers().contains(Modifiers::BOLD));
    }

    #[test]
    fn test_status_bar_truncates_long_notice() {
        let mut bar = StatusBar::new(Rect::new(0, 0, 20, 1));
        bar.set_notice(Severity::Info, "a very long message that cannot fit");
        bar.set_right("running");

        let mut buffer = Buffer::new(20, 1);
        bar.render(&mut buffer);
        assert!(buffer.row_text(0).ends_with(" running"));
    }
}
