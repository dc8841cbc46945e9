//! Track View Widget: the text area the race draws into.
//!
//! The view keeps a local [`TextSurface`] and applies the updates that
//! arrive from the race thread. When the text is taller than the view the
//! most recent lines are shown, so the winner announcement below a frame is
//! never scrolled away.

use super::traits::Widget;
use crate::buffer::{Buffer, Cell, Rgb, Style};
use crate::layout::Rect;
use crate::surface::{OutputSurface, SurfaceUpdate, TextSurface};

const TEXT_STYLE: Style = Style::new(Rgb::new(230, 230, 230), Rgb::new(20, 20, 20));

/// Read-only text area fed by a race.
#[derive(Debug)]
pub struct TrackView {
    surface: TextSurface,
    bounds: Rect,
    dirty: bool,
}

impl TrackView {
    /// Empty view.
    pub const fn new(bounds: Rect) -> Self {
        Self {
            surface: TextSurface::new(),
            bounds,
            dirty: true,
        }
    }

    /// Apply an update from the race.
    pub fn apply(&mut self, update: SurfaceUpdate) {
        self.surface.apply(update);
        self.dirty = true;
    }

    /// Replace the content with a message.
    pub fn set_text(&mut self, text: &str) {
        self.surface.set_text(text);
        self.dirty = true;
    }

    /// Current content.
    pub fn text(&self) -> &str {
        self.surface.text()
    }
}

impl OutputSurface for TrackView {
    fn clear(&mut self) {
        self.apply(SurfaceUpdate::Clear);
    }

    fn append(&mut self, text: &str) {
        self.surface.append(text);
        self.dirty = true;
    }
}

impl Widget for TrackView {
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
        buffer.fill(self.bounds, Cell::new(' ').with_bg(TEXT_STYLE.bg));

        let inner = self.bounds.shrink(1);
        if inner.is_empty() {
            return;
        }
        let lines: Vec<&str> = self.surface.lines().collect();
        let skip = lines.len().saturating_sub(usize::from(inner.height));
        for (row, line) in lines.iter().skip(skip).enumerate() {
            #[allow(clippy::cast_possible_truncation)]
            let y = inner.y + row as u16;
            buffer.put_str(inner.x, y, inner.right(), line, TEXT_STYLE);
        }
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
    fn test_track_view_applies_updates() {
        let mut view = TrackView::new(Rect::new(0, 0, 20, 6));
        view.apply(SurfaceUpdate::Append("old".into()));
        view.apply(SurfaceUpdate::Clear);
        view.apply(SurfaceUpdate::Append("==\n|H  |\n".into()));
        assert_eq!(view.text(), "==\n|H  |\n");

        let mut buffer = Buffer::new(20, 6);
        view.render(&mut buffer);
        assert!(buffer.row_text(1).starts_with(" =="));
        assert!(buffer.row_text(2).starts_with(" |H  |"));
    }

    #[test]
    fn test_track_view_as_race_surface() {
        let mut view = TrackView::new(Rect::new(0, 0, 20, 6));
        view.clear_redraw();
        {
            let surface: &mut dyn OutputSurface = &mut view;
            surface.append("stale");
            surface.clear();
            surface.append("And the winner is Ace");
        }
        assert_eq!(view.text(), "And the winner is Ace");
        assert!(view.needs_redraw());
    }

    #[test]
    fn test_track_view_shows_tail_when_tall() {
        let mut view = TrackView::new(Rect::new(0, 0, 10, 4));
        view.set_text("1\n2\n3\n4\n5");

        let mut buffer = Buffer::new(10, 4);
        view.render(&mut buffer);
        assert!(buffer.row_text(1).starts_with(" 4"));
        assert!(buffer.row_text(2).starts_with(" 5"));
    }
}
