//! Layout module: rectangle math and the fixed screen layout.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ header: title, race length field, key hints   │
//! ├───────────────────────────────┬──────────────┤
//! │ track: race text area         │ roster       │
//! │                               │              │
//! ├───────────────────────────────┴──────────────┤
//! │ status bar: notices and race state            │
//! └──────────────────────────────────────────────┘
//! ```

mod rect;

pub use rect::Rect;

/// Preferred roster column width.
const ROSTER_WIDTH: u16 = 30;

/// Screen regions for the paddock UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppLayout {
    /// Top line: title and race length.
    pub header: Rect,
    /// Race text area.
    pub track: Rect,
    /// Horse list.
    pub roster: Rect,
    /// Bottom line.
    pub status: Rect,
}

impl AppLayout {
    /// Compute regions for a terminal of the given size.
    ///
    /// The roster column is dropped when the terminal is too narrow.
    pub fn compute(width: u16, height: u16) -> Self {
        let screen = Rect::from_size(width, height);
        let (header, rest) = screen.split_vertical(1);
        let (body, status) = rest.split_vertical(rest.height.saturating_sub(1));

        let roster_width = if width >= ROSTER_WIDTH * 2 {
            ROSTER_WIDTH
        } else {
            0
        };
        let (track, roster) = body.split_horizontal(body.width - roster_width);

        Self {
            header,
            track,
            roster,
            status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_standard_terminal() {
        let layout = AppLayout::compute(80, 24);
        assert_eq!(layout.header, Rect::new(0, 0, 80, 1));
        assert_eq!(layout.track, Rect::new(0, 1, 50, 22));
        assert_eq!(layout.roster, Rect::new(50, 1, 30, 22));
        assert_eq!(layout.status, Rect::new(0, 23, 80, 1));
    }

    #[test]
    fn test_layout_narrow_terminal_hides_roster() {
        let layout = AppLayout::compute(40, 10);
        assert!(layout.roster.is_empty());
        assert_eq!(layout.track.width, 40);
    }

    #[test]
    fn test_layout_tiny_terminal_does_not_panic() {
        let layout = AppLayout::compute(0, 0);
        assert!(layout.track.is_empty());
        let layout = AppLayout::compute(5, 1);
        assert!(layout.status.is_empty() || layout.track.is_empty());
    }
}
