//! Roster Widget: the list of horses entered so far.
//!
//! Horse `n` (1-based) races in lane `n`. Horses past the last lane are
//! still listed but marked as having no lane.

use super::traits::Widget;
use crate::buffer::{Buffer, Cell, Modifiers, Rgb, Style};
use crate::horse::Horse;
use crate::layout::Rect;
use crate::race::LANE_COUNT;

const BG: Rgb = Rgb::new(28, 28, 36);
const HEADER: Style = Style::new(Rgb::new(150, 180, 255), BG);
const ENTRY: Style = Style::new(Rgb::new(220, 220, 220), BG);
const BENCHED: Style = Style::new(Rgb::new(120, 120, 120), BG);

/// Side panel listing horses with their lanes.
#[derive(Debug)]
pub struct RosterView {
    horses: Vec<Horse>,
    bounds: Rect,
    dirty: bool,
}

impl RosterView {
    /// Empty roster.
    pub const fn new(bounds: Rect) -> Self {
        Self {
            horses: Vec::new(),
            bounds,
            dirty: true,
        }
    }

    /// Replace the listed horses.
    pub fn set_horses(&mut self, horses: &[Horse]) {
        self.horses.clear();
        self.horses.extend_from_slice(horses);
        self.dirty = true;
    }

    /// Listed horses.
    pub fn horses(&self) -> &[Horse] {
        &self.horses
    }

    fn entry_line(index: usize, horse: &Horse) -> String {
        let lane = index + 1;
        if lane <= LANE_COUNT {
            format!(
                "{lane} {} {} ({:.1})",
                horse.symbol(),
                horse.name(),
                horse.confidence()
            )
        } else {
            format!("- {} {} (no lane)", horse.symbol(), horse.name())
        }
    }
}

impl Widget for RosterView {
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
        buffer.fill(self.bounds, Cell::new(' ').with_bg(BG));

        let Rect { x, y, .. } = self.bounds;
        let right = self.bounds.right();
        let title = format!("Horses ({})", self.horses.len());
        buffer.put_str(
            x + 1,
            y,
            right,
            &title,
            HEADER.with_modifiers(Modifiers::BOLD),
        );

        let rows = usize::from(self.bounds.height.saturating_sub(1));
        for (index, horse) in self.horses.iter().enumerate().take(rows) {
            let style = if index < LANE_COUNT { ENTRY } else { BENCHED };
            #[allow(clippy::cast_possible_truncation)]
            let row = y + 1 + index as u16;
            buffer.put_str(x + 1, row, right, &Self::entry_line(index, horse), style);
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
    fn test_roster_marks_horses_without_lane() {
        let horses: Vec<Horse> = ["Ace", "Bee", "Cob", "Dun"]
            .iter()
            .map(|name| Horse::new('H', *name, 0.5))
            .collect();
        let mut roster = RosterView::new(Rect::new(0, 0, 30, 6));
        roster.set_horses(&horses);

        let mut buffer = Buffer::new(30, 6);
        roster.render(&mut buffer);
        assert_eq!(buffer.row_text(0).trim_end(), " Horses (4)");
        assert_eq!(buffer.row_text(1).trim_end(), " 1 H Ace (0.5)");
        assert_eq!(buffer.row_text(3).trim_end(), " 3 H Cob (0.5)");
        assert_eq!(buffer.row_text(4).trim_end(), " - H Dun (no lane)");
    }

    #[test]
    fn test_roster_clips_to_height() {
        let horses = vec![Horse::new('H', "Ace", 0.5); 10];
        let mut roster = RosterView::new(Rect::new(0, 0, 20, 3));
        roster.set_horses(&horses);

        let mut buffer = Buffer::new(20, 4);
        roster.render(&mut buffer);
        assert_eq!(buffer.row_text(3).trim(), "");
    }
}
