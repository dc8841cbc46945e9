//! Text rendering of a race frame.
//!
//! ```text
//! ==========
//! |   ♘                |Pegasus (Current Confidence 0.6)
//! |        X           |Bucephalus (Current Confidence 0.4)
//! |                      |
//! ==========
//! ```
//!
//! The top and bottom edges are `length / 2` wide. Every frame has exactly
//! three lanes between them; an empty lane is drawn as a blank row.

use super::lanes::{Lanes, LANE_COUNT};
use crate::horse::Horse;
use std::fmt::Write;

/// Character used for the top and bottom edges.
pub const EDGE: char = '=';

/// Character used for the lane walls.
pub const WALL: char = '|';

/// Render a full frame, one trailing newline per line.
pub fn render_frame(lanes: &Lanes, length: u32) -> String {
    let mut frame = String::with_capacity((length as usize + 48) * (LANE_COUNT + 2));

    push_edge(&mut frame, length);
    for (_, slot) in lanes.slots() {
        match slot {
            Some(horse) => push_lane(&mut frame, horse, length),
            None => push_empty_lane(&mut frame, length),
        }
        frame.push('\n');
    }
    push_edge(&mut frame, length);

    frame
}

/// One occupied lane without the trailing newline.
pub fn render_lane(horse: &Horse, length: u32) -> String {
    let mut row = String::new();
    push_lane(&mut row, horse, length);
    row
}

fn push_edge(out: &mut String, length: u32) {
    push_repeated(out, EDGE, length as usize / 2);
    out.push('\n');
}

fn push_lane(out: &mut String, horse: &Horse, length: u32) {
    let before = horse.distance_travelled();
    let after = length.saturating_sub(before);

    out.push(WALL);
    push_repeated(out, ' ', before as usize);
    out.push(horse.marker());
    push_repeated(out, ' ', after as usize);
    out.push(WALL);
    let _ = write!(
        out,
        "{} (Current Confidence {:.1})",
        horse.name(),
        horse.confidence()
    );
}

fn push_empty_lane(out: &mut String, length: u32) {
    out.push(WALL);
    push_repeated(out, ' ', length as usize + 2);
    out.push(WALL);
}

fn push_repeated(out: &mut String, c: char, times: usize) {
    out.extend(std::iter::repeat_n(c, times));
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_render_lane_mid_track() {
        let mut horse = Horse::new('H', "Hal", 0.5);
        horse.move_forward();
        horse.move_forward();
        assert_eq!(render_lane(&horse, 4), "|  H  |Hal (Current Confidence 0.5)");
    }

    #[test]
    fn test_render_lane_fallen() {
        let mut horse = Horse::new('H', "Hal", 0.8);
        horse.move_forward();
        horse.fall();
        assert_eq!(render_lane(&horse, 3), "| X  |Hal (Current Confidence 0.8)");
    }

    #[test]
    fn test_render_frame_two_horses() {
        let mut lanes = Lanes::new();
        lanes.place(1, Horse::new('A', "Ann", 1.0)).unwrap();
        lanes.place(2, Horse::new('B', "Bob", 0.2)).unwrap();

        let frame = render_frame(&lanes, 4);
        let expected = "==\n\
                        |A    |Ann (Current Confidence 1.0)\n\
                        |B    |Bob (Current Confidence 0.2)\n\
                        |      |\n\
                        ==\n";
        assert_eq!(frame, expected);
    }

    #[test]
    fn test_render_frame_three_horses_no_blank_row() {
        let mut lanes = Lanes::new();
        for (lane, name) in [(1, "a"), (2, "b"), (3, "c")] {
            lanes.place(lane, Horse::new('H', name, 0.5)).unwrap();
        }
        let frame = render_frame(&lanes, 10);
        assert_eq!(frame.lines().count(), 5);
        assert!(frame.lines().skip(1).take(3).all(|l| l.contains("Current Confidence")));
    }

    proptest! {
        #[test]
        fn prop_lane_track_width_is_length_plus_three(length in 1u32..200, progress in 0u32..200) {
            let mut horse = Horse::new('H', "p", 0.5);
            for _ in 0..progress.min(length) {
                horse.move_forward();
            }
            let row = render_lane(&horse, length);
            let track: String = row.chars().take_while(|&c| c != 'p').collect();
            prop_assert_eq!(track.chars().count(), length as usize + 3);
        }

        #[test]
        fn prop_frame_always_has_five_lines(length in 1u32..100, occupied in 2usize..=3) {
            let mut lanes = Lanes::new();
            for lane in 1..=occupied {
                lanes.place(lane, Horse::new('H', "h", 0.5)).unwrap();
            }
            let frame = render_frame(&lanes, length);
            prop_assert_eq!(frame.lines().count(), 5);
        }
    }
}
