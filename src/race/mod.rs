//! Race model: lanes, random draws, the tick loop and frame rendering.
//!
//! - [`Lanes`]: three fixed, 1-indexed horse slots
//! - [`RandomSource`]: uniform draws, seedable or scripted
//! - [`Race`]: the idle → running → finished state machine
//! - [`render`]: the text frame written to an output surface
//!
//! # Example
//!
//! ```rust
//! use paddock::race::{Race, RaceRules, ScriptedSource};
//! use paddock::{Horse, TextSurface};
//!
//! let mut race = Race::with_parts(
//!     3,
//!     TextSurface::new(),
//!     RaceRules::unpaced(),
//!     Box::new(ScriptedSource::new([0.0, 0.5])),
//! )
//! .unwrap();
//! race.add_horse(Horse::new('A', "Arrow", 1.0), 1).unwrap();
//! race.add_horse(Horse::new('B', "Boulder", 0.0), 2).unwrap();
//!
//! let outcome = race.start_race().unwrap();
//! assert_eq!(outcome.finish.winner_name(), Some("Arrow"));
//! ```

mod lanes;
#[allow(clippy::module_inception)]
mod race;
mod rng;
pub mod render;

pub use lanes::{Lanes, LANE_COUNT, REQUIRED_LANES};
pub use race::{move_horse, Finish, Race, RaceOutcome, RaceRules, RaceState, Step};
pub use rng::{RandomSource, ScriptedSource, SeededSource};
