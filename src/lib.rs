//! # Paddock
//!
//! A three-lane horse race simulator for the terminal.
//!
//! Horses advance one unit per tick with a probability equal to their
//! confidence, and may fall with a probability that grows with the square of
//! it. The first horse to cover the track wins and gains confidence.
//!
//! ## Core Concepts
//!
//! - **Race model**: [`Race`] steps a fixed set of [`Lanes`](race::Lanes)
//!   with an injectable [`RandomSource`](race::RandomSource)
//! - **Output surfaces**: frames go to any [`OutputSurface`]; a string, a
//!   terminal, or a channel to another thread
//! - **Actor model**: the race, input, rendering and UI ticks each run on
//!   their own thread, talking over channels
//! - **Double-buffered rendering**: the TUI diffs buffers and writes only
//!   changed cells
//!
//! ## Example
//!
//! ```rust
//! use paddock::{Horse, Race, TextSurface};
//!
//! let mut race = Race::new(10, TextSurface::new()).unwrap();
//! race.add_horse(Horse::new('♘', "Pegasus", 0.6), 1).unwrap();
//! race.add_horse(Horse::new('♞', "Nightmare", 0.4), 2).unwrap();
//! assert!(race.add_horse(Horse::new('♜', "Rook", 0.5), 4).is_err());
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod actor;
pub mod app;
pub mod buffer;
pub mod config;
pub mod error;
pub mod horse;
pub mod layout;
pub mod race;
pub mod surface;
pub mod widget;

// Re-exports for convenience
pub use actor::{Engine, EngineConfig, InputEvent, KeyCode, KeyModifiers, RaceEvent, RenderCommand};
pub use app::App;
pub use buffer::{Buffer, Cell, Modifiers, Rgb};
pub use config::Config;
pub use error::{ConfigError, HorseSpecError, RaceError};
pub use horse::{Horse, HorseSpec};
pub use layout::Rect;
pub use race::{Finish, Race, RaceOutcome, RaceRules};
pub use surface::{ChannelSurface, OutputSurface, StdoutSurface, TextSurface};
pub use widget::{HorseForm, RosterView, StatusBar, TextInput, TrackView, Widget};
