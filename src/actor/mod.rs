//! Actor Model: Message-passing concurrency for the paddock UI.
//!
//! Every long-running job lives on its own thread and talks over crossbeam
//! channels:
//! - **Input Actor**: Polls terminal events, forwards to main loop
//! - **Race Actor**: Runs one race, streams surface updates and the result
//! - **Ticker Actor**: Paces repaints
//! - **Render Actor**: Receives frames, diffs and flushes
//! - **Main Loop**: Owns the application state and reacts to all of the above
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     InputEvent      ┌──────────────┐
//! │ Input Thread │ ─────────────────▶  │              │
//! └──────────────┘                     │              │
//! ┌──────────────┐     RaceEvent       │              │
//! │ Race Thread  │ ─────────────────▶  │  Main Loop   │
//! └──────────────┘                     │              │
//! ┌──────────────┐       Tick          │              │
//! │Ticker Thread │ ─────────────────▶  │              │
//! └──────────────┘                     │              │
//! ┌──────────────┐    RenderCommand    │              │
//! │Render Thread │ ◀─────────────────  │              │
//! └──────────────┘                     └──────────────┘
//! ```

mod engine;
mod input;
mod messages;
mod race;
mod renderer;
mod ticker;

pub use engine::{Engine, EngineConfig};
pub use input::{convert_event, InputActor};
pub use messages::{InputEvent, KeyCode, KeyModifiers, RaceEvent, RenderCommand};
pub use race::{RaceActor, RacePlan};
pub use renderer::{RenderStats, RendererActor};
pub use ticker::{Tick, TickerActor};
