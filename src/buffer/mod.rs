//! Buffer module: Core data structures for the double-buffer rendering system.
//!
//! This module contains:
//! - [`Cell`]: one terminal column
//! - [`Buffer`]: a grid of cells representing the terminal screen
//! - [`Rgb`]: true-color representation
//! - [`Modifiers`]: text style bitflags
//! - [`diff`]: diffing engine that queues crossterm commands for changed cells

mod cell;
#[allow(clippy::module_inception)]
mod buffer;
pub mod diff;

pub use cell::{Cell, Modifiers, Rgb};
pub use buffer::{Buffer, Style};
