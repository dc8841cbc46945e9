//! Widgets: the screen components of the paddock UI.
//!
//! Every widget draws into a [`Buffer`](crate::buffer::Buffer) inside its own
//! bounds and tracks whether it changed since the last frame. The race text
//! itself arrives through [`TrackView`], which doubles as an
//! [`OutputSurface`](crate::surface::OutputSurface).

mod horse_form;
mod roster;
mod status_bar;
mod text_input;
mod track_view;
mod traits;

pub use horse_form::{FormField, FormOutcome, HorseForm, FORM_HEIGHT, FORM_WIDTH};
pub use roster::RosterView;
pub use status_bar::{Severity, StatusBar, StatusBarConfig};
pub use text_input::{TextInput, TextInputConfig};
pub use track_view::TrackView;
pub use traits::Widget;
