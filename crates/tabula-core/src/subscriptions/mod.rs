//! Built-in subscription sources.
//!
//! - [`terminal_events`] -- key, mouse, resize and paste events.
//! - [`Every`] -- a repeating timer, used for spinner animation.

mod terminal;
mod timer;

pub use terminal::*;
pub use timer::*;
