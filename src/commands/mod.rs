//! Command implementations for the prospect CLI

mod inspect;
mod list;
mod misc;

pub use inspect::*;
pub use list::*;
pub use misc::*;
