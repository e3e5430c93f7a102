//! Generator constants organized by stage.
//!
//! Centralizing magic numbers makes tuning easier and documents intent.
//! Defaults for [`crate::config::GeneratorConfig`] come from here.

mod corridor;
mod dungeon;
mod random;
mod rooms;

pub use corridor::*;
pub use dungeon::*;
pub use random::*;
pub use rooms::*;
