//! Procedural 3-D dungeon layout generation.
//!
//! The pipeline scatters room volumes, connects a subset of them with a
//! minimum spanning tree plus a few branch edges, routes each edge into
//! straight corridor segments and triangulates those into mesh strips. Room
//! modifiers and furnishing plans are assigned from the same seeded source.
//!
//! The crate never owns a scene. [`generator::GenerationTask`] is ticked by the
//! caller, an [`scatter::OverlapResolver`] stands in for physics, and an
//! external spawner mirrors the queued [`events::GenerationEvent`]s.

pub mod config;
pub mod constants;
pub mod corridor;
pub mod events;
pub mod generator;
pub mod geometry;
pub mod graph;
pub mod mesh;
pub mod random;
pub mod rooms;
pub mod scatter;
pub mod separation;
pub mod spanning_tree;
pub mod vector_mean;
pub mod volume;

pub use config::{ConfigError, GeneratorConfig};
pub use generator::{DungeonGenerator, DungeonLayout, GenerationError, GenerationTask, TaskStatus};
