//! Generation event system for decoupled communication with a spawner.
//!
//! The core never creates or destroys engine objects. It emits events and an
//! external spawner mirrors them into whatever scene representation it owns.

use glam::Vec3;

use crate::volume::VolumeId;

/// Events a spawner can subscribe to
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationEvent {
    /// A generation pass began with this seed
    GenerationStarted { seed: u64 },
    /// A candidate volume was placed
    VolumeSpawned {
        id: VolumeId,
        position: Vec3,
        scale: Vec3,
    },
    /// A volume was still overlapping at the deadline and must be destroyed
    VolumeDiscarded { id: VolumeId },
    /// The layout is complete
    GenerationFinished { rooms: usize, corridors: usize },
}

/// Simple event queue - events are pushed while generating, drained by the spawner
#[derive(Debug, Default)]
pub struct EventQueue {
    events: Vec<GenerationEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Push an event to be processed later
    pub fn push(&mut self, event: GenerationEvent) {
        self.events.push(event);
    }

    /// Drain all events for processing
    pub fn drain(&mut self) -> impl Iterator<Item = GenerationEvent> + '_ {
        self.events.drain(..)
    }

    /// Check if there are pending events
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}
