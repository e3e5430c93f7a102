//! Generation session: drives scatter, graph, routing, meshing and rooms.
//!
//! A session is a [`GenerationTask`] the caller ticks once per frame. Only the
//! overlap wait spans ticks; everything after it runs synchronously on the tick
//! that ends the wait. All stages share one [`RandomSource`], drawn in a fixed
//! order: scatter placement first, room modifiers last.

use serde::Serialize;
use thiserror::Error;

use crate::config::{ConfigError, GeneratorConfig};
use crate::corridor::{CorridorRouter, RoutedSegment};
use crate::events::{EventQueue, GenerationEvent};
use crate::graph::{AnchorPoint, Edge, Graph};
use crate::mesh::{triangulate_segment, MeshBuffer};
use crate::random::RandomSource;
use crate::rooms::{plan_rooms, RoomLayout};
use crate::scatter::{OverlapResolver, ScatterResult, TileScatterer, WaitStatus};
use crate::volume::{Volume, VolumeId};

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("generation task already finished")]
    Finished,
    #[error("tick delta must be positive and finite, got {0}")]
    InvalidDelta(f32),
}

/// A renderable corridor piece
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CorridorPiece {
    pub name: String,
    pub segment: RoutedSegment,
    pub mesh: MeshBuffer,
}

/// Everything one generation pass produced
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DungeonLayout {
    pub seed: u64,
    /// Volumes that survived the overlap wait
    pub volumes: Vec<Volume>,
    pub discarded: Vec<VolumeId>,
    pub anchors: Vec<AnchorPoint>,
    /// Spanning tree edges followed by branch edges, indexing `anchors`
    pub tree: Vec<Edge>,
    pub segments: Vec<RoutedSegment>,
    pub corridors: Vec<CorridorPiece>,
    pub rooms: RoomLayout,
}

/// Outcome of one tick
#[derive(Debug)]
pub enum TaskStatus {
    /// Still waiting for volumes to stop overlapping
    Waiting { overlapping: usize, elapsed: f32 },
    Finished(Box<DungeonLayout>),
}

enum Stage {
    Scattering(TileScatterer),
    Done,
}

/// One in-flight generation pass. Dropping it abandons the pass.
pub struct GenerationTask {
    config: GeneratorConfig,
    random: RandomSource,
    events: EventQueue,
    stage: Stage,
}

impl GenerationTask {
    pub fn seed(&self) -> u64 {
        self.random.seed()
    }

    /// Events produced since the last drain, for the spawner
    pub fn drain_events(&mut self) -> impl Iterator<Item = GenerationEvent> + '_ {
        self.events.drain()
    }

    /// Volumes still waiting on the overlap resolver, for physics that runs
    /// outside the task. Empty once the wait is over.
    pub fn volumes_mut(&mut self) -> &mut [Volume] {
        match &mut self.stage {
            Stage::Scattering(scatterer) => scatterer.volumes_mut(),
            Stage::Done => &mut [],
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.stage, Stage::Done)
    }

    /// Step `resolver` by `dt` seconds and advance the pass.
    pub fn tick(
        &mut self,
        resolver: &mut dyn OverlapResolver,
        dt: f32,
    ) -> Result<TaskStatus, GenerationError> {
        check_delta(dt)?;
        let Stage::Scattering(scatterer) = &mut self.stage else {
            return Err(GenerationError::Finished);
        };
        let status = scatterer.tick(resolver, dt);
        self.advance(status)
    }

    /// Advance the pass by `dt` seconds when overlap flags are maintained
    /// externally through [`GenerationTask::volumes_mut`].
    pub fn poll(&mut self, dt: f32) -> Result<TaskStatus, GenerationError> {
        check_delta(dt)?;
        let Stage::Scattering(scatterer) = &mut self.stage else {
            return Err(GenerationError::Finished);
        };
        let status = scatterer.poll(dt);
        self.advance(status)
    }

    fn advance(&mut self, status: WaitStatus) -> Result<TaskStatus, GenerationError> {
        let Stage::Scattering(scatterer) = std::mem::replace(&mut self.stage, Stage::Done) else {
            return Err(GenerationError::Finished);
        };

        match status {
            WaitStatus::Pending { overlapping } => {
                let elapsed = scatterer.elapsed();
                self.stage = Stage::Scattering(scatterer);
                return Ok(TaskStatus::Waiting {
                    overlapping,
                    elapsed,
                });
            }
            WaitStatus::TimedOut { overlapping } => {
                tracing::warn!(
                    target: "dungeon::scatter",
                    overlapping,
                    elapsed = scatterer.elapsed(),
                    "scatter.timed_out"
                );
            }
            WaitStatus::Resolved => {}
        }

        let scattered = scatterer.finish(&mut self.events);
        let layout = build_layout(&self.config, &mut self.random, scattered);
        self.events.push(GenerationEvent::GenerationFinished {
            rooms: layout.rooms.rooms.len(),
            corridors: layout.corridors.len(),
        });
        Ok(TaskStatus::Finished(Box::new(layout)))
    }
}

fn check_delta(dt: f32) -> Result<(), GenerationError> {
    if dt.is_finite() && dt > 0.0 {
        Ok(())
    } else {
        Err(GenerationError::InvalidDelta(dt))
    }
}

/// Everything after the overlap wait. Synchronous.
fn build_layout(
    config: &GeneratorConfig,
    random: &mut RandomSource,
    scattered: ScatterResult,
) -> DungeonLayout {
    puffin::profile_function!();

    let routing = &config.routing;
    let graph = Graph::complete(scattered.anchors);
    let tree = {
        puffin::profile_scope!("spanning_tree");
        graph.spanning_tree(routing.add_branching, routing.branch_count)
    };
    let Graph { mut anchors, .. } = graph;

    let segments = CorridorRouter::new(routing).route(&mut anchors, &tree);

    let corridors: Vec<CorridorPiece> = {
        puffin::profile_scope!("triangulate");
        segments
            .iter()
            .filter_map(|segment| {
                let mesh = triangulate_segment(segment, routing.rows, routing.columns);
                (!mesh.is_empty()).then(|| CorridorPiece {
                    name: segment.name(),
                    segment: *segment,
                    mesh,
                })
            })
            .collect()
    };

    let rooms = plan_rooms(&scattered.rooms, &config.rooms, random);

    tracing::info!(
        target: "dungeon::generator",
        seed = random.seed(),
        volumes = scattered.volumes.len(),
        anchors = anchors.len(),
        tree_edges = tree.len(),
        segments = segments.len(),
        corridors = corridors.len(),
        rooms = rooms.rooms.len(),
        "generation.finished"
    );

    DungeonLayout {
        seed: random.seed(),
        volumes: scattered.volumes,
        discarded: scattered.discarded,
        anchors,
        tree,
        segments,
        corridors,
        rooms,
    }
}

/// Validated configuration that starts generation passes
#[derive(Clone, Debug)]
pub struct DungeonGenerator {
    config: GeneratorConfig,
}

impl DungeonGenerator {
    /// Fails on an invalid configuration before anything is placed.
    pub fn new(config: GeneratorConfig) -> Result<Self, GenerationError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Seed the random source and place the volumes of a new pass.
    pub fn start(&self) -> GenerationTask {
        let seed = self.config.resolve_seed();
        let mut random = RandomSource::new(seed, self.config.random);
        let mut events = EventQueue::new();
        events.push(GenerationEvent::GenerationStarted { seed });

        tracing::info!(
            target: "dungeon::generator",
            seed,
            explicit_seed = self.config.seed.is_some(),
            "generation.started"
        );

        let scatterer = TileScatterer::place(&self.config.scatter, &mut random, &mut events);
        GenerationTask {
            config: self.config.clone(),
            random,
            events,
            stage: Stage::Scattering(scatterer),
        }
    }

    /// Run a whole pass, ticking `resolver` with a fixed `dt` until done.
    pub fn generate(
        &self,
        resolver: &mut dyn OverlapResolver,
        dt: f32,
    ) -> Result<DungeonLayout, GenerationError> {
        check_delta(dt)?;
        let mut task = self.start();
        loop {
            if let TaskStatus::Finished(layout) = task.tick(resolver, dt)? {
                return Ok(*layout);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::separation::{AabbSeparation, NoOverlap};

    fn seeded(seed: u64) -> GeneratorConfig {
        GeneratorConfig {
            seed: Some(seed),
            ..Default::default()
        }
    }

    #[test]
    fn test_invalid_config_fails_before_start() {
        let mut config = seeded(1);
        config.routing.columns = 0;
        assert!(matches!(
            DungeonGenerator::new(config),
            Err(GenerationError::Config(ConfigError::Invalid { field: "routing.columns", .. }))
        ));
    }

    #[test]
    fn test_rejects_bad_delta() {
        let generator = DungeonGenerator::new(seeded(1)).unwrap();
        let mut task = generator.start();
        assert!(matches!(task.tick(&mut NoOverlap, 0.0), Err(GenerationError::InvalidDelta(_))));
        assert!(matches!(task.poll(f32::NAN), Err(GenerationError::InvalidDelta(_))));
    }

    #[test]
    fn test_finished_task_rejects_ticks() {
        let generator = DungeonGenerator::new(seeded(5)).unwrap();
        let mut task = generator.start();
        assert!(matches!(task.tick(&mut NoOverlap, 0.1), Ok(TaskStatus::Finished(_))));
        assert!(task.is_finished());
        assert!(task.volumes_mut().is_empty());
        assert!(matches!(task.tick(&mut NoOverlap, 0.1), Err(GenerationError::Finished)));
    }

    #[test]
    fn test_events_bracket_the_pass() {
        let generator = DungeonGenerator::new(seeded(12)).unwrap();
        let mut task = generator.start();
        let started: Vec<_> = task.drain_events().collect();
        assert_eq!(started[0], GenerationEvent::GenerationStarted { seed: 12 });
        let spawned = started
            .iter()
            .filter(|e| matches!(e, GenerationEvent::VolumeSpawned { .. }))
            .count();
        assert_eq!(spawned, generator.config().scatter.count);

        let mut resolver = AabbSeparation::default();
        let layout = loop {
            if let TaskStatus::Finished(layout) = task.tick(&mut resolver, 1.0 / 60.0).unwrap() {
                break layout;
            }
        };
        let finished: Vec<_> = task.drain_events().collect();
        let discarded = finished
            .iter()
            .filter(|e| matches!(e, GenerationEvent::VolumeDiscarded { .. }))
            .count();
        assert_eq!(discarded, layout.discarded.len());
        assert_eq!(
            finished.last(),
            Some(&GenerationEvent::GenerationFinished {
                rooms: layout.rooms.rooms.len(),
                corridors: layout.corridors.len(),
            })
        );
    }

    #[test]
    fn test_external_physics_through_poll() {
        let generator = DungeonGenerator::new(seeded(3)).unwrap();
        let mut task = generator.start();
        task.volumes_mut()[0].overlapping = true;

        match task.poll(0.5).unwrap() {
            TaskStatus::Waiting { overlapping, elapsed } => {
                assert_eq!(overlapping, 1);
                assert_eq!(elapsed, 0.5);
            }
            TaskStatus::Finished(_) => panic!("wait should still be pending"),
        }

        task.volumes_mut()[0].overlapping = false;
        assert!(matches!(task.poll(0.5), Ok(TaskStatus::Finished(_))));
    }

    #[test]
    fn test_tree_indexes_anchors() {
        let generator = DungeonGenerator::new(seeded(21)).unwrap();
        let layout = generator.generate(&mut NoOverlap, 1.0 / 60.0).unwrap();
        assert!(layout
            .tree
            .iter()
            .all(|e| e.a < layout.anchors.len() && e.b < layout.anchors.len()));
        assert_eq!(layout.anchors.len(), layout.rooms.rooms.len());
        assert!(layout.corridors.iter().all(|c| c.name.starts_with("Path | ")));
    }
}
