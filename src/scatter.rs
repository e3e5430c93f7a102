//! Spatial tile scatterer.
//!
//! Places candidate volumes inside a sphere, classifies the large ones as Main,
//! then waits for an external overlap resolver to push them apart. The wait is
//! a polled state machine: the caller ticks it with a frame delta until the
//! volumes stop overlapping or the timeout passes.

use glam::Vec3;

use crate::config::ScatterConfig;
use crate::events::{EventQueue, GenerationEvent};
use crate::graph::AnchorPoint;
use crate::random::RandomSource;
use crate::vector_mean::VectorMean;
use crate::volume::{SizeClass, Volume, VolumeId};

// =============================================================================
// OVERLAP RESOLVER
// =============================================================================

/// The physics side of scattering.
///
/// Implementors move volumes apart however they like and keep each volume's
/// `overlapping` flag current. The scatterer only reads the flags.
pub trait OverlapResolver {
    /// Advance the separation by `dt` seconds and refresh the overlap flags.
    fn step(&mut self, volumes: &mut [Volume], dt: f32);
}

// =============================================================================
// OVERLAP WAIT
// =============================================================================

/// Result of one overlap-wait poll
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WaitStatus {
    /// Volumes still overlap and the deadline has not passed
    Pending { overlapping: usize },
    /// No volume overlaps
    Resolved,
    /// The deadline passed with volumes still overlapping
    TimedOut { overlapping: usize },
}

impl WaitStatus {
    pub fn is_done(&self) -> bool {
        !matches!(self, WaitStatus::Pending { .. })
    }
}

/// Deadline clock for the overlap wait. Once done it keeps reporting the same
/// outcome.
#[derive(Clone, Debug)]
pub struct OverlapWait {
    elapsed: f32,
    timeout: f32,
    outcome: Option<WaitStatus>,
}

impl OverlapWait {
    pub fn new(timeout: f32) -> Self {
        Self {
            elapsed: 0.0,
            timeout,
            outcome: None,
        }
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Final status once the wait is over
    pub fn outcome(&self) -> Option<WaitStatus> {
        self.outcome
    }

    /// Re-check the overlap flags after a tick of `dt` seconds.
    pub fn poll(&mut self, volumes: &[Volume], dt: f32) -> WaitStatus {
        if let Some(outcome) = self.outcome {
            return outcome;
        }

        let overlapping = volumes.iter().filter(|v| v.overlapping).count();
        if overlapping == 0 {
            self.outcome = Some(WaitStatus::Resolved);
            return WaitStatus::Resolved;
        }

        self.elapsed += dt;
        if self.elapsed > self.timeout {
            let status = WaitStatus::TimedOut { overlapping };
            self.outcome = Some(status);
            return status;
        }
        WaitStatus::Pending { overlapping }
    }
}

// =============================================================================
// SCATTERER
// =============================================================================

/// Volumes left after the overlap wait, plus the anchors to route between
#[derive(Clone, Debug, Default)]
pub struct ScatterResult {
    /// Every surviving volume, in placement order
    pub volumes: Vec<Volume>,
    /// Volumes that become rooms: all survivors or only the Main ones
    pub rooms: Vec<Volume>,
    /// Bottom-center anchors of `rooms`, index-aligned with it
    pub anchors: Vec<AnchorPoint>,
    pub discarded: Vec<VolumeId>,
}

#[derive(Clone, Debug)]
pub struct TileScatterer {
    volumes: Vec<Volume>,
    mean: VectorMean,
    threshold: f32,
    include_small_tiles: bool,
    wait: OverlapWait,
}

impl TileScatterer {
    /// Place and classify `config.count` volumes.
    ///
    /// Per volume the draws are: a point in the unit sphere, the height, then
    /// the x, y and z extents.
    pub fn place(
        config: &ScatterConfig,
        random: &mut RandomSource,
        events: &mut EventQueue,
    ) -> Self {
        puffin::profile_function!();

        let [low, high] = config.vertical_range;
        let mut mean = VectorMean::new();
        let mut volumes = Vec::with_capacity(config.count);

        for _ in 0..config.count {
            let mut position = random.point_in_unit_sphere() * config.radius;
            position.y = random.next_float(low, high);
            let scale = Vec3::new(
                random.next_float(config.size_min[0], config.size_max[0]),
                random.next_float(config.size_min[1], config.size_max[1]),
                random.next_float(config.size_min[2], config.size_max[2]),
            );
            mean.add(scale);
            volumes.push(Volume::new(0, position, scale));
        }

        // Ids and classes are assigned in one scan over placement order
        let threshold = mean.mean() * config.mean_factor;
        for (index, volume) in volumes.iter_mut().enumerate() {
            volume.id = index as VolumeId;
            if volume.collective_size() > threshold {
                volume.class = SizeClass::Main;
            }
            events.push(GenerationEvent::VolumeSpawned {
                id: volume.id,
                position: volume.position,
                scale: volume.scale,
            });
        }

        tracing::info!(
            target: "dungeon::scatter",
            placed = volumes.len(),
            main = volumes.iter().filter(|v| v.class == SizeClass::Main).count(),
            threshold,
            "scatter.placed"
        );

        Self {
            volumes,
            mean,
            threshold,
            include_small_tiles: config.include_small_tiles,
            wait: OverlapWait::new(config.overlap_timeout),
        }
    }

    pub fn volumes(&self) -> &[Volume] {
        &self.volumes
    }

    /// Mutable access for an external physics step that moves volumes itself
    pub fn volumes_mut(&mut self) -> &mut [Volume] {
        &mut self.volumes
    }

    pub fn mean(&self) -> &VectorMean {
        &self.mean
    }

    /// Summed extent above which a volume is Main
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn elapsed(&self) -> f32 {
        self.wait.elapsed()
    }

    /// Run one resolver step and re-check the overlap flags.
    pub fn tick(&mut self, resolver: &mut dyn OverlapResolver, dt: f32) -> WaitStatus {
        if let Some(outcome) = self.wait.outcome() {
            return outcome;
        }
        resolver.step(&mut self.volumes, dt);
        self.poll(dt)
    }

    /// Re-check the overlap flags without stepping a resolver, for callers
    /// whose physics runs elsewhere.
    pub fn poll(&mut self, dt: f32) -> WaitStatus {
        self.wait.poll(&self.volumes, dt)
    }

    /// Discard volumes still overlapping and collect anchors.
    pub fn finish(self, events: &mut EventQueue) -> ScatterResult {
        let (volumes, overlapping): (Vec<Volume>, Vec<Volume>) =
            self.volumes.into_iter().partition(|v| !v.overlapping);

        let discarded: Vec<VolumeId> = overlapping.iter().map(|v| v.id).collect();
        for &id in &discarded {
            events.push(GenerationEvent::VolumeDiscarded { id });
        }

        let rooms: Vec<Volume> = volumes
            .iter()
            .filter(|v| self.include_small_tiles || v.class == SizeClass::Main)
            .copied()
            .collect();
        let anchors = rooms.iter().map(AnchorPoint::for_volume).collect();

        tracing::info!(
            target: "dungeon::scatter",
            kept = volumes.len(),
            discarded = discarded.len(),
            rooms = rooms.len(),
            elapsed = self.wait.elapsed(),
            "scatter.finished"
        );

        ScatterResult {
            volumes,
            rooms,
            anchors,
            discarded,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Resolver that clears every flag after a fixed number of steps
    struct ClearAfter(usize);

    impl OverlapResolver for ClearAfter {
        fn step(&mut self, volumes: &mut [Volume], _dt: f32) {
            if self.0 == 0 {
                return;
            }
            self.0 -= 1;
            if self.0 == 0 {
                volumes.iter_mut().for_each(|v| v.overlapping = false);
            }
        }
    }

    /// Resolver that never moves anything
    struct Stuck;

    impl OverlapResolver for Stuck {
        fn step(&mut self, _volumes: &mut [Volume], _dt: f32) {}
    }

    fn config(count: usize) -> ScatterConfig {
        ScatterConfig {
            count,
            radius: 20.0,
            mean_factor: 1.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_place_assigns_ids_in_order() {
        let mut random = RandomSource::uniform(42);
        let mut events = EventQueue::new();
        let scatterer = TileScatterer::place(&config(10), &mut random, &mut events);

        let ids: Vec<VolumeId> = scatterer.volumes().iter().map(|v| v.id).collect();
        assert_eq!(ids, (0..10).collect::<Vec<_>>());
        assert_eq!(events.len(), 10);
    }

    #[test]
    fn test_placement_stays_in_bounds() {
        let cfg = config(50);
        let mut random = RandomSource::uniform(3);
        let scatterer = TileScatterer::place(&cfg, &mut random, &mut EventQueue::new());

        for v in scatterer.volumes() {
            assert!(v.position.x.hypot(v.position.z) <= cfg.radius + 1e-3);
            assert!(v.position.y >= cfg.vertical_range[0] && v.position.y < cfg.vertical_range[1]);
            for axis in 0..3 {
                assert!(v.scale[axis] >= cfg.size_min[axis] && v.scale[axis] < cfg.size_max[axis]);
            }
        }
    }

    #[test]
    fn test_main_volumes_exceed_threshold() {
        let mut random = RandomSource::uniform(8);
        let scatterer = TileScatterer::place(&config(30), &mut random, &mut EventQueue::new());
        let threshold = scatterer.threshold();
        assert!((threshold - scatterer.mean().mean()).abs() < 1e-5);

        for v in scatterer.volumes() {
            let is_main = v.class == SizeClass::Main;
            assert_eq!(is_main, v.collective_size() > threshold);
        }
    }

    #[test]
    fn test_same_seed_same_placement() {
        let place = || {
            let mut random = RandomSource::uniform(99);
            TileScatterer::place(&config(12), &mut random, &mut EventQueue::new())
                .volumes()
                .to_vec()
        };
        assert_eq!(place(), place());
    }

    #[test]
    fn test_wait_resolves_when_flags_clear() {
        let mut random = RandomSource::uniform(1);
        let mut scatterer = TileScatterer::place(&config(4), &mut random, &mut EventQueue::new());
        scatterer.volumes_mut()[0].overlapping = true;

        let mut resolver = ClearAfter(3);
        assert_eq!(scatterer.tick(&mut resolver, 0.1), WaitStatus::Pending { overlapping: 1 });
        assert_eq!(scatterer.tick(&mut resolver, 0.1), WaitStatus::Pending { overlapping: 1 });
        assert_eq!(scatterer.tick(&mut resolver, 0.1), WaitStatus::Resolved);
        assert_eq!(scatterer.tick(&mut resolver, 0.1), WaitStatus::Resolved);
    }

    #[test]
    fn test_wait_times_out_and_discards() {
        let mut random = RandomSource::uniform(1);
        let mut scatterer = TileScatterer::place(
            &ScatterConfig {
                overlap_timeout: 0.25,
                include_small_tiles: true,
                ..config(4)
            },
            &mut random,
            &mut EventQueue::new(),
        );
        scatterer.volumes_mut()[1].overlapping = true;
        scatterer.volumes_mut()[3].overlapping = true;

        let mut status = WaitStatus::Pending { overlapping: 0 };
        let mut ticks = 0;
        while !status.is_done() {
            status = scatterer.tick(&mut Stuck, 0.1);
            ticks += 1;
        }
        assert_eq!(status, WaitStatus::TimedOut { overlapping: 2 });
        assert_eq!(ticks, 3);

        let mut events = EventQueue::new();
        let result = scatterer.finish(&mut events);
        assert_eq!(result.discarded, vec![1, 3]);
        let kept: Vec<VolumeId> = result.volumes.iter().map(|v| v.id).collect();
        assert_eq!(kept, vec![0, 2]);
        assert_eq!(result.anchors.len(), 2);
        let discarded: Vec<_> = events.drain().collect();
        assert_eq!(
            discarded,
            vec![
                GenerationEvent::VolumeDiscarded { id: 1 },
                GenerationEvent::VolumeDiscarded { id: 3 },
            ]
        );
    }

    #[test]
    fn test_zero_timeout_gives_up_on_first_overlap() {
        let mut wait = OverlapWait::new(0.0);
        let mut volumes = vec![Volume::new(0, Vec3::ZERO, Vec3::ONE)];
        volumes[0].overlapping = true;
        assert_eq!(wait.poll(&volumes, 0.016), WaitStatus::TimedOut { overlapping: 1 });
    }

    #[test]
    fn test_anchors_only_from_main_volumes() {
        let mut random = RandomSource::uniform(42);
        let mut scatterer = TileScatterer::place(&config(10), &mut random, &mut EventQueue::new());
        assert_eq!(scatterer.tick(&mut Stuck, 0.016), WaitStatus::Resolved);

        let main: Vec<VolumeId> = scatterer
            .volumes()
            .iter()
            .filter(|v| v.class == SizeClass::Main)
            .map(|v| v.id)
            .collect();
        let result = scatterer.finish(&mut EventQueue::new());

        let anchored: Vec<Option<VolumeId>> = result.anchors.iter().map(|a| a.volume).collect();
        assert_eq!(anchored, main.iter().copied().map(Some).collect::<Vec<_>>());
        assert_eq!(result.rooms.len(), main.len());
        for (anchor, room) in result.anchors.iter().zip(&result.rooms) {
            assert_eq!(anchor.position, room.bottom().center);
        }
    }

    #[test]
    fn test_empty_scatter() {
        let mut random = RandomSource::uniform(0);
        let mut scatterer = TileScatterer::place(&config(0), &mut random, &mut EventQueue::new());
        assert_eq!(scatterer.tick(&mut Stuck, 0.016), WaitStatus::Resolved);
        let result = scatterer.finish(&mut EventQueue::new());
        assert!(result.volumes.is_empty());
        assert!(result.anchors.is_empty());
    }
}
