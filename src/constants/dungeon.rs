//! Volume scattering constants.

/// Number of candidate volumes scattered per generation
pub const SCATTER_DEFAULT_COUNT: usize = 40;
/// Radius of the sphere volumes are scattered in (horizontal components)
pub const SCATTER_DEFAULT_RADIUS: f32 = 25.0;
/// Vertical placement range (min, max)
pub const SCATTER_DEFAULT_VERTICAL_RANGE: (f32, f32) = (-10.0, 10.0);
/// Smallest scale a volume can roll, per axis
pub const SCATTER_DEFAULT_SIZE_MIN: [f32; 3] = [4.0, 2.0, 4.0];
/// Largest scale a volume can roll, per axis
pub const SCATTER_DEFAULT_SIZE_MAX: [f32; 3] = [14.0, 6.0, 14.0];
/// A volume becomes Main when its summed extents exceed `mean * factor`
pub const SCATTER_DEFAULT_MEAN_FACTOR: f32 = 1.1;
/// Lowest accepted mean factor
pub const SCATTER_MIN_MEAN_FACTOR: f32 = 0.5;
/// Seconds to wait for overlaps to resolve before discarding volumes
pub const SCATTER_DEFAULT_OVERLAP_TIMEOUT: f32 = 2.5;

/// Impulse scale used by the headless separation resolver
pub const SEPARATION_FORCE_MULTIPLIER: f32 = 500.0;
/// Fixed tick used by the CLI when driving a generation (seconds)
pub const GENERATION_DEFAULT_TICK: f32 = 1.0 / 60.0;
