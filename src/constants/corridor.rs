//! Corridor routing and triangulation constants.

/// Corridor width in world units
pub const CORRIDOR_DEFAULT_PATH_WIDTH: f32 = 2.0;
/// Edges whose connection points are horizontally closer than this are dropped
pub const CORRIDOR_DEFAULT_MIN_LENGTH_FOR_PATH: f32 = 1.0;
/// Minimum run before a corner is inserted into a corridor
pub const CORRIDOR_DEFAULT_MIN_LENGTH_FOR_CORNER: f32 = 5.0;
/// Minimum combined vertical span for a two-corner corridor
pub const CORRIDOR_MIN_VERTICAL_SPAN: f32 = 1.0;
/// Two coordinates closer than this are treated as aligned (no corner)
pub const CORRIDOR_DEFAULT_ALIGN_TOLERANCE: f32 = 1.0e-4;
/// Extra edges appended after the spanning tree when branching is enabled
pub const CORRIDOR_DEFAULT_BRANCH_COUNT: usize = 2;

/// Width bands of a corridor mesh
pub const MESH_DEFAULT_ROWS: usize = 3;
/// Length steps of a corridor mesh
pub const MESH_DEFAULT_COLUMNS: usize = 8;
/// Fewest width bands a configuration may request
pub const MESH_MIN_ROWS: usize = 3;
/// Fewest length steps a configuration may request
pub const MESH_MIN_COLUMNS: usize = 2;
/// Tangent written for every corridor vertex
pub const MESH_TANGENT: [f32; 4] = [1.0, 0.0, 0.0, -1.0];

/// Vertical separation is penalized when it exceeds `remaining / this`
pub const GRAPH_VERTICAL_DOMINANCE_DIVISOR: f32 = 2.0;
/// Added to the vertical distance before it multiplies a penalized weight
pub const GRAPH_VERTICAL_PENALTY_OFFSET: f32 = 5.0;
/// Scale applied to a penalized weight
pub const GRAPH_VERTICAL_PENALTY_SCALE: f32 = 3.0;
