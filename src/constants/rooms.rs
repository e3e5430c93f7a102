//! Room classification and furnishing constants.

/// Rooms that must stay free of modifiers
pub const ROOMS_DEFAULT_MINIMUM_REGULAR: usize = 2;
/// Lower bound of the random modifier roll
pub const ROOMS_DEFAULT_EXTRA_MODIFIER_CHANCE: usize = 3;
/// Staircase columns are this many times shorter than the room
pub const ROOMS_STAIR_COLUMN_DIVISOR: f32 = 1.5;
/// Room center sits this far above its floor
pub const ROOMS_CENTER_LIFT: f32 = 0.5;
