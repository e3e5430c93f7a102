//! Random source constants.

/// Samples drawn per value by the biased policy
pub const RANDOM_DEFAULT_ROLL_COUNT: u32 = 4;
