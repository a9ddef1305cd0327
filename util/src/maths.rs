//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::{Float, PrimInt};

/// Map a value from one range into another.
pub fn lin_map<T>(source_range: (T, T), target_range: (T, T), value: T) -> T
where 
    T: Float 
{
    target_range.0 
        + ((value - source_range.0) 
        * (target_range.1 - target_range.0) 
        / (source_range.1 - source_range.0))
}

/// Map an integer value from one range into another.
///
/// Multiplies before dividing and truncates towards zero, the same as the
/// integer `map()` found in microcontroller frameworks.
pub fn lin_map_int<T>(source_range: (T, T), target_range: (T, T), value: T) -> T
where
    T: PrimInt
{
    (value - source_range.0) * (target_range.1 - target_range.0)
        / (source_range.1 - source_range.0)
        + target_range.0
}
