//! Tolerance table for the packing engine.
//!
//! Every geometric comparison in the engine goes through one of these constants
//! rather than an inline magic number.

/// Tolerance for containment and non-overlap checks (millimetres).
pub const GEOM: f64 = 0.01;
/// Tolerance for matching a coplanar top/bottom face.
pub const FACE: f64 = 0.1;
/// Gap tolerance below which two stacked layers of the same family count as contiguous.
pub const STACK_GAP: f64 = 1.0;
/// Below this height an item is considered floor-placed and always supported.
pub const SUPPORT_Y_FLOOR: f64 = 0.1;
/// Minimum fraction of the smaller footprint two boxes must share to count as "stacked".
pub const FOOTPRINT_STACK: f64 = 0.30;
