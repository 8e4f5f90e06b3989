//! tabcut geometry
//!
//! Tab-cutout geometry for 2D outlines: flattening nested outlines into
//! linear primitives, planning rectangular tab zones from a bounding box and
//! a gap pattern, and subtracting those zones from every path and ring.
//! Coordinates use nalgebra's `Point2<f64>`.

pub mod cutter;
pub mod error;
pub mod flatten;
pub mod layout;
pub mod outline;

// Re-export nalgebra types for convenience
pub use nalgebra::Point2;

pub use cutter::{merge_primitives, subtract_zone, CutOutcome, CutWarning};
pub use error::{Error, Result};
pub use flatten::{flatten, flatten_all, flatten_with, FlattenOptions};
pub use layout::{plan_zones, GapPattern, TabLayout, TabZone};
pub use outline::{BoundingBox, Outline, Polygon2D, Primitive, PrimitiveKind};
