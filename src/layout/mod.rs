//! Layout engine: taffy integration, node style resolution, spatial map.

pub mod engine;
pub mod resolve;
pub mod spatial;

pub use engine::LayoutEngine;
pub use resolve::LayoutMetrics;
pub use spatial::SpatialMap;
