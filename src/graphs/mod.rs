pub mod edge;
pub mod graph_store;
pub mod matrix;

pub type Vertex = u32;
pub type Weight = u32;
pub type Distance = u32;

/// Distance of a pair for which no path is known.
pub const INFINITY: Distance = Distance::MAX;
