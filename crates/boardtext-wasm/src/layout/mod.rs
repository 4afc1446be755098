//! Board extents, glyph clustering and label summaries over decoded points.

pub mod cluster;
pub mod export;
pub mod extent;
pub mod labels;

pub use cluster::*;
pub use export::*;
pub use extent::*;
pub use labels::*;
