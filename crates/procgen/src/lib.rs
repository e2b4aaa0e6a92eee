//! Procedural geometry for the snowfield: terrain heights, the ground mesh, and
//! the curve/tube geometry behind the guidance path.

pub mod curve;
pub mod terrain;
pub mod tube;

pub use curve::*;
pub use terrain::*;
pub use tube::*;
