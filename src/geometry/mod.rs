//! Icosphere geometry construction
//!
//! Builds the base icosahedron and recursively subdivides it on the unit
//! sphere. All positions stay unit-length until elevation is applied by the
//! height field; world position is `direction * (radius + elevation)`.

mod cache;
mod icosahedron;
mod subdivide;

pub use cache::PointCache;
pub use icosahedron::build_icosahedron;
pub use subdivide::{subdivide, subdivide_focused};
