//! Procedural mesh tessellation
//!
//! Turns the primitive shapes named in a scene description into vertex and
//! index buffers that a render backend can upload.

mod primitives;
mod types;

pub use primitives::*;
pub use types::*;
