//! Collection aliases used by the mesh.
//!
//! Id tables use `rustc-hash` maps; query results use `smallvec` buffers sized for the
//! handful of cells a point usually touches.

mod aliases;
mod buffers;

pub use aliases::*;
pub use buffers::*;
