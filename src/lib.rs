//! # trimesh
//!
//! Planar triangular meshes with identified vertices and cells, geometric queries, a
//! Delaunay empty-circumcircle check, quadrature integration and `.tri` file I/O.
//!
//! # Features
//!
//! - Vertices and cells addressed by caller-visible integer ids, in any order
//! - Barycentric point-in-triangle and circumcircle membership tests with configurable
//!   tolerances
//! - Exhaustive Delaunay validation with a per-pair violation report
//! - Constant-value and linear-interpolation quadrature over the mesh
//! - Generic floating-point coordinates (`f32`, `f64`)
//! - Serialization/Deserialization with [serde](https://serde.rs)
//!
//! Coordinates are stored as (x, y, z); every predicate works in the xy-plane.
//!
//! # Basic Usage
//!
//! ```rust
//! use trimesh::prelude::*;
//!
//! let mut mesh: Mesh<f64> = Mesh::empty(2, 0, 0).unwrap();
//! for (x, y) in [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (0.8, 0.8)] {
//!     mesh.append_point(x, y, 0.0).unwrap();
//! }
//! mesh.append_cell(0, 1, 3).unwrap();
//! mesh.append_cell(0, 3, 2).unwrap();
//!
//! assert!(mesh.is_delaunay().unwrap());
//! assert_eq!(mesh.point_in_any_triangle(&Point::new([0.5, 0.2])).unwrap().as_slice(), &[0]);
//!
//! let area = mesh.integrate(|_, _| 1.0, QuadratureRule::ConstantValue).unwrap();
//! assert!((area - 0.5 * (0.8 + 0.8)).abs() < 1e-12);
//! ```
//!
//! # Reading and writing `.tri` files
//!
//! ```rust
//! use trimesh::prelude::*;
//!
//! let text = "3 2 0\n0 0 0\n1 1 0\n2 0 1\n1 3 0\n0 0 1 2\n";
//! let mut mesh: Mesh<f64> = read_mesh(text.as_bytes()).unwrap();
//! assert_eq!(mesh.circumcenter_of(0).unwrap(), Point::new([0.5, 0.5]));
//!
//! let mut out = Vec::new();
//! write_mesh(&mesh, &mut out).unwrap();
//! assert_eq!(String::from_utf8(out).unwrap(), text);
//! ```
//!
//! # Degenerate cells
//!
//! A cell whose corners are collinear (within the mesh's degeneracy tolerance) has no
//! circumcircle or barycentric frame. Queries that need one return
//! [`MeshError::DegenerateGeometry`](core::mesh::MeshError::DegenerateGeometry) instead of
//! producing NaN.

#![forbid(unsafe_code)]

#[macro_use]
extern crate derive_builder;

/// Mesh storage: vertices, cells, the [`Mesh`](core::mesh::Mesh) container and the
/// Delaunay check.
pub mod core {
    pub mod cell;
    /// Hash maps and small buffers used for id tables and query results
    pub mod collections;
    pub mod mesh;
    pub mod util;
    pub mod vertex;
    // Re-export the `core` modules.
    pub use cell::*;
    pub use mesh::*;
    pub use util::*;
    pub use vertex::*;
    // Note: collections module not re-exported here to avoid namespace pollution
}

/// Planar geometry: points, predicates, circumcircles and measures.
pub mod geometry {
    pub mod point;
    pub mod predicates;
    /// Triangle measures and circumcircle construction
    pub mod util;
    /// Coordinate scalar abstraction and finiteness checks.
    pub mod traits {
        pub mod coordinate;
        pub use coordinate::*;
    }
    pub use point::*;
    pub use predicates::*;
    pub use traits::*;
    pub use util::*;
}

/// Mesh file formats.
pub mod io {
    pub mod tri;
    pub use tri::*;
}

/// A prelude module that re-exports commonly used types and macros.
pub mod prelude {
    // Re-export from core
    pub use crate::core::{cell::*, mesh::*, util::*, vertex::*};

    pub use crate::core::collections::{
        CellIdBuffer, FastHashMap, FastHashSet, SmallBuffer, fast_hash_map_with_capacity,
        fast_hash_set_with_capacity,
    };

    // Re-export from geometry
    pub use crate::geometry::{point::*, predicates::*, traits::coordinate::*, util::*};

    pub use crate::io::tri::{read_mesh, read_mesh_file, write_mesh, write_mesh_file};

    // Convenience macros
    pub use crate::vertex;
}

/// The function `is_normal` checks that structs implement `auto` traits.
/// Traits are checked at compile time, so this function is only used for
/// testing.
#[must_use]
pub const fn is_normal<T: Sized + Send + Sync + Unpin>() -> bool {
    true
}

// =============================================================================
// TESTS
// =============================================================================
