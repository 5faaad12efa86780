//! Identified mesh vertices.
//!
//! A [`Vertex`] pairs a caller-visible integer id with stored coordinates (x, y, z) and a
//! vector of per-vertex attributes. Only x and y take part in the planar predicates; z is
//! carried so that a mesh read from a file writes back unchanged.
//!
//! # Examples
//!
//! ```rust
//! use trimesh::core::vertex::Vertex;
//! use trimesh::vertex;
//!
//! let v: Vertex<f64> = vertex!(4, [1.0, 2.0, 0.0]);
//! assert_eq!(v.id(), 4);
//! assert!(v.attributes().is_empty());
//!
//! let with_attrs: Vertex<f64> = vertex!(5, [0.0, 1.0, 0.0], vec![273.15]);
//! assert_eq!(with_attrs.attributes(), &[273.15]);
//! ```

#![forbid(unsafe_code)]

use crate::geometry::{
    point::Point,
    traits::coordinate::{CoordinateScalar, CoordinateValidationError},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Integer id of a vertex, unique within a mesh.
pub type VertexId = usize;

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur during vertex validation.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum VertexValidationError {
    /// The vertex has a NaN or infinite coordinate.
    #[error("Invalid point for vertex {vertex_id}: {source}")]
    InvalidPoint {
        /// Id of the offending vertex.
        vertex_id: VertexId,
        /// The underlying point validation error.
        #[source]
        source: CoordinateValidationError,
    },
}

// =============================================================================
// CONVENIENCE MACROS
// =============================================================================

/// Builds a [`Vertex`] from an id, a coordinate array and optional attributes.
///
/// # Panics
///
/// Panics if the builder rejects the input, which only happens for non-finite
/// coordinates.
///
/// # Usage
///
/// ```rust
/// use trimesh::vertex;
/// use trimesh::core::vertex::Vertex;
///
/// let v1: Vertex<f32> = vertex!(0, [1.0, 2.0, 3.0]);
/// let v2: Vertex<f64> = vertex!(1, [0.0, 1.0, 0.0], vec![0.5, 0.25]);
/// assert_eq!(v2.attributes().len(), 2);
/// ```
#[macro_export]
macro_rules! vertex {
    ($id:expr, $coords:expr) => {
        $crate::core::vertex::VertexBuilder::default()
            .id($id)
            .point($crate::geometry::point::Point::new($coords))
            .build()
            .expect("Failed to build vertex: coordinates must be finite")
    };

    ($id:expr, $coords:expr, $attributes:expr) => {
        $crate::core::vertex::VertexBuilder::default()
            .id($id)
            .point($crate::geometry::point::Point::new($coords))
            .attributes($attributes)
            .build()
            .expect("Failed to build vertex: coordinates must be finite")
    };
}

pub use crate::vertex;

// =============================================================================
// VERTEX STRUCT DEFINITION
// =============================================================================

/// A mesh vertex: id, stored coordinates and attributes.
///
/// Built through [`VertexBuilder`] (or the [`vertex!`](crate::vertex) macro), which
/// rejects non-finite coordinates.
#[derive(Builder, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[builder(build_fn(validate = "Self::validate"))]
#[serde(bound = "T: CoordinateScalar")]
pub struct Vertex<T>
where
    T: CoordinateScalar,
{
    /// Caller-visible id.
    id: VertexId,
    /// Stored coordinates; z is unused by the predicates.
    point: Point<T, 3>,
    /// Per-vertex attributes.
    #[builder(default)]
    #[serde(default)]
    attributes: Vec<T>,
}

impl<T> VertexBuilder<T>
where
    T: CoordinateScalar,
{
    fn validate(&self) -> Result<(), String> {
        if let Some(point) = &self.point {
            point.validate().map_err(|e| e.to_string())?;
        }
        Ok(())
    }
}

impl<T> Vertex<T>
where
    T: CoordinateScalar,
{
    /// Creates a vertex without validating its coordinates.
    ///
    /// The mesh validates every vertex it takes ownership of, so this is the constructor
    /// used on bulk load paths.
    #[must_use]
    pub const fn new(id: VertexId, point: Point<T, 3>, attributes: Vec<T>) -> Self {
        Self {
            id,
            point,
            attributes,
        }
    }

    /// The vertex id.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> VertexId {
        self.id
    }

    /// Stored coordinates.
    #[inline]
    #[must_use]
    pub const fn point(&self) -> &Point<T, 3> {
        &self.point
    }

    /// Per-vertex attributes.
    #[inline]
    #[must_use]
    pub fn attributes(&self) -> &[T] {
        &self.attributes
    }

    /// Mutable access to the attributes. The length must stay equal to the mesh's
    /// attributes-per-point count.
    #[inline]
    pub fn attributes_mut(&mut self) -> &mut [T] {
        &mut self.attributes
    }

    /// Sets the third coordinate to zero, as a two-dimensional mesh stores it.
    pub(crate) fn flatten(&mut self) {
        let [x, y, _] = self.point.to_array();
        self.point = Point::new([x, y, T::zero()]);
    }

    /// Checks that the coordinates are finite.
    ///
    /// # Errors
    ///
    /// Returns [`VertexValidationError::InvalidPoint`] for a NaN or infinite coordinate.
    pub fn is_valid(&self) -> Result<(), VertexValidationError> {
        self.point
            .validate()
            .map_err(|source| VertexValidationError::InvalidPoint {
                vertex_id: self.id,
                source,
            })
    }
}
