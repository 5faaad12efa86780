//! Triangular cells and their geometric kernel.
//!
//! A [`Cell`] names its three corners by [`VertexId`]; the mesh resolves those ids to
//! coordinates and hands them to the kernel methods here. Area and circumcircle are
//! cached on the cell after the corresponding `compute_*` call. The caches are plain
//! `Option`s: nothing invalidates them when vertex coordinates change, so callers that
//! move vertices must recompute.
//!
//! # Examples
//!
//! ```rust
//! use trimesh::core::cell::Cell;
//! use trimesh::geometry::point::Point;
//! use trimesh::geometry::predicates::PredicateConfig;
//!
//! let corners = [
//!     Point::new([0.0, 0.0, 0.0]),
//!     Point::new([1.0, 0.0, 0.0]),
//!     Point::new([0.0, 1.0, 0.0]),
//! ];
//! let config = PredicateConfig::default();
//! let mut cell: Cell<f64> = Cell::new(0, [0, 1, 2], vec![]);
//!
//! assert_eq!(cell.compute_area(&corners), 0.5);
//! cell.compute_circumcircle(&corners, &config).unwrap();
//! assert!(cell.contains_in_circumcircle(&Point::new([0.25, 0.25]), &config).unwrap());
//! assert!(cell.contains_point(&Point::new([0.25, 0.25]), &corners, &config).unwrap());
//! ```

#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::vertex::VertexId;
use crate::geometry::{
    point::Point,
    predicates::{GeometryError, InCircle, PredicateConfig, incircle_distance, point_in_triangle},
    traits::coordinate::CoordinateScalar,
    util::{Circumcircle, circumcircle, triangle_area},
};

/// Integer id of a cell, unique within a mesh.
pub type CellId = usize;

/// Number of corners of every cell.
pub const VERTICES_PER_CELL: usize = 3;

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors raised by the cell kernel.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum CellError {
    /// The cell's corners are collinear.
    #[error("Cell {cell_id} is degenerate: {source}")]
    Degenerate {
        /// Id of the degenerate cell.
        cell_id: CellId,
        /// The underlying geometric failure.
        #[source]
        source: GeometryError,
    },
    /// A circumcircle query ran before the circumcircle was computed.
    #[error("Circumcircle of cell {cell_id} has not been computed")]
    CircumcircleNotComputed {
        /// Id of the cell.
        cell_id: CellId,
    },
    /// A corner id could not be resolved to coordinates.
    #[error("Cell {cell_id} references unknown vertex {vertex_id}")]
    VertexNotFound {
        /// Id of the cell.
        cell_id: CellId,
        /// The unresolved vertex id.
        vertex_id: VertexId,
    },
}

// =============================================================================
// CELL STRUCT DEFINITION
// =============================================================================

/// A triangle of the mesh.
///
/// Serialization covers the id, the corner ids and the attributes. Cached derived values
/// are skipped and come back empty.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "T: CoordinateScalar")]
pub struct Cell<T>
where
    T: CoordinateScalar,
{
    id: CellId,
    vertices: [VertexId; VERTICES_PER_CELL],
    #[serde(default)]
    attributes: Vec<T>,
    #[serde(skip)]
    area: Option<T>,
    #[serde(skip)]
    circumcircle: Option<Circumcircle<T>>,
}

impl<T> PartialEq for Cell<T>
where
    T: CoordinateScalar,
{
    /// Compares stored data only; caches are ignored.
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.vertices == other.vertices
            && self.attributes == other.attributes
    }
}

impl<T> Cell<T>
where
    T: CoordinateScalar,
{
    /// Creates a cell with empty caches.
    #[must_use]
    pub const fn new(
        id: CellId,
        vertices: [VertexId; VERTICES_PER_CELL],
        attributes: Vec<T>,
    ) -> Self {
        Self {
            id,
            vertices,
            attributes,
            area: None,
            circumcircle: None,
        }
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    /// The cell id.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> CellId {
        self.id
    }

    /// Corner vertex ids in stored order.
    #[inline]
    #[must_use]
    pub const fn vertices(&self) -> &[VertexId; VERTICES_PER_CELL] {
        &self.vertices
    }

    /// Whether `vertex_id` is one of the corners.
    #[inline]
    #[must_use]
    pub fn has_vertex(&self, vertex_id: VertexId) -> bool {
        self.vertices.contains(&vertex_id)
    }

    /// Per-cell attributes. Opaque to the kernel.
    #[inline]
    #[must_use]
    pub fn attributes(&self) -> &[T] {
        &self.attributes
    }

    /// Mutable per-cell attributes.
    #[inline]
    pub fn attributes_mut(&mut self) -> &mut [T] {
        &mut self.attributes
    }

    pub(crate) fn set_attributes(&mut self, attributes: Vec<T>) {
        self.attributes = attributes;
    }

    /// Area cached by the last [`compute_area`](Self::compute_area).
    #[inline]
    #[must_use]
    pub const fn cached_area(&self) -> Option<T> {
        self.area
    }

    /// Circumcircle cached by the last [`compute_circumcircle`](Self::compute_circumcircle).
    #[inline]
    #[must_use]
    pub const fn cached_circumcircle(&self) -> Option<&Circumcircle<T>> {
        self.circumcircle.as_ref()
    }

    /// Resolves the corner ids to coordinates through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`CellError::VertexNotFound`] for the first id `lookup` cannot resolve.
    pub fn resolve_corners<F>(
        &self,
        mut lookup: F,
    ) -> Result<[Point<T, 3>; VERTICES_PER_CELL], CellError>
    where
        F: FnMut(VertexId) -> Option<Point<T, 3>>,
    {
        let mut corners = [Point::default(); VERTICES_PER_CELL];
        for (slot, &vertex_id) in corners.iter_mut().zip(self.vertices.iter()) {
            *slot = lookup(vertex_id).ok_or(CellError::VertexNotFound {
                cell_id: self.id,
                vertex_id,
            })?;
        }
        Ok(corners)
    }

    // =========================================================================
    // GEOMETRIC KERNEL
    // =========================================================================

    /// Whether `p` lies inside this triangle or on its boundary.
    ///
    /// Uses the barycentric weights of `p` with corner 0 as origin.
    ///
    /// # Errors
    ///
    /// Returns [`CellError::Degenerate`] if the corners are collinear.
    pub fn contains_point<const D: usize>(
        &self,
        p: &Point<T, D>,
        corners: &[Point<T, 3>; VERTICES_PER_CELL],
        config: &PredicateConfig<T>,
    ) -> Result<bool, CellError> {
        let [a, b, c] = corners;
        point_in_triangle(p, a, b, c, config).map_err(|source| self.degenerate(source))
    }

    /// Circumcircle of the corners, without touching the cache.
    ///
    /// # Errors
    ///
    /// Returns [`CellError::Degenerate`] if the corners are collinear or the center is not
    /// finite.
    pub fn circumcircle(
        &self,
        corners: &[Point<T, 3>; VERTICES_PER_CELL],
        config: &PredicateConfig<T>,
    ) -> Result<Circumcircle<T>, CellError> {
        let [a, b, c] = corners;
        circumcircle(a, b, c, config).map_err(|source| self.degenerate(source))
    }

    /// Computes the circumcircle, caches it on the cell and returns it.
    ///
    /// # Errors
    ///
    /// Same as [`circumcircle`](Self::circumcircle). The cache is left unchanged on error.
    pub fn compute_circumcircle(
        &mut self,
        corners: &[Point<T, 3>; VERTICES_PER_CELL],
        config: &PredicateConfig<T>,
    ) -> Result<Circumcircle<T>, CellError> {
        let circle = self.circumcircle(corners, config)?;
        self.circumcircle = Some(circle);
        Ok(circle)
    }

    /// Whether `p` lies in the cached circumcircle, boundary included.
    ///
    /// # Errors
    ///
    /// Returns [`CellError::CircumcircleNotComputed`] if
    /// [`compute_circumcircle`](Self::compute_circumcircle) has not run.
    pub fn contains_in_circumcircle<const D: usize>(
        &self,
        p: &Point<T, D>,
        config: &PredicateConfig<T>,
    ) -> Result<bool, CellError> {
        let circle = self
            .circumcircle
            .as_ref()
            .ok_or(CellError::CircumcircleNotComputed { cell_id: self.id })?;
        Ok(incircle_distance(circle, p, config) != InCircle::OUTSIDE)
    }

    /// Computes the area, caches it and returns it. Collinear corners give zero.
    pub fn compute_area(&mut self, corners: &[Point<T, 3>; VERTICES_PER_CELL]) -> T {
        let [a, b, c] = corners;
        let area = triangle_area(a, b, c);
        self.area = Some(area);
        area
    }

    /// Drops both caches.
    pub fn clear_cache(&mut self) {
        self.area = None;
        self.circumcircle = None;
    }

    fn degenerate(&self, source: GeometryError) -> CellError {
        CellError::Degenerate {
            cell_id: self.id,
            source,
        }
    }
}
