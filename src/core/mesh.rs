//! The triangular mesh container and its queries.
//!
//! A [`Mesh`] owns its vertices and cells in two vectors sorted by id, plus a hash table per
//! entity mapping id to position. Every lookup goes through those tables, so ids do not
//! have to be dense or start at zero.
//!
//! Read-only scans (`point_in_any_triangle`, the circumcircle queries, the Delaunay check)
//! borrow the mesh immutably and never write caches. Methods that cache derived values on
//! cells (`circumcenter_of`, `area_of`, `integrate`, `refresh_derived`) take `&mut self`.
//!
//! # Examples
//!
//! ```rust
//! use trimesh::core::mesh::{Mesh, QuadratureRule};
//! use trimesh::geometry::point::Point;
//!
//! let mut mesh: Mesh<f64> = Mesh::empty(2, 0, 0).unwrap();
//! let a = mesh.append_point(0.0, 0.0, 0.0).unwrap();
//! let b = mesh.append_point(1.0, 0.0, 0.0).unwrap();
//! let c = mesh.append_point(0.0, 1.0, 0.0).unwrap();
//! let cell = mesh.append_cell(a, b, c).unwrap();
//!
//! assert_eq!(mesh.point_in_any_triangle(&Point::new([0.25, 0.25])).unwrap().as_slice(), &[cell]);
//! assert_eq!(mesh.area_of(cell).unwrap(), 0.5);
//! assert!(mesh.is_delaunay().unwrap());
//!
//! let total = mesh.integrate(|_, _| 1.0, QuadratureRule::LinearInterpolation).unwrap();
//! assert!((total - 0.5).abs() < 1e-12);
//! ```

#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::core::cell::{Cell, CellError, CellId, VERTICES_PER_CELL};
use crate::core::collections::{CellIdBuffer, FastHashMap, fast_hash_map_with_capacity};
use crate::core::util::delaunay_validation::{
    self, DelaunayValidationError, DelaunayViolation,
};
use crate::core::vertex::{Vertex, VertexId, VertexValidationError};
use crate::geometry::{
    point::Point,
    predicates::{GeometryError, InCircle, PredicateConfig, incircle_distance},
    traits::coordinate::CoordinateScalar,
    util::Circumcircle,
};

// =============================================================================
// ERROR TYPES
// =============================================================================

/// The kind of entity an id refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MeshEntity {
    /// A vertex id.
    Vertex,
    /// A cell id.
    Cell,
}

impl fmt::Display for MeshEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vertex => write!(f, "vertex"),
            Self::Cell => write!(f, "cell"),
        }
    }
}

/// Errors raised by mesh assembly, mutation and queries.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum MeshError {
    /// No entity with this id exists.
    #[error("No {entity} with id {id}")]
    OutOfRange {
        /// Which table was searched.
        entity: MeshEntity,
        /// The id that was not found.
        id: usize,
    },
    /// A cell's corners are collinear, so the requested quantity is undefined.
    #[error("Degenerate geometry in cell {cell_id}: {source}")]
    DegenerateGeometry {
        /// Id of the degenerate cell.
        cell_id: CellId,
        /// The underlying geometric failure.
        #[source]
        source: GeometryError,
    },
    /// The cell's circumcircle cache is empty.
    #[error("Circumcircle of cell {cell_id} has not been computed")]
    CircumcircleNotComputed {
        /// Id of the cell.
        cell_id: CellId,
    },
    /// Two entities share an id.
    #[error("Duplicate {entity} id {id}")]
    DuplicateId {
        /// Which table holds the duplicate.
        entity: MeshEntity,
        /// The repeated id.
        id: usize,
    },
    /// An attribute vector does not match the per-entity count in the header.
    #[error("{entity} {id} has {found} attributes; expected {expected}")]
    AttributeLength {
        /// Entity kind.
        entity: MeshEntity,
        /// Entity id.
        id: usize,
        /// Count from the header.
        expected: usize,
        /// Actual length.
        found: usize,
    },
    /// Only triangles are supported.
    #[error("Cells must have exactly 3 vertices; header declares {found}")]
    VerticesPerCell {
        /// The declared count.
        found: usize,
    },
    /// Stored coordinates must have 2 or 3 components.
    #[error("Unsupported coordinate dimension {found}; expected 2 or 3")]
    InvalidDimensions {
        /// The declared dimension.
        found: usize,
    },
    /// A vertex has non-finite coordinates.
    #[error(transparent)]
    InvalidVertex(#[from] VertexValidationError),
}

impl From<CellError> for MeshError {
    fn from(err: CellError) -> Self {
        match err {
            CellError::Degenerate { cell_id, source } => {
                Self::DegenerateGeometry { cell_id, source }
            }
            CellError::CircumcircleNotComputed { cell_id } => {
                Self::CircumcircleNotComputed { cell_id }
            }
            CellError::VertexNotFound { vertex_id, .. } => Self::OutOfRange {
                entity: MeshEntity::Vertex,
                id: vertex_id,
            },
        }
    }
}

// =============================================================================
// HEADER AND QUADRATURE
// =============================================================================

/// Mesh metadata, as found in the `.tri` header lines.
///
/// The counts always equal the collection lengths of the owning mesh.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeshHeader {
    /// Number of vertices.
    pub number_of_points: usize,
    /// Number of stored coordinates per vertex, 2 or 3.
    pub dimensions: usize,
    /// Length of every vertex attribute vector.
    pub attributes_per_point: usize,
    /// Number of cells.
    pub number_of_cells: usize,
    /// Corners per cell, always 3.
    pub vertices_per_cell: usize,
    /// Length of every cell attribute vector.
    pub attributes_per_cell: usize,
}

impl MeshHeader {
    /// Header of an empty mesh with the given layout.
    #[must_use]
    pub const fn new(
        dimensions: usize,
        attributes_per_point: usize,
        attributes_per_cell: usize,
    ) -> Self {
        Self {
            number_of_points: 0,
            dimensions,
            attributes_per_point,
            number_of_cells: 0,
            vertices_per_cell: VERTICES_PER_CELL,
            attributes_per_cell,
        }
    }

    fn validate(&self) -> Result<(), MeshError> {
        if !(2..=3).contains(&self.dimensions) {
            return Err(MeshError::InvalidDimensions {
                found: self.dimensions,
            });
        }
        if self.vertices_per_cell != VERTICES_PER_CELL {
            return Err(MeshError::VerticesPerCell {
                found: self.vertices_per_cell,
            });
        }
        Ok(())
    }
}

/// Quadrature rule for [`Mesh::integrate`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuadratureRule {
    /// `area * f(circumcenter)` per cell.
    ConstantValue,
    /// `area / 3 * (f(v0) + f(v1) + f(v2))` per cell.
    LinearInterpolation,
}

// =============================================================================
// MESH
// =============================================================================

/// A planar triangular mesh.
///
/// See the [module documentation](self) for the ownership model.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(
    bound = "T: CoordinateScalar",
    try_from = "MeshParts<T>",
    into = "MeshParts<T>"
)]
pub struct Mesh<T>
where
    T: CoordinateScalar,
{
    header: MeshHeader,
    vertices: Vec<Vertex<T>>,
    cells: Vec<Cell<T>>,
    vertex_index: FastHashMap<VertexId, usize>,
    cell_index: FastHashMap<CellId, usize>,
    config: PredicateConfig<T>,
}

/// Serialized form of a [`Mesh`]; the id tables are rebuilt on load.
#[derive(Serialize, Deserialize)]
#[serde(bound = "T: CoordinateScalar")]
struct MeshParts<T>
where
    T: CoordinateScalar,
{
    header: MeshHeader,
    vertices: Vec<Vertex<T>>,
    cells: Vec<Cell<T>>,
}

impl<T> TryFrom<MeshParts<T>> for Mesh<T>
where
    T: CoordinateScalar,
{
    type Error = MeshError;

    fn try_from(parts: MeshParts<T>) -> Result<Self, Self::Error> {
        Self::from_parts(parts.header, parts.vertices, parts.cells)
    }
}

impl<T> From<Mesh<T>> for MeshParts<T>
where
    T: CoordinateScalar,
{
    fn from(mesh: Mesh<T>) -> Self {
        Self {
            header: mesh.header,
            vertices: mesh.vertices,
            cells: mesh.cells,
        }
    }
}

impl<T> PartialEq for Mesh<T>
where
    T: CoordinateScalar,
{
    /// Compares header, vertices and cells. Caches and configuration are ignored.
    fn eq(&self, other: &Self) -> bool {
        self.header == other.header && self.vertices == other.vertices && self.cells == other.cells
    }
}

/// Coordinates of `vertex_id`, resolved through the id table.
fn lookup_point<T>(
    vertices: &[Vertex<T>],
    index: &FastHashMap<VertexId, usize>,
    vertex_id: VertexId,
) -> Option<Point<T, 3>>
where
    T: CoordinateScalar,
{
    index
        .get(&vertex_id)
        .and_then(|&pos| vertices.get(pos))
        .map(|v| *v.point())
}

fn build_index<I>(
    ids: I,
    entity: MeshEntity,
    len: usize,
) -> Result<FastHashMap<usize, usize>, MeshError>
where
    I: Iterator<Item = usize>,
{
    let mut index = fast_hash_map_with_capacity(len);
    for (pos, id) in ids.enumerate() {
        if index.insert(id, pos).is_some() {
            return Err(MeshError::DuplicateId { entity, id });
        }
    }
    Ok(index)
}

impl<T> Mesh<T>
where
    T: CoordinateScalar,
{
    // =========================================================================
    // CONSTRUCTION
    // =========================================================================

    /// Creates an empty mesh.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::InvalidDimensions`] unless `dimensions` is 2 or 3.
    pub fn empty(
        dimensions: usize,
        attributes_per_point: usize,
        attributes_per_cell: usize,
    ) -> Result<Self, MeshError> {
        Self::from_parts(
            MeshHeader::new(dimensions, attributes_per_point, attributes_per_cell),
            Vec::new(),
            Vec::new(),
        )
    }

    /// Assembles a mesh from loaded parts.
    ///
    /// Vertices and cells are sorted by id and indexed. The header counts are replaced by
    /// the collection lengths. On a two-dimensional mesh every `z` is set to zero.
    ///
    /// # Errors
    ///
    /// - [`MeshError::InvalidDimensions`] / [`MeshError::VerticesPerCell`] for a bad header
    /// - [`MeshError::InvalidVertex`] for non-finite coordinates
    /// - [`MeshError::AttributeLength`] when an attribute vector disagrees with the header
    /// - [`MeshError::DuplicateId`] when two vertices or two cells share an id
    /// - [`MeshError::OutOfRange`] when a cell names a vertex id that does not exist
    pub fn from_parts(
        mut header: MeshHeader,
        mut vertices: Vec<Vertex<T>>,
        mut cells: Vec<Cell<T>>,
    ) -> Result<Self, MeshError> {
        header.validate()?;

        for vertex in &vertices {
            vertex.is_valid()?;
            if vertex.attributes().len() != header.attributes_per_point {
                return Err(MeshError::AttributeLength {
                    entity: MeshEntity::Vertex,
                    id: vertex.id(),
                    expected: header.attributes_per_point,
                    found: vertex.attributes().len(),
                });
            }
        }
        for cell in &cells {
            if cell.attributes().len() != header.attributes_per_cell {
                return Err(MeshError::AttributeLength {
                    entity: MeshEntity::Cell,
                    id: cell.id(),
                    expected: header.attributes_per_cell,
                    found: cell.attributes().len(),
                });
            }
        }

        if header.dimensions == 2 {
            vertices.iter_mut().for_each(Vertex::flatten);
        }
        vertices.sort_by_key(Vertex::id);
        cells.sort_by_key(Cell::id);

        let vertex_index = build_index(
            vertices.iter().map(Vertex::id),
            MeshEntity::Vertex,
            vertices.len(),
        )?;
        let cell_index = build_index(cells.iter().map(Cell::id), MeshEntity::Cell, cells.len())?;

        for cell in &cells {
            if let Some(&vertex_id) = cell
                .vertices()
                .iter()
                .find(|&&id| !vertex_index.contains_key(&id))
            {
                return Err(MeshError::OutOfRange {
                    entity: MeshEntity::Vertex,
                    id: vertex_id,
                });
            }
        }

        if header.number_of_points != vertices.len() || header.number_of_cells != cells.len() {
            tracing::debug!(
                "Header counts ({} points, {} cells) replaced by loaded counts ({}, {})",
                header.number_of_points,
                header.number_of_cells,
                vertices.len(),
                cells.len()
            );
        }
        header.number_of_points = vertices.len();
        header.number_of_cells = cells.len();

        tracing::debug!(
            "Assembled mesh: {} vertices, {} cells, {} dimensions",
            vertices.len(),
            cells.len(),
            header.dimensions
        );

        Ok(Self {
            header,
            vertices,
            cells,
            vertex_index,
            cell_index,
            config: PredicateConfig::default(),
        })
    }

    /// Replaces the predicate configuration.
    #[must_use]
    pub fn with_config(mut self, config: PredicateConfig<T>) -> Self {
        self.config = config;
        self
    }

    /// Predicate configuration used by every query.
    #[inline]
    #[must_use]
    pub const fn config(&self) -> &PredicateConfig<T> {
        &self.config
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    /// Mesh metadata.
    #[inline]
    #[must_use]
    pub const fn header(&self) -> &MeshHeader {
        &self.header
    }

    /// Vertices in ascending id order.
    #[inline]
    #[must_use]
    pub fn vertices(&self) -> &[Vertex<T>] {
        &self.vertices
    }

    /// Cells in ascending id order.
    #[inline]
    #[must_use]
    pub fn cells(&self) -> &[Cell<T>] {
        &self.cells
    }

    /// Number of vertices.
    #[inline]
    #[must_use]
    pub fn number_of_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Number of cells.
    #[inline]
    #[must_use]
    pub fn number_of_cells(&self) -> usize {
        self.cells.len()
    }

    /// Stored coordinate dimension, 2 or 3.
    #[inline]
    #[must_use]
    pub const fn dimensions(&self) -> usize {
        self.header.dimensions
    }

    /// The vertex with id `vertex_id`.
    #[must_use]
    pub fn vertex(&self, vertex_id: VertexId) -> Option<&Vertex<T>> {
        self.vertex_index
            .get(&vertex_id)
            .and_then(|&pos| self.vertices.get(pos))
    }

    /// The cell with id `cell_id`.
    #[must_use]
    pub fn cell(&self, cell_id: CellId) -> Option<&Cell<T>> {
        self.cell_index
            .get(&cell_id)
            .and_then(|&pos| self.cells.get(pos))
    }

    /// Mutable access to the cell with id `cell_id`.
    pub fn cell_mut(&mut self, cell_id: CellId) -> Option<&mut Cell<T>> {
        self.cell_index
            .get(&cell_id)
            .and_then(|&pos| self.cells.get_mut(pos))
    }

    /// Replaces the attributes of a cell.
    ///
    /// # Errors
    ///
    /// - [`MeshError::OutOfRange`] for an unknown cell id
    /// - [`MeshError::AttributeLength`] if `attributes` does not have
    ///   `attributes_per_cell` entries
    pub fn set_cell_attributes(
        &mut self,
        cell_id: CellId,
        attributes: Vec<T>,
    ) -> Result<(), MeshError> {
        let expected = self.header.attributes_per_cell;
        if attributes.len() != expected {
            return Err(MeshError::AttributeLength {
                entity: MeshEntity::Cell,
                id: cell_id,
                expected,
                found: attributes.len(),
            });
        }
        self.cell_mut(cell_id)
            .ok_or(MeshError::OutOfRange {
                entity: MeshEntity::Cell,
                id: cell_id,
            })?
            .set_attributes(attributes);
        Ok(())
    }

    fn cell_or_err(&self, cell_id: CellId) -> Result<&Cell<T>, MeshError> {
        self.cell(cell_id).ok_or(MeshError::OutOfRange {
            entity: MeshEntity::Cell,
            id: cell_id,
        })
    }

    fn vertex_or_err(&self, vertex_id: VertexId) -> Result<&Vertex<T>, MeshError> {
        self.vertex(vertex_id).ok_or(MeshError::OutOfRange {
            entity: MeshEntity::Vertex,
            id: vertex_id,
        })
    }

    /// Corner coordinates of `cell`, in stored order.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::OutOfRange`] if a corner id is unknown.
    pub fn corners(&self, cell: &Cell<T>) -> Result<[Point<T, 3>; VERTICES_PER_CELL], MeshError> {
        Ok(cell.resolve_corners(|id| lookup_point(&self.vertices, &self.vertex_index, id))?)
    }

    // =========================================================================
    // MUTATION
    // =========================================================================

    /// Appends a vertex with id one past the current largest (0 on an empty mesh).
    ///
    /// The attribute vector is zero-filled to `attributes_per_point`. On a
    /// two-dimensional mesh `z` is ignored and stored as zero.
    ///
    /// # Errors
    ///
    /// - [`MeshError::InvalidVertex`] for non-finite coordinates
    /// - [`MeshError::OutOfRange`] if the largest id is `usize::MAX`
    pub fn append_point(&mut self, x: T, y: T, z: T) -> Result<VertexId, MeshError> {
        let id = match self.vertices.last() {
            Some(last) => last.id().checked_add(1).ok_or(MeshError::OutOfRange {
                entity: MeshEntity::Vertex,
                id: last.id(),
            })?,
            None => 0,
        };
        let z = if self.header.dimensions == 2 { T::zero() } else { z };
        let vertex = Vertex::new(
            id,
            Point::new([x, y, z]),
            vec![T::zero(); self.header.attributes_per_point],
        );
        vertex.is_valid()?;

        self.vertex_index.insert(id, self.vertices.len());
        self.vertices.push(vertex);
        self.header.number_of_points = self.vertices.len();
        Ok(id)
    }

    /// Appends a cell with id one past the current largest (0 on an empty mesh).
    ///
    /// The attribute vector is zero-filled to `attributes_per_cell`; populate it with
    /// [`set_cell_attributes`](Self::set_cell_attributes).
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::OutOfRange`] if a corner id names no vertex.
    pub fn append_cell(
        &mut self,
        v0: VertexId,
        v1: VertexId,
        v2: VertexId,
    ) -> Result<CellId, MeshError> {
        for vertex_id in [v0, v1, v2] {
            self.vertex_or_err(vertex_id)?;
        }
        let id = match self.cells.last() {
            Some(last) => last.id().checked_add(1).ok_or(MeshError::OutOfRange {
                entity: MeshEntity::Cell,
                id: last.id(),
            })?,
            None => 0,
        };
        let cell = Cell::new(
            id,
            [v0, v1, v2],
            vec![T::zero(); self.header.attributes_per_cell],
        );

        self.cell_index.insert(id, self.cells.len());
        self.cells.push(cell);
        self.header.number_of_cells = self.cells.len();
        Ok(id)
    }

    /// Recomputes and caches area and circumcircle of every cell.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::DegenerateGeometry`] at the first collinear cell; cells before
    /// it keep their refreshed values.
    pub fn refresh_derived(&mut self) -> Result<(), MeshError> {
        let config = self.config;
        let vertices = &self.vertices;
        let index = &self.vertex_index;
        for cell in &mut self.cells {
            let corners = cell.resolve_corners(|id| lookup_point(vertices, index, id))?;
            cell.compute_area(&corners);
            cell.compute_circumcircle(&corners, &config)?;
        }
        Ok(())
    }

    // =========================================================================
    // PER-CELL QUERIES
    // =========================================================================

    /// Computes, caches and returns the circumcircle of a cell.
    ///
    /// # Errors
    ///
    /// - [`MeshError::OutOfRange`] for an unknown cell id
    /// - [`MeshError::DegenerateGeometry`] for a collinear cell
    pub fn circumcircle_of(&mut self, cell_id: CellId) -> Result<Circumcircle<T>, MeshError> {
        let corners = self.corners(self.cell_or_err(cell_id)?)?;
        let config = self.config;
        let cell = self.cell_mut(cell_id).ok_or(MeshError::OutOfRange {
            entity: MeshEntity::Cell,
            id: cell_id,
        })?;
        Ok(cell.compute_circumcircle(&corners, &config)?)
    }

    /// Computes, caches and returns the circumcenter of a cell.
    ///
    /// # Errors
    ///
    /// Same as [`circumcircle_of`](Self::circumcircle_of).
    pub fn circumcenter_of(&mut self, cell_id: CellId) -> Result<Point<T, 2>, MeshError> {
        Ok(self.circumcircle_of(cell_id)?.center)
    }

    /// Computes, caches and returns the area of a cell.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::OutOfRange`] for an unknown cell id.
    pub fn area_of(&mut self, cell_id: CellId) -> Result<T, MeshError> {
        let corners = self.corners(self.cell_or_err(cell_id)?)?;
        let cell = self.cell_mut(cell_id).ok_or(MeshError::OutOfRange {
            entity: MeshEntity::Cell,
            id: cell_id,
        })?;
        Ok(cell.compute_area(&corners))
    }

    /// Whether `p` lies in cell `cell_id` or on its boundary.
    ///
    /// # Errors
    ///
    /// - [`MeshError::OutOfRange`] for an unknown cell id
    /// - [`MeshError::DegenerateGeometry`] for a collinear cell
    pub fn cell_contains_point<const D: usize>(
        &self,
        cell_id: CellId,
        p: &Point<T, D>,
    ) -> Result<bool, MeshError> {
        let cell = self.cell_or_err(cell_id)?;
        let corners = self.corners(cell)?;
        Ok(cell.contains_point(p, &corners, &self.config)?)
    }

    /// Whether `p` lies in the cached circumcircle of cell `cell_id`, boundary included.
    ///
    /// # Errors
    ///
    /// - [`MeshError::OutOfRange`] for an unknown cell id
    /// - [`MeshError::CircumcircleNotComputed`] if the circumcircle was never computed
    pub fn cell_circumcircle_contains<const D: usize>(
        &self,
        cell_id: CellId,
        p: &Point<T, D>,
    ) -> Result<bool, MeshError> {
        Ok(self
            .cell_or_err(cell_id)?
            .contains_in_circumcircle(p, &self.config)?)
    }

    // =========================================================================
    // MESH-WIDE SCANS
    // =========================================================================

    /// Ids of every cell containing `p`, boundary included.
    ///
    /// A point on an edge shared by two cells matches both.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::DegenerateGeometry`] at the first collinear cell.
    pub fn point_in_any_triangle<const D: usize>(
        &self,
        p: &Point<T, D>,
    ) -> Result<CellIdBuffer, MeshError> {
        let mut hits = CellIdBuffer::new();
        for cell in &self.cells {
            let corners = self.corners(cell)?;
            if cell.contains_point(p, &corners, &self.config)? {
                hits.push(cell.id());
            }
        }
        Ok(hits)
    }

    /// Ids of every cell whose circumcircle contains `p`, boundary included.
    ///
    /// Cells with a corner at exactly `p` (equal x and y) are skipped, so a query at an
    /// existing vertex position does not report that vertex's own cells. Circumcircles are
    /// recomputed for the scan and not cached.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::DegenerateGeometry`] at the first collinear cell that is not
    /// skipped.
    #[allow(clippy::float_cmp)]
    pub fn cells_containing_in_circumcircle<const D: usize>(
        &self,
        p: &Point<T, D>,
    ) -> Result<CellIdBuffer, MeshError> {
        let mut hits = CellIdBuffer::new();
        for cell in &self.cells {
            let corners = self.corners(cell)?;
            if corners.iter().any(|c| c.x() == p.x() && c.y() == p.y()) {
                continue;
            }
            if self.in_circumcircle(cell, &corners, p)? != InCircle::OUTSIDE {
                hits.push(cell.id());
            }
        }
        Ok(hits)
    }

    /// Ids of every cell not incident to `vertex_id` whose circumcircle contains that
    /// vertex, boundary included.
    ///
    /// # Errors
    ///
    /// - [`MeshError::OutOfRange`] for an unknown vertex id
    /// - [`MeshError::DegenerateGeometry`] at the first collinear cell not incident to the
    ///   vertex
    pub fn cells_with_vertex_in_circumcircle(
        &self,
        vertex_id: VertexId,
    ) -> Result<CellIdBuffer, MeshError> {
        let p = *self.vertex_or_err(vertex_id)?.point();
        let mut hits = CellIdBuffer::new();
        for cell in self.cells.iter().filter(|c| !c.has_vertex(vertex_id)) {
            let corners = self.corners(cell)?;
            if self.in_circumcircle(cell, &corners, &p)? != InCircle::OUTSIDE {
                hits.push(cell.id());
            }
        }
        Ok(hits)
    }

    /// Whether vertex `vertex_id` lies in the circumcircle (boundary included) of any cell
    /// it is not a corner of.
    ///
    /// # Errors
    ///
    /// Same as [`cells_with_vertex_in_circumcircle`](Self::cells_with_vertex_in_circumcircle).
    pub fn is_existing_vertex_in_any_circumcircle(
        &self,
        vertex_id: VertexId,
    ) -> Result<bool, MeshError> {
        let p = *self.vertex_or_err(vertex_id)?.point();
        for cell in self.cells.iter().filter(|c| !c.has_vertex(vertex_id)) {
            let corners = self.corners(cell)?;
            if self.in_circumcircle(cell, &corners, &p)? != InCircle::OUTSIDE {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Classifies `p` against the circumcircle of `cell` without caching.
    pub(crate) fn in_circumcircle<const D: usize>(
        &self,
        cell: &Cell<T>,
        corners: &[Point<T, 3>; VERTICES_PER_CELL],
        p: &Point<T, D>,
    ) -> Result<InCircle, MeshError> {
        let circle = cell.circumcircle(corners, &self.config)?;
        Ok(incircle_distance(&circle, p, &self.config))
    }

    // =========================================================================
    // DELAUNAY PROPERTY
    // =========================================================================

    /// Whether no vertex lies strictly inside the circumcircle of a cell it is not a
    /// corner of. Cocircular vertices do not count as violations.
    ///
    /// # Errors
    ///
    /// Returns [`DelaunayValidationError::Geometry`] if a cell is degenerate.
    pub fn is_delaunay(&self) -> Result<bool, DelaunayValidationError> {
        delaunay_validation::is_delaunay(self)
    }

    /// Every (vertex, cell) pair that breaks the Delaunay property.
    ///
    /// # Errors
    ///
    /// Returns [`DelaunayValidationError::Geometry`] if a cell is degenerate.
    pub fn find_delaunay_violations(
        &self,
    ) -> Result<Vec<DelaunayViolation>, DelaunayValidationError> {
        delaunay_validation::find_delaunay_violations(self, None)
    }

    /// Checks the Delaunay property, reporting the first violation as an error.
    ///
    /// # Errors
    ///
    /// - [`DelaunayValidationError::DelaunayViolation`] for the first violating pair
    /// - [`DelaunayValidationError::Geometry`] if a cell is degenerate
    pub fn validate_delaunay(&self) -> Result<(), DelaunayValidationError> {
        delaunay_validation::validate_delaunay(self)
    }

    // =========================================================================
    // QUADRATURE
    // =========================================================================

    /// Approximates the integral of `f` over the mesh.
    ///
    /// Both rules refresh the cached area of every cell; [`QuadratureRule::ConstantValue`]
    /// also refreshes the cached circumcircle.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::DegenerateGeometry`] when the constant rule meets a collinear
    /// cell, whose circumcenter is undefined.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use trimesh::core::mesh::{Mesh, QuadratureRule};
    ///
    /// let mut mesh: Mesh<f64> = Mesh::empty(2, 0, 0).unwrap();
    /// let a = mesh.append_point(0.0, 0.0, 0.0).unwrap();
    /// let b = mesh.append_point(2.0, 0.0, 0.0).unwrap();
    /// let c = mesh.append_point(0.0, 2.0, 0.0).unwrap();
    /// mesh.append_cell(a, b, c).unwrap();
    ///
    /// // f(x, y) = x is linear, so the vertex rule is exact: area 2, centroid x = 2/3.
    /// let linear = mesh.integrate(|x, _| x, QuadratureRule::LinearInterpolation).unwrap();
    /// assert!((linear - 4.0 / 3.0).abs() < 1e-12);
    /// ```
    pub fn integrate<F>(&mut self, f: F, rule: QuadratureRule) -> Result<T, MeshError>
    where
        F: Fn(T, T) -> T,
    {
        let config = self.config;
        let three = T::one() + T::one() + T::one();
        let vertices = &self.vertices;
        let index = &self.vertex_index;

        let mut total = T::zero();
        for cell in &mut self.cells {
            let corners = cell.resolve_corners(|id| lookup_point(vertices, index, id))?;
            let area = cell.compute_area(&corners);
            let contribution = match rule {
                QuadratureRule::ConstantValue => {
                    let center = cell.compute_circumcircle(&corners, &config)?.center;
                    area * f(center.x(), center.y())
                }
                QuadratureRule::LinearInterpolation => {
                    let sum = corners
                        .iter()
                        .fold(T::zero(), |acc, c| acc + f(c.x(), c.y()));
                    area / three * sum
                }
            };
            total = total + contribution;
        }
        Ok(total)
    }
}
