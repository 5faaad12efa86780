//! Delaunay empty-circumcircle property validation.
//!
//! A mesh is Delaunay when no vertex lies strictly inside the circumcircle of a cell it
//! is not a corner of. Vertices on a circumcircle (within the mesh's boundary tolerance)
//! are allowed, so a square split along either diagonal passes.
//!
//! The check is exhaustive: every vertex against every cell.

#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::cell::{Cell, CellId};
use crate::core::mesh::{Mesh, MeshError};
use crate::core::vertex::VertexId;
use crate::geometry::predicates::{InCircle, incircle_distance};
use crate::geometry::traits::coordinate::CoordinateScalar;

/// A vertex found strictly inside the circumcircle of a cell it does not belong to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DelaunayViolation {
    /// The offending vertex.
    pub vertex_id: VertexId,
    /// The cell whose circumcircle contains it.
    pub cell_id: CellId,
}

/// Errors that can occur during Delaunay property validation.
///
/// # Examples
///
/// ```rust
/// use trimesh::core::util::DelaunayValidationError;
///
/// let err = DelaunayValidationError::DelaunayViolation { vertex_id: 3, cell_id: 0 };
/// assert_eq!(
///     err.to_string(),
///     "Delaunay violation: vertex 3 lies inside the circumcircle of cell 0"
/// );
/// ```
#[derive(Clone, Debug, Error, PartialEq)]
pub enum DelaunayValidationError {
    /// A vertex lies strictly inside a foreign circumcircle.
    #[error("Delaunay violation: vertex {vertex_id} lies inside the circumcircle of cell {cell_id}")]
    DelaunayViolation {
        /// The offending vertex.
        vertex_id: VertexId,
        /// The cell whose circumcircle contains it.
        cell_id: CellId,
    },
    /// The check could not be evaluated, usually because a cell is degenerate.
    #[error("Geometry error during Delaunay validation: {0}")]
    Geometry(#[from] MeshError),
}

impl From<DelaunayViolation> for DelaunayValidationError {
    fn from(v: DelaunayViolation) -> Self {
        Self::DelaunayViolation {
            vertex_id: v.vertex_id,
            cell_id: v.cell_id,
        }
    }
}

// =============================================================================
// DELAUNAY PROPERTY VALIDATION
// =============================================================================

/// Visits every vertex strictly inside the circumcircle of `cell`, excluding its corners.
///
/// `visit` returns `false` to stop early.
fn scan_cell<T, F>(mesh: &Mesh<T>, cell: &Cell<T>, visit: &mut F) -> Result<bool, MeshError>
where
    T: CoordinateScalar,
    F: FnMut(DelaunayViolation) -> bool,
{
    let corners = mesh.corners(cell)?;
    let config = mesh.config();
    let circle = cell.circumcircle(&corners, config)?;

    for vertex in mesh.vertices() {
        if cell.has_vertex(vertex.id()) {
            continue;
        }
        let position = incircle_distance(&circle, vertex.point(), config);
        if position == InCircle::INSIDE {
            let violation = DelaunayViolation {
                vertex_id: vertex.id(),
                cell_id: cell.id(),
            };
            tracing::debug!(
                vertex_id = violation.vertex_id,
                cell_id = violation.cell_id,
                point = ?vertex.point(),
                center = ?circle.center,
                radius = ?circle.radius,
                "Delaunay violation: vertex inside circumcircle"
            );
            if !visit(violation) {
                return Ok(false);
            }
        }
    }
    Ok(true)
}

/// Finds every (vertex, cell) pair that violates the Delaunay property.
///
/// Pairs are reported in ascending cell id, then ascending vertex id.
///
/// # Arguments
///
/// * `mesh` - The mesh to check
/// * `cells_to_check` - Optional subset of cell ids. If `None`, checks all cells.
///   Ids with no cell are skipped.
///
/// # Errors
///
/// Returns [`DelaunayValidationError::Geometry`] if a checked cell is degenerate.
///
/// # Examples
///
/// ```rust
/// use trimesh::core::mesh::Mesh;
/// use trimesh::core::util::find_delaunay_violations;
///
/// let mut mesh: Mesh<f64> = Mesh::empty(2, 0, 0).unwrap();
/// for (x, y) in [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (0.8, 0.8)] {
///     mesh.append_point(x, y, 0.0).unwrap();
/// }
/// mesh.append_cell(0, 1, 2).unwrap();
/// mesh.append_cell(1, 3, 2).unwrap();
///
/// let violations = find_delaunay_violations(&mesh, None).unwrap();
/// assert_eq!(violations.len(), 2);
/// ```
pub fn find_delaunay_violations<T>(
    mesh: &Mesh<T>,
    cells_to_check: Option<&[CellId]>,
) -> Result<Vec<DelaunayViolation>, DelaunayValidationError>
where
    T: CoordinateScalar,
{
    let mut violations = Vec::new();
    let mut collect = |v: DelaunayViolation| {
        violations.push(v);
        true
    };

    match cells_to_check {
        Some(ids) => {
            tracing::debug!(
                "find_delaunay_violations: checking {} requested cells",
                ids.len()
            );
            for cell in ids.iter().filter_map(|&id| mesh.cell(id)) {
                scan_cell(mesh, cell, &mut collect)?;
            }
        }
        None => {
            tracing::debug!(
                "find_delaunay_violations: checking all {} cells against {} vertices",
                mesh.number_of_cells(),
                mesh.number_of_vertices()
            );
            for cell in mesh.cells() {
                scan_cell(mesh, cell, &mut collect)?;
            }
        }
    }

    tracing::debug!(
        "find_delaunay_violations: found {} violations",
        violations.len()
    );
    Ok(violations)
}

/// Checks the Delaunay property, returning the first violation as an error.
///
/// # Errors
///
/// - [`DelaunayValidationError::DelaunayViolation`] for the first violating pair
/// - [`DelaunayValidationError::Geometry`] if a cell is degenerate
pub fn validate_delaunay<T>(mesh: &Mesh<T>) -> Result<(), DelaunayValidationError>
where
    T: CoordinateScalar,
{
    let mut first = None;
    for cell in mesh.cells() {
        let keep_going = scan_cell(mesh, cell, &mut |v| {
            first = Some(v);
            false
        })?;
        if !keep_going {
            break;
        }
    }
    first.map_or(Ok(()), |v| Err(v.into()))
}

/// Whether the mesh satisfies the Delaunay property.
///
/// Stops at the first violation.
///
/// # Errors
///
/// Returns [`DelaunayValidationError::Geometry`] if a cell is degenerate.
pub fn is_delaunay<T>(mesh: &Mesh<T>) -> Result<bool, DelaunayValidationError>
where
    T: CoordinateScalar,
{
    match validate_delaunay(mesh) {
        Ok(()) => Ok(true),
        Err(DelaunayValidationError::DelaunayViolation { .. }) => Ok(false),
        Err(err) => Err(err),
    }
}
