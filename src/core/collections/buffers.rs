use crate::core::cell::CellId;

use super::SmallBuffer;

// =============================================================================
// QUERY RESULT BUFFERS
// =============================================================================

/// Inline capacity of [`CellIdBuffer`].
///
/// A point inside a triangle hits one cell, a point on an edge two, and a vertex of a
/// fan six or so. Circumcircle scans on a well shaped mesh return a similar number.
pub const CELL_QUERY_BUFFER_SIZE: usize = 8;

/// Ids of the cells matched by a mesh query, in ascending id order.
pub type CellIdBuffer = SmallBuffer<CellId, CELL_QUERY_BUFFER_SIZE>;
