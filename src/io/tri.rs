//! Reader and writer for the whitespace-separated `.tri` mesh format.
//!
//! ```text
//! <pointCount> <dimensions> <attributesPerPoint>
//! <id> <x> <y> [<z>] [<attr>...]            (pointCount records)
//! <cellCount> <verticesPerCell> <attributesPerCell>
//! <id> <v0> <v1> <v2> [<attr>...]           (cellCount records)
//! ```
//!
//! Records may list ids in any order; the mesh sorts them on load. `dimensions` is 2 or
//! 3 (with 2, z is set to zero on read and omitted on write) and `verticesPerCell` must
//! be 3. Anything after the last cell is an error.
//!
//! The format code talks to the outside world only through [`TokenReader`] and
//! [`TokenWriter`]. [`Tokens`] and [`TokenSink`] adapt any `BufRead` / `Write`.
//!
//! ## Example
//!
//! ```rust
//! use trimesh::io::tri::{read_mesh, write_mesh};
//! use trimesh::core::mesh::Mesh;
//!
//! let text = "3 2 0\n0 0 0\n1 1 0\n2 0 1\n1 3 1\n0 0 1 2 2.5\n";
//! let mesh: Mesh<f64> = read_mesh(text.as_bytes()).unwrap();
//! assert_eq!(mesh.number_of_cells(), 1);
//! assert_eq!(mesh.cell(0).unwrap().attributes(), &[2.5]);
//!
//! let mut out = Vec::new();
//! write_mesh(&mesh, &mut out).unwrap();
//! assert_eq!(String::from_utf8(out).unwrap(), text);
//! ```

use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use thiserror::Error;

use crate::core::cell::{Cell, VERTICES_PER_CELL};
use crate::core::mesh::{Mesh, MeshError, MeshHeader};
use crate::core::vertex::Vertex;
use crate::geometry::point::Point;
use crate::geometry::traits::coordinate::CoordinateScalar;

/// Upper bound on capacity reserved from header counts before the records are seen.
const MAX_PREALLOCATION: usize = 1 << 16;

/// Error type for `.tri` I/O.
#[derive(Debug, Error)]
pub enum TriFormatError {
    /// The underlying reader or writer failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Input ended in the middle of the mesh.
    #[error("Unexpected end of input: expected {expected}")]
    UnexpectedEof {
        /// What the reader was looking for.
        expected: &'static str,
    },

    /// A token did not parse as the expected kind of value.
    #[error("Invalid {expected} '{token}' on line {line}")]
    InvalidToken {
        /// The offending token.
        token: String,
        /// What the reader was looking for.
        expected: &'static str,
        /// 1-based input line.
        line: usize,
    },

    /// A header line has a value outside the supported range.
    #[error("Invalid header on line {line}: {message}")]
    InvalidHeader {
        /// 1-based input line.
        line: usize,
        /// Description of the problem.
        message: String,
    },

    /// Input continues after the last cell record.
    #[error("Unexpected trailing data '{token}' on line {line}")]
    TrailingData {
        /// First extra token.
        token: String,
        /// 1-based input line.
        line: usize,
    },

    /// The records parsed but do not form a valid mesh (duplicate or dangling ids).
    #[error("Invalid mesh: {0}")]
    Mesh(#[from] MeshError),
}

// =============================================================================
// TOKEN ABSTRACTION
// =============================================================================

/// A source of whitespace-separated tokens.
pub trait TokenReader {
    /// Returns the next token, or `None` at end of input.
    ///
    /// # Errors
    ///
    /// Returns [`TriFormatError::Io`] if the underlying source fails.
    fn next_token(&mut self) -> Result<Option<String>, TriFormatError>;

    /// 1-based line of the most recently returned token, for diagnostics.
    fn line(&self) -> usize {
        0
    }
}

/// A sink for tokens grouped into records.
pub trait TokenWriter {
    /// Appends a token to the current record.
    ///
    /// # Errors
    ///
    /// Returns [`TriFormatError::Io`] if the underlying sink fails.
    fn write_token(&mut self, token: &str) -> Result<(), TriFormatError>;

    /// Terminates the current record.
    ///
    /// # Errors
    ///
    /// Returns [`TriFormatError::Io`] if the underlying sink fails.
    fn end_record(&mut self) -> Result<(), TriFormatError>;

    /// Flushes buffered output.
    ///
    /// # Errors
    ///
    /// Returns [`TriFormatError::Io`] if the underlying sink fails.
    fn flush(&mut self) -> Result<(), TriFormatError> {
        Ok(())
    }
}

/// [`TokenReader`] over any `BufRead`, tracking line numbers.
#[derive(Debug)]
pub struct Tokens<R: BufRead> {
    reader: R,
    line: usize,
    buffer: String,
    pending: VecDeque<String>,
}

impl<R: BufRead> Tokens<R> {
    /// Wraps a reader.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: 0,
            buffer: String::new(),
            pending: VecDeque::new(),
        }
    }
}

impl<R: BufRead> TokenReader for Tokens<R> {
    fn next_token(&mut self) -> Result<Option<String>, TriFormatError> {
        while self.pending.is_empty() {
            self.buffer.clear();
            if self.reader.read_line(&mut self.buffer)? == 0 {
                return Ok(None);
            }
            self.line += 1;
            self.pending
                .extend(self.buffer.split_whitespace().map(str::to_owned));
        }
        Ok(self.pending.pop_front())
    }

    fn line(&self) -> usize {
        self.line
    }
}

/// [`TokenWriter`] over any `Write`: tokens separated by one space, records by a newline.
#[derive(Debug)]
pub struct TokenSink<W: Write> {
    writer: W,
    at_record_start: bool,
}

impl<W: Write> TokenSink<W> {
    /// Wraps a writer.
    pub const fn new(writer: W) -> Self {
        Self {
            writer,
            at_record_start: true,
        }
    }

    /// Returns the wrapped writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> TokenWriter for TokenSink<W> {
    fn write_token(&mut self, token: &str) -> Result<(), TriFormatError> {
        if !self.at_record_start {
            self.writer.write_all(b" ")?;
        }
        self.writer.write_all(token.as_bytes())?;
        self.at_record_start = false;
        Ok(())
    }

    fn end_record(&mut self) -> Result<(), TriFormatError> {
        self.writer.write_all(b"\n")?;
        self.at_record_start = true;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), TriFormatError> {
        self.writer.flush()?;
        Ok(())
    }
}

// =============================================================================
// READING
// =============================================================================

fn next_value<V, R>(tokens: &mut R, expected: &'static str) -> Result<V, TriFormatError>
where
    V: FromStr,
    R: TokenReader + ?Sized,
{
    let token = tokens
        .next_token()?
        .ok_or(TriFormatError::UnexpectedEof { expected })?;
    token.parse().map_err(|_| TriFormatError::InvalidToken {
        token,
        expected,
        line: tokens.line(),
    })
}

fn next_values<V, R>(
    tokens: &mut R,
    count: usize,
    expected: &'static str,
) -> Result<Vec<V>, TriFormatError>
where
    V: FromStr,
    R: TokenReader + ?Sized,
{
    (0..count).map(|_| next_value(tokens, expected)).collect()
}

/// Reads a mesh from a token source.
///
/// # Errors
///
/// - [`TriFormatError::UnexpectedEof`] / [`TriFormatError::InvalidToken`] for truncated or
///   malformed input
/// - [`TriFormatError::InvalidHeader`] for a dimension other than 2 or 3, or cells that
///   are not triangles
/// - [`TriFormatError::TrailingData`] if tokens follow the last cell
/// - [`TriFormatError::Mesh`] for duplicate ids, dangling vertex references or non-finite
///   coordinates
pub fn read_mesh_from_tokens<T, R>(tokens: &mut R) -> Result<Mesh<T>, TriFormatError>
where
    T: CoordinateScalar,
    R: TokenReader + ?Sized,
{
    let number_of_points: usize = next_value(tokens, "point count")?;
    let dimensions: usize = next_value(tokens, "dimension count")?;
    let attributes_per_point: usize = next_value(tokens, "attributes-per-point count")?;
    if !(2..=3).contains(&dimensions) {
        return Err(TriFormatError::InvalidHeader {
            line: tokens.line(),
            message: format!("dimension must be 2 or 3, found {dimensions}"),
        });
    }

    let mut vertices = Vec::with_capacity(number_of_points.min(MAX_PREALLOCATION));
    for _ in 0..number_of_points {
        let id: usize = next_value(tokens, "point id")?;
        let mut coords = [T::zero(); 3];
        for coord in coords.iter_mut().take(dimensions) {
            *coord = next_value(tokens, "coordinate")?;
        }
        let attributes = next_values(tokens, attributes_per_point, "point attribute")?;
        vertices.push(Vertex::new(id, Point::new(coords), attributes));
    }

    let number_of_cells: usize = next_value(tokens, "cell count")?;
    let vertices_per_cell: usize = next_value(tokens, "vertices-per-cell count")?;
    let attributes_per_cell: usize = next_value(tokens, "attributes-per-cell count")?;
    if vertices_per_cell != VERTICES_PER_CELL {
        return Err(TriFormatError::InvalidHeader {
            line: tokens.line(),
            message: format!("cells must have 3 vertices, found {vertices_per_cell}"),
        });
    }

    let mut cells = Vec::with_capacity(number_of_cells.min(MAX_PREALLOCATION));
    for _ in 0..number_of_cells {
        let id: usize = next_value(tokens, "cell id")?;
        let mut corners = [0; VERTICES_PER_CELL];
        for corner in &mut corners {
            *corner = next_value(tokens, "vertex id")?;
        }
        let attributes = next_values(tokens, attributes_per_cell, "cell attribute")?;
        cells.push(Cell::new(id, corners, attributes));
    }

    if let Some(token) = tokens.next_token()? {
        return Err(TriFormatError::TrailingData {
            token,
            line: tokens.line(),
        });
    }

    let header = MeshHeader {
        number_of_points,
        dimensions,
        attributes_per_point,
        number_of_cells,
        vertices_per_cell,
        attributes_per_cell,
    };
    let mesh = Mesh::from_parts(header, vertices, cells)?;
    tracing::debug!(
        "Read .tri mesh: {} points, {} cells",
        mesh.number_of_vertices(),
        mesh.number_of_cells()
    );
    Ok(mesh)
}

/// Reads a mesh from any buffered reader.
///
/// # Errors
///
/// See [`read_mesh_from_tokens`].
pub fn read_mesh<T, R>(reader: R) -> Result<Mesh<T>, TriFormatError>
where
    T: CoordinateScalar,
    R: BufRead,
{
    read_mesh_from_tokens(&mut Tokens::new(reader))
}

/// Reads a mesh from a file.
///
/// # Errors
///
/// Returns [`TriFormatError::Io`] if the file cannot be opened, otherwise see
/// [`read_mesh_from_tokens`].
pub fn read_mesh_file<T>(path: &Path) -> Result<Mesh<T>, TriFormatError>
where
    T: CoordinateScalar,
{
    let file = File::open(path)?;
    read_mesh(BufReader::new(file))
}

// =============================================================================
// WRITING
// =============================================================================

fn write_values<T, W>(sink: &mut W, values: &[T]) -> Result<(), TriFormatError>
where
    T: CoordinateScalar,
    W: TokenWriter + ?Sized,
{
    for value in values {
        sink.write_token(&value.to_string())?;
    }
    Ok(())
}

/// Writes a mesh to a token sink.
///
/// Scalars use Rust's shortest round-trip formatting, so reading the output back yields
/// identical values. On a two-dimensional mesh z is omitted.
///
/// # Errors
///
/// Returns [`TriFormatError::Io`] if the sink fails.
pub fn write_mesh_to_tokens<T, W>(mesh: &Mesh<T>, sink: &mut W) -> Result<(), TriFormatError>
where
    T: CoordinateScalar,
    W: TokenWriter + ?Sized,
{
    let header = mesh.header();

    sink.write_token(&mesh.number_of_vertices().to_string())?;
    sink.write_token(&header.dimensions.to_string())?;
    sink.write_token(&header.attributes_per_point.to_string())?;
    sink.end_record()?;

    for vertex in mesh.vertices() {
        sink.write_token(&vertex.id().to_string())?;
        write_values(sink, &vertex.point().coords()[..header.dimensions])?;
        write_values(sink, vertex.attributes())?;
        sink.end_record()?;
    }

    sink.write_token(&mesh.number_of_cells().to_string())?;
    sink.write_token(&header.vertices_per_cell.to_string())?;
    sink.write_token(&header.attributes_per_cell.to_string())?;
    sink.end_record()?;

    for cell in mesh.cells() {
        sink.write_token(&cell.id().to_string())?;
        for vertex_id in cell.vertices() {
            sink.write_token(&vertex_id.to_string())?;
        }
        write_values(sink, cell.attributes())?;
        sink.end_record()?;
    }

    sink.flush()?;
    tracing::debug!(
        "Wrote .tri mesh: {} points, {} cells",
        mesh.number_of_vertices(),
        mesh.number_of_cells()
    );
    Ok(())
}

/// Writes a mesh to any writer.
///
/// # Errors
///
/// Returns [`TriFormatError::Io`] if the writer fails.
pub fn write_mesh<T, W>(mesh: &Mesh<T>, writer: W) -> Result<(), TriFormatError>
where
    T: CoordinateScalar,
    W: Write,
{
    write_mesh_to_tokens(mesh, &mut TokenSink::new(writer))
}

/// Writes a mesh to a file, replacing it if it exists.
///
/// # Errors
///
/// Returns [`TriFormatError::Io`] if the file cannot be created or written.
pub fn write_mesh_file<T>(mesh: &Mesh<T>, path: &Path) -> Result<(), TriFormatError>
where
    T: CoordinateScalar,
{
    let file = File::create(path)?;
    write_mesh(mesh, BufWriter::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use crate::core::mesh::MeshEntity;

    const UNSORTED_3D: &str = "\
4 3 1
3 0.8 0.8 0.5 40
0 0 0 0 10
2 0 1 0 30
1 1 0 0 20
2 3 2
1 1 3 2 0.5 -1
0 0 1 3 1.5 2
";

    #[test]
    fn tokens_track_lines() {
        let mut tokens = Tokens::new("a b\n\n  c\n".as_bytes());
        assert_eq!(tokens.next_token().unwrap().as_deref(), Some("a"));
        assert_eq!(tokens.line(), 1);
        assert_eq!(tokens.next_token().unwrap().as_deref(), Some("b"));
        assert_eq!(tokens.next_token().unwrap().as_deref(), Some("c"));
        assert_eq!(tokens.line(), 3);
        assert_eq!(tokens.next_token().unwrap(), None);
    }

    #[test]
    fn sink_separates_tokens_and_records() {
        let mut sink = TokenSink::new(Vec::new());
        sink.write_token("1").unwrap();
        sink.write_token("2").unwrap();
        sink.end_record().unwrap();
        sink.write_token("3").unwrap();
        sink.end_record().unwrap();
        assert_eq!(sink.into_inner(), b"1 2\n3\n");
    }

    #[test]
    fn read_sorts_ids_and_keeps_attributes() {
        let mesh: Mesh<f64> = read_mesh(UNSORTED_3D.as_bytes()).unwrap();
        let ids: Vec<_> = mesh.vertices().iter().map(Vertex::id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);
        assert_eq!(mesh.vertex(3).unwrap().attributes(), &[40.0]);
        assert_relative_eq!(mesh.vertex(3).unwrap().point().z(), 0.5);
        assert_eq!(mesh.cells()[0].id(), 0);
        assert_eq!(mesh.cell(1).unwrap().vertices(), &[1, 3, 2]);
        assert_eq!(mesh.cell(1).unwrap().attributes(), &[0.5, -1.0]);
        assert_eq!(mesh.dimensions(), 3);
    }

    #[test]
    fn two_dimensional_input_sets_z_to_zero() {
        let text = "3 2 0\n0 0 0\n1 1 0\n2 0 1\n1 3 0\n7 0 1 2\n";
        let mesh: Mesh<f32> = read_mesh(text.as_bytes()).unwrap();
        assert!(mesh.vertices().iter().all(|v| v.point().z() == 0.0));
        assert_eq!(mesh.cell(7).unwrap().vertices(), &[0, 1, 2]);
    }

    #[test]
    fn write_is_sorted_and_rereadable() {
        let mesh: Mesh<f64> = read_mesh(UNSORTED_3D.as_bytes()).unwrap();
        let mut out = Vec::new();
        write_mesh(&mesh, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "4 3 1\n0 0 0 0 10\n1 1 0 0 20\n2 0 1 0 30\n3 0.8 0.8 0.5 40\n\
             2 3 2\n0 0 1 3 1.5 2\n1 1 3 2 0.5 -1\n"
        );
        let back: Mesh<f64> = read_mesh(text.as_bytes()).unwrap();
        assert_eq!(back, mesh);
    }

    #[test]
    fn header_errors() {
        let bad_dim = "1 4 0\n0 0 0 0 0\n0 3 0\n";
        assert!(matches!(
            read_mesh::<f64, _>(bad_dim.as_bytes()),
            Err(TriFormatError::InvalidHeader { line: 1, .. })
        ));

        let quads = "0 2 0\n0 4 0\n";
        assert!(matches!(
            read_mesh::<f64, _>(quads.as_bytes()),
            Err(TriFormatError::InvalidHeader { line: 2, .. })
        ));
    }

    #[test]
    fn token_errors() {
        let truncated = "3 2 0\n0 0 0\n1 1 0\n";
        assert!(matches!(
            read_mesh::<f64, _>(truncated.as_bytes()),
            Err(TriFormatError::UnexpectedEof {
                expected: "point id"
            })
        ));

        let garbage = "1 2 0\n0 zero 0\n0 3 0\n";
        match read_mesh::<f64, _>(garbage.as_bytes()) {
            Err(TriFormatError::InvalidToken {
                token,
                expected,
                line,
            }) => {
                assert_eq!(token, "zero");
                assert_eq!(expected, "coordinate");
                assert_eq!(line, 2);
            }
            other => panic!("unexpected result: {other:?}"),
        }

        let negative_id = "1 2 0\n-1 0 0\n0 3 0\n";
        assert!(matches!(
            read_mesh::<f64, _>(negative_id.as_bytes()),
            Err(TriFormatError::InvalidToken {
                expected: "point id",
                ..
            })
        ));
    }

    #[test]
    fn trailing_data_is_rejected() {
        let text = "3 2 0\n0 0 0\n1 1 0\n2 0 1\n1 3 0\n0 0 1 2\nextra\n";
        assert!(matches!(
            read_mesh::<f64, _>(text.as_bytes()),
            Err(TriFormatError::TrailingData { line: 7, .. })
        ));
    }

    #[test]
    fn mesh_errors_surface_from_assembly() {
        let duplicate = "2 2 0\n0 0 0\n0 1 0\n0 3 0\n";
        assert!(matches!(
            read_mesh::<f64, _>(duplicate.as_bytes()),
            Err(TriFormatError::Mesh(MeshError::DuplicateId {
                entity: MeshEntity::Vertex,
                id: 0
            }))
        ));

        let dangling = "3 2 0\n0 0 0\n1 1 0\n2 0 1\n1 3 0\n0 0 1 5\n";
        assert!(matches!(
            read_mesh::<f64, _>(dangling.as_bytes()),
            Err(TriFormatError::Mesh(MeshError::OutOfRange {
                entity: MeshEntity::Vertex,
                id: 5
            }))
        ));

        let nan = "1 2 0\n0 NaN 0\n0 3 0\n";
        assert!(matches!(
            read_mesh::<f64, _>(nan.as_bytes()),
            Err(TriFormatError::Mesh(MeshError::InvalidVertex(_)))
        ));
    }

    #[test]
    fn file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mesh.tri");
        let mesh: Mesh<f64> = read_mesh(UNSORTED_3D.as_bytes()).unwrap();
        write_mesh_file(&mesh, &path).unwrap();
        let back: Mesh<f64> = read_mesh_file(&path).unwrap();
        assert_eq!(back, mesh);

        assert!(matches!(
            read_mesh_file::<f64>(&dir.path().join("missing.tri")),
            Err(TriFormatError::Io(_))
        ));
    }
}
