//! Area of planar triangles.

#![forbid(unsafe_code)]

use crate::geometry::point::Point;
use crate::geometry::traits::coordinate::CoordinateScalar;

/// Twice the signed area of triangle `(a, b, c)`; positive for counter-clockwise order.
#[inline]
#[must_use]
pub fn signed_double_area<T, const D: usize>(a: &Point<T, D>, b: &Point<T, D>, c: &Point<T, D>) -> T
where
    T: CoordinateScalar,
{
    a.x() * (b.y() - c.y()) + b.x() * (c.y() - a.y()) + c.x() * (a.y() - b.y())
}

/// Area of triangle `(a, b, c)` by the shoelace formula.
///
/// The result is non-negative and does not depend on vertex order. Collinear points give
/// zero.
///
/// # Examples
///
/// ```rust
/// use trimesh::geometry::point::Point;
/// use trimesh::geometry::util::triangle_area;
///
/// let area = triangle_area(
///     &Point::new([0.0, 0.0]),
///     &Point::new([1.0, 0.0]),
///     &Point::new([0.0, 1.0]),
/// );
/// assert_eq!(area, 0.5);
/// ```
#[inline]
#[must_use]
pub fn triangle_area<T, const D: usize>(a: &Point<T, D>, b: &Point<T, D>, c: &Point<T, D>) -> T
where
    T: CoordinateScalar,
{
    let two = T::one() + T::one();
    signed_double_area(a, b, c).abs() / two
}
