//! Circumcircle of a planar triangle.

#![forbid(unsafe_code)]

use num_traits::cast;
use serde::{Deserialize, Serialize};

use crate::geometry::point::Point;
use crate::geometry::predicates::{GeometryError, PredicateConfig, is_degenerate_basis};
use crate::geometry::traits::coordinate::CoordinateScalar;

/// A circle given by center and radius.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "T: CoordinateScalar")]
pub struct Circumcircle<T>
where
    T: CoordinateScalar,
{
    /// Center of the circle.
    pub center: Point<T, 2>,
    /// Radius of the circle.
    pub radius: T,
}

impl<T> Circumcircle<T>
where
    T: CoordinateScalar,
{
    /// Creates a circle from its parts.
    #[inline]
    #[must_use]
    pub const fn new(center: Point<T, 2>, radius: T) -> Self {
        Self { center, radius }
    }
}

/// Computes the circle through `a`, `b` and `c`.
///
/// The center comes from the closed-form intersection of the perpendicular bisectors,
/// evaluated relative to `a` to keep large absolute coordinates from cancelling. The
/// radius is the distance from the center to `a`.
///
/// # Errors
///
/// - [`GeometryError::DegenerateTriangle`] if the points are collinear within
///   `config.degeneracy_tolerance`, relative to the squared edge lengths.
/// - [`GeometryError::NonFiniteCoordinate`] if the center overflows.
///
/// # Examples
///
/// ```rust
/// use trimesh::geometry::point::Point;
/// use trimesh::geometry::predicates::PredicateConfig;
/// use trimesh::geometry::util::circumcircle;
///
/// let circle = circumcircle(
///     &Point::new([0.0, 0.0]),
///     &Point::new([1.0, 0.0]),
///     &Point::new([0.0, 1.0]),
///     &PredicateConfig::default(),
/// )
/// .unwrap();
/// assert_eq!(circle.center, Point::new([0.5, 0.5]));
/// assert!((circle.radius - 0.5f64.sqrt()).abs() < 1e-12);
/// ```
pub fn circumcircle<T, const D: usize>(
    a: &Point<T, D>,
    b: &Point<T, D>,
    c: &Point<T, D>,
    config: &PredicateConfig<T>,
) -> Result<Circumcircle<T>, GeometryError>
where
    T: CoordinateScalar,
{
    let (bx, by) = (b.x() - a.x(), b.y() - a.y());
    let (cx, cy) = (c.x() - a.x(), c.y() - a.y());

    let det = bx * cy - by * cx;
    if is_degenerate_basis(det, (bx, by), (cx, cy), config) {
        return Err(GeometryError::DegenerateTriangle {
            determinant: cast(det).unwrap_or(f64::NAN),
        });
    }

    let two = T::one() + T::one();
    let inv = (two * det).recip();
    let b_sq = bx * bx + by * by;
    let c_sq = cx * cx + cy * cy;
    let ux = (cy * b_sq - by * c_sq) * inv;
    let uy = (bx * c_sq - cx * b_sq) * inv;

    let center = Point::new([a.x() + ux, a.y() + uy]);
    center.validate()?;
    let radius = ux.hypot(uy);

    Ok(Circumcircle::new(center, radius))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn right_triangle_center_is_hypotenuse_midpoint() {
        let circle = circumcircle(
            &Point::new([0.0, 0.0]),
            &Point::new([1.0, 0.0]),
            &Point::new([0.0, 1.0]),
            &PredicateConfig::default(),
        )
        .unwrap();
        assert_relative_eq!(circle.center.x(), 0.5);
        assert_relative_eq!(circle.center.y(), 0.5);
        assert_relative_eq!(circle.radius, 0.5f64.sqrt());
    }

    #[test]
    fn center_is_equidistant_from_vertices() {
        let a = Point::new([1.0, 2.0]);
        let b = Point::new([4.5, -1.0]);
        let c = Point::new([3.0, 6.0]);
        let circle = circumcircle(&a, &b, &c, &PredicateConfig::default()).unwrap();
        for v in [a, b, c] {
            assert_relative_eq!(circle.center.planar_distance(&v), circle.radius, epsilon = 1e-12);
        }
    }

    #[test]
    fn obtuse_triangle_center() {
        // Center of a=(0,0), b=(1,0), d=(0.8,0.8) is (0.5, 0.3).
        let circle = circumcircle(
            &Point::new([0.0, 0.0]),
            &Point::new([1.0, 0.0]),
            &Point::new([0.8, 0.8]),
            &PredicateConfig::default(),
        )
        .unwrap();
        assert_relative_eq!(circle.center.x(), 0.5, epsilon = 1e-12);
        assert_relative_eq!(circle.center.y(), 0.3, epsilon = 1e-12);
        assert_relative_eq!(circle.radius, 0.34f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn translated_far_from_origin() {
        let offset = 1.0e6;
        let circle = circumcircle(
            &Point::new([offset, offset]),
            &Point::new([offset + 2.0, offset]),
            &Point::new([offset, offset + 2.0]),
            &PredicateConfig::default(),
        )
        .unwrap();
        assert_relative_eq!(circle.center.x(), offset + 1.0);
        assert_relative_eq!(circle.center.y(), offset + 1.0);
        assert_relative_eq!(circle.radius, 2.0f64.sqrt(), epsilon = 1e-9);
    }

    #[test]
    fn vertex_order_does_not_matter() {
        let a = Point::new([0.0f32, 0.0]);
        let b = Point::new([2.0, 0.0]);
        let c = Point::new([1.0, 3.0]);
        let config = PredicateConfig::default();
        let first = circumcircle(&a, &b, &c, &config).unwrap();
        let second = circumcircle(&c, &a, &b, &config).unwrap();
        assert_relative_eq!(first.center.x(), second.center.x(), epsilon = 1e-5);
        assert_relative_eq!(first.center.y(), second.center.y(), epsilon = 1e-5);
        assert_relative_eq!(first.radius, second.radius, epsilon = 1e-5);
    }

    #[test]
    fn small_triangles_keep_their_circumcircle() {
        for legs in [1e-3, 1e-6, 1e-9] {
            let circle = circumcircle(
                &Point::new([0.0, 0.0]),
                &Point::new([legs, 0.0]),
                &Point::new([0.0, legs]),
                &PredicateConfig::default(),
            )
            .unwrap();
            assert_relative_eq!(circle.center.x(), 0.5 * legs, max_relative = 1e-12);
            assert_relative_eq!(circle.radius, legs * 0.5f64.sqrt(), max_relative = 1e-12);
        }

        let circle = circumcircle(
            &Point::new([0.0f32, 0.0]),
            &Point::new([5e-4f32, 0.0]),
            &Point::new([0.0f32, 5e-4]),
            &PredicateConfig::default(),
        )
        .unwrap();
        assert_relative_eq!(circle.center.y(), 2.5e-4, max_relative = 1e-5);
    }

    #[test]
    fn collinear_points_are_rejected() {
        let result = circumcircle(
            &Point::new([0.0, 0.0]),
            &Point::new([1.0, 0.0]),
            &Point::new([3.0, 0.0]),
            &PredicateConfig::default(),
        );
        assert!(matches!(result, Err(GeometryError::DegenerateTriangle { .. })));
    }

    #[test]
    fn overflowing_center_is_reported() {
        let result = circumcircle(
            &Point::new([0.0, 0.0]),
            &Point::new([f64::MAX, 0.0]),
            &Point::new([0.0, f64::MAX]),
            &PredicateConfig::default(),
        );
        assert!(matches!(result, Err(GeometryError::NonFiniteCoordinate { .. })));
    }
}
