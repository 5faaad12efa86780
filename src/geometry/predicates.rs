//! Planar geometric predicates.
//!
//! Triangle containment through barycentric weights and circumcircle membership
//! classification. Every predicate takes a [`PredicateConfig`] so that callers decide how
//! close to zero a determinant may get before a triangle counts as degenerate, and how
//! wide the boundary band of a circle is.

use num_traits::cast;

use crate::geometry::point::Point;
use crate::geometry::traits::coordinate::{CoordinateScalar, CoordinateValidationError};
use crate::geometry::util::Circumcircle;

// =============================================================================
// ERRORS
// =============================================================================

/// Errors raised by planar predicates and measures.
#[derive(Clone, Debug, thiserror::Error, PartialEq)]
pub enum GeometryError {
    /// The three vertices are collinear (or coincide) within the degeneracy tolerance.
    #[error("Degenerate triangle: basis determinant {determinant} is within tolerance of zero")]
    DegenerateTriangle {
        /// The determinant of the edge basis, widened to `f64` for reporting.
        determinant: f64,
    },
    /// A computed quantity overflowed or otherwise left the finite range.
    #[error("Non-finite result: {source}")]
    NonFiniteCoordinate {
        /// The failing coordinate.
        #[from]
        source: CoordinateValidationError,
    },
}

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Tolerances shared by the predicates.
///
/// # Examples
///
/// ```rust
/// use trimesh::geometry::predicates::{PredicateConfig, config_presets};
///
/// let default: PredicateConfig<f64> = PredicateConfig::default();
/// let strict = config_presets::strict::<f64>();
/// assert!(strict.boundary_tolerance < default.boundary_tolerance);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PredicateConfig<T> {
    /// A triangle is degenerate when the absolute value of its edge-basis determinant is
    /// at or below this fraction of `|ab|² + |ac|²`. The test is independent of scale.
    pub degeneracy_tolerance: T,
    /// Width of the boundary band for containment and circle classification. Distances
    /// are compared relative to `max(1, radius)`, plus a rounding allowance proportional
    /// to the magnitude of the coordinates involved.
    pub boundary_tolerance: T,
}

impl<T: CoordinateScalar> Default for PredicateConfig<T> {
    fn default() -> Self {
        Self {
            degeneracy_tolerance: T::default_tolerance(),
            boundary_tolerance: T::default_tolerance(),
        }
    }
}

/// Ready-made predicate configurations.
pub mod config_presets {
    use super::{CoordinateScalar, PredicateConfig};
    use num_traits::cast;

    /// Default tolerances for meshes with coordinates of order one to a few thousand.
    #[must_use]
    pub fn general_mesh<T: CoordinateScalar>() -> PredicateConfig<T> {
        PredicateConfig::default()
    }

    /// Tolerances a hundred times tighter than the defaults.
    #[must_use]
    pub fn strict<T: CoordinateScalar>() -> PredicateConfig<T> {
        let base_tol = T::default_tolerance();
        let divisor: T = cast(100.0).unwrap_or_else(T::one);
        PredicateConfig {
            degeneracy_tolerance: base_tol / divisor,
            boundary_tolerance: base_tol / divisor,
        }
    }
}

// =============================================================================
// TRIANGLE CONTAINMENT
// =============================================================================

/// Barycentric weights `[wa, wb, wc]` of `p` with respect to triangle `(a, b, c)`.
///
/// The basis is the pair of edges `a→b` and `a→c`; the inverse of its determinant is
/// computed once and shared by the weights.
///
/// # Errors
///
/// Returns [`GeometryError::DegenerateTriangle`] when [`is_degenerate_basis`] holds.
///
/// # Examples
///
/// ```rust
/// use trimesh::geometry::point::Point;
/// use trimesh::geometry::predicates::{PredicateConfig, barycentric_weights};
///
/// let [a, b, c]: [Point<f64, 2>; 3] = [Point::new([0.0, 0.0]), Point::new([1.0, 0.0]), Point::new([0.0, 1.0])];
/// let w = barycentric_weights(&Point::new([0.25, 0.25]), &a, &b, &c, &PredicateConfig::default())
///     .unwrap();
/// assert!((w[0] - 0.5).abs() < 1e-12);
/// assert!((w[1] - 0.25).abs() < 1e-12);
/// ```
pub fn barycentric_weights<T, const D: usize, const E: usize>(
    p: &Point<T, E>,
    a: &Point<T, D>,
    b: &Point<T, D>,
    c: &Point<T, D>,
    config: &PredicateConfig<T>,
) -> Result<[T; 3], GeometryError>
where
    T: CoordinateScalar,
{
    let (abx, aby) = (b.x() - a.x(), b.y() - a.y());
    let (acx, acy) = (c.x() - a.x(), c.y() - a.y());
    let (apx, apy) = (p.x() - a.x(), p.y() - a.y());

    let det = abx * acy - acx * aby;
    if is_degenerate_basis(det, (abx, aby), (acx, acy), config) {
        return Err(GeometryError::DegenerateTriangle {
            determinant: cast(det).unwrap_or(f64::NAN),
        });
    }
    let inv_det = det.recip();

    let wb = (apx * acy - apy * acx) * inv_det;
    let wc = (apy * abx - apx * aby) * inv_det;
    let wa = T::one() - wb - wc;
    Ok([wa, wb, wc])
}

/// Whether the edge basis `(ab, ac)` with determinant `det` spans a degenerate triangle.
///
/// The determinant is `|ab| |ac| sin θ`, so it is compared against
/// `degeneracy_tolerance * (|ab|² + |ac|²)`. Scaling a triangle does not change the
/// outcome; coincident corners give `0 <= 0` and count as degenerate. A determinant that
/// overflowed is left for the caller's finiteness checks.
#[must_use]
pub fn is_degenerate_basis<T>(
    det: T,
    ab: (T, T),
    ac: (T, T),
    config: &PredicateConfig<T>,
) -> bool
where
    T: CoordinateScalar,
{
    let scale = ab.0 * ab.0 + ab.1 * ab.1 + ac.0 * ac.0 + ac.1 * ac.1;
    det.is_finite() && det.abs() <= config.degeneracy_tolerance * scale
}

/// Whether `p` lies inside triangle `(a, b, c)` or on its boundary.
///
/// All three barycentric weights must fall in `[0, 1]`, widened by the boundary tolerance
/// so that points on a shared edge belong to both neighbours.
///
/// # Errors
///
/// Propagates [`GeometryError::DegenerateTriangle`] from [`barycentric_weights`].
pub fn point_in_triangle<T, const D: usize, const E: usize>(
    p: &Point<T, E>,
    a: &Point<T, D>,
    b: &Point<T, D>,
    c: &Point<T, D>,
    config: &PredicateConfig<T>,
) -> Result<bool, GeometryError>
where
    T: CoordinateScalar,
{
    let weights = barycentric_weights(p, a, b, c, config)?;
    let tol = config.boundary_tolerance;
    let upper = T::one() + tol;
    Ok(weights.iter().all(|&w| w >= -tol && w <= upper))
}

// =============================================================================
// CIRCUMCIRCLE CLASSIFICATION
// =============================================================================

/// Position of a point relative to a circumcircle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InCircle {
    /// Farther from the center than the radius
    OUTSIDE,
    /// On the circle within the boundary tolerance
    BOUNDARY,
    /// Strictly closer to the center than the radius
    INSIDE,
}

impl std::fmt::Display for InCircle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OUTSIDE => write!(f, "OUTSIDE"),
            Self::BOUNDARY => write!(f, "BOUNDARY"),
            Self::INSIDE => write!(f, "INSIDE"),
        }
    }
}

/// Classifies `p` against `circle` by comparing its distance to the center with the radius.
///
/// The boundary band is `boundary_tolerance * max(1, radius)` widened by
/// `16 ε max(|center|, |p|)`. The center is stored in absolute coordinates, so far from
/// the origin its rounding error grows with the coordinates rather than the radius, and
/// cocircular points must still land in [`InCircle::BOUNDARY`].
///
/// # Examples
///
/// ```rust
/// use trimesh::geometry::point::Point;
/// use trimesh::geometry::predicates::{InCircle, PredicateConfig, incircle_distance};
/// use trimesh::geometry::util::Circumcircle;
///
/// let circle = Circumcircle::new(Point::new([0.0, 0.0]), 1.0);
/// let config = PredicateConfig::default();
/// assert_eq!(incircle_distance(&circle, &Point::new([0.5, 0.0]), &config), InCircle::INSIDE);
/// assert_eq!(incircle_distance(&circle, &Point::new([0.0, 1.0]), &config), InCircle::BOUNDARY);
/// assert_eq!(incircle_distance(&circle, &Point::new([2.0, 0.0]), &config), InCircle::OUTSIDE);
/// ```
pub fn incircle_distance<T, const D: usize>(
    circle: &Circumcircle<T>,
    p: &Point<T, D>,
    config: &PredicateConfig<T>,
) -> InCircle
where
    T: CoordinateScalar,
{
    let distance = circle.center.planar_distance(p);
    let magnitude = circle
        .center
        .x()
        .abs()
        .max(circle.center.y().abs())
        .max(p.x().abs())
        .max(p.y().abs());
    let rounding: T = cast::<f64, T>(16.0).unwrap_or_else(T::one) * T::epsilon() * magnitude;
    let band = config.boundary_tolerance * circle.radius.max(T::one()) + rounding;
    if (distance - circle.radius).abs() <= band {
        InCircle::BOUNDARY
    } else if distance < circle.radius {
        InCircle::INSIDE
    } else {
        InCircle::OUTSIDE
    }
}
