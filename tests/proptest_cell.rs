//! Property-based tests for the triangle kernel on [`Cell`].
//!
//! This module uses proptest to verify, for random well-shaped triangles:
//! - Each corner is contained in its own triangle
//! - A point far outside the bounding box is not contained
//! - The circumcenter is equidistant from all three corners
//! - Each corner lies on the boundary of the circumcircle
//! - The area does not depend on corner order
//! - A fixed triangle scaled and translated over several orders of magnitude keeps its
//!   containment results and circumcircle
//!
//! Tests are generated for `f32` and `f64` using macros to reduce duplication.

use approx::assert_relative_eq;
use proptest::prelude::*;
use trimesh::prelude::*;

// =============================================================================
// TEST CONFIGURATION
// =============================================================================

/// Rejects slivers and tiny triangles so the float error stays well below the
/// tolerances under test.
fn well_shaped<T: CoordinateScalar>(corners: &[Point<T, 3>; 3]) -> bool {
    let [a, b, c] = corners;
    let double_area = signed_double_area(a, b, c).abs();
    let longest = a
        .planar_distance(b)
        .max(b.planar_distance(c))
        .max(c.planar_distance(a));
    let min_ratio: T = num_traits::cast(0.05).unwrap();
    double_area >= T::one() && double_area >= min_ratio * longest * longest
}

// =============================================================================
// SCALAR TEST GENERATION MACROS
// =============================================================================

/// Macro to generate cell kernel property tests for a given scalar type
macro_rules! test_cell_kernel_properties {
    ($t:ident, $circle_tol:expr, $area_rel:expr, $max_exp:expr, $max_shift:expr) => {
        pastey::paste! {
            fn [<corner_ $t>]() -> impl Strategy<Value = Point<$t, 3>> {
                prop::array::uniform3(-10.0 as $t..10.0 as $t).prop_map(Point::new)
            }

            fn [<triangle_ $t>]() -> impl Strategy<Value = [Point<$t, 3>; 3]> {
                ([<corner_ $t>](), [<corner_ $t>](), [<corner_ $t>]())
                    .prop_map(|(a, b, c)| [a, b, c])
                    .prop_filter("well-shaped triangle", |corners| well_shaped(corners))
            }

            proptest! {
                /// Property: every corner lies in its own triangle
                #[test]
                fn [<prop_corners_are_contained_ $t>](corners in [<triangle_ $t>]()) {
                    let cell: Cell<$t> = Cell::new(0, [0, 1, 2], vec![]);
                    let config = PredicateConfig::default();
                    for corner in &corners {
                        prop_assert!(cell.contains_point(corner, &corners, &config).unwrap());
                    }
                }

                /// Property: a point beyond the bounding box is outside
                #[test]
                fn [<prop_far_point_is_outside_ $t>](
                    corners in [<triangle_ $t>](),
                    angle in 0.0 as $t..std::f64::consts::TAU as $t,
                ) {
                    let cell: Cell<$t> = Cell::new(0, [0, 1, 2], vec![]);
                    let far = Point::new([100.0 * angle.cos(), 100.0 * angle.sin()]);
                    let config = PredicateConfig::default();
                    prop_assert!(!cell.contains_point(&far, &corners, &config).unwrap());
                }

                /// Property: the circumcenter is equidistant from the three corners
                #[test]
                fn [<prop_circumcenter_is_equidistant_ $t>](corners in [<triangle_ $t>]()) {
                    let cell: Cell<$t> = Cell::new(0, [0, 1, 2], vec![]);
                    let circle = cell.circumcircle(&corners, &PredicateConfig::default()).unwrap();
                    for corner in &corners {
                        assert_relative_eq!(
                            circle.center.planar_distance(corner),
                            circle.radius,
                            max_relative = $circle_tol
                        );
                    }
                }

                /// Property: corners sit on the circle, not inside or outside it
                #[test]
                fn [<prop_corners_on_circumcircle_ $t>](corners in [<triangle_ $t>]()) {
                    let config = PredicateConfig {
                        boundary_tolerance: $circle_tol,
                        ..PredicateConfig::default()
                    };
                    let mut cell: Cell<$t> = Cell::new(0, [0, 1, 2], vec![]);
                    let circle = cell.compute_circumcircle(&corners, &config).unwrap();
                    for corner in &corners {
                        prop_assert_eq!(
                            incircle_distance(&circle, corner, &config),
                            InCircle::BOUNDARY
                        );
                        prop_assert!(cell.contains_in_circumcircle(corner, &config).unwrap());
                    }
                }

                /// Property: area is invariant under any permutation of the corners
                #[test]
                fn [<prop_area_is_permutation_invariant_ $t>](corners in [<triangle_ $t>]()) {
                    let [a, b, c] = corners;
                    let mut cell: Cell<$t> = Cell::new(0, [0, 1, 2], vec![]);
                    let reference = cell.compute_area(&corners);
                    prop_assert!(reference > 0.0);
                    for permuted in [[a, c, b], [b, a, c], [b, c, a], [c, a, b], [c, b, a]] {
                        assert_relative_eq!(
                            cell.compute_area(&permuted),
                            reference,
                            max_relative = $area_rel
                        );
                    }
                    prop_assert!(cell.cached_area().is_some());
                }

                /// Property: scaling and translating a fixed triangle changes nothing but
                /// the units
                #[test]
                fn [<prop_kernel_is_scale_and_translation_invariant_ $t>](
                    exponent in -$max_exp..=$max_exp,
                    shift in prop::array::uniform2(-$max_shift as $t..$max_shift as $t),
                ) {
                    let scale = (10.0 as $t).powi(exponent);
                    let place = |x: $t, y: $t| {
                        Point::new([(shift[0] + x) * scale, (shift[1] + y) * scale, 0.0])
                    };
                    // Circumcenter of this triangle is (16/11, 23/44) before placement.
                    let corners = [place(0.0, 0.0), place(3.0, 0.5), place(1.0, 2.0)];
                    let config = PredicateConfig::default();
                    let mut cell: Cell<$t> = Cell::new(0, [0, 1, 2], vec![]);

                    let centroid = place(4.0 / 3.0, 5.0 / 6.0);
                    prop_assert!(cell.contains_point(&centroid, &corners, &config).unwrap());
                    let outside = place(-0.5, -0.5);
                    prop_assert!(!cell.contains_point(&outside, &corners, &config).unwrap());
                    for corner in &corners {
                        prop_assert!(cell.contains_point(corner, &corners, &config).unwrap());
                    }

                    let circle = cell.compute_circumcircle(&corners, &config).unwrap();
                    let expected = place(16.0 / 11.0, 23.0 / 44.0);
                    let reach = scale * (1.0 + shift[0].abs().max(shift[1].abs()));
                    prop_assert!((circle.center.x() - expected.x()).abs() <= $circle_tol * reach);
                    prop_assert!((circle.center.y() - expected.y()).abs() <= $circle_tol * reach);
                    for corner in &corners {
                        prop_assert_eq!(
                            incircle_distance(&circle, corner, &config),
                            InCircle::BOUNDARY
                        );
                    }
                    prop_assert_eq!(
                        incircle_distance(&circle, &centroid, &config),
                        InCircle::INSIDE
                    );
                    prop_assert_eq!(
                        incircle_distance(&circle, &place(5.0, 5.0), &config),
                        InCircle::OUTSIDE
                    );
                }
            }
        }
    };
}

test_cell_kernel_properties!(f32, 1e-3, 1e-3, 3, 10.0);
test_cell_kernel_properties!(f64, 1e-9, 1e-9, 6, 1.0e4);
