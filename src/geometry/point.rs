//! Fixed-dimension points.
//!
//! Planar queries use `Point<T, 2>`. Stored mesh vertices carry a `Point<T, 3>` whose third
//! coordinate is preserved for file round trips and ignored by every predicate; use
//! [`Point::planar`] to project it.
//!
//! Equality is plain IEEE 754 equality of the coordinates, so `NaN != NaN`. Coordinates
//! coming from a file are validated with [`Point::validate`] before they enter a mesh.

#![forbid(unsafe_code)]

use crate::geometry::traits::coordinate::{CoordinateScalar, CoordinateValidationError};
use serde::de::{Error, SeqAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;

// =============================================================================
// POINT STRUCT DEFINITION
// =============================================================================

/// A point in `D`-dimensional space with scalar type `T`.
///
/// The coordinate array is private; points are immutable once created.
///
/// # Examples
///
/// ```rust
/// use trimesh::geometry::point::Point;
///
/// let p = Point::new([1.0, 2.0]);
/// assert_eq!(p.coords(), &[1.0, 2.0]);
/// assert_eq!(p.x(), 1.0);
/// assert_eq!(p.y(), 2.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point<T, const D: usize>
where
    T: CoordinateScalar,
{
    coords: [T; D],
}

// =============================================================================
// PUBLIC API
// =============================================================================

impl<T, const D: usize> Point<T, D>
where
    T: CoordinateScalar,
{
    /// Creates a point from an array of coordinates.
    #[inline]
    #[must_use]
    pub const fn new(coords: [T; D]) -> Self {
        Self { coords }
    }

    /// Returns a reference to the coordinate array.
    #[inline]
    #[must_use]
    pub const fn coords(&self) -> &[T; D] {
        &self.coords
    }

    /// Returns a copy of the coordinate array.
    #[inline]
    #[must_use]
    pub const fn to_array(&self) -> [T; D] {
        self.coords
    }

    /// Returns the coordinate at `index`, or `None` past the dimension.
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<T> {
        self.coords.get(index).copied()
    }

    /// The dimension `D`.
    #[inline]
    #[must_use]
    pub const fn dim(&self) -> usize {
        D
    }

    /// Checks that every coordinate is finite.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinateValidationError::InvalidCoordinate`] for the first NaN or
    /// infinite coordinate.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use trimesh::geometry::point::Point;
    ///
    /// assert!(Point::new([1.0, 2.0, 0.0]).validate().is_ok());
    /// assert!(Point::new([1.0, f64::NAN]).validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), CoordinateValidationError> {
        for (index, &coord) in self.coords.iter().enumerate() {
            if !coord.is_finite_generic() {
                return Err(CoordinateValidationError::InvalidCoordinate {
                    coordinate_index: index,
                    coordinate_value: format!("{coord:?}"),
                    dimension: D,
                });
            }
        }
        Ok(())
    }

    /// First coordinate. Zero for a zero-dimensional point.
    #[inline]
    #[must_use]
    pub fn x(&self) -> T {
        self.get(0).unwrap_or_else(T::zero)
    }

    /// Second coordinate. Zero when `D < 2`.
    #[inline]
    #[must_use]
    pub fn y(&self) -> T {
        self.get(1).unwrap_or_else(T::zero)
    }

    /// Third coordinate. Zero when `D < 3`.
    #[inline]
    #[must_use]
    pub fn z(&self) -> T {
        self.get(2).unwrap_or_else(T::zero)
    }

    /// Projects onto the xy plane.
    ///
    /// ```rust
    /// use trimesh::geometry::point::Point;
    ///
    /// let stored = Point::new([3.0, 4.0, 12.0]);
    /// assert_eq!(stored.planar(), Point::new([3.0, 4.0]));
    /// ```
    #[inline]
    #[must_use]
    pub fn planar(&self) -> Point<T, 2> {
        Point::new([self.x(), self.y()])
    }

    /// Euclidean distance between the xy projections of two points.
    #[inline]
    #[must_use]
    pub fn planar_distance<const E: usize>(&self, other: &Point<T, E>) -> T {
        let dx = self.x() - other.x();
        let dy = self.y() - other.y();
        dx.hypot(dy)
    }
}

impl<T, const D: usize> Default for Point<T, D>
where
    T: CoordinateScalar,
{
    fn default() -> Self {
        Self {
            coords: [T::default(); D],
        }
    }
}

impl<T, const D: usize> From<Point<T, D>> for [T; D]
where
    T: CoordinateScalar,
{
    #[inline]
    fn from(point: Point<T, D>) -> [T; D] {
        point.coords
    }
}

impl<T, const D: usize> From<[T; D]> for Point<T, D>
where
    T: CoordinateScalar,
{
    #[inline]
    fn from(coords: [T; D]) -> Self {
        Self::new(coords)
    }
}

// =============================================================================
// SERDE
// =============================================================================

// Arrays of const-generic length have no serde derive, so points go through a tuple.
impl<T, const D: usize> Serialize for Point<T, D>
where
    T: CoordinateScalar,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeTuple;
        let mut tuple = serializer.serialize_tuple(D)?;
        for coord in &self.coords {
            tuple.serialize_element(coord)?;
        }
        tuple.end()
    }
}

impl<'de, T, const D: usize> Deserialize<'de> for Point<T, D>
where
    T: CoordinateScalar,
{
    fn deserialize<DE>(deserializer: DE) -> Result<Self, DE::Error>
    where
        DE: serde::Deserializer<'de>,
    {
        struct ArrayVisitor<T, const D: usize>(PhantomData<T>);

        impl<'de, T, const D: usize> Visitor<'de> for ArrayVisitor<T, D>
        where
            T: CoordinateScalar,
        {
            type Value = Point<T, D>;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_fmt(format_args!("an array of {D} coordinates"))
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut coords = [T::zero(); D];
                for (i, slot) in coords.iter_mut().enumerate() {
                    *slot = seq
                        .next_element()?
                        .ok_or_else(|| Error::invalid_length(i, &self))?;
                }
                Ok(Point::new(coords))
            }
        }

        deserializer.deserialize_tuple(D, ArrayVisitor(PhantomData))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn point_accessors() {
        let p = Point::new([1.5, -2.0, 7.0]);
        assert_eq!(p.dim(), 3);
        assert_relative_eq!(p.x(), 1.5);
        assert_relative_eq!(p.y(), -2.0);
        assert_relative_eq!(p.z(), 7.0);
        assert_eq!(p.get(3), None);

        let q: Point<f64, 2> = Point::new([4.0, 5.0]);
        assert_relative_eq!(q.z(), 0.0);
    }

    #[test]
    fn planar_projection_drops_z() {
        let p = Point::new([1.0f32, 2.0, 99.0]);
        assert_eq!(p.planar(), Point::new([1.0, 2.0]));
    }

    #[test]
    fn planar_distance_ignores_z() {
        let a = Point::new([0.0, 0.0, 100.0]);
        let b = Point::new([3.0, 4.0]);
        assert_relative_eq!(a.planar_distance(&b), 5.0);
    }

    #[test]
    fn validation_reports_first_bad_coordinate() {
        let p = Point::new([1.0, f64::INFINITY, f64::NAN]);
        match p.validate() {
            Err(CoordinateValidationError::InvalidCoordinate {
                coordinate_index,
                dimension,
                ..
            }) => {
                assert_eq!(coordinate_index, 1);
                assert_eq!(dimension, 3);
            }
            other => panic!("unexpected validation result: {other:?}"),
        }
    }

    #[test]
    fn equality_is_ieee() {
        assert_eq!(Point::new([1.0, 2.0]), Point::new([1.0, 2.0]));
        assert_ne!(Point::new([1.0, 2.0]), Point::new([1.0, 2.5]));
        assert_ne!(Point::new([f64::NAN, 0.0]), Point::new([f64::NAN, 0.0]));
    }

    #[test]
    fn serde_round_trip_as_json_array() {
        let p = Point::new([0.25, -1.0, 3.5]);
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, "[0.25,-1.0,3.5]");
        let back: Point<f64, 3> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }

    #[test]
    fn deserialize_rejects_short_array() {
        let result: Result<Point<f64, 3>, _> = serde_json::from_str("[1.0, 2.0]");
        assert!(result.is_err());
    }

    #[test]
    fn array_conversions() {
        let p: Point<f64, 2> = [3.0, 4.0].into();
        let coords: [f64; 2] = p.into();
        assert_eq!(coords, [3.0, 4.0]);
        assert_eq!(Point::<f32, 3>::default().to_array(), [0.0; 3]);
    }
}
