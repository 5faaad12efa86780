//! Scalar traits for mesh coordinates.
//!
//! Every geometric type in this crate is generic over a scalar `T` that implements
//! [`CoordinateScalar`]. The trait is a bundle of the bounds the kernel needs:
//!
//! - **`Float`** arithmetic from `num-traits`
//! - **`FiniteCheck`** to reject NaN and infinity before they reach a predicate
//! - **`FromStr` / `Display`** so the `.tri` reader and writer can move scalars
//!   through text tokens
//! - **serde** support for JSON snapshots of meshes
//!
//! `f32` and `f64` are provided.
//!
//! ```rust
//! use trimesh::geometry::traits::coordinate::{CoordinateScalar, FiniteCheck};
//!
//! assert!(1.5f64.is_finite_generic());
//! assert!(!f32::NAN.is_finite_generic());
//! assert_eq!(f64::default_tolerance(), 1e-12);
//! ```

use num_traits::Float;
use serde::{Serialize, de::DeserializeOwned};
use std::{
    fmt::{Debug, Display},
    str::FromStr,
};

/// Errors that can occur during coordinate validation.
#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
pub enum CoordinateValidationError {
    /// A coordinate value is invalid (NaN or infinite).
    #[error(
        "Invalid coordinate at index {coordinate_index} in dimension {dimension}: {coordinate_value}"
    )]
    InvalidCoordinate {
        /// Index of the invalid coordinate.
        coordinate_index: usize,
        /// Value of the invalid coordinate, as a string.
        coordinate_value: String,
        /// The dimensionality of the coordinate system.
        dimension: usize,
    },
}

/// Default tolerance for f32 geometric comparisons.
pub const DEFAULT_TOLERANCE_F32: f32 = 1e-6;

/// Default tolerance for f64 geometric comparisons.
///
/// Looser than machine epsilon: the closed-form circumcircle loses a few digits on
/// ordinary mesh coordinates, and cocircular vertices must still land on the boundary.
pub const DEFAULT_TOLERANCE_F64: f64 = 1e-12;

/// Helper trait for checking finiteness of coordinates.
///
/// # Examples
///
/// ```
/// use trimesh::geometry::traits::coordinate::FiniteCheck;
///
/// assert!(3.25f64.is_finite_generic());
/// assert!(!f64::INFINITY.is_finite_generic());
/// assert!(!f32::NAN.is_finite_generic());
/// ```
pub trait FiniteCheck {
    /// Returns true if the value is finite (not NaN or infinite).
    fn is_finite_generic(&self) -> bool;
}

macro_rules! impl_finite_check {
    (float: $($t:ty),*) => {
        $(
            impl FiniteCheck for $t {
                #[inline(always)]
                fn is_finite_generic(&self) -> bool {
                    self.is_finite()
                }
            }
        )*
    };
}

impl_finite_check!(float: f32, f64);

/// Trait alias for the scalar type requirements of mesh coordinates and attributes.
///
/// # Required Traits
///
/// - `Float`: floating-point arithmetic
/// - `FiniteCheck`: validation of coordinate values
/// - `FromStr` + `Display`: token-level text I/O
/// - `Default`, `Copy`, `Debug`
/// - `Serialize` + `DeserializeOwned`
/// - `Send` + `Sync`: meshes can be shared across threads for read-only scans
///
/// # Usage
///
/// ```rust
/// use trimesh::geometry::traits::coordinate::CoordinateScalar;
///
/// fn nearly_equal<T: CoordinateScalar>(a: T, b: T) -> bool {
///     (a - b).abs() <= T::default_tolerance()
/// }
///
/// assert!(nearly_equal(0.1f64 + 0.2, 0.3));
/// ```
pub trait CoordinateScalar:
    Float
    + FiniteCheck
    + FromStr
    + Display
    + Default
    + Debug
    + Serialize
    + DeserializeOwned
    + Send
    + Sync
    + 'static
{
    /// Returns the default tolerance for this scalar type.
    ///
    /// - `f32`: `1e-6`
    /// - `f64`: `1e-12`
    fn default_tolerance() -> Self;
}

impl CoordinateScalar for f32 {
    fn default_tolerance() -> Self {
        DEFAULT_TOLERANCE_F32
    }
}

impl CoordinateScalar for f64 {
    fn default_tolerance() -> Self {
        DEFAULT_TOLERANCE_F64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn finite_check_rejects_special_values() {
        assert!(0.0f64.is_finite_generic());
        assert!(f64::MAX.is_finite_generic());
        assert!(!f64::NAN.is_finite_generic());
        assert!(!f64::NEG_INFINITY.is_finite_generic());
        assert!((-42.5f32).is_finite_generic());
        assert!(!f32::INFINITY.is_finite_generic());
    }

    #[test]
    fn default_tolerances_match_constants() {
        assert_relative_eq!(f32::default_tolerance(), DEFAULT_TOLERANCE_F32);
        assert_relative_eq!(f64::default_tolerance(), DEFAULT_TOLERANCE_F64);
    }

    #[test]
    fn scalars_parse_and_display_round_trip() {
        let value: f64 = "-69.3406".parse().unwrap();
        assert_eq!(value.to_string().parse::<f64>().unwrap(), value);

        let value_f32: f32 = "172.5".parse().unwrap();
        assert_eq!(value_f32.to_string(), "172.5");
    }

    #[test]
    fn validation_error_display_includes_context() {
        let err = CoordinateValidationError::InvalidCoordinate {
            coordinate_index: 1,
            coordinate_value: "NaN".to_string(),
            dimension: 3,
        };
        let message = err.to_string();
        assert!(message.contains("index 1"));
        assert!(message.contains("dimension 3"));
        assert!(message.contains("NaN"));
    }
}
