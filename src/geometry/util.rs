//! Planar triangle measures and circumcircles.
//!
//! These functions are used by the predicates and by the cell kernel. They read only the
//! x and y coordinates of their inputs.

#![forbid(unsafe_code)]

pub mod circumcircle;
pub mod measures;

pub use circumcircle::*;
pub use measures::*;
