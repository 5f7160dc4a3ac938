//! Uniform binning index for 2D and 3D point search.
//!
//! A [`Bins`] grid covers an axis-aligned box with equal-sized cells, stores
//! `(id, point)` entries in the cell containing them, and answers two kinds of
//! query:
//!
//! - [`Bins::find_nearest`]: the closest entry in the cell containing a query
//!   point.
//! - [`Bins::find_along_segment`]: all entries within a tolerance of a line
//!   segment.
//!
//! The dimension is a const generic; only 2 and 3 are accepted.
//!
//! ```
//! use binindex::Bins;
//!
//! let mut bins: Bins<3> = Bins::new([0.0; 3], [1.0; 3], 4)?;
//! bins.insert([0.5, 0.5, 0.5], 10)?;
//! assert_eq!(bins.find_nearest([0.55, 0.6, 0.5])?, Some(10));
//! assert!(bins.find_nearest([2.0, 0.0, 0.0]).is_err());
//! # Ok::<(), binindex::error::Error>(())
//! ```

/// Bins, entries, and the search operations.
mod bins;
/// Error types used across the crate.
pub mod error;
/// Grid geometry and index arithmetic.
pub mod grid;
/// Fixed-dimension points and segments.
pub mod point;

pub use crate::{
    bins::{BIN_TOLERANCE_FACTOR, Bin, BinEntry, Bins},
    error::{Error, Result},
    grid::GridSpec,
    point::{Point, Segment},
};

/// A binning index over the plane.
pub type Bins2 = Bins<2>;
/// A binning index over 3D space.
pub type Bins3 = Bins<3>;
