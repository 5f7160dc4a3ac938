//! Error types for index construction and queries.

use smallvec::SmallVec;

/// Errors produced by grid construction, insertion, and lookups.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Corner vectors differ in length, or the dimension is not 2 or 3.
    #[error(
        "corners must both have {expected} coordinates and the dimension must be 2 or 3 \
         (got lower={lower}, upper={upper})"
    )]
    InvalidDimension {
        /// Dimension the grid was instantiated with.
        expected: usize,
        /// Length of the supplied lower corner.
        lower: usize,
        /// Length of the supplied upper corner.
        upper: usize,
    },

    /// The division count must be at least one.
    #[error("number of divisions must be positive, got {0}")]
    InvalidDivisions(usize),

    /// The bounding box has a zero, negative, or non-finite extent along an
    /// axis. An extent that overflows `f64` counts as non-finite.
    #[error("bounding box extent along axis {axis} must be positive and finite (got {length})")]
    DegenerateBox {
        /// Offending axis.
        axis: usize,
        /// Computed box length along `axis`.
        length: f64,
    },

    /// The total number of bins does not fit in a `usize`.
    #[error("integer overflow while computing the number of bins")]
    IntegerOverflow,

    /// A coordinate lies outside the bounding box.
    #[error("point {point:?} is out of range")]
    OutOfRange {
        /// The rejected coordinate.
        point: SmallVec<[f64; 3]>,
    },

    /// A computed bin index fell outside the bin table.
    #[error("bin index {index} is out of bounds (bin count {count})")]
    IndexOutOfBounds {
        /// The computed index.
        index: usize,
        /// Total number of bins in the grid.
        count: usize,
    },
}

impl Error {
    /// Build an [`Error::OutOfRange`] for the given coordinate.
    pub(crate) fn out_of_range(point: &[f64]) -> Self {
        Self::OutOfRange {
            point: SmallVec::from_slice(point),
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
