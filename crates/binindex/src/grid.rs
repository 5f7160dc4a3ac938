//! Grid geometry: box extents, cell sizes, and index arithmetic.

use log::debug;

use crate::{
    error::{Error, Result},
    point::Point,
};

/// Geometry of a uniform grid over an axis-aligned box.
///
/// The box `[lower, upper]` is cut into `divisions` equal cells along every
/// axis. Each axis then gets one extra slack cell so that coordinates lying
/// exactly on the upper face still map to a valid cell. Cells are addressed by
/// a flat index in which axis 0 varies fastest, then axis 1, then axis 2.
#[derive(Clone, Debug, PartialEq)]
pub struct GridSpec<const D: usize> {
    /// Lower-left(-bottom) corner of the box.
    lower: Point<D>,
    /// Upper-right(-top) corner of the box.
    upper: Point<D>,
    /// Box length along each axis.
    lengths: [f64; D],
    /// Cell size along each axis.
    sizes: [f64; D],
    /// Number of cells along each axis, including the slack cell.
    counts: [usize; D],
    /// Requested number of divisions.
    divisions: usize,
    /// Total number of cells (`counts` multiplied together).
    bin_count: usize,
}

impl<const D: usize> GridSpec<D> {
    /// Derive the grid geometry for the box `[lower, upper]` cut into
    /// `divisions` cells per axis.
    ///
    /// Fails if `D` is not 2 or 3, if `divisions` is zero, if any axis has a
    /// non-positive or non-finite length, or if a per-axis or total cell count
    /// overflows `usize`. A box with finite corners whose extent overflows
    /// `f64` (e.g. `[-1e308, 1e308]`) has an infinite length and is reported
    /// as [`Error::DegenerateBox`].
    pub fn new(lower: Point<D>, upper: Point<D>, divisions: usize) -> Result<Self> {
        if !(2..=3).contains(&D) {
            return Err(Error::InvalidDimension {
                expected: D,
                lower: D,
                upper: D,
            });
        }
        if divisions == 0 {
            return Err(Error::InvalidDivisions(divisions));
        }

        let mut lengths = [0.0; D];
        let mut sizes = [0.0; D];
        let mut counts = [0usize; D];
        let mut bin_count = 1usize;
        for axis in 0..D {
            let length = upper[axis] - lower[axis];
            let size = length / divisions as f64;
            if !(length.is_finite() && length > 0.0 && size > 0.0) {
                return Err(Error::DegenerateBox { axis, length });
            }
            lengths[axis] = length;
            sizes[axis] = size;
            let cells = length / size;
            // `usize::MAX as f64` rounds up, so equality already overflows.
            if cells >= usize::MAX as f64 {
                return Err(Error::IntegerOverflow);
            }
            counts[axis] = (cells as usize)
                .checked_add(1)
                .ok_or(Error::IntegerOverflow)?;
            bin_count = bin_count
                .checked_mul(counts[axis])
                .ok_or(Error::IntegerOverflow)?;
        }

        debug!(
            "grid {D}D: lower={:?} upper={:?} sizes={sizes:?} counts={counts:?} bins={bin_count}",
            lower.0, upper.0
        );

        Ok(Self {
            lower,
            upper,
            lengths,
            sizes,
            counts,
            divisions,
            bin_count,
        })
    }

    /// Like [`GridSpec::new`], but takes corners as slices.
    ///
    /// Both slices must have exactly `D` coordinates.
    pub fn from_slices(lower: &[f64], upper: &[f64], divisions: usize) -> Result<Self> {
        let invalid = || Error::InvalidDimension {
            expected: D,
            lower: lower.len(),
            upper: upper.len(),
        };
        let lo: [f64; D] = lower.try_into().map_err(|_| invalid())?;
        let hi: [f64; D] = upper.try_into().map_err(|_| invalid())?;
        Self::new(Point(lo), Point(hi), divisions)
    }

    /// Space dimension.
    pub const fn dimension(&self) -> usize {
        D
    }

    /// Lower corner of the box.
    pub const fn lower(&self) -> &Point<D> {
        &self.lower
    }

    /// Upper corner of the box.
    pub const fn upper(&self) -> &Point<D> {
        &self.upper
    }

    /// Box length along each axis.
    pub const fn lengths(&self) -> &[f64; D] {
        &self.lengths
    }

    /// Cell size along each axis.
    pub const fn sizes(&self) -> &[f64; D] {
        &self.sizes
    }

    /// Number of cells along each axis, slack cell included.
    pub const fn counts(&self) -> &[usize; D] {
        &self.counts
    }

    /// Number of divisions the grid was built with.
    pub const fn divisions(&self) -> usize {
        self.divisions
    }

    /// Total number of addressable cells.
    pub const fn bin_count(&self) -> usize {
        self.bin_count
    }

    /// Largest cell size over all axes.
    pub fn max_size(&self) -> f64 {
        self.sizes.iter().copied().fold(0.0, f64::max)
    }

    /// Half the length of a cell's diagonal.
    pub fn half_diagonal(&self) -> f64 {
        0.5 * self.sizes.iter().map(|s| s * s).sum::<f64>().sqrt()
    }

    /// Whether `p` lies inside the closed box `[lower, upper]`.
    pub fn contains(&self, p: &Point<D>) -> bool {
        (0..D).all(|k| p[k] >= self.lower[k] && p[k] <= self.upper[k])
    }

    /// Per-axis cell coordinates of the cell containing `p`.
    pub fn cell_coords(&self, p: &Point<D>) -> Result<[usize; D]> {
        if !self.contains(p) {
            return Err(Error::out_of_range(p));
        }
        let mut cell = [0usize; D];
        for (k, c) in cell.iter_mut().enumerate() {
            // Non-negative quotient, so `as` truncates toward zero like floor.
            *c = ((p[k] - self.lower[k]) / self.sizes[k]) as usize;
        }
        Ok(cell)
    }

    /// Flat index of the cell containing `p`.
    ///
    /// Returns [`Error::OutOfRange`] if `p` is outside the box.
    pub fn bin_index(&self, p: &Point<D>) -> Result<usize> {
        Ok(self.linearize(&self.cell_coords(p)?))
    }

    /// Flatten per-axis cell coordinates: `i + j*N0 (+ k*N0*N1)`.
    pub fn linearize(&self, cell: &[usize; D]) -> usize {
        let mut index = 0;
        let mut stride = 1;
        for (c, n) in cell.iter().zip(self.counts.iter()) {
            index += c * stride;
            stride *= n;
        }
        index
    }

    /// Recover per-axis cell coordinates from a flat index.
    ///
    /// Inverse of [`GridSpec::linearize`]: `i = idx % N0`,
    /// `j = (idx % (N0*N1)) / N0`, `k = idx / (N0*N1)`.
    pub fn bin_coords(&self, index: usize) -> [usize; D] {
        let mut cell = [0usize; D];
        let mut rest = index;
        for k in 0..D {
            if k + 1 == D {
                cell[k] = rest;
            } else {
                cell[k] = rest % self.counts[k];
                rest /= self.counts[k];
            }
        }
        cell
    }

    /// Lower corner of the cell with flat index `index`.
    pub fn bin_corner(&self, index: usize) -> Point<D> {
        let cell = self.bin_coords(index);
        let mut corner = self.lower;
        for k in 0..D {
            corner.0[k] += cell[k] as f64 * self.sizes[k];
        }
        corner
    }

    /// Geometric center of the cell with flat index `index`.
    pub fn bin_center(&self, index: usize) -> Point<D> {
        let mut center = self.bin_corner(index);
        for k in 0..D {
            center.0[k] += self.sizes[k] / 2.0;
        }
        center
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// The 10x10 box cut into 5 divisions used throughout these tests.
    fn square() -> Result<GridSpec<2>> {
        GridSpec::new(Point([0.0, 0.0]), Point([10.0, 10.0]), 5)
    }

    #[test]
    fn geometry() -> Result<()> {
        let g = square()?;
        assert_eq!(g.dimension(), 2);
        assert_eq!(g.lengths(), &[10.0, 10.0]);
        assert_eq!(g.sizes(), &[2.0, 2.0]);
        assert_eq!(g.counts(), &[6, 6]);
        assert_eq!(g.bin_count(), 36);
        assert_eq!(g.divisions(), 5);
        assert_eq!(g.max_size(), 2.0);

        let g = GridSpec::new(Point([0.0, -1.0, 2.0]), Point([3.0, 1.0, 3.0]), 4)?;
        assert_eq!(g.sizes(), &[0.75, 0.5, 0.25]);
        assert_eq!(g.counts(), &[5, 5, 5]);
        assert_eq!(g.bin_count(), 125);
        assert_eq!(g.max_size(), 0.75);
        Ok(())
    }

    #[test]
    fn rejects_bad_dimensions() {
        assert!(matches!(
            GridSpec::<1>::new(Point([0.0]), Point([1.0]), 2),
            Err(Error::InvalidDimension { expected: 1, .. })
        ));
        assert!(matches!(
            GridSpec::<4>::new(Point([0.0; 4]), Point([1.0; 4]), 2),
            Err(Error::InvalidDimension { expected: 4, .. })
        ));
        assert_eq!(
            GridSpec::<2>::from_slices(&[0.0, 0.0], &[1.0, 1.0, 1.0], 2),
            Err(Error::InvalidDimension {
                expected: 2,
                lower: 2,
                upper: 3
            })
        );
        assert!(GridSpec::<3>::from_slices(&[0.0, 0.0], &[1.0, 1.0], 2).is_err());
        assert!(GridSpec::<3>::from_slices(&[0.0; 3], &[1.0; 3], 2).is_ok());
    }

    #[test]
    fn rejects_degenerate_boxes() {
        assert_eq!(
            GridSpec::new(Point([0.0, 0.0]), Point([1.0, 0.0]), 2),
            Err(Error::DegenerateBox {
                axis: 1,
                length: 0.0
            })
        );
        assert!(matches!(
            GridSpec::new(Point([1.0, 0.0]), Point([0.0, 1.0]), 2),
            Err(Error::DegenerateBox { axis: 0, .. })
        ));
        assert!(matches!(
            GridSpec::new(Point([0.0, 0.0]), Point([f64::INFINITY, 1.0]), 2),
            Err(Error::DegenerateBox { axis: 0, .. })
        ));
        assert_eq!(
            GridSpec::new(Point([0.0, 0.0]), Point([1.0, 1.0]), 0),
            Err(Error::InvalidDivisions(0))
        );
    }

    #[test]
    fn overflowing_bin_count() {
        let r = GridSpec::new(Point([0.0; 3]), Point([1.0; 3]), usize::MAX / 4);
        assert_eq!(r, Err(Error::IntegerOverflow));
    }

    #[test]
    fn overflowing_axis_count() {
        let r = GridSpec::new(Point([0.0, 0.0]), Point([1.0, 1.0]), usize::MAX);
        assert_eq!(r, Err(Error::IntegerOverflow));
        let r = GridSpec::new(Point([0.0; 3]), Point([1.0; 3]), usize::MAX);
        assert_eq!(r, Err(Error::IntegerOverflow));
    }

    #[test]
    fn overflowing_extent_is_degenerate() {
        assert!(matches!(
            GridSpec::new(Point([-1e308, 0.0]), Point([1e308, 1.0]), 2),
            Err(Error::DegenerateBox { axis: 0, length }) if length.is_infinite()
        ));
    }

    #[test]
    fn index_at_corners() -> Result<()> {
        let g = square()?;
        assert_eq!(g.bin_index(&Point([0.0, 0.0]))?, 0);
        // Upper face lands in the slack row/column.
        assert_eq!(g.bin_index(&Point([10.0, 10.0]))?, 5 + 5 * 6);
        assert_eq!(g.bin_index(&Point([10.0, 0.0]))?, 5);
        assert_eq!(g.bin_index(&Point([1.999, 2.0]))?, 6);
        assert_eq!(g.bin_index(&Point([9.0, 9.0]))?, 4 + 4 * 6);
        Ok(())
    }

    #[test]
    fn index_out_of_range() -> Result<()> {
        let g = square()?;
        for p in [[-0.1, 5.0], [5.0, 10.1], [f64::NAN, 1.0]] {
            assert!(matches!(
                g.bin_index(&Point(p)),
                Err(Error::OutOfRange { .. })
            ));
        }
        Ok(())
    }

    #[test]
    fn coords_roundtrip_3d() -> Result<()> {
        let g = GridSpec::new(Point([0.0; 3]), Point([4.0, 6.0, 8.0]), 2)?;
        assert_eq!(g.counts(), &[3, 3, 3]);
        for index in 0..g.bin_count() {
            let cell = g.bin_coords(index);
            assert_eq!(g.linearize(&cell), index);
            assert_eq!(cell[0], index % 3);
            assert_eq!(cell[1], (index % 9) / 3);
            assert_eq!(cell[2], index / 9);
        }
        assert_eq!(g.bin_index(&Point([3.0, 3.5, 1.0]))?, 4);
        assert_eq!(g.bin_index(&Point([0.0, 0.0, 8.0]))?, 2 * 9);
        Ok(())
    }

    #[test]
    fn corners_and_centers() -> Result<()> {
        let g = square()?;
        assert_eq!(g.bin_corner(0), Point([0.0, 0.0]));
        assert_eq!(g.bin_center(0), Point([1.0, 1.0]));
        assert_eq!(g.bin_corner(28), Point([8.0, 8.0]));
        assert_eq!(g.bin_center(28), Point([9.0, 9.0]));
        assert_eq!(g.bin_center(35), Point([11.0, 11.0]));
        assert_eq!(g.half_diagonal(), 0.5 * 8f64.sqrt());
        Ok(())
    }
}
