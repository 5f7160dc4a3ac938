//! Sparse bins holding point entries, with nearest-entry and segment queries.

use std::{collections::BTreeMap, fmt};

use log::{debug, trace};

use crate::{
    error::{Error, Result},
    grid::GridSpec,
    point::{Point, Segment},
};

/// Fraction of the largest cell size used as the minimum bin-center distance
/// when selecting candidate bins for a segment query.
pub const BIN_TOLERANCE_FACTOR: f64 = 0.9;

/// A stored `(id, point)` pair.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BinEntry<const D: usize> {
    /// Caller-supplied object identifier.
    id: usize,
    /// Copy of the coordinate passed at insertion.
    point: Point<D>,
}

impl<const D: usize> BinEntry<D> {
    /// Identifier given at insertion.
    pub const fn id(&self) -> usize {
        self.id
    }

    /// Coordinate given at insertion.
    pub const fn point(&self) -> &Point<D> {
        &self.point
    }
}

/// One occupied grid cell and its entries in insertion order.
#[derive(Clone, Debug, PartialEq)]
pub struct Bin<const D: usize> {
    /// Flat index of the cell.
    index: usize,
    /// Entries that fell into the cell.
    entries: Vec<BinEntry<D>>,
}

impl<const D: usize> Bin<D> {
    /// Create an empty bin for cell `index`.
    const fn new(index: usize) -> Self {
        Self {
            index,
            entries: Vec::new(),
        }
    }

    /// Flat index of the cell.
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> &[BinEntry<D>] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the bin has no entries. Bins reachable through [`Bins`] never are.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<const D: usize> fmt::Display for Bin<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{\"idx\":{}, \"entries\":[", self.index)?;
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{{\"id\":{}, \"x\":[", entry.id)?;
            for (k, x) in entry.point.iter().enumerate() {
                if k > 0 {
                    f.write_str(",")?;
                }
                write!(f, "{x}")?;
            }
            f.write_str("]}")?;
        }
        f.write_str("]}")
    }
}

/// A uniform binning index over a `D`-dimensional box (`D` is 2 or 3).
///
/// Entries are bucketed by the grid cell containing them. Cells are only
/// materialized once something is inserted into them, so sparse populations
/// over fine grids stay cheap.
///
/// # Example
///
/// ```
/// use binindex::Bins;
///
/// let mut bins = Bins::new([0.0, 0.0], [10.0, 10.0], 5)?;
/// bins.insert([1.0, 1.0], 1)?;
/// bins.insert([9.0, 9.0], 2)?;
///
/// assert_eq!(bins.find_nearest([0.5, 0.5])?, Some(1));
///
/// let mut ids = bins.find_along_segment([0.0, 0.0], [10.0, 10.0], 1.5);
/// ids.sort();
/// assert_eq!(ids, vec![1, 2]);
/// # Ok::<(), binindex::error::Error>(())
/// ```
#[derive(Clone, Debug)]
pub struct Bins<const D: usize> {
    /// Grid geometry.
    spec: GridSpec<D>,
    /// Materialized bins keyed by flat index.
    bins: BTreeMap<usize, Bin<D>>,
}

impl<const D: usize> Bins<D> {
    /// Build an empty index over `[lower, upper]` with `divisions` cells per
    /// axis (plus one slack cell).
    pub fn new(
        lower: impl Into<Point<D>>,
        upper: impl Into<Point<D>>,
        divisions: usize,
    ) -> Result<Self> {
        Ok(Self::with_spec(GridSpec::new(
            lower.into(),
            upper.into(),
            divisions,
        )?))
    }

    /// Build an empty index from slice corners, which must both hold `D`
    /// coordinates.
    pub fn from_slices(lower: &[f64], upper: &[f64], divisions: usize) -> Result<Self> {
        Ok(Self::with_spec(GridSpec::from_slices(
            lower, upper, divisions,
        )?))
    }

    /// Build an empty index over an existing grid geometry.
    pub const fn with_spec(spec: GridSpec<D>) -> Self {
        Self {
            spec,
            bins: BTreeMap::new(),
        }
    }

    /// Grid geometry.
    pub const fn spec(&self) -> &GridSpec<D> {
        &self.spec
    }

    /// Flat index of the cell containing `point`.
    pub fn bin_index(&self, point: impl Into<Point<D>>) -> Result<usize> {
        self.spec.bin_index(&point.into())
    }

    /// Store `id` at `point`.
    ///
    /// Duplicate ids and coordinates are kept. Fails with
    /// [`Error::OutOfRange`] if `point` is outside the box.
    pub fn insert(&mut self, point: impl Into<Point<D>>, id: usize) -> Result<()> {
        let point = point.into();
        let index = self.spec.bin_index(&point)?;
        let count = self.spec.bin_count();
        // Unreachable while `GridSpec` sizes `counts` as `floor(length / size) + 1`:
        // an in-box coordinate never has a cell coordinate above `counts - 1`.
        if index >= count {
            return Err(Error::IndexOutOfBounds { index, count });
        }
        trace!("insert id={id} at {:?} into bin {index}", point.0);
        self.bins
            .entry(index)
            .or_insert_with(|| Bin::new(index))
            .entries
            .push(BinEntry { id, point });
        Ok(())
    }

    /// Remove every entry. The grid geometry is kept.
    pub fn clear(&mut self) {
        debug!("clearing {} bins", self.bins.len());
        self.bins.clear();
    }

    /// Id of the entry closest to `point` within the cell containing `point`.
    ///
    /// Only that one cell is scanned: an entry just across a cell boundary is
    /// never considered, even if it is closer than everything inside the cell.
    /// Ties go to the entry inserted first. Returns `Ok(None)` if the cell is
    /// empty and [`Error::OutOfRange`] if `point` is outside the box.
    pub fn find_nearest(&self, point: impl Into<Point<D>>) -> Result<Option<usize>> {
        let point = point.into();
        let index = self.spec.bin_index(&point)?;
        let Some(bin) = self.bins.get(&index) else {
            return Ok(None);
        };

        let mut closest: Option<(f64, usize)> = None;
        for entry in &bin.entries {
            let d = entry.point.distance_sq(&point);
            if closest.is_none_or(|(dmin, _)| d < dmin) {
                closest = Some((d, entry.id));
            }
        }
        Ok(closest.map(|(_, id)| id))
    }

    /// Distance threshold between a bin center and a segment for the bin to
    /// be searched with entry tolerance `tol`.
    ///
    /// At least [`BIN_TOLERANCE_FACTOR`] times the largest cell size, and
    /// never less than half a cell diagonal plus `tol`, so a bin holding an
    /// entry within `tol` of the segment is always selected.
    pub fn bin_tolerance(&self, tol: f64) -> f64 {
        (BIN_TOLERANCE_FACTOR * self.spec.max_size()).max(self.spec.half_diagonal() + tol)
    }

    /// Indices of occupied bins whose centers lie close enough to the segment
    /// `start`-`end` to possibly hold entries within `tol` of it.
    pub fn candidate_bins(
        &self,
        start: impl Into<Point<D>>,
        end: impl Into<Point<D>>,
        tol: f64,
    ) -> Vec<usize> {
        let segment = Segment::new(start, end);
        self.select_bins(&segment, tol).map(Bin::index).collect()
    }

    /// Ids of entries within `tol` of the segment `start`-`end`.
    ///
    /// Distances are measured to the finite segment. An entry must also lie
    /// inside the box spanned by the endpoints grown by `tol`. Results come
    /// in bin-index order, then insertion order.
    pub fn find_along_segment(
        &self,
        start: impl Into<Point<D>>,
        end: impl Into<Point<D>>,
        tol: f64,
    ) -> Vec<usize> {
        let segment = Segment::new(start, end);
        let ids: Vec<usize> = self
            .select_bins(&segment, tol)
            .flat_map(|bin| bin.entries.iter())
            .filter(|entry| {
                segment.distance_to(&entry.point) <= tol
                    && segment.envelope_contains(&entry.point, tol)
            })
            .map(BinEntry::id)
            .collect();
        trace!(
            "segment {:?}-{:?} tol={tol}: {} matches",
            segment.start.0,
            segment.end.0,
            ids.len()
        );
        ids
    }

    /// Occupied bins whose centers pass the coarse distance filter.
    fn select_bins<'a>(
        &'a self,
        segment: &'a Segment<D>,
        tol: f64,
    ) -> impl Iterator<Item = &'a Bin<D>> + 'a {
        let limit = self.bin_tolerance(tol);
        self.bins
            .values()
            .filter(move |bin| segment.distance_to(&self.spec.bin_center(bin.index)) <= limit)
    }

    /// Occupied bins in index order.
    pub fn bins(&self) -> impl Iterator<Item = &Bin<D>> {
        self.bins.values()
    }

    /// The bin at flat index `index`, if occupied.
    pub fn bin(&self, index: usize) -> Option<&Bin<D>> {
        self.bins.get(&index)
    }

    /// Flat indices of occupied bins, ascending.
    pub fn occupied(&self) -> impl Iterator<Item = usize> + '_ {
        self.bins.keys().copied()
    }

    /// Total number of stored entries.
    pub fn len(&self) -> usize {
        self.bins.values().map(Bin::len).sum()
    }

    /// Whether no entries are stored.
    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }
}

impl<const D: usize> fmt::Display for Bins<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[\n")?;
        for (i, bin) in self.bins.values().enumerate() {
            if i > 0 {
                f.write_str(",\n")?;
            }
            write!(f, "  {bin}")?;
        }
        f.write_str("\n]")
    }
}
