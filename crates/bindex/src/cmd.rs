//! Command handlers for the `bindex` CLI.
//!
//! Each handler builds an index from the command-line geometry and entries,
//! runs one query, and returns the text to print.

use anyhow::{Context, Result, anyhow, bail};
use binindex::Bins;
use log::info;

use crate::coords::{Coords, EntryArg, join};

/// Geometry and population shared by every query.
pub struct Setup<'a> {
    /// Lower corner of the bounding box.
    pub lower: &'a Coords,
    /// Upper corner of the bounding box.
    pub upper: &'a Coords,
    /// Divisions per axis.
    pub ndiv: usize,
    /// Entries to insert before querying.
    pub entries: &'a [EntryArg],
}

/// The query to run against the populated index.
pub enum Query<'a> {
    /// Nearest entry in the bin containing a point.
    Nearest(&'a Coords),
    /// Entries within `tol` of the segment `start`-`end`.
    Segment {
        /// Segment start.
        start: &'a Coords,
        /// Segment end.
        end: &'a Coords,
        /// Distance tolerance.
        tol: f64,
    },
    /// Dump all occupied bins.
    Dump,
    /// Describe the grid geometry.
    Info,
}

/// Build the index described by `setup` and run `query` against it.
pub fn run(setup: &Setup<'_>, query: &Query<'_>) -> Result<String> {
    match setup.lower.len() {
        2 => run_in::<2>(setup, query),
        3 => run_in::<3>(setup, query),
        n => bail!("unsupported dimension {n}: coordinates need 2 or 3 components"),
    }
}

/// Convert parsed coordinates into a fixed-size array.
fn fixed<const D: usize>(coords: &Coords, what: &str) -> Result<[f64; D]> {
    <[f64; D]>::try_from(&coords[..]).map_err(|_| {
        anyhow!(
            "{what} ({coords}) has {} coordinates, expected {D}",
            coords.len()
        )
    })
}

/// Build and populate a `D`-dimensional index.
fn build<const D: usize>(setup: &Setup<'_>) -> Result<Bins<D>> {
    let mut bins = Bins::<D>::from_slices(setup.lower, setup.upper, setup.ndiv)
        .context("invalid bounding box")?;
    for entry in setup.entries {
        let point = fixed::<D>(&entry.coords, &format!("entry {}", entry.id))?;
        bins.insert(point, entry.id)
            .with_context(|| format!("cannot insert entry {}", entry.id))?;
    }
    info!(
        "indexed {} entries into {} of {} bins",
        bins.len(),
        bins.occupied().count(),
        bins.spec().bin_count()
    );
    Ok(bins)
}

/// Run a query in a fixed dimension.
fn run_in<const D: usize>(setup: &Setup<'_>, query: &Query<'_>) -> Result<String> {
    let bins = build::<D>(setup)?;
    let out = match query {
        Query::Nearest(point) => {
            let point = fixed::<D>(point, "query point")?;
            match bins.find_nearest(point)? {
                Some(id) => id.to_string(),
                None => "not found".to_string(),
            }
        }
        Query::Segment { start, end, tol } => {
            let start = fixed::<D>(start, "segment start")?;
            let end = fixed::<D>(end, "segment end")?;
            let mut ids = bins.find_along_segment(start, end, *tol);
            ids.sort_unstable();
            ids.iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" ")
        }
        Query::Dump => bins.to_string(),
        Query::Info => describe(&bins),
    };
    Ok(out)
}

/// Human-readable summary of the grid geometry.
fn describe<const D: usize>(bins: &Bins<D>) -> String {
    let spec = bins.spec();
    [
        format!("dimension: {}", spec.dimension()),
        format!("lower: {}", join(spec.lower().as_slice())),
        format!("upper: {}", join(spec.upper().as_slice())),
        format!("sizes: {}", join(spec.sizes())),
        format!("counts: {}", join(spec.counts())),
        format!(
            "bins: {} ({} occupied)",
            spec.bin_count(),
            bins.occupied().count()
        ),
        format!("entries: {}", bins.len()),
    ]
    .join("\n")
}
