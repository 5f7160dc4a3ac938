//! Parsers for coordinate and entry arguments.

use std::{fmt, ops::Deref, str::FromStr};

/// A comma-separated coordinate such as `1.5,2` or `0,0,-3`.
#[derive(Clone, Debug, PartialEq)]
pub struct Coords(pub Vec<f64>);

impl FromStr for Coords {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let coords = value
            .split(',')
            .map(|part| {
                let part = part.trim();
                part.parse::<f64>()
                    .ok()
                    .filter(|x| x.is_finite())
                    .ok_or_else(|| format!("invalid coordinate '{part}': expected a finite number"))
            })
            .collect::<Result<Vec<_>, _>>()?;
        if !(2..=3).contains(&coords.len()) {
            return Err(format!(
                "expected 2 or 3 comma-separated coordinates, got {}",
                coords.len()
            ));
        }
        Ok(Self(coords))
    }
}

impl Deref for Coords {
    type Target = [f64];
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for Coords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&join(&self.0))
    }
}

/// Join numbers with commas, the inverse of [`Coords::from_str`].
pub fn join<T: fmt::Display>(values: &[T]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// An entry to insert, written `ID=X,Y[,Z]`.
#[derive(Clone, Debug, PartialEq)]
pub struct EntryArg {
    /// Object identifier.
    pub id: usize,
    /// Entry coordinate.
    pub coords: Coords,
}

impl FromStr for EntryArg {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (id, coords) = value
            .split_once('=')
            .ok_or_else(|| "entry must be in ID=X,Y[,Z] form".to_string())?;
        let id = id
            .trim()
            .parse::<usize>()
            .map_err(|_| format!("invalid entry id '{id}': expected a non-negative integer"))?;
        Ok(Self {
            id,
            coords: coords.parse()?,
        })
    }
}
