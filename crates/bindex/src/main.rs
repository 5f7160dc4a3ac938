//! Command‑line entry point for the `bindex` tool.
//!
//! Builds a binning index from a bounding box and entries given on the command
//! line, then runs a nearest-entry or segment query against it.

use std::process;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use log::LevelFilter;

/// CLI command implementations.
mod cmd;
/// Coordinate and entry argument parsers.
mod coords;

use crate::{
    cmd::{Query, Setup},
    coords::{Coords, EntryArg},
};

#[derive(Parser)]
#[command(name = "bindex")]
#[command(version = env!("CARGO_PKG_VERSION"))]
/// Top‑level CLI options and subcommands.
struct Cli {
    /// Sets the level of verbosity (`-v`, `-vv`, ...).
    #[arg(short, action = clap::ArgAction::Count, help = "Sets the level of verbosity")]
    v: u8,

    /// Command to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Bounding box, divisions, and entries shared by every subcommand.
#[derive(Args)]
struct GridArgs {
    #[arg(
        long = "lower",
        value_name = "X,Y[,Z]",
        allow_hyphen_values = true,
        help = "Lower corner of the bounding box"
    )]
    /// Lower corner of the bounding box.
    lower: Coords,

    #[arg(
        long = "upper",
        value_name = "X,Y[,Z]",
        allow_hyphen_values = true,
        help = "Upper corner of the bounding box"
    )]
    /// Upper corner of the bounding box.
    upper: Coords,

    #[arg(
        short = 'n',
        long = "ndiv",
        default_value_t = 10,
        value_parser = clap::value_parser!(u32).range(1..),
        help = "Number of divisions per axis"
    )]
    /// Number of divisions per axis.
    ndiv: u32,

    #[arg(
        short = 'e',
        long = "entry",
        value_name = "ID=X,Y[,Z]",
        allow_hyphen_values = true,
        help = "Entry to insert (repeatable)"
    )]
    /// Entries inserted before the query runs.
    entries: Vec<EntryArg>,
}

impl GridArgs {
    /// Borrow the arguments as a command setup.
    fn setup(&self) -> Setup<'_> {
        Setup {
            lower: &self.lower,
            upper: &self.upper,
            ndiv: self.ndiv as usize,
            entries: &self.entries,
        }
    }
}

#[derive(Subcommand)]
/// Subcommands supported by the `bindex` tool.
enum Commands {
    #[command(about = "Find the nearest entry in the bin containing a point")]
    /// Find the nearest entry in the bin containing a point.
    Nearest {
        /// Grid geometry and entries.
        #[command(flatten)]
        grid: GridArgs,

        #[arg(value_name = "X,Y[,Z]", allow_hyphen_values = true, help = "Query point")]
        /// Query point.
        point: Coords,
    },

    #[command(about = "Find entries within a tolerance of a segment")]
    /// Find entries within a tolerance of a segment.
    Segment {
        /// Grid geometry and entries.
        #[command(flatten)]
        grid: GridArgs,

        #[arg(
            short = 't',
            long = "tol",
            default_value_t = 1e-3,
            help = "Maximum distance from the segment"
        )]
        /// Maximum distance from the segment.
        tol: f64,

        #[arg(value_name = "X,Y[,Z]", allow_hyphen_values = true, help = "Segment start")]
        /// Segment start.
        start: Coords,

        #[arg(value_name = "X,Y[,Z]", allow_hyphen_values = true, help = "Segment end")]
        /// Segment end.
        end: Coords,
    },

    #[command(about = "Print every occupied bin and its entries")]
    /// Print every occupied bin and its entries.
    Dump {
        /// Grid geometry and entries.
        #[command(flatten)]
        grid: GridArgs,
    },

    #[command(about = "Describe the grid geometry")]
    /// Describe the grid geometry.
    Info {
        /// Grid geometry and entries.
        #[command(flatten)]
        grid: GridArgs,
    },
}

/// Map the `-v` count to a log level; `RUST_LOG` still takes precedence.
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

/// Dispatch the parsed command and return its output.
fn execute(command: &Commands) -> Result<String> {
    match command {
        Commands::Nearest { grid, point } => cmd::run(&grid.setup(), &Query::Nearest(point)),
        Commands::Segment {
            grid,
            tol,
            start,
            end,
        } => cmd::run(
            &grid.setup(),
            &Query::Segment {
                start,
                end,
                tol: *tol,
            },
        ),
        Commands::Dump { grid } => cmd::run(&grid.setup(), &Query::Dump),
        Commands::Info { grid } => cmd::run(&grid.setup(), &Query::Info),
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.v);

    match execute(&cli.command) {
        Ok(out) => println!("{out}"),
        Err(e) => {
            eprintln!("{e:#}");
            process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_negative_coordinates() {
        let cli = Cli::try_parse_from([
            "bindex", "nearest", "--lower", "-1,-1", "--upper", "1,1", "-e", "3=-0.5,0.5",
            "-0.25,0.5",
        ])
        .unwrap();
        match cli.command {
            Commands::Nearest { grid, point } => {
                assert_eq!(grid.lower.0, vec![-1.0, -1.0]);
                assert_eq!(grid.ndiv, 10);
                assert_eq!(grid.entries.len(), 1);
                assert_eq!(point.0, vec![-0.25, 0.5]);
            }
            _ => panic!("expected nearest"),
        }
    }

    #[test]
    fn rejects_zero_divisions() {
        assert!(
            Cli::try_parse_from(["bindex", "info", "--lower", "0,0", "--upper", "1,1", "-n", "0"])
                .is_err()
        );
    }
}
