//! Direction and path types for the intersection
//!
//! These are the only values the driving harness hands to the monitor.

use anyhow::{bail, Result};
use std::fmt;
use std::str::FromStr;

/// Number of approaches into the intersection
pub const NUM_DIRECTIONS: usize = 4;

/// Number of distinct legal paths (no U-turns)
pub const NUM_PATHS: usize = NUM_DIRECTIONS * (NUM_DIRECTIONS - 1);

/// One of the four approaches of the intersection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    /// All directions, in table order
    pub const ALL: [Direction; NUM_DIRECTIONS] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    /// Row/column index into per-direction tables
    pub fn index(self) -> usize {
        match self {
            Direction::North => 0,
            Direction::South => 1,
            Direction::East => 2,
            Direction::West => 3,
        }
    }

    /// Lowercase name, as accepted by `FromStr`
    pub fn name(self) -> &'static str {
        match self {
            Direction::North => "north",
            Direction::South => "south",
            Direction::East => "east",
            Direction::West => "west",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Direction {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "north" | "n" => Ok(Direction::North),
            "south" | "s" => Ok(Direction::South),
            "east" | "e" => Ok(Direction::East),
            "west" | "w" => Ok(Direction::West),
            other => bail!("Unknown direction '{}'", other),
        }
    }
}

/// Returns true for the four right-turn paths of the intersection
///
/// ```text
/// right turn:       left turn:
/// north --> west    west  --> north
/// south --> east    east  --> south
/// west  --> south   south --> west
/// east  --> north   north --> east
/// ```
pub fn is_right_turn(origin: Direction, destination: Direction) -> bool {
    matches!(
        (origin, destination),
        (Direction::North, Direction::West)
            | (Direction::South, Direction::East)
            | (Direction::West, Direction::South)
            | (Direction::East, Direction::North)
    )
}

/// A route through the intersection from one approach to another
///
/// The fields are private so a `Path` can never describe a U-turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Path {
    origin: Direction,
    destination: Direction,
}

impl Path {
    /// Create a path, rejecting U-turns
    pub fn new(origin: Direction, destination: Direction) -> Result<Self> {
        if origin == destination {
            bail!("U-turn from {} back to {} is not a legal path", origin, destination);
        }
        Ok(Self {
            origin,
            destination,
        })
    }

    /// Build a path from arguments the caller is contractually required to
    /// keep distinct. Panics on a U-turn.
    pub(crate) fn from_contract(origin: Direction, destination: Direction) -> Self {
        match Self::new(origin, destination) {
            Ok(path) => path,
            Err(e) => panic!("contract violation: {}", e),
        }
    }

    /// All 12 legal paths, in table order
    pub fn all() -> impl Iterator<Item = Path> {
        Direction::ALL.into_iter().flat_map(|origin| {
            Direction::ALL
                .into_iter()
                .filter(move |&destination| destination != origin)
                .map(move |destination| Path {
                    origin,
                    destination,
                })
        })
    }

    pub fn origin(&self) -> Direction {
        self.origin
    }

    pub fn destination(&self) -> Direction {
        self.destination
    }

    /// The opposing path, e.g. north->south for south->north
    pub fn reverse(&self) -> Path {
        Path {
            origin: self.destination,
            destination: self.origin,
        }
    }

    pub fn is_right_turn(&self) -> bool {
        is_right_turn(self.origin, self.destination)
    }

    /// Flat index into a `NUM_DIRECTIONS x NUM_DIRECTIONS` table
    pub fn slot(&self) -> usize {
        self.origin.index() * NUM_DIRECTIONS + self.destination.index()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.origin, self.destination)
    }
}
