//! Board cells, placements, and territory resolution.
//!
//! The board is a flat array of `N * N` cells indexed `y * N + x`. Besides the
//! cells it remembers every placement still standing, so that a captured
//! building can be lifted off the board again.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::building::{Building, Color, Direction, ParseError};
use crate::constants::{CELLS, N};

/// State of a single board cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum CellState {
    #[default]
    Empty,
    /// Territory claimed by a player.
    Owned(Color),
    /// Covered by a building of the given color (or the neutral cathedral).
    Occupied(Color),
}

/// Why a placement was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaceError {
    #[error("{0} is not available")]
    NotInHand(Building),
    #[error("the cathedral must be placed first")]
    CathedralFirst,
    #[error("building leaves the board at ({0}, {1})")]
    OutOfBounds(i32, i32),
    #[error("cell ({0}, {1}) is not free")]
    Blocked(i32, i32),
    #[error("the game is over")]
    GameOver,
}

/// A building put down at an anchor cell with a direction.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Placement {
    pub x: i32,
    pub y: i32,
    pub direction: Direction,
    pub building: Building,
}

impl Placement {
    /// Create a placement anchored at `(x, y)`.
    pub fn new(x: i32, y: i32, direction: Direction, building: Building) -> Self {
        Self {
            x,
            y,
            direction,
            building,
        }
    }

    /// Absolute cells covered (may lie outside the board).
    ///
    /// Coordinates saturate at the `i32` limits, so any anchor is safe to
    /// check against the board.
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> {
        let (x, y) = (self.x, self.y);
        self.building
            .offsets(self.direction)
            .map(move |(dx, dy)| (x.saturating_add(dx), y.saturating_add(dy)))
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.building, self.x, self.y, self.direction)
    }
}

impl FromStr for Placement {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split_whitespace().collect();
        let [building, x, y, direction] = parts[..] else {
            return Err(ParseError::Placement(s.to_string()));
        };
        let coord = |v: &str| {
            v.parse::<i32>()
                .map_err(|_| ParseError::BadCoordinate(v.to_string()))
        };
        Ok(Placement {
            x: coord(x)?,
            y: coord(y)?,
            direction: direction.parse()?,
            building: building.parse()?,
        })
    }
}

#[inline]
/// Whether `(x, y)` lies on the board.
pub fn in_bounds(x: i32, y: i32) -> bool {
    (0..N as i32).contains(&x) && (0..N as i32).contains(&y)
}

#[inline]
fn idx(x: i32, y: i32) -> usize {
    y as usize * N + x as usize
}

/// Orthogonal neighbors of a cell index.
fn neighbors(i: usize) -> impl Iterator<Item = usize> {
    let (x, y) = (i % N, i / N);
    let mut v = Vec::with_capacity(4);
    if x > 0 {
        v.push(i - 1);
    }
    if x + 1 < N {
        v.push(i + 1);
    }
    if y > 0 {
        v.push(i - N);
    }
    if y + 1 < N {
        v.push(i + N);
    }
    v.into_iter()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    cells: [CellState; CELLS],
    placed: Vec<Placement>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Create an empty board.
    pub fn new() -> Self {
        Self {
            cells: [CellState::Empty; CELLS],
            placed: Vec::new(),
        }
    }

    /// Cell at `(x, y)`. Panics when out of bounds.
    pub fn get(&self, x: usize, y: usize) -> CellState {
        assert!(x < N && y < N, "cell ({x}, {y}) is off the board");
        self.cells[y * N + x]
    }

    /// Overwrite a cell directly, bypassing placement rules.
    pub fn set(&mut self, x: usize, y: usize, state: CellState) {
        assert!(x < N && y < N, "cell ({x}, {y}) is off the board");
        self.cells[y * N + x] = state;
    }

    /// Buildings currently standing on the board.
    pub fn placed(&self) -> &[Placement] {
        &self.placed
    }

    /// Number of cells in `state`.
    pub fn count(&self, state: CellState) -> usize {
        self.cells.iter().filter(|&&c| c == state).count()
    }

    /// Check that every covered cell is on the board and free for `mover`
    /// (empty, or territory `mover` already owns).
    pub fn check_footprint(&self, placement: &Placement) -> Result<(), PlaceError> {
        let mover = placement.building.color();
        for (x, y) in placement.cells() {
            if !in_bounds(x, y) {
                return Err(PlaceError::OutOfBounds(x, y));
            }
            match self.cells[idx(x, y)] {
                CellState::Empty => {}
                CellState::Owned(c) if c == mover => {}
                _ => return Err(PlaceError::Blocked(x, y)),
            }
        }
        Ok(())
    }

    /// Put a building down without checking legality.
    pub fn place(&mut self, placement: Placement) {
        let color = placement.building.color();
        for (x, y) in placement.cells() {
            self.cells[idx(x, y)] = CellState::Occupied(color);
        }
        self.placed.push(placement);
    }

    /// Claim territory for `mover` after it has placed a building.
    ///
    /// The cells not covered by `mover` split into orthogonally connected
    /// regions. Every region except the largest one(s) that holds at most one
    /// foreign building becomes `mover`'s territory; that single building, if
    /// any, is lifted off and returned to the caller.
    pub fn resolve_territory(&mut self, mover: Color) -> Vec<Building> {
        let wall = CellState::Occupied(mover);
        let mut region_of = [usize::MAX; CELLS];
        let mut regions: Vec<Vec<usize>> = Vec::new();

        for start in 0..CELLS {
            if region_of[start] != usize::MAX || self.cells[start] == wall {
                continue;
            }
            let id = regions.len();
            let mut members = Vec::new();
            let mut stack = vec![start];
            region_of[start] = id;
            while let Some(i) = stack.pop() {
                members.push(i);
                for n in neighbors(i) {
                    if region_of[n] == usize::MAX && self.cells[n] != wall {
                        region_of[n] = id;
                        stack.push(n);
                    }
                }
            }
            regions.push(members);
        }

        if regions.len() < 2 {
            return Vec::new();
        }
        let largest = regions.iter().map(Vec::len).max().unwrap_or(0);

        let mut captured = Vec::new();
        for (id, members) in regions.iter().enumerate() {
            if members.len() == largest {
                continue;
            }
            let inside: Vec<usize> = self
                .placed
                .iter()
                .enumerate()
                .filter(|(_, p)| p.building.color() != mover)
                .filter(|(_, p)| {
                    p.cells()
                        .next()
                        .is_some_and(|(x, y)| region_of[idx(x, y)] == id)
                })
                .map(|(k, _)| k)
                .collect();
            if inside.len() > 1 {
                continue;
            }
            if let Some(&k) = inside.first() {
                captured.push(self.placed.remove(k).building);
            }
            for &i in members {
                self.cells[i] = CellState::Owned(mover);
            }
        }
        captured
    }

    /// Exchange black and white everywhere (cells and standing buildings).
    pub fn swap_colors(&mut self) {
        let swap = |c: Color| c.opponent();
        for cell in &mut self.cells {
            *cell = match *cell {
                CellState::Owned(c) => CellState::Owned(swap(c)),
                CellState::Occupied(c) => CellState::Occupied(swap(c)),
                CellState::Empty => CellState::Empty,
            };
        }
        for p in &mut self.placed {
            if let Some(b) = Building::new(p.building.kind(), swap(p.building.color())) {
                p.building = b;
            }
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..N {
            for x in 0..N {
                let ch = match self.get(x, y) {
                    CellState::Empty => '.',
                    CellState::Occupied(Color::Neutral) => 'C',
                    CellState::Occupied(Color::Black) => 'X',
                    CellState::Occupied(Color::White) => 'O',
                    CellState::Owned(Color::Black) => 'x',
                    CellState::Owned(Color::White) => 'o',
                    CellState::Owned(Color::Neutral) => '?',
                };
                write!(f, "{ch} ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
