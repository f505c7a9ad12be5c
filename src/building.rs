//! Colors, directions, and the building catalog.
//!
//! Every building is a fixed polyomino anchored at `(0, 0)`. A placement
//! rotates the shape in quarter turns around the anchor; only the directions
//! that yield a distinct footprint are enumerated (see [`Building::directions`]).

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Errors produced when parsing colors, directions, buildings, or placements.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown color '{0}'")]
    UnknownColor(String),
    #[error("unknown direction '{0}'")]
    UnknownDirection(String),
    #[error("unknown building '{0}'")]
    UnknownBuilding(String),
    #[error("invalid coordinate '{0}'")]
    BadCoordinate(String),
    #[error("expected '<building> <x> <y> <direction>', got '{0}'")]
    Placement(String),
    #[error("unknown policy '{0}'")]
    UnknownPolicy(String),
}

/// Side owning a building or a territory cell.
///
/// `Neutral` owns the cathedral and is to move only on turn 0.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum Color {
    #[default]
    Neutral,
    Black,
    White,
}

impl Color {
    /// The two competing players.
    pub const PLAYERS: [Color; 2] = [Color::Black, Color::White];

    /// The competing side. `Neutral` has no opponent and maps to itself.
    pub fn opponent(self) -> Color {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
            Color::Neutral => Color::Neutral,
        }
    }

    /// True for black and white.
    pub fn is_player(self) -> bool {
        self != Color::Neutral
    }

    fn name(self) -> &'static str {
        match self {
            Color::Neutral => "neutral",
            Color::Black => "black",
            Color::White => "white",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Color {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "b" | "black" => Ok(Color::Black),
            "w" | "white" => Ok(Color::White),
            "n" | "neutral" | "blue" => Ok(Color::Neutral),
            _ => Err(ParseError::UnknownColor(s.to_string())),
        }
    }
}

/// Quarter-turn orientation of a placed building (clockwise).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Deg0,
        Direction::Deg90,
        Direction::Deg180,
        Direction::Deg270,
    ];

    /// Rotate an offset around the anchor. The y axis points down, so a
    /// quarter turn maps north `(0, -1)` to east `(1, 0)`.
    #[inline]
    pub fn rotate(self, (dx, dy): (i32, i32)) -> (i32, i32) {
        match self {
            Direction::Deg0 => (dx, dy),
            Direction::Deg90 => (-dy, dx),
            Direction::Deg180 => (-dx, -dy),
            Direction::Deg270 => (dy, -dx),
        }
    }

    /// Clockwise rotation in degrees.
    pub fn degrees(self) -> u32 {
        match self {
            Direction::Deg0 => 0,
            Direction::Deg90 => 90,
            Direction::Deg180 => 180,
            Direction::Deg270 => 270,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.degrees())
    }
}

impl FromStr for Direction {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim_start_matches('_') {
            "0" => Ok(Direction::Deg0),
            "90" => Ok(Direction::Deg90),
            "180" => Ok(Direction::Deg180),
            "270" => Ok(Direction::Deg270),
            _ => Err(ParseError::UnknownDirection(s.to_string())),
        }
    }
}

/// Building shapes. Player colors share the catalog; the abbey and the
/// academy are mirrored for white.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Kind {
    Tavern,
    Stable,
    Inn,
    Bridge,
    Square,
    Abbey,
    Manor,
    Tower,
    Infirmary,
    Castle,
    Academy,
    Cathedral,
}

impl Kind {
    const ALL: [Kind; 12] = [
        Kind::Tavern,
        Kind::Stable,
        Kind::Inn,
        Kind::Bridge,
        Kind::Square,
        Kind::Abbey,
        Kind::Manor,
        Kind::Tower,
        Kind::Infirmary,
        Kind::Castle,
        Kind::Academy,
        Kind::Cathedral,
    ];

    fn name(self) -> &'static str {
        match self {
            Kind::Tavern => "tavern",
            Kind::Stable => "stable",
            Kind::Inn => "inn",
            Kind::Bridge => "bridge",
            Kind::Square => "square",
            Kind::Abbey => "abbey",
            Kind::Manor => "manor",
            Kind::Tower => "tower",
            Kind::Infirmary => "infirmary",
            Kind::Castle => "castle",
            Kind::Academy => "academy",
            Kind::Cathedral => "cathedral",
        }
    }

    /// Cell offsets at [`Direction::Deg0`].
    fn shape(self, mirrored: bool) -> &'static [(i32, i32)] {
        match (self, mirrored) {
            (Kind::Tavern, _) => &[(0, 0)],
            (Kind::Stable, _) => &[(0, 0), (0, 1)],
            (Kind::Inn, _) => &[(0, -1), (0, 0), (1, 0)],
            (Kind::Bridge, _) => &[(0, -1), (0, 0), (0, 1)],
            (Kind::Square, _) => &[(0, 0), (1, 0), (0, 1), (1, 1)],
            (Kind::Abbey, false) => &[(0, 0), (0, 1), (1, 1), (1, 2)],
            (Kind::Abbey, true) => &[(0, 0), (0, 1), (-1, 1), (-1, 2)],
            (Kind::Manor, _) => &[(-1, 0), (0, 0), (1, 0), (0, 1)],
            (Kind::Tower, _) => &[(-1, -1), (-1, 0), (0, 0), (0, 1), (1, 1)],
            (Kind::Infirmary, _) => &[(0, -1), (-1, 0), (0, 0), (1, 0), (0, 1)],
            (Kind::Castle, _) => &[(-1, 0), (1, 0), (-1, 1), (0, 1), (1, 1)],
            (Kind::Academy, false) => &[(0, -1), (1, -1), (-1, 0), (0, 0), (0, 1)],
            (Kind::Academy, true) => &[(0, -1), (-1, -1), (1, 0), (0, 0), (0, 1)],
            (Kind::Cathedral, _) => &[(0, -1), (-1, 0), (0, 0), (1, 0), (0, 1), (0, 2)],
        }
    }

    /// Directions producing distinct footprints.
    fn directions(self) -> &'static [Direction] {
        match self {
            Kind::Tavern | Kind::Square | Kind::Infirmary => &[Direction::Deg0],
            Kind::Stable | Kind::Bridge | Kind::Abbey => &[Direction::Deg0, Direction::Deg90],
            _ => &Direction::ALL,
        }
    }
}

/// One building of the catalog: a shape plus its owner.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Building {
    kind: Kind,
    color: Color,
}

impl Building {
    pub const CATHEDRAL: Building = Building {
        kind: Kind::Cathedral,
        color: Color::Neutral,
    };

    /// Create a building. Returns `None` for combinations outside the catalog.
    pub fn new(kind: Kind, color: Color) -> Option<Self> {
        let neutral = kind == Kind::Cathedral;
        if neutral == (color == Color::Neutral) {
            Some(Building { kind, color })
        } else {
            None
        }
    }

    pub fn kind(self) -> Kind {
        self.kind
    }

    /// Owning side; `Neutral` for the cathedral.
    pub fn color(self) -> Color {
        self.color
    }

    /// Intrinsic value: the number of cells covered.
    pub fn score(self) -> u32 {
        self.shape().len() as u32
    }

    /// Directions giving distinct footprints.
    pub fn directions(self) -> &'static [Direction] {
        self.kind.directions()
    }

    fn shape(self) -> &'static [(i32, i32)] {
        self.kind.shape(self.color == Color::White)
    }

    /// Offsets from the anchor covered at the given direction.
    pub fn offsets(self, direction: Direction) -> impl Iterator<Item = (i32, i32)> {
        self.shape().iter().map(move |&o| direction.rotate(o))
    }

    /// Identifier such as `black_tower` or `cathedral`.
    pub fn id(self) -> String {
        match self.color {
            Color::Neutral => self.kind.name().to_string(),
            color => format!("{color}_{}", self.kind.name()),
        }
    }
}

impl fmt::Display for Building {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id())
    }
}

impl FromStr for Building {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        let (color, name) = match lower.split_once('_') {
            Some((color, name)) => (color.parse::<Color>()?, name),
            None => (Color::Neutral, lower.as_str()),
        };
        Kind::ALL
            .iter()
            .find(|k| k.name() == name)
            .and_then(|&k| Building::new(k, color))
            .ok_or_else(|| ParseError::UnknownBuilding(s.to_string()))
    }
}

/// The starting hand of a side, largest pieces last (catalog order).
pub fn catalog(color: Color) -> Vec<Building> {
    use Kind::*;
    let kinds: &[Kind] = match color {
        Color::Neutral => &[Cathedral],
        _ => &[
            Tavern, Tavern, Stable, Stable, Inn, Inn, Bridge, Square, Abbey, Manor, Tower,
            Infirmary, Castle, Academy,
        ],
    };
    kinds.iter().map(|&kind| Building { kind, color }).collect()
}
