use serde::{Deserialize, Serialize};

/// Classification of a single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerrainKind {
    Normal,
    Highway,
    HardToTraverse,
    /// The agent can never occupy or enter a blocked cell.
    Blocked,
}

impl TerrainKind {
    /// Single character code used by the grid file format.
    pub fn code(self) -> char {
        match self {
            TerrainKind::Normal => 'N',
            TerrainKind::Highway => 'H',
            TerrainKind::HardToTraverse => 'T',
            TerrainKind::Blocked => 'B',
        }
    }

    /// Parse a grid file code back into a terrain kind.
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'N' => Some(TerrainKind::Normal),
            'H' => Some(TerrainKind::Highway),
            'T' => Some(TerrainKind::HardToTraverse),
            'B' => Some(TerrainKind::Blocked),
            _ => None,
        }
    }

    pub fn is_blocked(self) -> bool {
        self == TerrainKind::Blocked
    }

    /// The sensor reading a perfect sensor would produce on this terrain.
    /// Blocked cells have none.
    pub fn as_observation(self) -> Option<Observation> {
        match self {
            TerrainKind::Normal => Some(Observation::Normal),
            TerrainKind::Highway => Some(Observation::Highway),
            TerrainKind::HardToTraverse => Some(Observation::HardToTraverse),
            TerrainKind::Blocked => None,
        }
    }
}

/// A terrain sensor reading. Blocked is not representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Observation {
    Normal,
    Highway,
    HardToTraverse,
}

impl Observation {
    pub const ALL: [Observation; 3] = [
        Observation::Normal,
        Observation::Highway,
        Observation::HardToTraverse,
    ];

    pub fn code(self) -> char {
        self.terrain().code()
    }

    /// Parse an observation code; `B` is rejected.
    pub fn from_code(code: char) -> Option<Self> {
        TerrainKind::from_code(code).and_then(TerrainKind::as_observation)
    }

    /// The terrain kind this reading claims.
    pub fn terrain(self) -> TerrainKind {
        match self {
            Observation::Normal => TerrainKind::Normal,
            Observation::Highway => TerrainKind::Highway,
            Observation::HardToTraverse => TerrainKind::HardToTraverse,
        }
    }

    /// Check whether this reading agrees with a cell's terrain.
    pub fn matches(self, kind: TerrainKind) -> bool {
        self.terrain() == kind
    }

    /// The two readings a faulty sensor may report instead of this one.
    pub fn alternatives(self) -> [Observation; 2] {
        match self {
            Observation::Normal => [Observation::Highway, Observation::HardToTraverse],
            Observation::Highway => [Observation::Normal, Observation::HardToTraverse],
            Observation::HardToTraverse => [Observation::Normal, Observation::Highway],
        }
    }
}

/// An attempted unit move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
}

impl Action {
    pub const ALL: [Action; 4] = [Action::Up, Action::Down, Action::Left, Action::Right];

    pub fn code(self) -> char {
        match self {
            Action::Up => 'U',
            Action::Down => 'D',
            Action::Left => 'L',
            Action::Right => 'R',
        }
    }

    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'U' => Some(Action::Up),
            'D' => Some(Action::Down),
            'L' => Some(Action::Left),
            'R' => Some(Action::Right),
            _ => None,
        }
    }

    /// The move pointing the other way.
    pub fn opposite(self) -> Self {
        match self {
            Action::Up => Action::Down,
            Action::Down => Action::Up,
            Action::Left => Action::Right,
            Action::Right => Action::Left,
        }
    }

    /// `(row, col)` offset of one step in this direction.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Action::Up => (-1, 0),
            Action::Down => (1, 0),
            Action::Left => (0, -1),
            Action::Right => (0, 1),
        }
    }
}
