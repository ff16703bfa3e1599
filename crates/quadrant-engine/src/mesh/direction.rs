use glam::Vec3;

/// Coordinate axis.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Component index into a position (`x = 0`, `y = 1`, `z = 2`).
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// One of the six axis-aligned faces of the unit cube.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Direction {
    Down,
    Up,
    North,
    South,
    West,
    East,
}

impl Direction {
    pub const ALL: [Direction; 6] = [
        Direction::Down,
        Direction::Up,
        Direction::North,
        Direction::South,
        Direction::West,
        Direction::East,
    ];

    /// Stable id (0..=5) used in the quad encoding.
    #[inline]
    pub const fn id(self) -> u32 {
        self as u32
    }

    #[inline]
    pub fn from_id(id: u32) -> Option<Direction> {
        Self::ALL.get(id as usize).copied()
    }

    #[inline]
    pub const fn axis(self) -> Axis {
        match self {
            Direction::Down | Direction::Up => Axis::Y,
            Direction::North | Direction::South => Axis::Z,
            Direction::West | Direction::East => Axis::X,
        }
    }

    /// True for faces pointing toward +X, +Y or +Z.
    #[inline]
    pub const fn is_positive(self) -> bool {
        matches!(self, Direction::Up | Direction::South | Direction::East)
    }

    #[inline]
    pub fn unit(self) -> Vec3 {
        match self {
            Direction::Down => Vec3::NEG_Y,
            Direction::Up => Vec3::Y,
            Direction::North => Vec3::NEG_Z,
            Direction::South => Vec3::Z,
            Direction::West => Vec3::NEG_X,
            Direction::East => Vec3::X,
        }
    }

    #[inline]
    pub const fn opposite(self) -> Direction {
        match self {
            Direction::Down => Direction::Up,
            Direction::Up => Direction::Down,
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
            Direction::East => Direction::West,
        }
    }
}
