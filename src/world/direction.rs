use serde::{Deserialize, Serialize};

/// Compass orientation of the agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// 90° counter-clockwise.
    pub fn left(self) -> Self {
        match self {
            Direction::North => Direction::West,
            Direction::West => Direction::South,
            Direction::South => Direction::East,
            Direction::East => Direction::North,
        }
    }

    /// 90° clockwise.
    pub fn right(self) -> Self {
        match self {
            Direction::North => Direction::East,
            Direction::East => Direction::South,
            Direction::South => Direction::West,
            Direction::West => Direction::North,
        }
    }

    /// Unit step `(dx, dy)` in this direction.
    pub fn delta(self) -> (i64, i64) {
        match self {
            Direction::North => (0, 1),
            Direction::East => (1, 0),
            Direction::South => (0, -1),
            Direction::West => (-1, 0),
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Direction::North => "north",
            Direction::East => "east",
            Direction::South => "south",
            Direction::West => "west",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    #[test]
    fn test_four_turns_are_identity() {
        for dir in ALL {
            assert_eq!(dir.left().left().left().left(), dir);
            assert_eq!(dir.right().right().right().right(), dir);
        }
    }

    #[test]
    fn test_left_undoes_right() {
        for dir in ALL {
            assert_eq!(dir.right().left(), dir);
        }
    }

    #[test]
    fn test_opposite_deltas_cancel() {
        for dir in ALL {
            let (ax, ay) = dir.delta();
            let (bx, by) = dir.right().right().delta();
            assert_eq!((ax + bx, ay + by), (0, 0));
        }
    }
}
