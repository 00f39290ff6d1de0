use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Upper bound on `width * height`.
pub const MAX_CELLS: usize = 1 << 24;

/// Contents of one grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CellKind {
    #[default]
    Empty,
    Wall,
    /// A pile of beepers. The count is always at least one; an emptied
    /// pile becomes [`CellKind::Empty`].
    Beepers(u32),
}

impl CellKind {
    pub fn beepers(&self) -> u32 {
        match self {
            CellKind::Beepers(n) => *n,
            _ => 0,
        }
    }

    fn normalized(self) -> Self {
        match self {
            CellKind::Beepers(0) => CellKind::Empty,
            other => other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorldError {
    #[error("cell ({x}, {y}) is outside the {width}x{height} world")]
    OutOfBounds {
        x: i64,
        y: i64,
        width: usize,
        height: usize,
    },

    #[error("world dimensions must be at least 1x1, got {width}x{height}")]
    InvalidSize { width: usize, height: usize },

    #[error("a {}x{} world exceeds the limit of {} cells", .width, .height, MAX_CELLS)]
    TooLarge { width: usize, height: usize },

    #[error("cell ({x}, {y}) holds an empty beeper pile")]
    EmptyPile { x: usize, y: usize },

    #[error("world stores {found} cells but {width}x{height} needs {expected}")]
    CellCountMismatch {
        width: usize,
        height: usize,
        expected: usize,
        found: usize,
    },
}

/// A fixed-size grid of cells.
///
/// Width and height never change after construction. Cells are stored
/// row by row starting from `y = 0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct World {
    width: usize,
    height: usize,
    cells: Vec<CellKind>,
}

impl World {
    pub fn new(width: usize, height: usize) -> Result<Self, WorldError> {
        let count = cell_count(width, height)?;
        Ok(Self {
            width,
            height,
            cells: vec![CellKind::Empty; count],
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Whether `(x, y)` names a cell of this grid. Takes signed coordinates
    /// so callers can probe one step past an edge.
    pub fn in_bounds(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && (x as u64) < self.width as u64 && (y as u64) < self.height as u64
    }

    pub fn contents(&self, x: usize, y: usize) -> Result<CellKind, WorldError> {
        let idx = self.index(x as i64, y as i64)?;
        Ok(self.cells[idx])
    }

    pub fn set_contents(&mut self, x: usize, y: usize, kind: CellKind) -> Result<(), WorldError> {
        let idx = self.index(x as i64, y as i64)?;
        self.cells[idx] = kind.normalized();
        Ok(())
    }

    /// Whether `(x, y)` is a wall. Off-grid cells count as walls.
    pub fn is_blocked(&self, x: i64, y: i64) -> bool {
        match self.index(x, y) {
            Ok(idx) => self.cells[idx] == CellKind::Wall,
            Err(_) => true,
        }
    }

    pub fn beepers(&self, x: usize, y: usize) -> Result<u32, WorldError> {
        Ok(self.contents(x, y)?.beepers())
    }

    /// Drop one beeper on `(x, y)`, turning an empty cell into a pile.
    /// Walls are replaced by the pile.
    pub fn add_beeper(&mut self, x: usize, y: usize) -> Result<u32, WorldError> {
        let idx = self.index(x as i64, y as i64)?;
        let count = self.cells[idx].beepers().saturating_add(1);
        self.cells[idx] = CellKind::Beepers(count);
        Ok(count)
    }

    /// Take one beeper from `(x, y)`. Returns the remaining count, or
    /// `None` if the cell had none (the cell is left untouched).
    pub fn remove_beeper(&mut self, x: usize, y: usize) -> Result<Option<u32>, WorldError> {
        let idx = self.index(x as i64, y as i64)?;
        match self.cells[idx] {
            CellKind::Beepers(n) if n > 0 => {
                let left = n - 1;
                self.cells[idx] = CellKind::Beepers(left).normalized();
                Ok(Some(left))
            }
            _ => Ok(None),
        }
    }

    /// Iterate over every cell as `(x, y, kind)`.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, CellKind)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(i, kind)| (i % self.width, i / self.width, *kind))
    }

    /// Re-check the structural invariants. Used after deserializing.
    pub fn validate(&self) -> Result<(), WorldError> {
        let expected = cell_count(self.width, self.height)?;
        if self.cells.len() != expected {
            return Err(WorldError::CellCountMismatch {
                width: self.width,
                height: self.height,
                expected,
                found: self.cells.len(),
            });
        }
        if let Some((x, y, _)) = self.cells().find(|(_, _, kind)| *kind == CellKind::Beepers(0)) {
            return Err(WorldError::EmptyPile { x, y });
        }
        Ok(())
    }

    fn index(&self, x: i64, y: i64) -> Result<usize, WorldError> {
        if !self.in_bounds(x, y) {
            return Err(WorldError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(y as usize * self.width + x as usize)
    }
}

fn cell_count(width: usize, height: usize) -> Result<usize, WorldError> {
    if width == 0 || height == 0 {
        return Err(WorldError::InvalidSize { width, height });
    }
    match width.checked_mul(height) {
        Some(count) if count <= MAX_CELLS => Ok(count),
        _ => Err(WorldError::TooLarge { width, height }),
    }
}

impl std::fmt::Display for World {
    /// Render the grid with north at the top: `#` wall, `.` empty, digits
    /// for beeper piles (`*` above nine).
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for y in (0..self.height).rev() {
            for x in 0..self.width {
                let ch = match self.cells[y * self.width + x] {
                    CellKind::Empty => '.',
                    CellKind::Wall => '#',
                    CellKind::Beepers(n) if n <= 9 => char::from(b'0' + n as u8),
                    CellKind::Beepers(_) => '*',
                };
                write!(f, "{}", ch)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_world_is_empty() {
        let world = World::new(3, 2).unwrap();
        assert_eq!(world.width(), 3);
        assert_eq!(world.height(), 2);
        assert!(world.cells().all(|(_, _, k)| k == CellKind::Empty));
        assert_eq!(world.cells().count(), 6);
    }

    #[test]
    fn test_zero_size_rejected() {
        assert_eq!(
            World::new(0, 4),
            Err(WorldError::InvalidSize {
                width: 0,
                height: 4
            })
        );
        assert!(World::new(4, 0).is_err());
    }

    #[test]
    fn test_out_of_bounds_access() {
        let mut world = World::new(2, 2).unwrap();
        assert!(matches!(
            world.contents(2, 0),
            Err(WorldError::OutOfBounds { x: 2, y: 0, .. })
        ));
        assert!(world.set_contents(0, 5, CellKind::Wall).is_err());
        assert!(world.add_beeper(9, 9).is_err());
    }

    #[test]
    fn test_set_and_get_contents() {
        let mut world = World::new(3, 3).unwrap();
        world.set_contents(1, 2, CellKind::Wall).unwrap();
        world.set_contents(2, 0, CellKind::Beepers(4)).unwrap();

        assert_eq!(world.contents(1, 2).unwrap(), CellKind::Wall);
        assert_eq!(world.beepers(2, 0).unwrap(), 4);
        assert_eq!(world.contents(0, 0).unwrap(), CellKind::Empty);
    }

    #[test]
    fn test_zero_beepers_normalize_to_empty() {
        let mut world = World::new(1, 1).unwrap();
        world.set_contents(0, 0, CellKind::Beepers(0)).unwrap();
        assert_eq!(world.contents(0, 0).unwrap(), CellKind::Empty);
    }

    #[test]
    fn test_beeper_pile_round_trip() {
        let mut world = World::new(1, 1).unwrap();
        assert_eq!(world.add_beeper(0, 0).unwrap(), 1);
        assert_eq!(world.add_beeper(0, 0).unwrap(), 2);
        assert_eq!(world.remove_beeper(0, 0).unwrap(), Some(1));
        assert_eq!(world.remove_beeper(0, 0).unwrap(), Some(0));
        assert_eq!(world.contents(0, 0).unwrap(), CellKind::Empty);
        assert_eq!(world.remove_beeper(0, 0).unwrap(), None);
    }

    #[test]
    fn test_off_grid_counts_as_blocked() {
        let mut world = World::new(2, 2).unwrap();
        world.set_contents(1, 1, CellKind::Wall).unwrap();
        assert!(world.is_blocked(-1, 0));
        assert!(world.is_blocked(0, 2));
        assert!(world.is_blocked(1, 1));
        assert!(!world.is_blocked(1, 0));
    }

    #[test]
    fn test_display_puts_north_on_top() {
        let mut world = World::new(3, 2).unwrap();
        world.set_contents(0, 1, CellKind::Wall).unwrap();
        world.set_contents(2, 0, CellKind::Beepers(3)).unwrap();
        assert_eq!(world.to_string(), "#..\n..3\n");
    }

    #[test]
    fn test_validate_detects_bad_cell_count() {
        let mut world = World::new(2, 2).unwrap();
        world.cells.pop();
        assert!(matches!(
            world.validate(),
            Err(WorldError::CellCountMismatch { expected: 4, found: 3, .. })
        ));
    }

    #[test]
    fn test_oversized_world_rejected() {
        assert_eq!(
            World::new(usize::MAX, 2),
            Err(WorldError::TooLarge {
                width: usize::MAX,
                height: 2
            })
        );
        assert!(matches!(
            World::new(MAX_CELLS, 2),
            Err(WorldError::TooLarge { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_overflowing_dimensions() {
        let world = World {
            width: 1 << 32,
            height: 1 << 32,
            cells: vec![],
        };
        assert!(matches!(world.validate(), Err(WorldError::TooLarge { .. })));
    }

    #[test]
    fn test_validate_rejects_empty_pile() {
        let mut world = World::new(2, 2).unwrap();
        world.cells[3] = CellKind::Beepers(0);
        assert_eq!(world.validate(), Err(WorldError::EmptyPile { x: 1, y: 1 }));
    }
}
