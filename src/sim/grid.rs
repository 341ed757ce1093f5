//! Tile grid and hidden item layer
//!
//! Cells are addressed with `IVec2` where `x` is the column and `y` the row.
//! Storage is row-major (`cells[y][x]`).

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::consts::GRID_SIZE;
use crate::in_bounds;

/// Visible tile kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TileKind {
    #[default]
    Empty,
    Indestructible,
    Destructible,
    Exit,
    BombPowerup,
    RangePowerup,
}

impl TileKind {
    /// Kinds the player and enemies may stand on
    pub fn is_walkable(self) -> bool {
        matches!(
            self,
            TileKind::Empty | TileKind::Exit | TileKind::BombPowerup | TileKind::RangePowerup
        )
    }
}

/// Items that can be concealed beneath a destructible wall
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HiddenItem {
    Exit,
    BombPowerup,
    RangePowerup,
}

impl HiddenItem {
    pub const ALL: [HiddenItem; 3] = [
        HiddenItem::Exit,
        HiddenItem::BombPowerup,
        HiddenItem::RangePowerup,
    ];
}

impl From<HiddenItem> for TileKind {
    fn from(item: HiddenItem) -> Self {
        match item {
            HiddenItem::Exit => TileKind::Exit,
            HiddenItem::BombPowerup => TileKind::BombPowerup,
            HiddenItem::RangePowerup => TileKind::RangePowerup,
        }
    }
}

/// Cardinal movement directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    East,
    West,
    North,
    South,
}

impl Direction {
    /// Order used by the enemy random walk and blast propagation
    pub const ALL: [Direction; 4] = [
        Direction::East,
        Direction::West,
        Direction::South,
        Direction::North,
    ];

    /// Unit step (north is toward row 0)
    pub fn delta(self) -> IVec2 {
        match self {
            Direction::East => IVec2::new(1, 0),
            Direction::West => IVec2::new(-1, 0),
            Direction::North => IVec2::new(0, -1),
            Direction::South => IVec2::new(0, 1),
        }
    }
}

/// Square matrix of cells
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layer<T> {
    cells: [[T; GRID_SIZE]; GRID_SIZE],
}

impl<T: Copy + Default> Default for Layer<T> {
    fn default() -> Self {
        Self {
            cells: [[T::default(); GRID_SIZE]; GRID_SIZE],
        }
    }
}

impl<T: Copy> Layer<T> {
    /// Value at `cell`, or `None` when out of bounds
    pub fn get(&self, cell: IVec2) -> Option<T> {
        in_bounds(cell).then(|| self.cells[cell.y as usize][cell.x as usize])
    }

    /// Overwrite `cell`; out-of-bounds writes are ignored
    pub fn set(&mut self, cell: IVec2, value: T) {
        if in_bounds(cell) {
            self.cells[cell.y as usize][cell.x as usize] = value;
        }
    }

    /// All cells with their values in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (IVec2, T)> + '_ {
        self.cells.iter().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .map(move |(x, v)| (IVec2::new(x as i32, y as i32), *v))
        })
    }

    /// Rows for renderers (row index = y)
    pub fn rows(&self) -> &[[T; GRID_SIZE]; GRID_SIZE] {
        &self.cells
    }
}

/// Visible tiles
pub type Grid = Layer<TileKind>;

/// Items concealed under destructible walls
pub type HiddenLayer = Layer<Option<HiddenItem>>;

impl Grid {
    /// Tile at `cell`; anything outside the grid reads as a wall
    pub fn tile(&self, cell: IVec2) -> TileKind {
        self.get(cell).unwrap_or(TileKind::Indestructible)
    }

    /// Count of cells with the given kind
    pub fn count(&self, kind: TileKind) -> usize {
        self.iter().filter(|&(_, t)| t == kind).count()
    }
}
