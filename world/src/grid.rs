//! Dense square board storing the content of every cell.

use times_table_core::{CellCoord, CellKind, GridSize};

/// Fixed-size square board of [`CellKind`] values stored row-major.
///
/// The board is the single authoritative record of occupancy: a token is on
/// the board exactly when its cell reads [`CellKind::Number`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    size: GridSize,
    cells: Vec<CellKind>,
}

impl Grid {
    /// Creates an empty board with `size × size` cells.
    #[must_use]
    pub fn new(size: GridSize) -> Self {
        Self {
            size,
            cells: vec![CellKind::Empty; size.cell_count()],
        }
    }

    /// Side length of the board.
    #[must_use]
    pub const fn size(&self) -> GridSize {
        self.size
    }

    /// Reports whether the cell lies on the board.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        self.size.contains(cell)
    }

    /// Content of the provided cell.
    ///
    /// # Panics
    ///
    /// Panics when `cell` lies outside the board. Callers filter coordinates
    /// with [`Grid::contains`] first.
    #[must_use]
    pub fn get(&self, cell: CellCoord) -> CellKind {
        self.cells[self.index(cell)]
    }

    /// Overwrites the content of the provided cell.
    ///
    /// # Panics
    ///
    /// Panics when `cell` lies outside the board.
    pub fn set(&mut self, cell: CellCoord, kind: CellKind) {
        let index = self.index(cell);
        self.cells[index] = kind;
    }

    /// Turns every non-wall cell into grass.
    pub fn reset_preserving_walls(&mut self) {
        for cell in self.cells.iter_mut() {
            if *cell != CellKind::Wall {
                *cell = CellKind::Empty;
            }
        }
    }

    /// Turns every wall into grass, returning how many walls were removed.
    pub fn clear_walls(&mut self) -> u32 {
        let mut cleared = 0;
        for cell in self.cells.iter_mut() {
            if *cell == CellKind::Wall {
                *cell = CellKind::Empty;
                cleared += 1;
            }
        }
        cleared
    }

    /// Number of cells holding the provided content.
    #[must_use]
    pub fn count(&self, kind: CellKind) -> usize {
        self.cells.iter().filter(|cell| **cell == kind).count()
    }

    /// Iterates over every cell in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, CellKind)> + '_ {
        let width = self.size.get();
        self.cells.iter().enumerate().map(move |(index, kind)| {
            let index = index as u32;
            (CellCoord::new(index % width, index / width), *kind)
        })
    }

    /// Row-major slice over the raw cell contents.
    #[must_use]
    pub fn cells(&self) -> &[CellKind] {
        &self.cells
    }

    fn index(&self, cell: CellCoord) -> usize {
        assert!(
            self.contains(cell),
            "cell ({}, {}) lies outside the {size}x{size} board",
            cell.column(),
            cell.row(),
            size = self.size.get(),
        );
        cell.row() as usize * self.size.get() as usize + cell.column() as usize
    }
}
