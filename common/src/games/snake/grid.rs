use crate::games::SessionRng;
use super::types::Cell;

/// Fixed playing field. Dimensions never change after a session is created.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Grid {
    rows: i32,
    cols: i32,
}

impl Grid {
    pub fn new(rows: i32, cols: i32) -> Self {
        Self { rows, cols }
    }

    /// Derives the grid from a board measured in pixels; partial cells are dropped.
    pub fn from_board(board_width: u32, board_height: u32, cell_size: u32) -> Self {
        let cell_size = cell_size.max(1);
        Self::new((board_height / cell_size) as i32, (board_width / cell_size) as i32)
    }

    pub fn rows(&self) -> i32 {
        self.rows
    }

    pub fn cols(&self) -> i32 {
        self.cols
    }

    pub fn cell_count(&self) -> usize {
        (self.rows.max(0) as usize) * (self.cols.max(0) as usize)
    }

    pub fn in_bounds(&self, cell: Cell) -> bool {
        (0..self.rows).contains(&cell.row) && (0..self.cols).contains(&cell.col)
    }

    pub fn random_cell(&self, rng: &mut SessionRng) -> Cell {
        Cell::new(rng.random_range(0..self.rows), rng.random_range(0..self.cols))
    }

    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.rows).flat_map(move |row| (0..self.cols).map(move |col| Cell::new(row, col)))
    }
}
