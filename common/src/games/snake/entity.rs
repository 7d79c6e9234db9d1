use std::collections::{HashSet, VecDeque};

use super::food::Food;
use super::grid::Grid;
use super::types::{Cell, DeathReason, Direction};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    Blocked(DeathReason),
    Ate(Food),
    Moved,
}

/// Body cells head first plus the current heading. The body is never empty and
/// never overlaps itself once a step has been committed.
#[derive(Clone, Debug)]
pub struct Snake {
    body: VecDeque<Cell>,
    body_set: HashSet<Cell>,
    direction: Direction,
}

impl Snake {
    pub fn new(origin: Cell, direction: Direction) -> Self {
        Self::with_body([origin], direction)
    }

    /// Builds a snake from explicit cells, head first. Duplicate cells are dropped.
    pub fn with_body(cells: impl IntoIterator<Item = Cell>, direction: Direction) -> Self {
        let mut body = VecDeque::new();
        let mut body_set = HashSet::new();
        for cell in cells {
            if body_set.insert(cell) {
                body.push_back(cell);
            }
        }
        assert!(!body.is_empty(), "snake body must contain at least one cell");
        Self {
            body,
            body_set,
            direction,
        }
    }

    pub fn head(&self) -> Cell {
        self.body[0]
    }

    pub fn tail(&self) -> Cell {
        self.body[self.body.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.body.iter()
    }

    pub fn occupied(&self) -> &HashSet<Cell> {
        &self.body_set
    }

    pub fn contains(&self, cell: &Cell) -> bool {
        self.body_set.contains(cell)
    }

    /// Changes the heading unless `direction` reverses it. Returns whether it changed.
    pub fn turn(&mut self, direction: Direction) -> bool {
        if direction.is_opposite(&self.direction) {
            return false;
        }
        self.direction = direction;
        true
    }

    pub fn step(&mut self, grid: &Grid, food: &Food) -> MoveOutcome {
        let next_head = self.head().shifted(self.direction);

        if !grid.in_bounds(next_head) {
            return MoveOutcome::Blocked(DeathReason::WallCollision);
        }
        if self.body_set.contains(&next_head) {
            return MoveOutcome::Blocked(DeathReason::SelfCollision);
        }

        self.body.push_front(next_head);
        self.body_set.insert(next_head);

        if next_head == food.cell {
            return MoveOutcome::Ate(*food);
        }

        if let Some(tail) = self.body.pop_back() {
            self.body_set.remove(&tail);
        }
        MoveOutcome::Moved
    }
}
