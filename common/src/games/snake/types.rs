use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub row: i32,
    pub col: i32,
}

impl Cell {
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    pub fn shifted(self, direction: Direction) -> Cell {
        let (d_row, d_col) = direction.delta();
        Cell::new(self.row + d_row, self.col + d_col)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn is_opposite(&self, other: &Direction) -> bool {
        self.opposite() == *other
    }

    /// Row/column offset of one step. Rows grow downwards.
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeathReason {
    WallCollision,
    SelfCollision,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ElapsedTime {
    pub minutes: u32,
    pub seconds: u8,
}

impl ElapsedTime {
    pub fn tick(&mut self) {
        self.seconds += 1;
        if self.seconds == 60 {
            self.minutes += 1;
            self.seconds = 0;
        }
    }
}

impl fmt::Display for ElapsedTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:02}", self.minutes, self.seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposite_pairs() {
        assert!(Direction::Up.is_opposite(&Direction::Down));
        assert!(Direction::Left.is_opposite(&Direction::Right));
        assert!(!Direction::Up.is_opposite(&Direction::Left));
        assert!(!Direction::Right.is_opposite(&Direction::Right));
    }

    #[test]
    fn test_shifted_moves_one_cell() {
        let cell = Cell::new(1, 3);
        assert_eq!(cell.shifted(Direction::Down), Cell::new(2, 3));
        assert_eq!(cell.shifted(Direction::Up), Cell::new(0, 3));
        assert_eq!(cell.shifted(Direction::Left), Cell::new(1, 2));
        assert_eq!(cell.shifted(Direction::Right), Cell::new(1, 4));
    }

    #[test]
    fn test_elapsed_time_rolls_seconds_into_minutes() {
        let mut time = ElapsedTime { minutes: 0, seconds: 59 };
        time.tick();
        assert_eq!(time, ElapsedTime { minutes: 1, seconds: 0 });
        time.tick();
        assert_eq!(time.to_string(), "01-01");
    }

    #[test]
    fn test_elapsed_time_formats_with_padding() {
        assert_eq!(ElapsedTime::default().to_string(), "00-00");
        assert_eq!(ElapsedTime { minutes: 12, seconds: 5 }.to_string(), "12-05");
    }
}
