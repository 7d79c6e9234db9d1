use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::Validate;
use super::food::{FoodKind, FoodVariantSettings};
use super::grid::Grid;
use super::types::{Cell, Direction};

const WEIGHT_EPSILON: f64 = 1e-6;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnakeSessionSettings {
    pub board_width: u32,
    pub board_height: u32,
    pub cell_size: u32,
    pub origin: Cell,
    pub start_direction: Direction,
    pub base_speed_ms: u64,
    pub min_speed_ms: u64,
    pub speed_step_ms: u64,
    pub score_step: u32,
    pub countdown_from: u8,
    pub countdown_interval_ms: u64,
    pub go_delay_ms: u64,
    pub food_variants: Vec<FoodVariantSettings>,
}

impl Default for SnakeSessionSettings {
    fn default() -> Self {
        Self {
            board_width: 800,
            board_height: 600,
            cell_size: 50,
            origin: Cell::new(1, 3),
            start_direction: Direction::Down,
            base_speed_ms: 400,
            min_speed_ms: 100,
            speed_step_ms: 25,
            score_step: 50,
            countdown_from: 3,
            countdown_interval_ms: 800,
            go_delay_ms: 500,
            food_variants: vec![
                FoodVariantSettings { kind: FoodKind::Normal, score_delta: 10, weight: 0.7 },
                FoodVariantSettings { kind: FoodKind::Bonus, score_delta: 30, weight: 0.2 },
                FoodVariantSettings { kind: FoodKind::Penalty, score_delta: -10, weight: 0.1 },
            ],
        }
    }
}

impl SnakeSessionSettings {
    pub fn grid(&self) -> Grid {
        Grid::from_board(self.board_width, self.board_height, self.cell_size)
    }

    /// Movement period for `score`: one `speed_step_ms` faster per `score_step` points,
    /// never below `min_speed_ms`.
    pub fn speed_for_score(&self, score: u32) -> Duration {
        let levels = (score / self.score_step.max(1)) as u64;
        let speed = self
            .base_speed_ms
            .saturating_sub(levels.saturating_mul(self.speed_step_ms))
            .max(self.min_speed_ms);
        Duration::from_millis(speed)
    }

    pub fn base_speed(&self) -> Duration {
        Duration::from_millis(self.base_speed_ms)
    }

    pub fn countdown_interval(&self) -> Duration {
        Duration::from_millis(self.countdown_interval_ms)
    }

    pub fn go_delay(&self) -> Duration {
        Duration::from_millis(self.go_delay_ms)
    }
}

impl Validate for SnakeSessionSettings {
    fn validate(&self) -> Result<(), String> {
        if self.cell_size == 0 {
            return Err("Cell size must be positive".to_string());
        }
        let grid = self.grid();
        if grid.rows() < 1 || grid.cols() < 1 {
            return Err(format!(
                "Board {}x{} is smaller than one {}px cell",
                self.board_width, self.board_height, self.cell_size
            ));
        }
        if !grid.in_bounds(self.origin) {
            return Err(format!(
                "Origin {} is outside the {}x{} grid",
                self.origin,
                grid.rows(),
                grid.cols()
            ));
        }
        if self.min_speed_ms == 0 || self.min_speed_ms > self.base_speed_ms {
            return Err("Speeds must satisfy 0 < min_speed_ms <= base_speed_ms".to_string());
        }
        if self.score_step == 0 {
            return Err("Score step must be positive".to_string());
        }
        if self.countdown_interval_ms == 0 {
            return Err("Countdown interval must be positive".to_string());
        }
        if self.food_variants.is_empty() {
            return Err("At least one food variant is required".to_string());
        }
        if self.food_variants.iter().any(|v| v.weight < 0.0 || !v.weight.is_finite()) {
            return Err("Food weights must be finite and non-negative".to_string());
        }
        let total: f64 = self.food_variants.iter().map(|v| v.weight).sum();
        if (total - 1.0).abs() > WEIGHT_EPSILON {
            return Err(format!("Food weights must sum to 1.0, got {}", total));
        }
        Ok(())
    }
}
