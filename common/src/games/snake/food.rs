use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::games::SessionRng;
use crate::log;
use super::grid::Grid;
use super::types::Cell;

const MAX_PLACEMENT_ATTEMPTS: usize = 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FoodKind {
    Normal,
    Bonus,
    Penalty,
}

impl FoodKind {
    pub fn visual_tag(&self) -> &'static str {
        match self {
            FoodKind::Normal => "food",
            FoodKind::Bonus => "food-bonus",
            FoodKind::Penalty => "food-penalty",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FoodVariant {
    pub kind: FoodKind,
    pub score_delta: i32,
}

impl FoodVariant {
    pub fn visual_tag(&self) -> &'static str {
        self.kind.visual_tag()
    }
}

/// One entry of the weighted variant table. Weights across the table sum to 1.0.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FoodVariantSettings {
    pub kind: FoodKind,
    pub score_delta: i32,
    pub weight: f64,
}

impl FoodVariantSettings {
    pub fn variant(&self) -> FoodVariant {
        FoodVariant {
            kind: self.kind,
            score_delta: self.score_delta,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Food {
    pub cell: Cell,
    pub variant: FoodVariant,
}

pub struct FoodSpawner {
    variants: Vec<(f64, FoodVariant)>,
}

impl FoodSpawner {
    /// `variants` must be non-empty; settings validation guarantees it for sessions.
    pub fn new(variants: &[FoodVariantSettings]) -> Self {
        let mut cumulative = 0.0;
        let variants = variants
            .iter()
            .map(|settings| {
                cumulative += settings.weight;
                (cumulative, settings.variant())
            })
            .collect();
        Self { variants }
    }

    pub fn spawn(&self, grid: &Grid, excluded: &HashSet<Cell>, rng: &mut SessionRng) -> Food {
        let r: f64 = rng.random();
        let variant = self.select_variant(r);
        let cell = self.place(grid, excluded, rng);
        Food { cell, variant }
    }

    /// First variant whose cumulative weight exceeds `r`. Rounding that leaves the
    /// table short of 1.0 falls back to the first variant.
    pub fn select_variant(&self, r: f64) -> FoodVariant {
        self.variants
            .iter()
            .find(|(cumulative, _)| *cumulative > r)
            .or_else(|| self.variants.first())
            .map(|(_, variant)| *variant)
            .unwrap_or(FoodVariant {
                kind: FoodKind::Normal,
                score_delta: 0,
            })
    }

    fn place(&self, grid: &Grid, excluded: &HashSet<Cell>, rng: &mut SessionRng) -> Cell {
        let mut candidate = grid.random_cell(rng);
        for _ in 1..MAX_PLACEMENT_ATTEMPTS {
            if !excluded.contains(&candidate) {
                return candidate;
            }
            candidate = grid.random_cell(rng);
        }
        if !excluded.contains(&candidate) {
            return candidate;
        }

        let free: Vec<Cell> = grid.cells().filter(|cell| !excluded.contains(cell)).collect();
        if free.is_empty() {
            log!("No free cell left for food, reusing {}", candidate);
            return candidate;
        }
        log!(
            "Random food placement failed {} times, picking from {} free cells",
            MAX_PLACEMENT_ATTEMPTS,
            free.len()
        );
        free[rng.random_range(0..free.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_table() -> Vec<FoodVariantSettings> {
        vec![
            FoodVariantSettings { kind: FoodKind::Normal, score_delta: 10, weight: 0.7 },
            FoodVariantSettings { kind: FoodKind::Bonus, score_delta: 30, weight: 0.2 },
            FoodVariantSettings { kind: FoodKind::Penalty, score_delta: -10, weight: 0.1 },
        ]
    }

    #[test]
    fn test_select_variant_walks_cumulative_weights() {
        let spawner = FoodSpawner::new(&default_table());
        assert_eq!(spawner.select_variant(0.0).kind, FoodKind::Normal);
        assert_eq!(spawner.select_variant(0.69).kind, FoodKind::Normal);
        assert_eq!(spawner.select_variant(0.7).kind, FoodKind::Bonus);
        assert_eq!(spawner.select_variant(0.89).kind, FoodKind::Bonus);
        assert_eq!(spawner.select_variant(0.95).kind, FoodKind::Penalty);
    }

    #[test]
    fn test_select_variant_falls_back_to_first_when_table_undershoots() {
        let spawner = FoodSpawner::new(&[
            FoodVariantSettings { kind: FoodKind::Bonus, score_delta: 30, weight: 0.5 },
            FoodVariantSettings { kind: FoodKind::Penalty, score_delta: -10, weight: 0.4999 },
        ]);
        assert_eq!(spawner.select_variant(0.99995).kind, FoodKind::Bonus);
    }

    #[test]
    fn test_spawn_avoids_excluded_cells() {
        let spawner = FoodSpawner::new(&default_table());
        let grid = Grid::new(10, 10);
        let excluded: HashSet<Cell> = (0..10).map(|col| Cell::new(0, col)).collect();
        let mut rng = SessionRng::new(3);
        for _ in 0..500 {
            let food = spawner.spawn(&grid, &excluded, &mut rng);
            assert!(grid.in_bounds(food.cell));
            assert!(!excluded.contains(&food.cell));
        }
    }

    #[test]
    fn test_spawn_finds_last_free_cell() {
        let spawner = FoodSpawner::new(&default_table());
        let grid = Grid::new(5, 5);
        let free = Cell::new(4, 2);
        let excluded: HashSet<Cell> = grid.cells().filter(|cell| *cell != free).collect();
        let mut rng = SessionRng::new(11);
        for _ in 0..20 {
            assert_eq!(spawner.spawn(&grid, &excluded, &mut rng).cell, free);
        }
    }

    #[test]
    fn test_spawn_on_full_grid_still_returns_a_cell() {
        let spawner = FoodSpawner::new(&default_table());
        let grid = Grid::new(2, 2);
        let excluded: HashSet<Cell> = grid.cells().collect();
        let mut rng = SessionRng::new(5);
        let food = spawner.spawn(&grid, &excluded, &mut rng);
        assert!(grid.in_bounds(food.cell));
    }

    #[test]
    fn test_variant_frequencies_follow_weights() {
        let spawner = FoodSpawner::new(&default_table());
        let grid = Grid::new(10, 10);
        let mut rng = SessionRng::new(99);
        let excluded = HashSet::new();
        let normal = (0..10_000)
            .filter(|_| spawner.spawn(&grid, &excluded, &mut rng).variant.kind == FoodKind::Normal)
            .count();
        assert!((6_500..7_500).contains(&normal), "normal food count {}", normal);
    }

    #[test]
    fn test_visual_tags() {
        assert_eq!(FoodKind::Normal.visual_tag(), "food");
        assert_eq!(FoodKind::Bonus.visual_tag(), "food-bonus");
        assert_eq!(FoodKind::Penalty.visual_tag(), "food-penalty");
    }
}
