use std::time::Instant;

use common::games::snake::{
    CountdownStep, ElapsedTime, Food, GameOverSummary, PresentationSink, SessionState, Snake,
    SoundCue,
};
use common::log;

use crate::state::SharedState;

/// Mirrors session notifications into the shared view state the window reads.
pub struct SharedStateSink {
    shared_state: SharedState,
}

impl SharedStateSink {
    pub fn new(shared_state: SharedState) -> Self {
        Self { shared_state }
    }
}

impl PresentationSink for SharedStateSink {
    fn on_state_changed(&mut self, state: SessionState) {
        self.shared_state.update(|view| {
            view.session_state = state;
            match state {
                SessionState::Countdown => {
                    view.game_over = None;
                }
                SessionState::Running => {
                    view.countdown = None;
                }
                _ => {}
            }
        });
    }

    fn on_countdown(&mut self, step: CountdownStep) {
        self.shared_state.update(|view| view.countdown = Some(step));
    }

    fn on_snake_moved(&mut self, snake: &Snake) {
        self.shared_state.update(|view| {
            view.snake.clear();
            view.snake.extend(snake.cells().copied());
            view.heading = snake.direction();
        });
    }

    fn on_food_spawned(&mut self, food: &Food) {
        let food = *food;
        self.shared_state.update(|view| view.food = Some(food));
    }

    fn on_food_consumed(&mut self, _food: &Food) {
        self.shared_state.update(|view| view.food = None);
    }

    fn on_score_changed(&mut self, score: u32) {
        self.shared_state.update(|view| {
            if view.score != score {
                view.score_changed_at = Some(Instant::now());
            }
            view.score = score;
        });
    }

    fn on_high_score_changed(&mut self, high_score: u32) {
        self.shared_state.update(|view| view.high_score = high_score);
    }

    fn on_elapsed_time_changed(&mut self, elapsed: ElapsedTime) {
        self.shared_state.update(|view| view.elapsed = elapsed);
    }

    fn on_game_over(&mut self, summary: &GameOverSummary) {
        let summary = *summary;
        self.shared_state.update(|view| view.game_over = Some(summary));
    }

    fn play_cue(&mut self, cue: SoundCue) {
        log!("Sound cue: {:?}", cue);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::games::snake::{Cell, DeathReason, Direction, FoodKind, FoodVariant};

    fn sink() -> (SharedStateSink, SharedState) {
        let shared_state = SharedState::new(12, 16);
        (SharedStateSink::new(shared_state.clone()), shared_state)
    }

    #[test]
    fn test_snake_moved_copies_cells_head_first() {
        let (mut sink, shared_state) = sink();
        let snake = Snake::with_body([Cell::new(2, 3), Cell::new(1, 3)], Direction::Down);
        sink.on_snake_moved(&snake);

        let view = shared_state.snapshot();
        assert_eq!(view.snake, vec![Cell::new(2, 3), Cell::new(1, 3)]);
        assert_eq!(view.heading, Direction::Down);
    }

    #[test]
    fn test_score_change_starts_highlight() {
        let (mut sink, shared_state) = sink();
        sink.on_score_changed(0);
        assert!(shared_state.snapshot().score_changed_at.is_none());

        sink.on_score_changed(10);
        let view = shared_state.snapshot();
        assert_eq!(view.score, 10);
        assert!(view.score_changed_at.is_some());
    }

    #[test]
    fn test_food_spawn_and_consume() {
        let (mut sink, shared_state) = sink();
        let food = Food {
            cell: Cell::new(4, 4),
            variant: FoodVariant { kind: FoodKind::Bonus, score_delta: 30 },
        };
        sink.on_food_spawned(&food);
        assert_eq!(shared_state.snapshot().food, Some(food));

        sink.on_food_consumed(&food);
        assert_eq!(shared_state.snapshot().food, None);
    }

    #[test]
    fn test_new_countdown_clears_previous_game_over() {
        let (mut sink, shared_state) = sink();
        sink.on_game_over(&GameOverSummary {
            reason: DeathReason::WallCollision,
            score: 20,
            high_score: 20,
            elapsed: ElapsedTime { minutes: 0, seconds: 7 },
        });
        sink.on_state_changed(SessionState::GameOver);
        assert!(shared_state.snapshot().game_over.is_some());

        sink.on_state_changed(SessionState::Countdown);
        sink.on_countdown(CountdownStep::Count(3));
        let view = shared_state.snapshot();
        assert!(view.game_over.is_none());
        assert_eq!(view.countdown, Some(CountdownStep::Count(3)));

        sink.on_state_changed(SessionState::Running);
        assert!(shared_state.snapshot().countdown.is_none());
    }
}
