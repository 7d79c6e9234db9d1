use std::time::Duration;

use tokio::time::Instant;

use crate::config::Validate;
use crate::games::SessionRng;
use crate::log;
use super::clock::{ClockTrigger, GameClock};
use super::entity::{MoveOutcome, Snake};
use super::food::{Food, FoodSpawner};
use super::grid::Grid;
use super::high_score::HighScoreStore;
use super::settings::SnakeSessionSettings;
use super::sink::{CountdownStep, GameOverSummary, PresentationSink, SessionState, SoundCue};
use super::types::{DeathReason, Direction, ElapsedTime};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionCommand {
    Start,
    TogglePause,
    Turn(Direction),
    Shutdown,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Countdown {
    Counting(u8),
    Launching,
}

/// Everything that is thrown away when a new round starts.
#[derive(Clone, Debug)]
pub struct Round {
    snake: Snake,
    food: Food,
    score: u32,
    speed: Duration,
    elapsed: ElapsedTime,
}

impl Round {
    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> &Food {
        &self.food
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn speed(&self) -> Duration {
        self.speed
    }

    pub fn elapsed(&self) -> ElapsedTime {
        self.elapsed
    }
}

pub struct SnakeSession<S: PresentationSink, H: HighScoreStore> {
    settings: SnakeSessionSettings,
    grid: Grid,
    spawner: FoodSpawner,
    rng: SessionRng,
    clock: GameClock,
    state: SessionState,
    countdown: Option<Countdown>,
    round: Option<Round>,
    high_score: u32,
    high_score_store: H,
    sink: S,
}

impl<S: PresentationSink, H: HighScoreStore> SnakeSession<S, H> {
    pub fn new(
        settings: SnakeSessionSettings,
        rng: SessionRng,
        high_score_store: H,
        mut sink: S,
    ) -> Result<Self, String> {
        settings
            .validate()
            .map_err(|e| format!("Invalid session settings: {}", e))?;

        let high_score = match high_score_store.load() {
            Ok(stored) => stored.unwrap_or(0),
            Err(e) => {
                log!("Failed to load high score, starting from 0: {}", e);
                0
            }
        };

        let grid = settings.grid();
        log!(
            "Created snake session: grid {}x{}, seed {}, high score {}",
            grid.rows(),
            grid.cols(),
            rng.seed(),
            high_score
        );

        sink.on_high_score_changed(high_score);
        sink.on_state_changed(SessionState::Idle);

        Ok(Self {
            spawner: FoodSpawner::new(&settings.food_variants),
            settings,
            grid,
            rng,
            clock: GameClock::new(),
            state: SessionState::Idle,
            countdown: None,
            round: None,
            high_score,
            high_score_store,
            sink,
        })
    }

    pub fn handle_command(&mut self, command: SessionCommand, now: Instant) {
        match command {
            SessionCommand::Start => {
                self.request_start(now);
            }
            SessionCommand::TogglePause => {
                self.toggle_pause(now);
            }
            SessionCommand::Turn(direction) => {
                self.on_direction_input(direction);
            }
            SessionCommand::Shutdown => {}
        }
    }

    /// Begins the pre-round countdown. Only valid from `Idle` or `GameOver`.
    pub fn request_start(&mut self, now: Instant) -> bool {
        if !matches!(self.state, SessionState::Idle | SessionState::GameOver) {
            return false;
        }

        self.clock.cancel_all();
        self.countdown = Some(Countdown::Counting(self.settings.countdown_from));
        self.clock
            .arm_countdown(self.settings.countdown_interval(), now);
        self.set_state(SessionState::Countdown);
        true
    }

    pub fn toggle_pause(&mut self, now: Instant) -> bool {
        match self.state {
            SessionState::Running => {
                self.clock.disarm();
                self.set_state(SessionState::Paused);
                true
            }
            SessionState::Paused => {
                let speed = self
                    .round
                    .as_ref()
                    .map(|round| round.speed)
                    .unwrap_or_else(|| self.settings.base_speed());
                self.clock.arm(speed, now);
                self.set_state(SessionState::Running);
                true
            }
            _ => false,
        }
    }

    /// Applies a heading change for the next move. Reversals and inputs outside a
    /// running round are ignored.
    pub fn on_direction_input(&mut self, direction: Direction) -> bool {
        if self.state != SessionState::Running {
            return false;
        }
        match self.round.as_mut() {
            Some(round) => round.snake.turn(direction),
            None => false,
        }
    }

    /// Fires every trigger due at or before `now`, oldest first.
    pub fn advance(&mut self, now: Instant) {
        while let Some((trigger, due)) = self.clock.pop_due(now) {
            match trigger {
                ClockTrigger::Movement => self.on_move_tick(due),
                ClockTrigger::Time => self.on_time_tick(),
                ClockTrigger::Countdown => self.on_countdown_tick(due),
            }
        }
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.clock.next_deadline()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    pub fn score(&self) -> u32 {
        self.round.as_ref().map_or(0, |round| round.score)
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn settings(&self) -> &SnakeSessionSettings {
        &self.settings
    }

    pub fn clock(&self) -> &GameClock {
        &self.clock
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn high_score_store(&self) -> &H {
        &self.high_score_store
    }

    fn on_countdown_tick(&mut self, due: Instant) {
        match self.countdown {
            Some(Countdown::Counting(0)) => {
                self.sink.on_countdown(CountdownStep::Go);
                self.sink.play_cue(SoundCue::Go);
                self.countdown = Some(Countdown::Launching);
                self.clock.arm_countdown(self.settings.go_delay(), due);
            }
            Some(Countdown::Counting(remaining)) => {
                self.sink.on_countdown(CountdownStep::Count(remaining));
                self.sink.play_cue(SoundCue::Countdown);
                self.countdown = Some(Countdown::Counting(remaining - 1));
            }
            Some(Countdown::Launching) => {
                self.clock.cancel_countdown();
                self.countdown = None;
                self.begin_round(due);
            }
            None => self.clock.cancel_countdown(),
        }
    }

    fn begin_round(&mut self, at: Instant) {
        let snake = Snake::new(self.settings.origin, self.settings.start_direction);
        let food = self.spawner.spawn(&self.grid, snake.occupied(), &mut self.rng);
        let speed = self.settings.base_speed();

        self.sink.on_score_changed(0);
        self.sink.on_elapsed_time_changed(ElapsedTime::default());
        self.sink.on_high_score_changed(self.high_score);
        self.sink.on_snake_moved(&snake);
        self.sink.on_food_spawned(&food);

        self.round = Some(Round {
            snake,
            food,
            score: 0,
            speed,
            elapsed: ElapsedTime::default(),
        });
        self.clock.arm(speed, at);
        log!("Round started, food at {}", food.cell);
        self.set_state(SessionState::Running);
    }

    fn on_move_tick(&mut self, due: Instant) {
        let outcome = match self.round.as_mut() {
            Some(round) => round.snake.step(&self.grid, &round.food),
            None => return,
        };

        match outcome {
            MoveOutcome::Blocked(reason) => self.end_round(reason),
            MoveOutcome::Ate(food) => self.consume_food(food, due),
            MoveOutcome::Moved => {
                if let Some(round) = &self.round {
                    self.sink.on_snake_moved(&round.snake);
                }
            }
        }
    }

    fn consume_food(&mut self, food: Food, due: Instant) {
        let Some(round) = self.round.as_mut() else {
            return;
        };

        round.score = apply_score_delta(round.score, food.variant.score_delta);
        let score = round.score;

        let previous_speed = round.speed;
        round.speed = previous_speed.min(self.settings.speed_for_score(score));
        if round.speed != previous_speed {
            self.clock.rearm_movement(round.speed, due);
            log!(
                "Speed up at score {}: {}ms -> {}ms",
                score,
                previous_speed.as_millis(),
                round.speed.as_millis()
            );
        }

        round.food = self.spawner.spawn(&self.grid, round.snake.occupied(), &mut self.rng);

        let cue = if food.variant.score_delta < 0 {
            SoundCue::Penalty
        } else {
            SoundCue::Eat
        };
        self.sink.on_food_consumed(&food);
        self.sink.play_cue(cue);
        self.sink.on_snake_moved(&round.snake);
        self.sink.on_food_spawned(&round.food);
        self.sink.on_score_changed(score);

        if score > self.high_score {
            self.raise_high_score(score);
        }
    }

    fn raise_high_score(&mut self, high_score: u32) {
        self.high_score = high_score;
        if let Err(e) = self.high_score_store.save(high_score) {
            log!("Failed to save high score {}: {}", high_score, e);
        }
        self.sink.on_high_score_changed(high_score);
    }

    fn on_time_tick(&mut self) {
        if let Some(round) = self.round.as_mut() {
            round.elapsed.tick();
            self.sink.on_elapsed_time_changed(round.elapsed);
        }
    }

    fn end_round(&mut self, reason: DeathReason) {
        self.clock.cancel_all();
        self.set_state(SessionState::GameOver);

        let (score, elapsed) = self
            .round
            .as_ref()
            .map_or((0, ElapsedTime::default()), |round| (round.score, round.elapsed));
        let summary = GameOverSummary {
            reason,
            score,
            high_score: self.high_score,
            elapsed,
        };
        log!("Game over ({:?}): score {}, time {}", reason, score, elapsed);

        self.sink.play_cue(SoundCue::GameOver);
        self.sink.on_game_over(&summary);
    }

    fn set_state(&mut self, state: SessionState) {
        self.state = state;
        self.sink.on_state_changed(state);
    }

    #[cfg(test)]
    fn force_round(&mut self, snake: Snake, food: Food) {
        if let Some(round) = self.round.as_mut() {
            round.snake = snake;
            round.food = food;
        }
    }

    #[cfg(test)]
    fn force_score(&mut self, score: u32) {
        if let Some(round) = self.round.as_mut() {
            round.score = score;
        }
    }
}

fn apply_score_delta(score: u32, delta: i32) -> u32 {
    (score as i64 + delta as i64).clamp(0, u32::MAX as i64) as u32
}
