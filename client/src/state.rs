use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

use common::games::snake::{
    Cell, CountdownStep, Direction, ElapsedTime, Food, GameOverSummary, SessionState,
};

/// Snapshot of everything the window draws, written by the session thread.
#[derive(Clone, Debug)]
pub struct ViewState {
    pub session_state: SessionState,
    pub rows: i32,
    pub cols: i32,
    pub snake: Vec<Cell>,
    pub heading: Direction,
    pub food: Option<Food>,
    pub score: u32,
    pub score_changed_at: Option<Instant>,
    pub high_score: u32,
    pub elapsed: ElapsedTime,
    pub countdown: Option<CountdownStep>,
    pub game_over: Option<GameOverSummary>,
}

impl ViewState {
    pub fn new(rows: i32, cols: i32) -> Self {
        Self {
            session_state: SessionState::Idle,
            rows,
            cols,
            snake: Vec::new(),
            heading: Direction::Down,
            food: None,
            score: 0,
            score_changed_at: None,
            high_score: 0,
            elapsed: ElapsedTime::default(),
            countdown: None,
            game_over: None,
        }
    }
}

#[derive(Clone)]
pub struct SharedState {
    view: Arc<Mutex<ViewState>>,
}

impl SharedState {
    pub fn new(rows: i32, cols: i32) -> Self {
        Self {
            view: Arc::new(Mutex::new(ViewState::new(rows, cols))),
        }
    }

    pub fn snapshot(&self) -> ViewState {
        self.lock().clone()
    }

    pub fn update(&self, apply: impl FnOnce(&mut ViewState)) {
        apply(&mut self.lock());
    }

    // Poisoned only if the session thread panicked; keep drawing the last snapshot.
    fn lock(&self) -> MutexGuard<'_, ViewState> {
        self.view.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
