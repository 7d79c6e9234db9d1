use super::entity::Snake;
use super::food::Food;
use super::types::{DeathReason, ElapsedTime};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Countdown,
    Running,
    Paused,
    GameOver,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CountdownStep {
    Count(u8),
    Go,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SoundCue {
    Countdown,
    Go,
    Eat,
    Penalty,
    GameOver,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameOverSummary {
    pub reason: DeathReason,
    pub score: u32,
    pub high_score: u32,
    pub elapsed: ElapsedTime,
}

/// Receives every state change a renderer or audio layer cares about.
/// All methods default to doing nothing.
pub trait PresentationSink {
    fn on_state_changed(&mut self, _state: SessionState) {}

    fn on_countdown(&mut self, _step: CountdownStep) {}

    /// Called after every committed move, including the initial placement of a round.
    fn on_snake_moved(&mut self, _snake: &Snake) {}

    fn on_food_spawned(&mut self, _food: &Food) {}

    fn on_food_consumed(&mut self, _food: &Food) {}

    fn on_score_changed(&mut self, _score: u32) {}

    fn on_high_score_changed(&mut self, _high_score: u32) {}

    fn on_elapsed_time_changed(&mut self, _elapsed: ElapsedTime) {}

    fn on_game_over(&mut self, _summary: &GameOverSummary) {}

    fn play_cue(&mut self, _cue: SoundCue) {}
}
