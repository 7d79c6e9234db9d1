mod clock;
mod entity;
mod food;
mod grid;
mod high_score;
mod runner;
mod session;
mod settings;
mod sink;
mod types;

pub use clock::{ClockTrigger, GameClock, RepeatingTask, TIME_TICK_PERIOD};
pub use entity::{MoveOutcome, Snake};
pub use food::{Food, FoodKind, FoodSpawner, FoodVariant, FoodVariantSettings};
pub use grid::Grid;
pub use high_score::{HIGH_SCORE_KEY, HighScoreStore, KeyValueHighScoreStore};
pub use runner::run_session;
pub use session::{Round, SessionCommand, SnakeSession};
pub use settings::SnakeSessionSettings;
pub use sink::{CountdownStep, GameOverSummary, PresentationSink, SessionState, SoundCue};
pub use types::{Cell, DeathReason, Direction, ElapsedTime};
