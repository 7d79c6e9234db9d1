use tokio::sync::mpsc;
use tokio::time::{Instant, sleep_until};

use crate::log;
use super::high_score::HighScoreStore;
use super::session::{SessionCommand, SnakeSession};
use super::sink::PresentationSink;

/// Drives a session from real time and a command channel until the channel closes
/// or `Shutdown` arrives. Every callback runs on this task, one at a time.
pub async fn run_session<S, H>(
    mut session: SnakeSession<S, H>,
    mut command_rx: mpsc::UnboundedReceiver<SessionCommand>,
) -> SnakeSession<S, H>
where
    S: PresentationSink,
    H: HighScoreStore,
{
    loop {
        let deadline = session.next_deadline();

        tokio::select! {
            _ = wait_until(deadline) => {
                session.advance(Instant::now());
            }
            command = command_rx.recv() => {
                match command {
                    None | Some(SessionCommand::Shutdown) => break,
                    Some(command) => {
                        let now = Instant::now();
                        session.advance(now);
                        session.handle_command(command, now);
                    }
                }
            }
        }
    }

    log!("Session loop stopped in state {:?}", session.state());
    session
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use crate::games::SessionRng;
    use crate::games::snake::{
        Direction, ElapsedTime, GameOverSummary, SessionState, SnakeSessionSettings,
    };

    #[derive(Default)]
    struct NoHighScore;

    impl HighScoreStore for NoHighScore {
        fn load(&self) -> Result<Option<u32>, String> {
            Ok(None)
        }

        fn save(&self, _high_score: u32) -> Result<(), String> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct CountingSink {
        moves: u32,
        game_over: Option<GameOverSummary>,
    }

    impl PresentationSink for CountingSink {
        fn on_snake_moved(&mut self, _snake: &crate::games::snake::Snake) {
            self.moves += 1;
        }

        fn on_game_over(&mut self, summary: &GameOverSummary) {
            self.game_over = Some(*summary);
        }
    }

    fn create_session() -> SnakeSession<CountingSink, NoHighScore> {
        let settings = SnakeSessionSettings {
            board_width: 500,
            board_height: 500,
            score_step: 1_000_000,
            ..SnakeSessionSettings::default()
        };
        SnakeSession::new(settings, SessionRng::new(42), NoHighScore, CountingSink::default())
            .unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_loop_stops_when_channel_closes() {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        drop(command_tx);
        let session = run_session(create_session(), command_rx).await;
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_loop_runs_round_until_wall() {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(run_session(create_session(), command_rx));

        command_tx.send(SessionCommand::Start).unwrap();
        tokio::time::sleep(Duration::from_millis(3700 + 9 * 400 + 50)).await;
        command_tx.send(SessionCommand::Shutdown).unwrap();

        let session = handle.await.unwrap();
        assert_eq!(session.state(), SessionState::GameOver);
        let summary = session.sink().game_over.unwrap();
        assert_eq!(summary.reason, crate::games::snake::DeathReason::WallCollision);
        assert_eq!(summary.elapsed, ElapsedTime { minutes: 0, seconds: 3 });
        assert_eq!(session.sink().moves, 9);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_command_stops_movement() {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(run_session(create_session(), command_rx));

        command_tx.send(SessionCommand::Start).unwrap();
        tokio::time::sleep(Duration::from_millis(3700 + 450)).await;
        command_tx.send(SessionCommand::Turn(Direction::Right)).unwrap();
        command_tx.send(SessionCommand::TogglePause).unwrap();
        tokio::time::sleep(Duration::from_secs(60)).await;
        command_tx.send(SessionCommand::Shutdown).unwrap();

        let session = handle.await.unwrap();
        assert_eq!(session.state(), SessionState::Paused);
        let round = session.round().unwrap();
        assert_eq!(round.snake().direction(), Direction::Right);
        assert_eq!(round.elapsed(), ElapsedTime::default());
    }
}
