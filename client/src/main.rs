mod config;
mod sink;
mod state;
mod ui;

use clap::Parser;
use common::config::FileContentConfigProvider;
use common::games::SessionRng;
use common::games::snake::{KeyValueHighScoreStore, SnakeSession, run_session};
use common::log;
use common::logger::init_logger;
use eframe::egui;
use tokio::sync::mpsc;

use sink::SharedStateSink;
use state::SharedState;
use ui::SnakeApp;

#[derive(Parser)]
#[command(name = "snake_arcade_client")]
struct Args {
    #[arg(long)]
    config: Option<String>,
    #[arg(long)]
    use_log_prefix: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let prefix = if args.use_log_prefix {
        Some("Client".to_string())
    } else {
        None
    };
    init_logger(prefix);

    let config = config::get_config_manager(args.config).get_config_or_default();
    log!("High score file: {}", config.high_score_path);

    let grid = config.session.grid();
    let shared_state = SharedState::new(grid.rows(), grid.cols());
    let high_score_store =
        KeyValueHighScoreStore::new(FileContentConfigProvider::new(config.high_score_path.clone()));

    let session = SnakeSession::new(
        config.session,
        SessionRng::from_random(),
        high_score_store,
        SharedStateSink::new(shared_state.clone()),
    )?;

    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let runtime = tokio::runtime::Runtime::new()?;
    let session_thread = std::thread::spawn(move || {
        runtime.block_on(async {
            let session = run_session(session, command_rx).await;
            log!("Final high score: {}", session.high_score());
        });
    });

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(SnakeApp::board_size(grid.rows(), grid.cols()) + egui::vec2(32.0, 72.0))
            .with_title("Snake"),
        ..Default::default()
    };

    let window_result = eframe::run_native(
        "Snake Arcade",
        options,
        Box::new(move |_cc| Ok(Box::new(SnakeApp::new(shared_state, command_tx)))),
    );

    // The app and its sender are dropped by now, which closes the channel.
    if session_thread.join().is_err() {
        log!("Session thread panicked");
    }

    window_result?;
    Ok(())
}
