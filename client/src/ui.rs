use std::time::Duration;

use common::games::snake::{
    Cell, CountdownStep, DeathReason, Direction, FoodKind, SessionCommand, SessionState,
};
use eframe::egui;
use tokio::sync::mpsc;

use crate::state::{SharedState, ViewState};

const CELL_PIXELS: f32 = 32.0;
const SCORE_FLASH: Duration = Duration::from_millis(400);
const REPAINT_INTERVAL: Duration = Duration::from_millis(16);

const BOARD_COLOR: egui::Color32 = egui::Color32::from_rgb(0x1E, 0x24, 0x1E);
const GRID_LINE_COLOR: egui::Color32 = egui::Color32::from_rgb(0x2A, 0x32, 0x2A);
const HEAD_COLOR: egui::Color32 = egui::Color32::from_rgb(0x3C, 0xD0, 0x5A);
const BODY_COLOR: egui::Color32 = egui::Color32::from_rgb(0x24, 0x8C, 0x3A);
const SCORE_FLASH_COLOR: egui::Color32 = egui::Color32::from_rgb(0xFF, 0xD7, 0x40);

fn food_color(kind: FoodKind) -> egui::Color32 {
    match kind.visual_tag() {
        "food-bonus" => egui::Color32::from_rgb(0xFF, 0xC1, 0x07),
        "food-penalty" => egui::Color32::from_rgb(0x9C, 0x27, 0xB0),
        _ => egui::Color32::from_rgb(0xE5, 0x39, 0x35),
    }
}

pub struct SnakeApp {
    shared_state: SharedState,
    command_tx: mpsc::UnboundedSender<SessionCommand>,
}

impl SnakeApp {
    pub fn new(shared_state: SharedState, command_tx: mpsc::UnboundedSender<SessionCommand>) -> Self {
        Self {
            shared_state,
            command_tx,
        }
    }

    pub fn board_size(rows: i32, cols: i32) -> egui::Vec2 {
        egui::Vec2::new(cols as f32 * CELL_PIXELS, rows as f32 * CELL_PIXELS)
    }

    fn send(&self, command: SessionCommand) {
        let _ = self.command_tx.send(command);
    }

    fn handle_input(&self, ctx: &egui::Context) {
        let (direction, pause, start) = ctx.input(|i| {
            let direction = if i.key_pressed(egui::Key::ArrowUp) || i.key_pressed(egui::Key::W) {
                Some(Direction::Up)
            } else if i.key_pressed(egui::Key::ArrowDown) || i.key_pressed(egui::Key::S) {
                Some(Direction::Down)
            } else if i.key_pressed(egui::Key::ArrowLeft) || i.key_pressed(egui::Key::A) {
                Some(Direction::Left)
            } else if i.key_pressed(egui::Key::ArrowRight) || i.key_pressed(egui::Key::D) {
                Some(Direction::Right)
            } else {
                None
            };
            let pause = i.key_pressed(egui::Key::Space) || i.key_pressed(egui::Key::P);
            let start = i.key_pressed(egui::Key::Enter);
            (direction, pause, start)
        });

        if let Some(direction) = direction {
            self.send(SessionCommand::Turn(direction));
        }
        if pause {
            self.send(SessionCommand::TogglePause);
        }
        if start {
            self.send(SessionCommand::Start);
        }
    }

    fn render_header(&self, ui: &mut egui::Ui, view: &ViewState) {
        let flashing = view
            .score_changed_at
            .is_some_and(|changed_at| changed_at.elapsed() < SCORE_FLASH);

        ui.horizontal(|ui| {
            let score = egui::RichText::new(format!("Score: {}", view.score)).size(20.0);
            let score = if flashing {
                score.color(SCORE_FLASH_COLOR).strong()
            } else {
                score
            };
            ui.label(score);
            ui.separator();
            ui.label(egui::RichText::new(format!("Best: {}", view.high_score)).size(20.0));
            ui.separator();
            ui.label(egui::RichText::new(format!("Time: {}", view.elapsed)).size(20.0));
        });
    }

    fn render_board(&self, ui: &mut egui::Ui, view: &ViewState) -> egui::Rect {
        let (response, painter) =
            ui.allocate_painter(Self::board_size(view.rows, view.cols), egui::Sense::hover());
        let rect = response.rect;
        painter.rect_filled(rect, 0.0, BOARD_COLOR);

        let stroke = egui::Stroke::new(1.0, GRID_LINE_COLOR);
        for col in 1..view.cols {
            let x = rect.min.x + col as f32 * CELL_PIXELS;
            painter.line_segment([egui::pos2(x, rect.min.y), egui::pos2(x, rect.max.y)], stroke);
        }
        for row in 1..view.rows {
            let y = rect.min.y + row as f32 * CELL_PIXELS;
            painter.line_segment([egui::pos2(rect.min.x, y), egui::pos2(rect.max.x, y)], stroke);
        }

        if let Some(food) = &view.food {
            let center = cell_rect(rect.min, food.cell).center();
            painter.circle_filled(center, CELL_PIXELS * 0.35, food_color(food.variant.kind));
        }

        for (i, cell) in view.snake.iter().enumerate().rev() {
            let color = if i == 0 { HEAD_COLOR } else { BODY_COLOR };
            painter.rect_filled(cell_rect(rect.min, *cell).shrink(1.5), 4.0, color);
        }
        if let Some(head) = view.snake.first() {
            let head_rect = cell_rect(rect.min, *head);
            let (dr, dc) = view.heading.delta();
            let eye = head_rect.center() + egui::vec2(dc as f32, dr as f32) * CELL_PIXELS * 0.25;
            painter.circle_filled(eye, CELL_PIXELS * 0.1, egui::Color32::BLACK);
        }

        rect
    }

    fn render_overlay(&self, ui: &egui::Ui, board: egui::Rect, view: &ViewState) {
        let text = match (view.session_state, view.countdown) {
            (SessionState::Countdown, Some(CountdownStep::Count(n))) => n.to_string(),
            (SessionState::Countdown, Some(CountdownStep::Go)) => "Go!".to_string(),
            (SessionState::Paused, _) => "Paused".to_string(),
            _ => return,
        };

        let painter = ui.painter_at(board);
        painter.rect_filled(board, 0.0, egui::Color32::from_black_alpha(120));
        painter.text(
            board.center(),
            egui::Align2::CENTER_CENTER,
            text,
            egui::FontId::proportional(64.0),
            egui::Color32::WHITE,
        );
    }

    fn render_start_modal(&self, ctx: &egui::Context) {
        egui::Window::new("Snake")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.label("Arrows or W/A/S/D to steer, Space or P to pause.");
                    ui.add_space(10.0);
                    if ui.button("Start (Enter)").clicked() {
                        self.send(SessionCommand::Start);
                    }
                });
            });
    }

    fn render_game_over_modal(&self, ctx: &egui::Context, view: &ViewState) {
        egui::Window::new("Game Over")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    if let Some(summary) = &view.game_over {
                        let reason = match summary.reason {
                            DeathReason::WallCollision => "You hit the wall.",
                            DeathReason::SelfCollision => "You bit yourself.",
                        };
                        ui.label(reason);
                        ui.add_space(6.0);
                        ui.label(format!("Score: {}", summary.score));
                        ui.label(format!("Best: {}", summary.high_score));
                        ui.label(format!("Time: {}", summary.elapsed));
                        ui.add_space(10.0);
                    }
                    if ui.button("Play Again (Enter)").clicked() {
                        self.send(SessionCommand::Start);
                    }
                });
            });
    }
}

fn cell_rect(origin: egui::Pos2, cell: Cell) -> egui::Rect {
    let min = origin + egui::vec2(cell.col as f32 * CELL_PIXELS, cell.row as f32 * CELL_PIXELS);
    egui::Rect::from_min_size(min, egui::vec2(CELL_PIXELS, CELL_PIXELS))
}

impl eframe::App for SnakeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if ctx.input(|i| i.viewport().close_requested()) {
            self.send(SessionCommand::Shutdown);
        }

        self.handle_input(ctx);
        let view = self.shared_state.snapshot();

        egui::CentralPanel::default().show(ctx, |ui| {
            self.render_header(ui, &view);
            ui.separator();
            let board = self.render_board(ui, &view);
            self.render_overlay(ui, board, &view);
        });

        match view.session_state {
            SessionState::Idle => self.render_start_modal(ctx),
            SessionState::GameOver => self.render_game_over_modal(ctx, &view),
            _ => {}
        }

        ctx.request_repaint_after(REPAINT_INTERVAL);
    }
}
