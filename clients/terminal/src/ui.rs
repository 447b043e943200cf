use crate::app::{App, AppScreen, MIN_GAME_HEIGHT, MIN_GAME_WIDTH};
use pong_core::{Bounds, GameMode, LoopState, PaddleView, Phase, Side, SoundCue, View};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::Line,
    widgets::{Block, BorderType, Clear, List, ListItem, Paragraph, Widget},
};

/// Split the full terminal area into title and body
fn screen_chunks(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5)])
        .split(area);
    (chunks[0], chunks[1])
}

/// Info bar, field and controls within the body
fn game_chunks(body: Rect) -> [Rect; 3] {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Score
            Constraint::Min(10),   // Field
            Constraint::Length(3), // Controls
        ])
        .split(body);
    [chunks[0], chunks[1], chunks[2]]
}

fn field_block() -> Block<'static> {
    Block::bordered()
        .border_type(BorderType::Rounded)
        .title("Field")
        .title_alignment(Alignment::Center)
}

/// Cells available to the playfield for a given terminal area
pub fn field_inner(area: Rect) -> Rect {
    let (_, body) = screen_chunks(area);
    field_block().inner(game_chunks(body)[1])
}

/// Cell span covered by a paddle (inclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRect {
    pub left: usize,
    pub right: usize,
    pub top: usize,
    pub bottom: usize,
}

/// Maps playfield coordinates onto a grid of terminal cells
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    cols: usize,
    rows: usize,
    bounds: Bounds,
}

impl Viewport {
    pub fn new(cols: usize, rows: usize, bounds: Bounds) -> Self {
        Self { cols, rows, bounds }
    }

    fn scale(value: f32, extent: f32, cells: usize) -> usize {
        if cells == 0 || extent <= 0.0 {
            return 0;
        }
        let cell = (value / extent * cells as f32).floor();
        (cell.max(0.0) as usize).min(cells - 1)
    }

    pub fn col(&self, x: f32) -> usize {
        Self::scale(x, self.bounds.width, self.cols)
    }

    pub fn row(&self, y: f32) -> usize {
        Self::scale(y, self.bounds.height, self.rows)
    }

    /// Paddles always cover at least one cell in each direction
    pub fn paddle_cells(&self, paddle: &PaddleView) -> CellRect {
        const EDGE: f32 = 1e-3;
        let left = self.col(paddle.x);
        let top = self.row(paddle.y);
        CellRect {
            left,
            right: self.col(paddle.x + paddle.width - EDGE).max(left),
            top,
            bottom: self.row(paddle.y + paddle.height - EDGE).max(top),
        }
    }
}

/// Draw the playfield as text lines
fn field_lines(view: &View, cols: usize, rows: usize) -> Vec<Line<'static>> {
    let viewport = Viewport::new(cols, rows, view.bounds);
    let paddles = [
        viewport.paddle_cells(&view.left),
        viewport.paddle_cells(&view.right),
    ];
    let ball = (viewport.col(view.ball_x), viewport.row(view.ball_y));
    let center_x = cols / 2;

    (0..rows)
        .map(|y| {
            let mut line = vec![' '; cols];
            if center_x < cols {
                line[center_x] = '┊';
            }
            for rect in &paddles {
                if (rect.top..=rect.bottom).contains(&y) {
                    for cell in &mut line[rect.left..=rect.right.min(cols - 1)] {
                        *cell = '█';
                    }
                }
            }
            if y == ball.1 {
                line[ball.0] = '●';
            }
            Line::from(line.into_iter().collect::<String>())
        })
        .collect()
}

/// Banner shown over the field when the rally is not running
fn overlay_text(view: &View) -> Option<String> {
    match view.state {
        LoopState::Running => None,
        LoopState::Idle => Some("SPACE: start".to_string()),
        LoopState::Paused => Some("Paused\n\nSPACE: resume   ESC: menu".to_string()),
        LoopState::Ended => {
            let headline = match (view.phase, view.mode) {
                (Phase::LevelCleared, _) => format!("Level cleared! Next: level {}", view.level),
                (Phase::GameOver(Side::Right), GameMode::SinglePlayer) => {
                    format!("Game over at level {}", view.level)
                }
                (Phase::GameOver(Side::Left), GameMode::SinglePlayer) => "You win!".to_string(),
                (Phase::GameOver(Side::Left), GameMode::TwoPlayer) => {
                    "Left player wins!".to_string()
                }
                (Phase::GameOver(Side::Right), GameMode::TwoPlayer) => {
                    "Right player wins!".to_string()
                }
                _ => "Match over".to_string(),
            };
            let action = if view.phase == Phase::LevelCleared {
                "ENTER: continue"
            } else {
                "ENTER: play again"
            };
            Some(format!(
                "{headline}\n{} - {}\n\n{action}   R: reset",
                view.score.left, view.score.right
            ))
        }
    }
}

fn cue_label(cue: SoundCue) -> &'static str {
    match cue {
        SoundCue::WallHit => "wall",
        SoundCue::PaddleHit => "paddle",
        SoundCue::Score => "score",
        SoundCue::Win => "win",
        SoundCue::Lose => "lose",
    }
}

fn controls_text(mode: GameMode) -> &'static str {
    match mode {
        GameMode::SinglePlayer => {
            "W/S or ↑/↓: move  SPACE: start/pause  ENTER: again  R: reset  ESC: menu  Q: quit"
        }
        GameMode::TwoPlayer => {
            "P1: W/S  P2: ↑/↓  SPACE: start/pause  ENTER: again  R: reset  ESC: menu  Q: quit"
        }
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (title_area, body) = screen_chunks(area);

        let title = Paragraph::new("🏓 Pong Terminal Client 🏓")
            .style(Style::default().fg(Color::Cyan))
            .alignment(Alignment::Center)
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .title("Pong")
                    .title_alignment(Alignment::Center),
            );
        title.render(title_area, buf);

        match self.screen {
            AppScreen::Start => self.render_start_screen(body, buf),
            AppScreen::Game => self.render_game_screen(body, buf),
        }
    }
}

impl App {
    fn render_start_screen(&self, area: Rect, buf: &mut Buffer) {
        let items: Vec<ListItem> = self
            .start_menu_items()
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let style = if i == self.menu_state.start_selected {
                    Style::default().fg(Color::Yellow).bg(Color::DarkGray)
                } else {
                    Style::default().fg(Color::White)
                };
                ListItem::new(*item).style(style)
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .title("Main Menu")
                    .title_alignment(Alignment::Center),
            )
            .highlight_symbol("► ");

        list.render(area, buf);
    }

    fn render_game_screen(&self, area: Rect, buf: &mut Buffer) {
        if self.ui_paused {
            let message = format!(
                "Terminal too small!\n\nMinimum required: {}×{}\nCurrent size: {}×{}\n\nPlease resize your terminal to continue playing.",
                MIN_GAME_WIDTH, MIN_GAME_HEIGHT, self.terminal_size.0, self.terminal_size.1
            );

            let resize_widget = Paragraph::new(message)
                .style(Style::default().fg(Color::Red))
                .alignment(Alignment::Center)
                .block(
                    Block::bordered()
                        .border_type(BorderType::Rounded)
                        .title("⚠ Resize Required ⚠")
                        .title_alignment(Alignment::Center),
                );
            resize_widget.render(area, buf);
            return;
        }

        let view = &self.view;
        let [info_area, field_area, controls_area] = game_chunks(area);

        let mode = match view.mode {
            GameMode::SinglePlayer => "1P",
            GameMode::TwoPlayer => "2P",
        };
        let mut info = format!(
            "Score: {} - {}    Level: {}    Mode: {}    Status: {}",
            view.score.left,
            view.score.right,
            view.level,
            mode,
            self.game.status_string()
        );
        if let Some((cue, note)) = self.last_cue {
            info.push_str(&format!("    ♪ {} {}", cue_label(cue), note + 1));
        }

        Paragraph::new(info)
            .style(Style::default().fg(Color::Yellow))
            .alignment(Alignment::Center)
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .title("Game Info")
                    .title_alignment(Alignment::Center),
            )
            .render(info_area, buf);

        self.render_field(field_area, buf, view);

        let controls = format!("{}   [{}]", controls_text(view.mode), self.input_mode());
        Paragraph::new(controls)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .title("Controls")
                    .title_alignment(Alignment::Center),
            )
            .render(controls_area, buf);
    }

    fn render_field(&self, area: Rect, buf: &mut Buffer, view: &View) {
        let block = field_block();
        let inner = block.inner(area);
        let cols = inner.width as usize;
        let rows = inner.height as usize;

        let lines = if cols == 0 || rows == 0 {
            Vec::new()
        } else {
            field_lines(view, cols, rows)
        };

        Paragraph::new(lines)
            .style(Style::default().fg(Color::White))
            .block(block)
            .render(area, buf);

        if let Some(text) = overlay_text(view) {
            let height = text.lines().count() as u16 + 2;
            let width = text
                .lines()
                .map(|l| l.chars().count())
                .max()
                .unwrap_or(0) as u16
                + 4;
            let popup = centered(inner, width, height);
            Clear.render(popup, buf);
            Paragraph::new(text)
                .style(Style::default().fg(Color::Yellow))
                .alignment(Alignment::Center)
                .block(Block::bordered().border_type(BorderType::Rounded))
                .render(popup, buf);
        }
    }
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
