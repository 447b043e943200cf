use crate::event::{AppEvent, Event, EventHandler};
use crate::settings::Settings;
use crate::ui;
use pong_core::{
    Command, Config, Event as GameEvent, Game, GameMode, Intent, SoundCue, View,
};
use ratatui::{
    crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    layout::Rect,
    DefaultTerminal,
};
use std::io::stdout;
use std::time::Instant;

/// Game key mapping for cleaner input handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GameKey {
    Player1Up,
    Player1Down,
    Player2Up,
    Player2Down,
    Toggle,
    Reset,
    PlayAgain,
}

/// Arrow keys steer the human paddle in single-player and the right paddle
/// in two-player.
fn map_keycode_to_game_key(code: KeyCode, mode: GameMode) -> Option<GameKey> {
    match (code, mode) {
        (KeyCode::Char('w') | KeyCode::Char('W'), _) => Some(GameKey::Player1Up),
        (KeyCode::Char('s') | KeyCode::Char('S'), _) => Some(GameKey::Player1Down),
        (KeyCode::Up, GameMode::SinglePlayer) => Some(GameKey::Player1Up),
        (KeyCode::Down, GameMode::SinglePlayer) => Some(GameKey::Player1Down),
        (KeyCode::Up, GameMode::TwoPlayer) => Some(GameKey::Player2Up),
        (KeyCode::Down, GameMode::TwoPlayer) => Some(GameKey::Player2Down),
        (KeyCode::Char(' '), _) => Some(GameKey::Toggle),
        (KeyCode::Char('r') | KeyCode::Char('R'), _) => Some(GameKey::Reset),
        (KeyCode::Enter, _) => Some(GameKey::PlayAgain),
        _ => None,
    }
}

/// Common trait for player input handling
trait PlayerInput {
    fn handle_up(&mut self, pressed: bool);
    fn handle_down(&mut self, pressed: bool);
    fn intent(&self) -> Intent;
    fn reset(&mut self);
    fn update(&mut self) {} // Default no-op, overridden by tap input
}

/// Key hold tracking for terminals that report releases
#[derive(Default)]
struct HeldInput {
    up_held: bool,
    down_held: bool,
}

impl PlayerInput for HeldInput {
    fn handle_up(&mut self, pressed: bool) {
        self.up_held = pressed;
    }

    fn handle_down(&mut self, pressed: bool) {
        self.down_held = pressed;
    }

    fn intent(&self) -> Intent {
        match (self.up_held, self.down_held) {
            (true, false) => Intent::Up,
            (false, true) => Intent::Down,
            _ => Intent::Hold,
        }
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Ticks a single key press keeps the paddle moving
const TAP_TICKS: u8 = 8;

/// Fallback for terminals without release events: each press (including
/// auto-repeat) drives the paddle for a short burst.
#[derive(Default)]
struct TapInput {
    direction: Intent,
    ticks_left: u8,
}

impl PlayerInput for TapInput {
    fn handle_up(&mut self, pressed: bool) {
        if pressed {
            self.direction = Intent::Up;
            self.ticks_left = TAP_TICKS;
        }
    }

    fn handle_down(&mut self, pressed: bool) {
        if pressed {
            self.direction = Intent::Down;
            self.ticks_left = TAP_TICKS;
        }
    }

    fn intent(&self) -> Intent {
        if self.ticks_left > 0 {
            self.direction
        } else {
            Intent::Hold
        }
    }

    fn reset(&mut self) {
        *self = Self::default();
    }

    fn update(&mut self) {
        self.ticks_left = self.ticks_left.saturating_sub(1);
    }
}

/// Input system that adapts to terminal capabilities
struct InputSystem {
    p1: Box<dyn PlayerInput>,
    p2: Box<dyn PlayerInput>,
    is_enhanced: bool,
}

impl InputSystem {
    fn new(is_enhanced: bool) -> Self {
        if is_enhanced {
            Self {
                p1: Box::new(HeldInput::default()),
                p2: Box::new(HeldInput::default()),
                is_enhanced: true,
            }
        } else {
            Self {
                p1: Box::new(TapInput::default()),
                p2: Box::new(TapInput::default()),
                is_enhanced: false,
            }
        }
    }

    fn mode_description(&self) -> &'static str {
        if self.is_enhanced {
            "hold keys"
        } else {
            "tap keys"
        }
    }

    fn intents(&self) -> (Intent, Intent) {
        (self.p1.intent(), self.p2.intent())
    }

    fn reset(&mut self) {
        self.p1.reset();
        self.p2.reset();
    }

    fn update(&mut self) {
        self.p1.update();
        self.p2.update();
    }

    /// Track paddle keys; return lifecycle keys on press
    fn handle_key_event(&mut self, event: KeyEvent, mode: GameMode) -> Option<GameKey> {
        let game_key = map_keycode_to_game_key(event.code, mode)?;
        let pressed = event.kind != KeyEventKind::Release;

        match game_key {
            GameKey::Player1Up => self.p1.handle_up(pressed),
            GameKey::Player1Down => self.p1.handle_down(pressed),
            GameKey::Player2Up => self.p2.handle_up(pressed),
            GameKey::Player2Down => self.p2.handle_down(pressed),
            GameKey::Toggle | GameKey::Reset | GameKey::PlayAgain => {
                if event.kind == KeyEventKind::Press {
                    return Some(game_key);
                }
            }
        }
        None
    }
}

/// Application screens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppScreen {
    Start,
    Game,
}

/// Menu states for navigation
#[derive(Debug, Default)]
pub struct MenuState {
    pub start_selected: usize,
}

const START_MENU: [&str; 3] = ["Single Player", "Two Player", "Quit"];

/// Minimum terminal size for the playfield
pub const MIN_GAME_WIDTH: u16 = 60;
pub const MIN_GAME_HEIGHT: u16 = 20;

/// Terminal cells are roughly twice as tall as they are wide
const CELL_ASPECT: f32 = 2.0;

/// Playfield bounds matching the on-screen field shape. Width stays at the
/// configured width; height follows the field's aspect ratio.
pub fn bounds_for_field(cols: u16, rows: u16, config: &Config) -> (f32, f32) {
    let width = config.bounds.width;
    if cols == 0 || rows == 0 {
        return (width, config.bounds.height);
    }
    let aspect = (f32::from(rows) * CELL_ASPECT) / f32::from(cols);
    let lo = (config.paddle_height * 3.0).min(width);
    let height = (width * aspect).clamp(lo, width);
    (width, height)
}

/// Main application
pub struct App {
    /// Is the application running?
    pub running: bool,
    /// Current screen
    pub screen: AppScreen,
    /// Menu states
    pub menu_state: MenuState,
    /// Simulation session
    pub game: Game,
    /// Latest rendered frame
    pub view: View,
    /// Last sound cue played, shown in the info bar
    pub last_cue: Option<(SoundCue, u8)>,
    bell: bool,
    input_system: InputSystem,
    /// Event handler
    pub events: EventHandler,
    /// Host clock origin passed to the simulation
    epoch: Instant,
    /// Current terminal size
    pub terminal_size: (u16, u16),
    /// Whether UI is paused due to small terminal
    pub ui_paused: bool,
}

impl App {
    /// Constructs a new instance of App
    pub fn new(settings: Settings) -> color_eyre::Result<Self> {
        let events = EventHandler::new()?;
        let input_system = InputSystem::new(events.keyboard_enhanced());
        tracing::info!(input = input_system.mode_description(), "input mode detected");

        let game = Game::new(settings.config, settings.profile);
        let view = game.view();
        let (width, height) = ratatui::crossterm::terminal::size()?;

        let mut app = Self {
            running: true,
            screen: AppScreen::Start,
            menu_state: MenuState::default(),
            game,
            view,
            last_cue: None,
            bell: settings.bell,
            input_system,
            events,
            epoch: Instant::now(),
            terminal_size: (width, height),
            ui_paused: false,
        };
        app.handle_resize(width, height);
        Ok(app)
    }

    /// Run the application's main loop
    pub fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        while self.running {
            terminal.draw(|frame| frame.render_widget(&self, frame.area()))?;
            self.handle_events()?;
        }
        Ok(())
    }

    pub fn handle_events(&mut self) -> color_eyre::Result<()> {
        match self.events.next()? {
            Event::Tick(at) => self.tick(at),
            Event::Crossterm(ratatui::crossterm::event::Event::Key(key_event)) => {
                self.handle_key_event(key_event)
            }
            Event::Crossterm(_) => {}
            Event::App(app_event) => self.handle_app_event(app_event),
        }
        Ok(())
    }

    /// Handle key events and convert to app events
    pub fn handle_key_event(&mut self, key_event: KeyEvent) {
        // Global quit keys
        match key_event.code {
            KeyCode::Char('q') => {
                self.events.send(AppEvent::Quit);
                return;
            }
            KeyCode::Char('c') | KeyCode::Char('C')
                if key_event.modifiers == KeyModifiers::CONTROL =>
            {
                self.events.send(AppEvent::Quit);
                return;
            }
            _ => {}
        }

        match self.screen {
            AppScreen::Start => {
                if key_event.kind == KeyEventKind::Press {
                    match key_event.code {
                        KeyCode::Up => self.events.send(AppEvent::MenuUp),
                        KeyCode::Down => self.events.send(AppEvent::MenuDown),
                        KeyCode::Enter => self.events.send(AppEvent::MenuSelect),
                        KeyCode::Esc => self.events.send(AppEvent::Quit),
                        _ => {}
                    }
                }
            }
            AppScreen::Game => {
                if key_event.code == KeyCode::Esc {
                    if key_event.kind == KeyEventKind::Press {
                        self.events.send(AppEvent::NavigateToStart);
                    }
                    return;
                }

                let mode = self.game.mode;
                if let Some(key) = self.input_system.handle_key_event(key_event, mode) {
                    self.run_game_key(key);
                }
            }
        }
    }

    fn run_game_key(&mut self, key: GameKey) {
        let command = match key {
            GameKey::Toggle if self.game.is_active() => Command::Pause,
            GameKey::Toggle => Command::Start,
            GameKey::Reset => Command::Reset,
            GameKey::PlayAgain => Command::PlayAgain,
            _ => return,
        };
        if self.game.command(command) {
            self.input_system.reset();
        }
    }

    /// Handle application events
    fn handle_app_event(&mut self, app_event: AppEvent) {
        match app_event {
            AppEvent::Quit => self.running = false,
            AppEvent::NavigateToStart => {
                self.game.command(Command::Pause);
                self.screen = AppScreen::Start;
            }
            AppEvent::NavigateToGame(mode) => {
                // Same mode resumes the paused session, a new mode starts fresh
                if mode != self.game.mode {
                    self.game.command(Command::SetMode(mode));
                }
                self.input_system.reset();
                self.screen = AppScreen::Game;
            }
            AppEvent::MenuUp => {
                self.menu_state.start_selected =
                    (self.menu_state.start_selected + START_MENU.len() - 1) % START_MENU.len();
            }
            AppEvent::MenuDown => {
                self.menu_state.start_selected =
                    (self.menu_state.start_selected + 1) % START_MENU.len();
            }
            AppEvent::MenuSelect => match self.menu_state.start_selected {
                0 => self
                    .events
                    .send(AppEvent::NavigateToGame(GameMode::SinglePlayer)),
                1 => self.events.send(AppEvent::NavigateToGame(GameMode::TwoPlayer)),
                _ => self.events.send(AppEvent::Quit),
            },
            AppEvent::TerminalResize(width, height) => self.handle_resize(width, height),
        }
    }

    /// Frame callback: feed intents, advance the session, play its cues
    fn tick(&mut self, at: Instant) {
        self.input_system.update();

        if self.screen == AppScreen::Game {
            let (p1, p2) = self.input_system.intents();
            self.game.set_primary_vertical(p1);
            if self.game.mode == GameMode::TwoPlayer {
                self.game.set_secondary_vertical(p2);
            }
        }

        let frame = self.game.tick(at.saturating_duration_since(self.epoch));
        self.view = frame.view;
        for event in frame.events {
            self.handle_game_event(event);
        }
    }

    fn handle_game_event(&mut self, event: GameEvent) {
        match event {
            GameEvent::Sound { cue, note } => {
                self.last_cue = Some((cue, note));
                if self.bell && matches!(cue, SoundCue::Score | SoundCue::Win | SoundCue::Lose) {
                    ring_bell();
                }
            }
            GameEvent::Scored { scorer, score } => {
                tracing::debug!(?scorer, left = score.left, right = score.right, "score sync");
            }
            GameEvent::LevelCleared { level } => tracing::info!(level, "level cleared"),
            GameEvent::GameOver { winner } => tracing::info!(?winner, "game over"),
        }
    }

    // Terminal size management
    fn handle_resize(&mut self, width: u16, height: u16) {
        self.terminal_size = (width, height);
        self.ui_paused = width < MIN_GAME_WIDTH || height < MIN_GAME_HEIGHT;
        if self.ui_paused {
            return;
        }

        let field = ui::field_inner(Rect::new(0, 0, width, height));
        let (bounds_w, bounds_h) = bounds_for_field(field.width, field.height, &self.game.config);
        self.game.set_bounds(bounds_w, bounds_h);
        self.view = self.game.view();
    }

    pub fn start_menu_items(&self) -> &'static [&'static str] {
        &START_MENU
    }

    pub fn input_mode(&self) -> &'static str {
        self.input_system.mode_description()
    }
}

/// Audio stand-in: the terminal bell
fn ring_bell() {
    if let Err(e) = crossterm::execute!(stdout(), crossterm::style::Print('\u{7}')) {
        tracing::debug!("failed to ring bell: {e}");
    }
}
