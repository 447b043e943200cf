use color_eyre::eyre::WrapErr;
use pong_core::GameMode;
use ratatui::crossterm::{
    event::{
        self, Event as CrosstermEvent, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
        PushKeyboardEnhancementFlags,
    },
    queue,
    terminal::supports_keyboard_enhancement,
};
use std::{
    io::stdout,
    sync::mpsc,
    thread,
    time::{Duration, Instant},
};

/// The frequency at which tick events are emitted (one per rendered frame)
const TICK_FPS: f64 = 60.0;

/// Representation of all possible events.
#[derive(Clone, Debug)]
pub enum Event {
    /// Frame callback, stamped with the moment it was emitted
    Tick(Instant),
    /// Crossterm events (keyboard, mouse, etc.)
    Crossterm(CrosstermEvent),
    /// Application events
    App(AppEvent),
}

/// Application events for navigation
#[derive(Clone, Debug)]
pub enum AppEvent {
    /// Quit the application
    Quit,
    /// Back to the main menu
    NavigateToStart,
    /// Open the playfield in the given mode
    NavigateToGame(GameMode),
    /// Menu navigation
    MenuUp,
    MenuDown,
    MenuSelect,
    /// Terminal resize event
    TerminalResize(u16, u16), // width, height
}

/// Terminal event handler with enhanced keyboard support
pub struct EventHandler {
    /// Event sender channel
    sender: mpsc::Sender<Event>,
    /// Event receiver channel
    receiver: mpsc::Receiver<Event>,
    /// Whether key release events are reported
    keyboard_enhanced: bool,
}

impl EventHandler {
    /// Constructs a new instance, requesting key release reporting when the
    /// terminal supports it. Raw mode is already enabled by `ratatui::init`.
    pub fn new() -> color_eyre::Result<Self> {
        let (sender, receiver) = mpsc::channel();

        let keyboard_enhanced = matches!(supports_keyboard_enhancement(), Ok(true));
        if keyboard_enhanced {
            queue!(
                stdout(),
                PushKeyboardEnhancementFlags(
                    KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                        | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
                )
            )
            .wrap_err("failed to enable keyboard enhancements")?;
        }

        let actor = EventThread::new(sender.clone());
        thread::spawn(move || {
            if let Err(e) = actor.run() {
                tracing::error!("event thread stopped: {e:?}");
            }
        });

        Ok(Self {
            sender,
            receiver,
            keyboard_enhanced,
        })
    }

    pub fn keyboard_enhanced(&self) -> bool {
        self.keyboard_enhanced
    }

    /// Receives an event from the sender (blocking)
    pub fn next(&self) -> color_eyre::Result<Event> {
        self.receiver
            .recv()
            .wrap_err("event channel closed unexpectedly")
    }

    /// Queue an app event
    pub fn send(&mut self, app_event: AppEvent) {
        let _ = self.sender.send(Event::App(app_event));
    }
}

impl Drop for EventHandler {
    fn drop(&mut self) {
        if self.keyboard_enhanced {
            let _ = queue!(stdout(), PopKeyboardEnhancementFlags);
        }
    }
}

/// A thread that handles reading crossterm events and emitting tick events
struct EventThread {
    sender: mpsc::Sender<Event>,
}

impl EventThread {
    fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    fn run(self) -> color_eyre::Result<()> {
        let tick_interval = Duration::from_secs_f64(1.0 / TICK_FPS);
        let mut last_tick = Instant::now();

        loop {
            let timeout = tick_interval.saturating_sub(last_tick.elapsed());
            if timeout == Duration::ZERO {
                last_tick = Instant::now();
                if !self.send(Event::Tick(last_tick)) {
                    return Ok(());
                }
            }

            if event::poll(timeout).wrap_err("failed to poll for crossterm events")? {
                let event = event::read().wrap_err("failed to read crossterm event")?;

                let delivered = match event {
                    CrosstermEvent::Resize(width, height) => {
                        self.send(Event::App(AppEvent::TerminalResize(width, height)))
                    }
                    _ => self.send(Event::Crossterm(event)),
                };
                if !delivered {
                    return Ok(());
                }
            }
        }
    }

    /// Returns false once the receiving side is gone
    fn send(&self, event: Event) -> bool {
        self.sender.send(event).is_ok()
    }
}
