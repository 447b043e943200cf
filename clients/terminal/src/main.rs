use crate::{app::App, settings::Settings};

pub mod app;
pub mod event;
pub mod settings;
pub mod ui;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let settings = Settings::from_env()?;
    settings::init_logging(settings.log_path.as_deref())?;
    tracing::info!(profile = ?settings.profile, "starting terminal client");

    let terminal = ratatui::init();
    let result = App::new(settings).and_then(|app| app.run(terminal));
    ratatui::restore();
    result
}
