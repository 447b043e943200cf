//! Environment driven settings: game config file, difficulty profile, log file.

use color_eyre::eyre::{bail, WrapErr};
use pong_core::{Config, DifficultyProfile};
use std::{
    env, fs,
    path::{Path, PathBuf},
    sync::Mutex,
};
use tracing_subscriber::EnvFilter;

/// Client settings resolved once at startup
#[derive(Debug, Clone)]
pub struct Settings {
    pub config: Config,
    pub profile: DifficultyProfile,
    /// Write tracing output here (`PONG_LOG`)
    pub log_path: Option<PathBuf>,
    /// Ring the terminal bell on score and stinger notes (`PONG_BELL=0` disables)
    pub bell: bool,
}

impl Settings {
    /// Read `PONG_CONFIG`, `PONG_PROFILE`, `PONG_LOG` and `PONG_BELL`
    pub fn from_env() -> color_eyre::Result<Self> {
        let config = match env::var_os("PONG_CONFIG") {
            Some(path) => load_config(Path::new(&path))?,
            None => Config::default(),
        };
        let profile = parse_profile(env::var("PONG_PROFILE").ok().as_deref())?;
        let log_path = env::var_os("PONG_LOG").map(PathBuf::from);
        let bell = !matches!(env::var("PONG_BELL").as_deref(), Ok("0") | Ok("off"));

        Ok(Self {
            config,
            profile,
            log_path,
            bell,
        })
    }
}

/// Load and validate a JSON game config
pub fn load_config(path: &Path) -> color_eyre::Result<Config> {
    let text = fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read config file {}", path.display()))?;
    parse_config(&text).wrap_err_with(|| format!("bad config file {}", path.display()))
}

/// Parse a JSON game config; missing fields take their defaults
pub fn parse_config(text: &str) -> color_eyre::Result<Config> {
    let config: Config = serde_json::from_str(text).wrap_err("invalid config JSON")?;
    config.validate().wrap_err("config rejected")?;
    Ok(config)
}

/// `desktop` (default) or `touch`
pub fn parse_profile(name: Option<&str>) -> color_eyre::Result<DifficultyProfile> {
    match name.map(str::trim) {
        None | Some("") | Some("desktop") => Ok(DifficultyProfile::desktop()),
        Some("touch") => Ok(DifficultyProfile::touch()),
        Some(other) => bail!("unknown PONG_PROFILE `{other}` (expected desktop or touch)"),
    }
}

/// Install a file logger when a path is given. Stdout belongs to the UI,
/// so without a path nothing is logged.
pub fn init_logging(path: Option<&Path>) -> color_eyre::Result<()> {
    let Some(path) = path else {
        return Ok(());
    };

    let file = fs::File::create(path)
        .wrap_err_with(|| format!("failed to create log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    tracing::info!("logging to {}", path.display());
    Ok(())
}
