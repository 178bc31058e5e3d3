//! Logging initialization

/// Initialize the logging system
///
/// Uses env_logger with default filter level of `info`.
/// Override with RUST_LOG environment variable.
///
/// Fails if a global logger is already installed.
///
/// # Example
/// ```
/// endless_terrain::core::logging::init().expect("no logger installed yet");
/// log::info!("Streamer started");
/// ```
pub fn init() -> Result<(), log::SetLoggerError> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    ).try_init()
}
