use tracing_subscriber::EnvFilter;

/// Environment variable that overrides the `-v` derived filter
pub const LOG_ENV: &str = "POLYCHAT_LOG";

pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "polychat=warn",
        1 => "polychat=info",
        2 => "polychat=debug",
        _ => "polychat=trace",
    }
}

/// Installs the stderr subscriber. Safe to call more than once.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
