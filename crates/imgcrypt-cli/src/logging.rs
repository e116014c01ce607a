//! Tracing subscriber setup. Logs go to stderr so stdout stays clean for
//! JSON output and completions.

use tracing_subscriber::EnvFilter;

use crate::constants::LOG_ENV;

/// Install the global subscriber.
///
/// Precedence: `IMGCRYPT_LOG`, then `-v`/`-vv`, then the config level.
pub fn init(verbose: u8, config_level: &str) {
    let filter = filter_from(std::env::var(LOG_ENV).ok(), verbose, config_level);
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn filter_from(env_value: Option<String>, verbose: u8, config_level: &str) -> EnvFilter {
    if let Some(value) = env_value.filter(|v| !v.trim().is_empty()) {
        if let Ok(filter) = EnvFilter::try_new(&value) {
            return filter;
        }
    }

    let level = match verbose {
        0 => config_level,
        1 => "debug",
        _ => "trace",
    };
    EnvFilter::try_new(format!("warn,imgcrypt={0},imgcrypt_core={0}", level))
        .unwrap_or_else(|_| EnvFilter::new("warn"))
}
