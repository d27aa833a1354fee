use std::collections::HashMap;
use tracing::Level;
use tracing_subscriber::{EnvFilter, filter::LevelFilter};

/// Per-scope log filtering layered over `tracing`.
///
/// Parsed from a comma separated string such as `warn,locomotion=debug,climb=trace`:
/// a bare level sets the global level, `scope=level` overrides a single scope.
#[derive(Debug, Clone)]
pub struct LogConfig {
    global_level: Level,
    scope_levels: HashMap<String, Level>,
}

impl LogConfig {
    pub fn new() -> Self {
        Self {
            global_level: Level::WARN,
            scope_levels: HashMap::new(),
        }
    }

    pub fn from_env(env_var_name: &str) -> Self {
        match std::env::var(env_var_name) {
            Ok(value) => Self::parse(&value),
            Err(_) => Self::new(),
        }
    }

    pub fn parse(config_str: &str) -> Self {
        let mut config = Self::new();
        config.apply(config_str);
        config
    }

    fn apply(&mut self, config_str: &str) {
        for part in config_str.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            match part.split_once('=') {
                Some((scope, level)) => {
                    if let Some(level) = parse_level(level.trim()) {
                        self.scope_levels.insert(scope.trim().to_string(), level);
                    }
                }
                None => {
                    if let Some(level) = parse_level(part) {
                        self.global_level = level;
                    }
                }
            }
        }
    }

    pub fn should_log(&self, scope: &str, level: Level) -> bool {
        let target_level = self.scope_levels.get(scope).unwrap_or(&self.global_level);
        level <= *target_level
    }

    pub fn global_level(&self) -> Level {
        self.global_level
    }

    /// Most verbose level the global setting or any scope allows
    pub fn max_level(&self) -> Level {
        self.scope_levels
            .values()
            .copied()
            .fold(self.global_level, std::cmp::max)
    }

    pub fn set_global_level(&mut self, level: Level) {
        self.global_level = level;
    }

    pub fn set_scope_level(&mut self, scope: impl Into<String>, level: Level) {
        self.scope_levels.insert(scope.into(), level);
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_level(level_str: &str) -> Option<Level> {
    match level_str.to_lowercase().as_str() {
        "error" => Some(Level::ERROR),
        "warn" => Some(Level::WARN),
        "info" => Some(Level::INFO),
        "debug" => Some(Level::DEBUG),
        "trace" => Some(Level::TRACE),
        _ => None,
    }
}

/// Initialize the tracing subscriber and the scoped filter.
///
/// Each binary passes its own environment variable, e.g. `init_logging("VRPROJ_LOG")`.
/// `RUST_LOG` still wins when set. Otherwise the subscriber admits `info` or
/// the most verbose level named in the scoped config, whichever is lower, so
/// `locomotion=trace` reaches the output.
/// Calling this more than once keeps the first subscriber and the first config.
pub fn init_logging(env_var_name: &str) -> LogConfig {
    let config = LogConfig::from_env(env_var_name);

    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(&config)),
        )
        .try_init();

    super::set_log_config(config.clone());
    config
}

fn default_filter(config: &LogConfig) -> EnvFilter {
    let floor = std::cmp::max(config.max_level(), Level::INFO);
    EnvFilter::default().add_directive(LevelFilter::from_level(floor).into())
}
