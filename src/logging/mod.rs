//! Structured logging for the generators.
//!
//! Filter directives live in the `tracing` section of a config file and are
//! validated with the rest of it. `RUST_LOG` still overrides them at startup.

use serde::{Deserialize, Serialize};
use std::sync::Once;
use tracing_subscriber::EnvFilter;

use crate::error::{GenError, Result};

/// Log level for the generator core
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Filter directives for the generator, stored in [`GeneratorConfig`](crate::config::GeneratorConfig)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TracingConfig {
    pub default_level: LogLevel,
    /// `(module path, level)` pairs; a later entry for the same path wins
    pub module_filters: Vec<(String, LogLevel)>,
    pub show_targets: bool,
    pub show_thread_ids: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            default_level: LogLevel::Info,
            module_filters: vec![
                (crate_module("generation"), LogLevel::Info),
                (crate_module("terrain"), LogLevel::Info),
                (crate_module("noise"), LogLevel::Warn),
            ],
            show_targets: true,
            show_thread_ids: false,
        }
    }
}

/// `worldgen_core::<module>`
fn crate_module(module: &str) -> String {
    format!("{}::{module}", env!("CARGO_CRATE_NAME"))
}

impl TracingConfig {
    /// Set the level for one of this crate's modules, e.g. `"wfc"` or
    /// `"generation::dungeon"`, replacing any earlier directive for it.
    pub fn with_module(mut self, module: &str, level: LogLevel) -> Self {
        let path = crate_module(module);
        self.module_filters.retain(|(existing, _)| *existing != path);
        self.module_filters.push((path, level));
        self
    }

    pub fn to_env_filter_string(&self) -> String {
        let mut parts = vec![self.default_level.as_str().to_string()];
        for (module, level) in &self.module_filters {
            parts.push(format!("{}={}", module, level.as_str()));
        }
        parts.join(",")
    }

    /// Reject directives `EnvFilter` would not accept
    pub fn validate(&self) -> Result<()> {
        if let Some((module, _)) = self
            .module_filters
            .iter()
            .find(|(module, _)| module.trim().is_empty() || module.contains([',', '=']))
        {
            return Err(GenError::InvalidConfig(format!(
                "tracing module filter {module:?} is not a module path"
            )));
        }
        EnvFilter::try_new(self.to_env_filter_string())
            .map(|_| ())
            .map_err(|e| GenError::InvalidConfig(format!("tracing filter: {e}")))
    }
}

static TRACING_INIT: Once = Once::new();

/// Initialize tracing with default settings. Safe to call more than once.
pub fn init_tracing_default() {
    init_tracing(&TracingConfig::default());
}

/// Initialize tracing with a custom config. The first call wins.
/// `RUST_LOG` takes precedence over the configured filter.
pub fn init_tracing(config: &TracingConfig) {
    let filter_str = config.to_env_filter_string();
    let show_targets = config.show_targets;
    let show_thread_ids = config.show_thread_ids;
    TRACING_INIT.call_once(move || {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(show_targets)
            .with_thread_ids(show_thread_ids)
            .compact();

        // A host application may already own the global subscriber
        let _ = subscriber.try_init();
    });
}

/// Named span entered for the lifetime of the guard
pub struct TimingSpan {
    _span: tracing::span::EnteredSpan,
}

impl TimingSpan {
    pub fn new(name: &str) -> Self {
        let span = tracing::info_span!("generate", name = name);
        Self {
            _span: span.entered(),
        }
    }
}
