use std::sync::Once;

use env_logger::WriteStyle;

/// Logger configuration.
///
/// `env_filter` uses `env_logger` directive syntax, e.g.
/// `"quadrant_engine::render=debug"`. When unset, `RUST_LOG` is consulted and
/// the level falls back to `info`.
#[derive(Debug, Clone, Default)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: WriteStyle,
}

impl LoggingConfig {
    /// Config with an explicit filter, ignoring `RUST_LOG`.
    pub fn with_filter(filter: impl Into<String>) -> Self {
        Self {
            env_filter: Some(filter.into()),
            ..Self::default()
        }
    }

    pub fn write_style(mut self, style: WriteStyle) -> Self {
        self.write_style = style;
        self
    }

    fn resolved_filter(&self) -> Option<String> {
        self.env_filter
            .clone()
            .or_else(|| std::env::var("RUST_LOG").ok())
    }
}

static INIT: Once = Once::new();

/// Installs the `env_logger` backend once per process.
///
/// Later calls are ignored. A logger the host installed first is kept.
/// Binaries call this early in `main`; the engine itself only uses `log` macros.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();
        match config.resolved_filter() {
            Some(filter) => builder.parse_filters(&filter),
            None => builder.filter_level(log::LevelFilter::Info),
        };
        builder.write_style(config.write_style);

        if builder.try_init().is_ok() {
            log::debug!("logging initialized");
        }
    });
}
