use crate::config::Config;
use log::{LevelFilter, SetLoggerError};
use simplelog::ConfigBuilder;

/// Dependency modules that drown out room and fanout logs below Trace.
const FILTERED_MODULES: &[&str] = &[
    "sqlx",
    "sea_orm",
    "sea_orm_migration",
    "tower",
    "tracing",
    "hyper",
    "axum",
    "tungstenite",
];

pub struct Logger {}

impl Logger {
    /// Installs the global terminal logger at the configured level.
    ///
    /// At Trace every module logs; at any other level the noisy dependencies
    /// in `FILTERED_MODULES` are silenced.
    pub fn init_logger(config: &Config) -> Result<(), SetLoggerError> {
        simplelog::TermLogger::init(
            config.log_level_filter,
            Self::build_log_config(config.log_level_filter),
            simplelog::TerminalMode::Mixed,
            simplelog::ColorChoice::Auto,
        )
    }

    fn build_log_config(level: LevelFilter) -> simplelog::Config {
        let mut builder = ConfigBuilder::new();
        builder.set_time_format_rfc3339();

        for module in Self::filtered_modules(level) {
            builder.add_filter_ignore_str(module);
        }

        builder.build()
    }

    fn filtered_modules(level: LevelFilter) -> &'static [&'static str] {
        if level == LevelFilter::Trace {
            &[]
        } else {
            FILTERED_MODULES
        }
    }
}
