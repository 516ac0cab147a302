use std::io::Write;

use chrono::Local;
use env_logger::{Builder, Env};
use log::{LevelFilter, SetLoggerError};

/// Installs the global logger, writing timestamped records to stderr.
///
/// Filters come from `RUST_LOG` (module directives such as `parallel_kmeans=debug`
/// included) and default to `info`. `level` replaces the default level while
/// keeping any per-module directive.
pub fn init_logger(level: Option<LevelFilter>) -> Result<(), SetLoggerError> {
    let mut builder = Builder::from_env(Env::default().default_filter_or("info"));
    builder.format(|buf, record| {
        writeln!(
            buf,
            "{} [{:<5}] {}: {}",
            Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
            record.level(),
            record.target(),
            record.args()
        )
    });
    if let Some(level) = level {
        builder.filter_level(level);
    }
    builder.try_init()
}
