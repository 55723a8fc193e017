//! ## fleettrack-telemetry::logging
//! **Operator console logger on top of `tracing`**
//!
//! Every event is written to stdout as `[LEVEL] message`, the format the
//! operator sees between prompts. `RUST_LOG` takes precedence over the
//! configured filter.

use std::fmt::{self, Write as _};

use fleettrack_config::TelemetryConfig;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::{FormatEvent, FormatFields, Writer};
use tracing_subscriber::fmt::time::{FormatTime, SystemTime};
use tracing_subscriber::fmt::FmtContext;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::EnvFilter;

#[derive(Clone)]
pub struct EventLogger;

impl EventLogger {
    /// Installs the global console subscriber. Must be called once, before
    /// any other crate logs.
    pub fn init(config: &TelemetryConfig) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stdout)
            .with_ansi(false)
            .event_format(ConsoleFormat::new(config.show_timestamps))
            .init()
    }
}

/// Event formatter producing `[INFO] ...`, `[WARNING] ...`, `[ERROR] ...`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleFormat {
    timestamps: bool,
}

impl ConsoleFormat {
    pub fn new(timestamps: bool) -> Self {
        Self { timestamps }
    }
}

/// Console tag for a tracing level.
pub fn level_tag(level: &Level) -> &'static str {
    if *level == Level::ERROR {
        "ERROR"
    } else if *level == Level::WARN {
        "WARNING"
    } else if *level == Level::INFO {
        "INFO"
    } else if *level == Level::DEBUG {
        "DEBUG"
    } else {
        "TRACE"
    }
}

impl<S, N> FormatEvent<S, N> for ConsoleFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        if self.timestamps {
            SystemTime.format_time(&mut writer)?;
            writer.write_char(' ')?;
        }
        write!(writer, "[{}] ", level_tag(event.metadata().level()))?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}
