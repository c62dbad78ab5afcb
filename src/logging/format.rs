//! Line layout shared by the console and file layers

use super::{Level, TIMESTAMP_FORMAT};
use chrono::Local;
use std::fmt::{self, Write as _};
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

/// Field carrying the logger name on every event
pub(crate) const LOGGER_FIELD: &str = "logger";

/// Marker set on ERROR events emitted through [`Level::Critical`]
pub(crate) const CRITICAL_FIELD: &str = "critical";

/// Renders `[dd-Mon-yy HH:MM:SS] [LEVEL] [name] =>>> message`.
///
/// The prefix is colored by level only when the layer writes ANSI escapes.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineFormat;

#[derive(Default)]
struct LineVisitor {
    logger: Option<String>,
    critical: bool,
    message: String,
}

impl Visit for LineVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            LOGGER_FIELD => self.logger = Some(value.to_string()),
            "message" => self.message = value.to_string(),
            _ => {}
        }
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        if field.name() == CRITICAL_FIELD {
            self.critical = value;
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        match field.name() {
            "message" => self.message = format!("{value:?}"),
            LOGGER_FIELD => self.logger = Some(format!("{value:?}")),
            _ => {}
        }
    }
}

impl LineVisitor {
    fn level(&self, level: &tracing::Level) -> Level {
        match *level {
            tracing::Level::TRACE | tracing::Level::DEBUG => Level::Debug,
            tracing::Level::INFO => Level::Info,
            tracing::Level::WARN => Level::Warning,
            _ if self.critical => Level::Critical,
            _ => Level::Error,
        }
    }
}

impl<S, N> FormatEvent<S, N> for LineFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let mut visitor = LineVisitor::default();
        event.record(&mut visitor);

        let metadata = event.metadata();
        let level = visitor.level(metadata.level());
        let name = visitor.logger.as_deref().unwrap_or_else(|| metadata.target());

        let prefix = format!(
            "[{}] [{}] [{}] =>>>",
            Local::now().format(TIMESTAMP_FORMAT),
            level,
            name
        );

        if writer.has_ansi_escapes() {
            write!(writer, "{}", level.paint(&prefix))?;
        } else {
            writer.write_str(&prefix)?;
        }

        writeln!(writer, " {}", visitor.message)
    }
}
