use std::fmt;
use std::io::IsTerminal;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::{format::Writer, FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

const COLOR_RESET: &str = "\x1b[0m";
const COLOR_CYAN: &str = "\x1b[36m";
const COLOR_GREEN: &str = "\x1b[32m";
const COLOR_BRIGHT_YELLOW: &str = "\x1b[93m";
const COLOR_BRIGHT_RED: &str = "\x1b[91m";
const COLOR_BRIGHT_GRAY: &str = "\x1b[90m";

const SOURCE_WIDTH: usize = 18;
const LOG_LEVEL_WIDTH: usize = 7;

/// Log line formatter for the linkframe tool.
///
/// Lines look like `[timestamp] [source] [level] message`, where the source is
/// the `component` field of the event when present.
pub struct LinkLogFormatter {
    tool_name: String,
    color_enabled: bool,
}

/// Log an info event tagged with a component
#[macro_export]
macro_rules! component_info {
    ($component:expr, $($arg:tt)*) => {
        tracing::info!(component = $component, $($arg)*)
    };
}

/// Log a warning tagged with a component
#[macro_export]
macro_rules! component_warn {
    ($component:expr, $($arg:tt)*) => {
        tracing::warn!(component = $component, $($arg)*)
    };
}

/// Log a debug event tagged with a component
#[macro_export]
macro_rules! component_debug {
    ($component:expr, $($arg:tt)*) => {
        tracing::debug!(component = $component, $($arg)*)
    };
}

/// Log an error tagged with a component
#[macro_export]
macro_rules! component_error {
    ($component:expr, $($arg:tt)*) => {
        tracing::error!(component = $component, $($arg)*)
    };
}

impl LinkLogFormatter {
    pub fn new(tool_name: impl Into<String>) -> Self {
        let color_enabled =
            std::env::var("TERM").map_or(false, |term| term != "dumb") && std::io::stderr().is_terminal();
        Self {
            tool_name: tool_name.into(),
            color_enabled,
        }
    }

    fn format_source(&self, component: Option<&str>) -> String {
        let name = match component {
            Some(comp) => format!("{}-{}", self.tool_name, comp),
            None => self.tool_name.clone(),
        };

        if name.chars().count() > SOURCE_WIDTH {
            let head: String = name.chars().take(SOURCE_WIDTH - 1).collect();
            format!("{}…", head)
        } else {
            format!("{:<width$}", name, width = SOURCE_WIDTH)
        }
    }

    fn format_level(level: &Level) -> String {
        let label = match *level {
            Level::ERROR => "✗ ERROR",
            Level::WARN => "⚠ WARN",
            Level::INFO => "ℹ INFO",
            Level::DEBUG => "◦ DEBUG",
            Level::TRACE => "◦ TRACE",
        };

        // icons count as one char but pad as two columns
        format!("{:<width$}", label, width = LOG_LEVEL_WIDTH + 2)
    }

    fn level_color(&self, level: &Level) -> &'static str {
        if !self.color_enabled {
            return "";
        }

        match *level {
            Level::ERROR => COLOR_BRIGHT_RED,
            Level::WARN => COLOR_BRIGHT_YELLOW,
            Level::INFO => COLOR_GREEN,
            Level::DEBUG | Level::TRACE => COLOR_BRIGHT_GRAY,
        }
    }
}

impl<S, N> FormatEvent<S, N> for LinkLogFormatter
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
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        let level = event.metadata().level();

        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        let (color, reset, cyan) = if self.color_enabled {
            (self.level_color(level), COLOR_RESET, COLOR_CYAN)
        } else {
            ("", "", "")
        };

        write!(
            writer,
            "{}[{}] [{}] [{}{}{}] ",
            cyan,
            timestamp,
            self.format_source(visitor.component.as_deref()),
            color,
            Self::format_level(level),
            reset
        )?;

        writeln!(writer, "{}{}", visitor.message, reset)
    }
}

/// Pulls the message and component out of an event
#[derive(Default)]
struct FieldVisitor {
    message: String,
    component: Option<String>,
}

fn strip_quotes(text: String) -> String {
    match text.strip_prefix('"').and_then(|t| t.strip_suffix('"')) {
        Some(inner) => inner.to_string(),
        None => text,
    }
}

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn fmt::Debug) {
        match field.name() {
            "message" => self.message = strip_quotes(format!("{:?}", value)),
            "component" => self.component = Some(strip_quotes(format!("{:?}", value))),
            _ => {}
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        match field.name() {
            "message" => self.message = value.to_string(),
            "component" => self.component = Some(value.to_string()),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain() -> LinkLogFormatter {
        LinkLogFormatter {
            tool_name: "linkframe".to_string(),
            color_enabled: false,
        }
    }

    #[test]
    fn test_format_source() {
        let formatter = plain();
        assert_eq!(formatter.format_source(None), "linkframe         ");
        assert_eq!(formatter.format_source(Some("cli")), "linkframe-cli     ");
        assert_eq!(
            formatter.format_source(Some("configuration")),
            "linkframe-configu…"
        );
    }

    #[test]
    fn test_no_color_when_disabled() {
        assert_eq!(plain().level_color(&Level::ERROR), "");
    }

    #[test]
    fn test_strip_quotes() {
        assert_eq!(strip_quotes("\"frames\"".to_string()), "frames");
        assert_eq!(strip_quotes("frames".to_string()), "frames");
    }
}
