//! Logging configuration and setup.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    EnvFilter, Layer, Registry,
    fmt::{self, writer::BoxMakeWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::error::{TelemetryError, TelemetryResult};

/// Directive that enables the proxy's per-call decision events.
const FORWARDING_DIRECTIVE: &str = "surrogate_proxy=trace";

/// Default prefix for rotated log files.
const FILE_PREFIX: &str = "surrogate";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Log format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Multi-line, human-readable output.
    #[default]
    Pretty,
    /// One line per event.
    Compact,
    /// Newline-delimited JSON.
    Json,
    /// The default `tracing-subscriber` format.
    Full,
}

/// Where log output goes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogTarget {
    /// Standard output.
    Stdout,
    /// Standard error.
    #[default]
    Stderr,
    /// Daily-rotated files in this directory.
    File(PathBuf),
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct LogConfig {
    /// Base level filter (e.g. "info", "debug").
    #[serde(default = "default_level")]
    pub level: String,
    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
    /// Output target.
    #[serde(default)]
    pub target: LogTarget,
    /// Prefix for log file names when the target is a directory.
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,
    /// Include timestamps.
    #[serde(default = "default_true")]
    pub timestamps: bool,
    /// Include source file and line.
    #[serde(default)]
    pub file_info: bool,
    /// Include thread IDs.
    #[serde(default)]
    pub thread_ids: bool,
    /// Use ANSI colors. Ignored for file targets.
    #[serde(default = "default_true")]
    pub ansi: bool,
    /// Extra filter directives (e.g. `surrogate_config=debug`).
    #[serde(default)]
    pub directives: Vec<String>,
}

fn default_level() -> String {
    "info".to_string()
}

fn default_file_prefix() -> String {
    FILE_PREFIX.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::default(),
            target: LogTarget::default(),
            file_prefix: default_file_prefix(),
            timestamps: true,
            file_info: false,
            thread_ids: false,
            ansi: true,
            directives: Vec::new(),
        }
    }
}

impl LogConfig {
    /// Create a config with the given base level.
    #[must_use]
    pub fn new(level: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            ..Default::default()
        }
    }

    /// Set the output format.
    #[must_use]
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the output target.
    #[must_use]
    pub fn with_target(mut self, target: LogTarget) -> Self {
        self.target = target;
        self
    }

    /// Write daily-rotated files named `{prefix}.YYYY-MM-DD.log` into `directory`.
    #[must_use]
    pub fn with_file_logging(
        mut self,
        directory: impl Into<PathBuf>,
        prefix: impl Into<String>,
    ) -> Self {
        self.target = LogTarget::File(directory.into());
        self.file_prefix = prefix.into();
        self.ansi = false;
        self
    }

    /// Add a filter directive.
    #[must_use]
    pub fn with_directive(mut self, directive: impl Into<String>) -> Self {
        self.directives.push(directive.into());
        self
    }

    /// Show every forward and default decision made by proxies.
    #[must_use]
    pub fn with_forwarding_trace(self) -> Self {
        self.with_directive(FORWARDING_DIRECTIVE)
    }

    /// Disable timestamps.
    #[must_use]
    pub fn without_timestamps(mut self) -> Self {
        self.timestamps = false;
        self
    }

    /// Enable file/line info.
    #[must_use]
    pub fn with_file_info(mut self) -> Self {
        self.file_info = true;
        self
    }

    /// Enable thread IDs.
    #[must_use]
    pub fn with_thread_ids(mut self) -> Self {
        self.thread_ids = true;
        self
    }

    /// Disable ANSI colors.
    #[must_use]
    pub fn without_ansi(mut self) -> Self {
        self.ansi = false;
        self
    }

    fn build_filter(&self) -> TelemetryResult<EnvFilter> {
        let mut filter = EnvFilter::try_new(&self.level)
            .map_err(|e| TelemetryError::ConfigError(e.to_string()))?;

        for directive in &self.directives {
            let directive = directive
                .parse()
                .map_err(|e: tracing_subscriber::filter::ParseError| {
                    TelemetryError::ConfigError(format!("invalid directive '{directive}': {e}"))
                })?;
            filter = filter.add_directive(directive);
        }

        Ok(filter)
    }

    fn make_writer(&self) -> TelemetryResult<BoxMakeWriter> {
        Ok(match &self.target {
            LogTarget::Stdout => BoxMakeWriter::new(std::io::stdout),
            LogTarget::Stderr => BoxMakeWriter::new(std::io::stderr),
            LogTarget::File(dir) => {
                std::fs::create_dir_all(dir)?;
                let appender = RollingFileAppender::builder()
                    .rotation(Rotation::DAILY)
                    .filename_prefix(&self.file_prefix)
                    .filename_suffix("log")
                    .build(dir)
                    .map_err(|e| TelemetryError::InitError(e.to_string()))?;
                BoxMakeWriter::new(appender)
            },
        })
    }

    fn ansi_enabled(&self) -> bool {
        self.ansi && !matches!(self.target, LogTarget::File(_))
    }

    fn build_layer(&self, writer: BoxMakeWriter) -> BoxedLayer {
        macro_rules! finish {
            ($layer:expr) => {{
                let layer = $layer
                    .with_writer(writer)
                    .with_ansi(self.ansi_enabled())
                    .with_file(self.file_info)
                    .with_line_number(self.file_info)
                    .with_thread_ids(self.thread_ids);
                if self.timestamps {
                    layer.boxed()
                } else {
                    layer.without_time().boxed()
                }
            }};
        }

        match self.format {
            LogFormat::Pretty => finish!(fmt::layer().pretty()),
            LogFormat::Compact => finish!(fmt::layer().compact()),
            LogFormat::Json => finish!(fmt::layer().json()),
            LogFormat::Full => finish!(fmt::layer()),
        }
    }
}

/// Install a global subscriber built from `config`.
///
/// # Errors
///
/// Returns [`TelemetryError::ConfigError`] for an invalid level or
/// directive, [`TelemetryError::IoError`] if the log directory cannot be
/// created, and [`TelemetryError::InitError`] if a global subscriber is
/// already set.
pub fn setup_logging(config: &LogConfig) -> TelemetryResult<()> {
    let filter = config.build_filter()?;
    let layer = config.build_layer(config.make_writer()?);

    tracing_subscriber::registry()
        .with(layer)
        .with(filter)
        .try_init()
        .map_err(|e| TelemetryError::InitError(e.to_string()))
}

/// Install the default subscriber (info level, stderr, pretty format).
///
/// # Errors
///
/// Returns an error if a global subscriber is already set.
pub fn setup_default_logging() -> TelemetryResult<()> {
    setup_logging(&LogConfig::default())
}
