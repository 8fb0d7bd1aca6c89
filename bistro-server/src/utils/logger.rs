//! Logging Infrastructure
//!
//! Structured logging setup for development and production:
//! - console output, human-readable or JSON
//! - optional daily rotating application logs (14 files kept)
//! - optional daily rotating security logs (target `security`, 90 files kept)

use std::fs;
use std::path::Path;

use tracing::Subscriber;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer, fmt, prelude::*};

const APP_LOG_FILES: usize = 14;
const SECURITY_LOG_FILES: usize = 90;

type BoxedLayer<S> = Box<dyn Layer<S> + Send + Sync + 'static>;

/// Initialize the logging system
///
/// `RUST_LOG` wins over `level` when set.
///
/// # Arguments
/// * `level` - Log level (e.g., "info", "debug", "warn")
/// * `json_format` - JSON console output (production) or pretty text (development)
/// * `log_dir` - Optional directory for file logging (e.g., Some("./logs"))
///
/// # Examples
/// ```no_run
/// // Development setup (console only)
/// bistro_server::init_logger_with_file("debug", false, None)?;
///
/// // Production setup (console + file)
/// bistro_server::init_logger_with_file("info", true, Some("./logs"))?;
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn init_logger_with_file(
    level: &str,
    json_format: bool,
    log_dir: Option<&str>,
) -> anyhow::Result<()> {
    let mut layers: Vec<BoxedLayer<_>> = vec![console_layer(level, json_format)];

    if let Some(dir) = log_dir {
        layers.extend(file_layers(level, Path::new(dir))?);
    }

    tracing_subscriber::registry().with(layers).try_init()?;
    Ok(())
}

fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

fn console_layer<S>(level: &str, json_format: bool) -> BoxedLayer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a> + 'static,
{
    if json_format {
        fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_filter(env_filter(level))
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_filter(env_filter(level))
            .boxed()
    }
}

fn file_layers<S>(level: &str, log_dir: &Path) -> anyhow::Result<Vec<BoxedLayer<S>>>
where
    S: Subscriber + for<'a> LookupSpan<'a> + 'static,
{
    let app_log_dir = log_dir.join("app");
    let security_log_dir = log_dir.join("security");
    fs::create_dir_all(&app_log_dir)?;
    fs::create_dir_all(&security_log_dir)?;

    let app_log = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("app")
        .filename_suffix("log")
        .max_log_files(APP_LOG_FILES)
        .build(&app_log_dir)?;

    let security_log = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("security")
        .filename_suffix("log")
        .max_log_files(SECURITY_LOG_FILES)
        .build(&security_log_dir)?;

    // Security events live in their own file only
    let app_layer = fmt::layer()
        .json()
        .with_target(true)
        .with_current_span(true)
        .with_file(true)
        .with_line_number(true)
        .with_writer(app_log)
        .with_filter(filter_fn(|meta| meta.target() != "security"))
        .with_filter(env_filter(level))
        .boxed();

    let security_layer = fmt::layer()
        .json()
        .with_target(true)
        .with_current_span(true)
        .with_writer(security_log)
        .with_filter(filter_fn(|meta| meta.target() == "security"))
        .boxed();

    Ok(vec![app_layer, security_layer])
}

/// Security log helper - records authentication and authorization events
///
/// Events go to target `security`, which the file logger splits into
/// `security/security.YYYY-MM-DD.log`.
///
/// # Examples
/// ```no_run
/// # use bistro_server::security_log;
/// // Bad or missing token
/// security_log!(WARN, "auth_failed", uri = "/users".to_string());
///
/// // Non-admin hitting an admin route
/// security_log!(WARN, "admin_required", email = "a@x.com".to_string());
/// ```
#[macro_export]
macro_rules! security_log {
    (WARN, $event:expr, $($arg:tt)*) => {
        tracing::warn!(
            target: "security",
            event = $event,
            timestamp = chrono::Local::now().to_rfc3339(),
            level = "WARN",
            $($arg)*
        );
    };
    (ERROR, $event:expr, $($arg:tt)*) => {
        tracing::error!(
            target: "security",
            event = $event,
            timestamp = chrono::Local::now().to_rfc3339(),
            level = "ERROR",
            $($arg)*
        );
    };
    (INFO, $event:expr, $($arg:tt)*) => {
        tracing::info!(
            target: "security",
            event = $event,
            timestamp = chrono::Local::now().to_rfc3339(),
            level = "INFO",
            $($arg)*
        );
    };
}
