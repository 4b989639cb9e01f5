//! Basic logger usage example
//!
//! Writes a few entries to `app.log` (or the path given as the first
//! argument) and echoes them to standard output.
//!
//! Run with: cargo run --example basic_usage [-- path/to/app.log]

use ndjson_logger::prelude::*;
use ndjson_logger::{fields, info};

fn main() -> Result<()> {
    let path = std::env::args().nth(1).unwrap_or_else(|| "app.log".to_string());

    let logger = Logger::builder()
        .path(&path)
        .sink(WriterSink::stdout())
        .build()?;

    // 1. Context fields become attributes of the entry
    let ctx = LogContext::background().with_fields(fields! {
        "user_id" => "user-001",
        "session_id" => "sess-abc",
        "custom" => "extra info",
    });
    logger.log(&ctx, LogLevel::Info, "Logging with context extra fields");

    // 2. Default fields attached to a derived logger
    let with_defaults = logger.with_fields(fields! {
        "service" => "myservice",
        "version" => "2.0",
    });
    with_defaults.log(
        &LogContext::background(),
        LogLevel::Debug,
        "Logging with default fields from with_fields",
    );

    // 3. HTTP event with status code and duration in seconds
    logger.log_http(
        &LogContext::background(),
        LogLevel::Warn,
        "HTTP event occurred",
        404,
        0.567,
    );

    // 4. Formatting macro; context fields override defaults
    let override_ctx = LogContext::background().with_fields(fields! { "version" => "2.1-canary" });
    info!(with_defaults, &override_ctx, "deployed {} to {} hosts", "myservice", 3);

    let metrics = logger.metrics();
    eprintln!(
        "wrote {} lines to {} and stdout ({} dropped)",
        metrics.lines_written(),
        path,
        metrics.dropped_count()
    );

    logger.close()
}
