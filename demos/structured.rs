//! Structured logging walkthrough: JSON sink on stdout, derived loggers,
//! wrapped errors, and verbosity levels.
//!
//! Run with `RUST_BACKTRACE=1` to see stack traces attached to errors.

use anyhow::anyhow;
use linelog::prelude::*;
use serde_json::json;
use std::sync::Arc;

fn main() {
    let sink = JsonSink::new(JsonSinkOptions {
        output: Some(SyncWriter::stdout()),
        ..Default::default()
    });
    let logger = Logger::builder()
        .sink(Arc::new(sink))
        .verbosity(10)
        .build()
        .with_name("example")
        .with_values(&[json!("hello"), json!("kitty")]);

    logger.info(0, "start", &[]);

    logger.info(0, "such a good test", &[json!("wow"), json!(10)]);

    logger.error(anyhow!("wow it super broke yo"), "oops", &[
        json!("foo"),
        json!("flange"),
    ]);

    let nested = anyhow!("wow it super broke yo")
        .context("nesting A")
        .context("nesting B");
    logger.error(nested, "so nested", &[]);

    if logger.enabled(1) {
        logger.info(1, "meow", &[json!("this"), json!("is a test")]);
    }
    if logger.enabled(2) {
        logger.info(2, "woof", &[json!("this"), json!("is an even more verbose test")]);
    }

    logger.info(0, "end", &[]);
}
