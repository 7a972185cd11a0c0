//! Presentation Tests
//!
//! Metrics table rendering, exit codes, and the watch loop.

mod common;

use std::cell::Cell;
use std::thread;
use std::time::{Duration, Instant};

use common::MockAgent;
use crossbeam::channel;
use telemetry_client::protocol::decode_response;
use telemetry_client::render::{exit_code, metrics_table, response_summary, METRIC_KEYS, MISSING};
use telemetry_client::watch::{watch, MIN_INTERVAL};
use telemetry_client::{Response, TelemetryError};

fn row<'a>(table: &'a str, key: &str) -> Option<&'a str> {
    table
        .lines()
        .find(|line| line.starts_with(&format!("| {key} ")))
        .map(|line| line.split('|').nth(2).unwrap_or("").trim())
}

// =============================================================================
// Metrics Table
// =============================================================================

#[test]
fn test_metrics_table_rows() {
    let response = decode_response(
        "{\"ok\":true,\"platform\":\"linux\",\"cpu_usage_pct\":12.5,\"uptime_s\":3600,\"extra\":1}",
    )
    .unwrap();

    let table = metrics_table(&response);

    assert!(table.starts_with("Telemetry\n"));
    assert_eq!(row(&table, "ok"), Some("true"));
    assert_eq!(row(&table, "platform"), Some("linux"));
    assert_eq!(row(&table, "cpu_usage_pct"), Some("12.5"));
    assert_eq!(row(&table, "uptime_s"), Some("3600"));
    assert_eq!(row(&table, "temperature_c"), Some(MISSING));
    assert_eq!(row(&table, "extra"), None);
    assert_eq!(row(&table, "error"), None);
    for key in METRIC_KEYS {
        assert!(row(&table, key).is_some(), "missing row {key}");
    }
}

#[test]
fn test_metrics_table_error_row_on_failure() {
    let response = decode_response("{\"ok\":false,\"error\":\"sensor offline\"}").unwrap();

    let table = metrics_table(&response);

    assert_eq!(row(&table, "error"), Some("sensor offline"));
}

#[test]
fn test_metrics_table_rows_are_aligned() {
    let response = decode_response("{\"platform\":\"a rather long platform name\"}").unwrap();

    let table = metrics_table(&response);
    let widths: Vec<usize> = table
        .lines()
        .skip(1)
        .map(|line| line.chars().count())
        .collect();

    assert!(widths.windows(2).all(|w| w[0] == w[1]));
}

#[test]
fn test_response_summary_is_json() {
    let response = decode_response("{\"ok\":true,\"throttle_ms\":500}").unwrap();

    let summary = response_summary(&response);
    let reparsed: serde_json::Value = serde_json::from_str(&summary).unwrap();

    assert_eq!(reparsed["throttle_ms"], 500);
}

#[test]
fn test_exit_code() {
    assert_eq!(exit_code(&decode_response("{\"ok\":true}").unwrap()), 0);
    assert_eq!(exit_code(&decode_response("{}").unwrap()), 0);
    assert_eq!(exit_code(&decode_response("{\"ok\":false}").unwrap()), 1);
}

// =============================================================================
// Watch Loop
// =============================================================================

#[test]
fn test_watch_stops_before_first_poll_when_signalled() {
    let (tx, rx) = channel::bounded(1);
    tx.send(()).unwrap();

    let polls = watch(Duration::from_secs(10), &rx, || panic!("polled"), |_| {}).unwrap();

    assert_eq!(polls, 0);
}

#[test]
fn test_watch_polls_until_stopped() {
    let (tx, rx) = channel::bounded(1);
    let polled = Cell::new(0);
    let rendered = Cell::new(0);

    let polls = watch(
        Duration::from_millis(1),
        &rx,
        || {
            polled.set(polled.get() + 1);
            if polled.get() == 3 {
                tx.send(()).unwrap();
            }
            Ok(Response::default())
        },
        |_| rendered.set(rendered.get() + 1),
    )
    .unwrap();

    assert_eq!(polls, 3);
    assert_eq!(polled.get(), 3);
    assert_eq!(rendered.get(), 3);
}

#[test]
fn test_watch_interval_is_clamped() {
    let (tx, rx) = channel::bounded(1);
    let polled = Cell::new(0);
    let started = Instant::now();

    watch(
        Duration::ZERO,
        &rx,
        || {
            polled.set(polled.get() + 1);
            if polled.get() == 2 {
                tx.send(()).unwrap();
            }
            Ok(Response::default())
        },
        |_| {},
    )
    .unwrap();

    assert!(started.elapsed() >= MIN_INTERVAL);
}

#[test]
fn test_watch_stop_interrupts_wait() {
    let (tx, rx) = channel::bounded(1);
    let stopper = thread::spawn(move || {
        thread::sleep(Duration::from_millis(100));
        tx.send(()).unwrap();
    });
    let started = Instant::now();

    let polls = watch(Duration::from_secs(30), &rx, || Ok(Response::default()), |_| {}).unwrap();

    stopper.join().unwrap();
    assert_eq!(polls, 1);
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[test]
fn test_watch_returns_poll_error() {
    let (_tx, rx) = channel::bounded::<()>(1);

    let err = watch(
        Duration::from_millis(1),
        &rx,
        || Err(TelemetryError::InvalidArgument("boom".to_string())),
        |_| {},
    )
    .unwrap_err();

    assert!(matches!(err, TelemetryError::InvalidArgument(_)));
}

#[test]
fn test_watch_against_agent() {
    let agent = MockAgent::replying(2, b"{\"ok\":true,\"cpu_usage_pct\":1.0}\n");
    let client = agent.client();
    let (tx, rx) = channel::bounded(1);
    let mut tables = Vec::new();

    let polls = watch(
        Duration::from_millis(1),
        &rx,
        || client.get_metrics(),
        |response| {
            tables.push(metrics_table(response));
            if tables.len() == 2 {
                let _ = tx.try_send(());
            }
        },
    )
    .unwrap();

    assert_eq!(polls, 2);
    assert_eq!(row(&tables[1], "cpu_usage_pct"), Some("1.0"));
    assert_eq!(agent.finish(), vec!["GET\n", "GET\n"]);
}
