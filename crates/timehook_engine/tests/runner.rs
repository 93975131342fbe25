mod common;

use std::sync::Once;
use std::time::Duration;

use common::*;
use pretty_assertions::assert_eq;
use timehook_core::{Line, ProcessOutcome, CONNECTING_MESSAGE};
use timehook_engine::{
    spawn_run, RegistrationRequest, RunEvent, RunSettings, TransportError, TransportFailure,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(timehook_logging::initialize_for_tests);
}

fn request() -> RegistrationRequest {
    RegistrationRequest::new("https://the-domain.com", r#"{"foo" : "bar"}"#, 5)
}

fn progress_texts(lines: &[Line]) -> Vec<&str> {
    lines
        .iter()
        .filter(|line| !line.is_error())
        .map(Line::text)
        .collect()
}

#[tokio::test]
async fn full_run_streams_milestones_and_succeeds() {
    init_logging();
    let transport = ScriptedTransport::new(vec![
        registered_success(),
        state_registered(),
        state_awaiting(),
        state_sending(),
        state_succeeded(),
    ]);

    let handle = spawn_run(gateway(&transport), request(), fast_settings());
    let (lines, outcome) = handle.collect().await;

    assert_eq!(
        lines,
        vec![
            Line::progress(CONNECTING_MESSAGE),
            Line::progress("\n[0s] Webhook scheduled at 2018-01-29T12:32:55+0000"),
            Line::progress("."),
            Line::progress("\n[30s] Sending webhook at 2018-01-29T12:32:55+0000"),
            Line::progress("\n[31s] Webhook succeeded at 2018-01-29T12:32:56+0000\n\n"),
        ]
    );
    assert_eq!(outcome, ProcessOutcome::success());
    assert_eq!(transport.remaining(), 0);

    let requests = transport.requests();
    assert_eq!(requests.len(), 5);
    for poll in &requests[1..] {
        assert_eq!(
            poll.url.as_str(),
            format!("https://api.timehook.io/states/{WEBHOOK_ID}")
        );
        assert_eq!(poll.headers.get("authorization").unwrap(), "Bearer api-key");
    }
}

#[tokio::test]
async fn finished_event_is_last_and_the_stream_closes() {
    init_logging();
    let transport = ScriptedTransport::new(vec![registered_success(), state_failed()]);

    let mut handle = spawn_run(gateway(&transport), request(), fast_settings());
    let mut events = Vec::new();
    while let Some(event) = handle.next_event().await {
        events.push(event);
    }

    assert_eq!(
        events.last(),
        Some(&RunEvent::Finished(ProcessOutcome::failure()))
    );
    let finished = events
        .iter()
        .filter(|event| matches!(event, RunEvent::Finished(_)))
        .count();
    assert_eq!(finished, 1);
    assert!(handle.next_event().await.is_none());
}

#[tokio::test]
async fn unauthorized_first_poll_stops_polling() {
    init_logging();
    // The extra state must never be requested.
    let transport =
        ScriptedTransport::new(vec![registered_success(), unauthorized(), state_succeeded()]);

    let (lines, outcome) = spawn_run(gateway(&transport), request(), fast_settings())
        .collect()
        .await;

    let errors: Vec<&Line> = lines.iter().filter(|line| line.is_error()).collect();
    assert_eq!(
        errors,
        vec![&Line::error(
            "\n[ERROR] server responded 401 unauthorized request"
        )]
    );
    assert_eq!(outcome, ProcessOutcome::failure());
    assert_eq!(transport.requests().len(), 2);
    assert_eq!(transport.remaining(), 1);
}

#[tokio::test]
async fn rate_limit_mid_run_adds_one_tick_and_keeps_polling() {
    init_logging();
    let transport = ScriptedTransport::new(vec![
        registered_success(),
        state_registered(),
        too_many_requests(),
        state_sending(),
        state_succeeded(),
    ]);

    let (lines, outcome) = spawn_run(gateway(&transport), request(), fast_settings())
        .collect()
        .await;

    assert_eq!(
        progress_texts(&lines),
        vec![
            CONNECTING_MESSAGE,
            "\n[0s] Webhook scheduled at 2018-01-29T12:32:55+0000",
            ".",
            "\n[30s] Sending webhook at 2018-01-29T12:32:55+0000",
            "\n[31s] Webhook succeeded at 2018-01-29T12:32:56+0000\n\n",
        ]
    );
    assert!(lines.iter().all(|line| !line.is_error()));
    assert_eq!(outcome, ProcessOutcome::success());
}

#[tokio::test]
async fn transport_failure_while_polling_is_reported_and_retried() {
    init_logging();
    let transport = ScriptedTransport::new(vec![
        registered_success(),
        Scripted::Failure(TransportError::new(
            TransportFailure::Timeout,
            "operation timed out",
        )),
        state_succeeded(),
    ]);

    let (lines, outcome) = spawn_run(gateway(&transport), request(), fast_settings())
        .collect()
        .await;

    assert_eq!(
        lines[1],
        Line::error("\n[ERROR] can not execute request: timeout: operation timed out")
    );
    assert_eq!(outcome, ProcessOutcome::success());
    assert_eq!(transport.remaining(), 0);
}

#[tokio::test]
async fn registration_failure_ends_the_run_without_polling() {
    init_logging();
    let transport = ScriptedTransport::new(vec![too_many_requests()]);

    let (lines, outcome) = spawn_run(gateway(&transport), request(), fast_settings())
        .collect()
        .await;

    assert_eq!(
        lines,
        vec![
            Line::progress(CONNECTING_MESSAGE),
            Line::error("\n[ERROR] server responded 429 too many requests"),
        ]
    );
    assert_eq!(outcome, ProcessOutcome::failure());
    assert_eq!(transport.requests().len(), 1);
}

#[tokio::test]
async fn unknown_status_ends_the_run() {
    init_logging();
    let transport = ScriptedTransport::new(vec![
        registered_success(),
        Scripted::Response(timehook_engine::ApiResponse::new(
            200,
            format!(r#"{{"id":"{WEBHOOK_ID}","status":"paused"}}"#),
        )),
    ]);

    let (lines, outcome) = spawn_run(gateway(&transport), request(), fast_settings())
        .collect()
        .await;

    assert_eq!(lines.last(), Some(&Line::progress("\nUnknown status paused")));
    assert_eq!(outcome, ProcessOutcome::failure());
}

#[tokio::test]
async fn cancel_is_honoured_at_the_next_tick() {
    init_logging();
    let transport = ScriptedTransport::new(vec![registered_success()]);
    let settings = RunSettings {
        poll_interval: Duration::from_secs(3600),
    };

    let mut handle = spawn_run(gateway(&transport), request(), settings);
    assert_eq!(
        handle.next_event().await,
        Some(RunEvent::Line(Line::progress(CONNECTING_MESSAGE)))
    );
    handle.cancel();
    let (lines, outcome) = handle.collect().await;

    assert_eq!(lines, vec![Line::error("\n[ERROR] run cancelled")]);
    assert_eq!(outcome, ProcessOutcome::failure());
    assert_eq!(transport.requests().len(), 1);
}
