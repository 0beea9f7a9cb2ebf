//! Failure classification over real HTTP, against deliberately broken servers.

mod common;

use std::error::Error;
use std::net::TcpListener;
use std::time::Duration;

use axum::{http::StatusCode, routing::get, Router};
use todo_tag_conformance::{
    run_suite, BackendClient, ConformanceError, DecodeError, HttpMethod, UreqTransport,
};

/// An API root nothing listens on.
fn closed_port() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

#[test]
fn unreachable_backend_explains_cross_origin_requirements() {
    let client = BackendClient::new(&closed_port()).unwrap();
    let err = client.todos().list_all().unwrap_err();

    match &err {
        ConformanceError::Unreachable { method, url, .. } => {
            assert_eq!(*method, HttpMethod::Get);
            assert!(url.ends_with("/todos/"));
        }
        other => panic!("expected Unreachable, got {other:?}"),
    }
    let message = err.to_string();
    assert!(message.contains("access-control-allow-origin"));
    assert!(message.contains("OPTIONS"));
    assert!(err.source().is_some());
}

#[test]
fn error_status_is_an_http_failure() {
    let router = Router::new().route(
        "/todos/",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "kaboom\n") }),
    );
    let client = BackendClient::new(&common::spawn(router)).unwrap();
    let err = client.todos().list_all().unwrap_err();

    match &err {
        ConformanceError::HttpFailure {
            method,
            status,
            status_text,
            body,
            ..
        } => {
            assert_eq!(*method, HttpMethod::Get);
            assert_eq!(*status, 500);
            assert_eq!(status_text, "Internal Server Error");
            assert_eq!(body, "kaboom");
        }
        other => panic!("expected HttpFailure, got {other:?}"),
    }
    assert!(err
        .to_string()
        .contains("FAILED\n\n500: Internal Server Error (kaboom)"));
}

#[test]
fn error_status_with_binary_body_is_still_an_http_failure() {
    let router = Router::new().route(
        "/todos/",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, vec![0xFF_u8, 0xFE, b'x']) }),
    );
    let client = BackendClient::new(&common::spawn(router)).unwrap();
    let err = client.todos().list_all().unwrap_err();

    match &err {
        ConformanceError::HttpFailure { status, body, .. } => {
            assert_eq!(*status, 500);
            assert_eq!(body, "\u{FFFD}\u{FFFD}x");
        }
        other => panic!("expected HttpFailure, got {other:?}"),
    }
}

#[test]
fn invalid_utf8_in_a_success_body_reaches_the_decoder() {
    // A Latin-1 "é" inside an otherwise valid JSON document.
    let router = Router::new().route(
        "/todos/",
        get(|| async { b"[{\"title\":\"caf\xE9\"}]".to_vec() }),
    );
    let client = BackendClient::new(&common::spawn(router)).unwrap();
    let err = client.todos().list_all().unwrap_err();

    assert!(
        matches!(err, ConformanceError::Shape { expected: "list of todos", .. }),
        "expected Shape, got {err:?}"
    );
}

#[test]
fn slow_backend_times_out_as_unreachable() {
    let router = Router::new().route(
        "/todos/",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(3)).await;
            "[]"
        }),
    );
    let transport = UreqTransport::with_timeout(Duration::from_millis(300));
    let api_root = common::spawn(router);
    let client = BackendClient::with_transport(&api_root, Box::new(transport)).unwrap();
    let err = client.todos().list_all().unwrap_err();

    assert!(
        matches!(err, ConformanceError::Unreachable { method: HttpMethod::Get, .. }),
        "expected Unreachable, got {err:?}"
    );
}

#[test]
fn non_json_body_is_a_decode_error() {
    let router = Router::new().route("/tags/", get(|| async { "<html>tags</html>" }));
    let client = BackendClient::new(&common::spawn(router)).unwrap();
    let err = client.tags().list_all().unwrap_err();

    let ConformanceError::Decode { source, .. } = &err else {
        panic!("expected Decode, got {err:?}");
    };
    assert_eq!(source.to_string(), "Could not parse response as JSON");
    let cause = err.source().unwrap();
    assert!(cause.downcast_ref::<DecodeError>().is_some());
}

#[test]
fn missing_routes_fail_the_suite() {
    // Serves an empty todo list and nothing else.
    let router = Router::new().route("/todos/", get(|| async { "[]" }));
    let client = BackendClient::new(&common::spawn(router)).unwrap();
    let report = run_suite(&client, Some("todo basics"));

    let passed: Vec<_> = report
        .outcomes
        .iter()
        .filter(|o| o.passed())
        .map(|o| o.title)
        .collect();
    assert_eq!(passed, ["the todo endpoint responds to a GET on the todos"]);
    assert_eq!(report.failed(), 3);
    assert!(report.to_string().ends_with("1 passing, 3 failing\n"));
}
