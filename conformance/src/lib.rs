//! Conformance suite for Todo/Tag backends.
//!
//! # Overview
//! Given the root url of a backend, the suite drives it over HTTP through a
//! fixed catalogue of scenarios and reports which parts of the contract hold.
//! The backend is a black box; only its HTTP behaviour is checked.
//!
//! # Design
//! - Requests and responses are plain data (`HttpRequest` / `HttpResponse`).
//!   A [`Transport`] performs the round trip, so everything above it can be
//!   tested against scripted responses.
//! - [`BackendClient`] turns the contract's operations into requests and
//!   decodes the answers into [`Todo`] and [`Tag`].
//! - [`suite`] holds the scenarios; [`runner`] executes them serially and
//!   collects a [`SuiteReport`].
//! - Wire types are defined independently from the reference backend;
//!   the integration tests catch schema drift.

pub mod client;
pub mod config;
pub mod decode;
pub mod error;
pub mod http;
pub mod runner;
pub mod suite;
pub mod transport;
pub mod types;

pub use client::{BackendClient, Collection};
pub use config::SuiteConfig;
pub use decode::DecodeError;
pub use error::ConformanceError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use runner::{run_suite, ScenarioOutcome, SuiteReport};
pub use transport::{Transport, UreqTransport, REQUEST_TIMEOUT};
pub use types::{NewTag, NewTodo, Resource, ResourceId, Tag, TagPatch, Todo, TodoPatch};

/// Initializes the tracing subscriber. `RUST_LOG` takes precedence over `level`.
pub fn init_logging(level: &str) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("todo_tag_conformance={level}")));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}
