//! Cross-origin support, which a browser-hosted client depends on.
//!
//! A native client is not subject to CORS, so these checks look at the
//! headers directly instead of relying on a browser to reject the exchange.

use super::expect::ensure;
use super::{Scenario, Setup};
use crate::client::BackendClient;
use crate::error::ConformanceError;
use crate::http::{HttpMethod, HttpResponse};
use crate::types::NewTodo;

type Outcome = Result<(), ConformanceError>;

const GROUP: &str = "cross-origin support";

/// Origin the checks pretend to be served from.
const SUITE_ORIGIN: &str = "http://todo-tag-conformance.invalid";

pub(super) fn scenarios() -> Vec<Scenario> {
    vec![
        Scenario::new(
            GROUP,
            "answers a preflight for a JSON POST to the todo root",
            Setup::None,
            preflight_collection_root,
        ),
        Scenario::new(
            GROUP,
            "answers a preflight for a JSON PATCH to a todo's url",
            Setup::ClearTodos,
            preflight_resource_url,
        ),
        Scenario::new(
            GROUP,
            "allows any origin on a plain GET",
            Setup::None,
            simple_request_allows_origin,
        ),
    ]
}

fn ensure_allows_origin(request: &str, response: &HttpResponse) -> Outcome {
    let allowed = response.header("access-control-allow-origin");
    ensure(matches!(allowed, Some("*") | Some(SUITE_ORIGIN)), || {
        format!(
            "expected `access-control-allow-origin: *` on {request}, but it was {}",
            allowed.unwrap_or("missing")
        )
    })
}

fn ensure_allows_content_type(request: &str, response: &HttpResponse) -> Outcome {
    let allowed = response
        .header("access-control-allow-headers")
        .map(str::to_ascii_lowercase);
    let ok = allowed.as_deref().is_some_and(|h| {
        h.trim() == "*" || h.split(',').any(|name| name.trim() == "content-type")
    });
    ensure(ok, || {
        format!(
            "expected `access-control-allow-headers` to list Content-Type on {request}, \
             but it was {}",
            allowed.as_deref().unwrap_or("missing")
        )
    })
}

fn preflight_collection_root(client: &BackendClient) -> Outcome {
    let todos = client.todos();
    let response = client.preflight(todos.root(), SUITE_ORIGIN, HttpMethod::Post)?;
    ensure_allows_origin("the preflight", &response)?;
    ensure_allows_content_type("the preflight", &response)
}

fn preflight_resource_url(client: &BackendClient) -> Outcome {
    let created = client.todos().create(&NewTodo::titled("blah"))?;
    let response = client.preflight(&created.url, SUITE_ORIGIN, HttpMethod::Patch)?;
    ensure_allows_origin("the preflight", &response)?;
    ensure_allows_content_type("the preflight", &response)
}

fn simple_request_allows_origin(client: &BackendClient) -> Outcome {
    let todos = client.todos();
    let response = client.get_with_origin(todos.root(), SUITE_ORIGIN)?;
    ensure_allows_origin("a GET", &response)
}
