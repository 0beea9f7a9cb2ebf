//! Todo-only scenarios: completedness, merge semantics of PATCH, and ordering.

use super::expect::{ensure_eq, ensure_len, first};
use super::{Scenario, Setup};
use crate::client::BackendClient;
use crate::error::ConformanceError;
use crate::types::{NewTodo, TodoPatch};

type Outcome = Result<(), ConformanceError>;

const ORDER_GROUP: &str = "tracking todo order";

pub(super) fn storing(group: &'static str) -> Vec<Scenario> {
    vec![Scenario::new(
        group,
        "sets up a new todo as initially not completed",
        Setup::ClearTodos,
        initially_not_completed,
    )]
}

pub(super) fn existing(group: &'static str) -> Vec<Scenario> {
    vec![
        Scenario::new(
            group,
            "can change the todo's completedness by PATCHing to the todo's url",
            Setup::ClearTodos,
            patch_completed,
        ),
        Scenario::new(
            group,
            "changes to title and completedness are persisted and show up when re-fetching",
            Setup::ClearTodos,
            changes_persisted,
        ),
        Scenario::new(
            group,
            "PATCHing one field leaves the other fields unchanged",
            Setup::ClearTodos,
            patch_merges,
        ),
    ]
}

pub(super) fn ordering() -> Vec<Scenario> {
    vec![
        Scenario::new(
            ORDER_GROUP,
            "can create a todo with an order field",
            Setup::ClearTodos,
            create_with_order,
        ),
        Scenario::new(
            ORDER_GROUP,
            "can PATCH a todo to change its order",
            Setup::ClearTodos,
            patch_order,
        ),
        Scenario::new(
            ORDER_GROUP,
            "remembers changes to a todo's order",
            Setup::ClearTodos,
            order_persisted,
        ),
    ]
}

fn initially_not_completed(client: &BackendClient) -> Outcome {
    let todos = client.todos();
    let created = todos.create(&NewTodo::titled("blah"))?;
    ensure_eq("completed on the created todo", false, created.completed)?;
    let all = todos.list_all()?;
    ensure_eq("completed on the listed todo", false, first("list of todos", &all)?.completed)
}

fn patch_completed(client: &BackendClient) -> Outcome {
    let todos = client.todos();
    let created = todos.create(&NewTodo::titled("blah"))?;
    let patch = TodoPatch {
        completed: Some(true),
        ..TodoPatch::default()
    };
    let patched = todos.update(&created.url, &patch)?;
    ensure_eq("completed on the patched todo", true, patched.completed)?;
    let refetched = todos.fetch(&patched.url)?;
    ensure_eq("completed on the re-fetched todo", true, refetched.completed)
}

fn changes_persisted(client: &BackendClient) -> Outcome {
    let todos = client.todos();
    let created = todos.create(&NewTodo::titled("blah"))?;
    let patch = TodoPatch {
        title: Some("changed title".to_string()),
        completed: Some(true),
        order: None,
    };
    let patched = todos.update(&created.url, &patch)?;

    let refetched = todos.fetch(&patched.url)?;
    ensure_eq("completed on the re-fetched todo", true, refetched.completed)?;
    ensure_eq("the re-fetched title", "changed title", &refetched.title)?;

    let all = todos.list_all()?;
    ensure_len("list of todos", &all, 1)?;
    let listed = first("list of todos", &all)?;
    ensure_eq("completed on the listed todo", true, listed.completed)?;
    ensure_eq("the listed title", "changed title", &listed.title)
}

fn patch_merges(client: &BackendClient) -> Outcome {
    let todos = client.todos();
    let created = todos.create(&NewTodo::titled("keep me").with_order(7))?;
    let patch = TodoPatch {
        completed: Some(true),
        ..TodoPatch::default()
    };
    let patched = todos.update(&created.url, &patch)?;
    ensure_eq("the patched todo's title", "keep me", &patched.title)?;
    ensure_eq("the patched todo's order", Some(7_i64), patched.order)?;
    ensure_eq("the patched todo's id", &created.id, &patched.id)?;

    let refetched = todos.fetch(&created.url)?;
    ensure_eq("the re-fetched title", "keep me", &refetched.title)?;
    ensure_eq("the re-fetched order", Some(7_i64), refetched.order)?;
    ensure_eq("completed on the re-fetched todo", true, refetched.completed)
}

fn create_with_order(client: &BackendClient) -> Outcome {
    let created = client
        .todos()
        .create(&NewTodo::titled("blah").with_order(523))?;
    ensure_eq("the created todo's order", Some(523_i64), created.order)
}

fn patch_order(client: &BackendClient) -> Outcome {
    let todos = client.todos();
    let created = todos.create(&NewTodo::titled("blah").with_order(10))?;
    let patch = TodoPatch {
        order: Some(95),
        ..TodoPatch::default()
    };
    let patched = todos.update(&created.url, &patch)?;
    ensure_eq("the patched todo's order", Some(95_i64), patched.order)
}

fn order_persisted(client: &BackendClient) -> Outcome {
    let todos = client.todos();
    let created = todos.create(&NewTodo::titled("blah").with_order(10))?;
    let patch = TodoPatch {
        order: Some(95),
        ..TodoPatch::default()
    };
    let patched = todos.update(&created.url, &patch)?;
    let refetched = todos.fetch(&patched.url)?;
    ensure_eq("the re-fetched order", Some(95_i64), refetched.order)
}
