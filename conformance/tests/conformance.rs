//! The whole contract, over real HTTP, against the reference backend.

mod common;

use todo_tag_conformance::{
    run_suite, BackendClient, NewTag, NewTodo, ResourceId, TodoPatch,
};

#[test]
fn reference_backend_passes_every_scenario() {
    let client = BackendClient::new(&common::spawn_reference()).unwrap();
    let report = run_suite(&client, None);
    assert!(report.is_success(), "{report}");
    assert!(report.passed() > 40, "{report}");
}

#[test]
fn group_filter_runs_only_matching_groups() {
    let client = BackendClient::new(&common::spawn_reference()).unwrap();
    let report = run_suite(&client, Some("tag basics"));
    assert_eq!(report.outcomes.len(), 4);
    assert!(report.outcomes.iter().all(|o| o.group == "tag basics"));
    assert!(report.is_success(), "{report}");
}

#[test]
fn client_lifecycle() {
    let client = BackendClient::new(&common::spawn_reference()).unwrap();
    let todos = client.todos();
    let tags = client.tags();

    // Empty to start with.
    assert!(todos.list_all().unwrap().is_empty());

    let todo = todos.create(&NewTodo::titled("walk the dog").with_order(3)).unwrap();
    assert!(!todo.completed);
    assert_eq!(todo.order, Some(3));
    assert!(matches!(todo.id, ResourceId::Text(_)));

    let fetched = todos.fetch_by_id(&todo.id).unwrap();
    assert_eq!(fetched.url, todo.url);

    let patch = TodoPatch {
        completed: Some(true),
        ..TodoPatch::default()
    };
    let patched = todos.update(&todo.url, &patch).unwrap();
    assert!(patched.completed);
    assert_eq!(patched.title, "walk the dog");

    // Associate from the todo side, read from both sides.
    let tag = tags.create(&NewTag::titled("chores")).unwrap();
    client.associate(&todo.url, &tag.id).unwrap();
    let on_todo = client.list_associated_tags(&todo.url).unwrap();
    assert_eq!(on_todo.len(), 1);
    assert_eq!(on_todo[0].id, tag.id);
    let on_tag = client.list_associated_todos(&tag.url).unwrap();
    assert_eq!(on_tag.len(), 1);
    assert_eq!(on_tag[0].title, "walk the dog");

    client.disassociate(&todo.url, &tag.id).unwrap();
    assert!(client.list_associated_tags(&todo.url).unwrap().is_empty());

    todos.delete_one(&todo.url).unwrap();
    assert!(todos.list_all().unwrap().is_empty());
    assert_eq!(tags.list_all().unwrap().len(), 1);

    tags.delete_all().unwrap();
    assert!(tags.list_all().unwrap().is_empty());
}
