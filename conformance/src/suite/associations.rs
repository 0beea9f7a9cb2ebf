//! Many-to-many association between todos and tags, seen from both sides.

use super::expect::{ensure, ensure_eq, ensure_len, first, present};
use super::{Scenario, Setup};
use crate::client::BackendClient;
use crate::error::ConformanceError;
use crate::types::{NewTag, NewTodo, Tag, Todo};

type Outcome = Result<(), ConformanceError>;

const TODOS_TAGS: &str = "todos' tags";
const TAGS_TODOS: &str = "tags' todos";

pub(super) fn todos_tags() -> Vec<Scenario> {
    vec![
        Scenario::new(
            TODOS_TAGS,
            "can get a list of tags for each todo",
            Setup::ClearBoth,
            new_todo_has_no_tags,
        ),
        Scenario::new(
            TODOS_TAGS,
            "can associate a tag to a todo and find the tag id in the todo",
            Setup::ClearBoth,
            tag_id_on_todo,
        ),
        Scenario::new(
            TODOS_TAGS,
            "can associate a tag to a todo and retrieve the tag list by todo",
            Setup::ClearBoth,
            tag_list_by_todo,
        ),
        Scenario::new(
            TODOS_TAGS,
            "can associate tags to a todo and remove one tag association",
            Setup::ClearBoth,
            remove_one_association,
        ),
        Scenario::new(
            TODOS_TAGS,
            "can associate tags to a todo and remove all tag associations",
            Setup::ClearBoth,
            remove_all_associations,
        ),
        Scenario::new(
            TODOS_TAGS,
            "removing all tag associations keeps the tag and the todo",
            Setup::ClearBoth,
            removal_keeps_resources,
        ),
    ]
}

pub(super) fn tags_todos() -> Vec<Scenario> {
    vec![
        Scenario::new(
            TAGS_TODOS,
            "can get a list of todos for each tag",
            Setup::ClearBoth,
            new_tag_has_no_todos,
        ),
        Scenario::new(
            TAGS_TODOS,
            "can associate a todo to a tag and retrieve the todo list by tag",
            Setup::ClearBoth,
            todo_list_by_tag,
        ),
        Scenario::new(
            TAGS_TODOS,
            "an associated todo shows up in the tag's todos",
            Setup::ClearBoth,
            todo_id_on_tag,
        ),
    ]
}

/// Creates a todo and a tag, then associates the tag to the todo.
fn associated_pair(
    client: &BackendClient,
    todo_title: &str,
    tag_title: &str,
) -> Result<(Todo, Tag), ConformanceError> {
    let todo = client.todos().create(&NewTodo::titled(todo_title))?;
    let tag = client.tags().create(&NewTag::titled(tag_title))?;
    client.associate(&todo.url, &tag.id)?;
    Ok((todo, tag))
}

fn new_todo_has_no_tags(client: &BackendClient) -> Outcome {
    let todos = client.todos();
    let created = todos.create(&NewTodo::titled("blah"))?;
    let fetched = todos.fetch(&created.url)?;
    ensure_len("the todo's tags", present("the todo's tags", &fetched.tags)?, 0)
}

fn tag_id_on_todo(client: &BackendClient) -> Outcome {
    let (todo, tag) = associated_pair(client, "base todo", "associated tag")?;
    let fetched = client.todos().fetch(&todo.url)?;
    let tags = present("the todo's tags", &fetched.tags)?;
    ensure_len("the todo's tags", tags, 1)?;
    ensure_eq("the associated tag id", &tag.id, &first("the todo's tags", tags)?.id)
}

fn tag_list_by_todo(client: &BackendClient) -> Outcome {
    let (todo, _) = associated_pair(client, "base todo", "joined tag")?;
    let tags = client.list_associated_tags(&todo.url)?;
    ensure_len("the todo's tag list", &tags, 1)?;
    let listed = first("the todo's tag list", &tags)?;
    ensure_eq("the associated tag title", "joined tag", &listed.title)
}

fn remove_one_association(client: &BackendClient) -> Outcome {
    let (todo, removed) = associated_pair(client, "base todo", "associated tag")?;
    let kept = client.tags().create(&NewTag::titled("bloh"))?;
    client.associate(&todo.url, &kept.id)?;
    client.disassociate(&todo.url, &removed.id)?;

    let tags = client.list_associated_tags(&todo.url)?;
    ensure_len("the todo's tag list", &tags, 1)?;
    ensure_eq("the remaining tag id", &kept.id, &first("the todo's tag list", &tags)?.id)
}

fn remove_all_associations(client: &BackendClient) -> Outcome {
    let (todo, _) = associated_pair(client, "base todo", "associated tag")?;
    client.disassociate_all(&todo.url)?;
    ensure_len("the todo's tag list", &client.list_associated_tags(&todo.url)?, 0)
}

fn removal_keeps_resources(client: &BackendClient) -> Outcome {
    let (todo, tag) = associated_pair(client, "base todo", "associated tag")?;
    client.disassociate_all(&todo.url)?;

    let tags = client.tags().list_all()?;
    ensure(tags.iter().any(|t| t.id == tag.id), || {
        format!("expected tag {} to survive removal of its associations", tag.id)
    })?;
    let fetched = client.todos().fetch(&todo.url)?;
    ensure_eq("the todo's title", "base todo", &fetched.title)
}

fn new_tag_has_no_todos(client: &BackendClient) -> Outcome {
    let tags = client.tags();
    let created = tags.create(&NewTag::titled("bloh"))?;
    let fetched = tags.fetch(&created.url)?;
    ensure_len("the tag's todos", present("the tag's todos", &fetched.todos)?, 0)
}

fn todo_list_by_tag(client: &BackendClient) -> Outcome {
    let (_, tag) = associated_pair(client, "joined todo", "associated tag")?;
    let todos = client.list_associated_todos(&tag.url)?;
    ensure_len("the tag's todo list", &todos, 1)?;
    let listed = first("the tag's todo list", &todos)?;
    ensure_eq("the associated todo title", "joined todo", &listed.title)
}

fn todo_id_on_tag(client: &BackendClient) -> Outcome {
    let (todo, tag) = associated_pair(client, "base todo", "associated tag")?;
    let fetched = client.tags().fetch(&tag.url)?;
    let todos = present("the tag's todos", &fetched.todos)?;
    ensure_len("the tag's todos", todos, 1)?;
    ensure_eq("the associated todo id", &todo.id, &first("the tag's todos", todos)?.id)
}
