//! Wire representations of todos, tags and their payloads.
//!
//! # Design
//! Backends under test choose their own id scheme, so ids are kept as either a
//! JSON number or a JSON string. The association lists are optional: a
//! backend that has not implemented tags yet can still be run through the
//! basic todo scenarios, and the association scenarios assert the lists exist.

use std::fmt;

use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// A server-assigned identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourceId {
    Number(i64),
    Text(String),
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceId::Number(n) => write!(f, "{n}"),
            ResourceId::Text(s) => f.write_str(s),
        }
    }
}

/// Entry of a `tags` or `todos` association list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceRef {
    pub id: ResourceId,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Todo {
    pub id: ResourceId,
    pub url: String,
    pub title: String,
    pub completed: bool,
    #[serde(default)]
    pub order: Option<i64>,
    #[serde(default)]
    pub tags: Option<Vec<ResourceRef>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub id: ResourceId,
    pub url: String,
    pub title: String,
    #[serde(default)]
    pub todos: Option<Vec<ResourceRef>>,
}

/// Payload for creating a todo. Only `title` is required on the wire.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewTodo {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
}

impl NewTodo {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_order(mut self, order: i64) -> Self {
        self.order = Some(order);
        self
    }
}

/// Partial update for a todo. Omitted fields are not sent and must be left
/// untouched by the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TodoPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewTag {
    pub title: String,
}

impl NewTag {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TagPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Body posted to a todo's tag sub-collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagLink {
    pub id: ResourceId,
}

/// A resource type served under its own collection root.
pub trait Resource: DeserializeOwned {
    /// Path segment of the collection under the API root.
    const COLLECTION: &'static str;
    /// Name used in error messages.
    const NAME: &'static str;
    /// Name used in error messages for a list of this resource.
    const LIST_NAME: &'static str;

    type Create: Serialize;
    type Update: Serialize;

    fn id(&self) -> &ResourceId;
    fn url(&self) -> &str;
    fn title(&self) -> &str;
}

impl Resource for Todo {
    const COLLECTION: &'static str = "todos";
    const NAME: &'static str = "todo";
    const LIST_NAME: &'static str = "list of todos";

    type Create = NewTodo;
    type Update = TodoPatch;

    fn id(&self) -> &ResourceId {
        &self.id
    }

    fn url(&self) -> &str {
        &self.url
    }

    fn title(&self) -> &str {
        &self.title
    }
}

impl Resource for Tag {
    const COLLECTION: &'static str = "tags";
    const NAME: &'static str = "tag";
    const LIST_NAME: &'static str = "list of tags";

    type Create = NewTag;
    type Update = TagPatch;

    fn id(&self) -> &ResourceId {
        &self.id
    }

    fn url(&self) -> &str {
        &self.url
    }

    fn title(&self) -> &str {
        &self.title
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_and_string_ids_both_decode() {
        let numeric: Todo = serde_json::from_str(
            r#"{"id":7,"url":"http://localhost/todos/7","title":"a","completed":false}"#,
        )
        .unwrap();
        assert_eq!(numeric.id, ResourceId::Number(7));
        assert_eq!(numeric.id.to_string(), "7");

        let text: Tag = serde_json::from_str(
            r#"{"id":"a1b2","url":"/tags/a1b2","title":"b","todos":[]}"#,
        )
        .unwrap();
        assert_eq!(text.id, ResourceId::Text("a1b2".to_string()));
        assert_eq!(text.id.to_string(), "a1b2");
    }

    #[test]
    fn association_lists_are_optional() {
        let todo: Todo =
            serde_json::from_str(r#"{"id":1,"url":"/todos/1","title":"a","completed":true}"#)
                .unwrap();
        assert!(todo.tags.is_none());
        assert!(todo.order.is_none());
    }

    #[test]
    fn association_entries_need_only_an_id() {
        let todo: Todo = serde_json::from_str(
            r#"{"id":1,"url":"/todos/1","title":"a","completed":false,"tags":[{"id":2}]}"#,
        )
        .unwrap();
        let tags = todo.tags.unwrap();
        assert_eq!(tags[0].id, ResourceId::Number(2));
        assert!(tags[0].title.is_none());
    }

    #[test]
    fn todo_without_url_is_rejected() {
        let result: Result<Todo, _> =
            serde_json::from_str(r#"{"id":1,"title":"a","completed":false}"#);
        assert!(result.is_err());
    }

    #[test]
    fn new_todo_sends_only_title_by_default() {
        let json = serde_json::to_value(NewTodo::titled("walk the dog")).unwrap();
        assert_eq!(json, serde_json::json!({ "title": "walk the dog" }));
    }

    #[test]
    fn new_todo_with_order() {
        let json = serde_json::to_value(NewTodo::titled("blah").with_order(523)).unwrap();
        assert_eq!(json, serde_json::json!({ "title": "blah", "order": 523 }));
    }

    #[test]
    fn patch_omits_absent_fields() {
        let patch = TodoPatch {
            completed: Some(true),
            ..TodoPatch::default()
        };
        let json = serde_json::to_value(patch).unwrap();
        assert_eq!(json, serde_json::json!({ "completed": true }));
    }

    #[test]
    fn tag_link_keeps_id_type() {
        let json = serde_json::to_value(TagLink {
            id: ResourceId::Number(12),
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({ "id": 12 }));
    }
}
