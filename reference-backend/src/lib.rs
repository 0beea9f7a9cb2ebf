//! In-memory Todo/Tag backend used as a conformance target.
//!
//! Serves the todo and tag collections, their individual resources, and the
//! many-to-many association sub-collections at `/todos/{id}/tags/` and
//! `/tags/{id}/todos/`. Resource urls are root-relative. Nothing is persisted.

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use axum::{
    extract::{Path, State},
    http::{header, Method, StatusCode},
    routing::{delete, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use uuid::Uuid;

/// Wire representation of a todo.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Todo {
    pub id: Uuid,
    pub url: String,
    pub title: String,
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    pub tags: Vec<TagSummary>,
}

/// Wire representation of a tag.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Tag {
    pub id: Uuid,
    pub url: String,
    pub title: String,
    pub todos: Vec<TodoSummary>,
}

/// Entry of a todo's `tags` list.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TagSummary {
    pub id: Uuid,
    pub url: String,
    pub title: String,
}

/// Entry of a tag's `todos` list.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TodoSummary {
    pub id: Uuid,
    pub url: String,
    pub title: String,
    pub completed: bool,
}

#[derive(Deserialize)]
pub struct CreateTodo {
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    pub order: Option<i64>,
}

#[derive(Deserialize)]
pub struct UpdateTodo {
    pub title: Option<String>,
    pub completed: Option<bool>,
    pub order: Option<i64>,
}

#[derive(Deserialize)]
pub struct CreateTag {
    pub title: String,
}

#[derive(Deserialize)]
pub struct UpdateTag {
    pub title: Option<String>,
}

/// Body of a POST to `/todos/{id}/tags/`.
#[derive(Deserialize)]
pub struct TagLink {
    pub id: Uuid,
}

struct TodoRecord {
    seq: u64,
    title: String,
    completed: bool,
    order: Option<i64>,
}

struct TagRecord {
    seq: u64,
    title: String,
}

/// Both collections plus the association set, keyed `(todo, tag)`.
#[derive(Default)]
pub struct Store {
    next_seq: u64,
    todos: HashMap<Uuid, TodoRecord>,
    tags: HashMap<Uuid, TagRecord>,
    links: HashSet<(Uuid, Uuid)>,
}

pub type Db = Arc<RwLock<Store>>;

fn todo_url(id: Uuid) -> String {
    format!("/todos/{id}")
}

fn tag_url(id: Uuid) -> String {
    format!("/tags/{id}")
}

impl Store {
    fn bump(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    fn tag_summaries(&self, todo_id: Uuid) -> Vec<TagSummary> {
        let mut tags: Vec<_> = self
            .links
            .iter()
            .filter(|(todo, _)| *todo == todo_id)
            .filter_map(|(_, tag)| self.tags.get(tag).map(|record| (*tag, record)))
            .collect();
        tags.sort_by_key(|(_, record)| record.seq);
        tags.into_iter()
            .map(|(id, record)| TagSummary {
                id,
                url: tag_url(id),
                title: record.title.clone(),
            })
            .collect()
    }

    fn todo_summaries(&self, tag_id: Uuid) -> Vec<TodoSummary> {
        let mut todos: Vec<_> = self
            .links
            .iter()
            .filter(|(_, tag)| *tag == tag_id)
            .filter_map(|(todo, _)| self.todos.get(todo).map(|record| (*todo, record)))
            .collect();
        todos.sort_by_key(|(_, record)| record.seq);
        todos
            .into_iter()
            .map(|(id, record)| TodoSummary {
                id,
                url: todo_url(id),
                title: record.title.clone(),
                completed: record.completed,
            })
            .collect()
    }

    fn todo(&self, id: Uuid) -> Option<Todo> {
        let record = self.todos.get(&id)?;
        Some(Todo {
            id,
            url: todo_url(id),
            title: record.title.clone(),
            completed: record.completed,
            order: record.order,
            tags: self.tag_summaries(id),
        })
    }

    fn tag(&self, id: Uuid) -> Option<Tag> {
        let record = self.tags.get(&id)?;
        Some(Tag {
            id,
            url: tag_url(id),
            title: record.title.clone(),
            todos: self.todo_summaries(id),
        })
    }

    fn all_todos(&self) -> Vec<Todo> {
        let mut ids: Vec<_> = self.todos.iter().map(|(id, r)| (r.seq, *id)).collect();
        ids.sort_unstable();
        ids.into_iter().filter_map(|(_, id)| self.todo(id)).collect()
    }

    fn all_tags(&self) -> Vec<Tag> {
        let mut ids: Vec<_> = self.tags.iter().map(|(id, r)| (r.seq, *id)).collect();
        ids.sort_unstable();
        ids.into_iter().filter_map(|(_, id)| self.tag(id)).collect()
    }
}

/// CORS policy a browser-hosted suite needs: any origin, the four verbs plus
/// preflight, and `content-type` as an allowed request header.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE])
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/todos/", get(list_todos).post(create_todo).delete(clear_todos))
        .route("/todos/{id}", get(get_todo).patch(update_todo).delete(delete_todo))
        .route(
            "/todos/{id}/tags/",
            get(list_todo_tags).post(associate_tag).delete(clear_todo_tags),
        )
        .route("/todos/{id}/tags/{tag_id}", delete(dissociate_tag))
        .route("/tags/", get(list_tags).post(create_tag).delete(clear_tags))
        .route("/tags/{id}", get(get_tag).patch(update_tag).delete(delete_tag))
        .route("/tags/{id}/todos/", get(list_tag_todos))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

// --- todos ---

async fn list_todos(State(db): State<Db>) -> Json<Vec<Todo>> {
    Json(db.read().await.all_todos())
}

async fn create_todo(
    State(db): State<Db>,
    Json(input): Json<CreateTodo>,
) -> Result<(StatusCode, Json<Todo>), StatusCode> {
    let mut store = db.write().await;
    let id = Uuid::new_v4();
    let seq = store.bump();
    store.todos.insert(
        id,
        TodoRecord {
            seq,
            title: input.title,
            completed: input.completed,
            order: input.order,
        },
    );
    tracing::debug!(%id, "created todo");
    let todo = store.todo(id).ok_or(StatusCode::INTERNAL_SERVER_ERROR)?;
    Ok((StatusCode::CREATED, Json(todo)))
}

async fn clear_todos(State(db): State<Db>) -> StatusCode {
    let mut store = db.write().await;
    store.todos.clear();
    store.links.clear();
    StatusCode::NO_CONTENT
}

async fn get_todo(State(db): State<Db>, Path(id): Path<Uuid>) -> Result<Json<Todo>, StatusCode> {
    db.read().await.todo(id).map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn update_todo(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateTodo>,
) -> Result<Json<Todo>, StatusCode> {
    let mut store = db.write().await;
    let todo = store.todos.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    if let Some(title) = input.title {
        todo.title = title;
    }
    if let Some(completed) = input.completed {
        todo.completed = completed;
    }
    if let Some(order) = input.order {
        todo.order = Some(order);
    }
    store.todo(id).map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn delete_todo(State(db): State<Db>, Path(id): Path<Uuid>) -> StatusCode {
    let mut store = db.write().await;
    if store.todos.remove(&id).is_none() {
        return StatusCode::NOT_FOUND;
    }
    store.links.retain(|(todo, _)| *todo != id);
    StatusCode::NO_CONTENT
}

// --- a todo's tags ---

async fn list_todo_tags(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<TagSummary>>, StatusCode> {
    let store = db.read().await;
    if !store.todos.contains_key(&id) {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(store.tag_summaries(id)))
}

async fn associate_tag(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    Json(link): Json<TagLink>,
) -> Result<(StatusCode, Json<Todo>), StatusCode> {
    let mut store = db.write().await;
    if !store.todos.contains_key(&id) || !store.tags.contains_key(&link.id) {
        return Err(StatusCode::NOT_FOUND);
    }
    store.links.insert((id, link.id));
    let todo = store.todo(id).ok_or(StatusCode::NOT_FOUND)?;
    Ok((StatusCode::CREATED, Json(todo)))
}

async fn clear_todo_tags(State(db): State<Db>, Path(id): Path<Uuid>) -> StatusCode {
    let mut store = db.write().await;
    if !store.todos.contains_key(&id) {
        return StatusCode::NOT_FOUND;
    }
    store.links.retain(|(todo, _)| *todo != id);
    StatusCode::NO_CONTENT
}

async fn dissociate_tag(
    State(db): State<Db>,
    Path((id, tag_id)): Path<(Uuid, Uuid)>,
) -> StatusCode {
    let mut store = db.write().await;
    if !store.todos.contains_key(&id) {
        return StatusCode::NOT_FOUND;
    }
    store.links.remove(&(id, tag_id));
    StatusCode::NO_CONTENT
}

// --- tags ---

async fn list_tags(State(db): State<Db>) -> Json<Vec<Tag>> {
    Json(db.read().await.all_tags())
}

async fn create_tag(
    State(db): State<Db>,
    Json(input): Json<CreateTag>,
) -> Result<(StatusCode, Json<Tag>), StatusCode> {
    let mut store = db.write().await;
    let id = Uuid::new_v4();
    let seq = store.bump();
    store.tags.insert(
        id,
        TagRecord {
            seq,
            title: input.title,
        },
    );
    tracing::debug!(%id, "created tag");
    let tag = store.tag(id).ok_or(StatusCode::INTERNAL_SERVER_ERROR)?;
    Ok((StatusCode::CREATED, Json(tag)))
}

async fn clear_tags(State(db): State<Db>) -> StatusCode {
    let mut store = db.write().await;
    store.tags.clear();
    store.links.clear();
    StatusCode::NO_CONTENT
}

async fn get_tag(State(db): State<Db>, Path(id): Path<Uuid>) -> Result<Json<Tag>, StatusCode> {
    db.read().await.tag(id).map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn update_tag(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateTag>,
) -> Result<Json<Tag>, StatusCode> {
    let mut store = db.write().await;
    let tag = store.tags.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    if let Some(title) = input.title {
        tag.title = title;
    }
    store.tag(id).map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn delete_tag(State(db): State<Db>, Path(id): Path<Uuid>) -> StatusCode {
    let mut store = db.write().await;
    if store.tags.remove(&id).is_none() {
        return StatusCode::NOT_FOUND;
    }
    store.links.retain(|(_, tag)| *tag != id);
    StatusCode::NO_CONTENT
}

async fn list_tag_todos(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<TodoSummary>>, StatusCode> {
    let store = db.read().await;
    if !store.tags.contains_key(&id) {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(store.todo_summaries(id)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_link() -> (Store, Uuid, Uuid) {
        let mut store = Store::default();
        let todo = Uuid::new_v4();
        let tag = Uuid::new_v4();
        let seq = store.bump();
        store.todos.insert(
            todo,
            TodoRecord {
                seq,
                title: "Todo".to_string(),
                completed: false,
                order: None,
            },
        );
        let seq = store.bump();
        store.tags.insert(
            tag,
            TagRecord {
                seq,
                title: "Tag".to_string(),
            },
        );
        store.links.insert((todo, tag));
        (store, todo, tag)
    }

    #[test]
    fn todo_serializes_without_order_when_unset() {
        let (store, id, _) = store_with_link();
        let json = serde_json::to_value(store.todo(id).unwrap()).unwrap();
        assert_eq!(json["title"], "Todo");
        assert_eq!(json["completed"], false);
        assert_eq!(json["url"], format!("/todos/{id}"));
        assert!(json.get("order").is_none());
    }

    #[test]
    fn association_is_visible_from_both_sides() {
        let (store, todo, tag) = store_with_link();
        let todo_view = store.todo(todo).unwrap();
        let tag_view = store.tag(tag).unwrap();
        assert_eq!(todo_view.tags.len(), 1);
        assert_eq!(todo_view.tags[0].id, tag);
        assert_eq!(tag_view.todos.len(), 1);
        assert_eq!(tag_view.todos[0].id, todo);
    }

    #[test]
    fn dangling_links_are_not_reported() {
        let (mut store, todo, tag) = store_with_link();
        store.tags.remove(&tag);
        assert!(store.todo(todo).unwrap().tags.is_empty());
    }

    #[test]
    fn lists_keep_creation_order() {
        let mut store = Store::default();
        for title in ["first", "second", "third"] {
            let seq = store.bump();
            store.todos.insert(
                Uuid::new_v4(),
                TodoRecord {
                    seq,
                    title: title.to_string(),
                    completed: false,
                    order: None,
                },
            );
        }
        let titles: Vec<_> = store.all_todos().into_iter().map(|t| t.title).collect();
        assert_eq!(titles, ["first", "second", "third"]);
    }

    #[test]
    fn create_todo_defaults_completed_to_false() {
        let input: CreateTodo = serde_json::from_str(r#"{"title":"No completed field"}"#).unwrap();
        assert_eq!(input.title, "No completed field");
        assert!(!input.completed);
        assert!(input.order.is_none());
    }

    #[test]
    fn create_todo_rejects_missing_title() {
        let result: Result<CreateTodo, _> = serde_json::from_str(r#"{"completed":true}"#);
        assert!(result.is_err());
    }

    #[test]
    fn update_todo_partial_fields() {
        let input: UpdateTodo = serde_json::from_str(r#"{"order":95}"#).unwrap();
        assert_eq!(input.order, Some(95));
        assert!(input.title.is_none());
        assert!(input.completed.is_none());
    }
}
