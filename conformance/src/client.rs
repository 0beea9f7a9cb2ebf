//! Typed operations against a Todo/Tag backend.
//!
//! # Design
//! `BackendClient` holds the API root and a transport and nothing else: every
//! operation is one standalone round trip, with no caching and no retries.
//! Collection operations are generic over [`Resource`] so todos and tags share
//! one implementation; the association operations live on the client since
//! they always start from a resource url the server handed out.

use std::marker::PhantomData;

use serde::{de::DeserializeOwned, Serialize};
use url::Url;

use crate::decode::decode;
use crate::error::ConformanceError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::transport::{Transport, UreqTransport};
use crate::types::{Resource, ResourceId, Tag, TagLink, Todo};

pub struct BackendClient {
    root: String,
    base: Url,
    transport: Box<dyn Transport>,
}

impl BackendClient {
    /// Client for the backend at `api_root`, talking HTTP through ureq.
    pub fn new(api_root: &str) -> Result<Self, ConformanceError> {
        Self::with_transport(api_root, Box::new(UreqTransport::new()))
    }

    pub fn with_transport(
        api_root: &str,
        transport: Box<dyn Transport>,
    ) -> Result<Self, ConformanceError> {
        let root = api_root.trim_end_matches('/').to_string();
        // Trailing slash so relative resource urls resolve beneath the root.
        let base = Url::parse(&format!("{root}/")).map_err(|source| {
            ConformanceError::InvalidUrl {
                url: api_root.to_string(),
                source,
            }
        })?;
        Ok(Self {
            root,
            base,
            transport,
        })
    }

    pub fn api_root(&self) -> &str {
        &self.root
    }

    pub fn collection<R: Resource>(&self) -> Collection<'_, R> {
        Collection::new(self)
    }

    pub fn todos(&self) -> Collection<'_, Todo> {
        self.collection()
    }

    pub fn tags(&self) -> Collection<'_, Tag> {
        self.collection()
    }

    /// Turns a url from a response (absolute or relative) into an absolute one.
    pub fn resolve(&self, url: &str) -> Result<String, ConformanceError> {
        self.base
            .join(url)
            .map(String::from)
            .map_err(|source| ConformanceError::InvalidUrl {
                url: url.to_string(),
                source,
            })
    }

    fn nested(&self, resource_url: &str, segment: &str) -> Result<String, ConformanceError> {
        let resolved = self.resolve(resource_url)?;
        Ok(format!("{}/{segment}/", resolved.trim_end_matches('/')))
    }

    // --- todo <-> tag associations ---

    pub fn list_associated_tags(&self, todo_url: &str) -> Result<Vec<Tag>, ConformanceError> {
        let url = self.nested(todo_url, "tags")?;
        self.fetch_json(HttpRequest::new(HttpMethod::Get, url), "list of tags")
    }

    pub fn list_associated_todos(&self, tag_url: &str) -> Result<Vec<Todo>, ConformanceError> {
        let url = self.nested(tag_url, "todos")?;
        self.fetch_json(HttpRequest::new(HttpMethod::Get, url), "list of todos")
    }

    pub fn associate(&self, todo_url: &str, tag_id: &ResourceId) -> Result<(), ConformanceError> {
        let url = self.nested(todo_url, "tags")?;
        let link = TagLink { id: tag_id.clone() };
        self.send(HttpRequest::json(HttpMethod::Post, url, &link)?)?;
        Ok(())
    }

    pub fn disassociate(
        &self,
        todo_url: &str,
        tag_id: &ResourceId,
    ) -> Result<(), ConformanceError> {
        let url = format!("{}{tag_id}", self.nested(todo_url, "tags")?);
        self.send(HttpRequest::new(HttpMethod::Delete, url))?;
        Ok(())
    }

    pub fn disassociate_all(&self, todo_url: &str) -> Result<(), ConformanceError> {
        let url = self.nested(todo_url, "tags")?;
        self.send(HttpRequest::new(HttpMethod::Delete, url))?;
        Ok(())
    }

    // --- raw exchanges ---

    /// GET without decoding; succeeds on any 2xx.
    pub fn raw_get(&self, url: &str) -> Result<HttpResponse, ConformanceError> {
        let url = self.resolve(url)?;
        self.send(HttpRequest::new(HttpMethod::Get, url))
    }

    /// GET carrying an `Origin` header, as a browser would send cross-origin.
    pub fn get_with_origin(
        &self,
        url: &str,
        origin: &str,
    ) -> Result<HttpResponse, ConformanceError> {
        let url = self.resolve(url)?;
        self.send(HttpRequest::new(HttpMethod::Get, url).header("origin", origin))
    }

    /// CORS preflight for a JSON request of `method` against `url`.
    pub fn preflight(
        &self,
        url: &str,
        origin: &str,
        method: HttpMethod,
    ) -> Result<HttpResponse, ConformanceError> {
        let url = self.resolve(url)?;
        let request = HttpRequest::new(HttpMethod::Options, url)
            .header("origin", origin)
            .header("access-control-request-method", method.as_str())
            .header("access-control-request-headers", "content-type");
        self.send(request)
    }

    fn send(&self, request: HttpRequest) -> Result<HttpResponse, ConformanceError> {
        self.transport.send(&request)
    }

    fn fetch_json<T: DeserializeOwned>(
        &self,
        request: HttpRequest,
        expected: &'static str,
    ) -> Result<T, ConformanceError> {
        let response = self.transport.send(&request)?;
        decode_as(&request, &response.body, expected)
    }
}

fn decode_as<T: DeserializeOwned>(
    request: &HttpRequest,
    body: &str,
    expected: &'static str,
) -> Result<T, ConformanceError> {
    let value = decode(body).map_err(|source| ConformanceError::Decode {
        method: request.method,
        url: request.url.clone(),
        source,
    })?;
    serde_json::from_value(value).map_err(|source| ConformanceError::Shape {
        method: request.method,
        url: request.url.clone(),
        expected,
        source,
    })
}

/// Operations on one collection root, e.g. `<api root>/todos/`.
pub struct Collection<'c, R> {
    client: &'c BackendClient,
    root: String,
    _resource: PhantomData<R>,
}

impl<'c, R: Resource> Collection<'c, R> {
    fn new(client: &'c BackendClient) -> Self {
        Self {
            root: format!("{}/{}/", client.root, R::COLLECTION),
            client,
            _resource: PhantomData,
        }
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn list_all(&self) -> Result<Vec<R>, ConformanceError> {
        self.client
            .fetch_json(HttpRequest::new(HttpMethod::Get, &self.root), R::LIST_NAME)
    }

    pub fn create(&self, fields: &R::Create) -> Result<R, ConformanceError> {
        self.write(HttpMethod::Post, self.root.clone(), fields)
    }

    pub fn fetch(&self, url: &str) -> Result<R, ConformanceError> {
        let url = self.client.resolve(url)?;
        self.client
            .fetch_json(HttpRequest::new(HttpMethod::Get, url), R::NAME)
    }

    /// GET `<collection root><id>`.
    pub fn fetch_by_id(&self, id: &ResourceId) -> Result<R, ConformanceError> {
        let url = format!("{}{id}", self.root);
        self.client
            .fetch_json(HttpRequest::new(HttpMethod::Get, url), R::NAME)
    }

    pub fn update(&self, url: &str, fields: &R::Update) -> Result<R, ConformanceError> {
        let url = self.client.resolve(url)?;
        self.write(HttpMethod::Patch, url, fields)
    }

    pub fn delete_one(&self, url: &str) -> Result<(), ConformanceError> {
        let url = self.client.resolve(url)?;
        self.client.send(HttpRequest::new(HttpMethod::Delete, url))?;
        Ok(())
    }

    pub fn delete_all(&self) -> Result<(), ConformanceError> {
        self.client
            .send(HttpRequest::new(HttpMethod::Delete, &self.root))?;
        Ok(())
    }

    fn write<P: Serialize>(
        &self,
        method: HttpMethod,
        url: String,
        fields: &P,
    ) -> Result<R, ConformanceError> {
        let request = HttpRequest::json(method, url, fields)?;
        self.client.fetch_json(request, R::NAME)
    }
}
