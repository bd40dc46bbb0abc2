//! Remote collection client.
//!
//! # Design
//! `TodoStore` is the seam between the reconciler and the network: one
//! method per round trip, no retries, no caching, and no state of its own.
//! `HttpTodoStore` drives the sans-IO `todo_core::TodoClient` with a blocking
//! `ureq` agent, moving each request onto `spawn_blocking` so the reconciler
//! can keep several calls in flight at once.

use std::sync::Arc;

use async_trait::async_trait;
use todo_core::{HttpMethod, HttpRequest, HttpResponse, Todo, TodoClient, UpdateTodo};
use tracing::debug;

use crate::error::TransportError;

#[async_trait]
pub trait TodoStore: Send + Sync {
    /// Owner every request is scoped to.
    fn owner(&self) -> u64;

    async fn list_all(&self) -> Result<Vec<Todo>, TransportError>;

    /// The caller has already trimmed and validated `title`.
    async fn create(&self, title: &str) -> Result<Todo, TransportError>;

    async fn remove(&self, id: u64) -> Result<(), TransportError>;

    async fn update_status(&self, id: u64, completed: bool) -> Result<Todo, TransportError>;

    async fn update_title(&self, id: u64, title: &str) -> Result<Todo, TransportError>;
}

#[async_trait]
impl<T: TodoStore + ?Sized> TodoStore for Arc<T> {
    fn owner(&self) -> u64 {
        (**self).owner()
    }

    async fn list_all(&self) -> Result<Vec<Todo>, TransportError> {
        (**self).list_all().await
    }

    async fn create(&self, title: &str) -> Result<Todo, TransportError> {
        (**self).create(title).await
    }

    async fn remove(&self, id: u64) -> Result<(), TransportError> {
        (**self).remove(id).await
    }

    async fn update_status(&self, id: u64, completed: bool) -> Result<Todo, TransportError> {
        (**self).update_status(id, completed).await
    }

    async fn update_title(&self, id: u64, title: &str) -> Result<Todo, TransportError> {
        (**self).update_title(id, title).await
    }
}

/// `TodoStore` over HTTP.
#[derive(Clone)]
pub struct HttpTodoStore {
    client: TodoClient,
    agent: ureq::Agent,
}

impl HttpTodoStore {
    pub fn new(client: TodoClient) -> Self {
        // Status interpretation belongs to `TodoClient::parse_*`.
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { client, agent }
    }

    async fn round_trip(&self, req: HttpRequest) -> Result<HttpResponse, TransportError> {
        debug!(method = %req.method, path = %req.path, "sending request");
        let agent = self.agent.clone();
        let response = tokio::task::spawn_blocking(move || execute(&agent, req)).await??;
        debug!(status = response.status, "received response");
        Ok(response)
    }
}

#[async_trait]
impl TodoStore for HttpTodoStore {
    fn owner(&self) -> u64 {
        self.client.user_id()
    }

    async fn list_all(&self) -> Result<Vec<Todo>, TransportError> {
        let response = self.round_trip(self.client.build_list_todos()).await?;
        Ok(self.client.parse_list_todos(response)?)
    }

    async fn create(&self, title: &str) -> Result<Todo, TransportError> {
        let req = self.client.build_create_todo(title)?;
        let response = self.round_trip(req).await?;
        Ok(self.client.parse_create_todo(response)?)
    }

    async fn remove(&self, id: u64) -> Result<(), TransportError> {
        let response = self.round_trip(self.client.build_delete_todo(id)).await?;
        Ok(self.client.parse_delete_todo(response)?)
    }

    async fn update_status(&self, id: u64, completed: bool) -> Result<Todo, TransportError> {
        let req = self.client.build_update_todo(id, &UpdateTodo::status(completed))?;
        let response = self.round_trip(req).await?;
        Ok(self.client.parse_update_todo(response)?)
    }

    async fn update_title(&self, id: u64, title: &str) -> Result<Todo, TransportError> {
        let req = self.client.build_update_todo(id, &UpdateTodo::title(title))?;
        let response = self.round_trip(req).await?;
        Ok(self.client.parse_update_todo(response)?)
    }
}

fn with_headers<B>(
    mut builder: ureq::RequestBuilder<B>,
    headers: &[(String, String)],
) -> ureq::RequestBuilder<B> {
    for (key, value) in headers {
        builder = builder.header(key.as_str(), value.as_str());
    }
    builder
}

/// Execute an `HttpRequest` on the calling thread.
fn execute(agent: &ureq::Agent, req: HttpRequest) -> Result<HttpResponse, TransportError> {
    let HttpRequest {
        method,
        path,
        headers,
        body,
    } = req;

    let mut response = match (method, body) {
        (HttpMethod::Get, _) => with_headers(agent.get(&path), &headers).call(),
        (HttpMethod::Delete, _) => with_headers(agent.delete(&path), &headers).call(),
        (HttpMethod::Post, Some(body)) => {
            with_headers(agent.post(&path), &headers).send(body.as_bytes())
        }
        (HttpMethod::Post, None) => with_headers(agent.post(&path), &headers).send_empty(),
        (HttpMethod::Patch, Some(body)) => {
            with_headers(agent.patch(&path), &headers).send(body.as_bytes())
        }
        (HttpMethod::Patch, None) => with_headers(agent.patch(&path), &headers).send_empty(),
    }?;

    let status = response.status().as_u16();
    let headers = response
        .headers()
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|value| (name.as_str().to_string(), value.to_string()))
        })
        .collect();
    let body = response.body_mut().read_to_string()?;

    Ok(HttpResponse {
        status,
        headers,
        body,
    })
}
