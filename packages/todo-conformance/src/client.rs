//! HTTP client for the todo endpoints.

use std::time::Duration;

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder};
use serde::Serialize;
use serde_json::Value;

use crate::config::HarnessConfig;
use crate::error::ConformanceError;
use crate::model::{NewTodo, TodoReplacement};
use crate::scenario::Step;

/// Media type sent in `Accept`/`Content-Type` and required on every response.
pub const JSON_UTF8: &str = "application/json; charset=utf-8";

/// Collection endpoint path.
pub const TODOS_PATH: &str = "/api/todos";

/// Characters escaped in an id used as a path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// One complete request/response exchange.
#[derive(Debug, Clone)]
pub struct Exchange {
    pub status: u16,
    /// Raw `Content-Type` header, if any
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl Exchange {
    /// Decodes the body as JSON.
    pub fn json(&self, step: Step) -> Result<Value, ConformanceError> {
        serde_json::from_slice(&self.body).map_err(|_| {
            ConformanceError::contract(step, "body", "valid JSON", body_excerpt(&self.body))
        })
    }
}

fn body_excerpt(body: &[u8]) -> String {
    const LIMIT: usize = 120;
    let text = String::from_utf8_lossy(body);
    if text.chars().count() > LIMIT {
        let head: String = text.chars().take(LIMIT).collect();
        format!("{:?}...", head)
    } else {
        format!("{:?}", text)
    }
}

/// Client for one todo server.
#[derive(Debug, Clone)]
pub struct TodoClient {
    http: reqwest::Client,
    base_url: String,
}

impl TodoClient {
    /// Creates a client for the server in `config`.
    pub fn new(config: &HarnessConfig) -> Result<Self, ConformanceError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout_ms) = config.request_timeout_ms {
            builder = builder.timeout(Duration::from_millis(timeout_ms));
        }
        let http = builder.build().map_err(ConformanceError::ClientSetup)?;
        Ok(Self {
            http,
            base_url: config.base_url.clone(),
        })
    }

    /// URL of the collection endpoint.
    pub fn collection_url(&self) -> String {
        format!("{}{}", self.base_url, TODOS_PATH)
    }

    /// URL of the single-item endpoint for `id`.
    pub fn item_url(&self, id: &str) -> String {
        format!(
            "{}{}/{}",
            self.base_url,
            TODOS_PATH,
            utf8_percent_encode(id, PATH_SEGMENT)
        )
    }

    /// `GET /api/todos`
    pub async fn list(&self, step: Step) -> Result<Exchange, ConformanceError> {
        self.send(step, Method::GET, self.collection_url(), None::<&()>)
            .await
    }

    /// `POST /api/todos`
    pub async fn create(&self, step: Step, todo: &NewTodo) -> Result<Exchange, ConformanceError> {
        self.send(step, Method::POST, self.collection_url(), Some(todo))
            .await
    }

    /// `GET /api/todos/{id}`
    pub async fn get(&self, step: Step, id: &str) -> Result<Exchange, ConformanceError> {
        self.send(step, Method::GET, self.item_url(id), None::<&()>)
            .await
    }

    /// `PUT /api/todos/{id}`
    pub async fn replace(
        &self,
        step: Step,
        id: &str,
        replacement: &TodoReplacement,
    ) -> Result<Exchange, ConformanceError> {
        self.send(step, Method::PUT, self.item_url(id), Some(replacement))
            .await
    }

    /// `DELETE /api/todos/{id}`
    pub async fn delete(&self, step: Step, id: &str) -> Result<Exchange, ConformanceError> {
        self.send(step, Method::DELETE, self.item_url(id), None::<&()>)
            .await
    }

    async fn send<B: Serialize>(
        &self,
        step: Step,
        method: Method,
        url: String,
        body: Option<&B>,
    ) -> Result<Exchange, ConformanceError> {
        tracing::debug!(%step, %method, %url, "Sending request");

        let mut request: RequestBuilder = self.http.request(method, url).header(ACCEPT, JSON_UTF8);
        if let Some(body) = body {
            let bytes = serde_json::to_vec(body)
                .map_err(|source| ConformanceError::Encode { step, source })?;
            request = request.header(CONTENT_TYPE, JSON_UTF8).body(bytes);
        }

        let transport = |source| ConformanceError::Transport { step, source };
        let response = request.send().await.map_err(transport)?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned());
        let body = response.bytes().await.map_err(transport)?.to_vec();

        tracing::debug!(%step, status, "Received response");
        Ok(Exchange {
            status,
            content_type,
            body,
        })
    }
}
