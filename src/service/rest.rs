//! REST implementation of [`AgentService`].

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, RETRY_AFTER};
use reqwest::{Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use tracing::debug;
use uuid::Uuid;

use crate::auth::CredentialProvider;
use crate::config::FoundryConfig;
use crate::error::FoundryError;
use crate::types::{
    Agent, Connection, CreateAgentRequest, CreateMessageRequest, CreateVectorStoreRequest,
    DeletionStatus, FileObject, MessageList, Run, Thread, ThreadMessage, ToolOutput, VectorStore,
};

use super::http::{bearer_headers, shared_client, status_to_error};
use super::multipart::build_upload_multipart;
use super::{AgentService, FileUpload};

/// Page size for message listings; further pages follow the `after` cursor.
const MESSAGE_PAGE_LIMIT: &str = "100";

/// Agent service reached over HTTPS.
pub struct HttpAgentService {
    client: reqwest::Client,
    base_url: String,
    api_version: String,
    credential: Arc<dyn CredentialProvider>,
}

impl HttpAgentService {
    pub fn new(
        base_url: impl Into<String>,
        api_version: impl Into<String>,
        credential: Arc<dyn CredentialProvider>,
    ) -> Self {
        Self {
            client: shared_client().clone(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_version: api_version.into(),
            credential,
        }
    }

    /// Build from a config, deriving the endpoint from its connection string.
    pub fn from_config(config: &FoundryConfig) -> Result<Self, FoundryError> {
        let endpoint = config.connection()?.endpoint();
        Ok(Self::new(
            endpoint,
            config.api_version.clone(),
            config.credential.clone(),
        ))
    }

    /// Use a custom reqwest client (proxies, timeouts).
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Endpoint URL with each segment percent-encoded.
    fn url(&self, segments: &[&str]) -> Result<Url, FoundryError> {
        let mut url = Url::parse(&self.base_url).map_err(|e| {
            FoundryError::Configuration(format!("Invalid service endpoint {}: {e}", self.base_url))
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                FoundryError::Configuration(format!(
                    "Service endpoint {} cannot carry a path",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn request(
        &self,
        method: Method,
        segments: &[&str],
    ) -> Result<RequestBuilder, FoundryError> {
        let url = self.url(segments)?;
        let token = self.credential.token().await?;
        debug!(%method, path = url.path(), "Agent service request");
        Ok(self
            .client
            .request(method, url)
            .query(&[("api-version", self.api_version.as_str())])
            .headers(bearer_headers(&token.token)))
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, FoundryError> {
        let resp = builder.send().await?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let retry_after = resp
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = resp.text().await.unwrap_or_default();
        Err(status_to_error(status.as_u16(), retry_after.as_deref(), &body))
    }

    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, FoundryError> {
        let resp = self.send(builder).await?;
        let text = resp.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    async fn delete(&self, segments: &[&str]) -> Result<(), FoundryError> {
        let status: DeletionStatus = self
            .send_json(self.request(Method::DELETE, segments).await?)
            .await?;
        if !status.deleted {
            return Err(FoundryError::InvalidState(format!(
                "Service did not delete {}",
                status.id
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl AgentService for HttpAgentService {
    async fn create_agent(&self, request: &CreateAgentRequest) -> Result<Agent, FoundryError> {
        self.send_json(self.request(Method::POST, &["assistants"]).await?.json(request))
            .await
    }

    async fn delete_agent(&self, agent_id: &str) -> Result<(), FoundryError> {
        self.delete(&["assistants", agent_id]).await
    }

    async fn create_thread(&self) -> Result<Thread, FoundryError> {
        self.send_json(
            self.request(Method::POST, &["threads"])
                .await?
                .json(&serde_json::json!({})),
        )
        .await
    }

    async fn create_message(
        &self,
        thread_id: &str,
        request: &CreateMessageRequest,
    ) -> Result<ThreadMessage, FoundryError> {
        self.send_json(
            self.request(Method::POST, &["threads", thread_id, "messages"])
                .await?
                .json(request),
        )
        .await
    }

    async fn list_messages(&self, thread_id: &str) -> Result<MessageList, FoundryError> {
        let mut listing = MessageList::default();
        let mut after: Option<String> = None;
        loop {
            let mut builder = self
                .request(Method::GET, &["threads", thread_id, "messages"])
                .await?
                .query(&[("order", "desc"), ("limit", MESSAGE_PAGE_LIMIT)]);
            if let Some(cursor) = after.as_deref() {
                builder = builder.query(&[("after", cursor)]);
            }
            let page: MessageList = self.send_json(builder).await?;

            let next = page
                .last_id
                .clone()
                .or_else(|| page.data.last().map(|m| m.id.clone()));
            if listing.first_id.is_none() {
                listing.first_id = page.first_id;
            }
            listing.data.extend(page.data);
            listing.last_id = next.clone();

            // A repeated cursor would loop forever.
            if !page.has_more || next.is_none() || next == after {
                break;
            }
            debug!(thread_id, fetched = listing.data.len(), "Fetching next message page");
            after = next;
        }
        Ok(listing)
    }

    async fn create_run(&self, thread_id: &str, agent_id: &str) -> Result<Run, FoundryError> {
        self.send_json(
            self.request(Method::POST, &["threads", thread_id, "runs"])
                .await?
                .json(&serde_json::json!({ "assistant_id": agent_id })),
        )
        .await
    }

    async fn get_run(&self, thread_id: &str, run_id: &str) -> Result<Run, FoundryError> {
        self.send_json(
            self.request(Method::GET, &["threads", thread_id, "runs", run_id])
                .await?,
        )
        .await
    }

    async fn submit_tool_outputs(
        &self,
        thread_id: &str,
        run_id: &str,
        outputs: &[ToolOutput],
    ) -> Result<Run, FoundryError> {
        self.send_json(
            self.request(
                Method::POST,
                &["threads", thread_id, "runs", run_id, "submit_tool_outputs"],
            )
            .await?
            .json(&serde_json::json!({ "tool_outputs": outputs })),
        )
        .await
    }

    async fn cancel_run(&self, thread_id: &str, run_id: &str) -> Result<Run, FoundryError> {
        self.send_json(
            self.request(Method::POST, &["threads", thread_id, "runs", run_id, "cancel"])
            .await?,
        )
        .await
    }

    async fn upload_file(&self, upload: &FileUpload) -> Result<FileObject, FoundryError> {
        let boundary = format!("foundry-{}", Uuid::new_v4().simple());
        let body = build_upload_multipart(
            &boundary,
            &upload.purpose.to_string(),
            &upload.filename,
            &upload.bytes,
        );
        let content_type = HeaderValue::from_str(&format!(
            "multipart/form-data; boundary={boundary}"
        ))
        .map_err(|e| {
            FoundryError::InvalidArgument(format!("Failed to build multipart content-type: {e}"))
        })?;
        // `headers` replaces the JSON content type set by `request`.
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, content_type);

        self.send_json(
            self.request(Method::POST, &["files"])
                .await?
                .headers(headers)
                .body(body),
        )
        .await
    }

    async fn get_file(&self, file_id: &str) -> Result<FileObject, FoundryError> {
        self.send_json(self.request(Method::GET, &["files", file_id]).await?)
            .await
    }

    async fn delete_file(&self, file_id: &str) -> Result<(), FoundryError> {
        self.delete(&["files", file_id]).await
    }

    async fn file_content(&self, file_id: &str) -> Result<Vec<u8>, FoundryError> {
        let resp = self
            .send(
                self.request(Method::GET, &["files", file_id, "content"])
                    .await?,
            )
            .await?;
        Ok(resp.bytes().await?.to_vec())
    }

    async fn create_vector_store(
        &self,
        request: &CreateVectorStoreRequest,
    ) -> Result<VectorStore, FoundryError> {
        self.send_json(
            self.request(Method::POST, &["vector_stores"])
                .await?
                .json(request),
        )
        .await
    }

    async fn get_vector_store(&self, vector_store_id: &str) -> Result<VectorStore, FoundryError> {
        self.send_json(
            self.request(Method::GET, &["vector_stores", vector_store_id])
                .await?,
        )
        .await
    }

    async fn delete_vector_store(&self, vector_store_id: &str) -> Result<(), FoundryError> {
        self.delete(&["vector_stores", vector_store_id]).await
    }

    async fn get_connection(&self, name: &str) -> Result<Connection, FoundryError> {
        self.send_json(
            self.request(Method::GET, &["connections", name])
                .await?,
        )
        .await
    }
}
