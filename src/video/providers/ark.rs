//! ModelArk (BytePlus / ByteDance) video generation provider.

use crate::config::{parse_base_url, DEFAULT_BASE_URL};
use crate::error::{sanitize_error_message, truncate_chars, ConfigError, Result, VidGenError};
use crate::video::payload::{build_payload, ContentPart};
use crate::video::provider::{ProviderKind, TaskProvider};
use crate::video::types::{GenerationRequest, Task};
use crate::video::validate::validate_request;
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use url::Url;

/// Default per-call timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const TASKS_PATH: [&str; 3] = ["contents", "generations", "tasks"];

/// Prompt characters included in log lines.
const PROMPT_PREVIEW_CHARS: usize = 50;

/// Builder for `ArkProvider`.
#[derive(Debug, Clone)]
pub struct ArkProviderBuilder {
    api_key: Option<String>,
    model: Option<String>,
    base_url: String,
    timeout: Duration,
}

impl Default for ArkProviderBuilder {
    fn default() -> Self {
        Self {
            api_key: None,
            model: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ArkProviderBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the bearer API key.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the model (or inference endpoint) identifier.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Overrides the API base URL (e.g. `https://host/api/v3`).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the timeout applied to each outbound call.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builds the provider.
    pub fn build(self) -> std::result::Result<ArkProvider, ConfigError> {
        let api_key = self
            .api_key
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::Missing("BYTEDANCE_ARK_API_KEY"))?;
        let model = self
            .model
            .filter(|m| !m.trim().is_empty())
            .ok_or(ConfigError::Missing("BYTEDANCE_MODEL_ID"))?;
        let base_url = parse_base_url(&self.base_url)?;

        let client = reqwest::Client::builder().timeout(self.timeout).build()?;

        Ok(ArkProvider {
            client,
            api_key,
            model,
            base_url,
            timeout: self.timeout,
        })
    }
}

/// ModelArk content-generation task client.
///
/// Cheap to share behind an `Arc`; holds no per-request state.
#[derive(Debug)]
pub struct ArkProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: Url,
    timeout: Duration,
}

impl ArkProvider {
    /// Creates a new `ArkProviderBuilder`.
    pub fn builder() -> ArkProviderBuilder {
        ArkProviderBuilder::new()
    }

    /// Returns the configured model identifier.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// `{base}/contents/generations/tasks[/{task_id}]`, with the id
    /// percent-encoded as a single path segment.
    fn tasks_url(&self, task_id: Option<&str>) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(TASKS_PATH);
            if let Some(id) = task_id {
                segments.push(id);
            }
        }
        url
    }

    /// Classifies a fault raised before a response arrived.
    fn transport_error(&self, err: reqwest::Error) -> VidGenError {
        if err.is_timeout() {
            tracing::warn!(timeout_secs = self.timeout.as_secs(), "provider request timed out");
            return VidGenError::Timeout(self.timeout);
        }
        tracing::error!(error = %err, "provider request failed");
        VidGenError::ConnectionFailure("failed to reach the video generation provider".into())
    }

    fn parse_error(&self, status: u16, text: &str) -> VidGenError {
        let message = sanitize_error_message(text);
        tracing::warn!(status, message = %message, "provider rejected request");
        VidGenError::ConnectionFailure(format!("provider returned HTTP {status}: {message}"))
    }

    /// Reads a task from a provider response.
    async fn read_task(&self, response: reqwest::Response) -> Result<Task> {
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(self.parse_error(status.as_u16(), &text));
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                return VidGenError::Timeout(self.timeout);
            }
            tracing::error!(error = %e, "failed to read provider response body");
            VidGenError::GenerationFailure("failed to read provider response".into())
        })?;

        let task: Task = serde_json::from_str(&body).map_err(|e| {
            tracing::error!(error = %e, body = %truncate_chars(&body, 200), "unparseable provider response");
            VidGenError::GenerationFailure("provider returned an unrecognized task payload".into())
        })?;

        if task.id.trim().is_empty() {
            return Err(VidGenError::GenerationFailure(
                "provider returned a task without an id".into(),
            ));
        }

        Ok(task.normalized())
    }
}

#[async_trait]
impl TaskProvider for ArkProvider {
    async fn create_task(&self, request: &GenerationRequest) -> Result<Task> {
        validate_request(request)?;

        let body = ArkCreateRequest::from_request(request, &self.model);
        tracing::info!(
            model = %self.model,
            prompt = %truncate_chars(request.prompt().unwrap_or_default(), PROMPT_PREVIEW_CHARS),
            items = body.content.len(),
            duration_secs = ?request.duration_secs,
            "creating video generation task"
        );

        let response = self
            .client
            .post(self.tasks_url(None))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let task = self.read_task(response).await?;
        tracing::info!(task_id = %task.id, status = %task.status, "video generation task created");
        Ok(task)
    }

    async fn get_task(&self, task_id: &str) -> Result<Task> {
        let response = self
            .client
            .get(self.tasks_url(Some(task_id)))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let task = self.read_task(response).await?;
        tracing::debug!(task_id = %task.id, status = %task.status, "fetched task status");
        Ok(task)
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Ark
    }
}

// Request types

#[derive(Debug, Serialize)]
struct ArkCreateRequest<'a> {
    model: &'a str,
    content: Vec<ContentPart>,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generate_audio: Option<bool>,
}

impl<'a> ArkCreateRequest<'a> {
    fn from_request(req: &GenerationRequest, model: &'a str) -> Self {
        Self {
            model,
            content: build_payload(&req.content),
            duration: req.duration_secs,
            generate_audio: req.generate_audio,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::video::types::{ContentItem, TaskStatus};
    use mockito::{Matcher, Server};
    use serde_json::json;

    const TASKS: &str = "/api/v3/contents/generations/tasks";

    fn provider(base: &str) -> ArkProvider {
        ArkProvider::builder()
            .api_key("test-key")
            .model("ep-test")
            .base_url(format!("{base}/api/v3"))
            .timeout(Duration::from_millis(500))
            .build()
            .unwrap()
    }

    #[test]
    fn test_builder_requires_key_and_model() {
        let err = ArkProvider::builder().model("ep").build().unwrap_err();
        assert!(matches!(err, ConfigError::Missing("BYTEDANCE_ARK_API_KEY")));

        let err = ArkProvider::builder().api_key("k").model("  ").build().unwrap_err();
        assert!(matches!(err, ConfigError::Missing("BYTEDANCE_MODEL_ID")));
    }

    #[test]
    fn test_builder_rejects_bad_base_url() {
        for bad in ["not a url", "ftp://host/api/v3", "mailto:ops@example.com"] {
            let err = ArkProvider::builder()
                .api_key("k")
                .model("ep")
                .base_url(bad)
                .build()
                .unwrap_err();
            assert!(matches!(err, ConfigError::Invalid { name: "ARK_BASE_URL", .. }));
        }
    }

    #[test]
    fn test_tasks_url() {
        let p = provider("https://ark.example.com");
        assert_eq!(
            p.tasks_url(None).as_str(),
            "https://ark.example.com/api/v3/contents/generations/tasks"
        );
        assert_eq!(
            p.tasks_url(Some("cgt-20250101")).as_str(),
            "https://ark.example.com/api/v3/contents/generations/tasks/cgt-20250101"
        );
    }

    #[test]
    fn test_tasks_url_encodes_task_id() {
        let p = provider("https://ark.example.com");
        assert_eq!(
            p.tasks_url(Some("a/b c?d")).as_str(),
            "https://ark.example.com/api/v3/contents/generations/tasks/a%2Fb%20c%3Fd"
        );
    }

    #[test]
    fn test_tasks_url_tolerates_trailing_slash() {
        let p = ArkProvider::builder()
            .api_key("k")
            .model("ep")
            .base_url("https://ark.example.com/api/v3/")
            .build()
            .unwrap();
        assert_eq!(
            p.tasks_url(None).as_str(),
            "https://ark.example.com/api/v3/contents/generations/tasks"
        );
    }

    #[test]
    fn test_request_serialization_skips_none_fields() {
        let req = GenerationRequest::new("A cute cat playing on the grass");
        let body = serde_json::to_value(ArkCreateRequest::from_request(&req, "ep-test")).unwrap();
        assert_eq!(
            body,
            json!({
                "model": "ep-test",
                "content": [{"type": "text", "text": "A cute cat playing on the grass"}]
            })
        );
    }

    #[tokio::test]
    async fn test_create_task_success() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", TASKS)
            .match_header("authorization", "Bearer test-key")
            .match_body(Matcher::Json(json!({
                "model": "ep-test",
                "content": [{"type": "text", "text": "A cute cat playing on the grass"}]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id": "cgt-20250331175019-68d9t"}"#)
            .create_async()
            .await;

        let task = provider(&server.url())
            .create_task(&GenerationRequest::new("A cute cat playing on the grass"))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(task.id, "cgt-20250331175019-68d9t");
        assert_eq!(task.status, TaskStatus::Pending);
    }

    #[tokio::test]
    async fn test_create_task_with_image_and_options() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", TASKS)
            .match_body(Matcher::Json(json!({
                "model": "ep-test",
                "content": [
                    {"type": "text", "text": "animate this"},
                    {"type": "image_url", "image_url": {"url": "https://example.com/frame.png"}}
                ],
                "duration": 8,
                "generate_audio": true
            })))
            .with_status(200)
            .with_body(r#"{"id": "cgt-2", "status": "queued"}"#)
            .create_async()
            .await;

        let request = GenerationRequest::new("animate this")
            .with_image_url("https://example.com/frame.png")
            .with_duration(8)
            .with_audio(true);
        let task = provider(&server.url()).create_task(&request).await.unwrap();

        mock.assert_async().await;
        assert_eq!(task.id, "cgt-2");
    }

    #[tokio::test]
    async fn test_invalid_request_makes_no_call() {
        let mut server = Server::new_async().await;
        let mock = server.mock("POST", TASKS).expect(0).create_async().await;
        let p = provider(&server.url());

        let cases = vec![
            GenerationRequest::from_content(vec![]),
            GenerationRequest::from_content(vec![ContentItem::image("https://example.com/a.png")]),
            GenerationRequest::new(""),
            GenerationRequest::new("a".repeat(2001)),
            GenerationRequest::new("ok").with_image_url("file:///etc/passwd"),
        ];
        for request in &cases {
            let err = p.create_task(request).await.unwrap_err();
            assert!(matches!(err, VidGenError::InvalidParameter(_)), "{err:?}");
        }

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_non_success_is_connection_failure() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", TASKS)
            .with_status(401)
            .with_body(r#"{"error":{"code":"AuthenticationError","message":"the API key is invalid"}}"#)
            .create_async()
            .await;

        let err = provider(&server.url())
            .create_task(&GenerationRequest::new("cat"))
            .await
            .unwrap_err();
        match err {
            VidGenError::ConnectionFailure(msg) => {
                assert_eq!(
                    msg,
                    "provider returned HTTP 401: AuthenticationError: the API key is invalid"
                );
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unparseable_success_is_generation_failure() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", TASKS)
            .with_status(200)
            .with_body("<html>gateway</html>")
            .create_async()
            .await;

        let err = provider(&server.url())
            .create_task(&GenerationRequest::new("cat"))
            .await
            .unwrap_err();
        assert!(matches!(err, VidGenError::GenerationFailure(_)));
    }

    #[tokio::test]
    async fn test_missing_id_is_generation_failure() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", TASKS)
            .with_status(200)
            .with_body(r#"{"id": ""}"#)
            .create_async()
            .await;

        let err = provider(&server.url())
            .create_task(&GenerationRequest::new("cat"))
            .await
            .unwrap_err();
        assert!(matches!(err, VidGenError::GenerationFailure(_)));
    }

    #[tokio::test]
    async fn test_create_timeout() {
        // Accepts connections but never answers.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hold = tokio::spawn(async move {
            let mut open = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                open.push(socket);
            }
        });

        let p = ArkProvider::builder()
            .api_key("k")
            .model("ep")
            .base_url(format!("http://{addr}/api/v3"))
            .timeout(Duration::from_millis(200))
            .build()
            .unwrap();
        let err = p.create_task(&GenerationRequest::new("cat")).await.unwrap_err();

        hold.abort();
        assert!(matches!(err, VidGenError::Timeout(d) if d == Duration::from_millis(200)));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_connection_failure() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = provider(&format!("http://{addr}"))
            .get_task("cgt-1")
            .await
            .unwrap_err();
        match err {
            VidGenError::ConnectionFailure(msg) => assert!(!msg.contains("127.0.0.1")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_get_task_succeeded() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", format!("{TASKS}/cgt-1").as_str())
            .match_header("authorization", "Bearer test-key")
            .with_status(200)
            .with_body(
                r#"{
                    "id": "cgt-1",
                    "model": "seedance-1-0-pro-250528",
                    "status": "succeeded",
                    "content": {"video_url": "https://cdn.example.com/cgt-1.mp4"},
                    "created_at": 1743414619,
                    "updated_at": 1743414673
                }"#,
            )
            .create_async()
            .await;

        let task = provider(&server.url()).get_task("cgt-1").await.unwrap();

        mock.assert_async().await;
        assert_eq!(task.status, TaskStatus::Succeeded);
        assert_eq!(task.video_url(), Some("https://cdn.example.com/cgt-1.mp4"));
        assert_eq!(task.updated_at, Some(1743414673));
    }

    #[tokio::test]
    async fn test_get_task_failed_carries_error() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", format!("{TASKS}/cgt-9").as_str())
            .with_status(200)
            .with_body(r#"{"id":"cgt-9","status":"failed","error":{"code":"InputTextSensitiveContentDetected","message":"blocked"}}"#)
            .create_async()
            .await;

        let task = provider(&server.url()).get_task("cgt-9").await.unwrap();
        assert_eq!(task.status, TaskStatus::Failed);
        assert!(task.result.is_none());
        assert_eq!(task.error.unwrap().message.as_deref(), Some("blocked"));
    }

    #[tokio::test]
    async fn test_get_task_not_found() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", format!("{TASKS}/missing").as_str())
            .with_status(404)
            .with_body(r#"{"error":{"code":"ResourceNotFound","message":"task not found"}}"#)
            .create_async()
            .await;

        let err = provider(&server.url()).get_task("missing").await.unwrap_err();
        assert!(matches!(err, VidGenError::ConnectionFailure(ref m) if m.contains("task not found")));
    }
}
