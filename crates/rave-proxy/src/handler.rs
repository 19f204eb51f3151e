//! `POST /api/chat`

use axum::extract::{FromRequest, Multipart, Request, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use reqwest::multipart::{Form, Part};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::Result;

#[derive(Clone)]
pub(crate) struct ProxyState {
    pub(crate) client: reqwest::Client,
    pub(crate) webhook_url: Arc<str>,
    pub(crate) body_limit: usize,
}

/// Outbound body shape, chosen from the inbound content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Inbound {
    Json,
    Multipart,
}

impl Inbound {
    fn detect(content_type: &str) -> Option<Self> {
        if content_type.contains("application/json") {
            Some(Inbound::Json)
        } else if content_type.contains("multipart/form-data") {
            Some(Inbound::Multipart)
        } else {
            None
        }
    }
}

pub(crate) async fn chat(State(state): State<ProxyState>, request: Request) -> Response {
    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    let Some(kind) = Inbound::detect(content_type) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "Unsupported Content-Type"})),
        )
            .into_response();
    };

    match forward(&state, kind, request).await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(error = %e, "Proxy error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Internal Server Error"})),
            )
                .into_response()
        }
    }
}

async fn forward(state: &ProxyState, kind: Inbound, request: Request) -> Result<Response> {
    let builder = state.client.post(state.webhook_url.as_ref());

    let builder = match kind {
        Inbound::Json => {
            let bytes = axum::body::to_bytes(request.into_body(), state.body_limit).await?;
            let body: Value = serde_json::from_slice(&bytes)?;
            builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(serde_json::to_vec(&body)?)
        }
        // The client sets the multipart content type so the boundary matches the body
        Inbound::Multipart => builder.multipart(rebuild_form(request, state).await?),
    };

    let response = builder.send().await?;
    let status = response.status();

    if !status.is_success() {
        let details = response.text().await?;
        tracing::warn!(status = status.as_u16(), details = %details, "Webhook returned failure");
        return Ok((
            status,
            Json(json!({"error": "Backend Error", "details": details})),
        )
            .into_response());
    }

    let data: Value = response.json().await?;
    Ok(Json(data).into_response())
}

/// Copy `file`, `message` and `sessionId` into a fresh form, skipping
/// absent or empty fields. Anything else in the inbound form is dropped.
async fn rebuild_form(request: Request, state: &ProxyState) -> Result<Form> {
    let mut multipart = Multipart::from_request(request, state).await?;

    let mut file: Option<Part> = None;
    let mut message: Option<String> = None;
    let mut session_id: Option<String> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await?;

                let mut part = Part::bytes(bytes.to_vec())
                    .file_name(file_name.unwrap_or_else(|| "file".to_string()));
                if let Some(mime) = content_type {
                    part = part.mime_str(&mime)?;
                }
                file = Some(part);
            }
            "message" => message = Some(field.text().await?).filter(|s| !s.is_empty()),
            "sessionId" => session_id = Some(field.text().await?).filter(|s| !s.is_empty()),
            other => tracing::debug!(field = %other, "Ignoring form field"),
        }
    }

    let mut form = Form::new();
    if let Some(part) = file {
        form = form.part("file", part);
    }
    if let Some(message) = message {
        form = form.text("message", message);
    }
    if let Some(session_id) = session_id {
        form = form.text("sessionId", session_id);
    }
    Ok(form)
}

#[cfg(test)]
mod tests {
    use crate::{router, ProxyConfig};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const BOUNDARY: &str = "RaveTestBoundary";

    fn config_for(server: &MockServer) -> ProxyConfig {
        ProxyConfig::new(&format!("{}/webhook/chat", server.uri()))
    }

    fn json_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/chat")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn multipart_request(fields: &[(&str, Option<&str>, &str)]) -> Request<Body> {
        let mut body = String::new();
        for (name, file_name, value) in fields {
            body.push_str(&format!("--{BOUNDARY}\r\n"));
            match file_name {
                Some(file_name) => {
                    body.push_str(&format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n"
                    ));
                    body.push_str("Content-Type: audio/wav\r\n\r\n");
                }
                None => body.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{name}\"\r\n\r\n"
                )),
            }
            body.push_str(value);
            body.push_str("\r\n");
        }
        body.push_str(&format!("--{BOUNDARY}--\r\n"));

        Request::builder()
            .method("POST")
            .uri("/api/chat")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn read_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn last_upstream_body(server: &MockServer) -> String {
        let requests = server.received_requests().await.unwrap();
        let request = requests.last().unwrap();
        String::from_utf8(request.body.clone()).unwrap()
    }

    #[tokio::test]
    async fn test_json_is_forwarded() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/webhook/chat"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({"message": "hello", "sessionId": "session-1-abc"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"output": "hi"})))
            .expect(1)
            .mount(&server)
            .await;

        let response = router(&config_for(&server))
            .oneshot(json_request(
                r#"{"message":"hello","sessionId":"session-1-abc"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(read_json(response).await, json!({"output": "hi"}));
    }

    #[tokio::test]
    async fn test_upstream_failure_is_relayed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
            .mount(&server)
            .await;

        let response = router(&config_for(&server))
            .oneshot(json_request(r#"{"message":"hello","sessionId":"s"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = read_json(response).await;
        assert_eq!(body["error"], "Backend Error");
        assert!(body["details"].as_str().unwrap().contains("upstream down"));
    }

    #[tokio::test]
    async fn test_json_with_charset_is_forwarded() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({"message": "hello", "sessionId": "s"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"output": "hi"})))
            .expect(1)
            .mount(&server)
            .await;

        let request = Request::builder()
            .method("POST")
            .uri("/api/chat")
            .header("content-type", "application/json; charset=utf-8")
            .body(Body::from(r#"{"message":"hello","sessionId":"s"}"#))
            .unwrap();

        let response = router(&config_for(&server)).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(read_json(response).await, json!({"output": "hi"}));
    }

    #[tokio::test]
    async fn test_multipart_upstream_failure_is_relayed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
            .expect(1)
            .mount(&server)
            .await;

        let response = router(&config_for(&server))
            .oneshot(multipart_request(&[
                ("file", Some("clip.wav"), "RIFF"),
                ("sessionId", None, "session-1-abc"),
            ]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = read_json(response).await;
        assert_eq!(body["error"], "Backend Error");
        assert!(body["details"].as_str().unwrap().contains("upstream down"));
    }

    #[tokio::test]
    async fn test_unsupported_content_type() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let request = Request::builder()
            .method("POST")
            .uri("/api/chat")
            .header("content-type", "text/plain")
            .body(Body::from("hello"))
            .unwrap();

        let response = router(&config_for(&server)).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            read_json(response).await,
            json!({"error": "Unsupported Content-Type"})
        );
    }

    #[tokio::test]
    async fn test_missing_content_type_is_unsupported() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/chat")
            .body(Body::from("{}"))
            .unwrap();

        let response = router(&ProxyConfig::new("")).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_multipart_is_rebuilt() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/webhook/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "heard you"})))
            .expect(1)
            .mount(&server)
            .await;

        let response = router(&config_for(&server))
            .oneshot(multipart_request(&[
                ("file", Some("clip.wav"), "RIFFdata"),
                ("message", None, "listen"),
                ("sessionId", None, "session-1-abc"),
                ("extra", None, "dropped"),
            ]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(read_json(response).await, json!({"message": "heard you"}));

        let upstream = last_upstream_body(&server).await;
        assert!(upstream.contains(r#"name="file"; filename="clip.wav""#));
        assert!(upstream.contains("RIFFdata"));
        assert!(upstream.contains(r#"name="message""#));
        assert!(upstream.contains("session-1-abc"));
        assert!(!upstream.contains("dropped"));
        assert!(!upstream.contains(BOUNDARY));
    }

    #[tokio::test]
    async fn test_multipart_skips_empty_fields() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"output": "ok"})))
            .mount(&server)
            .await;

        let response = router(&config_for(&server))
            .oneshot(multipart_request(&[
                ("file", Some("clip.wav"), "RIFF"),
                ("message", None, ""),
                ("sessionId", None, "session-1-abc"),
            ]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let upstream = last_upstream_body(&server).await;
        assert!(!upstream.contains(r#"name="message""#));
        assert!(upstream.contains(r#"name="sessionId""#));
    }

    #[tokio::test]
    async fn test_malformed_json_is_internal_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let response = router(&config_for(&server))
            .oneshot(json_request("{not json"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            read_json(response).await,
            json!({"error": "Internal Server Error"})
        );
    }

    #[tokio::test]
    async fn test_non_json_reply_is_internal_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("plain text"))
            .mount(&server)
            .await;

        let response = router(&config_for(&server))
            .oneshot(json_request(r#"{"message":"hi","sessionId":"s"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_empty_webhook_url_fails() {
        let response = router(&ProxyConfig::new(""))
            .oneshot(json_request(r#"{"message":"hi","sessionId":"s"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            read_json(response).await,
            json!({"error": "Internal Server Error"})
        );
    }

    #[tokio::test]
    async fn test_health() {
        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let response = router(&ProxyConfig::new("")).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(read_json(response).await, json!({"status": "ok"}));
    }
}
