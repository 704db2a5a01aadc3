//! Docs API HTTP client.
//!
//! Blocking reqwest client (no Tokio runtime required). Two calls: fetch a
//! document body and apply one batch update.

use std::time::Duration;

use gdoctable_planner::{DocumentService, ServiceError};
use gdoctable_protocol::{BatchUpdateDocumentRequest, Document, Request, DOCUMENT_FIELDS};

/// Docs API client (blocking).
#[derive(Clone)]
pub struct DocsClient {
    http: reqwest::blocking::Client,
    api_base: String,
    token: String,
}

/// Error type for Docs API calls.
#[derive(Debug)]
pub enum DocsError {
    /// No token from flag, environment, or saved credentials
    NotAuthenticated,
    /// Network error
    Network(String),
    /// HTTP error with status code
    Http(u16, String),
    /// JSON parsing error
    Parse(String),
    /// Service rejected the request (400/422 with message)
    Validation(u16, String),
}

impl std::fmt::Display for DocsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocsError::NotAuthenticated => write!(f, "Not authenticated: run `gdoctable login` first"),
            DocsError::Network(msg) => write!(f, "Network error: {}", msg),
            DocsError::Http(code, msg) => write!(f, "HTTP {}: {}", code, msg),
            DocsError::Parse(msg) => write!(f, "Parse error: {}", msg),
            DocsError::Validation(_, msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for DocsError {}

impl From<DocsError> for ServiceError {
    fn from(err: DocsError) -> Self {
        match err {
            DocsError::Http(status, msg) | DocsError::Validation(status, msg) => {
                ServiceError::with_status(status, msg)
            }
            other => ServiceError::new(other.to_string()),
        }
    }
}

impl DocsClient {
    pub fn new(api_base: &str, token: &str, timeout: Duration) -> Result<Self, DocsError> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(format!("gdoctable/{}", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| DocsError::Network(e.to_string()))?;

        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    /// Fetch the document body, restricted to the fields table work needs.
    pub fn get_document(&self, document_id: &str) -> Result<Document, DocsError> {
        let raw = self.get_document_json(document_id)?;
        serde_json::from_value(raw).map_err(|e| DocsError::Parse(e.to_string()))
    }

    /// Same request as [`DocsClient::get_document`], body left as JSON.
    pub fn get_document_json(&self, document_id: &str) -> Result<serde_json::Value, DocsError> {
        let url = format!("{}/v1/documents/{}", self.api_base, document_id);
        log::debug!("GET {}", url);
        let resp = self.get(&url, &[("fields", DOCUMENT_FIELDS)])?;
        resp.json().map_err(|e| DocsError::Parse(e.to_string()))
    }

    /// Apply one batch in order. The service applies all of it or none of it.
    pub fn batch_update(&self, document_id: &str, requests: Vec<Request>) -> Result<serde_json::Value, DocsError> {
        let url = format!("{}/v1/documents/{}:batchUpdate", self.api_base, document_id);
        log::debug!("POST {} ({} request(s))", url, requests.len());
        let body = BatchUpdateDocumentRequest { requests };
        let resp = self.post_json(&url, &body)?;
        resp.json().map_err(|e| DocsError::Parse(e.to_string()))
    }

    fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<reqwest::blocking::Response, DocsError> {
        let response = self.http.get(url)
            .query(query)
            .bearer_auth(&self.token)
            .send()
            .map_err(|e| DocsError::Network(e.to_string()))?;

        check_status(response)
    }

    fn post_json<T: serde::Serialize>(&self, url: &str, body: &T) -> Result<reqwest::blocking::Response, DocsError> {
        let response = self.http.post(url)
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .map_err(|e| DocsError::Network(e.to_string()))?;

        check_status(response)
    }
}

impl DocumentService for DocsClient {
    fn get_document(&mut self, document_id: &str) -> Result<serde_json::Value, ServiceError> {
        DocsClient::get_document_json(self, document_id).map_err(ServiceError::from)
    }

    fn batch_update(&mut self, document_id: &str, requests: Vec<Request>) -> Result<serde_json::Value, ServiceError> {
        DocsClient::batch_update(self, document_id, requests).map_err(ServiceError::from)
    }
}

fn check_status(response: reqwest::blocking::Response) -> Result<reqwest::blocking::Response, DocsError> {
    let status = response.status().as_u16();
    if response.status().is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    let message = error_message(&body);
    if status == 422 || status == 400 {
        return Err(DocsError::Validation(status, message));
    }
    Err(DocsError::Http(status, message))
}

/// `error.message` from a Google API error body, or the raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|json| json["error"]["message"].as_str().map(String::from))
        .unwrap_or_else(|| body.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gdoctable_protocol::{InsertTextRequest, Location};
    use httpmock::prelude::*;

    fn client(server: &MockServer) -> DocsClient {
        DocsClient::new(&server.base_url(), "tok", Duration::from_secs(5)).unwrap()
    }

    // ── Unit tests ──────────────────────────────────────────────────

    #[test]
    fn test_error_message_prefers_api_message() {
        let body = r#"{"error":{"code":400,"message":"Invalid requests[0].insertText","status":"INVALID_ARGUMENT"}}"#;
        assert_eq!(error_message(body), "Invalid requests[0].insertText");
        assert_eq!(error_message("  gateway down \n"), "gateway down");
    }

    #[test]
    fn test_docs_error_into_service_error() {
        let err: ServiceError = DocsError::Validation(400, "bad index".into()).into();
        assert_eq!(err.status, Some(400));
        assert_eq!(err.message, "bad index");

        let err: ServiceError = DocsError::Network("reset".into()).into();
        assert_eq!(err.status, None);
        assert!(err.message.contains("reset"));
    }

    // ── httpmock tests ──────────────────────────────────────────────

    #[test]
    fn test_get_document_sends_field_mask_and_token() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/v1/documents/doc-1")
                .query_param("fields", DOCUMENT_FIELDS)
                .header("authorization", "Bearer tok");
            then.status(200).json_body(serde_json::json!({
                "body": {"content": [
                    {"endIndex": 1, "sectionBreak": {}},
                    {"startIndex": 1, "endIndex": 2, "paragraph": {"elements": [
                        {"startIndex": 1, "endIndex": 2, "textRun": {"content": "\n"}}
                    ]}}
                ]}
            }));
        });

        let doc = client(&server).get_document("doc-1").unwrap();

        mock.assert();
        assert_eq!(doc.content().len(), 2);
        assert_eq!(doc.content()[1].start_index, 1);
    }

    #[test]
    fn test_batch_update_posts_requests_in_order() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/v1/documents/doc-1:batchUpdate")
                .json_body(serde_json::json!({"requests": [
                    {"insertText": {"location": {"index": 20}, "text": "b"}},
                    {"insertText": {"location": {"index": 14}, "text": "a"}}
                ]}));
            then.status(200).json_body(serde_json::json!({"documentId": "doc-1", "replies": [{}, {}]}));
        });

        let requests = vec![
            Request::InsertText(InsertTextRequest { location: Location::at(20), text: "b".into() }),
            Request::InsertText(InsertTextRequest { location: Location::at(14), text: "a".into() }),
        ];
        let response = client(&server).batch_update("doc-1", requests).unwrap();

        mock.assert();
        assert_eq!(response["documentId"], "doc-1");
    }

    #[test]
    fn test_rejected_batch_is_validation_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/v1/documents/doc-1:batchUpdate");
            then.status(400).json_body(serde_json::json!({
                "error": {"code": 400, "message": "Index 99 must be less than the end index", "status": "INVALID_ARGUMENT"}
            }));
        });

        let err = client(&server).batch_update("doc-1", vec![]).unwrap_err();

        match err {
            DocsError::Validation(status, msg) => {
                assert_eq!(status, 400);
                assert!(msg.contains("Index 99"));
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_document_through_service_trait() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/v1/documents/nope");
            then.status(404).json_body(serde_json::json!({
                "error": {"code": 404, "message": "Requested entity was not found.", "status": "NOT_FOUND"}
            }));
        });

        let mut docs = client(&server);
        let err = DocumentService::get_document(&mut docs, "nope").unwrap_err();

        assert_eq!(err.status, Some(404));
        assert_eq!(err.message, "Requested entity was not found.");
    }

    #[test]
    fn test_service_trait_returns_body_verbatim() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/v1/documents/doc-1");
            then.status(200).json_body(serde_json::json!({
                "documentId": "doc-1",
                "revisionId": "ALm37BV",
                "body": {"content": []}
            }));
        });

        let mut docs = client(&server);
        let raw = DocumentService::get_document(&mut docs, "doc-1").unwrap();
        assert_eq!(raw["revisionId"], "ALm37BV");
    }

    #[test]
    fn test_unparseable_body_is_parse_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/v1/documents/doc-1");
            then.status(200).body("not json");
        });

        let err = client(&server).get_document("doc-1").unwrap_err();
        assert!(matches!(err, DocsError::Parse(_)));
    }

    #[test]
    fn test_trailing_slash_in_base_is_ignored() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/v1/documents/doc-1");
            then.status(200).json_body(serde_json::json!({"body": {"content": []}}));
        });

        let base = format!("{}/", server.base_url());
        DocsClient::new(&base, "tok", Duration::from_secs(5))
            .unwrap()
            .get_document("doc-1")
            .unwrap();
        mock.assert();
    }
}
