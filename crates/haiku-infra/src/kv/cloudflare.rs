//! Cloudflare Workers KV store over the v4 REST API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use haiku_core::ports::{KvError, KvStore};

const DEFAULT_API_BASE: &str = "https://api.cloudflare.com/client/v4";

/// Cloudflare KV namespace configuration.
#[derive(Debug, Clone)]
pub struct CloudflareKvConfig {
    /// API base URL (e.g., https://api.cloudflare.com/client/v4)
    pub api_base: String,
    pub account_id: String,
    pub namespace_id: String,
    /// Bearer token with KV read/write permission
    pub api_token: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl CloudflareKvConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` unless account id, namespace id, and token are all set.
    pub fn from_env() -> Option<Self> {
        let account_id = std::env::var("CLOUDFLARE_ACCOUNT_ID").ok()?;
        let namespace_id = std::env::var("CLOUDFLARE_NAMESPACE_ID").ok()?;
        let api_token = std::env::var("CLOUDFLARE_API_TOKEN").ok()?;

        Some(Self {
            api_base: std::env::var("CLOUDFLARE_API_BASE")
                .unwrap_or_else(|_| DEFAULT_API_BASE.to_string()),
            account_id,
            namespace_id,
            api_token,
            timeout: Duration::from_secs(
                std::env::var("HTTP_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            ),
        })
    }
}

/// Standard Cloudflare API response envelope.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    success: bool,
    #[serde(default)]
    errors: Vec<ApiMessage>,
    result: Option<T>,
    result_info: Option<ResultInfo>,
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    code: Option<i64>,
    message: String,
}

#[derive(Debug, Deserialize)]
struct KeyEntry {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ResultInfo {
    cursor: Option<String>,
}

impl<T> Envelope<T> {
    fn error_summary(&self) -> String {
        if self.errors.is_empty() {
            return "unsuccessful response".to_string();
        }
        self.errors
            .iter()
            .map(|e| match e.code {
                Some(code) => format!("{} ({})", e.message, code),
                None => e.message.clone(),
            })
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// The cursor for the next page, if any.
    fn next_cursor(&self) -> Option<&str> {
        self.result_info
            .as_ref()
            .and_then(|info| info.cursor.as_deref())
            .filter(|c| !c.is_empty())
    }
}

/// Cloudflare-backed KV store.
///
/// Holds one `reqwest::Client` for connection reuse across calls.
pub struct CloudflareKvStore {
    client: Client,
    namespace_url: Url,
    api_token: String,
}

impl CloudflareKvStore {
    pub fn new(config: CloudflareKvConfig) -> Result<Self, KvError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| KvError::Request(e.to_string()))?;

        let namespace_url = namespace_url(&config)?;

        tracing::info!(
            account_id = %config.account_id,
            namespace_id = %config.namespace_id,
            "Cloudflare KV store configured"
        );

        Ok(Self {
            client,
            namespace_url,
            api_token: config.api_token,
        })
    }

    /// Create from environment configuration.
    pub fn from_env() -> Option<Result<Self, KvError>> {
        CloudflareKvConfig::from_env().map(Self::new)
    }

    fn url(&self, segments: &[&str]) -> Result<Url, KvError> {
        join_segments(&self.namespace_url, segments)
    }

    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, KvError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(KvError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn read_envelope<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<Envelope<T>, KvError> {
        let response = Self::ensure_success(response).await?;
        let envelope: Envelope<T> = response
            .json()
            .await
            .map_err(|e| KvError::Api(format!("malformed envelope: {}", e)))?;

        if !envelope.success {
            return Err(KvError::Api(envelope.error_summary()));
        }
        Ok(envelope)
    }
}

fn namespace_url(config: &CloudflareKvConfig) -> Result<Url, KvError> {
    let base = Url::parse(&config.api_base)
        .map_err(|e| KvError::Request(format!("invalid API base {}: {}", config.api_base, e)))?;
    join_segments(
        &base,
        &[
            "accounts",
            config.account_id.as_str(),
            "storage",
            "kv",
            "namespaces",
            config.namespace_id.as_str(),
        ],
    )
}

/// Append path segments, percent-encoding each one.
fn join_segments(base: &Url, segments: &[&str]) -> Result<Url, KvError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| KvError::Request(format!("URL cannot be a base: {}", base)))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

#[async_trait]
impl KvStore for CloudflareKvStore {
    async fn list_keys(&self, prefix: &str) -> Result<Vec<String>, KvError> {
        let url = self.url(&["keys"])?;
        let mut keys = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut request = self
                .client
                .get(url.clone())
                .bearer_auth(&self.api_token)
                .query(&[("prefix", prefix)]);
            if let Some(c) = &cursor {
                request = request.query(&[("cursor", c.as_str())]);
            }

            let response = request
                .send()
                .await
                .map_err(|e| KvError::Request(e.to_string()))?;
            let envelope: Envelope<Vec<KeyEntry>> = Self::read_envelope(response).await?;

            cursor = envelope.next_cursor().map(String::from);
            let page = envelope.result.unwrap_or_default();
            tracing::debug!(prefix = %prefix, count = page.len(), "Listed KV keys page");

            keys.extend(
                page.into_iter()
                    .map(|k| k.name)
                    .filter(|name| name.starts_with(prefix)),
            );

            if cursor.is_none() {
                break;
            }
        }

        Ok(keys)
    }

    async fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        let response = self
            .client
            .get(self.url(&["values", key])?)
            .bearer_auth(&self.api_token)
            .send()
            .await
            .map_err(|e| KvError::Request(e.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let response = Self::ensure_success(response).await?;
        let body = response
            .text()
            .await
            .map_err(|e| KvError::Request(e.to_string()))?;
        Ok(Some(body))
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), KvError> {
        let response = self
            .client
            .put(self.url(&["values", key])?)
            .bearer_auth(&self.api_token)
            .header(reqwest::header::CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(value.to_string())
            .send()
            .await
            .map_err(|e| KvError::Request(e.to_string()))?;

        Self::read_envelope::<serde_json::Value>(response).await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), KvError> {
        let response = self
            .client
            .delete(self.url(&["values", key])?)
            .bearer_auth(&self.api_token)
            .send()
            .await
            .map_err(|e| KvError::Request(e.to_string()))?;

        Self::read_envelope::<serde_json::Value>(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use actix_web::http::header;
    use actix_web::{App, HttpRequest, HttpResponse, HttpServer, web};
    use serde_json::json;

    use super::*;
    use crate::kv::InMemoryKvStore;

    fn test_config(api_base: &str) -> CloudflareKvConfig {
        CloudflareKvConfig {
            api_base: api_base.to_string(),
            account_id: "acct".to_string(),
            namespace_id: "ns".to_string(),
            api_token: "token".to_string(),
            timeout: Duration::from_secs(1),
        }
    }

    #[test]
    fn test_namespace_url() {
        let url = namespace_url(&test_config(DEFAULT_API_BASE)).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.cloudflare.com/client/v4/accounts/acct/storage/kv/namespaces/ns"
        );
    }

    #[test]
    fn test_namespace_url_tolerates_trailing_slash() {
        let url = namespace_url(&test_config("http://localhost:8787/v4/")).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8787/v4/accounts/acct/storage/kv/namespaces/ns"
        );
    }

    #[test]
    fn test_value_key_is_percent_encoded() {
        let base = namespace_url(&test_config(DEFAULT_API_BASE)).unwrap();
        let url = join_segments(&base, &["values", "haiku_a/b c"]).unwrap();
        assert!(url.as_str().ends_with("/values/haiku_a%2Fb%20c"));
    }

    #[test]
    fn test_envelope_cursor_and_errors() {
        let page: Envelope<Vec<KeyEntry>> = serde_json::from_str(
            r#"{"success":true,"errors":[],"result":[{"name":"haiku_1"}],
                "result_info":{"count":1,"cursor":"abc"}}"#,
        )
        .unwrap();
        assert_eq!(page.next_cursor(), Some("abc"));
        assert_eq!(page.result.unwrap()[0].name, "haiku_1");

        let last: Envelope<Vec<KeyEntry>> = serde_json::from_str(
            r#"{"success":true,"result":[],"result_info":{"count":0,"cursor":""}}"#,
        )
        .unwrap();
        assert_eq!(last.next_cursor(), None);

        let failed: Envelope<serde_json::Value> = serde_json::from_str(
            r#"{"success":false,"errors":[{"code":10000,"message":"Authentication error"}],"result":null}"#,
        )
        .unwrap();
        assert_eq!(failed.error_summary(), "Authentication error (10000)");
    }

    #[tokio::test]
    async fn test_cloudflare_round_trip() {
        // Needs a real namespace; skipped unless CLOUDFLARE_* is configured.
        let store = match CloudflareKvStore::from_env() {
            Some(Ok(s)) => s,
            _ => return,
        };

        let key = "haiku_test_round_trip";
        store.put(key, r#"{"text":"round trip"}"#).await.unwrap();
        assert_eq!(
            store.get(key).await.unwrap().as_deref(),
            Some(r#"{"text":"round trip"}"#)
        );
        store.delete(key).await.unwrap();
        assert_eq!(store.get(key).await.unwrap(), None);
    }

    // Local stand-in for the KV REST API, backed by an in-memory store.
    // `haiku_broken` reads fail with 500, `haiku_readonly` writes and
    // `haiku_locked` deletes come back with `success: false`.

    type Backing = web::Data<InMemoryKvStore>;
    type ValuePath = web::Path<(String, String, String)>;

    fn authorized(req: &HttpRequest) -> bool {
        req.headers()
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            == Some("Bearer token")
    }

    fn api_success() -> HttpResponse {
        HttpResponse::Ok().json(json!({ "success": true, "errors": [], "result": null }))
    }

    fn api_failure(code: i64, message: &str) -> HttpResponse {
        HttpResponse::Ok().json(json!({
            "success": false,
            "errors": [{ "code": code, "message": message }],
            "result": null
        }))
    }

    async fn mock_list_keys(
        req: HttpRequest,
        query: web::Query<HashMap<String, String>>,
    ) -> HttpResponse {
        if !authorized(&req) {
            return HttpResponse::Unauthorized().body("bad token");
        }
        if query.get("prefix").map(String::as_str) != Some("haiku_") {
            return HttpResponse::BadRequest().body("missing prefix");
        }
        // Two pages; the first carries a key the client must filter out.
        let (names, cursor) = match query.get("cursor").map(String::as_str) {
            None => (vec!["haiku_1", "other_1", "haiku_2"], "page2"),
            Some("page2") => (vec!["haiku_3"], ""),
            Some(_) => return HttpResponse::BadRequest().body("unknown cursor"),
        };
        let result: Vec<_> = names.iter().map(|name| json!({ "name": name })).collect();
        HttpResponse::Ok().json(json!({
            "success": true,
            "errors": [],
            "result": result,
            "result_info": { "count": result.len(), "cursor": cursor }
        }))
    }

    async fn mock_get_value(req: HttpRequest, path: ValuePath, data: Backing) -> HttpResponse {
        if !authorized(&req) {
            return HttpResponse::Unauthorized().body("bad token");
        }
        let (_, _, key) = path.into_inner();
        if key == "haiku_broken" {
            return HttpResponse::InternalServerError().body("boom");
        }
        match data.get(&key).await.unwrap() {
            Some(value) => HttpResponse::Ok().body(value),
            None => HttpResponse::NotFound().json(json!({
                "success": false,
                "errors": [{ "code": 10009, "message": "get: 'key not found'" }]
            })),
        }
    }

    async fn mock_put_value(
        req: HttpRequest,
        path: ValuePath,
        body: String,
        data: Backing,
    ) -> HttpResponse {
        if !authorized(&req) {
            return HttpResponse::Unauthorized().body("bad token");
        }
        let (_, _, key) = path.into_inner();
        if key == "haiku_readonly" {
            return api_failure(10001, "namespace is read-only");
        }
        data.put(&key, &body).await.unwrap();
        api_success()
    }

    async fn mock_delete_value(req: HttpRequest, path: ValuePath, data: Backing) -> HttpResponse {
        if !authorized(&req) {
            return HttpResponse::Unauthorized().body("bad token");
        }
        let (_, _, key) = path.into_inner();
        if key == "haiku_locked" {
            return api_failure(10002, "key is locked");
        }
        data.delete(&key).await.unwrap();
        api_success()
    }

    /// Start the mock API on an ephemeral port and return its base URL.
    async fn start_mock_api(seed: &[(&str, &str)]) -> String {
        let backing = web::Data::new(InMemoryKvStore::new());
        for (key, value) in seed {
            backing.put(key, value).await.unwrap();
        }

        let server = HttpServer::new(move || {
            App::new().app_data(backing.clone()).service(
                web::scope("/client/v4/accounts/{account}/storage/kv/namespaces/{namespace}")
                    .route("/keys", web::get().to(mock_list_keys))
                    .route("/values/{key}", web::get().to(mock_get_value))
                    .route("/values/{key}", web::put().to(mock_put_value))
                    .route("/values/{key}", web::delete().to(mock_delete_value)),
            )
        })
        .workers(1)
        .disable_signals()
        .bind(("127.0.0.1", 0))
        .unwrap();

        let addr = server.addrs()[0];
        actix_web::rt::spawn(server.run());
        format!("http://{}/client/v4", addr)
    }

    async fn mock_store(seed: &[(&str, &str)]) -> CloudflareKvStore {
        let api_base = start_mock_api(seed).await;
        CloudflareKvStore::new(test_config(&api_base)).unwrap()
    }

    #[actix_web::test]
    async fn test_list_keys_follows_cursor() {
        let store = mock_store(&[]).await;
        let keys = store.list_keys("haiku_").await.unwrap();
        assert_eq!(keys, ["haiku_1", "haiku_2", "haiku_3"]);
    }

    #[actix_web::test]
    async fn test_get_value_and_missing_key() {
        let store = mock_store(&[("haiku_1", r#"{"text":"old pond"}"#)]).await;

        assert_eq!(
            store.get("haiku_1").await.unwrap().as_deref(),
            Some(r#"{"text":"old pond"}"#)
        );
        assert_eq!(store.get("haiku_missing").await.unwrap(), None);
    }

    #[actix_web::test]
    async fn test_get_server_error_is_status() {
        let store = mock_store(&[]).await;
        let err = store.get("haiku_broken").await.unwrap_err();
        assert!(matches!(
            err,
            KvError::Status { status: 500, ref body } if body == "boom"
        ));
    }

    #[actix_web::test]
    async fn test_put_then_delete() {
        let store = mock_store(&[]).await;

        store.put("haiku_new", "fresh snow").await.unwrap();
        assert_eq!(store.get("haiku_new").await.unwrap().as_deref(), Some("fresh snow"));

        store.delete("haiku_new").await.unwrap();
        assert_eq!(store.get("haiku_new").await.unwrap(), None);
    }

    #[actix_web::test]
    async fn test_unsuccessful_envelope_is_api_error() {
        let store = mock_store(&[("haiku_locked", "still here")]).await;

        let err = store.put("haiku_readonly", "x").await.unwrap_err();
        assert!(matches!(err, KvError::Api(ref msg) if msg == "namespace is read-only (10001)"));

        let err = store.delete("haiku_locked").await.unwrap_err();
        assert!(matches!(err, KvError::Api(ref msg) if msg == "key is locked (10002)"));
        assert!(store.get("haiku_locked").await.unwrap().is_some());
    }

    #[actix_web::test]
    async fn test_rejected_token_is_status() {
        let api_base = start_mock_api(&[]).await;
        let store = CloudflareKvStore::new(CloudflareKvConfig {
            api_token: "wrong".to_string(),
            ..test_config(&api_base)
        })
        .unwrap();

        let err = store.list_keys("haiku_").await.unwrap_err();
        assert!(matches!(err, KvError::Status { status: 401, .. }));
    }
}
