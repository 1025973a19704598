use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex as StdMutex};

use axum::{
    body::Body,
    extract::{Path, State},
    http::{HeaderMap, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use blob_download::{AuthBackend, BackendError, DownloadSink, SinkError};
use serde_json::Value;
use server::db::AppState;
use server::signing::SharedKeySigner;
use server::storage::StorageService;
use shared_types::{AppError, BlobLocation, DownloadMode, StorageEndpoint, STORAGE_API_VERSION};
use sqlx::{Pool, Postgres};
use tokio::sync::Mutex;
use tower::ServiceExt;

pub const ACCOUNT: &str = "devstoreaccount1";
pub const CONTAINER: &str = "case-attachments";
/// base64("test-account-key")
pub const ACCOUNT_KEY: &str = "dGVzdC1hY2NvdW50LWtleQ==";
/// base64("some-other-key")
pub const OTHER_KEY: &str = "c29tZS1vdGhlci1rZXk=";
pub const PDF_BYTES: &[u8] = &[0x25, 0x50, 0x44, 0x46];

/// Global mutex ensuring database tests run sequentially against the shared
/// database.
static TEST_MUTEX: std::sync::LazyLock<Mutex<()>> = std::sync::LazyLock::new(|| Mutex::new(()));

// ── Routers ─────────────────────────────────────────────────────────

/// Router over a storage service with no database behind it. The pool is
/// lazy and never connects unless a metadata route is hit.
pub fn storage_app(endpoint: StorageEndpoint, key: Option<&str>, mode: DownloadMode) -> Router {
    let signer = key.map(|k| SharedKeySigner::from_base64(k).expect("test key is valid base64"));
    let storage = StorageService::new(endpoint, signer).with_mode(mode);
    let pool = server::db::create_pool_for("postgres://attachments@127.0.0.1:1/unused");
    server::openapi::router_with_state(AppState::new(pool, storage))
}

/// Router backed by a real Postgres pool with `case_attachments` emptied.
///
/// Returns `None` (after a note on stderr) when no test database is
/// configured. The returned guard must be held for the duration of the test.
pub async fn test_app() -> Option<(Router, Pool<Postgres>, tokio::sync::MutexGuard<'static, ()>)> {
    let _ = dotenvy::dotenv();

    let Ok(database_url) =
        std::env::var("TEST_DATABASE_URL").or_else(|_| std::env::var("DATABASE_URL"))
    else {
        eprintln!("Skipping database test: TEST_DATABASE_URL or DATABASE_URL not set");
        return None;
    };

    let guard = TEST_MUTEX.lock().await;

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to test database");

    server::db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    sqlx::query("TRUNCATE case_attachments")
        .execute(&pool)
        .await
        .expect("Failed to truncate");

    let storage = StorageService::new(StorageEndpoint::new(ACCOUNT, CONTAINER), None);
    let router = server::openapi::router_with_state(AppState::new(pool.clone(), storage));

    Some((router, pool, guard))
}

// ── Request helpers ─────────────────────────────────────────────────

pub async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let req = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, req).await
}

pub async fn post_json(app: &Router, uri: &str, body: &Value) -> (StatusCode, Value) {
    let req = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    send(app, req).await
}

/// Send a request through the router and parse the response.
async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let (status, _headers, body_bytes) = send_raw(app, req).await;

    let body: Value = if body_bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap_or(Value::String(
            String::from_utf8_lossy(&body_bytes).to_string(),
        ))
    };

    (status, body)
}

/// Send a request and return raw bytes + status + headers (for file responses).
pub async fn send_raw(
    app: &Router,
    req: Request<Body>,
) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
    let response = app
        .clone()
        .oneshot(req)
        .await
        .expect("Failed to send request");

    let status = response.status();
    let headers = response.headers().clone();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");

    (status, headers, body_bytes.to_vec())
}

/// Query string addressing `location` on the proxy route.
pub fn file_query(location: &BlobLocation) -> String {
    format!(
        "/api/attachments/file?case_id={}&document_type={}&file_name={}",
        urlencoding::encode(&location.case_id),
        urlencoding::encode(&location.document_type),
        urlencoding::encode(&location.file_name)
    )
}

// ── Mock blob store ─────────────────────────────────────────────────

#[derive(Clone)]
struct MockStoreState {
    endpoint: StorageEndpoint,
    signer: Arc<SharedKeySigner>,
    blobs: Arc<HashMap<String, (Vec<u8>, Option<String>)>>,
    requests: Arc<AtomicUsize>,
}

/// HTTP server standing in for the blob service. Verifies the SharedKey
/// `Authorization` header of every GET before serving a blob.
pub struct MockBlobStore {
    endpoint: StorageEndpoint,
    requests: Arc<AtomicUsize>,
}

impl MockBlobStore {
    pub async fn start(blobs: Vec<(BlobLocation, Vec<u8>, Option<&str>)>) -> Self {
        Self::start_with_key(ACCOUNT_KEY, blobs).await
    }

    /// Store that verifies signatures against `key`.
    pub async fn start_with_key(key: &str, blobs: Vec<(BlobLocation, Vec<u8>, Option<&str>)>) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock blob store");
        let addr = listener.local_addr().expect("mock store address");
        let endpoint =
            StorageEndpoint::new(ACCOUNT, CONTAINER).with_endpoint_url(format!("http://{addr}"));

        let requests = Arc::new(AtomicUsize::new(0));
        let state = MockStoreState {
            endpoint: endpoint.clone(),
            signer: Arc::new(SharedKeySigner::from_base64(key).expect("test key is valid base64")),
            blobs: Arc::new(
                blobs
                    .into_iter()
                    .map(|(location, bytes, content_type)| {
                        (location.encoded_path(), (bytes, content_type.map(str::to_string)))
                    })
                    .collect(),
            ),
            requests: requests.clone(),
        };

        let app = Router::new()
            .route(
                "/{container}/{case_id}/{document_type}/{file_name}",
                get(serve_blob),
            )
            .with_state(state);
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock blob store stopped");
        });

        Self { endpoint, requests }
    }

    pub fn endpoint(&self) -> StorageEndpoint {
        self.endpoint.clone()
    }

    /// Number of blob GETs received so far.
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

fn storage_error(status: StatusCode, code: &str, message: &str) -> Response {
    (
        status,
        [("content-type", "application/xml")],
        format!(
            "<?xml version=\"1.0\" encoding=\"utf-8\"?><Error><Code>{code}</Code><Message>{message}</Message></Error>"
        ),
    )
        .into_response()
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> &'a str {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

async fn serve_blob(
    State(state): State<MockStoreState>,
    Path((container, case_id, document_type, file_name)): Path<(String, String, String, String)>,
    headers: HeaderMap,
) -> Response {
    state.requests.fetch_add(1, Ordering::SeqCst);

    if container != state.endpoint.container {
        return storage_error(
            StatusCode::NOT_FOUND,
            "ContainerNotFound",
            "The specified container does not exist.",
        );
    }

    let location = BlobLocation::new(case_id, document_type, file_name);
    let header = |name| header_value(&headers, name);

    let date = header("x-ms-date");
    let expected = state
        .endpoint
        .authorization_header(&state.signer.sign_get(&state.endpoint, &location, date));
    if date.is_empty()
        || header("x-ms-version") != STORAGE_API_VERSION
        || header("authorization") != expected
    {
        return storage_error(
            StatusCode::FORBIDDEN,
            "AuthenticationFailed",
            "Server failed to authenticate the request. Signature mismatch.",
        );
    }

    match state.blobs.get(&location.encoded_path()) {
        Some((bytes, Some(content_type))) => {
            ([("content-type", content_type.clone())], bytes.clone()).into_response()
        }
        Some((bytes, None)) => bytes.clone().into_response(),
        None => storage_error(
            StatusCode::NOT_FOUND,
            "BlobNotFound",
            "The specified blob does not exist.",
        ),
    }
}

// ── Client-side doubles ─────────────────────────────────────────────

/// Auth backend that calls the REST signing routes of `app`.
pub struct RestAuthBackend {
    app: Router,
    pub calls: StdMutex<Vec<&'static str>>,
}

impl RestAuthBackend {
    pub fn new(app: Router) -> Self {
        Self {
            app,
            calls: StdMutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }
}

fn backend_failure(status: StatusCode, body: &Value) -> BackendError {
    match serde_json::from_value::<AppError>(body.clone()) {
        Ok(err) => BackendError::from_app_error(&err),
        Err(_) => BackendError::unavailable(format!("HTTP {status}: {body}")),
    }
}

impl AuthBackend for RestAuthBackend {
    async fn formatted_timestamp(&self) -> Result<String, BackendError> {
        self.calls.lock().unwrap().push("timestamp");
        let (status, body) = get_json(&self.app, "/api/storage/timestamp").await;
        if status != StatusCode::OK {
            return Err(backend_failure(status, &body));
        }
        body["timestamp"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| BackendError::unavailable("timestamp missing from response"))
    }

    async fn auth_signature(
        &self,
        location: &BlobLocation,
        timestamp: &str,
    ) -> Result<String, BackendError> {
        self.calls.lock().unwrap().push("signature");
        let request = serde_json::json!({
            "case_id": location.case_id,
            "document_type": location.document_type,
            "file_name": location.file_name,
            "timestamp": timestamp,
        });
        let (status, body) = post_json(&self.app, "/api/storage/signature", &request).await;
        if status != StatusCode::OK {
            return Err(backend_failure(status, &body));
        }
        body["signature"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| BackendError::unavailable("signature missing from response"))
    }
}

/// Sink that keeps saved files in memory.
#[derive(Default)]
pub struct MemorySink {
    next_url: AtomicUsize,
    saved: StdMutex<HashMap<String, (Vec<u8>, String)>>,
    downloads: StdMutex<Vec<(String, Vec<u8>, String)>>,
    revoked: StdMutex<Vec<String>>,
}

impl MemorySink {
    /// Saved files as `(file_name, bytes, content_type)`.
    pub fn downloads(&self) -> Vec<(String, Vec<u8>, String)> {
        self.downloads.lock().unwrap().clone()
    }

    pub fn revoked(&self) -> Vec<String> {
        self.revoked.lock().unwrap().clone()
    }
}

impl DownloadSink for MemorySink {
    async fn create_object_url(&self, bytes: &[u8], content_type: &str) -> Result<String, SinkError> {
        let url = format!("blob:memory/{}", self.next_url.fetch_add(1, Ordering::SeqCst));
        self.saved
            .lock()
            .unwrap()
            .insert(url.clone(), (bytes.to_vec(), content_type.to_string()));
        Ok(url)
    }

    async fn click_download(&self, url: &str, file_name: &str) -> Result<(), SinkError> {
        let (bytes, content_type) = self
            .saved
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| SinkError(format!("unknown object URL {url}")))?;
        self.downloads
            .lock()
            .unwrap()
            .push((file_name.to_string(), bytes, content_type));
        Ok(())
    }

    fn revoke_object_url(&self, url: &str) {
        self.saved.lock().unwrap().remove(url);
        self.revoked.lock().unwrap().push(url.to_string());
    }
}
