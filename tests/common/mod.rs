use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use attendance::config::Config;
use attendance::db::{self, RecordStore, SqliteStore};
use attendance::email::{NotificationMessage, Notifier};
use attendance::models::{AttendanceRecord, NewAttendance};
use attendance::worker;

pub const TOKEN: &str = "secrettoken";
pub const ANN: &str = r#"{"Name":"Ann","SurfId":"ann123","EMail":"ann@example.com"}"#;

/// Notifier that keeps every message it is asked to send.
#[derive(Default)]
pub struct Outbox {
    sent: Mutex<Vec<NotificationMessage>>,
}

impl Outbox {
    pub fn sent(&self) -> Vec<NotificationMessage> {
        self.sent.lock().unwrap().clone()
    }

    /// Poll until at least `count` messages went out, or give up after two seconds.
    pub async fn wait_for(&self, count: usize) -> Vec<NotificationMessage> {
        for _ in 0..200 {
            let sent = self.sent();
            if sent.len() >= count {
                return sent;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        self.sent()
    }
}

#[async_trait]
impl Notifier for Outbox {
    async fn send(&self, message: &NotificationMessage) -> Result<(), String> {
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

/// Notifier that hangs for a while and then fails.
pub struct SlowFailingNotifier {
    pub delay: Duration,
}

#[async_trait]
impl Notifier for SlowFailingNotifier {
    async fn send(&self, _message: &NotificationMessage) -> Result<(), String> {
        tokio::time::sleep(self.delay).await;
        Err("Failed to send email: relay unreachable".to_string())
    }
}

/// Store whose every write fails.
pub struct BrokenStore;

#[async_trait]
impl RecordStore for BrokenStore {
    async fn insert(&self, _attendance: &NewAttendance) -> Result<AttendanceRecord, sqlx::Error> {
        Err(sqlx::Error::PoolClosed)
    }
}

/// A running test server backed by an in-memory database.
pub struct TestApp {
    pub addr: SocketAddr,
    pub pool: SqlitePool,
    pub client: Client,
    pub outbox: Arc<Outbox>,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// POST the `request` form field, optionally with an Authorization header.
    pub async fn submit(&self, authorization: Option<&str>, payload: &str) -> StatusCode {
        let request = self.client.post(self.url("/")).form(&[("request", payload)]);
        send(with_auth(request, authorization)).await
    }

    pub async fn records(&self) -> Vec<AttendanceRecord> {
        sqlx::query_as::<_, AttendanceRecord>(
            r#"SELECT id, "when", name, surf_id, e_mail FROM records ORDER BY id"#,
        )
        .fetch_all(&self.pool)
        .await
        .expect("Failed to list records")
    }
}

pub fn with_auth(request: RequestBuilder, authorization: Option<&str>) -> RequestBuilder {
    match authorization {
        Some(value) => request.header("Authorization", value),
        None => request,
    }
}

async fn send(request: RequestBuilder) -> StatusCode {
    request.send().await.expect("request failed").status()
}

pub fn test_config(tokens: &[&str]) -> Config {
    let tokens = tokens.join(",");
    Config::from_lookup(|key| match key {
        "ATTENDANCE_ALLOWED_TOKENS" => Some(tokens.clone()),
        "ATTENDANCE_BIND_ADDR" => Some("127.0.0.1:0".to_string()),
        "ATTENDANCE_MAX_BODY_SIZE" => Some("4096".to_string()),
        "ATTENDANCE_LOG_LEVEL" => Some("warn".to_string()),
        _ => None,
    })
    .expect("test config")
}

/// Spawn the app with the SQLite store and a recording notifier.
pub async fn spawn_app(tokens: &[&str]) -> TestApp {
    let outbox = Arc::new(Outbox::default());
    spawn_with(tokens, None, outbox.clone(), outbox).await
}

/// Spawn the app with explicit collaborators. `store: None` uses the in-memory database.
pub async fn spawn_with(
    tokens: &[&str],
    store: Option<Arc<dyn RecordStore>>,
    notifier: Arc<dyn Notifier>,
    outbox: Arc<Outbox>,
) -> TestApp {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database");

    db::migrate(&pool)
        .await
        .expect("Failed to run migrations on test database");

    let store = store.unwrap_or_else(|| Arc::new(SqliteStore::new(pool.clone())));
    let (dispatcher, _workers) = worker::start(notifier, 2, 64);
    let app = attendance::build_app(test_config(tokens), store, dispatcher);

    // Bind to random port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    TestApp {
        addr,
        pool,
        client: Client::new(),
        outbox,
    }
}

pub async fn cleanup(app: TestApp) {
    app.pool.close().await;
}
