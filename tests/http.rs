use once_cell::sync::Lazy;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
struct Item {
    id: u64,
    name: String,
}

#[derive(Debug, Deserialize)]
struct Entry {
    id: u64,
    description: String,
    amount: u32,
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Debug, Deserialize)]
struct View {
    balance: i64,
    chores: Vec<Item>,
    rewards: Vec<Item>,
    transactions: Vec<Entry>,
    editing_chore: Option<u64>,
}

struct TestServer {
    base_url: String,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

static TEST_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));
static SERVER: Lazy<Mutex<Option<Arc<TestServer>>>> = Lazy::new(|| Mutex::new(None));

#[cfg(unix)]
mod cleanup {
    use std::sync::Once;
    use std::sync::atomic::{AtomicI32, Ordering};

    static REGISTER: Once = Once::new();
    static PID: AtomicI32 = AtomicI32::new(0);

    pub fn register(pid: u32) {
        REGISTER.call_once(|| {
            PID.store(pid as i32, Ordering::SeqCst);
            unsafe {
                libc::atexit(on_exit);
            }
        });
    }

    extern "C" fn on_exit() {
        let pid = PID.load(Ordering::SeqCst);
        if pid > 0 {
            unsafe {
                libc::kill(pid, libc::SIGTERM);
            }
        }
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

fn unique_data_path() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!("chore_tracker_http_{}_{}.json", std::process::id(), nanos));
    path.to_string_lossy().to_string()
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/state")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_server() -> TestServer {
    let port = pick_free_port();
    let data_path = unique_data_path();
    let child = Command::new(env!("CARGO_BIN_EXE_chore_tracker"))
        .env("PORT", port.to_string())
        .env("APP_DATA_PATH", data_path)
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer { base_url, child }
}

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = Arc::new(spawn_server().await);
    *guard = Some(Arc::clone(&server));
    server
}

async fn state(client: &Client, server: &TestServer) -> View {
    client
        .get(format!("{}/api/state", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

async fn post(client: &Client, url: String, body: serde_json::Value) -> reqwest::Response {
    client.post(url).json(&body).send().await.unwrap()
}

#[tokio::test]
async fn http_complete_chore_credits_balance() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    let before = state(&client, &server).await;

    let added: View = post(
        &client,
        format!("{}/api/chores", server.base_url),
        serde_json::json!({ "name": "Dishes", "points": 5 }),
    )
    .await
    .json()
    .await
    .unwrap();
    let chore = added
        .chores
        .iter()
        .find(|c| c.name == "Dishes")
        .expect("chore listed");

    let response = client
        .post(format!("{}/api/chores/{}/complete", server.base_url, chore.id))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let after = state(&client, &server).await;
    assert_eq!(after.balance, before.balance + 5);
    let latest = &after.transactions[0];
    assert_eq!(latest.description, "Completed: Dishes");
    assert_eq!(latest.amount, 5);
    assert_eq!(latest.kind, "credit");

    let response = client
        .post(format!("{}/api/transactions/{}/undo", server.base_url, latest.id))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    assert_eq!(state(&client, &server).await.balance, before.balance);
}

#[tokio::test]
async fn http_redeem_without_points_is_conflict() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    let before = state(&client, &server).await;

    let added: View = post(
        &client,
        format!("{}/api/rewards", server.base_url),
        serde_json::json!({ "name": "Vacation", "cost": 4_000_000 }),
    )
    .await
    .json()
    .await
    .unwrap();
    let reward = added
        .rewards
        .iter()
        .find(|r| r.name == "Vacation")
        .expect("reward listed");

    let response = client
        .post(format!("{}/api/rewards/{}/redeem", server.base_url, reward.id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let after = state(&client, &server).await;
    assert_eq!(after.balance, before.balance);
    assert_eq!(after.transactions.len(), before.transactions.len());
}

#[tokio::test]
async fn http_invalid_chore_is_rejected() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = post(
        &client,
        format!("{}/api/chores", server.base_url),
        serde_json::json!({ "name": "   ", "points": 3 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = client
        .post(format!("{}/api/chores/999999/complete", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn http_malformed_body_is_bad_request() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    let before = state(&client, &server).await;

    let response = post(
        &client,
        format!("{}/api/chores", server.base_url),
        serde_json::json!({ "name": "Dishes", "points": "five" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = client
        .post(format!("{}/api/settings/sort", server.base_url))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    assert_eq!(state(&client, &server).await.chores.len(), before.chores.len());
}

#[tokio::test]
async fn http_direct_update_is_not_routed() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let added: View = post(
        &client,
        format!("{}/api/chores", server.base_url),
        serde_json::json!({ "name": "Vacuum", "points": 4 }),
    )
    .await
    .json()
    .await
    .unwrap();
    let id = added
        .chores
        .iter()
        .find(|c| c.name == "Vacuum")
        .expect("chore listed")
        .id;

    let response = client
        .put(format!("{}/api/chores/{id}", server.base_url))
        .json(&serde_json::json!({ "name": "Hoover", "points": 9 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

    let response = post(
        &client,
        format!("{}/api/chores/{id}/save", server.base_url),
        serde_json::json!({ "name": "Hoover", "points": 9 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let after = state(&client, &server).await;
    assert!(after.chores.iter().any(|c| c.id == id && c.name == "Vacuum"));
}

#[tokio::test]
async fn http_edit_flow_opens_one_item() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let added: View = post(
        &client,
        format!("{}/api/chores", server.base_url),
        serde_json::json!({ "name": "Laundry", "points": 2 }),
    )
    .await
    .json()
    .await
    .unwrap();
    let id = added
        .chores
        .iter()
        .find(|c| c.name == "Laundry")
        .expect("chore listed")
        .id;

    let editing: View = client
        .post(format!("{}/api/chores/{id}/edit", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(editing.editing_chore, Some(id));

    let saved: View = post(
        &client,
        format!("{}/api/chores/{id}/save", server.base_url),
        serde_json::json!({ "name": "Fold laundry", "points": 3 }),
    )
    .await
    .json()
    .await
    .unwrap();
    assert_eq!(saved.editing_chore, None);
    assert!(saved.chores.iter().any(|c| c.id == id && c.name == "Fold laundry"));
}

#[tokio::test]
async fn http_bad_import_leaves_state() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    let before = state(&client, &server).await;

    let response = client
        .post(format!("{}/api/import", server.base_url))
        .body(r#"{"balance": 1000}"#)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(state(&client, &server).await.balance, before.balance);

    let export = client
        .get(format!("{}/api/export", server.base_url))
        .send()
        .await
        .unwrap();
    assert!(export.status().is_success());
    let disposition = export
        .headers()
        .get(reqwest::header::CONTENT_DISPOSITION)
        .expect("attachment header")
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.contains("chore-tracker-data.json"));

    let document = export.text().await.unwrap();
    let response = client
        .post(format!("{}/api/import", server.base_url))
        .body(document)
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    assert_eq!(state(&client, &server).await.balance, before.balance);
}
