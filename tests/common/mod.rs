// tests/common/mod.rs
//
// Shared wiremock fixtures for the dataset API.
#![allow(dead_code)]

use std::sync::Mutex;
use std::time::Duration;

use restaurant_ranker::auth::AuthToken;
use restaurant_ranker::client::ApiClient;
use restaurant_ranker::fetch::DelayPolicy;
use serde_json::{json, Value};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TOKEN: &str = "tok-123";

pub fn client_for(server: &MockServer) -> ApiClient {
    ApiClient::with_timeouts(&server.uri(), Duration::from_secs(2), Duration::from_secs(5))
        .expect("build client")
}

pub fn token() -> AuthToken {
    AuthToken::new(TOKEN)
}

pub async fn mount_register(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/register"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "data": { "authorizationToken": TOKEN } })),
        )
        .expect(1)
        .mount(server)
        .await;
}

/// Page request carrying `cursor` answers with a body at `/pages/{page_no}` and `next_id`.
pub async fn mount_page(
    server: &MockServer,
    cursor: &str,
    next_id: &str,
    page_no: usize,
    records: Value,
) {
    let page_path = format!("/pages/{page_no}");
    Mock::given(method("POST"))
        .and(path("/download-dataset"))
        .and(header("authorizationToken", TOKEN))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({ "next_id": cursor })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "dataset_url": format!("{}{}", server.uri(), page_path),
                "next_id": next_id
            },
            "message": format!("page {page_no} ready")
        })))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(ResponseTemplate::new(200).set_body_json(records))
        .expect(1)
        .mount(server)
        .await;
}

/// Page request carrying `cursor` is answered with a bare status.
pub async fn mount_page_status(server: &MockServer, cursor: &str, status: u16) {
    Mock::given(method("POST"))
        .and(path("/download-dataset"))
        .and(body_json(json!({ "next_id": cursor })))
        .respond_with(ResponseTemplate::new(status))
        .expect(1)
        .mount(server)
        .await;
}

pub fn rec(id: i64, name: &str, rating: f64, distance: f64) -> Value {
    json!({
        "id": id,
        "restaurant_name": name,
        "rating": rating,
        "distance_from_me": distance
    })
}

/// Records after which completed page the fetch loop paused.
#[derive(Default)]
pub struct CountingDelay {
    pub after_pages: Mutex<Vec<usize>>,
}

impl CountingDelay {
    pub fn count(&self) -> usize {
        self.after_pages.lock().unwrap().len()
    }

    pub fn pauses(&self) -> Vec<usize> {
        self.after_pages.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl DelayPolicy for CountingDelay {
    async fn wait(&self, completed_pages: usize) {
        self.after_pages.lock().unwrap().push(completed_pages);
    }

    fn name(&self) -> &'static str {
        "counting"
    }
}
