//! Shared helpers for the HTTP and console integration tests

use std::net::SocketAddr;
use std::time::Duration;

use reqwest::Client;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use mms_queue::{
    config::CalculatorConfig,
    server::{create_router, AppState},
};

/// Calculator server bound to an ephemeral port for the lifetime of a test
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    task: JoinHandle<()>,
}

impl TestServer {
    pub async fn spawn() -> Self {
        Self::spawn_with_config(CalculatorConfig::default()).await
    }

    pub async fn spawn_with_config(mut config: CalculatorConfig) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        config.server.host = addr.ip().to_string();
        config.server.port = addr.port();

        let app = create_router(AppState::new(config));
        // the listener is already bound, so requests queue until serve polls it
        let task = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap();

        Self { addr, client, task }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client.get(self.url(path)).send().await.unwrap()
    }

    pub async fn post(&self, path: &str, body: Value) -> reqwest::Response {
        self.client.post(self.url(path)).json(&body).send().await.unwrap()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Build a `/v1/queue/metrics` body
pub fn metrics_request(
    arrival: (&str, f64),
    service: (&str, f64),
    time_unit: &str,
    servers: u32,
) -> Value {
    json!({
        "arrival": { "kind": arrival.0, "value": arrival.1 },
        "service": { "kind": service.0, "value": service.1 },
        "time_unit": time_unit,
        "servers": servers
    })
}

pub fn assert_status(response: &reqwest::Response, expected: u16) {
    let actual = response.status().as_u16();
    assert_eq!(actual, expected, "unexpected status for {}", response.url());
}

/// Assert a JSON number is within `tolerance` of `expected`
pub fn assert_close(json: &Value, expected: f64, tolerance: f64) {
    let actual = json
        .as_f64()
        .unwrap_or_else(|| panic!("Expected a number, got {:?}", json));
    assert!(
        (actual - expected).abs() < tolerance,
        "Expected {} within {}, got {}",
        expected,
        tolerance,
        actual
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_server_answers_immediately() {
        let server = TestServer::spawn().await;
        assert_status(&server.get("/version").await, 200);
    }

    #[test]
    fn test_metrics_request_builder() {
        let req = metrics_request(("r", 2.0), ("m", 0.2), "sec", 1);
        assert_eq!(req["arrival"]["kind"], "r");
        assert_eq!(req["service"]["value"], 0.2);
        assert_eq!(req["servers"], 1);
    }
}
