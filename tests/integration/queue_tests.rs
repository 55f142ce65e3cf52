//! Calculator endpoint integration tests

use super::common::*;
use serde_json::json;

#[tokio::test]
async fn test_single_server_metrics() {
    let server = TestServer::spawn().await;

    let response = server
        .post("/v1/queue/metrics", metrics_request(("r", 2.0), ("r", 5.0), "sec", 1))
        .await;
    assert_status(&response, 200);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "stable");

    let metrics = &body["metrics"];
    assert_eq!(metrics["servers"], 1);
    assert_close(&metrics["lambda"], 2.0, 1e-12);
    assert_close(&metrics["mu"], 5.0, 1e-12);
    assert_close(&metrics["rho"], 0.4, 1e-12);
    assert_close(&metrics["p0"], 0.6, 1e-9);
    assert_close(&metrics["lq"], 0.266667, 1e-6);
    assert_close(&metrics["ls"], 0.666667, 1e-6);
    assert_close(&metrics["wq"], 0.133333, 1e-6);
    assert_close(&metrics["ws"], 0.333333, 1e-6);

    assert_eq!(body["display"]["wq"], "0.13 sec");
    assert_eq!(body["display"]["ws"], "0.33 sec");
}

#[tokio::test]
async fn test_two_server_metrics() {
    let server = TestServer::spawn().await;

    let response = server
        .post("/v1/queue/metrics", metrics_request(("r", 2.0), ("r", 5.0), "sec", 2))
        .await;
    assert_status(&response, 200);

    let body: serde_json::Value = response.json().await.unwrap();
    let metrics = &body["metrics"];
    assert_close(&metrics["rho"], 0.2, 1e-12);
    assert_close(&metrics["p0"], 2.0 / 3.0, 1e-9);
    assert_close(&metrics["lq"], 1.0 / 60.0, 1e-9);
    assert_close(&metrics["ls"], 1.0 / 60.0 + 0.4, 1e-9);
}

#[tokio::test]
async fn test_server_counts_past_factorial_range() {
    let server = TestServer::spawn().await;

    for (lambda, servers, rho) in [(1.0, 171, 1.0 / 171.0), (150.0, 200, 0.75)] {
        let response = server
            .post("/v1/queue/metrics", metrics_request(("r", lambda), ("r", 1.0), "sec", servers))
            .await;
        assert_status(&response, 200);

        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["status"], "stable");
        assert_eq!(body["metrics"]["servers"], servers);
        assert_close(&body["metrics"]["rho"], rho, 1e-12);
        assert!(body["metrics"]["lq"].as_f64().unwrap().is_finite());
    }
}

#[tokio::test]
async fn test_mean_inputs_in_minutes() {
    let server = TestServer::spawn().await;

    // one arrival every 2 minutes, one service per minute
    let response = server
        .post("/v1/queue/metrics", metrics_request(("m", 2.0), ("rate", 1.0), "min", 1))
        .await;
    assert_status(&response, 200);

    let body: serde_json::Value = response.json().await.unwrap();
    let metrics = &body["metrics"];
    assert_close(&metrics["lambda"], 1.0 / 120.0, 1e-12);
    assert_close(&metrics["mu"], 1.0 / 60.0, 1e-12);
    assert_close(&metrics["rho"], 0.5, 1e-9);
    assert_close(&metrics["wq"], 60.0, 1e-6);
    assert_close(&metrics["ws"], 120.0, 1e-6);
}

#[tokio::test]
async fn test_unknown_time_unit_is_seconds() {
    let server = TestServer::spawn().await;

    let response = server
        .post("/v1/queue/metrics", metrics_request(("r", 2.0), ("r", 5.0), "fortnight", 1))
        .await;
    assert_status(&response, 200);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_close(&body["metrics"]["lambda"], 2.0, 1e-12);
}

#[tokio::test]
async fn test_time_unit_defaults_to_seconds() {
    let server = TestServer::spawn().await;

    let response = server
        .post(
            "/v1/queue/metrics",
            json!({
                "arrival": { "kind": "rate", "value": 2.0 },
                "service": { "kind": "rate", "value": 5.0 },
                "servers": 1
            }),
        )
        .await;
    assert_status(&response, 200);
}

#[tokio::test]
async fn test_unstable_system() {
    let server = TestServer::spawn().await;

    let response = server
        .post("/v1/queue/metrics", metrics_request(("r", 10.0), ("r", 2.0), "sec", 1))
        .await;
    assert_status(&response, 422);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"]["type"], "unstable_system");
    assert_close(&body["error"]["rho"], 5.0, 1e-12);
}

#[tokio::test]
async fn test_rho_exactly_one_is_unstable() {
    let server = TestServer::spawn().await;

    let response = server
        .post("/v1/queue/metrics", metrics_request(("r", 10.0), ("r", 5.0), "sec", 2))
        .await;
    assert_status(&response, 422);
}

#[tokio::test]
async fn test_invalid_values_name_the_field() {
    let server = TestServer::spawn().await;

    let cases = [
        (metrics_request(("r", -2.0), ("r", 5.0), "sec", 1), "arrival value"),
        (metrics_request(("r", 2.0), ("m", 0.0), "sec", 1), "service value"),
        (metrics_request(("r", 2.0), ("r", 5.0), "sec", 0), "servers"),
    ];

    for (request, field) in cases {
        let response = server.post("/v1/queue/metrics", request).await;
        assert_status(&response, 400);

        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["error"]["type"], "invalid_request_error");
        assert_eq!(body["error"]["param"], field);
    }
}

#[tokio::test]
async fn test_malformed_body() {
    let server = TestServer::spawn().await;

    let response = server
        .post(
            "/v1/queue/metrics",
            json!({
                "arrival": { "kind": "x", "value": 2.0 },
                "service": { "kind": "r", "value": 5.0 },
                "servers": 1
            }),
        )
        .await;
    assert_status(&response, 400);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"]["param"], "body");
}

#[tokio::test]
async fn test_rate_conversion() {
    let server = TestServer::spawn().await;

    let response = server
        .post("/v1/queue/rate", json!({ "kind": "r", "value": 30.0, "time_unit": "min" }))
        .await;
    assert_status(&response, 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_close(&body["rate_per_second"], 0.5, 1e-12);
    assert_eq!(body["time_unit"], "min");

    let response = server
        .post("/v1/queue/rate", json!({ "kind": "m", "value": 2.0, "time_unit": "min" }))
        .await;
    let body: serde_json::Value = response.json().await.unwrap();
    assert_close(&body["rate_per_second"], 1.0 / 120.0, 1e-12);

    let response = server
        .post("/v1/queue/rate", json!({ "kind": "r", "value": 0.0 }))
        .await;
    assert_status(&response, 400);
}

#[tokio::test]
async fn test_stats_and_metrics_track_evaluations() {
    let server = TestServer::spawn().await;

    server
        .post("/v1/queue/metrics", metrics_request(("r", 2.0), ("r", 5.0), "sec", 1))
        .await;
    server
        .post("/v1/queue/metrics", metrics_request(("r", 10.0), ("r", 2.0), "sec", 1))
        .await;
    server
        .post("/v1/queue/metrics", metrics_request(("r", 2.0), ("r", 5.0), "sec", 0))
        .await;

    let response = server.get("/admin/stats").await;
    assert_status(&response, 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["calculator"]["stable"], 1);
    assert_eq!(body["calculator"]["unstable"], 1);
    assert_eq!(body["calculator"]["invalid"], 1);
    assert_eq!(body["calculator"]["total_evaluations"], 3);

    let text = server.get("/metrics").await.text().await.unwrap();
    assert!(text.contains("mms_queue_evaluations_total{outcome=\"stable\"} 1"));
    assert!(text.contains("mms_queue_evaluations_total{outcome=\"unstable\"} 1"));
    assert!(text.contains("mms_queue_errors_total{error_type=\"unstable_system\"} 1"));
    assert!(text.contains("mms_queue_errors_total{error_type=\"invalid_request_error\"} 1"));

    let response = server.client.post(server.url("/admin/stats/reset")).send().await.unwrap();
    assert_status(&response, 204);

    let body: serde_json::Value = server.get("/admin/stats").await.json().await.unwrap();
    assert_eq!(body["calculator"]["total_evaluations"], 0);
}
