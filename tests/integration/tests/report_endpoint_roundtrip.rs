use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine as _;
use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::America::Santiago;
use httpmock::prelude::*;
use serde_json::{json, Value};
use storepulse_gateway::{
    build_dashboard_router, DashboardCredentials, DashboardServerConfig, DashboardServerState,
    REPORT_ENDPOINT,
};
use storepulse_hibot::{HibotClient, HibotConfig};
use tower::ServiceExt;

fn frozen_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 16, 15, 0, 0)
        .single()
        .expect("frozen clock")
}

fn utc_ms(day: u32, hour: u32) -> i64 {
    Utc.with_ymd_and_hms(2026, 10, day, hour, 0, 0)
        .single()
        .expect("timestamp")
        .timestamp_millis()
}

fn dashboard_for(server: &MockServer, app_secret: &str) -> Router {
    let client = HibotClient::new(HibotConfig {
        base_url: server.base_url(),
        app_id: Some("app-123".to_string()),
        app_secret: Some(app_secret.to_string()),
        channel_type: "WHATSAPP".to_string(),
        request_timeout_ms: 5_000,
    })
    .expect("hibot client should be created");
    let config = DashboardServerConfig {
        credentials: DashboardCredentials {
            username: "ops".to_string(),
            password: "s3cret".to_string(),
        },
        timezone: Santiago,
        ..DashboardServerConfig::default()
    };
    let state = DashboardServerState::new(config, Arc::new(client)).with_clock(frozen_now);
    build_dashboard_router(Arc::new(state))
}

fn report_request() -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(REPORT_ENDPOINT)
        .header(
            "authorization",
            format!("Basic {}", BASE64_STANDARD.encode("ops:s3cret")),
        )
        .body(Body::empty())
        .expect("request")
}

async fn read_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json body")
}

#[tokio::test]
async fn integration_report_endpoint_aggregates_upstream_month() {
    let server = MockServer::start();
    let month_start = Santiago
        .with_ymd_and_hms(2026, 10, 1, 0, 0, 0)
        .single()
        .expect("month start")
        .timestamp_millis();

    let login = server.mock(|when, then| {
        when.method(POST)
            .path("/login")
            .json_body(json!({ "appId": "app-123", "appSecret": "secret-456" }));
        then.status(200).json_body(json!({ "token": "tok-789" }));
    });
    let conversations = server.mock(|when, then| {
        when.method(POST)
            .path("/conversations")
            .header("authorization", "Bearer tok-789")
            .json_body(json!({
                "from": month_start,
                "to": frozen_now().timestamp_millis(),
                "channelType": "WHATSAPP"
            }));
        then.status(200).json_body(json!([
            { "direction": "OUT", "created": utc_ms(16, 13), "agent": { "name": "R3 V Juan Perez" } },
            { "direction": "OUT", "created": utc_ms(16, 14), "agent": { "name": "camila" } },
            { "direction": "IN", "created": utc_ms(16, 2) },
            { "direction": "OUT", "agent": { "name": "R3 V Juan Perez" } },
            "garbage"
        ]));
    });

    let response = dashboard_for(&server, "secret-456")
        .oneshot(report_request())
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;

    login.assert();
    conversations.assert();

    assert_eq!(body["generated_for"], "2026-10-16");
    assert_eq!(
        body["summary"],
        json!({ "labels": ["IN", "OUT"], "counts": [1, 2] })
    );
    assert_eq!(
        body["daily_series"][0],
        json!({ "store": "Total", "dates": ["15/10", "16/10"], "in": [1, 0], "out": [0, 2] })
    );
    assert_eq!(
        body["available_stores"],
        json!(["R3", "Canal Digital", "Unassigned"])
    );
    assert_eq!(
        body["agent_table"],
        json!([
            {
                "store": "R3",
                "today_usage": 1,
                "daily_cap": 20,
                "agents": [{ "role": "V", "person": "Juan Perez", "total": 1 }]
            },
            {
                "store": "Canal Digital",
                "today_usage": 1,
                "daily_cap": 20,
                "agents": [{ "role": "J", "person": "camila", "total": 1 }]
            }
        ])
    );
}

#[tokio::test]
async fn integration_report_endpoint_surfaces_upstream_login_rejection() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/login");
        then.status(401).body("invalid credentials");
    });
    let conversations = server.mock(|when, then| {
        when.method(POST).path("/conversations");
        then.status(200).json_body(json!([]));
    });

    let response = dashboard_for(&server, "wrong")
        .oneshot(report_request())
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = read_json(response).await;
    assert_eq!(body["error"]["code"], "upstream_auth_failed");
    assert_eq!(conversations.hits(), 0);
}

#[tokio::test]
async fn integration_report_endpoint_surfaces_upstream_fetch_failure() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/login");
        then.status(200).json_body(json!({ "token": "tok" }));
    });
    server.mock(|when, then| {
        when.method(POST).path("/conversations");
        then.status(503).body("maintenance");
    });

    let response = dashboard_for(&server, "secret-456")
        .oneshot(report_request())
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = read_json(response).await;
    assert_eq!(body["error"]["code"], "upstream_fetch_failed");
}
