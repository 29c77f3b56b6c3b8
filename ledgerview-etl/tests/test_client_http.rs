use std::net::SocketAddr;

use axum::Router;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use ledgerview_etl::{EtlApi, EtlClient, EtlError, load_snapshot};

const STATUS_BODY: &str = r#"{
    "success": true,
    "message": "Status retrieved",
    "responseObject": {
        "isProcessing": true,
        "lastRun": "2024-03-01T10:00:00Z",
        "success": false,
        "message": "Processing Company 2",
        "recordsProcessed": 120
    },
    "statusCode": 200
}"#;

const PROFIT_LOSS_BODY: &str = r#"{
    "success": true,
    "message": "Profit & loss data",
    "responseObject": {
        "periods": ["2024-01", "2024-02"],
        "sections": [
            {
                "title": "Revenue",
                "type": "income",
                "accounts": {
                    "2024-01": {
                        "Company 1": [
                            { "accountCode": "4000", "accountName": "Product Sales", "amount": 12000, "originalAccountName": "Sales" }
                        ]
                    },
                    "2024-02": {
                        "Company 1": [
                            { "accountCode": "4000", "accountName": "Product Sales", "amount": 9000, "originalAccountName": "Sales" }
                        ]
                    }
                }
            },
            {
                "title": "Operating Expenses",
                "type": "expense",
                "accounts": {
                    "2024-02": {
                        "Company 2": [
                            { "accountCode": "6000", "accountName": "Rent", "amount": 3000, "originalAccountName": "Rent" }
                        ]
                    }
                }
            }
        ],
        "summary": {
            "totalRecords": 3,
            "companiesIncluded": ["Company 1", "Company 2"],
            "periodRange": { "start": "2024-01", "end": "2024-02" }
        }
    },
    "statusCode": 200
}"#;

fn json_body(body: &'static str) -> impl IntoResponse {
    ([(CONTENT_TYPE, "application/json")], body)
}

async fn integrate(headers: HeaderMap) -> axum::response::Response {
    let is_json = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"));
    if !is_json {
        return StatusCode::UNSUPPORTED_MEDIA_TYPE.into_response();
    }
    json_body(
        r#"{"success":true,"message":"Integration started","responseObject":{"status":"started","startTime":"2024-03-01T10:00:00Z"},"statusCode":200}"#,
    )
    .into_response()
}

fn healthy_router() -> Router {
    Router::new()
        .route(
            "/health-check",
            get(|| async {
                json_body(
                    r#"{"success":true,"message":"OK","responseObject":{"status":"healthy"},"statusCode":200}"#,
                )
            }),
        )
        .route("/etl/integrate", post(integrate))
        .route("/etl/integration-status", get(|| async { json_body(STATUS_BODY) }))
        .route("/etl/profit-loss-data", get(|| async { json_body(PROFIT_LOSS_BODY) }))
}

fn failing_router() -> Router {
    Router::new()
        .route(
            "/etl/integration-status",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        )
        .route(
            "/etl/profit-loss-data",
            get(|| async {
                json_body(
                    r#"{"success":false,"message":"No data loaded","responseObject":null,"statusCode":404}"#,
                )
            }),
        )
        .route("/health-check", get(|| async { json_body("{not json") }))
}

async fn serve(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn client_for(app: Router) -> EtlClient {
    let addr = serve(app).await;
    EtlClient::new(&format!("http://{}/", addr)).unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let client = client_for(healthy_router()).await;
    let health = client.health_check().await.unwrap().into_payload().unwrap();
    assert_eq!(health.status, "healthy");
}

#[tokio::test]
async fn test_integration_status_decodes_camel_case() {
    let client = client_for(healthy_router()).await;
    let status = client
        .integration_status()
        .await
        .unwrap()
        .into_payload()
        .unwrap();

    assert!(status.is_processing);
    assert_eq!(status.records_processed, 120);
    assert_eq!(status.last_run.as_deref(), Some("2024-03-01T10:00:00Z"));
    assert_eq!(status.phase_label(), "Processing");
}

#[tokio::test]
async fn test_trigger_posts_json() {
    let client = client_for(healthy_router()).await;
    let envelope = client.trigger_integration().await.unwrap();
    assert!(envelope.success);
    assert_eq!(envelope.into_payload().unwrap().status, "started");
}

#[tokio::test]
async fn test_non_2xx_is_http_error() {
    let client = client_for(failing_router()).await;
    let err = client.integration_status().await.unwrap_err();
    assert!(matches!(err, EtlError::Http { status: 500, .. }));
    assert_eq!(err.to_string(), "HTTP error! status: 500");
}

#[tokio::test]
async fn test_unsuccessful_envelope_is_ok() {
    let client = client_for(failing_router()).await;
    let envelope = client.profit_loss_data().await.unwrap();
    assert!(!envelope.success);
    assert_eq!(envelope.status_code, 404);
    assert_eq!(envelope.into_payload().unwrap_err(), "No data loaded");
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let client = client_for(failing_router()).await;
    let err = client.health_check().await.unwrap_err();
    assert!(matches!(err, EtlError::Decode { .. }));
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = EtlClient::new(&format!("http://{}", addr)).unwrap();
    let err = client.integration_status().await.unwrap_err();
    assert!(matches!(err, EtlError::Transport { .. }));
}

#[tokio::test]
async fn test_load_snapshot() {
    let client = client_for(healthy_router()).await;
    let snapshot = load_snapshot(&client).await;

    assert!(snapshot.has_data());
    let codes: Vec<&str> = snapshot
        .table
        .rows
        .iter()
        .map(|r| r.account_code.as_str())
        .collect();
    assert_eq!(codes, ["4000", "6000"]);

    let stats = snapshot.statistics.as_ref().unwrap();
    assert_eq!(stats.total_revenue, 21000.0);
    assert_eq!(stats.total_expenses, 3000.0);
    assert_eq!(stats.net_income, 18000.0);
}

#[tokio::test]
async fn test_load_snapshot_failure_is_empty() {
    let client = client_for(failing_router()).await;
    let snapshot = load_snapshot(&client).await;
    assert!(!snapshot.has_data());
    assert!(snapshot.table.is_empty());
    assert!(snapshot.statistics.is_none());
}
