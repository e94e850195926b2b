//! HttpMovementGateway integration tests
//!
//! These spin a throwaway axum server standing in for the account movement
//! API, so the gateway's status handling, error-body parsing and transport
//! failure mapping are exercised over a real socket.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use rust_decimal_macros::dec;
use serde_json::{json, Value};

use banking_transfer::{codes, HttpMovementGateway, MovementGateway, MovementRequest};

/// What the fake account API saw on its last request.
#[derive(Clone, Default)]
struct Captured {
    authorization: Option<String>,
    body: Option<Value>,
}

#[derive(Clone)]
struct FakeApi {
    status: StatusCode,
    body: Value,
    delay: Option<Duration>,
    captured: Arc<Mutex<Captured>>,
}

impl FakeApi {
    fn new(status: StatusCode, body: Value) -> Self {
        Self {
            status,
            body,
            delay: None,
            captured: Arc::new(Mutex::new(Captured::default())),
        }
    }

    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    fn captured(&self) -> Captured {
        self.captured.lock().unwrap().clone()
    }
}

async fn movement_endpoint(
    State(api): State<FakeApi>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    {
        let mut captured = api.captured.lock().unwrap();
        captured.authorization = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        captured.body = Some(body);
    }

    if let Some(delay) = api.delay {
        tokio::time::sleep(delay).await;
    }

    (api.status, Json(api.body.clone()))
}

/// Serve the fake API on an ephemeral port, returning its address.
async fn serve(api: FakeApi) -> SocketAddr {
    let app = Router::new()
        .route("/api/conta/movimentar", post(movement_endpoint))
        .with_state(api);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve fake api");
    });

    addr
}

fn gateway_for(addr: SocketAddr, timeout: Duration) -> HttpMovementGateway {
    HttpMovementGateway::new(format!("http://{addr}"), timeout).expect("build gateway")
}

#[tokio::test]
async fn test_successful_movement_sends_token_and_wire_body() {
    let api = FakeApi::new(StatusCode::OK, json!({}));
    let addr = serve(api.clone()).await;
    let gateway = gateway_for(addr, Duration::from_secs(5));

    let request = MovementRequest::debit("req-1", 1001, dec!(250.00));
    let result = gateway.execute("token-abc", &request).await;

    assert!(result.is_success);
    assert!(result.error_code.is_none());

    let captured = api.captured();
    assert_eq!(captured.authorization.as_deref(), Some("Bearer token-abc"));
    let body = captured.body.expect("request body captured");
    assert_eq!(body["requisicaoId"], "req-1-DEBITO");
    assert_eq!(body["numeroConta"], 1001);
    assert_eq!(body["tipo"], "D");
}

#[tokio::test]
async fn test_structured_rejection_propagates_remote_code() {
    let api = FakeApi::new(
        StatusCode::BAD_REQUEST,
        json!({"mensagem": "saldo insuficiente", "tipo": "INSUFFICIENT_BALANCE"}),
    );
    let addr = serve(api).await;
    let gateway = gateway_for(addr, Duration::from_secs(5));

    let request = MovementRequest::debit("req-1", 1001, dec!(250.00));
    let result = gateway.execute("token-abc", &request).await;

    assert!(!result.is_success);
    assert_eq!(result.error_code.as_deref(), Some("INSUFFICIENT_BALANCE"));
    assert_eq!(result.error.as_deref(), Some("saldo insuficiente"));
}

#[tokio::test]
async fn test_rejection_without_code_maps_to_movement_error() {
    let api = FakeApi::new(StatusCode::BAD_REQUEST, json!({"mensagem": "conta bloqueada"}));
    let addr = serve(api).await;
    let gateway = gateway_for(addr, Duration::from_secs(5));

    let request = MovementRequest::credit("req-1", 1002, dec!(250.00));
    let result = gateway.execute("token-abc", &request).await;

    assert!(!result.is_success);
    assert_eq!(result.error_code.as_deref(), Some(codes::MOVEMENT_ERROR));
    assert_eq!(result.error.as_deref(), Some("conta bloqueada"));
}

#[tokio::test]
async fn test_unreadable_rejection_maps_to_api_error() {
    // An empty JSON object carries neither mensagem nor tipo.
    let api = FakeApi::new(StatusCode::INTERNAL_SERVER_ERROR, json!({}));
    let addr = serve(api).await;
    let gateway = gateway_for(addr, Duration::from_secs(5));

    let request = MovementRequest::credit("req-1", 1002, dec!(250.00));
    let result = gateway.execute("token-abc", &request).await;

    assert!(!result.is_success);
    assert_eq!(result.error_code.as_deref(), Some(codes::API_ERROR));
}

#[tokio::test]
async fn test_slow_remote_maps_to_timeout_error() {
    let api = FakeApi::new(StatusCode::OK, json!({})).with_delay(Duration::from_secs(5));
    let addr = serve(api).await;
    let gateway = gateway_for(addr, Duration::from_millis(200));

    let request = MovementRequest::debit("req-1", 1001, dec!(250.00));
    let result = gateway.execute("token-abc", &request).await;

    assert!(!result.is_success);
    assert_eq!(result.error_code.as_deref(), Some(codes::TIMEOUT_ERROR));
}

#[tokio::test]
async fn test_unreachable_remote_maps_to_network_error() {
    // Bind then drop the listener so the port is closed.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);

    let gateway = gateway_for(addr, Duration::from_secs(2));

    let request = MovementRequest::debit("req-1", 1001, dec!(250.00));
    let result = gateway.execute("token-abc", &request).await;

    assert!(!result.is_success);
    assert_eq!(result.error_code.as_deref(), Some(codes::NETWORK_ERROR));
}
