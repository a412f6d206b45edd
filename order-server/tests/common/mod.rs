//! Router-level test harness: an in-memory server state driven with `oneshot`.

#![allow(dead_code)]

use axum::Router;
use axum::body::{Body, to_bytes};
use http::{Method, Request, StatusCode, header};
use order_server::{Config, ServerState, api};
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

pub struct TestApp {
    pub app: Router,
    pub state: ServerState,
    _work_dir: TempDir,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: http::HeaderMap,
    pub body: Value,
}

impl TestApp {
    pub async fn new() -> Self {
        let work_dir = tempfile::tempdir().expect("tempdir");
        let mut config = Config::with_overrides(work_dir.path().to_string_lossy(), 0);
        config.mail_relay_url = None;
        config.public_base_url = "http://orders.test".into();
        let state = ServerState::in_memory(config).await.expect("state");
        let app = api::build_app(&state).with_state(state.clone());
        Self {
            app,
            state,
            _work_dir: work_dir,
        }
    }

    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request");

        let response = self.app.clone().oneshot(request).await.expect("response");
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> TestResponse {
        self.request(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Option<Value>) -> TestResponse {
        self.request(Method::PUT, uri, body).await
    }

    pub async fn delete(&self, uri: &str) -> TestResponse {
        self.request(Method::DELETE, uri, None).await
    }

    pub async fn create_customer(&self, name: &str, pending: f64) -> i64 {
        let res = self
            .post(
                "/api/customers",
                json!({
                    "name": name,
                    "email": format!("{}@example.com", name.to_lowercase()),
                    "phone": "555-0100",
                    "address": "1 Main St",
                    "pendingPayments": pending,
                }),
            )
            .await;
        assert_eq!(res.status, StatusCode::OK, "{}", res.body);
        res.body["id"].as_i64().expect("customer id")
    }

    pub async fn create_packer(&self, name: &str) -> i64 {
        let res = self.post("/api/packers", json!({ "name": name })).await;
        assert_eq!(res.status, StatusCode::OK, "{}", res.body);
        res.body["id"].as_i64().expect("packer id")
    }

    /// Soap 3 × 100 + Towel 1 × 50, in two different item shapes
    pub async fn create_order(&self, customer_id: i64) -> Value {
        let res = self
            .post(
                "/api/orders",
                json!({
                    "customerId": customer_id,
                    "items": [
                        { "productName": "Soap", "quantity": 3, "unitPrice": 100 },
                        { "product": { "name": "Towel", "unit": "pcs" }, "quantity": 1, "price": 50 },
                    ],
                    "paymentMethod": "cash",
                }),
            )
            .await;
        assert_eq!(res.status, StatusCode::OK, "{}", res.body);
        res.body
    }

    pub async fn assign(&self, order_id: i64, packer_id: i64) -> TestResponse {
        self.put(
            &format!("/packing/{order_id}/assign"),
            Some(json!({ "packerId": packer_id })),
        )
        .await
    }
}
