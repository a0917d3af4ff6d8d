//! Test harness: in-process app with a recording payment gateway

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use http::{Request, Response, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;
use storefront::api::build_app;
use storefront::coupons::StaticCoupons;
use storefront::payment::{GatewayError, PaymentGateway, PaymentIntent, PaymentIntentRequest};
use storefront::{Config, ServerState, ShippingResolver, ShippingTable};
use tower::ServiceExt;

pub const TEST_COUPONS: &str =
    r#"[{"code":"WELCOME10","percentOff":10},{"code":"BIGSPENDER","amountOff":5000}]"#;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    Create(PaymentIntentRequest),
    Update(String, PaymentIntentRequest),
    Cancel(String),
}

/// Records every call; answers with a fixed intent or a configured failure
#[derive(Default)]
pub struct RecordingGateway {
    calls: Mutex<Vec<GatewayCall>>,
    failure: Option<GatewayError>,
}

impl RecordingGateway {
    pub fn failing(err: GatewayError) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            failure: Some(err),
        }
    }

    pub fn calls(&self) -> Vec<GatewayCall> {
        self.calls.lock().unwrap().clone()
    }

    fn answer(&self, id: &str, request: &PaymentIntentRequest) -> Result<PaymentIntent, GatewayError> {
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        Ok(PaymentIntent {
            id: id.to_string(),
            client_secret: format!("{id}_secret_test"),
            amount: request.amount,
            currency: request.currency.to_ascii_lowercase(),
        })
    }
}

#[async_trait]
impl PaymentGateway for RecordingGateway {
    async fn create_intent(
        &self,
        request: &PaymentIntentRequest,
    ) -> Result<PaymentIntent, GatewayError> {
        self.calls
            .lock()
            .unwrap()
            .push(GatewayCall::Create(request.clone()));
        self.answer("pi_new", request)
    }

    async fn update_intent(
        &self,
        intent_id: &str,
        request: &PaymentIntentRequest,
    ) -> Result<PaymentIntent, GatewayError> {
        self.calls
            .lock()
            .unwrap()
            .push(GatewayCall::Update(intent_id.to_string(), request.clone()));
        self.answer(intent_id, request)
    }

    async fn cancel_intent(&self, intent_id: &str) -> Result<(), GatewayError> {
        self.calls
            .lock()
            .unwrap()
            .push(GatewayCall::Cancel(intent_id.to_string()));
        match &self.failure {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

pub struct TestApp {
    pub app: Router,
    pub gateway: Arc<RecordingGateway>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_gateway(RecordingGateway::default())
    }

    pub fn with_gateway(gateway: RecordingGateway) -> Self {
        let gateway = Arc::new(gateway);
        let table = ShippingTable::standard().unwrap();
        let state = ServerState::new(
            Config::default(),
            Arc::new(ShippingResolver::new(Arc::new(table))),
            Arc::new(StaticCoupons::from_json(TEST_COUPONS).unwrap()),
            gateway.clone(),
        );
        Self {
            app: build_app(&state),
            gateway,
        }
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        read_json(self.app.clone().oneshot(request).await.unwrap()).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        read_json(self.app.clone().oneshot(request).await.unwrap()).await
    }
}

pub async fn read_json(response: Response<Body>) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}
