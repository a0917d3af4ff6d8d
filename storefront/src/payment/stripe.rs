//! Stripe payment intents via REST API (no SDK dependency)

use std::time::Duration;

use async_trait::async_trait;

use super::{
    GatewayError, PaymentGateway, PaymentIntent, PaymentIntentRequest, is_valid_intent_id,
};

pub const DEFAULT_API_BASE: &str = "https://api.stripe.com";

/// Stripe-backed [`PaymentGateway`]
#[derive(Clone)]
pub struct StripeGateway {
    client: reqwest::Client,
    secret_key: String,
    api_base: String,
}

impl StripeGateway {
    pub fn new(
        secret_key: impl Into<String>,
        api_base: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            secret_key: secret_key.into(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
        })
    }

    /// POST a form and return the JSON body of a non-5xx answer
    async fn post_form(
        &self,
        url: String,
        form: &[(String, String)],
    ) -> Result<serde_json::Value, GatewayError> {
        let resp = self
            .client
            .post(&url)
            .basic_auth(&self.secret_key, None::<&str>)
            .form(form)
            .send()
            .await
            .map_err(|e| GatewayError::Unavailable(e.to_string()))?;

        // Proxies answer 5xx with HTML; the status alone decides
        let status = resp.status();
        if status.is_server_error() {
            return Err(GatewayError::Unavailable(format!("HTTP {status}")));
        }

        let body: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(format!("HTTP {status}: {e}")))?;
        rejection(&body).map_or(Ok(body), Err)
    }

    fn intent_url(&self, intent_id: &str, action: Option<&str>) -> Result<String, GatewayError> {
        if !is_valid_intent_id(intent_id) {
            return Err(GatewayError::Rejected(format!(
                "malformed payment intent id {intent_id:?}"
            )));
        }
        Ok(match action {
            Some(action) => format!("{}/v1/payment_intents/{intent_id}/{action}", self.api_base),
            None => format!("{}/v1/payment_intents/{intent_id}", self.api_base),
        })
    }
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    async fn create_intent(
        &self,
        request: &PaymentIntentRequest,
    ) -> Result<PaymentIntent, GatewayError> {
        let url = format!("{}/v1/payment_intents", self.api_base);
        let mut form = intent_form(request);
        form.push((
            "automatic_payment_methods[enabled]".to_string(),
            "true".to_string(),
        ));
        let intent = parse_intent(&self.post_form(url, &form).await?)?;
        tracing::info!(intent_id = %intent.id, amount = intent.amount, currency = %intent.currency, "Created payment intent");
        Ok(intent)
    }

    async fn update_intent(
        &self,
        intent_id: &str,
        request: &PaymentIntentRequest,
    ) -> Result<PaymentIntent, GatewayError> {
        let url = self.intent_url(intent_id, None)?;
        let intent = parse_intent(&self.post_form(url, &intent_form(request)).await?)?;
        tracing::info!(intent_id = %intent.id, amount = intent.amount, "Updated payment intent");
        Ok(intent)
    }

    async fn cancel_intent(&self, intent_id: &str) -> Result<(), GatewayError> {
        let url = self.intent_url(intent_id, Some("cancel"))?;
        let form = [(
            "cancellation_reason".to_string(),
            "abandoned".to_string(),
        )];
        self.post_form(url, &form).await?;
        tracing::info!(intent_id, "Cancelled payment intent");
        Ok(())
    }
}

/// Form fields shared by create and update
fn intent_form(request: &PaymentIntentRequest) -> Vec<(String, String)> {
    let mut form = vec![
        ("amount".to_string(), request.amount.to_string()),
        ("currency".to_string(), request.currency.to_ascii_lowercase()),
    ];
    if let Some(email) = &request.receipt_email {
        form.push(("receipt_email".to_string(), email.clone()));
    }
    for (key, value) in &request.metadata {
        form.push((format!("metadata[{key}]"), value.clone()));
    }
    form
}

/// Processor error object, if the body carries one
fn rejection(body: &serde_json::Value) -> Option<GatewayError> {
    let error = body.get("error")?;
    let message = error["message"]
        .as_str()
        .or_else(|| error["code"].as_str())
        .unwrap_or("unknown error");
    Some(GatewayError::Rejected(message.to_string()))
}

fn parse_intent(body: &serde_json::Value) -> Result<PaymentIntent, GatewayError> {
    if let Some(err) = rejection(body) {
        return Err(err);
    }

    let field = |name: &str| {
        body[name]
            .as_str()
            .map(String::from)
            .ok_or_else(|| GatewayError::InvalidResponse(format!("missing {name}: {body}")))
    };

    Ok(PaymentIntent {
        id: field("id")?,
        client_secret: field("client_secret")?,
        amount: body["amount"]
            .as_i64()
            .ok_or_else(|| GatewayError::InvalidResponse(format!("missing amount: {body}")))?,
        currency: field("currency")?,
    })
}
