//! Razorpay integration via REST API (no SDK dependency)

use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

/// Order creation failure
#[derive(Debug, thiserror::Error)]
pub enum RazorpayError {
    #[error("Razorpay request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Razorpay rejected the request ({status}): {body}")]
    Api {
        status: reqwest::StatusCode,
        body: serde_json::Value,
    },

    #[error("Unexpected Razorpay order payload: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Checkout callback rejection
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SignatureError {
    #[error("Missing payment fields")]
    MissingFields,

    #[error("Invalid signature hex")]
    InvalidHex,

    #[error("HMAC key error")]
    Key,

    #[error("Payment signature mismatch")]
    Mismatch,
}

/// Order as returned by `POST /orders`
#[derive(Debug, Clone, Deserialize)]
pub struct RazorpayOrder {
    pub id: String,
    /// Minor currency units
    pub amount: i64,
    pub currency: String,
    #[serde(default)]
    pub receipt: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Serialize)]
struct CreateOrderBody<'a> {
    amount: i64,
    currency: &'a str,
    receipt: &'a str,
}

/// Gateway credentials plus a pooled HTTP client
#[derive(Clone)]
pub struct RazorpayClient {
    http: reqwest::Client,
    api_base: String,
    key_id: String,
    key_secret: String,
}

impl RazorpayClient {
    pub fn new(api_base: &str, key_id: &str, key_secret: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base: api_base.trim_end_matches('/').to_string(),
            key_id: key_id.to_string(),
            key_secret: key_secret.to_string(),
        }
    }

    /// Public key id for the checkout widget
    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    /// Create an order for `amount` minor units
    pub async fn create_order(
        &self,
        amount: i64,
        currency: &str,
        receipt: &str,
    ) -> Result<RazorpayOrder, RazorpayError> {
        let resp = self
            .http
            .post(format!("{}/orders", self.api_base))
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(&CreateOrderBody {
                amount,
                currency,
                receipt,
            })
            .send()
            .await?;

        let status = resp.status();
        let body: serde_json::Value = resp.json().await?;
        if !status.is_success() {
            return Err(RazorpayError::Api { status, body });
        }
        Ok(serde_json::from_value(body)?)
    }

    /// Verify a checkout callback signed with this client's secret
    pub fn verify_payment_signature(
        &self,
        order_id: &str,
        payment_id: &str,
        signature: &str,
    ) -> Result<(), SignatureError> {
        verify_payment_signature(order_id, payment_id, signature, &self.key_secret)
    }
}

/// Verify checkout signature: hex(HMAC-SHA256(secret, "{order_id}|{payment_id}"))
pub fn verify_payment_signature(
    order_id: &str,
    payment_id: &str,
    signature: &str,
    secret: &str,
) -> Result<(), SignatureError> {
    if order_id.is_empty() || payment_id.is_empty() || signature.is_empty() {
        return Err(SignatureError::MissingFields);
    }

    let mut mac =
        Hmac::<Sha256>::new_from_slice(secret.as_bytes()).map_err(|_| SignatureError::Key)?;
    mac.update(format!("{order_id}|{payment_id}").as_bytes());

    // Constant-time comparison via hmac::verify_slice
    let sig_bytes = hex::decode(signature.trim()).map_err(|_| SignatureError::InvalidHex)?;
    mac.verify_slice(&sig_bytes)
        .map_err(|_| SignatureError::Mismatch)
}

/// Signature the gateway would send for this order/payment pair
pub fn sign_payment(order_id: &str, payment_id: &str, secret: &str) -> String {
    // new_from_slice only fails for fixed-size keys; HMAC accepts any length
    let mut mac = match Hmac::<Sha256>::new_from_slice(secret.as_bytes()) {
        Ok(mac) => mac,
        Err(_) => return String::new(),
    };
    mac.update(format!("{order_id}|{payment_id}").as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_signature() {
        let sig = sign_payment("order_1", "pay_1", "secret");
        assert_eq!(sig.len(), 64);
        assert!(verify_payment_signature("order_1", "pay_1", &sig, "secret").is_ok());
    }

    #[test]
    fn test_signature_mismatch() {
        let sig = sign_payment("order_1", "pay_1", "secret");
        assert_eq!(
            verify_payment_signature("order_1", "pay_2", &sig, "secret"),
            Err(SignatureError::Mismatch)
        );
        assert_eq!(
            verify_payment_signature("order_1", "pay_1", &sig, "other"),
            Err(SignatureError::Mismatch)
        );
    }

    #[test]
    fn test_malformed_signature() {
        assert_eq!(
            verify_payment_signature("order_1", "pay_1", "zz-not-hex", "secret"),
            Err(SignatureError::InvalidHex)
        );
        assert_eq!(
            verify_payment_signature("order_1", "pay_1", "", "secret"),
            Err(SignatureError::MissingFields)
        );
    }

    #[test]
    fn test_signature_is_stable() {
        let sig = sign_payment("order_1", "pay_1", "secret");
        assert_eq!(sig, sign_payment("order_1", "pay_1", "secret"));
        assert_ne!(sig, sign_payment("order_1|", "pay_1", "secret"));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            SignatureError::Mismatch.to_string(),
            "Payment signature mismatch"
        );
        let err = RazorpayError::Api {
            status: reqwest::StatusCode::UNAUTHORIZED,
            body: serde_json::json!({"error": {"code": "BAD_REQUEST_ERROR"}}),
        };
        assert!(err.to_string().starts_with("Razorpay rejected the request (401"));
    }

    #[test]
    fn test_client_trims_base_url() {
        let client = RazorpayClient::new("https://api.razorpay.com/v1/", "rzp_key", "secret");
        assert_eq!(client.api_base, "https://api.razorpay.com/v1");
        assert_eq!(client.key_id(), "rzp_key");
    }
}
