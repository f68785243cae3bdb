//! Payment gateway client.
//!
//! Thin `reqwest` client for a Stripe-style payment-intent API. The gateway
//! is consumed as an opaque service: create an intent for a prepaid order,
//! hand the client secret back to the caller. Amounts are sent in minor
//! currency units.

use reqwest::StatusCode;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;

use crate::config::PaymentConfig;

/// Errors from the payment gateway.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// Transport-level failure talking to the gateway.
    #[error("gateway request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The gateway rejected the request.
    #[error("gateway error ({status}): {message}")]
    Gateway {
        status: StatusCode,
        message: String,
    },

    /// The order total cannot be expressed in minor units.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
}

/// A created payment intent.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentIntent {
    /// Gateway reference stored on the order.
    pub id: String,
    /// Client-usable secret for completing the payment in the browser.
    pub client_secret: String,
}

#[derive(Debug, Deserialize)]
struct GatewayErrorBody {
    error: Option<GatewayErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct GatewayErrorDetail {
    message: Option<String>,
}

/// Convert a decimal amount to minor currency units (e.g. 1180.00 -> 118000).
///
/// # Errors
///
/// Returns `PaymentError::InvalidAmount` for negative amounts or amounts too
/// large for an `i64` of minor units.
pub fn to_minor_units(amount: Decimal) -> Result<i64, PaymentError> {
    if amount.is_sign_negative() {
        return Err(PaymentError::InvalidAmount(format!(
            "amount must not be negative, got {amount}"
        )));
    }

    let minor = (amount * Decimal::from(100)).round();
    minor
        .to_i64()
        .ok_or_else(|| PaymentError::InvalidAmount(format!("amount out of range: {amount}")))
}

/// Client for the payment-intent API.
pub struct PaymentClient {
    client: reqwest::Client,
    api_base: String,
    secret_key: SecretString,
    currency: String,
}

impl PaymentClient {
    /// Create a new payment client from configuration.
    #[must_use]
    pub fn new(config: &PaymentConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            secret_key: config.secret_key.clone(),
            currency: config.currency.clone(),
        }
    }

    /// Create a payment intent for an order total.
    ///
    /// # Errors
    ///
    /// Returns `PaymentError` if the amount is invalid, the request fails,
    /// or the gateway rejects it.
    pub async fn create_intent(
        &self,
        amount: Decimal,
        order_number: &str,
    ) -> Result<PaymentIntent, PaymentError> {
        let minor_units = to_minor_units(amount)?;

        let params = [
            ("amount", minor_units.to_string()),
            ("currency", self.currency.clone()),
            ("metadata[order_number]", order_number.to_string()),
        ];

        let response = self
            .client
            .post(format!("{}/v1/payment_intents", self.api_base))
            .bearer_auth(self.secret_key.expose_secret())
            .form(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let message = response
                .json::<GatewayErrorBody>()
                .await
                .ok()
                .and_then(|b| b.error)
                .and_then(|e| e.message)
                .unwrap_or_else(|| "unknown gateway error".to_string());
            return Err(PaymentError::Gateway { status, message });
        }

        let intent = response.json::<PaymentIntent>().await?;

        tracing::debug!(intent_id = %intent.id, %order_number, "Payment intent created");

        Ok(intent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_minor_units_whole() {
        assert_eq!(to_minor_units(Decimal::from(1180)).expect("convert"), 118_000);
    }

    #[test]
    fn test_to_minor_units_fractional() {
        // 599.50 -> 59950
        let amount = Decimal::new(59_950, 2);
        assert_eq!(to_minor_units(amount).expect("convert"), 59_950);
    }

    #[test]
    fn test_to_minor_units_rounds_sub_cent() {
        // 10.005 rounds bankers-style to 10.00 -> 1000
        let amount = Decimal::new(10_005, 3);
        assert_eq!(to_minor_units(amount).expect("convert"), 1_000);
    }

    #[test]
    fn test_to_minor_units_rejects_negative() {
        assert!(matches!(
            to_minor_units(Decimal::from(-1)),
            Err(PaymentError::InvalidAmount(_))
        ));
    }
}
