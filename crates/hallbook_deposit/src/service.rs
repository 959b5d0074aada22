// --- File: crates/hallbook_deposit/src/service.rs ---
//! Stripe implementation of the PaymentService capability.
//!
//! The deposit is a manual-capture PaymentIntent: the hold is placed and
//! confirmed off-session against a payment method saved at checkout, and
//! captured (or released) later by an operator. The secret key comes from
//! the STRIPE_SECRET_KEY env var, never from config files.

use hallbook_common::services::{
    AuthorizationResult, BoxFuture, BoxedError, CreateAuthorizationRequest, CustomerResult,
    PaymentService,
};
use hallbook_common::HTTP_CLIENT;
use serde::Deserialize;
use std::env;
use tracing::{debug, info};

use crate::error::DepositError;

const STRIPE_API_BASE: &str = "https://api.stripe.com/v1";

#[derive(Deserialize, Debug)]
struct StripeCustomer {
    id: String,
}

#[derive(Deserialize, Debug)]
struct StripeCustomerList {
    data: Vec<StripeCustomer>,
}

#[derive(Deserialize, Debug)]
struct StripePaymentIntent {
    id: String,
    status: String,
    amount: i64,
    currency: String,
}

fn boxed(err: DepositError) -> BoxedError {
    BoxedError(Box::new(err))
}

/// Stripe-backed payment service.
pub struct StripePaymentService;

impl StripePaymentService {
    pub fn new() -> Self {
        Self
    }

    fn secret_key() -> Result<String, DepositError> {
        env::var("STRIPE_SECRET_KEY").map_err(|_| DepositError::ConfigError)
    }

    async fn post_form(
        path: &str,
        form: &[(String, String)],
    ) -> Result<serde_json::Value, DepositError> {
        let secret_key = Self::secret_key()?;
        let url = format!("{}{}", STRIPE_API_BASE, path);

        let response = HTTP_CLIENT
            .post(&url)
            .basic_auth(secret_key, None::<&str>)
            .form(form)
            .send()
            .await?;

        let status = response.status();
        let body_text = response.text().await?;
        if !status.is_success() {
            return Err(DepositError::ApiError {
                status_code: status.as_u16(),
                message: body_text,
            });
        }

        Ok(serde_json::from_str(&body_text)?)
    }
}

impl Default for StripePaymentService {
    fn default() -> Self {
        Self::new()
    }
}

impl PaymentService for StripePaymentService {
    type Error = BoxedError;

    fn find_or_create_customer(
        &self,
        email: &str,
        name: &str,
    ) -> BoxFuture<'_, CustomerResult, Self::Error> {
        let email = email.to_string();
        let name = name.to_string();

        Box::pin(async move {
            let run = async {
                let secret_key = Self::secret_key()?;
                let response = HTTP_CLIENT
                    .get(format!("{}/customers", STRIPE_API_BASE))
                    .basic_auth(&secret_key, None::<&str>)
                    .query(&[("email", email.as_str()), ("limit", "1")])
                    .send()
                    .await?;

                let status = response.status();
                let body_text = response.text().await?;
                if !status.is_success() {
                    return Err(DepositError::ApiError {
                        status_code: status.as_u16(),
                        message: body_text,
                    });
                }

                let listed: StripeCustomerList = serde_json::from_str(&body_text)?;
                if let Some(existing) = listed.data.into_iter().next() {
                    debug!("Reusing Stripe customer {} for {}", existing.id, email);
                    return Ok(CustomerResult { id: existing.id });
                }

                let form = vec![
                    ("email".to_string(), email.clone()),
                    ("name".to_string(), name.clone()),
                ];
                let created = Self::post_form("/customers", &form).await?;
                let customer: StripeCustomer = serde_json::from_value(created)?;
                info!("Created Stripe customer {} for {}", customer.id, email);
                Ok(CustomerResult { id: customer.id })
            };
            run.await.map_err(boxed)
        })
    }

    fn create_authorization(
        &self,
        request: CreateAuthorizationRequest,
    ) -> BoxFuture<'_, AuthorizationResult, Self::Error> {
        Box::pin(async move {
            let run = async {
                let mut form = vec![
                    ("amount".to_string(), request.amount.to_string()),
                    ("currency".to_string(), request.currency.to_lowercase()),
                    ("capture_method".to_string(), "manual".to_string()),
                    ("payment_method".to_string(), request.payment_method),
                    ("confirm".to_string(), "false".to_string()),
                ];
                if let Some(customer) = request.customer {
                    form.push(("customer".to_string(), customer));
                }
                if let Some(description) = request.description {
                    form.push(("description".to_string(), description));
                }
                if let Some(metadata) = request.metadata {
                    for (key, value) in metadata {
                        form.push((format!("metadata[{}]", key), value));
                    }
                }

                let created = Self::post_form("/payment_intents", &form).await?;
                let intent: StripePaymentIntent = serde_json::from_value(created)?;
                info!(
                    "Created manual-capture intent {} ({} {})",
                    intent.id, intent.amount, intent.currency
                );
                Ok(AuthorizationResult {
                    id: intent.id,
                    status: intent.status,
                    amount: intent.amount,
                    currency: intent.currency,
                })
            };
            run.await.map_err(boxed)
        })
    }

    fn confirm_authorization(
        &self,
        authorization_id: &str,
        payment_method: &str,
    ) -> BoxFuture<'_, AuthorizationResult, Self::Error> {
        let authorization_id = authorization_id.to_string();
        let payment_method = payment_method.to_string();

        Box::pin(async move {
            let run = async {
                let form = vec![
                    ("payment_method".to_string(), payment_method),
                    // The customer is not present; the saved method must be
                    // chargeable without interaction.
                    ("off_session".to_string(), "true".to_string()),
                ];
                let path = format!("/payment_intents/{}/confirm", authorization_id);
                let confirmed = Self::post_form(&path, &form).await?;
                let intent: StripePaymentIntent = serde_json::from_value(confirmed)?;
                Ok(AuthorizationResult {
                    id: intent.id,
                    status: intent.status,
                    amount: intent.amount,
                    currency: intent.currency,
                })
            };
            run.await.map_err(boxed)
        })
    }
}
