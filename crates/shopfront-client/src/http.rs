//! # HTTP Storefront Client
//!
//! [`StorefrontApi`] over the storefront REST API with reqwest.
//!
//! ## Retry Policy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Request                     Resent on 5xx / 429 / transport error?    │
//! │  ───────────────────────     ──────────────────────────────────────    │
//! │  discount validate           yes (read-only)                            │
//! │  shipping fee                yes (read-only)                            │
//! │  credit balance, cart        yes (read-only)                            │
//! │  create order                yes, same X-Idempotency-Key every time     │
//! │  credit spend / reward       no (server has no dedupe for these)        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Delays grow exponentially from `retry.initial_backoff_ms` up to
//! `retry.max_backoff_secs`; at most `retry.max_retries` resends happen.

use async_trait::async_trait;
use backoff::backoff::Backoff;
use backoff::ExponentialBackoff;
use reqwest::{Client, RequestBuilder, Response};
use tracing::{debug, warn};
use url::Url;

use shopfront_core::{Cart, CartLine, Credits, DiscountDescriptor, Money};

use crate::api::StorefrontApi;
use crate::config::{ClientConfig, RetrySettings};
use crate::error::{CheckoutError, CheckoutResult};
use crate::protocol::{
    ApiErrorBody, CreditBalanceResponse, CreditLedgerResponse, CreditRewardRequest,
    CreditSpendRequest, DiscountValidationRequest, DiscountValidationResponse, Enveloped,
    OrderRecord, OrderSubmission, RemoteCartLine, ShippingFeeData, ShippingFeeRequest,
    IDEMPOTENCY_HEADER,
};

/// Whether a request may be sent more than once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Resend {
    Allowed,
    Never,
}

pub struct HttpStorefrontApi {
    client: Client,
    base_url: Url,
    retry: RetrySettings,
}

impl HttpStorefrontApi {
    /// Builds a client from a validated configuration.
    pub fn new(config: &ClientConfig) -> CheckoutResult<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(config.request_timeout())
            .connect_timeout(config.connect_timeout())
            .user_agent(concat!("shopfront-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CheckoutError::InvalidConfig(e.to_string()))?;

        Ok(HttpStorefrontApi {
            client,
            base_url: Url::parse(config.base_url())?,
            retry: config.retry.clone(),
        })
    }

    /// Joins path segments onto the base URL, encoding each one.
    fn endpoint(&self, segments: &[&str]) -> CheckoutResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| CheckoutError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn create_backoff(&self) -> ExponentialBackoff {
        ExponentialBackoff {
            initial_interval: self.retry.initial_backoff(),
            max_interval: self.retry.max_backoff(),
            multiplier: 2.0,
            max_elapsed_time: None,
            ..Default::default()
        }
    }

    /// Sends the request built by `build`, resending transient failures when
    /// `resend` allows it.
    async fn send<F>(
        &self,
        operation: &'static str,
        resend: Resend,
        build: F,
    ) -> CheckoutResult<Response>
    where
        F: Fn() -> RequestBuilder + Send + Sync,
    {
        let mut backoff = self.create_backoff();
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            debug!(operation, attempt, "Sending storefront request");

            let result = match build().send().await {
                Ok(response) => check_status(response).await,
                Err(e) => Err(CheckoutError::from(e)),
            };

            let error = match result {
                Ok(response) => return Ok(response),
                Err(e) => e,
            };

            let retries_left = resend == Resend::Allowed && attempt <= self.retry.max_retries;
            if !error.is_retryable() || !retries_left {
                return Err(error);
            }

            match backoff.next_backoff() {
                Some(delay) => {
                    warn!(
                        operation,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %error,
                        "Storefront request failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                None => return Err(error),
            }
        }
    }
}

/// Passes 2xx responses through and turns everything else into
/// [`CheckoutError::Api`] carrying the server's message.
async fn check_status(response: Response) -> CheckoutResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiErrorBody>(&text)
        .ok()
        .and_then(ApiErrorBody::into_message)
        .unwrap_or_else(|| {
            if text.trim().is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("Request failed")
                    .to_string()
            } else {
                text
            }
        });

    Err(CheckoutError::Api {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl StorefrontApi for HttpStorefrontApi {
    async fn validate_discount(&self, code: &str) -> CheckoutResult<DiscountDescriptor> {
        let url = self.endpoint(&["api", "discounts", "validate"])?;
        let body = DiscountValidationRequest { code };

        let response = self
            .send("validate_discount", Resend::Allowed, || {
                self.client.post(url.clone()).json(&body)
            })
            .await
            .map_err(|e| match e {
                CheckoutError::Api { status, message }
                    if (400..500).contains(&status) && status != 429 =>
                {
                    CheckoutError::InvalidDiscount {
                        code: code.to_string(),
                        reason: message,
                    }
                }
                other => other,
            })?;

        let descriptor = DiscountDescriptor::from(
            response
                .json::<DiscountValidationResponse>()
                .await?
                .into_inner(),
        );
        descriptor.validate()?;
        Ok(descriptor)
    }

    async fn shipping_fee(&self, request: &ShippingFeeRequest) -> CheckoutResult<Money> {
        let url = self.endpoint(&["api", "user", "getshippingfee"])?;

        let response = self
            .send("shipping_fee", Resend::Allowed, || {
                self.client.post(url.clone()).json(request)
            })
            .await?;

        let data = response
            .json::<Enveloped<ShippingFeeData>>()
            .await?
            .into_inner();
        Ok(Money::from_dollars(data.shipping_fee))
    }

    async fn credit_balance(&self, email: &str) -> CheckoutResult<Credits> {
        let url = self.endpoint(&["api", "credits", email])?;

        let response = self
            .send("credit_balance", Resend::Allowed, || self.client.get(url.clone()))
            .await?;

        Ok(response.json::<CreditBalanceResponse>().await?.balance)
    }

    async fn spend_credits(
        &self,
        request: &CreditSpendRequest,
    ) -> CheckoutResult<CreditLedgerResponse> {
        let url = self.endpoint(&["api", "credits", "spend"])?;

        let response = self
            .send("spend_credits", Resend::Never, || {
                self.client.post(url.clone()).json(request)
            })
            .await?;

        Ok(response.json::<CreditLedgerResponse>().await?)
    }

    async fn reward_credits(
        &self,
        request: &CreditRewardRequest,
    ) -> CheckoutResult<CreditLedgerResponse> {
        let url = self.endpoint(&["api", "credits", "reward"])?;

        let response = self
            .send("reward_credits", Resend::Never, || {
                self.client.post(url.clone()).json(request)
            })
            .await?;

        Ok(response.json::<CreditLedgerResponse>().await?)
    }

    async fn create_order(&self, submission: &OrderSubmission) -> CheckoutResult<OrderRecord> {
        let url = self.endpoint(&["api", "orders"])?;
        let body = submission.body();
        let key = submission.idempotency_key.to_string();

        let response = self
            .send("create_order", Resend::Allowed, || {
                self.client
                    .post(url.clone())
                    .header(IDEMPOTENCY_HEADER, key.as_str())
                    .json(&body)
            })
            .await?;

        Ok(response.json::<Enveloped<OrderRecord>>().await?.into_inner())
    }

    async fn fetch_cart(&self, email: &str) -> CheckoutResult<Cart> {
        let url = self.endpoint(&["api", "user", "cart", email])?;

        let response = self
            .send("fetch_cart", Resend::Allowed, || self.client.get(url.clone()))
            .await?;

        let lines = response
            .json::<Enveloped<Vec<RemoteCartLine>>>()
            .await?
            .into_inner();
        Ok(Cart::from_lines(lines.into_iter().map(CartLine::from).collect()))
    }
}
