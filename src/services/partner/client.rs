//! Shared HTTP plumbing for partner variants.
//!
//! A [`PartnerClient`] owns the base URL of one partner, the pooled
//! `reqwest` client (with the outbound timeout already applied) and a
//! circuit breaker. Once a partner keeps failing, the breaker opens and
//! further calls are refused locally until the backoff elapses, instead of
//! piling more requests on a service that is already down.

use failsafe::{
    backoff::{self, Constant},
    failure_policy::{self, ConsecutiveFailures},
    futures::CircuitBreaker,
    Config, StateMachine,
};
use reqwest::StatusCode;
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use tracing::{debug, error, warn};

use super::PartnerError;
use crate::config::CircuitBreakerConfig;

type Breaker = StateMachine<ConsecutiveFailures<Constant>, ()>;

pub struct PartnerClient {
    partner_id: i32,
    base_url: String,
    http_client: reqwest::Client,
    circuit_breaker: Breaker,
}

impl PartnerClient {
    pub fn new(
        partner_id: i32,
        base_url: impl Into<String>,
        http_client: reqwest::Client,
        breaker: &CircuitBreakerConfig,
    ) -> Self {
        let backoff = backoff::constant(Duration::from_secs(breaker.timeout_seconds));
        let policy = failure_policy::consecutive_failures(breaker.failure_threshold.max(1), backoff);

        Self {
            partner_id,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http_client,
            circuit_breaker: Config::new().failure_policy(policy).build(),
        }
    }

    pub fn partner_id(&self) -> i32 {
        self.partner_id
    }

    /// POSTs `body` as JSON to `{base_url}{path}` and decodes a JSON array.
    ///
    /// Only `201 Created` counts as success; any other status is returned as
    /// [`PartnerError::ReservationFailed`] carrying the code.
    pub async fn post_reservation<B, R>(&self, path: &str, body: &B) -> Result<Vec<R>, PartnerError>
    where
        B: Serialize + Sync + ?Sized,
        R: DeserializeOwned + Send,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!(partner_id = self.partner_id, %url, "Sending reservation to partner");

        let operation = async {
            let response = self.http_client.post(&url).json(body).send().await?;

            let status = response.status();
            if status != StatusCode::CREATED {
                return Err(PartnerError::ReservationFailed {
                    status: status.as_u16(),
                });
            }

            Ok(response.json::<Vec<R>>().await?)
        };

        match self
            .circuit_breaker
            .call_with(|e: &PartnerError| e.is_outage(), operation)
            .await
        {
            Ok(outcomes) => Ok(outcomes),
            Err(failsafe::Error::Inner(e)) => {
                error!(partner_id = self.partner_id, error = %e, "Partner reservation failed");
                Err(e)
            }
            Err(failsafe::Error::Rejected) => {
                warn!(
                    partner_id = self.partner_id,
                    "Circuit breaker is OPEN - blocking partner request"
                );
                Err(PartnerError::Unavailable)
            }
        }
    }
}
