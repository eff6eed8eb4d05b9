use std::{collections::HashMap, sync::Arc, time::Duration};
use tracing::{info, warn};

use super::{partner1::Partner1, partner2::Partner2, Partner, PartnerClient, PartnerError};
use crate::{
    config::{CircuitBreakerConfig, PartnerConfig},
    error::AppError,
};

/// Builds a partner variant around its configured client.
pub type PartnerConstructor = fn(PartnerClient) -> Arc<dyn Partner>;

/// Variants shipped with the service, keyed by the id events refer to.
const BUILTIN_PARTNERS: &[(i32, PartnerConstructor)] = &[(1, Partner1::build), (2, Partner2::build)];

pub trait PartnerFactory: Send + Sync {
    fn get_partner(&self, partner_id: i32) -> Result<Arc<dyn Partner>, AppError>;
}

/// Keeps one long-lived instance per configured partner so that circuit
/// breaker state survives across purchases.
pub struct DefaultPartnerFactory {
    base_urls: HashMap<i32, String>,
    http_client: reqwest::Client,
    circuit_breaker: CircuitBreakerConfig,
    partners: HashMap<i32, Arc<dyn Partner>>,
}

impl DefaultPartnerFactory {
    /// Factory with only the built-in variants registered.
    pub fn new(
        config: &PartnerConfig,
        circuit_breaker: &CircuitBreakerConfig,
    ) -> Result<Self, PartnerError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        let factory = Self {
            base_urls: config.base_urls.clone(),
            http_client,
            circuit_breaker: circuit_breaker.clone(),
            partners: HashMap::new(),
        };

        Ok(BUILTIN_PARTNERS
            .iter()
            .fold(factory, |factory, (id, constructor)| {
                factory.with_variant(*id, *constructor)
            }))
    }

    /// Registers (or replaces) the variant served under `partner_id`.
    ///
    /// A variant without a configured base URL stays unreachable.
    pub fn with_variant(mut self, partner_id: i32, constructor: PartnerConstructor) -> Self {
        match self.base_urls.get(&partner_id) {
            Some(base_url) => {
                let client = PartnerClient::new(
                    partner_id,
                    base_url.clone(),
                    self.http_client.clone(),
                    &self.circuit_breaker,
                );
                info!(partner_id, base_url = %base_url, "Partner registered");
                self.partners.insert(partner_id, constructor(client));
            }
            None => warn!(partner_id, "No base URL configured for partner, skipping"),
        }
        self
    }

    pub fn registered_ids(&self) -> Vec<i32> {
        let mut ids: Vec<i32> = self.partners.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}

impl PartnerFactory for DefaultPartnerFactory {
    fn get_partner(&self, partner_id: i32) -> Result<Arc<dyn Partner>, AppError> {
        self.partners
            .get(&partner_id)
            .cloned()
            .ok_or(AppError::PartnerNotFound(partner_id))
    }
}
