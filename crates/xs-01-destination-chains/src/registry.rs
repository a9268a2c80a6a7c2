//! # Chain Registry
//!
//! Owner-controlled table mapping chain ids to adapters. Every routed query
//! fails with `ChainNotSupported` when the chain is missing or inactive.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let mut registry = ChainRegistry::new(owner);
//! registry.register(&owner, NEAR_MAINNET, Arc::new(NearAdapter::new(cfg)?))?;
//!
//! let deposit = registry.calculate_min_safety_deposit(NEAR_MAINNET, amount)?;
//! ```

use parking_lot::RwLock;
use shared_bus::{SharedPublisher, SwapEvent};
use shared_types::{Address, Amount, ChainId};
use std::collections::HashMap;
use std::sync::Arc;
use swap_telemetry::{metric_inc, REGISTRY_CHANGES};
use tracing::{debug, info, warn};

use crate::config::RegistryConfig;
use crate::domain::{invariant_adapter_valid, ChainError, ChainInfo, ChainSpecificParams, ValidationResult};
use crate::ports::SharedAdapter;

/// Registry shared between the factory and the coordinator.
pub type SharedChainRegistry = Arc<RwLock<ChainRegistry>>;

/// Central registry of destination chain adapters.
pub struct ChainRegistry {
    owner: Address,
    adapters: HashMap<ChainId, SharedAdapter>,
    publisher: Option<SharedPublisher>,
}

impl ChainRegistry {
    /// Create an empty registry owned by `owner`.
    pub fn new(owner: Address) -> Self {
        Self {
            owner,
            adapters: HashMap::new(),
            publisher: None,
        }
    }

    /// Publish registry changes to `publisher`.
    pub fn with_publisher(mut self, publisher: SharedPublisher) -> Self {
        self.publisher = Some(publisher);
        self
    }

    /// Build a registry with every adapter in `config` installed.
    pub fn from_config(owner: Address, config: &RegistryConfig) -> Result<Self, ChainError> {
        let mut registry = Self::new(owner);
        for entry in &config.chains {
            registry.register(&owner, entry.chain_id(), entry.build()?)?;
        }
        Ok(registry)
    }

    /// Wrap into the shared handle.
    pub fn into_shared(self) -> SharedChainRegistry {
        Arc::new(RwLock::new(self))
    }

    /// Registry owner.
    pub fn owner(&self) -> Address {
        self.owner
    }

    /// Hand registry administration to `new_owner`.
    pub fn transfer_ownership(&mut self, caller: &Address, new_owner: Address) -> Result<(), ChainError> {
        self.ensure_owner(caller)?;
        if shared_types::is_zero(&new_owner) {
            return Err(ChainError::Config("owner is zero".into()));
        }
        self.owner = new_owner;
        info!(owner = %hex::encode(new_owner), "[xs-01] Registry ownership transferred");
        Ok(())
    }

    fn ensure_owner(&self, caller: &Address) -> Result<(), ChainError> {
        if *caller != self.owner {
            warn!(caller = %hex::encode(caller), "[xs-01] Unauthorized registry mutation");
            return Err(ChainError::Unauthorized);
        }
        Ok(())
    }

    fn publish(&self, event: SwapEvent) {
        if let Some(publisher) = &self.publisher {
            publisher.publish(event);
        }
    }

    /// Register an adapter for a new chain.
    pub fn register(
        &mut self,
        caller: &Address,
        chain_id: ChainId,
        adapter: SharedAdapter,
    ) -> Result<(), ChainError> {
        self.ensure_owner(caller)?;
        invariant_adapter_valid(chain_id, adapter.chain_info())?;
        if self.adapters.contains_key(&chain_id) {
            return Err(ChainError::ChainAlreadyRegistered(chain_id));
        }

        let name = adapter.chain_info().name.clone();
        info!("[xs-01] Registering chain {} ({})", chain_id, name);
        self.adapters.insert(chain_id, adapter);
        metric_inc!(REGISTRY_CHANGES, &["register"]);
        self.publish(SwapEvent::ChainRegistered { chain_id, name });
        Ok(())
    }

    /// Replace the adapter of a registered chain.
    pub fn update(
        &mut self,
        caller: &Address,
        chain_id: ChainId,
        adapter: SharedAdapter,
    ) -> Result<(), ChainError> {
        self.ensure_owner(caller)?;
        invariant_adapter_valid(chain_id, adapter.chain_info())?;
        if !self.adapters.contains_key(&chain_id) {
            return Err(ChainError::ChainNotSupported(chain_id));
        }

        let name = adapter.chain_info().name.clone();
        info!("[xs-01] Updating chain {} ({})", chain_id, name);
        self.adapters.insert(chain_id, adapter);
        metric_inc!(REGISTRY_CHANGES, &["update"]);
        self.publish(SwapEvent::ChainUpdated { chain_id, name });
        Ok(())
    }

    /// Remove a chain. Other entries are untouched.
    pub fn unregister(&mut self, caller: &Address, chain_id: ChainId) -> Result<SharedAdapter, ChainError> {
        self.ensure_owner(caller)?;
        let adapter = self
            .adapters
            .remove(&chain_id)
            .ok_or(ChainError::ChainNotSupported(chain_id))?;

        let name = adapter.chain_info().name.clone();
        info!("[xs-01] Removed chain {} ({})", chain_id, name);
        metric_inc!(REGISTRY_CHANGES, &["remove"]);
        self.publish(SwapEvent::ChainRemoved { chain_id, name });
        Ok(adapter)
    }

    /// Active adapter for `chain_id`.
    pub fn adapter(&self, chain_id: ChainId) -> Result<&SharedAdapter, ChainError> {
        match self.adapters.get(&chain_id) {
            Some(adapter) if adapter.chain_info().is_active => Ok(adapter),
            Some(_) => {
                debug!("[xs-01] Chain {} is registered but inactive", chain_id);
                Err(ChainError::ChainNotSupported(chain_id))
            }
            None => Err(ChainError::ChainNotSupported(chain_id)),
        }
    }

    /// Whether `chain_id` is registered and active.
    pub fn is_chain_supported(&self, chain_id: ChainId) -> bool {
        self.adapter(chain_id).is_ok()
    }

    /// Whether `chain_id` is registered, active or not.
    pub fn is_registered(&self, chain_id: ChainId) -> bool {
        self.adapters.contains_key(&chain_id)
    }

    /// Active chain ids, ascending.
    pub fn supported_chain_ids(&self) -> Vec<ChainId> {
        let mut ids: Vec<_> = self
            .adapters
            .iter()
            .filter(|(_, a)| a.chain_info().is_active)
            .map(|(id, _)| *id)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Number of registered adapters.
    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    /// Whether no adapters are registered.
    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }

    // =========================================================================
    // ROUTED QUERIES
    // =========================================================================

    /// Chain metadata.
    pub fn chain_info(&self, chain_id: ChainId) -> Result<ChainInfo, ChainError> {
        Ok(self.adapter(chain_id)?.chain_info().clone())
    }

    /// Validate an order's chain parameters on the destination chain.
    pub fn validate_order_params(
        &self,
        chain_id: ChainId,
        params: &ChainSpecificParams,
        amount: Amount,
    ) -> Result<ValidationResult, ChainError> {
        Ok(self.adapter(chain_id)?.validate_order_params(params, amount))
    }

    /// Estimated execution cost on the destination chain.
    pub fn estimate_execution_cost(
        &self,
        chain_id: ChainId,
        params: &ChainSpecificParams,
        amount: Amount,
    ) -> Result<Amount, ChainError> {
        self.adapter(chain_id)?.estimate_execution_cost(params, amount)
    }

    /// Minimum safety deposit for `amount` on the destination chain.
    pub fn calculate_min_safety_deposit(&self, chain_id: ChainId, amount: Amount) -> Result<Amount, ChainError> {
        Ok(self.adapter(chain_id)?.calculate_min_safety_deposit(amount))
    }

    /// Validate a destination address.
    pub fn validate_destination_address(&self, chain_id: ChainId, address: &[u8]) -> Result<bool, ChainError> {
        Ok(self.adapter(chain_id)?.validate_destination_address(address))
    }

    /// Capability check.
    pub fn supports_feature(&self, chain_id: ChainId, feature: &str) -> Result<bool, ChainError> {
        Ok(self.adapter(chain_id)?.supports_feature(feature))
    }

    /// Execution metadata for an order.
    pub fn order_metadata(&self, chain_id: ChainId, params: &ChainSpecificParams) -> Result<Vec<u8>, ChainError> {
        self.adapter(chain_id)?.order_metadata(params)
    }
}
