//! Service configuration.
//!
//! Centralized configuration with defaults matching the lending rules.

use serde::{Deserialize, Serialize};

use crate::{engine::policy::LoanPolicy, runtime::handle::RuntimeConfig};

/// Main configuration for a library service instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Network
    // -------------------------------------------------------------------------
    /// HTTP listen address.
    pub listen_addr: String,

    // -------------------------------------------------------------------------
    // Lending rules
    // -------------------------------------------------------------------------
    /// Loan period, cap and penalty rate.
    pub policy: LoanPolicy,

    // -------------------------------------------------------------------------
    // Runtime
    // -------------------------------------------------------------------------
    /// Command queue and event channel sizing.
    pub runtime: RuntimeConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8000".to_string(),
            policy: LoanPolicy::default(),
            runtime: RuntimeConfig::default(),
        }
    }
}

impl Config {
    /// Create a new config builder.
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for [`Config`].
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the HTTP listen address.
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    /// Set the number of days a loan lasts.
    pub fn loan_period_days(mut self, days: i64) -> Self {
        self.config.policy.loan_period_days = days;
        self
    }

    /// Set the maximum number of active loans per reader.
    pub fn max_active_loans(mut self, cap: usize) -> Self {
        self.config.policy.max_active_loans = cap;
        self
    }

    /// Set the penalty days charged per day of delay.
    pub fn penalty_per_late_day(mut self, days: u32) -> Self {
        self.config.policy.penalty_per_late_day = days;
        self
    }

    /// Set the runtime command queue bound.
    pub fn command_queue_bound(mut self, bound: usize) -> Self {
        self.config.runtime.command_queue_bound = bound.max(1);
        self
    }

    /// Build the config.
    pub fn build(self) -> Config {
        self.config
    }
}
